//! Pagination control rendering.
//!
//! `control_slots` decides what to show; `render` turns slots into DOM nodes.
//! Ellipses are non-interactive spans, the current page is a disabled button
//! with `aria-current="page"`, and previous/next buttons disable at the ends.
//!
//! Buttons carry their target page in `data-page`. A [`PagingControl`] owns a
//! single click listener on the container, so re-rendering never adds
//! listeners; dropping the control (`free()` from JS) removes it.

use crate::dom;
use sf_format::format_label;
use sf_paging::PageRange;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{Element, HtmlButtonElement, MouseEvent};

const PAGE_ATTR: &str = "data-page";

/// A pagination control bound to one container element.
#[wasm_bindgen]
pub struct PagingControl {
    container: Element,
    on_click: Closure<dyn FnMut(MouseEvent)>,
}

#[wasm_bindgen]
impl PagingControl {
    /// Bind to `#container_id`. `on_select` is called with the page number
    /// of the clicked button.
    #[wasm_bindgen(constructor)]
    pub fn new(container_id: &str, on_select: js_sys::Function) -> Result<PagingControl, JsValue> {
        let container = dom::by_id(container_id)?;
        dom::add_class(&container, "paging-control");

        let on_click = Closure::wrap(Box::new(move |event: MouseEvent| {
            let Some(page) = clicked_page(&event) else {
                return;
            };
            if let Err(err) = on_select.call1(&JsValue::NULL, &JsValue::from(page)) {
                gloo_console::error!("paging select handler failed", err);
            }
        }) as Box<dyn FnMut(MouseEvent)>);
        container.add_event_listener_with_callback("click", on_click.as_ref().unchecked_ref())?;

        Ok(Self {
            container,
            on_click,
        })
    }

    /// Replace the container's children with the control for this page.
    pub fn render(&self, current_page: u32, total_pages: u32, max_buttons: u32) -> Result<(), JsValue> {
        let slots = control_slots(current_page, total_pages, max_buttons);
        render(&self.container, &slots)
    }
}

impl Drop for PagingControl {
    fn drop(&mut self) {
        let _ = self
            .container
            .remove_event_listener_with_callback("click", self.on_click.as_ref().unchecked_ref());
    }
}

/// Target page of the enabled button a click landed on, if any.
fn clicked_page(event: &MouseEvent) -> Option<u32> {
    let target: Element = event.target()?.dyn_into().ok()?;
    let button = target.closest("button[data-page]:not([disabled])").ok()??;
    parse_page(&button.get_attribute(PAGE_ATTR)?)
}

fn parse_page(raw: &str) -> Option<u32> {
    raw.trim().parse().ok().filter(|page| *page > 0)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlSlot {
    /// Target page of the "previous" button, `None` on the first page.
    Previous(Option<u32>),
    Page { number: u32, current: bool },
    Ellipsis,
    /// Target page of the "next" button, `None` on the last page.
    Next(Option<u32>),
}

pub fn control_slots(current_page: u32, total_pages: u32, max_buttons: u32) -> Vec<ControlSlot> {
    let range = PageRange::clamped(current_page, total_pages, max_buttons);
    if range.total_pages() == 0 {
        return Vec::new();
    }

    let mut slots = Vec::with_capacity(range.items().len() + 2);
    slots.push(ControlSlot::Previous(range.previous_page()));
    slots.extend(range.items().iter().map(|item| match item.page_number {
        Some(number) => ControlSlot::Page {
            number,
            current: item.is_current_page,
        },
        None => ControlSlot::Ellipsis,
    }));
    slots.push(ControlSlot::Next(range.next_page()));
    slots
}

pub fn render(container: &Element, slots: &[ControlSlot]) -> Result<(), JsValue> {
    container.set_inner_html("");

    for slot in slots {
        let node = match *slot {
            ControlSlot::Previous(target) => nav_button("\u{2039}", "Previous page", target)?,
            ControlSlot::Next(target) => nav_button("\u{203a}", "Next page", target)?,
            ControlSlot::Page { number, current } => page_button(number, current)?,
            ControlSlot::Ellipsis => {
                let span = dom::create_element("span")?;
                dom::add_class(&span, "paging-ellipsis");
                span.set_attribute("aria-hidden", "true")?;
                span.set_text_content(Some("\u{2026}"));
                span
            }
        };
        container.append_child(&node)?;
    }

    Ok(())
}

fn page_button(number: u32, current: bool) -> Result<Element, JsValue> {
    let text = number.to_string();
    let aria_label = format_label("Page {0}", &[text.as_str()]);
    let target = if current { None } else { Some(number) };

    let button = button(&text, &aria_label, target)?;
    dom::add_class(&button, "paging-page");
    if current {
        dom::add_class(&button, "is-current");
        button.set_attribute("aria-current", "page")?;
    }
    Ok(button)
}

fn nav_button(text: &str, aria_label: &str, target: Option<u32>) -> Result<Element, JsValue> {
    let button = button(text, aria_label, target)?;
    dom::add_class(&button, "paging-nav");
    Ok(button)
}

fn button(text: &str, aria_label: &str, target: Option<u32>) -> Result<Element, JsValue> {
    let button: HtmlButtonElement = dom::create_element("button")?.dyn_into()?;
    button.set_type("button");
    button.set_text_content(Some(text));
    button.set_attribute("aria-label", aria_label)?;

    match target {
        Some(page) => button.set_attribute(PAGE_ATTR, &page.to_string())?,
        None => button.set_disabled(true),
    }

    Ok(button.into())
}

//! Storefront paging control for the browser.
//!
//! Exposes the page-range generator to JavaScript and a `PagingControl`
//! class that renders a pagination control into a host element. Page clicks
//! are reported through a callback; the host calls `render` again with the
//! new current page.

pub mod dom;
pub mod paging_control;

pub use paging_control::PagingControl;

use sf_paging::PageRange;
use wasm_bindgen::prelude::*;

/// WASM entry point – called automatically when the module is instantiated.
#[wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();
}

/// Page items as plain JS objects (`{ id, pageNumber, isCurrentPage, isRange }`).
///
/// The current page is clamped into range before generation.
#[wasm_bindgen(js_name = pageItems)]
pub fn page_items(current_page: u32, total_pages: u32, max_buttons: u32) -> Result<JsValue, JsValue> {
    let range = PageRange::clamped(current_page, total_pages, max_buttons);
    serde_wasm_bindgen::to_value(range.items()).map_err(JsValue::from)
}

#[wasm_bindgen(js_name = pagingSummary)]
pub fn paging_summary(current_page: u32, page_size: usize, total_items: usize) -> String {
    sf_format::format_paging_summary(current_page, page_size, total_items)
}

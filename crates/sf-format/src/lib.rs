//! Label formatting and inline style generation for storefront components.

use sf_paging::item_range;

/// Substitute `{0}`, `{1}`, … placeholders in a label template.
///
/// Placeholders whose index has no matching argument, and braces that do not
/// enclose a plain index, are copied through unchanged.
pub fn format_label(template: &str, args: &[&str]) -> String {
    let mut output = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(open) = rest.find('{') {
        output.push_str(&rest[..open]);
        let after_open = &rest[open + 1..];

        let substituted = after_open.find('}').and_then(|close| {
            let index = &after_open[..close];
            if index.is_empty() || !index.bytes().all(|b| b.is_ascii_digit()) {
                return None;
            }
            let arg = index.parse::<usize>().ok().and_then(|i| args.get(i))?;
            Some((*arg, close))
        });

        match substituted {
            Some((arg, close)) => {
                output.push_str(arg);
                rest = &after_open[close + 1..];
            }
            None => {
                output.push('{');
                rest = after_open;
            }
        }
    }

    output.push_str(rest);
    output
}

/// "`start`-`end` of `total`" summary shown next to a paging control.
pub fn format_paging_summary(current_page: u32, page_size: usize, total_items: usize) -> String {
    if total_items == 0 {
        return "0 of 0".to_owned();
    }
    let (start, end) = item_range(current_page, page_size, total_items);
    let (start, end, total) = ((start + 1).to_string(), end.to_string(), total_items.to_string());
    format_label(
        "{0}-{1} of {2}",
        &[start.as_str(), end.as_str(), total.as_str()],
    )
}

/// Ordered CSS declarations rendered into a `style` attribute value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StyleBuilder {
    declarations: Vec<(String, String)>,
}

impl StyleBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a property. Blank values are skipped; setting a property twice keeps
    /// its first position and the latest value.
    pub fn set(mut self, property: &str, value: &str) -> Self {
        let property = property.trim();
        let value = value.trim();
        if property.is_empty() || value.is_empty() {
            return self;
        }

        match self.declarations.iter_mut().find(|(name, _)| name.as_str() == property) {
            Some(existing) => existing.1 = value.to_owned(),
            None => self.declarations.push((property.to_owned(), value.to_owned())),
        }
        self
    }

    pub fn set_opt(self, property: &str, value: Option<&str>) -> Self {
        match value {
            Some(value) => self.set(property, value),
            None => self,
        }
    }

    /// Set a CSS custom property; the `--` prefix is added when missing.
    pub fn set_var(self, name: &str, value: &str) -> Self {
        let name = name.trim();
        if name.starts_with("--") {
            self.set(name, value)
        } else {
            self.set(&format!("--{name}"), value)
        }
    }

    pub fn is_empty(&self) -> bool {
        self.declarations.is_empty()
    }

    pub fn build(&self) -> String {
        self.declarations
            .iter()
            .map(|(property, value)| format!("{property}: {value};"))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Build a style string from `(property, value)` pairs, skipping unset values.
pub fn generate_style(pairs: &[(&str, Option<&str>)]) -> String {
    pairs
        .iter()
        .fold(StyleBuilder::new(), |builder, (property, value)| builder.set_opt(property, *value))
        .build()
}

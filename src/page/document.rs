use scraper::{ElementRef, Html, Selector};
use tracing::debug;

/// Read-only view over a parsed issue page.
pub struct PageDocument {
    html: Html,
}

impl PageDocument {
    pub fn parse(source: &str) -> Self {
        Self {
            html: Html::parse_document(source),
        }
    }

    pub fn query_selector(&self, selector: &str) -> Option<ElementRef<'_>> {
        let selector = parse_selector(selector)?;
        let first = self.html.select(&selector).next();
        first
    }

    pub fn query_selector_all(&self, selector: &str) -> Vec<ElementRef<'_>> {
        let Some(selector) = parse_selector(selector) else {
            return Vec::new();
        };
        let matches = self.html.select(&selector).collect();
        matches
    }

    /// Text of the `<title>` element, empty when the page has none.
    pub fn title(&self) -> String {
        self.query_selector("title")
            .map(|title| text_content(&title))
            .unwrap_or_default()
    }
}

/// First descendant of `element` matching `selector`.
pub fn query_within<'a>(element: &ElementRef<'a>, selector: &str) -> Option<ElementRef<'a>> {
    let selector = parse_selector(selector)?;
    let first = element.select(&selector).next();
    first
}

pub fn query_all_within<'a>(element: &ElementRef<'a>, selector: &str) -> Vec<ElementRef<'a>> {
    let Some(selector) = parse_selector(selector) else {
        return Vec::new();
    };
    let matches = element.select(&selector).collect();
    matches
}

/// Concatenated text of the element and all its descendants.
pub fn text_content(element: &ElementRef<'_>) -> String {
    element.text().collect()
}

fn parse_selector(selector: &str) -> Option<Selector> {
    match Selector::parse(selector) {
        Ok(parsed) => Some(parsed),
        Err(err) => {
            debug!(selector, error = ?err, "ignoring invalid selector");
            None
        }
    }
}

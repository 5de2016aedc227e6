//! Structured extraction: build the HTML tree and walk its table rows.

use std::sync::LazyLock;

use scraper::{ElementRef, Html, Selector};

use super::ParseStrategy;

static ROW_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("tr").expect("row selector parses"));

/// Rows come from the parsed document tree, cells are the row's direct
/// `td`/`th` children (nested tables contribute their own rows).
pub struct TreeStrategy;

impl ParseStrategy for TreeStrategy {
    fn name(&self) -> &'static str {
        "tree"
    }

    fn rows(&self, document: &str) -> Vec<Vec<String>> {
        let html = Html::parse_document(document);
        html.select(&ROW_SELECTOR)
            .map(|row| {
                row.children()
                    .filter_map(ElementRef::wrap)
                    .filter(|cell| matches!(cell.value().name(), "td" | "th"))
                    .map(|cell| cell.text().collect::<String>().trim().to_string())
                    .collect()
            })
            .collect()
    }
}

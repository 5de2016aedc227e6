//! Pattern-based fallback: tolerant tag-boundary scan over raw markup.
//!
//! A row runs from one `<tr>` to the next `<tr>` and is cut at the first
//! closing tag, so missing `</tr>`/`</td>` do not lose data. Cells are found the
//! same way inside each row.

use std::sync::LazyLock;

use regex::Regex;

use super::ParseStrategy;

static ROW_OPEN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)<tr\b[^>]*>").expect("row open pattern compiles"));
static ROW_CLOSE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)</tr\s*>|</table\s*>").expect("row close pattern compiles")
});
static CELL_OPEN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)<t[dh]\b[^>]*>").expect("cell open pattern compiles"));
static CELL_CLOSE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)</t[dh]\s*>").expect("cell close pattern compiles"));
static TAG_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<[^>]*>").expect("tag pattern compiles"));

pub struct ScanStrategy;

impl ParseStrategy for ScanStrategy {
    fn name(&self) -> &'static str {
        "scan"
    }

    fn rows(&self, document: &str) -> Vec<Vec<String>> {
        fragments(document, &ROW_OPEN_RE, &ROW_CLOSE_RE)
            .into_iter()
            .map(|row| {
                fragments(row, &CELL_OPEN_RE, &CELL_CLOSE_RE)
                    .into_iter()
                    .map(clean_cell)
                    .collect()
            })
            .collect()
    }
}

/// Inner text of each `open` match, bounded by the next `open` match and cut
/// at the first `close` match.
fn fragments<'a>(html: &'a str, open: &Regex, close: &Regex) -> Vec<&'a str> {
    let opens: Vec<_> = open.find_iter(html).collect();
    opens
        .iter()
        .enumerate()
        .map(|(i, m)| {
            let end = opens.get(i + 1).map_or(html.len(), |next| next.start());
            let body = &html[m.end()..end];
            match close.find(body) {
                Some(c) => &body[..c.start()],
                None => body,
            }
        })
        .collect()
}

fn clean_cell(fragment: &str) -> String {
    let text = TAG_RE.replace_all(fragment, " ");
    normalize_ws(&normalize_entities(&text))
}

/// Minimal entity decoding: non-breaking spaces and ampersands only.
fn normalize_entities(s: &str) -> String {
    s.replace("&nbsp;", " ")
        .replace("&#160;", " ")
        .replace("&amp;", "&")
}

/// Collapse whitespace runs into one space and trim.
fn normalize_ws(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

//! Converts the service's HTML description fragments into plain text.
//!
//! Descriptions come from a third-party catalog and are not trusted. Nothing
//! from them reaches the terminal except printable text and newlines.

use std::sync::LazyLock;

use regex::Regex;

static LINE_BREAK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)<br\s*/?>|</p\s*>").expect("valid line break pattern"));
static TAG: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<[^>]*>").expect("valid tag pattern"));
static BLANK_RUN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\n{3,}").expect("valid blank run pattern"));

/// Strips markup from `html` and returns printable text.
///
/// `<br>` and `</p>` become newlines, every other tag is dropped, entities
/// are decoded, and control characters (other than `\n`) are removed.
pub fn to_plain_text(html: &str) -> String {
    let with_breaks = LINE_BREAK.replace_all(html, "\n");
    let untagged = TAG.replace_all(&with_breaks, "");
    let decoded = html_escape::decode_html_entities(&untagged);

    let printable: String = decoded
        .chars()
        .map(|c| if c == '\t' { ' ' } else { c })
        .filter(|c| *c == '\n' || !c.is_control())
        .collect();

    let lines: Vec<&str> = printable.lines().map(str::trim_end).collect();
    BLANK_RUN
        .replace_all(&lines.join("\n"), "\n\n")
        .trim()
        .to_string()
}

//! Text helpers: flattening rich-text HTML and naming exported files.

use regex::Regex;
use std::sync::LazyLock;

/// Line-breaking tags: `<br>` and the end of block elements.
static BLOCK_BREAK_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)<br\s*/?>|</(p|div|li|h[1-6]|ul|ol|blockquote)\s*>").unwrap()
});

/// Any remaining tag.
static TAG_REGEX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<[^>]*>").unwrap());

/// Regex to collapse runs of spaces and tabs into one.
static WHITESPACE_COLLAPSE_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[ \t\u{a0}]+").unwrap());

/// Numeric character references.
static NUMERIC_ENTITY_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"&#(x[0-9a-fA-F]+|[0-9]+);").unwrap());

/// Characters not allowed in exported file names.
static FILE_NAME_REGEX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[^a-zA-Z0-9]").unwrap());

/// Flatten a rich-text HTML fragment to plain text.
///
/// Block boundaries become line breaks, tags are dropped, entities decoded
/// and whitespace collapsed. Empty lines are removed.
pub fn strip_html(html: &str) -> String {
    let with_breaks = BLOCK_BREAK_REGEX.replace_all(html, "\n");
    let without_tags = TAG_REGEX.replace_all(&with_breaks, "");
    let decoded = decode_entities(&without_tags);

    decoded
        .lines()
        .map(|line| WHITESPACE_COLLAPSE_REGEX.replace_all(line, " ").trim().to_string())
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

fn decode_entities(text: &str) -> String {
    let numeric = NUMERIC_ENTITY_REGEX.replace_all(text, |caps: &regex::Captures| {
        let body = &caps[1];
        let code = match body.strip_prefix('x') {
            Some(hex) => u32::from_str_radix(hex, 16).ok(),
            None => body.parse::<u32>().ok(),
        };
        code.and_then(char::from_u32)
            .map(String::from)
            .unwrap_or_default()
    });

    numeric
        .replace("&nbsp;", " ")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&apos;", "'")
        .replace("&amp;", "&")
}

/// File name for an exported presentation: the intro title with every
/// non-alphanumeric character replaced by `_`, lower-cased, with a
/// `_presentation.<ext>` suffix.
pub fn export_file_name(intro_title: &str, extension: &str) -> String {
    let stem = FILE_NAME_REGEX.replace_all(intro_title, "_").to_lowercase();
    format!("{}_presentation.{}", stem, extension)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_html_blocks_and_inline() {
        let html = "<p>Fast <strong>insights</strong>,</p><ul><li>one</li><li>two</li></ul>";
        assert_eq!(strip_html(html), "Fast insights,\none\ntwo");
    }

    #[test]
    fn test_strip_html_entities() {
        assert_eq!(strip_html("Q&amp;A &lt;soon&gt; &#169; &#x2713;"), "Q&A <soon> © ✓");
        assert_eq!(strip_html("a&nbsp;&nbsp;b"), "a b");
    }

    #[test]
    fn test_strip_html_plain_text_unchanged() {
        assert_eq!(strip_html("Feature description"), "Feature description");
        assert_eq!(strip_html(""), "");
    }

    #[test]
    fn test_export_file_name() {
        assert_eq!(
            export_file_name("June Release", "pdf"),
            "june_release_presentation.pdf"
        );
        assert_eq!(
            export_file_name("Q3: AI & Data!", "zip"),
            "q3__ai___data__presentation.zip"
        );
        assert_eq!(export_file_name("", "pdf"), "_presentation.pdf");
    }
}

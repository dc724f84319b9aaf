//! Inline markup
//!
//! Markdown emphasis is rewritten into a tiny tag language (`<b>`, `<i>`)
//! which the document builder later splits back into styled runs.

use regex::Regex;
use std::sync::LazyLock;

static BOLD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\*\*(.*?)\*\*").expect("bold pattern is valid"));
static ITALIC: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\*(.*?)\*").expect("italic pattern is valid"));
static IMAGE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"!\[.*?\]\((.*?)\)").expect("image pattern is valid"));

/// `**x**` becomes `<b>x</b>`, then `*x*` becomes `<i>x</i>`.
pub fn translate_emphasis(text: &str) -> String {
    let bold = BOLD.replace_all(text, "<b>$1</b>");
    ITALIC.replace_all(&bold, "<i>$1</i>").into_owned()
}

/// `![alt](url)` becomes `<i>Image: url</i>`.
pub fn translate_images(text: &str) -> String {
    IMAGE.replace_all(text, "<i>Image: $1</i>").into_owned()
}

/// A run of text sharing one style.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Span {
    pub text: String,
    pub bold: bool,
    pub italic: bool,
}

/// Splits tagged text into styled runs.
///
/// Only `<b>`, `</b>`, `<i>` and `</i>` are recognised; any other `<` is
/// literal text. Unbalanced closing tags are ignored.
pub fn spans(markup: &str) -> Vec<Span> {
    const TAGS: [(&str, bool, bool); 4] = [
        ("<b>", true, true),
        ("</b>", true, false),
        ("<i>", false, true),
        ("</i>", false, false),
    ];

    let mut out: Vec<Span> = Vec::new();
    let mut bold = 0u32;
    let mut italic = 0u32;
    let mut current = String::new();
    let mut rest = markup;

    'outer: while !rest.is_empty() {
        if rest.starts_with('<') {
            for (tag, is_bold, opens) in TAGS {
                if let Some(after) = rest.strip_prefix(tag) {
                    if !current.is_empty() {
                        out.push(Span {
                            text: std::mem::take(&mut current),
                            bold: bold > 0,
                            italic: italic > 0,
                        });
                    }
                    let depth = if is_bold { &mut bold } else { &mut italic };
                    *depth = if opens {
                        *depth + 1
                    } else {
                        depth.saturating_sub(1)
                    };
                    rest = after;
                    continue 'outer;
                }
            }
        }

        let mut chars = rest.chars();
        if let Some(c) = chars.next() {
            current.push(c);
        }
        rest = chars.as_str();
    }

    if !current.is_empty() {
        out.push(Span {
            text: current,
            bold: bold > 0,
            italic: italic > 0,
        });
    }
    out
}

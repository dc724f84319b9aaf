use super::emoji::strip_emoji;
use super::inline::{translate_emphasis, translate_images};

/// Markdown heading depth. Level three is drawn with the level-two style.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeadingLevel {
    One,
    Two,
    Three,
}

/// One classified, stylable unit of report content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Block {
    /// `alert` marks the "red flags" section heading.
    Heading {
        level: HeadingLevel,
        text: String,
        alert: bool,
    },
    /// A line containing bold markup, with inline tags translated.
    Emphasis(String),
    /// A bullet item; the text excludes the bullet.
    ListItem(String),
    Paragraph(String),
    Spacer,
}

impl Block {
    pub fn heading(level: HeadingLevel, text: impl Into<String>) -> Self {
        Block::Heading {
            level,
            text: text.into(),
            alert: false,
        }
    }

    pub fn alert_heading(text: impl Into<String>) -> Self {
        Block::Heading {
            level: HeadingLevel::Two,
            text: text.into(),
            alert: true,
        }
    }

    /// Text carried by the block; empty for spacers.
    pub fn text(&self) -> &str {
        match self {
            Block::Heading { text, .. }
            | Block::Emphasis(text)
            | Block::ListItem(text)
            | Block::Paragraph(text) => text,
            Block::Spacer => "",
        }
    }
}

const ALERT_PHRASE: &str = "red flag";

/// Splits `# `, `## ` and `### ` prefixes. A bare `#` is not a heading.
fn heading_prefix(line: &str) -> Option<(HeadingLevel, &str)> {
    const PREFIXES: [(&str, HeadingLevel); 3] = [
        ("# ", HeadingLevel::One),
        ("## ", HeadingLevel::Two),
        ("### ", HeadingLevel::Three),
    ];

    for (prefix, level) in PREFIXES {
        if let Some(rest) = line.strip_prefix(prefix) {
            return Some((level, rest));
        }
    }
    None
}

/// Splits `- ` and `* ` bullets. A bare bullet yields empty text.
fn list_prefix(line: &str) -> Option<&str> {
    ["- ", "* "].iter().find_map(|prefix| {
        line.strip_prefix(prefix)
            .or_else(|| (line == prefix.trim_end()).then_some(""))
    })
}

/// Classifies one source line.
///
/// Rules are tried in order and the first match wins. `None` means the line
/// contributes nothing, which happens when stripping emoji leaves it empty.
pub fn classify_line(line: &str) -> Option<Block> {
    let line = line.trim();

    if line.is_empty() {
        return Some(Block::Spacer);
    }

    if let Some((level, rest)) = heading_prefix(line) {
        let cleaned = strip_emoji(rest);
        if cleaned.is_empty() {
            return None;
        }
        let alert =
            level == HeadingLevel::Two && cleaned.to_lowercase().contains(ALERT_PHRASE);
        return Some(Block::Heading {
            level,
            text: translate_emphasis(&cleaned),
            alert,
        });
    }

    if line.contains("**") {
        let text = translate_images(&translate_emphasis(&strip_emoji(line)));
        return (!text.is_empty()).then_some(Block::Emphasis(text));
    }

    if let Some(rest) = list_prefix(line) {
        let text = strip_emoji(rest);
        return (!text.is_empty()).then_some(Block::ListItem(text));
    }

    let text = strip_emoji(line);
    (!text.is_empty()).then_some(Block::Paragraph(text))
}

/// Classifies every line of `text`, preserving order.
pub fn parse_blocks(text: &str) -> Vec<Block> {
    text.split('\n').filter_map(classify_line).collect()
}

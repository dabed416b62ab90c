/*!
 * Screenplay line classification.
 *
 * Splits raw script text into physical lines and tags each one with a display
 * style and alignment so the formatting can be re-applied after translation.
 */

use serde::{Deserialize, Serialize};

/// Scene-heading prefixes that keep an all-caps line left aligned
pub const SCENE_HEADING_MARKERS: &[&str] = &["INT.", "EXT.", "INSERT TITLE:", "OVERTURE"];

/// Display style of a line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LineStyle {
    #[default]
    Normal,
    AllCaps,
    Italic,
}

/// Horizontal alignment of a line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LineAlign {
    #[default]
    Left,
    Center,
}

/// One physical line of a script, with its formatting
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct FormattedLine {
    /// Trimmed line content, italic markers removed
    pub text: String,
    /// Display style
    pub style: LineStyle,
    /// Alignment
    pub align: LineAlign,
}

impl FormattedLine {
    /// Create a line with explicit formatting
    pub fn new(text: impl Into<String>, style: LineStyle, align: LineAlign) -> Self {
        Self {
            text: text.into(),
            style,
            align,
        }
    }

    /// Create a normal, left-aligned line
    pub fn plain(text: impl Into<String>) -> Self {
        Self::new(text, LineStyle::Normal, LineAlign::Left)
    }

    /// Blank line placeholder
    pub fn blank() -> Self {
        Self::plain("")
    }

    pub fn is_blank(&self) -> bool {
        self.text.is_empty()
    }

    /// Classify a single raw line
    pub fn classify(raw: &str) -> Self {
        let trimmed = raw.trim();

        if trimmed.is_empty() {
            return Self::blank();
        }

        if is_all_caps(trimmed) {
            let align = if is_scene_heading(trimmed) {
                LineAlign::Left
            } else {
                LineAlign::Center
            };
            return Self::new(trimmed, LineStyle::AllCaps, align);
        }

        if trimmed.len() >= 2 && trimmed.starts_with('*') && trimmed.ends_with('*') {
            // one enclosing pair only
            let inner = trimmed[1..trimmed.len() - 1].trim();
            if inner.is_empty() {
                return Self::blank();
            }
            return Self::new(inner, LineStyle::Italic, LineAlign::Left);
        }

        Self::plain(trimmed)
    }
}

/// Parser turning raw script text into formatted lines
pub struct FormatParser;

impl FormatParser {
    /// Parse text into one `FormattedLine` per physical line
    ///
    /// Line count and order are preserved, blank lines included, so the
    /// result always has `line breaks + 1` entries.
    pub fn parse(text: &str) -> Vec<FormattedLine> {
        text.split('\n').map(FormattedLine::classify).collect()
    }
}

/// True when the line has at least one cased character and none in lower case
fn is_all_caps(line: &str) -> bool {
    let mut has_cased = false;
    for c in line.chars() {
        if c.is_lowercase() {
            return false;
        }
        if c.is_uppercase() {
            has_cased = true;
        }
    }
    has_cased
}

fn is_scene_heading(line: &str) -> bool {
    SCENE_HEADING_MARKERS
        .iter()
        .any(|marker| line.starts_with(marker))
}

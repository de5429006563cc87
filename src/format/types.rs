//! Formatting vocabulary shared by the inspector, the mutator and the toolbar.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::dom::style::ComputedStyle;

/// An unknown word in a formatting command.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown {kind} `{value}`")]
pub struct ParseVocabError {
    kind: &'static str,
    value: String,
}

impl ParseVocabError {
    fn new(kind: &'static str, value: &str) -> Self {
        Self {
            kind,
            value: value.to_owned(),
        }
    }
}

/// The four inline styles the toolbar can apply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InlineStyle {
    Bold,
    Italic,
    Underline,
    Strikethrough,
}

impl InlineStyle {
    pub const ALL: [Self; 4] = [
        Self::Bold,
        Self::Italic,
        Self::Underline,
        Self::Strikethrough,
    ];

    /// Tags that imply the style on everything inside them.
    pub const fn tags(self) -> &'static [&'static str] {
        match self {
            Self::Bold => &["b", "strong"],
            Self::Italic => &["i", "em"],
            Self::Underline => &["u"],
            Self::Strikethrough => &["s", "strike", "del"],
        }
    }

    /// Tag of the wrapper element created when applying the style.
    pub const fn canonical_tag(self) -> &'static str {
        match self {
            Self::Bold => "strong",
            Self::Italic => "em",
            Self::Underline => "u",
            Self::Strikethrough => "s",
        }
    }

    /// Inline declaration carried by the wrapper element.
    pub const fn declaration(self) -> (&'static str, &'static str) {
        match self {
            Self::Bold => ("font-weight", "bold"),
            Self::Italic => ("font-style", "italic"),
            Self::Underline => ("text-decoration", "underline"),
            Self::Strikethrough => ("text-decoration", "line-through"),
        }
    }

    pub fn matches_computed(self, style: &ComputedStyle) -> bool {
        match self {
            Self::Bold => matches!(style.font_weight.as_str(), "bold" | "700"),
            Self::Italic => style.font_style == "italic",
            Self::Underline => style.text_decoration.contains("underline"),
            Self::Strikethrough => style.text_decoration.contains("line-through"),
        }
    }

    /// Whether a parsed `style` attribute declares this style.
    pub fn matches_declarations(self, declarations: &[(String, String)]) -> bool {
        declarations.iter().any(|(name, value)| {
            let value = value.to_ascii_lowercase();
            match self {
                Self::Bold => name == "font-weight" && matches!(value.as_str(), "bold" | "700"),
                Self::Italic => name == "font-style" && value == "italic",
                Self::Underline => {
                    matches!(name.as_str(), "text-decoration" | "text-decoration-line")
                        && value.contains("underline")
                }
                Self::Strikethrough => {
                    matches!(name.as_str(), "text-decoration" | "text-decoration-line")
                        && value.contains("line-through")
                }
            }
        })
    }
}

/// Block tags the inspector reports and the block menu offers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BlockTag {
    H1,
    H2,
    H3,
    #[default]
    P,
    Div,
    Li,
    Ul,
    Ol,
}

impl BlockTag {
    pub const ALL: [Self; 8] = [
        Self::H1,
        Self::H2,
        Self::H3,
        Self::P,
        Self::Div,
        Self::Li,
        Self::Ul,
        Self::Ol,
    ];

    pub fn from_tag(tag: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|block| block.as_str() == tag)
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::H1 => "h1",
            Self::H2 => "h2",
            Self::H3 => "h3",
            Self::P => "p",
            Self::Div => "div",
            Self::Li => "li",
            Self::Ul => "ul",
            Self::Ol => "ol",
        }
    }
}

impl fmt::Display for BlockTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BlockTag {
    type Err = ParseVocabError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_tag(&s.to_ascii_lowercase()).ok_or_else(|| ParseVocabError::new("block", s))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Alignment {
    Left,
    Center,
    Right,
}

impl Alignment {
    pub const ALL: [Self; 3] = [Self::Left, Self::Center, Self::Right];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Left => "left",
            Self::Center => "center",
            Self::Right => "right",
        }
    }

    /// The marker class, mutually exclusive with the other alignments.
    pub const fn class(self) -> &'static str {
        match self {
            Self::Left => "text-left",
            Self::Center => "text-center",
            Self::Right => "text-right",
        }
    }
}

impl fmt::Display for Alignment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Alignment {
    type Err = ParseVocabError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|a| a.as_str() == lower)
            .ok_or_else(|| ParseVocabError::new("alignment", s))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ListKind {
    Bullet,
    Numbered,
}

impl ListKind {
    pub const fn tag(self) -> &'static str {
        match self {
            Self::Bullet => "ul",
            Self::Numbered => "ol",
        }
    }

    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "ul" => Some(Self::Bullet),
            "ol" => Some(Self::Numbered),
            _ => None,
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Bullet => "bullet",
            Self::Numbered => "numbered",
        }
    }
}

impl fmt::Display for ListKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ListKind {
    type Err = ParseVocabError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "bullet" | "ul" => Ok(Self::Bullet),
            "numbered" | "ol" => Ok(Self::Numbered),
            _ => Err(ParseVocabError::new("list kind", s)),
        }
    }
}

/// Font size menu entries. The discriminant is the size index token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FontSize {
    Small = 1,
    Normal = 3,
    Large = 5,
    Huge = 7,
}

impl FontSize {
    pub const MENU: [Self; 4] = [Self::Small, Self::Normal, Self::Large, Self::Huge];

    pub const fn index(self) -> u8 {
        self as u8
    }

    /// Pixel size: `index * 4 + 12`.
    pub const fn pixels(self) -> u32 {
        self.index() as u32 * 4 + 12
    }

    pub fn from_index(index: u8) -> Option<Self> {
        Self::MENU.into_iter().find(|size| size.index() == index)
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Small => "small",
            Self::Normal => "normal",
            Self::Large => "large",
            Self::Huge => "huge",
        }
    }
}

impl fmt::Display for FontSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.index())
    }
}

impl FromStr for FontSize {
    type Err = ParseVocabError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.to_ascii_lowercase();
        lower
            .parse::<u8>()
            .ok()
            .and_then(Self::from_index)
            .or_else(|| Self::MENU.into_iter().find(|size| size.as_str() == lower))
            .ok_or_else(|| ParseVocabError::new("font size", s))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_font_size_pixels() {
        assert_eq!(FontSize::Small.pixels(), 16);
        assert_eq!(FontSize::Normal.pixels(), 24);
        assert_eq!(FontSize::Large.pixels(), 32);
        assert_eq!(FontSize::Huge.pixels(), 40);
    }

    #[test]
    fn test_font_size_parses_index_or_name() {
        assert_eq!("7".parse::<FontSize>(), Ok(FontSize::Huge));
        assert_eq!("Large".parse::<FontSize>(), Ok(FontSize::Large));
        assert!("4".parse::<FontSize>().is_err());
    }

    #[test]
    fn test_block_tag_round_trip() {
        for block in BlockTag::ALL {
            assert_eq!(block.to_string().parse::<BlockTag>(), Ok(block));
        }
        assert_eq!(BlockTag::from_tag("span"), None);
    }

    #[test]
    fn test_block_tag_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&BlockTag::H2).unwrap(), "\"h2\"");
    }

    #[test]
    fn test_bold_matches_keyword_or_numeric_weight() {
        let decls = |v: &str| vec![("font-weight".to_owned(), v.to_owned())];
        assert!(InlineStyle::Bold.matches_declarations(&decls("bold")));
        assert!(InlineStyle::Bold.matches_declarations(&decls("700")));
        assert!(!InlineStyle::Bold.matches_declarations(&decls("400")));
    }

    #[test]
    fn test_decoration_matches_any_listed_line() {
        let decls = vec![(
            "text-decoration".to_owned(),
            "underline line-through".to_owned(),
        )];
        assert!(InlineStyle::Underline.matches_declarations(&decls));
        assert!(InlineStyle::Strikethrough.matches_declarations(&decls));
        assert!(!InlineStyle::Italic.matches_declarations(&decls));
    }

    #[test]
    fn test_list_kind_from_tag() {
        assert_eq!(ListKind::from_tag("ol"), Some(ListKind::Numbered));
        assert_eq!(ListKind::Bullet.tag(), "ul");
        assert_eq!(ListKind::from_tag("li"), None);
    }

    #[test]
    fn test_alignment_parse_error_names_value() {
        let err = "justify".parse::<Alignment>().unwrap_err();
        assert_eq!(err.to_string(), "unknown alignment `justify`");
    }
}

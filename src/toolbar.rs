//! Toolbar command vocabulary.
//!
//! Commands print and parse as the short words used by interaction scripts
//! and key bindings: `bold`, `block h1`, `size 5`, `align center`,
//! `list bullet`, `link`, `unlink`, `undo`, `redo`.

use std::fmt;
use std::str::FromStr;

use crate::format::{Alignment, BlockTag, FontSize, InlineStyle, ListKind, ParseVocabError};
use crate::inspector::FormattingState;

/// One toolbar action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ToolbarCommand {
    Bold,
    Italic,
    Underline,
    Strikethrough,
    Block(BlockTag),
    FontSize(FontSize),
    Align(Alignment),
    List(ListKind),
    InsertLink,
    RemoveLink,
    Undo,
    Redo,
}

impl ToolbarCommand {
    pub const fn inline_style(self) -> Option<InlineStyle> {
        match self {
            Self::Bold => Some(InlineStyle::Bold),
            Self::Italic => Some(InlineStyle::Italic),
            Self::Underline => Some(InlineStyle::Underline),
            Self::Strikethrough => Some(InlineStyle::Strikethrough),
            _ => None,
        }
    }

    /// Whether the command's button shows as pressed for `state`.
    pub fn is_active(self, state: &FormattingState) -> bool {
        match self {
            Self::Block(tag) => state.current_block == tag,
            other => other
                .inline_style()
                .is_some_and(|style| state.is_active(style)),
        }
    }

    /// Whether running the command can change the document.
    pub const fn mutates(self) -> bool {
        !matches!(self, Self::Undo | Self::Redo)
    }
}

impl fmt::Display for ToolbarCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bold => f.write_str("bold"),
            Self::Italic => f.write_str("italic"),
            Self::Underline => f.write_str("underline"),
            Self::Strikethrough => f.write_str("strikethrough"),
            Self::Block(tag) => write!(f, "block {tag}"),
            Self::FontSize(size) => write!(f, "size {size}"),
            Self::Align(alignment) => write!(f, "align {alignment}"),
            Self::List(kind) => write!(f, "list {kind}"),
            Self::InsertLink => f.write_str("link"),
            Self::RemoveLink => f.write_str("unlink"),
            Self::Undo => f.write_str("undo"),
            Self::Redo => f.write_str("redo"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseCommandError {
    #[error("unknown command `{0}`")]
    Unknown(String),
    #[error("`{0}` needs an argument")]
    MissingArgument(&'static str),
    #[error("`{0}` takes no argument")]
    UnexpectedArgument(String),
    #[error(transparent)]
    Vocab(#[from] ParseVocabError),
}

impl FromStr for ToolbarCommand {
    type Err = ParseCommandError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut words = s.split_whitespace();
        let name = words
            .next()
            .ok_or_else(|| ParseCommandError::Unknown(String::new()))?
            .to_ascii_lowercase();
        let arg = words.next();
        if words.next().is_some() {
            return Err(ParseCommandError::UnexpectedArgument(s.trim().to_owned()));
        }

        let with_arg = |label: &'static str| arg.ok_or(ParseCommandError::MissingArgument(label));
        let command = match name.as_str() {
            "block" => return Ok(Self::Block(with_arg("block")?.parse()?)),
            "size" => return Ok(Self::FontSize(with_arg("size")?.parse()?)),
            "align" => return Ok(Self::Align(with_arg("align")?.parse()?)),
            "list" => return Ok(Self::List(with_arg("list")?.parse()?)),
            "bold" => Self::Bold,
            "italic" => Self::Italic,
            "underline" => Self::Underline,
            "strike" | "strikethrough" => Self::Strikethrough,
            "link" => Self::InsertLink,
            "unlink" => Self::RemoveLink,
            "undo" => Self::Undo,
            "redo" => Self::Redo,
            _ => return Err(ParseCommandError::Unknown(name)),
        };
        match arg {
            Some(_) => Err(ParseCommandError::UnexpectedArgument(s.trim().to_owned())),
            None => Ok(command),
        }
    }
}

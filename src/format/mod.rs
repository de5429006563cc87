//! Formatting mutations.
//!
//! Every operation reads the selection from the host when it runs, mutates
//! the document in place and leaves the host with a selection that points
//! at live nodes. Failures are recoverable: an `Err` means the document was
//! left as it was.

mod block;
mod inline;
mod link;
mod list;
mod paste;
mod types;

pub use block::{set_alignment, set_block_type};
pub use inline::{set_font_size, toggle_inline_style};
pub use link::{URL_PROMPT, SELECT_TEXT_FIRST, insert_link, normalize_url, remove_link};
pub use list::toggle_list;
pub use paste::paste_plain_text;
pub use types::{Alignment, BlockTag, FontSize, InlineStyle, ListKind, ParseVocabError};

use crate::dom::{Document, DomError, NodeId, Range};
use crate::host::Host;
use crate::toolbar::ToolbarCommand;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EditError {
    #[error("no active selection")]
    NoSelection,
    #[error("the selection is collapsed")]
    CollapsedSelection,
    #[error("no text selected for the link")]
    EmptyLinkText,
    #[error("no URL entered")]
    EmptyUrl,
    #[error("no block container at the selection")]
    NoBlockContainer,
    #[error(transparent)]
    Dom(#[from] DomError),
}

/// Run one toolbar command against the document.
pub fn apply(
    doc: &mut Document,
    host: &mut dyn Host,
    command: ToolbarCommand,
) -> Result<(), EditError> {
    match command {
        ToolbarCommand::Bold => toggle_inline_style(doc, host, InlineStyle::Bold),
        ToolbarCommand::Italic => toggle_inline_style(doc, host, InlineStyle::Italic),
        ToolbarCommand::Underline => toggle_inline_style(doc, host, InlineStyle::Underline),
        ToolbarCommand::Strikethrough => {
            toggle_inline_style(doc, host, InlineStyle::Strikethrough)
        }
        ToolbarCommand::Block(tag) => set_block_type(doc, host, tag),
        ToolbarCommand::FontSize(size) => set_font_size(doc, host, size),
        ToolbarCommand::Align(alignment) => set_alignment(doc, host, alignment),
        ToolbarCommand::List(kind) => toggle_list(doc, host, kind),
        ToolbarCommand::InsertLink => insert_link(doc, host),
        ToolbarCommand::RemoveLink => remove_link(doc, host),
        ToolbarCommand::Undo => {
            host.request_undo();
            Ok(())
        }
        ToolbarCommand::Redo => {
            host.request_redo();
            Ok(())
        }
    }
}

/// The host selection, provided it still points into the document.
fn current_range(doc: &Document, host: &dyn Host) -> Result<Range, EditError> {
    host.selection()
        .filter(|range| range.is_live(doc))
        .ok_or(EditError::NoSelection)
}

/// Wrap the range in `wrapper` and select the wrapper's contents.
fn wrap_range(
    doc: &mut Document,
    host: &mut dyn Host,
    range: &mut Range,
    wrapper: NodeId,
) -> Result<(), EditError> {
    range.surround_contents(doc, wrapper)?;
    host.set_selection(Some(Range::select_node_contents(doc, wrapper)));
    Ok(())
}

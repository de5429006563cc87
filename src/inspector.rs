//! Selection inspection.
//!
//! Maps a selection to the formatting active at it. Everything here is a
//! pure read of the document; nothing is cached between calls.

use serde::Serialize;

use crate::dom::style::{computed_style, parse_declarations};
use crate::dom::{Document, NodeId, Range};
use crate::format::{BlockTag, InlineStyle};

/// Formatting active at the current selection, as shown by the toolbar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FormattingState {
    pub is_bold: bool,
    pub is_italic: bool,
    pub is_underline: bool,
    pub is_strikethrough: bool,
    pub current_block: BlockTag,
}

impl FormattingState {
    pub const fn is_active(&self, style: InlineStyle) -> bool {
        match style {
            InlineStyle::Bold => self.is_bold,
            InlineStyle::Italic => self.is_italic,
            InlineStyle::Underline => self.is_underline,
            InlineStyle::Strikethrough => self.is_strikethrough,
        }
    }

    fn set(&mut self, style: InlineStyle, active: bool) {
        match style {
            InlineStyle::Bold => self.is_bold = active,
            InlineStyle::Italic => self.is_italic = active,
            InlineStyle::Underline => self.is_underline = active,
            InlineStyle::Strikethrough => self.is_strikethrough = active,
        }
    }
}

/// Derive the formatting state for a selection.
///
/// A style counts as active when an ancestor of the anchor has one of its
/// tags, or when the style is declared inline. For a collapsed selection the
/// anchor's computed style is checked; for a span, any element inside the
/// span declaring the style is enough, so a partly bold span reports bold.
pub fn inspect(doc: &Document, selection: Option<&Range>) -> FormattingState {
    let Some(range) = selection else {
        return FormattingState::default();
    };
    let anchor = anchor_element(doc, range);

    let computed = range.is_collapsed().then(|| computed_style(doc, anchor));
    let declared: Vec<Vec<(String, String)>> = if range.is_collapsed() {
        Vec::new()
    } else {
        range
            .clone_contents(doc)
            .map(|scratch| {
                scratch
                    .descendants(scratch.root())
                    .filter_map(|n| scratch.element(n)?.attr("style"))
                    .map(parse_declarations)
                    .collect()
            })
            .unwrap_or_default()
    };

    let mut state = FormattingState {
        current_block: block_ancestor(doc, anchor)
            .and_then(|n| doc.tag(n))
            .and_then(BlockTag::from_tag)
            .unwrap_or_default(),
        ..FormattingState::default()
    };
    for style in InlineStyle::ALL {
        let by_tag = has_tag_ancestor(doc, anchor, style);
        let by_style = computed.as_ref().map_or_else(
            || declared.iter().any(|decls| style.matches_declarations(decls)),
            |c| style.matches_computed(c),
        );
        state.set(style, by_tag || by_style);
    }
    state
}

/// The element formatting is read from.
///
/// A caret in a text node resolves to the text's parent; a span resolves to
/// its common ancestor, or that ancestor's parent when it is a text node.
pub fn anchor_element(doc: &Document, range: &Range) -> NodeId {
    let node = if range.is_collapsed() {
        range.start().node
    } else {
        range.common_ancestor(doc)
    };
    if doc.is_element(node) {
        node
    } else {
        doc.parent(node).unwrap_or_else(|| doc.root())
    }
}

/// Nearest inclusive ancestor with a block tag, stopping below the root.
pub(crate) fn block_ancestor(doc: &Document, node: NodeId) -> Option<NodeId> {
    doc.ancestors(node)
        .take_while(|n| *n != doc.root())
        .find(|n| doc.tag(*n).and_then(BlockTag::from_tag).is_some())
}

fn has_tag_ancestor(doc: &Document, anchor: NodeId, style: InlineStyle) -> bool {
    doc.ancestors(anchor)
        .filter_map(|n| doc.tag(n))
        .any(|tag| style.tags().contains(&tag))
}

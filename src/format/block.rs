use super::{Alignment, BlockTag, EditError, current_range, wrap_range};
use crate::dom::{Document, Range};
use crate::host::Host;
use crate::inspector::{anchor_element, block_ancestor};

/// Turn the block around the selection into `tag`.
///
/// The block element is substituted, not retagged: a fresh element takes
/// over the children and the old element's attributes are dropped. The
/// selection collapses to the start of the new block. Outside any block the
/// selected range is wrapped instead.
pub fn set_block_type(
    doc: &mut Document,
    host: &mut dyn Host,
    tag: BlockTag,
) -> Result<(), EditError> {
    let mut range = current_range(doc, host)?;
    let anchor = anchor_element(doc, &range);
    let replacement = doc.create_element(tag.as_str());

    let Some(block) = block_ancestor(doc, anchor) else {
        return wrap_range(doc, host, &mut range, replacement);
    };
    doc.move_children(block, replacement)?;
    doc.replace(block, replacement)?;
    host.set_selection(Some(Range::collapsed(doc, replacement, 0)?));
    Ok(())
}

/// Align the block containing the start of the selection.
pub fn set_alignment(
    doc: &mut Document,
    host: &mut dyn Host,
    alignment: Alignment,
) -> Result<(), EditError> {
    let range = current_range(doc, host)?;
    let start = range.start().node;
    let element = if doc.is_element(start) {
        start
    } else {
        doc.parent(start).ok_or(EditError::NoBlockContainer)?
    };
    let container = block_ancestor(doc, element)
        .or_else(|| (element != doc.root()).then_some(element))
        .ok_or(EditError::NoBlockContainer)?;

    let el = doc
        .element_mut(container)
        .ok_or(EditError::NoBlockContainer)?;
    for other in Alignment::ALL {
        el.remove_class(other.class());
    }
    el.add_class(alignment.class());
    el.set_style_property("text-align", alignment.as_str());
    Ok(())
}

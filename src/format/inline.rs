use super::{EditError, FontSize, InlineStyle, current_range, wrap_range};
use crate::dom::{Document, ElementData, NodeKind};
use crate::host::Host;

/// Wrap the selection in the style's canonical element.
///
/// There is no toggle-off: applying a style to text that already has it
/// nests another wrapper.
pub fn toggle_inline_style(
    doc: &mut Document,
    host: &mut dyn Host,
    style: InlineStyle,
) -> Result<(), EditError> {
    let mut range = current_range(doc, host)?;
    if range.is_collapsed() {
        return Err(EditError::CollapsedSelection);
    }
    let (property, value) = style.declaration();
    let wrapper = doc.create_node(NodeKind::Element(
        ElementData::new(style.canonical_tag()).with_style(property, value),
    ));
    wrap_range(doc, host, &mut range, wrapper)
}

/// Wrap the selection in a span with an explicit pixel font size.
pub fn set_font_size(
    doc: &mut Document,
    host: &mut dyn Host,
    size: FontSize,
) -> Result<(), EditError> {
    let mut range = current_range(doc, host)?;
    if range.is_collapsed() {
        return Err(EditError::CollapsedSelection);
    }
    let wrapper = doc.create_node(NodeKind::Element(
        ElementData::new("span").with_style("font-size", &format!("{}px", size.pixels())),
    ));
    wrap_range(doc, host, &mut range, wrapper)
}

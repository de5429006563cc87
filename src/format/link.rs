use super::{EditError, current_range, wrap_range};
use crate::dom::{Boundary, Document, DomError, ElementData, NodeKind, Range};
use crate::host::Host;
use crate::inspector::anchor_element;

pub const SELECT_TEXT_FIRST: &str = "Please select text first";
pub const URL_PROMPT: &str = "Enter URL:";

/// Turn the selected text into a link that opens in a new tab.
///
/// The user is alerted when nothing but whitespace is selected. A dismissed
/// or blank URL prompt aborts without touching the document.
pub fn insert_link(doc: &mut Document, host: &mut dyn Host) -> Result<(), EditError> {
    let saved = current_range(doc, host)?;
    if saved.is_collapsed() || saved.to_text(doc).trim().is_empty() {
        host.alert(SELECT_TEXT_FIRST);
        return Err(EditError::EmptyLinkText);
    }

    let url = host
        .prompt(URL_PROMPT, "")
        .map(|url| url.trim().to_owned())
        .filter(|url| !url.is_empty())
        .ok_or(EditError::EmptyUrl)?;

    // The prompt steals focus; put the selection back before wrapping.
    host.set_selection(Some(saved));
    let mut range = saved;
    let link = doc.create_node(NodeKind::Element(
        ElementData::new("a")
            .with_attr("href", &normalize_url(&url))
            .with_attr("target", "_blank")
            .with_attr("rel", "noopener noreferrer"),
    ));
    wrap_range(doc, host, &mut range, link)
}

/// Prefix `https://` unless the URL already names an http scheme.
pub fn normalize_url(url: &str) -> String {
    if url.starts_with("http") {
        url.to_owned()
    } else {
        format!("https://{url}")
    }
}

/// Unwrap the nearest link around the selection, keeping its content.
pub fn remove_link(doc: &mut Document, host: &mut dyn Host) -> Result<(), EditError> {
    let range = current_range(doc, host)?;
    let anchor = anchor_element(doc, &range);
    let Some(link) = doc.ancestors(anchor).find(|n| doc.tag(*n) == Some("a")) else {
        return Ok(());
    };
    let parent = doc
        .parent(link)
        .ok_or_else(|| DomError::Hierarchy("link has no parent".into()))?;
    let index = doc.index_in_parent(link);
    let moved = doc.child_count(link);
    doc.unwrap(link)?;

    let remap = |b: Boundary| {
        if b.node == link {
            Boundary::new(parent, index + b.offset)
        } else if b.node == parent && b.offset > index {
            Boundary::new(parent, b.offset + moved - 1)
        } else {
            b
        }
    };
    let restored = Range::new(doc, remap(range.start()), remap(range.end()))?;
    host.set_selection(Some(restored));
    Ok(())
}

use super::{EditError, ListKind, current_range};
use crate::dom::{Document, DomError, NodeId, Range};
use crate::host::Host;
use crate::inspector::anchor_element;

/// Toggle a list of `kind` at the selection.
///
/// - Inside an item of the same kind of list, the item is demoted to a
///   paragraph. The list keeps its other items, even if that leaves it empty.
/// - Inside an item of another kind of list, the list is rebuilt as `kind`
///   with its items followed by a copy of the current item.
/// - Outside any list item, a new single-item list is inserted at the
///   selection, holding the selected content.
pub fn toggle_list(doc: &mut Document, host: &mut dyn Host, kind: ListKind) -> Result<(), EditError> {
    let range = current_range(doc, host)?;
    let anchor = anchor_element(doc, &range);
    let root = doc.root();
    let item = doc
        .ancestors(anchor)
        .take_while(|n| *n != root)
        .find(|n| doc.tag(*n) == Some("li"));

    let Some(item) = item else {
        return insert_list(doc, host, range, kind);
    };
    let list = doc
        .parent(item)
        .ok_or_else(|| DomError::Hierarchy("list item has no parent".into()))?;
    if doc.tag(list).and_then(ListKind::from_tag) == Some(kind) {
        demote_item(doc, host, item)
    } else {
        convert_list(doc, host, list, item, kind)
    }
}

fn demote_item(doc: &mut Document, host: &mut dyn Host, item: NodeId) -> Result<(), EditError> {
    let paragraph = doc.create_element("p");
    doc.move_children(item, paragraph)?;
    doc.replace(item, paragraph)?;
    host.set_selection(Some(Range::collapsed(doc, paragraph, 0)?));
    Ok(())
}

fn convert_list(
    doc: &mut Document,
    host: &mut dyn Host,
    list: NodeId,
    item: NodeId,
    kind: ListKind,
) -> Result<(), EditError> {
    let converted = doc.create_element(kind.tag());
    let items: Vec<NodeId> = doc.children(list).collect();
    for old in items {
        let copy = doc.deep_clone(old);
        doc.append(converted, copy)?;
    }

    let duplicate = doc.create_element("li");
    let content: Vec<NodeId> = doc.children(item).collect();
    for child in content {
        let copy = doc.deep_clone(child);
        doc.append(duplicate, copy)?;
    }
    doc.append(converted, duplicate)?;
    doc.replace(list, converted)?;

    let end = doc.child_count(duplicate);
    host.set_selection(Some(Range::collapsed(doc, duplicate, end)?));
    Ok(())
}

fn insert_list(
    doc: &mut Document,
    host: &mut dyn Host,
    mut range: Range,
    kind: ListKind,
) -> Result<(), EditError> {
    let list = doc.create_element(kind.tag());
    let item = doc.create_element("li");
    doc.append(list, item)?;
    if !range.is_collapsed() {
        let fragment = range.extract_contents(doc)?;
        doc.move_children(fragment, item)?;
    }
    range.insert_node(doc, list)?;

    let end = doc.child_count(item);
    host.set_selection(Some(Range::collapsed(doc, item, end)?));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::format::BlockTag;
    use crate::format::tests::select_text;
    use crate::host::HeadlessHost;
    use crate::inspector::inspect;

    #[test]
    fn test_same_kind_demotes_item_to_paragraph() {
        let mut doc = Document::parse_fragment("<ul><li>one</li><li>two</li></ul>");
        let mut host = HeadlessHost::new();
        select_text(&doc, &mut host, &[0, 1, 0], 1, 1);
        toggle_list(&mut doc, &mut host, ListKind::Bullet).unwrap();
        assert_eq!(doc.to_html(), "<ul><li>one</li><p>two</p></ul>");
        let selection = host.selection().unwrap();
        assert_eq!(inspect(&doc, Some(&selection)).current_block, BlockTag::P);
    }

    #[test]
    fn test_demoting_only_item_leaves_list_behind() {
        let mut doc = Document::parse_fragment("<ol><li>solo</li></ol>");
        let mut host = HeadlessHost::new();
        select_text(&doc, &mut host, &[0, 0, 0], 0, 4);
        toggle_list(&mut doc, &mut host, ListKind::Numbered).unwrap();
        assert_eq!(doc.to_html(), "<ol><p>solo</p></ol>");
    }

    #[test]
    fn test_other_kind_rebuilds_list_with_duplicate_item() {
        let mut doc = Document::parse_fragment("<ul><li>one</li><li>two</li></ul>");
        let mut host = HeadlessHost::new();
        select_text(&doc, &mut host, &[0, 0, 0], 0, 3);
        toggle_list(&mut doc, &mut host, ListKind::Numbered).unwrap();
        assert_eq!(
            doc.to_html(),
            "<ol><li>one</li><li>two</li><li>one</li></ol>"
        );
        let selection = host.selection().unwrap();
        assert!(selection.is_collapsed());
        assert_eq!(doc.path_of(selection.start().node), vec![0, 2]);
    }

    #[test]
    fn test_collapsed_selection_inserts_empty_item() {
        let mut doc = Document::parse_fragment("<p>Hello</p>");
        let mut host = HeadlessHost::new();
        let root = doc.root();
        host.set_selection(Some(Range::collapsed(&doc, root, 1).unwrap()));
        toggle_list(&mut doc, &mut host, ListKind::Bullet).unwrap();
        assert_eq!(doc.to_html(), "<p>Hello</p><ul><li></li></ul>");
        let selection = host.selection().unwrap();
        assert_eq!(inspect(&doc, Some(&selection)).current_block, BlockTag::Li);
    }

    #[test]
    fn test_selection_moves_into_new_item() {
        let mut doc = Document::parse_fragment("<div>make a list</div>");
        let mut host = HeadlessHost::new();
        select_text(&doc, &mut host, &[0, 0], 5, 11);
        toggle_list(&mut doc, &mut host, ListKind::Numbered).unwrap();
        assert_eq!(doc.to_html(), "<div>make <ol><li>a list</li></ol></div>");
        let selection = host.selection().unwrap();
        let item = doc.node_at_path(&[0, 1, 0]).unwrap();
        assert_eq!(selection, Range::collapsed(&doc, item, 1).unwrap());
    }
}

use super::{EditError, current_range};
use crate::dom::{Document, Range};
use crate::host::Host;

/// Replace the selection with the clipboard's plain text.
///
/// The payload always lands as a single text node, so markup in the
/// clipboard shows up literally. The caret ends up right after it.
pub fn paste_plain_text(doc: &mut Document, host: &mut dyn Host) -> Result<(), EditError> {
    let mut range = current_range(doc, host)?;
    let text = host.clipboard_text();
    if text.is_empty() {
        return Ok(());
    }
    range.delete_contents(doc)?;
    let node = doc.create_text(&text);
    range.insert_node(doc, node)?;
    host.set_selection(Some(Range::after_node(doc, node)?));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::format::tests::select_text;
    use crate::host::HeadlessHost;

    #[test]
    fn test_markup_in_clipboard_is_pasted_literally() {
        let mut doc = Document::parse_fragment("<p>say old things</p>");
        let mut host = HeadlessHost::new();
        host.set_clipboard("<b>x</b>");
        select_text(&doc, &mut host, &[0, 0], 4, 7);
        paste_plain_text(&mut doc, &mut host).unwrap();

        let p = doc.node_at_path(&[0]).unwrap();
        assert_eq!(doc.text_content(p), "say <b>x</b> things");
        assert!(doc.descendants(p).all(|n| doc.tag(n) != Some("b")));
        assert_eq!(doc.to_html(), "<p>say &lt;b&gt;x&lt;/b&gt; things</p>");
    }

    #[test]
    fn test_caret_lands_after_pasted_text() {
        let mut doc = Document::parse_fragment("<p>ac</p>");
        let mut host = HeadlessHost::new();
        host.set_clipboard("b");
        select_text(&doc, &mut host, &[0, 0], 1, 1);
        paste_plain_text(&mut doc, &mut host).unwrap();

        let p = doc.node_at_path(&[0]).unwrap();
        assert_eq!(doc.text_content(p), "abc");
        let selection = host.selection().unwrap();
        assert!(selection.is_collapsed());
        assert_eq!(selection.start().node, p);
        assert_eq!(selection.start().offset, 2);
    }

    #[test]
    fn test_empty_clipboard_is_no_op() {
        let mut doc = Document::parse_fragment("<p>keep me</p>");
        let mut host = HeadlessHost::new();
        select_text(&doc, &mut host, &[0, 0], 0, 4);
        paste_plain_text(&mut doc, &mut host).unwrap();
        assert_eq!(doc.to_html(), "<p>keep me</p>");
    }
}

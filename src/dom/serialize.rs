//! Serializing the tree back to HTML.

use super::{Document, NodeId, NodeKind};

const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "source", "track",
    "wbr",
];

const RAW_TEXT_ELEMENTS: &[&str] = &["script", "style"];

impl Document {
    /// Inner HTML of the root container: the editor's content value.
    pub fn to_html(&self) -> String {
        self.inner_html(self.root())
    }

    pub fn inner_html(&self, id: NodeId) -> String {
        let mut out = String::new();
        let raw = self.tag(id).is_some_and(|t| RAW_TEXT_ELEMENTS.contains(&t));
        for child in self.children(id) {
            self.write_node(child, raw, &mut out);
        }
        out
    }

    pub fn outer_html(&self, id: NodeId) -> String {
        let mut out = String::new();
        self.write_node(id, false, &mut out);
        out
    }

    fn write_node(&self, id: NodeId, raw_text: bool, out: &mut String) {
        match self.kind(id) {
            NodeKind::Text(text) if raw_text => out.push_str(text),
            NodeKind::Text(text) => escape_text(text, out),
            NodeKind::Comment(text) => {
                out.push_str("<!--");
                out.push_str(text);
                out.push_str("-->");
            }
            NodeKind::Fragment => out.push_str(&self.inner_html(id)),
            NodeKind::Element(el) => {
                out.push('<');
                out.push_str(el.tag());
                for (name, value) in el.attrs() {
                    out.push(' ');
                    out.push_str(name);
                    out.push_str("=\"");
                    escape_attr(value, out);
                    out.push('"');
                }
                out.push('>');
                if VOID_ELEMENTS.contains(&el.tag()) {
                    return;
                }
                out.push_str(&self.inner_html(id));
                out.push_str("</");
                out.push_str(el.tag());
                out.push('>');
            }
        }
    }
}

fn escape_text(text: &str, out: &mut String) {
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '\u{a0}' => out.push_str("&nbsp;"),
            _ => out.push(c),
        }
    }
}

fn escape_attr(value: &str, out: &mut String) {
    for c in value.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '"' => out.push_str("&quot;"),
            '\u{a0}' => out.push_str("&nbsp;"),
            _ => out.push(c),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_trips_simple_markup() {
        let html = "<p>Hello <strong>world</strong></p><ul><li>one</li></ul>";
        assert_eq!(Document::parse_fragment(html).to_html(), html);
    }

    #[test]
    fn test_escapes_markup_in_text() {
        let mut doc = Document::new();
        let text = doc.create_text("<b>x</b> & y");
        doc.append(doc.root(), text).unwrap();
        assert_eq!(doc.to_html(), "&lt;b&gt;x&lt;/b&gt; &amp; y");
    }

    #[test]
    fn test_escapes_quotes_in_attributes() {
        let mut doc = Document::new();
        let link = doc.create_element("a");
        doc.element_mut(link)
            .unwrap()
            .set_attr("href", "https://x.test/?a=\"1\"&b=2");
        doc.append(doc.root(), link).unwrap();
        assert_eq!(
            doc.to_html(),
            "<a href=\"https://x.test/?a=&quot;1&quot;&amp;b=2\"></a>"
        );
    }

    #[test]
    fn test_void_elements_have_no_end_tag() {
        let doc = Document::parse_fragment("<p>a<br>b</p>");
        assert_eq!(doc.to_html(), "<p>a<br>b</p>");
    }

    #[test]
    fn test_outer_html_includes_root_attributes() {
        let doc = Document::parse_fragment("<p>x</p>");
        assert_eq!(
            doc.outer_html(doc.root()),
            "<div contenteditable=\"true\"><p>x</p></div>"
        );
    }

    #[test]
    fn test_comments_survive() {
        let html = "<p>a<!-- note -->b</p>";
        assert_eq!(Document::parse_fragment(html).to_html(), html);
    }
}

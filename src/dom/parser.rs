//! Building a [`Document`] from HTML with html5ever.

use std::borrow::Cow;
use std::cell::RefCell;

use html5ever::tendril::{StrTendril, TendrilSink};
use html5ever::tree_builder::{ElemName, ElementFlags, NodeOrText, QuirksMode, TreeSink};
use html5ever::{Attribute, LocalName, QualName, parse_document};
use html5ever::{namespace_url, ns};
use indextree::{Arena, NodeId};

use super::tree::{ElementData, NodeKind, ROOT_TAG};
use super::Document;

impl Document {
    /// Parse an HTML fragment as the content of a fresh editable root.
    ///
    /// Parsing never fails; html5ever recovers from malformed markup the
    /// way a browser would.
    pub fn parse_fragment(html: &str) -> Self {
        let sink = TreeBuilderSink::new();
        parse_document(sink, Default::default()).one(StrTendril::from(html))
    }
}

#[derive(Debug, Clone)]
struct OwnedElemName(QualName);

impl ElemName for OwnedElemName {
    fn ns(&self) -> &html5ever::Namespace {
        &self.0.ns
    }

    fn local_name(&self) -> &LocalName {
        &self.0.local
    }
}

struct TreeBuilderSink {
    arena: RefCell<Arena<NodeKind>>,
    document: NodeId,
}

impl TreeBuilderSink {
    fn new() -> Self {
        let mut arena = Arena::new();
        let document = arena.new_node(NodeKind::Fragment);
        Self {
            arena: RefCell::new(arena),
            document,
        }
    }

    fn find_child(arena: &Arena<NodeKind>, parent: NodeId, tag: &str) -> Option<NodeId> {
        parent.children(arena).find(|child| {
            matches!(arena[*child].get(), NodeKind::Element(el) if el.tag() == tag)
        })
    }

    fn append_text(arena: &mut Arena<NodeKind>, parent: NodeId, text: &str) {
        if let Some(last) = parent.children(arena).last() {
            if let NodeKind::Text(existing) = arena[last].get_mut() {
                existing.push_str(text);
                return;
            }
        }
        let node = arena.new_node(NodeKind::Text(text.to_owned()));
        parent.append(node, arena);
    }
}

impl TreeSink for TreeBuilderSink {
    type Handle = NodeId;
    type Output = Document;
    type ElemName<'a>
        = OwnedElemName
    where
        Self: 'a;

    fn finish(self) -> Self::Output {
        let mut arena = self.arena.into_inner();
        let root = arena.new_node(NodeKind::Element(
            ElementData::new(ROOT_TAG).with_attr("contenteditable", "true"),
        ));

        if let Some(html) = Self::find_child(&arena, self.document, "html") {
            // Stray `<style>` or `<meta>` at the start of the fragment end
            // up in head; keep them ahead of the body content.
            let sections = ["head", "body"]
                .into_iter()
                .filter_map(|tag| Self::find_child(&arena, html, tag))
                .collect::<Vec<_>>();
            for section in sections {
                let children: Vec<NodeId> = section.children(&arena).collect();
                for child in children {
                    child.detach(&mut arena);
                    root.append(child, &mut arena);
                }
            }
        }

        let mut doc = Document::from_arena(arena, root);
        doc.prune_detached();
        doc
    }

    fn parse_error(&self, msg: Cow<'static, str>) {
        tracing::trace!(%msg, "html parse error recovered");
    }

    fn get_document(&self) -> Self::Handle {
        self.document
    }

    fn set_quirks_mode(&self, _mode: QuirksMode) {}

    fn same_node(&self, a: &Self::Handle, b: &Self::Handle) -> bool {
        a == b
    }

    fn elem_name<'a>(&'a self, target: &'a Self::Handle) -> OwnedElemName {
        let arena = self.arena.borrow();
        let tag = match arena[*target].get() {
            NodeKind::Element(el) => el.tag(),
            _ => "",
        };
        OwnedElemName(QualName::new(None, ns!(html), LocalName::from(tag)))
    }

    fn create_element(
        &self,
        name: QualName,
        attrs: Vec<Attribute>,
        _flags: ElementFlags,
    ) -> Self::Handle {
        let mut data = ElementData::new(name.local.as_ref());
        for attr in attrs {
            data.set_attr(attr.name.local.as_ref(), &attr.value);
        }
        self.arena.borrow_mut().new_node(NodeKind::Element(data))
    }

    fn create_comment(&self, text: StrTendril) -> Self::Handle {
        self.arena
            .borrow_mut()
            .new_node(NodeKind::Comment(text.to_string()))
    }

    fn create_pi(&self, _target: StrTendril, _data: StrTendril) -> Self::Handle {
        self.arena
            .borrow_mut()
            .new_node(NodeKind::Comment(String::new()))
    }

    fn append(&self, parent: &Self::Handle, child: NodeOrText<Self::Handle>) {
        let mut arena = self.arena.borrow_mut();
        match child {
            NodeOrText::AppendNode(node) => {
                node.detach(&mut arena);
                parent.append(node, &mut arena);
            }
            NodeOrText::AppendText(text) => Self::append_text(&mut arena, *parent, &text),
        }
    }

    fn append_before_sibling(&self, sibling: &Self::Handle, new_node: NodeOrText<Self::Handle>) {
        let mut arena = self.arena.borrow_mut();
        let node = match new_node {
            NodeOrText::AppendNode(node) => {
                node.detach(&mut arena);
                node
            }
            NodeOrText::AppendText(text) => arena.new_node(NodeKind::Text(text.to_string())),
        };
        sibling.insert_before(node, &mut arena);
    }

    fn append_based_on_parent_node(
        &self,
        element: &Self::Handle,
        prev_element: &Self::Handle,
        child: NodeOrText<Self::Handle>,
    ) {
        let has_parent = self.arena.borrow()[*element].parent().is_some();
        if has_parent {
            self.append_before_sibling(element, child);
        } else {
            self.append(prev_element, child);
        }
    }

    fn append_doctype_to_document(
        &self,
        _name: StrTendril,
        _public_id: StrTendril,
        _system_id: StrTendril,
    ) {
    }

    fn get_template_contents(&self, target: &Self::Handle) -> Self::Handle {
        *target
    }

    fn add_attrs_if_missing(&self, target: &Self::Handle, attrs: Vec<Attribute>) {
        let mut arena = self.arena.borrow_mut();
        if let NodeKind::Element(el) = arena[*target].get_mut() {
            for attr in attrs {
                let name = attr.name.local.as_ref();
                if el.attr(name).is_none() {
                    el.set_attr(name, &attr.value);
                }
            }
        }
    }

    fn remove_from_parent(&self, target: &Self::Handle) {
        target.detach(&mut self.arena.borrow_mut());
    }

    fn reparent_children(&self, node: &Self::Handle, new_parent: &Self::Handle) {
        let mut arena = self.arena.borrow_mut();
        let children: Vec<NodeId> = node.children(&arena).collect();
        for child in children {
            child.detach(&mut arena);
            new_parent.append(child, &mut arena);
        }
    }
}

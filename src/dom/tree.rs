//! Core document tree types.

use std::iter;

use indextree::{Arena, NodeId};

use super::DomError;
use super::style::{parse_declarations, serialize_declarations};

/// Tag of the root container owned by the editing surface.
pub const ROOT_TAG: &str = "div";

/// What lives in each arena slot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeKind {
    /// Element with tag and attributes
    Element(ElementData),
    /// Character data
    Text(String),
    /// HTML comment
    Comment(String),
    /// Detached container for extracted or cloned range contents
    Fragment,
}

/// Element tag plus attributes in source order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ElementData {
    tag: String,
    attrs: Vec<(String, String)>,
}

impl ElementData {
    /// Create an element with no attributes. Tags are stored lowercase.
    pub fn new(tag: &str) -> Self {
        Self {
            tag: tag.to_ascii_lowercase(),
            attrs: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_attr(mut self, name: &str, value: &str) -> Self {
        self.set_attr(name, value);
        self
    }

    #[must_use]
    pub fn with_style(mut self, property: &str, value: &str) -> Self {
        self.set_style_property(property, value);
        self
    }

    pub fn tag(&self) -> &str {
        &self.tag
    }

    pub fn attrs(&self) -> impl Iterator<Item = (&str, &str)> {
        self.attrs.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    /// Set an attribute, keeping its position if it already exists.
    pub fn set_attr(&mut self, name: &str, value: &str) {
        let name = name.to_ascii_lowercase();
        match self.attrs.iter_mut().find(|(k, _)| *k == name) {
            Some((_, existing)) => value.clone_into(existing),
            None => self.attrs.push((name, value.to_owned())),
        }
    }

    pub fn remove_attr(&mut self, name: &str) -> Option<String> {
        let idx = self.attrs.iter().position(|(k, _)| k == name)?;
        Some(self.attrs.remove(idx).1)
    }

    pub fn classes(&self) -> impl Iterator<Item = &str> {
        self.attr("class").unwrap_or_default().split_whitespace()
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.classes().any(|c| c == class)
    }

    pub fn add_class(&mut self, class: &str) {
        if self.has_class(class) {
            return;
        }
        let joined = self
            .classes()
            .chain(iter::once(class))
            .collect::<Vec<_>>()
            .join(" ");
        self.set_attr("class", &joined);
    }

    /// Remove a class name; drops the `class` attribute once it is empty.
    pub fn remove_class(&mut self, class: &str) {
        if !self.has_class(class) {
            return;
        }
        let remaining = self
            .classes()
            .filter(|c| *c != class)
            .collect::<Vec<_>>()
            .join(" ");
        if remaining.is_empty() {
            self.remove_attr("class");
        } else {
            self.set_attr("class", &remaining);
        }
    }

    /// Value of a declaration in the inline `style` attribute.
    pub fn style_property(&self, property: &str) -> Option<String> {
        let style = self.attr("style")?;
        parse_declarations(style)
            .into_iter()
            .find(|(name, _)| name == property)
            .map(|(_, value)| value)
    }

    pub fn set_style_property(&mut self, property: &str, value: &str) {
        let mut declarations = self
            .attr("style")
            .map(parse_declarations)
            .unwrap_or_default();
        match declarations.iter_mut().find(|(name, _)| name == property) {
            Some((_, existing)) => value.clone_into(existing),
            None => declarations.push((property.to_owned(), value.to_owned())),
        }
        self.set_attr("style", &serialize_declarations(&declarations));
    }

    pub fn remove_style_property(&mut self, property: &str) {
        let Some(style) = self.attr("style") else {
            return;
        };
        let declarations: Vec<_> = parse_declarations(style)
            .into_iter()
            .filter(|(name, _)| name != property)
            .collect();
        if declarations.is_empty() {
            self.remove_attr("style");
        } else {
            self.set_attr("style", &serialize_declarations(&declarations));
        }
    }
}

/// The document tree owned by one editing surface.
///
/// All nodes live in a single arena. Nodes detached from the root stay in
/// the arena until [`Document::prune_detached`] frees them, which the editing
/// surface does at the end of every pass.
#[derive(Debug, Clone)]
pub struct Document {
    arena: Arena<NodeKind>,
    root: NodeId,
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    /// Create an empty document with an editable root container.
    pub fn new() -> Self {
        let mut arena = Arena::new();
        let root = arena.new_node(NodeKind::Element(
            ElementData::new(ROOT_TAG).with_attr("contenteditable", "true"),
        ));
        Self { arena, root }
    }

    /// Create a scratch document whose root is a detached fragment.
    pub fn fragment() -> Self {
        let mut arena = Arena::new();
        let root = arena.new_node(NodeKind::Fragment);
        Self { arena, root }
    }

    pub(super) const fn from_arena(arena: Arena<NodeKind>, root: NodeId) -> Self {
        Self { arena, root }
    }

    pub const fn root(&self) -> NodeId {
        self.root
    }

    pub fn kind(&self, id: NodeId) -> &NodeKind {
        self.arena[id].get()
    }

    pub fn element(&self, id: NodeId) -> Option<&ElementData> {
        match self.kind(id) {
            NodeKind::Element(el) => Some(el),
            _ => None,
        }
    }

    pub fn element_mut(&mut self, id: NodeId) -> Option<&mut ElementData> {
        match self.arena[id].get_mut() {
            NodeKind::Element(el) => Some(el),
            _ => None,
        }
    }

    pub fn tag(&self, id: NodeId) -> Option<&str> {
        self.element(id).map(ElementData::tag)
    }

    pub fn text(&self, id: NodeId) -> Option<&str> {
        match self.kind(id) {
            NodeKind::Text(text) => Some(text),
            _ => None,
        }
    }

    pub fn is_text(&self, id: NodeId) -> bool {
        matches!(self.kind(id), NodeKind::Text(_))
    }

    pub fn is_element(&self, id: NodeId) -> bool {
        matches!(self.kind(id), NodeKind::Element(_))
    }

    /// Text and comment nodes: the nodes whose offsets count characters.
    pub fn is_character_data(&self, id: NodeId) -> bool {
        matches!(self.kind(id), NodeKind::Text(_) | NodeKind::Comment(_))
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.arena[id].parent()
    }

    pub fn next_sibling(&self, id: NodeId) -> Option<NodeId> {
        self.arena[id].next_sibling()
    }

    pub fn children(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        id.children(&self.arena)
    }

    pub fn child_count(&self, id: NodeId) -> usize {
        self.children(id).count()
    }

    pub fn child_at(&self, id: NodeId, index: usize) -> Option<NodeId> {
        self.children(id).nth(index)
    }

    pub fn index_in_parent(&self, id: NodeId) -> usize {
        iter::successors(self.arena[id].previous_sibling(), |n| {
            self.arena[*n].previous_sibling()
        })
        .count()
    }

    /// Node length in the DOM sense: characters for character data,
    /// children for everything else.
    pub fn node_len(&self, id: NodeId) -> usize {
        match self.kind(id) {
            NodeKind::Text(text) | NodeKind::Comment(text) => text.chars().count(),
            _ => self.child_count(id),
        }
    }

    /// The node itself followed by each of its ancestors.
    pub fn ancestors(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        iter::successors(Some(id), |n| self.parent(*n))
    }

    /// The node itself followed by its descendants in tree order.
    pub fn descendants(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        id.descendants(&self.arena)
    }

    pub fn is_inclusive_ancestor(&self, ancestor: NodeId, node: NodeId) -> bool {
        self.ancestors(node).any(|n| n == ancestor)
    }

    /// Whether the node is reachable from the root container.
    pub fn is_attached(&self, id: NodeId) -> bool {
        self.contains(id) && self.is_inclusive_ancestor(self.root, id)
    }

    /// Whether `id` still names a node of this document rather than a
    /// freed slot.
    pub fn contains(&self, id: NodeId) -> bool {
        !id.is_removed(&self.arena)
    }

    /// Nodes held by the arena, attached or not.
    pub fn allocated_nodes(&self) -> usize {
        self.arena.iter().filter(|node| !node.is_removed()).count()
    }

    /// Free every subtree that is no longer reachable from the root and
    /// return how many nodes were freed.
    ///
    /// Ids of freed nodes must not be used afterwards; [`Self::contains`]
    /// reports them as gone.
    pub fn prune_detached(&mut self) -> usize {
        let orphans: Vec<NodeId> = self
            .arena
            .iter()
            .filter(|node| !node.is_removed() && node.parent().is_none())
            .filter_map(|node| self.arena.get_node_id(node))
            .filter(|id| *id != self.root)
            .collect();
        let freed = orphans.iter().map(|id| self.descendants(*id).count()).sum();
        for id in orphans {
            id.remove_subtree(&mut self.arena);
        }
        freed
    }

    /// Child indices leading from the node's topmost ancestor to the node.
    pub fn path_of(&self, id: NodeId) -> Vec<usize> {
        let chain: Vec<NodeId> = self.ancestors(id).collect();
        chain
            .iter()
            .rev()
            .skip(1)
            .map(|n| self.index_in_parent(*n))
            .collect()
    }

    pub fn node_at_path(&self, path: &[usize]) -> Option<NodeId> {
        path.iter()
            .try_fold(self.root, |node, idx| self.child_at(node, *idx))
    }

    pub fn create_node(&mut self, kind: NodeKind) -> NodeId {
        self.arena.new_node(kind)
    }

    pub fn create_element(&mut self, tag: &str) -> NodeId {
        self.create_node(NodeKind::Element(ElementData::new(tag)))
    }

    pub fn create_text(&mut self, text: &str) -> NodeId {
        self.create_node(NodeKind::Text(text.to_owned()))
    }

    pub fn create_fragment(&mut self) -> NodeId {
        self.create_node(NodeKind::Fragment)
    }

    /// Append `child` as the last child of `parent`, detaching it first.
    pub fn append(&mut self, parent: NodeId, child: NodeId) -> Result<(), DomError> {
        self.ensure_container(parent)?;
        child.detach(&mut self.arena);
        parent.checked_append(child, &mut self.arena)?;
        Ok(())
    }

    /// Insert `node` immediately before `reference`, detaching it first.
    pub fn insert_before(&mut self, reference: NodeId, node: NodeId) -> Result<(), DomError> {
        if reference == node {
            return Ok(());
        }
        if self.parent(reference).is_none() {
            return Err(DomError::Hierarchy("reference node has no parent".into()));
        }
        node.detach(&mut self.arena);
        reference.checked_insert_before(node, &mut self.arena)?;
        Ok(())
    }

    /// Insert `node` immediately after `reference`, detaching it first.
    pub fn insert_after(&mut self, reference: NodeId, node: NodeId) -> Result<(), DomError> {
        if reference == node {
            return Ok(());
        }
        if self.parent(reference).is_none() {
            return Err(DomError::Hierarchy("reference node has no parent".into()));
        }
        node.detach(&mut self.arena);
        reference.checked_insert_after(node, &mut self.arena)?;
        Ok(())
    }

    pub fn detach(&mut self, id: NodeId) {
        id.detach(&mut self.arena);
    }

    /// Put `new` where `old` is among its siblings and detach `old`.
    pub fn replace(&mut self, old: NodeId, new: NodeId) -> Result<(), DomError> {
        if old == self.root {
            return Err(DomError::Hierarchy(
                "the root container cannot be replaced".into(),
            ));
        }
        self.insert_before(old, new)?;
        self.detach(old);
        Ok(())
    }

    /// Move every child of `from` to the end of `to`, preserving order.
    pub fn move_children(&mut self, from: NodeId, to: NodeId) -> Result<(), DomError> {
        let children: Vec<NodeId> = self.children(from).collect();
        for child in children {
            self.append(to, child)?;
        }
        Ok(())
    }

    /// Replace a node by its children.
    pub fn unwrap(&mut self, id: NodeId) -> Result<(), DomError> {
        let children: Vec<NodeId> = self.children(id).collect();
        for child in children {
            self.insert_before(id, child)?;
        }
        self.detach(id);
        Ok(())
    }

    pub fn text_content(&self, id: NodeId) -> String {
        self.descendants(id)
            .filter_map(|n| self.text(n))
            .collect()
    }

    /// Copy a node without its children.
    pub fn shallow_clone(&mut self, id: NodeId) -> NodeId {
        let kind = self.kind(id).clone();
        self.create_node(kind)
    }

    /// Copy a node and its whole subtree. The copy starts detached.
    pub fn deep_clone(&mut self, id: NodeId) -> NodeId {
        let copy = self.shallow_clone(id);
        let children: Vec<NodeId> = self.children(id).collect();
        for child in children {
            let child_copy = self.deep_clone(child);
            copy.append(child_copy, &mut self.arena);
        }
        copy
    }

    /// Copy a node from another document into this one, detached.
    pub fn import(&mut self, source: &Self, id: NodeId, deep: bool) -> NodeId {
        let copy = self.create_node(source.kind(id).clone());
        if deep {
            for child in source.children(id) {
                let child_copy = self.import(source, child, true);
                copy.append(child_copy, &mut self.arena);
            }
        }
        copy
    }

    /// Characters `start..end` of a character data node.
    pub fn text_slice(&self, id: NodeId, start: usize, end: usize) -> String {
        match self.kind(id) {
            NodeKind::Text(text) | NodeKind::Comment(text) => text
                .chars()
                .skip(start)
                .take(end.saturating_sub(start))
                .collect(),
            _ => String::new(),
        }
    }

    /// Replace characters `start..end` of a character data node.
    pub fn replace_data(
        &mut self,
        id: NodeId,
        start: usize,
        end: usize,
        replacement: &str,
    ) -> Result<(), DomError> {
        let (NodeKind::Text(text) | NodeKind::Comment(text)) = self.arena[id].get_mut() else {
            return Err(DomError::Hierarchy("not a character data node".into()));
        };
        let len = text.chars().count();
        if start > len || end > len || start > end {
            return Err(DomError::IndexSize {
                offset: start.max(end),
                len,
            });
        }
        let from = byte_index(text, start);
        let to = byte_index(text, end);
        text.replace_range(from..to, replacement);
        Ok(())
    }

    /// Split a text node at `offset`; the tail becomes the next sibling.
    pub fn split_text(&mut self, id: NodeId, offset: usize) -> Result<NodeId, DomError> {
        let tail = {
            let NodeKind::Text(text) = self.arena[id].get_mut() else {
                return Err(DomError::Hierarchy("only text nodes can be split".into()));
            };
            let len = text.chars().count();
            if offset > len {
                return Err(DomError::IndexSize { offset, len });
            }
            text.split_off(byte_index(text, offset))
        };
        let tail_node = self.create_text(&tail);
        if self.parent(id).is_some() {
            self.insert_after(id, tail_node)?;
        }
        Ok(tail_node)
    }

    fn ensure_container(&self, id: NodeId) -> Result<(), DomError> {
        if self.is_character_data(id) {
            return Err(DomError::Hierarchy(
                "character data nodes cannot have children".into(),
            ));
        }
        Ok(())
    }
}

/// Byte index of the `char_offset`-th character, clamped to the end.
pub(super) fn byte_index(text: &str, char_offset: usize) -> usize {
    text.char_indices()
        .nth(char_offset)
        .map_or(text.len(), |(idx, _)| idx)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn paragraph_doc() -> (Document, NodeId, NodeId) {
        let mut doc = Document::new();
        let p = doc.create_element("p");
        let text = doc.create_text("Hello world");
        doc.append(doc.root(), p).unwrap();
        doc.append(p, text).unwrap();
        (doc, p, text)
    }

    #[test]
    fn test_element_tags_are_lowercased() {
        let el = ElementData::new("STRONG");
        assert_eq!(el.tag(), "strong");
    }

    #[test]
    fn test_set_attr_replaces_in_place() {
        let mut el = ElementData::new("a")
            .with_attr("href", "x")
            .with_attr("target", "_blank");
        el.set_attr("href", "y");
        let attrs: Vec<_> = el.attrs().collect();
        assert_eq!(attrs, vec![("href", "y"), ("target", "_blank")]);
    }

    #[test]
    fn test_class_helpers_add_and_remove() {
        let mut el = ElementData::new("p").with_attr("class", "lead text-left");
        el.add_class("text-center");
        el.remove_class("text-left");
        assert_eq!(el.attr("class"), Some("lead text-center"));
        el.remove_class("lead");
        el.remove_class("text-center");
        assert_eq!(el.attr("class"), None);
    }

    #[test]
    fn test_add_class_is_idempotent() {
        let mut el = ElementData::new("p");
        el.add_class("text-right");
        el.add_class("text-right");
        assert_eq!(el.attr("class"), Some("text-right"));
    }

    #[test]
    fn test_style_property_round_trip() {
        let mut el = ElementData::new("span").with_style("font-size", "24px");
        el.set_style_property("text-align", "center");
        el.set_style_property("font-size", "40px");
        assert_eq!(el.style_property("font-size").as_deref(), Some("40px"));
        assert_eq!(
            el.attr("style"),
            Some("font-size: 40px; text-align: center;")
        );
        el.remove_style_property("font-size");
        el.remove_style_property("text-align");
        assert_eq!(el.attr("style"), None);
    }

    #[test]
    fn test_index_in_parent_counts_previous_siblings() {
        let mut doc = Document::new();
        let a = doc.create_element("p");
        let b = doc.create_element("p");
        let c = doc.create_element("p");
        for node in [a, b, c] {
            doc.append(doc.root(), node).unwrap();
        }
        assert_eq!(doc.index_in_parent(a), 0);
        assert_eq!(doc.index_in_parent(c), 2);
        assert_eq!(doc.child_at(doc.root(), 1), Some(b));
    }

    #[test]
    fn test_path_round_trips_through_node_at_path() {
        let (doc, p, text) = paragraph_doc();
        assert_eq!(doc.path_of(text), vec![0, 0]);
        assert_eq!(doc.node_at_path(&[0]), Some(p));
        assert_eq!(doc.node_at_path(&[0, 0]), Some(text));
        assert_eq!(doc.node_at_path(&[3]), None);
    }

    #[test]
    fn test_replace_moves_new_node_into_old_position() {
        let (mut doc, p, text) = paragraph_doc();
        let h1 = doc.create_element("h1");
        doc.move_children(p, h1).unwrap();
        doc.replace(p, h1).unwrap();
        assert!(!doc.is_attached(p));
        assert_eq!(doc.parent(text), Some(h1));
        assert_eq!(doc.child_at(doc.root(), 0), Some(h1));
    }

    #[test]
    fn test_prune_detached_frees_unreachable_subtrees() {
        let (mut doc, p, text) = paragraph_doc();
        let h1 = doc.create_element("h1");
        let stray = doc.create_text("never inserted");
        doc.move_children(p, h1).unwrap();
        doc.replace(p, h1).unwrap();
        assert_eq!(doc.allocated_nodes(), 5);

        assert_eq!(doc.prune_detached(), 2);
        assert_eq!(doc.allocated_nodes(), doc.descendants(doc.root()).count());
        assert!(!doc.contains(p));
        assert!(!doc.contains(stray));
        assert!(!doc.is_attached(p));
        assert!(doc.contains(text));
        assert_eq!(doc.to_html(), "<h1>Hello world</h1>");
    }

    #[test]
    fn test_prune_detached_keeps_attached_tree() {
        let (mut doc, _, _) = paragraph_doc();
        assert_eq!(doc.prune_detached(), 0);
        assert_eq!(doc.allocated_nodes(), 3);
    }

    #[test]
    fn test_root_cannot_be_replaced() {
        let mut doc = Document::new();
        let other = doc.create_element("div");
        let root = doc.root();
        assert!(doc.replace(root, other).is_err());
    }

    #[test]
    fn test_unwrap_keeps_children_in_place() {
        let mut doc = Document::parse_fragment("<p>a<a href=\"x\">b<b>c</b></a>d</p>");
        let p = doc.node_at_path(&[0]).unwrap();
        let link = doc.node_at_path(&[0, 1]).unwrap();
        doc.unwrap(link).unwrap();
        assert_eq!(doc.child_count(p), 4);
        assert_eq!(doc.to_html(), "<p>ab<b>c</b>d</p>");
    }

    #[test]
    fn test_split_text_inserts_tail_after() {
        let (mut doc, p, text) = paragraph_doc();
        let tail = doc.split_text(text, 5).unwrap();
        assert_eq!(doc.text(text), Some("Hello"));
        assert_eq!(doc.text(tail), Some(" world"));
        assert_eq!(doc.child_count(p), 2);
    }

    #[test]
    fn test_split_text_counts_characters_not_bytes() {
        let mut doc = Document::new();
        let text = doc.create_text("héllo");
        doc.append(doc.root(), text).unwrap();
        let tail = doc.split_text(text, 2).unwrap();
        assert_eq!(doc.text(text), Some("hé"));
        assert_eq!(doc.text(tail), Some("llo"));
    }

    #[test]
    fn test_split_text_rejects_out_of_bounds_offset() {
        let (mut doc, _, text) = paragraph_doc();
        assert_eq!(
            doc.split_text(text, 50),
            Err(DomError::IndexSize { offset: 50, len: 11 })
        );
    }

    #[test]
    fn test_text_nodes_cannot_have_children() {
        let (mut doc, _, text) = paragraph_doc();
        let child = doc.create_element("b");
        assert!(doc.append(text, child).is_err());
    }

    #[test]
    fn test_deep_clone_copies_subtree() {
        let mut doc = Document::parse_fragment("<li>one <em>two</em></li>");
        let item = doc.node_at_path(&[0]).unwrap();
        let copy = doc.deep_clone(item);
        assert_eq!(doc.parent(copy), None);
        assert_eq!(doc.text_content(copy), "one two");
        assert_eq!(doc.outer_html(copy), doc.outer_html(item));
    }

    #[test]
    fn test_text_content_concatenates_descendants() {
        let doc = Document::parse_fragment("<p>a<b>b<i>c</i></b>d</p>");
        assert_eq!(doc.text_content(doc.root()), "abcd");
    }
}

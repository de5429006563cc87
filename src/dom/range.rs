//! Ranges over the document tree.
//!
//! A [`Range`] is a pair of boundary points. Offsets inside character data
//! count characters; offsets inside any other node count children. Ranges are
//! plain values: operations that mutate the tree take the range by `&mut` and
//! leave it where the corresponding DOM operation would leave a live range.

use std::cmp::Ordering;

use super::{Document, DomError, NodeId, NodeKind};

/// A position in the tree: a node plus an offset inside it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Boundary {
    pub node: NodeId,
    pub offset: usize,
}

impl Boundary {
    pub const fn new(node: NodeId, offset: usize) -> Self {
        Self { node, offset }
    }

    /// Tree order comparison of two boundary points in the same tree.
    pub fn compare(self, doc: &Document, other: Self) -> Ordering {
        self.position_key(doc).cmp(&other.position_key(doc))
    }

    fn position_key(self, doc: &Document) -> Vec<usize> {
        let mut key = doc.path_of(self.node);
        key.push(self.offset);
        key
    }

    fn is_valid(self, doc: &Document) -> bool {
        self.offset <= doc.node_len(self.node)
    }
}

/// Two ordered boundary points.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Range {
    start: Boundary,
    end: Boundary,
}

/// How a range cuts the children of its common ancestor.
struct Partition {
    first_partial: Option<NodeId>,
    last_partial: Option<NodeId>,
    contained: Vec<NodeId>,
}

impl Range {
    /// Build a range, swapping the endpoints if `end` precedes `start`.
    pub fn new(doc: &Document, start: Boundary, end: Boundary) -> Result<Self, DomError> {
        for boundary in [start, end] {
            if !boundary.is_valid(doc) {
                return Err(DomError::IndexSize {
                    offset: boundary.offset,
                    len: doc.node_len(boundary.node),
                });
            }
        }
        if start.compare(doc, end) == Ordering::Greater {
            Ok(Self {
                start: end,
                end: start,
            })
        } else {
            Ok(Self { start, end })
        }
    }

    pub fn collapsed(doc: &Document, node: NodeId, offset: usize) -> Result<Self, DomError> {
        let at = Boundary::new(node, offset);
        Self::new(doc, at, at)
    }

    const fn collapsed_at(at: Boundary) -> Self {
        Self { start: at, end: at }
    }

    /// Range spanning exactly one node within its parent.
    pub fn select_node(doc: &Document, node: NodeId) -> Result<Self, DomError> {
        let parent = doc
            .parent(node)
            .ok_or_else(|| DomError::Hierarchy("cannot select a node without a parent".into()))?;
        let index = doc.index_in_parent(node);
        Ok(Self {
            start: Boundary::new(parent, index),
            end: Boundary::new(parent, index + 1),
        })
    }

    pub fn select_node_contents(doc: &Document, node: NodeId) -> Self {
        Self {
            start: Boundary::new(node, 0),
            end: Boundary::new(node, doc.node_len(node)),
        }
    }

    /// Collapsed range immediately after `node` in its parent.
    pub fn after_node(doc: &Document, node: NodeId) -> Result<Self, DomError> {
        let parent = doc
            .parent(node)
            .ok_or_else(|| DomError::Hierarchy("node has no parent".into()))?;
        Ok(Self::collapsed_at(Boundary::new(
            parent,
            doc.index_in_parent(node) + 1,
        )))
    }

    pub const fn start(&self) -> Boundary {
        self.start
    }

    pub const fn end(&self) -> Boundary {
        self.end
    }

    pub fn is_collapsed(&self) -> bool {
        self.start == self.end
    }

    /// Deepest node that is an inclusive ancestor of both endpoints.
    pub fn common_ancestor(&self, doc: &Document) -> NodeId {
        doc.ancestors(self.start.node)
            .find(|n| doc.is_inclusive_ancestor(*n, self.end.node))
            .unwrap_or_else(|| doc.root())
    }

    /// Whether both endpoints still point into the attached tree.
    pub fn is_live(&self, doc: &Document) -> bool {
        [self.start, self.end]
            .into_iter()
            .all(|b| doc.is_attached(b.node) && b.is_valid(doc))
            && self.start.compare(doc, self.end) != Ordering::Greater
    }

    /// Whether `node` lies entirely inside the range.
    pub fn contains_node(&self, doc: &Document, node: NodeId) -> bool {
        let same_tree = doc.ancestors(node).last() == doc.ancestors(self.start.node).last();
        same_tree
            && Boundary::new(node, 0).compare(doc, self.start) == Ordering::Greater
            && Boundary::new(node, doc.node_len(node)).compare(doc, self.end) == Ordering::Less
    }

    /// The text the range covers, in tree order.
    pub fn to_text(&self, doc: &Document) -> String {
        let (start, end) = (self.start, self.end);
        if start.node == end.node && doc.is_text(start.node) {
            return doc.text_slice(start.node, start.offset, end.offset);
        }
        let mut out = String::new();
        if doc.is_text(start.node) {
            out.push_str(&doc.text_slice(
                start.node,
                start.offset,
                doc.node_len(start.node),
            ));
        }
        for node in doc.descendants(self.common_ancestor(doc)) {
            if doc.is_text(node) && self.contains_node(doc, node) {
                out.push_str(doc.text(node).unwrap_or_default());
            }
        }
        if doc.is_text(end.node) {
            out.push_str(&doc.text_slice(end.node, 0, end.offset));
        }
        out
    }

    /// Copy the selected content into a standalone fragment document.
    ///
    /// Partially selected elements are copied shallowly with just their
    /// selected descendants. The source tree is left untouched.
    pub fn clone_contents(&self, doc: &Document) -> Result<Document, DomError> {
        let mut out = Document::fragment();
        let root = out.root();
        self.clone_into(doc, &mut out, root)?;
        Ok(out)
    }

    fn clone_into(&self, doc: &Document, out: &mut Document, parent: NodeId) -> Result<(), DomError> {
        if self.is_collapsed() {
            return Ok(());
        }
        let (start, end) = (self.start, self.end);
        if start.node == end.node && doc.is_character_data(start.node) {
            let copy = out.create_node(sliced_kind(doc, start.node, start.offset, end.offset));
            return out.append(parent, copy);
        }

        let part = self.partition(doc);
        if let Some(first) = part.first_partial {
            if doc.is_character_data(first) {
                let len = doc.node_len(first);
                let copy = out.create_node(sliced_kind(doc, first, start.offset, len));
                out.append(parent, copy)?;
            } else {
                let copy = out.import(doc, first, false);
                out.append(parent, copy)?;
                let sub = Self {
                    start,
                    end: Boundary::new(first, doc.node_len(first)),
                };
                sub.clone_into(doc, out, copy)?;
            }
        }
        for child in part.contained {
            let copy = out.import(doc, child, true);
            out.append(parent, copy)?;
        }
        if let Some(last) = part.last_partial {
            if doc.is_character_data(last) {
                let copy = out.create_node(sliced_kind(doc, last, 0, end.offset));
                out.append(parent, copy)?;
            } else {
                let copy = out.import(doc, last, false);
                out.append(parent, copy)?;
                let sub = Self {
                    start: Boundary::new(last, 0),
                    end,
                };
                sub.clone_into(doc, out, copy)?;
            }
        }
        Ok(())
    }

    /// Move the selected content out of the tree into a new fragment node.
    ///
    /// Partially selected elements stay in the tree holding their
    /// unselected content; shallow copies of them carry the selected part.
    /// The range collapses to where the content was.
    pub fn extract_contents(&mut self, doc: &mut Document) -> Result<NodeId, DomError> {
        let fragment = doc.create_fragment();
        if self.is_collapsed() {
            return Ok(fragment);
        }
        let (start, end) = (self.start, self.end);
        if start.node == end.node && doc.is_character_data(start.node) {
            let kind = sliced_kind(doc, start.node, start.offset, end.offset);
            let copy = doc.create_node(kind);
            doc.append(fragment, copy)?;
            doc.replace_data(start.node, start.offset, end.offset, "")?;
            *self = Self::collapsed_at(start);
            return Ok(fragment);
        }

        let part = self.partition(doc);
        let collapse_to = if doc.is_inclusive_ancestor(start.node, end.node) {
            start
        } else {
            let mut reference = start.node;
            while let Some(parent) = doc.parent(reference) {
                if doc.is_inclusive_ancestor(parent, end.node) {
                    break;
                }
                reference = parent;
            }
            let parent = doc
                .parent(reference)
                .ok_or_else(|| DomError::Hierarchy("range endpoints are in different trees".into()))?;
            Boundary::new(parent, doc.index_in_parent(reference) + 1)
        };

        if let Some(first) = part.first_partial {
            if doc.is_character_data(first) {
                let len = doc.node_len(first);
                let kind = sliced_kind(doc, first, start.offset, len);
                let copy = doc.create_node(kind);
                doc.append(fragment, copy)?;
                doc.replace_data(first, start.offset, len, "")?;
            } else {
                let copy = doc.shallow_clone(first);
                doc.append(fragment, copy)?;
                let mut sub = Self {
                    start,
                    end: Boundary::new(first, doc.node_len(first)),
                };
                let sub_fragment = sub.extract_contents(doc)?;
                doc.move_children(sub_fragment, copy)?;
            }
        }
        for child in part.contained {
            doc.append(fragment, child)?;
        }
        if let Some(last) = part.last_partial {
            if doc.is_character_data(last) {
                let kind = sliced_kind(doc, last, 0, end.offset);
                let copy = doc.create_node(kind);
                doc.append(fragment, copy)?;
                doc.replace_data(last, 0, end.offset, "")?;
            } else {
                let copy = doc.shallow_clone(last);
                doc.append(fragment, copy)?;
                let mut sub = Self {
                    start: Boundary::new(last, 0),
                    end,
                };
                let sub_fragment = sub.extract_contents(doc)?;
                doc.move_children(sub_fragment, copy)?;
            }
        }

        *self = Self::collapsed_at(collapse_to);
        Ok(fragment)
    }

    /// Remove the selected content and collapse the range.
    pub fn delete_contents(&mut self, doc: &mut Document) -> Result<(), DomError> {
        let fragment = self.extract_contents(doc)?;
        doc.detach(fragment);
        Ok(())
    }

    /// Insert `node` at the start of the range.
    ///
    /// A text start node is split at the start offset. Fragments insert
    /// their children. A collapsed range ends up spanning the insertion.
    pub fn insert_node(&mut self, doc: &mut Document, node: NodeId) -> Result<(), DomError> {
        let mut start = self.start;
        let mut end = self.end;
        if matches!(doc.kind(start.node), NodeKind::Comment(_))
            || (doc.is_text(start.node) && doc.parent(start.node).is_none())
            || start.node == node
        {
            return Err(DomError::Hierarchy(
                "cannot insert a node at this boundary".into(),
            ));
        }
        let was_collapsed = self.is_collapsed();

        if let Some(old_parent) = doc.parent(node) {
            let old_index = doc.index_in_parent(node);
            doc.detach(node);
            for boundary in [&mut start, &mut end] {
                if boundary.node == old_parent && boundary.offset > old_index {
                    boundary.offset -= 1;
                }
            }
        }

        let (parent, mut reference) = if doc.is_text(start.node) {
            let parent = doc
                .parent(start.node)
                .ok_or_else(|| DomError::Hierarchy("text node has no parent".into()))?;
            let index = doc.index_in_parent(start.node);
            let tail = doc.split_text(start.node, start.offset)?;
            if end.node == start.node && end.offset > start.offset {
                end = Boundary::new(tail, end.offset - start.offset);
            } else if end.node == parent && end.offset > index {
                end.offset += 1;
            }
            (parent, Some(tail))
        } else {
            (start.node, doc.child_at(start.node, start.offset))
        };
        if reference == Some(node) {
            reference = doc.next_sibling(node);
        }

        let index = reference.map_or_else(|| doc.child_count(parent), |r| doc.index_in_parent(r));
        let inserted: Vec<NodeId> = if matches!(doc.kind(node), NodeKind::Fragment) {
            doc.children(node).collect()
        } else {
            vec![node]
        };
        for child in &inserted {
            match reference {
                Some(reference) => doc.insert_before(reference, *child)?,
                None => doc.append(parent, *child)?,
            }
        }

        let count = inserted.len();
        for boundary in [&mut start, &mut end] {
            if boundary.node == parent && boundary.offset > index {
                boundary.offset += count;
            }
        }
        if was_collapsed {
            end = Boundary::new(parent, index + count);
        }
        self.start = start;
        self.end = end;
        Ok(())
    }

    /// Wrap the selected content in `new_parent` and select the wrapper.
    ///
    /// Fails with [`DomError::InvalidRange`] when the range cuts through a
    /// non-text node, since wrapping would have to split it.
    pub fn surround_contents(
        &mut self,
        doc: &mut Document,
        new_parent: NodeId,
    ) -> Result<(), DomError> {
        let common = self.common_ancestor(doc);
        let cuts_non_text = |from: NodeId, other: NodeId| {
            doc.ancestors(from)
                .take_while(|n| *n != common)
                .any(|n| !doc.is_text(n) && !doc.is_inclusive_ancestor(n, other))
        };
        if cuts_non_text(self.start.node, self.end.node)
            || cuts_non_text(self.end.node, self.start.node)
        {
            return Err(DomError::InvalidRange);
        }
        if !doc.is_element(new_parent) {
            return Err(DomError::Hierarchy("only elements can wrap content".into()));
        }

        let fragment = self.extract_contents(doc)?;
        let stale: Vec<NodeId> = doc.children(new_parent).collect();
        for child in stale {
            doc.detach(child);
        }
        self.insert_node(doc, new_parent)?;
        doc.move_children(fragment, new_parent)?;
        *self = Self::select_node(doc, new_parent)?;
        Ok(())
    }

    fn partition(&self, doc: &Document) -> Partition {
        let common = self.common_ancestor(doc);
        let child_toward = |node: NodeId| {
            doc.ancestors(node)
                .find(|n| doc.parent(*n) == Some(common))
        };
        let first_partial = if doc.is_inclusive_ancestor(self.start.node, self.end.node) {
            None
        } else {
            child_toward(self.start.node)
        };
        let last_partial = if doc.is_inclusive_ancestor(self.end.node, self.start.node) {
            None
        } else {
            child_toward(self.end.node)
        };
        let contained = doc
            .children(common)
            .filter(|child| self.contains_node(doc, *child))
            .collect();
        Partition {
            first_partial,
            last_partial,
            contained,
        }
    }
}

/// Copy of a character data node holding only characters `start..end`.
fn sliced_kind(doc: &Document, node: NodeId, start: usize, end: usize) -> NodeKind {
    let data = doc.text_slice(node, start, end);
    match doc.kind(node) {
        NodeKind::Comment(_) => NodeKind::Comment(data),
        _ => NodeKind::Text(data),
    }
}

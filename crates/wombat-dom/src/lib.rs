//! DOM tree implementation for the Wombat parser.
//!
//! This crate provides an arena-based DOM tree structure following the
//! [DOM Living Standard](https://dom.spec.whatwg.org/), and the
//! [`NodeFactory`] trait through which the tree builders create and attach
//! nodes.
//!
//! # Design
//!
//! The tree uses arena allocation with [`NodeId`] indices for all relationships,
//! providing O(1) access and traversal without borrow checker issues. Parent
//! links are plain indices resolved through the arena, so there are no
//! reference cycles.

mod dump;
mod factory;
mod namespace;

pub use factory::{NodeFactory, SourceRangeKind, TreeError};
pub use namespace::{Namespace, QuirksMode};

use wombat_common::SourceRange;

/// A type-safe index into the DOM tree.
///
/// [§ 4.4 Interface Node](https://dom.spec.whatwg.org/#interface-node)
///
/// `NodeId` provides O(1) access to any node in the tree without borrowing issues.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub usize);

impl NodeId {
    /// The root document node is always at index 0.
    pub const ROOT: Self = Self(0);
}

/// An attribute on an element: a name and a value.
///
/// Valueless attributes (`<input disabled>`) carry an empty value.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Attribute {
    /// Attribute name, possibly prefixed (`xlink:href`).
    pub name: String,
    /// Attribute value with character references already decoded.
    pub value: String,
}

impl Attribute {
    /// Create a new attribute with the given name and value.
    #[must_use]
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// [§ 4.4 Interface Node](https://dom.spec.whatwg.org/#interface-node)
///
/// A node stores indices for parent/child/sibling relationships, enabling
/// O(1) traversal in any direction.
#[derive(Debug, Clone)]
pub struct Node {
    /// "Each node has an associated node type"
    pub node_type: NodeType,

    /// [§ 4.4](https://dom.spec.whatwg.org/#concept-tree-parent)
    /// "An object that participates in a tree has a parent, which is either
    /// null or an object."
    pub parent: Option<NodeId>,

    /// [§ 4.4](https://dom.spec.whatwg.org/#concept-tree-child)
    pub children: Vec<NodeId>,

    /// [§ 4.4](https://dom.spec.whatwg.org/#concept-tree-next-sibling)
    pub next_sibling: Option<NodeId>,

    /// [§ 4.4](https://dom.spec.whatwg.org/#concept-tree-previous-sibling)
    pub prev_sibling: Option<NodeId>,

    /// Span of the start tag, when position tracking was enabled.
    pub start_range: Option<SourceRange>,

    /// Span of the end tag, when position tracking was enabled.
    /// Zero-width when the element was closed implicitly.
    pub end_range: Option<SourceRange>,
}

impl Node {
    const fn detached(node_type: NodeType) -> Self {
        Self {
            node_type,
            parent: None,
            children: Vec::new(),
            next_sibling: None,
            prev_sibling: None,
            start_range: None,
            end_range: None,
        }
    }
}

/// [§ 4.4 Interface Node](https://dom.spec.whatwg.org/#interface-node)
///
/// "Each node has an associated node type"
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeType {
    /// [§ 4.5 Interface Document](https://dom.spec.whatwg.org/#interface-document)
    Document,
    /// [§ 4.6 Interface DocumentType](https://dom.spec.whatwg.org/#interface-documenttype)
    Doctype(DoctypeData),
    /// [§ 4.9 Interface Element](https://dom.spec.whatwg.org/#interface-element)
    Element(ElementData),
    /// [§ 4.10 Interface Text](https://dom.spec.whatwg.org/#interface-text)
    Text(String),
    /// [§ 4.7 Interface Comment](https://dom.spec.whatwg.org/#interface-comment)
    Comment(String),
    /// [§ 4.12 Interface CDATASection](https://dom.spec.whatwg.org/#interface-cdatasection)
    CData(String),
    /// [§ 4.13 Interface ProcessingInstruction](https://dom.spec.whatwg.org/#interface-processinginstruction)
    ProcessingInstruction {
        /// "target"
        target: String,
        /// "data"
        data: String,
    },
}

/// "Doctypes have an associated name, public ID, and system ID."
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DoctypeData {
    /// "name"
    pub name: String,
    /// "public ID"
    pub public_id: String,
    /// "system ID"
    pub system_id: String,
}

/// Element-specific data.
///
/// Per [§ 4.9 Interface Element](https://dom.spec.whatwg.org/#interface-element):
/// "Elements have an associated namespace, namespace prefix, local name, ..."
///
/// The prefix stays part of `tag_name` for XML documents.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ElementData {
    /// "An element's local name"
    pub tag_name: String,
    /// "An element's namespace"
    pub namespace: Namespace,
    /// "An element has an associated attribute list", in source order.
    pub attrs: Vec<Attribute>,
}

impl ElementData {
    /// Create element data with no attributes.
    #[must_use]
    pub fn new(tag_name: impl Into<String>, namespace: Namespace) -> Self {
        Self {
            tag_name: tag_name.into(),
            namespace,
            attrs: Vec::new(),
        }
    }

    /// Value of the attribute called `name`, if present.
    #[must_use]
    pub fn get_attribute(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|attr| attr.name == name)
            .map(|attr| attr.value.as_str())
    }

    /// Whether an attribute called `name` is present.
    #[must_use]
    pub fn has_attribute(&self, name: &str) -> bool {
        self.attrs.iter().any(|attr| attr.name == name)
    }

    /// Whether this is the HTML element `name`.
    #[must_use]
    pub fn is_html(&self, name: &str) -> bool {
        self.namespace == Namespace::Html && self.tag_name.eq_ignore_ascii_case(name)
    }
}

/// Arena-based DOM tree with O(1) node access and traversal.
///
/// [§ 4 Nodes](https://dom.spec.whatwg.org/#nodes)
///
/// All nodes live in one vector and refer to each other by index. Nodes
/// removed from the tree stay allocated (detached) until the tree is dropped.
#[derive(Debug, Clone)]
pub struct DomTree {
    /// All nodes in the tree, indexed by `NodeId`.
    /// The Document node is always at index 0 (`NodeId::ROOT`).
    nodes: Vec<Node>,
    /// Upper bound on allocated nodes, if any.
    node_limit: Option<usize>,
    /// [§ 4.5](https://dom.spec.whatwg.org/#concept-document-mode)
    quirks_mode: QuirksMode,
}

impl DomTree {
    /// A tree holding only the document node.
    #[must_use]
    pub fn new() -> Self {
        Self {
            nodes: vec![Node::detached(NodeType::Document)],
            node_limit: None,
            quirks_mode: QuirksMode::NoQuirks,
        }
    }

    /// Create a tree that refuses to grow past `limit` nodes (the document
    /// node included). Allocation beyond it fails with
    /// [`TreeError::NodeLimitExceeded`].
    #[must_use]
    pub fn with_node_limit(limit: usize) -> Self {
        Self {
            node_limit: Some(limit),
            ..Self::new()
        }
    }

    /// The document node.
    #[must_use]
    pub const fn root(&self) -> NodeId {
        NodeId::ROOT
    }

    /// Look up a node.
    #[must_use]
    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.0)
    }

    /// Look up a node for mutation.
    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.nodes.get_mut(id.0)
    }

    /// Get the number of allocated nodes, detached ones included.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Always `false`: the document node exists from construction.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// The document's quirks mode as decided by the DOCTYPE.
    #[must_use]
    pub const fn quirks_mode(&self) -> QuirksMode {
        self.quirks_mode
    }

    /// Allocate a detached node.
    ///
    /// # Errors
    ///
    /// Returns [`TreeError::NodeLimitExceeded`] when the tree was created
    /// with a node limit and it has been reached.
    pub fn alloc(&mut self, node_type: NodeType) -> Result<NodeId, TreeError> {
        if let Some(limit) = self.node_limit {
            if self.nodes.len() >= limit {
                return Err(TreeError::NodeLimitExceeded { limit });
            }
        }
        let id = NodeId(self.nodes.len());
        self.nodes.push(Node::detached(node_type));
        Ok(id)
    }

    /// [§ 4.2.2 Append](https://dom.spec.whatwg.org/#concept-node-append)
    ///
    /// "To append a node to a parent, pre-insert node into parent before null."
    ///
    /// Appends `child` as the last child of `parent`, detaching it from its
    /// previous parent first.
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) {
        self.detach(child);
        let prev_last_child = self.nodes[parent.0].children.last().copied();

        self.nodes[parent.0].children.push(child);
        self.nodes[child.0].parent = Some(parent);

        if let Some(prev_id) = prev_last_child {
            self.nodes[prev_id.0].next_sibling = Some(child);
            self.nodes[child.0].prev_sibling = Some(prev_id);
        }
    }

    /// [§ 4.2.3 Pre-insert](https://dom.spec.whatwg.org/#concept-node-pre-insert)
    ///
    /// Inserts `child` into `parent` immediately before `reference`. If
    /// `reference` is not a child of `parent`, `child` is appended instead.
    pub fn insert_before(&mut self, parent: NodeId, child: NodeId, reference: NodeId) {
        self.detach(child);
        let Some(index) = self.child_index(parent, reference) else {
            self.append_child(parent, child);
            return;
        };
        let prev = index
            .checked_sub(1)
            .map(|i| self.nodes[parent.0].children[i]);

        self.nodes[parent.0].children.insert(index, child);
        self.nodes[child.0].parent = Some(parent);
        self.nodes[child.0].prev_sibling = prev;
        self.nodes[child.0].next_sibling = Some(reference);
        self.nodes[reference.0].prev_sibling = Some(child);
        if let Some(prev_id) = prev {
            self.nodes[prev_id.0].next_sibling = Some(child);
        }
    }

    /// [§ 4.2.3 Remove](https://dom.spec.whatwg.org/#concept-node-remove)
    ///
    /// Removes `child` from `parent`'s children and clears its tree links.
    /// Does nothing if `child` is not a child of `parent`.
    pub fn remove_child(&mut self, parent: NodeId, child: NodeId) {
        let Some(index) = self.child_index(parent, child) else {
            return;
        };
        let _ = self.nodes[parent.0].children.remove(index);

        let prev = self.nodes[child.0].prev_sibling.take();
        let next = self.nodes[child.0].next_sibling.take();
        self.nodes[child.0].parent = None;

        if let Some(prev_id) = prev {
            self.nodes[prev_id.0].next_sibling = next;
        }
        if let Some(next_id) = next {
            self.nodes[next_id.0].prev_sibling = prev;
        }
    }

    /// Remove `node` from whatever parent it has.
    pub fn detach(&mut self, node: NodeId) {
        if let Some(parent) = self.parent(node) {
            self.remove_child(parent, node);
        }
    }

    /// Move every child of `from` to the end of `to`, preserving order.
    pub fn move_children(&mut self, from: NodeId, to: NodeId) {
        let children = std::mem::take(&mut self.nodes[from.0].children);
        for &child in &children {
            let node = &mut self.nodes[child.0];
            node.parent = None;
            node.prev_sibling = None;
            node.next_sibling = None;
        }
        for child in children {
            self.append_child(to, child);
        }
    }

    fn child_index(&self, parent: NodeId, child: NodeId) -> Option<usize> {
        self.get(parent)?.children.iter().position(|&c| c == child)
    }

    /// Parent of `id`, `None` for the document and detached nodes.
    #[must_use]
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.get(id).and_then(|n| n.parent)
    }

    /// Children of `id` in document order.
    #[must_use]
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.get(id).map_or(&[], |n| n.children.as_slice())
    }

    /// Last child of `id`, where text is appended.
    #[must_use]
    pub fn last_child(&self, id: NodeId) -> Option<NodeId> {
        self.get(id).and_then(|n| n.children.last().copied())
    }

    /// [§ 4.4](https://dom.spec.whatwg.org/#concept-tree-next-sibling)
    #[must_use]
    pub fn next_sibling(&self, id: NodeId) -> Option<NodeId> {
        self.get(id).and_then(|n| n.next_sibling)
    }

    /// [§ 4.4](https://dom.spec.whatwg.org/#concept-tree-previous-sibling)
    #[must_use]
    pub fn prev_sibling(&self, id: NodeId) -> Option<NodeId> {
        self.get(id).and_then(|n| n.prev_sibling)
    }

    /// [§ 4.2.6 Descendant](https://dom.spec.whatwg.org/#concept-tree-descendant)
    ///
    /// Check if `descendant` is a descendant of `ancestor`.
    #[must_use]
    pub fn is_descendant_of(&self, descendant: NodeId, ancestor: NodeId) -> bool {
        self.ancestors(descendant).any(|id| id == ancestor)
    }

    /// Ancestors of `id`, nearest first.
    #[must_use]
    pub fn ancestors(&self, id: NodeId) -> AncestorIterator<'_> {
        AncestorIterator {
            tree: self,
            current: self.parent(id),
        }
    }

    /// Iterate over `id` and all of its descendants in document order.
    #[must_use]
    pub fn descendants(&self, id: NodeId) -> DescendantIterator<'_> {
        DescendantIterator {
            tree: self,
            stack: vec![id],
        }
    }

    /// Element data, if `id` is an element.
    #[must_use]
    pub fn as_element(&self, id: NodeId) -> Option<&ElementData> {
        self.get(id).and_then(|n| match &n.node_type {
            NodeType::Element(data) => Some(data),
            _ => None,
        })
    }

    /// The data of a text node.
    #[must_use]
    pub fn as_text(&self, id: NodeId) -> Option<&str> {
        self.get(id).and_then(|n| match &n.node_type {
            NodeType::Text(s) => Some(s.as_str()),
            _ => None,
        })
    }

    /// Concatenated text of every text and CDATA descendant of `id`.
    #[must_use]
    pub fn text_content(&self, id: NodeId) -> String {
        let mut out = String::new();
        for node in self.descendants(id) {
            if let Some(n) = self.get(node) {
                match &n.node_type {
                    NodeType::Text(text) | NodeType::CData(text) => out.push_str(text),
                    _ => {}
                }
            }
        }
        out
    }

    /// [§ 3.1.1 The document element](https://html.spec.whatwg.org/multipage/dom.html#the-html-element-2)
    ///
    /// "The document element of a document is the element whose parent is that
    /// document, if it exists; otherwise null."
    #[must_use]
    pub fn document_element(&self) -> Option<NodeId> {
        self.children(NodeId::ROOT)
            .iter()
            .find(|&&id| self.as_element(id).is_some())
            .copied()
    }

    /// [§ 3.1.3 The body element](https://html.spec.whatwg.org/multipage/dom.html#the-body-element-2)
    ///
    /// "The body element of a document is the first of the html element's children
    /// that is either a body element or a frameset element, or null if there is
    /// no such element."
    #[must_use]
    pub fn body(&self) -> Option<NodeId> {
        let html = self.document_element()?;
        self.children(html)
            .iter()
            .find(|&&id| {
                self.as_element(id)
                    .is_some_and(|e| e.is_html("body") || e.is_html("frameset"))
            })
            .copied()
    }

    /// First element in document order under `from` whose tag name is `name`.
    #[must_use]
    pub fn find_element(&self, from: NodeId, name: &str) -> Option<NodeId> {
        self.descendants(from)
            .find(|&id| self.as_element(id).is_some_and(|e| e.tag_name == name))
    }

    /// All elements in document order under `from` whose tag name is `name`.
    #[must_use]
    pub fn find_elements(&self, from: NodeId, name: &str) -> Vec<NodeId> {
        self.descendants(from)
            .filter(|&id| self.as_element(id).is_some_and(|e| e.tag_name == name))
            .collect()
    }
}

impl Default for DomTree {
    fn default() -> Self {
        Self::new()
    }
}

/// Walks parent links up to the document.
pub struct AncestorIterator<'a> {
    tree: &'a DomTree,
    current: Option<NodeId>,
}

impl Iterator for AncestorIterator<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.current?;
        self.current = self.tree.parent(id);
        Some(id)
    }
}

/// Pre-order iterator over a subtree.
pub struct DescendantIterator<'a> {
    tree: &'a DomTree,
    stack: Vec<NodeId>,
}

impl Iterator for DescendantIterator<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.stack.pop()?;
        self.stack
            .extend(self.tree.children(id).iter().rev().copied());
        Some(id)
    }
}

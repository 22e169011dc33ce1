//! The node factory seam between tree construction and a concrete tree.
//!
//! The tree builders never touch [`DomTree`] directly. They create and
//! attach nodes through [`NodeFactory`], and only read back parent links
//! (for foster parenting and the adoption agency algorithm).

use std::fmt;

use thiserror::Error;
use wombat_common::SourceRange;

use crate::{Attribute, DoctypeData, DomTree, ElementData, Namespace, NodeId, NodeType, QuirksMode};

/// A failure of the tree to accept a node.
///
/// These are resource failures, not markup errors, so they abort the parse.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TreeError {
    /// The tree was created with a node limit and it has been reached.
    #[error("node limit of {limit} reached")]
    NodeLimitExceeded {
        /// The configured limit.
        limit: usize,
    },
    /// A handle that does not belong to this tree was passed in.
    #[error("unknown node handle {0}")]
    UnknownNode(usize),
}

/// Which tag of an element a [`SourceRange`] describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceRangeKind {
    /// The start tag (or the implicit opening point).
    Start,
    /// The end tag (or the implicit closing point).
    End,
}

/// Creates nodes and links them into a tree.
///
/// Text is appended through [`NodeFactory::append_text`] and
/// [`NodeFactory::insert_text_before`] so implementations can merge adjacent
/// runs into one text node, as the DOM requires.
pub trait NodeFactory {
    /// Opaque reference to a node owned by the factory.
    type Handle: Copy + Eq + fmt::Debug;

    /// The document node every tree starts with.
    fn document(&self) -> Self::Handle;

    /// Create a detached element.
    ///
    /// # Errors
    ///
    /// Fails if the tree cannot allocate another node.
    fn create_element(
        &mut self,
        name: &str,
        namespace: Namespace,
        attributes: Vec<Attribute>,
    ) -> Result<Self::Handle, TreeError>;

    /// Create a detached comment.
    ///
    /// # Errors
    ///
    /// Fails if the tree cannot allocate another node.
    fn create_comment(&mut self, data: &str) -> Result<Self::Handle, TreeError>;

    /// Create a detached CDATA section.
    ///
    /// # Errors
    ///
    /// Fails if the tree cannot allocate another node.
    fn create_cdata(&mut self, data: &str) -> Result<Self::Handle, TreeError>;

    /// Create a detached document type node.
    ///
    /// # Errors
    ///
    /// Fails if the tree cannot allocate another node.
    fn create_doctype(
        &mut self,
        name: &str,
        public_id: &str,
        system_id: &str,
    ) -> Result<Self::Handle, TreeError>;

    /// Create a detached processing instruction.
    ///
    /// # Errors
    ///
    /// Fails if the tree cannot allocate another node.
    fn create_processing_instruction(
        &mut self,
        target: &str,
        data: &str,
    ) -> Result<Self::Handle, TreeError>;

    /// Append `child` as the last child of `parent`.
    ///
    /// # Errors
    ///
    /// Fails if either handle is unknown.
    fn append_child(&mut self, parent: Self::Handle, child: Self::Handle) -> Result<(), TreeError>;

    /// Insert `child` into `parent` just before `reference`.
    ///
    /// # Errors
    ///
    /// Fails if any handle is unknown.
    fn insert_before(
        &mut self,
        parent: Self::Handle,
        child: Self::Handle,
        reference: Self::Handle,
    ) -> Result<(), TreeError>;

    /// Append text to `parent`, extending its last child if that is text.
    ///
    /// # Errors
    ///
    /// Fails if the handle is unknown or a new node cannot be allocated.
    fn append_text(&mut self, parent: Self::Handle, text: &str) -> Result<(), TreeError>;

    /// Insert text into `parent` before `reference`, extending the
    /// preceding sibling if that is text.
    ///
    /// # Errors
    ///
    /// Fails if a handle is unknown or a new node cannot be allocated.
    fn insert_text_before(
        &mut self,
        parent: Self::Handle,
        reference: Self::Handle,
        text: &str,
    ) -> Result<(), TreeError>;

    /// Add each attribute the element does not already have.
    ///
    /// # Errors
    ///
    /// Fails if the handle is unknown.
    fn add_attributes_if_missing(
        &mut self,
        element: Self::Handle,
        attributes: Vec<Attribute>,
    ) -> Result<(), TreeError>;

    /// Detach `node` from its parent, if it has one.
    ///
    /// # Errors
    ///
    /// Fails if the handle is unknown.
    fn remove_from_parent(&mut self, node: Self::Handle) -> Result<(), TreeError>;

    /// The parent of `node`, if it is attached.
    fn parent_of(&self, node: Self::Handle) -> Option<Self::Handle>;

    /// Move all children of `node` to the end of `new_parent`.
    ///
    /// # Errors
    ///
    /// Fails if either handle is unknown.
    fn reparent_children(
        &mut self,
        node: Self::Handle,
        new_parent: Self::Handle,
    ) -> Result<(), TreeError>;

    /// Attach source position metadata to an element.
    fn set_source_range(&mut self, node: Self::Handle, kind: SourceRangeKind, range: SourceRange) {
        let _ = (node, kind, range);
    }

    /// Record the document's quirks mode.
    fn set_quirks_mode(&mut self, mode: QuirksMode) {
        let _ = mode;
    }
}

impl DomTree {
    fn check(&self, id: NodeId) -> Result<NodeId, TreeError> {
        if id.0 < self.len() {
            Ok(id)
        } else {
            Err(TreeError::UnknownNode(id.0))
        }
    }

    fn text_mut(&mut self, id: Option<NodeId>) -> Option<&mut String> {
        match &mut self.get_mut(id?)?.node_type {
            NodeType::Text(text) => Some(text),
            _ => None,
        }
    }
}

impl NodeFactory for DomTree {
    type Handle = NodeId;

    fn document(&self) -> NodeId {
        NodeId::ROOT
    }

    fn create_element(
        &mut self,
        name: &str,
        namespace: Namespace,
        attributes: Vec<Attribute>,
    ) -> Result<NodeId, TreeError> {
        self.alloc(NodeType::Element(ElementData {
            tag_name: name.to_string(),
            namespace,
            attrs: attributes,
        }))
    }

    fn create_comment(&mut self, data: &str) -> Result<NodeId, TreeError> {
        self.alloc(NodeType::Comment(data.to_string()))
    }

    fn create_cdata(&mut self, data: &str) -> Result<NodeId, TreeError> {
        self.alloc(NodeType::CData(data.to_string()))
    }

    fn create_doctype(
        &mut self,
        name: &str,
        public_id: &str,
        system_id: &str,
    ) -> Result<NodeId, TreeError> {
        self.alloc(NodeType::Doctype(DoctypeData {
            name: name.to_string(),
            public_id: public_id.to_string(),
            system_id: system_id.to_string(),
        }))
    }

    fn create_processing_instruction(
        &mut self,
        target: &str,
        data: &str,
    ) -> Result<NodeId, TreeError> {
        self.alloc(NodeType::ProcessingInstruction {
            target: target.to_string(),
            data: data.to_string(),
        })
    }

    fn append_child(&mut self, parent: NodeId, child: NodeId) -> Result<(), TreeError> {
        let parent = self.check(parent)?;
        let child = self.check(child)?;
        Self::append_child(self, parent, child);
        Ok(())
    }

    fn insert_before(
        &mut self,
        parent: NodeId,
        child: NodeId,
        reference: NodeId,
    ) -> Result<(), TreeError> {
        let parent = self.check(parent)?;
        let child = self.check(child)?;
        let reference = self.check(reference)?;
        Self::insert_before(self, parent, child, reference);
        Ok(())
    }

    fn append_text(&mut self, parent: NodeId, text: &str) -> Result<(), TreeError> {
        let parent = self.check(parent)?;
        let last = self.last_child(parent);
        if let Some(existing) = self.text_mut(last) {
            existing.push_str(text);
            return Ok(());
        }
        let node = self.alloc(NodeType::Text(text.to_string()))?;
        Self::append_child(self, parent, node);
        Ok(())
    }

    fn insert_text_before(
        &mut self,
        parent: NodeId,
        reference: NodeId,
        text: &str,
    ) -> Result<(), TreeError> {
        let parent = self.check(parent)?;
        let reference = self.check(reference)?;
        let prev = self.prev_sibling(reference);
        if let Some(existing) = self.text_mut(prev) {
            existing.push_str(text);
            return Ok(());
        }
        let node = self.alloc(NodeType::Text(text.to_string()))?;
        Self::insert_before(self, parent, node, reference);
        Ok(())
    }

    fn add_attributes_if_missing(
        &mut self,
        element: NodeId,
        attributes: Vec<Attribute>,
    ) -> Result<(), TreeError> {
        let element = self.check(element)?;
        if let Some(NodeType::Element(data)) = self.get_mut(element).map(|n| &mut n.node_type) {
            for attr in attributes {
                if !data.has_attribute(&attr.name) {
                    data.attrs.push(attr);
                }
            }
        }
        Ok(())
    }

    fn remove_from_parent(&mut self, node: NodeId) -> Result<(), TreeError> {
        let node = self.check(node)?;
        self.detach(node);
        Ok(())
    }

    fn parent_of(&self, node: NodeId) -> Option<NodeId> {
        self.parent(node)
    }

    fn reparent_children(&mut self, node: NodeId, new_parent: NodeId) -> Result<(), TreeError> {
        let node = self.check(node)?;
        let new_parent = self.check(new_parent)?;
        self.move_children(node, new_parent);
        Ok(())
    }

    fn set_source_range(&mut self, node: NodeId, kind: SourceRangeKind, range: SourceRange) {
        if let Some(n) = self.get_mut(node) {
            match kind {
                SourceRangeKind::Start => n.start_range = Some(range),
                SourceRangeKind::End => n.end_range = Some(range),
            }
        }
    }

    fn set_quirks_mode(&mut self, mode: QuirksMode) {
        self.quirks_mode = mode;
    }
}

//! Ordered program trees
//!
//! Trees own their children outright. Grafting a subtree into another tree
//! always clones it, so a composite can never reach back into the tree it
//! was assembled from.

use crate::errors::{ComboError, Result};
use crate::vertex::{Builtin, Vertex};

/// An ordered, rooted tree of vertices.
#[derive(Debug, Clone, PartialEq)]
pub struct ComboTree {
    vertex: Vertex,
    children: Vec<ComboTree>,
}

impl ComboTree {
    /// Create a single-node tree
    pub fn leaf(vertex: impl Into<Vertex>) -> Self {
        Self {
            vertex: vertex.into(),
            children: Vec::new(),
        }
    }

    /// Create a tree with the given root and children, left to right
    pub fn node(vertex: impl Into<Vertex>, children: Vec<ComboTree>) -> Self {
        Self {
            vertex: vertex.into(),
            children,
        }
    }

    pub fn vertex(&self) -> &Vertex {
        &self.vertex
    }

    pub fn children(&self) -> &[ComboTree] {
        &self.children
    }

    pub fn has_children(&self) -> bool {
        !self.children.is_empty()
    }

    /// Append `child` as the new right-most child and return it for further
    /// construction.
    pub fn push_child(&mut self, child: ComboTree) -> &mut ComboTree {
        self.children.push(child);
        let last = self.children.len() - 1;
        &mut self.children[last]
    }

    /// Append a new leaf vertex as the right-most child.
    pub fn append_child(&mut self, vertex: impl Into<Vertex>) -> &mut ComboTree {
        self.push_child(ComboTree::leaf(vertex))
    }

    /// Graft a copy of `subtree` as the right-most child.
    pub fn graft(&mut self, subtree: &ComboTree) -> &mut ComboTree {
        self.push_child(subtree.clone())
    }

    /// Number of nodes
    pub fn size(&self) -> usize {
        1 + self.children.iter().map(ComboTree::size).sum::<usize>()
    }

    /// Length of the longest root-to-leaf path, counting nodes
    pub fn depth(&self) -> usize {
        1 + self
            .children
            .iter()
            .map(ComboTree::depth)
            .max()
            .unwrap_or(0)
    }

    /// Pre-order traversal of the vertices
    pub fn pre_order(&self) -> PreOrder<'_> {
        PreOrder { stack: vec![self] }
    }

    pub fn is_builtin(&self, builtin: Builtin) -> bool {
        self.vertex.as_builtin() == Some(builtin)
    }

    /// Check every node against its arity contract.
    pub fn validate(&self) -> Result<()> {
        let arity = self.vertex.arity();
        if !arity.admits(self.children.len()) {
            return Err(ComboError::Arity {
                vertex: format!("{:?}", self.vertex),
                expected: arity.to_string(),
                found: self.children.len(),
            });
        }
        self.children.iter().try_for_each(ComboTree::validate)
    }
}

/// Iterator over the vertices of a tree in pre-order.
pub struct PreOrder<'a> {
    stack: Vec<&'a ComboTree>,
}

impl<'a> Iterator for PreOrder<'a> {
    type Item = &'a Vertex;

    fn next(&mut self) -> Option<Self::Item> {
        let tree = self.stack.pop()?;
        self.stack.extend(tree.children.iter().rev());
        Some(&tree.vertex)
    }
}

//! N-ary trees stored in a slot-map arena.
//!
//! Each node owns an ordered child [`List`] (insertion order is z-order, lowest
//! first) and a parent back-reference. Handles are generation-checked
//! `slotmap` keys, so a stale handle to a removed node is detected instead of
//! dangling.
//!
//! # Example
//!
//! ```
//! use horizon_trellis_core::tree::Tree;
//! use horizon_trellis_core::TreeError;
//! use slotmap::DefaultKey;
//!
//! let mut tree: Tree<DefaultKey, &str> = Tree::new();
//! let root = tree.create("root");
//! let child = tree.create("child");
//!
//! tree.insert(root, child, None).unwrap();
//! assert_eq!(tree.parent(child), Some(root));
//!
//! // Cycles are rejected.
//! assert_eq!(tree.insert(child, root, None), Err(TreeError::CircularParentage));
//! ```

use slotmap::{Key, SlotMap};

use crate::error::{TreeError, TreeResult};
use crate::list::{self, Linked, List, ListLinks};
use crate::logging::targets;

/// Internal per-node storage.
#[derive(Debug)]
struct Node<K: Key, T> {
    data: T,
    parent: Option<K>,
    children: List<K>,
    siblings: ListLinks<K>,
}

impl<K: Key, T> Linked<K> for Node<K, T> {
    fn links(&self) -> &ListLinks<K> {
        &self.siblings
    }

    fn links_mut(&mut self) -> &mut ListLinks<K> {
        &mut self.siblings
    }
}

/// An arena of nodes forming any number of independent trees.
#[derive(Debug)]
pub struct Tree<K: Key, T> {
    nodes: SlotMap<K, Node<K, T>>,
}

impl<K: Key, T> Default for Tree<K, T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Key, T> Tree<K, T> {
    /// Create an empty arena.
    pub fn new() -> Self {
        Self {
            nodes: SlotMap::with_key(),
        }
    }

    /// Add a detached root node holding `data`.
    pub fn create(&mut self, data: T) -> K {
        let id = self.nodes.insert(Node {
            data,
            parent: None,
            children: List::new(),
            siblings: ListLinks::new(),
        });
        tracing::trace!(target: targets::TREE, ?id, "created node");
        id
    }

    /// Number of live nodes across all trees.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether the arena holds no nodes.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Whether `id` refers to a live node.
    pub fn contains(&self, id: K) -> bool {
        self.nodes.contains_key(id)
    }

    /// The payload of a node.
    pub fn get(&self, id: K) -> Option<&T> {
        self.nodes.get(id).map(|n| &n.data)
    }

    /// The payload of a node, mutably.
    pub fn get_mut(&mut self, id: K) -> Option<&mut T> {
        self.nodes.get_mut(id).map(|n| &mut n.data)
    }

    /// The parent of a node, `None` for roots and invalid handles.
    pub fn parent(&self, id: K) -> Option<K> {
        self.nodes.get(id).and_then(|n| n.parent)
    }

    /// The lowest child in z-order.
    pub fn first_child(&self, id: K) -> Option<K> {
        self.nodes.get(id).and_then(|n| n.children.first())
    }

    /// The highest child in z-order.
    pub fn last_child(&self, id: K) -> Option<K> {
        self.nodes.get(id).and_then(|n| n.children.last())
    }

    /// The sibling directly above `id` in z-order.
    pub fn next_sibling(&self, id: K) -> Option<K> {
        self.nodes.get(id).and_then(|n| n.siblings.next())
    }

    /// The sibling directly below `id` in z-order.
    pub fn prev_sibling(&self, id: K) -> Option<K> {
        self.nodes.get(id).and_then(|n| n.siblings.prev())
    }

    /// Number of direct children.
    pub fn child_count(&self, id: K) -> usize {
        self.nodes.get(id).map_or(0, |n| n.children.len())
    }

    /// Iterate the direct children from lowest to highest z-order.
    ///
    /// The iterator borrows the arena; walks that mutate the tree between
    /// steps use [`first_child`](Self::first_child) and
    /// [`next_sibling`](Self::next_sibling) instead.
    pub fn children(&self, id: K) -> Children<'_, K, T> {
        let list = self.nodes.get(id).map(|n| n.children).unwrap_or_default();
        Children {
            inner: list.iter(&self.nodes),
        }
    }

    /// Whether `ancestor` appears on the parent chain of `id`.
    ///
    /// A node is not its own ancestor.
    pub fn is_ancestor(&self, ancestor: K, id: K) -> bool {
        let mut current = self.parent(id);
        while let Some(node) = current {
            if node == ancestor {
                return true;
            }
            current = self.parent(node);
        }
        false
    }

    /// The root of the tree containing `id`.
    pub fn root_of(&self, id: K) -> K {
        let mut root = id;
        while let Some(parent) = self.parent(root) {
            root = parent;
        }
        root
    }

    /// Number of ancestors of `id`.
    pub fn depth(&self, id: K) -> usize {
        let mut depth = 0;
        let mut current = self.parent(id);
        while let Some(node) = current {
            depth += 1;
            current = self.parent(node);
        }
        depth
    }

    /// Position of `id` among its siblings, 0 being the lowest.
    pub fn z_order(&self, id: K) -> usize {
        let mut index = 0;
        let mut current = self.prev_sibling(id);
        while let Some(node) = current {
            index += 1;
            current = self.prev_sibling(node);
        }
        index
    }

    /// Attach `child` under `parent`, in front of `before` or on top if `None`.
    ///
    /// # Errors
    ///
    /// Fails without modifying anything if either handle is invalid, if
    /// `child == parent`, if `child` already has a parent, if `child` is an
    /// ancestor of `parent`, or if `before` is not a child of `parent`.
    pub fn insert(&mut self, parent: K, child: K, before: Option<K>) -> TreeResult<()> {
        if !self.contains(parent) || !self.contains(child) {
            return Err(TreeError::InvalidNode);
        }
        if child == parent {
            return Err(TreeError::SelfInsertion);
        }
        if self.parent(child).is_some() {
            return Err(TreeError::AlreadyParented);
        }
        if self.is_ancestor(child, parent) {
            return Err(TreeError::CircularParentage);
        }
        if let Some(before) = before {
            if self.parent(before) != Some(parent) {
                return Err(TreeError::NotAChild);
            }
        }

        let mut children = self.nodes[parent].children;
        children.insert(&mut self.nodes, child, before);
        self.nodes[parent].children = children;
        self.nodes[child].parent = Some(parent);

        tracing::trace!(target: targets::TREE, ?parent, ?child, "inserted node");
        Ok(())
    }

    /// Detach `child` from `parent`.
    ///
    /// # Errors
    ///
    /// Returns [`TreeError::NotAChild`] if `child` is not a direct child of
    /// `parent`.
    pub fn remove(&mut self, parent: K, child: K) -> TreeResult<()> {
        if !self.contains(parent) || !self.contains(child) {
            return Err(TreeError::InvalidNode);
        }
        if self.parent(child) != Some(parent) {
            return Err(TreeError::NotAChild);
        }

        let mut children = self.nodes[parent].children;
        children.remove(&mut self.nodes, child);
        self.nodes[parent].children = children;
        self.nodes[child].parent = None;

        tracing::trace!(target: targets::TREE, ?parent, ?child, "removed node");
        Ok(())
    }

    /// Detach `child` from whatever parent it has, returning that parent.
    pub fn detach(&mut self, child: K) -> TreeResult<Option<K>> {
        if !self.contains(child) {
            return Err(TreeError::InvalidNode);
        }
        match self.parent(child) {
            Some(parent) => self.remove(parent, child).map(|()| Some(parent)),
            None => Ok(None),
        }
    }

    /// Handles of the subtree rooted at `id`, parents before children.
    pub fn preorder(&self, id: K) -> Vec<K> {
        let mut out = Vec::new();
        if self.contains(id) {
            self.preorder_recursive(id, &mut out);
        }
        out
    }

    fn preorder_recursive(&self, id: K, out: &mut Vec<K>) {
        out.push(id);
        for child in self.children(id) {
            self.preorder_recursive(child, out);
        }
    }

    /// Handles of the subtree rooted at `id`, children before parents.
    pub fn postorder(&self, id: K) -> Vec<K> {
        let mut out = Vec::new();
        if self.contains(id) {
            self.postorder_recursive(id, &mut out);
        }
        out
    }

    fn postorder_recursive(&self, id: K, out: &mut Vec<K>) {
        for child in self.children(id) {
            self.postorder_recursive(child, out);
        }
        out.push(id);
    }

    /// Detach `id` and free its whole subtree, children first.
    ///
    /// Returns the freed payloads in removal order.
    pub fn remove_subtree(&mut self, id: K) -> TreeResult<Vec<(K, T)>> {
        self.detach(id)?;
        let order = self.postorder(id);
        tracing::trace!(target: targets::TREE, ?id, count = order.len(), "freeing subtree");

        let mut freed = Vec::with_capacity(order.len());
        for key in order {
            if let Some(node) = self.nodes.remove(key) {
                freed.push((key, node.data));
            }
        }
        Ok(freed)
    }
}

/// Iterator over a node's children, see [`Tree::children`].
pub struct Children<'a, K: Key, T> {
    inner: list::Iter<'a, K, Node<K, T>>,
}

impl<K: Key, T> Iterator for Children<'_, K, T> {
    type Item = K;

    fn next(&mut self) -> Option<K> {
        self.inner.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<K: Key, T> DoubleEndedIterator for Children<'_, K, T> {
    fn next_back(&mut self) -> Option<K> {
        self.inner.next_back()
    }
}

impl<K: Key, T> ExactSizeIterator for Children<'_, K, T> {}

//! Doubly-linked sibling lists over arena handles.
//!
//! A [`List`] is only a header (first, last, length). The links themselves
//! live inside the arena nodes, which expose them through the [`Linked`]
//! trait. Because the header is `Copy`, a list stored inside an arena node
//! can be copied out, mutated against the arena, and written back without
//! holding two borrows of the arena at once.
//!
//! Every operation is O(1) except [`List::clear`] and iteration.
//!
//! # Example
//!
//! ```
//! use horizon_trellis_core::list::{Linked, List, ListLinks};
//! use slotmap::{DefaultKey, SlotMap};
//!
//! struct Item {
//!     links: ListLinks<DefaultKey>,
//!     value: i32,
//! }
//!
//! impl Linked<DefaultKey> for Item {
//!     fn links(&self) -> &ListLinks<DefaultKey> {
//!         &self.links
//!     }
//!     fn links_mut(&mut self) -> &mut ListLinks<DefaultKey> {
//!         &mut self.links
//!     }
//! }
//!
//! let mut arena = SlotMap::new();
//! let a = arena.insert(Item { links: ListLinks::new(), value: 1 });
//! let b = arena.insert(Item { links: ListLinks::new(), value: 2 });
//!
//! let mut list = List::new();
//! list.append(&mut arena, b);
//! list.insert(&mut arena, a, Some(b));
//!
//! let values: Vec<i32> = list.iter(&arena).map(|k| arena[k].value).collect();
//! assert_eq!(values, vec![1, 2]);
//! ```

use slotmap::{Key, SlotMap};

/// The previous/next links embedded in every list node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListLinks<K: Key> {
    prev: Option<K>,
    next: Option<K>,
}

impl<K: Key> ListLinks<K> {
    /// Create unlinked links.
    pub const fn new() -> Self {
        Self {
            prev: None,
            next: None,
        }
    }

    /// The previous node, if any.
    pub fn prev(&self) -> Option<K> {
        self.prev
    }

    /// The next node, if any.
    pub fn next(&self) -> Option<K> {
        self.next
    }

    /// Whether both links are empty.
    pub fn is_unlinked(&self) -> bool {
        self.prev.is_none() && self.next.is_none()
    }
}

impl<K: Key> Default for ListLinks<K> {
    fn default() -> Self {
        Self::new()
    }
}

/// Access to the list links stored inside an arena node.
pub trait Linked<K: Key> {
    /// Shared access to the node's links.
    fn links(&self) -> &ListLinks<K>;

    /// Mutable access to the node's links.
    fn links_mut(&mut self) -> &mut ListLinks<K>;
}

/// The header of a doubly-linked list whose nodes live in a [`SlotMap`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct List<K: Key> {
    first: Option<K>,
    last: Option<K>,
    len: usize,
}

impl<K: Key> Default for List<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Key> List<K> {
    /// Create an empty list.
    pub const fn new() -> Self {
        Self {
            first: None,
            last: None,
            len: 0,
        }
    }

    /// The first node of the list.
    pub fn first(&self) -> Option<K> {
        self.first
    }

    /// The last node of the list.
    pub fn last(&self) -> Option<K> {
        self.last
    }

    /// The number of nodes in the list.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Whether the list has no nodes.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Splice `node` in front of `before`, or at the tail if `before` is `None`.
    ///
    /// `node` must not currently be linked into any list, and `before` must be
    /// a member of this list.
    pub fn insert<N: Linked<K>>(&mut self, nodes: &mut SlotMap<K, N>, node: K, before: Option<K>) {
        let Some(next) = before else {
            self.append(nodes, node);
            return;
        };
        debug_assert!(
            nodes.get(node).is_some_and(|n| n.links().is_unlinked()) && self.first != Some(node),
            "node is already linked"
        );

        let prev = nodes.get(next).and_then(|n| n.links().prev);
        if let Some(n) = nodes.get_mut(node) {
            let links = n.links_mut();
            links.prev = prev;
            links.next = Some(next);
        }
        if let Some(n) = nodes.get_mut(next) {
            n.links_mut().prev = Some(node);
        }
        match prev {
            Some(prev) => {
                if let Some(n) = nodes.get_mut(prev) {
                    n.links_mut().next = Some(node);
                }
            }
            None => self.first = Some(node),
        }
        self.len += 1;
    }

    /// Link `node` at the tail of the list.
    pub fn append<N: Linked<K>>(&mut self, nodes: &mut SlotMap<K, N>, node: K) {
        debug_assert!(
            nodes.get(node).is_some_and(|n| n.links().is_unlinked()) && self.first != Some(node),
            "node is already linked"
        );

        let prev = self.last;
        if let Some(n) = nodes.get_mut(node) {
            let links = n.links_mut();
            links.prev = prev;
            links.next = None;
        }
        match prev {
            Some(prev) => {
                if let Some(n) = nodes.get_mut(prev) {
                    n.links_mut().next = Some(node);
                }
            }
            None => self.first = Some(node),
        }
        self.last = Some(node);
        self.len += 1;
    }

    /// Link `node` at the head of the list.
    pub fn prepend<N: Linked<K>>(&mut self, nodes: &mut SlotMap<K, N>, node: K) {
        let first = self.first;
        self.insert(nodes, node, first);
    }

    /// Unlink `node` from the list and clear its links.
    pub fn remove<N: Linked<K>>(&mut self, nodes: &mut SlotMap<K, N>, node: K) {
        let Some(links) = nodes.get(node).map(|n| *n.links()) else {
            return;
        };

        match links.prev {
            Some(prev) => {
                if let Some(n) = nodes.get_mut(prev) {
                    n.links_mut().next = links.next;
                }
            }
            None => self.first = links.next,
        }
        match links.next {
            Some(next) => {
                if let Some(n) = nodes.get_mut(next) {
                    n.links_mut().prev = links.prev;
                }
            }
            None => self.last = links.prev,
        }
        if let Some(n) = nodes.get_mut(node) {
            *n.links_mut() = ListLinks::new();
        }
        self.len = self.len.saturating_sub(1);
    }

    /// Unlink every node.
    pub fn clear<N: Linked<K>>(&mut self, nodes: &mut SlotMap<K, N>) {
        let mut current = self.first;
        while let Some(key) = current {
            current = nodes.get(key).and_then(|n| n.links().next);
            if let Some(n) = nodes.get_mut(key) {
                *n.links_mut() = ListLinks::new();
            }
        }
        *self = Self::new();
    }

    /// Iterate over the node handles from first to last.
    pub fn iter<'a, N: Linked<K>>(&self, nodes: &'a SlotMap<K, N>) -> Iter<'a, K, N> {
        Iter {
            nodes,
            front: self.first,
            back: self.last,
            remaining: self.len,
        }
    }
}

/// Double-ended iterator over the handles of a [`List`].
pub struct Iter<'a, K: Key, N> {
    nodes: &'a SlotMap<K, N>,
    front: Option<K>,
    back: Option<K>,
    remaining: usize,
}

impl<K: Key, N: Linked<K>> Iterator for Iter<'_, K, N> {
    type Item = K;

    fn next(&mut self) -> Option<K> {
        if self.remaining == 0 {
            return None;
        }
        let key = self.front?;
        self.remaining -= 1;
        self.front = self.nodes.get(key).and_then(|n| n.links().next);
        Some(key)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<K: Key, N: Linked<K>> DoubleEndedIterator for Iter<'_, K, N> {
    fn next_back(&mut self) -> Option<K> {
        if self.remaining == 0 {
            return None;
        }
        let key = self.back?;
        self.remaining -= 1;
        self.back = self.nodes.get(key).and_then(|n| n.links().prev);
        Some(key)
    }
}

impl<K: Key, N: Linked<K>> ExactSizeIterator for Iter<'_, K, N> {}

#[cfg(test)]
mod tests {
    use super::*;
    use slotmap::DefaultKey;

    struct Item {
        links: ListLinks<DefaultKey>,
        value: char,
    }

    impl Linked<DefaultKey> for Item {
        fn links(&self) -> &ListLinks<DefaultKey> {
            &self.links
        }
        fn links_mut(&mut self) -> &mut ListLinks<DefaultKey> {
            &mut self.links
        }
    }

    fn setup(values: &str) -> (SlotMap<DefaultKey, Item>, Vec<DefaultKey>) {
        let mut arena = SlotMap::new();
        let keys = values
            .chars()
            .map(|value| {
                arena.insert(Item {
                    links: ListLinks::new(),
                    value,
                })
            })
            .collect();
        (arena, keys)
    }

    fn collect(list: &List<DefaultKey>, arena: &SlotMap<DefaultKey, Item>) -> String {
        list.iter(arena).map(|k| arena[k].value).collect()
    }

    #[test]
    fn test_append_and_prepend() {
        let (mut arena, k) = setup("abc");
        let mut list = List::new();
        list.append(&mut arena, k[1]);
        list.append(&mut arena, k[2]);
        list.prepend(&mut arena, k[0]);

        assert_eq!(collect(&list, &arena), "abc");
        assert_eq!(list.len(), 3);
        assert_eq!(list.first(), Some(k[0]));
        assert_eq!(list.last(), Some(k[2]));
    }

    #[test]
    fn test_insert_before() {
        let (mut arena, k) = setup("abcd");
        let mut list = List::new();
        list.append(&mut arena, k[0]);
        list.append(&mut arena, k[3]);
        list.insert(&mut arena, k[2], Some(k[3]));
        list.insert(&mut arena, k[1], Some(k[2]));

        assert_eq!(collect(&list, &arena), "abcd");
        assert_eq!(arena[k[1]].links.prev(), Some(k[0]));
        assert_eq!(arena[k[1]].links.next(), Some(k[2]));
    }

    #[test]
    fn test_insert_without_before_appends() {
        let (mut arena, k) = setup("ab");
        let mut list = List::new();
        list.insert(&mut arena, k[0], None);
        list.insert(&mut arena, k[1], None);
        assert_eq!(collect(&list, &arena), "ab");
    }

    #[test]
    fn test_remove_clears_links() {
        let (mut arena, k) = setup("abc");
        let mut list = List::new();
        for &key in &k {
            list.append(&mut arena, key);
        }

        list.remove(&mut arena, k[1]);
        assert_eq!(collect(&list, &arena), "ac");
        assert!(arena[k[1]].links.is_unlinked());

        list.remove(&mut arena, k[0]);
        list.remove(&mut arena, k[2]);
        assert!(list.is_empty());
        assert_eq!(list.first(), None);
        assert_eq!(list.last(), None);
    }

    #[test]
    fn test_reverse_iteration() {
        let (mut arena, k) = setup("xyz");
        let mut list = List::new();
        for &key in &k {
            list.append(&mut arena, key);
        }
        let reversed: String = list.iter(&arena).rev().map(|key| arena[key].value).collect();
        assert_eq!(reversed, "zyx");
    }

    #[test]
    fn test_clear() {
        let (mut arena, k) = setup("ab");
        let mut list = List::new();
        list.append(&mut arena, k[0]);
        list.append(&mut arena, k[1]);
        list.clear(&mut arena);

        assert!(list.is_empty());
        assert!(arena[k[0]].links.is_unlinked());
        assert!(arena[k[1]].links.is_unlinked());
    }
}

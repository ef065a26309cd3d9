use std::cmp::Ordering;
use std::fmt;

use compare::{natural, Compare, Natural};

use crate::cursor::{Cursor, Pos};
use crate::entry::{Entry, OccupiedEntry, VacantEntry};
use crate::index::{DefaultIx, IndexType, NodeIndex};
use crate::iter::Iter;
use crate::node::{Color, Node};

/// An ordered key-value map backed by a red-black tree.
///
/// Keys are unique under the map's comparator; entries are kept in
/// comparator order and can be traversed in both directions through
/// [`Cursor`]s obtained from [`find_ge`](OrderedMap::find_ge),
/// [`find_le`](OrderedMap::find_le), [`min`](OrderedMap::min) and
/// [`max`](OrderedMap::max).
///
/// The ordering of the map is undefined if the comparator does not implement
/// a strict total order over the keys, or if a key's order relative to any
/// other key changes while it is in the map.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(
    feature = "serde",
    serde(bound(
        serialize = "K: serde::Serialize, V: serde::Serialize, Ix: serde::Serialize",
        deserialize = "K: serde::Deserialize<'de>, V: serde::Deserialize<'de>, \
                       Ix: serde::Deserialize<'de>, C: Default"
    ))
)]
pub struct OrderedMap<K, V, C = Natural<K>, Ix = DefaultIx> {
    /// Vector that stores nodes
    pub(crate) nodes: Vec<Node<K, V, Ix>>,
    /// Root of the tree
    pub(crate) root: NodeIndex<Ix>,
    /// Number of elements in the map
    pub(crate) len: usize,
    /// Comparator defining the key order
    #[cfg_attr(feature = "serde", serde(skip))]
    pub(crate) cmp: C,
}

impl<K, V> OrderedMap<K, V>
where
    K: Ord,
{
    /// Create an empty `OrderedMap` ordered by the natural order of its keys.
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::with_cmp(natural())
    }

    /// Creates a new `OrderedMap` with estimated capacity.
    #[inline]
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        let mut map = Self::new();
        map.nodes.reserve(capacity);
        map
    }
}

impl<K, V, C> OrderedMap<K, V, C>
where
    C: Compare<K>,
{
    /// Create an empty `OrderedMap` ordered according to the given comparator.
    ///
    /// # Example
    /// ```rust
    /// use compare::{natural, Compare};
    /// use rb_order_map::OrderedMap;
    ///
    /// let mut map = OrderedMap::with_cmp(natural().rev());
    /// map.insert(1, "a");
    /// map.insert(3, "c");
    /// map.insert(2, "b");
    /// let keys: Vec<_> = map.iter().map(|(k, _)| *k).collect();
    /// assert_eq!(keys, [3, 2, 1]);
    /// ```
    #[inline]
    pub fn with_cmp(cmp: C) -> Self {
        Self {
            nodes: vec![Self::new_sentinel()],
            root: Self::sentinel(),
            len: 0,
            cmp,
        }
    }
}

impl<K: Ord, V> Default for OrderedMap<K, V> {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V, C, Ix> OrderedMap<K, V, C, Ix>
where
    C: Compare<K>,
    Ix: IndexType,
{
    /// Insert a key-value pair into the map, returning `true` on success.
    ///
    /// If an equal key is already present the map is left untouched: the
    /// stored value is not updated, the offered value is dropped, and the
    /// method returns `false`.
    ///
    /// # Panics
    ///
    /// This method panics when the tree is at the maximum number of nodes for
    /// its index
    ///
    /// # Example
    /// ```rust
    /// use rb_order_map::OrderedMap;
    ///
    /// let mut map = OrderedMap::new();
    /// assert!(map.insert(10, 1));
    /// assert!(!map.insert(10, 2));
    /// assert_eq!(map.get(&10), Some(&1));
    /// ```
    #[inline]
    pub fn insert(&mut self, key: K, value: V) -> bool {
        let node_idx = NodeIndex::new(self.nodes.len());
        // check for max capacity, except if we use usize
        assert!(
            <Ix as IndexType>::max().index() == !0 || NodeIndex::end() != node_idx,
            "Reached maximum number of nodes"
        );
        self.nodes.push(Self::new_node(key, value));
        self.insert_inner(node_idx)
    }

    /// Remove a key from the map, returning the value at the key if the key
    /// was present.
    ///
    /// Removing an absent key leaves the map untouched.
    ///
    /// # Example
    /// ```rust
    /// use rb_order_map::OrderedMap;
    ///
    /// let mut map = OrderedMap::new();
    /// map.insert(10, 1);
    /// assert_eq!(map.remove(&9), None);
    /// assert_eq!(map.len(), 1);
    /// assert_eq!(map.remove(&10), Some(1));
    /// assert_eq!(map.len(), 0);
    /// ```
    #[inline]
    pub fn remove<Q>(&mut self, key: &Q) -> Option<V>
    where
        Q: ?Sized,
        C: Compare<Q, K>,
    {
        if let Some(node_idx) = self.search_exact(key) {
            self.remove_inner(node_idx);
            // Swap the node with the last node stored in the vector and update indices
            let mut node = self.nodes.swap_remove(node_idx.index());
            let old = NodeIndex::<Ix>::new(self.nodes.len());
            self.update_idx(old, node_idx);

            return node.value.take();
        }
        None
    }

    /// Return a reference to the value corresponding to the key.
    ///
    /// # Example
    /// ```rust
    /// use rb_order_map::OrderedMap;
    ///
    /// let mut map = OrderedMap::new();
    /// map.insert(10, 1);
    /// assert_eq!(map.get(&10), Some(&1));
    /// assert_eq!(map.get(&11), None);
    /// ```
    #[inline]
    pub fn get<Q>(&self, key: &Q) -> Option<&V>
    where
        Q: ?Sized,
        C: Compare<Q, K>,
    {
        self.search_exact(key)
            .map(|idx| self.node_ref(idx, Node::value))
    }

    /// Return a mutable reference to the value corresponding to the key.
    ///
    /// The value may be mutated in place; the key it is filed under never
    /// changes, so the mutation cannot disturb the ordering.
    ///
    /// # Example
    /// ```rust
    /// use rb_order_map::OrderedMap;
    ///
    /// let mut map = OrderedMap::new();
    /// map.insert(3, 0);
    /// map.get_mut(&3).map(|v| *v += 1);
    /// assert_eq!(map.get(&3), Some(&1));
    /// ```
    #[inline]
    pub fn get_mut<Q>(&mut self, key: &Q) -> Option<&mut V>
    where
        Q: ?Sized,
        C: Compare<Q, K>,
    {
        self.search_exact(key)
            .map(|idx| self.node_mut(idx, Node::value_mut))
    }

    /// Check if the map contains the given key.
    #[inline]
    pub fn contains_key<Q>(&self, key: &Q) -> bool
    where
        Q: ?Sized,
        C: Compare<Q, K>,
    {
        self.search_exact(key).is_some()
    }

    /// Locate the first entry whose key is greater than or equal to the given
    /// key, or the limit cursor if every key is smaller.
    ///
    /// # Example
    /// ```rust
    /// use rb_order_map::OrderedMap;
    ///
    /// let mut map = OrderedMap::new();
    /// for k in [0, 2, 4, 6, 8] {
    ///     map.insert(k, ());
    /// }
    /// assert_eq!(*map.find_ge(&3).key(), 4);
    /// assert_eq!(*map.find_ge(&4).key(), 4);
    /// assert!(map.find_ge(&9).is_limit());
    /// ```
    #[inline]
    #[must_use]
    pub fn find_ge<Q>(&self, key: &Q) -> Cursor<'_, K, V, C, Ix>
    where
        Q: ?Sized,
        C: Compare<Q, K>,
    {
        let mut x = self.root;
        let mut best = None;
        while !self.node_ref(x, Node::is_sentinel) {
            match self.cmp.compare(key, self.node_ref(x, Node::key)) {
                Ordering::Equal => return Cursor::at(self, x),
                Ordering::Less => {
                    best = Some(x);
                    x = self.node_ref(x, Node::left);
                }
                Ordering::Greater => x = self.node_ref(x, Node::right),
            }
        }
        match best {
            Some(idx) => Cursor::at(self, idx),
            None => Cursor::limit(self),
        }
    }

    /// Locate the last entry whose key is less than or equal to the given
    /// key, or the negative-limit cursor if every key is greater.
    ///
    /// # Example
    /// ```rust
    /// use rb_order_map::OrderedMap;
    ///
    /// let mut map = OrderedMap::new();
    /// for k in [0, 2, 4, 6, 8] {
    ///     map.insert(k, ());
    /// }
    /// assert_eq!(*map.find_le(&3).key(), 2);
    /// assert_eq!(*map.find_le(&2).key(), 2);
    /// assert!(map.find_le(&-1).is_negative_limit());
    /// ```
    #[inline]
    #[must_use]
    pub fn find_le<Q>(&self, key: &Q) -> Cursor<'_, K, V, C, Ix>
    where
        Q: ?Sized,
        C: Compare<Q, K>,
    {
        let mut x = self.root;
        let mut best = None;
        while !self.node_ref(x, Node::is_sentinel) {
            match self.cmp.compare(key, self.node_ref(x, Node::key)) {
                Ordering::Equal => return Cursor::at(self, x),
                Ordering::Greater => {
                    best = Some(x);
                    x = self.node_ref(x, Node::right);
                }
                Ordering::Less => x = self.node_ref(x, Node::left),
            }
        }
        match best {
            Some(idx) => Cursor::at(self, idx),
            None => Cursor::negative_limit(self),
        }
    }

    /// Return a cursor at the smallest key, or the limit cursor if the map is
    /// empty.
    ///
    /// The empty-map convention makes an ascending scan from `min()`
    /// terminate immediately.
    #[inline]
    #[must_use]
    pub fn min(&self) -> Cursor<'_, K, V, C, Ix> {
        if self.node_ref(self.root, Node::is_sentinel) {
            Cursor::limit(self)
        } else {
            Cursor::at(self, self.tree_minimum(self.root))
        }
    }

    /// Return a cursor at the largest key, or the negative-limit cursor if
    /// the map is empty.
    #[inline]
    #[must_use]
    pub fn max(&self) -> Cursor<'_, K, V, C, Ix> {
        if self.node_ref(self.root, Node::is_sentinel) {
            Cursor::negative_limit(self)
        } else {
            Cursor::at(self, self.tree_maximum(self.root))
        }
    }

    /// Return the canonical "after last" cursor, independent of content.
    #[inline]
    #[must_use]
    pub fn limit(&self) -> Cursor<'_, K, V, C, Ix> {
        Cursor::limit(self)
    }

    /// Return the canonical "before first" cursor, independent of content.
    #[inline]
    #[must_use]
    pub fn negative_limit(&self) -> Cursor<'_, K, V, C, Ix> {
        Cursor::negative_limit(self)
    }

    /// Get an iterator over the entries of the map, sorted by key.
    #[inline]
    #[must_use]
    pub fn iter(&self) -> Iter<'_, K, V, C, Ix> {
        Iter::new(self)
    }

    /// Get the given key's corresponding entry in the map for in-place
    /// manipulation.
    ///
    /// # Example
    /// ```rust
    /// use rb_order_map::{Entry, OrderedMap};
    ///
    /// let mut map = OrderedMap::new();
    ///
    /// assert!(matches!(map.entry(1), Entry::Vacant(_)));
    /// map.entry(1).or_insert(0);
    /// assert!(matches!(map.entry(1), Entry::Occupied(_)));
    /// map.entry(1).and_modify(|v| *v += 1);
    /// assert_eq!(map.get(&1), Some(&1));
    /// ```
    #[inline]
    pub fn entry(&mut self, key: K) -> Entry<'_, K, V, C, Ix> {
        match self.search_exact(&key) {
            Some(node_idx) => Entry::Occupied(OccupiedEntry {
                map_ref: self,
                node_idx,
            }),
            None => Entry::Vacant(VacantEntry { map_ref: self, key }),
        }
    }

    /// Remove all elements from the map
    #[inline]
    pub fn clear(&mut self) {
        self.nodes.clear();
        self.nodes.push(Self::new_sentinel());
        self.root = Self::sentinel();
        self.len = 0;
    }

    /// Return the number of elements in the map.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Return `true` if the map contains no elements.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Return a reference to the map's comparator.
    #[inline]
    #[must_use]
    pub fn cmp(&self) -> &C {
        &self.cmp
    }
}

impl<K, V, C, Ix> OrderedMap<K, V, C, Ix>
where
    Ix: IndexType,
{
    /// Create a new sentinel node
    fn new_sentinel() -> Node<K, V, Ix> {
        Node {
            key: None,
            value: None,
            left: None,
            right: None,
            parent: None,
            color: Color::Black,
        }
    }

    /// Create a new tree node
    fn new_node(key: K, value: V) -> Node<K, V, Ix> {
        Node {
            key: Some(key),
            value: Some(value),
            left: Some(Self::sentinel()),
            right: Some(Self::sentinel()),
            parent: Some(Self::sentinel()),
            color: Color::Red,
        }
    }

    /// Get the sentinel node index
    fn sentinel() -> NodeIndex<Ix> {
        NodeIndex::new(0)
    }
}

impl<K, V, C, Ix> OrderedMap<K, V, C, Ix>
where
    C: Compare<K>,
    Ix: IndexType,
{
    /// Insert a node into the tree.
    ///
    /// The node at `z` was pushed onto the arena but is not linked yet; on a
    /// duplicate key it is popped again and `false` is returned.
    fn insert_inner(&mut self, z: NodeIndex<Ix>) -> bool {
        let mut y = Self::sentinel();
        let mut x = self.root;

        while !self.node_ref(x, Node::is_sentinel) {
            y = x;
            match self
                .cmp
                .compare(self.node_ref(z, Node::key), self.node_ref(x, Node::key))
            {
                Ordering::Equal => {
                    // z is still unlinked
                    let _ignore = self.nodes.pop();
                    return false;
                }
                Ordering::Less => x = self.node_ref(x, Node::left),
                Ordering::Greater => x = self.node_ref(x, Node::right),
            }
        }
        self.node_mut(z, Node::set_parent(y));
        if self.node_ref(y, Node::is_sentinel) {
            self.root = z;
        } else if matches!(
            self.cmp
                .compare(self.node_ref(z, Node::key), self.node_ref(y, Node::key)),
            Ordering::Less
        ) {
            self.node_mut(y, Node::set_left(z));
        } else {
            self.node_mut(y, Node::set_right(z));
        }
        self.node_mut(z, Node::set_color(Color::Red));

        self.insert_fixup(z);

        self.len = self.len.wrapping_add(1);
        true
    }

    /// Remove a node from the tree.
    fn remove_inner(&mut self, z: NodeIndex<Ix>) {
        let mut y = z;
        let mut y_orig_color = self.node_ref(y, Node::color);
        let x;
        if self.left_ref(z, Node::is_sentinel) {
            x = self.node_ref(z, Node::right);
            self.transplant(z, x);
        } else if self.right_ref(z, Node::is_sentinel) {
            x = self.node_ref(z, Node::left);
            self.transplant(z, x);
        } else {
            y = self.tree_minimum(self.node_ref(z, Node::right));
            y_orig_color = self.node_ref(y, Node::color);
            x = self.node_ref(y, Node::right);
            if self.node_ref(y, Node::parent) == z {
                self.node_mut(x, Node::set_parent(y));
            } else {
                self.transplant(y, x);
                self.node_mut(y, Node::set_right(self.node_ref(z, Node::right)));
                self.right_mut(y, Node::set_parent(y));
            }
            self.transplant(z, y);
            self.node_mut(y, Node::set_left(self.node_ref(z, Node::left)));
            self.left_mut(y, Node::set_parent(y));
            self.node_mut(y, Node::set_color(self.node_ref(z, Node::color)));
        }

        if matches!(y_orig_color, Color::Black) {
            self.remove_fixup(x);
        }

        self.len = self.len.wrapping_sub(1);
    }

    /// Search for the node with exactly the given key
    fn search_exact<Q>(&self, key: &Q) -> Option<NodeIndex<Ix>>
    where
        Q: ?Sized,
        C: Compare<Q, K>,
    {
        let mut x = self.root;
        while !self.node_ref(x, Node::is_sentinel) {
            match self.cmp.compare(key, self.node_ref(x, Node::key)) {
                Ordering::Equal => return Some(x),
                Ordering::Less => x = self.node_ref(x, Node::left),
                Ordering::Greater => x = self.node_ref(x, Node::right),
            }
        }
        None
    }

    /// Restore red-black tree properties after an insert.
    fn insert_fixup(&mut self, mut z: NodeIndex<Ix>) {
        while self.parent_ref(z, Node::is_red) {
            if self.grand_parent_ref(z, Node::is_sentinel) {
                break;
            }
            if self.is_left_child(self.node_ref(z, Node::parent)) {
                let y = self.grand_parent_ref(z, Node::right);
                if self.node_ref(y, Node::is_red) {
                    self.parent_mut(z, Node::set_color(Color::Black));
                    self.node_mut(y, Node::set_color(Color::Black));
                    self.grand_parent_mut(z, Node::set_color(Color::Red));
                    z = self.parent_ref(z, Node::parent);
                } else {
                    if self.is_right_child(z) {
                        z = self.node_ref(z, Node::parent);
                        self.left_rotate(z);
                    }
                    self.parent_mut(z, Node::set_color(Color::Black));
                    self.grand_parent_mut(z, Node::set_color(Color::Red));
                    self.right_rotate(self.parent_ref(z, Node::parent));
                }
            } else {
                let y = self.grand_parent_ref(z, Node::left);
                if self.node_ref(y, Node::is_red) {
                    self.parent_mut(z, Node::set_color(Color::Black));
                    self.node_mut(y, Node::set_color(Color::Black));
                    self.grand_parent_mut(z, Node::set_color(Color::Red));
                    z = self.parent_ref(z, Node::parent);
                } else {
                    if self.is_left_child(z) {
                        z = self.node_ref(z, Node::parent);
                        self.right_rotate(z);
                    }
                    self.parent_mut(z, Node::set_color(Color::Black));
                    self.grand_parent_mut(z, Node::set_color(Color::Red));
                    self.left_rotate(self.parent_ref(z, Node::parent));
                }
            }
        }
        self.node_mut(self.root, Node::set_color(Color::Black));
    }

    /// Restore red-black tree properties after a remove.
    fn remove_fixup(&mut self, mut x: NodeIndex<Ix>) {
        while x != self.root && self.node_ref(x, Node::is_black) {
            let mut w;
            if self.is_left_child(x) {
                w = self.parent_ref(x, Node::right);
                if self.node_ref(w, Node::is_red) {
                    self.node_mut(w, Node::set_color(Color::Black));
                    self.parent_mut(x, Node::set_color(Color::Red));
                    self.left_rotate(self.node_ref(x, Node::parent));
                    w = self.parent_ref(x, Node::right);
                }
                if self.node_ref(w, Node::is_sentinel) {
                    break;
                }
                if self.left_ref(w, Node::is_black) && self.right_ref(w, Node::is_black) {
                    self.node_mut(w, Node::set_color(Color::Red));
                    x = self.node_ref(x, Node::parent);
                } else {
                    if self.right_ref(w, Node::is_black) {
                        self.left_mut(w, Node::set_color(Color::Black));
                        self.node_mut(w, Node::set_color(Color::Red));
                        self.right_rotate(w);
                        w = self.parent_ref(x, Node::right);
                    }
                    self.node_mut(w, Node::set_color(self.parent_ref(x, Node::color)));
                    self.parent_mut(x, Node::set_color(Color::Black));
                    self.right_mut(w, Node::set_color(Color::Black));
                    self.left_rotate(self.node_ref(x, Node::parent));
                    x = self.root;
                }
            } else {
                w = self.parent_ref(x, Node::left);
                if self.node_ref(w, Node::is_red) {
                    self.node_mut(w, Node::set_color(Color::Black));
                    self.parent_mut(x, Node::set_color(Color::Red));
                    self.right_rotate(self.node_ref(x, Node::parent));
                    w = self.parent_ref(x, Node::left);
                }
                if self.node_ref(w, Node::is_sentinel) {
                    break;
                }
                if self.right_ref(w, Node::is_black) && self.left_ref(w, Node::is_black) {
                    self.node_mut(w, Node::set_color(Color::Red));
                    x = self.node_ref(x, Node::parent);
                } else {
                    if self.left_ref(w, Node::is_black) {
                        self.right_mut(w, Node::set_color(Color::Black));
                        self.node_mut(w, Node::set_color(Color::Red));
                        self.left_rotate(w);
                        w = self.parent_ref(x, Node::left);
                    }
                    self.node_mut(w, Node::set_color(self.parent_ref(x, Node::color)));
                    self.parent_mut(x, Node::set_color(Color::Black));
                    self.left_mut(w, Node::set_color(Color::Black));
                    self.right_rotate(self.node_ref(x, Node::parent));
                    x = self.root;
                }
            }
        }
        self.node_mut(x, Node::set_color(Color::Black));
    }

    /// Binary tree left rotate.
    fn left_rotate(&mut self, x: NodeIndex<Ix>) {
        if self.right_ref(x, Node::is_sentinel) {
            return;
        }
        let y = self.node_ref(x, Node::right);
        self.node_mut(x, Node::set_right(self.node_ref(y, Node::left)));
        if !self.left_ref(y, Node::is_sentinel) {
            self.left_mut(y, Node::set_parent(x));
        }

        self.replace_parent(x, y);
        self.node_mut(y, Node::set_left(x));
    }

    /// Binary tree right rotate.
    fn right_rotate(&mut self, x: NodeIndex<Ix>) {
        if self.left_ref(x, Node::is_sentinel) {
            return;
        }
        let y = self.node_ref(x, Node::left);
        self.node_mut(x, Node::set_left(self.node_ref(y, Node::right)));
        if !self.right_ref(y, Node::is_sentinel) {
            self.right_mut(y, Node::set_parent(x));
        }

        self.replace_parent(x, y);
        self.node_mut(y, Node::set_right(x));
    }

    /// Replace parent during a rotation.
    fn replace_parent(&mut self, x: NodeIndex<Ix>, y: NodeIndex<Ix>) {
        self.node_mut(y, Node::set_parent(self.node_ref(x, Node::parent)));
        if self.parent_ref(x, Node::is_sentinel) {
            self.root = y;
        } else if self.is_left_child(x) {
            self.parent_mut(x, Node::set_left(y));
        } else {
            self.parent_mut(x, Node::set_right(y));
        }
        self.node_mut(x, Node::set_parent(y));
    }

    /// Replace one subtree as a child of its parent with another subtree.
    fn transplant(&mut self, u: NodeIndex<Ix>, v: NodeIndex<Ix>) {
        if self.parent_ref(u, Node::is_sentinel) {
            self.root = v;
        } else if self.is_left_child(u) {
            self.parent_mut(u, Node::set_left(v));
        } else {
            self.parent_mut(u, Node::set_right(v));
        }
        self.node_mut(v, Node::set_parent(self.node_ref(u, Node::parent)));
    }

    /// Check if a node is a left child of its parent.
    fn is_left_child(&self, node: NodeIndex<Ix>) -> bool {
        self.parent_ref(node, Node::left) == node
    }

    /// Check if a node is a right child of its parent.
    fn is_right_child(&self, node: NodeIndex<Ix>) -> bool {
        self.parent_ref(node, Node::right) == node
    }

    /// Update nodes indices after remove
    ///
    /// The node that used to live at `old` was moved to `new` by
    /// `swap_remove`; every reference to `old` (root, the parent's child
    /// link, the children's parent links) is repointed.
    fn update_idx(&mut self, old: NodeIndex<Ix>, new: NodeIndex<Ix>) {
        if self.root == old {
            self.root = new;
        }
        if self.nodes.get(new.index()).is_some() {
            if !self.parent_ref(new, Node::is_sentinel) {
                if self.parent_ref(new, Node::left) == old {
                    self.parent_mut(new, Node::set_left(new));
                } else {
                    self.parent_mut(new, Node::set_right(new));
                }
            }
            self.left_mut(new, Node::set_parent(new));
            self.right_mut(new, Node::set_parent(new));
        }
    }
}

// Convenient methods for reference or mutate current/parent/left/right node
impl<'a, K, V, C, Ix> OrderedMap<K, V, C, Ix>
where
    Ix: IndexType,
{
    pub(crate) fn node_ref<F, R>(&'a self, node: NodeIndex<Ix>, op: F) -> R
    where
        R: 'a,
        F: FnOnce(&'a Node<K, V, Ix>) -> R,
    {
        op(&self.nodes[node.index()])
    }

    pub(crate) fn node_mut<F, R>(&'a mut self, node: NodeIndex<Ix>, op: F) -> R
    where
        R: 'a,
        F: FnOnce(&'a mut Node<K, V, Ix>) -> R,
    {
        op(&mut self.nodes[node.index()])
    }

    fn left_ref<F, R>(&'a self, node: NodeIndex<Ix>, op: F) -> R
    where
        R: 'a,
        F: FnOnce(&'a Node<K, V, Ix>) -> R,
    {
        let idx = self.nodes[node.index()].left().index();
        op(&self.nodes[idx])
    }

    fn right_ref<F, R>(&'a self, node: NodeIndex<Ix>, op: F) -> R
    where
        R: 'a,
        F: FnOnce(&'a Node<K, V, Ix>) -> R,
    {
        let idx = self.nodes[node.index()].right().index();
        op(&self.nodes[idx])
    }

    fn parent_ref<F, R>(&'a self, node: NodeIndex<Ix>, op: F) -> R
    where
        R: 'a,
        F: FnOnce(&'a Node<K, V, Ix>) -> R,
    {
        let idx = self.nodes[node.index()].parent().index();
        op(&self.nodes[idx])
    }

    fn grand_parent_ref<F, R>(&'a self, node: NodeIndex<Ix>, op: F) -> R
    where
        R: 'a,
        F: FnOnce(&'a Node<K, V, Ix>) -> R,
    {
        let parent_idx = self.nodes[node.index()].parent().index();
        let grand_parent_idx = self.nodes[parent_idx].parent().index();
        op(&self.nodes[grand_parent_idx])
    }

    fn left_mut<F, R>(&'a mut self, node: NodeIndex<Ix>, op: F) -> R
    where
        R: 'a,
        F: FnOnce(&'a mut Node<K, V, Ix>) -> R,
    {
        let idx = self.nodes[node.index()].left().index();
        op(&mut self.nodes[idx])
    }

    fn right_mut<F, R>(&'a mut self, node: NodeIndex<Ix>, op: F) -> R
    where
        R: 'a,
        F: FnOnce(&'a mut Node<K, V, Ix>) -> R,
    {
        let idx = self.nodes[node.index()].right().index();
        op(&mut self.nodes[idx])
    }

    fn parent_mut<F, R>(&'a mut self, node: NodeIndex<Ix>, op: F) -> R
    where
        R: 'a,
        F: FnOnce(&'a mut Node<K, V, Ix>) -> R,
    {
        let idx = self.nodes[node.index()].parent().index();
        op(&mut self.nodes[idx])
    }

    fn grand_parent_mut<F, R>(&'a mut self, node: NodeIndex<Ix>, op: F) -> R
    where
        R: 'a,
        F: FnOnce(&'a mut Node<K, V, Ix>) -> R,
    {
        let parent_idx = self.nodes[node.index()].parent().index();
        let grand_parent_idx = self.nodes[parent_idx].parent().index();
        op(&mut self.nodes[grand_parent_idx])
    }
}

// Traversal primitives shared by cursors and iterators
impl<K, V, C, Ix> OrderedMap<K, V, C, Ix>
where
    Ix: IndexType,
{
    /// Find the node with the minimum key of the subtree rooted at `x`.
    pub(crate) fn tree_minimum(&self, mut x: NodeIndex<Ix>) -> NodeIndex<Ix> {
        while !self.left_ref(x, Node::is_sentinel) {
            x = self.node_ref(x, Node::left);
        }
        x
    }

    /// Find the node with the maximum key of the subtree rooted at `x`.
    pub(crate) fn tree_maximum(&self, mut x: NodeIndex<Ix>) -> NodeIndex<Ix> {
        while !self.right_ref(x, Node::is_sentinel) {
            x = self.node_ref(x, Node::right);
        }
        x
    }

    /// In-order successor of `x`, or `None` if `x` holds the maximum key.
    ///
    /// Descends into the right subtree when it exists, otherwise climbs
    /// parent links until the climb arrives via a left-child edge.
    pub(crate) fn successor(&self, x: NodeIndex<Ix>) -> Option<NodeIndex<Ix>> {
        if !self.right_ref(x, Node::is_sentinel) {
            return Some(self.tree_minimum(self.node_ref(x, Node::right)));
        }
        let mut c = x;
        let mut p = self.node_ref(x, Node::parent);
        while !self.node_ref(p, Node::is_sentinel) && self.node_ref(p, Node::right) == c {
            c = p;
            p = self.node_ref(p, Node::parent);
        }
        (!self.node_ref(p, Node::is_sentinel)).then_some(p)
    }

    /// In-order predecessor of `x`, or `None` if `x` holds the minimum key.
    pub(crate) fn predecessor(&self, x: NodeIndex<Ix>) -> Option<NodeIndex<Ix>> {
        if !self.left_ref(x, Node::is_sentinel) {
            return Some(self.tree_maximum(self.node_ref(x, Node::left)));
        }
        let mut c = x;
        let mut p = self.node_ref(x, Node::parent);
        while !self.node_ref(p, Node::is_sentinel) && self.node_ref(p, Node::left) == c {
            c = p;
            p = self.node_ref(p, Node::parent);
        }
        (!self.node_ref(p, Node::is_sentinel)).then_some(p)
    }

    /// Cursor position of the smallest node, shared by `min` and cursor
    /// navigation off the negative limit.
    pub(crate) fn first_pos(&self) -> Pos<Ix> {
        if self.node_ref(self.root, Node::is_sentinel) {
            Pos::Limit
        } else {
            Pos::Node(self.tree_minimum(self.root))
        }
    }

    /// Cursor position of the largest node, shared by `max` and cursor
    /// navigation off the limit.
    pub(crate) fn last_pos(&self) -> Pos<Ix> {
        if self.node_ref(self.root, Node::is_sentinel) {
            Pos::NegativeLimit
        } else {
            Pos::Node(self.tree_maximum(self.root))
        }
    }
}

impl<K, V, C, Ix> fmt::Debug for OrderedMap<K, V, C, Ix>
where
    K: fmt::Debug,
    V: fmt::Debug,
    Ix: IndexType,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(Iter::new(self)).finish()
    }
}

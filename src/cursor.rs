use std::fmt;
use std::ptr;

use compare::Natural;

use crate::index::{DefaultIx, IndexType, NodeIndex};
use crate::node::Node;
use crate::orderedmap::OrderedMap;

/// Position of a cursor inside the key order.
///
/// The two boundary tags keep "before the first entry" and "after the last
/// entry" distinct even though neither names a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Pos<Ix> {
    /// At the node with this index
    Node(NodeIndex<Ix>),
    /// Before the first entry
    NegativeLimit,
    /// After the last entry
    Limit,
}

/// An immutable cursor over the entries of an [`OrderedMap`].
///
/// A cursor either references one entry of the map or sits at one of the two
/// boundary positions. Navigation never mutates the receiver; [`next`] and
/// [`prev`] return new cursors, so any number of independent cursors may walk
/// one map at the same time. Cursors borrow the map, which rules out
/// structural mutation while any cursor is alive; re-derive cursors through
/// [`OrderedMap::find_ge`]/[`OrderedMap::find_le`] after mutating.
///
/// Two cursors compare equal when they reference the same entry of the same
/// map, or the same boundary of the same map.
///
/// [`next`]: Cursor::next
/// [`prev`]: Cursor::prev
///
/// # Example
/// ```rust
/// use rb_order_map::OrderedMap;
///
/// let mut map = OrderedMap::new();
/// for k in [0, 2, 4, 6, 8] {
///     map.insert(k, ());
/// }
/// let mut keys = vec![];
/// let mut c = map.find_ge(&3);
/// while !c.is_limit() {
///     keys.push(*c.key());
///     c = c.next();
/// }
/// assert_eq!(keys, [4, 6, 8]);
/// ```
pub struct Cursor<'a, K, V, C = Natural<K>, Ix = DefaultIx> {
    /// Reference to the map
    pub(crate) map: &'a OrderedMap<K, V, C, Ix>,
    /// Position inside the key order
    pub(crate) pos: Pos<Ix>,
}

impl<'a, K, V, C, Ix> Cursor<'a, K, V, C, Ix>
where
    Ix: IndexType,
{
    pub(crate) fn at(map: &'a OrderedMap<K, V, C, Ix>, node: NodeIndex<Ix>) -> Self {
        Cursor {
            map,
            pos: Pos::Node(node),
        }
    }

    pub(crate) fn limit(map: &'a OrderedMap<K, V, C, Ix>) -> Self {
        Cursor {
            map,
            pos: Pos::Limit,
        }
    }

    pub(crate) fn negative_limit(map: &'a OrderedMap<K, V, C, Ix>) -> Self {
        Cursor {
            map,
            pos: Pos::NegativeLimit,
        }
    }

    /// Return `true` if the cursor is after the last entry.
    #[inline]
    #[must_use]
    pub fn is_limit(&self) -> bool {
        matches!(self.pos, Pos::Limit)
    }

    /// Return `true` if the cursor is before the first entry.
    #[inline]
    #[must_use]
    pub fn is_negative_limit(&self) -> bool {
        matches!(self.pos, Pos::NegativeLimit)
    }

    /// Return the referenced entry.
    ///
    /// # Panics
    ///
    /// This method panics when the cursor is at a boundary
    #[inline]
    #[must_use]
    pub fn item(&self) -> (&'a K, &'a V) {
        self.map.node_ref(self.node_idx(), |n| (n.key(), n.value()))
    }

    /// Return the referenced entry's key.
    ///
    /// # Panics
    ///
    /// This method panics when the cursor is at a boundary
    #[inline]
    #[must_use]
    pub fn key(&self) -> &'a K {
        self.map.node_ref(self.node_idx(), Node::key)
    }

    /// Return the referenced entry's value.
    ///
    /// # Panics
    ///
    /// This method panics when the cursor is at a boundary
    #[inline]
    #[must_use]
    pub fn value(&self) -> &'a V {
        self.map.node_ref(self.node_idx(), Node::value)
    }

    /// Advance to the in-order successor.
    ///
    /// From the entry with the maximum key this yields the limit cursor;
    /// from the negative limit it yields the minimum entry (or the limit
    /// cursor on an empty map), so a scan may be pre-positioned one step
    /// before its first element. Advancing past the limit clamps there.
    #[inline]
    #[must_use]
    pub fn next(self) -> Self {
        let pos = match self.pos {
            Pos::Node(idx) => match self.map.successor(idx) {
                Some(s) => Pos::Node(s),
                None => Pos::Limit,
            },
            Pos::NegativeLimit => self.map.first_pos(),
            Pos::Limit => Pos::Limit,
        };
        Cursor { map: self.map, pos }
    }

    /// Step back to the in-order predecessor.
    ///
    /// The mirror of [`next`](Cursor::next): from the minimum entry this
    /// yields the negative-limit cursor, from the limit it yields the
    /// maximum entry (or the negative limit on an empty map), and stepping
    /// back past the negative limit clamps there.
    #[inline]
    #[must_use]
    pub fn prev(self) -> Self {
        let pos = match self.pos {
            Pos::Node(idx) => match self.map.predecessor(idx) {
                Some(p) => Pos::Node(p),
                None => Pos::NegativeLimit,
            },
            Pos::Limit => self.map.last_pos(),
            Pos::NegativeLimit => Pos::NegativeLimit,
        };
        Cursor { map: self.map, pos }
    }

    fn node_idx(&self) -> NodeIndex<Ix> {
        match self.pos {
            Pos::Node(idx) => idx,
            Pos::NegativeLimit | Pos::Limit => panic!("cursor at a boundary has no item"),
        }
    }
}

impl<K, V, C, Ix> Clone for Cursor<'_, K, V, C, Ix>
where
    Ix: IndexType,
{
    #[inline]
    fn clone(&self) -> Self {
        *self
    }
}

impl<K, V, C, Ix> Copy for Cursor<'_, K, V, C, Ix> where Ix: IndexType {}

impl<K, V, C, Ix> PartialEq for Cursor<'_, K, V, C, Ix>
where
    Ix: IndexType,
{
    #[inline]
    fn eq(&self, other: &Self) -> bool {
        ptr::eq(self.map, other.map) && self.pos == other.pos
    }
}

impl<K, V, C, Ix> Eq for Cursor<'_, K, V, C, Ix> where Ix: IndexType {}

impl<K, V, C, Ix> fmt::Debug for Cursor<'_, K, V, C, Ix>
where
    K: fmt::Debug,
    Ix: IndexType,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.pos {
            Pos::Node(idx) => f
                .debug_tuple("Cursor")
                .field(self.map.node_ref(idx, Node::key))
                .finish(),
            Pos::NegativeLimit => f.write_str("Cursor(NegativeLimit)"),
            Pos::Limit => f.write_str("Cursor(Limit)"),
        }
    }
}

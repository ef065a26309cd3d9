use std::fmt;

use crate::index::{IndexType, NodeIndex};
use crate::node::Node;
use crate::orderedmap::OrderedMap;

/// Pushes a link of nodes on the left to stack.
fn left_link<K, V, C, Ix>(
    map_ref: &OrderedMap<K, V, C, Ix>,
    mut x: NodeIndex<Ix>,
) -> Vec<NodeIndex<Ix>>
where
    Ix: IndexType,
{
    let mut nodes = vec![];
    while !map_ref.node_ref(x, Node::is_sentinel) {
        nodes.push(x);
        x = map_ref.node_ref(x, Node::left);
    }
    nodes
}

/// An iterator over the entries of an `OrderedMap`, sorted by key.
pub struct Iter<'a, K, V, C, Ix> {
    /// Reference to the map
    map_ref: &'a OrderedMap<K, V, C, Ix>,
    /// Stack for iteration
    stack: Vec<NodeIndex<Ix>>,
}

impl<'a, K, V, C, Ix> Iter<'a, K, V, C, Ix>
where
    Ix: IndexType,
{
    pub(crate) fn new(map_ref: &'a OrderedMap<K, V, C, Ix>) -> Self {
        Iter {
            map_ref,
            stack: left_link(map_ref, map_ref.root),
        }
    }
}

impl<'a, K, V, C, Ix> Iterator for Iter<'a, K, V, C, Ix>
where
    Ix: IndexType,
{
    type Item = (&'a K, &'a V);

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        let x = self.stack.pop()?;
        self.stack.extend(left_link(
            self.map_ref,
            self.map_ref.node_ref(x, Node::right),
        ));
        Some(self.map_ref.node_ref(x, |xn| (xn.key(), xn.value())))
    }
}

impl<K, V, C, Ix> fmt::Debug for Iter<'_, K, V, C, Ix>
where
    K: fmt::Debug,
    V: fmt::Debug,
    Ix: IndexType,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let remaining = Iter {
            map_ref: self.map_ref,
            stack: self.stack.clone(),
        };
        f.debug_list().entries(remaining).finish()
    }
}

/// An owning iterator over the entries of an `OrderedMap`, sorted by key.
pub struct IntoIter<K, V, C, Ix> {
    map: OrderedMap<K, V, C, Ix>,
    /// Stack for iteration
    stack: Vec<NodeIndex<Ix>>,
}

impl<K, V, C, Ix> IntoIter<K, V, C, Ix>
where
    Ix: IndexType,
{
    pub(crate) fn new(map: OrderedMap<K, V, C, Ix>) -> Self {
        let stack = left_link(&map, map.root);
        IntoIter { map, stack }
    }
}

impl<K, V, C, Ix> Iterator for IntoIter<K, V, C, Ix>
where
    Ix: IndexType,
{
    type Item = (K, V);

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        let x = self.stack.pop()?;
        self.stack
            .extend(left_link(&self.map, self.map.node_ref(x, Node::right)));
        let node = &mut self.map.nodes[x.index()];
        Some((node.key.take().unwrap(), node.value.take().unwrap()))
    }
}

impl<K, V, C, Ix> fmt::Debug for IntoIter<K, V, C, Ix>
where
    Ix: IndexType,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IntoIter").finish_non_exhaustive()
    }
}

impl<'a, K, V, C, Ix> IntoIterator for &'a OrderedMap<K, V, C, Ix>
where
    Ix: IndexType,
{
    type Item = (&'a K, &'a V);
    type IntoIter = Iter<'a, K, V, C, Ix>;

    #[inline]
    fn into_iter(self) -> Self::IntoIter {
        Iter::new(self)
    }
}

impl<K, V, C, Ix> IntoIterator for OrderedMap<K, V, C, Ix>
where
    Ix: IndexType,
{
    type Item = (K, V);
    type IntoIter = IntoIter<K, V, C, Ix>;

    #[inline]
    fn into_iter(self) -> Self::IntoIter {
        IntoIter::new(self)
    }
}

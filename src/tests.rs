use std::collections::HashSet;

use compare::{natural, Compare};
use rand::{rngs::StdRng, Rng, SeedableRng};

use crate::index::NodeIndex;
use crate::node::Node;

use super::*;

struct KeyGenerator {
    rng: StdRng,
    unique: HashSet<i32>,
    limit: i32,
}

impl KeyGenerator {
    fn new(seed: [u8; 32]) -> Self {
        const LIMIT: i32 = 1000;
        Self {
            rng: SeedableRng::from_seed(seed),
            unique: HashSet::new(),
            limit: LIMIT,
        }
    }

    fn next(&mut self) -> i32 {
        self.rng.gen_range(0..self.limit)
    }

    fn next_unique(&mut self) -> i32 {
        let mut key = self.next();
        while self.unique.contains(&key) {
            key = self.next();
        }
        self.unique.insert(key);
        key
    }
}

impl<V> OrderedMap<i32, V> {
    /// 1. Every node is either red or black.
    /// 2. The root is black.
    /// 3. Every leaf (NIL) is black.
    /// 4. If a node is red, then both its children are black.
    /// 5. For each node, all simple paths from the node to descendant leaves
    ///    contain the same number of black nodes.
    fn check_rb_properties(&self) {
        assert!(self.node_ref(self.root, Node::is_black));
        self.check_children_color(self.root);
        self.check_black_height(self.root);
    }

    fn check_children_color(&self, x: NodeIndex<u32>) {
        if self.node_ref(x, Node::is_sentinel) {
            return;
        }
        self.check_children_color(self.node_ref(x, Node::left));
        self.check_children_color(self.node_ref(x, Node::right));
        if self.node_ref(x, Node::is_red) {
            assert!(self.node_ref(self.node_ref(x, Node::left), Node::is_black));
            assert!(self.node_ref(self.node_ref(x, Node::right), Node::is_black));
        }
    }

    fn check_black_height(&self, x: NodeIndex<u32>) -> usize {
        if self.node_ref(x, Node::is_sentinel) {
            return 0;
        }
        let lefth = self.check_black_height(self.node_ref(x, Node::left));
        let righth = self.check_black_height(self.node_ref(x, Node::right));
        assert_eq!(lefth, righth);
        if self.node_ref(x, Node::is_black) {
            return lefth + 1;
        }
        lefth
    }
}

fn with_map_and_generator<V>(test_fn: impl Fn(OrderedMap<i32, V>, KeyGenerator)) {
    let seeds = vec![[0; 32], [1; 32], [2; 32]];
    for seed in seeds {
        let gen = KeyGenerator::new(seed);
        let map = OrderedMap::new();
        test_fn(map, gen);
    }
}

/// Keys visited walking forward until the limit.
fn ascending_from<V>(mut cursor: Cursor<'_, i32, V>) -> Vec<i32> {
    let mut keys = vec![];
    while !cursor.is_limit() {
        keys.push(*cursor.key());
        cursor = cursor.next();
    }
    keys
}

/// Keys visited walking backward until the negative limit.
fn descending_from<V>(mut cursor: Cursor<'_, i32, V>) -> Vec<i32> {
    let mut keys = vec![];
    while !cursor.is_negative_limit() {
        keys.push(*cursor.key());
        cursor = cursor.prev();
    }
    keys
}

#[test]
fn empty_map_boundary_conventions() {
    let map = OrderedMap::<i32, i32>::new();
    assert_eq!(map.len(), 0);
    assert!(map.is_empty());
    assert!(map.max().is_negative_limit());
    assert!(map.min().is_limit());
    assert!(map.find_ge(&10).is_limit());
    assert!(map.find_le(&10).is_negative_limit());
    assert_eq!(map.get(&10), None);
    assert!(map.limit() == map.min());
}

#[test]
fn find_ge_on_single_key() {
    let mut map = OrderedMap::new();
    assert!(map.insert(10, 10));
    assert!(!map.insert(10, 10));
    assert_eq!(map.len(), 1);
    assert_eq!(*map.find_ge(&10).key(), 10);
    assert!(map.find_ge(&11).is_limit());
    assert_eq!(*map.find_ge(&9).key(), 10);
}

#[test]
fn find_le_on_single_key() {
    let mut map = OrderedMap::new();
    assert!(map.insert(10, 10));
    assert_eq!(*map.find_le(&10).key(), 10);
    assert_eq!(*map.find_le(&11).key(), 10);
    assert!(map.find_le(&9).is_negative_limit());
}

#[test]
fn get_is_exact() {
    let mut map = OrderedMap::new();
    assert!(map.insert(10, 10));
    assert_eq!(map.get(&10), Some(&10));
    assert_eq!(map.get(&9), None);
    assert_eq!(map.get(&11), None);
}

#[test]
fn insert_rejects_duplicate_key() {
    let mut map = OrderedMap::new();
    assert!(map.insert(10, 1));
    assert!(!map.insert(10, 2));
    assert_eq!(map.len(), 1);
    // the stored value is left untouched
    assert_eq!(map.get(&10), Some(&1));
}

#[test]
fn remove_missing_key_is_noop() {
    let mut map = OrderedMap::new();
    assert_eq!(map.remove(&10), None);
    assert_eq!(map.len(), 0);
    assert!(map.insert(10, 10));
    assert_eq!(map.remove(&10), Some(10));
    assert_eq!(map.len(), 0);

    // remove used to delete the seek successor when the key was absent,
    // ensure this does not regress
    assert!(map.insert(10, 10));
    assert_eq!(map.remove(&9), None);
    assert_eq!(map.len(), 1);
    assert_eq!(map.get(&10), Some(&10));
}

#[test]
fn seek_then_scan_matches_reference() {
    let mut map = OrderedMap::new();
    for k in (0..10).step_by(2) {
        map.insert(k, k);
    }
    assert_eq!(ascending_from(map.find_ge(&3)), [4, 6, 8]);
    assert_eq!(ascending_from(map.find_ge(&4)), [4, 6, 8]);
    assert_eq!(ascending_from(map.find_ge(&8)), [8]);
    assert!(ascending_from(map.find_ge(&9)).is_empty());

    assert_eq!(descending_from(map.find_le(&3)), [2, 0]);
    assert_eq!(descending_from(map.find_le(&2)), [2, 0]);
    assert_eq!(descending_from(map.find_le(&0)), [0]);
    assert!(descending_from(map.find_le(&-1)).is_empty());
}

#[test]
fn boundary_cursors_preposition_scans() {
    let mut map = OrderedMap::new();
    map.insert(1, ());
    map.insert(2, ());
    assert!(map.negative_limit().next() == map.min());
    assert!(map.limit().prev() == map.max());
    // walking past a boundary clamps there
    assert!(map.limit().next().is_limit());
    assert!(map.negative_limit().prev().is_negative_limit());

    let empty = OrderedMap::<i32, ()>::new();
    assert!(empty.negative_limit().next().is_limit());
    assert!(empty.limit().prev().is_negative_limit());
}

#[test]
fn single_key_boundary_symmetry() {
    let mut map = OrderedMap::new();
    map.insert(5, ());
    assert!(map.find_ge(&5) == map.find_le(&5));
    assert_eq!(*map.find_ge(&5).key(), 5);
    assert!(map.find_ge(&6).is_limit());
    assert!(map.find_le(&4).is_negative_limit());
}

#[test]
fn cursor_equality_is_per_map() {
    let mut a = OrderedMap::new();
    let mut b = OrderedMap::new();
    a.insert(1, ());
    b.insert(1, ());
    assert!(a.min() == a.find_le(&1));
    assert!(a.min() != b.min());
    assert!(a.limit() != b.limit());
}

#[test]
fn map_len_will_update() {
    with_map_and_generator(|mut map, mut gen| {
        let keys: Vec<_> = std::iter::repeat_with(|| gen.next_unique())
            .take(100)
            .collect();
        for k in keys.clone() {
            let _ignore = map.insert(k, ());
        }
        assert_eq!(map.len(), 100);
        for k in keys {
            let _ignore = map.remove(&k);
        }
        assert_eq!(map.len(), 0);
    });
}

#[test]
fn red_black_properties_are_preserved() {
    with_map_and_generator(|mut map, mut gen| {
        let keys: Vec<_> = std::iter::repeat_with(|| gen.next_unique())
            .take(1000)
            .collect();
        for k in keys.clone() {
            let _ignore = map.insert(k, ());
        }
        map.check_rb_properties();
        for k in &keys[..500] {
            let _ignore = map.remove(k);
            map.check_rb_properties();
        }
        for k in &keys[500..] {
            let _ignore = map.remove(k);
        }
        map.check_rb_properties();
        assert!(map.is_empty());
    });
}

#[test]
fn iterate_through_map_is_sorted() {
    with_map_and_generator(|mut map, mut gen| {
        let mut keys: Vec<_> = std::iter::repeat_with(|| gen.next_unique())
            .enumerate()
            .take(1000)
            .collect();
        for (v, k) in keys.clone() {
            let _ignore = map.insert(k, v);
        }
        keys.sort_unstable_by_key(|&(_, k)| k);

        for ((ek, ev), (v, k)) in map.iter().zip(keys.iter()) {
            assert_eq!(ek, k);
            assert_eq!(ev, v);
        }
    });
}

#[test]
fn descending_scan_mirrors_ascending() {
    with_map_and_generator(|mut map: OrderedMap<i32, ()>, mut gen| {
        for _ in 0..500 {
            let _ignore = map.insert(gen.next_unique(), ());
        }
        let forward: Vec<_> = map.iter().map(|(k, _)| *k).collect();
        assert!(forward.windows(2).all(|w| w[0] < w[1]));
        assert_eq!(forward, ascending_from(map.min()));

        let mut backward = descending_from(map.max());
        backward.reverse();
        assert_eq!(backward, forward);
    });
}

#[test]
fn get_mut_updates_value_in_place() {
    let mut map = OrderedMap::new();
    map.insert(3, 0);
    if let Some(v) = map.get_mut(&3) {
        *v += 7;
    }
    assert_eq!(map.get(&3), Some(&7));
    assert_eq!(map.get_mut(&4), None);
}

#[test]
fn reversed_comparator_reverses_traversal() {
    let mut map = OrderedMap::with_cmp(natural().rev());
    assert!(map.insert(1, "a"));
    assert!(map.insert(3, "c"));
    assert!(map.insert(2, "b"));
    let keys: Vec<_> = map.iter().map(|(k, _)| *k).collect();
    assert_eq!(keys, [3, 2, 1]);
    assert_eq!(*map.min().key(), 3);
    assert_eq!(*map.max().key(), 1);
    assert_eq!(*map.find_ge(&2).key(), 2);
    assert_eq!(*map.find_le(&2).key(), 2);
    // under the reversed order "greater or equal" walks toward smaller keys
    assert_eq!(*map.find_ge(&5).key(), 3);
    assert!(map.find_ge(&0).is_limit());
}

#[test]
fn entry_counts_occurrences() {
    let mut counts = OrderedMap::new();
    for word in ["a", "b", "a", "c", "a", "b"] {
        *counts.entry(word).or_insert(0) += 1;
    }
    assert_eq!(counts.get(&"a"), Some(&3));
    assert_eq!(counts.get(&"b"), Some(&2));
    assert_eq!(counts.get(&"c"), Some(&1));
}

#[test]
fn into_iter_yields_owned_entries_in_order() {
    let mut map = OrderedMap::new();
    for k in [2, 0, 3, 1] {
        map.insert(k, k * 10);
    }
    let entries: Vec<_> = map.into_iter().collect();
    assert_eq!(entries, [(0, 0), (1, 10), (2, 20), (3, 30)]);
}

#[test]
fn ordered_map_clear_is_ok() {
    let mut map = OrderedMap::new();
    map.insert(1, 1);
    map.insert(2, 2);
    map.insert(6, 3);
    assert_eq!(map.len(), 3);
    map.clear();
    assert_eq!(map.len(), 0);
    assert!(map.is_empty());
    assert_eq!(map.nodes.len(), 1);
    assert!(map.nodes[0].is_sentinel());
}

//
// Randomized comparison against a sorted-array oracle
//

fn oracle_find_ge(data: &[i32], key: i32) -> isize {
    data.iter()
        .position(|&k| k >= key)
        .map_or(data.len() as isize, |i| i as isize)
}

fn oracle_find_le(data: &[i32], key: i32) -> isize {
    data.iter()
        .rposition(|&k| k <= key)
        .map_or(-1, |i| i as isize)
}

/// Walk the cursor forward to the limit and backward to the negative limit,
/// checking every step against the oracle position.
fn compare_contents(data: &[i32], pos: isize, cursor: Cursor<'_, i32, i32>) {
    let len = data.len() as isize;

    let (mut i, mut c) = (pos, cursor);
    assert_eq!(i < 0, c.is_negative_limit());
    if i < 0 {
        i += 1;
        c = c.next();
    }
    while i < len && !c.is_limit() {
        assert_eq!(*c.key(), data[i as usize]);
        i += 1;
        c = c.next();
    }
    assert!(c.is_limit());
    assert_eq!(i, len);

    let (mut i, mut c) = (pos, cursor);
    assert_eq!(i >= len, c.is_limit());
    if i >= len {
        i -= 1;
        c = c.prev();
    }
    while i >= 0 && !c.is_negative_limit() {
        assert_eq!(*c.key(), data[i as usize]);
        i -= 1;
        c = c.prev();
    }
    assert!(c.is_negative_limit());
    assert_eq!(i, -1);
}

#[test]
fn randomized_ops_match_sorted_oracle() {
    const NUM_KEYS: i32 = 1000;

    let mut rng = StdRng::from_seed([0; 32]);
    let mut data: Vec<i32> = Vec::new();
    let mut map = OrderedMap::new();
    for round in 0..10_000 {
        let op = rng.gen_range(0..100);
        if op < 50 {
            let key = rng.gen_range(0..NUM_KEYS);
            let expect = !data.contains(&key);
            assert_eq!(map.insert(key, key), expect);
            if expect {
                let at = data.partition_point(|&k| k < key);
                data.insert(at, key);
            }
            compare_contents(&data, oracle_find_ge(&data, -1), map.find_ge(&-1));
        } else if op < 90 && !data.is_empty() {
            let key = data[rng.gen_range(0..data.len())];
            assert_eq!(map.remove(&key), Some(key));
            let at = data.binary_search(&key).unwrap();
            data.remove(at);
            compare_contents(&data, oracle_find_ge(&data, -1), map.find_ge(&-1));
        } else if op < 95 {
            let key = rng.gen_range(0..NUM_KEYS);
            compare_contents(&data, oracle_find_ge(&data, key), map.find_ge(&key));
        } else {
            let key = rng.gen_range(0..NUM_KEYS);
            compare_contents(&data, oracle_find_le(&data, key), map.find_le(&key));
        }
        if round % 1000 == 0 {
            map.check_rb_properties();
        }
    }
    map.check_rb_properties();
    assert_eq!(map.len(), data.len());
}

#[cfg(feature = "graphviz")]
#[test]
fn graphviz_draw_is_ok() {
    let mut map = OrderedMap::new();
    for k in [16, 8, 0, 5, 6, 15, 17, 25, 26, 19] {
        map.insert(k, k);
    }

    let path = std::env::temp_dir().join("rb_order_map_test.dot");
    map.draw(&path).unwrap();
    map.draw_without_value(&path).unwrap();
    let _ignore = std::fs::remove_file(&path);
}

#[cfg(feature = "serde")]
#[test]
fn serde_round_trip_preserves_entries() {
    let mut map = OrderedMap::<i32, i32>::new();
    map.insert(1, 10);
    map.insert(3, 20);
    map.insert(2, 15);

    let serialized = serde_json::to_string(&map).unwrap();
    let deserialized: OrderedMap<i32, i32> = serde_json::from_str(&serialized).unwrap();

    let dv: Vec<_> = deserialized.iter().collect();
    let ev: Vec<_> = map.iter().collect();
    assert_eq!(ev, dv);
    assert_eq!(deserialized.len(), map.len());
}

//! `rb_order_map` is an ordered map based on a red-black tree.
//!
//! It fully implements the insertion and deletion functionality of a
//! red-black tree, ensuring that each modification operation requires at most
//! O(logN) time complexity, and adds bidirectional cursors over the sorted
//! key space with explicit "before first" and "after last" boundary
//! positions.
//!
//! To safely and efficiently handle insertion and deletion operations in
//! Rust, `rb_order_map` uses arrays to simulate pointers for managing the
//! parent-child references in the red-black tree. This approach also ensures
//! that the map has the `Send` and `Unpin` traits, allowing it to be safely
//! transferred between threads and to maintain a fixed memory location during
//! asynchronous operations.
//!
//! Keys are ordered by a caller-supplied comparator (the [`compare`] crate's
//! [`Compare`] trait); `K: Ord` keys get their natural order by default.
//!
//! # Example
//!
//! ```rust
//! use rb_order_map::OrderedMap;
//!
//! let mut map = OrderedMap::new();
//! map.insert(1, 123456);
//! assert_eq!(map.get(&1), Some(&123456));
//!
//! // cursors walk the sorted key space in both directions
//! map.insert(5, 0);
//! map.insert(3, 0);
//! let cursor = map.find_ge(&2);
//! assert_eq!(*cursor.key(), 3);
//! assert_eq!(*cursor.next().key(), 5);
//! assert!(cursor.prev().prev().is_negative_limit());
//! ```

mod cursor;
mod entry;
#[cfg(feature = "graphviz")]
mod graphviz;
mod index;
mod iter;
mod node;
mod orderedmap;

#[cfg(test)]
mod tests;

pub use compare::{natural, Compare, Natural};
pub use cursor::Cursor;
pub use entry::{Entry, OccupiedEntry, VacantEntry};
pub use index::{DefaultIx, IndexType, NodeIndex};
pub use iter::{IntoIter, Iter};
pub use orderedmap::OrderedMap;

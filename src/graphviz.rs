use std::fmt::Debug;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

use crate::index::IndexType;
use crate::node::Node;
use crate::orderedmap::OrderedMap;

impl<K, V, C, Ix> OrderedMap<K, V, C, Ix>
where
    K: Debug,
    Ix: IndexType,
{
    /// Write the tree to a Graphviz dot file, labeling nodes with their key
    /// only.
    ///
    /// Red and black nodes are drawn with the matching fill color.
    #[inline]
    pub fn draw_without_value<P: AsRef<Path>>(&self, path: P) -> io::Result<()> {
        let mut out = BufWriter::new(File::create(path)?);
        self.write_dot(&mut out, |node, out| write!(out, "{:?}", node.key()))
    }

    fn write_dot<W, F>(&self, out: &mut W, label: F) -> io::Result<()>
    where
        W: Write,
        F: Fn(&Node<K, V, Ix>, &mut W) -> io::Result<()>,
    {
        writeln!(out, "digraph tree {{")?;
        writeln!(out, "    node [fontcolor=white, style=filled];")?;
        // the arena is dense, every slot above the sentinel is a live node
        for i in 1..self.nodes.len() {
            let node = &self.nodes[i];
            let fill = if node.is_red() { "red" } else { "black" };
            write!(out, "    n{i} [fillcolor={fill}, label=\"")?;
            label(node, out)?;
            writeln!(out, "\"];")?;
            for child in [node.left(), node.right()] {
                if !self.nodes[child.index()].is_sentinel() {
                    writeln!(out, "    n{i} -> n{};", child.index())?;
                }
            }
        }
        writeln!(out, "}}")?;
        out.flush()
    }
}

impl<K, V, C, Ix> OrderedMap<K, V, C, Ix>
where
    K: Debug,
    V: Debug,
    Ix: IndexType,
{
    /// Write the tree to a Graphviz dot file, labeling nodes with their key
    /// and value.
    #[inline]
    pub fn draw<P: AsRef<Path>>(&self, path: P) -> io::Result<()> {
        let mut out = BufWriter::new(File::create(path)?);
        self.write_dot(&mut out, |node, out| {
            write!(out, "{:?}={:?}", node.key(), node.value())
        })
    }
}

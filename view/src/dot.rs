use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use arbor_tree::{Tree, TraversalMode};

use crate::ViewError;

/// Options for the Graphviz export.
pub struct DotOptions {
    /// Graph kind keyword, `digraph` by default.
    pub graph: String,
    /// Node shape attribute, `circle` by default.
    pub shape: String,
}

impl Default for DotOptions {
    fn default() -> Self {
        Self {
            graph: "digraph".to_owned(),
            shape: "circle".to_owned(),
        }
    }
}

/// Write the tree as a Graphviz graph: width-first node statements, then
/// one edge per parent/child link, tab-indented, ids and labels quoted
/// verbatim.
pub fn write_dot<D>(
    tree: &Tree<D>,
    writer: &mut impl Write,
    options: &DotOptions,
) -> Result<(), ViewError> {
    writeln!(writer, "{} tree {{", options.graph)?;

    let mut edges = Vec::new();
    if !tree.is_empty() {
        let ids: Vec<_> = tree
            .expand(None)?
            .mode(TraversalMode::Width)
            .descend_collapsed(true)
            .collect();
        for id in ids {
            let node = tree.get(&id)?;
            writeln!(
                writer,
                "\t\"{}\" [label=\"{}\", shape={}]",
                node.id(),
                node.tag(),
                options.shape
            )?;
            for child in node.children() {
                edges.push(format!("\t\"{}\" -> \"{}\"", node.id(), child));
            }
        }
    }

    writeln!(writer)?;
    for edge in edges {
        writeln!(writer, "{edge}")?;
    }
    write!(writer, "}}")?;
    Ok(())
}

/// Export the tree to a `.dot` file.
pub fn export_to_dot<D>(
    tree: &Tree<D>,
    path: impl AsRef<Path>,
    options: &DotOptions,
) -> Result<(), ViewError> {
    let mut writer = BufWriter::new(File::create(path)?);
    write_dot(tree, &mut writer, options)?;
    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use arbor_tree::NodeId;

    fn id(s: &str) -> NodeId {
        NodeId::from(s)
    }

    fn dot<D>(tree: &Tree<D>) -> String {
        let mut out = Vec::new();
        write_dot(tree, &mut out, &DotOptions::default()).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn family_graph() {
        let mut tree: Tree<()> = Tree::new();
        tree.create_node(Some("Hárry"), Some(id("hárry")), None, None)
            .unwrap();
        tree.create_node(Some("Jane"), Some(id("jane")), Some(&id("hárry")), None)
            .unwrap();
        tree.create_node(Some("Bill"), Some(id("bill")), Some(&id("hárry")), None)
            .unwrap();
        tree.create_node(Some("Diane"), Some(id("diane")), Some(&id("jane")), None)
            .unwrap();
        tree.create_node(Some("George"), Some(id("george")), Some(&id("bill")), None)
            .unwrap();

        assert_eq!(
            dot(&tree),
            "digraph tree {\n\
             \t\"hárry\" [label=\"Hárry\", shape=circle]\n\
             \t\"jane\" [label=\"Jane\", shape=circle]\n\
             \t\"bill\" [label=\"Bill\", shape=circle]\n\
             \t\"diane\" [label=\"Diane\", shape=circle]\n\
             \t\"george\" [label=\"George\", shape=circle]\n\
             \n\
             \t\"hárry\" -> \"jane\"\n\
             \t\"hárry\" -> \"bill\"\n\
             \t\"jane\" -> \"diane\"\n\
             \t\"bill\" -> \"george\"\n\
             }"
        );
    }

    #[test]
    fn empty_tree_graph() {
        let tree: Tree<()> = Tree::new();
        assert_eq!(dot(&tree), "digraph tree {\n\n}");
    }

    #[test]
    fn single_node_graph() {
        let mut tree: Tree<()> = Tree::new();
        tree.create_node(Some("Node 1"), Some(id("node_1")), None, None)
            .unwrap();
        assert_eq!(
            dot(&tree),
            "digraph tree {\n\t\"node_1\" [label=\"Node 1\", shape=circle]\n\n}"
        );
    }
}

use std::fs::OpenOptions;
use std::io::Write;
use std::path::Path;

use arbor_tree::{Node, NodeCmp, NodeFilter, NodeId, Tree, TreeError, order_siblings};

use crate::ViewError;
use crate::glyph::GlyphSet;

/// Options for the text renderer.
pub struct RenderOptions<'f, D> {
    /// Node to render from; the root when `None`.
    pub start: Option<NodeId>,
    pub glyphs: GlyphSet,
    /// Suffix every label with `[id]`.
    pub show_ids: bool,
    /// Prunes a failing node together with its whole subtree, like the
    /// traversal engine.
    pub filter: Option<&'f NodeFilter<D>>,
    pub cmp: Option<&'f NodeCmp<D>>,
    pub reverse: bool,
    /// Label accessor over the node payload; nodes without payload fall
    /// back to their tag.
    pub data_label: Option<&'f dyn Fn(&D) -> String>,
}

impl<D> Default for RenderOptions<'_, D> {
    fn default() -> Self {
        Self {
            start: None,
            glyphs: GlyphSet::default(),
            show_ids: false,
            filter: None,
            cmp: None,
            reverse: false,
            data_label: None,
        }
    }
}

/// Render the tree as indented ASCII art, one label per line.
///
/// Fails with [`TreeError::EmptyTree`] / [`TreeError::NodeNotFound`] when
/// the start node does not exist; [`print_tree`] converts those into a
/// user-facing "Tree is empty" message instead.
pub fn render<D>(tree: &Tree<D>, options: &RenderOptions<'_, D>) -> Result<String, TreeError> {
    let start = match &options.start {
        Some(id) => {
            if tree.get_node(id).is_none() {
                return Err(TreeError::NodeNotFound(id.clone()));
            }
            id.clone()
        }
        None => tree.root().cloned().ok_or(TreeError::EmptyTree)?,
    };

    let mut out = String::new();
    walk(tree, &start, options, &mut Vec::new(), &mut out)?;
    Ok(out)
}

fn walk<D>(
    tree: &Tree<D>,
    id: &NodeId,
    options: &RenderOptions<'_, D>,
    is_last: &mut Vec<bool>,
    out: &mut String,
) -> Result<(), TreeError> {
    let node = tree.get(id)?;
    if let Some(filter) = options.filter {
        if !filter(node) {
            return Ok(());
        }
    }

    let (line, branch, corner) = options.glyphs.parts();
    if let Some((last, ancestors)) = is_last.split_last() {
        for ancestor_last in ancestors {
            if *ancestor_last {
                out.push_str("    ");
            } else {
                out.push_str(line);
                out.push_str("   ");
            }
        }
        out.push_str(if *last { corner } else { branch });
    }
    out.push_str(&label(node, options));
    out.push('\n');

    if !node.expanded() {
        return Ok(());
    }

    let mut children: Vec<&Node<D>> = node
        .children()
        .iter()
        .filter_map(|child| tree.get_node(child))
        .filter(|child| options.filter.is_none_or(|filter| filter(child)))
        .collect();
    order_siblings(&mut children, options.cmp, options.reverse);

    let count = children.len();
    for (index, child) in children.into_iter().enumerate() {
        is_last.push(index + 1 == count);
        walk(tree, child.id(), options, is_last, out)?;
        is_last.pop();
    }
    Ok(())
}

fn label<D>(node: &Node<D>, options: &RenderOptions<'_, D>) -> String {
    let text = match (options.data_label, node.data()) {
        (Some(accessor), Some(data)) => accessor(data),
        _ => node.tag().to_owned(),
    };
    if options.show_ids {
        format!("{text}[{}]", node.id())
    } else {
        text
    }
}

/// Print the rendering to stdout; an absent start node or empty tree prints
/// the literal line `Tree is empty`.
pub fn print_tree<D>(tree: &Tree<D>, options: &RenderOptions<'_, D>) {
    match render(tree, options) {
        Ok(text) => print!("{text}"),
        Err(_) => println!("Tree is empty"),
    }
}

/// Append the rendering to a file, creating it when absent.
pub fn save_to_file<D>(
    tree: &Tree<D>,
    path: impl AsRef<Path>,
    options: &RenderOptions<'_, D>,
) -> Result<(), ViewError> {
    let text = render(tree, options)?;
    let mut file = OpenOptions::new().create(true).append(true).open(path)?;
    file.write_all(text.as_bytes())?;
    Ok(())
}

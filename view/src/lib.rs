//! Text and Graphviz views over [`arbor_tree::Tree`]: indented ASCII-art
//! rendering with selectable glyph sets, file export, and DOT graphs.

use displaydoc::Display;
use thiserror::Error;

pub mod dot;
pub mod glyph;
pub mod text;

pub use crate::dot::{DotOptions, export_to_dot, write_dot};
pub use crate::glyph::GlyphSet;
pub use crate::text::{RenderOptions, print_tree, render, save_to_file};

#[derive(Debug, Error, Display)]
pub enum ViewError {
    /// tree error
    Tree(#[from] arbor_tree::TreeError),

    /// failed to write output
    Io(#[from] std::io::Error),
}

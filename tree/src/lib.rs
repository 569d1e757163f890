//! General-purpose, in-memory, labeled tree: a single root, uniquely
//! identified nodes, ordered children and arbitrary per-node payload, with
//! traversal, structural editing and dictionary/JSON export.

pub mod error;
pub mod id;
pub mod node;
pub mod serialize;
pub mod traverse;
pub mod tree;

pub use crate::error::TreeError;
pub use crate::id::{CuidGenerator, IdGenerator, NodeId, SequenceGenerator};
pub use crate::node::Node;
pub use crate::serialize::SerializeOptions;
pub use crate::traverse::{NodeCmp, NodeFilter, Traversal, TraversalMode, order_siblings};
pub use crate::tree::Tree;

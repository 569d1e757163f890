use std::fmt::{self, Display, Formatter};
use std::sync::atomic::{AtomicU64, Ordering};

use serde::{Deserialize, Serialize};

/// Identifier of a node, unique within one tree.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct NodeId(String);

impl NodeId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for NodeId {
    fn from(value: &str) -> Self {
        Self(value.to_owned())
    }
}

impl From<String> for NodeId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl Display for NodeId {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Source of fresh node identifiers.
///
/// A [`Tree`](crate::Tree) consults its generator whenever
/// [`create_node`](crate::Tree::create_node) is called without an explicit
/// id. The strategy is injectable so tests can supply deterministic ids
/// instead of the process-wide default.
pub trait IdGenerator: Send + Sync {
    fn generate(&self) -> NodeId;
}

/// Default generator, backed by cuid2.
#[derive(Debug, Default)]
pub struct CuidGenerator;

impl IdGenerator for CuidGenerator {
    fn generate(&self) -> NodeId {
        NodeId(cuid2::create_id())
    }
}

/// Deterministic generator producing `<prefix>-0`, `<prefix>-1`, ...
#[derive(Debug)]
pub struct SequenceGenerator {
    prefix: String,
    counter: AtomicU64,
}

impl SequenceGenerator {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            counter: AtomicU64::new(0),
        }
    }
}

impl IdGenerator for SequenceGenerator {
    fn generate(&self) -> NodeId {
        let n = self.counter.fetch_add(1, Ordering::Relaxed);
        NodeId(format!("{}-{}", self.prefix, n))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cuid_ids_are_fresh() {
        let ids = CuidGenerator;
        let a = ids.generate();
        let b = ids.generate();
        assert!(!a.as_str().is_empty());
        assert_ne!(a, b);
    }

    #[test]
    fn sequence_ids_are_deterministic() {
        let ids = SequenceGenerator::new("n");
        assert_eq!(ids.generate(), NodeId::from("n-0"));
        assert_eq!(ids.generate(), NodeId::from("n-1"));
        assert_eq!(ids.generate(), NodeId::from("n-2"));
    }
}

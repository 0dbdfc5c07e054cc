//! Typed ID definitions for scheduler resources.

use crate::define_id;

// =============================================================================
// Cluster
// =============================================================================

define_id!(NodeId, "node");

// =============================================================================
// Scheduling
// =============================================================================

define_id!(AllocId, "alloc");
define_id!(EvalId, "eval");

// =============================================================================
// Raft Index
// =============================================================================

/// Monotonic version stamp assigned by the replicated store.
///
/// Every write to a job bumps its `modify_index`; an allocation remembers
/// the index of the job it was created from, so comparing the two is how
/// staleness is detected.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Index(u64);

impl Index {
    #[must_use]
    pub const fn new(index: u64) -> Self {
        Self(index)
    }

    /// Returns the underlying value.
    #[must_use]
    pub const fn value(&self) -> u64 {
        self.0
    }

    /// Returns the index following this one.
    #[must_use]
    pub const fn next(&self) -> Self {
        Self(self.0 + 1)
    }
}

impl std::fmt::Display for Index {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for Index {
    fn from(index: u64) -> Self {
        Self(index)
    }
}

impl serde::Serialize for Index {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_u64(self.0)
    }
}

impl<'de> serde::Deserialize<'de> for Index {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        u64::deserialize(deserializer).map(Self)
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_node_id_roundtrip() {
        let id = NodeId::new();
        let parsed: NodeId = id.to_string().parse().unwrap();
        assert_eq!(id, parsed);
        assert!(id.to_string().starts_with("node_"));
    }

    #[test]
    fn test_alloc_id_rejects_node_prefix() {
        let result: Result<AllocId, _> = "node_01HV4Z2WQXKJNM8GPQY6VBKC3D".parse();
        assert_eq!(
            result.unwrap_err(),
            crate::IdError::InvalidPrefix {
                expected: "alloc",
                actual: "node".to_string(),
            }
        );
    }

    #[test]
    fn test_eval_id_missing_separator() {
        let result: Result<EvalId, _> = "eval01HV4Z2WQXKJNM8GPQY6VBKC3D".parse();
        assert!(matches!(result.unwrap_err(), crate::IdError::MissingSeparator));
    }

    #[test]
    fn test_id_empty() {
        let result: Result<NodeId, _> = "".parse();
        assert!(matches!(result.unwrap_err(), crate::IdError::Empty));
    }

    #[test]
    fn test_id_invalid_ulid() {
        let result: Result<NodeId, _> = "node_invalid".parse();
        assert!(matches!(result.unwrap_err(), crate::IdError::InvalidUlid(_)));
    }

    #[test]
    fn test_id_json_is_string_form() {
        let id = AllocId::new();
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, format!("\"{id}\""));
        let parsed: AllocId = serde_json::from_str(&json).unwrap();
        assert_eq!(id, parsed);
    }

    #[test]
    fn test_index_ordering_and_next() {
        let idx = Index::new(10);
        assert_eq!(idx.next().value(), 11);
        assert!(Index::default() < idx);
        assert_eq!(serde_json::to_string(&idx).unwrap(), "10");
    }

    #[test]
    fn test_prefixes_unique() {
        let prefixes = [NodeId::PREFIX, AllocId::PREFIX, EvalId::PREFIX];
        let unique: std::collections::HashSet<_> = prefixes.iter().collect();
        assert_eq!(prefixes.len(), unique.len());
    }

    proptest! {
        #[test]
        fn prop_node_id_parse_roundtrip(raw in any::<u128>()) {
            let text = format!("node_{}", crate::Ulid(raw));
            let parsed = NodeId::parse(&text).unwrap();
            prop_assert_eq!(parsed.to_string(), text);
        }
    }
}

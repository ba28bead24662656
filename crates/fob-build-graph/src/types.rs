//! Handles and tags shared by every graph layer.

use std::fmt;
use std::num::NonZeroU32;

use serde::{Deserialize, Serialize};

use crate::error::GraphError;

/// Dense integer handle for a node.
///
/// A `NodeId` is an index into the graph's node arena. It stays valid until the
/// node is removed and is never handed out again afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(u32);

impl NodeId {
    /// Wrap a raw arena index.
    pub const fn new(raw: u32) -> Self {
        NodeId(raw)
    }

    /// Raw arena index.
    pub const fn raw(self) -> u32 {
        self.0
    }

    /// Arena index as `usize`, for buffer addressing.
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

impl From<u32> for NodeId {
    fn from(raw: u32) -> Self {
        NodeId(raw)
    }
}

impl From<NodeId> for u32 {
    fn from(id: NodeId) -> Self {
        id.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Tag distinguishing relationships between the same pair of nodes.
///
/// `0` is reserved as the "no type" sentinel inside the edge buffer and can
/// never be stored. Declare pipeline edge types as constants:
///
/// ```
/// use fob_build_graph::EdgeType;
///
/// const CONTAINS: EdgeType = EdgeType::new(1);
/// const REFERENCES: EdgeType = EdgeType::new(2);
/// assert_ne!(CONTAINS, REFERENCES);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EdgeType(NonZeroU32);

impl EdgeType {
    /// The type used when a graph only has one kind of relationship.
    pub const DEFAULT: EdgeType = EdgeType::new(1);

    /// Create an edge type from a non-zero tag.
    ///
    /// # Panics
    ///
    /// Panics if `raw` is `0`. In a `const` item this is a compile error; use
    /// `EdgeType::try_from` for tags that arrive at runtime.
    pub const fn new(raw: u32) -> Self {
        match NonZeroU32::new(raw) {
            Some(tag) => EdgeType(tag),
            None => panic!("edge type 0 is reserved"),
        }
    }

    /// Raw tag value (always non-zero).
    pub const fn raw(self) -> u32 {
        self.0.get()
    }

    /// Decode a stored tag; `0` (empty or tombstoned slot) yields `None`.
    pub(crate) fn from_raw(raw: u32) -> Option<Self> {
        NonZeroU32::new(raw).map(EdgeType)
    }
}

impl Default for EdgeType {
    fn default() -> Self {
        EdgeType::DEFAULT
    }
}

impl TryFrom<u32> for EdgeType {
    type Error = GraphError;

    fn try_from(raw: u32) -> Result<Self, Self::Error> {
        NonZeroU32::new(raw)
            .map(EdgeType)
            .ok_or(GraphError::ReservedEdgeType)
    }
}

impl From<EdgeType> for u32 {
    fn from(edge_type: EdgeType) -> Self {
        edge_type.raw()
    }
}

impl fmt::Display for EdgeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Which edge types an operation should consider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EdgeFilter<'a> {
    /// Exactly one type.
    Type(EdgeType),
    /// Any type in the set.
    AnyOf(&'a [EdgeType]),
    /// Every type.
    #[default]
    All,
}

impl EdgeFilter<'_> {
    /// Whether an edge of `edge_type` passes this filter.
    pub fn matches(&self, edge_type: EdgeType) -> bool {
        match self {
            EdgeFilter::Type(t) => *t == edge_type,
            EdgeFilter::AnyOf(types) => types.contains(&edge_type),
            EdgeFilter::All => true,
        }
    }
}

impl From<EdgeType> for EdgeFilter<'_> {
    fn from(edge_type: EdgeType) -> Self {
        EdgeFilter::Type(edge_type)
    }
}

impl<'a> From<&'a [EdgeType]> for EdgeFilter<'a> {
    fn from(types: &'a [EdgeType]) -> Self {
        EdgeFilter::AnyOf(types)
    }
}

impl<'a, const N: usize> From<&'a [EdgeType; N]> for EdgeFilter<'a> {
    fn from(types: &'a [EdgeType; N]) -> Self {
        EdgeFilter::AnyOf(types)
    }
}

impl From<Option<EdgeType>> for EdgeFilter<'_> {
    fn from(edge_type: Option<EdgeType>) -> Self {
        match edge_type {
            Some(t) => EdgeFilter::Type(t),
            None => EdgeFilter::All,
        }
    }
}

/// A directed, typed edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Edge {
    pub from: NodeId,
    pub to: NodeId,
    pub edge_type: EdgeType,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_edge_type_rejects_zero_at_runtime() {
        assert_eq!(EdgeType::try_from(0), Err(GraphError::ReservedEdgeType));
        assert_eq!(EdgeType::try_from(3).map(EdgeType::raw), Ok(3));
    }

    #[test]
    fn test_edge_filter_matching() {
        let a = EdgeType::new(1);
        let b = EdgeType::new(2);
        let c = EdgeType::new(3);

        assert!(EdgeFilter::from(a).matches(a));
        assert!(!EdgeFilter::from(a).matches(b));
        assert!(EdgeFilter::from(&[a, c]).matches(c));
        assert!(!EdgeFilter::from(&[a, c]).matches(b));
        assert!(EdgeFilter::All.matches(b));
        assert_eq!(EdgeFilter::from(None), EdgeFilter::All);
    }

    #[test]
    #[should_panic(expected = "reserved")]
    fn test_edge_type_new_panics_on_zero() {
        let raw = std::hint::black_box(0);
        let _ = EdgeType::new(raw);
    }

    #[test]
    fn test_node_id_round_trip_through_u32() {
        let id = NodeId::from(42u32);
        assert_eq!(u32::from(id), 42);
        assert_eq!(id.index(), 42);
        assert_eq!(id.to_string(), "42");
    }
}

//! Error types for build graph operations.

use thiserror::Error;

use crate::types::{EdgeType, NodeId};

/// Result type alias for build graph operations.
pub type Result<T> = std::result::Result<T, GraphError>;

/// Errors reported by the adjacency list, graph and content graph layers.
///
/// These describe conditions in graph terms (node ids, content keys). Turning
/// them into user-facing diagnostics is left to the pipeline stage that owns
/// the graph.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum GraphError {
    // Handle validation
    #[error("node {0} does not exist in the graph")]
    UnknownNode(NodeId),

    #[error("edge from {from} to {to} of type {edge_type} not found")]
    EdgeNotFound {
        from: NodeId,
        to: NodeId,
        edge_type: EdgeType,
    },

    #[error("edge type 0 is reserved and cannot be stored")]
    ReservedEdgeType,

    // Content key mapping
    #[error("content key already exists: {0}")]
    DuplicateContentKey(String),

    #[error("content key not found: {0}")]
    MissingContentKey(String),

    // Traversal
    #[error("a start node is required to traverse (no root node is set)")]
    NoStartNode,

    #[error("cycle detected between {} nodes: {nodes:?}", nodes.len())]
    Cycle { nodes: Vec<NodeId> },

    // Resource exhaustion
    #[error("capacity overflow: cannot grow {buffer} buffer to {requested} entries")]
    CapacityOverflow {
        buffer: &'static str,
        requested: usize,
    },

    // Persistence
    #[error("failed to serialize graph: {0}")]
    Serialization(String),

    #[error("failed to deserialize graph: {0}")]
    Deserialization(String),

    #[error("incompatible graph format version: expected {expected}, got {found}")]
    IncompatibleFormat { expected: u32, found: u32 },

    // Configuration
    #[error("invalid graph configuration: {0}")]
    Config(String),
}

impl From<figment::Error> for GraphError {
    fn from(err: figment::Error) -> Self {
        GraphError::Config(err.to_string())
    }
}

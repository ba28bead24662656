//! # fob-build-graph
//!
//! Graph engine behind fob's build pipeline: a flat, hash-indexed adjacency
//! structure plus the node-value and content-key layers that resolution,
//! transformation and bundling stages work against.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────┐
//! │ ContentGraph<N>                              │
//! │   content key <-> NodeId (FxHashMap x2)      │
//! └────────────────────┬─────────────────────────┘
//!                      │ wraps
//!                      ▼
//! ┌──────────────────────────────────────────────┐
//! │ Graph<N>                                     │
//! │   node values, root, traversals, topo sort   │
//! └────────────────────┬─────────────────────────┘
//!                      │ owns
//!                      ▼
//! ┌──────────────────────────────────────────────┐
//! │ AdjacencyList                                │
//! │   u32 node/edge buffers + hash buckets       │
//! └──────────────────────────────────────────────┘
//! ```
//!
//! ## Quick Start
//!
//! ```rust
//! use fob_build_graph::{ContentGraph, EdgeFilter, EdgeType};
//!
//! const IMPORT: EdgeType = EdgeType::new(1);
//!
//! # fn main() -> fob_build_graph::Result<()> {
//! let mut graph = ContentGraph::new();
//! let entry = graph.add_node_by_content_key_if_needed("src/index.ts", "index")?;
//! let util = graph.add_node_by_content_key_if_needed("src/util.ts", "util")?;
//! graph.add_edge(entry, util, IMPORT)?;
//! graph.set_root_node_id(Some(entry))?;
//!
//! assert_eq!(graph.topo_sort(IMPORT)?, vec![entry, util]);
//!
//! let mut seen = Vec::new();
//! graph.traverse(
//!     |id, _: Option<&()>, _| {
//!         seen.push(id);
//!         None
//!     },
//!     None,
//!     EdgeFilter::All,
//! )?;
//! assert_eq!(seen, vec![entry, util]);
//! # Ok(())
//! # }
//! ```
//!
//! ## Threading
//!
//! The graph is single-writer and does no internal locking. Parallel workers
//! describe their changes as a [`MutationBatch`] and the owning thread applies
//! it with [`ContentGraph::apply`].
//!
//! ## Logging
//!
//! The crate emits `tracing` events and never installs a subscriber. Enable
//! the `logging` feature for [`logging::init_logging`].

pub mod adjacency;
pub mod batch;
pub mod config;
pub mod content_graph;
pub mod error;
pub mod graph;
#[cfg(feature = "logging")]
pub mod logging;
pub mod types;
pub mod visitor;

pub use adjacency::{AdjacencyList, AdjacencyStats, SerializedAdjacencyList};
pub use batch::{BatchSummary, GraphMutation, MutationBatch};
pub use config::GraphConfig;
pub use content_graph::{ContentGraph, SerializedContentGraph};
pub use error::{GraphError, Result};
pub use graph::{EdgeDelta, FORMAT_VERSION, Graph, SerializedGraph};
pub use types::{Edge, EdgeFilter, EdgeType, NodeId};
pub use visitor::{EnterExit, GraphVisitor, MapVisitor, OnExit, TraversalActions};

#[cfg(test)]
mod tests;

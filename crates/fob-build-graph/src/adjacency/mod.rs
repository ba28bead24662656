//! Flat, hash-indexed directed multigraph.
//!
//! `AdjacencyList` stores nodes and edges in contiguous `u32` buffers instead of
//! per-node collections. Each node keeps the head and tail of its outgoing and
//! incoming edge chains; each edge record carries the links for both chains plus
//! a link into a hash chain keyed by `(from, to, type)`, which answers "does this
//! edge exist" in expected O(1).
//!
//! ```text
//!  nodes:   [first_out|last_out|first_in|last_in] [ ... ] ...
//!                 │
//!                 ▼
//!  edges:   [type|from|to|next_hash|next_out|prev_out|next_in|prev_in] ...
//!                          │
//!  buckets: [head] [head] ─┘ ...
//! ```
//!
//! Deleted edges leave tombstones that are reclaimed the next time the edge
//! buffer fills up. Edges are appended to the end of each chain, so
//! neighbour queries return targets in insertion order.

mod buffers;
mod serialization;
mod stats;

pub use serialization::SerializedAdjacencyList;
pub use stats::AdjacencyStats;

use rustc_hash::FxHashSet;

use buffers::{Direction, EdgeTable, FROM, NIL, NodeTable, TO, TYPE};

use crate::config::GraphConfig;
use crate::error::{GraphError, Result};
use crate::types::{Edge, EdgeFilter, EdgeType, NodeId};

/// Resize policy copied out of [`GraphConfig`].
#[derive(Debug, Clone, Copy)]
struct ResizePolicy {
    max_load_factor: f64,
    compaction_threshold: f64,
}

impl From<&GraphConfig> for ResizePolicy {
    fn from(config: &GraphConfig) -> Self {
        Self {
            max_load_factor: config.max_load_factor,
            compaction_threshold: config.compaction_threshold,
        }
    }
}

/// Array-backed adjacency structure used by [`crate::Graph`].
#[derive(Debug, Clone)]
pub struct AdjacencyList {
    nodes: NodeTable,
    edges: EdgeTable,
    policy: ResizePolicy,
}

impl Default for AdjacencyList {
    fn default() -> Self {
        Self::new()
    }
}

impl AdjacencyList {
    /// Create an empty adjacency list with the default configuration.
    pub fn new() -> Self {
        Self::sized(&GraphConfig::default())
    }

    /// Create an empty adjacency list sized by `config`.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::Config`] if `config` fails
    /// [`GraphConfig::validate`].
    pub fn with_config(config: &GraphConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self::sized(config))
    }

    fn sized(config: &GraphConfig) -> Self {
        Self {
            nodes: NodeTable::with_capacity(config.initial_node_capacity.max(1)),
            edges: EdgeTable::new(config.initial_edge_capacity.max(1), config.bucket_count()),
            policy: ResizePolicy::from(config),
        }
    }

    /// Number of allocated node slots (including nodes whose value was removed
    /// at the graph layer).
    pub fn node_count(&self) -> usize {
        self.nodes.count
    }

    /// Number of live edges.
    pub fn edge_count(&self) -> usize {
        self.edges.live
    }

    #[inline]
    fn contains_node(&self, id: NodeId) -> bool {
        id.index() < self.nodes.count
    }

    fn check_node(&self, id: NodeId) -> Result<()> {
        if self.contains_node(id) {
            Ok(())
        } else {
            Err(GraphError::UnknownNode(id))
        }
    }

    /// Allocate a node with no edges.
    pub fn add_node(&mut self) -> Result<NodeId> {
        let id = self.nodes.count;
        if id >= u32::MAX as usize {
            return Err(GraphError::CapacityOverflow {
                buffer: "node",
                requested: id + 1,
            });
        }
        if id >= self.nodes.capacity() {
            let next = self.nodes.capacity().saturating_mul(2).max(1);
            self.resize_nodes(next)?;
        }
        self.nodes.count += 1;
        Ok(NodeId::new(id as u32))
    }

    /// Grow the node buffer to hold `size` nodes.
    ///
    /// Requests at or below the current capacity are ignored; node ids and edge
    /// chains are unaffected by growth.
    pub fn resize_nodes(&mut self, size: usize) -> Result<()> {
        if size <= self.nodes.capacity() {
            return Ok(());
        }
        let size = size.min(u32::MAX as usize);
        if size.checked_mul(buffers::NODE_STRIDE).is_none() {
            return Err(GraphError::CapacityOverflow {
                buffer: "node",
                requested: size,
            });
        }

        tracing::debug!(
            from = self.nodes.capacity(),
            to = size,
            "growing adjacency node buffer"
        );
        self.nodes.grow(size);
        Ok(())
    }

    /// Rebuild the edge buffer with room for `size` edges.
    ///
    /// Live edges are copied in slot order, so tombstones are dropped and every
    /// node's chains keep their insertion order. The size is clamped to the
    /// number of live edges.
    pub fn resize_edges(&mut self, size: usize) -> Result<()> {
        let size = size.max(self.edges.live).max(1);
        if size > u32::MAX as usize - 1 || size.checked_mul(buffers::EDGE_STRIDE).is_none() {
            return Err(GraphError::CapacityOverflow {
                buffer: "edge",
                requested: size,
            });
        }

        tracing::debug!(
            from = self.edges.capacity(),
            to = size,
            live = self.edges.live,
            reclaimed = self.edges.deleted,
            "rebuilding adjacency edge buffer"
        );

        let mut edges = EdgeTable::new(size, self.edges.bucket_count());
        self.nodes.clear_links();
        for (edge_type, from, to) in self.edges.live_triples() {
            edges.insert(&mut self.nodes, from, to, edge_type);
        }
        self.edges = edges;
        Ok(())
    }

    /// Resize the hash index to `bucket_count` buckets (rounded up to a power of two).
    pub fn rehash(&mut self, bucket_count: usize) {
        tracing::debug!(
            from = self.edges.bucket_count(),
            to = bucket_count,
            edges = self.edges.live,
            "rehashing adjacency edge index"
        );
        self.edges.rehash(bucket_count);
    }

    fn reserve_edge(&mut self) -> Result<()> {
        if self.edges.is_full() {
            let capacity = self.edges.capacity();
            let tombstone_ratio = self.edges.deleted as f64 / capacity as f64;
            if tombstone_ratio >= self.policy.compaction_threshold {
                self.resize_edges(capacity)?;
            } else {
                self.resize_edges(capacity.saturating_mul(2))?;
            }
        }

        let load = (self.edges.live + 1) as f64 / self.edges.bucket_count() as f64;
        if load > self.policy.max_load_factor {
            self.rehash(self.edges.bucket_count() * 2);
        }
        Ok(())
    }

    /// Insert an edge.
    ///
    /// Returns `Ok(false)` without mutating anything if the exact
    /// `(from, to, type)` triple already exists.
    pub fn add_edge(&mut self, from: NodeId, to: NodeId, edge_type: EdgeType) -> Result<bool> {
        self.check_node(from)?;
        self.check_node(to)?;

        if self
            .edges
            .find(from.raw(), to.raw(), edge_type.raw())
            .is_some()
        {
            return Ok(false);
        }

        self.reserve_edge()?;
        self.edges
            .insert(&mut self.nodes, from.raw(), to.raw(), edge_type.raw());
        Ok(true)
    }

    /// Whether an edge from `from` to `to` passes `filter`.
    ///
    /// Single types are answered through the hash index; [`EdgeFilter::All`]
    /// walks `from`'s outgoing chain.
    pub fn has_edge<'a>(
        &self,
        from: NodeId,
        to: NodeId,
        filter: impl Into<EdgeFilter<'a>>,
    ) -> bool {
        if !self.contains_node(from) || !self.contains_node(to) {
            return false;
        }
        match filter.into() {
            EdgeFilter::Type(t) => self.edges.find(from.raw(), to.raw(), t.raw()).is_some(),
            EdgeFilter::AnyOf(types) => types
                .iter()
                .any(|t| self.edges.find(from.raw(), to.raw(), t.raw()).is_some()),
            EdgeFilter::All => self
                .chain(from, Direction::Outgoing)
                .any(|(_, node)| node == to),
        }
    }

    /// Remove every edge from `from` to `to` that passes `filter`.
    ///
    /// Missing edges are ignored. Returns whether anything was removed.
    pub fn remove_edge<'a>(
        &mut self,
        from: NodeId,
        to: NodeId,
        filter: impl Into<EdgeFilter<'a>>,
    ) -> bool {
        if !self.contains_node(from) || !self.contains_node(to) {
            return false;
        }
        let targets: Vec<u32> = match filter.into() {
            EdgeFilter::Type(t) => self
                .edges
                .find(from.raw(), to.raw(), t.raw())
                .into_iter()
                .collect(),
            EdgeFilter::AnyOf(types) => {
                let mut addrs: Vec<u32> = types
                    .iter()
                    .filter_map(|t| self.edges.find(from.raw(), to.raw(), t.raw()))
                    .collect();
                // A type listed twice finds the same slot twice.
                addrs.sort_unstable();
                addrs.dedup();
                addrs
            }
            EdgeFilter::All => self
                .chain_addrs(from, Direction::Outgoing)
                .filter(|&addr| self.edges.field(addr, TO) == to.raw())
                .collect(),
        };

        let mut removed = false;
        for &addr in &targets {
            removed |= self.edges.remove(&mut self.nodes, addr);
        }
        removed
    }

    /// Whether any edge points at `to`. O(1).
    pub fn has_inbound_edges(&self, to: NodeId) -> bool {
        self.contains_node(to) && self.nodes.first(to.index(), Direction::Incoming) != NIL
    }

    /// Whether any edge leaves `from`. O(1).
    pub fn has_outbound_edges(&self, from: NodeId) -> bool {
        self.contains_node(from) && self.nodes.first(from.index(), Direction::Outgoing) != NIL
    }

    /// Targets of `from`'s outgoing edges that pass `filter`, in insertion
    /// order. A target reachable through several matching types is listed once.
    pub fn get_node_ids_connected_from<'a>(
        &self,
        from: NodeId,
        filter: impl Into<EdgeFilter<'a>>,
    ) -> Vec<NodeId> {
        self.connected(from, Direction::Outgoing, filter.into())
    }

    /// Sources of `to`'s incoming edges that pass `filter`, in insertion order.
    pub fn get_node_ids_connected_to<'a>(
        &self,
        to: NodeId,
        filter: impl Into<EdgeFilter<'a>>,
    ) -> Vec<NodeId> {
        self.connected(to, Direction::Incoming, filter.into())
    }

    fn connected(&self, node: NodeId, dir: Direction, filter: EdgeFilter<'_>) -> Vec<NodeId> {
        if !self.contains_node(node) {
            return Vec::new();
        }
        let matching = self
            .chain(node, dir)
            .filter(|(edge_type, _)| filter.matches(*edge_type))
            .map(|(_, other)| other);

        match filter {
            // A single type cannot repeat a neighbour.
            EdgeFilter::Type(_) => matching.collect(),
            _ => {
                let mut seen = FxHashSet::default();
                matching.filter(|other| seen.insert(*other)).collect()
            }
        }
    }

    /// `(type, source)` for every edge into `to`.
    pub fn get_inbound_edges_by_type(&self, to: NodeId) -> Vec<(EdgeType, NodeId)> {
        if !self.contains_node(to) {
            return Vec::new();
        }
        self.chain(to, Direction::Incoming).collect()
    }

    /// `(type, target)` for every edge out of `from`.
    pub fn get_outbound_edges_by_type(&self, from: NodeId) -> Vec<(EdgeType, NodeId)> {
        if !self.contains_node(from) {
            return Vec::new();
        }
        self.chain(from, Direction::Outgoing).collect()
    }

    /// Every live edge, in slot order.
    pub fn get_all_edges(&self) -> impl Iterator<Item = Edge> + '_ {
        self.edges
            .live_triples()
            .filter_map(|(edge_type, from, to)| {
                Some(Edge {
                    from: NodeId::new(from),
                    to: NodeId::new(to),
                    edge_type: EdgeType::from_raw(edge_type)?,
                })
            })
    }

    fn chain_addrs(&self, node: NodeId, dir: Direction) -> ChainAddrs<'_> {
        ChainAddrs {
            edges: &self.edges,
            next: self.nodes.first(node.index(), dir),
            dir,
        }
    }

    /// `(type, other end)` pairs along one of `node`'s chains.
    fn chain(&self, node: NodeId, dir: Direction) -> impl Iterator<Item = (EdgeType, NodeId)> + '_ {
        let other_end = match dir {
            Direction::Outgoing => TO,
            Direction::Incoming => FROM,
        };
        self.chain_addrs(node, dir).filter_map(move |addr| {
            let edge_type = EdgeType::from_raw(self.edges.field(addr, TYPE))?;
            Some((edge_type, NodeId::new(self.edges.field(addr, other_end))))
        })
    }

    /// Human-readable dump of nodes, edges and hash chains for debugging.
    ///
    /// The shape of this value is not stable.
    pub fn inspect(&self) -> serde_json::Value {
        let nodes: Vec<serde_json::Value> = (0..self.nodes.count as u32)
            .map(NodeId::new)
            .filter(|&id| self.has_outbound_edges(id) || self.has_inbound_edges(id))
            .map(|id| {
                let out: Vec<_> = self
                    .chain(id, Direction::Outgoing)
                    .map(|(t, to)| serde_json::json!({ "to": to, "type": t }))
                    .collect();
                let inbound: Vec<_> = self
                    .chain(id, Direction::Incoming)
                    .map(|(t, from)| serde_json::json!({ "from": from, "type": t }))
                    .collect();
                serde_json::json!({ "id": id, "out": out, "in": inbound })
            })
            .collect();

        let buckets: Vec<serde_json::Value> = self
            .edges
            .buckets
            .iter()
            .enumerate()
            .filter(|(_, head)| **head != NIL)
            .map(|(bucket, &head)| {
                let mut chain = Vec::new();
                let mut addr = head;
                while addr != NIL {
                    chain.push(serde_json::json!([
                        self.edges.field(addr, FROM),
                        self.edges.field(addr, TO),
                        self.edges.field(addr, TYPE),
                    ]));
                    addr = self.edges.next_in_bucket(addr);
                }
                serde_json::json!({ "bucket": bucket, "chain": chain })
            })
            .collect();

        serde_json::json!({
            "nodes": nodes,
            "buckets": buckets,
            "stats": self.stats(),
        })
    }
}

/// Walks the edge addresses of one chain.
struct ChainAddrs<'a> {
    edges: &'a EdgeTable,
    next: u32,
    dir: Direction,
}

impl Iterator for ChainAddrs<'_> {
    type Item = u32;

    fn next(&mut self) -> Option<u32> {
        if self.next == NIL {
            return None;
        }
        let addr = self.next;
        self.next = self.edges.next(addr, self.dir);
        Some(addr)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const T1: EdgeType = EdgeType::new(1);
    const T2: EdgeType = EdgeType::new(2);
    const T3: EdgeType = EdgeType::new(3);

    fn list_with_nodes(n: usize) -> (AdjacencyList, Vec<NodeId>) {
        let mut list = AdjacencyList::new();
        let ids = (0..n).map(|_| list.add_node().unwrap()).collect();
        (list, ids)
    }

    #[test]
    fn test_add_node_returns_dense_ids() {
        let (list, ids) = list_with_nodes(3);
        assert_eq!(ids, vec![NodeId::new(0), NodeId::new(1), NodeId::new(2)]);
        assert_eq!(list.node_count(), 3);
        assert_eq!(list.edge_count(), 0);
    }

    #[test]
    fn test_add_edge_is_idempotent() {
        let (mut list, ids) = list_with_nodes(2);
        assert!(list.add_edge(ids[0], ids[1], T1).unwrap());
        assert!(!list.add_edge(ids[0], ids[1], T1).unwrap());
        assert!(list.has_edge(ids[0], ids[1], T1));
        assert_eq!(list.edge_count(), 1);
    }

    #[test]
    fn test_add_edge_rejects_unknown_nodes() {
        let (mut list, ids) = list_with_nodes(1);
        let err = list.add_edge(ids[0], NodeId::new(7), T1).unwrap_err();
        assert_eq!(err, GraphError::UnknownNode(NodeId::new(7)));
    }

    #[test]
    fn test_multiple_types_between_same_pair() {
        let (mut list, ids) = list_with_nodes(2);
        list.add_edge(ids[0], ids[1], T1).unwrap();
        list.add_edge(ids[0], ids[1], T2).unwrap();

        assert!(list.has_edge(ids[0], ids[1], T1));
        assert!(list.has_edge(ids[0], ids[1], T2));
        assert!(!list.has_edge(ids[0], ids[1], T3));
        assert!(list.has_edge(ids[0], ids[1], EdgeFilter::All));
        assert!(list.has_edge(ids[0], ids[1], &[T3, T2]));
        assert!(!list.has_edge(ids[1], ids[0], EdgeFilter::All));

        assert_eq!(list.get_node_ids_connected_from(ids[0], EdgeFilter::All), vec![ids[1]]);
        assert_eq!(
            list.get_outbound_edges_by_type(ids[0]),
            vec![(T1, ids[1]), (T2, ids[1])]
        );
    }

    #[test]
    fn test_remove_edge_by_type_leaves_other_types() {
        let (mut list, ids) = list_with_nodes(2);
        list.add_edge(ids[0], ids[1], T1).unwrap();
        list.add_edge(ids[0], ids[1], T2).unwrap();

        assert!(list.remove_edge(ids[0], ids[1], T1));
        assert!(!list.has_edge(ids[0], ids[1], T1));
        assert!(list.has_edge(ids[0], ids[1], T2));
        assert!(!list.remove_edge(ids[0], ids[1], T1));

        assert!(list.remove_edge(ids[0], ids[1], EdgeFilter::All));
        assert!(!list.has_inbound_edges(ids[1]));
        assert_eq!(list.edge_count(), 0);
        assert_eq!(list.stats().deleted, 2);
    }

    #[test]
    fn test_remove_edge_with_repeated_type_in_filter() {
        let (mut list, ids) = list_with_nodes(4);
        list.add_edge(ids[0], ids[1], T1).unwrap();
        list.add_edge(ids[0], ids[2], T1).unwrap();
        list.add_edge(ids[2], ids[3], T1).unwrap();

        assert!(list.remove_edge(ids[2], ids[3], &[T1, T1]));

        assert_eq!(list.edge_count(), 2);
        assert_eq!(list.stats().deleted, 1);
        assert_eq!(
            list.get_node_ids_connected_from(ids[0], T1),
            vec![ids[1], ids[2]]
        );
        assert_eq!(list.get_node_ids_connected_to(ids[2], T1), vec![ids[0]]);
        assert!(!list.has_inbound_edges(ids[3]));
    }

    #[test]
    fn test_with_config_rejects_invalid_config() {
        for config in [
            GraphConfig {
                compaction_threshold: 0.0,
                ..GraphConfig::default()
            },
            GraphConfig {
                max_load_factor: 0.0,
                ..GraphConfig::default()
            },
            GraphConfig {
                initial_edge_capacity: 0,
                ..GraphConfig::default()
            },
        ] {
            assert!(matches!(
                AdjacencyList::with_config(&config),
                Err(GraphError::Config(_))
            ));
        }
    }

    #[test]
    fn test_small_load_factor_keeps_buckets_bounded() {
        let config = GraphConfig {
            initial_bucket_count: 1,
            max_load_factor: crate::config::MIN_LOAD_FACTOR,
            ..GraphConfig::default()
        };
        let mut list = AdjacencyList::with_config(&config).unwrap();
        let ids: Vec<NodeId> = (0..21).map(|_| list.add_node().unwrap()).collect();
        for window in ids.windows(2) {
            list.add_edge(window[0], window[1], T1).unwrap();
        }

        assert_eq!(list.edge_count(), 20);
        assert!(list.stats().buckets <= 256);
    }

    #[test]
    fn test_neighbours_in_insertion_order() {
        let (mut list, ids) = list_with_nodes(5);
        for &target in &[ids[3], ids[1], ids[4], ids[2]] {
            list.add_edge(ids[0], target, T1).unwrap();
        }
        assert_eq!(
            list.get_node_ids_connected_from(ids[0], T1),
            vec![ids[3], ids[1], ids[4], ids[2]]
        );

        list.remove_edge(ids[0], ids[1], T1);
        list.add_edge(ids[0], ids[1], T1).unwrap();
        assert_eq!(
            list.get_node_ids_connected_from(ids[0], T1),
            vec![ids[3], ids[4], ids[2], ids[1]]
        );
        assert_eq!(list.get_node_ids_connected_to(ids[4], T1), vec![ids[0]]);
    }

    #[test]
    fn test_connected_filters_by_type() {
        let (mut list, ids) = list_with_nodes(4);
        list.add_edge(ids[0], ids[1], T1).unwrap();
        list.add_edge(ids[0], ids[2], T2).unwrap();
        list.add_edge(ids[0], ids[3], T3).unwrap();

        assert_eq!(list.get_node_ids_connected_from(ids[0], T2), vec![ids[2]]);
        assert_eq!(
            list.get_node_ids_connected_from(ids[0], &[T1, T3]),
            vec![ids[1], ids[3]]
        );
        assert_eq!(list.get_node_ids_connected_from(ids[0], EdgeFilter::All).len(), 3);
        assert_eq!(
            list.get_inbound_edges_by_type(ids[3]),
            vec![(T3, ids[0])]
        );
    }

    #[test]
    fn test_growth_preserves_handles_and_edges() {
        let config = GraphConfig {
            initial_node_capacity: 1,
            initial_edge_capacity: 1,
            initial_bucket_count: 2,
            ..GraphConfig::default()
        };
        let mut list = AdjacencyList::with_config(&config).unwrap();
        let ids: Vec<NodeId> = (0..100).map(|_| list.add_node().unwrap()).collect();
        for window in ids.windows(2) {
            list.add_edge(window[0], window[1], T1).unwrap();
        }

        for (i, id) in ids.iter().enumerate() {
            assert_eq!(id.index(), i);
        }
        for window in ids.windows(2) {
            assert!(list.has_edge(window[0], window[1], T1));
        }
        let stats = list.stats();
        assert_eq!(stats.edges, 99);
        assert!(stats.edge_capacity >= 99);
        assert!(stats.node_capacity >= 100);
        assert!(stats.edges as f64 / stats.buckets as f64 <= config.max_load_factor);
    }

    #[test]
    fn test_full_buffer_with_tombstones_compacts_in_place() {
        let config = GraphConfig {
            initial_edge_capacity: 4,
            initial_bucket_count: 64,
            ..GraphConfig::default()
        };
        let mut list = AdjacencyList::with_config(&config).unwrap();
        let ids: Vec<NodeId> = (0..5).map(|_| list.add_node().unwrap()).collect();
        for i in 1..5 {
            list.add_edge(ids[0], ids[i], T1).unwrap();
        }
        list.remove_edge(ids[0], ids[1], T1);
        list.remove_edge(ids[0], ids[2], T1);

        // Buffer is full: half of it is tombstones, so it is compacted, not doubled.
        list.add_edge(ids[1], ids[2], T1).unwrap();
        let stats = list.stats();
        assert_eq!(stats.edge_capacity, 4);
        assert_eq!(stats.deleted, 0);
        assert_eq!(stats.edges, 3);
        assert_eq!(
            list.get_node_ids_connected_from(ids[0], T1),
            vec![ids[3], ids[4]]
        );
    }

    #[test]
    fn test_explicit_resize_edges_keeps_order() {
        let (mut list, ids) = list_with_nodes(4);
        list.add_edge(ids[0], ids[3], T1).unwrap();
        list.add_edge(ids[0], ids[1], T2).unwrap();
        list.add_edge(ids[2], ids[0], T1).unwrap();

        list.resize_edges(1024).unwrap();
        assert_eq!(list.stats().edge_capacity, 1024);
        assert_eq!(list.get_node_ids_connected_from(ids[0], EdgeFilter::All), vec![ids[3], ids[1]]);
        assert_eq!(list.get_node_ids_connected_to(ids[0], T1), vec![ids[2]]);

        // Shrinking below the live count is clamped.
        list.resize_edges(0).unwrap();
        assert_eq!(list.stats().edge_capacity, 3);
        assert_eq!(list.edge_count(), 3);
    }

    #[test]
    fn test_get_all_edges_skips_tombstones() {
        let (mut list, ids) = list_with_nodes(3);
        list.add_edge(ids[0], ids[1], T1).unwrap();
        list.add_edge(ids[1], ids[2], T2).unwrap();
        list.remove_edge(ids[0], ids[1], T1);

        let edges: Vec<Edge> = list.get_all_edges().collect();
        assert_eq!(
            edges,
            vec![Edge {
                from: ids[1],
                to: ids[2],
                edge_type: T2
            }]
        );
    }

    #[test]
    fn test_inspect_lists_connected_nodes() {
        let (mut list, ids) = list_with_nodes(3);
        list.add_edge(ids[0], ids[1], T1).unwrap();

        let dump = list.inspect();
        assert_eq!(dump["nodes"].as_array().map(Vec::len), Some(2));
        assert_eq!(dump["stats"]["edges"], 1);
    }
}

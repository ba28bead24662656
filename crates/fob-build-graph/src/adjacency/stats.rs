//! Diagnostic snapshot of the adjacency buffers.

use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};

use super::AdjacencyList;
use super::buffers::{EDGE_STRIDE, NODE_STRIDE};

/// Memory and hash-quality counters for an [`AdjacencyList`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdjacencyStats {
    /// Allocated nodes.
    pub nodes: usize,
    /// Node slots available before the node buffer grows.
    pub node_capacity: usize,
    /// Size of the node buffer in bytes.
    pub node_buffer_bytes: usize,
    /// `nodes / node_capacity`.
    pub node_load: f64,
    /// Distinct `(node, edge type)` pairs with at least one edge, in either
    /// direction.
    pub node_edge_types: usize,
    /// Live edges.
    pub edges: usize,
    /// Tombstoned edge slots awaiting reclamation.
    pub deleted: usize,
    /// Edge slots available before the edge buffer is rebuilt.
    pub edge_capacity: usize,
    /// Size of the edge buffer in bytes.
    pub edge_buffer_bytes: usize,
    /// `(edges + deleted) / edge_capacity`.
    pub edge_load_with_deletes: f64,
    /// `edges / edge_capacity`.
    pub edge_load: f64,
    /// Hash buckets.
    pub buckets: usize,
    /// Edges sharing a bucket with an earlier edge, summed over all buckets.
    pub collisions: usize,
    /// Collisions in the most crowded bucket.
    pub max_collisions: usize,
    /// Collisions per occupied bucket.
    pub avg_collisions: f64,
    /// Observed chain distribution relative to a uniform hash. ~1.0 is ideal;
    /// values well above 1.0 mean keys are clustering.
    pub uniformity: f64,
}

impl AdjacencyList {
    /// Compute a statistics snapshot with one pass over the bucket array and
    /// one over the edge buffer.
    pub fn stats(&self) -> AdjacencyStats {
        let nodes = self.nodes.count;
        let node_capacity = self.nodes.capacity();
        let edges = self.edges.live;
        let deleted = self.edges.deleted;
        let edge_capacity = self.edges.capacity();
        let buckets = self.edges.bucket_count();

        let mut collisions = 0;
        let mut max_collisions = 0;
        let mut occupied = 0;
        // Sum of b_j * (b_j + 1) / 2 over every bucket j.
        let mut probe_cost = 0.0;
        for len in self.edges.chain_lengths() {
            occupied += 1;
            collisions += len - 1;
            max_collisions = max_collisions.max(len - 1);
            probe_cost += (len * (len + 1)) as f64 / 2.0;
        }

        let mut node_types = FxHashSet::default();
        for (edge_type, from, to) in self.edges.live_triples() {
            node_types.insert((from, edge_type));
            node_types.insert((to, edge_type));
        }

        let uniformity = if edges == 0 {
            1.0
        } else {
            let n = edges as f64;
            let m = buckets as f64;
            probe_cost / ((n / (2.0 * m)) * (n + 2.0 * m - 1.0))
        };

        AdjacencyStats {
            nodes,
            node_capacity,
            node_buffer_bytes: node_capacity * NODE_STRIDE * size_of::<u32>(),
            node_load: ratio(nodes, node_capacity),
            node_edge_types: node_types.len(),
            edges,
            deleted,
            edge_capacity,
            edge_buffer_bytes: edge_capacity * EDGE_STRIDE * size_of::<u32>()
                + buckets * size_of::<u32>(),
            edge_load_with_deletes: ratio(edges + deleted, edge_capacity),
            edge_load: ratio(edges, edge_capacity),
            buckets,
            collisions,
            max_collisions,
            avg_collisions: ratio(collisions, occupied),
            uniformity,
        }
    }
}

fn ratio(part: usize, whole: usize) -> f64 {
    if whole == 0 {
        0.0
    } else {
        part as f64 / whole as f64
    }
}

//! Flat snapshot of the adjacency buffers.

use serde::{Deserialize, Serialize};

use super::buffers::{EDGE_STRIDE, EdgeTable, FROM, NIL, NODE_STRIDE, NodeTable, TO, TYPE};
use super::{AdjacencyList, ResizePolicy};
use crate::config::GraphConfig;
use crate::error::{GraphError, Result};

/// Raw buffers of an [`AdjacencyList`].
///
/// The cache layer treats this as an opaque payload. Chain and hash links are
/// rebuilt on load from the edge records, so a snapshot can never deserialize
/// into a structure with dangling links.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SerializedAdjacencyList {
    pub node_count: u32,
    pub nodes: Vec<u32>,
    pub edges: Vec<u32>,
    pub edge_slots_used: u32,
    pub bucket_count: u32,
}

impl AdjacencyList {
    /// Snapshot the node and edge buffers.
    pub fn serialize(&self) -> SerializedAdjacencyList {
        SerializedAdjacencyList {
            node_count: self.nodes.count as u32,
            nodes: self.nodes.data.clone(),
            edges: self.edges.data[..self.edges.next_slot * EDGE_STRIDE].to_vec(),
            edge_slots_used: self.edges.next_slot as u32,
            bucket_count: self.edges.bucket_count() as u32,
        }
    }

    /// Rebuild an adjacency list from a snapshot using the default policy.
    pub fn deserialize(serialized: SerializedAdjacencyList) -> Result<Self> {
        Self::deserialize_with_config(serialized, &GraphConfig::default())
    }

    /// Rebuild an adjacency list from a snapshot.
    ///
    /// Node ids, edge triples and per-node edge order are restored exactly;
    /// tombstones are dropped.
    pub fn deserialize_with_config(
        serialized: SerializedAdjacencyList,
        config: &GraphConfig,
    ) -> Result<Self> {
        config.validate()?;
        let SerializedAdjacencyList {
            node_count,
            nodes,
            edges,
            edge_slots_used,
            bucket_count,
        } = serialized;

        if nodes.len() % NODE_STRIDE != 0 {
            return Err(invalid(format!(
                "node buffer length {} is not a multiple of {NODE_STRIDE}",
                nodes.len()
            )));
        }
        let node_capacity = nodes.len() / NODE_STRIDE;
        let node_count = node_count as usize;
        if node_count > node_capacity {
            return Err(invalid(format!(
                "node count {node_count} exceeds node capacity {node_capacity}"
            )));
        }
        let slots = edge_slots_used as usize;
        if edges.len() != slots * EDGE_STRIDE {
            return Err(invalid(format!(
                "edge buffer holds {} words, expected {} for {slots} slots",
                edges.len(),
                slots * EDGE_STRIDE
            )));
        }
        if bucket_count == 0 || !bucket_count.is_power_of_two() {
            return Err(invalid(format!(
                "bucket count {bucket_count} is not a power of two"
            )));
        }

        let mut live = 0;
        for (slot, record) in edges.chunks_exact(EDGE_STRIDE).enumerate() {
            if record[TYPE] == NIL {
                continue;
            }
            if record[FROM] as usize >= node_count || record[TO] as usize >= node_count {
                return Err(invalid(format!(
                    "edge slot {slot} references node outside 0..{node_count}"
                )));
            }
            live += 1;
        }

        let mut table = NodeTable::with_capacity(node_capacity.max(1));
        table.count = node_count;
        let min_buckets = (live as f64 / config.max_load_factor).ceil() as usize;
        let mut edge_table = EdgeTable::new(
            live.max(config.initial_edge_capacity).max(1),
            (bucket_count as usize).max(min_buckets),
        );

        for record in edges.chunks_exact(EDGE_STRIDE) {
            if record[TYPE] == NIL {
                continue;
            }
            if edge_table
                .find(record[FROM], record[TO], record[TYPE])
                .is_some()
            {
                return Err(invalid(format!(
                    "duplicate edge {} -> {} of type {}",
                    record[FROM], record[TO], record[TYPE]
                )));
            }
            edge_table.insert(&mut table, record[FROM], record[TO], record[TYPE]);
        }

        tracing::debug!(
            nodes = node_count,
            edges = live,
            "deserialized adjacency list"
        );

        Ok(Self {
            nodes: table,
            edges: edge_table,
            policy: ResizePolicy::from(config),
        })
    }
}

fn invalid(message: String) -> GraphError {
    GraphError::Deserialization(message)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{EdgeFilter, EdgeType, NodeId};

    const T1: EdgeType = EdgeType::new(1);
    const T2: EdgeType = EdgeType::new(2);

    #[test]
    fn test_round_trip_preserves_nodes_edges_and_order() {
        let mut list = AdjacencyList::new();
        let ids: Vec<NodeId> = (0..6).map(|_| list.add_node().unwrap()).collect();
        list.add_edge(ids[0], ids[4], T1).unwrap();
        list.add_edge(ids[0], ids[2], T2).unwrap();
        list.add_edge(ids[0], ids[1], T1).unwrap();
        list.add_edge(ids[3], ids[0], T1).unwrap();
        list.remove_edge(ids[0], ids[2], T2);

        let restored = AdjacencyList::deserialize(list.serialize()).unwrap();

        assert_eq!(restored.node_count(), 6);
        assert_eq!(restored.edge_count(), 3);
        assert_eq!(
            restored.get_node_ids_connected_from(ids[0], EdgeFilter::All),
            vec![ids[4], ids[1]]
        );
        assert!(restored.has_edge(ids[3], ids[0], T1));
        assert!(!restored.has_edge(ids[0], ids[2], T2));
        assert_eq!(restored.stats().deleted, 0);
        assert_eq!(
            restored.get_all_edges().collect::<Vec<_>>(),
            list.get_all_edges().collect::<Vec<_>>()
        );
    }

    #[test]
    fn test_deserialize_rejects_bad_stride() {
        let mut serialized = AdjacencyList::new().serialize();
        serialized.nodes.push(0);
        let err = AdjacencyList::deserialize(serialized).unwrap_err();
        assert!(matches!(err, GraphError::Deserialization(_)));
    }

    #[test]
    fn test_deserialize_rejects_out_of_range_edge() {
        let mut list = AdjacencyList::new();
        let a = list.add_node().unwrap();
        let b = list.add_node().unwrap();
        list.add_edge(a, b, T1).unwrap();

        let mut serialized = list.serialize();
        serialized.node_count = 1;
        let err = AdjacencyList::deserialize(serialized).unwrap_err();
        assert!(err.to_string().contains("outside"));
    }

    #[test]
    fn test_deserialize_rejects_non_power_of_two_buckets() {
        let mut serialized = AdjacencyList::new().serialize();
        serialized.bucket_count = 3;
        assert!(AdjacencyList::deserialize(serialized).is_err());
    }
}

//! Persistence for ContentGraph.

use rustc_hash::FxHashMap;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use super::ContentGraph;
use crate::config::GraphConfig;
use crate::error::{GraphError, Result};
use crate::graph::serialization::{decode_payload, encode_payload};
use crate::graph::{Graph, SerializedGraph};
use crate::types::NodeId;

/// Graph snapshot plus the key map, stored as `(key, id)` pairs sorted by id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SerializedContentGraph<N> {
    pub graph: SerializedGraph<N>,
    pub content_keys: Vec<(String, NodeId)>,
}

impl<N> ContentGraph<N> {
    fn sorted_keys(&self) -> Vec<(String, NodeId)> {
        let mut keys: Vec<(String, NodeId)> = self
            .content_key_to_node_id
            .iter()
            .map(|(key, &id)| (key.clone(), id))
            .collect();
        keys.sort_unstable_by_key(|&(_, id)| id);
        keys
    }

    pub fn serialize(&self) -> SerializedContentGraph<N>
    where
        N: Clone,
    {
        SerializedContentGraph {
            graph: self.graph.serialize(),
            content_keys: self.sorted_keys(),
        }
    }

    pub fn deserialize(serialized: SerializedContentGraph<N>) -> Result<Self> {
        Self::deserialize_with_config(serialized, &GraphConfig::default())
    }

    /// Rebuild a content graph, deriving the id-to-key map from the stored
    /// key list.
    ///
    /// # Errors
    ///
    /// Fails if a key points at a removed node, or if a key or a node appears
    /// twice.
    pub fn deserialize_with_config(
        serialized: SerializedContentGraph<N>,
        config: &GraphConfig,
    ) -> Result<Self> {
        let graph = Graph::deserialize_with_config(serialized.graph, config)?;

        let mut content_key_to_node_id = FxHashMap::default();
        let mut node_id_to_content_key = FxHashMap::default();
        for (key, id) in serialized.content_keys {
            if !graph.has_node(id) {
                return Err(GraphError::Deserialization(format!(
                    "content key {key:?} points at removed node {id}"
                )));
            }
            if node_id_to_content_key.insert(id, key.clone()).is_some() {
                return Err(GraphError::Deserialization(format!(
                    "node {id} has more than one content key"
                )));
            }
            if content_key_to_node_id.insert(key, id).is_some() {
                return Err(GraphError::Deserialization(format!(
                    "content key for node {id} is mapped twice"
                )));
            }
        }

        tracing::debug!(
            nodes = graph.node_count(),
            keys = content_key_to_node_id.len(),
            "deserialized content graph"
        );

        Ok(Self {
            graph,
            content_key_to_node_id,
            node_id_to_content_key,
        })
    }

    /// Serialize to versioned bincode bytes.
    pub fn to_bytes(&self) -> Result<Vec<u8>>
    where
        N: Serialize + Clone,
    {
        encode_payload(&self.serialize())
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self>
    where
        N: DeserializeOwned,
    {
        Self::deserialize(decode_payload(bytes)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::EdgeType;

    fn sample() -> ContentGraph<u32> {
        let mut graph = ContentGraph::new();
        let a = graph.add_node_by_content_key("a.js", 1).unwrap();
        let b = graph.add_node_by_content_key("b.js", 2).unwrap();
        let gone = graph.add_node_by_content_key("gone.js", 3).unwrap();
        let plain = graph.add_node(4).unwrap();
        graph.add_edge(a, b, EdgeType::DEFAULT).unwrap();
        graph.add_edge(b, plain, EdgeType::new(2)).unwrap();
        graph.remove_node(gone).unwrap();
        graph
    }

    #[test]
    fn test_round_trip_restores_both_maps() {
        let graph = sample();
        let restored = ContentGraph::deserialize(graph.serialize()).unwrap();

        let a = restored.get_node_id_by_content_key("a.js").unwrap();
        let b = restored.get_node_id_by_content_key("b.js").unwrap();
        assert_eq!(restored.content_key_for(a), Some("a.js"));
        assert_eq!(restored.content_key_for(b), Some("b.js"));
        assert!(!restored.has_content_key("gone.js"));
        assert!(restored.has_edge(a, b, EdgeType::DEFAULT));
        assert_eq!(restored.content_keys().count(), 2);
        assert_eq!(restored.node_count(), 3);
    }

    #[test]
    fn test_bytes_round_trip() {
        let graph = sample();
        let restored = ContentGraph::<u32>::from_bytes(&graph.to_bytes().unwrap()).unwrap();
        assert_eq!(restored.get_node_by_content_key("b.js"), Some(&2));
    }

    #[test]
    fn test_rejects_key_on_removed_node() {
        let mut serialized = sample().serialize();
        serialized
            .content_keys
            .push(("gone.js".to_string(), NodeId::new(2)));

        let err = ContentGraph::deserialize(serialized).unwrap_err();
        assert!(err.to_string().contains("removed node"));
    }

    #[test]
    fn test_rejects_duplicate_key() {
        let mut serialized = sample().serialize();
        serialized
            .content_keys
            .push(("a.js".to_string(), NodeId::new(3)));

        assert!(ContentGraph::deserialize(serialized).is_err());
    }
}

//! Persistence and debug export for Graph.

use std::fmt::Write as _;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use super::Graph;
use crate::adjacency::{AdjacencyList, SerializedAdjacencyList};
use crate::config::GraphConfig;
use crate::error::{GraphError, Result};
use crate::types::NodeId;

/// Binary format version written by [`Graph::to_bytes`].
///
/// - Version 1: node values, adjacency buffers, root id
pub const FORMAT_VERSION: u32 = 1;

/// Whole-graph snapshot. Vacant entries in `nodes` are removed node ids.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SerializedGraph<N> {
    pub nodes: Vec<Option<N>>,
    pub adjacency_list: SerializedAdjacencyList,
    pub root_node_id: Option<NodeId>,
}

/// Helper to escape labels for DOT format.
fn escape_label(label: &str) -> String {
    label.replace('\\', "\\\\").replace('"', "\\\"")
}

impl<N> Graph<N> {
    /// Snapshot the graph, cloning node values.
    pub fn serialize(&self) -> SerializedGraph<N>
    where
        N: Clone,
    {
        SerializedGraph {
            nodes: self.nodes.clone(),
            adjacency_list: self.adjacency.serialize(),
            root_node_id: self.root_node_id,
        }
    }

    /// Snapshot the graph, moving node values out.
    pub fn into_serialized(self) -> SerializedGraph<N> {
        SerializedGraph {
            adjacency_list: self.adjacency.serialize(),
            nodes: self.nodes,
            root_node_id: self.root_node_id,
        }
    }

    pub fn deserialize(serialized: SerializedGraph<N>) -> Result<Self> {
        Self::deserialize_with_config(serialized, &GraphConfig::default())
    }

    /// Rebuild a graph from a snapshot.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::Deserialization`] if the node values and the
    /// adjacency buffers disagree on which nodes exist, or if the root is not
    /// a live node.
    pub fn deserialize_with_config(
        serialized: SerializedGraph<N>,
        config: &GraphConfig,
    ) -> Result<Self> {
        let SerializedGraph {
            nodes,
            adjacency_list,
            root_node_id,
        } = serialized;

        let adjacency = AdjacencyList::deserialize_with_config(adjacency_list, config)?;
        if nodes.len() != adjacency.node_count() {
            return Err(GraphError::Deserialization(format!(
                "{} node values for {} adjacency nodes",
                nodes.len(),
                adjacency.node_count()
            )));
        }

        let vacant = |id: NodeId| nodes.get(id.index()).is_none_or(Option::is_none);
        if let Some(edge) = adjacency
            .get_all_edges()
            .find(|edge| vacant(edge.from) || vacant(edge.to))
        {
            return Err(GraphError::Deserialization(format!(
                "edge {} -> {} touches a removed node",
                edge.from, edge.to
            )));
        }
        if let Some(root) = root_node_id.filter(|&root| vacant(root)) {
            return Err(GraphError::Deserialization(format!(
                "root node {root} is not a live node"
            )));
        }

        let live_nodes = nodes.iter().filter(|value| value.is_some()).count();
        Ok(Self {
            nodes,
            adjacency,
            root_node_id,
            live_nodes,
        })
    }

    /// Serialize the graph to binary format using bincode.
    ///
    /// The payload starts with [`FORMAT_VERSION`] so that stale caches are
    /// rejected instead of misread.
    pub fn to_bytes(&self) -> Result<Vec<u8>>
    where
        N: Serialize,
    {
        // Field order matches `SerializedGraph`, so the bytes decode as one.
        #[derive(Serialize)]
        struct SnapshotRef<'a, N> {
            nodes: &'a [Option<N>],
            adjacency_list: SerializedAdjacencyList,
            root_node_id: Option<NodeId>,
        }

        let bytes = encode_payload(&SnapshotRef {
            nodes: &self.nodes,
            adjacency_list: self.adjacency.serialize(),
            root_node_id: self.root_node_id,
        })?;
        tracing::debug!(
            bytes = bytes.len(),
            nodes = self.live_nodes,
            "serialized graph"
        );
        Ok(bytes)
    }

    /// Deserialize a graph written by [`Graph::to_bytes`].
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Decoding fails
    /// - The format version is not [`FORMAT_VERSION`]
    /// - The decoded snapshot is inconsistent
    pub fn from_bytes(bytes: &[u8]) -> Result<Self>
    where
        N: DeserializeOwned,
    {
        Self::deserialize(decode_payload(bytes)?)
    }

    /// Export the graph as DOT format for visualization.
    ///
    /// Edges are labelled with their type.
    pub fn to_dot_format<F>(&self, mut label: F) -> String
    where
        F: FnMut(NodeId, &N) -> String,
    {
        let mut output = String::from("digraph Graph {\n");
        for (id, value) in self.nodes() {
            let _ = writeln!(
                output,
                "    {id} [label=\"{}\"];",
                escape_label(&label(id, value))
            );
        }
        for edge in self.get_all_edges() {
            let _ = writeln!(
                output,
                "    {} -> {} [label=\"{}\"];",
                edge.from, edge.to, edge.edge_type
            );
        }
        output.push_str("}\n");
        output
    }
}

/// Encode `snapshot` behind a format version.
pub(crate) fn encode_payload<S: Serialize>(snapshot: &S) -> Result<Vec<u8>> {
    bincode::serde::encode_to_vec((FORMAT_VERSION, snapshot), bincode::config::standard())
        .map_err(|e| GraphError::Serialization(e.to_string()))
}

/// Decode a snapshot written by [`encode_payload`], checking its version first.
pub(crate) fn decode_payload<S: DeserializeOwned>(bytes: &[u8]) -> Result<S> {
    let (version, _): (u32, usize) =
        bincode::serde::decode_from_slice(bytes, bincode::config::standard())
            .map_err(|e| GraphError::Deserialization(e.to_string()))?;
    if version != FORMAT_VERSION {
        return Err(GraphError::IncompatibleFormat {
            expected: FORMAT_VERSION,
            found: version,
        });
    }

    let ((_, snapshot), _): ((u32, S), usize) =
        bincode::serde::decode_from_slice(bytes, bincode::config::standard())
            .map_err(|e| GraphError::Deserialization(e.to_string()))?;
    Ok(snapshot)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::EdgeType;

    const T1: EdgeType = EdgeType::DEFAULT;
    const T2: EdgeType = EdgeType::new(2);

    fn sample() -> (Graph<String>, Vec<NodeId>) {
        let mut graph = Graph::new();
        let ids: Vec<NodeId> = ["entry.js", "a.js", "b.js", "gone.js"]
            .iter()
            .map(|name| graph.add_node(name.to_string()).unwrap())
            .collect();
        graph.add_edge(ids[0], ids[1], T1).unwrap();
        graph.add_edge(ids[0], ids[2], T2).unwrap();
        graph.add_edge(ids[1], ids[3], T1).unwrap();
        graph.remove_node(ids[3]).unwrap();
        graph.set_root_node_id(Some(ids[0])).unwrap();
        (graph, ids)
    }

    #[test]
    fn test_snapshot_round_trip() {
        let (graph, ids) = sample();
        let restored = Graph::deserialize(graph.serialize()).unwrap();

        assert_eq!(restored.node_count(), 3);
        assert_eq!(restored.root_node_id(), Some(ids[0]));
        assert!(restored.get_node(ids[3]).is_none());
        assert_eq!(
            restored.nodes().collect::<Vec<_>>(),
            graph.nodes().collect::<Vec<_>>()
        );
        assert_eq!(
            restored.get_all_edges().collect::<Vec<_>>(),
            graph.get_all_edges().collect::<Vec<_>>()
        );
    }

    #[test]
    fn test_bytes_round_trip() {
        let (graph, ids) = sample();
        let bytes = graph.to_bytes().unwrap();
        let restored: Graph<String> = Graph::from_bytes(&bytes).unwrap();

        assert_eq!(restored.get_node(ids[1]).map(String::as_str), Some("a.js"));
        assert!(restored.has_edge(ids[0], ids[2], T2));
        assert_eq!(restored.edge_count(), 2);
    }

    #[test]
    fn test_from_bytes_rejects_other_versions() {
        let (graph, _) = sample();
        let mut snapshot_bytes = bincode::serde::encode_to_vec(
            (FORMAT_VERSION + 1, graph.serialize()),
            bincode::config::standard(),
        )
        .unwrap();

        let err = Graph::<String>::from_bytes(&snapshot_bytes).unwrap_err();
        assert_eq!(
            err,
            GraphError::IncompatibleFormat {
                expected: FORMAT_VERSION,
                found: FORMAT_VERSION + 1
            }
        );

        snapshot_bytes.truncate(3);
        assert!(Graph::<String>::from_bytes(&snapshot_bytes).is_err());
    }

    #[test]
    fn test_deserialize_rejects_edges_on_vacant_nodes() {
        let (graph, ids) = sample();
        let mut snapshot = graph.serialize();
        snapshot.nodes[ids[2].index()] = None;

        let err = Graph::deserialize(snapshot).unwrap_err();
        assert!(matches!(err, GraphError::Deserialization(_)));
    }

    #[test]
    fn test_deserialize_rejects_dead_root() {
        let (graph, ids) = sample();
        let mut snapshot = graph.serialize();
        snapshot.root_node_id = Some(ids[3]);
        assert!(Graph::deserialize(snapshot).is_err());
    }

    #[test]
    fn test_deserialize_rejects_invalid_config() {
        let (graph, _) = sample();
        let config = GraphConfig {
            max_load_factor: 0.0,
            ..GraphConfig::default()
        };

        let err = Graph::deserialize_with_config(graph.serialize(), &config).unwrap_err();
        assert!(matches!(err, GraphError::Config(_)));
    }

    #[test]
    fn test_dot_format() {
        let (graph, _) = sample();
        let dot = graph.to_dot_format(|_, name| format!("\"{name}\""));

        assert!(dot.starts_with("digraph Graph {"));
        assert!(dot.contains(r#"0 [label="\"entry.js\""];"#));
        assert!(dot.contains(r#"0 -> 2 [label="2"];"#));
        assert!(!dot.contains("gone.js"));
    }
}

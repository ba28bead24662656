//! Graph mutations as data.
//!
//! Workers that run in parallel (transforming files, resolving imports) must
//! not touch the graph. They describe what they found as a [`MutationBatch`]
//! keyed by content key, and the thread that owns the [`ContentGraph`] applies
//! the batches one at a time with [`ContentGraph::apply`].

use serde::{Deserialize, Serialize};

use crate::content_graph::ContentGraph;
use crate::error::Result;
use crate::types::{EdgeFilter, EdgeType, NodeId};

/// One change to a content graph.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GraphMutation<N> {
    /// Insert a node, or overwrite the value of the node already under `key`.
    AddNode { key: String, value: N },
    AddEdge {
        from_key: String,
        to_key: String,
        edge_type: EdgeType,
    },
    RemoveNode { key: String },
    /// Make the outgoing `edge_type` edges of `from_key` point at exactly
    /// `to_keys`.
    ReplaceEdges {
        from_key: String,
        to_keys: Vec<String>,
        edge_type: EdgeType,
    },
    /// Remove outgoing edges of `key`, of one type or of every type.
    RemoveEdges {
        key: String,
        edge_type: Option<EdgeType>,
    },
}

/// An ordered list of mutations produced off the owning thread.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MutationBatch<N> {
    mutations: Vec<GraphMutation<N>>,
}

impl<N> Default for MutationBatch<N> {
    fn default() -> Self {
        Self {
            mutations: Vec::new(),
        }
    }
}

impl<N> MutationBatch<N> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, mutation: GraphMutation<N>) -> &mut Self {
        self.mutations.push(mutation);
        self
    }

    pub fn add_node(&mut self, key: impl Into<String>, value: N) -> &mut Self {
        self.push(GraphMutation::AddNode {
            key: key.into(),
            value,
        })
    }

    pub fn add_edge(
        &mut self,
        from_key: impl Into<String>,
        to_key: impl Into<String>,
        edge_type: EdgeType,
    ) -> &mut Self {
        self.push(GraphMutation::AddEdge {
            from_key: from_key.into(),
            to_key: to_key.into(),
            edge_type,
        })
    }

    pub fn remove_node(&mut self, key: impl Into<String>) -> &mut Self {
        self.push(GraphMutation::RemoveNode { key: key.into() })
    }

    pub fn replace_edges<I, K>(
        &mut self,
        from_key: impl Into<String>,
        to_keys: I,
        edge_type: EdgeType,
    ) -> &mut Self
    where
        I: IntoIterator<Item = K>,
        K: Into<String>,
    {
        self.push(GraphMutation::ReplaceEdges {
            from_key: from_key.into(),
            to_keys: to_keys.into_iter().map(Into::into).collect(),
            edge_type,
        })
    }

    pub fn remove_edges(
        &mut self,
        key: impl Into<String>,
        edge_type: Option<EdgeType>,
    ) -> &mut Self {
        self.push(GraphMutation::RemoveEdges {
            key: key.into(),
            edge_type,
        })
    }

    /// Append every mutation of `other`, keeping order.
    pub fn append(&mut self, other: MutationBatch<N>) {
        self.mutations.extend(other.mutations);
    }

    pub fn len(&self) -> usize {
        self.mutations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.mutations.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &GraphMutation<N>> + '_ {
        self.mutations.iter()
    }
}

impl<N> FromIterator<GraphMutation<N>> for MutationBatch<N> {
    fn from_iter<I: IntoIterator<Item = GraphMutation<N>>>(iter: I) -> Self {
        Self {
            mutations: iter.into_iter().collect(),
        }
    }
}

impl<N> IntoIterator for MutationBatch<N> {
    type Item = GraphMutation<N>;
    type IntoIter = std::vec::IntoIter<GraphMutation<N>>;

    fn into_iter(self) -> Self::IntoIter {
        self.mutations.into_iter()
    }
}

/// Counts of what a batch changed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchSummary {
    pub applied: usize,
    pub nodes_added: usize,
    pub nodes_updated: usize,
    pub nodes_removed: usize,
    pub edges_added: usize,
    pub edges_removed: usize,
}

impl<N> ContentGraph<N> {
    /// Apply `batch` in order.
    ///
    /// Stops at the first failing mutation and returns its error. Mutations
    /// before it stay applied.
    pub fn apply(&mut self, batch: MutationBatch<N>) -> Result<BatchSummary> {
        let total = batch.len();
        let mut summary = BatchSummary::default();

        for (index, mutation) in batch.into_iter().enumerate() {
            if let Err(err) = self.apply_one(mutation, &mut summary) {
                tracing::warn!(index, total, error = %err, "graph mutation batch aborted");
                return Err(err);
            }
            summary.applied += 1;
        }

        tracing::debug!(?summary, "applied graph mutation batch");
        Ok(summary)
    }

    fn apply_one(&mut self, mutation: GraphMutation<N>, summary: &mut BatchSummary) -> Result<()> {
        match mutation {
            GraphMutation::AddNode { key, value } => {
                if self.has_content_key(&key) {
                    summary.nodes_updated += 1;
                } else {
                    summary.nodes_added += 1;
                }
                self.upsert_node_by_content_key(key, value)?;
            }
            GraphMutation::AddEdge {
                from_key,
                to_key,
                edge_type,
            } => {
                let from = self.get_node_id_by_content_key(&from_key)?;
                let to = self.get_node_id_by_content_key(&to_key)?;
                if self.add_edge(from, to, edge_type)? {
                    summary.edges_added += 1;
                }
            }
            GraphMutation::RemoveNode { key } => {
                let id = self.get_node_id_by_content_key(&key)?;
                let before = self.edge_count();
                self.remove_node(id)?;
                summary.nodes_removed += 1;
                summary.edges_removed += before - self.edge_count();
            }
            GraphMutation::ReplaceEdges {
                from_key,
                to_keys,
                edge_type,
            } => {
                let from = self.get_node_id_by_content_key(&from_key)?;
                let targets = to_keys
                    .iter()
                    .map(|key| self.get_node_id_by_content_key(key))
                    .collect::<Result<Vec<NodeId>>>()?;
                let delta = self.replace_node_ids_connected_to(from, &targets, edge_type)?;
                summary.edges_added += delta.added.len();
                summary.edges_removed += delta.removed.len();
            }
            GraphMutation::RemoveEdges { key, edge_type } => {
                let id = self.get_node_id_by_content_key(&key)?;
                let before = self.edge_count();
                self.remove_edges(id, EdgeFilter::from(edge_type))?;
                summary.edges_removed += before - self.edge_count();
            }
        }
        Ok(())
    }
}

//! Ordering and search queries for Graph.

use std::cmp::Reverse;
use std::collections::BinaryHeap;

use rustc_hash::FxHashMap;

use super::Graph;
use crate::error::{GraphError, Result};
use crate::types::{EdgeFilter, NodeId};
use crate::visitor::TraversalActions;

impl<N> Graph<N> {
    /// Topologically order every live node by the edges that pass `filter`.
    ///
    /// Uses Kahn's algorithm. Among nodes that are ready at the same time the
    /// smallest id comes first, so the order is deterministic. A cycle is an
    /// error listing the nodes that could not be ordered.
    pub fn topo_sort<'a>(&self, filter: impl Into<EdgeFilter<'a>>) -> Result<Vec<NodeId>> {
        let nodes: Vec<NodeId> = self.node_ids().collect();
        self.kahn(&nodes, filter.into())
    }

    /// Topologically order the nodes reachable from `start` (the root when
    /// `None`) by the edges that pass `filter`.
    pub fn topo_sort_from<'a>(
        &self,
        start: Option<NodeId>,
        filter: impl Into<EdgeFilter<'a>>,
    ) -> Result<Vec<NodeId>> {
        let filter = filter.into();
        let mut reachable = Vec::new();
        self.traverse(
            |id, _: Option<&()>, _| {
                reachable.push(id);
                None
            },
            start,
            filter,
        )?;
        self.kahn(&reachable, filter)
    }

    fn kahn(&self, nodes: &[NodeId], filter: EdgeFilter<'_>) -> Result<Vec<NodeId>> {
        let mut in_degree: FxHashMap<NodeId, usize> =
            nodes.iter().map(|&id| (id, 0)).collect();

        for &from in nodes {
            for to in self.adjacency.get_node_ids_connected_from(from, filter) {
                if let Some(degree) = in_degree.get_mut(&to) {
                    *degree += 1;
                }
            }
        }

        let mut ready: BinaryHeap<Reverse<NodeId>> = in_degree
            .iter()
            .filter(|&(_, &degree)| degree == 0)
            .map(|(&id, _)| Reverse(id))
            .collect();

        let mut sorted = Vec::with_capacity(nodes.len());
        while let Some(Reverse(id)) = ready.pop() {
            sorted.push(id);
            for to in self.adjacency.get_node_ids_connected_from(id, filter) {
                if let Some(degree) = in_degree.get_mut(&to) {
                    *degree -= 1;
                    if *degree == 0 {
                        ready.push(Reverse(to));
                    }
                }
            }
        }

        if sorted.len() < nodes.len() {
            let mut remaining: Vec<NodeId> = in_degree
                .into_iter()
                .filter(|&(_, degree)| degree > 0)
                .map(|(id, _)| id)
                .collect();
            remaining.sort_unstable();
            tracing::warn!(
                sorted = sorted.len(),
                remaining = remaining.len(),
                "cycle detected during topological sort"
            );
            return Err(GraphError::Cycle { nodes: remaining });
        }
        Ok(sorted)
    }

    /// First node reachable through incoming edges (including `start`) that
    /// satisfies `predicate`. The walk stops at the first match.
    pub fn find_ancestor<'a, P>(
        &self,
        start: NodeId,
        filter: impl Into<EdgeFilter<'a>>,
        mut predicate: P,
    ) -> Result<Option<NodeId>>
    where
        P: FnMut(NodeId) -> bool,
    {
        let mut found = None;
        self.traverse_ancestors(
            start,
            |id, _: Option<&()>, actions: &mut TraversalActions| {
                if predicate(id) {
                    found = Some(id);
                    actions.stop();
                }
                None
            },
            filter,
        )?;
        Ok(found)
    }

    /// Every node reachable through incoming edges (including `start`) that
    /// satisfies `predicate`, in visit order.
    pub fn find_ancestors<'a, P>(
        &self,
        start: NodeId,
        filter: impl Into<EdgeFilter<'a>>,
        mut predicate: P,
    ) -> Result<Vec<NodeId>>
    where
        P: FnMut(NodeId) -> bool,
    {
        let mut found = Vec::new();
        self.traverse_ancestors(
            start,
            |id, _: Option<&()>, _| {
                if predicate(id) {
                    found.push(id);
                }
                None
            },
            filter,
        )?;
        Ok(found)
    }

    /// First node reachable through outgoing edges (including `start`) that
    /// satisfies `predicate`.
    pub fn find_descendant<'a, P>(
        &self,
        start: NodeId,
        filter: impl Into<EdgeFilter<'a>>,
        mut predicate: P,
    ) -> Result<Option<NodeId>>
    where
        P: FnMut(NodeId) -> bool,
    {
        let mut found = None;
        self.traverse(
            |id, _: Option<&()>, actions: &mut TraversalActions| {
                if predicate(id) {
                    found = Some(id);
                    actions.stop();
                }
                None
            },
            Some(start),
            filter,
        )?;
        Ok(found)
    }

    pub fn find_descendants<'a, P>(
        &self,
        start: NodeId,
        filter: impl Into<EdgeFilter<'a>>,
        mut predicate: P,
    ) -> Result<Vec<NodeId>>
    where
        P: FnMut(NodeId) -> bool,
    {
        let mut found = Vec::new();
        self.traverse(
            |id, _: Option<&()>, _| {
                if predicate(id) {
                    found.push(id);
                }
                None
            },
            Some(start),
            filter,
        )?;
        Ok(found)
    }
}

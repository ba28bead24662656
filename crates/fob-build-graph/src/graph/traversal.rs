//! Depth-first and breadth-first walks for Graph.
//!
//! All walks are iterative. Each stack frame owns the context its node's
//! visitor returned (if any) and records the index of the nearest ancestor
//! frame that owns one, so descendants borrow the inherited context instead of
//! cloning it.

use std::collections::VecDeque;

use super::Graph;
use crate::error::{GraphError, Result};
use crate::types::{EdgeFilter, NodeId};
use crate::visitor::{GraphVisitor, MapVisitor, TraversalActions};

struct Frame<C> {
    node: NodeId,
    context: Option<C>,
    /// Nearest ancestor frame holding a context.
    inherited: Option<usize>,
    children: Vec<NodeId>,
    cursor: usize,
}

fn mark(visited: &mut [bool], id: NodeId) -> bool {
    match visited.get_mut(id.index()) {
        Some(seen) if !*seen => {
            *seen = true;
            true
        }
        _ => false,
    }
}

/// Walk from `start`, asking `children` for each entered node's successors.
///
/// A node is marked visited when it is first reached, so every node is
/// entered at most once. Returns the context in effect where `stop()` was
/// called, or the start node's own context when the walk runs out.
fn depth_first<C, V, G>(
    start: NodeId,
    node_slots: usize,
    mut visitor: V,
    mut children: G,
) -> Option<C>
where
    V: GraphVisitor<NodeId, C>,
    G: FnMut(NodeId) -> Vec<NodeId>,
{
    let mut visited = vec![false; node_slots];
    let mut actions = TraversalActions::default();
    let mut frames: Vec<Frame<C>> = Vec::new();

    mark(&mut visited, start);
    let context = visitor.enter(start, None, &mut actions);
    if actions.is_stopped() {
        tracing::trace!(node = %start, "traversal stopped");
        return context;
    }
    if actions.take_skipped() {
        return context;
    }
    frames.push(Frame {
        node: start,
        context,
        inherited: None,
        children: children(start),
        cursor: 0,
    });

    loop {
        let Some(top) = frames.last_mut() else {
            return None;
        };
        let next = top.children.get(top.cursor).copied();
        top.cursor += 1;

        match next {
            Some(child) => {
                if !mark(&mut visited, child) {
                    continue;
                }
                let parent = frames.len() - 1;
                let inherited = if frames[parent].context.is_some() {
                    Some(parent)
                } else {
                    frames[parent].inherited
                };
                let parent_context = inherited.and_then(|i| frames[i].context.as_ref());

                let context = visitor.enter(child, parent_context, &mut actions);
                if actions.is_stopped() {
                    tracing::trace!(node = %child, "traversal stopped");
                    return context.or_else(|| inherited.and_then(|i| frames[i].context.take()));
                }
                if actions.take_skipped() {
                    continue;
                }
                frames.push(Frame {
                    node: child,
                    context,
                    inherited,
                    children: children(child),
                    cursor: 0,
                });
            }
            None => {
                let Some(mut frame) = frames.pop() else {
                    return None;
                };
                if visitor.has_exit() {
                    let context = match frame.context.as_ref() {
                        Some(own) => Some(own),
                        None => frame.inherited.and_then(|i| frames[i].context.as_ref()),
                    };
                    if let Some(updated) = visitor.exit(frame.node, context, &mut actions) {
                        frame.context = Some(updated);
                    }
                    actions.take_skipped();
                    if actions.is_stopped() {
                        tracing::trace!(node = %frame.node, "traversal stopped on exit");
                        return frame
                            .context
                            .or_else(|| frame.inherited.and_then(|i| frames[i].context.take()));
                    }
                }
                if frames.is_empty() {
                    return frame.context;
                }
            }
        }
    }
}

impl<N> Graph<N> {
    fn resolve_start(&self, start: Option<NodeId>) -> Result<NodeId> {
        let start = start
            .or(self.root_node_id)
            .ok_or(GraphError::NoStartNode)?;
        self.assert_has_node(start)?;
        Ok(start)
    }

    /// Depth-first walk along outgoing edges that pass `filter`, calling
    /// `visit` as each node is entered.
    ///
    /// Starts at `start`, or at the root when `start` is `None`.
    pub fn traverse<'a, C, F>(
        &self,
        visit: F,
        start: Option<NodeId>,
        filter: impl Into<EdgeFilter<'a>>,
    ) -> Result<Option<C>>
    where
        F: FnMut(NodeId, Option<&C>, &mut TraversalActions) -> Option<C>,
    {
        self.traverse_with(visit, start, filter)
    }

    /// [`Graph::traverse`] with any [`GraphVisitor`], e.g. an
    /// [`EnterExit`](crate::EnterExit) pair.
    pub fn traverse_with<'a, C, V>(
        &self,
        visitor: V,
        start: Option<NodeId>,
        filter: impl Into<EdgeFilter<'a>>,
    ) -> Result<Option<C>>
    where
        V: GraphVisitor<NodeId, C>,
    {
        let start = self.resolve_start(start)?;
        let filter = filter.into();
        Ok(depth_first(
            start,
            self.adjacency.node_count(),
            visitor,
            |id| self.adjacency.get_node_ids_connected_from(id, filter),
        ))
    }

    /// Depth-first walk where `map` projects each node to the value `visit`
    /// sees. Nodes mapped to `None` are walked through but not visited.
    pub fn filtered_traverse<'a, T, C, M, F>(
        &self,
        map: M,
        visit: F,
        start: Option<NodeId>,
        filter: impl Into<EdgeFilter<'a>>,
    ) -> Result<Option<C>>
    where
        M: FnMut(NodeId, &mut TraversalActions) -> Option<T>,
        F: FnMut(T, Option<&C>, &mut TraversalActions) -> Option<C>,
    {
        self.filtered_traverse_with(map, visit, start, filter)
    }

    pub fn filtered_traverse_with<'a, T, C, M, V>(
        &self,
        map: M,
        visitor: V,
        start: Option<NodeId>,
        filter: impl Into<EdgeFilter<'a>>,
    ) -> Result<Option<C>>
    where
        M: FnMut(NodeId, &mut TraversalActions) -> Option<T>,
        V: GraphVisitor<T, C>,
    {
        self.traverse_with(MapVisitor::<M, V, T>::new(map, visitor), start, filter)
    }

    /// Depth-first walk along incoming edges, starting at `start`.
    pub fn traverse_ancestors<'a, C, F>(
        &self,
        start: NodeId,
        visit: F,
        filter: impl Into<EdgeFilter<'a>>,
    ) -> Result<Option<C>>
    where
        F: FnMut(NodeId, Option<&C>, &mut TraversalActions) -> Option<C>,
    {
        self.traverse_ancestors_with(start, visit, filter)
    }

    pub fn traverse_ancestors_with<'a, C, V>(
        &self,
        start: NodeId,
        visitor: V,
        filter: impl Into<EdgeFilter<'a>>,
    ) -> Result<Option<C>>
    where
        V: GraphVisitor<NodeId, C>,
    {
        self.assert_has_node(start)?;
        let filter = filter.into();
        Ok(depth_first(
            start,
            self.adjacency.node_count(),
            visitor,
            |id| self.adjacency.get_node_ids_connected_to(id, filter),
        ))
    }

    /// Depth-first walk where `get_children` decides each node's successors.
    ///
    /// Children that are not live nodes are ignored.
    pub fn dfs<C, V, G>(
        &self,
        visitor: V,
        start: Option<NodeId>,
        mut get_children: G,
    ) -> Result<Option<C>>
    where
        V: GraphVisitor<NodeId, C>,
        G: FnMut(NodeId) -> Vec<NodeId>,
    {
        let start = self.resolve_start(start)?;
        Ok(depth_first(
            start,
            self.adjacency.node_count(),
            visitor,
            |id| {
                let mut children = get_children(id);
                children.retain(|child| self.has_node(*child));
                children
            },
        ))
    }

    /// Breadth-first scan from the root along edges of every type.
    ///
    /// Returns the first node for which `visit` returns `true`. Without a root
    /// there is nothing to scan and the result is `Ok(None)`. Use
    /// [`Graph::bfs_from`] with [`crate::EdgeType::DEFAULT`] to follow only the
    /// default relationship.
    pub fn bfs<F>(&self, visit: F) -> Result<Option<NodeId>>
    where
        F: FnMut(NodeId) -> bool,
    {
        match self.root_node_id {
            Some(root) => self.bfs_from(root, EdgeFilter::All, visit),
            None => Ok(None),
        }
    }

    /// Breadth-first scan from `start` along edges that pass `filter`.
    pub fn bfs_from<'a, F>(
        &self,
        start: NodeId,
        filter: impl Into<EdgeFilter<'a>>,
        mut visit: F,
    ) -> Result<Option<NodeId>>
    where
        F: FnMut(NodeId) -> bool,
    {
        self.assert_has_node(start)?;
        let filter = filter.into();

        let mut visited = vec![false; self.adjacency.node_count()];
        let mut queue = VecDeque::from([start]);
        mark(&mut visited, start);

        while let Some(node) = queue.pop_front() {
            if visit(node) {
                return Ok(Some(node));
            }
            for child in self.adjacency.get_node_ids_connected_from(node, filter) {
                if mark(&mut visited, child) {
                    queue.push_back(child);
                }
            }
        }
        Ok(None)
    }
}

//! Visitor contract shared by every traversal.
//!
//! A visitor receives the current node, the context produced by its nearest
//! ancestor, and a [`TraversalActions`] handle. Returning `Some(ctx)` replaces
//! the context seen by the node's descendants; returning `None` passes the
//! parent's context through unchanged.

use std::marker::PhantomData;

use crate::types::NodeId;

/// Control flags a visitor can raise during a traversal.
#[derive(Debug, Default, Clone)]
pub struct TraversalActions {
    skipped: bool,
    stopped: bool,
}

impl TraversalActions {
    /// Do not descend into the current node's children.
    pub fn skip_children(&mut self) {
        self.skipped = true;
    }

    /// End the traversal after the current callback returns.
    pub fn stop(&mut self) {
        self.stopped = true;
    }

    pub fn is_stopped(&self) -> bool {
        self.stopped
    }

    /// Read and clear the skip flag.
    pub(crate) fn take_skipped(&mut self) -> bool {
        std::mem::take(&mut self.skipped)
    }
}

/// Callbacks invoked when a traversal enters and leaves a node.
///
/// Any `FnMut(T, Option<&C>, &mut TraversalActions) -> Option<C>` is a visitor
/// with only an `enter` callback. Use [`EnterExit`] to supply both.
pub trait GraphVisitor<T, C> {
    /// Called before the node's children (pre-order).
    fn enter(&mut self, node: T, context: Option<&C>, actions: &mut TraversalActions)
    -> Option<C>;

    /// Called after the node's children (post-order).
    fn exit(
        &mut self,
        _node: T,
        _context: Option<&C>,
        _actions: &mut TraversalActions,
    ) -> Option<C> {
        None
    }

    /// Whether [`GraphVisitor::exit`] does anything. Traversals skip the exit
    /// step entirely when this is `false`.
    fn has_exit(&self) -> bool {
        false
    }
}

impl<T, C, F> GraphVisitor<T, C> for F
where
    F: FnMut(T, Option<&C>, &mut TraversalActions) -> Option<C>,
{
    fn enter(&mut self, node: T, context: Option<&C>, actions: &mut TraversalActions) -> Option<C> {
        self(node, context, actions)
    }
}

/// A visitor with separate enter and exit callbacks.
#[derive(Debug, Clone)]
pub struct EnterExit<En, Ex> {
    pub enter: En,
    pub exit: Ex,
}

impl<En, Ex> EnterExit<En, Ex> {
    pub fn new(enter: En, exit: Ex) -> Self {
        Self { enter, exit }
    }
}

impl<T, C, En, Ex> GraphVisitor<T, C> for EnterExit<En, Ex>
where
    En: FnMut(T, Option<&C>, &mut TraversalActions) -> Option<C>,
    Ex: FnMut(T, Option<&C>, &mut TraversalActions) -> Option<C>,
{
    fn enter(&mut self, node: T, context: Option<&C>, actions: &mut TraversalActions) -> Option<C> {
        (self.enter)(node, context, actions)
    }

    fn exit(&mut self, node: T, context: Option<&C>, actions: &mut TraversalActions) -> Option<C> {
        (self.exit)(node, context, actions)
    }

    fn has_exit(&self) -> bool {
        true
    }
}

/// A visitor that only has an exit callback (post-order only).
#[derive(Debug, Clone)]
pub struct OnExit<Ex>(pub Ex);

impl<T, C, Ex> GraphVisitor<T, C> for OnExit<Ex>
where
    Ex: FnMut(T, Option<&C>, &mut TraversalActions) -> Option<C>,
{
    fn enter(
        &mut self,
        _node: T,
        _context: Option<&C>,
        _actions: &mut TraversalActions,
    ) -> Option<C> {
        None
    }

    fn exit(&mut self, node: T, context: Option<&C>, actions: &mut TraversalActions) -> Option<C> {
        (self.0)(node, context, actions)
    }

    fn has_exit(&self) -> bool {
        true
    }
}

/// Adapts a visitor over projected values into a visitor over node ids.
///
/// `filter` maps each node id to the value the inner visitor should see. A
/// `None` hides that node from the inner visitor, but the traversal still
/// walks through it to its children. The filter may also raise traversal
/// actions itself.
pub struct MapVisitor<F, V, T> {
    filter: F,
    visitor: V,
    _value: PhantomData<fn() -> T>,
}

impl<F, V, T> MapVisitor<F, V, T> {
    pub fn new(filter: F, visitor: V) -> Self {
        Self {
            filter,
            visitor,
            _value: PhantomData,
        }
    }
}

impl<F, V, T, C> GraphVisitor<NodeId, C> for MapVisitor<F, V, T>
where
    F: FnMut(NodeId, &mut TraversalActions) -> Option<T>,
    V: GraphVisitor<T, C>,
{
    fn enter(
        &mut self,
        node: NodeId,
        context: Option<&C>,
        actions: &mut TraversalActions,
    ) -> Option<C> {
        let value = (self.filter)(node, actions)?;
        self.visitor.enter(value, context, actions)
    }

    fn exit(
        &mut self,
        node: NodeId,
        context: Option<&C>,
        actions: &mut TraversalActions,
    ) -> Option<C> {
        let value = (self.filter)(node, actions)?;
        self.visitor.exit(value, context, actions)
    }

    fn has_exit(&self) -> bool {
        self.visitor.has_exit()
    }
}

//! Mutable tree nodes with self-maintaining parent/child links.
//!
//! `add`, `set_parent`, `remove` and `remove_from_parent` call each other.
//! Each one updates its own side of the link before delegating, so the
//! counterpart finds the work already done and stops after one round trip.
//! No `RefCell` borrow is held while delegating.

use std::cell::{Ref, RefCell};
use std::fmt;
use std::rc::{Rc, Weak};

use tracing::{debug, instrument};

use crate::children::{ChildSet, OrderedChildren};
use crate::errors::{TreeError, TreeResult};
use crate::view::{NodeView, TreeNode};

pub(crate) type Link<T, C> = Rc<RefCell<NodeInner<T, C>>>;

pub(crate) struct NodeInner<T, C> {
    pub(crate) data: T,
    /// Dangling for roots
    pub(crate) parent: Weak<RefCell<NodeInner<T, C>>>,
    pub(crate) children: C,
}

/// Identity of a node, stable for as long as the node is alive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(usize);

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "NodeId({:#x})", self.0)
    }
}

/// Handle to a mutable tree node.
///
/// Cloning the handle does not copy the node: both handles refer to the same
/// node, and `==` compares identity. A node owns its children; the parent is
/// only referenced weakly, so dropping every handle to a root releases the
/// whole tree.
pub struct Node<T, C = OrderedChildren<T>> {
    pub(crate) inner: Link<T, C>,
}

impl<T> Node<T> {
    /// Creates a root node without children, using insertion ordered children.
    pub fn new(data: T) -> Self {
        Self::with_children(data, OrderedChildren::new())
    }
}

impl<T, C: ChildSet<T> + Default> Node<T, C> {
    /// Creates a node with an empty collection of the parent's kind and
    /// attaches it under `parent`.
    pub fn with_parent(data: T, parent: &Self) -> Self {
        let node = Self::with_children(data, C::default());
        node.attach_parent(Some(parent));
        node
    }
}

impl<T: Default> Default for Node<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}

impl<T, C: ChildSet<T>> Node<T, C> {
    /// Creates a root node backed by a custom child collection.
    ///
    /// Nodes already present in `children` are adopted: they are detached from
    /// their previous parent and point to the new node afterwards.
    pub fn with_children(data: T, children: C) -> Self {
        let adopted = children.to_vec();
        let node = Self {
            inner: Rc::new(RefCell::new(NodeInner {
                data,
                parent: Weak::new(),
                children,
            })),
        };
        for child in &adopted {
            child.attach_parent(Some(&node));
        }
        node
    }

    pub fn id(&self) -> NodeId {
        NodeId(Rc::as_ptr(&self.inner) as *const () as usize)
    }

    pub fn ptr_eq(this: &Self, other: &Self) -> bool {
        Rc::ptr_eq(&this.inner, &other.inner)
    }

    /// Read-only handle to this node. It exposes neither the parent nor any
    /// mutation.
    pub fn view(&self) -> NodeView<T, C> {
        NodeView::from_link(Rc::clone(&self.inner))
    }

    /// Replaces the payload unconditionally.
    pub fn set_data(&self, data: T) -> &Self {
        self.inner.borrow_mut().data = data;
        self
    }

    /// The current parent, `None` for roots and for nodes whose parent has
    /// been dropped.
    pub fn parent(&self) -> Option<Self> {
        self.inner
            .borrow()
            .parent
            .upgrade()
            .map(|inner| Self { inner })
    }

    pub fn is_root(&self) -> bool {
        self.parent().is_none()
    }

    /// Snapshot of the children in child order.
    pub fn mutable_children(&self) -> Vec<Self> {
        self.inner.borrow().children.to_vec()
    }

    pub fn child_count(&self) -> usize {
        self.inner.borrow().children.len()
    }

    pub fn contains(&self, child: &Self) -> bool {
        self.inner.borrow().children.contains(child)
    }

    /// Adds `child` to this node's children and makes this node its parent,
    /// detaching it from any previous parent. Adding an existing child is a
    /// no-op.
    ///
    /// Returns `self`, so `root.add(&a)?.add(&b)?` attaches both to `root`.
    ///
    /// # Errors
    ///
    /// * [`TreeError::SelfParent`] if `child` is this node.
    /// * [`TreeError::CycleRejected`] if `child` is an ancestor of this node.
    #[instrument(level = "trace", skip_all)]
    pub fn add(&self, child: &Self) -> TreeResult<&Self> {
        self.check_adoption(child)?;
        self.attach_child(child);
        Ok(self)
    }

    /// Moves this node under `new_parent`, or detaches it with `None`.
    /// Setting the current parent again is a no-op.
    ///
    /// # Errors
    ///
    /// Same as [`Node::add`], seen from the child's side. The tree is left
    /// unchanged on error.
    #[instrument(level = "trace", skip_all)]
    pub fn set_parent(&self, new_parent: Option<&Self>) -> TreeResult<&Self> {
        if let Some(parent) = new_parent {
            parent.check_adoption(self)?;
        }
        self.attach_parent(new_parent);
        Ok(self)
    }

    /// Detaches this node from its parent. Does nothing for roots.
    #[instrument(level = "trace", skip_all)]
    pub fn remove_from_parent(&self) {
        // Cleared first so the parent's reentrant `remove` finds nothing to detach.
        let old_parent = std::mem::take(&mut self.inner.borrow_mut().parent);
        if let Some(inner) = old_parent.upgrade() {
            Self { inner }.remove(self);
        }
    }

    /// Removes `child` from this node's children and clears its parent.
    /// Returns whether `child` was a child of this node.
    #[instrument(level = "trace", skip_all)]
    pub fn remove(&self, child: &Self) -> bool {
        let removed = self.inner.borrow_mut().children.remove(child);
        if removed {
            child.remove_from_parent();
        }
        removed
    }

    fn attach_child(&self, child: &Self) {
        // Membership is recorded before delegating: the reentrant
        // `attach_parent -> attach_child` call then sees the child present.
        let inserted = {
            let mut inner = self.inner.borrow_mut();
            !inner.children.contains(child) && inner.children.insert(child.clone())
        };
        if inserted && !child.has_parent(self) {
            child.attach_parent(Some(self));
        }
    }

    fn attach_parent(&self, new_parent: Option<&Self>) {
        let unchanged = match new_parent {
            Some(parent) => self.has_parent(parent),
            None => self.is_root(),
        };
        if unchanged {
            return;
        }
        // The old parent lets go before the new one is recorded, so the node
        // is never listed by two parents at once.
        self.remove_from_parent();
        self.inner.borrow_mut().parent = new_parent
            .map(|parent| Rc::downgrade(&parent.inner))
            .unwrap_or_default();
        if let Some(parent) = new_parent {
            parent.attach_child(self);
        }
    }

    fn has_parent(&self, parent: &Self) -> bool {
        std::ptr::eq(self.inner.borrow().parent.as_ptr(), Rc::as_ptr(&parent.inner))
    }

    /// Fails if making `child` a child of `self` would close a loop.
    fn check_adoption(&self, child: &Self) -> TreeResult<()> {
        if Self::ptr_eq(self, child) {
            debug!("rejected: {} adopting itself", self.id());
            return Err(TreeError::SelfParent);
        }
        let mut current = self.parent();
        while let Some(ancestor) = current {
            if Self::ptr_eq(&ancestor, child) {
                debug!("rejected: {} is an ancestor of {}", child.id(), self.id());
                return Err(TreeError::CycleRejected);
            }
            current = ancestor.parent();
        }
        Ok(())
    }
}

impl<T, C: ChildSet<T>> TreeNode<T> for Node<T, C> {
    type Children = C;

    fn data(&self) -> Ref<'_, T> {
        Ref::map(self.inner.borrow(), |inner| &inner.data)
    }

    fn children(&self) -> Vec<NodeView<T, C>> {
        self.view().children()
    }

    fn is_leaf(&self) -> bool {
        self.inner.borrow().children.is_empty()
    }
}

/// Drops `nodes` together with every subtree only they keep alive, in a loop
/// instead of one nested drop per level.
///
/// Child collections call this from their `Drop` impl so that releasing a
/// deep tree cannot overflow the stack.
pub fn drop_iteratively<T, C: ChildSet<T>>(nodes: Vec<Node<T, C>>) {
    let mut pending = nodes;
    while let Some(node) = pending.pop() {
        // Shared nodes are only released by their last handle.
        if let Ok(cell) = Rc::try_unwrap(node.inner) {
            let mut inner = cell.into_inner();
            pending.extend(inner.children.take_all());
        }
    }
}

impl<T, C> Clone for Node<T, C> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<T, C> PartialEq for Node<T, C> {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }
}

impl<T, C> Eq for Node<T, C> {}

impl<T: fmt::Debug, C: ChildSet<T>> fmt::Debug for Node<T, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.inner.try_borrow() {
            Ok(inner) => f
                .debug_struct("Node")
                .field("data", &inner.data)
                .field("children", &inner.children.len())
                .finish(),
            Err(_) => f.write_str("Node { <borrowed> }"),
        }
    }
}

//! Read-only access to nodes.
//!
//! The parent is deliberately absent here: consumers such as serializers only
//! ever walk downwards.

use std::cell::Ref;
use std::fmt;
use std::rc::Rc;

use crate::children::{ChildSet, OrderedChildren};
use crate::node::Link;

/// Read-only capabilities shared by every node handle.
pub trait TreeNode<T> {
    type Children: ChildSet<T>;

    /// The payload. The returned guard must be dropped before the node is
    /// mutated.
    fn data(&self) -> Ref<'_, T>;

    /// Read-only views of the children, in child order.
    fn children(&self) -> Vec<NodeView<T, Self::Children>>;

    fn is_leaf(&self) -> bool;
}

/// Read-only handle to a node, handed out to consumers that must not edit the
/// tree.
pub struct NodeView<T, C = OrderedChildren<T>> {
    inner: Link<T, C>,
}

impl<T, C> NodeView<T, C> {
    pub(crate) fn from_link(inner: Link<T, C>) -> Self {
        Self { inner }
    }

    pub fn ptr_eq(this: &Self, other: &Self) -> bool {
        Rc::ptr_eq(&this.inner, &other.inner)
    }
}

impl<T, C: ChildSet<T>> TreeNode<T> for NodeView<T, C> {
    type Children = C;

    fn data(&self) -> Ref<'_, T> {
        Ref::map(self.inner.borrow(), |inner| &inner.data)
    }

    fn children(&self) -> Vec<NodeView<T, C>> {
        self.inner
            .borrow()
            .children
            .to_vec()
            .into_iter()
            .map(|child| child.view())
            .collect()
    }

    fn is_leaf(&self) -> bool {
        self.inner.borrow().children.is_empty()
    }
}

impl<T, C> Clone for NodeView<T, C> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<T, C> PartialEq for NodeView<T, C> {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }
}

impl<T, C> Eq for NodeView<T, C> {}

impl<T: fmt::Debug, C: ChildSet<T>> fmt::Debug for NodeView<T, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.inner.try_borrow() {
            Ok(inner) => f
                .debug_struct("NodeView")
                .field("data", &inner.data)
                .field("children", &inner.children.len())
                .finish(),
            Err(_) => f.write_str("NodeView { <borrowed> }"),
        }
    }
}

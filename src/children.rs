//! Child collections backing a [`Node`].
//!
//! Membership is always decided by node identity, never by payload equality.
//! The collection only decides iteration order.

use std::cmp::Ordering;
use std::collections::HashSet;
use std::fmt;

use crate::node::{drop_iteratively, Node, NodeId};
use crate::view::TreeNode;

/// Duplicate-free, identity-keyed collection of child nodes.
///
/// Implementations only store nodes. Keeping parent links consistent is the
/// job of [`Node`], which is the only caller of the mutating methods.
pub trait ChildSet<T>: Sized {
    fn contains(&self, child: &Node<T, Self>) -> bool;

    /// Inserts `child` unless already present. Returns true if inserted.
    fn insert(&mut self, child: Node<T, Self>) -> bool;

    /// Removes `child` if present. Returns true if removed.
    fn remove(&mut self, child: &Node<T, Self>) -> bool;

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Snapshot of the members in iteration order.
    fn to_vec(&self) -> Vec<Node<T, Self>>;

    /// Empties the collection and hands back the members.
    ///
    /// Used while tearing a tree down. Parent links of the members are left
    /// as they are.
    fn take_all(&mut self) -> Vec<Node<T, Self>>;
}

/// Default collection: keeps insertion order.
///
/// A removed and re-inserted child goes to the end.
pub struct OrderedChildren<T> {
    order: Vec<Node<T, OrderedChildren<T>>>,
    members: HashSet<NodeId>,
}

impl<T> OrderedChildren<T> {
    pub fn new() -> Self {
        Self {
            order: Vec::new(),
            members: HashSet::new(),
        }
    }
}

impl<T> Default for OrderedChildren<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> fmt::Debug for OrderedChildren<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OrderedChildren")
            .field("len", &self.order.len())
            .finish()
    }
}

impl<T> ChildSet<T> for OrderedChildren<T> {
    fn contains(&self, child: &Node<T, Self>) -> bool {
        self.members.contains(&child.id())
    }

    fn insert(&mut self, child: Node<T, Self>) -> bool {
        if !self.members.insert(child.id()) {
            return false;
        }
        self.order.push(child);
        true
    }

    fn remove(&mut self, child: &Node<T, Self>) -> bool {
        if !self.members.remove(&child.id()) {
            return false;
        }
        self.order.retain(|c| !Node::ptr_eq(c, child));
        true
    }

    fn len(&self) -> usize {
        self.order.len()
    }

    fn to_vec(&self) -> Vec<Node<T, Self>> {
        self.order.clone()
    }

    fn take_all(&mut self) -> Vec<Node<T, Self>> {
        self.members.clear();
        std::mem::take(&mut self.order)
    }
}

impl<T> Drop for OrderedChildren<T> {
    fn drop(&mut self) {
        drop_iteratively(self.take_all());
    }
}

/// Keeps children sorted by payload using `compare`.
///
/// Children comparing equal keep their insertion order. The order is fixed at
/// insertion time: changing a child's payload later does not move it.
pub struct SortedChildren<T> {
    compare: fn(&T, &T) -> Ordering,
    items: Vec<Node<T, SortedChildren<T>>>,
    members: HashSet<NodeId>,
}

impl<T> SortedChildren<T> {
    pub fn new(compare: fn(&T, &T) -> Ordering) -> Self {
        Self {
            compare,
            items: Vec::new(),
            members: HashSet::new(),
        }
    }
}

impl<T: Ord> Default for SortedChildren<T> {
    fn default() -> Self {
        Self::new(T::cmp)
    }
}

impl<T> fmt::Debug for SortedChildren<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SortedChildren")
            .field("len", &self.items.len())
            .finish()
    }
}

impl<T> ChildSet<T> for SortedChildren<T> {
    fn contains(&self, child: &Node<T, Self>) -> bool {
        self.members.contains(&child.id())
    }

    fn insert(&mut self, child: Node<T, Self>) -> bool {
        if !self.members.insert(child.id()) {
            return false;
        }
        let pos = {
            let data = child.data();
            self.items
                .partition_point(|c| (self.compare)(&c.data(), &data) != Ordering::Greater)
        };
        self.items.insert(pos, child);
        true
    }

    fn remove(&mut self, child: &Node<T, Self>) -> bool {
        if !self.members.remove(&child.id()) {
            return false;
        }
        self.items.retain(|c| !Node::ptr_eq(c, child));
        true
    }

    fn len(&self) -> usize {
        self.items.len()
    }

    fn to_vec(&self) -> Vec<Node<T, Self>> {
        self.items.clone()
    }

    fn take_all(&mut self) -> Vec<Node<T, Self>> {
        self.members.clear();
        std::mem::take(&mut self.items)
    }
}

impl<T> Drop for SortedChildren<T> {
    fn drop(&mut self) {
        drop_iteratively(self.take_all());
    }
}

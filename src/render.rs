/*
Human readable rendering of a tree, one payload per line:

root
├── A
└── B
 */
use std::fmt::Display;

use termtree::Tree;
use tracing::instrument;

use crate::children::ChildSet;
use crate::node::Node;
use crate::view::{NodeView, TreeNode};

pub trait TreeNodeConvert {
    fn to_tree_string(&self) -> Tree<String>;
}

impl<T: Display, C: ChildSet<T>> TreeNodeConvert for NodeView<T, C> {
    #[instrument(level = "trace", skip_all)]
    fn to_tree_string(&self) -> Tree<String> {
        let root = self.data().to_string();

        let leaves: Vec<_> = self
            .children()
            .iter()
            .map(|c| c.to_tree_string())
            .collect();

        Tree::new(root).with_leaves(leaves)
    }
}

impl<T: Display, C: ChildSet<T>> TreeNodeConvert for Node<T, C> {
    fn to_tree_string(&self) -> Tree<String> {
        self.view().to_tree_string()
    }
}

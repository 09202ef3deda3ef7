//! Generic mutable trees whose parent and child links stay consistent.
//!
//! ```
//! use rstree::{Node, TreeNode};
//!
//! let root = Node::new("root");
//! let a = Node::new("A");
//! root.add(&a)?.add(&Node::new("B"))?;
//!
//! assert_eq!(a.parent(), Some(root.clone()));
//! assert_eq!(root.child_count(), 2);
//! assert!(!root.is_leaf());
//! # Ok::<(), rstree::TreeError>(())
//! ```

pub mod children;
pub mod config;
pub mod errors;
pub mod node;
pub mod render;
pub mod serialize;
pub mod util;
pub mod view;

pub use children::{ChildSet, OrderedChildren, SortedChildren};
pub use errors::{TreeError, TreeResult};
pub use node::{drop_iteratively, Node, NodeId};
pub use render::TreeNodeConvert;
pub use serialize::{to_json, to_json_with};
pub use view::{NodeView, TreeNode};

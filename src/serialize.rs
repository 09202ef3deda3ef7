//! JSON projection of the read-only view.
//!
//! Each node becomes `{"data": .., "leaf": .., "children": [..]}` with
//! children in child order. The parent link is never written, so the output
//! cannot be turned back into a mutable tree.

use serde::ser::{Serialize, SerializeStruct, Serializer};
use serde_json::ser::PrettyFormatter;
use tracing::instrument;

use crate::children::ChildSet;
use crate::config::JsonSettings;
use crate::errors::TreeResult;
use crate::node::Node;
use crate::view::{NodeView, TreeNode};

impl<T: Serialize, C: ChildSet<T>> Serialize for NodeView<T, C> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("TreeNode", 3)?;
        state.serialize_field("data", &*self.data())?;
        state.serialize_field("leaf", &self.is_leaf())?;
        state.serialize_field("children", &self.children())?;
        state.end()
    }
}

impl<T: Serialize, C: ChildSet<T>> Serialize for Node<T, C> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.view().serialize(serializer)
    }
}

/// Compact JSON for `view`.
pub fn to_json<T: Serialize, C: ChildSet<T>>(view: &NodeView<T, C>) -> TreeResult<String> {
    Ok(serde_json::to_string(view)?)
}

/// JSON for `view`, compact or pretty printed according to `settings`.
#[instrument(level = "debug", skip(view))]
pub fn to_json_with<T: Serialize, C: ChildSet<T>>(
    view: &NodeView<T, C>,
    settings: &JsonSettings,
) -> TreeResult<String> {
    if !settings.pretty {
        return to_json(view);
    }
    let indent = " ".repeat(settings.indent);
    let mut buf = Vec::new();
    let formatter = PrettyFormatter::with_indent(indent.as_bytes());
    let mut serializer = serde_json::Serializer::with_formatter(&mut buf, formatter);
    view.serialize(&mut serializer)?;
    Ok(String::from_utf8(buf)?)
}

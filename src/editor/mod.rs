//! Editing a value tree against the loaded schema.
//!
//! - [`EditorSession`]: owns the schema, the value, and the error map; applies edits
//! - [`ValueTree`]: the persistent value with copy-on-write edits
//! - [`Renderer`] / [`EditNode`]: which affordance each value gets
//! - [`PropertySelector`]: the "add property" picker
//! - [`ReferenceIndex`]: candidate names for reference pickers

mod protocol;
mod references;
mod selector;
mod session;
mod tree;

pub use protocol::{EditNode, EditSurface, InputKind, NumberStep, Renderer};
pub use references::ReferenceIndex;
pub use selector::PropertySelector;
pub use session::EditorSession;
pub use tree::{TreeNode, ValueTree};

use serde_json::Value;

use crate::path::JsonPath;

/// A user intent reported by the host UI.
///
/// Paths point at the value being edited, or for property and item edits at
/// the owning object or array.
#[derive(Debug, Clone, PartialEq)]
pub enum EditAction {
    /// Replace the value at `path`.
    SetValue { path: JsonPath, value: Value },
    /// Append a default item to the array at `path`.
    AppendItem { path: JsonPath },
    /// Delete item `index` of the array at `path`; later items shift down.
    RemoveItem { path: JsonPath, index: usize },
    /// Add `key`, with its default value, to the object at `path`.
    AddProperty { path: JsonPath, key: String },
    /// Delete `key` from the object at `path`. Refused for required keys.
    RemoveProperty { path: JsonPath, key: String },
    /// Point the reference at `path` to the object called `name`.
    SelectReference { path: JsonPath, name: String },
}

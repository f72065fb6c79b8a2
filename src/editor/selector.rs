//! The "add property" picker.

use crate::document::PropertyDescriptor;
use crate::path::JsonPath;

use super::EditAction;

/// Properties that can be added to one object.
///
/// Holds no schema knowledge of its own; it presents the catalog's output
/// and turns a choice into an [`EditAction::AddProperty`]. Never empty when
/// obtained from [`EditorSession::open_property_selector`](super::EditorSession::open_property_selector).
#[derive(Debug, Clone, PartialEq)]
pub struct PropertySelector {
    path: JsonPath,
    options: Vec<PropertyDescriptor>,
}

impl PropertySelector {
    pub(crate) fn new(path: JsonPath, options: Vec<PropertyDescriptor>) -> Self {
        Self { path, options }
    }

    /// Path of the object properties are added to.
    pub fn path(&self) -> &JsonPath {
        &self.path
    }

    pub fn options(&self) -> &[PropertyDescriptor] {
        &self.options
    }

    /// Options whose key contains `query`, ignoring case.
    pub fn filter<'s>(&'s self, query: &str) -> impl Iterator<Item = &'s PropertyDescriptor> + 's {
        let query = query.to_lowercase();
        self.options
            .iter()
            .filter(move |d| d.key.to_lowercase().contains(&query))
    }

    /// Picks `key`. `None` if it is not one of the options.
    pub fn select(self, key: &str) -> Option<EditAction> {
        self.options
            .iter()
            .any(|d| d.key == key)
            .then(|| EditAction::AddProperty {
                path: self.path,
                key: key.to_string(),
            })
    }

    /// Dismisses the picker without an edit.
    pub fn close(self) {}
}

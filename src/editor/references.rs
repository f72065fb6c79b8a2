//! Names of the project's top-level objects, by type.

use indexmap::IndexMap;
use serde::Serialize;
use serde_json::Value;

use crate::document::{ref_name, Resolver};

/// Candidate names for reference pickers.
///
/// Built from a whole project value: every item of every top-level kind
/// array (`charts`, `models`, ...) is resolved to its concrete `$defs` type,
/// through the discriminator when the kind holds a union, and its `name` is
/// recorded under that type.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ReferenceIndex {
    names: IndexMap<String, Vec<String>>,
}

impl ReferenceIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Indexes the named top-level objects of `project`.
    ///
    /// Items without a string `name`, or whose type cannot be resolved, are
    /// skipped.
    pub fn from_project(resolver: &Resolver<'_>, project: &Value) -> Self {
        let mut index = Self::new();
        for kind in resolver.top_level_kinds() {
            let Some(items_node) = resolver.top_level_items(kind) else {
                continue;
            };
            let Some(items) = project.get(kind.as_str()).and_then(Value::as_array) else {
                continue;
            };
            for item in items {
                let Some(name) = item.get("name").and_then(Value::as_str) else {
                    continue;
                };
                let type_name = resolver
                    .discriminated_reference(items_node, Some(item))
                    .and_then(ref_name);
                if let Some(type_name) = type_name {
                    index.register(type_name, name);
                }
            }
        }
        index
    }

    /// Records `name` as an object of `type_name`. Duplicates are ignored.
    pub fn register(&mut self, type_name: impl Into<String>, name: impl Into<String>) {
        let name = name.into();
        let names = self.names.entry(type_name.into()).or_default();
        if !names.contains(&name) {
            names.push(name);
        }
    }

    /// Known names of `type_name`, in project order.
    pub fn names_for(&self, type_name: &str) -> &[String] {
        self.names.get(type_name).map_or(&[], Vec::as_slice)
    }

    pub fn len(&self) -> usize {
        self.names.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.names.values().all(Vec::is_empty)
    }
}

//! Property enumeration for "add property" and per-field editing metadata.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;
use serde::Serialize;
use serde_json::Value;

use super::node::{NodeId, SchemaKind, Subschema};
use super::ref_name;
use super::resolver::{value_at, Resolver};
use crate::path::JsonPath;

/// Editing metadata for one schema property.
///
/// Derived on demand from the schema; never persisted.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PropertyDescriptor {
    pub key: String,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub value_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub required: bool,
    #[serde(rename = "enum", skip_serializing_if = "Option::is_none")]
    pub enum_values: Option<Vec<Value>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pattern: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub minimum: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub maximum: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_length: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_length: Option<usize>,
    pub is_top_level_ref: bool,
    /// The `$defs` type a top-level reference points to.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ref_target: Option<String>,
}

impl PropertyDescriptor {
    /// A descriptor carrying only a key, used when the schema says nothing.
    pub fn bare(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value_type: None,
            description: None,
            required: false,
            enum_values: None,
            default: None,
            format: None,
            pattern: None,
            minimum: None,
            maximum: None,
            min_length: None,
            max_length: None,
            is_top_level_ref: false,
            ref_target: None,
        }
    }

    /// True if the declared type is `integer`.
    pub fn is_integer(&self) -> bool {
        self.value_type.as_deref() == Some("integer")
    }
}

impl<'a> Resolver<'a> {
    /// Lists the declared properties of the object at `path`.
    ///
    /// Returns an empty list when the path does not resolve to an object
    /// schema. Keys already present on the value are *not* filtered out.
    pub fn available_properties(
        &self,
        object_type: &str,
        path: &JsonPath,
        root: &Value,
    ) -> Vec<PropertyDescriptor> {
        self.object_schema_at(object_type, path, root)
            .map(|node| self.describe_properties(node))
            .unwrap_or_default()
    }

    /// Describes every declared property of an object node.
    pub fn describe_properties(&self, node: &'a Subschema) -> Vec<PropertyDescriptor> {
        match &node.kind {
            SchemaKind::Object {
                properties,
                required,
                ..
            } => properties
                .iter()
                .map(|(key, prop)| self.describe(key, prop, required.contains(key)))
                .collect(),
            _ => Vec::new(),
        }
    }

    /// Builds a descriptor for one property schema.
    ///
    /// `$ref` is followed; `anyOf` is represented by its first non-null
    /// member and `oneOf` by its first member.
    pub fn describe(&self, key: &str, prop: &'a Subschema, required: bool) -> PropertyDescriptor {
        let representative = self.representative(prop).unwrap_or(prop);
        let own = &prop.annotations;
        let rep = &representative.annotations;

        let top_level = std::iter::once(prop)
            .chain(prop.members().iter())
            .filter_map(Subschema::reference)
            .find(|reference| self.is_top_level_ref(reference));

        PropertyDescriptor {
            key: key.to_string(),
            value_type: representative
                .type_name()
                .or_else(|| prop.type_name())
                .map(String::from),
            description: own.description.clone().or_else(|| rep.description.clone()),
            required,
            enum_values: rep.enum_values.clone().or_else(|| own.enum_values.clone()),
            default: own.default.clone().or_else(|| rep.default.clone()),
            format: rep.format.clone().or_else(|| own.format.clone()),
            pattern: rep.pattern.clone().or_else(|| own.pattern.clone()),
            minimum: rep.minimum.or(own.minimum),
            maximum: rep.maximum.or(own.maximum),
            min_length: rep.min_length.or(own.min_length),
            max_length: rep.max_length.or(own.max_length),
            is_top_level_ref: top_level.is_some(),
            ref_target: top_level.and_then(ref_name).map(String::from),
        }
    }

    fn representative(&self, prop: &'a Subschema) -> Option<&'a Subschema> {
        match &prop.kind {
            SchemaKind::Ref(_) => self.deref(prop),
            SchemaKind::AnyOf(members) => members
                .iter()
                .filter_map(|m| self.deref(m))
                .find(|m| !m.is_null_type()),
            SchemaKind::OneOf(members) => members.first().and_then(|m| self.deref(m)),
            _ => Some(prop),
        }
    }
}

type MemoKey = (NodeId, Vec<String>);

/// Memoized property descriptors.
///
/// Holds the declared descriptors of each object node, and the "addable"
/// lists keyed by the object node plus the keys already present, so deep
/// trees do not rebuild the same descriptors on every render. Cleared when a
/// new schema document is loaded.
#[derive(Debug, Default)]
pub struct CatalogMemo {
    declared: RwLock<HashMap<NodeId, Arc<[PropertyDescriptor]>>>,
    entries: RwLock<HashMap<MemoKey, Arc<[PropertyDescriptor]>>>,
}

impl CatalogMemo {
    /// Creates an empty memo.
    pub fn new() -> Self {
        Self::default()
    }

    /// Every declared property of an object node, as
    /// [`Resolver::describe_properties`] lists them.
    pub fn declared<'a>(&self, resolver: &Resolver<'a>, node: &'a Subschema) -> Arc<[PropertyDescriptor]> {
        if let Some(hit) = self.declared.read().get(&node.id) {
            return Arc::clone(hit);
        }
        let computed: Arc<[PropertyDescriptor]> = resolver.describe_properties(node).into();
        self.declared
            .write()
            .insert(node.id, Arc::clone(&computed));
        computed
    }

    /// Declared properties of the object at `path` not yet present on it.
    pub fn addable<'a>(
        &self,
        resolver: &Resolver<'a>,
        object_type: &str,
        path: &JsonPath,
        root: &Value,
    ) -> Vec<PropertyDescriptor> {
        let Some(node) = resolver.object_schema_at(object_type, path, root) else {
            return Vec::new();
        };
        let value = value_at(root, path);
        let present = value.and_then(Value::as_object);
        self.addable_in(resolver, node, present)
    }

    /// Declared properties of the object node `node` missing from `present`.
    pub fn addable_in<'a>(
        &self,
        resolver: &Resolver<'a>,
        node: &'a Subschema,
        present: Option<&serde_json::Map<String, Value>>,
    ) -> Vec<PropertyDescriptor> {
        let mut present: Vec<String> = present
            .map(|obj| obj.keys().cloned().collect())
            .unwrap_or_default();
        present.sort();

        let key = (node.id, present);
        if let Some(hit) = self.entries.read().get(&key) {
            return hit.to_vec();
        }

        let computed: Arc<[PropertyDescriptor]> = self
            .declared(resolver, node)
            .iter()
            .filter(|descriptor| key.1.binary_search(&descriptor.key).is_err())
            .cloned()
            .collect();
        tracing::debug!(node = ?node.id, count = computed.len(), "memoized addable properties");

        let out = computed.to_vec();
        self.entries.write().insert(key, computed);
        out
    }

    /// Number of memoized addable lists.
    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    /// True if nothing is memoized.
    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty() && self.declared.read().is_empty()
    }

    /// Drops every entry.
    pub fn invalidate(&self) {
        self.declared.write().clear();
        self.entries.write().clear();
    }
}

//! The edit-surface tree a host UI renders.
//!
//! [`Renderer`] walks a value alongside its schema and decides, for every
//! node, which affordance the UI shows and which structural edits are legal
//! there. The output is plain data; the host draws it and reports user
//! intent back as [`EditAction`](super::EditAction)s.

use serde::Serialize;
use serde_json::Value;

use crate::config::EditorConfig;
use crate::document::{
    AdditionalProperties, CatalogMemo, JsonType, PropertyDescriptor, Resolver, SchemaKind,
    Subschema,
};
use crate::path::{JsonPath, PathSegment};
use crate::validation::ErrorMap;

use super::references::ReferenceIndex;

/// One rendered node.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EditNode {
    /// Dotted path of the value; empty for the root.
    pub path: String,
    pub descriptor: PropertyDescriptor,
    pub surface: EditSurface,
    /// Validation messages recorded for this exact path.
    pub errors: Vec<String>,
    /// False for required properties and for the root.
    pub deletable: bool,
}

/// Step size of a numeric input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum NumberStep {
    /// `integer` schemas step by one.
    Integer,
    /// Arbitrary precision.
    Any,
}

/// Semantic kind of a formatted text input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum InputKind {
    Email,
    Url,
    Date,
    Time,
    DateTime,
    Color,
    Password,
    Text,
}

impl InputKind {
    /// Maps a `format` keyword value to an input kind.
    pub fn from_format(format: &str) -> Self {
        match format {
            "email" => InputKind::Email,
            "uri" | "url" => InputKind::Url,
            "date" => InputKind::Date,
            "time" => InputKind::Time,
            "date-time" => InputKind::DateTime,
            "color" => InputKind::Color,
            "password" => InputKind::Password,
            _ => InputKind::Text,
        }
    }
}

/// The affordance shown for one value.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum EditSurface {
    /// Display only.
    Null,
    /// A searchable picker over the names of another top-level object type.
    #[serde(rename_all = "camelCase")]
    Reference {
        target_type: Option<String>,
        /// The name inside the current reference token, if it is one.
        current: Option<String>,
        candidates: Vec<String>,
    },
    Boolean {
        value: bool,
    },
    Number {
        value: Option<f64>,
        minimum: Option<f64>,
        maximum: Option<f64>,
        step: NumberStep,
    },
    /// A closed choice over `enum` values.
    Choice {
        value: Value,
        options: Vec<Value>,
    },
    #[serde(rename_all = "camelCase")]
    FormattedText {
        value: String,
        input: InputKind,
        min_length: Option<usize>,
        max_length: Option<usize>,
        pattern: Option<String>,
    },
    #[serde(rename_all = "camelCase")]
    Text {
        value: String,
        min_length: Option<usize>,
        max_length: Option<usize>,
        pattern: Option<String>,
    },
    /// Items in order; the host offers append and per-item delete.
    Array {
        items: Vec<EditNode>,
    },
    /// The edited object itself: one card per property, bookkeeping keys hidden.
    #[serde(rename_all = "camelCase")]
    RootObject {
        cards: Vec<EditNode>,
        can_add_property: bool,
    },
    /// A nested, collapsible group.
    #[serde(rename_all = "camelCase")]
    Object {
        label: String,
        children: Vec<EditNode>,
        can_add_property: bool,
    },
}

/// Builds [`EditNode`] trees for one top-level object.
#[derive(Clone, Copy)]
pub struct Renderer<'a> {
    resolver: Resolver<'a>,
    config: &'a EditorConfig,
    catalog: &'a CatalogMemo,
    object_type: &'a str,
    root: &'a Value,
    errors: &'a ErrorMap,
    references: &'a ReferenceIndex,
}

impl<'a> Renderer<'a> {
    pub fn new(
        resolver: Resolver<'a>,
        config: &'a EditorConfig,
        catalog: &'a CatalogMemo,
        object_type: &'a str,
        root: &'a Value,
        errors: &'a ErrorMap,
        references: &'a ReferenceIndex,
    ) -> Self {
        Self {
            resolver,
            config,
            catalog,
            object_type,
            root,
            errors,
            references,
        }
    }

    /// Renders the whole object.
    ///
    /// The schema is resolved once at the root and then carried down one
    /// segment per level, so each value is matched to its schema in constant
    /// work.
    pub fn render(&self) -> EditNode {
        let mut descriptor = PropertyDescriptor::bare(self.object_type);
        descriptor.value_type = Some(JsonType::of(self.root).as_str().to_string());
        let schema = self.resolver.locate(self.object_type, &JsonPath::root(), self.root);
        self.node(self.root, &JsonPath::root(), descriptor, schema)
    }

    fn node(
        &self,
        value: &Value,
        path: &JsonPath,
        descriptor: PropertyDescriptor,
        schema: Option<&'a Subschema>,
    ) -> EditNode {
        let surface = self.surface(value, path, &descriptor, schema);
        EditNode {
            path: path.to_dotted(),
            errors: self
                .errors
                .get(&path.to_dotted())
                .map(<[String]>::to_vec)
                .unwrap_or_default(),
            deletable: !path.is_root() && !descriptor.required,
            descriptor,
            surface,
        }
    }

    fn surface(
        &self,
        value: &Value,
        path: &JsonPath,
        descriptor: &PropertyDescriptor,
        schema: Option<&'a Subschema>,
    ) -> EditSurface {
        match value {
            Value::Null => EditSurface::Null,
            Value::String(token) if descriptor.is_top_level_ref => EditSurface::Reference {
                target_type: descriptor.ref_target.clone(),
                current: self.config.parse_reference(token).map(String::from),
                candidates: descriptor
                    .ref_target
                    .as_deref()
                    .map(|target| self.references.names_for(target).to_vec())
                    .unwrap_or_default(),
            },
            Value::Bool(b) => EditSurface::Boolean { value: *b },
            Value::Number(n) => EditSurface::Number {
                value: n.as_f64(),
                minimum: descriptor.minimum,
                maximum: descriptor.maximum,
                step: if descriptor.is_integer() {
                    NumberStep::Integer
                } else {
                    NumberStep::Any
                },
            },
            Value::String(_) if descriptor.enum_values.is_some() => EditSurface::Choice {
                value: value.clone(),
                options: descriptor.enum_values.clone().unwrap_or_default(),
            },
            Value::String(s) => match &descriptor.format {
                Some(format) => EditSurface::FormattedText {
                    value: s.clone(),
                    input: InputKind::from_format(format),
                    min_length: descriptor.min_length,
                    max_length: descriptor.max_length,
                    pattern: descriptor.pattern.clone(),
                },
                None => EditSurface::Text {
                    value: s.clone(),
                    min_length: descriptor.min_length,
                    max_length: descriptor.max_length,
                    pattern: descriptor.pattern.clone(),
                },
            },
            Value::Array(items) => EditSurface::Array {
                items: self.array_items(value, items, path, schema),
            },
            Value::Object(obj) => {
                let object_schema =
                    schema.and_then(|node| self.resolver.object_schema_of(node, Some(value)));
                let children = self.object_children(value, obj, path, schema, object_schema);
                let can_add_property = object_schema.is_some_and(|node| {
                    !self
                        .catalog
                        .addable_in(&self.resolver, node, Some(obj))
                        .is_empty()
                });
                if path.is_root() {
                    EditSurface::RootObject {
                        cards: children
                            .into_iter()
                            .filter(|child| !self.config.is_bookkeeping_key(&child.descriptor.key))
                            .collect(),
                        can_add_property,
                    }
                } else {
                    EditSurface::Object {
                        label: descriptor.key.clone(),
                        children,
                        can_add_property,
                    }
                }
            }
        }
    }

    fn object_children(
        &self,
        value: &Value,
        obj: &serde_json::Map<String, Value>,
        path: &JsonPath,
        schema: Option<&'a Subschema>,
        object_schema: Option<&'a Subschema>,
    ) -> Vec<EditNode> {
        let declared = object_schema.map(|node| self.catalog.declared(&self.resolver, node));

        obj.iter()
            .map(|(key, child)| {
                let descriptor = declared
                    .as_deref()
                    .and_then(|declared| declared.iter().find(|d| &d.key == key))
                    .cloned()
                    .or_else(|| {
                        additional_schema(object_schema?)
                            .map(|additional| self.resolver.describe(key, additional, false))
                    })
                    .unwrap_or_else(|| PropertyDescriptor::bare(key.as_str()));
                let segment = PathSegment::Field(key.clone());
                let child_schema =
                    schema.and_then(|node| self.resolver.child_schema(node, &segment, Some(value)));
                self.node(child, &path.push_field(key.as_str()), descriptor, child_schema)
            })
            .collect()
    }

    fn array_items(
        &self,
        value: &Value,
        items: &[Value],
        path: &JsonPath,
        schema: Option<&'a Subschema>,
    ) -> Vec<EditNode> {
        let item_schema = schema
            .and_then(|node| self.resolver.settle(node, Some(value)))
            .and_then(|node| self.items_schema(node));

        items
            .iter()
            .enumerate()
            .map(|(index, item)| {
                let key = index.to_string();
                let descriptor = match item_schema {
                    Some(schema) => self.resolver.describe(&key, schema, false),
                    None => PropertyDescriptor::bare(key),
                };
                let child_schema = schema.and_then(|node| {
                    self.resolver
                        .child_schema(node, &PathSegment::Index(index), Some(value))
                });
                self.node(item, &path.push_index(index), descriptor, child_schema)
            })
            .collect()
    }

    /// The `items` schema of an array node, looking through unions.
    fn items_schema(&self, node: &'a Subschema) -> Option<&'a Subschema> {
        match &node.kind {
            SchemaKind::Array { items, .. } => items.as_deref(),
            _ => node
                .members()
                .iter()
                .filter_map(|m| self.resolver.deref(m))
                .find_map(|m| match &m.kind {
                    SchemaKind::Array { items, .. } => items.as_deref(),
                    _ => None,
                }),
        }
    }
}

fn additional_schema(node: &Subschema) -> Option<&Subschema> {
    match &node.kind {
        SchemaKind::Object {
            additional: AdditionalProperties::Schema(schema),
            ..
        } => Some(schema),
        _ => None,
    }
}

//! Typed schema nodes.
//!
//! Raw schema JSON is parsed once into [`Subschema`] values so navigation and
//! compilation match on a [`SchemaKind`] instead of probing optional fields.

use indexmap::IndexMap;
use serde_json::Value;

/// Document-unique identity of a schema node.
///
/// Assigned in parse order; stable for the lifetime of the loaded document and
/// used as the validator cache key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub(crate) u32);

/// A JSON Schema primitive type name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum JsonType {
    String,
    Number,
    Integer,
    Boolean,
    Array,
    Object,
    Null,
}

impl JsonType {
    /// Parses a `type` keyword value.
    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "string" => Some(JsonType::String),
            "number" => Some(JsonType::Number),
            "integer" => Some(JsonType::Integer),
            "boolean" => Some(JsonType::Boolean),
            "array" => Some(JsonType::Array),
            "object" => Some(JsonType::Object),
            "null" => Some(JsonType::Null),
            _ => None,
        }
    }

    /// The keyword spelling of this type.
    pub fn as_str(self) -> &'static str {
        match self {
            JsonType::String => "string",
            JsonType::Number => "number",
            JsonType::Integer => "integer",
            JsonType::Boolean => "boolean",
            JsonType::Array => "array",
            JsonType::Object => "object",
            JsonType::Null => "null",
        }
    }

    /// The type name of a concrete value (`integer` is never reported).
    pub fn of(value: &Value) -> Self {
        match value {
            Value::Null => JsonType::Null,
            Value::Bool(_) => JsonType::Boolean,
            Value::Number(_) => JsonType::Number,
            Value::String(_) => JsonType::String,
            Value::Array(_) => JsonType::Array,
            Value::Object(_) => JsonType::Object,
        }
    }

    /// The empty value of this type.
    pub fn empty_value(self) -> Value {
        match self {
            JsonType::String => Value::String(String::new()),
            JsonType::Number | JsonType::Integer => Value::from(0),
            JsonType::Boolean => Value::Bool(false),
            JsonType::Array => Value::Array(Vec::new()),
            JsonType::Object => Value::Object(serde_json::Map::new()),
            JsonType::Null => Value::Null,
        }
    }
}

/// Keywords that annotate or constrain a node regardless of its kind.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Annotations {
    /// Declared `type`, in declaration order. Empty when absent.
    pub declared_types: Vec<JsonType>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub default: Option<Value>,
    pub enum_values: Option<Vec<Value>>,
    pub format: Option<String>,
    pub pattern: Option<String>,
    pub minimum: Option<f64>,
    pub maximum: Option<f64>,
    pub min_length: Option<usize>,
    pub max_length: Option<usize>,
}

impl Annotations {
    /// The first declared type that is not `null`.
    pub fn primary_type(&self) -> Option<JsonType> {
        self.declared_types
            .iter()
            .copied()
            .find(|t| *t != JsonType::Null)
            .or_else(|| self.declared_types.first().copied())
    }

    /// True if `null` is among several declared types.
    pub fn is_nullable(&self) -> bool {
        self.declared_types.len() > 1 && self.declared_types.contains(&JsonType::Null)
    }
}

/// Treatment of keys not listed in `properties`.
#[derive(Debug, Clone, PartialEq)]
pub enum AdditionalProperties {
    /// Keyword absent.
    Unspecified,
    /// `additionalProperties: true`.
    Allowed,
    /// `additionalProperties: false`.
    Denied,
    /// `additionalProperties: {...}`.
    Schema(Box<Subschema>),
}

impl AdditionalProperties {
    /// True if the object explicitly accepts arbitrary keys.
    pub fn is_open(&self) -> bool {
        matches!(
            self,
            AdditionalProperties::Allowed | AdditionalProperties::Schema(_)
        )
    }
}

/// A `discriminator` selecting among union members by a tag property.
#[derive(Debug, Clone, PartialEq)]
pub struct Discriminator {
    /// The property whose value selects the member.
    pub property_name: String,
    /// Tag value to `$ref`.
    pub mapping: IndexMap<String, String>,
    /// The node's own `properties[property_name].default`, if any.
    pub tag_default: Option<String>,
}

/// The structural shape of a schema node.
#[derive(Debug, Clone, PartialEq)]
pub enum SchemaKind {
    /// `$ref`, holding the raw reference text.
    Ref(String),
    /// An object with declared properties.
    Object {
        properties: IndexMap<String, Subschema>,
        required: Vec<String>,
        additional: AdditionalProperties,
    },
    /// An array with an optional item schema.
    Array {
        items: Option<Box<Subschema>>,
        min_items: Option<usize>,
        max_items: Option<usize>,
    },
    /// `oneOf` without a discriminator.
    OneOf(Vec<Subschema>),
    /// `anyOf`.
    AnyOf(Vec<Subschema>),
    /// `oneOf` selected by a discriminator.
    Discriminated {
        discriminator: Discriminator,
        members: Vec<Subschema>,
    },
    /// A scalar or untyped node; all constraints live in the annotations.
    Leaf,
}

/// One node of a schema document.
#[derive(Debug, Clone, PartialEq)]
pub struct Subschema {
    pub id: NodeId,
    pub kind: SchemaKind,
    pub annotations: Annotations,
}

impl Subschema {
    /// The raw `$ref` text, if this node is a reference.
    pub fn reference(&self) -> Option<&str> {
        match &self.kind {
            SchemaKind::Ref(reference) => Some(reference),
            _ => None,
        }
    }

    /// Union members, for `oneOf`, `anyOf`, and discriminated nodes.
    pub fn members(&self) -> &[Subschema] {
        match &self.kind {
            SchemaKind::OneOf(members)
            | SchemaKind::AnyOf(members)
            | SchemaKind::Discriminated { members, .. } => members,
            _ => &[],
        }
    }

    /// The type name an editor shows for this node.
    ///
    /// Declared `type` wins; structural kinds fill in when it is absent.
    pub fn type_name(&self) -> Option<&'static str> {
        if let Some(declared) = self.annotations.primary_type() {
            return Some(declared.as_str());
        }
        match &self.kind {
            SchemaKind::Object { .. } | SchemaKind::Discriminated { .. } => Some("object"),
            SchemaKind::Array { .. } => Some("array"),
            _ => None,
        }
    }

    /// True if the only declared type is `null`.
    pub fn is_null_type(&self) -> bool {
        self.annotations.declared_types == [JsonType::Null]
    }
}

/// Hands out node ids while a document is parsed.
#[derive(Debug, Default)]
pub(crate) struct NodeIds(u32);

impl NodeIds {
    fn next(&mut self) -> NodeId {
        let id = NodeId(self.0);
        self.0 += 1;
        id
    }

    pub(crate) fn issued(&self) -> usize {
        self.0 as usize
    }
}

/// Parses one schema node (and, recursively, its children).
pub(crate) fn parse_node(raw: &Value, ids: &mut NodeIds) -> Subschema {
    let id = ids.next();
    let Some(obj) = raw.as_object() else {
        // `true`, `false`, and anything malformed are unconstrained.
        return Subschema {
            id,
            kind: SchemaKind::Leaf,
            annotations: Annotations::default(),
        };
    };

    let annotations = parse_annotations(obj);

    let kind = if let Some(reference) = obj.get("$ref").and_then(Value::as_str) {
        SchemaKind::Ref(reference.to_string())
    } else if let Some(members) = obj.get("oneOf").and_then(Value::as_array) {
        let members = members.iter().map(|m| parse_node(m, ids)).collect();
        match obj.get("discriminator").and_then(|d| parse_discriminator(d, obj)) {
            Some(discriminator) => SchemaKind::Discriminated {
                discriminator,
                members,
            },
            None => SchemaKind::OneOf(members),
        }
    } else if let Some(members) = obj.get("anyOf").and_then(Value::as_array) {
        SchemaKind::AnyOf(members.iter().map(|m| parse_node(m, ids)).collect())
    } else if annotations.primary_type() == Some(JsonType::Array) || obj.contains_key("items") {
        SchemaKind::Array {
            items: obj.get("items").map(|i| Box::new(parse_node(i, ids))),
            min_items: usize_keyword(obj, "minItems"),
            max_items: usize_keyword(obj, "maxItems"),
        }
    } else if annotations.primary_type() == Some(JsonType::Object)
        || obj.contains_key("properties")
    {
        let properties = obj
            .get("properties")
            .and_then(Value::as_object)
            .map(|props| {
                props
                    .iter()
                    .map(|(key, prop)| (key.clone(), parse_node(prop, ids)))
                    .collect()
            })
            .unwrap_or_default();
        let required = obj
            .get("required")
            .and_then(Value::as_array)
            .map(|names| {
                names
                    .iter()
                    .filter_map(Value::as_str)
                    .map(String::from)
                    .collect()
            })
            .unwrap_or_default();
        let additional = match obj.get("additionalProperties") {
            None => AdditionalProperties::Unspecified,
            Some(Value::Bool(true)) => AdditionalProperties::Allowed,
            Some(Value::Bool(false)) => AdditionalProperties::Denied,
            Some(schema) => AdditionalProperties::Schema(Box::new(parse_node(schema, ids))),
        };
        SchemaKind::Object {
            properties,
            required,
            additional,
        }
    } else {
        SchemaKind::Leaf
    };

    Subschema {
        id,
        kind,
        annotations,
    }
}

fn parse_annotations(obj: &serde_json::Map<String, Value>) -> Annotations {
    let declared_types = match obj.get("type") {
        Some(Value::String(name)) => JsonType::parse(name).into_iter().collect(),
        Some(Value::Array(names)) => names
            .iter()
            .filter_map(Value::as_str)
            .filter_map(JsonType::parse)
            .collect(),
        _ => Vec::new(),
    };

    Annotations {
        declared_types,
        title: string_keyword(obj, "title"),
        description: string_keyword(obj, "description"),
        default: obj.get("default").cloned(),
        enum_values: obj.get("enum").and_then(Value::as_array).cloned(),
        format: string_keyword(obj, "format"),
        pattern: string_keyword(obj, "pattern"),
        minimum: obj.get("minimum").and_then(Value::as_f64),
        maximum: obj.get("maximum").and_then(Value::as_f64),
        min_length: usize_keyword(obj, "minLength"),
        max_length: usize_keyword(obj, "maxLength"),
    }
}

fn parse_discriminator(raw: &Value, owner: &serde_json::Map<String, Value>) -> Option<Discriminator> {
    let property_name = raw.get("propertyName")?.as_str()?.to_string();
    let mapping = raw
        .get("mapping")
        .and_then(Value::as_object)
        .map(|m| {
            m.iter()
                .filter_map(|(tag, target)| Some((tag.clone(), target.as_str()?.to_string())))
                .collect()
        })
        .unwrap_or_default();
    let tag_default = owner
        .get("properties")
        .and_then(|props| props.get(&property_name))
        .and_then(|prop| prop.get("default"))
        .and_then(Value::as_str)
        .map(String::from);

    Some(Discriminator {
        property_name,
        mapping,
        tag_default,
    })
}

fn string_keyword(obj: &serde_json::Map<String, Value>, key: &str) -> Option<String> {
    obj.get(key).and_then(Value::as_str).map(String::from)
}

fn usize_keyword(obj: &serde_json::Map<String, Value>, key: &str) -> Option<usize> {
    obj.get(key)
        .and_then(Value::as_u64)
        .and_then(|n| usize::try_from(n).ok())
}

//! Tests for path, reference, and discriminator resolution.

use schema_editor::document::{JsonType, SchemaKind};
use schema_editor::{EditorConfig, JsonPath, PathSegment, Resolver, SchemaDocument};
use serde_json::{json, Value};

const PROJECT_SCHEMA: &str = include_str!("fixtures/project_schema.json");

fn project() -> SchemaDocument {
    SchemaDocument::from_json_str(PROJECT_SCHEMA).unwrap()
}

fn path(dotted: &str) -> JsonPath {
    JsonPath::from_dotted(dotted)
}

#[test]
fn test_discriminator_selects_mapped_member() {
    let doc = SchemaDocument::from_value(&json!({
        "$defs": {
            "Component": {
                "oneOf": [{"$ref": "#/$defs/Table"}, {"$ref": "#/$defs/Chart"}],
                "discriminator": {"propertyName": "type", "mapping": {"Chart": "#/$defs/Chart"}}
            },
            "Chart": {"type": "object", "properties": {"traces": {"type": "array"}}},
            "Table": {"type": "object", "properties": {"rows": {"type": "integer"}}}
        }
    }))
    .unwrap();
    let config = EditorConfig::default();
    let resolver = Resolver::new(&doc, &config);

    let chart = resolver
        .schema_at_path("Component", &JsonPath::root(), &json!({"type": "Chart"}))
        .unwrap();
    assert!(std::ptr::eq(chart, doc.definition("Chart").unwrap()));

    // No tag and no declared default: the first member is the best guess.
    let fallback = resolver
        .schema_at_path("Component", &JsonPath::root(), &json!({}))
        .unwrap();
    assert!(std::ptr::eq(fallback, doc.definition("Table").unwrap()));

    // An unmapped tag falls back the same way.
    let unmapped = resolver
        .schema_at_path("Component", &JsonPath::root(), &json!({"type": "Pie"}))
        .unwrap();
    assert!(std::ptr::eq(unmapped, doc.definition("Table").unwrap()));
}

#[test]
fn test_dangling_mapping_falls_back_to_first_member() {
    let doc = SchemaDocument::from_value(&json!({
        "$defs": {
            "Component": {
                "oneOf": [{"$ref": "#/$defs/Table"}, {"$ref": "#/$defs/Chart"}],
                "discriminator": {
                    "propertyName": "type",
                    "mapping": {"Chart": "#/$defs/Chart", "Pie": "#/$defs/Missing"}
                }
            },
            "Chart": {"type": "object", "properties": {"traces": {"type": "array"}}},
            "Table": {"type": "object", "properties": {"rows": {"type": "integer"}}}
        }
    }))
    .unwrap();
    let config = EditorConfig::default();
    let resolver = Resolver::new(&doc, &config);
    let component = doc.definition("Component").unwrap();
    let pie = json!({"type": "Pie"});

    assert_eq!(
        resolver.discriminated_reference(component, Some(&pie)),
        Some("#/$defs/Missing")
    );
    let narrowed = resolver.discriminated_schema(component, Some(&pie)).unwrap();
    assert!(std::ptr::eq(narrowed, doc.definition("Table").unwrap()));

    let rows = resolver
        .schema_at_path("Component", &path("rows"), &pie)
        .unwrap();
    assert_eq!(rows.annotations.primary_type(), Some(JsonType::Integer));
}

#[test]
fn test_child_schema_steps_match_locate() {
    let doc = project();
    let config = EditorConfig::default();
    let resolver = Resolver::new(&doc, &config);

    let chart = json!({"traces": [{"name": "t", "props": {"type": "scatter", "marker": {}}}]});
    let target = path("traces.0.props.marker.color");

    let mut node = resolver.locate("Chart", &JsonPath::root(), &chart);
    let mut value = Some(&chart);
    for segment in target.segments() {
        node = node.and_then(|n| resolver.child_schema(n, segment, value));
        value = value.and_then(|v| match segment {
            PathSegment::Field(key) => v.get(key.as_str()),
            PathSegment::Index(index) => v.get(*index),
        });
    }

    let located = resolver.locate("Chart", &target, &chart).unwrap();
    assert!(std::ptr::eq(node.unwrap(), located));
    assert_eq!(located.annotations.format.as_deref(), Some("color"));
}

#[test]
fn test_walks_through_union_and_discriminator() {
    let doc = project();
    let config = EditorConfig::default();
    let resolver = Resolver::new(&doc, &config);

    let chart = json!({"traces": [{"name": "t", "props": {"type": "scatter"}}]});
    let color = resolver
        .schema_at_path("Chart", &path("traces.0.props.marker.color"), &chart)
        .unwrap();
    assert_eq!(color.annotations.format.as_deref(), Some("color"));

    let bar = json!({"traces": [{"name": "t", "props": {"type": "bar"}}]});
    let width = resolver
        .schema_at_path("Chart", &path("traces.0.props.width"), &bar)
        .unwrap();
    assert_eq!(width.annotations.primary_type(), Some(JsonType::Integer));
    assert!(resolver
        .schema_at_path("Chart", &path("traces.0.props.marker"), &bar)
        .is_none());
}

#[test]
fn test_untagged_trace_props_fall_back_to_scatter() {
    let doc = project();
    let config = EditorConfig::default();
    let resolver = Resolver::new(&doc, &config);

    let props = resolver
        .schema_at_path("Trace", &path("props"), &json!({"props": {}}))
        .unwrap();
    assert!(std::ptr::eq(props, doc.definition("ScatterProps").unwrap()));
}

#[test]
fn test_unresolvable_paths_fail_closed() {
    let doc = project();
    let config = EditorConfig::default();
    let resolver = Resolver::new(&doc, &config);
    let empty = Value::Null;

    // Closed object.
    assert!(resolver
        .schema_at_path("Chart", &path("layout.bogus"), &empty)
        .is_none());
    // Unknown root type.
    assert!(resolver
        .schema_at_path("Widget", &JsonPath::root(), &empty)
        .is_none());
    // Index into a non-array.
    assert!(resolver
        .schema_at_path("Chart", &path("name.0"), &empty)
        .is_none());
    // Only `#/$defs/<name>` references resolve.
    assert!(resolver.resolve_ref("#/definitions/Chart").is_none());
    assert!(resolver.resolve_ref("other.json#/$defs/Chart").is_none());
}

#[test]
fn test_additional_properties_schema() {
    let doc = project();
    let config = EditorConfig::default();
    let resolver = Resolver::new(&doc, &config);

    let column = resolver
        .schema_at_path("Trace", &path("columns.x_axis"), &Value::Null)
        .unwrap();
    assert!(column.annotations.pattern.is_some());
}

#[test]
fn test_top_level_refs() {
    let doc = project();
    let config = EditorConfig::default();
    let resolver = Resolver::new(&doc, &config);

    assert!(resolver.is_top_level_ref("#/$defs/SqlModel"));
    assert!(resolver.is_top_level_ref("#/$defs/Trace"));
    // Reachable only as a member of the `charts` union.
    assert!(resolver.is_top_level_ref("#/$defs/Chart"));
    assert!(!resolver.is_top_level_ref("#/$defs/Layout"));
    assert!(!resolver.is_top_level_ref("#/$defs/Row"));

    let restricted = EditorConfig::default().with_top_level_kinds(["models"]);
    let resolver = Resolver::new(&doc, &restricted);
    assert!(!resolver.is_top_level_ref("#/$defs/Chart"));
}

#[test]
fn test_resolved_kinds() {
    let doc = project();
    let config = EditorConfig::default();
    let resolver = Resolver::new(&doc, &config);

    let rows = resolver
        .schema_at_path("Dashboard", &path("rows"), &Value::Null)
        .unwrap();
    assert!(matches!(rows.kind, SchemaKind::Array { .. }));

    let item = resolver
        .schema_at_path("Dashboard", &path("rows.3.items.0"), &Value::Null)
        .unwrap();
    assert!(std::ptr::eq(item, doc.definition("Item").unwrap()));
}

//! Editing sessions against the project schema.

use proptest::prelude::*;
use schema_editor::editor::{EditNode, EditSurface, EditorSession};
use schema_editor::loading::StaticSource;
use schema_editor::{EditAction, EditorConfig, EditorError, JsonPath, ValueTree};
use serde_json::{json, Value};

const PROJECT_SCHEMA: &str = include_str!("fixtures/project_schema.json");

fn session(object_type: &str, value: Value) -> EditorSession {
    let mut session = EditorSession::new(EditorConfig::default(), object_type, &value);
    session.load_schema(&StaticSource::new(PROJECT_SCHEMA));
    session
}

fn card<'n>(node: &'n EditNode, key: &str) -> &'n EditNode {
    match &node.surface {
        EditSurface::RootObject { cards, .. } => {
            cards.iter().find(|c| c.descriptor.key == key).unwrap()
        }
        other => panic!("expected root object, got {other:?}"),
    }
}

#[test]
fn test_remove_item_splices() {
    let mut editor = session("Chart", json!({"name": "c", "traces": ["a", "b", "c"]}));
    let traces = JsonPath::from_field("traces");

    editor
        .apply(EditAction::RemoveItem {
            path: traces.clone(),
            index: 1,
        })
        .unwrap();
    assert_eq!(editor.value(), json!({"name": "c", "traces": ["a", "c"]}));

    let err = editor
        .apply(EditAction::RemoveItem {
            path: traces,
            index: 5,
        })
        .unwrap_err();
    assert!(matches!(err, EditorError::IndexOutOfBounds { index: 5, len: 2, .. }));
    assert_eq!(editor.value(), json!({"name": "c", "traces": ["a", "c"]}));
}

#[test]
fn test_remove_item_drops_stale_errors() {
    let mut editor = session(
        "Table",
        json!({"name": "t", "traces": [
            {"name": "bad", "props": {"type": "bar", "width": 0}},
            {"name": "ok", "props": {"type": "bar", "width": 2}}
        ]}),
    );
    assert!(editor.errors().contains_key("traces.0.props.width"));

    editor
        .apply(EditAction::RemoveItem {
            path: JsonPath::from_field("traces"),
            index: 0,
        })
        .unwrap();
    assert!(editor.errors().is_empty(), "{:?}", editor.errors());
}

#[test]
fn test_full_object_has_nothing_to_add() {
    let value = json!({
        "name": "c",
        "layout": {"title": "", "height": 400, "show_legend": false}
    });
    let mut editor = session("Chart", value.clone());
    let layout = JsonPath::from_field("layout");

    let err = editor.open_property_selector(&layout).unwrap_err();
    assert!(matches!(err, EditorError::NoPropertiesAvailable { .. }));

    let err = editor
        .apply(EditAction::AddProperty {
            path: layout,
            key: "bogus".into(),
        })
        .unwrap_err();
    assert!(matches!(err, EditorError::UnknownProperty { .. }));
    assert_eq!(editor.value(), value);
}

#[test]
fn test_property_selector_adds_defaults() {
    let mut editor = session("Chart", json!({"name": "c", "layout": {}}));
    let layout = JsonPath::from_field("layout");

    let selector = editor.open_property_selector(&layout).unwrap();
    let matches: Vec<&str> = selector.filter("HEI").map(|d| d.key.as_str()).collect();
    assert_eq!(matches, ["height"]);

    let action = selector.select("height").unwrap();
    editor.apply(action).unwrap();
    assert_eq!(editor.value()["layout"], json!({"height": 400}));

    let err = editor
        .apply(EditAction::AddProperty {
            path: layout,
            key: "height".into(),
        })
        .unwrap_err();
    assert!(matches!(err, EditorError::PropertyExists { .. }));
}

#[test]
fn test_required_property_cannot_be_removed() {
    let value = json!({"name": "c", "type": "chart"});
    let mut editor = session("Chart", value.clone());

    let err = editor
        .apply(EditAction::RemoveProperty {
            path: JsonPath::root(),
            key: "name".into(),
        })
        .unwrap_err();
    assert!(matches!(err, EditorError::RequiredProperty { ref key, .. } if key == "name"));
    assert_eq!(editor.value(), value);

    editor
        .apply(EditAction::RemoveProperty {
            path: JsonPath::root(),
            key: "type".into(),
        })
        .unwrap();
    assert_eq!(editor.value(), json!({"name": "c"}));
}

#[test]
fn test_set_value_tracks_errors() {
    let mut editor = session("Dashboard", json!({"name": "d"}));
    assert!(editor.errors().is_empty());

    let level = JsonPath::from_field("level");
    editor
        .apply(EditAction::SetValue {
            path: level.clone(),
            value: json!("high"),
        })
        .unwrap();
    assert_eq!(editor.errors().get("level").unwrap(), ["Must be an integer"]);

    editor
        .apply(EditAction::SetValue {
            path: level,
            value: Value::Null,
        })
        .unwrap();
    assert!(editor.errors().is_empty());
}

#[test]
fn test_edits_share_untouched_subtrees() {
    let mut editor = session(
        "Dashboard",
        json!({"name": "d", "rows": [{"height": "small"}, {"height": "large"}]}),
    );
    let before = editor.tree().clone();

    let after = editor
        .apply(EditAction::SetValue {
            path: JsonPath::from_field("rows").push_index(0).push_field("height"),
            value: json!("medium"),
        })
        .unwrap();

    assert!(!after.ptr_eq(&before));
    assert!(after.shares_subtree(&before, &JsonPath::from_field("rows").push_index(1)));
    assert_eq!(before.to_json()["rows"][0]["height"], json!("small"));
}

#[test]
fn test_append_item_uses_item_defaults() {
    let mut editor = session("Dashboard", json!({"name": "d", "rows": []}));
    let rows = JsonPath::from_field("rows");

    editor.apply(EditAction::AppendItem { path: rows.clone() }).unwrap();
    editor
        .apply(EditAction::AddProperty {
            path: rows.push_index(0),
            key: "height".into(),
        })
        .unwrap();
    assert_eq!(editor.value()["rows"], json!([{"height": "medium"}]));

    let err = editor
        .apply(EditAction::AppendItem {
            path: JsonPath::from_field("name"),
        })
        .unwrap_err();
    assert!(matches!(err, EditorError::WrongShape { expected: "array", .. }));
}

#[test]
fn test_reference_picker_flow() {
    let mut editor = session("Trace", json!({"name": "t", "props": {"type": "scatter"}}));
    editor.index_project(&json!({
        "models": [{"name": "orders"}, {"name": "users"}],
        "charts": [{"name": "c1", "type": "chart"}, {"name": "t1", "type": "table"}]
    }));
    assert_eq!(editor.references().len(), 4);

    editor
        .apply(EditAction::AddProperty {
            path: JsonPath::root(),
            key: "model".into(),
        })
        .unwrap();
    assert_eq!(editor.value()["model"], json!(""));

    editor
        .apply(EditAction::SelectReference {
            path: JsonPath::from_field("model"),
            name: "orders".into(),
        })
        .unwrap();
    assert_eq!(editor.value()["model"], json!("ref(orders)"));

    let rendered = editor.render();
    assert_eq!(
        card(&rendered, "model").surface,
        EditSurface::Reference {
            target_type: Some("SqlModel".into()),
            current: Some("orders".into()),
            candidates: vec!["orders".into(), "users".into()],
        }
    );
    assert!(!card(&rendered, "props").deletable);
    assert!(card(&rendered, "model").deletable);
}

#[test]
fn test_degraded_session_still_edits() {
    let mut editor = EditorSession::new(EditorConfig::default(), "Chart", &json!({"name": "c"}));
    editor.load_schema(&StaticSource::new("[1, 2]"));
    assert!(editor.is_degraded());

    editor
        .apply(EditAction::SetValue {
            path: JsonPath::from_field("layout"),
            value: json!({"bogus": true}),
        })
        .unwrap();
    assert!(editor.errors().is_empty());
    assert!(editor.available_properties(&JsonPath::root()).is_empty());

    let rendered = editor.render();
    match &card(&rendered, "layout").surface {
        EditSurface::Object { children, can_add_property, .. } => {
            assert_eq!(children.len(), 1);
            assert!(!can_add_property);
        }
        other => panic!("expected object, got {other:?}"),
    }

    // Loading a schema later validates what was edited in the meantime.
    editor.load_schema(&StaticSource::new(PROJECT_SCHEMA));
    assert!(!editor.is_degraded());
    assert!(editor.errors().contains_key("layout.bogus"));
}

proptest! {
    #[test]
    fn prop_remove_item_matches_vec_remove(
        items in prop::collection::vec(any::<i32>(), 1..12),
        pick in any::<prop::sample::Index>(),
    ) {
        let index = pick.index(items.len());
        let tree = ValueTree::from_json(&json!({"items": items, "meta": {"keep": true}}));

        let after = tree.remove_item(&JsonPath::from_field("items"), index).unwrap();

        let mut expected = items.clone();
        expected.remove(index);
        prop_assert_eq!(after.to_json(), json!({"items": expected, "meta": {"keep": true}}));
        prop_assert!(after.shares_subtree(&tree, &JsonPath::from_field("meta")));
        prop_assert_eq!(tree.to_json()["items"].as_array().map(Vec::len), Some(items.len()));
    }
}

#[test]
fn test_array_edits_check_item_count() {
    let schema = StaticSource::new(
        r#"{"$defs": {"Tagged": {
            "type": "object",
            "properties": {
                "tags": {"type": "array", "items": {"type": "integer"}, "minItems": 1, "maxItems": 2}
            }
        }}}"#,
    );
    let tags = JsonPath::from_field("tags");
    let mut editor = EditorSession::new(EditorConfig::default(), "Tagged", &json!({"tags": [1, 2]}));
    editor.load_schema(&schema);
    assert!(editor.errors().is_empty());

    editor.apply(EditAction::AppendItem { path: tags.clone() }).unwrap();
    assert_eq!(editor.value(), json!({"tags": [1, 2, 0]}));
    assert_eq!(
        editor.errors().get("tags").unwrap(),
        ["must have at most 2 items, got 3"]
    );

    editor
        .apply(EditAction::RemoveItem {
            path: tags.clone(),
            index: 0,
        })
        .unwrap();
    assert!(editor.errors().is_empty(), "{:?}", editor.errors());

    editor
        .apply(EditAction::RemoveItem {
            path: tags.clone(),
            index: 0,
        })
        .unwrap();
    editor
        .apply(EditAction::RemoveItem { path: tags, index: 0 })
        .unwrap();
    assert_eq!(editor.value(), json!({"tags": []}));
    assert_eq!(
        editor.errors().get("tags").unwrap(),
        ["must have at least 1 items, got 0"]
    );
}

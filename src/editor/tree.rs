//! A persistent JSON tree with structural sharing.
//!
//! Every edit returns a new [`ValueTree`]; only the nodes on the path from the
//! root to the edited node are rebuilt, and every other subtree is shared
//! with the previous version through an `Arc`. Hosts can therefore compare
//! old and new trees (or any subtree) by pointer to detect change.

use std::sync::Arc;

use indexmap::IndexMap;
use serde_json::{Map, Number, Value};

use crate::error::EditorError;
use crate::path::{JsonPath, PathSegment};

/// One node of a [`ValueTree`].
#[derive(Debug, Clone, PartialEq)]
pub enum TreeNode {
    Null,
    Bool(bool),
    Number(Number),
    String(String),
    Array(Vec<Arc<TreeNode>>),
    Object(IndexMap<String, Arc<TreeNode>>),
}

impl TreeNode {
    /// Converts a JSON value, preserving object key order.
    pub fn from_json(value: &Value) -> Self {
        match value {
            Value::Null => TreeNode::Null,
            Value::Bool(b) => TreeNode::Bool(*b),
            Value::Number(n) => TreeNode::Number(n.clone()),
            Value::String(s) => TreeNode::String(s.clone()),
            Value::Array(items) => TreeNode::Array(
                items
                    .iter()
                    .map(|item| Arc::new(TreeNode::from_json(item)))
                    .collect(),
            ),
            Value::Object(obj) => TreeNode::Object(
                obj.iter()
                    .map(|(k, v)| (k.clone(), Arc::new(TreeNode::from_json(v))))
                    .collect(),
            ),
        }
    }

    pub fn to_json(&self) -> Value {
        match self {
            TreeNode::Null => Value::Null,
            TreeNode::Bool(b) => Value::Bool(*b),
            TreeNode::Number(n) => Value::Number(n.clone()),
            TreeNode::String(s) => Value::String(s.clone()),
            TreeNode::Array(items) => Value::Array(items.iter().map(|i| i.to_json()).collect()),
            TreeNode::Object(obj) => Value::Object(
                obj.iter()
                    .map(|(k, v)| (k.clone(), v.to_json()))
                    .collect::<Map<_, _>>(),
            ),
        }
    }

    fn child(&self, segment: &PathSegment) -> Option<&Arc<TreeNode>> {
        match (self, segment) {
            (TreeNode::Object(obj), PathSegment::Field(key)) => obj.get(key),
            (TreeNode::Array(items), PathSegment::Index(i)) => items.get(*i),
            _ => None,
        }
    }
}

/// An immutable JSON value with copy-on-write edits.
///
/// # Example
///
/// ```rust
/// use schema_editor::editor::ValueTree;
/// use schema_editor::JsonPath;
/// use serde_json::json;
///
/// let before = ValueTree::from_json(&json!({"items": [1, 2, 3], "meta": {"a": 1}}));
/// let after = before.remove_item(&JsonPath::from_field("items"), 1).unwrap();
///
/// assert_eq!(after.to_json(), json!({"items": [1, 3], "meta": {"a": 1}}));
/// assert!(!after.ptr_eq(&before));
/// assert!(after.shares_subtree(&before, &JsonPath::from_field("meta")));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct ValueTree {
    root: Arc<TreeNode>,
}

impl ValueTree {
    pub fn from_json(value: &Value) -> Self {
        Self {
            root: Arc::new(TreeNode::from_json(value)),
        }
    }

    pub fn to_json(&self) -> Value {
        self.root.to_json()
    }

    pub fn root(&self) -> &Arc<TreeNode> {
        &self.root
    }

    /// The node at `path`, if any.
    pub fn get(&self, path: &JsonPath) -> Option<&Arc<TreeNode>> {
        path.segments()
            .try_fold(&self.root, |node, segment| node.child(segment))
    }

    /// The JSON value at `path`, if any.
    pub fn value_at(&self, path: &JsonPath) -> Option<Value> {
        self.get(path).map(|node| node.to_json())
    }

    /// True if both trees are the same version.
    pub fn ptr_eq(&self, other: &ValueTree) -> bool {
        Arc::ptr_eq(&self.root, &other.root)
    }

    /// True if both trees hold the very same node at `path`.
    pub fn shares_subtree(&self, other: &ValueTree, path: &JsonPath) -> bool {
        match (self.get(path), other.get(path)) {
            (Some(a), Some(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }

    /// Replaces (or creates) the value at `path`.
    ///
    /// The parent must exist. A field segment inserts or replaces a key; an
    /// index segment replaces an existing item.
    pub fn set(&self, path: &JsonPath, value: &Value) -> Result<Self, EditorError> {
        let replacement = Arc::new(TreeNode::from_json(value));
        let Some((last, parent)) = split_last(path) else {
            return Ok(Self { root: replacement });
        };
        self.update(&parent, |node| match (node, last) {
            (TreeNode::Object(obj), PathSegment::Field(key)) => {
                let mut obj = obj.clone();
                obj.insert(key.clone(), replacement);
                Ok(TreeNode::Object(obj))
            }
            (TreeNode::Array(items), PathSegment::Index(index)) => {
                if *index >= items.len() {
                    return Err(EditorError::IndexOutOfBounds {
                        path: parent.to_dotted(),
                        index: *index,
                        len: items.len(),
                    });
                }
                let mut items = items.clone();
                items[*index] = replacement;
                Ok(TreeNode::Array(items))
            }
            (_, segment) => Err(wrong_shape(&parent, segment)),
        })
    }

    /// Removes `key` from the object at `path`, keeping the order of the rest.
    pub fn remove_property(&self, path: &JsonPath, key: &str) -> Result<Self, EditorError> {
        self.update(path, |node| match node {
            TreeNode::Object(obj) => {
                if !obj.contains_key(key) {
                    return Err(EditorError::PathNotFound(
                        path.push_field(key).to_dotted(),
                    ));
                }
                let mut obj = obj.clone();
                obj.shift_remove(key);
                Ok(TreeNode::Object(obj))
            }
            _ => Err(EditorError::WrongShape {
                path: path.to_dotted(),
                expected: "object",
            }),
        })
    }

    /// Inserts `value` at `index` of the array at `path`, shifting later items up.
    ///
    /// `index` may equal the length, which appends.
    pub fn insert_item(&self, path: &JsonPath, index: usize, value: &Value) -> Result<Self, EditorError> {
        let item = Arc::new(TreeNode::from_json(value));
        self.update(path, |node| match node {
            TreeNode::Array(items) => {
                if index > items.len() {
                    return Err(EditorError::IndexOutOfBounds {
                        path: path.to_dotted(),
                        index,
                        len: items.len(),
                    });
                }
                let mut items = items.clone();
                items.insert(index, item);
                Ok(TreeNode::Array(items))
            }
            _ => Err(EditorError::WrongShape {
                path: path.to_dotted(),
                expected: "array",
            }),
        })
    }

    /// Appends `value` to the array at `path`.
    pub fn push_item(&self, path: &JsonPath, value: &Value) -> Result<Self, EditorError> {
        let len = match self.get(path).map(|node| &**node) {
            Some(TreeNode::Array(items)) => items.len(),
            Some(_) => {
                return Err(EditorError::WrongShape {
                    path: path.to_dotted(),
                    expected: "array",
                })
            }
            None => return Err(EditorError::PathNotFound(path.to_dotted())),
        };
        self.insert_item(path, len, value)
    }

    /// Removes the item at `index` of the array at `path`; later items shift
    /// down by one.
    pub fn remove_item(&self, path: &JsonPath, index: usize) -> Result<Self, EditorError> {
        self.update(path, |node| match node {
            TreeNode::Array(items) => {
                if index >= items.len() {
                    return Err(EditorError::IndexOutOfBounds {
                        path: path.to_dotted(),
                        index,
                        len: items.len(),
                    });
                }
                let mut items = items.clone();
                items.remove(index);
                Ok(TreeNode::Array(items))
            }
            _ => Err(EditorError::WrongShape {
                path: path.to_dotted(),
                expected: "array",
            }),
        })
    }

    /// Rebuilds the chain from the root to `path`, applying `edit` at the end.
    fn update<F>(&self, path: &JsonPath, edit: F) -> Result<Self, EditorError>
    where
        F: FnOnce(&TreeNode) -> Result<TreeNode, EditorError>,
    {
        let root = update_at(&self.root, path.as_slice(), path, edit)?;
        Ok(Self { root })
    }
}

fn update_at<F>(
    node: &Arc<TreeNode>,
    rest: &[PathSegment],
    full: &JsonPath,
    edit: F,
) -> Result<Arc<TreeNode>, EditorError>
where
    F: FnOnce(&TreeNode) -> Result<TreeNode, EditorError>,
{
    let Some((segment, rest)) = rest.split_first() else {
        return edit(node).map(Arc::new);
    };
    let child = node
        .child(segment)
        .ok_or_else(|| EditorError::PathNotFound(full.to_dotted()))?;
    let updated = update_at(child, rest, full, edit)?;

    let rebuilt = match (&**node, segment) {
        (TreeNode::Object(obj), PathSegment::Field(key)) => {
            let mut obj = obj.clone();
            obj.insert(key.clone(), updated);
            TreeNode::Object(obj)
        }
        (TreeNode::Array(items), PathSegment::Index(index)) => {
            let mut items = items.clone();
            items[*index] = updated;
            TreeNode::Array(items)
        }
        _ => return Err(EditorError::PathNotFound(full.to_dotted())),
    };
    Ok(Arc::new(rebuilt))
}

fn split_last(path: &JsonPath) -> Option<(&PathSegment, JsonPath)> {
    let last = path.last()?;
    let parent = path.parent()?;
    Some((last, parent))
}

fn wrong_shape(parent: &JsonPath, segment: &PathSegment) -> EditorError {
    EditorError::WrongShape {
        path: parent.to_dotted(),
        expected: match segment {
            PathSegment::Field(_) => "object",
            PathSegment::Index(_) => "array",
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn tree() -> ValueTree {
        ValueTree::from_json(&json!({
            "name": "sales",
            "items": [1, 2, 3],
            "layout": {"rows": [{"height": 1}]}
        }))
    }

    #[test]
    fn test_round_trip_keeps_key_order() {
        let value = json!({"z": 1, "a": {"y": null, "b": [true]}});
        assert_eq!(ValueTree::from_json(&value).to_json(), value);
    }

    #[test]
    fn test_set_rebuilds_only_the_chain() {
        let before = tree();
        let path = JsonPath::from_field("layout")
            .push_field("rows")
            .push_index(0)
            .push_field("height");
        let after = before.set(&path, &json!(2)).unwrap();

        assert_eq!(after.value_at(&path), Some(json!(2)));
        assert_eq!(before.value_at(&path), Some(json!(1)));
        assert!(after.shares_subtree(&before, &JsonPath::from_field("items")));
        assert!(!after.shares_subtree(&before, &JsonPath::from_field("layout")));
    }

    #[test]
    fn test_set_creates_missing_key_but_not_missing_parent() {
        let after = tree().set(&JsonPath::from_field("color"), &json!("red")).unwrap();
        assert_eq!(after.value_at(&JsonPath::from_field("color")), Some(json!("red")));

        let err = tree()
            .set(&JsonPath::from_field("missing").push_field("x"), &json!(1))
            .unwrap_err();
        assert_eq!(err, EditorError::PathNotFound("missing".to_string()));
    }

    #[test]
    fn test_set_root_replaces_everything() {
        let after = tree().set(&JsonPath::root(), &json!([])).unwrap();
        assert_eq!(after.to_json(), json!([]));
    }

    #[test]
    fn test_remove_property_preserves_order() {
        let after = tree()
            .remove_property(&JsonPath::root(), "items")
            .unwrap();
        let keys: Vec<String> = after
            .to_json()
            .as_object()
            .unwrap()
            .keys()
            .cloned()
            .collect();
        assert_eq!(keys, vec!["name", "layout"]);
    }

    #[test]
    fn test_remove_item_splices() {
        let items = JsonPath::from_field("items");
        let after = tree().remove_item(&items, 1).unwrap();
        assert_eq!(after.value_at(&items), Some(json!([1, 3])));
        assert!(matches!(
            tree().remove_item(&items, 3),
            Err(EditorError::IndexOutOfBounds { index: 3, len: 3, .. })
        ));
    }

    #[test]
    fn test_insert_and_push() {
        let items = JsonPath::from_field("items");
        let after = tree().insert_item(&items, 0, &json!(0)).unwrap();
        let after = after.push_item(&items, &json!(4)).unwrap();
        assert_eq!(after.value_at(&items), Some(json!([0, 1, 2, 3, 4])));
    }

    #[test]
    fn test_wrong_shape() {
        let err = tree()
            .push_item(&JsonPath::from_field("name"), &json!(1))
            .unwrap_err();
        assert_eq!(
            err,
            EditorError::WrongShape {
                path: "name".to_string(),
                expected: "array"
            }
        );
    }
}

//! Selection shapes.
//!
//! The store has no access to query documents' selection sets, so it records
//! the shape of whatever data was written under a root field. A later read
//! requires every field in that shape to still be present.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// The field tree a cached root field was written with.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Shape {
    /// A scalar, null, or a value whose structure is not tracked.
    #[default]
    Leaf,
    /// An object with the given selected fields.
    Object(BTreeMap<String, Shape>),
    /// A list whose elements share one shape.
    List(Box<Shape>),
}

impl Shape {
    /// Infer the shape of written data.
    pub fn of(value: &Value) -> Self {
        match value {
            Value::Object(map) => Shape::Object(
                map.iter()
                    .filter(|(k, _)| k.as_str() != "__typename")
                    .map(|(k, v)| (k.clone(), Shape::of(v)))
                    .collect(),
            ),
            Value::Array(items) => Shape::List(Box::new(
                items.iter().map(Shape::of).fold(Shape::Leaf, Shape::union),
            )),
            _ => Shape::Leaf,
        }
    }

    /// Combine two shapes; objects union their fields.
    pub fn union(self, other: Shape) -> Shape {
        match (self, other) {
            (Shape::Leaf, other) => other,
            (this, Shape::Leaf) => this,
            (Shape::Object(mut a), Shape::Object(b)) => {
                for (field, shape) in b {
                    let merged = match a.remove(&field) {
                        Some(existing) => existing.union(shape),
                        None => shape,
                    };
                    a.insert(field, merged);
                }
                Shape::Object(a)
            }
            (Shape::List(a), Shape::List(b)) => Shape::List(Box::new(a.union(*b))),
            (_, other) => other,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_shape_of_list_unions_elements() {
        let data = json!({
            "count": 2,
            "scenes": [
                {"__typename": "Scene", "id": "1", "title": "a"},
                {"__typename": "Scene", "id": "2", "o_counter": 3}
            ]
        });
        let Shape::Object(root) = Shape::of(&data) else {
            panic!("expected object shape");
        };
        let Some(Shape::List(element)) = root.get("scenes") else {
            panic!("expected list shape");
        };
        let Shape::Object(fields) = element.as_ref() else {
            panic!("expected object element");
        };
        let names: Vec<_> = fields.keys().cloned().collect();
        assert_eq!(names, vec!["id", "o_counter", "title"]);
    }

    #[test]
    fn test_null_is_leaf() {
        assert_eq!(Shape::of(&Value::Null), Shape::Leaf);
    }
}

//! Layer merging
//!
//! - Objects: deep-merge by key
//! - Arrays: replace (last wins)
//! - Scalars and null: override (last wins)

use serde_json::Value;

/// Deep merge `overlay` onto `base`, returning the result.
pub fn deep_merge(mut base: Value, overlay: Value) -> Value {
    merge_into(&mut base, overlay);
    base
}

fn merge_into(base: &mut Value, overlay: Value) {
    match (base, overlay) {
        (Value::Object(base_map), Value::Object(overlay_map)) => {
            for (key, value) in overlay_map {
                match base_map.get_mut(&key) {
                    Some(existing) => merge_into(existing, value),
                    None => {
                        base_map.insert(key, value);
                    }
                }
            }
        }
        (slot, overlay) => *slot = overlay,
    }
}

/// Merge layers in order; the last layer has the highest precedence.
pub fn merge_layers(layers: Vec<Value>) -> Value {
    layers.into_iter().fold(Value::Null, deep_merge)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_nested_keys_survive() {
        let base = json!({"server": {"base_url": "http://a/", "https": false}});
        let overlay = json!({"server": {"https": true}});
        let result = deep_merge(base, overlay);

        assert_eq!(result["server"]["base_url"], "http://a/");
        assert_eq!(result["server"]["https"], true);
    }

    #[test]
    fn test_array_replaces() {
        let result = deep_merge(json!({"list": [1, 2, 3]}), json!({"list": [9]}));
        assert_eq!(result["list"], json!([9]));
    }

    #[test]
    fn test_null_overrides() {
        let result = deep_merge(json!({"server": {"dev_port": 9999}}), json!({"server": {"dev_port": null}}));
        assert!(result["server"]["dev_port"].is_null());
    }

    #[test]
    fn test_layer_precedence() {
        let result = merge_layers(vec![
            json!({"log": {"filter": "info"}, "cache": {"gc_after_evict": true}}),
            json!({"log": {"filter": "debug"}}),
            json!({"cache": {"gc_after_evict": false}}),
            json!({"log": {"filter": "trace"}}),
        ]);

        assert_eq!(result["log"]["filter"], "trace");
        assert_eq!(result["cache"]["gc_after_evict"], false);
    }
}

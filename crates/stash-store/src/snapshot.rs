//! Serializable store contents.
//!
//! A snapshot holds every normalized object under its cache id, the root
//! under `ROOT_QUERY`, and the recorded selection shapes. It is what the
//! replay tool loads and saves.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use serde::{Deserialize, Serialize};
use serde_json::Value;
use stash_schema::Typename;
use tracing::debug;

use crate::error::{StoreError, StoreResult};
use crate::reference::{ObjectRef, ROOT_QUERY};
use crate::shape::Shape;
use crate::store::{CacheHandle, StoreObject};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub objects: BTreeMap<String, StoreObject>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub selections: BTreeMap<String, Shape>,
}

impl Snapshot {
    pub fn from_json(text: &str) -> StoreResult<Self> {
        Ok(serde_json::from_str(text)?)
    }

    pub fn to_json_pretty(&self) -> StoreResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

impl CacheHandle {
    /// Copy out the full store contents.
    pub fn extract(&self) -> Snapshot {
        let mut objects: BTreeMap<String, StoreObject> = self
            .objects
            .iter()
            .map(|(id, obj)| (id.clone(), obj.clone()))
            .collect();
        objects.insert(ROOT_QUERY.to_string(), self.root.clone());

        Snapshot {
            objects,
            selections: self.selections.iter().map(|(k, v)| (k.clone(), v.clone())).collect(),
        }
    }

    /// Replace the store contents with a snapshot.
    ///
    /// Every key must be a well-formed cache id whose `__typename`, when
    /// present, agrees with the key. On error the store is left unchanged.
    pub fn restore(&mut self, snapshot: Snapshot) -> StoreResult<()> {
        let mut root = StoreObject::new();
        let mut objects = HashMap::new();
        let mut by_type: HashMap<Typename, BTreeSet<String>> = HashMap::new();

        for (id, mut obj) in snapshot.objects {
            if id == ROOT_QUERY {
                root = obj;
                continue;
            }
            let parsed = ObjectRef::parse(&id)?;
            match obj.get("__typename") {
                None => {
                    obj.insert("__typename".to_string(), Value::from(parsed.typename.as_str()));
                }
                Some(Value::String(found)) if found == parsed.typename.as_str() => {}
                Some(found) => {
                    return Err(StoreError::TypenameMismatch {
                        id,
                        expected: parsed.typename.to_string(),
                        found: found.as_str().map(str::to_string),
                    });
                }
            }
            by_type.entry(parsed.typename).or_default().insert(id.clone());
            objects.insert(id, obj);
        }

        self.reset();
        self.root = root;
        self.objects = objects;
        self.by_type = by_type;
        self.selections = snapshot.selections.into_iter().collect();
        debug!(objects = self.objects.len(), "restored snapshot");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use stash_schema::documents::FIND_TAGS;

    #[test]
    fn test_extract_restore_preserves_reads() {
        let mut cache = CacheHandle::default();
        cache.write_query(
            &FIND_TAGS,
            None,
            &json!({"count": 1, "tags": [{"__typename": "Tag", "id": "1", "name": "a"}]}),
        );
        let text = cache.extract().to_json_pretty().unwrap();

        let mut restored = CacheHandle::default();
        restored.restore(Snapshot::from_json(&text).unwrap()).unwrap();

        assert_eq!(restored.read_query(&FIND_TAGS, None), cache.read_query(&FIND_TAGS, None));
        assert!(restored.verify_index());
    }

    #[test]
    fn test_restore_rejects_bad_keys() {
        let mut cache = CacheHandle::default();
        cache.write_object(&json!({"__typename": "Tag", "id": "1"}));

        let bad_id: Snapshot =
            serde_json::from_value(json!({"objects": {"Nope:1": {}}})).unwrap();
        assert!(matches!(cache.restore(bad_id), Err(StoreError::Schema(_))));

        let mismatch: Snapshot =
            serde_json::from_value(json!({"objects": {"Tag:2": {"__typename": "Studio"}}})).unwrap();
        assert!(matches!(cache.restore(mismatch), Err(StoreError::TypenameMismatch { .. })));

        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_restore_fills_missing_typename() {
        let mut cache = CacheHandle::default();
        let snap: Snapshot =
            serde_json::from_value(json!({"objects": {"Tag:2": {"id": "2"}}})).unwrap();
        cache.restore(snap).unwrap();
        let tag = cache.get(&ObjectRef::new(Typename::Tag, "2")).unwrap();
        assert_eq!(tag["__typename"], "Tag");
    }
}

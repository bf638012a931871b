//! The cache handle.

use std::collections::{BTreeSet, HashMap, HashSet};

use serde_json::{Map, Value};
use stash_schema::{QueryDocument, Typename};
use tracing::{debug, trace};

use crate::fragment::Fragment;
use crate::policy::{FieldPolicy, TypePolicies};
use crate::reference::{base_field_name, reference_id, store_field_name, ObjectRef};
use crate::shape::Shape;

/// Fields of one normalized object, including `__typename`.
pub type StoreObject = Map<String, Value>;

/// Result of reading through the store.
#[derive(Debug, Clone, PartialEq)]
pub enum ReadOutcome {
    /// Every selected field is present.
    Hit(Value),
    /// Something the read needs is absent; the caller must refetch.
    Missing,
}

impl ReadOutcome {
    pub fn is_missing(&self) -> bool {
        matches!(self, Self::Missing)
    }

    pub fn as_hit(&self) -> Option<&Value> {
        match self {
            Self::Hit(v) => Some(v),
            Self::Missing => None,
        }
    }

    pub fn into_hit(self) -> Option<Value> {
        match self {
            Self::Hit(v) => Some(v),
            Self::Missing => None,
        }
    }
}

/// What a modifier does with the field it was handed.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldUpdate {
    Keep,
    Set(Value),
    Delete,
}

/// The normalized object cache.
///
/// One handle is created per client and passed explicitly to everything that
/// reads or invalidates it. All methods are synchronous and run to completion,
/// so a mutation's cache update is atomic with respect to any reader.
#[derive(Debug)]
pub struct CacheHandle {
    pub(crate) root: StoreObject,
    pub(crate) objects: HashMap<String, StoreObject>,
    /// Resident cache ids per typename, maintained on every insert and removal.
    pub(crate) by_type: HashMap<Typename, BTreeSet<String>>,
    pub(crate) selections: HashMap<String, Shape>,
    pub(crate) retained: HashSet<String>,
    policies: TypePolicies,
}

impl Default for CacheHandle {
    fn default() -> Self {
        Self::new(TypePolicies::default())
    }
}

impl CacheHandle {
    /// Create an empty store with the given read policies.
    pub fn new(policies: TypePolicies) -> Self {
        Self {
            root: StoreObject::new(),
            objects: HashMap::new(),
            by_type: HashMap::new(),
            selections: HashMap::new(),
            retained: HashSet::new(),
            policies,
        }
    }

    pub fn policies(&self) -> &TypePolicies {
        &self.policies
    }

    /// Number of normalized objects (the root is not counted).
    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty() && self.root.is_empty()
    }

    pub fn contains(&self, obj: &ObjectRef) -> bool {
        self.objects.contains_key(&obj.cache_id())
    }

    pub fn get(&self, obj: &ObjectRef) -> Option<&StoreObject> {
        self.objects.get(&obj.cache_id())
    }

    /// Root query fields, keyed by store field name.
    pub fn root(&self) -> &StoreObject {
        &self.root
    }

    /// Resident objects of one type, from the typename index.
    pub fn ids_of_type(&self, typename: Typename) -> Vec<ObjectRef> {
        self.by_type
            .get(&typename)
            .map(|ids| ids.iter().filter_map(|id| ObjectRef::parse(id).ok()).collect())
            .unwrap_or_default()
    }

    pub fn count_of_type(&self, typename: Typename) -> usize {
        self.by_type.get(&typename).map_or(0, BTreeSet::len)
    }

    // ---------------------------------------------------------------------
    // Writes
    // ---------------------------------------------------------------------

    /// Normalize an object carrying `__typename` and `id` into the store.
    ///
    /// Nested entities are stored separately and replaced by references.
    /// Fields are merged into an existing entry one by one; a nested
    /// non-entity object replaces the previous value wholesale.
    pub fn write_object(&mut self, value: &Value) -> Option<ObjectRef> {
        let obj = ObjectRef::identify(value)?;
        self.normalize(value);
        Some(obj)
    }

    /// Store a query result under its root field.
    pub fn write_query(&mut self, doc: &QueryDocument, args: Option<&Value>, data: &Value) {
        self.write_root_field(doc.root_field, args, data);
    }

    /// Store `data` under `field(args)` on the root.
    pub fn write_root_field(&mut self, field: &str, args: Option<&Value>, data: &Value) {
        let name = store_field_name(field, args);
        let normalized = self.normalize(data);
        trace!(field = %name, "write root field");
        self.selections.insert(name.clone(), Shape::of(data));
        self.root.insert(name, normalized);
    }

    /// Overwrite one field of a resident object. Returns false when the
    /// object is not in the store.
    pub fn write_field(&mut self, obj: &ObjectRef, field: &str, value: &Value) -> bool {
        if !self.contains(obj) {
            return false;
        }
        let normalized = self.normalize(value);
        match self.objects.get_mut(&obj.cache_id()) {
            Some(entry) => {
                entry.insert(field.to_string(), normalized);
                true
            }
            None => false,
        }
    }

    fn normalize(&mut self, value: &Value) -> Value {
        match value {
            Value::Object(map) => {
                if reference_id(value).is_some() {
                    return value.clone();
                }
                let fields: StoreObject = map
                    .iter()
                    .map(|(k, v)| (k.clone(), self.normalize(v)))
                    .collect();
                match ObjectRef::identify(value) {
                    Some(obj) => {
                        self.merge_object(&obj, fields);
                        obj.to_reference()
                    }
                    None => Value::Object(fields),
                }
            }
            Value::Array(items) => Value::Array(items.iter().map(|v| self.normalize(v)).collect()),
            other => other.clone(),
        }
    }

    fn merge_object(&mut self, obj: &ObjectRef, fields: StoreObject) {
        let id = obj.cache_id();
        let entry = self.objects.entry(id.clone()).or_insert_with(|| {
            let mut fresh = StoreObject::new();
            fresh.insert("__typename".to_string(), Value::from(obj.typename.as_str()));
            fresh
        });
        entry.extend(fields);
        self.by_type.entry(obj.typename).or_default().insert(id);
    }

    // ---------------------------------------------------------------------
    // Reads
    // ---------------------------------------------------------------------

    /// Read a query result, applying root field policies.
    pub fn read_query(&self, doc: &QueryDocument, args: Option<&Value>) -> ReadOutcome {
        self.read_root_field(doc.root_field, args)
    }

    /// Read `field(args)` from the root.
    pub fn read_root_field(&self, field: &str, args: Option<&Value>) -> ReadOutcome {
        let name = store_field_name(field, args);
        let existing = self.root.get(&name);
        let shape = self.selections.get(&name).unwrap_or(&Shape::Leaf);

        match self.policies.root_policy(field) {
            Some(FieldPolicy::ReadReference(typename)) => {
                if let Some(value) = existing.filter(|v| self.can_read(v)) {
                    return self.read_top(value, shape, field);
                }
                let fallback = args
                    .and_then(|a| a.get("id"))
                    .and_then(id_string)
                    .map(|id| ObjectRef::new(typename, id))
                    .filter(|obj| self.contains(obj));
                match fallback {
                    Some(obj) => self.read_top(&obj.to_reference(), shape, field),
                    None => ReadOutcome::Missing,
                }
            }
            Some(FieldPolicy::DanglingNull) => match existing {
                None => ReadOutcome::Missing,
                Some(value) if !self.can_read(value) => ReadOutcome::Hit(Value::Null),
                Some(value) => self.read_top(value, shape, field),
            },
            None => match existing {
                None => ReadOutcome::Missing,
                Some(value) => self.read_top(value, shape, field),
            },
        }
    }

    /// Read one field of a cached object, raw (references are not resolved).
    pub fn read_field(&self, obj: &ObjectRef, field: &str) -> ReadOutcome {
        let Some(value) = self.get(obj).and_then(|o| o.get(field)) else {
            return ReadOutcome::Missing;
        };
        if self.can_read(value) {
            return ReadOutcome::Hit(value.clone());
        }
        match self.policies.field_policy(obj.typename, field) {
            Some(FieldPolicy::DanglingNull) => ReadOutcome::Hit(Value::Null),
            _ => ReadOutcome::Missing,
        }
    }

    /// The fragment's fields of a resident object, or `None` if the object
    /// is absent or any fragment field has been evicted.
    pub fn read_fragment(&self, obj: &ObjectRef, fragment: &Fragment) -> Option<StoreObject> {
        if obj.typename != fragment.on {
            return None;
        }
        let stored = self.get(obj)?;
        fragment
            .fields
            .iter()
            .map(|f| stored.get(*f).map(|v| (f.to_string(), v.clone())))
            .collect()
    }

    fn can_read(&self, value: &Value) -> bool {
        reference_id(value).map_or(true, |id| self.objects.contains_key(id))
    }

    fn read_top(&self, value: &Value, shape: &Shape, field: &str) -> ReadOutcome {
        match self.read_value(value, shape, None, field) {
            Some(v) => ReadOutcome::Hit(v),
            None => ReadOutcome::Missing,
        }
    }

    fn read_value(
        &self,
        value: &Value,
        shape: &Shape,
        parent: Option<Typename>,
        field: &str,
    ) -> Option<Value> {
        if let Some(id) = reference_id(value) {
            let Some(obj) = self.objects.get(id) else {
                let policy = match parent {
                    Some(typename) => self.policies.field_policy(typename, field),
                    None => self.policies.root_policy(field),
                };
                return match policy {
                    Some(FieldPolicy::DanglingNull) => Some(Value::Null),
                    _ => None,
                };
            };
            return self.read_object(obj, shape);
        }

        match (value, shape) {
            (Value::Object(map), _) => self.read_object(map, shape),
            (Value::Array(items), _) => {
                let element = match shape {
                    Shape::List(element) => element.as_ref(),
                    _ => &Shape::Leaf,
                };
                // dangling references are dropped from lists
                items
                    .iter()
                    .filter(|v| self.can_read(v))
                    .map(|v| self.read_value(v, element, parent, field))
                    .collect::<Option<Vec<_>>>()
                    .map(Value::Array)
            }
            _ => Some(value.clone()),
        }
    }

    fn read_object(&self, obj: &StoreObject, shape: &Shape) -> Option<Value> {
        let Shape::Object(selected) = shape else {
            return Some(Value::Object(obj.clone()));
        };
        let typename = obj
            .get("__typename")
            .and_then(Value::as_str)
            .and_then(Typename::parse);

        let mut out = StoreObject::new();
        if let Some(t) = obj.get("__typename") {
            out.insert("__typename".to_string(), t.clone());
        }
        for (name, sub) in selected {
            let stored = obj.get(name)?;
            out.insert(name.clone(), self.read_value(stored, sub, typename, name)?);
        }
        Some(Value::Object(out))
    }

    // ---------------------------------------------------------------------
    // Modification
    // ---------------------------------------------------------------------

    /// Run `modifier` on an existing field of a resident object.
    ///
    /// Absent objects and absent fields are left alone and the modifier is
    /// not called. Returns whether the field changed.
    pub fn modify_field<F>(&mut self, obj: &ObjectRef, field: &str, modifier: F) -> bool
    where
        F: FnOnce(&Value) -> FieldUpdate,
    {
        let Some(entry) = self.objects.get_mut(&obj.cache_id()) else {
            return false;
        };
        let Some(current) = entry.get(field) else {
            return false;
        };
        match modifier(current) {
            FieldUpdate::Keep => false,
            FieldUpdate::Set(value) => {
                entry.insert(field.to_string(), value);
                true
            }
            FieldUpdate::Delete => {
                entry.remove(field);
                true
            }
        }
    }

    /// Run `modifier` on every root entry whose field name is `field`,
    /// whatever its arguments. Returns the number of entries changed.
    pub fn modify_root<F>(&mut self, field: &str, mut modifier: F) -> usize
    where
        F: FnMut(&str, &Value) -> FieldUpdate,
    {
        let names: Vec<String> = self
            .root
            .keys()
            .filter(|k| base_field_name(k) == field)
            .cloned()
            .collect();

        let mut changed = 0;
        for name in names {
            let Some(current) = self.root.get(&name) else {
                continue;
            };
            match modifier(&name, current) {
                FieldUpdate::Keep => {}
                FieldUpdate::Set(value) => {
                    self.root.insert(name, value);
                    changed += 1;
                }
                FieldUpdate::Delete => {
                    self.root.remove(&name);
                    self.selections.remove(&name);
                    changed += 1;
                }
            }
        }
        changed
    }

    // ---------------------------------------------------------------------
    // Eviction
    // ---------------------------------------------------------------------

    /// Remove an object. References to it become dangling.
    pub fn evict_object(&mut self, obj: &ObjectRef) -> bool {
        let id = obj.cache_id();
        if self.objects.remove(&id).is_none() {
            return false;
        }
        if let Some(ids) = self.by_type.get_mut(&obj.typename) {
            ids.remove(&id);
            if ids.is_empty() {
                self.by_type.remove(&obj.typename);
            }
        }
        trace!(object = %id, "evicted object");
        true
    }

    /// Remove one field of a resident object.
    pub fn evict_field(&mut self, obj: &ObjectRef, field: &str) -> bool {
        let removed = self
            .objects
            .get_mut(&obj.cache_id())
            .and_then(|entry| entry.remove(field))
            .is_some();
        if removed {
            trace!(object = %obj, field, "evicted field");
        }
        removed
    }

    /// Remove every root entry for `field`, whatever its arguments.
    pub fn evict_root_field(&mut self, field: &str) -> usize {
        let removed = self.modify_root(field, |_, _| FieldUpdate::Delete);
        if removed > 0 {
            trace!(field, entries = removed, "evicted root field");
        }
        removed
    }

    /// Protect an object from garbage collection.
    pub fn retain(&mut self, obj: &ObjectRef) {
        self.retained.insert(obj.cache_id());
    }

    pub fn release(&mut self, obj: &ObjectRef) {
        self.retained.remove(&obj.cache_id());
    }

    /// Drop everything: objects, root fields, shapes and retained ids.
    pub fn reset(&mut self) {
        let objects = self.objects.len();
        self.root.clear();
        self.objects.clear();
        self.by_type.clear();
        self.selections.clear();
        self.retained.clear();
        debug!(objects, "cache reset");
    }

    /// Whether the typename index matches the stored objects exactly.
    pub fn verify_index(&self) -> bool {
        let mut rebuilt: HashMap<Typename, BTreeSet<String>> = HashMap::new();
        for id in self.objects.keys() {
            match ObjectRef::parse(id) {
                Ok(obj) => {
                    rebuilt.entry(obj.typename).or_default().insert(id.clone());
                }
                Err(_) => return false,
            }
        }
        rebuilt == self.by_type
    }
}

fn id_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

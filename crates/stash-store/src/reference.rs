//! Object references and store field names.

use std::fmt;
use std::sync::OnceLock;

use regex_lite::Regex;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use stash_schema::{SchemaError, Typename};

/// Cache id of the root query object.
pub const ROOT_QUERY: &str = "ROOT_QUERY";

/// Identity of a normalized object: one logical server row.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ObjectRef {
    pub typename: Typename,
    pub id: String,
}

impl ObjectRef {
    pub fn new(typename: Typename, id: impl Into<String>) -> Self {
        Self {
            typename,
            id: id.into(),
        }
    }

    /// The store key, `<Typename>:<id>`.
    pub fn cache_id(&self) -> String {
        format!("{}:{}", self.typename, self.id)
    }

    /// Parse a store key.
    pub fn parse(cache_id: &str) -> Result<Self, SchemaError> {
        let (typename, id) = cache_id
            .split_once(':')
            .ok_or_else(|| SchemaError::MalformedCacheId(cache_id.to_string()))?;
        if id.is_empty() {
            return Err(SchemaError::MalformedCacheId(cache_id.to_string()));
        }
        Ok(Self::new(typename.parse()?, id))
    }

    /// Identity of an inline object carrying `__typename` and `id`.
    pub fn identify(value: &Value) -> Option<Self> {
        let obj = value.as_object()?;
        let typename = Typename::parse(obj.get("__typename")?.as_str()?)?;
        let id = match obj.get("id")? {
            Value::String(s) => s.clone(),
            Value::Number(n) => n.to_string(),
            _ => return None,
        };
        Some(Self::new(typename, id))
    }

    /// Resolve a `{"__ref": ...}` value.
    pub fn from_reference(value: &Value) -> Option<Self> {
        Self::parse(reference_id(value)?).ok()
    }

    /// This object as a `{"__ref": ...}` value.
    pub fn to_reference(&self) -> Value {
        reference(&self.cache_id())
    }
}

impl fmt::Display for ObjectRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.typename, self.id)
    }
}

/// Build a reference value.
pub fn reference(cache_id: &str) -> Value {
    serde_json::json!({ "__ref": cache_id })
}

/// The cache id a reference points at, if `value` is a reference.
pub fn reference_id(value: &Value) -> Option<&str> {
    let obj = value.as_object()?;
    if obj.len() != 1 {
        return None;
    }
    obj.get("__ref")?.as_str()
}

/// Key a root field is stored under.
///
/// Arguments are serialized as canonical JSON so that two argument objects
/// differing only in key order share one entry.
pub fn store_field_name(field: &str, args: Option<&Value>) -> String {
    match args {
        None | Some(Value::Null) => field.to_string(),
        Some(Value::Object(map)) if map.is_empty() => field.to_string(),
        Some(args) => {
            let canonical = serde_json_canonicalizer::to_vec(args)
                .ok()
                .and_then(|bytes| String::from_utf8(bytes).ok())
                .unwrap_or_else(|| args.to_string());
            format!("{}({})", field, canonical)
        }
    }
}

fn field_name_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^([A-Za-z_][A-Za-z0-9_]*)(?:\((.*)\))?$").expect("static pattern compiles")
    })
}

/// The field name part of a store field name: `findScene` for
/// `findScene({"id":"1"})`.
pub fn base_field_name(store_name: &str) -> &str {
    field_name_pattern()
        .captures(store_name)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str())
        .unwrap_or(store_name)
}

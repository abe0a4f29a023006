//! In-memory attribute store for testing and embedding.
//!
//! [`MemoryStore`] keeps top-level attributes in a `BTreeMap` and resolves
//! dotted paths by walking into the stored values segment by segment.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use tagbind_types::{crc32_hash, MemberHash, SetHashFn, Value, ValueSet};
use tracing::debug;

use crate::error::{StoreError, StoreResult};
use crate::traits::AttributeStore;

/// An in-memory implementation of [`AttributeStore`].
///
/// Keys declared with [`MemoryStore::with_set_attribute`] hold sets: a list
/// written to such a key is stored as a [`ValueSet`] hashed with the store's
/// hash function. Data is lost when the store is dropped.
#[derive(Clone)]
pub struct MemoryStore {
    attributes: BTreeMap<String, Value>,
    id: String,
    set_attributes: BTreeSet<String>,
    hasher: SetHashFn,
    read_only: bool,
}

impl MemoryStore {
    /// Create a new empty store with an empty identity.
    pub fn new() -> Self {
        Self {
            attributes: BTreeMap::new(),
            id: String::new(),
            set_attributes: BTreeSet::new(),
            hasher: Arc::new(crc32_hash),
            read_only: false,
        }
    }

    /// Seed a top-level attribute.
    pub fn with_attribute(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        let key = key.into();
        let value = self.normalize(&key, value.into());
        self.attributes.insert(key, value);
        self
    }

    /// Seed the identity slot.
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }

    /// Declare `key` as a set attribute. Lists already stored at `key` are
    /// converted.
    pub fn with_set_attribute(mut self, key: impl Into<String>) -> Self {
        let key = key.into();
        self.set_attributes.insert(key.clone());
        if let Some(value) = self.attributes.remove(&key) {
            let value = self.normalize(&key, value);
            self.attributes.insert(key, value);
        }
        self
    }

    /// Replace the hash function used for set attributes.
    pub fn with_hasher<F>(mut self, hasher: F) -> Self
    where
        F: Fn(&Value) -> MemberHash + Send + Sync + 'static,
    {
        let hasher: SetHashFn = Arc::new(hasher);
        self.hasher = hasher;
        self
    }

    /// Reject every subsequent write with [`StoreError::ReadOnly`].
    pub fn read_only(mut self) -> Self {
        self.read_only = true;
        self
    }

    /// Build a set hashed with this store's hash function.
    pub fn make_set<I: IntoIterator<Item = Value>>(&self, members: I) -> ValueSet {
        ValueSet::from_members_with(Arc::clone(&self.hasher), members)
    }

    /// Raw top-level attribute, without path resolution.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.attributes.get(key)
    }

    /// All top-level attributes.
    pub fn attributes(&self) -> &BTreeMap<String, Value> {
        &self.attributes
    }

    /// Number of top-level attributes.
    pub fn len(&self) -> usize {
        self.attributes.len()
    }

    /// Returns `true` if no attribute is stored.
    pub fn is_empty(&self) -> bool {
        self.attributes.is_empty()
    }

    fn normalize(&self, key: &str, value: Value) -> Value {
        match value {
            Value::List(items) if self.set_attributes.contains(key) => {
                Value::Set(self.make_set(items))
            }
            other => other,
        }
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl From<BTreeMap<String, Value>> for MemoryStore {
    fn from(attributes: BTreeMap<String, Value>) -> Self {
        attributes
            .into_iter()
            .fold(Self::new(), |store, (k, v)| store.with_attribute(k, v))
    }
}

impl AttributeStore for MemoryStore {
    fn probe(&self, path: &str) -> Option<Value> {
        let mut segments = path.split('.');
        let mut current = self.attributes.get(segments.next()?)?;
        for segment in segments {
            current = step(current, segment)?;
        }
        if current.is_null() {
            return None;
        }
        Some(current.clone())
    }

    fn write(&mut self, key: &str, value: Value) -> StoreResult<()> {
        if self.read_only {
            return Err(StoreError::ReadOnly);
        }
        validate_key(key)?;
        debug!(key, kind = %value.kind(), "attribute written");
        if value.is_null() {
            self.attributes.remove(key);
            return Ok(());
        }
        let value = self.normalize(key, value);
        self.attributes.insert(key.to_string(), value);
        Ok(())
    }

    fn id(&self) -> String {
        self.id.clone()
    }

    fn set_id(&mut self, id: &str) {
        debug!(id, "identity written");
        self.id = id.to_string();
    }
}

impl std::fmt::Debug for MemoryStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemoryStore")
            .field("id", &self.id)
            .field("attributes", &self.attributes)
            .field("read_only", &self.read_only)
            .finish()
    }
}

/// Resolve one path segment below `value`.
fn step<'a>(value: &'a Value, segment: &str) -> Option<&'a Value> {
    match value {
        Value::Map(map) => map.get(segment),
        Value::List(items) => items.get(segment.parse::<usize>().ok()?),
        Value::Set(set) => set.get(segment.parse::<MemberHash>().ok()?),
        _ => None,
    }
}

fn validate_key(key: &str) -> StoreResult<()> {
    if key.is_empty() {
        return Err(StoreError::InvalidKey {
            key: key.to_string(),
            reason: "key must not be empty".into(),
        });
    }
    if key.contains('.') {
        return Err(StoreError::InvalidKey {
            key: key.to_string(),
            reason: "only top-level attributes can be written".into(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn nested_store() -> MemoryStore {
        MemoryStore::new()
            .with_attribute("name", "web")
            .with_attribute(
                "block",
                Value::from(json!([
                    {"name": "first", "ports": [80, 443]},
                    {"name": "second", "ports": []}
                ])),
            )
            .with_attribute("labels", Value::from(json!({"env": "prod"})))
    }

    // -----------------------------------------------------------------------
    // Probe
    // -----------------------------------------------------------------------

    #[test]
    fn probe_top_level() {
        let store = nested_store();
        assert_eq!(store.probe("name"), Some(Value::from("web")));
    }

    #[test]
    fn probe_list_index_and_map_key() {
        let store = nested_store();
        assert_eq!(store.probe("block.1.name"), Some(Value::from("second")));
        assert_eq!(store.probe("block.0.ports.1"), Some(Value::Int(443)));
        assert_eq!(store.probe("labels.env"), Some(Value::from("prod")));
    }

    #[test]
    fn probe_missing_paths_are_absent() {
        let store = nested_store();
        assert_eq!(store.probe("missing"), None);
        assert_eq!(store.probe("block.7.name"), None);
        assert_eq!(store.probe("block.x.name"), None);
        assert_eq!(store.probe("name.deeper"), None);
        assert_eq!(store.probe(""), None);
    }

    #[test]
    fn probe_null_is_absent() {
        let store = MemoryStore::new().with_attribute("gone", Value::Null);
        assert_eq!(store.probe("gone"), None);
    }

    #[test]
    fn probe_set_member_by_hash() {
        let store = MemoryStore::new()
            .with_hasher(|member| member.to_string().len() as MemberHash)
            .with_set_attribute("tags")
            .with_attribute("tags", Value::from(json!(["a", "bbb"])));

        let set = store.probe("tags").and_then(|v| v.as_set().cloned()).unwrap();
        assert_eq!(set.len(), 2);
        assert_eq!(store.probe("tags.3"), Some(Value::from("bbb")));
        assert_eq!(store.probe("tags.1"), Some(Value::from("a")));
        assert_eq!(store.probe("tags.2"), None);
    }

    // -----------------------------------------------------------------------
    // Write
    // -----------------------------------------------------------------------

    #[test]
    fn write_and_probe() {
        let mut store = MemoryStore::new();
        store.write("count", Value::Int(3)).unwrap();
        assert_eq!(store.probe("count"), Some(Value::Int(3)));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn write_replaces() {
        let mut store = MemoryStore::new().with_attribute("count", 1i64);
        store.write("count", Value::Int(2)).unwrap();
        assert_eq!(store.get("count"), Some(&Value::Int(2)));
    }

    #[test]
    fn write_null_removes() {
        let mut store = MemoryStore::new().with_attribute("count", 1i64);
        store.write("count", Value::Null).unwrap();
        assert!(store.is_empty());
    }

    #[test]
    fn write_list_to_set_attribute_becomes_set() {
        let mut store = MemoryStore::new().with_set_attribute("block");
        store
            .write("block", Value::from(json!([{"name": "x"}])))
            .unwrap();

        let set = store.get("block").and_then(Value::as_set).expect("set");
        let (hash, member) = set.first().unwrap();
        assert_eq!(member, &Value::from(json!({"name": "x"})));
        assert_eq!(
            store.probe(&format!("block.{hash}.name")),
            Some(Value::from("x"))
        );
    }

    #[test]
    fn read_only_rejects_writes() {
        let mut store = MemoryStore::new().read_only();
        let err = store.write("name", Value::from("x")).unwrap_err();
        assert_eq!(err, StoreError::ReadOnly);
    }

    #[test]
    fn invalid_keys_rejected() {
        let mut store = MemoryStore::new();
        assert!(matches!(
            store.write("", Value::Int(1)),
            Err(StoreError::InvalidKey { .. })
        ));
        assert!(matches!(
            store.write("a.b", Value::Int(1)),
            Err(StoreError::InvalidKey { .. })
        ));
    }

    // -----------------------------------------------------------------------
    // Identity
    // -----------------------------------------------------------------------

    #[test]
    fn identity_is_separate_from_attributes() {
        let mut store = MemoryStore::new().with_id("i-123");
        assert_eq!(store.id(), "i-123");
        assert_eq!(store.probe("id"), None);

        store.set_id("i-456");
        assert_eq!(store.id(), "i-456");
        assert!(store.is_empty());
    }

    #[test]
    fn from_attribute_map() {
        let map: BTreeMap<String, Value> =
            [("a".to_string(), Value::Int(1))].into_iter().collect();
        let store = MemoryStore::from(map);
        assert_eq!(store.probe("a"), Some(Value::Int(1)));
    }

    #[test]
    fn debug_format() {
        let store = MemoryStore::new().with_id("x");
        let debug = format!("{store:?}");
        assert!(debug.contains("MemoryStore"));
        assert!(debug.contains("attributes"));
    }
}

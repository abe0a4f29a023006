//! Annotation-driven marshalling between typed records and attribute stores.
//!
//! An attribute store exposes its data as dotted paths (`rule.0.port`,
//! `tags.2154397890`) plus a dedicated identity slot. This crate moves data
//! between such a store and ordinary Rust structs whose fields carry a
//! `#[bind("key,flags")]` annotation.
//!
//! # Decode and encode
//!
//! - **Decode** reads every described field from the store; fields with no
//!   value at their path keep what they had.
//! - **Encode** writes back only top-level fields flagged `computed`, and
//!   skips those whose contribution is empty.
//!
//! # Annotation flags
//!
//! - `computed`: the field is written back on encode.
//! - `sub`: the store wraps the field in a one-element list or set. Only the
//!   first member is ever read. The field must hold a record, directly or
//!   through `Option`.
//!
//! The reserved key `id` (configurable through [`BindConfig`]) is routed to
//! the store's identity accessors instead of the path protocol.
//!
//! # Example
//!
//! ```
//! use tagbind::{Bind, MemoryStore, AttributeStore};
//!
//! #[derive(Bind, Debug, Default, PartialEq)]
//! struct Bucket {
//!     #[bind("id,computed")]
//!     id: String,
//!     #[bind("region")]
//!     region: String,
//!     #[bind("versioning,computed,sub")]
//!     versioning: Versioning,
//! }
//!
//! #[derive(Bind, Debug, Default, PartialEq)]
//! struct Versioning {
//!     #[bind("enabled")]
//!     enabled: bool,
//! }
//!
//! let bucket = Bucket {
//!     id: "logs".into(),
//!     region: "eu-west-1".into(),
//!     versioning: Versioning { enabled: true },
//! };
//!
//! let mut store = MemoryStore::new();
//! tagbind::encode(&mut store, &bucket)?;
//! assert_eq!(store.id(), "logs");
//! // `region` is not computed, so it is never written.
//! assert!(store.probe("region").is_none());
//! assert!(store.probe("versioning.0.enabled").is_some());
//!
//! let back: Bucket = tagbind::decode(&store)?;
//! assert_eq!(back.versioning, bucket.versioning);
//! # Ok::<(), tagbind::BindError>(())
//! ```

// Lets `#[derive(Bind)]` expand to `::tagbind::...` inside this crate too.
extern crate self as tagbind;

pub mod binder;
pub mod coerce;
pub mod config;
mod decode;
mod encode;
pub mod error;
mod impls;
pub mod node;
pub mod path;
pub mod tag;

pub use binder::{decode, decode_into, encode, encode_value, Binder};
pub use coerce::{coerce, ScalarKind};
pub use config::BindConfig;
pub use error::{BindError, BindResult, CoercionError};
pub use node::{
    Bind, FieldInfo, FillElement, MapMut, MapRef, MapValue, NodeMut, NodeRef, OptionalMut, Record,
    ScalarSlot, SequenceMut, SequenceRef,
};
pub use tag::FieldTag;

/// Derive macro generating the record description of a struct.
pub use tagbind_derive::Bind;

pub use tagbind_store::{AttributeStore, MemoryStore, StoreError, StoreResult};
pub use tagbind_types::{MemberHash, Value, ValueKind, ValueSet};

#[cfg(test)]
mod tests {
    use std::collections::{BTreeMap, BTreeSet};

    use proptest::prelude::*;

    use super::*;

    #[derive(Bind, Debug, Default, Clone, PartialEq)]
    struct Leaf {
        #[bind("name,computed")]
        name: String,
        #[bind("count,computed")]
        count: i64,
    }

    #[derive(Bind, Debug, Default, Clone, PartialEq)]
    struct Resource {
        #[bind("id,computed")]
        id: String,
        #[bind("title,computed")]
        title: String,
        #[bind("enabled,computed")]
        enabled: bool,
        #[bind("labels,computed")]
        labels: BTreeMap<String, i64>,
        #[bind("primary,computed")]
        primary: Option<Leaf>,
        #[bind("block,computed,sub")]
        block: Leaf,
        #[bind("extra,computed,sub")]
        extra: Option<Leaf>,
        #[bind("leaves,computed")]
        leaves: Vec<Leaf>,
        #[bind("tags,computed")]
        tags: BTreeSet<String>,
    }

    fn leaf() -> impl Strategy<Value = Leaf> {
        ("[a-z ]{0,8}", any::<i64>()).prop_map(|(name, count)| Leaf { name, count })
    }

    /// Optional leaves are never zero: a present-but-empty record encodes to
    /// nothing and would decode back as absent.
    fn present_leaf() -> impl Strategy<Value = Leaf> {
        ("[a-z]{1,8}", any::<i64>()).prop_map(|(name, count)| Leaf { name, count })
    }

    fn resource() -> impl Strategy<Value = Resource> {
        (
            "[a-z0-9-]{0,12}",
            ".{0,16}",
            any::<bool>(),
            prop::collection::btree_map("[a-z]{1,6}", any::<i64>(), 0..4),
            prop::option::of(present_leaf()),
            leaf(),
            prop::option::of(present_leaf()),
            prop::collection::vec(leaf(), 0..5),
            prop::collection::btree_set("[a-z]{1,6}", 0..5),
        )
            .prop_map(
                |(id, title, enabled, labels, primary, block, extra, leaves, tags)| Resource {
                    id,
                    title,
                    enabled,
                    labels,
                    primary,
                    block,
                    extra,
                    leaves,
                    tags,
                },
            )
    }

    proptest! {
        #![proptest_config(ProptestConfig { cases: 128, .. ProptestConfig::default() })]

        #[test]
        fn encode_then_decode_restores_the_tree(tree in resource()) {
            let mut store = MemoryStore::new();
            encode(&mut store, &tree).unwrap_or_else(|e| panic!("encode failed: {e}"));
            let restored: Resource =
                decode(&store).unwrap_or_else(|e| panic!("decode failed: {e}"));
            prop_assert_eq!(restored, tree);
        }

        #[test]
        fn set_attributes_restore_as_equal_collections(tree in resource()) {
            let mut store = MemoryStore::new().with_set_attribute("tags");
            encode(&mut store, &tree).unwrap_or_else(|e| panic!("encode failed: {e}"));
            if !tree.tags.is_empty() {
                prop_assert!(matches!(store.get("tags"), Some(Value::Set(_))));
            }
            let restored: Resource =
                decode(&store).unwrap_or_else(|e| panic!("decode failed: {e}"));
            prop_assert_eq!(restored.tags, tree.tags);
        }

        #[test]
        fn encode_value_matches_what_the_store_receives(tree in resource()) {
            let mut store = MemoryStore::new();
            encode(&mut store, &tree).unwrap_or_else(|e| panic!("encode failed: {e}"));
            let preview = encode_value(&tree).unwrap_or_else(|e| panic!("encode_value failed: {e}"));
            if let Some(Value::Map(fields)) = preview {
                for (key, value) in store.attributes() {
                    prop_assert_eq!(fields.get(key), Some(value));
                }
            }
        }
    }

    #[test]
    fn derived_record_describes_tagged_fields_only() {
        #[derive(Bind, Default)]
        struct Mixed {
            #[bind("a,computed")]
            a: String,
            b: String,
            #[bind("c")]
            c: Vec<String>,
        }
        let mixed = Mixed::default();
        let NodeRef::Record(record) = mixed.node() else {
            panic!("expected record")
        };
        let names: Vec<_> = record.fields().iter().map(|f| f.name).collect();
        assert_eq!(names, vec!["a", "c"]);
        assert_eq!(record.record_name(), "Mixed");
        assert!(record.field(2).is_none());
        assert!(mixed.b.is_empty());
    }

    #[test]
    fn generic_records_are_supported() {
        #[derive(Bind, Default, Debug, PartialEq)]
        struct Wrapper<T: Bind + Default> {
            #[bind("inner,computed")]
            inner: T,
        }
        let mut store = MemoryStore::new();
        encode(&mut store, &Wrapper { inner: 5u16 }).unwrap();
        let back: Wrapper<u16> = decode(&store).unwrap();
        assert_eq!(back.inner, 5);
    }

    #[test]
    fn logging_does_not_interfere() {
        let _guard = tracing::subscriber::set_default(
            tracing_subscriber::fmt()
                .with_max_level(tracing::Level::TRACE)
                .with_test_writer()
                .finish(),
        );
        let mut store = MemoryStore::new();
        encode(
            &mut store,
            &Leaf {
                name: "traced".into(),
                count: 1,
            },
        )
        .unwrap();
        let back: Leaf = decode(&store).unwrap();
        assert_eq!(back.name, "traced");
    }
}

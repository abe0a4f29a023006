//! Store-from-tree encoding.
//!
//! Encoding builds the dynamic form of every described field. Only the
//! top-level pass touches the store: a top-level field is written when it is
//! flagged `computed` and its contribution is neither absent nor zero. Below
//! the top level every described field is emitted, whatever its flags.

use std::collections::BTreeMap;

use tagbind_store::AttributeStore;
use tagbind_types::Value;
use tracing::trace;

use crate::config::BindConfig;
use crate::error::{BindError, BindResult};
use crate::node::{Bind, NodeRef, Record};
use crate::path::{element_path, field_path};
use crate::tag::FieldTag;

/// Stands in for the parent value when building paths below a `sub` field;
/// the encoded form of such a field is always a one-element list.
const SUB_BLOCK: Value = Value::List(Vec::new());

pub(crate) struct Encoder<'a> {
    config: &'a BindConfig,
}

impl<'a> Encoder<'a> {
    pub(crate) fn new(config: &'a BindConfig) -> Self {
        Self { config }
    }

    /// Write the computed top-level fields of `root` to `store`.
    ///
    /// Returns the number of store writes, the identity write included.
    pub(crate) fn encode_root<S>(&self, store: &mut S, root: &dyn Bind) -> BindResult<usize>
    where
        S: AttributeStore + ?Sized,
    {
        let record = match root.node() {
            NodeRef::Record(record) => record,
            _ => {
                return Err(BindError::NotARecord {
                    type_name: root.type_name(),
                })
            }
        };

        let mut writes = 0;
        for (index, info) in record.fields().iter().enumerate() {
            let Some(tag) = info.parse_tag() else {
                continue;
            };
            if !tag.computed {
                continue;
            }
            let Some(field) = record.field(index) else {
                continue;
            };
            let value = match self.encode_field(field, &tag, tag.key, 1)? {
                Some(value) if !value.is_zero() => value,
                _ => {
                    trace!(key = tag.key, "empty contribution; not written");
                    continue;
                }
            };
            if tag.key == self.config.identity_key {
                store.set_id(&value.to_string());
            } else {
                store.write(tag.key, value)?;
            }
            writes += 1;
        }
        Ok(writes)
    }

    /// Dynamic form of `node` inside a computed context. `None` means the
    /// node contributes nothing.
    pub(crate) fn encode_node(
        &self,
        node: &dyn Bind,
        path: &str,
        is_sub: bool,
        depth: usize,
    ) -> BindResult<Option<Value>> {
        if depth > self.config.max_depth {
            return Err(BindError::DepthExceeded {
                path: path.to_string(),
                limit: self.config.max_depth,
            });
        }
        let shape = node.node();
        if is_sub && !matches!(shape, NodeRef::Record(_) | NodeRef::Optional(_)) {
            return Err(BindError::SubNotRecord {
                path: path.to_string(),
                type_name: node.type_name(),
            });
        }
        match shape {
            NodeRef::Record(record) => {
                if node.is_zero() {
                    return Ok(None);
                }
                self.encode_record(record, path, is_sub, depth).map(Some)
            }
            NodeRef::Sequence(seq) => {
                let mut items = Vec::with_capacity(seq.len());
                for (i, element) in seq.elements().enumerate() {
                    let encoded = self.encode_node(element, &element_path(path, i), false, depth + 1)?;
                    items.push(encoded.unwrap_or(Value::Null));
                }
                Ok(Some(Value::List(items)))
            }
            NodeRef::Map(map) => {
                if map.len() == 0 {
                    return Ok(None);
                }
                Ok(Some(Value::Map(map.entries(path)?)))
            }
            NodeRef::Optional(Some(inner)) => self.encode_node(inner, path, is_sub, depth),
            NodeRef::Optional(None) => Ok(None),
            NodeRef::Scalar(scalar) => scalar
                .to_value()
                .map(Some)
                .map_err(|source| BindError::Coercion {
                    path: path.to_string(),
                    source,
                }),
        }
    }

    fn encode_record(
        &self,
        record: &dyn Record,
        path: &str,
        is_sub: bool,
        depth: usize,
    ) -> BindResult<Value> {
        let mut entries = BTreeMap::new();
        for (index, info) in record.fields().iter().enumerate() {
            let Some(tag) = info.parse_tag() else {
                continue;
            };
            let Some(field) = record.field(index) else {
                continue;
            };
            let child_path = field_path(path, tag.key, is_sub, &SUB_BLOCK)?;
            if let Some(value) = self.encode_field(field, &tag, &child_path, depth + 1)? {
                entries.insert(tag.key.to_string(), value);
            }
        }
        Ok(Value::Map(entries))
    }

    /// Encode one field, wrapping `sub` blocks in a one-element list.
    fn encode_field(
        &self,
        field: &dyn Bind,
        tag: &FieldTag<'_>,
        path: &str,
        depth: usize,
    ) -> BindResult<Option<Value>> {
        let encoded = self.encode_node(field, path, tag.sub, depth)?;
        if !tag.sub {
            return Ok(encoded);
        }
        Ok(encoded
            .filter(|value| !value.is_zero())
            .map(|value| Value::List(vec![value])))
    }
}

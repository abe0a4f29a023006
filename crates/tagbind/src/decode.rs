//! Tree-from-store decoding.
//!
//! The decoder walks the typed tree, probes the store at the path of every
//! described field and assigns what it finds. Fields with nothing behind
//! their path are left untouched. Composite fields are replaced, never
//! merged: sequences, maps and optionals are rebuilt from the store value.

use tagbind_store::AttributeStore;
use tagbind_types::{MemberHash, Value};
use tracing::trace;

use crate::coerce::coerce;
use crate::config::BindConfig;
use crate::error::{BindError, BindResult};
use crate::node::{Bind, NodeMut, Record, SequenceMut};
use crate::path::{element_path, field_path, member_path};

/// A single decode pass over one typed tree.
pub(crate) struct Decoder<'a, S: ?Sized> {
    store: &'a S,
    config: &'a BindConfig,
}

impl<'a, S: AttributeStore + ?Sized> Decoder<'a, S> {
    pub(crate) fn new(store: &'a S, config: &'a BindConfig) -> Self {
        Self { store, config }
    }

    /// Decode the top-level record.
    pub(crate) fn decode_root(&self, root: &mut dyn Bind) -> BindResult<()> {
        let type_name = root.type_name();
        match root.node_mut() {
            NodeMut::Record(record) => self.decode_record(record, "", &Value::Null, false, 0),
            _ => Err(BindError::NotARecord { type_name }),
        }
    }

    fn decode_node(
        &self,
        node: &mut dyn Bind,
        path: &str,
        value: &Value,
        is_sub: bool,
        depth: usize,
    ) -> BindResult<()> {
        if depth > self.config.max_depth {
            return Err(BindError::DepthExceeded {
                path: path.to_string(),
                limit: self.config.max_depth,
            });
        }
        // Null elements inside lists carry nothing to assign.
        if value.is_null() {
            return Ok(());
        }
        let type_name = node.type_name();
        let shape = node.node_mut();
        if is_sub && !matches!(shape, NodeMut::Record(_) | NodeMut::Optional(_)) {
            return Err(BindError::SubNotRecord {
                path: path.to_string(),
                type_name,
            });
        }
        match shape {
            NodeMut::Record(record) => self.decode_record(record, path, value, is_sub, depth),
            NodeMut::Sequence(seq) => self.decode_sequence(seq, path, value, depth),
            NodeMut::Map(map) => match value {
                Value::Map(entries) => map.rebuild(path, entries),
                other => Err(BindError::shape(path, "map", other.kind())),
            },
            NodeMut::Optional(opt) => {
                self.decode_node(opt.insert_default(), path, value, is_sub, depth)
            }
            NodeMut::Scalar(slot) => {
                let coerced = coerce(slot.scalar_kind(), value.clone()).map_err(|source| {
                    BindError::Coercion {
                        path: path.to_string(),
                        source,
                    }
                })?;
                slot.assign(coerced).map_err(|source| BindError::Coercion {
                    path: path.to_string(),
                    source,
                })
            }
        }
    }

    fn decode_record(
        &self,
        record: &mut dyn Record,
        path: &str,
        value: &Value,
        is_sub: bool,
        depth: usize,
    ) -> BindResult<()> {
        if !path.is_empty() {
            match value {
                Value::List(_) | Value::Set(_) if is_sub && value.is_zero() => {
                    trace!(path, "empty sub block; nothing to decode");
                    return Ok(());
                }
                Value::List(_) | Value::Set(_) if is_sub => {}
                Value::Map(_) if !is_sub => {}
                other => {
                    let expected = if is_sub { "list or set" } else { "map" };
                    return Err(BindError::shape(path, expected, other.kind()));
                }
            }
        }

        for (index, info) in record.fields().iter().enumerate() {
            let Some(tag) = info.parse_tag() else {
                continue;
            };
            let child_path = field_path(path, tag.key, is_sub, value)?;
            let child_value = match self.store.probe(&child_path) {
                Some(found) => found,
                None if child_path == self.config.identity_key => Value::String(self.store.id()),
                None => {
                    trace!(path = %child_path, "absent in store; skipped");
                    continue;
                }
            };
            trace!(path = %child_path, kind = %child_value.kind(), "field resolved");
            let Some(field) = record.field_mut(index) else {
                continue;
            };
            self.decode_node(field, &child_path, &child_value, tag.sub, depth + 1)?;
        }
        Ok(())
    }

    fn decode_sequence(
        &self,
        seq: &mut dyn SequenceMut,
        path: &str,
        value: &Value,
        depth: usize,
    ) -> BindResult<()> {
        match value {
            Value::List(items) => seq.rebuild(items.len(), &mut |i: usize, element: &mut dyn Bind| {
                self.decode_node(element, &element_path(path, i), &items[i], false, depth + 1)
            }),
            Value::Set(set) => {
                let members: Vec<(MemberHash, &Value)> = set.entries().collect();
                seq.rebuild(members.len(), &mut |i: usize, element: &mut dyn Bind| {
                    let (hash, member) = members[i];
                    self.decode_node(element, &member_path(path, hash), member, false, depth + 1)
                })
            }
            other => Err(BindError::shape(path, "list or set", other.kind())),
        }
    }
}

//! Path construction for store lookups.
//!
//! Paths join key segments with `.`. List elements are addressed by their
//! position and set members by the decimal form of the hash the store
//! assigns them.
//!
//! A field below a singleton-wrapped (`sub`) parent is addressed through the
//! parent's first member only: `parent.0.key` for a list, `parent.<hash>.key`
//! for a set. Any further members of a `sub` block are never visited.

use tagbind_types::{MemberHash, Value};

use crate::error::{BindError, BindResult};

/// Build the path of a record field.
///
/// `parent_sub` tells whether the parent record was reached through a `sub`
/// field, in which case `parent_value` must be the list or set the store
/// holds at `parent`.
pub fn field_path(
    parent: &str,
    key: &str,
    parent_sub: bool,
    parent_value: &Value,
) -> BindResult<String> {
    if parent.is_empty() {
        return Ok(key.to_string());
    }
    if !parent_sub {
        return Ok(format!("{parent}.{key}"));
    }
    match parent_value {
        Value::Set(set) => match set.members().next() {
            Some(first) => Ok(format!("{parent}.{}.{key}", set.hash_of(first))),
            None => Err(BindError::shape(
                parent,
                "a sub block with at least one member",
                parent_value.kind(),
            )),
        },
        Value::List(_) => Ok(format!("{parent}.0.{key}")),
        other => Err(BindError::shape(parent, "list or set for a sub block", other.kind())),
    }
}

/// Path of the `index`-th element of a list.
pub fn element_path(parent: &str, index: usize) -> String {
    format!("{parent}.{index}")
}

/// Path of a set member.
pub fn member_path(parent: &str, hash: MemberHash) -> String {
    format!("{parent}.{hash}")
}

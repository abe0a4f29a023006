use tagbind_types::Value;

use crate::error::StoreResult;

/// Path-addressed attribute store.
///
/// All implementations must satisfy these invariants:
/// - `probe` never mutates; a path with nothing behind it is `None`, not an
///   error.
/// - `write` addresses top-level attributes only; nested structure travels
///   inside the written [`Value`].
/// - Sets handed out by `probe` carry the hash function used to build their
///   member paths, so `hash_of(member)` of a returned member resolves back to
///   that member.
/// - The identity slot is separate from the attribute namespace.
pub trait AttributeStore {
    /// Read the value at a dotted path.
    ///
    /// Returns `None` when no value is present.
    fn probe(&self, path: &str) -> Option<Value>;

    /// Write a top-level attribute, replacing any previous value.
    fn write(&mut self, key: &str, value: Value) -> StoreResult<()>;

    /// Read the identity slot.
    fn id(&self) -> String;

    /// Replace the identity slot.
    fn set_id(&mut self, id: &str);
}

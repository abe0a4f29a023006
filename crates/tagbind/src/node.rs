//! Shape description of bindable types.
//!
//! Every bindable type implements [`Bind`], which exposes the value as one of
//! a closed set of shapes: record, sequence, map, optional or scalar. The
//! decoder and encoder dispatch on [`NodeRef`] / [`NodeMut`] instead of
//! inspecting types at runtime.
//!
//! Records are usually described with `#[derive(Bind)]`:
//!
//! ```
//! use tagbind::{Bind, NodeRef, Record};
//!
//! #[derive(Bind, Default)]
//! struct Listener {
//!     #[bind("port,computed")]
//!     port: u16,
//!     // Not described, never touched.
//!     cache: Vec<u8>,
//! }
//!
//! let listener = Listener::default();
//! let NodeRef::Record(record) = listener.node() else { unreachable!() };
//! assert_eq!(record.fields().len(), 1);
//! assert_eq!(record.fields()[0].tag, "port,computed");
//! ```

use std::collections::BTreeMap;

use tagbind_types::Value;

use crate::coerce::ScalarKind;
use crate::error::{BindResult, CoercionError};
use crate::tag::FieldTag;

/// A type that can be decoded from and encoded to an attribute store.
pub trait Bind {
    /// Read-only shape view.
    fn node(&self) -> NodeRef<'_>;

    /// Mutable shape view.
    fn node_mut(&mut self) -> NodeMut<'_>;

    /// Name of the concrete type, for error messages.
    fn type_name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }

    /// Returns `true` if the value is the zero value of its shape.
    ///
    /// A record is zero when all its described fields are zero, sequences and
    /// maps when empty, optionals when absent, scalars when their value is.
    fn is_zero(&self) -> bool {
        self.node().is_zero()
    }
}

/// Read-only view of a value's shape.
pub enum NodeRef<'a> {
    Record(&'a dyn Record),
    Sequence(&'a dyn SequenceRef),
    Map(&'a dyn MapRef),
    Optional(Option<&'a dyn Bind>),
    Scalar(&'a dyn ScalarRef),
}

impl NodeRef<'_> {
    pub fn is_zero(&self) -> bool {
        match self {
            Self::Record(record) => record.fields().iter().enumerate().all(|(i, info)| {
                info.parse_tag().is_none() || record.field(i).map_or(true, |f| f.is_zero())
            }),
            Self::Sequence(seq) => seq.len() == 0,
            Self::Map(map) => map.len() == 0,
            Self::Optional(inner) => inner.is_none(),
            Self::Scalar(scalar) => scalar.to_value().map_or(false, |v| v.is_zero()),
        }
    }
}

/// Mutable view of a value's shape.
pub enum NodeMut<'a> {
    Record(&'a mut dyn Record),
    Sequence(&'a mut dyn SequenceMut),
    Map(&'a mut dyn MapMut),
    Optional(&'a mut dyn OptionalMut),
    Scalar(&'a mut dyn ScalarSlot),
}

/// Static description of one record field.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FieldInfo {
    /// Rust field name.
    pub name: &'static str,
    /// Raw annotation, e.g. `"block,computed,sub"`.
    pub tag: &'static str,
}

impl FieldInfo {
    pub const fn new(name: &'static str, tag: &'static str) -> Self {
        Self { name, tag }
    }

    /// Parse the annotation. `None` means the field is untagged.
    pub fn parse_tag(&self) -> Option<FieldTag<'static>> {
        FieldTag::parse(self.tag)
    }
}

/// A named aggregate of described fields.
///
/// `field(i)` and `field_mut(i)` address the same field as `fields()[i]`.
pub trait Record {
    fn record_name(&self) -> &'static str;

    fn fields(&self) -> &'static [FieldInfo];

    fn field(&self, index: usize) -> Option<&dyn Bind>;

    fn field_mut(&mut self, index: usize) -> Option<&mut dyn Bind>;
}

/// Read access to an ordered sequence or unordered collection.
pub trait SequenceRef {
    fn len(&self) -> usize;

    fn elements(&self) -> Box<dyn Iterator<Item = &dyn Bind> + '_>;
}

/// Callback that populates one freshly allocated element.
pub type FillElement<'f> = dyn FnMut(usize, &mut dyn Bind) -> BindResult<()> + 'f;

/// Write access to a sequence or collection.
pub trait SequenceMut {
    /// Replace the contents with `len` default elements, each populated by
    /// `fill`. The previous contents are kept if any `fill` fails.
    fn rebuild(&mut self, len: usize, fill: &mut FillElement<'_>) -> BindResult<()>;
}

/// Read access to a string-keyed map.
pub trait MapRef {
    fn len(&self) -> usize;

    /// Entries in their dynamic form.
    ///
    /// `path` locates the map for error messages.
    fn entries(&self, path: &str) -> BindResult<BTreeMap<String, Value>>;
}

/// Write access to a string-keyed map.
pub trait MapMut {
    /// Replace the contents with a verbatim copy of `entries`.
    ///
    /// `path` locates the map for error messages.
    fn rebuild(&mut self, path: &str, entries: &BTreeMap<String, Value>) -> BindResult<()>;
}

/// Write access to an optional reference.
pub trait OptionalMut {
    /// Replace the referenced value with a fresh default and return it.
    fn insert_default(&mut self) -> &mut dyn Bind;
}

/// Read access to a scalar.
pub trait ScalarRef {
    /// Dynamic form of the scalar.
    ///
    /// Fails when the value has no exact [`Value`] form, e.g. a `u64` above
    /// `i64::MAX`.
    fn to_value(&self) -> Result<Value, CoercionError>;
}

impl<T: MapValue> ScalarRef for T {
    fn to_value(&self) -> Result<Value, CoercionError> {
        MapValue::to_value(self)
    }
}

/// Write access to a scalar.
pub trait ScalarSlot {
    fn scalar_kind(&self) -> ScalarKind;

    /// Assign a value already coerced to [`ScalarSlot::scalar_kind`].
    ///
    /// Fails when the value does not fit the concrete type, e.g. `300` into
    /// a `u8`.
    fn assign(&mut self, value: Value) -> Result<(), CoercionError>;
}

/// A type usable as the value of a bound map.
///
/// Map values are copied verbatim, so conversion is exact: a value of a
/// different kind does not convert.
pub trait MapValue: Sized {
    fn from_value(value: &Value) -> Option<Self>;

    fn to_value(&self) -> Result<Value, CoercionError>;
}

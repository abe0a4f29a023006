//! [`Bind`] implementations for standard library types.

use std::collections::{BTreeMap, BTreeSet, HashMap, VecDeque};

use tagbind_types::{Value, ValueKind};

use crate::coerce::ScalarKind;
use crate::error::{BindError, BindResult, CoercionError};
use crate::node::{
    Bind, FillElement, MapMut, MapRef, MapValue, NodeMut, NodeRef, OptionalMut, ScalarSlot,
    SequenceMut, SequenceRef,
};

// ---------------------------------------------------------------------------
// Scalars
// ---------------------------------------------------------------------------

macro_rules! scalar_bind {
    ($($t:ty),* $(,)?) => {
        $(
            impl Bind for $t {
                fn node(&self) -> NodeRef<'_> {
                    NodeRef::Scalar(self)
                }

                fn node_mut(&mut self) -> NodeMut<'_> {
                    NodeMut::Scalar(self)
                }
            }
        )*
    };
}

macro_rules! int_scalar {
    ($($t:ty),* $(,)?) => {
        $(
            impl ScalarSlot for $t {
                fn scalar_kind(&self) -> ScalarKind {
                    ScalarKind::Int
                }

                fn assign(&mut self, value: Value) -> Result<(), CoercionError> {
                    let i = match &value {
                        Value::Int(i) => *i,
                        _ => return Err(CoercionError::new(&value, ScalarKind::Int, "not an integer")),
                    };
                    *self = <$t>::try_from(i).map_err(|_| {
                        CoercionError::new(&value, ScalarKind::Int, concat!("out of range for ", stringify!($t)))
                    })?;
                    Ok(())
                }
            }

            impl MapValue for $t {
                fn from_value(value: &Value) -> Option<Self> {
                    value.as_i64().and_then(|i| <$t>::try_from(i).ok())
                }

                fn to_value(&self) -> Result<Value, CoercionError> {
                    i64::try_from(*self).map(Value::Int).map_err(|_| CoercionError {
                        from: ValueKind::Int,
                        to: ScalarKind::Int,
                        value: self.to_string(),
                        reason: concat!(stringify!($t), " value out of range for store integers").into(),
                    })
                }
            }

            scalar_bind!($t);
        )*
    };
}

int_scalar!(i8, i16, i32, i64, isize, u8, u16, u32, u64, usize);

macro_rules! float_scalar {
    ($($t:ty),* $(,)?) => {
        $(
            impl ScalarSlot for $t {
                fn scalar_kind(&self) -> ScalarKind {
                    ScalarKind::Float
                }

                fn assign(&mut self, value: Value) -> Result<(), CoercionError> {
                    match value {
                        Value::Float(x) => {
                            *self = x as $t;
                            Ok(())
                        }
                        other => Err(CoercionError::new(&other, ScalarKind::Float, "not a float")),
                    }
                }
            }

            impl MapValue for $t {
                fn from_value(value: &Value) -> Option<Self> {
                    value.as_f64().map(|x| x as $t)
                }

                fn to_value(&self) -> Result<Value, CoercionError> {
                    Ok(Value::Float(f64::from(*self)))
                }
            }

            scalar_bind!($t);
        )*
    };
}

float_scalar!(f32, f64);

impl ScalarSlot for bool {
    fn scalar_kind(&self) -> ScalarKind {
        ScalarKind::Bool
    }

    fn assign(&mut self, value: Value) -> Result<(), CoercionError> {
        match value {
            Value::Bool(b) => {
                *self = b;
                Ok(())
            }
            other => Err(CoercionError::new(&other, ScalarKind::Bool, "not a bool")),
        }
    }
}

impl MapValue for bool {
    fn from_value(value: &Value) -> Option<Self> {
        value.as_bool()
    }

    fn to_value(&self) -> Result<Value, CoercionError> {
        Ok(Value::Bool(*self))
    }
}

impl ScalarSlot for String {
    fn scalar_kind(&self) -> ScalarKind {
        ScalarKind::String
    }

    fn assign(&mut self, value: Value) -> Result<(), CoercionError> {
        match value {
            Value::String(s) => {
                *self = s;
                Ok(())
            }
            other => Err(CoercionError::new(&other, ScalarKind::String, "not a string")),
        }
    }
}

impl MapValue for String {
    fn from_value(value: &Value) -> Option<Self> {
        value.as_str().map(str::to_string)
    }

    fn to_value(&self) -> Result<Value, CoercionError> {
        Ok(Value::String(self.clone()))
    }
}

scalar_bind!(bool, String);

/// A dynamic field takes whatever the store holds.
impl ScalarSlot for Value {
    fn scalar_kind(&self) -> ScalarKind {
        ScalarKind::Dynamic
    }

    fn assign(&mut self, value: Value) -> Result<(), CoercionError> {
        *self = value;
        Ok(())
    }
}

impl MapValue for Value {
    fn from_value(value: &Value) -> Option<Self> {
        Some(value.clone())
    }

    fn to_value(&self) -> Result<Value, CoercionError> {
        Ok(self.clone())
    }
}

scalar_bind!(Value);

// ---------------------------------------------------------------------------
// Sequences
// ---------------------------------------------------------------------------

macro_rules! sequence_bind {
    ($($seq:ident<T> where $($bound:path),*;)*) => {
        $(
            impl<T: Bind + Default $(+ $bound)*> Bind for $seq<T> {
                fn node(&self) -> NodeRef<'_> {
                    NodeRef::Sequence(self)
                }

                fn node_mut(&mut self) -> NodeMut<'_> {
                    NodeMut::Sequence(self)
                }
            }

            impl<T: Bind $(+ $bound)*> SequenceRef for $seq<T> {
                fn len(&self) -> usize {
                    $seq::len(self)
                }

                fn elements(&self) -> Box<dyn Iterator<Item = &dyn Bind> + '_> {
                    Box::new(self.iter().map(|e| e as &dyn Bind))
                }
            }

            impl<T: Bind + Default $(+ $bound)*> SequenceMut for $seq<T> {
                fn rebuild(&mut self, len: usize, fill: &mut FillElement<'_>) -> BindResult<()> {
                    let mut fresh = Vec::with_capacity(len);
                    for i in 0..len {
                        let mut element = T::default();
                        fill(i, &mut element)?;
                        fresh.push(element);
                    }
                    *self = fresh.into_iter().collect();
                    Ok(())
                }
            }
        )*
    };
}

sequence_bind! {
    Vec<T> where;
    VecDeque<T> where;
    BTreeSet<T> where Ord;
}

// ---------------------------------------------------------------------------
// Maps
// ---------------------------------------------------------------------------

fn convert_entries<V, C>(path: &str, entries: &BTreeMap<String, Value>) -> BindResult<C>
where
    V: MapValue,
    C: FromIterator<(String, V)>,
{
    entries
        .iter()
        .map(|(key, value)| {
            V::from_value(value)
                .map(|v| (key.clone(), v))
                .ok_or_else(|| {
                    BindError::shape(
                        &format!("{path}.{key}"),
                        format!("map value of type {}", std::any::type_name::<V>()),
                        value.kind(),
                    )
                })
        })
        .collect()
}

macro_rules! map_bind {
    ($($map:ident),*) => {
        $(
            impl<V: MapValue> Bind for $map<String, V> {
                fn node(&self) -> NodeRef<'_> {
                    NodeRef::Map(self)
                }

                fn node_mut(&mut self) -> NodeMut<'_> {
                    NodeMut::Map(self)
                }
            }

            impl<V: MapValue> MapRef for $map<String, V> {
                fn len(&self) -> usize {
                    $map::len(self)
                }

                fn entries(&self, path: &str) -> BindResult<BTreeMap<String, Value>> {
                    self.iter()
                        .map(|(k, v)| {
                            MapValue::to_value(v)
                                .map(|value| (k.clone(), value))
                                .map_err(|source| BindError::Coercion {
                                    path: format!("{path}.{k}"),
                                    source,
                                })
                        })
                        .collect()
                }
            }

            impl<V: MapValue> MapMut for $map<String, V> {
                fn rebuild(&mut self, path: &str, entries: &BTreeMap<String, Value>) -> BindResult<()> {
                    *self = convert_entries(path, entries)?;
                    Ok(())
                }
            }
        )*
    };
}

map_bind!(BTreeMap, HashMap);

// ---------------------------------------------------------------------------
// Optional and boxed values
// ---------------------------------------------------------------------------

impl<T: Bind + Default> Bind for Option<T> {
    fn node(&self) -> NodeRef<'_> {
        NodeRef::Optional(self.as_ref().map(|v| v as &dyn Bind))
    }

    fn node_mut(&mut self) -> NodeMut<'_> {
        NodeMut::Optional(self)
    }
}

impl<T: Bind + Default> OptionalMut for Option<T> {
    fn insert_default(&mut self) -> &mut dyn Bind {
        self.insert(T::default())
    }
}

/// Boxes are transparent.
impl<T: Bind + ?Sized> Bind for Box<T> {
    fn node(&self) -> NodeRef<'_> {
        (**self).node()
    }

    fn node_mut(&mut self) -> NodeMut<'_> {
        (**self).node_mut()
    }

    fn type_name(&self) -> &'static str {
        (**self).type_name()
    }

    fn is_zero(&self) -> bool {
        (**self).is_zero()
    }
}

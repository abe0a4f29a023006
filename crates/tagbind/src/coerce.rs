//! Scalar coercion from store values to declared field kinds.
//!
//! The table is narrow:
//!
//! | destination | source kind differs                               |
//! |-------------|---------------------------------------------------|
//! | `Int`       | parse the source's string form as an integer      |
//! | `String`    | take the source's string form                     |
//! | anything    | [`CoercionError`]                                 |
//!
//! A `Dynamic` destination accepts every value as-is.

use std::fmt;

use tagbind_types::{Value, ValueKind};

use crate::error::CoercionError;

/// The scalar kind a destination field declares.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ScalarKind {
    Bool,
    Int,
    Float,
    String,
    /// Accepts any [`Value`] unchanged.
    Dynamic,
}

impl ScalarKind {
    /// Returns `true` if a value of `kind` can be assigned without conversion.
    pub fn accepts(&self, kind: ValueKind) -> bool {
        match self {
            Self::Bool => kind == ValueKind::Bool,
            Self::Int => kind == ValueKind::Int,
            Self::Float => kind == ValueKind::Float,
            Self::String => kind == ValueKind::String,
            Self::Dynamic => true,
        }
    }
}

impl fmt::Display for ScalarKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool => write!(f, "bool"),
            Self::Int => write!(f, "int"),
            Self::Float => write!(f, "float"),
            Self::String => write!(f, "string"),
            Self::Dynamic => write!(f, "dynamic"),
        }
    }
}

impl CoercionError {
    pub(crate) fn new(src: &Value, to: ScalarKind, reason: impl Into<String>) -> Self {
        Self {
            from: src.kind(),
            to,
            value: src.to_string(),
            reason: reason.into(),
        }
    }
}

/// Convert `src` into a value of kind `dest`.
pub fn coerce(dest: ScalarKind, src: Value) -> Result<Value, CoercionError> {
    if dest.accepts(src.kind()) {
        return Ok(src);
    }
    match dest {
        ScalarKind::Int => {
            let text = src.to_string();
            text.parse::<i64>()
                .map(Value::Int)
                .map_err(|e| CoercionError::new(&src, dest, e.to_string()))
        }
        ScalarKind::String => Ok(Value::String(src.to_string())),
        _ => Err(CoercionError::new(&src, dest, "no conversion rule")),
    }
}

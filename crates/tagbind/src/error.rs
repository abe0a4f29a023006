//! Error types for binding operations.

use tagbind_store::StoreError;
use tagbind_types::ValueKind;

use crate::coerce::ScalarKind;

/// A store value could not be converted into the scalar a field declares.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("cannot convert {from} value {value:?} to {to}: {reason}")]
pub struct CoercionError {
    /// Kind of the offending store value.
    pub from: ValueKind,
    /// Kind the destination field declares.
    pub to: ScalarKind,
    /// String form of the offending value.
    pub value: String,
    pub reason: String,
}

/// Errors that can occur while decoding or encoding a record.
#[derive(Debug, thiserror::Error)]
pub enum BindError {
    /// The top-level value handed to the engine is not a record.
    #[error("only records can be bound at the top level, got {type_name}")]
    NotARecord { type_name: &'static str },

    /// The store holds a value whose shape does not fit the field.
    #[error("unexpected shape at {path:?}: expected {expected}, found {found}")]
    InputShape {
        path: String,
        expected: String,
        found: ValueKind,
    },

    /// A scalar could not be converted, on its way in or out.
    #[error("cannot convert value at {path:?}: {source}")]
    Coercion {
        path: String,
        #[source]
        source: CoercionError,
    },

    /// A `sub` field holds something other than a record or an optional
    /// record.
    #[error("sub field at {path:?} must hold a record, got {type_name}")]
    SubNotRecord {
        path: String,
        type_name: &'static str,
    },

    /// A store write failed; passed through unchanged.
    #[error("store error: {0}")]
    Store(#[from] StoreError),

    /// The typed tree nests deeper than the configured limit.
    #[error("nesting deeper than {limit} levels at {path:?}")]
    DepthExceeded { path: String, limit: usize },
}

impl BindError {
    pub(crate) fn shape(path: &str, expected: impl Into<String>, found: ValueKind) -> Self {
        Self::InputShape {
            path: path.to_string(),
            expected: expected.into(),
            found,
        }
    }
}

/// Convenience alias for binding results.
pub type BindResult<T> = Result<T, BindError>;

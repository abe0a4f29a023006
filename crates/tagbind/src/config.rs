use serde::{Deserialize, Serialize};

/// Configuration for a [`Binder`](crate::Binder).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BindConfig {
    /// Reserved key of the identity slot. Fields with this key are read and
    /// written through the store's identity accessors.
    pub identity_key: String,
    /// Maximum nesting depth of the typed tree before decoding or encoding
    /// fails with [`BindError::DepthExceeded`](crate::BindError::DepthExceeded).
    pub max_depth: usize,
}

impl Default for BindConfig {
    fn default() -> Self {
        Self {
            identity_key: "id".to_string(),
            max_depth: 64,
        }
    }
}

impl BindConfig {
    pub fn with_identity_key(mut self, key: impl Into<String>) -> Self {
        self.identity_key = key.into();
        self
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }
}

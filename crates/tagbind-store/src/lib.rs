//! Attribute store port for tagbind.
//!
//! An attribute store indexes [`Value`]s by dotted, indexed string paths
//! such as `"block.0.name"`. The binding engine never owns storage; it talks
//! to whatever the host supplies through the [`AttributeStore`] trait.
//!
//! # Path convention
//!
//! - Segments are joined with `.`.
//! - A list element is addressed by its decimal position.
//! - A set member is addressed by the decimal form of its hash.
//! - The identity slot is reached through [`AttributeStore::id`] and
//!   [`AttributeStore::set_id`], not through paths.
//!
//! # Backends
//!
//! - [`MemoryStore`] -- `BTreeMap`-based store for tests and embedding

pub mod error;
pub mod memory;
pub mod traits;

// Re-export primary types at crate root for ergonomic imports.
pub use error::{StoreError, StoreResult};
pub use memory::MemoryStore;
pub use traits::AttributeStore;
pub use tagbind_types::Value;

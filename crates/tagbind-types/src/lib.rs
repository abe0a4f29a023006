//! Foundation types for tagbind.
//!
//! This crate provides the dynamic value model shared by the attribute store
//! port and the binding engine. Every other tagbind crate depends on
//! `tagbind-types`.
//!
//! # Key Types
//!
//! - [`Value`] -- Dynamically-typed store value (scalar, list, set or map)
//! - [`ValueKind`] -- The variant tag of a [`Value`]
//! - [`ValueSet`] -- Unordered collection whose members are addressed by hash
//! - [`SetHashFn`] -- Hash function a store supplies for its sets

pub mod set;
pub mod value;

pub use set::{crc32_hash, MemberHash, SetHashFn, ValueSet};
pub use value::{Value, ValueKind};

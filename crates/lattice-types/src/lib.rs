//! Core types for the Lattice component configuration engine.
//!
//! This crate provides the foundational vocabulary shared by the engine
//! and its frontends:
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  lattice-types     : ids, values, type specs, Conf  ◄── HERE │
//! │  lattice-component : registry, instance tree, resolver       │
//! │  lattice-cli       : override parsing, console prompting     │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Contents
//!
//! - [`ClassId`] / [`InstanceId`] — handles into the class registry and
//!   the instance arena
//! - [`ConfigValue`] — the dynamic value type held by component fields
//! - [`TypeSpec`] — declared field types, checked structurally
//! - [`Conf`] — the flat, dotted-key configuration mapping consumed by
//!   the resolver
//! - [`ErrorCode`] — unified error-code interface implemented by every
//!   error enum in the workspace
//! - [`key`] — dotted-path and name-normalization helpers

mod conf;
mod error;
mod id;
pub mod key;
mod typespec;
mod value;

pub use conf::Conf;
pub use error::{assert_error_code, assert_error_codes, ErrorCode};
pub use id::{ClassId, InstanceId};
pub use typespec::TypeSpec;
pub use value::{ConfigValue, ConvertError};

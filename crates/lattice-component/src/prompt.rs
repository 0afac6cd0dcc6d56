//! Interactive value sources for configuration.
//!
//! When a [`Prompt`] is supplied through
//! [`ConfigureOptions`](crate::resolve::ConfigureOptions), fields that
//! would otherwise fail configuration are asked for instead: plain
//! fields get a value, component fields a choice among the eligible
//! classes. The console implementation lives in the CLI crate; tests
//! use the scripted prompt from [`crate::testing`].

use crate::error::ComponentError;
use lattice_types::{ClassId, ConfigValue};

/// Supplies values for fields the configuration left unresolved.
pub trait Prompt {
    /// Ask for a value for `field` of declared type `ty`.
    fn value(&mut self, field: &str, ty: &str) -> Result<ConfigValue, ComponentError>;

    /// Ask which of `candidates` should fill the component slot
    /// `field`. Candidates are (class id, class name), sorted by name
    /// and never empty.
    fn subclass(
        &mut self,
        field: &str,
        candidates: &[(ClassId, String)],
    ) -> Result<ClassId, ComponentError>;
}

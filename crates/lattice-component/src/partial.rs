//! Classes pre-bound with field overrides.
//!
//! A [`PartialComponent`] pairs a component class with keyword
//! overrides and is used wherever a class is: as the default of a
//! [`ComponentField`](crate::field::ComponentField), or nested inside
//! another partial. Instantiating it creates a fresh instance and seeds
//! the overrides as instance values before configuration; everything an
//! override does not name resolves through the usual scope rules.
//!
//! Overrides are lazy where it matters: thunks are evaluated and
//! classes/partials instantiated once per instantiation, not at
//! definition time.

use crate::error::{ComponentError, DefineError};
use crate::field::ThunkFn;
use crate::registry::ComponentRegistry;
use crate::tree::ComponentTree;
use lattice_types::{ClassId, Conf, ConfigValue, InstanceId};
use std::fmt;
use std::sync::Arc;

/// One keyword override.
#[derive(Clone)]
pub enum PartialArg {
    /// A plain value, stored as-is.
    Value(ConfigValue),
    /// Evaluated once per instantiation.
    Thunk(Arc<ThunkFn>),
    /// A component class to instantiate into the field.
    Class(ClassId),
    /// A nested partial.
    Partial(PartialComponent),
}

impl fmt::Debug for PartialArg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Value(v) => write!(f, "Value({v})"),
            Self::Thunk(_) => write!(f, "Thunk(..)"),
            Self::Class(id) => write!(f, "Class({id})"),
            Self::Partial(p) => write!(f, "Partial({p:?})"),
        }
    }
}

impl From<ConfigValue> for PartialArg {
    fn from(v: ConfigValue) -> Self {
        Self::Value(v)
    }
}

macro_rules! partial_arg_from {
    ($($ty:ty),+ $(,)?) => {$(
        impl From<$ty> for PartialArg {
            fn from(v: $ty) -> Self {
                Self::Value(ConfigValue::from(v))
            }
        }
    )+};
}

partial_arg_from!(bool, i64, i32, f64, &str, String);

/// A component class with pre-bound field overrides.
#[derive(Debug, Clone)]
pub struct PartialComponent {
    class: ClassId,
    overrides: Vec<(String, PartialArg)>,
}

impl PartialComponent {
    /// Start building a partial over `class`.
    #[must_use]
    pub fn builder(class: ClassId) -> PartialBuilder {
        PartialBuilder {
            class,
            overrides: Vec::new(),
        }
    }

    #[must_use]
    pub fn class(&self) -> ClassId {
        self.class
    }

    /// Instantiate: a fresh instance with the overrides seeded as
    /// instance values, ready to be configured.
    pub fn instantiate(&self, tree: &mut ComponentTree) -> Result<InstanceId, ComponentError> {
        let id = tree.instantiate(self.class, Conf::new())?;
        for (field, arg) in &self.overrides {
            let value = match arg {
                PartialArg::Value(v) => v.clone(),
                PartialArg::Thunk(f) => f(),
                PartialArg::Class(cls) => {
                    ConfigValue::Instance(tree.instantiate(*cls, Conf::new())?)
                }
                PartialArg::Partial(p) => ConfigValue::Instance(p.instantiate(tree)?),
            };
            tree.set(id, field, value)?;
        }
        Ok(id)
    }
}

/// Builder for a [`PartialComponent`]; overrides are validated against
/// the class's fields in [`finish`](Self::finish).
#[derive(Debug)]
pub struct PartialBuilder {
    class: ClassId,
    overrides: Vec<(String, PartialArg)>,
}

impl PartialBuilder {
    /// Bind `field` to an override. Accepts plain values through `Into`,
    /// or an explicit [`PartialArg`] for thunks, classes and nested
    /// partials.
    #[must_use]
    pub fn arg(mut self, field: &str, arg: impl Into<PartialArg>) -> Self {
        self.overrides.push((field.to_owned(), arg.into()));
        self
    }

    /// Bind `field` to a lazily evaluated thunk.
    #[must_use]
    pub fn thunk(
        self,
        field: &str,
        f: impl Fn() -> ConfigValue + Send + Sync + 'static,
    ) -> Self {
        self.arg(field, PartialArg::Thunk(Arc::new(f)))
    }

    /// Bind a component field to a class.
    #[must_use]
    pub fn class(self, field: &str, cls: ClassId) -> Self {
        self.arg(field, PartialArg::Class(cls))
    }

    /// Bind a component field to a nested partial.
    #[must_use]
    pub fn partial(self, field: &str, p: PartialComponent) -> Self {
        self.arg(field, PartialArg::Partial(p))
    }

    /// Validate the overrides against the class definition.
    pub fn finish(self, registry: &ComponentRegistry) -> Result<PartialComponent, DefineError> {
        let def = registry.get(self.class);
        if self.overrides.is_empty() {
            return Err(DefineError::PartialNeedsKwargs(def.name().to_owned()));
        }
        for (field, arg) in &self.overrides {
            if def.field(field).is_none() {
                return Err(DefineError::PartialUnknownField {
                    class: def.name().to_owned(),
                    field: field.clone(),
                });
            }
            if matches!(arg, PartialArg::Value(ConfigValue::Instance(_))) {
                return Err(DefineError::PartialInstanceValue {
                    class: def.name().to_owned(),
                    field: field.clone(),
                });
            }
        }
        Ok(PartialComponent {
            class: self.class,
            overrides: self.overrides,
        })
    }
}

//! Field descriptors.
//!
//! A [`Field`] declares a scalar/opaque-typed slot on a component class; a
//! [`ComponentField`] declares a slot whose value is itself a configured
//! sub-component (or a value built by a factory). Descriptors are handed
//! to a `ClassBuilder`, which binds them to their host class and field
//! name at registration time; a descriptor binds to exactly one host.
//!
//! Defaults come in three shapes:
//!
//! - a literal value, type-checked against the declared type at
//!   registration time;
//! - a zero-argument thunk, evaluated lazily and memoized per instance;
//! - an instance-aware closure receiving the tree and the instance,
//!   for defaults derived from other fields.
//!
//! `allow_missing` marks a field that may legitimately never have a
//! value; it is mutually exclusive with having a default.

use crate::error::ComponentError;
use crate::partial::PartialComponent;
use crate::tree::ComponentTree;
use lattice_types::{ClassId, ConfigValue, InstanceId, TypeSpec};
use std::fmt;
use std::sync::Arc;

/// Zero-argument lazy default.
pub type ThunkFn = dyn Fn() -> ConfigValue + Send + Sync;

/// Instance-aware lazy default.
pub type InstanceDefaultFn =
    dyn Fn(&mut ComponentTree, InstanceId) -> Result<ConfigValue, ComponentError> + Send + Sync;

/// How a field obtains its default value.
#[derive(Clone)]
pub(crate) enum FieldDefault {
    /// A literal, checked against the declared type at registration.
    Value(ConfigValue),
    /// Zero-argument thunk, invoked with no arguments.
    Thunk(Arc<ThunkFn>),
    /// One-argument form, invoked with the host instance.
    Instance(Arc<InstanceDefaultFn>),
    /// A component class to instantiate (no arguments are forwarded;
    /// the child picks up missing values from its parent's scope).
    Class(ClassId),
    /// A class pre-bound with keyword overrides.
    Partial(PartialComponent),
}

impl fmt::Debug for FieldDefault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Value(v) => write!(f, "Value({v})"),
            Self::Thunk(_) => write!(f, "Thunk(..)"),
            Self::Instance(_) => write!(f, "Instance(..)"),
            Self::Class(id) => write!(f, "Class({id})"),
            Self::Partial(p) => write!(f, "Partial({:?})", p),
        }
    }
}

/// Whether a slot holds plain values or sub-components.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum FieldKind {
    Value,
    Component,
}

/// A scalar/opaque-typed configurable slot.
///
/// # Example
///
/// ```ignore
/// registry
///     .define("A")
///     .field("x", Field::new(TypeSpec::Int))
///     .field("y", Field::with(TypeSpec::Str, "foo"))
///     .field("z", Field::computed(TypeSpec::Float, || 3.14.into()))
///     .register()?;
/// ```
#[derive(Debug)]
pub struct Field {
    pub(crate) ty: TypeSpec,
    pub(crate) default: Option<FieldDefault>,
    pub(crate) allow_missing: bool,
}

impl Field {
    /// A required field with no default.
    #[must_use]
    pub fn new(ty: TypeSpec) -> Self {
        Self {
            ty,
            default: None,
            allow_missing: false,
        }
    }

    /// A field with a literal default value.
    #[must_use]
    pub fn with(ty: TypeSpec, default: impl Into<ConfigValue>) -> Self {
        Self {
            ty,
            default: Some(FieldDefault::Value(default.into())),
            allow_missing: false,
        }
    }

    /// A field whose default is computed lazily by a zero-argument
    /// thunk. The result is memoized per instance.
    #[must_use]
    pub fn computed(ty: TypeSpec, thunk: impl Fn() -> ConfigValue + Send + Sync + 'static) -> Self {
        Self {
            ty,
            default: Some(FieldDefault::Thunk(Arc::new(thunk))),
            allow_missing: false,
        }
    }

    /// A field whose default is derived from the host instance, e.g.
    /// from other fields.
    #[must_use]
    pub fn derived(
        ty: TypeSpec,
        f: impl Fn(&mut ComponentTree, InstanceId) -> Result<ConfigValue, ComponentError>
            + Send
            + Sync
            + 'static,
    ) -> Self {
        Self {
            ty,
            default: Some(FieldDefault::Instance(Arc::new(f))),
            allow_missing: false,
        }
    }

    /// Marks the field as legitimately optional. Mutually exclusive
    /// with a default; validated at registration.
    #[must_use]
    pub fn allow_missing(mut self) -> Self {
        self.allow_missing = true;
        self
    }
}

/// A slot holding a configured sub-component or factory-built value.
///
/// The declared type is usually an abstract base registered with
/// `define_abstract`, but any [`TypeSpec`] is accepted: a scalar-typed
/// component field is satisfied by factories whose declared return type
/// matches.
#[derive(Debug)]
pub struct ComponentField {
    pub(crate) ty: TypeSpec,
    pub(crate) default: Option<FieldDefault>,
    pub(crate) allow_missing: bool,
}

impl ComponentField {
    /// A required component slot with no default class.
    #[must_use]
    pub fn new(ty: TypeSpec) -> Self {
        Self {
            ty,
            default: None,
            allow_missing: false,
        }
    }

    /// A component slot defaulting to instances of `class`.
    ///
    /// No field values are forwarded at instantiation; the child
    /// inherits missing values from its parent's scope in the usual way.
    #[must_use]
    pub fn with(ty: TypeSpec, class: ClassId) -> Self {
        Self {
            ty,
            default: Some(FieldDefault::Class(class)),
            allow_missing: false,
        }
    }

    /// A component slot defaulting to a class pre-bound with keyword
    /// overrides.
    #[must_use]
    pub fn with_partial(ty: TypeSpec, partial: PartialComponent) -> Self {
        Self {
            ty,
            default: Some(FieldDefault::Partial(partial)),
            allow_missing: false,
        }
    }

    /// Marks the slot as legitimately optional.
    #[must_use]
    pub fn allow_missing(mut self) -> Self {
        self.allow_missing = true;
        self
    }
}

/// An unbound descriptor as accepted by `ClassBuilder::field`.
#[derive(Debug)]
pub struct FieldSpec {
    pub(crate) kind: FieldKind,
    pub(crate) ty: TypeSpec,
    pub(crate) default: Option<FieldDefault>,
    pub(crate) allow_missing: bool,
}

impl From<Field> for FieldSpec {
    fn from(f: Field) -> Self {
        Self {
            kind: FieldKind::Value,
            ty: f.ty,
            default: f.default,
            allow_missing: f.allow_missing,
        }
    }
}

impl From<ComponentField> for FieldSpec {
    fn from(f: ComponentField) -> Self {
        Self {
            kind: FieldKind::Component,
            ty: f.ty,
            default: f.default,
            allow_missing: f.allow_missing,
        }
    }
}

/// A descriptor bound to its host class and name.
#[derive(Debug, Clone)]
pub struct FieldDef {
    pub(crate) name: String,
    pub(crate) host: ClassId,
    pub(crate) kind: FieldKind,
    pub(crate) ty: TypeSpec,
    pub(crate) default: Option<FieldDefault>,
    pub(crate) allow_missing: bool,
}

impl FieldDef {
    /// The field name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The class the descriptor was bound to.
    #[must_use]
    pub fn host(&self) -> ClassId {
        self.host
    }

    /// The declared type.
    #[must_use]
    pub fn ty(&self) -> &TypeSpec {
        &self.ty
    }

    /// Whether a default value or default factory was supplied.
    #[must_use]
    pub fn has_default(&self) -> bool {
        self.default.is_some()
    }

    /// Whether the field may legitimately have no value.
    #[must_use]
    pub fn allow_missing(&self) -> bool {
        self.allow_missing
    }

    /// Whether the slot holds sub-components.
    #[must_use]
    pub fn is_component(&self) -> bool {
        self.kind == FieldKind::Component
    }

    /// The error for a required access with no resolvable value:
    /// an absence signal for `allow_missing` fields, a configuration
    /// error otherwise.
    pub(crate) fn no_value_error(&self, full_name: &str, ty_label: &str) -> ComponentError {
        if self.allow_missing {
            ComponentError::FieldAbsent {
                field: full_name.to_owned(),
            }
        } else {
            ComponentError::MissingValue {
                field: full_name.to_owned(),
                ty: ty_label.to_owned(),
            }
        }
    }

    /// Evaluates the descriptor's default for `id`.
    ///
    /// Requires `id` to be an instance of the host class (or a subclass).
    /// Returns the absence/missing error from [`no_value_error`] when no
    /// default exists; the caller falls back to the nearest ancestor
    /// before surfacing it.
    ///
    /// [`no_value_error`]: Self::no_value_error
    pub(crate) fn eval_default(
        &self,
        tree: &mut ComponentTree,
        id: InstanceId,
    ) -> Result<ConfigValue, ComponentError> {
        let class = tree.class_of(id);
        if !tree.registry().is_subclass(class, self.host) {
            return Err(ComponentError::FieldHostMismatch {
                field: self.name.clone(),
                host: tree.registry().class_name(self.host).to_owned(),
                class: tree.registry().class_name(class).to_owned(),
            });
        }

        let Some(default) = self.default.clone() else {
            let ty_label = tree.registry().type_name(&self.ty);
            return Err(self.no_value_error(&format!("{}.{}", tree.name_of(id), self.name), &ty_label));
        };

        let value = match default {
            FieldDefault::Value(v) => v,
            FieldDefault::Thunk(f) => f(),
            FieldDefault::Instance(f) => f(tree, id)?,
            FieldDefault::Class(cls) => {
                ConfigValue::Instance(tree.instantiate(cls, lattice_types::Conf::new())?)
            }
            FieldDefault::Partial(p) => ConfigValue::Instance(p.instantiate(tree)?),
        };

        // A plain value field whose default produced a non-factory
        // component instance is a usage error; that shape needs a
        // ComponentField. Factory instances stand in for the value
        // they build.
        if self.kind == FieldKind::Value {
            if let Some(iid) = value.as_instance() {
                if !tree.registry().get(tree.class_of(iid)).is_factory() {
                    return Err(ComponentError::ComponentIntoValueField {
                        field: self.name.clone(),
                    });
                }
            }
        }

        // An instance produced on behalf of `id` is its sub-component;
        // the parent link makes ancestor fallback reach through it.
        if let Some(child) = value.as_instance() {
            if child != id && tree.parent_of(child).is_none() {
                tree.node_mut(child).parent = Some(id);
            }
        }

        Ok(value)
    }
}

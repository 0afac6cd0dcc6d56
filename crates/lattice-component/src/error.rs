//! Engine errors.
//!
//! Two layers, matching when an error can arise:
//!
//! - [`DefineError`] — structural errors raised while registering classes,
//!   fields or partials (`DEFINE_` codes). Not recoverable: the class
//!   definitions themselves are wrong.
//! - [`ComponentError`] — errors raised while instantiating, configuring,
//!   accessing or mutating component instances (`COMPONENT_` codes).
//!
//! # Absence vs. error
//!
//! Two variants describe a field without a value and must not be
//! conflated:
//!
//! | Variant | Meaning |
//! |---------|---------|
//! | [`ComponentError::FieldAbsent`] | the field is `allow_missing` and legitimately has no value |
//! | [`ComponentError::MissingValue`] | the field should have a value and none was ever supplied |
//!
//! Callers that want to tolerate legitimate absence match on
//! `FieldAbsent`; [`ComponentError::is_value_absence`] matches both for
//! the resolver's ancestor-fallback logic.

use lattice_types::ErrorCode;
use thiserror::Error;

/// Structural error raised at class/field/partial definition time.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DefineError {
    /// A class with this name is already registered.
    #[error("class '{0}' is already registered as a component")]
    DuplicateClass(String),

    /// Field names starting with an underscore are reserved.
    #[error("field '{field}' on class '{class}': names starting with an underscore are reserved")]
    UnderscoreField { class: String, field: String },

    /// The same field name was declared twice on one class.
    #[error("field '{field}' is declared twice on class '{class}'")]
    DuplicateField { class: String, field: String },

    /// `allow_missing` and a default are mutually exclusive.
    #[error("field '{field}' on class '{class}' has both a default and allow_missing")]
    DefaultConflictsAllowMissing { class: String, field: String },

    /// A literal default does not satisfy the field's declared type.
    #[error(
        "default for field '{field}' on class '{class}' does not satisfy \
         declared type '{ty}' (got {value})"
    )]
    DefaultTypeMismatch {
        class: String,
        field: String,
        ty: String,
        value: String,
    },

    /// A component instance was given as the default of a plain value
    /// field; sub-components belong in a `ComponentField`.
    #[error(
        "field '{field}' on class '{class}' is a plain value field; \
         use a ComponentField to nest sub-components"
    )]
    ComponentDefaultOnValueField { class: String, field: String },

    /// A factory class was registered without a build closure.
    #[error("factory class '{0}' must provide a build closure with a declared return type")]
    FactoryMissingBuild(String),

    /// A factory cannot be abstract; it must be buildable.
    #[error("class '{0}' cannot be both abstract and a factory")]
    AbstractFactory(String),

    /// A `PartialComponent` must override at least one field.
    #[error("partial component over class '{0}' has no keyword overrides")]
    PartialNeedsKwargs(String),

    /// A `PartialComponent` override names a field the class does not
    /// declare.
    #[error("partial component override '{field}' does not match any field of class '{class}'")]
    PartialUnknownField { class: String, field: String },

    /// Partial overrides hold values or thunks, not pre-built instances.
    #[error(
        "partial component override '{field}' on class '{class}' is a component \
         instance; pass a class or a nested partial instead"
    )]
    PartialInstanceValue { class: String, field: String },
}

impl ErrorCode for DefineError {
    fn code(&self) -> &'static str {
        match self {
            Self::DuplicateClass(_) => "DEFINE_DUPLICATE_CLASS",
            Self::UnderscoreField { .. } => "DEFINE_UNDERSCORE_FIELD",
            Self::DuplicateField { .. } => "DEFINE_DUPLICATE_FIELD",
            Self::DefaultConflictsAllowMissing { .. } => "DEFINE_DEFAULT_CONFLICTS_ALLOW_MISSING",
            Self::DefaultTypeMismatch { .. } => "DEFINE_DEFAULT_TYPE_MISMATCH",
            Self::ComponentDefaultOnValueField { .. } => "DEFINE_COMPONENT_DEFAULT_ON_VALUE_FIELD",
            Self::FactoryMissingBuild(_) => "DEFINE_FACTORY_MISSING_BUILD",
            Self::AbstractFactory(_) => "DEFINE_ABSTRACT_FACTORY",
            Self::PartialNeedsKwargs(_) => "DEFINE_PARTIAL_NEEDS_KWARGS",
            Self::PartialUnknownField { .. } => "DEFINE_PARTIAL_UNKNOWN_FIELD",
            Self::PartialInstanceValue { .. } => "DEFINE_PARTIAL_INSTANCE_VALUE",
        }
    }

    fn is_recoverable(&self) -> bool {
        false
    }
}

/// Runtime error raised while instantiating, configuring, accessing or
/// mutating component instances.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ComponentError {
    /// Abstract classes exist to type `ComponentField`s; they cannot be
    /// instantiated.
    #[error("abstract class '{0}' cannot be instantiated")]
    AbstractClass(String),

    /// The named field is not declared on the instance's class.
    #[error("'{field}' does not correspond to any field of component '{component}'")]
    UnknownField { component: String, field: String },

    /// Configuration is strictly one-shot.
    #[error("component '{0}' has already been configured")]
    AlreadyConfigured(String),

    /// The operation requires a configured instance.
    #[error("component '{0}' has not been configured")]
    NotConfigured(String),

    /// `run` was invoked on a class without a run closure.
    #[error("class '{0}' is not runnable")]
    NotRunnable(String),

    /// No source supplied a value for a required field.
    #[error("no configuration value found for field '{field}' of type '{ty}'")]
    MissingValue { field: String, ty: String },

    /// An `allow_missing` field legitimately has no value. This is a
    /// signal, not a configuration mistake.
    #[error("field '{field}' allows missing values and none was supplied")]
    FieldAbsent { field: String },

    /// A resolved value does not satisfy the field's declared type.
    /// Surfaced lazily, at first access.
    #[error(
        "field '{field}' of component '{component}' is declared with type \
         '{ty}', which is not satisfied by value {value}"
    )]
    TypeMismatch {
        field: String,
        component: String,
        ty: String,
        value: String,
    },

    /// A component field has no default or configured class; one of the
    /// listed candidates must be chosen.
    #[error(
        "component field '{field}' of type '{ty}' has no default or configured \
         class; configure '{field}' with one of: {}", candidates.join(", ")
    )]
    UnconfiguredComponentField {
        field: String,
        ty: String,
        candidates: Vec<String>,
    },

    /// No registered component or factory class satisfies the field's
    /// type.
    #[error(
        "no registered component or factory class satisfies the type '{ty}' \
         of field '{field}'; register such a class before configuring"
    )]
    NoCandidates { field: String, ty: String },

    /// A configuration key matched neither a field nor a dotted
    /// sub-component scope.
    #[error(
        "key '{key}' does not correspond to any field of component \
         '{component}'; values for nested components must be fully \
         qualified with dotted keys, e.g. 'child.{key}'"
    )]
    UnrecognizedKey { key: String, component: String },

    /// Fields are frozen once their component is configured.
    #[error("cannot set field '{field}': component '{component}' is already configured")]
    FrozenField { field: String, component: String },

    /// Only `ComponentField`s may hold component instances.
    #[error("field '{field}' is a plain value field and cannot hold a component instance")]
    ComponentIntoValueField { field: String },

    /// An already-configured instance cannot be re-parented into a tree.
    #[error("cannot assign already-configured component '{name}' to field '{field}'")]
    SubComponentAlreadyConfigured { field: String, name: String },

    /// `build` was invoked on a non-factory instance.
    #[error("component '{0}' is not a factory")]
    NotAFactory(String),

    /// A factory's build result does not satisfy its declared return
    /// type.
    #[error(
        "factory '{factory}' declares return type '{ty}', which is not \
         satisfied by built value {value}"
    )]
    BuildTypeMismatch {
        factory: String,
        ty: String,
        value: String,
    },

    /// A field default was evaluated against an instance of a foreign
    /// class.
    #[error(
        "field '{field}' belongs to class '{host}'; its default cannot be \
         evaluated for an instance of '{class}'"
    )]
    FieldHostMismatch {
        field: String,
        host: String,
        class: String,
    },

    /// An interactive prompt failed or was exhausted.
    #[error("prompt failed: {0}")]
    PromptFailed(String),
}

impl ComponentError {
    /// Returns `true` for both "no value" conditions, absent and
    /// missing. The accessor's ancestor fallback treats these alike
    /// before raising the error that names the original instance.
    #[must_use]
    pub fn is_value_absence(&self) -> bool {
        matches!(self, Self::FieldAbsent { .. } | Self::MissingValue { .. })
    }
}

impl ErrorCode for ComponentError {
    fn code(&self) -> &'static str {
        match self {
            Self::AbstractClass(_) => "COMPONENT_ABSTRACT_CLASS",
            Self::UnknownField { .. } => "COMPONENT_UNKNOWN_FIELD",
            Self::AlreadyConfigured(_) => "COMPONENT_ALREADY_CONFIGURED",
            Self::NotConfigured(_) => "COMPONENT_NOT_CONFIGURED",
            Self::NotRunnable(_) => "COMPONENT_NOT_RUNNABLE",
            Self::MissingValue { .. } => "COMPONENT_MISSING_VALUE",
            Self::FieldAbsent { .. } => "COMPONENT_FIELD_ABSENT",
            Self::TypeMismatch { .. } => "COMPONENT_TYPE_MISMATCH",
            Self::UnconfiguredComponentField { .. } => "COMPONENT_UNCONFIGURED_FIELD",
            Self::NoCandidates { .. } => "COMPONENT_NO_CANDIDATES",
            Self::UnrecognizedKey { .. } => "COMPONENT_UNRECOGNIZED_KEY",
            Self::FrozenField { .. } => "COMPONENT_FROZEN_FIELD",
            Self::ComponentIntoValueField { .. } => "COMPONENT_INTO_VALUE_FIELD",
            Self::SubComponentAlreadyConfigured { .. } => "COMPONENT_SUB_ALREADY_CONFIGURED",
            Self::NotAFactory(_) => "COMPONENT_NOT_A_FACTORY",
            Self::BuildTypeMismatch { .. } => "COMPONENT_BUILD_TYPE_MISMATCH",
            Self::FieldHostMismatch { .. } => "COMPONENT_FIELD_HOST_MISMATCH",
            Self::PromptFailed(_) => "COMPONENT_PROMPT_FAILED",
        }
    }

    fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Self::MissingValue { .. }
                | Self::UnconfiguredComponentField { .. }
                | Self::NoCandidates { .. }
                | Self::UnrecognizedKey { .. }
                | Self::NotConfigured(_)
                | Self::PromptFailed(_)
        )
    }
}

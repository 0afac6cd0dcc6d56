//! Class definitions and the registration builder.
//!
//! Classes are defined at runtime against a [`ComponentRegistry`]
//! through a [`ClassBuilder`] chain:
//!
//! ```ignore
//! let dataset = registry.define_abstract("Dataset").register()?;
//! registry
//!     .define("Mnist")
//!     .extends(dataset)
//!     .field("batch_size", Field::with(TypeSpec::Int, 32))
//!     .register()?;
//! ```
//!
//! All validation happens in [`ClassBuilder::register`]; a builder that
//! is dropped without registering has no effect on the registry.

use crate::error::{ComponentError, DefineError};
use crate::field::{FieldDef, FieldDefault, FieldKind, FieldSpec};
use crate::registry::ComponentRegistry;
use crate::tree::ComponentTree;
use lattice_types::{ClassId, Conf, ConfigValue, InstanceId, TypeSpec};
use std::fmt;
use std::sync::Arc;

/// Hook invoked before a component's own fields are populated; may
/// rewrite the local configuration it is about to receive.
pub type PreConfigureFn =
    dyn Fn(&mut ComponentTree, InstanceId, &mut Conf) -> Result<(), ComponentError> + Send + Sync;

/// Hook invoked right after a component is marked configured, before
/// its sub-components are processed. Field writes are still permitted
/// while the hook runs.
pub type PostConfigureFn =
    dyn Fn(&mut ComponentTree, InstanceId) -> Result<(), ComponentError> + Send + Sync;

/// Factory build closure; the result is checked against the declared
/// return type and memoized per instance.
pub type BuildFn =
    dyn Fn(&mut ComponentTree, InstanceId) -> Result<ConfigValue, ComponentError> + Send + Sync;

/// Entry point of a runnable component.
pub type RunFn =
    dyn Fn(&mut ComponentTree, InstanceId) -> Result<ConfigValue, ComponentError> + Send + Sync;

/// An immutable, registered component class.
pub struct ClassDef {
    pub(crate) id: ClassId,
    pub(crate) name: String,
    pub(crate) base: Option<ClassId>,
    pub(crate) is_abstract: bool,
    /// Base-to-derived order; overriding a base field keeps its slot.
    pub(crate) fields: Vec<FieldDef>,
    pub(crate) pre_configure: Option<Arc<PreConfigureFn>>,
    pub(crate) post_configure: Option<Arc<PostConfigureFn>>,
    pub(crate) build: Option<(TypeSpec, Arc<BuildFn>)>,
    pub(crate) run: Option<Arc<RunFn>>,
}

impl fmt::Debug for ClassDef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClassDef")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("base", &self.base)
            .field("is_abstract", &self.is_abstract)
            .field("fields", &self.fields.iter().map(FieldDef::name).collect::<Vec<_>>())
            .field("is_factory", &self.build.is_some())
            .finish()
    }
}

impl ClassDef {
    #[must_use]
    pub fn id(&self) -> ClassId {
        self.id
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn base(&self) -> Option<ClassId> {
        self.base
    }

    #[must_use]
    pub fn is_abstract(&self) -> bool {
        self.is_abstract
    }

    /// Whether the class builds a value instead of being used directly.
    #[must_use]
    pub fn is_factory(&self) -> bool {
        self.build.is_some()
    }

    /// The declared return type of a factory class.
    #[must_use]
    pub fn build_return_type(&self) -> Option<&TypeSpec> {
        self.build.as_ref().map(|(ty, _)| ty)
    }

    /// Whether the class declared a run closure.
    #[must_use]
    pub fn is_runnable(&self) -> bool {
        self.run.is_some()
    }

    /// All fields, inherited ones first.
    pub fn fields(&self) -> impl Iterator<Item = &FieldDef> {
        self.fields.iter()
    }

    #[must_use]
    pub fn field(&self, name: &str) -> Option<&FieldDef> {
        self.fields.iter().find(|f| f.name == name)
    }
}

/// What kind of class a builder produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ClassKind {
    Concrete,
    Abstract,
    Factory,
}

/// Builder for a single class registration. Obtained from
/// [`ComponentRegistry::define`] and friends; consumed by
/// [`register`](Self::register).
pub struct ClassBuilder<'r> {
    registry: &'r mut ComponentRegistry,
    name: String,
    kind: ClassKind,
    base: Option<ClassId>,
    fields: Vec<(String, FieldSpec)>,
    pre_configure: Option<Arc<PreConfigureFn>>,
    post_configure: Option<Arc<PostConfigureFn>>,
    build: Option<(TypeSpec, Arc<BuildFn>)>,
    run: Option<Arc<RunFn>>,
}

impl<'r> ClassBuilder<'r> {
    pub(crate) fn new(registry: &'r mut ComponentRegistry, name: &str, kind: ClassKind) -> Self {
        Self {
            registry,
            name: name.to_owned(),
            kind,
            base: None,
            fields: Vec::new(),
            pre_configure: None,
            post_configure: None,
            build: None,
            run: None,
        }
    }

    /// Inherit fields and hooks from `base`. Fields re-declared here
    /// override the inherited descriptor in place.
    #[must_use]
    pub fn extends(mut self, base: ClassId) -> Self {
        self.base = Some(base);
        self
    }

    /// Declare a field. Accepts both `Field` and `ComponentField`.
    #[must_use]
    pub fn field(mut self, name: &str, spec: impl Into<FieldSpec>) -> Self {
        self.fields.push((name.to_owned(), spec.into()));
        self
    }

    /// Hook run before this component's fields are populated.
    #[must_use]
    pub fn pre_configure(
        mut self,
        f: impl Fn(&mut ComponentTree, InstanceId, &mut Conf) -> Result<(), ComponentError>
            + Send
            + Sync
            + 'static,
    ) -> Self {
        self.pre_configure = Some(Arc::new(f));
        self
    }

    /// Hook run once this component is marked configured.
    #[must_use]
    pub fn post_configure(
        mut self,
        f: impl Fn(&mut ComponentTree, InstanceId) -> Result<(), ComponentError>
            + Send
            + Sync
            + 'static,
    ) -> Self {
        self.post_configure = Some(Arc::new(f));
        self
    }

    /// Declare the build closure and its return type. Required for
    /// factory classes.
    #[must_use]
    pub fn build_with(
        mut self,
        returns: TypeSpec,
        f: impl Fn(&mut ComponentTree, InstanceId) -> Result<ConfigValue, ComponentError>
            + Send
            + Sync
            + 'static,
    ) -> Self {
        self.build = Some((returns, Arc::new(f)));
        self
    }

    /// Declare the class runnable with the given entry point.
    #[must_use]
    pub fn runnable(
        mut self,
        f: impl Fn(&mut ComponentTree, InstanceId) -> Result<ConfigValue, ComponentError>
            + Send
            + Sync
            + 'static,
    ) -> Self {
        self.run = Some(Arc::new(f));
        self
    }

    /// Validate and register the class.
    pub fn register(self) -> Result<ClassId, DefineError> {
        let Self {
            registry,
            name,
            kind,
            base,
            fields,
            pre_configure,
            post_configure,
            build,
            run,
        } = self;

        if registry.lookup(&name).is_some() {
            return Err(DefineError::DuplicateClass(name));
        }
        match kind {
            ClassKind::Factory if build.is_none() => {
                return Err(DefineError::FactoryMissingBuild(name));
            }
            ClassKind::Abstract if build.is_some() => {
                return Err(DefineError::AbstractFactory(name));
            }
            _ => {}
        }

        let id = ClassId::from_index(registry.class_count());

        // Start from the base's resolved field list so inherited fields
        // keep their position; re-declared names override in place.
        let mut resolved: Vec<FieldDef> = match base {
            Some(b) => registry.get(b).fields.clone(),
            None => Vec::new(),
        };
        let mut own_seen: Vec<String> = Vec::new();
        for (field_name, spec) in fields {
            if field_name.starts_with('_') {
                return Err(DefineError::UnderscoreField {
                    class: name.clone(),
                    field: field_name,
                });
            }
            if own_seen.contains(&field_name) {
                return Err(DefineError::DuplicateField {
                    class: name.clone(),
                    field: field_name,
                });
            }
            own_seen.push(field_name.clone());

            if spec.allow_missing && spec.default.is_some() {
                return Err(DefineError::DefaultConflictsAllowMissing {
                    class: name.clone(),
                    field: field_name,
                });
            }
            if let Some(FieldDefault::Value(v)) = &spec.default {
                if spec.kind == FieldKind::Value && v.is_instance() {
                    return Err(DefineError::ComponentDefaultOnValueField {
                        class: name.clone(),
                        field: field_name,
                    });
                }
                // Literal defaults are checked eagerly; lazy defaults
                // only at access time.
                if spec.ty.check_scalar(v) == Some(false) {
                    return Err(DefineError::DefaultTypeMismatch {
                        class: name.clone(),
                        field: field_name,
                        ty: registry.type_name(&spec.ty),
                        value: v.to_string(),
                    });
                }
            }

            let def = FieldDef {
                name: field_name.clone(),
                host: id,
                kind: spec.kind,
                ty: spec.ty,
                default: spec.default,
                allow_missing: spec.allow_missing,
            };
            match resolved.iter_mut().find(|f| f.name == field_name) {
                Some(slot) => *slot = def,
                None => resolved.push(def),
            }
        }

        if resolved.is_empty() && kind == ClassKind::Concrete {
            tracing::warn!(class = %name, "component class has no configurable fields");
        }

        let def = ClassDef {
            id,
            name,
            base,
            is_abstract: kind == ClassKind::Abstract,
            fields: resolved,
            pre_configure: pre_configure.or_else(|| base.and_then(|b| registry.get(b).pre_configure.clone())),
            post_configure: post_configure
                .or_else(|| base.and_then(|b| registry.get(b).post_configure.clone())),
            build: build.or_else(|| base.and_then(|b| registry.get(b).build.clone())),
            run: run.or_else(|| base.and_then(|b| registry.get(b).run.clone())),
        };
        registry.insert(def);
        Ok(id)
    }
}

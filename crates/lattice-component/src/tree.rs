//! The component instance arena.
//!
//! A [`ComponentTree`] owns every instance created from a frozen
//! [`ComponentRegistry`]. Instances are plain arena slots addressed by
//! [`InstanceId`]; parent links are back-references into the same
//! arena, so sub-component graphs never form ownership cycles.
//!
//! Field access goes through two explicit accessors:
//!
//! - [`get_raw`](ComponentTree::get_raw) resolves a field through the
//!   four value sources, in strict priority order: the per-instance
//!   cache, configured values walking from the instance up through its
//!   ancestors, instance values, and finally the field's default (with
//!   a last-resort fallback to the nearest ancestor declaring a field
//!   of the same name). The first source with a value wins; the result
//!   is type-checked and memoized, so type errors surface at first
//!   access rather than when the value was supplied.
//! - [`get`](ComponentTree::get) adds transparent factory building: a
//!   resolved value that is a factory instance is replaced by that
//!   factory's (memoized) build result.
//!
//! [`set`](ComponentTree::set) writes are only permitted before the
//! instance is configured, or from inside its post-configure hook.

use crate::error::ComponentError;
use crate::registry::ComponentRegistry;
use lattice_types::{ClassId, Conf, ConfigValue, InstanceId};
use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

/// One arena slot.
#[derive(Debug)]
pub(crate) struct Node {
    pub(crate) class: ClassId,
    /// Display name; the class name until configuration assigns one.
    pub(crate) name: String,
    pub(crate) parent: Option<InstanceId>,
    pub(crate) configured: bool,
    /// Set while the instance's post-configure hook runs; writes are
    /// still allowed inside that window.
    pub(crate) post_configure_open: bool,
    /// Values supplied at instantiation or through `set`.
    pub(crate) instantiated: BTreeMap<String, ConfigValue>,
    /// Values assigned by the configuration pass.
    pub(crate) configured_values: BTreeMap<String, ConfigValue>,
    /// Memoized resolutions; invalidated by `set`.
    pub(crate) cache: BTreeMap<String, ConfigValue>,
    /// Field names visible to this instance's scope during
    /// configuration.
    pub(crate) in_scope: BTreeSet<String>,
    /// Memoized factory build result.
    pub(crate) factory_value: Option<ConfigValue>,
}

/// Arena of component instances sharing one frozen registry.
#[derive(Debug)]
pub struct ComponentTree {
    registry: Arc<ComponentRegistry>,
    nodes: Vec<Node>,
}

impl ComponentTree {
    #[must_use]
    pub fn new(registry: Arc<ComponentRegistry>) -> Self {
        Self {
            registry,
            nodes: Vec::new(),
        }
    }

    #[must_use]
    pub fn registry(&self) -> &ComponentRegistry {
        &self.registry
    }

    pub(crate) fn registry_handle(&self) -> Arc<ComponentRegistry> {
        Arc::clone(&self.registry)
    }

    pub(crate) fn node(&self, id: InstanceId) -> &Node {
        &self.nodes[id.index()]
    }

    pub(crate) fn node_mut(&mut self, id: InstanceId) -> &mut Node {
        &mut self.nodes[id.index()]
    }

    /// All live instances, oldest first.
    pub fn instances(&self) -> impl Iterator<Item = InstanceId> + '_ {
        (0..self.nodes.len()).map(InstanceId::from_index)
    }

    #[must_use]
    pub fn class_of(&self, id: InstanceId) -> ClassId {
        self.node(id).class
    }

    #[must_use]
    pub fn name_of(&self, id: InstanceId) -> &str {
        &self.node(id).name
    }

    #[must_use]
    pub fn parent_of(&self, id: InstanceId) -> Option<InstanceId> {
        self.node(id).parent
    }

    #[must_use]
    pub fn is_configured(&self, id: InstanceId) -> bool {
        self.node(id).configured
    }

    /// Create an instance of `class`, seeding `conf` entries as
    /// instance values. Fails for abstract classes and for keys that do
    /// not name declared fields.
    pub fn instantiate(&mut self, class: ClassId, conf: Conf) -> Result<InstanceId, ComponentError> {
        let def = self.registry.get(class);
        if def.is_abstract() {
            return Err(ComponentError::AbstractClass(def.name().to_owned()));
        }
        let name = def.name().to_owned();
        let id = InstanceId::from_index(self.nodes.len());
        self.nodes.push(Node {
            class,
            name,
            parent: None,
            configured: false,
            post_configure_open: false,
            instantiated: BTreeMap::new(),
            configured_values: BTreeMap::new(),
            cache: BTreeMap::new(),
            in_scope: BTreeSet::new(),
            factory_value: None,
        });
        for (key, value) in conf {
            self.set(id, &key, value)?;
        }
        Ok(id)
    }

    fn field_def(
        &self,
        id: InstanceId,
        field: &str,
    ) -> Result<crate::field::FieldDef, ComponentError> {
        let class = self.class_of(id);
        self.registry
            .get(class)
            .field(field)
            .cloned()
            .ok_or_else(|| ComponentError::UnknownField {
                component: self.name_of(id).to_owned(),
                field: field.to_owned(),
            })
    }

    fn value_ok(&self, ty: &lattice_types::TypeSpec, value: &ConfigValue) -> bool {
        self.registry
            .value_satisfies(ty, value, |iid| self.class_of(iid))
    }

    /// The error for a field with no resolvable value, naming this
    /// instance.
    fn no_value_error(&self, id: InstanceId, fd: &crate::field::FieldDef) -> ComponentError {
        let full = format!("{}.{}", self.name_of(id), fd.name());
        let ty = self.registry.type_name(fd.ty());
        if fd.allow_missing() {
            ComponentError::FieldAbsent { field: full }
        } else if fd.is_component() {
            let candidates = self.registry.candidate_names(fd.ty());
            if candidates.is_empty() {
                ComponentError::NoCandidates { field: full, ty }
            } else {
                ComponentError::UnconfiguredComponentField {
                    field: full,
                    ty,
                    candidates,
                }
            }
        } else {
            ComponentError::MissingValue { field: full, ty }
        }
    }

    /// Resolve `field` on `id` without factory building.
    ///
    /// Sources, in strict priority order:
    ///
    /// 1. the instance's memoization cache;
    /// 2. configured values, walking `id` then its ancestors;
    /// 3. the instance's own instance values;
    /// 4. the field's default, falling back to the nearest ancestor
    ///    declaring a same-named field when there is none.
    ///
    /// The winning value is checked against the declared type and
    /// memoized before being returned.
    pub fn get_raw(&mut self, id: InstanceId, field: &str) -> Result<ConfigValue, ComponentError> {
        let fd = self.field_def(id, field)?;

        if let Some(v) = self.node(id).cache.get(field) {
            return Ok(v.clone());
        }

        let mut found: Option<ConfigValue> = None;
        let mut cur = Some(id);
        while let Some(c) = cur {
            if let Some(v) = self.node(c).configured_values.get(field) {
                found = Some(v.clone());
                break;
            }
            cur = self.node(c).parent;
        }
        if found.is_none() {
            found = self.node(id).instantiated.get(field).cloned();
        }
        if found.is_none() {
            found = self.resolve_default(id, &fd)?;
        }
        let Some(value) = found else {
            return Err(self.no_value_error(id, &fd));
        };

        if !self.value_ok(fd.ty(), &value) {
            return Err(ComponentError::TypeMismatch {
                field: field.to_owned(),
                component: self.name_of(id).to_owned(),
                ty: self.registry.type_name(fd.ty()),
                value: value.to_string(),
            });
        }
        self.node_mut(id)
            .cache
            .insert(field.to_owned(), value.clone());
        Ok(value)
    }

    /// Source 4: the field's own default, else the nearest ancestor
    /// declaring a same-named field. `Ok(None)` means "no value", which
    /// the caller turns into the error naming `id`.
    fn resolve_default(
        &mut self,
        id: InstanceId,
        fd: &crate::field::FieldDef,
    ) -> Result<Option<ConfigValue>, ComponentError> {
        if fd.has_default() {
            return fd.eval_default(self, id).map(Some);
        }

        let mut cur = self.node(id).parent;
        while let Some(anc) = cur {
            let has_field = {
                let class = self.class_of(anc);
                self.registry.get(class).field(fd.name()).is_some()
            };
            if has_field {
                return match self.get_raw(anc, fd.name()) {
                    Ok(v) => Ok(Some(v)),
                    // The ancestor has no value either; the caller
                    // raises the error naming the original instance.
                    Err(e)
                        if e.is_value_absence()
                            || matches!(
                                e,
                                ComponentError::UnconfiguredComponentField { .. }
                                    | ComponentError::NoCandidates { .. }
                            ) =>
                    {
                        Ok(None)
                    }
                    Err(e) => Err(e),
                };
            }
            cur = self.node(anc).parent;
        }
        Ok(None)
    }

    /// Resolve `field` on `id`, transparently building factory values:
    /// when the resolved value is an instance of a factory class, the
    /// factory's memoized build result is returned instead.
    pub fn get(&mut self, id: InstanceId, field: &str) -> Result<ConfigValue, ComponentError> {
        let value = self.get_raw(id, field)?;
        if let ConfigValue::Instance(iid) = value {
            if self.registry.get(self.class_of(iid)).is_factory() {
                return self.build(iid);
            }
        }
        Ok(value)
    }

    /// Write a field value. Permitted before configuration and inside
    /// the instance's post-configure hook; frozen otherwise.
    ///
    /// Assigning a component instance claims it as a child of `id`;
    /// the instance must not already be configured. Scalar type errors
    /// stay delayed until access.
    pub fn set(
        &mut self,
        id: InstanceId,
        field: &str,
        value: impl Into<ConfigValue>,
    ) -> Result<(), ComponentError> {
        let value = value.into();
        let fd = self.field_def(id, field)?;

        let node = self.node(id);
        if node.configured && !node.post_configure_open {
            return Err(ComponentError::FrozenField {
                field: field.to_owned(),
                component: node.name.clone(),
            });
        }

        if let ConfigValue::Instance(child) = value {
            // Factory instances may sit in scalar slots; they stand in
            // for the value they build.
            let is_factory = self.registry.get(self.class_of(child)).is_factory();
            if !fd.is_component() && !is_factory {
                return Err(ComponentError::ComponentIntoValueField {
                    field: field.to_owned(),
                });
            }
            if self.node(child).configured {
                return Err(ComponentError::SubComponentAlreadyConfigured {
                    field: field.to_owned(),
                    name: self.name_of(child).to_owned(),
                });
            }
            self.node_mut(child).parent = Some(id);
        }

        let node = self.node_mut(id);
        node.cache.remove(field);
        if node.configured {
            // Post-configure hook writes win over configured values.
            node.configured_values.insert(field.to_owned(), value);
        } else {
            node.instantiated.insert(field.to_owned(), value);
        }
        Ok(())
    }

    /// Invoke a factory's build closure, checking the result against
    /// the declared return type. The result is memoized per instance.
    pub fn build(&mut self, id: InstanceId) -> Result<ConfigValue, ComponentError> {
        if let Some(v) = &self.node(id).factory_value {
            return Ok(v.clone());
        }
        let registry = self.registry_handle();
        let def = registry.get(self.class_of(id));
        let Some((ret_ty, build)) = def.build.clone() else {
            return Err(ComponentError::NotAFactory(self.name_of(id).to_owned()));
        };
        let value = build(self, id)?;
        if !self.value_ok(&ret_ty, &value) {
            return Err(ComponentError::BuildTypeMismatch {
                factory: self.name_of(id).to_owned(),
                ty: self.registry.type_name(&ret_ty),
                value: value.to_string(),
            });
        }
        self.node_mut(id).factory_value = Some(value.clone());
        Ok(value)
    }

    /// Invoke a runnable component's entry point. Requires a configured
    /// instance.
    pub fn run(&mut self, id: InstanceId) -> Result<ConfigValue, ComponentError> {
        if !self.is_configured(id) {
            return Err(ComponentError::NotConfigured(self.name_of(id).to_owned()));
        }
        let registry = self.registry_handle();
        let Some(run) = registry.get(self.class_of(id)).run.clone() else {
            return Err(ComponentError::NotRunnable(self.name_of(id).to_owned()));
        };
        run(self, id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::{ComponentField, Field};
    use lattice_types::{assert_error_code, TypeSpec};
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn freeze(reg: ComponentRegistry) -> Arc<ComponentRegistry> {
        reg.freeze()
    }

    // ── instantiation ──

    #[test]
    fn abstract_class_cannot_be_instantiated() {
        let mut reg = ComponentRegistry::new();
        let a = reg.define_abstract("Base").register().unwrap();
        let mut tree = ComponentTree::new(freeze(reg));
        let err = tree.instantiate(a, Conf::new()).unwrap_err();
        assert_error_code(&err, "COMPONENT_ABSTRACT_CLASS");
    }

    #[test]
    fn instantiation_conf_seeds_instance_values() {
        let mut reg = ComponentRegistry::new();
        let a = reg
            .define("A")
            .field("x", Field::new(TypeSpec::Int))
            .register()
            .unwrap();
        let mut tree = ComponentTree::new(freeze(reg));
        let id = tree.instantiate(a, Conf::new().with("x", 5)).unwrap();
        assert_eq!(tree.get(id, "x").unwrap(), ConfigValue::Int(5));
    }

    #[test]
    fn unknown_field_rejected_on_access_and_set() {
        let mut reg = ComponentRegistry::new();
        let a = reg
            .define("A")
            .field("x", Field::new(TypeSpec::Int))
            .register()
            .unwrap();
        let mut tree = ComponentTree::new(freeze(reg));
        let id = tree.instantiate(a, Conf::new()).unwrap();
        assert_error_code(&tree.get(id, "nope").unwrap_err(), "COMPONENT_UNKNOWN_FIELD");
        assert_error_code(&tree.set(id, "nope", 1).unwrap_err(), "COMPONENT_UNKNOWN_FIELD");
    }

    // ── defaults and memoization ──

    #[test]
    fn thunk_default_evaluated_once_per_instance() {
        static CALLS: AtomicUsize = AtomicUsize::new(0);
        let mut reg = ComponentRegistry::new();
        let a = reg
            .define("A")
            .field(
                "x",
                Field::computed(TypeSpec::Int, || {
                    CALLS.fetch_add(1, Ordering::SeqCst);
                    ConfigValue::Int(42)
                }),
            )
            .register()
            .unwrap();
        let mut tree = ComponentTree::new(freeze(reg));
        let id = tree.instantiate(a, Conf::new()).unwrap();
        assert_eq!(tree.get(id, "x").unwrap(), ConfigValue::Int(42));
        assert_eq!(tree.get(id, "x").unwrap(), ConfigValue::Int(42));
        assert_eq!(CALLS.load(Ordering::SeqCst), 1);

        let other = tree.instantiate(a, Conf::new()).unwrap();
        tree.get(other, "x").unwrap();
        assert_eq!(CALLS.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn missing_required_field_reports_configuration_error() {
        let mut reg = ComponentRegistry::new();
        let a = reg
            .define("A")
            .field("x", Field::new(TypeSpec::Int))
            .register()
            .unwrap();
        let mut tree = ComponentTree::new(freeze(reg));
        let id = tree.instantiate(a, Conf::new()).unwrap();
        assert_error_code(&tree.get(id, "x").unwrap_err(), "COMPONENT_MISSING_VALUE");
    }

    #[test]
    fn allow_missing_field_reports_absence() {
        let mut reg = ComponentRegistry::new();
        let a = reg
            .define("A")
            .field("x", Field::new(TypeSpec::Int).allow_missing())
            .register()
            .unwrap();
        let mut tree = ComponentTree::new(freeze(reg));
        let id = tree.instantiate(a, Conf::new()).unwrap();
        let err = tree.get(id, "x").unwrap_err();
        assert_error_code(&err, "COMPONENT_FIELD_ABSENT");
        assert!(err.is_value_absence());
    }

    #[test]
    fn default_falls_back_to_nearest_ancestor_with_field() {
        let mut reg = ComponentRegistry::new();
        let inner = reg
            .define("Inner")
            .field("x", Field::new(TypeSpec::Int))
            .register()
            .unwrap();
        let outer = reg
            .define("Outer")
            .field("x", Field::with(TypeSpec::Int, 7))
            .field("child", ComponentField::with(TypeSpec::Component(inner), inner))
            .register()
            .unwrap();
        let mut tree = ComponentTree::new(freeze(reg));
        let o = tree.instantiate(outer, Conf::new()).unwrap();
        let child = match tree.get(o, "child").unwrap() {
            ConfigValue::Instance(c) => c,
            other => panic!("expected instance, got {other}"),
        };
        // The default-instantiated sub-component is claimed as a child.
        assert_eq!(tree.parent_of(child), Some(o));
        assert_eq!(tree.get(child, "x").unwrap(), ConfigValue::Int(7));
    }

    #[test]
    fn ancestor_without_value_keeps_error_on_original_instance() {
        let mut reg = ComponentRegistry::new();
        let inner = reg
            .define("Inner")
            .field("x", Field::new(TypeSpec::Int))
            .register()
            .unwrap();
        let outer = reg
            .define("Outer")
            .field("x", Field::new(TypeSpec::Int))
            .field("child", ComponentField::with(TypeSpec::Component(inner), inner))
            .register()
            .unwrap();
        let mut tree = ComponentTree::new(freeze(reg));
        let o = tree.instantiate(outer, Conf::new()).unwrap();
        let child = match tree.get(o, "child").unwrap() {
            ConfigValue::Instance(c) => c,
            other => panic!("expected instance, got {other}"),
        };
        let err = tree.get(child, "x").unwrap_err();
        match err {
            ComponentError::MissingValue { field, .. } => assert_eq!(field, "Inner.x"),
            other => panic!("unexpected error: {other}"),
        }
    }

    // ── delayed type errors ──

    #[test]
    fn type_mismatch_surfaces_at_access_not_at_set() {
        let mut reg = ComponentRegistry::new();
        let a = reg
            .define("A")
            .field("x", Field::new(TypeSpec::Int))
            .register()
            .unwrap();
        let mut tree = ComponentTree::new(freeze(reg));
        let id = tree.instantiate(a, Conf::new()).unwrap();
        tree.set(id, "x", "not an int").unwrap();
        assert_error_code(&tree.get(id, "x").unwrap_err(), "COMPONENT_TYPE_MISMATCH");
    }

    #[test]
    fn set_invalidates_memoized_value() {
        let mut reg = ComponentRegistry::new();
        let a = reg
            .define("A")
            .field("x", Field::with(TypeSpec::Int, 1))
            .register()
            .unwrap();
        let mut tree = ComponentTree::new(freeze(reg));
        let id = tree.instantiate(a, Conf::new()).unwrap();
        assert_eq!(tree.get(id, "x").unwrap(), ConfigValue::Int(1));
        tree.set(id, "x", 2).unwrap();
        assert_eq!(tree.get(id, "x").unwrap(), ConfigValue::Int(2));
    }

    // ── write rules ──

    #[test]
    fn fields_freeze_after_configuration() {
        let mut reg = ComponentRegistry::new();
        let a = reg
            .define("A")
            .field("x", Field::with(TypeSpec::Int, 1))
            .register()
            .unwrap();
        let mut tree = ComponentTree::new(freeze(reg));
        let id = tree.instantiate(a, Conf::new()).unwrap();
        tree.node_mut(id).configured = true;
        assert_error_code(&tree.set(id, "x", 2).unwrap_err(), "COMPONENT_FROZEN_FIELD");
    }

    #[test]
    fn component_instance_rejected_in_value_field() {
        let mut reg = ComponentRegistry::new();
        let a = reg
            .define("A")
            .field("x", Field::new(TypeSpec::Int))
            .register()
            .unwrap();
        let mut tree = ComponentTree::new(freeze(reg));
        let host = tree.instantiate(a, Conf::new()).unwrap();
        let stray = tree.instantiate(a, Conf::new()).unwrap();
        let err = tree.set(host, "x", ConfigValue::Instance(stray)).unwrap_err();
        assert_error_code(&err, "COMPONENT_INTO_VALUE_FIELD");
    }

    #[test]
    fn assigning_sub_component_claims_parent() {
        let mut reg = ComponentRegistry::new();
        let inner = reg
            .define("Inner")
            .field("x", Field::with(TypeSpec::Int, 1))
            .register()
            .unwrap();
        let outer = reg
            .define("Outer")
            .field("child", ComponentField::new(TypeSpec::Component(inner)))
            .register()
            .unwrap();
        let mut tree = ComponentTree::new(freeze(reg));
        let o = tree.instantiate(outer, Conf::new()).unwrap();
        let c = tree.instantiate(inner, Conf::new()).unwrap();
        tree.set(o, "child", ConfigValue::Instance(c)).unwrap();
        assert_eq!(tree.parent_of(c), Some(o));
    }

    #[test]
    fn configured_sub_component_cannot_be_reassigned() {
        let mut reg = ComponentRegistry::new();
        let inner = reg
            .define("Inner")
            .field("x", Field::with(TypeSpec::Int, 1))
            .register()
            .unwrap();
        let outer = reg
            .define("Outer")
            .field("child", ComponentField::new(TypeSpec::Component(inner)))
            .register()
            .unwrap();
        let mut tree = ComponentTree::new(freeze(reg));
        let o = tree.instantiate(outer, Conf::new()).unwrap();
        let c = tree.instantiate(inner, Conf::new()).unwrap();
        tree.node_mut(c).configured = true;
        let err = tree.set(o, "child", ConfigValue::Instance(c)).unwrap_err();
        assert_error_code(&err, "COMPONENT_SUB_ALREADY_CONFIGURED");
    }

    // ── factories ──

    #[test]
    fn factory_build_is_memoized_and_type_checked() {
        static CALLS: AtomicUsize = AtomicUsize::new(0);
        let mut reg = ComponentRegistry::new();
        let f = reg
            .define_factory("Doubler")
            .field("base", Field::with(TypeSpec::Int, 21))
            .build_with(TypeSpec::Int, |tree, id| {
                CALLS.fetch_add(1, Ordering::SeqCst);
                match tree.get(id, "base")? {
                    ConfigValue::Int(n) => Ok(ConfigValue::Int(n * 2)),
                    other => Ok(other),
                }
            })
            .register()
            .unwrap();
        let mut tree = ComponentTree::new(freeze(reg));
        let id = tree.instantiate(f, Conf::new()).unwrap();
        assert_eq!(tree.build(id).unwrap(), ConfigValue::Int(42));
        assert_eq!(tree.build(id).unwrap(), ConfigValue::Int(42));
        assert_eq!(CALLS.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn build_on_non_factory_rejected() {
        let mut reg = ComponentRegistry::new();
        let a = reg
            .define("A")
            .field("x", Field::with(TypeSpec::Int, 1))
            .register()
            .unwrap();
        let mut tree = ComponentTree::new(freeze(reg));
        let id = tree.instantiate(a, Conf::new()).unwrap();
        assert_error_code(&tree.build(id).unwrap_err(), "COMPONENT_NOT_A_FACTORY");
    }

    #[test]
    fn build_result_checked_against_return_type() {
        let mut reg = ComponentRegistry::new();
        let f = reg
            .define_factory("Liar")
            .build_with(TypeSpec::Int, |_, _| Ok(ConfigValue::Str("nope".into())))
            .register()
            .unwrap();
        let mut tree = ComponentTree::new(freeze(reg));
        let id = tree.instantiate(f, Conf::new()).unwrap();
        assert_error_code(&tree.build(id).unwrap_err(), "COMPONENT_BUILD_TYPE_MISMATCH");
    }

    #[test]
    fn get_transparently_builds_factory_valued_fields() {
        let mut reg = ComponentRegistry::new();
        let f = reg
            .define_factory("IntFactory")
            .build_with(TypeSpec::Int, |_, _| Ok(ConfigValue::Int(9)))
            .register()
            .unwrap();
        let a = reg
            .define("A")
            .field("x", Field::new(TypeSpec::Int))
            .register()
            .unwrap();
        let mut tree = ComponentTree::new(freeze(reg));
        let id = tree.instantiate(a, Conf::new()).unwrap();
        let fac = tree.instantiate(f, Conf::new()).unwrap();
        // A factory instance satisfies the int slot through its return
        // type; get() builds it, get_raw() hands back the instance.
        tree.set(id, "x", ConfigValue::Instance(fac)).unwrap();
        assert_eq!(tree.get(id, "x").unwrap(), ConfigValue::Int(9));
        assert_eq!(tree.get_raw(id, "x").unwrap(), ConfigValue::Instance(fac));
    }

    // ── runnable ──

    #[test]
    fn run_requires_configuration_and_run_closure() {
        let mut reg = ComponentRegistry::new();
        let plain = reg
            .define("Plain")
            .field("x", Field::with(TypeSpec::Int, 1))
            .register()
            .unwrap();
        let task = reg
            .define("Task")
            .field("x", Field::with(TypeSpec::Int, 5))
            .runnable(|tree, id| tree.get(id, "x"))
            .register()
            .unwrap();
        let mut tree = ComponentTree::new(freeze(reg));
        let p = tree.instantiate(plain, Conf::new()).unwrap();
        let t = tree.instantiate(task, Conf::new()).unwrap();
        assert_error_code(&tree.run(t).unwrap_err(), "COMPONENT_NOT_CONFIGURED");
        tree.node_mut(t).configured = true;
        tree.node_mut(p).configured = true;
        assert_eq!(tree.run(t).unwrap(), ConfigValue::Int(5));
        assert_error_code(&tree.run(p).unwrap_err(), "COMPONENT_NOT_RUNNABLE");
    }
}

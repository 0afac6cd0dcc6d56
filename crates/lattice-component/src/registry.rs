//! The component class registry.
//!
//! A [`ComponentRegistry`] owns every [`ClassDef`] and the factory
//! index. Registration happens through the `define*` builders; once all
//! classes are in place the registry is frozen behind an `Arc` with
//! [`freeze`](ComponentRegistry::freeze) and shared by every
//! [`ComponentTree`](crate::tree::ComponentTree) built from it.
//!
//! Type questions that need class knowledge live here: subclass tests,
//! factory-aware satisfaction checks, candidate enumeration and
//! class-name matching for string-configured component fields.

use crate::class::{ClassBuilder, ClassDef, ClassKind};
use lattice_types::{key, ClassId, ConfigValue, TypeSpec};
use std::collections::BTreeMap;
use std::sync::Arc;

/// Index from factory return types to the factory classes producing
/// them.
#[derive(Debug, Default)]
pub(crate) struct FactoryRegistry {
    entries: Vec<(TypeSpec, Vec<ClassId>)>,
}

impl FactoryRegistry {
    fn register(&mut self, returns: &TypeSpec, class: ClassId) {
        if let Some((_, classes)) = self.entries.iter_mut().find(|(ty, _)| ty == returns) {
            if !classes.contains(&class) {
                classes.push(class);
            }
        } else {
            self.entries.push((returns.clone(), vec![class]));
        }
    }

    /// Factories whose declared return type satisfies `ty`.
    fn producing(&self, ty: &TypeSpec) -> impl Iterator<Item = ClassId> + '_ {
        let ty = ty.clone();
        self.entries
            .iter()
            .filter(move |(ret, _)| spec_accepts(&ty, ret))
            .flat_map(|(_, classes)| classes.iter().copied())
    }
}

/// Whether a value of declared type `produced` satisfies a slot of
/// declared type `wanted`.
fn spec_accepts(wanted: &TypeSpec, produced: &TypeSpec) -> bool {
    match (wanted, produced) {
        (TypeSpec::Any, _) => true,
        (TypeSpec::Float, TypeSpec::Int) => true,
        (a, b) => a == b,
    }
}

/// Runtime registry of component classes.
#[derive(Debug, Default)]
pub struct ComponentRegistry {
    classes: Vec<ClassDef>,
    by_name: BTreeMap<String, ClassId>,
    factories: FactoryRegistry,
}

impl ComponentRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Begin registering a concrete component class.
    #[must_use]
    pub fn define(&mut self, name: &str) -> ClassBuilder<'_> {
        ClassBuilder::new(self, name, ClassKind::Concrete)
    }

    /// Begin registering an abstract class. Abstract classes type
    /// component fields and cannot be instantiated.
    #[must_use]
    pub fn define_abstract(&mut self, name: &str) -> ClassBuilder<'_> {
        ClassBuilder::new(self, name, ClassKind::Abstract)
    }

    /// Begin registering a factory class; a `build_with` closure with a
    /// declared return type is required.
    #[must_use]
    pub fn define_factory(&mut self, name: &str) -> ClassBuilder<'_> {
        ClassBuilder::new(self, name, ClassKind::Factory)
    }

    /// Freeze the registry for sharing across trees. No further classes
    /// can be registered afterwards.
    #[must_use]
    pub fn freeze(self) -> Arc<Self> {
        Arc::new(self)
    }

    pub(crate) fn class_count(&self) -> usize {
        self.classes.len()
    }

    pub(crate) fn insert(&mut self, def: ClassDef) {
        self.by_name.insert(def.name.clone(), def.id);
        if let Some((returns, _)) = &def.build {
            self.factories.register(returns, def.id);
        }
        self.classes.push(def);
    }

    /// The definition for `id`.
    ///
    /// # Panics
    ///
    /// Panics if `id` did not come from this registry.
    #[must_use]
    pub fn get(&self, id: ClassId) -> &ClassDef {
        &self.classes[id.index()]
    }

    /// Class id registered under `name`, if any.
    #[must_use]
    pub fn lookup(&self, name: &str) -> Option<ClassId> {
        self.by_name.get(name).copied()
    }

    #[must_use]
    pub fn class_name(&self, id: ClassId) -> &str {
        &self.get(id).name
    }

    /// All registered classes in registration order.
    pub fn classes(&self) -> impl Iterator<Item = &ClassDef> {
        self.classes.iter()
    }

    /// Whether `class` is `base` or inherits from it.
    #[must_use]
    pub fn is_subclass(&self, class: ClassId, base: ClassId) -> bool {
        let mut cur = Some(class);
        while let Some(c) = cur {
            if c == base {
                return true;
            }
            cur = self.get(c).base;
        }
        false
    }

    /// Render a type for messages, naming component classes.
    #[must_use]
    pub fn type_name(&self, ty: &TypeSpec) -> String {
        match ty {
            TypeSpec::Component(id) => self.class_name(*id).to_owned(),
            TypeSpec::List(inner) => format!("list[{}]", self.type_name(inner)),
            other => other.to_string(),
        }
    }

    /// Whether an instance of `class` can sit in a slot of type `ty`.
    ///
    /// Factory-aware: an instance of a factory class satisfies any slot
    /// its declared return type satisfies, even a scalar one.
    #[must_use]
    pub fn instance_satisfies(&self, ty: &TypeSpec, class: ClassId) -> bool {
        if let TypeSpec::Component(base) = ty {
            if self.is_subclass(class, *base) {
                return true;
            }
        }
        if matches!(ty, TypeSpec::Any) {
            return true;
        }
        match self.get(class).build_return_type() {
            Some(ret) => spec_accepts(ty, ret),
            None => false,
        }
    }

    /// Whether `value` satisfies `ty`, given a way to look up the class
    /// of component instances.
    #[must_use]
    pub fn value_satisfies(
        &self,
        ty: &TypeSpec,
        value: &ConfigValue,
        class_of: impl Fn(lattice_types::InstanceId) -> ClassId,
    ) -> bool {
        match ty.check_scalar(value) {
            Some(ok) => ok,
            None => match value {
                ConfigValue::Instance(id) => self.instance_satisfies(ty, class_of(*id)),
                // A non-instance value in a component-typed slot.
                _ => false,
            },
        }
    }

    /// Classes eligible to fill a slot of type `ty`: concrete
    /// non-factory subclasses plus factories producing the type.
    /// Sorted by name.
    #[must_use]
    pub fn candidates(&self, ty: &TypeSpec) -> Vec<ClassId> {
        let mut out: Vec<ClassId> = Vec::new();
        if let TypeSpec::Component(base) = ty {
            for def in &self.classes {
                if !def.is_abstract && !def.is_factory() && self.is_subclass(def.id, *base) {
                    out.push(def.id);
                }
            }
        }
        for id in self.factories.producing(ty) {
            if !self.get(id).is_abstract && !out.contains(&id) {
                out.push(id);
            }
        }
        out.sort_by(|a, b| self.class_name(*a).cmp(self.class_name(*b)));
        out
    }

    /// Candidate class names for messages and prompts.
    #[must_use]
    pub fn candidate_names(&self, ty: &TypeSpec) -> Vec<String> {
        self.candidates(ty)
            .into_iter()
            .map(|id| self.class_name(id).to_owned())
            .collect()
    }

    /// Resolve a configured class-name string against the candidates
    /// for `ty`. Accepts the exact class name or its snake_case form.
    #[must_use]
    pub fn match_candidate(&self, ty: &TypeSpec, name: &str) -> Option<ClassId> {
        let candidates = self.candidates(ty);
        if let Some(&id) = candidates
            .iter()
            .find(|&&id| self.class_name(id) == name)
        {
            return Some(id);
        }
        candidates
            .into_iter()
            .find(|&id| key::names_match(self.class_name(id), name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::Field;
    use lattice_types::assert_error_code;

    fn registry_with_hierarchy() -> (ComponentRegistry, ClassId, ClassId, ClassId) {
        let mut reg = ComponentRegistry::new();
        let dataset = reg.define_abstract("Dataset").register().unwrap();
        let mnist = reg
            .define("Mnist")
            .extends(dataset)
            .field("batch_size", Field::with(TypeSpec::Int, 32))
            .register()
            .unwrap();
        let cifar = reg
            .define("CifarDataset")
            .extends(dataset)
            .field("batch_size", Field::with(TypeSpec::Int, 64))
            .register()
            .unwrap();
        (reg, dataset, mnist, cifar)
    }

    // ── subclass and type questions ──

    #[test]
    fn subclass_is_reflexive_and_transitive() {
        let (reg, dataset, mnist, _) = registry_with_hierarchy();
        assert!(reg.is_subclass(mnist, mnist));
        assert!(reg.is_subclass(mnist, dataset));
        assert!(!reg.is_subclass(dataset, mnist));
    }

    #[test]
    fn instance_satisfies_component_slot_via_inheritance() {
        let (reg, dataset, mnist, _) = registry_with_hierarchy();
        let slot = TypeSpec::Component(dataset);
        assert!(reg.instance_satisfies(&slot, mnist));
        assert!(reg.instance_satisfies(&TypeSpec::Any, mnist));
        assert!(!reg.instance_satisfies(&TypeSpec::Int, mnist));
    }

    #[test]
    fn factory_instance_satisfies_scalar_slot() {
        let mut reg = ComponentRegistry::new();
        let rng = reg
            .define_factory("SeedFactory")
            .field("base", Field::with(TypeSpec::Int, 7))
            .build_with(TypeSpec::Int, |tree, id| {
                Ok(ConfigValue::Int(match tree.get(id, "base")? {
                    ConfigValue::Int(n) => n * 2,
                    other => return Ok(other),
                }))
            })
            .register()
            .unwrap();
        assert!(reg.instance_satisfies(&TypeSpec::Int, rng));
        assert!(reg.instance_satisfies(&TypeSpec::Float, rng));
        assert!(!reg.instance_satisfies(&TypeSpec::Str, rng));
    }

    // ── candidates ──

    #[test]
    fn candidates_are_concrete_subclasses_sorted_by_name() {
        let (reg, dataset, mnist, cifar) = registry_with_hierarchy();
        let got = reg.candidates(&TypeSpec::Component(dataset));
        assert_eq!(got, vec![cifar, mnist]);
        assert_eq!(reg.candidate_names(&TypeSpec::Component(dataset)), ["CifarDataset", "Mnist"]);
    }

    #[test]
    fn factories_appear_as_candidates_for_their_return_type() {
        let mut reg = ComponentRegistry::new();
        let f = reg
            .define_factory("IntFactory")
            .build_with(TypeSpec::Int, |_, _| Ok(ConfigValue::Int(1)))
            .register()
            .unwrap();
        assert_eq!(reg.candidates(&TypeSpec::Int), vec![f]);
        assert_eq!(reg.candidates(&TypeSpec::Float), vec![f]);
        assert!(reg.candidates(&TypeSpec::Str).is_empty());
    }

    #[test]
    fn match_candidate_accepts_exact_and_snake_case() {
        let (reg, dataset, mnist, cifar) = registry_with_hierarchy();
        let slot = TypeSpec::Component(dataset);
        assert_eq!(reg.match_candidate(&slot, "Mnist"), Some(mnist));
        assert_eq!(reg.match_candidate(&slot, "cifar_dataset"), Some(cifar));
        assert_eq!(reg.match_candidate(&slot, "imagenet"), None);
    }

    // ── registration validation ──

    #[test]
    fn duplicate_class_name_rejected() {
        let mut reg = ComponentRegistry::new();
        reg.define("A").field("x", Field::new(TypeSpec::Int)).register().unwrap();
        let err = reg.define("A").register().unwrap_err();
        assert_error_code(&err, "DEFINE_DUPLICATE_CLASS");
    }

    #[test]
    fn underscore_field_rejected() {
        let mut reg = ComponentRegistry::new();
        let err = reg
            .define("A")
            .field("_hidden", Field::new(TypeSpec::Int))
            .register()
            .unwrap_err();
        assert_error_code(&err, "DEFINE_UNDERSCORE_FIELD");
    }

    #[test]
    fn default_with_allow_missing_rejected() {
        let mut reg = ComponentRegistry::new();
        let err = reg
            .define("A")
            .field("x", Field::with(TypeSpec::Int, 1).allow_missing())
            .register()
            .unwrap_err();
        assert_error_code(&err, "DEFINE_DEFAULT_CONFLICTS_ALLOW_MISSING");
    }

    #[test]
    fn literal_default_type_checked_eagerly() {
        let mut reg = ComponentRegistry::new();
        let err = reg
            .define("A")
            .field("x", Field::with(TypeSpec::Int, "foo"))
            .register()
            .unwrap_err();
        assert_error_code(&err, "DEFINE_DEFAULT_TYPE_MISMATCH");
    }

    #[test]
    fn float_default_accepts_int_literal() {
        let mut reg = ComponentRegistry::new();
        assert!(reg
            .define("A")
            .field("x", Field::with(TypeSpec::Float, 3))
            .register()
            .is_ok());
    }

    #[test]
    fn factory_without_build_rejected() {
        let mut reg = ComponentRegistry::new();
        let err = reg.define_factory("F").register().unwrap_err();
        assert_error_code(&err, "DEFINE_FACTORY_MISSING_BUILD");
    }

    #[test]
    fn derived_class_overrides_field_in_place() {
        let mut reg = ComponentRegistry::new();
        let base = reg
            .define("Base")
            .field("x", Field::with(TypeSpec::Int, 1))
            .field("y", Field::with(TypeSpec::Int, 2))
            .register()
            .unwrap();
        let derived = reg
            .define("Derived")
            .extends(base)
            .field("x", Field::with(TypeSpec::Int, 10))
            .register()
            .unwrap();
        let names: Vec<_> = reg.get(derived).fields().map(|f| f.name().to_owned()).collect();
        assert_eq!(names, ["x", "y"]);
        assert_eq!(reg.get(derived).field("x").unwrap().host(), derived);
        assert_eq!(reg.get(derived).field("y").unwrap().host(), base);
    }
}

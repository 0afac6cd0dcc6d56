//! Declared field types.
//!
//! A [`TypeSpec`] is attached to every field descriptor and checked
//! structurally against resolved values at access time. Scalar checks are
//! self-contained; checks involving component types need the registry
//! (subclass walks, factory return types) and therefore live on
//! `ComponentTree` in the core crate.

use crate::id::ClassId;
use crate::value::ConfigValue;
use std::fmt;

/// The declared type of a component field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeSpec {
    /// Matches any value, including `Null`. Used for opaque payloads.
    Any,
    Bool,
    Int,
    /// Accepts both `Float` and `Int` values.
    Float,
    Str,
    /// A homogeneous list of the inner type.
    List(Box<TypeSpec>),
    /// A component (or abstract base) class. Satisfied by instances of
    /// any concrete subclass, or by factories whose declared return type
    /// satisfies it.
    Component(ClassId),
}

impl TypeSpec {
    /// Convenience constructor for list types.
    #[must_use]
    pub fn list_of(inner: TypeSpec) -> Self {
        Self::List(Box::new(inner))
    }

    /// Returns the target class when this is a component type.
    #[must_use]
    pub fn as_component(&self) -> Option<ClassId> {
        match self {
            Self::Component(id) => Some(*id),
            _ => None,
        }
    }

    /// Structural check for values that do not involve the registry.
    ///
    /// Returns `None` when the answer depends on registry state: either
    /// this spec is a component type, or the value is an instance handle
    /// (which may still satisfy a scalar spec via a factory return type —
    /// the tree-level check decides).
    #[must_use]
    pub fn check_scalar(&self, value: &ConfigValue) -> Option<bool> {
        if value.is_instance() {
            return None;
        }
        match self {
            Self::Any => Some(true),
            Self::Bool => Some(matches!(value, ConfigValue::Bool(_))),
            Self::Int => Some(matches!(value, ConfigValue::Int(_))),
            // Int literals are accepted where floats are declared; CLI
            // literals like `15` must satisfy float fields.
            Self::Float => Some(matches!(
                value,
                ConfigValue::Float(_) | ConfigValue::Int(_)
            )),
            Self::Str => Some(matches!(value, ConfigValue::Str(_))),
            Self::List(inner) => match value {
                ConfigValue::List(items) => {
                    let mut all = true;
                    for item in items {
                        match inner.check_scalar(item) {
                            Some(ok) => all &= ok,
                            None => return None,
                        }
                    }
                    Some(all)
                }
                _ => Some(false),
            },
            Self::Component(_) => None,
        }
    }
}

impl fmt::Display for TypeSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Any => write!(f, "any"),
            Self::Bool => write!(f, "bool"),
            Self::Int => write!(f, "int"),
            Self::Float => write!(f, "float"),
            Self::Str => write!(f, "str"),
            Self::List(inner) => write!(f, "list[{inner}]"),
            Self::Component(id) => write!(f, "component<{id}>"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::id::InstanceId;

    #[test]
    fn scalar_checks() {
        assert_eq!(TypeSpec::Int.check_scalar(&ConfigValue::Int(1)), Some(true));
        assert_eq!(
            TypeSpec::Int.check_scalar(&ConfigValue::Str("1".into())),
            Some(false)
        );
        assert_eq!(
            TypeSpec::Str.check_scalar(&ConfigValue::Str("x".into())),
            Some(true)
        );
        assert_eq!(
            TypeSpec::Bool.check_scalar(&ConfigValue::Bool(true)),
            Some(true)
        );
    }

    #[test]
    fn float_accepts_int() {
        assert_eq!(
            TypeSpec::Float.check_scalar(&ConfigValue::Int(15)),
            Some(true)
        );
        assert_eq!(
            TypeSpec::Float.check_scalar(&ConfigValue::Float(2.71)),
            Some(true)
        );
        assert_eq!(
            TypeSpec::Int.check_scalar(&ConfigValue::Float(2.71)),
            Some(false)
        );
    }

    #[test]
    fn any_accepts_null() {
        assert_eq!(TypeSpec::Any.check_scalar(&ConfigValue::Null), Some(true));
        assert_eq!(TypeSpec::Int.check_scalar(&ConfigValue::Null), Some(false));
    }

    #[test]
    fn list_checks_elements() {
        let ints = TypeSpec::list_of(TypeSpec::Int);
        assert_eq!(
            ints.check_scalar(&ConfigValue::List(vec![
                ConfigValue::Int(1),
                ConfigValue::Int(2)
            ])),
            Some(true)
        );
        assert_eq!(
            ints.check_scalar(&ConfigValue::List(vec![
                ConfigValue::Int(1),
                ConfigValue::Str("x".into())
            ])),
            Some(false)
        );
        assert_eq!(ints.check_scalar(&ConfigValue::Int(1)), Some(false));
    }

    #[test]
    fn registry_dependent_checks_are_deferred() {
        let c = TypeSpec::Component(ClassId::from_index(0));
        assert_eq!(c.check_scalar(&ConfigValue::Int(1)), None);
        assert_eq!(
            TypeSpec::Int.check_scalar(&ConfigValue::Instance(InstanceId::from_index(0))),
            None
        );
    }

    #[test]
    fn display_forms() {
        assert_eq!(TypeSpec::list_of(TypeSpec::Float).to_string(), "list[float]");
        assert_eq!(
            TypeSpec::Component(ClassId::from_index(3)).to_string(),
            "component<class#3>"
        );
    }
}

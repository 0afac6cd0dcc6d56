//! The dynamic value type held by component fields.
//!
//! Field values are scalars, lists of scalars, or handles to component
//! instances living in the tree arena. Scalar values bridge to and from
//! [`serde_json::Value`] so that flattened configuration snapshots can be
//! exported as JSON and CLI literals can be parsed with serde_json.

use crate::id::InstanceId;
use std::fmt;
use thiserror::Error;

/// Error converting between JSON and [`ConfigValue`].
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConvertError {
    /// JSON objects cannot become field values; configuration nesting is
    /// expressed with dotted keys, not nested objects.
    #[error("JSON objects are not valid field values; use dotted keys for nesting (got {0})")]
    UnsupportedJson(String),
}

impl crate::ErrorCode for ConvertError {
    fn code(&self) -> &'static str {
        match self {
            Self::UnsupportedJson(_) => "VALUE_UNSUPPORTED_JSON",
        }
    }

    fn is_recoverable(&self) -> bool {
        true
    }
}

/// A configurable field value.
///
/// # Example
///
/// ```
/// use lattice_types::ConfigValue;
///
/// let v: ConfigValue = 15.into();
/// assert_eq!(v, ConfigValue::Int(15));
/// assert_eq!(v.type_name(), "int");
/// ```
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigValue {
    /// The absent value. Satisfies only `TypeSpec::Any`.
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
    /// A list of scalar values.
    List(Vec<ConfigValue>),
    /// A handle to a component instance in the tree arena.
    Instance(InstanceId),
}

impl ConfigValue {
    /// Returns a short name for the value's runtime type, for error
    /// messages.
    #[must_use]
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Bool(_) => "bool",
            Self::Int(_) => "int",
            Self::Float(_) => "float",
            Self::Str(_) => "str",
            Self::List(_) => "list",
            Self::Instance(_) => "component instance",
        }
    }

    /// Returns the instance handle if this value is a component instance.
    #[must_use]
    pub fn as_instance(&self) -> Option<InstanceId> {
        match self {
            Self::Instance(id) => Some(*id),
            _ => None,
        }
    }

    /// Returns `true` if this value is a component instance handle.
    #[must_use]
    pub fn is_instance(&self) -> bool {
        matches!(self, Self::Instance(_))
    }

    /// Converts a JSON value into a field value.
    ///
    /// Integral numbers become [`ConfigValue::Int`], other numbers
    /// [`ConfigValue::Float`]. Objects are rejected.
    pub fn from_json(json: serde_json::Value) -> Result<Self, ConvertError> {
        match json {
            serde_json::Value::Null => Ok(Self::Null),
            serde_json::Value::Bool(b) => Ok(Self::Bool(b)),
            serde_json::Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    Ok(Self::Int(i))
                } else {
                    // Out-of-range u64s also land here, as floats.
                    Ok(Self::Float(n.as_f64().unwrap_or(f64::NAN)))
                }
            }
            serde_json::Value::String(s) => Ok(Self::Str(s)),
            serde_json::Value::Array(items) => {
                let converted = items
                    .into_iter()
                    .map(Self::from_json)
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(Self::List(converted))
            }
            serde_json::Value::Object(map) => Err(ConvertError::UnsupportedJson(
                serde_json::Value::Object(map).to_string(),
            )),
        }
    }

    /// Converts this value to JSON.
    ///
    /// Instance handles have no meaning outside their arena and are
    /// rendered as placeholder strings; snapshot export replaces them
    /// with class names before calling this.
    #[must_use]
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            Self::Null => serde_json::Value::Null,
            Self::Bool(b) => serde_json::Value::Bool(*b),
            Self::Int(i) => serde_json::Value::Number((*i).into()),
            Self::Float(f) => serde_json::Number::from_f64(*f)
                .map(serde_json::Value::Number)
                .unwrap_or(serde_json::Value::Null),
            Self::Str(s) => serde_json::Value::String(s.clone()),
            Self::List(items) => {
                serde_json::Value::Array(items.iter().map(Self::to_json).collect())
            }
            Self::Instance(id) => serde_json::Value::String(format!("<{id}>")),
        }
    }
}

impl fmt::Display for ConfigValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => write!(f, "null"),
            Self::Bool(b) => write!(f, "{b}"),
            Self::Int(i) => write!(f, "{i}"),
            Self::Float(v) => write!(f, "{v}"),
            Self::Str(s) => write!(f, "\"{s}\""),
            Self::List(items) => {
                write!(f, "[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{item}")?;
                }
                write!(f, "]")
            }
            Self::Instance(id) => write!(f, "<{id}>"),
        }
    }
}

impl From<bool> for ConfigValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<i64> for ConfigValue {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<i32> for ConfigValue {
    fn from(value: i32) -> Self {
        Self::Int(value.into())
    }
}

impl From<f64> for ConfigValue {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl From<&str> for ConfigValue {
    fn from(value: &str) -> Self {
        Self::Str(value.to_owned())
    }
}

impl From<String> for ConfigValue {
    fn from(value: String) -> Self {
        Self::Str(value)
    }
}

impl From<InstanceId> for ConfigValue {
    fn from(value: InstanceId) -> Self {
        Self::Instance(value)
    }
}

impl From<Vec<ConfigValue>> for ConfigValue {
    fn from(value: Vec<ConfigValue>) -> Self {
        Self::List(value)
    }
}

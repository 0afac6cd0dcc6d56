//! Flattening and rendering of configured trees.
//!
//! [`ComponentTree::flatten`] exposes a component and its sub-components
//! as dotted-path key/value pairs: sub-component values are replaced by
//! their class name at the parent key and their own fields continue
//! under `parentKey.childField`; a factory instance occupying a scalar
//! slot appears as its built value. The resulting [`Snapshot`] is
//! itself valid configuration input: feeding it to `configure` on a
//! fresh tree of the same classes reconstructs equivalent observable
//! values.
//!
//! Fields without an in-scope value are left out; in particular an
//! `allow_missing` field appears only when it was actually given a
//! value.
//!
//! [`render`](ComponentTree::render) and
//! [`render_compact`](ComponentTree::render_compact) produce the
//! human-readable tree view, substituting `<inherited value>` /
//! `<inherited component instance>` where the resolved value is the one
//! visible on the nearest ancestor declaring the same field, and
//! `<missing>` for absent `allow_missing` fields.

use crate::error::ComponentError;
use crate::tree::ComponentTree;
use lattice_types::{Conf, ConfigValue, InstanceId};
use std::fmt;

const INDENT: &str = "    ";

/// A configured subtree flattened to dotted keys, in field declaration
/// order.
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    entries: Vec<(String, ConfigValue)>,
}

impl Snapshot {
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ConfigValue)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<&ConfigValue> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    /// The snapshot as configuration input.
    #[must_use]
    pub fn conf(&self) -> Conf {
        self.entries
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect()
    }

    /// The snapshot as a flat JSON object.
    #[must_use]
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::Value::Object(
            self.entries
                .iter()
                .map(|(k, v)| (k.clone(), v.to_json()))
                .collect(),
        )
    }
}

impl fmt::Display for Snapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, (k, v)) in self.entries.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{k}={v}")?;
        }
        Ok(())
    }
}

/// How a field resolved for snapshot/render purposes.
enum Resolved {
    Value(ConfigValue),
    Absent,
}

impl ComponentTree {
    fn resolve_for_view(
        &mut self,
        id: InstanceId,
        field: &str,
    ) -> Result<Resolved, ComponentError> {
        match self.get_raw(id, field) {
            Ok(v) => Ok(Resolved::Value(v)),
            Err(e)
                if e.is_value_absence()
                    || matches!(
                        e,
                        ComponentError::UnconfiguredComponentField { .. }
                            | ComponentError::NoCandidates { .. }
                    ) =>
            {
                Ok(Resolved::Absent)
            }
            Err(e) => Err(e),
        }
    }

    /// The number of fields on `id` that currently resolve to a value.
    pub fn field_count(&mut self, id: InstanceId) -> Result<usize, ComponentError> {
        let names = self.field_names(id);
        let mut count = 0;
        for name in names {
            if matches!(self.resolve_for_view(id, &name)?, Resolved::Value(_)) {
                count += 1;
            }
        }
        Ok(count)
    }

    /// Whether `field` currently resolves to a value on `id`.
    pub fn has_value(&mut self, id: InstanceId, field: &str) -> Result<bool, ComponentError> {
        Ok(matches!(
            self.resolve_for_view(id, field)?,
            Resolved::Value(_)
        ))
    }

    fn field_names(&self, id: InstanceId) -> Vec<String> {
        self.registry()
            .get(self.class_of(id))
            .fields()
            .map(|f| f.name().to_owned())
            .collect()
    }

    /// Flatten `id` and its sub-components to dotted key/value pairs.
    pub fn flatten(&mut self, id: InstanceId) -> Result<Snapshot, ComponentError> {
        let mut entries = Vec::new();
        self.flatten_into(id, "", &mut entries)?;
        Ok(Snapshot { entries })
    }

    fn flatten_into(
        &mut self,
        id: InstanceId,
        prefix: &str,
        entries: &mut Vec<(String, ConfigValue)>,
    ) -> Result<(), ComponentError> {
        let fields: Vec<crate::field::FieldDef> = self
            .registry()
            .get(self.class_of(id))
            .fields()
            .cloned()
            .collect();
        for fd in &fields {
            let Resolved::Value(value) = self.resolve_for_view(id, fd.name())? else {
                continue;
            };
            let key = format!("{prefix}{}", fd.name());
            match value {
                ConfigValue::Instance(child) if fd.is_component() => {
                    let class_name = self
                        .registry()
                        .class_name(self.class_of(child))
                        .to_owned();
                    entries.push((key.clone(), ConfigValue::Str(class_name)));
                    self.flatten_into(child, &format!("{key}."), entries)?;
                }
                ConfigValue::Instance(child) => {
                    // A factory standing in for a scalar; dotted keys
                    // under a value field would not reconfigure, so the
                    // snapshot holds the built value.
                    entries.push((key, self.build(child)?));
                }
                other => entries.push((key, other)),
            }
        }
        Ok(())
    }

    /// Render the tree under `id`, one field per line.
    pub fn render(&mut self, id: InstanceId) -> Result<String, ComponentError> {
        self.render_node(id, 0, false)
    }

    /// Render the tree under `id` on a single line.
    pub fn render_compact(&mut self, id: InstanceId) -> Result<String, ComponentError> {
        self.render_node(id, 0, true)
    }

    /// Whether the resolved value equals the one visible on the nearest
    /// ancestor declaring the same field.
    fn is_inherited(
        &mut self,
        id: InstanceId,
        field: &str,
        value: &ConfigValue,
    ) -> Result<bool, ComponentError> {
        let mut cur = self.parent_of(id);
        while let Some(anc) = cur {
            if self.registry().get(self.class_of(anc)).field(field).is_some() {
                return Ok(match self.resolve_for_view(anc, field)? {
                    Resolved::Value(av) => av == *value,
                    Resolved::Absent => false,
                });
            }
            cur = self.parent_of(anc);
        }
        Ok(false)
    }

    fn render_node(
        &mut self,
        id: InstanceId,
        depth: usize,
        compact: bool,
    ) -> Result<String, ComponentError> {
        if !self.is_configured(id) {
            return Ok(format!(
                "<Unconfigured component '{}' instance>",
                self.name_of(id)
            ));
        }
        let class_name = self
            .registry()
            .class_name(self.class_of(id))
            .to_owned();

        let mut parts = Vec::new();
        for name in self.field_names(id) {
            let rendered = match self.resolve_for_view(id, &name)? {
                Resolved::Absent => "<missing>".to_owned(),
                Resolved::Value(value) => {
                    if self.is_inherited(id, &name, &value)? {
                        if value.is_instance() {
                            "<inherited component instance>".to_owned()
                        } else {
                            "<inherited value>".to_owned()
                        }
                    } else if let Some(child) = value.as_instance() {
                        self.render_node(child, depth + 1, compact)?
                    } else {
                        value.to_string()
                    }
                }
            };
            parts.push((name, rendered));
        }

        if compact {
            let joined = parts
                .iter()
                .map(|(k, v)| format!("{k}={v}"))
                .collect::<Vec<_>>()
                .join(", ");
            return Ok(format!("{class_name}({joined})"));
        }

        let pad = INDENT.repeat(depth + 1);
        let close_pad = INDENT.repeat(depth);
        let joined = parts
            .iter()
            .map(|(k, v)| format!("{pad}{k} = {v}"))
            .collect::<Vec<_>>()
            .join(",\n");
        Ok(format!("{class_name}(\n{joined},\n{close_pad})"))
    }
}

//! Breadth-first configuration.
//!
//! [`ComponentTree::configure`] walks the component tree from the root
//! with an explicit FIFO queue. Each queue entry carries the instance,
//! the configuration scoped to it, and the set of field names already
//! holding values somewhere on the path from the root (its *scope*).
//!
//! For every declared field of a dequeued instance, the first matching
//! rule wins:
//!
//! 1. a configuration value under the plain field name (strings naming
//!    a candidate class are instantiated for component fields);
//! 2. a value in scope, supplied by an ancestor;
//! 3. the field allows missing values;
//! 4. a component field whose type has exactly one eligible class is
//!    auto-instantiated, with a warning;
//! 5. an interactive prompt, when one was supplied;
//! 6. otherwise the configuration is incomplete and an error names the
//!    field and its type.
//!
//! Keys that match nothing on the dequeued instance are rejected with
//! guidance about dotted scoping. Sub-components are then enqueued with
//! the configuration scoped to their field name and the union of the
//! parent's scope and its own field names. Configuration is strictly
//! one-shot per root; instances reachable through two fields are
//! configured on first dequeue and skipped afterwards.
//!
//! Each instance's post-configure hook runs right after the instance is
//! marked configured, before its children are dequeued; field writes
//! stay open for the duration of the hook.

use crate::error::ComponentError;
use crate::field::FieldDef;
use crate::prompt::Prompt;
use crate::tree::ComponentTree;
use lattice_types::{key, Conf, ConfigValue, InstanceId};
use std::collections::{BTreeSet, VecDeque};

/// Options for [`ComponentTree::configure_with`].
#[derive(Default)]
pub struct ConfigureOptions<'p> {
    /// Display name for the root instance; sub-components get dotted
    /// names underneath it.
    pub name: Option<String>,
    /// Interactive source for unresolved fields.
    pub prompt: Option<&'p mut dyn Prompt>,
}

struct QueueItem {
    id: InstanceId,
    conf: Conf,
    scope: BTreeSet<String>,
}

impl ComponentTree {
    /// Configure `root` and its whole subtree from `conf`.
    /// Non-interactive; see [`configure_with`](Self::configure_with).
    pub fn configure(&mut self, root: InstanceId, conf: Conf) -> Result<(), ComponentError> {
        self.configure_with(root, conf, ConfigureOptions::default())
    }

    /// Configure `root` and its whole subtree from `conf`, with a root
    /// name and/or an interactive prompt.
    pub fn configure_with(
        &mut self,
        root: InstanceId,
        conf: Conf,
        mut options: ConfigureOptions<'_>,
    ) -> Result<(), ComponentError> {
        if self.is_configured(root) {
            return Err(ComponentError::AlreadyConfigured(
                self.name_of(root).to_owned(),
            ));
        }
        if let Some(name) = options.name.take() {
            self.node_mut(root).name = name;
        }

        let mut queue = VecDeque::new();
        queue.push_back(QueueItem {
            id: root,
            conf,
            scope: BTreeSet::new(),
        });
        while let Some(item) = queue.pop_front() {
            // An instance reachable through two component fields is
            // enqueued twice; the first dequeue configures it.
            if self.is_configured(item.id) {
                continue;
            }
            self.configure_one(item, &mut queue, &mut options)?;
        }
        Ok(())
    }

    fn configure_one(
        &mut self,
        item: QueueItem,
        queue: &mut VecDeque<QueueItem>,
        options: &mut ConfigureOptions<'_>,
    ) -> Result<(), ComponentError> {
        let QueueItem {
            id,
            mut conf,
            mut scope,
        } = item;
        let registry = self.registry_handle();
        let class = self.class_of(id);
        let fields: Vec<FieldDef> = registry.get(class).fields().cloned().collect();

        if let Some(hook) = registry.get(class).pre_configure.clone() {
            hook(self, id, &mut conf)?;
        }

        // Fields with a default or an instance value count as in scope
        // from the start.
        for fd in &fields {
            if fd.has_default() || self.node(id).instantiated.contains_key(fd.name()) {
                scope.insert(fd.name().to_owned());
            }
        }

        for fd in &fields {
            let full = format!("{}.{}", self.name_of(id), fd.name());

            if let Some(value) = conf.remove(fd.name()) {
                let value = self.resolve_conf_value(fd, value)?;
                self.store_configured(id, fd.name(), value)?;
            } else if scope.contains(fd.name()) {
                continue;
            } else if fd.allow_missing() {
                // Legitimately absent; still part of the scope handed to
                // sub-components, so a same-named descendant field defers
                // its error to access time.
            } else if fd.is_component() && registry.candidates(fd.ty()).len() == 1 {
                let cls = registry.candidates(fd.ty())[0];
                tracing::warn!(
                    field = %full,
                    class = registry.class_name(cls),
                    "only one class satisfies the field type; using it by default"
                );
                let child = self.instantiate(cls, Conf::new())?;
                self.store_configured(id, fd.name(), ConfigValue::Instance(child))?;
            } else if options.prompt.is_some() {
                let value = self.prompt_for(fd, &full, options)?;
                self.store_configured(id, fd.name(), value)?;
            } else {
                return Err(self.unresolved_error(fd, &full));
            }
            scope.insert(fd.name().to_owned());
        }

        // Every remaining key must target a sub-component through a
        // dotted path.
        for key_name in conf.keys() {
            let recognized = match key::split_head(key_name) {
                Some((head, _)) => registry
                    .get(class)
                    .field(head)
                    .is_some_and(FieldDef::is_component),
                None => false,
            };
            if !recognized {
                return Err(ComponentError::UnrecognizedKey {
                    key: key_name.to_owned(),
                    component: self.name_of(id).to_owned(),
                });
            }
        }

        self.node_mut(id).configured = true;
        self.node_mut(id).in_scope = scope.clone();

        if let Some(hook) = registry.get(class).post_configure.clone() {
            self.node_mut(id).post_configure_open = true;
            let result = hook(self, id);
            self.node_mut(id).post_configure_open = false;
            result?;
        }

        for fd in &fields {
            if !fd.is_component() {
                continue;
            }
            let Some(child) = self.local_sub_component(id, fd)? else {
                continue;
            };
            if self.is_configured(child) {
                continue;
            }
            let child_name = format!("{}.{}", self.name_of(id), fd.name());
            self.node_mut(child).parent = Some(id);
            self.node_mut(child).name = child_name;
            queue.push_back(QueueItem {
                id: child,
                conf: conf.scoped(fd.name()),
                scope: scope.clone(),
            });
        }
        Ok(())
    }

    /// Interpret a configuration value for a field: strings naming an
    /// eligible class of a component field become fresh instances.
    fn resolve_conf_value(
        &mut self,
        fd: &FieldDef,
        value: ConfigValue,
    ) -> Result<ConfigValue, ComponentError> {
        if fd.is_component() {
            if let ConfigValue::Str(name) = &value {
                if let Some(cls) = self.registry().match_candidate(fd.ty(), name) {
                    let child = self.instantiate(cls, Conf::new())?;
                    return Ok(ConfigValue::Instance(child));
                }
            }
        }
        Ok(value)
    }

    /// Write a value assigned by the configuration pass.
    fn store_configured(
        &mut self,
        id: InstanceId,
        field: &str,
        value: ConfigValue,
    ) -> Result<(), ComponentError> {
        if let ConfigValue::Instance(child) = value {
            if self.is_configured(child) {
                return Err(ComponentError::SubComponentAlreadyConfigured {
                    field: field.to_owned(),
                    name: self.name_of(child).to_owned(),
                });
            }
        }
        let node = self.node_mut(id);
        node.cache.remove(field);
        node.configured_values.insert(field.to_owned(), value);
        Ok(())
    }

    fn prompt_for(
        &mut self,
        fd: &FieldDef,
        full: &str,
        options: &mut ConfigureOptions<'_>,
    ) -> Result<ConfigValue, ComponentError> {
        let registry = self.registry_handle();
        let prompt = options
            .prompt
            .as_deref_mut()
            .ok_or_else(|| ComponentError::PromptFailed("no prompt available".to_owned()))?;
        if fd.is_component() {
            let candidates: Vec<_> = registry
                .candidates(fd.ty())
                .into_iter()
                .map(|cls| (cls, registry.class_name(cls).to_owned()))
                .collect();
            if candidates.is_empty() {
                return Err(ComponentError::NoCandidates {
                    field: full.to_owned(),
                    ty: registry.type_name(fd.ty()),
                });
            }
            let cls = prompt.subclass(full, &candidates)?;
            let child = self.instantiate(cls, Conf::new())?;
            Ok(ConfigValue::Instance(child))
        } else {
            prompt.value(full, &registry.type_name(fd.ty()))
        }
    }

    /// The configuration-is-incomplete error for `fd`.
    fn unresolved_error(&self, fd: &FieldDef, full: &str) -> ComponentError {
        let ty = self.registry().type_name(fd.ty());
        if fd.is_component() {
            let candidates = self.registry().candidate_names(fd.ty());
            if candidates.is_empty() {
                ComponentError::NoCandidates {
                    field: full.to_owned(),
                    ty,
                }
            } else {
                ComponentError::UnconfiguredComponentField {
                    field: full.to_owned(),
                    ty,
                    candidates,
                }
            }
        } else {
            ComponentError::MissingValue {
                field: full.to_owned(),
                ty,
            }
        }
    }

    /// The sub-component held locally by `fd` on `id`, instantiating
    /// the field default if that is where the value comes from.
    /// `Ok(None)` when the field is scope-inherited, legitimately
    /// absent, or holds a non-instance value.
    fn local_sub_component(
        &mut self,
        id: InstanceId,
        fd: &FieldDef,
    ) -> Result<Option<InstanceId>, ComponentError> {
        if let Some(v) = self.node(id).configured_values.get(fd.name()) {
            return Ok(v.as_instance());
        }
        // Configured ancestor values outrank the local default, same as
        // the accessor's source order; that subtree is enqueued where it
        // is held.
        let mut cur = self.node(id).parent;
        while let Some(anc) = cur {
            if self.node(anc).configured_values.contains_key(fd.name()) {
                return Ok(None);
            }
            cur = self.node(anc).parent;
        }
        if self.node(id).in_scope.contains(fd.name())
            && !self.node(id).instantiated.contains_key(fd.name())
            && !fd.has_default()
        {
            // An ancestor supplies the value; that subtree is enqueued
            // where it is held.
            return Ok(None);
        }
        if let Some(v) = self.node(id).instantiated.get(fd.name()) {
            return Ok(v.as_instance());
        }
        if fd.has_default() {
            let value = fd.eval_default(self, id)?;
            if let Some(child) = value.as_instance() {
                self.node_mut(id)
                    .instantiated
                    .insert(fd.name().to_owned(), value);
                return Ok(Some(child));
            }
            return Ok(None);
        }
        Ok(None)
    }
}

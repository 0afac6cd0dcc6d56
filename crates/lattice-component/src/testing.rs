//! Test doubles for interactive configuration.

use crate::error::ComponentError;
use crate::prompt::Prompt;
use lattice_types::{ClassId, ConfigValue};
use std::collections::VecDeque;

/// A [`Prompt`] answering from pre-scripted queues, recording every
/// field it was asked about.
///
/// Values and class picks are consumed in order; running out of script
/// fails the prompt, which keeps a test from hanging on an unexpected
/// question.
#[derive(Debug, Default)]
pub struct ScriptedPrompt {
    values: VecDeque<ConfigValue>,
    picks: VecDeque<String>,
    asked: Vec<String>,
}

impl ScriptedPrompt {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue an answer for the next plain-value question.
    #[must_use]
    pub fn push_value(mut self, value: impl Into<ConfigValue>) -> Self {
        self.values.push_back(value.into());
        self
    }

    /// Queue a class name for the next subclass question.
    #[must_use]
    pub fn push_pick(mut self, class_name: &str) -> Self {
        self.picks.push_back(class_name.to_owned());
        self
    }

    /// The fields asked about, in order.
    #[must_use]
    pub fn asked(&self) -> &[String] {
        &self.asked
    }
}

impl Prompt for ScriptedPrompt {
    fn value(&mut self, field: &str, _ty: &str) -> Result<ConfigValue, ComponentError> {
        self.asked.push(field.to_owned());
        self.values
            .pop_front()
            .ok_or_else(|| ComponentError::PromptFailed(format!("no scripted value for '{field}'")))
    }

    fn subclass(
        &mut self,
        field: &str,
        candidates: &[(ClassId, String)],
    ) -> Result<ClassId, ComponentError> {
        self.asked.push(field.to_owned());
        let pick = self.picks.pop_front().ok_or_else(|| {
            ComponentError::PromptFailed(format!("no scripted pick for '{field}'"))
        })?;
        candidates
            .iter()
            .find(|(_, name)| *name == pick)
            .map(|(id, _)| *id)
            .ok_or_else(|| {
                ComponentError::PromptFailed(format!(
                    "scripted pick '{pick}' is not a candidate for '{field}'"
                ))
            })
    }
}

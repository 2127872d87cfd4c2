//! Port interfaces for the generation domain

use async_trait::async_trait;
use std::path::Path;

use crate::core::error::{Error, Result};
use crate::infrastructure::templates::{ConfigSetting, ResourceType};

/// Validation callback for free-text input: `None` accepts, `Some(msg)` rejects
pub type InputValidator<'a> = &'a (dyn Fn(&str) -> Option<String> + Send + Sync);

/// One entry of a single-select prompt
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PickOption {
    pub label: String,
    pub description: Option<String>,
}

impl PickOption {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            description: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// Parameters of a free-text prompt
pub struct InputOptions<'a> {
    pub prompt: &'a str,
    /// Value pre-filled in the input box
    pub value: Option<&'a str>,
    pub validate: Option<InputValidator<'a>>,
}

impl<'a> InputOptions<'a> {
    pub fn new(prompt: &'a str) -> Self {
        Self {
            prompt,
            value: None,
            validate: None,
        }
    }

    pub fn value(mut self, value: Option<&'a str>) -> Self {
        self.value = value;
        self
    }

    pub fn validate(mut self, validate: InputValidator<'a>) -> Self {
        self.validate = Some(validate);
        self
    }
}

/// Interactive surface the workflow talks to
///
/// Both calls fail with [`Error::UserCancelled`] when the user backs out.
/// `input` only returns a value the validator accepted; rejected entries are
/// re-asked by the implementation.
#[async_trait]
pub trait Prompter: Send + Sync {
    /// Ask the user to choose one option; returns its index
    async fn pick(&self, placeholder: &str, options: &[PickOption]) -> Result<usize>;

    /// Ask the user for a line of text
    async fn input(&self, options: InputOptions<'_>) -> Result<String>;
}

/// Pick one of `items` and return the value attached to it
pub async fn pick_item<T: Clone + Send + Sync>(
    prompter: &dyn Prompter,
    placeholder: &str,
    items: &[(PickOption, T)],
) -> Result<T> {
    let options: Vec<PickOption> = items.iter().map(|(option, _)| option.clone()).collect();
    let index = prompter.pick(placeholder, &options).await?;
    items
        .get(index)
        .map(|(_, value)| value.clone())
        .ok_or_else(|| Error::rejected("selection", format!("no option at index {index}")))
}

/// Resolves settings that reference an external resource, e.g. a storage
/// account connection, into the value stored in the binding
#[async_trait]
pub trait AppSettingsResolver: Send + Sync {
    async fn resolve(
        &self,
        project_root: &Path,
        resource_type: ResourceType,
        setting: &ConfigSetting,
    ) -> Result<String>;
}

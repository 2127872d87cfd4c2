//! `catalog.yml` parsing
//!
//! The catalog file lists every template with its metadata and every binding
//! setting definition. Template files themselves live in one directory per
//! template next to the catalog file.

use regex::Regex;
use serde::Deserialize;

use crate::core::error::{Error, Result};
use crate::generation::{Language, Runtime};
use crate::infrastructure::templates::{
    ConfigSetting, EnumValue, ResourceType, SettingKind, ValidationRule,
};

/// Internal representation matching the catalog YAML structure
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct CatalogData {
    #[serde(default)]
    pub templates: Vec<TemplateData>,
    #[serde(default)]
    pub settings: Vec<SettingData>,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct TemplateData {
    pub id: String,
    pub name: String,
    pub language: String,
    /// Runtimes the template supports; empty means all
    #[serde(default)]
    pub runtimes: Vec<String>,
    #[serde(default)]
    pub categories: Vec<String>,
    #[serde(default)]
    pub verified: bool,
    pub default_function_name: String,
    #[serde(default)]
    pub user_prompted_settings: Vec<String>,
    /// Directory holding `function.json` and the template files; defaults to the id
    #[serde(default)]
    pub directory: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct SettingData {
    pub binding_type: String,
    pub name: String,
    pub label: String,
    #[serde(default)]
    pub value_type: String,
    #[serde(default)]
    pub resource: Option<String>,
    #[serde(default)]
    pub default_value: Option<String>,
    /// Runtimes the definition applies to; empty means all
    #[serde(default)]
    pub runtimes: Vec<String>,
    #[serde(default, rename = "enum")]
    pub enum_values: Vec<EnumValueData>,
    #[serde(default)]
    pub validators: Vec<ValidatorData>,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct EnumValueData {
    pub value: String,
    pub display: String,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ValidatorData {
    pub expression: String,
    pub error_text: String,
}

pub(crate) fn parse_catalog_yaml(content: &str) -> Result<CatalogData> {
    Ok(serde_yaml::from_str(content)?)
}

pub(crate) fn parse_runtimes(values: &[String]) -> Result<Vec<Runtime>> {
    if values.is_empty() {
        return Ok(vec![Runtime::V1, Runtime::V2]);
    }
    values.iter().map(|v| v.parse()).collect()
}

impl TemplateData {
    pub fn language(&self) -> Result<Language> {
        self.language
            .parse()
            .map_err(|_| Error::catalog(format!("Template '{}' has unknown language '{}'", self.id, self.language)))
    }

    pub fn directory(&self) -> &str {
        self.directory.as_deref().unwrap_or(&self.id)
    }
}

fn parse_resource(value: &str) -> Result<ResourceType> {
    match value.to_lowercase().as_str() {
        "storage" | "storageaccount" => Ok(ResourceType::Storage),
        "documentdb" | "cosmosdb" => Ok(ResourceType::DocumentDb),
        "eventhub" => Ok(ResourceType::EventHub),
        "servicebus" => Ok(ResourceType::ServiceBus),
        other => Err(Error::catalog(format!("Unknown resource type '{other}'"))),
    }
}

impl SettingData {
    /// Whether this definition applies to the given runtime
    pub fn applies_to(&self, runtime: Runtime) -> Result<bool> {
        Ok(parse_runtimes(&self.runtimes)?.contains(&runtime))
    }

    pub fn to_setting(&self) -> Result<ConfigSetting> {
        let kind = if let Some(resource) = &self.resource {
            SettingKind::ResourceReference(parse_resource(resource)?)
        } else {
            match self.value_type.to_lowercase().as_str() {
                "boolean" => SettingKind::Boolean,
                "enum" => SettingKind::Enumerated(
                    self.enum_values
                        .iter()
                        .map(|e| EnumValue {
                            value: e.value.clone(),
                            display_name: e.display.clone(),
                        })
                        .collect(),
                ),
                // Unknown value types are prompted as free-form strings
                _ => SettingKind::String,
            }
        };

        let validators = self
            .validators
            .iter()
            .map(|v| {
                let expression = Regex::new(&v.expression).map_err(|e| {
                    Error::catalog(format!(
                        "Invalid validator for setting '{}': {e}",
                        self.name
                    ))
                })?;
                Ok(ValidationRule {
                    expression,
                    error_text: v.error_text.clone(),
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(ConfigSetting {
            name: self.name.clone(),
            binding_type: self.binding_type.clone(),
            label: self.label.clone(),
            kind,
            default_value: self.default_value.clone(),
            validators,
        })
    }
}

//! Core template types for the infrastructure layer
//!
//! These types are storage-agnostic: a catalog implementation builds them once
//! and the workflow only ever reads them.

use regex::Regex;
use serde_json::{Map, Value as JsonValue};
use std::path::{Path, PathBuf};

use crate::core::error::{Error, Result};
use crate::generation::{Language, ResolvedSettings, Runtime, TemplateFilter};

/// Binding type of HTTP triggered functions
pub const HTTP_TRIGGER_TYPE: &str = "httpTrigger";

/// The `function.json` of a template with its trigger binding located
#[derive(Debug, Clone, PartialEq)]
pub struct FunctionConfig {
    function_json: JsonValue,
    in_binding_index: Option<usize>,
}

impl FunctionConfig {
    /// Build from a parsed `function.json` document
    pub fn from_json(function_json: JsonValue) -> Result<Self> {
        let bindings = function_json
            .get("bindings")
            .and_then(JsonValue::as_array)
            .ok_or_else(|| Error::catalog("function.json is missing a 'bindings' array"))?;

        let is_in = |b: &JsonValue| {
            b.get("direction")
                .and_then(JsonValue::as_str)
                .is_some_and(|d| d.eq_ignore_ascii_case("in"))
        };
        let is_trigger = |b: &JsonValue| {
            b.get("type")
                .and_then(JsonValue::as_str)
                .is_some_and(|t| t.to_lowercase().ends_with("trigger"))
        };

        let in_binding_index = bindings
            .iter()
            .position(|b| is_in(b) && is_trigger(b))
            .or_else(|| bindings.iter().position(is_in));

        Ok(Self {
            function_json,
            in_binding_index,
        })
    }

    /// The trigger (input) binding, if the template declares one
    pub fn in_binding(&self) -> Option<&Map<String, JsonValue>> {
        let index = self.in_binding_index?;
        self.function_json
            .get("bindings")?
            .as_array()?
            .get(index)?
            .as_object()
    }

    fn in_binding_mut(&mut self) -> Option<&mut Map<String, JsonValue>> {
        let index = self.in_binding_index?;
        self.function_json
            .get_mut("bindings")?
            .as_array_mut()?
            .get_mut(index)?
            .as_object_mut()
    }

    /// Type of the trigger binding, e.g. `timerTrigger`
    pub fn in_binding_type(&self) -> Option<&str> {
        self.in_binding()?.get("type")?.as_str()
    }

    pub fn is_http_trigger(&self) -> bool {
        self.in_binding_type()
            .is_some_and(|t| t.eq_ignore_ascii_case(HTTP_TRIGGER_TYPE))
    }

    /// Current value of a trigger binding property rendered as a string
    pub fn in_binding_value(&self, name: &str) -> Option<String> {
        match self.in_binding()?.get(name)? {
            JsonValue::Null => None,
            JsonValue::String(s) if s.is_empty() => None,
            JsonValue::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        }
    }

    /// Write a resolved value into the trigger binding
    pub fn set_in_binding_value(&mut self, name: &str, value: &str) {
        if let Some(binding) = self.in_binding_mut() {
            binding.insert(name.to_string(), JsonValue::String(value.to_string()));
        }
    }

    pub fn function_json(&self) -> &JsonValue {
        &self.function_json
    }
}

/// Kind of external resource a setting points at
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceType {
    Storage,
    DocumentDb,
    EventHub,
    ServiceBus,
}

impl ResourceType {
    pub fn display_name(&self) -> &'static str {
        match self {
            ResourceType::Storage => "Storage Account",
            ResourceType::DocumentDb => "Cosmos DB Account",
            ResourceType::EventHub => "Event Hub",
            ResourceType::ServiceBus => "Service Bus Namespace",
        }
    }
}

/// One choice of an enumerated setting
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnumValue {
    /// Value persisted into the binding
    pub value: String,
    /// Label shown in the picker
    pub display_name: String,
}

/// Prompt strategy of a setting
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SettingKind {
    ResourceReference(ResourceType),
    Boolean,
    Enumerated(Vec<EnumValue>),
    String,
}

/// A regex a string value must match, with the message shown when it does not
#[derive(Debug, Clone)]
pub struct ValidationRule {
    pub expression: Regex,
    pub error_text: String,
}

impl PartialEq for ValidationRule {
    fn eq(&self, other: &Self) -> bool {
        self.expression.as_str() == other.expression.as_str() && self.error_text == other.error_text
    }
}

/// Definition of one user-prompted binding setting
#[derive(Debug, Clone, PartialEq)]
pub struct ConfigSetting {
    pub name: String,
    pub binding_type: String,
    pub label: String,
    pub kind: SettingKind,
    pub default_value: Option<String>,
    pub validators: Vec<ValidationRule>,
}

/// Type of template file
#[derive(Debug, Clone, PartialEq)]
pub enum TemplateFileType {
    /// Rendered with tera; the target drops the `.tera` suffix
    Template,
    /// Copied verbatim
    Static,
}

/// A single template file - storage agnostic representation
#[derive(Debug, Clone, PartialEq)]
pub struct TemplateFile {
    /// Path relative to the template directory
    pub path: PathBuf,
    pub content: String,
    pub file_type: TemplateFileType,
}

impl TemplateFile {
    /// Build a file entry, classifying it by its extension
    pub fn new(path: impl Into<PathBuf>, content: impl Into<String>) -> Self {
        let path = path.into();
        let file_type = if path.extension().is_some_and(|e| e == "tera") {
            TemplateFileType::Template
        } else {
            TemplateFileType::Static
        };
        Self {
            path,
            content: content.into(),
            file_type,
        }
    }

    /// Path of the file once materialized
    pub fn target_path(&self) -> PathBuf {
        match self.file_type {
            TemplateFileType::Template => self.path.with_extension(""),
            TemplateFileType::Static => self.path.clone(),
        }
    }
}

/// A function template as loaded from a catalog
#[derive(Debug, Clone, PartialEq)]
pub struct Template {
    pub id: String,
    pub name: String,
    pub language: Language,
    pub runtimes: Vec<Runtime>,
    pub categories: Vec<String>,
    pub verified: bool,
    pub default_function_name: String,
    pub user_prompted_settings: Vec<String>,
    pub function_config: FunctionConfig,
    pub files: Vec<TemplateFile>,
}

impl Template {
    /// Whether this template is offered for the given selection
    pub fn is_eligible(&self, language: Language, runtime: Runtime, filter: TemplateFilter) -> bool {
        if self.language != language || !self.runtimes.contains(&runtime) {
            return false;
        }
        match filter {
            TemplateFilter::All => true,
            TemplateFilter::Core => self
                .categories
                .iter()
                .any(|c| c.eq_ignore_ascii_case("core")),
            TemplateFilter::Verified => self.verified,
        }
    }

    /// Write this template's files into `target_dir`
    ///
    /// `function.json` is always written from `function_config`, which carries
    /// the resolved binding values. Returns the paths written.
    pub async fn materialize(
        &self,
        target_dir: &Path,
        function_config: &FunctionConfig,
        function_name: &str,
        settings: &ResolvedSettings,
    ) -> Result<Vec<PathBuf>> {
        super::renderer::materialize(self, target_dir, function_config, function_name, settings)
            .await
    }
}

//! Resolution of template-declared binding settings

use std::collections::HashMap;
use std::path::Path;
use tracing::{debug, warn};

use crate::core::error::{Error, Result};
use crate::generation::{
    AppSettingsResolver, ContextUpdate, InputOptions, PickOption, Prompter, ResolvedSettings,
    Runtime, pick_item,
};
use crate::infrastructure::templates::{ConfigSetting, SettingKind, Template, TemplateCatalog};

const TRUE: &str = "true";
const FALSE: &str = "false";

/// Validation of a single value against its setting definition
pub struct SettingValidator<'a> {
    setting: &'a ConfigSetting,
}

impl<'a> SettingValidator<'a> {
    pub fn new(setting: &'a ConfigSetting) -> Self {
        Self { setting }
    }

    /// `None` when `value` is acceptable, otherwise the message to show
    pub fn validate(&self, value: &str) -> Option<String> {
        match &self.setting.kind {
            SettingKind::Boolean => (value != TRUE && value != FALSE).then(|| {
                format!("{} must be \"{TRUE}\" or \"{FALSE}\".", self.setting.label)
            }),
            SettingKind::Enumerated(values) => {
                if values.iter().any(|v| v.value == value) {
                    None
                } else {
                    let allowed: Vec<&str> = values.iter().map(|v| v.value.as_str()).collect();
                    Some(format!(
                        "{} must be one of: {}.",
                        self.setting.label,
                        allowed.join(", ")
                    ))
                }
            }
            SettingKind::ResourceReference(_) => None,
            SettingKind::String => self
                .setting
                .validators
                .iter()
                .find(|rule| !rule.expression.is_match(value))
                .map(|rule| rule.error_text.clone()),
        }
    }
}

/// Resolves each setting a template asks the user for
pub struct SettingsResolver<'a> {
    catalog: &'a dyn TemplateCatalog,
    prompter: &'a dyn Prompter,
    app_settings: &'a dyn AppSettingsResolver,
}

impl<'a> SettingsResolver<'a> {
    pub fn new(
        catalog: &'a dyn TemplateCatalog,
        prompter: &'a dyn Prompter,
        app_settings: &'a dyn AppSettingsResolver,
    ) -> Self {
        Self {
            catalog,
            prompter,
            app_settings,
        }
    }

    /// Resolve every user-prompted setting of `template`, in declaration order
    ///
    /// Values in `presets` are validated and used instead of prompting. A
    /// setting the catalog has no definition for is skipped.
    pub async fn resolve_all(
        &self,
        project_root: &Path,
        template: &Template,
        runtime: Runtime,
        presets: &HashMap<String, String>,
    ) -> Result<(ResolvedSettings, ContextUpdate)> {
        let binding_type = template.function_config.in_binding_type().unwrap_or_default();
        let mut resolved = ResolvedSettings::new();
        let mut skipped = 0usize;

        for name in &template.user_prompted_settings {
            let Some(setting) = self.catalog.setting(runtime, binding_type, name).await? else {
                warn!(
                    template_id = %template.id,
                    binding_type = %binding_type,
                    setting = %name,
                    "No definition for setting; skipping"
                );
                skipped += 1;
                continue;
            };

            let value = match presets.get(name) {
                Some(preset) => {
                    if let Some(message) = SettingValidator::new(&setting).validate(preset) {
                        return Err(Error::rejected(name.as_str(), message));
                    }
                    preset.clone()
                }
                None => self.resolve(project_root, template, &setting).await?,
            };
            debug!(setting = %name, "Resolved setting");
            resolved.insert(name.as_str(), value);
        }

        let mut unused: Vec<&str> = presets
            .keys()
            .map(String::as_str)
            .filter(|key| {
                !template
                    .user_prompted_settings
                    .iter()
                    .any(|name| name.as_str() == *key)
            })
            .collect();
        unused.sort_unstable();
        for key in unused {
            warn!(
                template_id = %template.id,
                setting = %key,
                "Preset does not match any setting of the template; ignoring"
            );
        }

        let update = ContextUpdate::new()
            .set("settingsResolved", resolved.len())
            .set("settingsSkipped", skipped);
        Ok((resolved, update))
    }

    /// Prompt for one setting using the strategy its kind calls for
    pub async fn resolve(
        &self,
        project_root: &Path,
        template: &Template,
        setting: &ConfigSetting,
    ) -> Result<String> {
        match &setting.kind {
            SettingKind::ResourceReference(resource_type) => {
                self.app_settings
                    .resolve(project_root, *resource_type, setting)
                    .await
            }
            SettingKind::Boolean => {
                let items = [
                    (PickOption::new(TRUE), TRUE.to_string()),
                    (PickOption::new(FALSE), FALSE.to_string()),
                ];
                pick_item(self.prompter, &setting.label, &items).await
            }
            SettingKind::Enumerated(values) => {
                if values.is_empty() {
                    return Err(Error::catalog(format!(
                        "Setting '{}' declares no values to choose from",
                        setting.name
                    )));
                }
                let items: Vec<(PickOption, String)> = values
                    .iter()
                    .map(|v| (PickOption::new(v.display_name.as_str()), v.value.clone()))
                    .collect();
                pick_item(self.prompter, &setting.label, &items).await
            }
            SettingKind::String => {
                let default_value = template
                    .function_config
                    .in_binding_value(&setting.name)
                    .or_else(|| setting.default_value.clone());
                let validator = SettingValidator::new(setting);
                let validate = |value: &str| validator.validate(value);

                self.prompter
                    .input(
                        InputOptions::new(&setting.label)
                            .value(default_value.as_deref())
                            .validate(&validate),
                    )
                    .await
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generation::Language;
    use crate::infrastructure::prompt::{PromptRecord, ScriptedAnswer, ScriptedPrompter};
    use crate::infrastructure::templates::{
        EnumValue, FunctionConfig, ResourceType, ValidationRule,
    };
    use crate::generation::TemplateFilter;
    use async_trait::async_trait;
    use regex::Regex;
    use serde_json::json;
    use std::sync::Mutex;
    use tracing_test::traced_test;

    fn setting(name: &str, kind: SettingKind) -> ConfigSetting {
        ConfigSetting {
            name: name.to_string(),
            binding_type: "queueTrigger".to_string(),
            label: name.to_string(),
            kind,
            default_value: None,
            validators: vec![],
        }
    }

    fn queue_template(settings: &[&str]) -> Template {
        Template {
            id: "QueueTrigger-JavaScript".to_string(),
            name: "Queue trigger".to_string(),
            language: Language::JavaScript,
            runtimes: vec![Runtime::V2],
            categories: vec![],
            verified: true,
            default_function_name: "QueueTrigger".to_string(),
            user_prompted_settings: settings.iter().map(|s| s.to_string()).collect(),
            function_config: FunctionConfig::from_json(json!({
                "bindings": [
                    { "type": "queueTrigger", "direction": "in", "name": "item", "queueName": "js-queue-items" }
                ]
            }))
            .unwrap(),
            files: vec![],
        }
    }

    struct StaticCatalog {
        settings: Vec<ConfigSetting>,
    }

    #[async_trait]
    impl TemplateCatalog for StaticCatalog {
        async fn eligible_templates(
            &self,
            _language: Language,
            _runtime: Runtime,
            _filter: TemplateFilter,
        ) -> Result<Vec<Template>> {
            Ok(vec![])
        }

        async fn setting(
            &self,
            _runtime: Runtime,
            binding_type: &str,
            name: &str,
        ) -> Result<Option<ConfigSetting>> {
            Ok(self
                .settings
                .iter()
                .find(|s| s.binding_type == binding_type && s.name == name)
                .cloned())
        }
    }

    #[derive(Default)]
    struct RecordingAppSettings {
        calls: Mutex<Vec<ResourceType>>,
    }

    #[async_trait]
    impl AppSettingsResolver for RecordingAppSettings {
        async fn resolve(
            &self,
            _project_root: &Path,
            resource_type: ResourceType,
            _setting: &ConfigSetting,
        ) -> Result<String> {
            self.calls.lock().unwrap().push(resource_type);
            Ok("mystorage_STORAGE".to_string())
        }
    }

    fn schedule_setting() -> ConfigSetting {
        ConfigSetting {
            validators: vec![ValidationRule {
                expression: Regex::new(r"^\S+( \S+){5}$").unwrap(),
                error_text: "Enter a six field CRON expression".to_string(),
            }],
            ..setting("schedule", SettingKind::String)
        }
    }

    #[test]
    fn test_setting_validator_string_rules() {
        let schedule = schedule_setting();
        let validator = SettingValidator::new(&schedule);
        assert!(validator.validate("0 */5 * * * *").is_none());
        assert_eq!(
            validator.validate("every minute").as_deref(),
            Some("Enter a six field CRON expression")
        );

        let free = setting("path", SettingKind::String);
        assert!(SettingValidator::new(&free).validate("").is_none());
    }

    #[test]
    fn test_setting_validator_boolean_and_enum() {
        let flag = setting("flag", SettingKind::Boolean);
        assert!(SettingValidator::new(&flag).validate("true").is_none());
        assert!(SettingValidator::new(&flag).validate("false").is_none());
        assert!(SettingValidator::new(&flag).validate("yes").is_some());

        let level = setting(
            "authLevel",
            SettingKind::Enumerated(vec![EnumValue {
                value: "function".to_string(),
                display_name: "Function".to_string(),
            }]),
        );
        assert!(SettingValidator::new(&level).validate("function").is_none());
        assert!(SettingValidator::new(&level).validate("Function").is_some());
    }

    #[tokio::test]
    async fn test_boolean_resolves_to_literal() {
        let catalog = StaticCatalog { settings: vec![] };
        let app_settings = RecordingAppSettings::default();
        let template = queue_template(&[]);
        let flag = setting("flag", SettingKind::Boolean);

        for label in [TRUE, FALSE] {
            let prompter = ScriptedPrompter::new([ScriptedAnswer::pick(label)]);
            let resolver = SettingsResolver::new(&catalog, &prompter, &app_settings);
            let value = resolver
                .resolve(Path::new("/proj"), &template, &flag)
                .await
                .unwrap();
            assert_eq!(value, label);
        }
    }

    #[tokio::test]
    async fn test_enum_resolves_to_machine_value() {
        let catalog = StaticCatalog { settings: vec![] };
        let app_settings = RecordingAppSettings::default();
        let template = queue_template(&[]);
        let level = setting(
            "authLevel",
            SettingKind::Enumerated(vec![
                EnumValue {
                    value: "function".to_string(),
                    display_name: "Function".to_string(),
                },
                EnumValue {
                    value: "anonymous".to_string(),
                    display_name: "Anonymous".to_string(),
                },
            ]),
        );
        let prompter = ScriptedPrompter::new([ScriptedAnswer::pick("Anonymous")]);
        let resolver = SettingsResolver::new(&catalog, &prompter, &app_settings);

        let value = resolver
            .resolve(Path::new("/proj"), &template, &level)
            .await
            .unwrap();
        assert_eq!(value, "anonymous");
    }

    #[tokio::test]
    async fn test_string_reprompts_until_valid() {
        let catalog = StaticCatalog { settings: vec![] };
        let app_settings = RecordingAppSettings::default();
        let template = queue_template(&[]);
        let prompter = ScriptedPrompter::new([
            ScriptedAnswer::input("every minute"),
            ScriptedAnswer::input("not cron"),
            ScriptedAnswer::input("0 0 * * * *"),
        ]);
        let resolver = SettingsResolver::new(&catalog, &prompter, &app_settings);

        let value = resolver
            .resolve(Path::new("/proj"), &template, &schedule_setting())
            .await
            .unwrap();
        assert_eq!(value, "0 0 * * * *");

        let rejections = prompter
            .transcript()
            .into_iter()
            .filter(|r| matches!(r, PromptRecord::Rejected { .. }))
            .count();
        assert_eq!(rejections, 2);
    }

    #[tokio::test]
    async fn test_string_default_prefers_binding_value() {
        let catalog = StaticCatalog { settings: vec![] };
        let app_settings = RecordingAppSettings::default();
        let template = queue_template(&[]);
        let queue_name = ConfigSetting {
            default_value: Some("fallback".to_string()),
            ..setting("queueName", SettingKind::String)
        };
        let path = ConfigSetting {
            default_value: Some("samples-workitems".to_string()),
            ..setting("path", SettingKind::String)
        };
        let prompter =
            ScriptedPrompter::new([ScriptedAnswer::AcceptDefault, ScriptedAnswer::AcceptDefault]);
        let resolver = SettingsResolver::new(&catalog, &prompter, &app_settings);

        let from_binding = resolver
            .resolve(Path::new("/proj"), &template, &queue_name)
            .await
            .unwrap();
        let from_setting = resolver
            .resolve(Path::new("/proj"), &template, &path)
            .await
            .unwrap();
        assert_eq!(from_binding, "js-queue-items");
        assert_eq!(from_setting, "samples-workitems");
    }

    #[tokio::test]
    async fn test_resource_reference_delegates() {
        let catalog = StaticCatalog { settings: vec![] };
        let app_settings = RecordingAppSettings::default();
        let prompter = ScriptedPrompter::default();
        let resolver = SettingsResolver::new(&catalog, &prompter, &app_settings);
        let connection = setting(
            "connection",
            SettingKind::ResourceReference(ResourceType::Storage),
        );

        let value = resolver
            .resolve(Path::new("/proj"), &queue_template(&[]), &connection)
            .await
            .unwrap();
        assert_eq!(value, "mystorage_STORAGE");
        assert_eq!(*app_settings.calls.lock().unwrap(), vec![ResourceType::Storage]);
        assert!(prompter.transcript().is_empty());
    }

    #[traced_test]
    #[tokio::test]
    async fn test_resolve_all_skips_unknown_and_keeps_order() {
        let catalog = StaticCatalog {
            settings: vec![
                setting("queueName", SettingKind::String),
                setting(
                    "connection",
                    SettingKind::ResourceReference(ResourceType::Storage),
                ),
            ],
        };
        let app_settings = RecordingAppSettings::default();
        let template = queue_template(&["connection", "undocumented", "queueName"]);
        let prompter = ScriptedPrompter::new([ScriptedAnswer::input("orders")]);
        let resolver = SettingsResolver::new(&catalog, &prompter, &app_settings);

        let (resolved, update) = resolver
            .resolve_all(Path::new("/proj"), &template, Runtime::V2, &HashMap::new())
            .await
            .unwrap();

        let entries: Vec<(&str, &str)> = resolved.iter().collect();
        assert_eq!(
            entries,
            vec![("connection", "mystorage_STORAGE"), ("queueName", "orders")]
        );
        assert_eq!(update.get("settingsSkipped"), Some("1"));
        assert!(logs_contain("No definition for setting; skipping"));
    }

    #[tokio::test]
    async fn test_resolve_all_uses_and_validates_presets() {
        let catalog = StaticCatalog {
            settings: vec![schedule_setting()],
        };
        let app_settings = RecordingAppSettings::default();
        let mut template = queue_template(&["schedule"]);
        template.function_config = FunctionConfig::from_json(json!({
            "bindings": [ { "type": "queueTrigger", "direction": "in", "name": "t" } ]
        }))
        .unwrap();
        let prompter = ScriptedPrompter::default();
        let resolver = SettingsResolver::new(&catalog, &prompter, &app_settings);

        let presets = HashMap::from([("schedule".to_string(), "0 0 * * * *".to_string())]);
        let (resolved, _) = resolver
            .resolve_all(Path::new("/proj"), &template, Runtime::V2, &presets)
            .await
            .unwrap();
        assert_eq!(resolved.get("schedule"), Some("0 0 * * * *"));
        assert!(prompter.transcript().is_empty());

        let presets = HashMap::from([("schedule".to_string(), "hourly".to_string())]);
        let result = resolver
            .resolve_all(Path::new("/proj"), &template, Runtime::V2, &presets)
            .await;
        assert!(matches!(
            result,
            Err(Error::ValidationRejected { ref field, .. }) if field == "schedule"
        ));
    }

    #[traced_test]
    #[tokio::test]
    async fn test_resolve_all_warns_on_unmatched_preset() {
        let catalog = StaticCatalog {
            settings: vec![setting("queueName", SettingKind::String)],
        };
        let app_settings = RecordingAppSettings::default();
        let template = queue_template(&["queueName"]);
        let prompter = ScriptedPrompter::new([ScriptedAnswer::input("orders")]);
        let resolver = SettingsResolver::new(&catalog, &prompter, &app_settings);
        let presets = HashMap::from([("queuename".to_string(), "typo".to_string())]);

        let (resolved, _) = resolver
            .resolve_all(Path::new("/proj"), &template, Runtime::V2, &presets)
            .await
            .unwrap();

        assert_eq!(resolved.get("queueName"), Some("orders"));
        assert_eq!(prompter.remaining(), 0);
        assert!(logs_contain("Preset does not match any setting of the template"));
        assert!(logs_contain("queuename"));
    }

    #[tokio::test]
    async fn test_cancel_propagates() {
        let catalog = StaticCatalog {
            settings: vec![setting("queueName", SettingKind::String)],
        };
        let app_settings = RecordingAppSettings::default();
        let prompter = ScriptedPrompter::new([ScriptedAnswer::Cancel]);
        let resolver = SettingsResolver::new(&catalog, &prompter, &app_settings);

        let result = resolver
            .resolve_all(
                Path::new("/proj"),
                &queue_template(&["queueName"]),
                Runtime::V2,
                &HashMap::new(),
            )
            .await;
        assert!(matches!(result, Err(Error::UserCancelled)));
    }
}

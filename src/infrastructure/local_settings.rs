//! Adapters backed by the project's `local.settings.json`
//!
//! The file holds the app settings a function project runs with locally:
//!
//! ```json
//! { "IsEncrypted": false, "Values": { "AzureWebJobsStorage": "" } }
//! ```

use async_trait::async_trait;
use serde_json::{Map, Value as JsonValue, json};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::fs;
use tracing::{debug, info};

use crate::core::error::{Error, Result};
use crate::generation::{AppSettingsResolver, InputOptions, PickOption, Prompter, pick_item};
use crate::application::{LOCAL_SETTINGS_FILE, StorageValidator};
use crate::infrastructure::templates::{ConfigSetting, ResourceType};

/// App setting the Functions host reads its storage connection from
pub const AZURE_WEB_JOBS_STORAGE: &str = "AzureWebJobsStorage";
/// Connection string that points the host at the local storage emulator
pub const LOCAL_EMULATOR_CONNECTION: &str = "UseDevelopmentStorage=true";

const VALUES_KEY: &str = "Values";

/// In-memory copy of `local.settings.json`
#[derive(Debug, Clone)]
pub struct LocalSettings {
    path: PathBuf,
    document: JsonValue,
}

impl LocalSettings {
    /// Read the settings file of `project_root`; a missing file reads as empty
    pub async fn load(project_root: &Path) -> Result<Self> {
        let path = project_root.join(LOCAL_SETTINGS_FILE);
        let document = if path.exists() {
            let content = fs::read_to_string(&path).await?;
            serde_json::from_str(&content)?
        } else {
            json!({ "IsEncrypted": false, "Values": {} })
        };
        if !document.is_object() {
            return Err(Error::config(format!(
                "{} must contain a JSON object",
                path.display()
            )));
        }
        Ok(Self { path, document })
    }

    fn values(&self) -> Option<&Map<String, JsonValue>> {
        self.document.get(VALUES_KEY).and_then(JsonValue::as_object)
    }

    /// Non-empty string value of an app setting
    pub fn value(&self, name: &str) -> Option<&str> {
        self.values()?
            .get(name)
            .and_then(JsonValue::as_str)
            .filter(|v| !v.is_empty())
    }

    /// Names of all app settings, in file order
    pub fn names(&self) -> Vec<String> {
        self.values()
            .map(|values| values.keys().cloned().collect())
            .unwrap_or_default()
    }

    pub fn set_value(&mut self, name: &str, value: &str) {
        if let Some(document) = self.document.as_object_mut() {
            let values = document
                .entry(VALUES_KEY)
                .or_insert_with(|| JsonValue::Object(Map::new()));
            if !values.is_object() {
                *values = JsonValue::Object(Map::new());
            }
            if let Some(values) = values.as_object_mut() {
                values.insert(name.to_string(), JsonValue::String(value.to_string()));
            }
        }
    }

    pub async fn save(&self) -> Result<()> {
        let mut content = serde_json::to_string_pretty(&self.document)?;
        content.push('\n');
        fs::write(&self.path, content).await?;
        debug!(path = %self.path.display(), "Saved local settings");
        Ok(())
    }
}

fn require_value(value: &str) -> Option<String> {
    value
        .trim()
        .is_empty()
        .then(|| "A value is required.".to_string())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum StorageChoice {
    ConnectionString,
    Emulator,
    Cancel,
}

/// Ensures `AzureWebJobsStorage` is set before non-HTTP functions are added
pub struct LocalSettingsStorageValidator {
    prompter: Arc<dyn Prompter>,
}

impl LocalSettingsStorageValidator {
    pub fn new(prompter: Arc<dyn Prompter>) -> Self {
        Self { prompter }
    }
}

#[async_trait]
impl StorageValidator for LocalSettingsStorageValidator {
    async fn ensure_storage(&self, project_root: &Path) -> Result<()> {
        let mut settings = LocalSettings::load(project_root).await?;
        if settings.value(AZURE_WEB_JOBS_STORAGE).is_some() {
            return Ok(());
        }

        let items = [
            (
                PickOption::new("Enter a connection string"),
                StorageChoice::ConnectionString,
            ),
            (
                PickOption::new("Use local storage emulator")
                    .with_description(LOCAL_EMULATOR_CONNECTION),
                StorageChoice::Emulator,
            ),
            (PickOption::new("Cancel"), StorageChoice::Cancel),
        ];
        let placeholder = format!(
            "\"{AZURE_WEB_JOBS_STORAGE}\" must be set to a storage connection for all triggers other than HTTP"
        );
        let connection = match pick_item(self.prompter.as_ref(), &placeholder, &items).await? {
            StorageChoice::ConnectionString => {
                self.prompter
                    .input(
                        InputOptions::new("Storage account connection string")
                            .validate(&require_value),
                    )
                    .await?
            }
            StorageChoice::Emulator => LOCAL_EMULATOR_CONNECTION.to_string(),
            StorageChoice::Cancel => return Err(Error::UserCancelled),
        };

        settings.set_value(AZURE_WEB_JOBS_STORAGE, &connection);
        settings.save().await?;
        info!("Saved {AZURE_WEB_JOBS_STORAGE} to {LOCAL_SETTINGS_FILE}");
        Ok(())
    }
}

/// Suggested app setting name for a new connection
fn suggested_setting_name(resource_type: ResourceType) -> &'static str {
    match resource_type {
        ResourceType::Storage => "mystorage_STORAGE",
        ResourceType::DocumentDb => "mycosmosdb_DOCUMENTDB",
        ResourceType::EventHub => "myeventhub_EVENTHUB",
        ResourceType::ServiceBus => "myservicebus_SERVICEBUS",
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum AppSettingChoice {
    Existing(String),
    New,
}

/// Resolves resource connections to app setting names in `local.settings.json`
///
/// The user either reuses an existing app setting or creates a new one with a
/// connection string. The binding stores the app setting name.
pub struct PromptingAppSettingsResolver {
    prompter: Arc<dyn Prompter>,
}

impl PromptingAppSettingsResolver {
    pub fn new(prompter: Arc<dyn Prompter>) -> Self {
        Self { prompter }
    }
}

#[async_trait]
impl AppSettingsResolver for PromptingAppSettingsResolver {
    async fn resolve(
        &self,
        project_root: &Path,
        resource_type: ResourceType,
        setting: &ConfigSetting,
    ) -> Result<String> {
        let mut settings = LocalSettings::load(project_root).await?;
        let prompter = self.prompter.as_ref();

        let existing = settings.names();
        let choice = if existing.is_empty() {
            AppSettingChoice::New
        } else {
            let mut items: Vec<(PickOption, AppSettingChoice)> = existing
                .into_iter()
                .map(|name| (PickOption::new(name.as_str()), AppSettingChoice::Existing(name)))
                .collect();
            items.push((
                PickOption::new("New app setting")
                    .with_description(format!("Add a {} connection", resource_type.display_name())),
                AppSettingChoice::New,
            ));
            pick_item(prompter, &setting.label, &items).await?
        };

        match choice {
            AppSettingChoice::Existing(name) => Ok(name),
            AppSettingChoice::New => {
                let name = prompter
                    .input(
                        InputOptions::new("App setting name")
                            .value(Some(suggested_setting_name(resource_type)))
                            .validate(&require_value),
                    )
                    .await?;
                let prompt = format!("{} connection string", resource_type.display_name());
                let connection = prompter
                    .input(InputOptions::new(&prompt).validate(&require_value))
                    .await?;

                settings.set_value(&name, &connection);
                settings.save().await?;
                info!(app_setting = %name, "Added app setting to {LOCAL_SETTINGS_FILE}");
                Ok(name)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::prompt::{ScriptedAnswer, ScriptedPrompter};
    use crate::infrastructure::templates::SettingKind;
    use tempfile::TempDir;

    fn connection_setting() -> ConfigSetting {
        ConfigSetting {
            name: "connection".to_string(),
            binding_type: "queueTrigger".to_string(),
            label: "Storage account connection".to_string(),
            kind: SettingKind::ResourceReference(ResourceType::Storage),
            default_value: None,
            validators: vec![],
        }
    }

    async fn read_values(dir: &Path) -> JsonValue {
        let content = fs::read_to_string(dir.join(LOCAL_SETTINGS_FILE)).await.unwrap();
        serde_json::from_str::<JsonValue>(&content).unwrap()[VALUES_KEY].clone()
    }

    #[tokio::test]
    async fn test_storage_already_set() {
        let dir = TempDir::new().unwrap();
        std::fs::write(
            dir.path().join(LOCAL_SETTINGS_FILE),
            r#"{ "IsEncrypted": false, "Values": { "AzureWebJobsStorage": "UseDevelopmentStorage=true" } }"#,
        )
        .unwrap();
        let prompter = Arc::new(ScriptedPrompter::default());

        LocalSettingsStorageValidator::new(prompter.clone())
            .ensure_storage(dir.path())
            .await
            .unwrap();
        assert!(prompter.transcript().is_empty());
    }

    #[tokio::test]
    async fn test_storage_prompted_and_saved() {
        let dir = TempDir::new().unwrap();
        std::fs::write(
            dir.path().join(LOCAL_SETTINGS_FILE),
            r#"{ "IsEncrypted": false, "Values": { "AzureWebJobsStorage": "", "FUNCTIONS_WORKER_RUNTIME": "node" } }"#,
        )
        .unwrap();
        let prompter = Arc::new(ScriptedPrompter::new([
            ScriptedAnswer::pick("Enter a connection string"),
            ScriptedAnswer::input(""),
            ScriptedAnswer::input("DefaultEndpointsProtocol=https;AccountName=x"),
        ]));

        LocalSettingsStorageValidator::new(prompter)
            .ensure_storage(dir.path())
            .await
            .unwrap();

        let values = read_values(dir.path()).await;
        assert_eq!(
            values[AZURE_WEB_JOBS_STORAGE],
            "DefaultEndpointsProtocol=https;AccountName=x"
        );
        assert_eq!(values["FUNCTIONS_WORKER_RUNTIME"], "node");
    }

    #[tokio::test]
    async fn test_storage_emulator_creates_file() {
        let dir = TempDir::new().unwrap();
        let prompter = Arc::new(ScriptedPrompter::new([ScriptedAnswer::pick(
            "Use local storage emulator",
        )]));

        LocalSettingsStorageValidator::new(prompter)
            .ensure_storage(dir.path())
            .await
            .unwrap();

        let values = read_values(dir.path()).await;
        assert_eq!(values[AZURE_WEB_JOBS_STORAGE], LOCAL_EMULATOR_CONNECTION);
    }

    #[tokio::test]
    async fn test_storage_cancel() {
        let dir = TempDir::new().unwrap();
        let prompter = Arc::new(ScriptedPrompter::new([ScriptedAnswer::pick("Cancel")]));

        let result = LocalSettingsStorageValidator::new(prompter)
            .ensure_storage(dir.path())
            .await;
        assert!(matches!(result, Err(Error::UserCancelled)));
        assert!(!dir.path().join(LOCAL_SETTINGS_FILE).exists());
    }

    #[tokio::test]
    async fn test_app_setting_reuses_existing() {
        let dir = TempDir::new().unwrap();
        std::fs::write(
            dir.path().join(LOCAL_SETTINGS_FILE),
            r#"{ "Values": { "AzureWebJobsStorage": "x", "orders_STORAGE": "y" } }"#,
        )
        .unwrap();
        let prompter = Arc::new(ScriptedPrompter::new([ScriptedAnswer::pick("orders_STORAGE")]));

        let name = PromptingAppSettingsResolver::new(prompter)
            .resolve(dir.path(), ResourceType::Storage, &connection_setting())
            .await
            .unwrap();
        assert_eq!(name, "orders_STORAGE");
    }

    #[tokio::test]
    async fn test_app_setting_created() {
        let dir = TempDir::new().unwrap();
        let prompter = Arc::new(ScriptedPrompter::new([
            ScriptedAnswer::AcceptDefault,
            ScriptedAnswer::input("Endpoint=sb://bus/"),
        ]));

        let name = PromptingAppSettingsResolver::new(prompter)
            .resolve(dir.path(), ResourceType::ServiceBus, &connection_setting())
            .await
            .unwrap();

        assert_eq!(name, "myservicebus_SERVICEBUS");
        let values = read_values(dir.path()).await;
        assert_eq!(values["myservicebus_SERVICEBUS"], "Endpoint=sb://bus/");
    }
}

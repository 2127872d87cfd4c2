//! Filesystem-based template catalog
//!
//! Loads `catalog.yml` from a template directory, typically resolved from the
//! `--template-dir` flag, `FUNCGEN_TEMPLATE_DIR`, or the config file.

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::debug;

use super::manifest::{CatalogData, TemplateData, parse_catalog_yaml, parse_runtimes};
use crate::core::error::{Error, Result};
use crate::generation::{Language, Runtime, TemplateFilter};
use crate::infrastructure::templates::{
    ConfigSetting, FUNCTION_JSON, FunctionConfig, Template, TemplateCatalog, TemplateFile,
};

/// Name of the catalog index inside the template directory
pub const CATALOG_FILE: &str = "catalog.yml";

/// Template catalog backed by a directory on disk
pub struct FileSystemCatalog {
    root: PathBuf,
    data: CatalogData,
}

impl FileSystemCatalog {
    /// Read and parse the catalog index under `root`
    pub async fn load(root: &Path) -> Result<Self> {
        let index = root.join(CATALOG_FILE);
        if !index.exists() {
            return Err(Error::catalog(format!(
                "No {CATALOG_FILE} found in {}",
                root.display()
            )));
        }
        let content = fs::read_to_string(&index).await?;
        let data = parse_catalog_yaml(&content)?;
        debug!(
            path = %index.display(),
            templates = data.templates.len(),
            settings = data.settings.len(),
            "Loaded template catalog"
        );
        Ok(Self {
            root: root.to_path_buf(),
            data,
        })
    }

    async fn load_template(&self, entry: &TemplateData, language: Language) -> Result<Template> {
        let dir = self.root.join(entry.directory());
        let function_json = fs::read_to_string(dir.join(FUNCTION_JSON))
            .await
            .map_err(|e| {
                Error::catalog(format!(
                    "Template '{}' has no readable {FUNCTION_JSON}: {e}",
                    entry.id
                ))
            })?;
        let function_config = FunctionConfig::from_json(serde_json::from_str(&function_json)?)?;
        let files = load_template_files(&dir).await?;

        Ok(Template {
            id: entry.id.clone(),
            name: entry.name.clone(),
            language,
            runtimes: parse_runtimes(&entry.runtimes)?,
            categories: entry.categories.clone(),
            verified: entry.verified,
            default_function_name: entry.default_function_name.clone(),
            user_prompted_settings: entry.user_prompted_settings.clone(),
            function_config,
            files,
        })
    }
}

/// Load every file of a template directory except `function.json`
async fn load_template_files(dir: &Path) -> Result<Vec<TemplateFile>> {
    let mut files = Vec::new();
    let mut pending = vec![dir.to_path_buf()];

    while let Some(current) = pending.pop() {
        let mut entries = fs::read_dir(&current).await?;
        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            if entry.file_type().await?.is_dir() {
                pending.push(path);
                continue;
            }
            let relative = path
                .strip_prefix(dir)
                .map_err(|e| Error::catalog(e.to_string()))?
                .to_path_buf();
            if relative == Path::new(FUNCTION_JSON) {
                continue;
            }
            let content = fs::read_to_string(&path).await?;
            files.push(TemplateFile::new(relative, content));
        }
    }

    files.sort_by(|a, b| a.path.cmp(&b.path));
    Ok(files)
}

#[async_trait]
impl TemplateCatalog for FileSystemCatalog {
    async fn eligible_templates(
        &self,
        language: Language,
        runtime: Runtime,
        filter: TemplateFilter,
    ) -> Result<Vec<Template>> {
        let mut templates = Vec::new();
        for entry in &self.data.templates {
            let entry_language = entry.language()?;
            if entry_language != language {
                continue;
            }
            let template = self.load_template(entry, entry_language).await?;
            if template.is_eligible(language, runtime, filter) {
                templates.push(template);
            }
        }
        Ok(templates)
    }

    async fn setting(
        &self,
        runtime: Runtime,
        binding_type: &str,
        name: &str,
    ) -> Result<Option<ConfigSetting>> {
        for data in &self.data.settings {
            if data.binding_type.eq_ignore_ascii_case(binding_type)
                && data.name == name
                && data.applies_to(runtime)?
            {
                return data.to_setting().map(Some);
            }
        }
        Ok(None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::templates::{SettingKind, TemplateFileType};
    use tempfile::TempDir;

    async fn write_catalog(dir: &Path) {
        let catalog = r#"
templates:
  - id: HttpTrigger-JavaScript
    name: HTTP trigger
    language: JavaScript
    categories: [Core]
    verified: true
    default_function_name: HttpTrigger
    user_prompted_settings: [authLevel]
  - id: BlobTrigger-JavaScript
    name: Blob trigger
    language: JavaScript
    runtimes: ["~1"]
    default_function_name: BlobTrigger
    directory: blob
  - id: HttpTrigger-Python
    name: HTTP trigger
    language: Python
    default_function_name: HttpTrigger
settings:
  - binding_type: httpTrigger
    name: authLevel
    label: Authorization level
    value_type: enum
    enum:
      - value: function
        display: Function
"#;
        fs::write(dir.join(CATALOG_FILE), catalog).await.unwrap();

        let http = dir.join("HttpTrigger-JavaScript");
        fs::create_dir_all(http.join("lib")).await.unwrap();
        fs::write(
            http.join(FUNCTION_JSON),
            r#"{ "bindings": [ { "type": "httpTrigger", "direction": "in", "name": "req", "authLevel": "function" } ] }"#,
        )
        .await
        .unwrap();
        fs::write(http.join("index.js.tera"), "// {{ function_name }}").await.unwrap();
        fs::write(http.join("lib").join("helper.js"), "module.exports = {};").await.unwrap();

        let blob = dir.join("blob");
        fs::create_dir_all(&blob).await.unwrap();
        fs::write(
            blob.join(FUNCTION_JSON),
            r#"{ "bindings": [ { "type": "blobTrigger", "direction": "in", "name": "blob", "path": "" } ] }"#,
        )
        .await
        .unwrap();
    }

    #[tokio::test]
    async fn test_load_missing_catalog() {
        let dir = TempDir::new().unwrap();
        let result = FileSystemCatalog::load(dir.path()).await;
        assert!(matches!(result, Err(Error::Catalog(_))));
    }

    #[tokio::test]
    async fn test_eligible_templates_filters() {
        let dir = TempDir::new().unwrap();
        write_catalog(dir.path()).await;
        let catalog = FileSystemCatalog::load(dir.path()).await.unwrap();

        let verified = catalog
            .eligible_templates(Language::JavaScript, Runtime::V2, TemplateFilter::Verified)
            .await
            .unwrap();
        assert_eq!(verified.len(), 1);
        assert_eq!(verified[0].id, "HttpTrigger-JavaScript");
        assert!(verified[0].function_config.is_http_trigger());

        let files: Vec<_> = verified[0].files.iter().map(|f| f.path.clone()).collect();
        assert_eq!(
            files,
            vec![PathBuf::from("index.js.tera"), PathBuf::from("lib/helper.js")]
        );
        assert_eq!(verified[0].files[0].file_type, TemplateFileType::Template);

        let v1 = catalog
            .eligible_templates(Language::JavaScript, Runtime::V1, TemplateFilter::All)
            .await
            .unwrap();
        assert_eq!(v1.len(), 2);

        let none = catalog
            .eligible_templates(Language::Java, Runtime::V2, TemplateFilter::All)
            .await
            .unwrap();
        assert!(none.is_empty());
    }

    #[tokio::test]
    async fn test_setting_lookup() {
        let dir = TempDir::new().unwrap();
        write_catalog(dir.path()).await;
        let catalog = FileSystemCatalog::load(dir.path()).await.unwrap();

        let setting = catalog
            .setting(Runtime::V2, "httpTrigger", "authLevel")
            .await
            .unwrap()
            .unwrap();
        assert!(matches!(setting.kind, SettingKind::Enumerated(_)));

        let missing = catalog
            .setting(Runtime::V2, "timerTrigger", "schedule")
            .await
            .unwrap();
        assert!(missing.is_none());
    }
}

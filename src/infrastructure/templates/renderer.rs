//! Tera-based materialization of script templates

use std::path::{Path, PathBuf};
use tera::{Context, Tera};
use tokio::fs;
use tracing::debug;

use crate::core::error::Result;
use crate::generation::ResolvedSettings;
use crate::infrastructure::templates::{FunctionConfig, Template, TemplateFileType};

/// File name of the binding manifest written into every script function
pub const FUNCTION_JSON: &str = "function.json";

/// Build the tera context shared by every file of one function
fn render_context(function_name: &str, settings: &ResolvedSettings) -> Context {
    let mut context = Context::new();
    context.insert("function_name", function_name);
    let values: serde_json::Map<String, serde_json::Value> = settings
        .iter()
        .map(|(name, value)| (name.to_string(), serde_json::Value::from(value)))
        .collect();
    context.insert("settings", &values);
    context
}

pub(crate) async fn materialize(
    template: &Template,
    target_dir: &Path,
    function_config: &FunctionConfig,
    function_name: &str,
    settings: &ResolvedSettings,
) -> Result<Vec<PathBuf>> {
    fs::create_dir_all(target_dir).await?;

    // Create a new Tera instance for this template
    let mut tera = Tera::default();
    for file in &template.files {
        if file.file_type == TemplateFileType::Template {
            tera.add_raw_template(&file.path.to_string_lossy(), &file.content)?;
        }
    }
    let context = render_context(function_name, settings);

    let mut written = Vec::with_capacity(template.files.len() + 1);
    for file in &template.files {
        let target = target_dir.join(file.target_path());
        if target.file_name().is_some_and(|n| n == FUNCTION_JSON) {
            continue;
        }
        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent).await?;
        }

        let content = match file.file_type {
            TemplateFileType::Template => tera.render(&file.path.to_string_lossy(), &context)?,
            TemplateFileType::Static => file.content.clone(),
        };
        fs::write(&target, content).await?;
        debug!(path = %target.display(), "Wrote template file");
        written.push(target);
    }

    let function_json = target_dir.join(FUNCTION_JSON);
    let mut content = serde_json::to_string_pretty(function_config.function_json())?;
    content.push('\n');
    fs::write(&function_json, content).await?;
    written.push(function_json);

    Ok(written)
}

//! Configuration loading
//!
//! Settings come from up to three places, later ones winning:
//! the global `config.toml` under the user config directory, a `.funcgen.toml`
//! in the project root, and the `FUNCGEN_TEMPLATE_DIR` environment variable.
//! Command line flags are applied on top by the binary.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::core::error::{Error, Result};

/// Directory name under the platform config directory
pub const APP_DIR: &str = "funcgen";
/// Project-level override file
pub const PROJECT_CONFIG_FILE: &str = ".funcgen.toml";
/// Environment variable overriding the template directory
pub const TEMPLATE_DIR_ENV: &str = "FUNCGEN_TEMPLATE_DIR";

/// Defaults for the project being edited
///
/// Values are kept as text and parsed when the workflow resolves them, so a
/// typo is reported against the command that needs it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectConfig {
    pub language: Option<String>,
    pub runtime: Option<String>,
    pub template_filter: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TemplatesConfig {
    pub dir: Option<String>,
}

/// External tools
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ToolsConfig {
    pub maven: String,
    /// Command line run to initialize a project, split on whitespace
    pub init_command: String,
}

impl Default for ToolsConfig {
    fn default() -> Self {
        Self {
            maven: "mvn".to_string(),
            init_command: "func init".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct JavaConfig {
    pub default_package: String,
}

impl Default for JavaConfig {
    fn default() -> Self {
        Self {
            default_package: crate::generation::rules::DEFAULT_JAVA_PACKAGE.to_string(),
        }
    }
}

/// Main application configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub project: ProjectConfig,
    #[serde(default)]
    pub templates: TemplatesConfig,
    #[serde(default)]
    pub tools: ToolsConfig,
    #[serde(default)]
    pub java: JavaConfig,
}

impl Config {
    /// Expand `~` to home directory in a path string
    pub fn expand_tilde(path: &str) -> PathBuf {
        if let Some(stripped) = path.strip_prefix("~/") {
            if let Some(home) = dirs::home_dir() {
                return home.join(stripped);
            }
        }
        PathBuf::from(path)
    }

    /// Directory holding `catalog.yml` and the template folders
    pub fn template_dir(&self) -> PathBuf {
        match &self.templates.dir {
            Some(dir) => Self::expand_tilde(dir),
            None => default_template_dir(),
        }
    }

    /// Program and arguments of the project init command
    pub fn init_command(&self) -> Result<(String, Vec<String>)> {
        let mut parts = self.tools.init_command.split_whitespace().map(str::to_string);
        let program = parts
            .next()
            .ok_or_else(|| Error::config("tools.init_command is empty"))?;
        Ok((program, parts.collect()))
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct PartialToolsConfig {
    pub maven: Option<String>,
    pub init_command: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct PartialJavaConfig {
    pub default_package: Option<String>,
}

/// Project configuration where every field is optional.
/// Fields that are `None` inherit from the global config.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct PartialConfig {
    pub project: ProjectConfig,
    pub templates: TemplatesConfig,
    pub tools: PartialToolsConfig,
    pub java: PartialJavaConfig,
}

/// Merge a global config with a project-level partial config.
/// Project values override global values where present.
pub fn merge_config(global: &Config, project: &PartialConfig) -> Config {
    Config {
        project: ProjectConfig {
            language: project
                .project
                .language
                .clone()
                .or_else(|| global.project.language.clone()),
            runtime: project
                .project
                .runtime
                .clone()
                .or_else(|| global.project.runtime.clone()),
            template_filter: project
                .project
                .template_filter
                .clone()
                .or_else(|| global.project.template_filter.clone()),
        },
        templates: TemplatesConfig {
            dir: project
                .templates
                .dir
                .clone()
                .or_else(|| global.templates.dir.clone()),
        },
        tools: ToolsConfig {
            maven: project
                .tools
                .maven
                .clone()
                .unwrap_or_else(|| global.tools.maven.clone()),
            init_command: project
                .tools
                .init_command
                .clone()
                .unwrap_or_else(|| global.tools.init_command.clone()),
        },
        java: JavaConfig {
            default_package: project
                .java
                .default_package
                .clone()
                .unwrap_or_else(|| global.java.default_package.clone()),
        },
    }
}

/// Replace the template directory when the override is set and non-empty
pub fn apply_template_dir_override(mut config: Config, template_dir: Option<String>) -> Config {
    if let Some(dir) = template_dir.filter(|d| !d.trim().is_empty()) {
        debug!(template_dir = %dir, "Template directory overridden from environment");
        config.templates.dir = Some(dir);
    }
    config
}

/// Loaded configuration with the files it came from
#[derive(Debug, Clone)]
pub struct LoadedConfig {
    pub config: Config,
    pub config_path: Option<PathBuf>,
    pub project_config_path: Option<PathBuf>,
}

/// `<config dir>/funcgen`, if the platform has a config directory
pub fn app_config_dir() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join(APP_DIR))
}

/// Full path of the global config file
pub fn global_config_path() -> Option<PathBuf> {
    app_config_dir().map(|dir| dir.join("config.toml"))
}

/// Template directory used when none is configured
pub fn default_template_dir() -> PathBuf {
    app_config_dir()
        .map(|dir| dir.join("templates"))
        .unwrap_or_else(|| PathBuf::from("templates"))
}

/// Load configuration for the project at `project_root`
pub fn load_config(project_root: &Path) -> Result<LoadedConfig> {
    let loaded = load_config_from(global_config_path().as_deref(), project_root)?;
    let config =
        apply_template_dir_override(loaded.config, std::env::var(TEMPLATE_DIR_ENV).ok());
    Ok(LoadedConfig { config, ..loaded })
}

/// Load from an explicit global config path, without consulting the environment
pub fn load_config_from(global_path: Option<&Path>, project_root: &Path) -> Result<LoadedConfig> {
    let global = match global_path {
        Some(path) if path.exists() => {
            let contents = fs::read_to_string(path)?;
            let config: Config = toml::from_str(&contents)?;
            debug!(path = %path.display(), "Loaded global config");
            config
        }
        _ => Config::default(),
    };

    let project_path = project_root.join(PROJECT_CONFIG_FILE);
    let (config, project_config_path) = if project_path.exists() {
        let contents = fs::read_to_string(&project_path)?;
        let partial: PartialConfig = toml::from_str(&contents).map_err(|e| {
            Error::config(format!("Invalid {}: {e}", project_path.display()))
        })?;
        info!(path = %project_path.display(), "Loaded project config");
        (merge_config(&global, &partial), Some(project_path))
    } else {
        (global, None)
    };

    Ok(LoadedConfig {
        config,
        config_path: global_path.filter(|p| p.exists()).map(Path::to_path_buf),
        project_config_path,
    })
}

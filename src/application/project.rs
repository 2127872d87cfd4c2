//! Project shape check run before anything is generated

use std::path::Path;
use tracing::{info, warn};

use crate::application::ProjectInitializer;
use crate::core::error::{Error, Result};
use crate::generation::{ContextUpdate, PickOption, Prompter, pick_item};

pub const HOST_FILE: &str = "host.json";
pub const LOCAL_SETTINGS_FILE: &str = "local.settings.json";
pub const LAUNCH_FILE: &str = ".vscode/launch.json";

/// Files every function project is expected to have, relative to its root
pub const REQUIRED_PROJECT_FILES: [&str; 3] = [HOST_FILE, LOCAL_SETTINGS_FILE, LAUNCH_FILE];

/// What to do about a folder that is not a function project
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProjectRemediation {
    Initialize,
    Skip,
    Cancel,
}

impl ProjectRemediation {
    fn as_str(&self) -> &'static str {
        match self {
            Self::Initialize => "Initialize",
            Self::Skip => "Skip",
            Self::Cancel => "Cancel",
        }
    }
}

/// Required files missing under `project_root`
pub fn missing_project_files(project_root: &Path) -> Vec<&'static str> {
    REQUIRED_PROJECT_FILES
        .into_iter()
        .filter(|file| !project_root.join(file).exists())
        .collect()
}

pub struct ProjectValidator<'a> {
    prompter: &'a dyn Prompter,
    initializer: &'a dyn ProjectInitializer,
}

impl<'a> ProjectValidator<'a> {
    pub fn new(prompter: &'a dyn Prompter, initializer: &'a dyn ProjectInitializer) -> Self {
        Self {
            prompter,
            initializer,
        }
    }

    /// Check the project and, if it is incomplete, let the user decide
    pub async fn validate(&self, project_root: &Path) -> Result<ContextUpdate> {
        let missing = missing_project_files(project_root);
        if missing.is_empty() {
            return Ok(ContextUpdate::new().set("projectValid", true));
        }
        warn!(
            project_root = %project_root.display(),
            missing = ?missing,
            "Folder is not a complete function project"
        );

        let items = [
            (
                PickOption::new("Initialize project")
                    .with_description("Create the missing project files"),
                ProjectRemediation::Initialize,
            ),
            (
                PickOption::new("Skip for now"),
                ProjectRemediation::Skip,
            ),
            (PickOption::new("Cancel"), ProjectRemediation::Cancel),
        ];
        let placeholder = format!(
            "The selected folder is not a function project (missing {}). Initialize it?",
            missing.join(", ")
        );
        let choice = pick_item(self.prompter, &placeholder, &items).await?;

        match choice {
            ProjectRemediation::Initialize => {
                info!(project_root = %project_root.display(), "Initializing project");
                self.initializer.initialize(project_root).await?;
            }
            ProjectRemediation::Skip => {}
            ProjectRemediation::Cancel => return Err(Error::UserCancelled),
        }

        Ok(ContextUpdate::new()
            .set("projectValid", false)
            .set("projectRemediation", choice.as_str()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::prompt::{ScriptedAnswer, ScriptedPrompter};
    use async_trait::async_trait;
    use std::fs;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tempfile::TempDir;

    #[derive(Default)]
    struct CountingInitializer {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl ProjectInitializer for CountingInitializer {
        async fn initialize(&self, project_root: &Path) -> Result<()> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            fs::create_dir_all(project_root.join(".vscode"))?;
            for file in REQUIRED_PROJECT_FILES {
                fs::write(project_root.join(file), "{}")?;
            }
            Ok(())
        }
    }

    fn complete_project() -> TempDir {
        let dir = TempDir::new().unwrap();
        fs::create_dir(dir.path().join(".vscode")).unwrap();
        for file in REQUIRED_PROJECT_FILES {
            fs::write(dir.path().join(file), "{}").unwrap();
        }
        dir
    }

    #[tokio::test]
    async fn test_complete_project_passes_silently() {
        let dir = complete_project();
        let prompter = ScriptedPrompter::default();
        let initializer = CountingInitializer::default();

        let update = ProjectValidator::new(&prompter, &initializer)
            .validate(dir.path())
            .await
            .unwrap();

        assert_eq!(update.get("projectValid"), Some("true"));
        assert!(prompter.transcript().is_empty());
    }

    #[test]
    fn test_missing_project_files() {
        let dir = complete_project();
        fs::remove_file(dir.path().join(LAUNCH_FILE)).unwrap();
        assert_eq!(missing_project_files(dir.path()), vec![LAUNCH_FILE]);
    }

    #[tokio::test]
    async fn test_initialize_runs_initializer() {
        let dir = TempDir::new().unwrap();
        let prompter = ScriptedPrompter::new([ScriptedAnswer::pick("Initialize project")]);
        let initializer = CountingInitializer::default();

        let update = ProjectValidator::new(&prompter, &initializer)
            .validate(dir.path())
            .await
            .unwrap();

        assert_eq!(initializer.calls.load(Ordering::SeqCst), 1);
        assert_eq!(update.get("projectRemediation"), Some("Initialize"));
        assert!(missing_project_files(dir.path()).is_empty());
    }

    #[tokio::test]
    async fn test_skip_leaves_project_alone() {
        let dir = TempDir::new().unwrap();
        let prompter = ScriptedPrompter::new([ScriptedAnswer::pick("Skip for now")]);
        let initializer = CountingInitializer::default();

        let update = ProjectValidator::new(&prompter, &initializer)
            .validate(dir.path())
            .await
            .unwrap();

        assert_eq!(initializer.calls.load(Ordering::SeqCst), 0);
        assert_eq!(update.get("projectRemediation"), Some("Skip"));
        assert_eq!(missing_project_files(dir.path()).len(), 3);
    }

    #[tokio::test]
    async fn test_cancel_aborts() {
        let dir = TempDir::new().unwrap();
        let prompter = ScriptedPrompter::new([ScriptedAnswer::pick("Cancel")]);
        let initializer = CountingInitializer::default();

        let result = ProjectValidator::new(&prompter, &initializer)
            .validate(dir.path())
            .await;

        assert!(matches!(result, Err(Error::UserCancelled)));
        assert_eq!(initializer.calls.load(Ordering::SeqCst), 0);
    }
}

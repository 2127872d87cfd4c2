//! Project initialization through an external command

use async_trait::async_trait;
use std::path::Path;
use std::sync::Arc;
use tracing::info;

use crate::application::ProjectInitializer;
use crate::core::error::{Error, Result};
use crate::infrastructure::shell::{CommandExecutor, OutputChannel, display_command};

/// Runs the configured init command (`func init` by default) in the project root
pub struct CommandProjectInitializer {
    executor: Arc<dyn CommandExecutor>,
    output: Arc<dyn OutputChannel>,
    program: String,
    args: Vec<String>,
}

impl CommandProjectInitializer {
    pub fn new(
        executor: Arc<dyn CommandExecutor>,
        output: Arc<dyn OutputChannel>,
        program: impl Into<String>,
        args: Vec<String>,
    ) -> Self {
        Self {
            executor,
            output,
            program: program.into(),
            args,
        }
    }
}

#[async_trait]
impl ProjectInitializer for CommandProjectInitializer {
    async fn initialize(&self, project_root: &Path) -> Result<()> {
        let command = display_command(&self.program, &self.args);
        info!(command = %command, project_root = %project_root.display(), "Initializing project");

        let result = self
            .executor
            .execute(&self.program, &self.args, project_root, self.output.as_ref())
            .await
            .map_err(|e| match e {
                Error::Io(io) if io.kind() == std::io::ErrorKind::NotFound => {
                    Error::MissingDependency {
                        tool: self.program.clone(),
                        guidance: "Install the Azure Functions Core Tools or set tools.init_command in the funcgen config.".to_string(),
                    }
                }
                other => other,
            })?;

        if !result.is_success() {
            return Err(Error::ExternalToolFailure {
                command,
                exit_code: result.exit_code,
                output: result.output,
            });
        }
        Ok(())
    }
}

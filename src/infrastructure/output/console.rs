//! Console-facing output adapters

use async_trait::async_trait;
use std::path::Path;
use tokio::io::AsyncWriteExt;
use tracing::info;

use crate::application::FileOpener;
use crate::core::error::Result;
use crate::infrastructure::shell::OutputChannel;

/// Tracing target build tool output is logged under
pub const BUILD_TOOL_TARGET: &str = "funcgen::build_tool";

/// Forwards each line of tool output to the log
#[derive(Debug, Default)]
pub struct TracingOutputChannel;

impl OutputChannel for TracingOutputChannel {
    fn append_line(&self, line: &str) {
        info!(target: BUILD_TOOL_TARGET, "{line}");
    }
}

/// "Opens" a file by printing its path for the user
#[derive(Debug, Default)]
pub struct ConsoleFileOpener;

#[async_trait]
impl FileOpener for ConsoleFileOpener {
    async fn open(&self, path: &Path) -> Result<()> {
        let mut stdout = tokio::io::stdout();
        stdout
            .write_all(format!("Created {}\n", path.display()).as_bytes())
            .await?;
        stdout.flush().await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tracing_test::traced_test;

    #[traced_test]
    #[test]
    fn test_tool_output_is_logged() {
        TracingOutputChannel.append_line("[INFO] BUILD SUCCESS");
        assert!(logs_contain("[INFO] BUILD SUCCESS"));
    }
}

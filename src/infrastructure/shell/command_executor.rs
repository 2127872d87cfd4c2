//! Command executor for running external build tools
//!
//! This module provides infrastructure for spawning a tool, streaming its
//! output while it runs, and reporting how it exited.

use async_trait::async_trait;
use std::path::Path;
use std::process::Stdio;
use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};
use tokio::process::Command;
use tokio::sync::mpsc;
use tracing::{debug, warn};

use crate::core::error::Result;

/// Receives tool output line by line while the tool is running
pub trait OutputChannel: Send + Sync {
    fn append_line(&self, line: &str);
}

/// Trait for executing external commands
#[async_trait]
pub trait CommandExecutor: Send + Sync {
    /// Run `program` with `args` in `working_dir`, streaming output to `output`
    ///
    /// Failing to start the program is an error; a program that starts and
    /// exits non-zero is reported through [`CommandResult::exit_code`].
    async fn execute(
        &self,
        program: &str,
        args: &[String],
        working_dir: &Path,
        output: &dyn OutputChannel,
    ) -> Result<CommandResult>;
}

/// Result of command execution
#[derive(Debug, Clone)]
pub struct CommandResult {
    pub exit_code: i32,
    /// Combined stdout and stderr, in arrival order
    pub output: String,
}

impl CommandResult {
    /// Check if the command was successful
    pub fn is_success(&self) -> bool {
        self.exit_code == 0
    }
}

/// Render a program and its arguments the way a user would type them
pub fn display_command(program: &str, args: &[String]) -> String {
    std::iter::once(program)
        .chain(args.iter().map(String::as_str))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Default command executor using tokio::process
pub struct ShellCommandExecutor;

impl ShellCommandExecutor {
    pub fn new() -> Self {
        Self
    }
}

impl Default for ShellCommandExecutor {
    fn default() -> Self {
        Self::new()
    }
}

/// Forward every line of `reader` until EOF
///
/// Lines are decoded lossily so a stray non-UTF-8 byte never closes the pipe
/// early. Only a read error stops draining.
async fn forward_lines<R>(reader: R, sender: mpsc::UnboundedSender<String>)
where
    R: AsyncRead + Unpin,
{
    let mut reader = BufReader::new(reader);
    let mut buf = Vec::new();
    loop {
        buf.clear();
        match reader.read_until(b'\n', &mut buf).await {
            Ok(0) => break,
            Ok(_) => {
                let line = String::from_utf8_lossy(&buf);
                let line = line.trim_end_matches(['\n', '\r']).to_string();
                // Keep reading after the receiver is gone so the child never sees a closed pipe
                let _ = sender.send(line);
            }
            Err(e) => {
                warn!(error = %e, "Stopped reading command output");
                break;
            }
        }
    }
}

#[async_trait]
impl CommandExecutor for ShellCommandExecutor {
    async fn execute(
        &self,
        program: &str,
        args: &[String],
        working_dir: &Path,
        output: &dyn OutputChannel,
    ) -> Result<CommandResult> {
        debug!(
            command = %display_command(program, args),
            working_dir = %working_dir.display(),
            "Spawning external command"
        );

        let mut child = Command::new(program)
            .args(args)
            .current_dir(working_dir)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()?;

        let (sender, mut receiver) = mpsc::unbounded_channel();
        let mut readers = Vec::new();
        if let Some(stdout) = child.stdout.take() {
            readers.push(tokio::spawn(forward_lines(stdout, sender.clone())));
        }
        if let Some(stderr) = child.stderr.take() {
            readers.push(tokio::spawn(forward_lines(stderr, sender.clone())));
        }
        drop(sender);

        let mut captured = String::new();
        while let Some(line) = receiver.recv().await {
            output.append_line(&line);
            captured.push_str(&line);
            captured.push('\n');
        }
        for reader in readers {
            if let Err(e) = reader.await {
                warn!(error = %e, "Output reader task failed");
            }
        }

        let status = child.wait().await?;
        Ok(CommandResult {
            exit_code: status.code().unwrap_or(-1),
            output: captured,
        })
    }
}

/// Output channel that keeps every line, for tests
#[cfg(test)]
#[derive(Default)]
pub struct RecordingOutputChannel {
    pub lines: std::sync::Mutex<Vec<String>>,
}

#[cfg(test)]
impl OutputChannel for RecordingOutputChannel {
    fn append_line(&self, line: &str) {
        self.lines.lock().unwrap().push(line.to_string());
    }
}

/// Mock command executor for testing
#[cfg(test)]
#[derive(Default)]
pub struct MockCommandExecutor {
    pub results: std::collections::HashMap<String, CommandResult>,
    pub invocations: std::sync::Mutex<Vec<(String, std::path::PathBuf)>>,
}

#[cfg(test)]
impl MockCommandExecutor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the result for a full command line, e.g. `mvn --version`
    pub fn with_result(mut self, command: &str, exit_code: i32, output: &str) -> Self {
        self.results.insert(
            command.to_string(),
            CommandResult {
                exit_code,
                output: output.to_string(),
            },
        );
        self
    }

    pub fn invoked(&self) -> Vec<String> {
        self.invocations
            .lock()
            .unwrap()
            .iter()
            .map(|(command, _)| command.clone())
            .collect()
    }
}

#[cfg(test)]
#[async_trait]
impl CommandExecutor for MockCommandExecutor {
    async fn execute(
        &self,
        program: &str,
        args: &[String],
        working_dir: &Path,
        output: &dyn OutputChannel,
    ) -> Result<CommandResult> {
        let command = display_command(program, args);
        self.invocations
            .lock()
            .unwrap()
            .push((command.clone(), working_dir.to_path_buf()));

        let result = self.results.get(&command).cloned().ok_or_else(|| {
            std::io::Error::new(
                std::io::ErrorKind::NotFound,
                format!("Mock executor has no result for command: {command}"),
            )
        })?;
        for line in result.output.lines() {
            output.append_line(line);
        }
        Ok(result)
    }
}

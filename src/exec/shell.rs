//! Local subprocess executor
//!
//! Runs approved commands on this machine via `sh -c`, with a block-list
//! for commands no approval should unlock, a wall-clock timeout, and an
//! output cap.

use anyhow::{bail, Context, Result};
use async_trait::async_trait;
use std::path::PathBuf;
use std::process::Stdio;
use std::time::Duration;
use tokio::process::Command;

use crate::core::ActionProposal;

use super::{ActionExecutor, ExecutionOutput};

/// Commands that stay blocked even after approval
const BLOCKED_PATTERNS: &[&str] = &[
    "rm -rf /",
    "rm -rf ~",
    "rm -rf /*",
    "rm -rf $HOME",
    "mkfs",
    "dd if=",
    "> /dev/sd",
    ":(){ :|:& };:",
    "shutdown",
    "reboot",
    "poweroff",
];

const MAX_OUTPUT_BYTES: usize = 64 * 1024;

pub struct ShellExecutor {
    working_dir: PathBuf,
    timeout: Duration,
}

impl ShellExecutor {
    pub fn new(working_dir: PathBuf) -> Self {
        Self {
            working_dir,
            timeout: Duration::from_secs(120),
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    fn blocked_pattern(command: &str) -> Option<&'static str> {
        let lower = command.to_lowercase();
        BLOCKED_PATTERNS
            .iter()
            .copied()
            .find(|pattern| lower.contains(&pattern.to_lowercase()))
    }

    fn cap(text: String) -> String {
        if text.len() <= MAX_OUTPUT_BYTES {
            return text;
        }
        let mut end = MAX_OUTPUT_BYTES;
        while !text.is_char_boundary(end) {
            end -= 1;
        }
        format!("{}\n... (output truncated)", &text[..end])
    }
}

#[async_trait]
impl ActionExecutor for ShellExecutor {
    fn name(&self) -> &str {
        "shell"
    }

    async fn execute(&self, proposal: &ActionProposal) -> Result<ExecutionOutput> {
        if let Some(pattern) = Self::blocked_pattern(&proposal.command) {
            bail!("command blocked by safety pattern `{pattern}`");
        }

        tracing::info!(command = %proposal.command, "running approved command");

        let child = Command::new("sh")
            .arg("-c")
            .arg(&proposal.command)
            .current_dir(&self.working_dir)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .context("failed to spawn command")?;

        let output = match tokio::time::timeout(self.timeout, child.wait_with_output()).await {
            Ok(result) => result.context("failed to collect command output")?,
            Err(_) => bail!("command timed out after {}s", self.timeout.as_secs()),
        };

        let mut logs = String::from_utf8_lossy(&output.stdout).into_owned();
        let stderr = String::from_utf8_lossy(&output.stderr);
        if !stderr.trim().is_empty() {
            if !logs.is_empty() {
                logs.push('\n');
            }
            logs.push_str(&stderr);
        }

        if !output.status.success() {
            bail!("command exited with {}:\n{}", output.status, Self::cap(logs));
        }

        if logs.trim().is_empty() {
            logs = format!("`{}` completed with no output", proposal.command);
        }

        Ok(ExecutionOutput {
            logs: Self::cap(logs),
            generated_code: None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn proposal(command: &str) -> ActionProposal {
        ActionProposal::new(5, "test action", command)
    }

    #[test]
    fn block_list_catches_catastrophic_commands() {
        assert!(ShellExecutor::blocked_pattern("rm -rf / --no-preserve-root").is_some());
        assert!(ShellExecutor::blocked_pattern("sudo REBOOT now").is_some());
        assert!(ShellExecutor::blocked_pattern("ls -la").is_none());
        assert!(ShellExecutor::blocked_pattern("rm build/cache.bin").is_none());
    }

    #[test]
    fn cap_truncates_on_char_boundary() {
        let long = "é".repeat(MAX_OUTPUT_BYTES);
        let capped = ShellExecutor::cap(long);
        assert!(capped.len() < MAX_OUTPUT_BYTES + 64);
        assert!(capped.ends_with("(output truncated)"));

        let short = "fine".to_string();
        assert_eq!(ShellExecutor::cap(short), "fine");
    }

    #[tokio::test]
    async fn runs_command_and_captures_stdout() {
        let executor = ShellExecutor::new(std::env::temp_dir());
        let output = executor.execute(&proposal("echo hello")).await.unwrap();
        assert!(output.logs.contains("hello"));
    }

    #[tokio::test]
    async fn blocked_command_is_refused() {
        let executor = ShellExecutor::new(std::env::temp_dir());
        let err = executor.execute(&proposal("rm -rf /")).await.unwrap_err();
        assert!(err.to_string().contains("blocked"));
    }

    #[tokio::test]
    async fn failing_command_reports_status() {
        let executor = ShellExecutor::new(std::env::temp_dir());
        let err = executor.execute(&proposal("exit 3")).await.unwrap_err();
        assert!(err.to_string().contains("exited with"));
    }

    #[tokio::test]
    async fn runs_in_the_working_dir() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("probe.txt"), "x").unwrap();

        let executor = ShellExecutor::new(dir.path().to_path_buf());
        let output = executor.execute(&proposal("ls")).await.unwrap();
        assert!(output.logs.contains("probe.txt"));
    }

    #[tokio::test]
    async fn slow_command_times_out() {
        let executor =
            ShellExecutor::new(std::env::temp_dir()).with_timeout(Duration::from_millis(200));
        let err = executor.execute(&proposal("sleep 5")).await.unwrap_err();
        assert!(err.to_string().contains("timed out"));
    }
}

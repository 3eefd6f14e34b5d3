//! Process harness: runs one `cli-shell-api` subcommand and captures stdout.
//!
//! `Invoke` is the seam the client queries through; `ShellApi` is the real
//! implementation spawning the configured executable.

use std::collections::HashMap;
use std::path::PathBuf;
use std::process::{Command, Stdio};
use std::time::Instant;

use crate::config::{resolve_env_vars, ClientConfig};
use crate::error::ExternalQueryFailed;
use crate::op::Operation;

/// Runs one operation against the store.
///
/// Returns the full stdout on exit code 0 and `ExternalQueryFailed` otherwise.
pub(crate) trait Invoke: Send + Sync {
    fn invoke(&self, op: Operation, path: &[&str]) -> Result<Vec<u8>, ExternalQueryFailed>;
}

/// Spawns the configured executable directly (never through a shell).
#[derive(Debug, Clone)]
pub(crate) struct ShellApi {
    executable: PathBuf,
    args: Vec<String>,
    /// Resolved env vars (values already extracted from `${VAR}` references)
    env: HashMap<String, String>,
}

impl ShellApi {
    pub(crate) fn new(config: &ClientConfig) -> Self {
        Self {
            executable: config.executable.clone(),
            args: config.args.clone(),
            env: resolve_env_vars(&config.env),
        }
    }

    fn command(&self, op: Operation, path: &[&str]) -> Command {
        let mut cmd = Command::new(&self.executable);
        cmd.args(&self.args);
        cmd.arg(op.subcommand());
        cmd.args(path);
        cmd.envs(&self.env);
        cmd.stdin(Stdio::null());
        cmd.stdout(Stdio::piped());
        cmd.stderr(Stdio::piped());
        cmd
    }
}

impl Invoke for ShellApi {
    fn invoke(&self, op: Operation, path: &[&str]) -> Result<Vec<u8>, ExternalQueryFailed> {
        let start = Instant::now();

        // Blocks until exit; both pipes are drained so a chatty stderr can't wedge the child.
        let output = self.command(op, path).output().map_err(|e| {
            tracing::warn!(
                executable = %self.executable.display(),
                subcommand = %op,
                error = %e,
                "failed to spawn configuration store API"
            );
            ExternalQueryFailed
        })?;

        let elapsed = start.elapsed().as_millis();
        // Killed by a signal reports no code; treat it like any other failure.
        let exit_code = output.status.code().unwrap_or(-1);

        tracing::info!(
            subcommand = %op,
            path = ?path,
            exit_code = %exit_code,
            duration_ms = %elapsed,
            "configuration store query"
        );

        if !output.stderr.is_empty() {
            tracing::debug!(
                subcommand = %op,
                stderr = %String::from_utf8_lossy(&output.stderr),
                "configuration store API stderr"
            );
        }

        if output.status.success() {
            Ok(output.stdout)
        } else {
            Err(ExternalQueryFailed)
        }
    }
}

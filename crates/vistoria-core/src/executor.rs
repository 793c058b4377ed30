//! Single-check command execution.

use crate::check::CheckSpec;
use crate::result::CheckResult;
use async_trait::async_trait;
use std::path::PathBuf;
use std::process::Stdio;
use tokio::process::Command;
use tracing::{info, warn};

/// Executes one check and maps every failure mode into a [`CheckResult`].
///
/// Implementations never return an error: a non-zero exit becomes a failed
/// result, and a process that could not be started becomes a skipped one.
#[async_trait]
pub trait CheckExecutor: Send + Sync {
    /// Run the check to completion and record its outcome.
    async fn run(&self, spec: &CheckSpec) -> CheckResult;
}

/// Executor backed by real subprocesses, run in the project directory.
pub struct ProcessExecutor {
    cwd: PathBuf,
}

impl ProcessExecutor {
    /// Create an executor that runs checks inside `project_root`.
    pub fn new(project_root: impl Into<PathBuf>) -> Self {
        Self {
            cwd: project_root.into(),
        }
    }
}

#[async_trait]
impl CheckExecutor for ProcessExecutor {
    async fn run(&self, spec: &CheckSpec) -> CheckResult {
        info!(check = %spec.description, command = %spec.display(), "executando verificação");

        // stdin closed: checks must never wait on interactive input.
        let spawned = Command::new(&spec.program)
            .args(&spec.args)
            .current_dir(&self.cwd)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn();

        let child = match spawned {
            Ok(child) => child,
            Err(err) => {
                warn!(check = %spec.description, error = %err, "comando não pôde ser iniciado");
                return CheckResult::unavailable(
                    spec.description.clone(),
                    spec.display(),
                    format!("comando não pôde ser iniciado: {}", err),
                );
            }
        };

        // Single suspension point: waiting for the process to finish.
        let output = match child.wait_with_output().await {
            Ok(output) => output,
            Err(err) => {
                warn!(check = %spec.description, error = %err, "falha ao aguardar o processo");
                return CheckResult::unavailable(
                    spec.description.clone(),
                    spec.display(),
                    format!("falha ao aguardar o processo: {}", err),
                );
            }
        };

        let exit_code = output.status.code().unwrap_or(-1);
        let stdout = String::from_utf8_lossy(&output.stdout).to_string();
        let stderr = String::from_utf8_lossy(&output.stderr).to_string();

        let result = CheckResult::completed(
            spec.description.clone(),
            spec.display(),
            exit_code,
            stdout,
            stderr,
        );
        info!(
            check = %result.description,
            exit_code = result.exit_code,
            success = result.success,
            "verificação concluída"
        );
        result
    }
}

//! DCD client adapter.
//!
//! Talks to the completion daemon by spawning its command line client
//! (`dcd-client` by default) once per request: build the argument vector,
//! capture stdout, wait bounded by the configured timeout. Stdout is the
//! only channel that is parsed; stderr goes to the log.

use crate::kernel::services::ports::{Candidate, DcdConfig, DcdProjectSettings};
use std::io;
use std::path::Path;
use std::process::Stdio;
use std::sync::{Arc, RwLock};
use std::time::Duration;
use thiserror::Error;
use tokio::io::AsyncBufReadExt;
use tokio::process::Command;

#[derive(Debug, Error)]
pub enum DcdError {
    /// The client executable could not be started or its pipes failed.
    #[error("failed to run {command}: {source}")]
    Unreachable {
        command: String,
        #[source]
        source: io::Error,
    },
    /// The client did not exit within the wait bound.
    #[error("{command} did not answer within {timeout:?}")]
    Timeout { command: String, timeout: Duration },
    /// The client exited with a non-zero status.
    #[error("{command} exited with status {code:?}")]
    Rejected { command: String, code: Option<i32> },
}

/// Daemon client service: owns the runtime driving child processes and the
/// configuration snapshot every request reads.
pub struct DcdService {
    runtime: tokio::runtime::Runtime,
    config: RwLock<Arc<DcdConfig>>,
}

impl DcdService {
    pub fn new(config: DcdConfig) -> io::Result<Self> {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(2)
            .enable_all()
            .build()
            .or_else(|e| {
                tracing::error!(
                    error = %e,
                    "failed to create multi-thread tokio runtime, falling back to current-thread"
                );
                tokio::runtime::Builder::new_current_thread()
                    .enable_all()
                    .build()
            })?;
        Ok(Self {
            runtime,
            config: RwLock::new(Arc::new(config)),
        })
    }

    /// Immutable snapshot of the current configuration. A config update
    /// never tears a request that already took its snapshot.
    pub fn config(&self) -> Arc<DcdConfig> {
        match self.config.read() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    fn update_config(&self, apply: impl FnOnce(&mut DcdConfig)) {
        let mut guard = match self.config.write() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        let mut next = DcdConfig::clone(&guard);
        apply(&mut next);
        *guard = Arc::new(next);
    }

    pub fn set_port(&self, port: u16) {
        self.update_config(|config| config.port = port);
    }

    /// Apply a project configuration event. The port is applied first so
    /// the include-directory calls reach the right daemon.
    pub fn apply_project_settings(&self, settings: &DcdProjectSettings, base_dir: &Path) {
        if let Some(port) = settings.port {
            self.set_port(port);
        }

        for dir in settings.resolved_include_dirs(base_dir) {
            if let Err(e) = self.add_import_path(&dir) {
                tracing::warn!(dir = %dir.display(), error = %e, "add include dir failed");
            }
        }
    }

    /// Ask the daemon for completions at `byte_offset` of `file`.
    pub fn query_completions(
        &self,
        byte_offset: usize,
        file: &Path,
    ) -> Result<Vec<Candidate>, DcdError> {
        let config = self.config();
        let stdout = self.invoke_with(&config, completion_args(byte_offset, config.port, file))?;
        Ok(parse_candidates(&stdout))
    }

    /// Announce an include search directory to the daemon and record it in
    /// the configuration on success.
    pub fn add_import_path(&self, dir: &Path) -> Result<(), DcdError> {
        let config = self.config();
        self.invoke_with(&config, import_path_args(config.port, dir))?;
        self.update_config(|config| {
            config.include_dirs.insert(dir.to_path_buf());
        });
        Ok(())
    }

    /// Ask the daemon to discard its cached analysis.
    pub fn clear_cache(&self) -> Result<(), DcdError> {
        let config = self.config();
        self.invoke_with(&config, clear_cache_args(config.port))?;
        Ok(())
    }

    /// Run the client executable with `args`, returning captured stdout on
    /// a zero exit. One fire-and-wait child per call, no retries.
    pub fn invoke(&self, args: Vec<String>) -> Result<String, DcdError> {
        let config = self.config();
        self.invoke_with(&config, args)
    }

    fn invoke_with(&self, config: &DcdConfig, args: Vec<String>) -> Result<String, DcdError> {
        self.runtime
            .block_on(run_client(&config.command, config.timeout, &args))
    }
}

async fn run_client(
    command: &str,
    timeout: Duration,
    args: &[String],
) -> Result<String, DcdError> {
    tracing::debug!(command, ?args, "dcd client call");

    let mut cmd = Command::new(command);
    cmd.args(args)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true);

    let mut child = cmd.spawn().map_err(|e| DcdError::Unreachable {
        command: command.to_string(),
        source: e,
    })?;

    if let Some(stderr) = child.stderr.take() {
        tokio::spawn(stderr_loop(command.to_string(), stderr));
    }

    let output = tokio::time::timeout(timeout, child.wait_with_output())
        .await
        .map_err(|_| DcdError::Timeout {
            command: command.to_string(),
            timeout,
        })?
        .map_err(|e| DcdError::Unreachable {
            command: command.to_string(),
            source: e,
        })?;

    if !output.status.success() {
        return Err(DcdError::Rejected {
            command: command.to_string(),
            code: output.status.code(),
        });
    }

    Ok(String::from_utf8_lossy(&output.stdout).into_owned())
}

async fn stderr_loop(command: String, stderr: tokio::process::ChildStderr) {
    let mut lines = tokio::io::BufReader::new(stderr).lines();
    while let Ok(Some(line)) = lines.next_line().await {
        tracing::debug!(command = %command, "{line}");
    }
}

/// `["-c<byteOffset>", "-p<port>", "<filePath>"]`
pub(crate) fn completion_args(byte_offset: usize, port: u16, file: &Path) -> Vec<String> {
    vec![
        format!("-c{byte_offset}"),
        format!("-p{port}"),
        file.display().to_string(),
    ]
}

/// `["-p<port>", "-I<path>"]`
pub(crate) fn import_path_args(port: u16, dir: &Path) -> Vec<String> {
    vec![format!("-p{port}"), format!("-I{}", dir.display())]
}

/// `["--p<port>", "--clearCache"]`
///
/// The double-dash `--p` spelling on this one call is what deployed
/// dcd-client builds accept; keep it verbatim even though every other call
/// uses `-p`. Verify against the daemon's argument parser before changing.
pub(crate) fn clear_cache_args(port: u16) -> Vec<String> {
    vec![format!("--p{port}"), "--clearCache".to_string()]
}

/// Split daemon stdout into candidates: one per non-blank line, first
/// space-separated token as the label. Lines whose first token is empty
/// are skipped; order is preserved, nothing is deduplicated or sorted.
pub fn parse_candidates(stdout: &str) -> Vec<Candidate> {
    let mut candidates = Vec::new();
    for line in stdout.split('\n') {
        if line.trim().is_empty() {
            continue;
        }
        match line.split(' ').next() {
            Some(label) if !label.is_empty() => candidates.push(Candidate::new(label)),
            _ => {}
        }
    }
    candidates
}

#[cfg(test)]
#[path = "../../../../tests/unit/kernel/services/adapters/dcd.rs"]
mod tests;

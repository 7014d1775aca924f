//! Git CLI invocation
//!
//! Commands run without a shell; arguments that reach git are still checked
//! so that manifest values cannot smuggle in options or command separators.

use std::ffi::OsString;
use std::path::Path;
use std::process::Command;

use tracing::debug;

use super::auth::mask_userinfo;
use crate::error::{Result, TerrafileError};

/// Reject values that could be read as git options or shell syntax
pub fn ensure_safe_argument(value: &str) -> Result<()> {
    let reason = if value.is_empty() {
        Some("value is empty")
    } else if value.starts_with('-') {
        Some("value starts with '-'")
    } else if value.contains(';') {
        Some("no semicolons allowed")
    } else if value.chars().any(char::is_whitespace) {
        Some("value contains whitespace")
    } else {
        None
    };

    match reason {
        Some(reason) => Err(TerrafileError::UnsafeArgument {
            value: value.to_string(),
            reason: reason.to_string(),
        }),
        None => Ok(()),
    }
}

/// Result of a finished git process
#[derive(Debug, Clone)]
pub struct GitOutput {
    pub operation: String,

    /// Exit status, None when terminated by a signal
    pub status: Option<i32>,

    pub stdout: String,
    pub stderr: String,
}

impl GitOutput {
    pub fn success(&self) -> bool {
        self.status == Some(0)
    }

    /// stdout followed by stderr, as a terminal would show them
    pub fn combined(&self) -> String {
        let mut combined = self.stdout.clone();
        combined.push_str(&self.stderr);
        combined.trim_end().to_string()
    }

    /// Turn a non-zero exit into [`TerrafileError::GitCommandFailed`]
    pub fn ensure_success(self) -> Result<()> {
        if self.success() {
            return Ok(());
        }
        Err(TerrafileError::GitCommandFailed {
            output: self.combined(),
            operation: self.operation,
            status: self.status,
        })
    }
}

/// Builder for a single git invocation
pub struct GitCommand {
    operation: String,
    command: Command,
    display: Vec<OsString>,
}

impl GitCommand {
    pub fn new(program: &Path, operation: &str) -> Self {
        let mut command = Command::new(program);
        // Never block on an interactive credential prompt
        command.env("GIT_TERMINAL_PROMPT", "0");
        Self {
            operation: operation.to_string(),
            command,
            display: Vec::new(),
        }
    }

    #[must_use]
    pub fn arg(mut self, arg: impl Into<OsString>) -> Self {
        let arg = arg.into();
        self.command.arg(&arg);
        self.display.push(arg);
        self
    }

    #[must_use]
    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<OsString>,
    {
        for arg in args {
            self = self.arg(arg);
        }
        self
    }

    /// Run to completion, capturing output
    ///
    /// Failing to start git at all is reported as a failed operation without status.
    pub fn run(mut self) -> Result<GitOutput> {
        let args = self
            .display
            .iter()
            .map(|arg| mask_userinfo(&arg.to_string_lossy()))
            .collect::<Vec<_>>()
            .join(" ");
        debug!(operation = %self.operation, %args, "running git");

        let output = self
            .command
            .output()
            .map_err(|e| TerrafileError::GitCommandFailed {
                operation: self.operation.clone(),
                status: None,
                output: format!("failed to run git: {e}"),
            })?;

        Ok(GitOutput {
            operation: self.operation,
            status: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        })
    }
}

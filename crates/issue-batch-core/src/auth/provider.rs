use std::process::Stdio;
use std::time::Duration;

use tokio::process::Command;
use tokio::time::timeout;
use tracing::debug;

use crate::config::DEFAULT_HELPER_TIMEOUT;

use super::{AuthError, GhToken};

/// Source of the bearer token used for every request in a run.
#[allow(async_fn_in_trait)]
pub trait CredentialProvider {
    async fn token(&self) -> Result<GhToken, AuthError>;
}

/// Reads the token from an already-authenticated `gh` installation.
#[derive(Debug, Clone)]
pub struct GhCliProvider {
    program: String,
    args: Vec<String>,
    timeout: Duration,
}

impl GhCliProvider {
    /// Runs `gh auth token` with the default five second limit.
    pub fn new() -> Self {
        Self::with_command("gh", ["auth", "token"], DEFAULT_HELPER_TIMEOUT)
    }

    /// Use a different helper command, e.g. a wrapper script.
    pub fn with_command<I, S>(program: impl Into<String>, args: I, timeout: Duration) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            program: program.into(),
            args: args.into_iter().map(Into::into).collect(),
            timeout,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

impl Default for GhCliProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl CredentialProvider for GhCliProvider {
    async fn token(&self) -> Result<GhToken, AuthError> {
        debug!(program = %self.program, args = ?self.args, "invoking credential helper");

        let mut command = Command::new(&self.program);
        command
            .args(&self.args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        let output = timeout(self.timeout, command.output())
            .await
            .map_err(|_| AuthError::Timeout(self.timeout))?
            .map_err(AuthError::Spawn)?;

        if !output.status.success() {
            return Err(AuthError::HelperFailed {
                status: output.status,
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_owned(),
            });
        }

        let stdout = String::from_utf8(output.stdout).map_err(|_| AuthError::InvalidUtf8)?;
        GhToken::parse(&stdout)
    }
}

/// Provider for a token that is already known to the caller.
#[derive(Debug, Clone)]
pub struct StaticTokenProvider {
    raw: String,
}

impl StaticTokenProvider {
    pub fn new(raw: impl Into<String>) -> Self {
        Self { raw: raw.into() }
    }
}

impl CredentialProvider for StaticTokenProvider {
    async fn token(&self) -> Result<GhToken, AuthError> {
        GhToken::parse(&self.raw)
    }
}

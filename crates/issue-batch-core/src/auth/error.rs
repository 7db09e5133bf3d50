use std::process::ExitStatus;
use std::time::Duration;

use thiserror::Error;

/// Errors surfaced while obtaining a credential from the local helper.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("failed to launch credential helper")]
    Spawn(#[source] std::io::Error),
    #[error("credential helper timed out after {0:?}")]
    Timeout(Duration),
    #[error("credential helper exited with {status}: {stderr}")]
    HelperFailed { status: ExitStatus, stderr: String },
    #[error("credential helper output is not valid UTF-8")]
    InvalidUtf8,
    #[error("credential helper returned an empty token")]
    EmptyToken,
    #[error("credential helper returned a malformed token")]
    MalformedToken,
}

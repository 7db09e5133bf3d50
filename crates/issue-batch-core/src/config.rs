use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use thiserror::Error;
use url::Url;

/// Default target repository for the planned task issues.
pub const DEFAULT_REPO_OWNER: &str = "Daemon-Devarshi";
pub const DEFAULT_REPO_NAME: &str = "hafnium-expense-tracker";
pub const DEFAULT_API_BASE: &str = "https://api.github.com";
pub const DEFAULT_LABEL: &str = "task";
pub const DEFAULT_SUBMIT_DELAY: Duration = Duration::from_millis(500);
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(10);
pub const DEFAULT_HELPER_TIMEOUT: Duration = Duration::from_secs(5);

/// An `owner/name` repository reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoSlug {
    owner: String,
    name: String,
}

impl RepoSlug {
    pub fn owner(&self) -> &str {
        &self.owner
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

impl FromStr for RepoSlug {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ConfigError::InvalidRepo(s.to_owned());
        let (owner, name) = s.trim().split_once('/').ok_or_else(invalid)?;
        if !is_slug_part(owner) || !is_slug_part(name) {
            return Err(invalid());
        }
        Ok(Self {
            owner: owner.to_owned(),
            name: name.to_owned(),
        })
    }
}

fn is_slug_part(part: &str) -> bool {
    !part.is_empty() && !part.contains('/') && !part.contains(char::is_whitespace)
}

impl fmt::Display for RepoSlug {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.name)
    }
}

/// Settings for a single import run.
///
/// Everything defaults to the compiled-in target; the binary only overrides
/// individual fields for the current invocation.
#[derive(Debug, Clone)]
pub struct ImportConfig {
    pub repo: RepoSlug,
    pub api_base: String,
    pub label: String,
    pub submit_delay: Duration,
    pub request_timeout: Duration,
    pub helper_timeout: Duration,
}

impl ImportConfig {
    pub fn with_defaults() -> Self {
        Self {
            repo: RepoSlug {
                owner: DEFAULT_REPO_OWNER.to_owned(),
                name: DEFAULT_REPO_NAME.to_owned(),
            },
            api_base: DEFAULT_API_BASE.to_owned(),
            label: DEFAULT_LABEL.to_owned(),
            submit_delay: DEFAULT_SUBMIT_DELAY,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            helper_timeout: DEFAULT_HELPER_TIMEOUT,
        }
    }

    pub fn with_repo(mut self, repo: &str) -> Result<Self, ConfigError> {
        self.repo = repo.parse()?;
        Ok(self)
    }

    pub fn with_api_base(mut self, base: &str) -> Result<Self, ConfigError> {
        let parsed = Url::parse(base).map_err(|source| ConfigError::InvalidApiBase {
            value: base.to_owned(),
            source,
        })?;
        if parsed.cannot_be_a_base() {
            return Err(ConfigError::InvalidApiBase {
                value: base.to_owned(),
                source: url::ParseError::RelativeUrlWithCannotBeABaseBase,
            });
        }
        self.api_base = base.to_owned();
        Ok(self)
    }

    pub fn with_label(mut self, label: &str) -> Result<Self, ConfigError> {
        let label = label.trim();
        if label.is_empty() {
            return Err(ConfigError::EmptyLabel);
        }
        self.label = label.to_owned();
        Ok(self)
    }

    pub fn with_submit_delay(mut self, delay: Duration) -> Self {
        self.submit_delay = delay;
        self
    }
}

impl Default for ImportConfig {
    fn default() -> Self {
        Self::with_defaults()
    }
}

/// Errors raised while assembling an [`ImportConfig`].
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid repository '{0}', expected owner/name")]
    InvalidRepo(String),
    #[error("invalid API base URL '{value}'")]
    InvalidApiBase {
        value: String,
        #[source]
        source: url::ParseError,
    },
    #[error("issue label must not be empty")]
    EmptyLabel,
}

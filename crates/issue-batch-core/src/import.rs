use std::io::{self, Write};

use thiserror::Error;
use tracing::info;

use crate::auth::{AuthError, CredentialProvider, GhToken};
use crate::batch::{BatchOptions, BatchReport, BatchSubmitter, IssueSink};
use crate::catalog::{default_parent, default_tasks, ParentIssue, Task};
use crate::github::GithubError;

/// What a run submits.
#[derive(Debug, Clone)]
pub struct ImportPlan {
    pub tasks: Vec<Task>,
    pub parent: Option<ParentIssue>,
}

impl Default for ImportPlan {
    fn default() -> Self {
        Self {
            tasks: default_tasks(),
            parent: Some(default_parent()),
        }
    }
}

#[derive(Debug, Error)]
pub enum ImportError {
    #[error("Error getting token")]
    Auth(#[from] AuthError),
    #[error("failed to build issue client")]
    Client(#[from] GithubError),
    #[error("failed to write transcript")]
    Output(#[from] io::Error),
}

/// Obtain a credential, connect, and submit the whole plan.
///
/// A credential failure aborts before `connect` runs, so nothing is sent.
pub async fn import<P, C, S, W>(
    provider: &P,
    connect: C,
    plan: &ImportPlan,
    options: BatchOptions,
    out: &mut W,
) -> Result<BatchReport, ImportError>
where
    P: CredentialProvider,
    C: FnOnce(GhToken) -> Result<S, GithubError>,
    S: IssueSink,
    W: Write,
{
    let token = provider.token().await?;
    info!("credential obtained");
    let sink = connect(token)?;

    writeln!(out, "Creating remaining issues...")?;
    let report = BatchSubmitter::new(sink, options)
        .run(&plan.tasks, plan.parent.as_ref(), out)
        .await?;
    Ok(report)
}

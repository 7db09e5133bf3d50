use std::collections::BTreeMap;
use std::error::Error as StdError;
use std::io::{self, Write};
use std::time::Duration;

use tokio::time::sleep;
use tracing::{info, warn};

use crate::catalog::{ParentIssue, Task};
use crate::config::{ImportConfig, DEFAULT_LABEL, DEFAULT_SUBMIT_DELAY};
use crate::github::NewIssue;

/// Destination for created issues.
#[allow(async_fn_in_trait)]
pub trait IssueSink {
    type Error: StdError + 'static;

    /// Create one issue and return the number the remote side assigned to it.
    async fn submit(&self, issue: &NewIssue<'_>) -> Result<u64, Self::Error>;
}

impl<T> IssueSink for &T
where
    T: IssueSink + ?Sized,
{
    type Error = T::Error;

    async fn submit(&self, issue: &NewIssue<'_>) -> Result<u64, Self::Error> {
        (**self).submit(issue).await
    }
}

/// Pacing and payload settings for a batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchOptions {
    /// Pause after every task submission, successful or not.
    pub delay: Duration,
    pub labels: Vec<String>,
}

impl BatchOptions {
    pub fn from_config(config: &ImportConfig) -> Self {
        Self {
            delay: config.submit_delay,
            labels: vec![config.label.clone()],
        }
    }
}

impl Default for BatchOptions {
    fn default() -> Self {
        Self {
            delay: DEFAULT_SUBMIT_DELAY,
            labels: vec![DEFAULT_LABEL.to_owned()],
        }
    }
}

/// Result of submitting one task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Created(u64),
    Failed(String),
}

impl Outcome {
    pub fn number(&self) -> Option<u64> {
        match self {
            Outcome::Created(number) => Some(*number),
            Outcome::Failed(_) => None,
        }
    }

    pub fn is_created(&self) -> bool {
        matches!(self, Outcome::Created(_))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskOutcome {
    pub key: String,
    pub title: String,
    pub outcome: Outcome,
}

/// Everything a batch run produced, in submission order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchReport {
    pub tasks: Vec<TaskOutcome>,
    /// `None` when the run had no parent issue to submit.
    pub parent: Option<Outcome>,
}

impl BatchReport {
    /// Task key to issue number for every successful task. The parent issue is not included.
    pub fn created(&self) -> BTreeMap<&str, u64> {
        self.tasks
            .iter()
            .filter_map(|task| task.outcome.number().map(|n| (task.key.as_str(), n)))
            .collect()
    }

    pub fn created_count(&self) -> usize {
        self.created().len()
    }

    pub fn failed(&self) -> impl Iterator<Item = &TaskOutcome> {
        self.tasks.iter().filter(|task| !task.outcome.is_created())
    }

    pub fn has_failures(&self) -> bool {
        self.failed().next().is_some()
            || matches!(self.parent, Some(Outcome::Failed(_)))
    }
}

/// Submits tasks one at a time, pausing between submissions.
pub struct BatchSubmitter<S> {
    sink: S,
    options: BatchOptions,
}

impl<S> BatchSubmitter<S>
where
    S: IssueSink,
{
    pub fn new(sink: S, options: BatchOptions) -> Self {
        Self { sink, options }
    }

    #[cfg(test)]
    pub(crate) fn sink(&self) -> &S {
        &self.sink
    }

    /// Submit a single task. Errors are logged and folded into [`Outcome::Failed`].
    pub async fn submit_one(&self, task: &Task) -> Outcome {
        let issue = NewIssue {
            title: &task.title,
            body: &task.body,
            labels: &self.options.labels,
        };
        match self.sink.submit(&issue).await {
            Ok(number) => Outcome::Created(number),
            Err(err) => {
                let reason = error_chain(&err);
                warn!(task = task.key(), error = %reason, "Error creating issue");
                Outcome::Failed(reason)
            }
        }
    }

    /// Submit every task in order, then the parent issue, writing the transcript to `out`.
    pub async fn run<W>(
        &self,
        tasks: &[Task],
        parent: Option<&ParentIssue>,
        out: &mut W,
    ) -> io::Result<BatchReport>
    where
        W: Write,
    {
        info!(tasks = tasks.len(), delay = ?self.options.delay, "starting batch");
        let mut report = BatchReport::default();

        for task in tasks {
            let outcome = self.submit_one(task).await;
            match &outcome {
                Outcome::Created(number) => writeln!(out, "✓ {} (#{number})", task.title)?,
                Outcome::Failed(_) => writeln!(out, "✗ {}", task.title)?,
            }
            out.flush()?;
            report.tasks.push(TaskOutcome {
                key: task.key().to_owned(),
                title: task.title.clone(),
                outcome,
            });
            sleep(self.options.delay).await;
        }

        if let Some(parent) = parent {
            writeln!(out, "\nCreating parent issue \"{}\"...", parent.title)?;
            let outcome = self.submit_one(&parent.to_task()).await;
            match &outcome {
                Outcome::Created(number) => writeln!(out, "✓ Parent issue created (#{number})")?,
                Outcome::Failed(_) => writeln!(out, "✗ Parent issue")?,
            }
            report.parent = Some(outcome);
        }

        writeln!(out, "\nSummary: {} tasks created", report.created_count())?;
        out.flush()?;
        info!(
            created = report.created_count(),
            failed = report.failed().count(),
            "batch finished"
        );
        Ok(report)
    }
}

/// Join an error and its sources with `": "`.
fn error_chain(err: &(dyn StdError + 'static)) -> String {
    let mut text = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        text.push_str(": ");
        text.push_str(&cause.to_string());
        source = cause.source();
    }
    text
}

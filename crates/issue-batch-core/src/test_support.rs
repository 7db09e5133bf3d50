use std::collections::HashSet;
use std::fmt;
use std::sync::Mutex;

use tokio::time::Instant;

use crate::batch::IssueSink;
use crate::github::NewIssue;

#[derive(Debug, Clone)]
pub(crate) struct RecordedCall {
    pub title: String,
    pub body: String,
    pub labels: Vec<String>,
    pub at: Instant,
}

#[derive(Debug)]
pub(crate) struct SimulatedFailure;

impl fmt::Display for SimulatedFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("simulated network error")
    }
}

impl std::error::Error for SimulatedFailure {}

/// In-memory sink handing out sequential numbers and failing on chosen calls (1-based).
#[derive(Debug)]
pub(crate) struct RecordingSink {
    next_number: Mutex<u64>,
    fail_on: HashSet<usize>,
    calls: Mutex<Vec<RecordedCall>>,
}

impl RecordingSink {
    pub fn numbered_from(first: u64) -> Self {
        Self {
            next_number: Mutex::new(first),
            fail_on: HashSet::new(),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn failing_at(mut self, calls: impl IntoIterator<Item = usize>) -> Self {
        self.fail_on.extend(calls);
        self
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn titles(&self) -> Vec<String> {
        self.calls().into_iter().map(|call| call.title).collect()
    }

    pub fn instants(&self) -> Vec<Instant> {
        self.calls().into_iter().map(|call| call.at).collect()
    }
}

impl IssueSink for RecordingSink {
    type Error = SimulatedFailure;

    async fn submit(&self, issue: &NewIssue<'_>) -> Result<u64, Self::Error> {
        let call_index = {
            let mut calls = self.calls.lock().unwrap();
            calls.push(RecordedCall {
                title: issue.title.to_owned(),
                body: issue.body.to_owned(),
                labels: issue.labels.to_vec(),
                at: Instant::now(),
            });
            calls.len()
        };

        if self.fail_on.contains(&call_index) {
            return Err(SimulatedFailure);
        }

        let mut next = self.next_number.lock().unwrap();
        let number = *next;
        *next += 1;
        Ok(number)
    }
}

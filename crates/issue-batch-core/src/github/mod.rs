mod client;

pub use client::{CreatedIssue, GithubClient, GithubError, GithubResult, NewIssue};

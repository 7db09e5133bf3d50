//! Core library for the issue batch importer: credentials, GitHub REST access and batch submission.

pub mod auth;
pub mod batch;
pub mod catalog;
pub mod config;
pub mod github;
pub mod import;

#[cfg(test)]
mod test_support;

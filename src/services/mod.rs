//! Service layer coordinating issue operations over the store port.

pub mod issue_service;

pub use issue_service::{apply_filters, IssueService};

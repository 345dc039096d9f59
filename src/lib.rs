pub mod client;
pub mod error;
pub mod models;
pub mod report;
pub mod source;
pub mod time;
pub mod transitions;

pub use client::{Auth, DEFAULT_PAGE_SIZE, JiraClient, JiraConfig};
pub use error::Error;
pub use models::*;

// Source re-export
pub use source::IssueSource;

// Time re-exports
pub use time::{Timestamp, elapsed_days, format_report_timestamp, parse_jira_timestamp};

// Transitions re-exports
pub use transitions::{
    CREATE_LABEL, InvalidIssuePolicy, ReconstructOptions, SkippedIssue, TransitionEvent,
    Transitions, reconstruct, reconstruct_issue, reconstruct_with,
};

// Report re-exports
pub use report::{
    OutputFormat, StateSummary, TransitionRow, generate_report, summarize, write_csv, write_json,
    write_report, write_summary,
};

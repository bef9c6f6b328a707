//! Read models assembled for display.
//!
//! Each query loads an aggregate and the records around it into one owned
//! DTO, so callers never traverse repositories themselves.

mod dto;
mod service;

pub use dto::{DefectDetails, DefectSummary, TaskDetails};
pub use service::{QueryError, QueryResult, TrackerQueries};

#[cfg(test)]
mod tests;

//! Error types for loading, validating and editing project data
//!
//! The calculation engine never fails; everything here belongs to the layers
//! that feed it.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Crate-wide result alias
pub type Result<T> = std::result::Result<T, TrackerError>;

#[derive(Debug, Error)]
pub enum TrackerError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("unknown {field} value: {value:?}")]
    UnknownValue { field: &'static str, value: String },

    #[error("period {0:?} is not part of the contract period set")]
    UnknownPeriod(String),

    #[error("no {roster} entry named {name:?}")]
    UnknownEntry { roster: &'static str, name: String },

    #[error("duplicate period label {0:?}")]
    DuplicatePeriod(String),

    #[error("{0}")]
    Validation(ValidationReport),
}

/// One problem found while validating caller input
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationIssue {
    /// What the issue is about (an entry name, "parameters", an ODC period)
    pub subject: String,
    pub message: String,
}

impl fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.subject, self.message)
    }
}

/// All issues found in one validation pass
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationReport {
    pub issues: Vec<ValidationIssue>,
}

impl ValidationReport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, subject: impl Into<String>, message: impl Into<String>) {
        self.issues.push(ValidationIssue {
            subject: subject.into(),
            message: message.into(),
        });
    }

    pub fn extend(&mut self, other: ValidationReport) {
        self.issues.extend(other.issues);
    }

    pub fn is_empty(&self) -> bool {
        self.issues.is_empty()
    }

    pub fn len(&self) -> usize {
        self.issues.len()
    }

    /// Turn a non-empty report into an error
    pub fn into_result(self) -> Result<()> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(TrackerError::Validation(self))
        }
    }
}

impl fmt::Display for ValidationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "validation failed with {} issue(s)", self.issues.len())?;
        for issue in &self.issues {
            write!(f, "\n  - {}", issue)?;
        }
        Ok(())
    }
}

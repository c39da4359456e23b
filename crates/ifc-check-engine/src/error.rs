// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Error types for rule table loading

use thiserror::Error;

/// Rule table result type
pub type Result<T> = std::result::Result<T, RuleError>;

/// Errors raised before validation starts
///
/// Per-entity anomalies never surface here; they are folded into findings.
#[derive(Error, Debug)]
pub enum RuleError {
    /// Required columns are absent from the rule table
    #[error("Rule table is missing required columns: {}", .0.join(", "))]
    MissingColumns(Vec<String>),

    /// A row could not be interpreted
    #[error("Invalid rule at row {row}: {message}")]
    InvalidRow { row: usize, message: String },

    /// The rule table could not be parsed
    #[error("Failed to parse rule table: {0}")]
    Load(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl RuleError {
    /// Create a row error (rows are numbered from 1)
    pub fn row(row: usize, msg: impl Into<String>) -> Self {
        RuleError::InvalidRow {
            row,
            message: msg.into(),
        }
    }

    /// Create a load error
    pub fn load(msg: impl Into<String>) -> Self {
        RuleError::Load(msg.into())
    }

    /// Check whether this is a schema problem rather than a parse problem
    pub fn is_schema_error(&self) -> bool {
        matches!(self, RuleError::MissingColumns(_))
    }
}

impl From<serde_json::Error> for RuleError {
    fn from(err: serde_json::Error) -> Self {
        RuleError::Load(err.to_string())
    }
}

// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Finding records produced by rules and structural checks

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Outcome of a single check
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Status {
    Pass,
    Fail,
}

impl Status {
    /// Pass when `ok`, Fail otherwise
    pub fn from_bool(ok: bool) -> Self {
        if ok {
            Status::Pass
        } else {
            Status::Fail
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Status::Pass => "Pass",
            Status::Fail => "Fail",
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for Status {
    type Err = String;

    /// Case-insensitive; surrounding whitespace is ignored
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        [Status::Pass, Status::Fail]
            .into_iter()
            .find(|status| status.as_str().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| format!("unknown status '{}'", trimmed))
    }
}

/// Severity of a finding
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorLevel {
    Critical,
    #[default]
    Warning,
    Info,
}

impl ErrorLevel {
    /// All levels, most severe first
    pub const ALL: [ErrorLevel; 3] = [ErrorLevel::Critical, ErrorLevel::Warning, ErrorLevel::Info];

    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorLevel::Critical => "Critical",
            ErrorLevel::Warning => "Warning",
            ErrorLevel::Info => "Info",
        }
    }
}

impl fmt::Display for ErrorLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for ErrorLevel {
    type Err = String;

    /// Case-insensitive; surrounding whitespace is ignored
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        ErrorLevel::ALL
            .into_iter()
            .find(|level| level.as_str().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| format!("unknown error level '{}'", trimmed))
    }
}

/// One evaluated check
///
/// Field names match the exported report columns.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Finding {
    pub entity_type: String,
    pub global_id: String,
    pub element_name: String,
    pub check_description: String,
    pub expected_value: String,
    pub actual_value: String,
    pub status: Status,
    pub error_level: ErrorLevel,
    pub location: String,
}

impl Finding {
    pub fn is_pass(&self) -> bool {
        self.status == Status::Pass
    }

    pub fn is_fail(&self) -> bool {
        self.status == Status::Fail
    }
}

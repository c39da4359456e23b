// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Aggregate counts, compliance score and the exported report

use crate::finding::{ErrorLevel, Finding, Status};
use ifc_check_model::IfcModel;
use serde::{Deserialize, Serialize};

/// Compliance score at or above which a model is reported as passing
pub const PASS_THRESHOLD: f64 = 90.0;

/// Counts over a finding sequence
///
/// Per-level counts only include failures.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ValidationSummary {
    pub total: usize,
    pub passed: usize,
    pub failed: usize,
    pub critical: usize,
    pub warning: usize,
    pub info: usize,
    /// `passed / total * 100`, 0 for an empty run
    pub compliance_score: f64,
}

impl ValidationSummary {
    pub fn from_findings(findings: &[Finding]) -> Self {
        let total = findings.len();
        let passed = findings.iter().filter(|f| f.is_pass()).count();
        let failures_at = |level: ErrorLevel| {
            findings
                .iter()
                .filter(|f| f.is_fail() && f.error_level == level)
                .count()
        };

        let compliance_score = if total == 0 {
            0.0
        } else {
            passed as f64 * 100.0 / total as f64
        };

        Self {
            total,
            passed,
            failed: total - passed,
            critical: failures_at(ErrorLevel::Critical),
            warning: failures_at(ErrorLevel::Warning),
            info: failures_at(ErrorLevel::Info),
            compliance_score,
        }
    }

    /// Check whether the score reaches [`PASS_THRESHOLD`]
    pub fn passes_threshold(&self) -> bool {
        self.compliance_score >= PASS_THRESHOLD
    }
}

/// Model and rule table a report was produced from
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ReportMetadata {
    /// File name of the model, as given by the caller
    pub ifc_file: String,
    pub ifc_schema: String,
    /// Rooted entities in the model (`IfcRoot` and its subtypes)
    #[serde(default)]
    pub total_entities: usize,
    pub validation_rules: usize,
}

/// Findings together with their summary, ready for export
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ValidationReport {
    pub report_metadata: ReportMetadata,
    pub validation_summary: ValidationSummary,
    pub results: Vec<Finding>,
}

impl ValidationReport {
    /// Build a report for a finished run
    pub fn new(
        ifc_file: impl Into<String>,
        model: &dyn IfcModel,
        rule_count: usize,
        results: Vec<Finding>,
    ) -> Self {
        Self {
            report_metadata: ReportMetadata {
                ifc_file: ifc_file.into(),
                ifc_schema: model.schema().to_string(),
                total_entities: model.count_by_type("IfcRoot"),
                validation_rules: rule_count,
            },
            validation_summary: ValidationSummary::from_findings(&results),
            results,
        }
    }

    /// Failed findings, in report order
    pub fn failures(&self) -> impl Iterator<Item = &Finding> {
        self.results.iter().filter(|f| f.is_fail())
    }

    /// Findings matching an optional entity type and status
    ///
    /// The entity type is compared case-insensitively against the finding's
    /// entity type as written in the rule table.
    pub fn filter<'a>(
        &'a self,
        entity_type: Option<&'a str>,
        status: Option<Status>,
    ) -> impl Iterator<Item = &'a Finding> + 'a {
        self.results.iter().filter(move |f| {
            entity_type.map_or(true, |t| f.entity_type.eq_ignore_ascii_case(t))
                && status.map_or(true, |s| f.status == s)
        })
    }

    /// Copy of the report keeping only the [`filter`](Self::filter) matches;
    /// metadata and summary still cover the whole run
    pub fn filtered(&self, entity_type: Option<&str>, status: Option<Status>) -> Self {
        Self {
            report_metadata: self.report_metadata.clone(),
            validation_summary: self.validation_summary.clone(),
            results: self.filter(entity_type, status).cloned().collect(),
        }
    }

    pub fn to_json_string(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

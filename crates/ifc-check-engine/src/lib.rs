// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! IFC-Check Engine - Rule-based model validation
//!
//! Checks an IFC model against a project rule table and a fixed set of
//! structural checks, producing an ordered list of [`Finding`]s.
//!
//! # Architecture
//!
//! - [`resolve`] - Property value through property-set relations
//! - [`locate`] - Containing building storey
//! - [`evaluate`] - One rule against one entity
//! - [`checks`] - Geometry, spatial hierarchy and classification checks
//! - [`ValidationEngine`] - Rules in table order, then structural checks
//! - [`ValidationSummary`] / [`ValidationReport`] - Counts, score and export
//!
//! Only rule table problems are errors. Anything odd about a single entity
//! (missing properties, broken relations, non-numeric values) ends up as an
//! ordinary finding.
//!
//! # Example
//!
//! ```ignore
//! use ifc_check_engine::{RuleTable, ValidationEngine, ValidationOptions, ValidationSummary};
//!
//! let model = ifc_check_parser::open("house.ifc")?;
//! let rules = RuleTable::from_json_file("rules.json")?;
//! let findings = ValidationEngine::new(ValidationOptions::default()).run(model.as_ref(), &rules);
//! println!("{:.1}%", ValidationSummary::from_findings(&findings).compliance_score);
//! ```

pub mod checks;
mod engine;
mod error;
mod evaluator;
mod finding;
mod location;
mod property;
pub mod rules;
mod summary;

#[cfg(test)]
mod testing;

pub use checks::StructuralCheck;
pub use engine::{run, ValidationEngine, ValidationOptions};
pub use error::{Result, RuleError};
pub use evaluator::evaluate;
pub use finding::{ErrorLevel, Finding, Status};
pub use location::{locate, PROJECT_LOCATION, UNKNOWN_LOCATION, UNNAMED_STOREY};
pub use property::resolve;
pub use rules::{Bound, RuleTable, ValidationRule};
pub use summary::{ReportMetadata, ValidationReport, ValidationSummary, PASS_THRESHOLD};

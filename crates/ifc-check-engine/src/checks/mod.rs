// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Structural checks - fixed, rule-independent model checks
//!
//! Each check runs once per model and reports through the same [`Finding`]
//! record as the rule evaluator.

mod classification;
mod geometry;
mod spatial;

pub use classification::ClassificationCheck;
pub use geometry::GeometryCheck;
pub use spatial::SpatialHierarchyCheck;

use crate::finding::{ErrorLevel, Finding, Status};
use crate::location::PROJECT_LOCATION;
use ifc_check_model::{IfcModel, MISSING_GLOBAL_ID};

/// Model-wide check producing zero or more findings
pub trait StructuralCheck: Send + Sync {
    /// Short name used in logs
    fn name(&self) -> &'static str;

    /// Run the check against a model
    fn check(&self, model: &dyn IfcModel) -> Vec<Finding>;
}

/// Model-level "at least one" finding reported at project location
struct CountFinding<'a> {
    entity_type: &'a str,
    element_name: &'a str,
    check_description: &'a str,
    expected_value: &'a str,
    actual_value: String,
    ok: bool,
    /// Level reported on failure; passes are always Info
    fail_level: ErrorLevel,
}

impl CountFinding<'_> {
    fn into_finding(self) -> Finding {
        Finding {
            entity_type: self.entity_type.to_string(),
            global_id: MISSING_GLOBAL_ID.to_string(),
            element_name: self.element_name.to_string(),
            check_description: self.check_description.to_string(),
            expected_value: self.expected_value.to_string(),
            actual_value: self.actual_value,
            status: Status::from_bool(self.ok),
            error_level: if self.ok { ErrorLevel::Info } else { self.fail_level },
            location: PROJECT_LOCATION.to_string(),
        }
    }
}

// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Spatial hierarchy completeness check

use super::{CountFinding, StructuralCheck};
use crate::finding::{ErrorLevel, Finding};
use ifc_check_model::IfcModel;

/// Spatial level, description, expectation, plural label, level on failure
const LEVELS: [(&str, &str, &str, &str, ErrorLevel); 3] = [
    ("IfcSite", "Site exists in model", "At least 1 site", "site(s)", ErrorLevel::Critical),
    (
        "IfcBuilding",
        "Building exists in model",
        "At least 1 building",
        "building(s)",
        ErrorLevel::Critical,
    ),
    (
        "IfcBuildingStorey",
        "Building storeys exist in model",
        "At least 1 storey",
        "storey(s)",
        ErrorLevel::Warning,
    ),
];

/// Reports whether the model has a site, a building and a storey
#[derive(Clone, Copy, Debug, Default)]
pub struct SpatialHierarchyCheck;

impl StructuralCheck for SpatialHierarchyCheck {
    fn name(&self) -> &'static str {
        "spatial"
    }

    fn check(&self, model: &dyn IfcModel) -> Vec<Finding> {
        LEVELS
            .iter()
            .map(|&(ifc_type, description, expected, label, fail_level)| {
                let count = model.count_by_type(ifc_type);
                CountFinding {
                    entity_type: "IfcProject",
                    element_name: "Spatial Structure",
                    check_description: description,
                    expected_value: expected,
                    actual_value: format!("{} {}", count, label),
                    ok: count > 0,
                    fail_level,
                }
                .into_finding()
            })
            .collect()
    }
}

// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Classification system and coverage check

use super::{CountFinding, StructuralCheck};
use crate::finding::{ErrorLevel, Finding, Status};
use crate::location::PROJECT_LOCATION;
use ifc_check_model::{Entity, IfcModel, MISSING_GLOBAL_ID};

/// Element types whose classification coverage is reported
pub const COVERAGE_TYPES: [&str; 3] = ["IfcWall", "IfcDoor", "IfcWindow"];

/// Reports classification systems and per-type classification coverage
#[derive(Clone, Copy, Debug, Default)]
pub struct ClassificationCheck;

impl StructuralCheck for ClassificationCheck {
    fn name(&self) -> &'static str {
        "classification"
    }

    fn check(&self, model: &dyn IfcModel) -> Vec<Finding> {
        let systems = model.count_by_type("IfcClassification");
        let mut findings = vec![CountFinding {
            entity_type: "IfcProject",
            element_name: "Classification",
            check_description: "Classification system defined",
            expected_value: "At least 1 classification system",
            actual_value: format!("{} system(s)", systems),
            ok: systems > 0,
            fail_level: ErrorLevel::Info,
        }
        .into_finding()];

        for entity_type in COVERAGE_TYPES {
            let entities = model.by_type(entity_type);
            if entities.is_empty() {
                continue;
            }

            let total = entities.len();
            let classified = entities
                .iter()
                .filter(|e| is_classified(model, e))
                .count();
            let percentage = classified as f64 / total as f64 * 100.0;

            findings.push(Finding {
                entity_type: entity_type.to_string(),
                global_id: MISSING_GLOBAL_ID.to_string(),
                element_name: "Classification Coverage".to_string(),
                check_description: format!("{} classification coverage", entity_type),
                expected_value: "100% classified".to_string(),
                actual_value: format!("{:.1}% classified ({}/{})", percentage, classified, total),
                status: Status::from_bool(classified == total),
                error_level: ErrorLevel::Info,
                location: PROJECT_LOCATION.to_string(),
            });
        }

        findings
    }
}

fn is_classified(model: &dyn IfcModel, entity: &Entity) -> bool {
    match model.relations().associations(entity.id) {
        Ok(associations) => associations.iter().any(|a| a.is_classification()),
        Err(e) => {
            log::debug!("Associations of {} unreadable: {}", entity.id, e);
            false
        }
    }
}

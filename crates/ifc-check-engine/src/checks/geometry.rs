// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Geometry presence check

use super::StructuralCheck;
use crate::finding::{ErrorLevel, Finding, Status};
use crate::location::locate;
use ifc_check_model::IfcModel;

/// Element types that must carry a shape representation
pub const GEOMETRY_TYPES: [&str; 6] = ["IfcWall", "IfcDoor", "IfcWindow", "IfcSlab", "IfcColumn", "IfcBeam"];

/// Reports, per structural element, whether it has a shape representation
#[derive(Clone, Copy, Debug, Default)]
pub struct GeometryCheck;

impl StructuralCheck for GeometryCheck {
    fn name(&self) -> &'static str {
        "geometry"
    }

    fn check(&self, model: &dyn IfcModel) -> Vec<Finding> {
        let mut findings = Vec::new();

        for entity_type in GEOMETRY_TYPES {
            for entity in model.by_type(entity_type) {
                let has_geometry = match model.relations().representation(entity.id) {
                    Ok(shape) => shape.is_some(),
                    Err(e) => {
                        log::debug!("Representation of {} unreadable: {}", entity.id, e);
                        false
                    }
                };

                findings.push(Finding {
                    entity_type: entity_type.to_string(),
                    global_id: entity.global_id_or_default().to_string(),
                    element_name: entity.display_name().to_string(),
                    check_description: "Geometry presence check".to_string(),
                    expected_value: "Has valid geometry".to_string(),
                    actual_value: if has_geometry { "Geometry present" } else { "No geometry" }
                        .to_string(),
                    status: Status::from_bool(has_geometry),
                    error_level: if has_geometry { ErrorLevel::Info } else { ErrorLevel::Warning },
                    location: locate(model, &entity),
                });
            }
        }

        findings
    }
}

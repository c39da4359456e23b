// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Storey lookup through spatial containment

use ifc_check_model::{Entity, IfcModel};

/// Location of an entity that is not contained in a storey
pub const UNKNOWN_LOCATION: &str = "Unknown";

/// Location of an entity contained in a storey without a name
pub const UNNAMED_STOREY: &str = "Unknown Storey";

/// Location reported by model-wide checks
pub const PROJECT_LOCATION: &str = "Project";

/// Name of the building storey containing an entity
pub fn locate(model: &dyn IfcModel, entity: &Entity) -> String {
    let containers = match model.relations().contained_in(entity.id) {
        Ok(containers) => containers,
        Err(e) => {
            log::debug!("Location of {} treated as unknown: {}", entity.id, e);
            return UNKNOWN_LOCATION.to_string();
        }
    };

    containers
        .into_iter()
        .find(|c| c.is_storey_containment())
        .map(|storey| {
            storey
                .container_name
                .unwrap_or_else(|| UNNAMED_STOREY.to_string())
        })
        .unwrap_or_else(|| UNKNOWN_LOCATION.to_string())
}

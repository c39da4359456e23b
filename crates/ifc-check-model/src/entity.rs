// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Stable entity handle handed out by type selection

use crate::{EntityId, IfcType};
use serde::{Deserialize, Serialize};

/// Placeholder used when an entity carries no GlobalId
pub const MISSING_GLOBAL_ID: &str = "N/A";

/// Placeholder used when an entity carries no Name
pub const MISSING_NAME: &str = "Unnamed";

/// A rooted IFC object as seen by the validator
///
/// Only the identifying attributes are materialized; everything reachable
/// through relations is queried on demand via [`crate::RelationReader`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Entity {
    /// STEP instance id
    pub id: EntityId,
    /// Concrete entity type
    pub ifc_type: IfcType,
    /// GlobalId (22-character compressed GUID)
    pub global_id: Option<String>,
    /// Name attribute
    pub name: Option<String>,
}

impl Entity {
    /// Create a new entity handle
    pub fn new(id: EntityId, ifc_type: IfcType) -> Self {
        Self {
            id,
            ifc_type,
            global_id: None,
            name: None,
        }
    }

    /// Set the GlobalId
    pub fn with_global_id(mut self, global_id: impl Into<String>) -> Self {
        self.global_id = Some(global_id.into());
        self
    }

    /// Set the Name
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// GlobalId, or `"N/A"`
    pub fn global_id_or_default(&self) -> &str {
        self.global_id.as_deref().unwrap_or(MISSING_GLOBAL_ID)
    }

    /// Name, or `"Unnamed"`
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or(MISSING_NAME)
    }
}

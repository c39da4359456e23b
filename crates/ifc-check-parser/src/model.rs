// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! StepModel - main IfcModel implementation

use crate::header::parse_header;
use crate::relations::RelationIndex;
use crate::store::EntityStore;
use ifc_check_model::{
    DecodedEntity, Entity, IfcModel, IfcType, LoadResult, ModelMetadata, RelationReader,
};
use std::sync::Arc;

/// Parsed IFC model implementing the IfcModel trait
pub struct StepModel {
    store: Arc<EntityStore>,
    relations: RelationIndex,
    metadata: ModelMetadata,
}

impl StepModel {
    /// Parse IFC content into a model
    pub fn parse(content: &str, strict: bool) -> LoadResult<Self> {
        let metadata = parse_header(content)?;
        let store = Arc::new(EntityStore::build(content.to_string(), strict)?);
        let relations = RelationIndex::new(Arc::clone(&store));

        log::info!(
            "Loaded {} model with {} instances",
            metadata.schema_version,
            store.len()
        );

        Ok(Self {
            store,
            relations,
            metadata,
        })
    }
}

/// Project a decoded product onto the identity fields
fn to_entity(decoded: &DecodedEntity) -> Entity {
    let mut entity = Entity::new(decoded.id, decoded.ifc_type.clone());
    // GlobalId at index 0, Name at index 2
    entity.global_id = decoded.get_string(0).map(str::to_string);
    entity.name = decoded.get_string(2).map(str::to_string);
    entity
}

impl IfcModel for StepModel {
    fn by_type(&self, type_name: &str) -> Vec<Entity> {
        let ifc_type = IfcType::parse(type_name);
        if matches!(&ifc_type, IfcType::Unknown(name) if name.is_empty()) {
            return Vec::new();
        }
        self.store
            .entities_of_type(&ifc_type)
            .iter()
            .map(|decoded| to_entity(decoded))
            .collect()
    }

    fn count_by_type(&self, type_name: &str) -> usize {
        let ifc_type = IfcType::parse(type_name);
        self.store.ids_of_type(&ifc_type).len()
    }

    fn relations(&self) -> &dyn RelationReader {
        &self.relations
    }

    fn metadata(&self) -> &ModelMetadata {
        &self.metadata
    }
}

// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Entity store: record index, type index and lazy decoding cache

use crate::scanner::EntityScanner;
use crate::tokenizer::parse_entity;
use ifc_check_model::{DecodedEntity, EntityId, IfcType, LoadError, LoadResult};
use rustc_hash::FxHashMap;
use std::sync::{Arc, RwLock};

/// Position of a record in the file, used to keep file order across types
type Sequence = usize;

/// Thread-safe store of instance records
///
/// Records are located once at load time; attribute decoding happens on
/// first access and is cached.
pub struct EntityStore {
    /// Raw IFC content (owned for thread safety)
    content: String,
    /// Entity ID -> (start, end) byte offsets
    index: FxHashMap<u32, (usize, usize)>,
    /// Decoded entity cache
    cache: RwLock<FxHashMap<u32, Arc<DecodedEntity>>>,
    /// Type -> entity IDs in file order
    type_index: FxHashMap<IfcType, Vec<(Sequence, EntityId)>>,
}

impl EntityStore {
    /// Index all records of the DATA section
    ///
    /// With `strict` set every record is decoded up front and the first
    /// malformed one fails the load. Otherwise malformed records are only
    /// noticed when something references them.
    pub fn build(content: String, strict: bool) -> LoadResult<Self> {
        let mut index = FxHashMap::default();
        let mut type_index: FxHashMap<IfcType, Vec<(Sequence, EntityId)>> = FxHashMap::default();

        let scanner = EntityScanner::new(&content)
            .ok_or_else(|| LoadError::format("missing DATA section"))?;
        for (seq, record) in scanner.enumerate() {
            if index.insert(record.id, (record.start, record.end)).is_some() {
                log::warn!("Duplicate instance #{}, keeping the last definition", record.id);
            }
            type_index
                .entry(IfcType::parse(record.type_name))
                .or_default()
                .push((seq, EntityId(record.id)));
        }

        log::debug!(
            "Indexed {} records across {} types",
            index.len(),
            type_index.len()
        );

        let store = Self {
            content,
            index,
            cache: RwLock::new(FxHashMap::default()),
            type_index,
        };

        if strict {
            for (&id, &(start, end)) in &store.index {
                parse_entity(&store.content[start..end])
                    .map_err(|e| LoadError::EntityParse(EntityId(id), e))?;
            }
        }

        Ok(store)
    }

    /// Get a decoded entity, `None` if missing or undecodable
    pub fn get(&self, id: EntityId) -> Option<Arc<DecodedEntity>> {
        {
            let cache = self.cache.read().ok()?;
            if let Some(cached) = cache.get(&id.0) {
                return Some(Arc::clone(cached));
            }
        }

        let &(start, end) = self.index.get(&id.0)?;
        let entity = match parse_entity(&self.content[start..end]) {
            Ok(entity) => Arc::new(entity),
            Err(e) => {
                log::debug!("Skipping undecodable record {}: {}", id, e);
                return None;
            }
        };

        if let Ok(mut cache) = self.cache.write() {
            cache.insert(id.0, Arc::clone(&entity));
        }

        Some(entity)
    }

    /// IDs of a type and its schema subtypes, in file order
    pub fn ids_of_type(&self, ifc_type: &IfcType) -> Vec<EntityId> {
        let mut matches: Vec<(Sequence, EntityId)> = self
            .type_index
            .iter()
            .filter(|(t, _)| t.is_a(ifc_type))
            .flat_map(|(_, ids)| ids.iter().copied())
            .collect();
        matches.sort_unstable_by_key(|(seq, _)| *seq);
        matches.into_iter().map(|(_, id)| id).collect()
    }

    /// Decoded entities of a type and its subtypes, in file order
    pub fn entities_of_type(&self, ifc_type: &IfcType) -> Vec<Arc<DecodedEntity>> {
        self.ids_of_type(ifc_type)
            .into_iter()
            .filter_map(|id| self.get(id))
            .collect()
    }

    /// Sort key that follows file order; unknown IDs sort last
    pub fn sequence(&self, id: EntityId) -> usize {
        self.index.get(&id.0).map_or(usize::MAX, |&(start, _)| start)
    }

    /// Number of indexed records
    pub fn len(&self) -> usize {
        self.index.len()
    }

    /// Check whether the DATA section is empty
    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }
}

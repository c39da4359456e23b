// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! RelationReader implementation backed by inverse relation indexes

use crate::store::EntityStore;
use ifc_check_model::{
    Association, AttributeValue, Containment, DecodedEntity, DefinedBy, EntityId, IfcType,
    ModelError, NominalValue, Property, PropertyDefinition, PropertySet, RelationReader, Result,
};
use rustc_hash::FxHashMap;
use std::sync::Arc;

/// RelatedObjects / RelatedElements on every indexed relationship
const RELATED: usize = 4;
/// RelatingPropertyDefinition / RelatingType / RelatingStructure / Relating*
const RELATING: usize = 5;
/// Representation on IfcProduct
const REPRESENTATION: usize = 6;

/// Relationship types served by [`RelationReader::defined_by`]
const DEFINES: [IfcType; 2] = [IfcType::IfcRelDefinesByProperties, IfcType::IfcRelDefinesByType];

/// Relationship types served by [`RelationReader::contained_in`]
const CONTAINS: [IfcType; 2] = [
    IfcType::IfcRelContainedInSpatialStructure,
    IfcType::IfcRelReferencedInSpatialStructure,
];

/// Relationship types served by [`RelationReader::associations`]
const ASSOCIATES: [IfcType; 3] = [
    IfcType::IfcRelAssociatesClassification,
    IfcType::IfcRelAssociatesMaterial,
    IfcType::IfcRelAssociatesDocument,
];

/// One relationship instance as seen from a related object
#[derive(Clone, Copy, Debug)]
struct Link {
    relation: EntityId,
    /// `None` when the relating attribute is not a reference
    relating: Option<EntityId>,
}

/// Object ID -> relationships in file order
type LinkIndex = FxHashMap<u32, Vec<(IfcType, Link)>>;

/// Relation reader implementation
pub struct RelationIndex {
    store: Arc<EntityStore>,
    defined_by: LinkIndex,
    contained_in: LinkIndex,
    associations: LinkIndex,
}

impl RelationIndex {
    /// Build the inverse indexes from all relationship instances
    pub fn new(store: Arc<EntityStore>) -> Self {
        let defined_by = build_index(&store, &DEFINES);
        let contained_in = build_index(&store, &CONTAINS);
        let associations = build_index(&store, &ASSOCIATES);

        log::debug!(
            "Relation index: {} defined, {} contained, {} associated objects",
            defined_by.len(),
            contained_in.len(),
            associations.len()
        );

        Self {
            store,
            defined_by,
            contained_in,
            associations,
        }
    }

    fn links(index: &LinkIndex, id: EntityId) -> &[(IfcType, Link)] {
        index.get(&id.0).map(Vec::as_slice).unwrap_or_default()
    }

    /// Resolve the relating side of a link
    fn relating(&self, link: &Link) -> Result<Arc<DecodedEntity>> {
        let target = link
            .relating
            .ok_or(ModelError::MissingAttribute {
                entity: link.relation,
                attribute: RELATING,
            })?;
        self.store
            .get(target)
            .ok_or(ModelError::dangling(link.relation, RELATING))
    }

    /// Read one property-definition relation; the set's contents stay undecoded
    fn read_definition(&self, relation: &IfcType, link: &Link) -> Result<DefinedBy> {
        if *relation == IfcType::IfcRelDefinesByType {
            let type_object = link.relating.ok_or(ModelError::MissingAttribute {
                entity: link.relation,
                attribute: RELATING,
            })?;
            return Ok(DefinedBy::Type(type_object));
        }

        let target = self.relating(link)?;
        let name = target.get_string(2).map(str::to_string);
        let definition = match target.ifc_type {
            IfcType::IfcPropertySet => PropertyDefinition::PropertySet(PropertySet {
                id: target.id,
                name,
            }),
            IfcType::IfcElementQuantity => PropertyDefinition::Quantities { name },
            ref other => PropertyDefinition::Other(other.clone()),
        };
        Ok(DefinedBy::Properties(definition))
    }
}

fn build_index(store: &EntityStore, types: &[IfcType]) -> LinkIndex {
    let mut rels: Vec<Arc<DecodedEntity>> = types
        .iter()
        .flat_map(|t| store.entities_of_type(t))
        .collect();
    rels.sort_unstable_by_key(|rel| store.sequence(rel.id));

    let mut index = LinkIndex::default();
    for rel in rels {
        let related = match rel.get(RELATED) {
            Some(AttributeValue::List(list)) => list,
            _ => {
                log::debug!("Relationship {} has no related objects list, skipped", rel.id);
                continue;
            }
        };
        let link = Link {
            relation: rel.id,
            relating: rel.get_ref(RELATING),
        };
        for object in related.iter().filter_map(AttributeValue::as_entity_ref) {
            index
                .entry(object.0)
                .or_default()
                .push((rel.ifc_type.clone(), link));
        }
    }
    index
}

/// Read a property; only single-value properties carry a nominal value
fn read_property(prop: &DecodedEntity) -> Result<Property> {
    let name = prop
        .get_string(0)
        .ok_or(ModelError::MissingAttribute { entity: prop.id, attribute: 0 })?;

    Ok(match prop.ifc_type {
        // NominalValue at index 2
        IfcType::IfcPropertySingleValue => Property {
            name: name.to_string(),
            has_nominal_attribute: true,
            nominal_value: prop.get(2).and_then(decode_nominal),
        },
        _ => Property::valueless(name),
    })
}

/// Measure types whose underlying type is INTEGER
const INTEGER_TYPES: &[&str] = &[
    "IFCINTEGER",
    "IFCPOSITIVEINTEGER",
    "IFCCOUNTMEASURE",
    "IFCTIMESTAMP",
    "IFCDAYINMONTHNUMBER",
    "IFCMONTHINYEARNUMBER",
    "IFCYEARNUMBER",
    "IFCDIMENSIONCOUNT",
    "IFCCARDINALPOINTREFERENCE",
];

/// Decode a nominal value (a typed value such as `IFCLABEL('x')`)
pub(crate) fn decode_nominal(value: &AttributeValue) -> Option<NominalValue> {
    match value {
        AttributeValue::TypedValue(type_name, args) => {
            let inner = args.first()?;
            match (type_name.as_str(), inner) {
                ("IFCBOOLEAN" | "IFCLOGICAL", AttributeValue::Enum(e)) => decode_logical(e),
                (name, AttributeValue::Integer(i)) if INTEGER_TYPES.contains(&name) => {
                    Some(NominalValue::Integer(*i))
                }
                (_, AttributeValue::Integer(i)) => Some(NominalValue::Real(*i as f64)),
                (_, other) => decode_nominal(other),
            }
        }
        AttributeValue::String(s) => Some(NominalValue::Text(s.clone())),
        AttributeValue::Integer(i) => Some(NominalValue::Integer(*i)),
        AttributeValue::Float(f) => Some(NominalValue::Real(*f)),
        AttributeValue::Enum(e) => decode_logical(e).or_else(|| Some(NominalValue::Text(e.clone()))),
        _ => None,
    }
}

fn decode_logical(e: &str) -> Option<NominalValue> {
    match e.to_ascii_uppercase().as_str() {
        "T" | "TRUE" => Some(NominalValue::Boolean(true)),
        "F" | "FALSE" => Some(NominalValue::Boolean(false)),
        "U" | "UNKNOWN" => Some(NominalValue::Text("UNKNOWN".to_string())),
        _ => None,
    }
}

impl RelationReader for RelationIndex {
    fn defined_by(&self, id: EntityId) -> Vec<Result<DefinedBy>> {
        Self::links(&self.defined_by, id)
            .iter()
            .map(|(relation, link)| self.read_definition(relation, link))
            .collect()
    }

    fn properties(&self, property_set: EntityId) -> Result<Vec<Property>> {
        let pset = self
            .store
            .get(property_set)
            .ok_or(ModelError::EntityNotFound(property_set))?;

        // HasProperties at index 4
        let refs = match pset.get(4) {
            Some(AttributeValue::List(list)) => list,
            Some(other) => {
                return Err(ModelError::type_mismatch(pset.id, 4, "list", other.kind()));
            }
            None => return Err(ModelError::MissingAttribute { entity: pset.id, attribute: 4 }),
        };

        refs.iter()
            .map(|value| {
                let prop_id = value
                    .as_entity_ref()
                    .ok_or_else(|| ModelError::type_mismatch(pset.id, 4, "reference", value.kind()))?;
                let prop = self
                    .store
                    .get(prop_id)
                    .ok_or(ModelError::dangling(pset.id, 4))?;
                read_property(&prop)
            })
            .collect()
    }

    fn contained_in(&self, id: EntityId) -> Result<Vec<Containment>> {
        Self::links(&self.contained_in, id)
            .iter()
            .map(|(relation, link)| {
                let container = self.relating(link)?;
                Ok(Containment {
                    relation: relation.clone(),
                    container: container.id,
                    container_type: container.ifc_type.clone(),
                    container_name: container.get_string(2).map(str::to_string),
                })
            })
            .collect()
    }

    fn associations(&self, id: EntityId) -> Result<Vec<Association>> {
        Self::links(&self.associations, id)
            .iter()
            .map(|(relation, link)| {
                let relating = link.relating.ok_or(ModelError::MissingAttribute {
                    entity: link.relation,
                    attribute: RELATING,
                })?;
                Ok(Association {
                    relation: relation.clone(),
                    relating,
                })
            })
            .collect()
    }

    fn representation(&self, id: EntityId) -> Result<Option<EntityId>> {
        let entity = self.store.get(id).ok_or(ModelError::EntityNotFound(id))?;
        match entity.get(REPRESENTATION) {
            Some(AttributeValue::EntityRef(shape)) => Ok(Some(*shape)),
            Some(AttributeValue::Null) | None => Ok(None),
            Some(other) => Err(ModelError::type_mismatch(
                id,
                REPRESENTATION,
                "reference",
                other.kind(),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TEST_IFC: &str = r#"ISO-10303-21;
HEADER;
FILE_SCHEMA(('IFC2X3'));
ENDSEC;
DATA;
#10=IFCBUILDINGSTOREY('s1',$,'Level 1',$,$,$,$,$,.ELEMENT.,0.);
#20=IFCWALL('w1',$,'Wall 1',$,$,$,#90,$);
#21=IFCWALL('w2',$,'Wall 2',$,$,$,$,$);
#30=IFCPROPERTYSINGLEVALUE('IsExternal',$,IFCBOOLEAN(.T.),$);
#31=IFCPROPERTYSINGLEVALUE('FireRating',$,IFCLABEL('REI60'),$);
#32=IFCPROPERTYSINGLEVALUE('Width',$,IFCLENGTHMEASURE(200.),$);
#33=IFCPROPERTYENUMERATEDVALUE('Status',$,(IFCLABEL('NEW')),$);
#40=IFCPROPERTYSET('ps1',$,'Pset_WallCommon',$,(#30,#31,#33));
#41=IFCPROPERTYSET('ps2',$,'Dimensions',$,(#32));
#42=IFCPROPERTYSET('ps3',$,'Broken',$,(#99));
#50=IFCRELDEFINESBYPROPERTIES('r1',$,$,$,(#20,#21),#40);
#51=IFCRELDEFINESBYPROPERTIES('r2',$,$,$,(#20),#41);
#52=IFCRELDEFINESBYPROPERTIES('r3',$,$,$,(#21),#42);
#60=IFCRELCONTAINEDINSPATIALSTRUCTURE('r4',$,$,$,(#20),#10);
#70=IFCCLASSIFICATIONREFERENCE($,'Ss_25',$,$);
#71=IFCRELASSOCIATESCLASSIFICATION('r5',$,$,$,(#20),#70);
#90=IFCPRODUCTDEFINITIONSHAPE($,$,());
ENDSEC;
END-ISO-10303-21;
"#;

    fn index() -> RelationIndex {
        let store = Arc::new(EntityStore::build(TEST_IFC.to_string(), false).unwrap());
        RelationIndex::new(store)
    }

    fn property_set(definition: &Result<DefinedBy>) -> &PropertySet {
        match definition {
            Ok(DefinedBy::Properties(def)) => def.as_property_set().unwrap(),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_defined_by_in_relation_order() {
        let relations = index();
        let defined = relations.defined_by(EntityId(20));
        assert_eq!(defined.len(), 2);

        let first = property_set(&defined[0]);
        assert_eq!(first.id, EntityId(40));
        assert!(first.is_named("Pset_WallCommon"));
        assert_eq!(
            relations.properties(first.id).unwrap(),
            vec![
                Property::single("IsExternal", NominalValue::Boolean(true)),
                Property::single("FireRating", NominalValue::Text("REI60".into())),
                Property::valueless("Status"),
            ]
        );

        let second = property_set(&defined[1]);
        assert!(second.is_named("Dimensions"));
        assert_eq!(
            relations.properties(second.id).unwrap()[0].nominal_value,
            Some(NominalValue::Real(200.0))
        );
    }

    #[test]
    fn test_broken_set_does_not_hide_other_relations() {
        let relations = index();
        let defined = relations.defined_by(EntityId(21));
        assert_eq!(defined.len(), 2);
        assert!(property_set(&defined[0]).is_named("Pset_WallCommon"));
        assert!(property_set(&defined[1]).is_named("Broken"));

        assert_eq!(
            relations.properties(EntityId(42)),
            Err(ModelError::dangling(EntityId(42), 4))
        );
        assert_eq!(relations.properties(EntityId(40)).unwrap().len(), 3);
    }

    #[test]
    fn test_dangling_relating_definition_is_per_relation() {
        let content = TEST_IFC.replace(
            "#52=IFCRELDEFINESBYPROPERTIES('r3',$,$,$,(#21),#42);",
            "#52=IFCRELDEFINESBYPROPERTIES('r3',$,$,$,(#21),#98);",
        );
        let store = Arc::new(EntityStore::build(content, false).unwrap());
        let defined = RelationIndex::new(store).defined_by(EntityId(21));

        assert!(property_set(&defined[0]).is_named("Pset_WallCommon"));
        assert_eq!(defined[1], Err(ModelError::dangling(EntityId(52), RELATING)));
    }

    #[test]
    fn test_unset_single_value_keeps_nominal_attribute() {
        let content = TEST_IFC.replace(
            "#32=IFCPROPERTYSINGLEVALUE('Width',$,IFCLENGTHMEASURE(200.),$);",
            "#32=IFCPROPERTYSINGLEVALUE('Width',$,$,$);",
        );
        let store = Arc::new(EntityStore::build(content, false).unwrap());
        let properties = RelationIndex::new(store).properties(EntityId(41)).unwrap();
        assert_eq!(properties, vec![Property::unset("Width")]);
    }

    #[test]
    fn test_contained_in_storey() {
        let containers = index().contained_in(EntityId(20)).unwrap();
        assert_eq!(containers.len(), 1);
        assert!(containers[0].is_storey_containment());
        assert_eq!(containers[0].container_name.as_deref(), Some("Level 1"));

        assert!(index().contained_in(EntityId(21)).unwrap().is_empty());
    }

    #[test]
    fn test_associations() {
        let associations = index().associations(EntityId(20)).unwrap();
        assert_eq!(associations.len(), 1);
        assert!(associations[0].is_classification());
        assert_eq!(associations[0].relating, EntityId(70));
    }

    #[test]
    fn test_representation() {
        let relations = index();
        assert_eq!(relations.representation(EntityId(20)).unwrap(), Some(EntityId(90)));
        assert_eq!(relations.representation(EntityId(21)).unwrap(), None);
        assert_eq!(
            relations.representation(EntityId(999)),
            Err(ModelError::EntityNotFound(EntityId(999)))
        );
    }

    #[test]
    fn test_decode_nominal() {
        let typed = |name: &str, arg: AttributeValue| {
            AttributeValue::TypedValue(name.to_string(), vec![arg])
        };

        assert_eq!(
            decode_nominal(&typed("IFCLOGICAL", AttributeValue::Enum("U".into()))),
            Some(NominalValue::Text("UNKNOWN".into()))
        );
        assert_eq!(
            decode_nominal(&typed("IFCBOOLEAN", AttributeValue::Enum("F".into()))),
            Some(NominalValue::Boolean(false))
        );
        assert_eq!(
            decode_nominal(&typed("IFCINTEGER", AttributeValue::Integer(4))),
            Some(NominalValue::Integer(4))
        );
        assert_eq!(
            decode_nominal(&typed("IFCAREAMEASURE", AttributeValue::Integer(4))),
            Some(NominalValue::Real(4.0))
        );
        assert_eq!(decode_nominal(&AttributeValue::Null), None);
    }
}

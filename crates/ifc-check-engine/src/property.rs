// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Property lookup through property-set relations

use ifc_check_model::{DefinedBy, Entity, IfcModel, NominalValue, PropertyDefinition};

/// Resolve a single property value of an entity
///
/// Walks the entity's defined-by relations in order. Only property sets
/// named `property_set_name` are opened; in each, the first property named
/// `property_name` whose kind carries a nominal value ends the search.
/// Same-named properties without one (enumerated, bounded, list) are
/// skipped, and a later same-named set is consulted when earlier ones have
/// no hit.
///
/// Returns `None` when there is no such property, when the hit's nominal
/// value is unset, or when malformed relation data lies on the walked path.
/// Broken relations or sets after the hit, and sets with other names, are
/// never read.
pub fn resolve(
    model: &dyn IfcModel,
    entity: &Entity,
    property_set_name: &str,
    property_name: &str,
) -> Option<NominalValue> {
    let relations = model.relations();

    for definition in relations.defined_by(entity.id) {
        let pset = match definition {
            Ok(DefinedBy::Properties(PropertyDefinition::PropertySet(pset))) => pset,
            Ok(_) => continue,
            Err(e) => {
                log::debug!("Property lookup on {} treated as absent: {}", entity.id, e);
                return None;
            }
        };
        if !pset.is_named(property_set_name) {
            continue;
        }

        let properties = match relations.properties(pset.id) {
            Ok(properties) => properties,
            Err(e) => {
                log::debug!("Property lookup on {} treated as absent: {}", entity.id, e);
                return None;
            }
        };
        if let Some(prop) = properties
            .into_iter()
            .find(|prop| prop.has_nominal_attribute && prop.name == property_name)
        {
            return prop.nominal_value;
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing;
    use std::sync::Arc;

    fn wall(model: &dyn IfcModel, name: Option<&str>) -> Entity {
        model
            .by_type("IfcWall")
            .into_iter()
            .find(|w| w.name.as_deref() == name)
            .unwrap()
    }

    #[test]
    fn test_resolve_present_property() {
        let model = testing::office();
        let wall_a = wall(model.as_ref(), Some("Wall A"));

        assert_eq!(
            resolve(model.as_ref(), &wall_a, "Pset_WallCommon", "FireRating"),
            Some(NominalValue::Text("REI60".into()))
        );
        assert_eq!(
            resolve(model.as_ref(), &wall_a, "Pset_WallCommon", "IsExternal"),
            Some(NominalValue::Boolean(true))
        );
    }

    #[test]
    fn test_resolve_is_exact_on_names() {
        let model = testing::office();
        let wall_a = wall(model.as_ref(), Some("Wall A"));

        assert_eq!(resolve(model.as_ref(), &wall_a, "pset_wallcommon", "FireRating"), None);
        assert_eq!(resolve(model.as_ref(), &wall_a, "Pset_WallCommon", "LoadBearing"), None);
        assert_eq!(resolve(model.as_ref(), &wall_a, "Pset_DoorCommon", "FireRating"), None);
    }

    #[test]
    fn test_resolve_without_relations() {
        let model = testing::office();
        let wall_c = wall(model.as_ref(), Some("Wall C"));
        assert_eq!(resolve(model.as_ref(), &wall_c, "Pset_WallCommon", "FireRating"), None);
    }

    #[test]
    fn test_resolve_malformed_relation_is_absent() {
        let model = testing::office();
        let broken = wall(model.as_ref(), None);
        assert_eq!(resolve(model.as_ref(), &broken, "Pset_WallCommon", "FireRating"), None);
    }

    #[test]
    fn test_same_named_sets_in_relation_order() {
        let model = ifc_check_parser::parse(
            r#"ISO-10303-21;
HEADER;
FILE_SCHEMA(('IFC4'));
ENDSEC;
DATA;
#1=IFCWALL('0aWall0000000000000000',$,'Listed',$,$,$,$,$,$);
#2=IFCWALL('0bWall0000000000000000',$,'Split',$,$,$,$,$,$);
#10=IFCPROPERTYENUMERATEDVALUE('FireRating',$,(IFCLABEL('REI60')),$);
#11=IFCPROPERTYSINGLEVALUE('FireRating',$,IFCLABEL('REI90'),$);
#12=IFCPROPERTYSINGLEVALUE('IsExternal',$,IFCBOOLEAN(.F.),$);
#20=IFCPROPERTYSET('0aPset00000000000000000',$,'Pset_WallCommon',$,(#10));
#21=IFCPROPERTYSET('0bPset00000000000000000',$,'Pset_WallCommon',$,(#11));
#22=IFCPROPERTYSET('0cPset00000000000000000',$,'Pset_WallCommon',$,(#12));
#30=IFCRELDEFINESBYPROPERTIES('0aRel000000000000000000',$,$,$,(#1),#20);
#31=IFCRELDEFINESBYPROPERTIES('0bRel000000000000000000',$,$,$,(#1,#2),#21);
#32=IFCRELDEFINESBYPROPERTIES('0cRel000000000000000000',$,$,$,(#2),#22);
ENDSEC;
END-ISO-10303-21;
"#,
        )
        .unwrap();

        // enumerated value in the first set is skipped
        let listed = wall(model.as_ref(), Some("Listed"));
        assert_eq!(
            resolve(model.as_ref(), &listed, "Pset_WallCommon", "FireRating"),
            Some(NominalValue::Text("REI90".into()))
        );

        // properties spread over two sets of the same name
        let split = wall(model.as_ref(), Some("Split"));
        assert_eq!(
            resolve(model.as_ref(), &split, "Pset_WallCommon", "FireRating"),
            Some(NominalValue::Text("REI90".into()))
        );
        assert_eq!(
            resolve(model.as_ref(), &split, "Pset_WallCommon", "IsExternal"),
            Some(NominalValue::Boolean(false))
        );
    }

    fn house(data: &str) -> Arc<dyn IfcModel> {
        let content = format!(
            "ISO-10303-21;\nHEADER;\nFILE_SCHEMA(('IFC4'));\nENDSEC;\nDATA;\n{}\nENDSEC;\nEND-ISO-10303-21;\n",
            data
        );
        ifc_check_parser::parse(&content).unwrap()
    }

    #[test]
    fn test_broken_set_with_other_name_is_not_read() {
        let model = house(
            "#1=IFCWALL('0aWall0000000000000000',$,'North',$,$,$,$,$,$);
#10=IFCPROPERTYSINGLEVALUE('FireRating',$,IFCLABEL('REI60'),$);
#20=IFCPROPERTYSET('0aPset00000000000000000',$,'Pset_WallCommon',$,(#10));
#21=IFCPROPERTYSET('0bPset00000000000000000',$,'Pset_Other',$,(#999));
#30=IFCRELDEFINESBYPROPERTIES('0aRel000000000000000000',$,$,$,(#1),#20);
#31=IFCRELDEFINESBYPROPERTIES('0bRel000000000000000000',$,$,$,(#1),#21);",
        );
        let north = wall(model.as_ref(), Some("North"));
        assert_eq!(
            resolve(model.as_ref(), &north, "Pset_WallCommon", "FireRating"),
            Some(NominalValue::Text("REI60".into()))
        );
        assert_eq!(resolve(model.as_ref(), &north, "Pset_Other", "FireRating"), None);
    }

    #[test]
    fn test_broken_relation_after_hit_is_not_read() {
        let model = house(
            "#1=IFCWALL('0aWall0000000000000000',$,'North',$,$,$,$,$,$);
#10=IFCPROPERTYSINGLEVALUE('FireRating',$,IFCLABEL('REI60'),$);
#20=IFCPROPERTYSET('0aPset00000000000000000',$,'Pset_WallCommon',$,(#10));
#30=IFCRELDEFINESBYPROPERTIES('0aRel000000000000000000',$,$,$,(#1),#20);
#31=IFCRELDEFINESBYPROPERTIES('0bRel000000000000000000',$,$,$,(#1),#998);",
        );
        let north = wall(model.as_ref(), Some("North"));
        assert_eq!(
            resolve(model.as_ref(), &north, "Pset_WallCommon", "FireRating"),
            Some(NominalValue::Text("REI60".into()))
        );
    }

    #[test]
    fn test_single_value_after_enumerated_in_same_set() {
        let model = house(
            "#1=IFCWALL('0aWall0000000000000000',$,'North',$,$,$,$,$,$);
#11=IFCPROPERTYENUMERATEDVALUE('Status',$,(IFCLABEL('NEW')),$);
#12=IFCPROPERTYSINGLEVALUE('Status',$,IFCLABEL('EXISTING'),$);
#20=IFCPROPERTYSET('0aPset00000000000000000',$,'Pset_WallCommon',$,(#11,#12));
#30=IFCRELDEFINESBYPROPERTIES('0aRel000000000000000000',$,$,$,(#1),#20);",
        );
        let north = wall(model.as_ref(), Some("North"));
        assert_eq!(
            resolve(model.as_ref(), &north, "Pset_WallCommon", "Status"),
            Some(NominalValue::Text("EXISTING".into()))
        );
    }

    #[test]
    fn test_unset_single_value_ends_search() {
        let model = house(
            "#1=IFCWALL('0aWall0000000000000000',$,'North',$,$,$,$,$,$);
#11=IFCPROPERTYSINGLEVALUE('FireRating',$,$,$);
#12=IFCPROPERTYSINGLEVALUE('FireRating',$,IFCLABEL('REI30'),$);
#20=IFCPROPERTYSET('0aPset00000000000000000',$,'Pset_WallCommon',$,(#11));
#21=IFCPROPERTYSET('0bPset00000000000000000',$,'Pset_WallCommon',$,(#12));
#30=IFCRELDEFINESBYPROPERTIES('0aRel000000000000000000',$,$,$,(#1),#20);
#31=IFCRELDEFINESBYPROPERTIES('0bRel000000000000000000',$,$,$,(#1),#21);",
        );
        let north = wall(model.as_ref(), Some("North"));
        assert_eq!(resolve(model.as_ref(), &north, "Pset_WallCommon", "FireRating"), None);
    }
}

// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Core types for IFC data representation

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Type-safe entity identifier
///
/// Wraps the raw STEP instance number (e.g., #123 becomes EntityId(123))
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize, Default, PartialOrd, Ord)]
pub struct EntityId(pub u32);

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

impl From<u32> for EntityId {
    fn from(id: u32) -> Self {
        EntityId(id)
    }
}

impl From<EntityId> for u32 {
    fn from(id: EntityId) -> Self {
        id.0
    }
}

macro_rules! ifc_types {
    ($($variant:ident => $name:literal),* $(,)?) => {
        /// IFC entity type enumeration
        ///
        /// Covers the entity types the validator reasons about. Anything else
        /// is kept as `Unknown` with its upper-cased STEP name, so type
        /// selection still works for rule tables naming other classes.
        #[derive(Clone, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
        pub enum IfcType {
            $($variant,)*
            /// Unknown type - stores the upper-cased type name
            Unknown(String),
        }

        impl IfcType {
            /// Parse a type name string into an IfcType (case-insensitive)
            pub fn parse(s: &str) -> Self {
                let upper = s.trim().to_ascii_uppercase();
                match upper.as_str() {
                    $($name => IfcType::$variant,)*
                    _ => IfcType::Unknown(upper),
                }
            }

            /// Get the STEP type name (upper case)
            pub fn name(&self) -> &str {
                match self {
                    $(IfcType::$variant => $name,)*
                    IfcType::Unknown(s) => s,
                }
            }
        }
    };
}

ifc_types! {
    // Abstract supertypes
    IfcRoot => "IFCROOT",
    IfcObjectDefinition => "IFCOBJECTDEFINITION",
    IfcObject => "IFCOBJECT",
    IfcContext => "IFCCONTEXT",
    IfcProduct => "IFCPRODUCT",
    IfcElement => "IFCELEMENT",
    IfcBuildingElement => "IFCBUILDINGELEMENT",
    IfcFeatureElement => "IFCFEATUREELEMENT",
    IfcFeatureElementSubtraction => "IFCFEATUREELEMENTSUBTRACTION",
    IfcSpatialElement => "IFCSPATIALELEMENT",
    IfcSpatialStructureElement => "IFCSPATIALSTRUCTUREELEMENT",
    IfcRelationship => "IFCRELATIONSHIP",
    IfcRelConnects => "IFCRELCONNECTS",
    IfcRelDecomposes => "IFCRELDECOMPOSES",
    IfcRelDefines => "IFCRELDEFINES",
    IfcRelAssociates => "IFCRELASSOCIATES",
    IfcPropertyDefinition => "IFCPROPERTYDEFINITION",
    IfcPropertySetDefinition => "IFCPROPERTYSETDEFINITION",
    IfcProperty => "IFCPROPERTY",
    IfcSimpleProperty => "IFCSIMPLEPROPERTY",

    // Spatial structure
    IfcProject => "IFCPROJECT",
    IfcSite => "IFCSITE",
    IfcBuilding => "IFCBUILDING",
    IfcBuildingStorey => "IFCBUILDINGSTOREY",
    IfcSpace => "IFCSPACE",

    // Building elements
    IfcWall => "IFCWALL",
    IfcWallStandardCase => "IFCWALLSTANDARDCASE",
    IfcWallElementedCase => "IFCWALLELEMENTEDCASE",
    IfcCurtainWall => "IFCCURTAINWALL",
    IfcSlab => "IFCSLAB",
    IfcSlabStandardCase => "IFCSLABSTANDARDCASE",
    IfcSlabElementedCase => "IFCSLABELEMENTEDCASE",
    IfcRoof => "IFCROOF",
    IfcBeam => "IFCBEAM",
    IfcBeamStandardCase => "IFCBEAMSTANDARDCASE",
    IfcColumn => "IFCCOLUMN",
    IfcColumnStandardCase => "IFCCOLUMNSTANDARDCASE",
    IfcDoor => "IFCDOOR",
    IfcDoorStandardCase => "IFCDOORSTANDARDCASE",
    IfcWindow => "IFCWINDOW",
    IfcWindowStandardCase => "IFCWINDOWSTANDARDCASE",
    IfcStair => "IFCSTAIR",
    IfcRailing => "IFCRAILING",
    IfcCovering => "IFCCOVERING",
    IfcPlate => "IFCPLATE",
    IfcMember => "IFCMEMBER",
    IfcFooting => "IFCFOOTING",
    IfcBuildingElementProxy => "IFCBUILDINGELEMENTPROXY",
    IfcOpeningElement => "IFCOPENINGELEMENT",

    // Representations
    IfcProductDefinitionShape => "IFCPRODUCTDEFINITIONSHAPE",
    IfcShapeRepresentation => "IFCSHAPEREPRESENTATION",

    // Relationships
    IfcRelContainedInSpatialStructure => "IFCRELCONTAINEDINSPATIALSTRUCTURE",
    IfcRelReferencedInSpatialStructure => "IFCRELREFERENCEDINSPATIALSTRUCTURE",
    IfcRelAggregates => "IFCRELAGGREGATES",
    IfcRelDefinesByProperties => "IFCRELDEFINESBYPROPERTIES",
    IfcRelDefinesByType => "IFCRELDEFINESBYTYPE",
    IfcRelAssociatesClassification => "IFCRELASSOCIATESCLASSIFICATION",
    IfcRelAssociatesMaterial => "IFCRELASSOCIATESMATERIAL",
    IfcRelAssociatesDocument => "IFCRELASSOCIATESDOCUMENT",

    // Properties
    IfcPropertySet => "IFCPROPERTYSET",
    IfcPropertySingleValue => "IFCPROPERTYSINGLEVALUE",
    IfcPropertyEnumeratedValue => "IFCPROPERTYENUMERATEDVALUE",
    IfcPropertyBoundedValue => "IFCPROPERTYBOUNDEDVALUE",
    IfcPropertyListValue => "IFCPROPERTYLISTVALUE",
    IfcElementQuantity => "IFCELEMENTQUANTITY",

    // Classification
    IfcClassification => "IFCCLASSIFICATION",
    IfcClassificationReference => "IFCCLASSIFICATIONREFERENCE",
}

impl FromStr for IfcType {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Ok(Self::parse(s))
    }
}

impl IfcType {
    /// Direct supertype in the IFC4 inheritance tree
    ///
    /// `IfcWallStandardCase` is still an `IfcWall`, and every wall is an
    /// `IfcBuildingElement`, `IfcProduct` and `IfcRoot`, so selecting any of
    /// those must include it. Types outside the table have no known
    /// supertype and only match themselves.
    pub fn supertype(&self) -> Option<IfcType> {
        use IfcType::*;
        let parent = match self {
            IfcWallStandardCase | IfcWallElementedCase => IfcWall,
            IfcSlabStandardCase | IfcSlabElementedCase => IfcSlab,
            IfcBeamStandardCase => IfcBeam,
            IfcColumnStandardCase => IfcColumn,
            IfcDoorStandardCase => IfcDoor,
            IfcWindowStandardCase => IfcWindow,

            IfcWall | IfcCurtainWall | IfcSlab | IfcRoof | IfcBeam | IfcColumn | IfcDoor
            | IfcWindow | IfcStair | IfcRailing | IfcCovering | IfcPlate | IfcMember
            | IfcFooting | IfcBuildingElementProxy => IfcBuildingElement,
            IfcOpeningElement => IfcFeatureElementSubtraction,
            IfcFeatureElementSubtraction => IfcFeatureElement,
            IfcBuildingElement | IfcFeatureElement => IfcElement,

            IfcSite | IfcBuilding | IfcBuildingStorey | IfcSpace => IfcSpatialStructureElement,
            IfcSpatialStructureElement => IfcSpatialElement,
            IfcElement | IfcSpatialElement => IfcProduct,
            IfcProduct => IfcObject,
            IfcProject => IfcContext,
            IfcObject | IfcContext => IfcObjectDefinition,

            IfcRelContainedInSpatialStructure | IfcRelReferencedInSpatialStructure => IfcRelConnects,
            IfcRelAggregates => IfcRelDecomposes,
            IfcRelDefinesByProperties | IfcRelDefinesByType => IfcRelDefines,
            IfcRelAssociatesClassification | IfcRelAssociatesMaterial | IfcRelAssociatesDocument => {
                IfcRelAssociates
            }
            IfcRelConnects | IfcRelDecomposes | IfcRelDefines | IfcRelAssociates => IfcRelationship,

            IfcPropertySet | IfcElementQuantity => IfcPropertySetDefinition,
            IfcPropertySetDefinition => IfcPropertyDefinition,
            IfcObjectDefinition | IfcRelationship | IfcPropertyDefinition => IfcRoot,

            // Property values sit outside IfcRoot
            IfcPropertySingleValue | IfcPropertyEnumeratedValue | IfcPropertyBoundedValue
            | IfcPropertyListValue => IfcSimpleProperty,
            IfcSimpleProperty => IfcProperty,

            _ => return None,
        };
        Some(parent)
    }

    /// Check whether this type is `other` or one of its subtypes
    pub fn is_a(&self, other: &IfcType) -> bool {
        if self == other {
            return true;
        }
        let mut current = self.supertype();
        while let Some(t) = current {
            if &t == other {
                return true;
            }
            current = t.supertype();
        }
        false
    }
}

impl Default for IfcType {
    fn default() -> Self {
        IfcType::Unknown(String::new())
    }
}

impl fmt::Display for IfcType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Decoded attribute value
///
/// Represents any value that can appear in a STEP entity's attribute list.
#[derive(Clone, Debug, PartialEq, Default)]
pub enum AttributeValue {
    /// Null value ($)
    #[default]
    Null,
    /// Derived value (*)
    Derived,
    /// Entity reference (#123)
    EntityRef(EntityId),
    /// Integer value
    Integer(i64),
    /// Floating point value
    Float(f64),
    /// String value (already unescaped)
    String(String),
    /// Enumeration value (.VALUE.)
    Enum(String),
    /// List of values
    List(Vec<AttributeValue>),
    /// Typed value like IFCLABEL('text')
    TypedValue(String, Vec<AttributeValue>),
}

impl AttributeValue {
    /// Try to get as entity reference
    pub fn as_entity_ref(&self) -> Option<EntityId> {
        match self {
            AttributeValue::EntityRef(id) => Some(*id),
            _ => None,
        }
    }

    /// Try to get as string
    pub fn as_string(&self) -> Option<&str> {
        match self {
            AttributeValue::String(s) => Some(s),
            AttributeValue::TypedValue(_, args) if !args.is_empty() => args[0].as_string(),
            _ => None,
        }
    }

    /// Try to get as list
    pub fn as_list(&self) -> Option<&[AttributeValue]> {
        match self {
            AttributeValue::List(list) => Some(list),
            _ => None,
        }
    }

    /// Check if this is a null value
    pub fn is_null(&self) -> bool {
        matches!(self, AttributeValue::Null)
    }

    /// Short kind name, used in type mismatch errors
    pub fn kind(&self) -> &'static str {
        match self {
            AttributeValue::Null => "null",
            AttributeValue::Derived => "derived",
            AttributeValue::EntityRef(_) => "reference",
            AttributeValue::Integer(_) => "integer",
            AttributeValue::Float(_) => "real",
            AttributeValue::String(_) => "string",
            AttributeValue::Enum(_) => "enumeration",
            AttributeValue::List(_) => "list",
            AttributeValue::TypedValue(..) => "typed value",
        }
    }
}

/// Decoded IFC entity
///
/// Represents a fully decoded entity instance with its ID, type, and attribute values.
#[derive(Clone, Debug)]
pub struct DecodedEntity {
    /// Entity ID
    pub id: EntityId,
    /// Entity type
    pub ifc_type: IfcType,
    /// Attribute values in order
    pub attributes: Vec<AttributeValue>,
}

impl DecodedEntity {
    /// Get attribute at index
    pub fn get(&self, index: usize) -> Option<&AttributeValue> {
        self.attributes.get(index)
    }

    /// Get entity reference at index
    pub fn get_ref(&self, index: usize) -> Option<EntityId> {
        self.get(index).and_then(|v| v.as_entity_ref())
    }

    /// Get string at index
    pub fn get_string(&self, index: usize) -> Option<&str> {
        self.get(index).and_then(|v| v.as_string())
    }
}

/// Model metadata extracted from the STEP header
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ModelMetadata {
    /// IFC schema version (e.g., "IFC2X3", "IFC4", "IFC4X3")
    pub schema_version: String,
    /// Originating system (CAD application)
    pub originating_system: Option<String>,
    /// Preprocessor version
    pub preprocessor_version: Option<String>,
    /// File name from header
    pub file_name: Option<String>,
    /// Author
    pub author: Option<String>,
    /// Organization
    pub organization: Option<String>,
    /// Timestamp
    pub timestamp: Option<String>,
}

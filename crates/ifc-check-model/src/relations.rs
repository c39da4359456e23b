// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Relation records and the capability trait that serves them

use crate::{EntityId, IfcType, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Nominal value of a single-value property
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum NominalValue {
    /// IfcLabel, IfcText, IfcIdentifier, ...
    Text(String),
    /// IfcInteger, IfcCountMeasure, ...
    Integer(i64),
    /// IfcReal and the numeric measures
    Real(f64),
    /// IfcBoolean, and IfcLogical when not UNKNOWN
    Boolean(bool),
}

impl NominalValue {
    /// Numeric view of the value
    ///
    /// Text is parsed after trimming surrounding whitespace and booleans count
    /// as 1/0. Returns `None` when the value has no numeric reading.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            NominalValue::Text(s) => s.trim().parse::<f64>().ok(),
            NominalValue::Integer(i) => Some(*i as f64),
            NominalValue::Real(f) => Some(*f),
            NominalValue::Boolean(b) => Some(if *b { 1.0 } else { 0.0 }),
        }
    }
}

/// Canonical string form used when comparing against rule values
///
/// Reals that hold an integral value keep one decimal (`3.0`), booleans are
/// rendered as `True`/`False`.
impl fmt::Display for NominalValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NominalValue::Text(s) => f.write_str(s),
            NominalValue::Integer(i) => write!(f, "{}", i),
            NominalValue::Real(v) if v.is_nan() => f.write_str("nan"),
            NominalValue::Real(v) if v.is_finite() && v.fract() == 0.0 && v.abs() < 1e16 => {
                write!(f, "{:.1}", v)
            }
            NominalValue::Real(v) => write!(f, "{}", v),
            NominalValue::Boolean(true) => f.write_str("True"),
            NominalValue::Boolean(false) => f.write_str("False"),
        }
    }
}

/// A property inside a property set
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Property {
    /// Property name
    pub name: String,
    /// Whether the property kind carries a NominalValue attribute
    ///
    /// Only single-value properties do. Enumerated, bounded and list values
    /// keep their data elsewhere.
    pub has_nominal_attribute: bool,
    /// Nominal value; `None` for kinds without one or when the value is unset
    pub nominal_value: Option<NominalValue>,
}

impl Property {
    /// Create a single-value property
    pub fn single(name: impl Into<String>, value: NominalValue) -> Self {
        Self {
            name: name.into(),
            has_nominal_attribute: true,
            nominal_value: Some(value),
        }
    }

    /// Create a single-value property whose nominal value is unset (`$`)
    pub fn unset(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            has_nominal_attribute: true,
            nominal_value: None,
        }
    }

    /// Create a property whose kind has no nominal value
    pub fn valueless(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            has_nominal_attribute: false,
            nominal_value: None,
        }
    }
}

/// A property set, identified by its entity and Name attribute
///
/// Its properties are read separately through
/// [`RelationReader::properties`], so a set can be matched by name without
/// decoding its contents.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PropertySet {
    /// Property set entity
    pub id: EntityId,
    /// Property set name (e.g., "Pset_WallCommon")
    pub name: Option<String>,
}

impl PropertySet {
    /// Check the set's name
    pub fn is_named(&self, name: &str) -> bool {
        self.name.as_deref() == Some(name)
    }
}

/// Target of a property-definition relation
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum PropertyDefinition {
    /// IfcPropertySet
    PropertySet(PropertySet),
    /// IfcElementQuantity
    Quantities { name: Option<String> },
    /// Any other property definition
    Other(IfcType),
}

impl PropertyDefinition {
    /// Get the property set, if this definition is one
    pub fn as_property_set(&self) -> Option<&PropertySet> {
        match self {
            PropertyDefinition::PropertySet(pset) => Some(pset),
            _ => None,
        }
    }
}

/// Outgoing "defined-by" relation of an object
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum DefinedBy {
    /// IfcRelDefinesByProperties
    Properties(PropertyDefinition),
    /// IfcRelDefinesByType
    Type(EntityId),
}

/// Outgoing "contained-in" relation of an element
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Containment {
    /// Relationship entity type (IfcRelContainedInSpatialStructure, ...)
    pub relation: IfcType,
    /// Container id
    pub container: EntityId,
    /// Container type
    pub container_type: IfcType,
    /// Container Name attribute
    pub container_name: Option<String>,
}

impl Containment {
    /// Check whether this is a spatial-structure containment in a building storey
    pub fn is_storey_containment(&self) -> bool {
        self.relation == IfcType::IfcRelContainedInSpatialStructure
            && self.container_type == IfcType::IfcBuildingStorey
    }
}

/// Outgoing "associated-with" relation of an object
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Association {
    /// Relationship entity type (IfcRelAssociatesClassification, ...)
    pub relation: IfcType,
    /// The relating resource (classification reference, material, ...)
    pub relating: EntityId,
}

impl Association {
    /// Check whether this association is a classification
    pub fn is_classification(&self) -> bool {
        self.relation == IfcType::IfcRelAssociatesClassification
    }
}

/// Capability queries over an entity's relations
///
/// Every query returns `Ok` with an empty result when the entity has no such
/// relation (or is not the kind of entity that can have one). `Err` is
/// reserved for malformed model data, such as a relation pointing at a
/// missing entity. `defined_by` reports such errors per relation, so one
/// broken relation leaves the others readable.
///
/// # Example
///
/// ```ignore
/// use ifc_check_model::RelationReader;
///
/// fn storey_of(relations: &dyn RelationReader, id: EntityId) -> Option<String> {
///     relations
///         .contained_in(id)
///         .ok()?
///         .into_iter()
///         .find(|c| c.is_storey_containment())
///         .and_then(|c| c.container_name)
/// }
/// ```
pub trait RelationReader: Send + Sync {
    /// Property definitions and type objects, one entry per relation in
    /// relation order
    fn defined_by(&self, id: EntityId) -> Vec<Result<DefinedBy>>;

    /// Properties of a property set, in declaration order
    fn properties(&self, property_set: EntityId) -> Result<Vec<Property>>;

    /// Spatial containers, in relation order
    fn contained_in(&self, id: EntityId) -> Result<Vec<Containment>>;

    /// Associated resources (classifications, materials, documents)
    fn associations(&self, id: EntityId) -> Result<Vec<Association>>;

    /// Shape representation of a product, `None` when unset
    fn representation(&self, id: EntityId) -> Result<Option<EntityId>>;
}

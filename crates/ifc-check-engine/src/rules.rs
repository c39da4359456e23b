// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Validation rules and rule table loading
//!
//! A rule table is tabular: one row per rule, columns named as below. Tables
//! are exchanged as JSON, either as an array of records
//! (`[{"Entity_Type": "IfcWall", ...}]`) or in split form
//! (`{"columns": [...], "data": [[...], ...]}`).

use crate::error::{Result, RuleError};
use crate::finding::ErrorLevel;
use serde_json::{Map, Value};
use std::path::Path;

pub const ENTITY_TYPE: &str = "Entity_Type";
pub const PROPERTY_SET: &str = "Property_Set";
pub const PROPERTY_NAME: &str = "Property_Name";
pub const REQUIRED: &str = "Required";
pub const ALLOWED_VALUES: &str = "Allowed_Values";
pub const MIN_VALUE: &str = "Min_Value";
pub const MAX_VALUE: &str = "Max_Value";
pub const ERROR_LEVEL: &str = "Error_Level";

/// All recognised columns, in template order
pub const COLUMNS: [&str; 8] = [
    ENTITY_TYPE,
    PROPERTY_SET,
    PROPERTY_NAME,
    REQUIRED,
    ALLOWED_VALUES,
    MIN_VALUE,
    MAX_VALUE,
    ERROR_LEVEL,
];

/// Columns a table must carry before any validation runs
pub const REQUIRED_COLUMNS: [&str; 5] =
    [ENTITY_TYPE, PROPERTY_SET, PROPERTY_NAME, REQUIRED, ERROR_LEVEL];

/// A numeric bound together with the text it was written as
#[derive(Clone, Debug, PartialEq)]
pub struct Bound {
    pub value: f64,
    /// Source text, used verbatim in finding messages
    pub raw: String,
}

impl Bound {
    pub fn new(value: f64) -> Self {
        Self {
            value,
            raw: value.to_string(),
        }
    }

    /// Parse a cell; blank cells yield `None`
    fn parse(text: &str) -> std::result::Result<Option<Self>, String> {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return Ok(None);
        }
        trimmed
            .parse::<f64>()
            .map(|value| {
                Some(Self {
                    value,
                    raw: trimmed.to_string(),
                })
            })
            .map_err(|_| format!("'{}' is not a number", trimmed))
    }
}

/// One row of the rule table
#[derive(Clone, Debug, PartialEq)]
pub struct ValidationRule {
    /// Entity type to select, as written in the table
    pub entity_type: String,
    pub property_set: String,
    pub property_name: String,
    pub required: bool,
    /// Allowed values, trimmed, empty items dropped
    pub allowed_values: Vec<String>,
    /// Allowed values as written in the table
    pub allowed_values_raw: String,
    pub min_value: Option<Bound>,
    pub max_value: Option<Bound>,
    pub error_level: ErrorLevel,
}

impl ValidationRule {
    /// Create an optional, unconstrained rule at Warning level
    pub fn new(
        entity_type: impl Into<String>,
        property_set: impl Into<String>,
        property_name: impl Into<String>,
    ) -> Self {
        Self {
            entity_type: entity_type.into(),
            property_set: property_set.into(),
            property_name: property_name.into(),
            required: false,
            allowed_values: Vec::new(),
            allowed_values_raw: String::new(),
            min_value: None,
            max_value: None,
            error_level: ErrorLevel::default(),
        }
    }

    /// Mark the property as mandatory
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    /// Set the allowed values from comma-delimited text
    pub fn with_allowed_values(mut self, raw: impl Into<String>) -> Self {
        let raw = raw.into();
        self.allowed_values = split_allowed_values(&raw);
        self.allowed_values_raw = raw;
        self
    }

    /// Set the lower bound
    pub fn with_min(mut self, min: f64) -> Self {
        self.min_value = Some(Bound::new(min));
        self
    }

    /// Set the upper bound
    pub fn with_max(mut self, max: f64) -> Self {
        self.max_value = Some(Bound::new(max));
        self
    }

    /// Set the severity used on failure
    pub fn with_level(mut self, level: ErrorLevel) -> Self {
        self.error_level = level;
        self
    }

    /// Text used as the finding's check description
    pub fn check_description(&self) -> String {
        format!("Property {} in {}", self.property_name, self.property_set)
    }

    /// Check whether any bound is set
    pub fn has_bounds(&self) -> bool {
        self.min_value.is_some() || self.max_value.is_some()
    }

    /// Serialize as a table record
    pub fn to_record(&self) -> Value {
        let bound = |b: &Option<Bound>| b.as_ref().map(|b| b.raw.clone()).unwrap_or_default();
        let mut record = Map::new();
        record.insert(ENTITY_TYPE.into(), self.entity_type.clone().into());
        record.insert(PROPERTY_SET.into(), self.property_set.clone().into());
        record.insert(PROPERTY_NAME.into(), self.property_name.clone().into());
        record.insert(
            REQUIRED.into(),
            if self.required { "Yes" } else { "No" }.into(),
        );
        record.insert(ALLOWED_VALUES.into(), self.allowed_values_raw.clone().into());
        record.insert(MIN_VALUE.into(), bound(&self.min_value).into());
        record.insert(MAX_VALUE.into(), bound(&self.max_value).into());
        record.insert(ERROR_LEVEL.into(), self.error_level.as_str().into());
        Value::Object(record)
    }
}

fn split_allowed_values(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
        .collect()
}

/// Text content of a cell; null and missing cells are blank
fn cell_text(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(Value::Bool(b)) => b.to_string(),
        Some(Value::Number(n)) => n.to_string(),
        Some(other) => other.to_string(),
    }
}

/// Ordered, immutable set of validation rules
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RuleTable {
    rules: Vec<ValidationRule>,
}

impl RuleTable {
    /// Build a table from column names and row cells
    ///
    /// Fails with [`RuleError::MissingColumns`] before reading any row when a
    /// required column is absent. Rows shorter than the header are padded
    /// with blank cells.
    pub fn from_records<S: AsRef<str>>(columns: &[S], rows: &[Vec<Value>]) -> Result<Self> {
        let columns: Vec<&str> = columns.iter().map(|c| c.as_ref().trim()).collect();

        let missing: Vec<String> = REQUIRED_COLUMNS
            .iter()
            .filter(|required| !columns.contains(*required))
            .map(|c| c.to_string())
            .collect();
        if !missing.is_empty() {
            return Err(RuleError::MissingColumns(missing));
        }

        for ignored in columns.iter().filter(|c| !COLUMNS.contains(*c)) {
            log::debug!("Ignoring rule table column '{}'", ignored);
        }

        let rules = rows
            .iter()
            .enumerate()
            .map(|(i, row)| {
                let cell = |name: &str| {
                    columns
                        .iter()
                        .position(|c| *c == name)
                        .and_then(|index| row.get(index))
                };
                parse_rule(i + 1, &cell)
            })
            .collect::<Result<Vec<_>>>()?;

        log::debug!("Loaded {} validation rules", rules.len());
        Ok(Self { rules })
    }

    /// Parse a JSON rule table (records or split form)
    pub fn from_json_str(json: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(json)?;
        match value {
            Value::Array(records) => Self::from_json_records(&records),
            Value::Object(mut split) => {
                let columns: Vec<String> = match split.remove("columns") {
                    Some(columns) => serde_json::from_value(columns)?,
                    None => return Err(RuleError::load("expected a \"columns\" array")),
                };
                let rows: Vec<Vec<Value>> = match split.remove("data") {
                    Some(rows) => serde_json::from_value(rows)?,
                    None => Vec::new(),
                };
                Self::from_records(&columns, &rows)
            }
            _ => Err(RuleError::load(
                "expected an array of records or a {\"columns\", \"data\"} object",
            )),
        }
    }

    /// Read a JSON rule table from disk
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    /// Columns are the union of record keys, in first-seen order
    fn from_json_records(records: &[Value]) -> Result<Self> {
        let mut columns: Vec<String> = Vec::new();
        for (i, record) in records.iter().enumerate() {
            let object = record
                .as_object()
                .ok_or_else(|| RuleError::row(i + 1, "expected an object"))?;
            for key in object.keys() {
                if !columns.iter().any(|c| c == key) {
                    columns.push(key.clone());
                }
            }
        }

        let rows: Vec<Vec<Value>> = records
            .iter()
            .filter_map(Value::as_object)
            .map(|object| {
                columns
                    .iter()
                    .map(|c| object.get(c).cloned().unwrap_or(Value::Null))
                    .collect()
            })
            .collect();

        Self::from_records(&columns, &rows)
    }

    /// The example rule set for walls, doors, spaces and storeys
    pub fn template() -> Self {
        Self::from(vec![
            ValidationRule::new("IfcWall", "Pset_WallCommon", "IsExternal")
                .required()
                .with_allowed_values("True,False")
                .with_level(ErrorLevel::Critical),
            ValidationRule::new("IfcWall", "Pset_WallCommon", "FireRating")
                .required()
                .with_allowed_values("REI60,REI90,REI120")
                .with_level(ErrorLevel::Critical),
            ValidationRule::new("IfcDoor", "Pset_DoorCommon", "FireRating")
                .required()
                .with_level(ErrorLevel::Warning),
            ValidationRule::new("IfcSpace", "Pset_SpaceCommon", "GrossFloorArea")
                .with_min(0.0)
                .with_max(1000.0)
                .with_level(ErrorLevel::Info),
            ValidationRule::new("IfcBuildingStorey", "Pset_BuildingStoreyCommon", "Elevation")
                .required()
                .with_level(ErrorLevel::Critical),
        ])
    }

    /// Serialize as an array of records
    pub fn to_json_string(&self) -> Result<String> {
        let records: Vec<Value> = self.rules.iter().map(ValidationRule::to_record).collect();
        Ok(serde_json::to_string_pretty(&records)?)
    }

    pub fn rules(&self) -> &[ValidationRule] {
        &self.rules
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ValidationRule> {
        self.rules.iter()
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

impl From<Vec<ValidationRule>> for RuleTable {
    fn from(rules: Vec<ValidationRule>) -> Self {
        Self { rules }
    }
}

impl<'a> IntoIterator for &'a RuleTable {
    type Item = &'a ValidationRule;
    type IntoIter = std::slice::Iter<'a, ValidationRule>;

    fn into_iter(self) -> Self::IntoIter {
        self.rules.iter()
    }
}

fn parse_rule<'a>(
    row: usize,
    cell: &dyn Fn(&str) -> Option<&'a Value>,
) -> Result<ValidationRule> {
    let text = |name: &str| cell_text(cell(name));

    let required = match cell(REQUIRED) {
        Some(Value::Bool(b)) => *b,
        other => cell_text(other).trim().eq_ignore_ascii_case("yes"),
    };

    let level_text = text(ERROR_LEVEL);
    let error_level = if level_text.trim().is_empty() {
        ErrorLevel::default()
    } else {
        level_text
            .parse::<ErrorLevel>()
            .map_err(|e: String| RuleError::row(row, e))?
    };

    let min_value = Bound::parse(&text(MIN_VALUE))
        .map_err(|e| RuleError::row(row, format!("{}: {}", MIN_VALUE, e)))?;
    let max_value = Bound::parse(&text(MAX_VALUE))
        .map_err(|e| RuleError::row(row, format!("{}: {}", MAX_VALUE, e)))?;

    let allowed_values_raw = text(ALLOWED_VALUES);

    Ok(ValidationRule {
        entity_type: text(ENTITY_TYPE),
        property_set: text(PROPERTY_SET),
        property_name: text(PROPERTY_NAME),
        required,
        allowed_values: split_allowed_values(&allowed_values_raw),
        allowed_values_raw,
        min_value,
        max_value,
        error_level,
    })
}

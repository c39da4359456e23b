// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Rule evaluation: one rule against one entity

use crate::finding::{ErrorLevel, Finding, Status};
use crate::location::locate;
use crate::property::resolve;
use crate::rules::ValidationRule;
use ifc_check_model::{Entity, IfcModel, NominalValue};

pub const PROPERTY_EXISTS: &str = "Property exists";
pub const OPTIONAL_PROPERTY: &str = "Optional property";
pub const PROPERTY_NOT_FOUND: &str = "Property not found";
pub const VALID_VALUE: &str = "Valid value";

/// Evaluate a rule against an entity
pub fn evaluate(model: &dyn IfcModel, entity: &Entity, rule: &ValidationRule) -> Finding {
    let value = resolve(model, entity, &rule.property_set, &rule.property_name);

    let (status, error_level, expected, actual) = match value {
        None if rule.required => (
            Status::Fail,
            rule.error_level,
            PROPERTY_EXISTS.to_string(),
            PROPERTY_NOT_FOUND.to_string(),
        ),
        None => (
            Status::Pass,
            ErrorLevel::Info,
            OPTIONAL_PROPERTY.to_string(),
            PROPERTY_NOT_FOUND.to_string(),
        ),
        Some(value) => {
            let (valid, expected) = check_value(&value, rule);
            let status = Status::from_bool(valid);
            let level = if valid { ErrorLevel::Info } else { rule.error_level };
            (status, level, expected, value.to_string())
        }
    };

    Finding {
        entity_type: rule.entity_type.clone(),
        global_id: entity.global_id_or_default().to_string(),
        element_name: entity.display_name().to_string(),
        check_description: rule.check_description(),
        expected_value: expected,
        actual_value: actual,
        status,
        error_level,
        location: locate(model, entity),
    }
}

/// Check a present value against allowed values and bounds
///
/// Each failing check overwrites the expectation of the previous one, so
/// when both bounds fail only the upper bound is reported.
fn check_value(value: &NominalValue, rule: &ValidationRule) -> (bool, String) {
    let mut valid = true;
    let mut expected = None;

    if !rule.allowed_values.is_empty() {
        let text = value.to_string();
        if !rule.allowed_values.iter().any(|allowed| *allowed == text) {
            valid = false;
            expected = Some(format!("One of: {}", rule.allowed_values_raw));
        }
    }

    if rule.has_bounds() {
        if let Some(number) = value.as_number() {
            if let Some(min) = rule.min_value.as_ref().filter(|min| number < min.value) {
                valid = false;
                expected = Some(format!(">= {}", min.raw));
            }
            if let Some(max) = rule.max_value.as_ref().filter(|max| number > max.value) {
                valid = false;
                expected = Some(format!("<= {}", max.raw));
            }
        }
    }

    (valid, expected.unwrap_or_else(|| VALID_VALUE.to_string()))
}

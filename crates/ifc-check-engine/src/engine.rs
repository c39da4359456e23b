// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Validation engine - rules first, then structural checks

use crate::checks::{ClassificationCheck, GeometryCheck, SpatialHierarchyCheck, StructuralCheck};
use crate::evaluator::evaluate;
use crate::finding::Finding;
use crate::rules::{RuleTable, ValidationRule};
use ifc_check_model::{Entity, IfcModel};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Which structural checks run, and how rules are evaluated
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidationOptions {
    /// Geometry presence check
    pub validate_geometry: bool,
    /// Spatial hierarchy check
    pub validate_spatial: bool,
    /// Classification coverage check
    pub validate_classification: bool,
    /// Evaluate (rule, entity) pairs on the rayon thread pool
    pub parallel: bool,
}

impl Default for ValidationOptions {
    fn default() -> Self {
        Self {
            validate_geometry: true,
            validate_spatial: true,
            validate_classification: true,
            parallel: false,
        }
    }
}

impl ValidationOptions {
    /// Rules only, no structural checks
    pub fn rules_only() -> Self {
        Self {
            validate_geometry: false,
            validate_spatial: false,
            validate_classification: false,
            parallel: false,
        }
    }

    pub fn with_geometry(mut self, enabled: bool) -> Self {
        self.validate_geometry = enabled;
        self
    }

    pub fn with_spatial(mut self, enabled: bool) -> Self {
        self.validate_spatial = enabled;
        self
    }

    pub fn with_classification(mut self, enabled: bool) -> Self {
        self.validate_classification = enabled;
        self
    }

    pub fn with_parallel(mut self, enabled: bool) -> Self {
        self.parallel = enabled;
        self
    }
}

/// Runs a rule table and the enabled structural checks against a model
///
/// The engine holds no per-run state; running it twice on the same inputs
/// yields the same findings in the same order.
pub struct ValidationEngine {
    options: ValidationOptions,
    /// Structural checks in reporting order
    checks: Vec<Arc<dyn StructuralCheck>>,
}

impl ValidationEngine {
    /// Create an engine with the structural checks enabled in `options`
    pub fn new(options: ValidationOptions) -> Self {
        let mut engine = Self {
            options,
            checks: Vec::new(),
        };
        if options.validate_geometry {
            engine.register(Arc::new(GeometryCheck));
        }
        if options.validate_spatial {
            engine.register(Arc::new(SpatialHierarchyCheck));
        }
        if options.validate_classification {
            engine.register(Arc::new(ClassificationCheck));
        }
        engine
    }

    /// Append a structural check; it runs after the ones already registered
    pub fn register(&mut self, check: Arc<dyn StructuralCheck>) {
        self.checks.push(check);
    }

    pub fn options(&self) -> &ValidationOptions {
        &self.options
    }

    /// Evaluate all rules, then all registered structural checks
    ///
    /// Findings are ordered by rule, then by entity in selection order, then
    /// by structural check.
    pub fn run(&self, model: &dyn IfcModel, rules: &RuleTable) -> Vec<Finding> {
        let mut findings = if self.options.parallel {
            self.evaluate_rules_parallel(model, rules)
        } else {
            self.evaluate_rules(model, rules)
        };
        let rule_findings = findings.len();

        for check in &self.checks {
            let before = findings.len();
            findings.extend(check.check(model));
            log::debug!(
                "Structural check '{}' produced {} findings",
                check.name(),
                findings.len() - before
            );
        }

        log::info!(
            "Validation produced {} findings ({} from {} rules)",
            findings.len(),
            rule_findings,
            rules.len()
        );
        findings
    }

    fn evaluate_rules(&self, model: &dyn IfcModel, rules: &RuleTable) -> Vec<Finding> {
        let mut findings = Vec::new();
        for (index, rule) in rules.iter().enumerate() {
            let entities = select(model, index, rule);
            findings.extend(entities.iter().map(|entity| evaluate(model, entity, rule)));
        }
        findings
    }

    /// Fan out over (rule, entity) pairs; indexed collection keeps the
    /// sequential order
    fn evaluate_rules_parallel(&self, model: &dyn IfcModel, rules: &RuleTable) -> Vec<Finding> {
        let pairs: Vec<(&ValidationRule, Entity)> = rules
            .iter()
            .enumerate()
            .flat_map(|(index, rule)| {
                select(model, index, rule)
                    .into_iter()
                    .map(move |entity| (rule, entity))
            })
            .collect();

        pairs
            .par_iter()
            .map(|(rule, entity)| evaluate(model, entity, rule))
            .collect()
    }
}

impl Default for ValidationEngine {
    fn default() -> Self {
        Self::new(ValidationOptions::default())
    }
}

fn select(model: &dyn IfcModel, index: usize, rule: &ValidationRule) -> Vec<Entity> {
    let entities = model.by_type(&rule.entity_type);
    log::debug!(
        "Rule {} ({} / {}) selects {} {} entities",
        index + 1,
        rule.property_set,
        rule.property_name,
        entities.len(),
        rule.entity_type
    );
    entities
}

/// Run the engine once with the given options
pub fn run(model: &dyn IfcModel, rules: &RuleTable, options: ValidationOptions) -> Vec<Finding> {
    ValidationEngine::new(options).run(model, rules)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::finding::{ErrorLevel, Status};
    use crate::testing;

    fn wall_rules() -> RuleTable {
        RuleTable::from(vec![
            ValidationRule::new("IfcWall", "Pset_WallCommon", "FireRating")
                .required()
                .with_allowed_values("REI60,REI90,REI120")
                .with_level(ErrorLevel::Critical),
            ValidationRule::new("IfcDoor", "Pset_DoorCommon", "FireRating").required(),
        ])
    }

    #[test]
    fn test_rule_findings_follow_rule_then_entity_order() {
        let model = testing::office();
        let findings = run(model.as_ref(), &wall_rules(), ValidationOptions::rules_only());

        let summary: Vec<(&str, &str, Status)> = findings
            .iter()
            .map(|f| (f.element_name.as_str(), f.actual_value.as_str(), f.status))
            .collect();
        assert_eq!(
            summary,
            vec![
                ("Wall A", "REI60", Status::Pass),
                ("Wall B", "REI30", Status::Fail),
                ("Wall C", "Property not found", Status::Fail),
                ("Unnamed", "Property not found", Status::Fail),
                ("Door 1", "EI30", Status::Pass),
            ]
        );
    }

    #[test]
    fn test_structural_checks_follow_rules() {
        let model = testing::office();
        let findings = run(model.as_ref(), &wall_rules(), ValidationOptions::default());

        // 5 rule findings, 5 geometry, 3 spatial, 3 classification
        assert_eq!(findings.len(), 16);
        assert_eq!(findings[5].check_description, "Geometry presence check");
        assert_eq!(findings[10].check_description, "Site exists in model");
        assert_eq!(findings[13].check_description, "Classification system defined");
    }

    #[test]
    fn test_options_disable_checks() {
        let model = testing::office();
        let rules = RuleTable::default();

        let only_spatial = ValidationOptions::rules_only().with_spatial(true);
        assert_eq!(run(model.as_ref(), &rules, only_spatial).len(), 3);

        let no_geometry = ValidationOptions::default().with_geometry(false);
        assert_eq!(run(model.as_ref(), &rules, no_geometry).len(), 6);

        assert!(run(model.as_ref(), &rules, ValidationOptions::rules_only()).is_empty());
    }

    #[test]
    fn test_unknown_or_blank_entity_type_selects_nothing() {
        let model = testing::office();
        let rules = RuleTable::from(vec![
            ValidationRule::new("IfcFurniture", "Pset_Any", "Any").required(),
            ValidationRule::new("", "Pset_Any", "Any").required(),
        ]);
        assert!(run(model.as_ref(), &rules, ValidationOptions::rules_only()).is_empty());
    }

    #[test]
    fn test_run_is_repeatable() {
        let model = testing::office();
        let engine = ValidationEngine::default();
        let rules = RuleTable::template();

        let first = engine.run(model.as_ref(), &rules);
        let second = engine.run(model.as_ref(), &rules);
        assert_eq!(first, second);
        assert_eq!(
            serde_json::to_string(&first).unwrap(),
            serde_json::to_string(&second).unwrap()
        );
    }

    #[test]
    fn test_parallel_matches_sequential() {
        let model = testing::office();
        let rules = RuleTable::template();

        let sequential = run(model.as_ref(), &rules, ValidationOptions::default());
        let parallel = run(
            model.as_ref(),
            &rules,
            ValidationOptions::default().with_parallel(true),
        );
        assert_eq!(sequential, parallel);
    }

    #[test]
    fn test_options_deserialize_with_defaults() {
        let options: ValidationOptions =
            serde_json::from_str(r#"{"validate_geometry": false}"#).unwrap();
        assert_eq!(options, ValidationOptions::default().with_geometry(false));
    }
}

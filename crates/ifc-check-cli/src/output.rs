// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Plain-text rendering for the terminal

use ifc_check_engine::{Finding, ValidationReport, PASS_THRESHOLD};
use ifc_check_model::IfcModel;

/// Element types listed by `ifc-check info`
const SUMMARY_TYPES: [&str; 7] = [
    "IfcWall",
    "IfcDoor",
    "IfcWindow",
    "IfcSlab",
    "IfcColumn",
    "IfcBeam",
    "IfcSpace",
];

pub fn print_model_info(model: &dyn IfcModel) {
    let metadata = model.metadata();
    println!("Schema:      {}", model.schema());
    if let Some(name) = &metadata.file_name {
        println!("File name:   {}", name);
    }
    if let Some(system) = &metadata.originating_system {
        println!("Authored in: {}", system);
    }
    println!("Total entities: {}", model.count_by_type("IfcRoot"));
    println!("Products:       {}", model.count_by_type("IfcProduct"));

    for ifc_type in SUMMARY_TYPES {
        let count = model.count_by_type(ifc_type);
        if count > 0 {
            println!("  {:<12} {}", ifc_type, count);
        }
    }
}

/// Print the report's findings followed by the run summary
pub fn print_report(report: &ValidationReport) {
    for finding in &report.results {
        println!("{}", finding_line(finding));
    }

    let meta = &report.report_metadata;
    let summary = &report.validation_summary;
    println!();
    println!(
        "Model:       {} ({}, {} entities)",
        meta.ifc_file, meta.ifc_schema, meta.total_entities
    );
    println!("Rules:       {}", meta.validation_rules);
    println!(
        "Checks:      {} total, {} passed, {} failed",
        summary.total, summary.passed, summary.failed
    );
    println!(
        "Failures:    {} critical, {} warning, {} info",
        summary.critical, summary.warning, summary.info
    );
    println!(
        "Compliance:  {:.1}% {} (threshold {}%)",
        summary.compliance_score,
        if summary.passes_threshold() { "PASS" } else { "FAIL" },
        PASS_THRESHOLD
    );
}

fn finding_line(f: &Finding) -> String {
    format!(
        "[{}] {:<8} {} '{}' ({}) @ {}: {} - expected '{}', got '{}'",
        f.status,
        f.error_level,
        f.entity_type,
        f.element_name,
        f.global_id,
        f.location,
        f.check_description,
        f.expected_value,
        f.actual_value
    )
}

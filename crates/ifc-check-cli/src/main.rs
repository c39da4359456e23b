// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! `ifc-check` - validate IFC models against a project rule table

mod output;

use anyhow::{Context, Result};
use clap::{ArgAction, Args, Parser, Subcommand};
use ifc_check_engine::{RuleTable, Status, ValidationEngine, ValidationOptions, ValidationReport};
use ifc_check_model::{IfcModel, IfcParser};
use ifc_check_parser::StepParser;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser, Debug)]
#[command(
    name = "ifc-check",
    author,
    version,
    about = "Validate IFC models against project property requirements"
)]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug); RUST_LOG overrides
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Validate a model against a rule table
    Check(CheckArgs),
    /// Write the example rule table as JSON
    Template {
        /// Destination file; stdout when omitted
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Show schema and element counts of a model
    Info {
        /// IFC model
        #[arg(env = "IFC_CHECK_MODEL")]
        model: PathBuf,
    },
}

#[derive(Args, Debug)]
struct CheckArgs {
    /// IFC model to validate
    #[arg(short, long, env = "IFC_CHECK_MODEL")]
    model: PathBuf,

    /// Rule table as JSON records
    #[arg(short, long, env = "IFC_CHECK_RULES")]
    rules: PathBuf,

    /// ValidationOptions as JSON; the flags below take precedence
    #[arg(long)]
    options: Option<PathBuf>,

    /// Skip the geometry presence check
    #[arg(long)]
    no_geometry: bool,

    /// Skip the spatial hierarchy check
    #[arg(long)]
    no_spatial: bool,

    /// Skip the classification check
    #[arg(long)]
    no_classification: bool,

    /// Evaluate rules in parallel
    #[arg(long)]
    parallel: bool,

    /// Reject models containing malformed instance records
    #[arg(long)]
    strict: bool,

    /// List passed findings too
    #[arg(long)]
    show_passed: bool,

    /// Only list findings for this entity type
    #[arg(long)]
    entity_type: Option<String>,

    /// Only list findings with this status (pass or fail); overrides --show-passed
    #[arg(long)]
    status: Option<Status>,

    /// Write the report as JSON
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Exit with status 2 when the compliance score is below 90%
    #[arg(long)]
    fail_below_threshold: bool,
}

impl CheckArgs {
    fn validation_options(&self) -> Result<ValidationOptions> {
        let mut options = match &self.options {
            Some(path) => {
                let json = std::fs::read_to_string(path)
                    .with_context(|| format!("Failed to read options {}", path.display()))?;
                serde_json::from_str(&json)
                    .with_context(|| format!("Invalid options in {}", path.display()))?
            }
            None => ValidationOptions::default(),
        };

        if self.no_geometry {
            options.validate_geometry = false;
        }
        if self.no_spatial {
            options.validate_spatial = false;
        }
        if self.no_classification {
            options.validate_classification = false;
        }
        if self.parallel {
            options.parallel = true;
        }
        Ok(options)
    }

    /// Findings to list and export: failures unless asked otherwise
    fn listed(&self, report: &ValidationReport) -> ValidationReport {
        let status = match self.status {
            Some(status) => Some(status),
            None if self.show_passed => None,
            None => Some(Status::Fail),
        };
        report.filtered(self.entity_type.as_deref(), status)
    }
}

fn main() -> Result<ExitCode> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Command::Check(args) => check(&args),
        Command::Template { output } => {
            template(output.as_deref())?;
            Ok(ExitCode::SUCCESS)
        }
        Command::Info { model } => {
            let model = open_model(&model, false)?;
            output::print_model_info(model.as_ref());
            Ok(ExitCode::SUCCESS)
        }
    }
}

fn init_logging(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| default.into()))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn open_model(path: &Path, strict: bool) -> Result<Arc<dyn IfcModel>> {
    let parser = if strict {
        StepParser::strict()
    } else {
        StepParser::new()
    };
    parser
        .open(path)
        .with_context(|| format!("Failed to load IFC model {}", path.display()))
}

fn check(args: &CheckArgs) -> Result<ExitCode> {
    let report = build_report(args)?;
    let listed = args.listed(&report);

    output::print_report(&listed);

    if let Some(path) = &args.output {
        write_report(&listed, path)?;
        tracing::info!("Report written to {}", path.display());
    }

    if args.fail_below_threshold && !report.validation_summary.passes_threshold() {
        return Ok(ExitCode::from(2));
    }
    Ok(ExitCode::SUCCESS)
}

/// Load inputs and run the engine; rule table problems fail before the model
/// is read
fn build_report(args: &CheckArgs) -> Result<ValidationReport> {
    let options = args.validation_options()?;
    let rules = RuleTable::from_json_file(&args.rules)
        .with_context(|| format!("Failed to load rule table {}", args.rules.display()))?;
    let model = open_model(&args.model, args.strict)?;

    tracing::info!(
        "Validating {} ({}) against {} rules",
        args.model.display(),
        model.schema(),
        rules.len()
    );
    let findings = ValidationEngine::new(options).run(model.as_ref(), &rules);

    let file_name = args
        .model
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| args.model.display().to_string());
    Ok(ValidationReport::new(file_name, model.as_ref(), rules.len(), findings))
}

fn write_report(report: &ValidationReport, path: &Path) -> Result<()> {
    let json = report.to_json_string().context("Failed to serialize report")?;
    std::fs::write(path, json).with_context(|| format!("Failed to write {}", path.display()))
}

fn template(output: Option<&Path>) -> Result<()> {
    let json = RuleTable::template()
        .to_json_string()
        .context("Failed to serialize template")?;
    match output {
        Some(path) => {
            std::fs::write(path, json).with_context(|| format!("Failed to write {}", path.display()))
        }
        None => {
            println!("{}", json);
            Ok(())
        }
    }
}

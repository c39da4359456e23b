// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! IFC-Check Parser - STEP/IFC reader
//!
//! This crate reads IFC exchange files (ISO 10303-21) and exposes them
//! through the traits defined in `ifc-check-model`.
//!
//! # Features
//!
//! - **Fast tokenization** using `nom` combinators
//! - **SIMD-accelerated scanning** using `memchr`
//! - **Lazy entity decoding** - records are decoded on first access
//! - **Inverse relation indexes** built once per model
//!
//! Loading is lenient by default: a record that cannot be decoded is treated
//! as absent, and relations that point at it report a
//! [`ifc_check_model::ModelError`]. Use [`StepParser::strict`] to reject such
//! files at load time instead.
//!
//! # Example
//!
//! ```ignore
//! use ifc_check_model::IfcModel;
//!
//! let model = ifc_check_parser::open("house.ifc")?;
//! println!("{} walls", model.count_by_type("IfcWall"));
//! ```

mod header;
mod model;
mod relations;
mod scanner;
mod store;
mod tokenizer;

pub use header::parse_header;
pub use model::StepModel;
pub use scanner::{EntityScanner, RawRecord};
pub use tokenizer::{decode_step_string, parse_entity, Token};

use ifc_check_model::{IfcModel, IfcParser, LoadResult};
use std::path::Path;
use std::sync::Arc;

/// Main STEP/IFC parser implementing `IfcParser` trait
#[derive(Clone, Copy, Debug, Default)]
pub struct StepParser {
    /// Reject files containing undecodable instance records
    pub strict: bool,
}

impl StepParser {
    /// Create a new lenient parser
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a parser that decodes every record at load time
    pub fn strict() -> Self {
        Self { strict: true }
    }
}

impl IfcParser for StepParser {
    fn parse(&self, content: &str) -> LoadResult<Arc<dyn IfcModel>> {
        StepModel::parse(content, self.strict).map(|m| Arc::new(m) as Arc<dyn IfcModel>)
    }
}

/// Quick parse function for simple use cases
pub fn parse(content: &str) -> LoadResult<Arc<dyn IfcModel>> {
    StepParser::new().parse(content)
}

/// Read and parse an IFC file
pub fn open(path: impl AsRef<Path>) -> LoadResult<Arc<dyn IfcModel>> {
    log::debug!("Opening {}", path.as_ref().display());
    StepParser::new().open(path.as_ref())
}

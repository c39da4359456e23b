// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Core traits for model access
//!
//! These traits are the seam between a parser backend and the validator.

use crate::{Entity, LoadResult, ModelMetadata, RelationReader};
use std::path::Path;
use std::sync::Arc;

/// Loading interface - entry point for turning IFC content into a model
///
/// # Example
///
/// ```ignore
/// use ifc_check_model::{IfcParser, IfcModel};
///
/// let parser: Box<dyn IfcParser> = get_parser();
/// let model = parser.open(Path::new("house.ifc"))?;
/// println!("Schema: {}", model.schema());
/// ```
pub trait IfcParser: Send + Sync {
    /// Parse IFC content held in memory
    fn parse(&self, content: &str) -> LoadResult<Arc<dyn IfcModel>>;

    /// Read and parse an IFC file
    ///
    /// Fails with [`crate::LoadError`] when the file cannot be read or is
    /// not an IFC exchange file.
    fn open(&self, path: &Path) -> LoadResult<Arc<dyn IfcModel>> {
        let content = std::fs::read_to_string(path)?;
        self.parse(&content)
    }
}

/// Read-only access to a loaded IFC model
///
/// The model is thread-safe (`Send + Sync`) so rule evaluation can fan out
/// across threads.
pub trait IfcModel: Send + Sync {
    /// All instances of a type, including schema subtypes, in file order
    ///
    /// The type name is matched case-insensitively. Unknown or absent types
    /// yield an empty vector, never an error.
    fn by_type(&self, type_name: &str) -> Vec<Entity>;

    /// Number of instances of a type, including schema subtypes
    fn count_by_type(&self, type_name: &str) -> usize {
        self.by_type(type_name).len()
    }

    /// Capability queries over entity relations
    fn relations(&self) -> &dyn RelationReader;

    /// File metadata (schema version, originating system, etc.)
    fn metadata(&self) -> &ModelMetadata;

    /// Schema identifier (e.g. "IFC4"), for reporting only
    fn schema(&self) -> &str {
        &self.metadata().schema_version
    }
}

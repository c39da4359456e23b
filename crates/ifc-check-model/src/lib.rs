// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! IFC-Check Model - Entity abstraction and capability traits
//!
//! This crate defines the read-only view of an IFC model that the validation
//! engine works against. Parser backends implement the traits; the engine
//! never sees raw STEP data.
//!
//! # Architecture
//!
//! - [`IfcParser`] - Entry point for loading IFC content
//! - [`IfcModel`] - Type-indexed entity selection and file metadata
//! - [`RelationReader`] - Capability queries over an entity's relations
//!   (defined-by, contained-in, associations, shape representation)
//!
//! Capability queries return an empty result when an entity simply has no
//! such relation. They return an error only when the model data behind a
//! relation is malformed (dangling references, wrong attribute types).
//! Defined-by relations report errors one relation at a time, and property
//! sets are named before their properties are read.
//!
//! # Example
//!
//! ```ignore
//! use ifc_check_model::{IfcModel, DefinedBy};
//!
//! let model = ifc_check_parser::open("house.ifc")?;
//! for wall in model.by_type("IfcWall") {
//!     for rel in model.relations().defined_by(wall.id) {
//!         if let Ok(DefinedBy::Properties(def)) = rel {
//!             if let Some(pset) = def.as_property_set() {
//!                 let properties = model.relations().properties(pset.id)?;
//!                 println!("{}: {:?} {:?}", wall.display_name(), pset.name, properties);
//!             }
//!         }
//!     }
//! }
//! ```

pub mod entity;
pub mod error;
pub mod relations;
pub mod traits;
pub mod types;

pub use entity::*;
pub use error::*;
pub use relations::*;
pub use traits::*;
pub use types::*;

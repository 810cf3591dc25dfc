//! Parametric **keycap** meshes for 3-D printing.
//!
//! A keycap is built from a handful of numbers: width in key units, profile
//! family and row, bevel radius and stem type. The pipeline produces a
//! tapered double-walled [shell](shell), weights its edges for a later
//! [weighted bevel](bevel), builds a cross-holed [stem](stem) and merges it
//! in with a boolean union.
//!
//! Boolean and bevel operations are capabilities ([`traits`]) supplied by
//! the caller; a BSP-tree [`BooleanEngine`] ships with the crate.
//!
//! # Features
//! #### Default
//! - **bsp**: built-in BSP boolean engine ([`bsp::BspEngine`])
//!
//! ```ignore
//! use keycapgen::{BspEngine, KeycapAssembler, KeycapSpec};
//!
//! let engine = BspEngine::new();
//! let keycap = KeycapAssembler::new(&engine).assemble(&KeycapSpec::default())?;
//! assert_eq!(keycap.dimensions.height, 8.5);
//! ```

#![forbid(unsafe_code)]
#![warn(clippy::missing_const_for_fn, clippy::approx_constant, clippy::all)]

pub mod bevel;
pub mod combine;
pub mod errors;
pub mod float_types;
pub mod keycap;
pub mod mesh;
pub mod profile;
pub mod shell;
pub mod stem;
pub mod traits;

#[cfg(feature = "bsp")]
pub mod bsp;

pub use bevel::{BevelSettings, BevelWeighting};
pub use combine::FeatureCombiner;
pub use errors::{KeycapError, Result};
pub use keycap::{AssemblyState, KeyWidth, Keycap, KeycapAssembler, KeycapSpec, regenerate};
pub use mesh::Mesh;
pub use mesh::edge::{EdgeKey, EdgeWeightMap};
pub use mesh::manifold::ManifoldReport;
pub use profile::{ProfileDimensions, ProfileType};
pub use shell::{Shell, ShellBuilder};
pub use stem::{StemFeatureBuilder, StemType};
pub use traits::{BevelEngine, BooleanEngine, EdgeCountValidator, MeshSink, MeshValidator};

#[cfg(feature = "bsp")]
pub use bsp::BspEngine;

//! # Scene Export
//!
//! Exports the renderable state of a 3D host scene as a physically based
//! renderer's markup scene description.
//!
//! ## Features
//!
//! - **Element Model**: Ordered, attributed element trees with typed parameter builders
//! - **Material Translation**: Closed table of surface, medium and emitter translators
//! - **Shader Networks**: Dependency-ordered flattening of node graphs with cycle detection
//! - **Scene Assembly**: Integrator, sensor, lights, materials, shapes and background
//! - **Diagnostics**: Unsupported content degrades gracefully and is reported, never fatal
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use std::path::Path;
//! use scene_export::prelude::*;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let host = SceneSnapshot::load_from_file("shot.ron")?;
//!     let config = ExportConfig::default();
//!
//!     let report = export_scene(
//!         &host,
//!         &mut PlannedGeometry,
//!         Path::new("shot.xml"),
//!         Path::new("render"),
//!         "renderSettings",
//!         &config,
//!     )?;
//!     for diagnostic in &report.diagnostics {
//!         println!("{diagnostic}");
//!     }
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(
    clippy::module_name_repetitions,
    clippy::similar_names,
    clippy::cast_possible_truncation,
    clippy::cast_precision_loss,
    clippy::must_use_candidate
)]

// Ambient
pub mod config;
pub mod diagnostics;
pub mod error;
pub mod foundation;

// Host boundary
pub mod host;

// Output model
pub mod element;
pub mod serializer;

// Translation
pub mod materials;
pub mod presets;
pub mod shader_graph;

// Assembly
pub mod scene;

pub use error::{ElementError, ExportError};
pub use scene::{export_scene, ExportReport, SceneExporter};

/// Common imports for exporter users
pub mod prelude {
    pub use crate::{
        config::{BackgroundConfig, Config, ExportConfig, SurfaceShading},
        diagnostics::{Diagnostic, DiagnosticKind},
        element::{Element, SceneKind},
        error::ExportError,
        host::{AttrValue, GeometryExporter, NodeRecord, PlannedGeometry, SceneHost, SceneSnapshot, ShapeKind},
        scene::{export_scene, ExportContext, ExportReport, SceneExporter},
    };
}

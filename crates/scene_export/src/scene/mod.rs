//! # Scene Export
//!
//! Turns the renderable portion of a host scene into one element tree.
//!
//! ## Layout
//!
//! - **Integrator**: base, meta and multichannel integrators from render settings
//! - **Camera**: the first renderable camera, its sampler and film
//! - **Lights**: analytic, area and environment emitters
//! - **Geometry**: visible shapes, their materials and media
//! - **Exporter**: assembly of the root element and the file write
//!
//! Nothing in here fails on bad scene content. Conditions the renderer
//! cannot express are recorded as diagnostics on the [`ExportContext`].

pub mod camera;
pub mod context;
pub mod exporter;
pub mod geometry;
pub mod integrator;
pub mod lights;
pub mod visibility;

pub use context::ExportContext;
pub use exporter::{build_scene, export_scene, BuiltScene, ExportReport, SceneExporter};

#[cfg(test)]
mod tests;

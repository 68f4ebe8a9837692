//! Scene assembly and the export entry point

use std::path::{Path, PathBuf};

use crate::config::ExportConfig;
use crate::diagnostics::Diagnostic;
use crate::element::{format_float, format_floats, kinds, Element};
use crate::error::ExportError;
use crate::host::{GeometryExporter, SceneHost};
use crate::scene::camera::{renderable_camera, write_sensor};
use crate::scene::geometry::{renderable_geometry, write_materials, write_shape};
use crate::scene::integrator::write_integrator;
use crate::scene::lights::write_lights;
use crate::scene::ExportContext;
use crate::serializer;

/// Outcome of a successful export
#[derive(Debug, Clone, Default)]
pub struct ExportReport {
    /// Side artifacts written by the geometry collaborator, in shape order
    pub geometry_files: Vec<PathBuf>,
    /// Every non-fatal condition met during the export
    pub diagnostics: Vec<Diagnostic>,
}

impl ExportReport {
    /// Whether the export ran without any diagnostic
    pub fn is_clean(&self) -> bool {
        self.diagnostics.is_empty()
    }
}

/// Assembled root element plus the geometry files it refers to
#[derive(Debug, Clone)]
pub struct BuiltScene {
    /// Root element
    pub root: Element,
    /// Side artifacts in shape order
    pub geometry_files: Vec<PathBuf>,
}

/// Background closure block
pub fn write_background(config: &ExportConfig) -> Option<Element> {
    let background = &config.background;
    if !background.enabled {
        return None;
    }

    let closure = Element::of("background")
        .with_attribute("name", "bg")
        .with_attribute("strength", format_float(background.strength))
        .with_attribute("color", format_floats(&background.color));

    Some(
        Element::of("background")
            .with_child(closure)
            .with_child(kinds::connect("bg background", "output surface")),
    )
}

/// Build the whole scene tree for the context's host and frame
///
/// Children are ordered integrator, sensor, lights, materials, shapes and
/// background. Only the geometry collaborator and an invalid root kind can
/// fail; everything else degrades to diagnostics.
pub fn build_scene(
    ctx: &mut ExportContext<'_>,
    geometry: &mut dyn GeometryExporter,
    render_dir: &Path,
    render_settings: &str,
) -> Result<BuiltScene, ExportError> {
    let config = ctx.config();
    let mut root = Element::try_new(config.root_element.as_str())?
        .with_attribute("version", config.scene_version.as_str());

    if config.write_integrator {
        root.add_child(write_integrator(ctx, render_settings));
    }

    if let Some(camera) = renderable_camera(ctx) {
        root.add_child(write_sensor(ctx, &camera, render_settings));
    }

    let lights = write_lights(ctx);
    log::info!("Exported {} light elements", lights.len());
    root.add_children(lights);

    let items = renderable_geometry(ctx);
    let library = write_materials(ctx, &items);

    let mut shapes = Vec::with_capacity(items.len());
    let mut geometry_files = Vec::with_capacity(items.len());
    for item in &items {
        let (shape, path) = write_shape(ctx, &library, geometry, render_dir, item)?;
        shapes.push(shape);
        geometry_files.push(path);
    }
    log::info!("Exported {} shapes", shapes.len());

    root.add_children(library.into_elements());
    root.add_children(shapes);
    root.add_children(write_background(config));

    Ok(BuiltScene {
        root,
        geometry_files,
    })
}

/// Export-call options beyond the host and its render settings
pub struct SceneExporter<'a> {
    host: &'a dyn SceneHost,
    config: &'a ExportConfig,
    frame: Option<f64>,
}

impl<'a> SceneExporter<'a> {
    /// Exporter over `host` using `config`
    pub fn new(host: &'a dyn SceneHost, config: &'a ExportConfig) -> Self {
        Self {
            host,
            config,
            frame: None,
        }
    }

    /// Export a frame other than the host's current one
    #[must_use]
    pub fn with_frame(mut self, frame: f64) -> Self {
        self.frame = Some(frame);
        self
    }

    fn context(&self) -> ExportContext<'a> {
        let ctx = ExportContext::new(self.host, self.config);
        match self.frame {
            Some(frame) => ctx.with_frame(frame),
            None => ctx,
        }
    }

    /// Build the scene tree without writing it
    pub fn build(
        &self,
        geometry: &mut dyn GeometryExporter,
        render_dir: &Path,
        render_settings: &str,
    ) -> Result<(BuiltScene, Vec<Diagnostic>), ExportError> {
        let mut ctx = self.context();
        let scene = build_scene(&mut ctx, geometry, render_dir, render_settings)?;
        Ok((scene, ctx.into_diagnostics().into_vec()))
    }

    /// Build the scene and write it to `out_path`
    pub fn export(
        &self,
        geometry: &mut dyn GeometryExporter,
        out_path: &Path,
        render_dir: &Path,
        render_settings: &str,
    ) -> Result<ExportReport, ExportError> {
        log::info!(
            "Exporting frame {} to {}",
            self.context().frame(),
            out_path.display()
        );

        let (scene, diagnostics) = self.build(geometry, render_dir, render_settings)?;
        serializer::write_document(&scene.root, out_path)?;

        if !diagnostics.is_empty() {
            log::warn!("Export finished with {} diagnostics", diagnostics.len());
        }
        Ok(ExportReport {
            geometry_files: scene.geometry_files,
            diagnostics,
        })
    }
}

/// Export the host's current frame to `out_path`
///
/// Returns the geometry side artifacts and the recorded diagnostics. Fails
/// only when the geometry collaborator or the scene write fails.
pub fn export_scene(
    host: &dyn SceneHost,
    geometry: &mut dyn GeometryExporter,
    out_path: &Path,
    render_dir: &Path,
    render_settings: &str,
    config: &ExportConfig,
) -> Result<ExportReport, ExportError> {
    SceneExporter::new(host, config).export(geometry, out_path, render_dir, render_settings)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::BackgroundConfig;

    #[test]
    fn test_background_block() {
        let background = write_background(&ExportConfig::default()).unwrap();
        let closure = &background.children()[0];
        assert_eq!(closure.get_attribute("strength"), Some("2.0"));
        assert_eq!(closure.get_attribute("color"), Some("0.2 0.2 0.2"));

        let connect = &background.children()[1];
        assert_eq!(connect.get_attribute("from"), Some("bg background"));
        assert_eq!(connect.get_attribute("to"), Some("output surface"));
    }

    #[test]
    fn test_background_disabled() {
        let config = ExportConfig::default().with_background(BackgroundConfig {
            enabled: false,
            ..BackgroundConfig::default()
        });
        assert!(write_background(&config).is_none());
    }
}

//! Renderable geometry, shader assignment and shape elements
//!
//! Materials are written once per shader no matter how many shapes use
//! them. Shapes then refer to the written material by id (or to the
//! network shader by name), and a shape only references a material that
//! was actually written.

use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};

use crate::config::SurfaceShading;
use crate::element::{kinds, params, Element, SceneKind};
use crate::error::ExportError;
use crate::host::{GeometryExporter, NodeCategory, ShapeKind};
use crate::materials::{self, MaterialKind};
use crate::scene::visibility::{is_locally_visible, is_visible};
use crate::scene::ExportContext;
use crate::shader_graph;

/// Host node type of shading groups
pub const SHADING_ENGINE: &str = "shadingEngine";

/// A visible transform with a mesh or hair shape below it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeometryItem {
    /// Transform path, the deduplication key
    pub transform: String,
    /// Shape node under the transform
    pub shape: String,
    /// Kind of the shape
    pub kind: ShapeKind,
}

/// Visible transforms carrying geometry, in scene order and deduplicated
pub fn renderable_geometry(ctx: &ExportContext<'_>) -> Vec<GeometryItem> {
    let host = ctx.host();
    let mut items: Vec<GeometryItem> = Vec::new();

    for transform in host.nodes_in_category(NodeCategory::Transform) {
        if items.iter().any(|item| item.transform == transform) {
            continue;
        }

        let shape = host.children(&transform).into_iter().find_map(|child| {
            let kind = ShapeKind::from_host_type(&host.node_type(&child)?)?;
            is_locally_visible(host, &child).then_some((child, kind))
        });

        if let Some((shape, kind)) = shape {
            if is_visible(host, &transform) {
                log::debug!("Renderable {kind:?}: {transform}");
                items.push(GeometryItem { transform, shape, kind });
            }
        }
    }
    items
}

/// Shaders assigned through the first shading group a shape feeds
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ShaderAssignment {
    /// Node connected to `surfaceShader`
    pub surface: Option<String>,
    /// Node connected to `volumeShader`
    pub volume: Option<String>,
}

/// Look up the shading group of `shape` and its shader inputs
pub fn shader_assignment(ctx: &ExportContext<'_>, shape: &str) -> ShaderAssignment {
    let host = ctx.host();
    let engine = host
        .destinations(shape)
        .into_iter()
        .find(|plug| host.node_type(&plug.node).as_deref() == Some(SHADING_ENGINE));

    match engine {
        Some(engine) => ShaderAssignment {
            surface: host.source(&engine.node, "surfaceShader").map(|plug| plug.node),
            volume: host.source(&engine.node, "volumeShader").map(|plug| plug.node),
        },
        None => ShaderAssignment::default(),
    }
}

/// How a material ended up in the scene
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WrittenAs {
    /// Typed element with the material name as id
    Translated,
    /// Node-network shader named `<material>_shader`
    Network,
}

/// Materials written so far, keyed by shader node
#[derive(Debug, Default)]
pub struct MaterialLibrary {
    written: HashMap<String, WrittenAs>,
    skipped: HashSet<String>,
    elements: Vec<Element>,
}

impl MaterialLibrary {
    /// Empty library
    pub fn new() -> Self {
        Self::default()
    }

    /// How `material` was written, if it was
    pub fn written_as(&self, material: &str) -> Option<WrittenAs> {
        self.written.get(material).copied()
    }

    /// Number of written materials
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    /// Whether nothing was written
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Material elements in write order
    pub fn into_elements(self) -> Vec<Element> {
        self.elements
    }

    /// Whether `material` was already written or given up on
    fn seen(&self, material: &str) -> bool {
        self.written.contains_key(material) || self.skipped.contains(material)
    }

    fn skip(&mut self, material: &str) {
        self.skipped.insert(material.to_string());
    }

    fn record(&mut self, material: &str, how: WrittenAs, element: Element) {
        self.written.insert(material.to_string(), how);
        self.elements.push(element);
    }

    /// Write the surface shader `material` once
    pub fn add_surface(&mut self, ctx: &mut ExportContext<'_>, material: &str) {
        if self.seen(material) {
            return;
        }

        let node_type = ctx.host().node_type(material).unwrap_or_default();
        if node_type == MaterialKind::ObjectAreaLight.type_tag() {
            return;
        }

        let translatable = MaterialKind::from_type_tag(&node_type).is_some();
        let networkable = shader_graph::is_network_node(&node_type);
        let use_network = match ctx.config().surface_shading {
            SurfaceShading::Network => networkable,
            SurfaceShading::Translate => networkable && !translatable,
        };

        let written = if use_network {
            shader_graph::shader_network(ctx, material, material).map(|shader| (WrittenAs::Network, shader))
        } else {
            materials::translate(ctx, material, material).map(|element| (WrittenAs::Translated, element))
        };

        match written {
            Some((how, element)) => self.record(material, how, element),
            None => self.skip(material),
        }
    }

    /// Write the volume shader `material` once, when it has a translator
    pub fn add_volume(&mut self, ctx: &mut ExportContext<'_>, material: &str) {
        if self.seen(material) {
            return;
        }

        let node_type = ctx.host().node_type(material).unwrap_or_default();
        if MaterialKind::from_type_tag(&node_type).is_none() {
            log::debug!("Ignoring volume shader {material} of type '{node_type}'");
            self.skip(material);
            return;
        }

        match materials::translate(ctx, material, material) {
            Some(element) => self.record(material, WrittenAs::Translated, element),
            None => self.skip(material),
        }
    }
}

/// Write every assigned material exactly once
pub fn write_materials(ctx: &mut ExportContext<'_>, items: &[GeometryItem]) -> MaterialLibrary {
    let mut library = MaterialLibrary::new();

    for item in items {
        let assignment = shader_assignment(ctx, &item.shape);
        if let Some(surface) = &assignment.surface {
            library.add_surface(ctx, surface);
        }
        if let Some(volume) = &assignment.volume {
            library.add_volume(ctx, volume);
        }
    }

    log::info!("Wrote {} materials", library.len());
    library
}

fn medium_reference(ctx: &ExportContext<'_>, library: &MaterialLibrary, volume: &str) -> Option<Element> {
    library.written_as(volume)?;

    if ctx.host().node_type(volume).as_deref() == Some(MaterialKind::DipoleSubsurface.type_tag()) {
        Some(kinds::reference(volume))
    } else {
        Some(
            SceneKind::Ref
                .element()
                .with_attribute("name", "interior")
                .with_attribute("id", volume),
        )
    }
}

fn surface_reference(
    ctx: &mut ExportContext<'_>,
    library: &MaterialLibrary,
    surface: &str,
) -> Option<Element> {
    let node_type = ctx.host().node_type(surface).unwrap_or_default();
    if node_type == MaterialKind::ObjectAreaLight.type_tag() {
        return materials::translate(ctx, surface, surface);
    }

    match library.written_as(surface)? {
        WrittenAs::Translated => Some(kinds::reference(surface)),
        WrittenAs::Network => Some(kinds::reference(&shader_graph::shader_name(surface))),
    }
}

/// `shape` element for one geometry item
///
/// The geometry collaborator writes the side artifact; its path becomes
/// the shape's `filename`.
pub fn write_shape(
    ctx: &mut ExportContext<'_>,
    library: &MaterialLibrary,
    geometry: &mut dyn GeometryExporter,
    render_dir: &Path,
    item: &GeometryItem,
) -> Result<(Element, PathBuf), ExportError> {
    let path = geometry
        .export(&item.transform, item.kind, render_dir)
        .map_err(|message| ExportError::Geometry {
            node: item.transform.clone(),
            message,
        })?;

    let mut shape = SceneKind::Shape
        .typed(item.kind.shape_type())
        .with_child(params::string("filename", path.display().to_string()));

    let assignment = shader_assignment(ctx, &item.shape);
    if let Some(medium) = assignment.volume.as_deref().and_then(|v| medium_reference(ctx, library, v)) {
        shape.add_child(medium);
    }
    if let Some(surface) = assignment.surface.as_deref() {
        if let Some(reference) = surface_reference(ctx, library, surface) {
            shape.add_child(reference);
        }
    }

    Ok((shape, path))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ExportConfig;
    use crate::diagnostics::DiagnosticKind;
    use crate::host::{AttrValue, NodeRecord, PlannedGeometry, SceneSnapshot};

    fn mesh(name: &str) -> [NodeRecord; 2] {
        [
            NodeRecord::new(format!("|{name}"), "transform"),
            NodeRecord::new(format!("|{name}|{name}Shape"), "mesh").with_parent(format!("|{name}")),
        ]
    }

    fn scene() -> SceneSnapshot {
        let mut host = SceneSnapshot::new(1.0)
            .with_node(
                NodeRecord::new("red", "CyclesDiffuseShader")
                    .with_attr("reflectance", AttrValue::Float3([0.8, 0.1, 0.1])),
            )
            .with_node(NodeRecord::new("fog", "CyclesHomogeneousParticipatingMedium"))
            .with_node(NodeRecord::new("redSG", SHADING_ENGINE))
            .with_connection("red.outColor", "redSG.surfaceShader")
            .with_connection("fog.outColor", "redSG.volumeShader");

        for (index, name) in ["ball", "box"].into_iter().enumerate() {
            for node in mesh(name) {
                host.add_node(node);
            }
            host.connect(
                &format!("|{name}|{name}Shape.instObjGroups"),
                &format!("redSG.dagSetMembers[{index}]"),
            );
        }
        host
    }

    #[test]
    fn test_renderable_geometry_dedup_and_visibility() {
        let mut host = scene();
        host.add_node(
            NodeRecord::new("|hidden", "transform").with_attr("visibility", AttrValue::Bool(false)),
        );
        host.add_node(NodeRecord::new("|hidden|hiddenShape", "mesh").with_parent("|hidden"));
        host.add_node(
            NodeRecord::new("|ball|ballShapeOrig", "mesh")
                .with_parent("|ball")
                .with_attr("intermediateObject", AttrValue::Bool(true)),
        );
        let config = ExportConfig::default();
        let ctx = ExportContext::new(&host, &config);

        let items = renderable_geometry(&ctx);
        let transforms: Vec<_> = items.iter().map(|i| i.transform.as_str()).collect();
        assert_eq!(transforms, ["|ball", "|box"]);
        assert_eq!(items[0].shape, "|ball|ballShape");
        assert_eq!(items[0].kind, ShapeKind::Mesh);
    }

    #[test]
    fn test_shader_assignment() {
        let host = scene();
        let config = ExportConfig::default();
        let ctx = ExportContext::new(&host, &config);

        let assignment = shader_assignment(&ctx, "|box|boxShape");
        assert_eq!(assignment.surface.as_deref(), Some("red"));
        assert_eq!(assignment.volume.as_deref(), Some("fog"));
        assert_eq!(shader_assignment(&ctx, "|nothing"), ShaderAssignment::default());
    }

    #[test]
    fn test_shared_material_written_once() {
        let host = scene();
        let config = ExportConfig::default();
        let mut ctx = ExportContext::new(&host, &config);

        let items = renderable_geometry(&ctx);
        let library = write_materials(&mut ctx, &items);
        assert_eq!(library.len(), 2);
        assert_eq!(library.written_as("red"), Some(WrittenAs::Translated));
        assert_eq!(library.written_as("fog"), Some(WrittenAs::Translated));
    }

    #[test]
    fn test_shape_references() {
        let host = scene();
        let config = ExportConfig::default();
        let mut ctx = ExportContext::new(&host, &config);
        let items = renderable_geometry(&ctx);
        let library = write_materials(&mut ctx, &items);

        let (shape, path) =
            write_shape(&mut ctx, &library, &mut PlannedGeometry, Path::new("/tmp/render"), &items[0])
                .unwrap();
        assert_eq!(path, Path::new("/tmp/render/__ball.obj"));
        assert_eq!(shape.get_attribute("type"), Some("obj"));

        let kinds: Vec<_> = shape.children().iter().map(Element::kind).collect();
        assert_eq!(kinds, ["string", "ref", "ref"]);
        assert_eq!(shape.children()[1].get_attribute("name"), Some("interior"));
        assert_eq!(shape.children()[1].get_attribute("id"), Some("fog"));
        assert_eq!(shape.children()[2].get_attribute("id"), Some("red"));
    }

    #[test]
    fn test_network_mode_references_shader_name() {
        let host = scene();
        let config = ExportConfig::default().with_surface_shading(SurfaceShading::Network);
        let mut ctx = ExportContext::new(&host, &config);
        let items = renderable_geometry(&ctx);
        let library = write_materials(&mut ctx, &items);
        assert_eq!(library.written_as("red"), Some(WrittenAs::Network));

        let (shape, _) =
            write_shape(&mut ctx, &library, &mut PlannedGeometry, Path::new("out"), &items[1]).unwrap();
        assert_eq!(shape.children().last().and_then(|c| c.get_attribute("id")), Some("red_shader"));
    }

    #[test]
    fn test_object_area_light_inlined() {
        let mut host = scene();
        host.add_node(
            NodeRecord::new("glow", "CyclesObjectAreaLightShader")
                .with_attr("radiance", AttrValue::Float3([4.0; 3])),
        );
        host.connect("glow.outColor", "redSG.surfaceShader");
        let config = ExportConfig::default();
        let mut ctx = ExportContext::new(&host, &config);
        let items = renderable_geometry(&ctx);
        let library = write_materials(&mut ctx, &items);
        assert!(library.written_as("glow").is_none());

        let (shape, _) =
            write_shape(&mut ctx, &library, &mut PlannedGeometry, Path::new("out"), &items[0]).unwrap();
        let emitter = shape.children().last().unwrap();
        assert_eq!(emitter.kind(), "emitter");
        assert_eq!(emitter.get_attribute("type"), Some("area"));
    }

    #[test]
    fn test_unsupported_shared_shader_reported_once() {
        let mut host = scene();
        host.add_node(NodeRecord::new("ramp1", "ramp"));
        host.connect("ramp1.outColor", "redSG.surfaceShader");
        let config = ExportConfig::default();
        let mut ctx = ExportContext::new(&host, &config);

        let items = renderable_geometry(&ctx);
        assert_eq!(items.len(), 2);
        let library = write_materials(&mut ctx, &items);
        assert!(library.written_as("ramp1").is_none());
        assert_eq!(ctx.diagnostics().count(DiagnosticKind::UnsupportedShader), 1);

        for item in &items {
            let (shape, _) =
                write_shape(&mut ctx, &library, &mut PlannedGeometry, Path::new("out"), item).unwrap();
            assert!(shape.children().iter().all(|c| c.get_attribute("id") != Some("ramp1")));
        }
        assert_eq!(ctx.diagnostics().count(DiagnosticKind::UnsupportedShader), 1);
    }

    struct FailingGeometry;

    impl GeometryExporter for FailingGeometry {
        fn export(&mut self, _: &str, _: ShapeKind, _: &Path) -> Result<PathBuf, String> {
            Err("disk full".to_string())
        }
    }

    #[test]
    fn test_geometry_failure_is_an_error() {
        let host = scene();
        let config = ExportConfig::default();
        let mut ctx = ExportContext::new(&host, &config);
        let items = renderable_geometry(&ctx);
        let library = MaterialLibrary::new();

        let err = write_shape(&mut ctx, &library, &mut FailingGeometry, Path::new("out"), &items[0])
            .unwrap_err();
        assert!(matches!(err, ExportError::Geometry { ref node, .. } if node == "|ball"));
    }
}

//! End-to-end export scenarios over in-memory scenes

use std::fs;
use std::path::Path;

use crate::config::{ExportConfig, SurfaceShading};
use crate::diagnostics::{Diagnostic, DiagnosticKind};
use crate::element::Element;
use crate::host::{AttrValue, NodeRecord, PlannedGeometry, SceneSnapshot};
use crate::scene::geometry::SHADING_ENGINE;
use crate::scene::lights::{ENVIRONMENT_NODE, SUNSKY_NODE};
use crate::scene::{export_scene, BuiltScene, SceneExporter};
use crate::serializer::XML_DECLARATION;

const SETTINGS: &str = "renderSettings";

fn add_mesh(host: &mut SceneSnapshot, name: &str, engine: &str) {
    let member = host.connections.iter().filter(|c| c.to.node == engine).count();
    let transform = format!("|{name}");
    let shape = format!("{transform}|{name}Shape");
    host.add_node(NodeRecord::new(&transform, "transform"));
    host.add_node(NodeRecord::new(&shape, "mesh").with_parent(&transform));
    host.connect(
        &format!("{shape}.instObjGroups"),
        &format!("{engine}.dagSetMembers[{member}]"),
    );
}

/// One mesh shaded by `material`
fn shaded_scene(material: NodeRecord) -> SceneSnapshot {
    let surface = format!("{}.outColor", material.name);
    let mut host = SceneSnapshot::new(1.0)
        .with_node(material)
        .with_node(NodeRecord::new("matSG", SHADING_ENGINE))
        .with_connection(&surface, "matSG.surfaceShader");
    add_mesh(&mut host, "ball", "matSG");
    host
}

fn diffuse(twosided: bool) -> NodeRecord {
    NodeRecord::new("lambert1", "CyclesDiffuseShader")
        .with_attr("reflectance", AttrValue::Float3([0.5; 3]))
        .with_attr("color", AttrValue::Float3([0.5; 3]))
        .with_attr("twosided", AttrValue::Bool(twosided))
}

fn build(host: &SceneSnapshot, config: &ExportConfig) -> (BuiltScene, Vec<Diagnostic>) {
    SceneExporter::new(host, config)
        .build(&mut PlannedGeometry, Path::new("render"), SETTINGS)
        .unwrap()
}

fn of_kind<'e>(root: &'e Element, kind: &str) -> Vec<&'e Element> {
    root.descendants()
        .into_iter()
        .filter(|element| element.kind() == kind)
        .collect()
}

fn typed<'e>(root: &'e Element, kind: &str, ty: &str) -> Vec<&'e Element> {
    of_kind(root, kind)
        .into_iter()
        .filter(|element| element.get_attribute("type") == Some(ty))
        .collect()
}

fn has(diagnostics: &[Diagnostic], kind: DiagnosticKind) -> bool {
    diagnostics.iter().any(|d| d.kind == kind)
}

#[test]
fn test_diffuse_material_translated() {
    let host = shaded_scene(diffuse(false));
    let (scene, _) = build(&host, &ExportConfig::default());

    let diffuse = typed(&scene.root, "bsdf", "diffuse");
    assert_eq!(diffuse.len(), 1);
    assert_eq!(diffuse[0].get_attribute("id"), Some("lambert1"));
    let reflectance = diffuse[0].named_child("reflectance").unwrap();
    assert_eq!(reflectance.get_attribute("value"), Some("0.5 0.5 0.5"));
    assert!(typed(&scene.root, "bsdf", "twosided").is_empty());

    let shape = &typed(&scene.root, "shape", "obj")[0];
    assert_eq!(shape.children().last().unwrap().get_attribute("id"), Some("lambert1"));
}

#[test]
fn test_diffuse_material_as_network() {
    let host = shaded_scene(diffuse(false));
    let config = ExportConfig::default().with_surface_shading(SurfaceShading::Network);
    let (scene, _) = build(&host, &config);

    assert!(of_kind(&scene.root, "bsdf").is_empty());
    let shader = of_kind(&scene.root, "shader")[0];
    assert_eq!(shader.get_attribute("name"), Some("lambert1_shader"));
    let bsdf = shader.child_at(0).unwrap();
    assert_eq!(bsdf.kind(), "diffuse_bsdf");
    assert_eq!(bsdf.get_attribute("color"), Some("0.5 0.5 0.5"));

    let shape = &typed(&scene.root, "shape", "obj")[0];
    assert_eq!(shape.children().last().unwrap().get_attribute("id"), Some("lambert1_shader"));
}

#[test]
fn test_two_sided_wraps_anonymous_inner() {
    let host = shaded_scene(diffuse(true));
    let (scene, _) = build(&host, &ExportConfig::default());

    let wrapper = typed(&scene.root, "bsdf", "twosided");
    assert_eq!(wrapper.len(), 1);
    assert_eq!(wrapper[0].get_attribute("id"), Some("lambert1"));

    let inner = &wrapper[0].children()[0];
    assert_eq!(inner.get_attribute("type"), Some("diffuse"));
    assert_eq!(inner.get_attribute("id"), None);
}

#[test]
fn test_environment_conflict_keeps_image_light() {
    let host = shaded_scene(diffuse(false))
        .with_node(
            NodeRecord::new("sky1", SUNSKY_NODE)
                .with_attr("useSun", AttrValue::Bool(true))
                .with_attr("useSky", AttrValue::Bool(true)),
        )
        .with_node(NodeRecord::new("env1", ENVIRONMENT_NODE))
        .with_node(
            NodeRecord::new("hdri", "file")
                .with_attr("fileTextureName", AttrValue::String("studio.hdr".into())),
        )
        .with_connection("hdri.outColor", "env1.source");
    let (scene, diagnostics) = build(&host, &ExportConfig::default());

    let emitters = of_kind(&scene.root, "emitter");
    assert_eq!(emitters.len(), 1);
    assert_eq!(emitters[0].get_attribute("type"), Some("envmap"));
    assert_eq!(
        emitters[0].named_child("filename").and_then(|f| f.get_attribute("value")),
        Some("studio.hdr")
    );
    assert!(has(&diagnostics, DiagnosticKind::EnvironmentConflict));
}

#[test]
fn test_anisotropic_rough_conductor() {
    let host = shaded_scene(
        NodeRecord::new("metal1", "CyclesRoughConductorShader")
            .with_attr("distribution", AttrValue::String("Ashikhmin Shirley".into()))
            .with_attr("alphaUV", AttrValue::Float2([0.1, 0.3]))
            .with_attr("material", AttrValue::String("Gold".into())),
    );
    let (scene, _) = build(&host, &ExportConfig::default());

    let conductor = typed(&scene.root, "bsdf", "roughconductor")[0];
    let value = |name: &str| conductor.named_child(name).and_then(|c| c.get_attribute("value"));
    assert_eq!(value("distribution"), Some("as"));
    assert_eq!(value("alphaU"), Some("0.1"));
    assert_eq!(value("alphaV"), Some("0.3"));
    assert_eq!(value("alpha"), None);
    assert_eq!(value("material"), Some("Au"));
}

#[test]
fn test_unknown_medium_preset_falls_back() {
    let mut host = shaded_scene(diffuse(false)).with_node(
        NodeRecord::new("fog", "CyclesHomogeneousParticipatingMedium")
            .with_attr("material", AttrValue::String("Marmalade".into())),
    );
    host.connect("fog.outColor", "matSG.volumeShader");
    let (scene, diagnostics) = build(&host, &ExportConfig::default());

    let medium = typed(&scene.root, "medium", "homogeneous")[0];
    assert_eq!(
        medium.named_child("material").and_then(|m| m.get_attribute("value")),
        Some("Skin1")
    );
    assert!(diagnostics
        .iter()
        .any(|d| d.kind == DiagnosticKind::UnknownPreset && d.message.contains("Marmalade")));

    let shape = &typed(&scene.root, "shape", "obj")[0];
    let interior = shape.named_child("interior").unwrap();
    assert_eq!(interior.get_attribute("id"), Some("fog"));
}

#[test]
fn test_hidden_geometry_excluded() {
    let mut host = shaded_scene(diffuse(false));
    add_mesh(&mut host, "ghost", "matSG");
    host.node_mut("|ghost")
        .unwrap()
        .set("visibility", AttrValue::Bool(false));
    let (scene, _) = build(&host, &ExportConfig::default());

    assert_eq!(of_kind(&scene.root, "shape").len(), 1);
    assert_eq!(scene.geometry_files, [Path::new("render/__ball.obj")]);
    assert_eq!(typed(&scene.root, "bsdf", "diffuse").len(), 1);
}

#[test]
fn test_missing_camera_omits_sensor() {
    let host = shaded_scene(diffuse(false));
    let (scene, diagnostics) = build(&host, &ExportConfig::default());

    assert!(of_kind(&scene.root, "sensor").is_empty());
    assert!(has(&diagnostics, DiagnosticKind::MissingCamera));
}

#[test]
fn test_invalid_root_kind_is_an_error() {
    let host = shaded_scene(diffuse(false));
    let config = ExportConfig::default().with_root_element("");
    let result = SceneExporter::new(&host, &config).build(&mut PlannedGeometry, Path::new("render"), SETTINGS);
    assert!(result.is_err());
}

fn full_scene() -> SceneSnapshot {
    shaded_scene(diffuse(false))
        .with_node(NodeRecord::new("|cam", "transform"))
        .with_node(
            NodeRecord::new("|cam|camShape", "camera")
                .with_parent("|cam")
                .with_attr("renderable", AttrValue::Bool(true))
                .with_attr("horizontalFieldOfView", AttrValue::Float(45.0)),
        )
        .with_node(NodeRecord::new("|key", "transform"))
        .with_node(
            NodeRecord::new("|key|keyShape", "pointLight")
                .with_parent("|key")
                .with_attr("color", AttrValue::Float3([1.0; 3]))
                .with_attr("intensity", AttrValue::Float(2.0)),
        )
        .with_node(
            NodeRecord::new("defaultResolution", "resolution")
                .with_attr("width", AttrValue::Int(640))
                .with_attr("height", AttrValue::Int(480)),
        )
        .with_node(
            NodeRecord::new(SETTINGS, "renderSettings")
                .with_attr("integrator", AttrValue::String("Path_Tracer".into()))
                .with_attr("sampler", AttrValue::String("Independent Sampler".into()))
                .with_attr("sampleCount", AttrValue::Int(16))
                .with_attr("film", AttrValue::String("HDR Film".into()))
                .with_attr("fHDRFilmFileFormat", AttrValue::String("OpenEXR (.exr)".into()))
                .with_attr("fHDRFilmPixelFormat", AttrValue::String("RGB".into()))
                .with_attr("fHDRFilmComponentFormat", AttrValue::String("Float 16".into()))
                .with_attr("reconstructionFilter", AttrValue::String("Box filter".into())),
        )
}

#[test]
fn test_top_level_order() {
    let host = full_scene();
    let (scene, diagnostics) = build(&host, &ExportConfig::default());

    let kinds: Vec<_> = scene.root.children().iter().map(Element::kind).collect();
    assert_eq!(kinds, ["integrator", "sensor", "emitter", "bsdf", "shape", "background"]);
    assert_eq!(scene.root.get_attribute("version"), Some("0.5.0"));
    assert!(diagnostics.is_empty(), "{diagnostics:?}");
}

#[test]
fn test_light_under_hidden_group_excluded() {
    let host = full_scene()
        .with_node(NodeRecord::new("|rig", "transform").with_attr("visibility", AttrValue::Bool(false)))
        .with_node(NodeRecord::new("|rig|fill", "transform").with_parent("|rig"))
        .with_node(
            NodeRecord::new("|rig|fill|fillShape", "pointLight")
                .with_parent("|rig|fill")
                .with_attr("color", AttrValue::Float3([1.0; 3]))
                .with_attr("intensity", AttrValue::Float(5.0)),
        );
    let (scene, diagnostics) = build(&host, &ExportConfig::default());

    assert_eq!(typed(&scene.root, "emitter", "point").len(), 1);
    let kinds: Vec<_> = scene.root.children().iter().map(Element::kind).collect();
    assert_eq!(kinds, ["integrator", "sensor", "emitter", "bsdf", "shape", "background"]);
    assert!(diagnostics.is_empty(), "{diagnostics:?}");
}

#[test]
fn test_export_writes_document() {
    let host = full_scene();
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("scene.xml");
    let render_dir = dir.path().join("render");
    let config = ExportConfig::default().with_integrator(false);

    let report = export_scene(&host, &mut PlannedGeometry, &out, &render_dir, SETTINGS, &config).unwrap();
    assert!(report.is_clean());
    assert_eq!(report.geometry_files, [render_dir.join("__ball.obj")]);

    let written = fs::read_to_string(&out).unwrap();
    assert!(written.starts_with(XML_DECLARATION));
    assert!(written.contains("<scene version=\"0.5.0\">"));
    assert!(written.contains("\t<sensor type=\"perspective\">"));
    assert!(!written.contains("<integrator"));
    assert!(written.trim_end().ends_with("</scene>"));
}

#[test]
fn test_frame_override_reaches_textures() {
    let host = shaded_scene(diffuse(false))
        .with_node(
            NodeRecord::new("seq", "file")
                .with_attr("fileTextureName", AttrValue::String("paint.0001.png".into()))
                .with_attr("useFrameExtension", AttrValue::Bool(true)),
        )
        .with_connection("seq.outColor", "lambert1.reflectance");
    let config = ExportConfig::default();
    let (scene, _) = SceneExporter::new(&host, &config)
        .with_frame(12.0)
        .build(&mut PlannedGeometry, Path::new("render"), SETTINGS)
        .unwrap();

    let texture = of_kind(&scene.root, "texture")[0];
    assert_eq!(
        texture.named_child("filename").and_then(|f| f.get_attribute("value")),
        Some("paint.0012.png")
    );
}

//! Sensor, sampler and film
//!
//! The sensor is built from the renderable camera and owns the sampler and
//! film as children, so a scene only ever carries one of each.

use crate::diagnostics::DiagnosticKind;
use crate::element::{kinds, params, Element, SceneKind};
use crate::host::NodeCategory;
use crate::presets;
use crate::scene::integrator::{enabled_channels, ui_label};
use crate::scene::ExportContext;

/// First camera flagged renderable, else the first camera with a diagnostic
pub fn renderable_camera(ctx: &mut ExportContext<'_>) -> Option<String> {
    let host = ctx.host();
    let cameras = host.nodes_in_category(NodeCategory::Camera);

    if let Some(camera) = cameras.iter().find(|cam| host.get_bool(cam, "renderable")) {
        log::info!("Render camera: {camera}");
        return Some(camera.clone());
    }

    match cameras.into_iter().next() {
        Some(first) => {
            ctx.warn(
                DiagnosticKind::MissingCamera,
                format!("No renderable camera found, rendering with first camera {first}"),
            );
            Some(first)
        }
        None => {
            ctx.warn(DiagnosticKind::MissingCamera, "Scene has no cameras, sensor omitted");
            None
        }
    }
}

/// Sensor type for `camera` before any override
fn camera_sensor_type(ctx: &ExportContext<'_>, camera: &str) -> &'static str {
    let host = ctx.host();
    if host.get_bool(camera, "orthographic") {
        "orthographic"
    } else if host.get_bool(camera, "depthOfField") {
        "thinlens"
    } else {
        "perspective"
    }
}

/// Sensor type after applying the render-settings override
pub fn sensor_type(ctx: &mut ExportContext<'_>, camera: &str, settings: &str) -> &'static str {
    let camera_type = camera_sensor_type(ctx, camera);
    let label = ctx.host().get_string(settings, "sensorOverride");
    if label.is_empty() || label == "None" {
        return camera_type;
    }

    match presets::SENSOR_OVERRIDE.lookup(&label) {
        Some(overridden) => {
            log::info!("Sensor override: {label} ({overridden})");
            overridden
        }
        None => {
            ctx.warn(
                DiagnosticKind::UnknownPreset,
                format!("unsupported sensor override '{label}', keeping '{camera_type}'"),
            );
            camera_type
        }
    }
}

fn float3(ctx: &ExportContext<'_>, node: &str, attr: &str, default: [f64; 3]) -> [f64; 3] {
    ctx.host()
        .attribute(node, attr)
        .and_then(|value| value.as_color())
        .unwrap_or(default)
}

/// `sensor` element for `camera` including its sampler and film
pub fn write_sensor(ctx: &mut ExportContext<'_>, camera: &str, settings: &str) -> Element {
    let host = ctx.host();
    let ty = sensor_type(ctx, camera, settings);
    let mut sensor = SceneKind::Sensor.typed(ty);

    if matches!(ty, "thinlens" | "perspective") {
        sensor.add_child(params::float("fov", host.get_float(camera, "horizontalFieldOfView")));
        sensor.add_child(params::string("fovAxis", "x"));
    }

    if matches!(ty, "thinlens" | "perspective" | "orthographic" | "telecentric") {
        sensor.add_child(params::float("nearClip", host.get_float(camera, "nearClipPlane")));
    }

    if matches!(ty, "thinlens" | "telecentric") {
        // Only thin-lens cameras carry real focus values
        let (aperture, focus) = if ty == "thinlens" {
            (
                host.get_float(camera, "focusRegionScale"),
                host.get_float(camera, "focusDistance"),
            )
        } else {
            (1.0, 1.0)
        };
        sensor.add_child(params::float("apertureRadius", aperture));
        sensor.add_child(params::float("focusDistance", focus));
    }

    if ty == "perspective_rdist" {
        let kc = format!(
            "{}, {}",
            params::format_float(host.get_float(settings, "sPerspectiveRdistKc2")),
            params::format_float(host.get_float(settings, "sPerspectiveRdistKc4")),
        );
        sensor.add_child(params::string("kc", kc));
    }

    let mut to_world = kinds::named_transform("toWorld");
    if ty == "orthographic" {
        let half_width = host.get_float(camera, "orthographicWidth") / 2.0;
        to_world.add_child(params::scale2(half_width, half_width));
    }
    to_world.add_child(params::lookat(
        &float3(ctx, camera, "centerOfInterestPoint", [0.0, 0.0, -1.0]),
        &float3(ctx, camera, "eyePoint", [0.0; 3]),
        &float3(ctx, camera, "worldUp", [0.0, 1.0, 0.0]),
    ));

    sensor
        .with_child(to_world)
        .with_child(write_sampler(ctx, settings))
        .with_child(write_film(ctx, settings))
}

/// `sampler` element
///
/// A scramble of `-1` seeds from the frame number so sequences decorrelate.
pub fn write_sampler(ctx: &mut ExportContext<'_>, settings: &str) -> Element {
    let host = ctx.host();
    let label = ui_label(ctx, settings, "sampler");
    let ty = presets::SAMPLER.resolve(&label, &mut ctx.diagnostics);

    let mut sampler = SceneKind::Sampler
        .typed(ty)
        .with_child(params::integer("sampleCount", host.get_int(settings, "sampleCount")));

    match ty {
        "stratified" | "ldsampler" => {
            sampler.add_child(params::integer("dimension", host.get_int(settings, "samplerDimension")));
        }
        "halton" | "hammersley" | "sobol" => {
            let scramble = match host.get_int(settings, "samplerScramble") {
                -1 => ctx.frame_number(),
                value => value,
            };
            sampler.add_child(params::integer("scramble", scramble));
        }
        _ => {}
    }
    sampler
}

fn resolve_param(
    ctx: &mut ExportContext<'_>,
    table: &presets::PresetTable,
    settings: &str,
    attr: &str,
) -> &'static str {
    let label = ctx.host().get_string(settings, attr);
    table.resolve(&label, &mut ctx.diagnostics)
}

fn hdr_film(ctx: &mut ExportContext<'_>, settings: &str) -> Element {
    let host = ctx.host();
    let file_format = resolve_param(ctx, &presets::HDR_FILE_FORMAT, settings, "fHDRFilmFileFormat");
    let pixel_format = resolve_param(ctx, &presets::HDR_PIXEL_FORMAT, settings, "fHDRFilmPixelFormat");
    let component = resolve_param(ctx, &presets::COMPONENT_FORMAT, settings, "fHDRFilmComponentFormat");

    let mut film = SceneKind::Film
        .typed("hdrfilm")
        .with_child(params::string("fileFormat", file_format));
    if file_format == "openexr" {
        film.add_child(params::string("pixelFormat", pixel_format));
    }
    film.with_child(params::string("componentFormat", component))
        .with_child(params::boolean("attachLog", host.get_bool(settings, "fHDRFilmAttachLog")))
        .with_child(params::boolean("banner", host.get_bool(settings, "fHDRFilmBanner")))
        .with_child(params::boolean(
            "highQualityEdges",
            host.get_bool(settings, "fHDRFilmHighQualityEdges"),
        ))
}

fn tiled_hdr_film(ctx: &mut ExportContext<'_>, settings: &str) -> Element {
    let pixel_format = resolve_param(ctx, &presets::HDR_PIXEL_FORMAT, settings, "fTiledHDRFilmPixelFormat");
    let component = resolve_param(ctx, &presets::COMPONENT_FORMAT, settings, "fTiledHDRFilmComponentFormat");

    SceneKind::Film
        .typed("tiledhdrfilm")
        .with_child(params::string("pixelFormat", pixel_format))
        .with_child(params::string("componentFormat", component))
}

fn ldr_film(ctx: &mut ExportContext<'_>, settings: &str) -> Element {
    let host = ctx.host();
    let file_format = resolve_param(ctx, &presets::LDR_FILE_FORMAT, settings, "fLDRFilmFileFormat");
    let pixel_format = resolve_param(ctx, &presets::LDR_PIXEL_FORMAT, settings, "fLDRFilmPixelFormat");
    let tonemap = resolve_param(ctx, &presets::TONEMAP_METHOD, settings, "fLDRFilmTonemapMethod");

    SceneKind::Film
        .typed("ldrfilm")
        .with_child(params::string("fileFormat", file_format))
        .with_child(params::string("pixelFormat", pixel_format))
        .with_child(params::string("tonemapMethod", tonemap))
        .with_child(params::float("gamma", host.get_float(settings, "fLDRFilmGamma")))
        .with_child(params::float("exposure", host.get_float(settings, "fLDRFilmExposure")))
        .with_child(params::float("key", host.get_float(settings, "fLDRFilmKey")))
        .with_child(params::float("burn", host.get_float(settings, "fLDRFilmBurn")))
        .with_child(params::boolean("banner", host.get_bool(settings, "fLDRFilmBanner")))
        .with_child(params::boolean(
            "highQualityEdges",
            host.get_bool(settings, "fLDRFilmHighQualityEdges"),
        ))
}

fn math_film(ctx: &mut ExportContext<'_>, settings: &str) -> Element {
    let host = ctx.host();
    let file_format = resolve_param(ctx, &presets::MATH_FILE_FORMAT, settings, "fMathFilmFileFormat");
    let pixel_format = resolve_param(ctx, &presets::MATH_PIXEL_FORMAT, settings, "fMathFilmPixelFormat");

    SceneKind::Film
        .typed("mfilm")
        .with_child(params::string("fileFormat", file_format))
        .with_child(params::string("pixelFormat", pixel_format))
        .with_child(params::integer("digits", host.get_int(settings, "fMathFilmDigits")))
        .with_child(params::string("variable", host.get_string(settings, "fMathFilmVariable")))
        .with_child(params::boolean(
            "highQualityEdges",
            host.get_bool(settings, "fMathFilmHighQualityEdges"),
        ))
}

/// Crop window of the render region, in film pixel coordinates
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Crop {
    /// First column
    pub offset_x: i64,
    /// First row, counted from the top
    pub offset_y: i64,
    /// Width in pixels
    pub width: i64,
    /// Height in pixels
    pub height: i64,
}

impl Crop {
    /// Convert an inclusive bottom-up region to a top-down crop
    pub fn from_region(left: i64, right: i64, top: i64, bottom: i64, image_height: i64) -> Self {
        Self {
            offset_x: left,
            offset_y: image_height - top - 1,
            width: right - left + 1,
            height: top - bottom + 1,
        }
    }
}

fn render_region(ctx: &ExportContext<'_>, image_height: i64) -> Option<Crop> {
    let host = ctx.host();
    let globals = ctx.config().render_globals_node.as_str();
    if !host.get_bool(globals, "useRenderRegion") {
        return None;
    }

    Some(Crop::from_region(
        host.get_int(globals, "left"),
        host.get_int(globals, "rght"),
        host.get_int(globals, "top"),
        host.get_int(globals, "bot"),
        image_height,
    ))
}

fn add_multichannel(ctx: &ExportContext<'_>, settings: &str, film: &mut Element) {
    let mut pixel_formats = vec!["rgba"];
    let mut channel_names = vec!["rgba"];
    for channel in enabled_channels(ctx, settings) {
        pixel_formats.push(channel.pixel_format);
        channel_names.push(channel.film_name);
    }

    film.retain_children(|child| child.get_attribute("name") != Some("pixelFormat"));
    film.add_child(params::string("pixelFormat", pixel_formats.join(", ")));
    film.add_child(params::string("channelNames", channel_names.join(", ")));
}

/// `film` element with resolution, crop, channels and reconstruction filter
pub fn write_film(ctx: &mut ExportContext<'_>, settings: &str) -> Element {
    let label = ctx.host().get_string(settings, "film");
    let ty = presets::FILM.resolve(&label, &mut ctx.diagnostics);

    let mut film = match ty {
        "ldrfilm" => ldr_film(ctx, settings),
        "tiledhdrfilm" => tiled_hdr_film(ctx, settings),
        "mfilm" => math_film(ctx, settings),
        _ => hdr_film(ctx, settings),
    };

    let host = ctx.host();
    let resolution = ctx.config().resolution_node.as_str();
    let height = host.get_int(resolution, "height");
    film.add_child(params::integer("height", height));
    film.add_child(params::integer("width", host.get_int(resolution, "width")));

    if let Some(crop) = render_region(ctx, height) {
        film.add_child(params::integer("cropOffsetX", crop.offset_x));
        film.add_child(params::integer("cropOffsetY", crop.offset_y));
        film.add_child(params::integer("cropWidth", crop.width));
        film.add_child(params::integer("cropHeight", crop.height));
    }

    if host.get_bool(settings, "multichannel") && matches!(ty, "hdrfilm" | "tiledhdrfilm") {
        add_multichannel(ctx, settings, &mut film);
    }

    film.with_child(write_rfilter(ctx, settings))
}

/// `rfilter` element, box when the label is unknown
pub fn write_rfilter(ctx: &mut ExportContext<'_>, settings: &str) -> Element {
    let label = ui_label(ctx, settings, "reconstructionFilter");
    let ty = presets::RECONSTRUCTION_FILTER.resolve(&label, &mut ctx.diagnostics);
    SceneKind::Rfilter.typed(ty)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ExportConfig;
    use crate::host::{AttrValue, NodeRecord, SceneSnapshot};

    const SETTINGS: &str = "cyclesRenderSettings";

    fn scene() -> SceneSnapshot {
        SceneSnapshot::new(12.0)
            .with_node(
                NodeRecord::new("|persp|perspShape", "camera")
                    .with_attr("renderable", AttrValue::Bool(false)),
            )
            .with_node(
                NodeRecord::new("|shot|shotShape", "camera")
                    .with_attr("renderable", AttrValue::Bool(true))
                    .with_attr("horizontalFieldOfView", AttrValue::Float(54.43))
                    .with_attr("nearClipPlane", AttrValue::Float(0.1))
                    .with_attr("eyePoint", AttrValue::Float3([0.0, 1.0, 10.0]))
                    .with_attr("centerOfInterestPoint", AttrValue::Float3([0.0, 1.0, 0.0]))
                    .with_attr("worldUp", AttrValue::Float3([0.0, 1.0, 0.0])),
            )
            .with_node(
                NodeRecord::new(SETTINGS, "CyclesRenderSettings")
                    .with_attr("sampler", AttrValue::String("Sobol_QMC_Sampler".into()))
                    .with_attr("sampleCount", AttrValue::Int(64))
                    .with_attr("samplerScramble", AttrValue::Int(-1))
                    .with_attr("film", AttrValue::String("HDR Film".into()))
                    .with_attr("fHDRFilmFileFormat", AttrValue::String("OpenEXR (.exr)".into()))
                    .with_attr("fHDRFilmPixelFormat", AttrValue::String("RGBA".into()))
                    .with_attr("fHDRFilmComponentFormat", AttrValue::String("Float 32".into()))
                    .with_attr("reconstructionFilter", AttrValue::String("Gaussian_filter".into())),
            )
            .with_node(
                NodeRecord::new("defaultResolution", "resolution")
                    .with_attr("width", AttrValue::Int(640))
                    .with_attr("height", AttrValue::Int(480)),
            )
    }

    fn value<'e>(element: &'e Element, name: &str) -> Option<&'e str> {
        element.named_child(name).and_then(|c| c.get_attribute("value"))
    }

    #[test]
    fn test_renderable_camera_preferred() {
        let host = scene();
        let config = ExportConfig::default();
        let mut ctx = ExportContext::new(&host, &config);

        assert_eq!(renderable_camera(&mut ctx).as_deref(), Some("|shot|shotShape"));
        assert!(ctx.diagnostics().is_empty());
    }

    #[test]
    fn test_first_camera_fallback() {
        let mut host = scene();
        if let Some(shot) = host.node_mut("|shot|shotShape") {
            shot.set("renderable", AttrValue::Bool(false));
        }
        let config = ExportConfig::default();
        let mut ctx = ExportContext::new(&host, &config);

        assert_eq!(renderable_camera(&mut ctx).as_deref(), Some("|persp|perspShape"));
        assert!(ctx.diagnostics().has(DiagnosticKind::MissingCamera));
    }

    #[test]
    fn test_perspective_sensor_layout() {
        let host = scene();
        let config = ExportConfig::default();
        let mut ctx = ExportContext::new(&host, &config);

        let sensor = write_sensor(&mut ctx, "|shot|shotShape", SETTINGS);
        assert_eq!(sensor.get_attribute("type"), Some("perspective"));
        let kinds: Vec<_> = sensor.children().iter().map(Element::kind).collect();
        assert_eq!(kinds, ["float", "string", "float", "transform", "sampler", "film"]);

        let lookat = &sensor.children()[3].children()[0];
        assert_eq!(lookat.kind(), "lookat");
        assert_eq!(lookat.get_attribute("origin"), Some("0.0 1.0 10.0"));
        assert_eq!(lookat.get_attribute("target"), Some("0.0 1.0 0.0"));
    }

    #[test]
    fn test_orthographic_scale() {
        let mut host = scene();
        if let Some(shot) = host.node_mut("|shot|shotShape") {
            shot.set("orthographic", AttrValue::Bool(true));
            shot.set("orthographicWidth", AttrValue::Float(30.0));
        }
        let config = ExportConfig::default();
        let mut ctx = ExportContext::new(&host, &config);

        let sensor = write_sensor(&mut ctx, "|shot|shotShape", SETTINGS);
        assert_eq!(sensor.get_attribute("type"), Some("orthographic"));
        assert!(sensor.named_child("fov").is_none());
        let to_world = sensor.children().iter().find(|c| c.kind() == "transform").unwrap();
        assert_eq!(to_world.children()[0].kind(), "scale");
        assert_eq!(to_world.children()[0].get_attribute("x"), Some("15.0"));
    }

    #[test]
    fn test_unknown_override_keeps_camera_type() {
        let mut host = scene();
        if let Some(settings) = host.node_mut(SETTINGS) {
            settings.set("sensorOverride", AttrValue::String("Irradiance Meter".into()));
        }
        let config = ExportConfig::default();
        let mut ctx = ExportContext::new(&host, &config);

        assert_eq!(sensor_type(&mut ctx, "|shot|shotShape", SETTINGS), "perspective");
        assert!(ctx.diagnostics().has(DiagnosticKind::UnknownPreset));
    }

    #[test]
    fn test_sampler_scramble_uses_frame() {
        let host = scene();
        let config = ExportConfig::default();
        let mut ctx = ExportContext::new(&host, &config);

        let sampler = write_sampler(&mut ctx, SETTINGS);
        assert_eq!(sampler.get_attribute("type"), Some("sobol"));
        assert_eq!(value(&sampler, "sampleCount"), Some("64"));
        assert_eq!(value(&sampler, "scramble"), Some("12"));
    }

    #[test]
    fn test_hdr_film() {
        let host = scene();
        let config = ExportConfig::default();
        let mut ctx = ExportContext::new(&host, &config);

        let film = write_film(&mut ctx, SETTINGS);
        assert_eq!(film.get_attribute("type"), Some("hdrfilm"));
        assert_eq!(value(&film, "pixelFormat"), Some("rgba"));
        assert_eq!(value(&film, "componentFormat"), Some("float32"));
        assert_eq!(value(&film, "width"), Some("640"));
        assert_eq!(value(&film, "height"), Some("480"));
        assert!(film.named_child("cropWidth").is_none());

        let rfilter = film.children().last().unwrap();
        assert_eq!(rfilter.kind(), "rfilter");
        assert_eq!(rfilter.get_attribute("type"), Some("gaussian"));
        assert!(ctx.diagnostics().is_empty());
    }

    #[test]
    fn test_render_region_crop() {
        assert_eq!(
            Crop::from_region(10, 109, 399, 200, 480),
            Crop { offset_x: 10, offset_y: 80, width: 100, height: 200 }
        );

        let host = scene().with_node(
            NodeRecord::new("defaultRenderGlobals", "renderGlobals")
                .with_attr("useRenderRegion", AttrValue::Bool(true))
                .with_attr("left", AttrValue::Int(10))
                .with_attr("rght", AttrValue::Int(109))
                .with_attr("top", AttrValue::Int(399))
                .with_attr("bot", AttrValue::Int(200)),
        );
        let config = ExportConfig::default();
        let mut ctx = ExportContext::new(&host, &config);

        let film = write_film(&mut ctx, SETTINGS);
        assert_eq!(value(&film, "cropOffsetY"), Some("80"));
        assert_eq!(value(&film, "cropHeight"), Some("200"));
    }

    #[test]
    fn test_multichannel_film_channels() {
        let mut host = scene();
        if let Some(settings) = host.node_mut(SETTINGS) {
            settings.set("multichannel", AttrValue::Bool(true));
            settings.set("multichannelDistance", AttrValue::Bool(true));
            settings.set("multichannelShadingNormal", AttrValue::Bool(true));
        }
        let config = ExportConfig::default();
        let mut ctx = ExportContext::new(&host, &config);

        let film = write_film(&mut ctx, SETTINGS);
        let formats: Vec<_> = film
            .children()
            .iter()
            .filter(|c| c.get_attribute("name") == Some("pixelFormat"))
            .collect();
        assert_eq!(formats.len(), 1);
        assert_eq!(formats[0].get_attribute("value"), Some("rgba, luminance, rgb"));
        assert_eq!(value(&film, "channelNames"), Some("rgba, distance, shadingNormal"));
    }

    #[test]
    fn test_unknown_film_defaults_to_hdr() {
        let mut host = scene();
        if let Some(settings) = host.node_mut(SETTINGS) {
            settings.set("film", AttrValue::String("Polaroid".into()));
        }
        let config = ExportConfig::default();
        let mut ctx = ExportContext::new(&host, &config);

        let film = write_film(&mut ctx, SETTINGS);
        assert_eq!(film.get_attribute("type"), Some("hdrfilm"));
        assert!(ctx.diagnostics().has(DiagnosticKind::UnknownPreset));
    }
}

//! Standard and environment lights
//!
//! Standard lights read their placement from the shape's `worldMatrix`.
//! At most one environment light is exported: an environment map wins over
//! a sun/sky, and within each category the first visible node wins.

use std::path::Path;

use crate::diagnostics::DiagnosticKind;
use crate::element::{format_float, format_floats, kinds, params, Axis, ColorSpace, Element, SceneKind};
use crate::foundation::math::{host_translation, host_z_axis, mat4_from_host, PlanarFrame};
use crate::host::{sanitize_name, AttrValue, NodeCategory};
use crate::materials::attributes::texture_file;
use crate::scene::visibility::is_visible;
use crate::scene::ExportContext;

/// Host node type of procedural sun/sky lights
pub const SUNSKY_NODE: &str = "CyclesSunsky";

/// Host node type of image-based environment lights
pub const ENVIRONMENT_NODE: &str = "CyclesEnvironmentLight";

fn scaled_color(ctx: &ExportContext<'_>, light: &str) -> [f64; 3] {
    let host = ctx.host();
    let intensity = host.get_float(light, "intensity");
    host.get_color(light, "color").map(|c| c * intensity)
}

/// Infinitely distant light along the shape's -Z axis
pub fn directional(ctx: &ExportContext<'_>, light: &str) -> Element {
    let direction = -host_z_axis(&ctx.host().get_matrix(light, "worldMatrix"));
    SceneKind::Emitter
        .typed("directional")
        .with_child(params::color("irradiance", &scaled_color(ctx, light), ColorSpace::Rgb))
        .with_child(params::vector("direction", direction.x, direction.y, direction.z))
}

/// Point light at the shape's world position
pub fn point(ctx: &ExportContext<'_>, light: &str) -> Element {
    let position = host_translation(&ctx.host().get_matrix(light, "worldMatrix"));
    SceneKind::Emitter
        .typed("point")
        .with_child(params::color("intensity", &scaled_color(ctx, light), ColorSpace::Rgb))
        .with_child(params::point("position", position.x, position.y, position.z))
}

/// Spot light; cone angles are in degrees
pub fn spot(ctx: &ExportContext<'_>, light: &str) -> Element {
    let host = ctx.host();
    let cone = host.get_float(light, "coneAngle") / 2.0;
    let penumbra = host.get_float(light, "penumbraAngle");
    let position = host_translation(&host.get_matrix(light, "worldMatrix"));

    let rotation = host
        .parents(light)
        .first()
        .and_then(|parent| host.attribute(parent, "rotate"))
        .and_then(|value| value.as_color())
        .unwrap_or([0.0; 3]);

    let mut to_world = kinds::named_transform("toWorld").with_child(params::rotate(Axis::Y, 180.0));
    for (axis, angle) in [Axis::X, Axis::Y, Axis::Z].into_iter().zip(rotation) {
        if angle != 0.0 {
            to_world.add_child(params::rotate(axis, angle));
        }
    }
    to_world.add_child(params::translate(position.x, position.y, position.z));

    SceneKind::Emitter
        .typed("spot")
        .with_child(params::color("intensity", &scaled_color(ctx, light), ColorSpace::Rgb))
        .with_child(params::float("cutoffAngle", cone + penumbra))
        .with_child(params::float("beamWidth", cone))
        .with_child(to_world)
}

/// Area light as an emission shader plus a `state` holding the quad
pub fn area(ctx: &ExportContext<'_>, light: &str) -> [Element; 2] {
    let host = ctx.host();
    let shader_name = format!("{}_shader", sanitize_name(light));
    let frame = PlanarFrame::from_transform(&mat4_from_host(&host.get_matrix(light, "worldMatrix")));

    let shader = Element::of("shader")
        .with_attribute("name", shader_name.as_str())
        .with_child(
            Element::of("emission")
                .with_attribute("name", "emission")
                .with_attribute("color", format_floats(&host.get_color(light, "color")))
                .with_attribute("strength", format_float(host.get_float(light, "intensity"))),
        )
        .with_child(kinds::connect("emission emission", "output surface"));

    let quad = Element::of("light")
        .with_attribute("type", "area")
        .with_attribute("dir", format_floats(frame.direction.as_slice()))
        .with_attribute("axisu", format_floats(frame.axis_u.as_slice()))
        .with_attribute("sizeu", format_float(frame.size_u))
        .with_attribute("axisv", format_floats(frame.axis_v.as_slice()))
        .with_attribute("sizev", format_float(frame.size_v))
        .with_attribute("co", format_floats(frame.origin.coords.as_slice()))
        .with_attribute("size", "1");

    let state = Element::of("state")
        .with_attribute("shader", shader_name)
        .with_child(quad);

    [shader, state]
}

/// Procedural sun and/or sky
pub fn sunsky(ctx: &mut ExportContext<'_>, node: &str) -> Element {
    let host = ctx.host();
    let ty = match (host.get_bool(node, "useSun"), host.get_bool(node, "useSky")) {
        (true, true) => "sunsky",
        (true, false) => "sun",
        (false, true) => "sky",
        (false, false) => {
            ctx.warn(
                DiagnosticKind::MissingResource,
                format!("{node} enables neither sun nor sky, exporting sunsky"),
            );
            "sunsky"
        }
    };

    let date = match host.attribute(node, "date") {
        Some(AttrValue::Int3(date)) => date,
        _ => [0; 3],
    };
    let time = host
        .attribute(node, "time")
        .and_then(|value| value.as_color())
        .unwrap_or([0.0; 3]);

    SceneKind::Emitter
        .typed(ty)
        .with_child(params::float("turbidity", host.get_float(node, "turbidity")))
        .with_child(params::srgb("albedo", &host.get_color(node, "albedo")))
        .with_child(params::integer("year", date[0]))
        .with_child(params::integer("month", date[1]))
        .with_child(params::integer("day", date[2]))
        .with_child(params::float("hour", time[0]))
        .with_child(params::float("minute", time[1]))
        .with_child(params::float("second", time[2]))
        .with_child(params::float("latitude", host.get_float(node, "latitude")))
        .with_child(params::float("longitude", host.get_float(node, "longitude")))
        .with_child(params::float("timezone", host.get_float(node, "timezone")))
        .with_child(params::float("stretch", host.get_float(node, "stretch")))
        .with_child(params::integer("resolution", host.get_int(node, "resolution")))
        .with_child(params::float("sunScale", host.get_float(node, "sunScale")))
        .with_child(params::float("skyScale", host.get_float(node, "skyScale")))
        .with_child(params::float("sunRadiusScale", host.get_float(node, "sunRadiusScale")))
}

fn is_radiance_map(path: &str) -> bool {
    Path::new(path)
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("hdr") || ext.eq_ignore_ascii_case("exr"))
}

/// Image-based environment, or a constant one when `source` is unconnected
///
/// Returns `None` with a diagnostic when `source` is connected but no
/// usable `.hdr`/`.exr` map feeds it. Connections on other attributes
/// do not make the environment image-based.
pub fn envmap(ctx: &mut ExportContext<'_>, node: &str) -> Option<Element> {
    let host = ctx.host();
    if !host.is_connected(node, "source") {
        return Some(
            SceneKind::Emitter
                .typed("constant")
                .with_child(params::color("radiance", &host.get_color(node, "source"), ColorSpace::Rgb))
                .with_child(params::float("samplingWeight", host.get_float(node, "samplingWeight"))),
        );
    }

    let Some(filename) = texture_file(ctx, node, "source").filter(|name| !name.is_empty()) else {
        ctx.warn(
            DiagnosticKind::MissingResource,
            format!("{node} has no image file on 'source', environment omitted"),
        );
        return None;
    };

    if !is_radiance_map(&filename) {
        ctx.warn(
            DiagnosticKind::MissingResource,
            format!("{node} uses '{filename}', environment maps must be .hdr or .exr"),
        );
        return None;
    }

    let rotation = host
        .attribute(node, "rotate")
        .and_then(|value| value.as_color())
        .unwrap_or([0.0; 3]);

    Some(
        SceneKind::Emitter
            .typed("envmap")
            .with_child(params::string("filename", filename))
            .with_child(params::float("scale", host.get_float(node, "scale")))
            .with_child(params::float("gamma", host.get_float(node, "gamma")))
            .with_child(params::boolean("cache", host.get_bool(node, "cache")))
            .with_child(params::float("samplingWeight", host.get_float(node, "samplingWeight")))
            .with_child(
                kinds::named_transform("toWorld")
                    .with_child(params::rotate(Axis::X, rotation[0]))
                    .with_child(params::rotate(Axis::Y, rotation[1]))
                    .with_child(params::rotate(Axis::Z, rotation[2])),
            ),
    )
}

/// The single environment light to export
pub fn environment_light(ctx: &mut ExportContext<'_>) -> Option<Element> {
    let host = ctx.host();
    let visible = |ty: &str| -> Vec<String> {
        host.nodes_of_type(ty)
            .into_iter()
            .filter(|node| is_visible(host, node))
            .collect()
    };
    let sunskies = visible(SUNSKY_NODE);
    let environments = visible(ENVIRONMENT_NODE);

    if (!sunskies.is_empty() && !environments.is_empty()) || sunskies.len() > 1 || environments.len() > 1 {
        ctx.warn(
            DiagnosticKind::EnvironmentConflict,
            format!(
                "{} environment and {} sun/sky lights are active, only one is exported",
                environments.len(),
                sunskies.len()
            ),
        );
    }

    if let Some(environment) = environments.first() {
        envmap(ctx, environment)
    } else {
        sunskies.first().map(|node| sunsky(ctx, node))
    }
}

/// Elements for every visible light followed by the environment
pub fn write_lights(ctx: &mut ExportContext<'_>) -> Vec<Element> {
    let host = ctx.host();
    let mut elements = Vec::new();

    for light in host.nodes_in_category(NodeCategory::Light) {
        if !is_visible(host, &light) {
            log::debug!("Skipping hidden light {light}");
            continue;
        }
        match host.node_type(&light).as_deref() {
            Some("directionalLight") => elements.push(directional(ctx, &light)),
            Some("pointLight") => elements.push(point(ctx, &light)),
            Some("spotLight") => elements.push(spot(ctx, &light)),
            Some("areaLight") => elements.extend(area(ctx, &light)),
            other => log::debug!("Skipping light {light} of type {other:?}"),
        }
    }

    elements.extend(environment_light(ctx));
    elements
}

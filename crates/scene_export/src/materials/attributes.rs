//! Attribute resolution shared by the translators
//!
//! Textured attributes, named-or-numeric IOR, phase functions and nested
//! BSDF references all resolve the same way regardless of which material
//! asks for them.

use crate::diagnostics::DiagnosticKind;
use crate::element::{kinds, params, ColorSpace, Element, SceneKind};
use crate::host::AttrValue;
use crate::presets;
use crate::scene::ExportContext;

use super::MaterialKind;

/// Host node type of image file textures
pub const FILE_NODE: &str = "file";

/// Image file feeding `node.attr`, with frame substitution applied
pub fn texture_file(ctx: &mut ExportContext<'_>, node: &str, attr: &str) -> Option<String> {
    let host = ctx.host();
    let source = host.source(node, attr)?;
    if host.node_type(&source.node).as_deref() != Some(FILE_NODE) {
        return None;
    }
    Some(file_texture_name(ctx, &source.node))
}

/// `fileTextureName` of a file node, with its frame substituted when the
/// node plays back an image sequence
pub fn file_texture_name(ctx: &mut ExportContext<'_>, file_node: &str) -> String {
    let host = ctx.host();
    let name = host.get_string(file_node, "fileTextureName");
    if !host.get_bool(file_node, "useFrameExtension") {
        return name;
    }

    let frame = if host.has_attribute(file_node, "frameExtension") {
        host.get_int(file_node, "frameExtension")
    } else {
        ctx.frame_number()
    };
    let padding = ctx.config().texture_frame_padding;

    match substitute_frame(&name, frame, padding) {
        Some(substituted) => substituted,
        None => {
            ctx.warn(
                DiagnosticKind::MalformedFilename,
                format!("'{name}' on {file_node} has no frame token; using it unchanged"),
            );
            name
        }
    }
}

/// Replace the second-to-last '.' token of `name` with the padded frame
pub fn substitute_frame(name: &str, frame: i64, padding: usize) -> Option<String> {
    let mut tokens: Vec<&str> = name.split('.').collect();
    if tokens.len() < 2 {
        return None;
    }
    let padded = format!("{frame:0padding$}");
    let index = tokens.len() - 2;
    tokens[index] = &padded;
    Some(tokens.join("."))
}

/// Bitmap texture, optionally wrapped in a scaling texture
pub fn texture(name: &str, path: &str, scale: Option<f64>) -> Element {
    let bitmap = Element::of("texture")
        .with_attribute("type", "bitmap")
        .with_child(params::string("filename", path));

    let texture = match scale {
        Some(scale) if scale != 0.0 => Element::of("texture")
            .with_attribute("type", "scale")
            .with_child(params::float("scale", scale))
            .with_child(bitmap),
        _ => bitmap,
    };
    texture.with_attribute("name", name)
}

/// Color attribute as a texture when a file feeds it, otherwise an sRGB constant
pub fn textured_color(ctx: &mut ExportContext<'_>, node: &str, attr: &str) -> Element {
    textured_color_as(ctx, node, attr, attr, None)
}

/// Color attribute written under another parameter name, with an optional texture scale
pub fn textured_color_as(
    ctx: &mut ExportContext<'_>,
    node: &str,
    attr: &str,
    param: &str,
    scale: Option<f64>,
) -> Element {
    match texture_file(ctx, node, attr) {
        Some(path) => texture(param, &path, scale),
        None => params::color(param, &ctx.host().get_color(node, attr), ColorSpace::Srgb),
    }
}

/// Float attribute as a texture when a file feeds it, otherwise a constant
pub fn textured_float(ctx: &mut ExportContext<'_>, node: &str, attr: &str) -> Element {
    match texture_file(ctx, node, attr) {
        Some(path) => texture(attr, &path, None),
        None => params::float(attr, ctx.host().get_float(node, attr)),
    }
}

/// Volume attribute as a grid volume when a file feeds it, otherwise a
/// constant volume holding a spectrum
pub fn textured_volume(ctx: &mut ExportContext<'_>, node: &str, attr: &str) -> Element {
    match texture_file(ctx, node, attr) {
        Some(path) => kinds::volume(attr, Some(&path)),
        None => {
            let value = volume_value(ctx, node, attr);
            kinds::const_volume(attr).with_child(params::spectrum("value", &value))
        }
    }
}

fn volume_value(ctx: &ExportContext<'_>, node: &str, attr: &str) -> Vec<f64> {
    match ctx.host().attribute(node, attr) {
        Some(AttrValue::Float3(c)) => c.to_vec(),
        Some(value) => vec![value.as_float().unwrap_or(0.0)],
        None => vec![0.0],
    }
}

/// `intIOR` and `extIOR`, each a named preset or a numeric override
pub fn ior_params(ctx: &ExportContext<'_>, node: &str) -> [Element; 2] {
    [
        ior_param(ctx, node, "interiorMaterial", "intior", "intIOR"),
        ior_param(ctx, node, "exteriorMaterial", "extior", "extIOR"),
    ]
}

fn ior_param(
    ctx: &ExportContext<'_>,
    node: &str,
    label_attr: &str,
    value_attr: &str,
    param: &str,
) -> Element {
    let host = ctx.host();
    let label = host.get_string(node, label_attr);
    let label = label.split('-').next().unwrap_or_default().trim();

    match presets::IOR_MATERIAL.lookup(label) {
        Some(preset) => params::string(param, preset),
        None => {
            log::debug!("{node}.{label_attr} '{label}' is not a preset, using {value_attr}");
            params::float(param, host.get_float(node, value_attr))
        }
    }
}

/// Microfacet distribution id, defaulting to beckmann
pub fn distribution(ctx: &mut ExportContext<'_>, node: &str) -> &'static str {
    let label = ctx.host().get_string(node, "distribution");
    presets::DISTRIBUTION.resolve(&label, &mut ctx.diagnostics)
}

/// Phase function element, isotropic for unknown labels
pub fn phase_function(ctx: &mut ExportContext<'_>, node: &str) -> Element {
    let label = ctx.host().get_string(node, "phaseFunction");
    let id = presets::PHASE_FUNCTION.resolve(&label, &mut ctx.diagnostics);

    let phase = SceneKind::Phase.typed(id);
    match id {
        "hg" => phase.with_child(params::float("g", ctx.host().get_float(node, "phaseFunctionHGG"))),
        "microflake" => phase.with_child(params::float(
            "stddev",
            ctx.host().get_float(node, "phaseFunctionMFSD"),
        )),
        _ => phase,
    }
}

/// Translate the shader connected into `node.attr` as an anonymous child
///
/// Without a translatable connection, `use_default` synthesizes a diffuse
/// BSDF from the attribute's own color.
pub fn nested_bsdf(
    ctx: &mut ExportContext<'_>,
    node: &str,
    attr: &str,
    use_default: bool,
) -> Option<Element> {
    let nested = ctx.host().source(node, attr).and_then(|source| {
        let node_type = ctx.host().node_type(&source.node)?;
        MaterialKind::from_type_tag(&node_type)?;
        super::translate(ctx, &source.node, &source.node)
    });

    match nested {
        Some(mut element) => {
            element.remove_attribute("id");
            Some(element)
        }
        None if use_default => Some(
            SceneKind::Bsdf
                .typed("diffuse")
                .with_child(params::srgb("reflectance", &ctx.host().get_color(node, attr))),
        ),
        None => None,
    }
}

//! Participating media, subsurface and emissive translators
//!
//! Media that accept explicit coefficients pick exactly one source, tested
//! in order: scattering/absorption, then extinction/albedo, then a named
//! measured material.

use crate::element::{params, ColorSpace, Element, SceneKind};
use crate::presets;
use crate::scene::ExportContext;

use super::attributes::{
    ior_params, phase_function, texture_file, textured_color, textured_volume,
};

/// Which coefficient set a medium-like node uses
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CoefficientSource {
    /// `sigmaS` and `sigmaA`
    ScatteringAbsorption,
    /// `sigmaT` and `albedo`
    ExtinctionAlbedo,
    /// Named measured material
    Preset,
}

impl CoefficientSource {
    /// Resolve from the two host toggles, first set flag wins
    pub fn select(use_sigma_sa: bool, use_sigma_t_albedo: bool) -> Self {
        if use_sigma_sa {
            Self::ScatteringAbsorption
        } else if use_sigma_t_albedo {
            Self::ExtinctionAlbedo
        } else {
            Self::Preset
        }
    }
}

fn coefficient_source(ctx: &ExportContext<'_>, node: &str, sa_flag: &str) -> CoefficientSource {
    let host = ctx.host();
    CoefficientSource::select(host.get_bool(node, sa_flag), host.get_bool(node, "useSigmaTAlbedo"))
}

fn medium_material(ctx: &mut ExportContext<'_>, node: &str) -> Element {
    let label = ctx.host().get_string(node, "material");
    let material = presets::MEDIUM_MATERIAL.resolve(&label, &mut ctx.diagnostics);
    params::string("material", material)
}

/// Constant-density medium
pub fn homogeneous(ctx: &mut ExportContext<'_>, node: &str, name: &str) -> Element {
    let host = ctx.host();
    let mut element = SceneKind::Medium.typed("homogeneous").with_id(name);

    match coefficient_source(ctx, node, "useSigmaAS") {
        CoefficientSource::ScatteringAbsorption => {
            element.add_child(params::rgb("sigmaA", &host.get_color(node, "sigmaA")));
            element.add_child(params::rgb("sigmaS", &host.get_color(node, "sigmaS")));
        }
        CoefficientSource::ExtinctionAlbedo => {
            element.add_child(params::rgb("sigmaT", &host.get_color(node, "sigmaT")));
            element.add_child(params::rgb("albedo", &host.get_color(node, "albedo")));
        }
        CoefficientSource::Preset => element.add_child(medium_material(ctx, node)),
    }

    element.add_child(params::float("scale", host.get_float(node, "scale")));
    element.with_child(phase_function(ctx, node))
}

/// Grid-based medium
pub fn heterogeneous(ctx: &mut ExportContext<'_>, node: &str, name: &str) -> Element {
    let label = ctx.host().get_string(node, "samplingMethod");
    let method = presets::SAMPLING_METHOD.resolve(&label, &mut ctx.diagnostics);

    let mut element = SceneKind::Medium
        .typed("heterogeneous")
        .with_id(name)
        .with_child(params::string("method", method))
        .with_child(textured_volume(ctx, node, "density"))
        .with_child(textured_volume(ctx, node, "albedo"));

    if let Some(path) = texture_file(ctx, node, "orientation") {
        element.add_child(crate::element::kinds::volume("orientation", Some(&path)));
    }

    element.add_child(params::float("scale", ctx.host().get_float(node, "scale")));
    element.with_child(phase_function(ctx, node))
}

/// Hanrahan-Krueger layered BSDF
pub fn hk(ctx: &mut ExportContext<'_>, node: &str, name: &str) -> Element {
    let mut element = SceneKind::Bsdf.typed("hk").with_id(name);

    match coefficient_source(ctx, node, "useSigmaSA") {
        CoefficientSource::ScatteringAbsorption => {
            element.add_child(textured_color(ctx, node, "sigmaS"));
            element.add_child(textured_color(ctx, node, "sigmaA"));
        }
        CoefficientSource::ExtinctionAlbedo => {
            element.add_child(textured_color(ctx, node, "sigmaT"));
            element.add_child(textured_color(ctx, node, "albedo"));
        }
        CoefficientSource::Preset => element.add_child(medium_material(ctx, node)),
    }

    element.add_child(params::float("thickness", ctx.host().get_float(node, "thickness")));
    element.with_child(phase_function(ctx, node))
}

/// Dipole subsurface scattering
pub fn dipole(ctx: &mut ExportContext<'_>, node: &str, name: &str) -> Element {
    let host = ctx.host();
    let mut element = SceneKind::Subsurface.typed("dipole").with_id(name);

    match coefficient_source(ctx, node, "useSigmaSA") {
        CoefficientSource::ScatteringAbsorption => {
            element.add_child(params::srgb("sigmaS", &host.get_color(node, "sigmaS")));
            element.add_child(params::srgb("sigmaA", &host.get_color(node, "sigmaA")));
        }
        CoefficientSource::ExtinctionAlbedo => {
            element.add_child(params::srgb("sigmaT", &host.get_color(node, "sigmaT")));
            element.add_child(params::srgb("albedo", &host.get_color(node, "albedo")));
        }
        CoefficientSource::Preset => element.add_child(medium_material(ctx, node)),
    }

    element
        .with_child(params::float("scale", host.get_float(node, "scale")))
        .with_child(params::integer("irrSamples", host.get_int(node, "irrSamples")))
        .with_children(ior_params(ctx, node))
}

/// Area emitter attached to a shape
pub fn object_area_light(ctx: &mut ExportContext<'_>, node: &str, name: &str) -> Element {
    let host = ctx.host();
    SceneKind::Emitter
        .typed("area")
        .with_id(name)
        .with_child(params::color("radiance", &host.get_color(node, "radiance"), ColorSpace::Rgb))
        .with_child(params::float("samplingWeight", host.get_float(node, "samplingWeight")))
}

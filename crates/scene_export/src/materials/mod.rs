//! Material and medium translation
//!
//! Each supported host shader type maps to one translator through the
//! closed [`MaterialKind`] enumeration. Translators consume a host node and
//! produce a typed element subtree (`bsdf`, `medium`, `subsurface` or
//! `emitter`) whose `id` is the material name.
//!
//! # Dispatch
//!
//! Unknown type tags are not errors: [`translate`] records an
//! `UnsupportedShader` diagnostic and returns `None` so the rest of the
//! export carries on.
//!
//! # Two-sided wrapping
//!
//! A node exposing a true `twosided` toggle is wrapped in a `twosided`
//! BSDF that takes over the id.

pub mod attributes;
pub mod media;
pub mod surfaces;

use crate::diagnostics::DiagnosticKind;
use crate::element::{Element, SceneKind};
use crate::scene::ExportContext;

/// Translator signature: `(context, node, material name) -> element`
pub type Translator = fn(&mut ExportContext<'_>, &str, &str) -> Element;

/// Host shader types with a translator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MaterialKind {
    /// Smooth dielectric coating
    SmoothCoating,
    /// Smooth conductor
    Conductor,
    /// Smooth dielectric
    Dielectric,
    /// Diffuse transmitter
    DiffuseTransmitter,
    /// Lambertian diffuse
    Diffuse,
    /// Smooth plastic
    Plastic,
    /// Rough dielectric coating
    RoughCoating,
    /// Rough conductor
    RoughConductor,
    /// Rough dielectric
    RoughDielectric,
    /// Rough diffuse
    RoughDiffuse,
    /// Rough plastic
    RoughPlastic,
    /// Thin dielectric
    ThinDielectric,
    /// Ward
    Ward,
    /// Irawan cloth
    Irawan,
    /// Area emitter on a shape
    ObjectAreaLight,
    /// Explicit two-sided
    TwoSided,
    /// Blend of two BSDFs
    Blend,
    /// Opacity mask
    Mask,
    /// Bump map
    Bump,
    /// Hanrahan-Krueger
    Hk,
    /// Homogeneous participating medium
    HomogeneousMedium,
    /// Heterogeneous participating medium
    HeterogeneousMedium,
    /// Dipole subsurface scattering
    DipoleSubsurface,
}

impl MaterialKind {
    /// Every kind in dispatch table order
    pub const ALL: [MaterialKind; 23] = [
        Self::SmoothCoating,
        Self::Conductor,
        Self::Dielectric,
        Self::DiffuseTransmitter,
        Self::Diffuse,
        Self::Plastic,
        Self::RoughCoating,
        Self::RoughConductor,
        Self::RoughDielectric,
        Self::RoughDiffuse,
        Self::RoughPlastic,
        Self::ThinDielectric,
        Self::Ward,
        Self::Irawan,
        Self::ObjectAreaLight,
        Self::TwoSided,
        Self::Blend,
        Self::Mask,
        Self::Bump,
        Self::Hk,
        Self::HomogeneousMedium,
        Self::HeterogeneousMedium,
        Self::DipoleSubsurface,
    ];

    /// Host node type tag
    pub const fn type_tag(self) -> &'static str {
        match self {
            Self::SmoothCoating => "CyclesSmoothCoatingShader",
            Self::Conductor => "CyclesConductorShader",
            Self::Dielectric => "CyclesDielectricShader",
            Self::DiffuseTransmitter => "CyclesDiffuseTransmitterShader",
            Self::Diffuse => "CyclesDiffuseShader",
            Self::Plastic => "CyclesPlasticShader",
            Self::RoughCoating => "CyclesRoughCoatingShader",
            Self::RoughConductor => "CyclesRoughConductorShader",
            Self::RoughDielectric => "CyclesRoughDielectricShader",
            Self::RoughDiffuse => "CyclesRoughDiffuseShader",
            Self::RoughPlastic => "CyclesRoughPlasticShader",
            Self::ThinDielectric => "CyclesThinDielectricShader",
            Self::Ward => "CyclesWardShader",
            Self::Irawan => "CyclesIrawanShader",
            Self::ObjectAreaLight => "CyclesObjectAreaLightShader",
            Self::TwoSided => "CyclesTwoSidedShader",
            Self::Blend => "CyclesBlendShader",
            Self::Mask => "CyclesMaskShader",
            Self::Bump => "CyclesBumpShader",
            Self::Hk => "CyclesHKShader",
            Self::HomogeneousMedium => "CyclesHomogeneousParticipatingMedium",
            Self::HeterogeneousMedium => "CyclesHeterogeneousParticipatingMedium",
            Self::DipoleSubsurface => "CyclesSSSDipoleShader",
        }
    }

    /// Kind for a host type tag
    pub fn from_type_tag(tag: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.type_tag() == tag)
    }

    /// Translator function
    pub fn translator(self) -> Translator {
        match self {
            Self::SmoothCoating => surfaces::smooth_coating,
            Self::Conductor => surfaces::conductor,
            Self::Dielectric => surfaces::dielectric,
            Self::DiffuseTransmitter => surfaces::diffuse_transmitter,
            Self::Diffuse => surfaces::diffuse,
            Self::Plastic => surfaces::plastic,
            Self::RoughCoating => surfaces::rough_coating,
            Self::RoughConductor => surfaces::rough_conductor,
            Self::RoughDielectric => surfaces::rough_dielectric,
            Self::RoughDiffuse => surfaces::rough_diffuse,
            Self::RoughPlastic => surfaces::rough_plastic,
            Self::ThinDielectric => surfaces::thin_dielectric,
            Self::Ward => surfaces::ward,
            Self::Irawan => surfaces::irawan,
            Self::ObjectAreaLight => media::object_area_light,
            Self::TwoSided => surfaces::two_sided,
            Self::Blend => surfaces::blend,
            Self::Mask => surfaces::mask,
            Self::Bump => surfaces::bump,
            Self::Hk => media::hk,
            Self::HomogeneousMedium => media::homogeneous,
            Self::HeterogeneousMedium => media::heterogeneous,
            Self::DipoleSubsurface => media::dipole,
        }
    }
}

/// Translate `node` under `name`, applying two-sided wrapping
///
/// Returns `None` for unsupported type tags and for nodes already being
/// translated further up a nested-BSDF chain.
pub fn translate(ctx: &mut ExportContext<'_>, node: &str, name: &str) -> Option<Element> {
    let node_type = ctx.host().node_type(node).unwrap_or_default();
    let Some(kind) = MaterialKind::from_type_tag(&node_type) else {
        ctx.warn(
            DiagnosticKind::UnsupportedShader,
            format!("Skipping unsupported material {node} of type '{node_type}'"),
        );
        return None;
    };

    if !ctx.enter(node) {
        ctx.warn(
            DiagnosticKind::ShaderCycle,
            format!("{node} is nested inside itself; treating the connection as absent"),
        );
        return None;
    }

    log::debug!("Translating {node} as {kind:?}");
    let element = (kind.translator())(ctx, node, name);
    ctx.leave(node);

    let host = ctx.host();
    if host.has_attribute(node, "twosided") && host.get_bool(node, "twosided") {
        Some(wrap_two_sided(element, name))
    } else {
        Some(element)
    }
}

/// Wrap `element` in a two-sided BSDF carrying `name` as its id
pub fn wrap_two_sided(mut element: Element, name: &str) -> Element {
    element.remove_attribute("id");
    SceneKind::Bsdf
        .typed("twosided")
        .with_id(name)
        .with_child(element)
}

//! Integrator, meta integrator and multichannel output
//!
//! Integrator parameters live on the render-settings node under a prefix
//! per integrator (`iPathTracerMaxDepth`, `iPhotonMapGlobalPhotons`, ...).
//! Each integrator is described by a static parameter list so the element
//! order is fixed by data rather than by code paths.

use crate::diagnostics::DiagnosticKind;
use crate::element::{params, Element, SceneKind};
use crate::presets;
use crate::scene::ExportContext;

/// One integrator parameter read from the render settings
#[derive(Debug, Clone, Copy)]
enum Param {
    /// `maxDepth` from `<prefix>MaxDepth`, `-1` when `<prefix>UseInfiniteDepth`
    MaxDepth,
    /// Integer `<prefix><suffix>` written as `name`
    Int(&'static str, &'static str),
    /// Float `<prefix><suffix>` written as `name`
    Float(&'static str, &'static str),
    /// Boolean `<prefix><suffix>` written as `name`
    Bool(&'static str, &'static str),
    /// Float `<prefix><suffix>` given in percent, written as a fraction
    Percent(&'static str, &'static str),
}

struct IntegratorParams {
    id: &'static str,
    prefix: &'static str,
    params: &'static [Param],
}

const PATH_PARAMS: &[Param] = &[
    Param::MaxDepth,
    Param::Int("RRDepth", "rrDepth"),
    Param::Bool("StrictNormals", "strictNormals"),
    Param::Bool("HideEmitters", "hideEmitters"),
];

const PPM_PARAMS: &[Param] = &[
    Param::MaxDepth,
    Param::Int("PhotonCount", "photonCount"),
    Param::Float("InitialRadius", "initialRadius"),
    Param::Float("Alpha", "alpha"),
    Param::Int("Granularity", "granularity"),
    Param::Int("RRDepth", "rrDepth"),
    Param::Int("MaxPasses", "maxPasses"),
];

static INTEGRATORS: [IntegratorParams; 12] = [
    IntegratorParams {
        id: "path",
        prefix: "iPathTracer",
        params: PATH_PARAMS,
    },
    IntegratorParams {
        id: "volpath",
        prefix: "iVolumetricPathTracer",
        params: PATH_PARAMS,
    },
    IntegratorParams {
        id: "volpath_simple",
        prefix: "iSimpleVolumetricPathTracer",
        params: PATH_PARAMS,
    },
    IntegratorParams {
        id: "bdpt",
        prefix: "iBidrectionalPathTracer",
        params: &[
            Param::MaxDepth,
            Param::Int("RRDepth", "rrDepth"),
            Param::Bool("LightImage", "lightImage"),
            Param::Bool("SampleDirect", "sampleDirect"),
        ],
    },
    IntegratorParams {
        id: "photonmapper",
        prefix: "iPhotonMap",
        params: &[
            Param::Int("DirectSamples", "directSamples"),
            Param::Int("GlossySamples", "glossySamples"),
            Param::MaxDepth,
            Param::Int("GlobalPhotons", "globalPhotons"),
            Param::Int("CausticPhotons", "causticPhotons"),
            Param::Int("VolumePhotons", "volumePhotons"),
            Param::Float("GlobalLookupRadius", "globalLookupRadius"),
            Param::Float("CausticLookupRadius", "causticLookupRadius"),
            Param::Int("LookupSize", "lookupSize"),
            Param::Int("Granularity", "granularity"),
            Param::Bool("HideEmitters", "hideEmitters"),
            Param::Int("RRDepth", "rrDepth"),
        ],
    },
    IntegratorParams {
        id: "ppm",
        prefix: "iProgressivePhotonMap",
        params: PPM_PARAMS,
    },
    IntegratorParams {
        id: "sppm",
        prefix: "iStochasticProgressivePhotonMap",
        params: PPM_PARAMS,
    },
    IntegratorParams {
        id: "pssmlt",
        prefix: "iPrimarySampleSpaceMetropolisLightTransport",
        params: &[
            Param::Bool("Bidirectional", "bidirectional"),
            Param::MaxDepth,
            Param::Int("DirectSamples", "directSamples"),
            Param::Int("RRDepth", "rrDepth"),
            Param::Int("LuminanceSamples", "luminanceSamples"),
            Param::Bool("TwoStage", "twoStage"),
            Param::Float("PLarge", "pLarge"),
        ],
    },
    IntegratorParams {
        id: "mlt",
        prefix: "iPathSpaceMetropolisLightTransport",
        // Host attribute names carry the "Purturbation" spelling
        params: &[
            Param::MaxDepth,
            Param::Int("DirectSamples", "directSamples"),
            Param::Int("LuminanceSamples", "luminanceSamples"),
            Param::Bool("TwoStage", "twoStage"),
            Param::Bool("BidirectionalMutation", "bidirectionalMutation"),
            Param::Bool("LensPurturbation", "lensPerturbation"),
            Param::Bool("MultiChainPurturbation", "multiChainPerturbation"),
            Param::Bool("CausticPurturbation", "causticPerturbation"),
            Param::Bool("ManifoldPurturbation", "manifoldPerturbation"),
            Param::Float("Lambda", "lambda"),
        ],
    },
    IntegratorParams {
        id: "erpt",
        prefix: "iEnergyRedistributionPathTracing",
        params: &[
            Param::MaxDepth,
            Param::Float("NumChains", "numChains"),
            Param::Int("MaxChains", "maxChains"),
            Param::Int("DirectSamples", "directSamples"),
            Param::Int("ChainLength", "chainLength"),
            Param::Bool("LensPerturbation", "lensPerturbation"),
            Param::Bool("MultiChainPerturbation", "multiChainPerturbation"),
            Param::Bool("CausticPerturbation", "causticPerturbation"),
            Param::Bool("ManifoldPerturbation", "manifoldPerturbation"),
            Param::Float("Lambda", "lambda"),
        ],
    },
    IntegratorParams {
        id: "ptracer",
        prefix: "iAdjointParticleTracer",
        params: &[
            Param::MaxDepth,
            Param::Int("RRDepth", "rrDepth"),
            Param::Int("Granularity", "granularity"),
            Param::Bool("BruteForce", "bruteForce"),
        ],
    },
    IntegratorParams {
        id: "vpl",
        prefix: "iVirtualPointLight",
        params: &[
            Param::MaxDepth,
            Param::Int("ShadowMapResolution", "shadowMapResolution"),
            Param::Float("Clamping", "clamping"),
        ],
    },
];

static META_INTEGRATORS: [IntegratorParams; 2] = [
    IntegratorParams {
        id: "adaptive",
        prefix: "miAdaptive",
        params: &[
            Param::Percent("MaxError", "maxError"),
            Param::Percent("PValue", "pValue"),
            Param::Int("MaxSampleFactor", "maxSampleFactor"),
        ],
    },
    IntegratorParams {
        id: "irrcache",
        prefix: "miIrradianceCache",
        params: &[
            Param::Int("Resolution", "resolution"),
            Param::Float("Quality", "quality"),
            Param::Bool("Gradients", "gradients"),
            Param::Bool("ClampNeighbor", "clampNeighbor"),
            Param::Bool("ClampScreen", "clampScreen"),
            Param::Bool("Overture", "overture"),
            Param::Float("QualityAdjustment", "qualityAdjustment"),
            Param::Bool("IndirectOnly", "indirectOnly"),
            Param::Bool("Debug", "debug"),
        ],
    },
];

/// An auxiliary output channel of the multichannel integrator
#[derive(Debug)]
pub struct Channel {
    /// Render-settings toggle
    pub toggle: &'static str,
    /// `field` value of the integrator child
    pub field: &'static str,
    /// Channel name on the film
    pub film_name: &'static str,
    /// Pixel format on the film
    pub pixel_format: &'static str,
}

/// Multichannel outputs in emission order
pub static CHANNELS: [Channel; 9] = [
    Channel { toggle: "multichannelPosition", field: "position", film_name: "position", pixel_format: "rgb" },
    Channel { toggle: "multichannelRelPosition", field: "relPosition", film_name: "relPosition", pixel_format: "rgb" },
    Channel { toggle: "multichannelDistance", field: "distance", film_name: "distance", pixel_format: "luminance" },
    Channel { toggle: "multichannelGeoNormal", field: "geoNormal", film_name: "geoNormal", pixel_format: "rgb" },
    Channel { toggle: "multichannelShadingNormal", field: "shNormal", film_name: "shadingNormal", pixel_format: "rgb" },
    Channel { toggle: "multichannelUV", field: "uv", film_name: "uv", pixel_format: "rgb" },
    Channel { toggle: "multichannelAlbedo", field: "albedo", film_name: "albedo", pixel_format: "rgb" },
    Channel { toggle: "multichannelShapeIndex", field: "shapeIndex", film_name: "shapeIndex", pixel_format: "luminance" },
    Channel { toggle: "multichannelPrimIndex", field: "primIndex", film_name: "primitiveIndex", pixel_format: "luminance" },
];

/// Channels enabled on `settings`
pub fn enabled_channels(ctx: &ExportContext<'_>, settings: &str) -> Vec<&'static Channel> {
    let host = ctx.host();
    CHANNELS
        .iter()
        .filter(|channel| host.get_bool(settings, channel.toggle))
        .collect()
}

/// Host enum labels use '_' where the UI shows a space
pub(crate) fn ui_label(ctx: &ExportContext<'_>, node: &str, attr: &str) -> String {
    ctx.host().get_string(node, attr).replace('_', " ")
}

fn write_params(ctx: &ExportContext<'_>, settings: &str, entry: &IntegratorParams, element: &mut Element) {
    let host = ctx.host();
    let attr = |suffix: &str| format!("{}{suffix}", entry.prefix);

    for param in entry.params {
        let child = match *param {
            Param::MaxDepth => {
                let depth = if host.get_bool(settings, &attr("UseInfiniteDepth")) {
                    -1
                } else {
                    host.get_int(settings, &attr("MaxDepth"))
                };
                params::integer("maxDepth", depth)
            }
            Param::Int(suffix, name) => params::integer(name, host.get_int(settings, &attr(suffix))),
            Param::Float(suffix, name) => params::float(name, host.get_float(settings, &attr(suffix))),
            Param::Bool(suffix, name) => params::boolean(name, host.get_bool(settings, &attr(suffix))),
            Param::Percent(suffix, name) => {
                params::float(name, host.get_float(settings, &attr(suffix)) / 100.0)
            }
        };
        element.add_child(child);
    }
}

fn ambient_occlusion(ctx: &ExportContext<'_>, settings: &str) -> Element {
    let host = ctx.host();
    let ray_length = if host.get_bool(settings, "iAmbientOcclusionUseAutomaticRayLength") {
        -1.0
    } else {
        host.get_float(settings, "iAmbientOcclusionRayLength")
    };

    SceneKind::Integrator
        .typed("ao")
        .with_child(params::integer(
            "shadingSamples",
            host.get_int(settings, "iAmbientOcclusionShadingSamples"),
        ))
        .with_child(params::float("rayLength", ray_length))
}

fn direct_illumination(ctx: &ExportContext<'_>, settings: &str) -> Element {
    let host = ctx.host();
    let mut element = SceneKind::Integrator.typed("direct");

    if host.get_bool(settings, "iDirectIlluminationUseEmitterAndBSDFSamples") {
        element.add_child(params::integer(
            "emitterSamples",
            host.get_int(settings, "iDirectIlluminationEmitterSamples"),
        ));
        element.add_child(params::integer(
            "bsdfSamples",
            host.get_int(settings, "iDirectIlluminationBSDFSamples"),
        ));
    } else {
        element.add_child(params::integer(
            "shadingSamples",
            host.get_int(settings, "iDirectIlluminationShadingSamples"),
        ));
    }

    element
        .with_child(params::boolean(
            "strictNormals",
            host.get_bool(settings, "iDirectIlluminationStrictNormals"),
        ))
        .with_child(params::boolean(
            "hideEmitters",
            host.get_bool(settings, "iDirectIlluminationHideEmitters"),
        ))
}

/// Base integrator selected on `settings`
///
/// Unknown labels fall back to the path tracer.
pub fn base_integrator(ctx: &mut ExportContext<'_>, settings: &str) -> Element {
    let label = ui_label(ctx, settings, "integrator");
    let id = presets::INTEGRATOR.resolve(&label, &mut ctx.diagnostics);

    match id {
        "ao" => ambient_occlusion(ctx, settings),
        "direct" => direct_illumination(ctx, settings),
        _ => {
            let entry = INTEGRATORS
                .iter()
                .find(|entry| entry.id == id)
                .unwrap_or(&INTEGRATORS[0]);
            let mut element = SceneKind::Integrator.typed(entry.id);
            write_params(ctx, settings, entry, &mut element);
            element
        }
    }
}

/// Wrap `inner` in the meta integrator selected on `settings`
///
/// "None" and an empty label leave `inner` unchanged, as does an unknown
/// label after recording a diagnostic.
pub fn meta_integrator(ctx: &mut ExportContext<'_>, settings: &str, inner: Element) -> Element {
    let label = ui_label(ctx, settings, "metaIntegrator");
    if label.is_empty() || label == "None" {
        return inner;
    }

    let Some(id) = presets::META_INTEGRATOR.lookup(&label) else {
        ctx.warn(
            DiagnosticKind::UnknownPreset,
            format!("unsupported meta integrator '{label}', exporting the base integrator alone"),
        );
        return inner;
    };

    let mut element = SceneKind::Integrator.typed(id);
    if let Some(entry) = META_INTEGRATORS.iter().find(|entry| entry.id == id) {
        write_params(ctx, settings, entry, &mut element);
    }
    element.with_child(inner)
}

/// Wrap `inner` in a multichannel integrator with one field per channel
pub fn multichannel(ctx: &ExportContext<'_>, settings: &str, inner: Element) -> Element {
    let fields = enabled_channels(ctx, settings).into_iter().map(|channel| {
        SceneKind::Integrator
            .typed("field")
            .with_child(params::string("field", channel.field))
    });

    SceneKind::Integrator
        .typed("multichannel")
        .with_child(inner)
        .with_children(fields.collect::<Vec<_>>())
}

/// Full integrator element for `settings`
pub fn write_integrator(ctx: &mut ExportContext<'_>, settings: &str) -> Element {
    let base = base_integrator(ctx, settings);
    let wrapped = meta_integrator(ctx, settings, base);

    if ctx.host().get_bool(settings, "multichannel") {
        multichannel(ctx, settings, wrapped)
    } else {
        wrapped
    }
}

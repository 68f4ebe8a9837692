//! Surface scattering translators

use crate::element::{params, Element, SceneKind};
use crate::host::AttrValue;
use crate::presets;
use crate::scene::ExportContext;

use super::attributes::{
    distribution, ior_params, nested_bsdf, textured_color, textured_color_as, textured_float,
};

fn bsdf(ty: &str, id: &str) -> Element {
    SceneKind::Bsdf.typed(ty).with_id(id)
}

/// Lambertian diffuse
pub fn diffuse(ctx: &mut ExportContext<'_>, node: &str, name: &str) -> Element {
    bsdf("diffuse", name).with_child(textured_color(ctx, node, "reflectance"))
}

/// Rough diffuse (Oren-Nayar)
pub fn rough_diffuse(ctx: &mut ExportContext<'_>, node: &str, name: &str) -> Element {
    let host = ctx.host();
    bsdf("roughdiffuse", name)
        .with_child(textured_color(ctx, node, "reflectance"))
        .with_child(params::float("alpha", host.get_float(node, "alpha")))
        .with_child(params::boolean("useFastApprox", host.get_bool(node, "useFastApprox")))
}

/// Diffuse transmitter
pub fn diffuse_transmitter(ctx: &mut ExportContext<'_>, node: &str, name: &str) -> Element {
    bsdf("difftrans", name).with_child(textured_color(ctx, node, "transmittance"))
}

/// Smooth dielectric coating over a nested BSDF
pub fn smooth_coating(ctx: &mut ExportContext<'_>, node: &str, name: &str) -> Element {
    let mut element = bsdf("coating", name)
        .with_child(params::float("thickness", ctx.host().get_float(node, "thickness")))
        .with_child(textured_color(ctx, node, "sigmaA"))
        .with_child(textured_color(ctx, node, "specularReflectance"))
        .with_children(ior_params(ctx, node));

    if let Some(nested) = nested_bsdf(ctx, node, "bsdf", true) {
        element.add_child(nested);
    }
    element
}

/// Rough dielectric coating over a nested BSDF
pub fn rough_coating(ctx: &mut ExportContext<'_>, node: &str, name: &str) -> Element {
    let mut element = bsdf("roughcoating", name)
        .with_child(params::float("thickness", ctx.host().get_float(node, "thickness")))
        .with_child(textured_float(ctx, node, "alpha"))
        .with_child(textured_color(ctx, node, "sigmaA"))
        .with_child(textured_color(ctx, node, "specularReflectance"));

    let distribution = distribution(ctx, node);
    element.add_child(params::string("distribution", distribution));
    element.add_children(ior_params(ctx, node));

    if let Some(nested) = nested_bsdf(ctx, node, "bsdf", true) {
        element.add_child(nested);
    }
    element
}

/// Smooth conductor; unknown materials become a perfect mirror
pub fn conductor(ctx: &mut ExportContext<'_>, node: &str, name: &str) -> Element {
    let label = ctx.host().get_string(node, "material");
    let material = presets::CONDUCTOR.resolve(&label, &mut ctx.diagnostics);

    bsdf("conductor", name)
        .with_child(params::string("material", material))
        .with_child(params::float("extEta", ctx.host().get_float(node, "extEta")))
        .with_child(textured_color(ctx, node, "specularReflectance"))
}

/// Rough conductor; unknown materials become copper
///
/// The anisotropic distribution takes separate `alphaU`/`alphaV` roughness
/// from the host's `alphaUV` pair instead of a single `alpha`.
pub fn rough_conductor(ctx: &mut ExportContext<'_>, node: &str, name: &str) -> Element {
    let host = ctx.host();
    let distribution = distribution(ctx, node);
    let label = host.get_string(node, "material");
    let material =
        presets::CONDUCTOR.resolve_or(&label, presets::ROUGH_CONDUCTOR_DEFAULT, &mut ctx.diagnostics);

    let mut element = bsdf("roughconductor", name).with_child(params::string("distribution", distribution));
    element.add_children(roughness(ctx, node, distribution, false));
    element
        .with_child(params::string("material", material))
        .with_child(params::float("extEta", host.get_float(node, "extEta")))
        .with_child(textured_color(ctx, node, "specularReflectance"))
}

fn roughness(
    ctx: &mut ExportContext<'_>,
    node: &str,
    distribution: &str,
    textured: bool,
) -> Vec<Element> {
    if distribution == presets::ANISOTROPIC_DISTRIBUTION {
        let [u, v] = match ctx.host().attribute(node, "alphaUV") {
            Some(AttrValue::Float2(uv)) => uv,
            _ => [0.0, 0.0],
        };
        vec![params::float("alphaU", u), params::float("alphaV", v)]
    } else if textured {
        vec![textured_float(ctx, node, "alpha")]
    } else {
        vec![params::float("alpha", ctx.host().get_float(node, "alpha"))]
    }
}

/// Smooth dielectric
pub fn dielectric(ctx: &mut ExportContext<'_>, node: &str, name: &str) -> Element {
    dielectric_like("dielectric", ctx, node, name)
}

/// Thin dielectric
pub fn thin_dielectric(ctx: &mut ExportContext<'_>, node: &str, name: &str) -> Element {
    dielectric_like("thindielectric", ctx, node, name)
}

fn dielectric_like(ty: &str, ctx: &mut ExportContext<'_>, node: &str, name: &str) -> Element {
    bsdf(ty, name)
        .with_children(ior_params(ctx, node))
        .with_child(textured_color(ctx, node, "specularReflectance"))
        .with_child(textured_color(ctx, node, "specularTransmittance"))
}

/// Rough dielectric
pub fn rough_dielectric(ctx: &mut ExportContext<'_>, node: &str, name: &str) -> Element {
    let distribution = distribution(ctx, node);
    let mut element = bsdf("roughdielectric", name).with_child(params::string("distribution", distribution));
    element.add_children(roughness(ctx, node, distribution, true));
    element
        .with_children(ior_params(ctx, node))
        .with_child(textured_color(ctx, node, "specularReflectance"))
        .with_child(textured_color(ctx, node, "specularTransmittance"))
}

/// Smooth plastic
pub fn plastic(ctx: &mut ExportContext<'_>, node: &str, name: &str) -> Element {
    bsdf("plastic", name)
        .with_children(ior_params(ctx, node))
        .with_child(textured_color(ctx, node, "diffuseReflectance"))
        .with_child(textured_color(ctx, node, "specularReflectance"))
        .with_child(params::boolean("nonlinear", ctx.host().get_bool(node, "nonlinear")))
}

/// Rough plastic
pub fn rough_plastic(ctx: &mut ExportContext<'_>, node: &str, name: &str) -> Element {
    let mut element = bsdf("roughplastic", name)
        .with_child(textured_color(ctx, node, "specularReflectance"))
        .with_child(textured_color(ctx, node, "diffuseReflectance"));

    let distribution = distribution(ctx, node);
    element.add_child(params::string("distribution", distribution));
    element.add_child(textured_float(ctx, node, "alpha"));
    element
        .with_children(ior_params(ctx, node))
        .with_child(params::boolean("nonlinear", ctx.host().get_bool(node, "nonlinear")))
}

/// Anisotropic Ward
pub fn ward(ctx: &mut ExportContext<'_>, node: &str, name: &str) -> Element {
    let label = ctx.host().get_string(node, "variant");
    let variant = presets::WARD_VARIANT.resolve(&label, &mut ctx.diagnostics);

    bsdf("ward", name)
        .with_child(params::string("variant", variant))
        .with_child(textured_float(ctx, node, "alphaU"))
        .with_child(textured_float(ctx, node, "alphaV"))
        .with_child(textured_color(ctx, node, "diffuseReflectance"))
        .with_child(textured_color(ctx, node, "specularReflectance"))
}

/// Irawan woven cloth
pub fn irawan(ctx: &mut ExportContext<'_>, node: &str, name: &str) -> Element {
    let host = ctx.host();
    bsdf("irawan", name)
        .with_child(params::string("filename", host.get_string(node, "filename")))
        .with_child(params::float("repeatU", host.get_float(node, "repeatu")))
        .with_child(params::float("repeatV", host.get_float(node, "repeatv")))
        .with_child(params::rgb("warp_kd", &host.get_color(node, "warpkd")))
        .with_child(params::rgb("warp_ks", &host.get_color(node, "warpks")))
        .with_child(params::rgb("weft_kd", &host.get_color(node, "weftkd")))
        .with_child(params::rgb("weft_ks", &host.get_color(node, "weftks")))
}

/// Explicit two-sided material with an optional distinct back face
pub fn two_sided(ctx: &mut ExportContext<'_>, node: &str, name: &str) -> Element {
    let mut element = bsdf("twosided", name);
    if let Some(front) = nested_bsdf(ctx, node, "frontBSDF", true) {
        element.add_child(front);
    }
    if let Some(back) = nested_bsdf(ctx, node, "backBSDF", false) {
        element.add_child(back);
    }
    element
}

/// Linear blend of two BSDFs
pub fn blend(ctx: &mut ExportContext<'_>, node: &str, name: &str) -> Element {
    let mut element = bsdf("blendbsdf", name).with_child(textured_float(ctx, node, "weight"));
    element.add_children(nested_bsdf(ctx, node, "bsdf1", true));
    element.add_children(nested_bsdf(ctx, node, "bsdf2", true));
    element
}

/// Opacity mask over a nested BSDF
pub fn mask(ctx: &mut ExportContext<'_>, node: &str, name: &str) -> Element {
    let mut element = bsdf("mask", name).with_child(textured_color(ctx, node, "opacity"));
    element.add_children(nested_bsdf(ctx, node, "bsdf", true));
    element
}

/// Bump map over a nested BSDF
pub fn bump(ctx: &mut ExportContext<'_>, node: &str, name: &str) -> Element {
    let scale = ctx.host().get_float(node, "bumpScale");
    let mut element =
        bsdf("bumpmap", name).with_child(textured_color_as(ctx, node, "texture", "texture", Some(scale)));
    element.add_children(nested_bsdf(ctx, node, "bsdf", true));
    element
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ExportConfig;
    use crate::diagnostics::DiagnosticKind;
    use crate::host::{AttrValue, NodeRecord, SceneSnapshot};

    fn names(element: &Element) -> Vec<&str> {
        element
            .children()
            .iter()
            .filter_map(|c| c.get_attribute("name"))
            .collect()
    }

    #[test]
    fn test_rough_conductor_anisotropic() {
        let host = SceneSnapshot::new(1.0).with_node(
            NodeRecord::new("metal", "CyclesRoughConductorShader")
                .with_attr("distribution", AttrValue::String("Ashikhmin Shirley".into()))
                .with_attr("alphaUV", AttrValue::Float2([0.05, 0.3]))
                .with_attr("alpha", AttrValue::Float(0.1))
                .with_attr("material", AttrValue::String("Gold".into())),
        );
        let config = ExportConfig::default();
        let mut ctx = ExportContext::new(&host, &config);

        let element = rough_conductor(&mut ctx, "metal", "metal");
        assert_eq!(element.get_attribute("type"), Some("roughconductor"));
        assert_eq!(
            names(&element),
            ["distribution", "alphaU", "alphaV", "material", "extEta", "specularReflectance"]
        );
        assert_eq!(element.named_child("distribution").and_then(|c| c.get_attribute("value")), Some("as"));
        assert_eq!(element.named_child("alphaV").and_then(|c| c.get_attribute("value")), Some("0.3"));
        assert!(element.named_child("alpha").is_none());
    }

    #[test]
    fn test_rough_conductor_defaults() {
        let host = SceneSnapshot::new(1.0).with_node(
            NodeRecord::new("metal", "CyclesRoughConductorShader")
                .with_attr("distribution", AttrValue::String("Blinn".into()))
                .with_attr("material", AttrValue::String("Unobtainium".into())),
        );
        let config = ExportConfig::default();
        let mut ctx = ExportContext::new(&host, &config);

        let element = rough_conductor(&mut ctx, "metal", "metal");
        assert_eq!(element.named_child("distribution").and_then(|c| c.get_attribute("value")), Some("beckmann"));
        assert_eq!(element.named_child("material").and_then(|c| c.get_attribute("value")), Some("Cu"));
        assert!(element.named_child("alpha").is_some());
        assert_eq!(ctx.diagnostics().count(DiagnosticKind::UnknownPreset), 2);
    }

    #[test]
    fn test_conductor_mirror_default() {
        let host = SceneSnapshot::new(1.0).with_node(NodeRecord::new("m", "CyclesConductorShader"));
        let config = ExportConfig::default();
        let mut ctx = ExportContext::new(&host, &config);

        let element = conductor(&mut ctx, "m", "m");
        assert_eq!(element.named_child("material").and_then(|c| c.get_attribute("value")), Some("none"));
    }

    #[test]
    fn test_plastic_parameter_order() {
        let host = SceneSnapshot::new(1.0).with_node(
            NodeRecord::new("p", "CyclesPlasticShader")
                .with_attr("interiorMaterial", AttrValue::String("Polypropylene - 1.49".into()))
                .with_attr("exteriorMaterial", AttrValue::String("Air - 1.000277".into()))
                .with_attr("nonlinear", AttrValue::Bool(true)),
        );
        let config = ExportConfig::default();
        let mut ctx = ExportContext::new(&host, &config);

        let element = plastic(&mut ctx, "p", "p");
        assert_eq!(
            names(&element),
            ["intIOR", "extIOR", "diffuseReflectance", "specularReflectance", "nonlinear"]
        );
        assert_eq!(element.named_child("extIOR").and_then(|c| c.get_attribute("value")), Some("air"));
        assert_eq!(element.named_child("nonlinear").and_then(|c| c.get_attribute("value")), Some("true"));
    }

    #[test]
    fn test_coating_nests_connected_bsdf_without_id() {
        let host = SceneSnapshot::new(1.0)
            .with_node(NodeRecord::new("coat", "CyclesSmoothCoatingShader"))
            .with_node(
                NodeRecord::new("base", "CyclesDiffuseShader")
                    .with_attr("reflectance", AttrValue::Float3([0.2, 0.4, 0.6])),
            )
            .with_connection("base.outColor", "coat.bsdf");
        let config = ExportConfig::default();
        let mut ctx = ExportContext::new(&host, &config);

        let element = smooth_coating(&mut ctx, "coat", "coat");
        let nested = element.children().last().unwrap();
        assert_eq!(nested.get_attribute("type"), Some("diffuse"));
        assert_eq!(nested.get_attribute("id"), None);
        assert_eq!(nested.children()[0].get_attribute("value"), Some("0.2 0.4 0.6"));
    }

    #[test]
    fn test_two_sided_without_back_face() {
        let host = SceneSnapshot::new(1.0).with_node(
            NodeRecord::new("ts", "CyclesTwoSidedShader")
                .with_attr("frontBSDF", AttrValue::Float3([0.5; 3])),
        );
        let config = ExportConfig::default();
        let mut ctx = ExportContext::new(&host, &config);

        let element = two_sided(&mut ctx, "ts", "ts");
        assert_eq!(element.children().len(), 1);
        assert_eq!(element.children()[0].get_attribute("type"), Some("diffuse"));
    }

    #[test]
    fn test_bump_scales_texture() {
        let host = SceneSnapshot::new(1.0)
            .with_node(NodeRecord::new("bump1", "CyclesBumpShader").with_attr("bumpScale", AttrValue::Float(0.25)))
            .with_node(
                NodeRecord::new("file1", "file").with_attr("fileTextureName", AttrValue::String("h.png".into())),
            )
            .with_connection("file1.outColor", "bump1.texture");
        let config = ExportConfig::default();
        let mut ctx = ExportContext::new(&host, &config);

        let element = bump(&mut ctx, "bump1", "bump1");
        let texture = &element.children()[0];
        assert_eq!(texture.get_attribute("type"), Some("scale"));
        assert_eq!(texture.get_attribute("name"), Some("texture"));
        assert_eq!(element.children()[1].get_attribute("type"), Some("diffuse"));
    }
}

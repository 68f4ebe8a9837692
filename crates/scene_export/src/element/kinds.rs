//! Typed element constructors for the scene vocabulary

use super::{params, Element};

/// Element kinds that carry an optional `type` attribute
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SceneKind {
    /// Surface scattering model
    Bsdf,
    /// Phase function inside a medium
    Phase,
    /// Participating medium
    Medium,
    /// Geometry
    Shape,
    /// Light source
    Emitter,
    /// Subsurface scattering model
    Subsurface,
    /// Light transport algorithm
    Integrator,
    /// Image output
    Film,
    /// Camera
    Sensor,
    /// Sample generator
    Sampler,
    /// Transform container
    Transform,
    /// Reference to a previously declared element
    Ref,
    /// Reconstruction filter
    Rfilter,
}

impl SceneKind {
    /// Tag used for the element kind
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Bsdf => "bsdf",
            Self::Phase => "phase",
            Self::Medium => "medium",
            Self::Shape => "shape",
            Self::Emitter => "emitter",
            Self::Subsurface => "subsurface",
            Self::Integrator => "integrator",
            Self::Film => "film",
            Self::Sensor => "sensor",
            Self::Sampler => "sampler",
            Self::Transform => "transform",
            Self::Ref => "ref",
            Self::Rfilter => "rfilter",
        }
    }

    /// Bare element of this kind
    pub fn element(self) -> Element {
        Element::of(self.as_str())
    }

    /// Element of this kind with a `type` attribute
    pub fn typed(self, type_attribute: &str) -> Element {
        self.element().with_attribute("type", type_attribute)
    }
}

/// `<transform name=...>` container
pub fn named_transform(name: &str) -> Element {
    SceneKind::Transform.element().with_attribute("name", name)
}

/// `<ref id=...>`
pub fn reference(id: &str) -> Element {
    SceneKind::Ref.element().with_attribute("id", id)
}

/// Grid volume, optionally holding the file it reads
pub fn volume(name: &str, path: Option<&str>) -> Element {
    let element = Element::of("volume")
        .with_attribute("type", "gridvolume")
        .with_attribute("name", name);
    match path {
        Some(path) => element.with_child(params::string("filename", path)),
        None => element,
    }
}

/// Constant volume wrapper; callers add the `value` child
pub fn const_volume(name: &str) -> Element {
    Element::of("volume")
        .with_attribute("type", "constvolume")
        .with_attribute("name", name)
}

/// Socket-to-socket wiring for node-network shaders
pub fn connect(from: impl Into<String>, to: impl Into<String>) -> Element {
    Element::of("connect")
        .with_attribute("from", from)
        .with_attribute("to", to)
}

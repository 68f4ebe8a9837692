//! Parameter builders
//!
//! Pure constructors for typed leaf elements. They never consult the host.
//! Float formatting is the single place output reproducibility is decided:
//! shortest round-trip digits, with integral values written as `N.0`.

use super::Element;

/// Format a float deterministically
pub fn format_float(value: f64) -> String {
    if value.is_finite() && value.fract() == 0.0 && value.abs() < 1e16 {
        format!("{value:.1}")
    } else {
        format!("{value}")
    }
}

/// Space-join floats
pub fn format_floats(values: &[f64]) -> String {
    values
        .iter()
        .map(|v| format_float(*v))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Color space tag, which doubles as the element kind of a color parameter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ColorSpace {
    /// Gamma-encoded sRGB
    #[default]
    Srgb,
    /// Linear RGB
    Rgb,
}

impl ColorSpace {
    /// Element kind for this color space
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Srgb => "srgb",
            Self::Rgb => "rgb",
        }
    }
}

/// Rotation axis
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    /// X axis
    X,
    /// Y axis
    Y,
    /// Z axis
    Z,
}

impl Axis {
    const fn key(self) -> &'static str {
        match self {
            Self::X => "x",
            Self::Y => "y",
            Self::Z => "z",
        }
    }
}

fn named(kind: &'static str, name: &str, value: String) -> Element {
    Element::of(kind)
        .with_attribute("name", name)
        .with_attribute("value", value)
}

/// `<boolean name value="true|false"/>`
pub fn boolean(name: &str, value: bool) -> Element {
    named("boolean", name, value.to_string())
}

/// `<integer name value/>`
pub fn integer(name: &str, value: i64) -> Element {
    named("integer", name, value.to_string())
}

/// `<float name value/>`
pub fn float(name: &str, value: f64) -> Element {
    named("float", name, format_float(value))
}

/// `<string name value/>`
pub fn string(name: &str, value: impl Into<String>) -> Element {
    named("string", name, value.into())
}

fn xyz(kind: &'static str, name: &str, x: f64, y: f64, z: f64) -> Element {
    Element::of(kind)
        .with_attribute("name", name)
        .with_attribute("x", format_float(x))
        .with_attribute("y", format_float(y))
        .with_attribute("z", format_float(z))
}

/// `<vector name x y z/>`
pub fn vector(name: &str, x: f64, y: f64, z: f64) -> Element {
    xyz("vector", name, x, y, z)
}

/// `<point name x y z/>`
pub fn point(name: &str, x: f64, y: f64, z: f64) -> Element {
    xyz("point", name, x, y, z)
}

/// Color parameter; the element kind is the color space
pub fn color(name: &str, components: &[f64], colorspace: ColorSpace) -> Element {
    Element::of(colorspace.as_str())
        .with_attribute("name", name)
        .with_attribute("value", format_floats(components))
}

/// sRGB color parameter
pub fn srgb(name: &str, components: &[f64]) -> Element {
    color(name, components, ColorSpace::Srgb)
}

/// Linear RGB color parameter
pub fn rgb(name: &str, components: &[f64]) -> Element {
    color(name, components, ColorSpace::Rgb)
}

/// `<spectrum name value/>`
pub fn spectrum(name: &str, components: &[f64]) -> Element {
    named("spectrum", name, format_floats(components))
}

/// `<rotate axis="1" angle/>`
pub fn rotate(axis: Axis, angle: f64) -> Element {
    Element::of("rotate")
        .with_attribute(axis.key(), "1")
        .with_attribute("angle", format_float(angle))
}

/// `<translate x y z/>`
pub fn translate(x: f64, y: f64, z: f64) -> Element {
    Element::of("translate")
        .with_attribute("x", format_float(x))
        .with_attribute("y", format_float(y))
        .with_attribute("z", format_float(z))
}

/// `<scale x y/>`
pub fn scale2(x: f64, y: f64) -> Element {
    Element::of("scale")
        .with_attribute("x", format_float(x))
        .with_attribute("y", format_float(y))
}

/// `<lookat target origin up/>`
pub fn lookat(target: &[f64; 3], origin: &[f64; 3], up: &[f64; 3]) -> Element {
    Element::of("lookat")
        .with_attribute("target", format_floats(target))
        .with_attribute("origin", format_floats(origin))
        .with_attribute("up", format_floats(up))
}

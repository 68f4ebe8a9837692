//! Preset tables
//!
//! Immutable mappings from host UI labels to canonical backend identifiers.
//! An unmapped label never leaks into the output: it resolves to the
//! table's documented default (or a caller-supplied one) and records a
//! diagnostic.

use crate::diagnostics::{DiagnosticKind, Diagnostics};

/// Label → identifier table for one category
#[derive(Debug)]
pub struct PresetTable {
    category: &'static str,
    entries: &'static [(&'static str, &'static str)],
    default: &'static str,
}

impl PresetTable {
    /// Create a table
    pub const fn new(
        category: &'static str,
        entries: &'static [(&'static str, &'static str)],
        default: &'static str,
    ) -> Self {
        Self {
            category,
            entries,
            default,
        }
    }

    /// Category name used in diagnostics
    pub const fn category(&self) -> &'static str {
        self.category
    }

    /// Identifier used when a label is unmapped
    pub const fn default_id(&self) -> &'static str {
        self.default
    }

    /// Identifier for `label`, if mapped
    pub fn lookup(&self, label: &str) -> Option<&'static str> {
        self.entries
            .iter()
            .find(|(ui, _)| *ui == label)
            .map(|(_, id)| *id)
    }

    /// Whether `label` is mapped
    pub fn contains(&self, label: &str) -> bool {
        self.lookup(label).is_some()
    }

    /// All UI labels in table order
    pub fn labels(&self) -> impl Iterator<Item = &'static str> {
        self.entries.iter().map(|(ui, _)| *ui)
    }

    /// Identifier for `label`, falling back to the table default
    pub fn resolve(&self, label: &str, diagnostics: &mut Diagnostics) -> &'static str {
        self.resolve_or(label, self.default, diagnostics)
    }

    /// Identifier for `label`, falling back to `fallback`
    pub fn resolve_or(
        &self,
        label: &str,
        fallback: &'static str,
        diagnostics: &mut Diagnostics,
    ) -> &'static str {
        self.lookup(label).unwrap_or_else(|| {
            diagnostics.warn(
                DiagnosticKind::UnknownPreset,
                format!(
                    "unsupported {} '{}', using '{}'",
                    self.category, label, fallback
                ),
            );
            fallback
        })
    }
}

/// Conductor complex-IOR presets
pub static CONDUCTOR: PresetTable = PresetTable::new(
    "conductor material",
    &[
        ("100% reflecting mirror", "none"),
        ("Amorphous carbon", "a-C"),
        ("Silver", "Ag"),
        ("Aluminium", "Al"),
        ("Cubic aluminium arsenide", "AlAs"),
        ("Cubic aluminium antimonide", "AlSb"),
        ("Gold", "Au"),
        ("Polycrystalline beryllium", "Be"),
        ("Chromium", "Cr"),
        ("Cubic caesium iodide", "CsI"),
        ("Copper", "Cu"),
        ("Copper (I) oxide", "Cu2O"),
        ("Copper (II) oxide", "CuO"),
        ("Cubic diamond", "d-C"),
        ("Mercury", "Hg"),
        ("Mercury telluride", "HgTe"),
        ("Iridium", "Ir"),
        ("Polycrystalline potassium", "K"),
        ("Lithium", "Li"),
        ("Magnesium oxide", "MgO"),
        ("Molybdenum", "Mo"),
        ("Sodium", "Na_palik"),
        ("Niobium", "Nb"),
        ("Nickel", "Ni_palik"),
        ("Rhodium", "Rh"),
        ("Selenium", "Se"),
        ("Hexagonal silicon carbide", "SiC"),
        ("Tin telluride", "SnTe"),
        ("Tantalum", "Ta"),
        ("Trigonal tellurium", "Te"),
        ("Polycryst. thorium (IV) fuoride", "ThF4"),
        ("Polycrystalline titanium carbide", "TiC"),
        ("Titanium nitride", "TiN"),
        ("Tetragonal titan. dioxide", "TiO2"),
        ("Vanadium carbide", "VC"),
        ("Vanadium", "V_palik"),
        ("Vanadium nitride", "VN"),
        ("Tungsten", "W"),
    ],
    "none",
);

/// Fallback conductor for rough conductors
pub const ROUGH_CONDUCTOR_DEFAULT: &str = "Cu";

/// Microfacet distributions
pub static DISTRIBUTION: PresetTable = PresetTable::new(
    "microfacet distribution",
    &[
        ("Beckmann", "beckmann"),
        ("GGX", "ggx"),
        ("Phong", "phong"),
        ("Ashikhmin Shirley", "as"),
    ],
    "beckmann",
);

/// Anisotropic distribution id; selects separate alphaU/alphaV
pub const ANISOTROPIC_DISTRIBUTION: &str = "as";

/// Named dielectric IOR presets. "Helum" matches the host's UI label.
pub static IOR_MATERIAL: PresetTable = PresetTable::new(
    "IOR material",
    &[
        ("Vacuum", "vacuum"),
        ("Helum", "helium"),
        ("Hydrogen", "hydrogen"),
        ("Air", "air"),
        ("Carbon Dioxide", "carbon dioxide"),
        ("Water", "water"),
        ("Acetone", "acetone"),
        ("Ethanol", "ethanol"),
        ("Carbon Tetrachloride", "carbon tetrachloride"),
        ("Glycerol", "glycerol"),
        ("Benzene", "benzene"),
        ("Silicone Oil", "silicone oil"),
        ("Bromine", "bromine"),
        ("Water Ice", "water ice"),
        ("Fused Quartz", "fused quartz"),
        ("Pyrex", "pyrex"),
        ("Acrylic Glass", "acrylic glass"),
        ("Polypropylene", "polypropylene"),
        ("BK7", "bk7"),
        ("Sodium Chloride", "sodium chloride"),
        ("Amber", "amber"),
        ("Pet", "pet"),
        ("Diamond", "diamond"),
    ],
    "vacuum",
);

/// Ward model variants
pub static WARD_VARIANT: PresetTable = PresetTable::new(
    "ward variant",
    &[
        ("Ward", "ward"),
        ("Ward-Duer", "ward-duer"),
        ("Balanced", "balanced"),
    ],
    "balanced",
);

/// Measured scattering media
pub static MEDIUM_MATERIAL: PresetTable = PresetTable::new(
    "medium material",
    &[
        ("Apple", "Apple"),
        ("Cream", "Cream"),
        ("Skimmilk", "Skimmilk"),
        ("Spectralon", "Spectralon"),
        ("Chicken1", "Chicken1"),
        ("Ketchup", "Ketchup"),
        ("Skin1", "Skin1"),
        ("Wholemilk", "Wholemilk"),
        ("Chicken2", "Chicken2"),
        ("Potato", "Potato"),
        ("Skin2", "Skin2"),
        ("Lowfat Milk", "Lowfat Milk"),
        ("Reduced Milk", "Reduced Milk"),
        ("Regular Milk", "Regular Milk"),
        ("Espresso", "Espresso"),
        ("Mint Mocha Coffee", "Mint Mocha Coffee"),
        ("Lowfat Soy Milk", "Lowfat Soy Milk"),
        ("Regular Soy Milk", "Regular Soy Milk"),
        ("Lowfat Chocolate Milk", "Lowfat Chocolate Milk"),
        ("Regular Chocolate Milk", "Regular Chocolate Milk"),
        ("Coke", "Coke"),
        ("Pepsi Sprite", "Pepsi Sprite"),
        ("Gatorade", "Gatorade"),
        ("Chardonnay", "Chardonnay"),
        ("White Zinfandel", "White Zinfandel"),
        ("Merlot", "Merlot"),
        ("Budweiser Beer", "Budweiser Beer"),
        ("Coors Light Beer", "Coors Light Beer"),
        ("Clorox", "Clorox"),
        ("Apple Juice", "Apple Juice"),
        ("Cranberry Juice", "Cranberry Juice"),
        ("Grape Juice", "Grape Juice"),
        ("Ruby Grapefruit Juice", "Ruby Grapefruit Juice"),
        ("White Grapefruit Juice", "White Grapefruit Juice"),
        ("Shampoo", "Shampoo"),
        ("Strawberry Shampoo", "Strawberry Shampoo"),
        ("Head & Shoulders Shampoo", "Head & Shoulders Shampoo"),
        ("Lemon Tea Powder", "Lemon Tea Powder"),
        ("Orange Juice Powder", "Orange Juice Powder"),
        ("Pink Lemonade Powder", "Pink Lemonade Powder"),
        ("Cappuccino Powder", "Cappuccino Powder"),
        ("Salt Powder", "Salt Powder"),
        ("Sugar Powder", "Sugar Powder"),
        ("Suisse Mocha", "Suisse Mocha"),
    ],
    "Skin1",
);

/// Phase functions
pub static PHASE_FUNCTION: PresetTable = PresetTable::new(
    "phase function",
    &[
        ("Isotropic", "isotropic"),
        ("Henyey-Greenstein", "hg"),
        ("Rayleigh", "rayleigh"),
        ("Kajiya-Kay", "kkay"),
        ("Micro-Flake", "microflake"),
    ],
    "isotropic",
);

/// Heterogeneous medium sampling methods
pub static SAMPLING_METHOD: PresetTable = PresetTable::new(
    "sampling method",
    &[("Simpson", "simpson"), ("Woodcock", "woodcock")],
    "simpson",
);

/// Light transport integrators
pub static INTEGRATOR: PresetTable = PresetTable::new(
    "integrator",
    &[
        ("Ambient Occlusion", "ao"),
        ("Direct Illumination", "direct"),
        ("Path Tracer", "path"),
        ("Volumetric Path Tracer", "volpath"),
        ("Simple Volumetric Path Tracer", "volpath_simple"),
        ("Bidirectional Path Tracer", "bdpt"),
        ("Photon Map", "photonmapper"),
        ("Progressive Photon Map", "ppm"),
        ("Stochastic Progressive Photon Map", "sppm"),
        ("Primary Sample Space Metropolis Light Transport", "pssmlt"),
        ("Path Space Metropolis Light Transport", "mlt"),
        ("Energy Redistribution Path Tracer", "erpt"),
        ("Adjoint Particle Tracer", "ptracer"),
        ("Virtual Point Lights", "vpl"),
    ],
    "path",
);

/// Integrators that wrap another integrator
pub static META_INTEGRATOR: PresetTable = PresetTable::new(
    "meta integrator",
    &[("Adaptive", "adaptive"), ("Irradiance Cache", "irrcache")],
    "adaptive",
);

/// Sample generators
pub static SAMPLER: PresetTable = PresetTable::new(
    "sampler",
    &[
        ("Independent Sampler", "independent"),
        ("Stratified Sampler", "stratified"),
        ("Low Discrepancy Sampler", "ldsampler"),
        ("Halton QMC Sampler", "halton"),
        ("Hammersley QMC Sampler", "hammersley"),
        ("Sobol QMC Sampler", "sobol"),
    ],
    "independent",
);

/// Reconstruction filters
pub static RECONSTRUCTION_FILTER: PresetTable = PresetTable::new(
    "reconstruction filter",
    &[
        ("Box filter", "box"),
        ("Tent filter", "tent"),
        ("Gaussian filter", "gaussian"),
        ("Catmull-Rom filter", "catmullrom"),
        ("Lanczos filter", "lanczos"),
        ("Mitchell-Netravali filter", "mitchell"),
    ],
    "box",
);

/// Films
pub static FILM: PresetTable = PresetTable::new(
    "film",
    &[
        ("HDR Film", "hdrfilm"),
        ("LDR Film", "ldrfilm"),
        ("HDR Film - Tiled", "tiledhdrfilm"),
        ("Math Film", "mfilm"),
    ],
    "hdrfilm",
);

/// HDR film file formats
pub static HDR_FILE_FORMAT: PresetTable = PresetTable::new(
    "HDR file format",
    &[
        ("OpenEXR (.exr)", "openexr"),
        ("RGBE (.hdr)", "rgbe"),
        ("Portable Float Map (.pfm)", "pfm"),
    ],
    "openexr",
);

/// LDR film file formats
pub static LDR_FILE_FORMAT: PresetTable = PresetTable::new(
    "LDR file format",
    &[("PNG (.png)", "png"), ("JPEG (.jpg)", "jpeg")],
    "png",
);

/// Math film file formats
pub static MATH_FILE_FORMAT: PresetTable = PresetTable::new(
    "math file format",
    &[
        ("Matlab (.m)", "matlab"),
        ("Mathematica (.m)", "mathematica"),
        ("NumPy (.npy)", "numpy"),
    ],
    "matlab",
);

/// Pixel formats accepted by HDR films
pub static HDR_PIXEL_FORMAT: PresetTable = PresetTable::new(
    "pixel format",
    &[
        ("Luminance", "luminance"),
        ("Luminance Alpha", "luminanceAlpha"),
        ("RGB", "rgb"),
        ("RGBA", "rgba"),
        ("XYZ", "xyz"),
        ("XYZA", "xyza"),
        ("Spectrum", "spectrum"),
        ("Spectrum Alpha", "spectrumAlpha"),
    ],
    "rgb",
);

/// Pixel formats accepted by LDR films
pub static LDR_PIXEL_FORMAT: PresetTable = PresetTable::new(
    "LDR pixel format",
    &[
        ("Luminance", "luminance"),
        ("Luminance Alpha", "luminanceAlpha"),
        ("RGB", "rgb"),
        ("RGBA", "rgba"),
    ],
    "rgb",
);

/// Pixel formats accepted by math films
pub static MATH_PIXEL_FORMAT: PresetTable = PresetTable::new(
    "math pixel format",
    &[
        ("Luminance", "luminance"),
        ("Luminance Alpha", "luminanceAlpha"),
        ("RGB", "rgb"),
        ("RGBA", "rgba"),
        ("Spectrum", "spectrum"),
        ("Spectrum Alpha", "spectrumAlpha"),
    ],
    "rgb",
);

/// Per-channel storage formats
pub static COMPONENT_FORMAT: PresetTable = PresetTable::new(
    "component format",
    &[
        ("Float 16", "float16"),
        ("Float 32", "float32"),
        ("UInt 32", "uint32"),
    ],
    "float16",
);

/// LDR tonemapping operators
pub static TONEMAP_METHOD: PresetTable = PresetTable::new(
    "tonemap method",
    &[("Gamma", "gamma"), ("Reinhard", "reinhard")],
    "gamma",
);

/// Sensor overrides selectable in render settings
pub static SENSOR_OVERRIDE: PresetTable = PresetTable::new(
    "sensor override",
    &[
        ("Spherical", "spherical"),
        ("Telecentric", "telecentric"),
        ("Radiance Meter", "radiancemeter"),
        ("Fluence Meter", "fluencemeter"),
        (
            "Perspective Pinhole Camera with Radial Distortion",
            "perspective_rdist",
        ),
    ],
    "perspective",
);

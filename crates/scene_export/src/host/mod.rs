//! Host query interface
//!
//! The exporter never owns scene data. Everything it knows about nodes,
//! attributes and connections comes through [`SceneHost`], a narrow
//! read-only capability set. [`SceneSnapshot`] is the in-memory
//! implementation used by the command-line tool and the tests.
//!
//! Absent optional attributes read through the typed getters fall back to
//! `false`, `0`, `0.0`, black or `""`.

pub mod snapshot;

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

pub use snapshot::{Connection, NodeRecord, SceneSnapshot};

/// A typed attribute value as reported by the host
///
/// Enum attributes are reported as their UI label string.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum AttrValue {
    /// Boolean toggle
    Bool(bool),
    /// Integer or short
    Int(i64),
    /// Scalar float
    Float(f64),
    /// Float pair (e.g. anisotropic roughness)
    Float2([f64; 2]),
    /// Float triple (colors, points, rotations)
    Float3([f64; 3]),
    /// Integer triple (dates)
    Int3([i64; 3]),
    /// Row-major 4x4 matrix
    Matrix([f64; 16]),
    /// String or enum label
    String(String),
}

impl AttrValue {
    /// Boolean view; integers are true when non-zero
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            Self::Int(i) => Some(*i != 0),
            _ => None,
        }
    }

    /// Integer view; floats are truncated
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Self::Int(i) => Some(*i),
            Self::Bool(b) => Some(i64::from(*b)),
            Self::Float(f) => Some(*f as i64),
            _ => None,
        }
    }

    /// Float view
    pub fn as_float(&self) -> Option<f64> {
        match self {
            Self::Float(f) => Some(*f),
            Self::Int(i) => Some(*i as f64),
            _ => None,
        }
    }

    /// Color view; a scalar becomes grey
    pub fn as_color(&self) -> Option<[f64; 3]> {
        match self {
            Self::Float3(c) => Some(*c),
            Self::Float(f) => Some([*f; 3]),
            _ => None,
        }
    }

    /// String view
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }
}

/// One end of a connection: `node.attribute`
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Plug {
    /// Node name
    pub node: String,
    /// Attribute (socket) name
    pub attribute: String,
}

impl Plug {
    /// Create a plug
    pub fn new(node: impl Into<String>, attribute: impl Into<String>) -> Self {
        Self {
            node: node.into(),
            attribute: attribute.into(),
        }
    }

    /// Parse `node.attribute`; the node part may not contain '.'
    pub fn parse(spec: &str) -> Option<Self> {
        let (node, attribute) = spec.split_once('.')?;
        if node.is_empty() || attribute.is_empty() {
            return None;
        }
        Some(Self::new(node, attribute))
    }
}

/// Node categories the exporter enumerates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeCategory {
    /// Standard (non-environment) light shapes
    Light,
    /// Camera shapes
    Camera,
    /// DAG transforms
    Transform,
}

/// Read-only access to host scene state
pub trait SceneHost {
    /// Type tag of `node`, if it exists
    fn node_type(&self, node: &str) -> Option<String>;

    /// Value of `node.attr`, if present
    fn attribute(&self, node: &str, attr: &str) -> Option<AttrValue>;

    /// Attribute names of `node` in declaration order
    fn attribute_names(&self, node: &str) -> Vec<String>;

    /// Upstream plug feeding `node.attr`
    fn source(&self, node: &str, attr: &str) -> Option<Plug>;

    /// Downstream plugs fed by any output of `node`
    fn destinations(&self, node: &str) -> Vec<Plug>;

    /// Nodes of a category in scene order
    fn nodes_in_category(&self, category: NodeCategory) -> Vec<String>;

    /// Nodes with an exact type tag in scene order
    fn nodes_of_type(&self, node_type: &str) -> Vec<String>;

    /// Parents of `node`
    fn parents(&self, node: &str) -> Vec<String>;

    /// Children of `node`
    fn children(&self, node: &str) -> Vec<String>;

    /// Current frame number
    fn current_frame(&self) -> f64;

    /// Whether `node` has an attribute named `attr`
    fn has_attribute(&self, node: &str, attr: &str) -> bool {
        self.attribute(node, attr).is_some()
    }

    /// Whether `node.attr` has an upstream connection
    fn is_connected(&self, node: &str, attr: &str) -> bool {
        self.source(node, attr).is_some()
    }

    /// Boolean attribute, `false` when absent
    fn get_bool(&self, node: &str, attr: &str) -> bool {
        self.attribute(node, attr)
            .and_then(|v| v.as_bool())
            .unwrap_or(false)
    }

    /// Integer attribute, `0` when absent
    fn get_int(&self, node: &str, attr: &str) -> i64 {
        self.attribute(node, attr)
            .and_then(|v| v.as_int())
            .unwrap_or(0)
    }

    /// Float attribute, `0.0` when absent
    fn get_float(&self, node: &str, attr: &str) -> f64 {
        self.attribute(node, attr)
            .and_then(|v| v.as_float())
            .unwrap_or(0.0)
    }

    /// Color attribute, black when absent
    fn get_color(&self, node: &str, attr: &str) -> [f64; 3] {
        self.attribute(node, attr)
            .and_then(|v| v.as_color())
            .unwrap_or([0.0; 3])
    }

    /// String attribute, empty when absent
    fn get_string(&self, node: &str, attr: &str) -> String {
        match self.attribute(node, attr) {
            Some(AttrValue::String(s)) => s,
            _ => String::new(),
        }
    }

    /// Matrix attribute, identity when absent
    fn get_matrix(&self, node: &str, attr: &str) -> [f64; 16] {
        match self.attribute(node, attr) {
            Some(AttrValue::Matrix(m)) => m,
            _ => IDENTITY,
        }
    }
}

/// Row-major identity
pub const IDENTITY: [f64; 16] = [
    1.0, 0.0, 0.0, 0.0, //
    0.0, 1.0, 0.0, 0.0, //
    0.0, 0.0, 1.0, 0.0, //
    0.0, 0.0, 0.0, 1.0,
];

/// Kind of geometry under a renderable transform
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShapeKind {
    /// Polygon mesh
    Mesh,
    /// Hair system
    Hair,
}

impl ShapeKind {
    /// Host node type of the shape
    pub const fn host_type(self) -> &'static str {
        match self {
            Self::Mesh => "mesh",
            Self::Hair => "hairSystem",
        }
    }

    /// `type` attribute of the emitted shape element
    pub const fn shape_type(self) -> &'static str {
        match self {
            Self::Mesh => "obj",
            Self::Hair => "hair",
        }
    }

    /// Shape kind for a host node type
    pub fn from_host_type(node_type: &str) -> Option<Self> {
        match node_type {
            "mesh" => Some(Self::Mesh),
            "hairSystem" => Some(Self::Hair),
            _ => None,
        }
    }
}

/// Writes geometry side artifacts
pub trait GeometryExporter {
    /// Export the geometry under `transform` into `dir`, returning the file
    fn export(&mut self, transform: &str, kind: ShapeKind, dir: &Path) -> Result<PathBuf, String>;
}

/// Geometry collaborator that only plans file names without writing them
#[derive(Debug, Default, Clone)]
pub struct PlannedGeometry;

impl GeometryExporter for PlannedGeometry {
    fn export(&mut self, transform: &str, _kind: ShapeKind, dir: &Path) -> Result<PathBuf, String> {
        Ok(dir.join(format!("{}.obj", sanitize_name(transform))))
    }
}

/// Make a DAG path safe for file and element names
pub fn sanitize_name(name: &str) -> String {
    name.replace([':', '|'], "__")
}

//! In-memory scene host
//!
//! A [`SceneSnapshot`] is a flat dump of host state: typed nodes with their
//! parents and ordered attributes, plus `node.attr -> node.attr` connections.
//! It loads from `.ron`/`.toml` through the [`Config`] trait.

use serde::{Deserialize, Serialize};

use super::{AttrValue, NodeCategory, Plug, SceneHost};
use crate::config::Config;

/// One host node
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeRecord {
    /// Unique node name (DAG path for DAG nodes)
    pub name: String,
    /// Host type tag
    pub node_type: String,
    /// Parent transforms
    #[serde(default)]
    pub parents: Vec<String>,
    /// Attributes in declaration order
    #[serde(default)]
    pub attributes: Vec<(String, AttrValue)>,
}

impl NodeRecord {
    /// Create a node with no parents or attributes
    pub fn new(name: impl Into<String>, node_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            node_type: node_type.into(),
            parents: Vec::new(),
            attributes: Vec::new(),
        }
    }

    /// Add a parent
    #[must_use]
    pub fn with_parent(mut self, parent: impl Into<String>) -> Self {
        self.parents.push(parent.into());
        self
    }

    /// Set an attribute, keeping its original position when it exists
    #[must_use]
    pub fn with_attr(mut self, name: impl Into<String>, value: AttrValue) -> Self {
        self.set(name, value);
        self
    }

    /// Set an attribute in place
    pub fn set(&mut self, name: impl Into<String>, value: AttrValue) {
        let name = name.into();
        match self.attributes.iter_mut().find(|(n, _)| *n == name) {
            Some(slot) => slot.1 = value,
            None => self.attributes.push((name, value)),
        }
    }

    /// Look up an attribute
    pub fn get(&self, name: &str) -> Option<&AttrValue> {
        self.attributes
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v)
    }

    /// Category derived from the type tag
    pub fn category(&self) -> Option<NodeCategory> {
        let ty = self.node_type.as_str();
        if ty == "camera" {
            Some(NodeCategory::Camera)
        } else if ty == "transform" {
            Some(NodeCategory::Transform)
        } else if ty.ends_with("Light") && ty.starts_with(|c: char| c.is_ascii_lowercase()) {
            Some(NodeCategory::Light)
        } else {
            None
        }
    }
}

/// A directed connection between two plugs
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Connection {
    /// Upstream output
    pub from: Plug,
    /// Downstream input
    pub to: Plug,
}

/// Host state captured in memory
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneSnapshot {
    /// Frame the snapshot was taken at
    pub current_frame: f64,
    /// Nodes in scene order
    pub nodes: Vec<NodeRecord>,
    /// Plug connections
    pub connections: Vec<Connection>,
}

impl SceneSnapshot {
    /// Create an empty snapshot at `frame`
    pub fn new(frame: f64) -> Self {
        Self {
            current_frame: frame,
            ..Self::default()
        }
    }

    /// Add a node
    #[must_use]
    pub fn with_node(mut self, node: NodeRecord) -> Self {
        self.add_node(node);
        self
    }

    /// Add a connection given as `node.attr` specs
    ///
    /// Malformed specs are ignored with a warning.
    #[must_use]
    pub fn with_connection(mut self, from: &str, to: &str) -> Self {
        self.connect(from, to);
        self
    }

    /// Add or replace a node by name
    pub fn add_node(&mut self, node: NodeRecord) {
        match self.nodes.iter_mut().find(|n| n.name == node.name) {
            Some(slot) => *slot = node,
            None => self.nodes.push(node),
        }
    }

    /// Add a connection given as `node.attr` specs, returning whether it parsed
    pub fn connect(&mut self, from: &str, to: &str) -> bool {
        match (Plug::parse(from), Plug::parse(to)) {
            (Some(from), Some(to)) => {
                self.connections.retain(|c| c.to != to);
                self.connections.push(Connection { from, to });
                true
            }
            _ => {
                log::warn!("Ignoring malformed connection {from} -> {to}");
                false
            }
        }
    }

    /// Mutable access to a node
    pub fn node_mut(&mut self, name: &str) -> Option<&mut NodeRecord> {
        self.nodes.iter_mut().find(|n| n.name == name)
    }

    /// Look up a node
    pub fn node(&self, name: &str) -> Option<&NodeRecord> {
        self.nodes.iter().find(|n| n.name == name)
    }
}

impl Config for SceneSnapshot {}

impl SceneHost for SceneSnapshot {
    fn node_type(&self, node: &str) -> Option<String> {
        self.node(node).map(|n| n.node_type.clone())
    }

    fn attribute(&self, node: &str, attr: &str) -> Option<AttrValue> {
        self.node(node)?.get(attr).cloned()
    }

    fn attribute_names(&self, node: &str) -> Vec<String> {
        self.node(node)
            .map(|n| n.attributes.iter().map(|(name, _)| name.clone()).collect())
            .unwrap_or_default()
    }

    fn source(&self, node: &str, attr: &str) -> Option<Plug> {
        self.connections
            .iter()
            .find(|c| c.to.node == node && c.to.attribute == attr)
            .map(|c| c.from.clone())
    }

    fn destinations(&self, node: &str) -> Vec<Plug> {
        self.connections
            .iter()
            .filter(|c| c.from.node == node)
            .map(|c| c.to.clone())
            .collect()
    }

    fn nodes_in_category(&self, category: NodeCategory) -> Vec<String> {
        self.nodes
            .iter()
            .filter(|n| n.category() == Some(category))
            .map(|n| n.name.clone())
            .collect()
    }

    fn nodes_of_type(&self, node_type: &str) -> Vec<String> {
        self.nodes
            .iter()
            .filter(|n| n.node_type == node_type)
            .map(|n| n.name.clone())
            .collect()
    }

    fn parents(&self, node: &str) -> Vec<String> {
        self.node(node).map(|n| n.parents.clone()).unwrap_or_default()
    }

    fn children(&self, node: &str) -> Vec<String> {
        self.nodes
            .iter()
            .filter(|n| n.parents.iter().any(|p| p == node))
            .map(|n| n.name.clone())
            .collect()
    }

    fn current_frame(&self) -> f64 {
        self.current_frame
    }
}

impl TryFrom<String> for Plug {
    type Error = String;

    fn try_from(spec: String) -> Result<Self, Self::Error> {
        Plug::parse(&spec).ok_or_else(|| format!("expected node.attribute, got '{spec}'"))
    }
}

impl From<Plug> for String {
    fn from(plug: Plug) -> Self {
        format!("{}.{}", plug.node, plug.attribute)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> SceneSnapshot {
        SceneSnapshot::new(12.0)
            .with_node(NodeRecord::new("|cam", "transform"))
            .with_node(NodeRecord::new("|cam|camShape", "camera").with_parent("|cam"))
            .with_node(NodeRecord::new("|key|keyShape", "spotLight").with_parent("|key"))
            .with_node(NodeRecord::new("env", "CyclesEnvironmentLight"))
            .with_node(
                NodeRecord::new("plastic1", "CyclesPlasticShader")
                    .with_attr("nonlinear", AttrValue::Bool(true))
                    .with_attr("diffuseReflectance", AttrValue::Float3([0.5; 3])),
            )
            .with_node(NodeRecord::new("file1", "file"))
            .with_connection("file1.outColor", "plastic1.diffuseReflectance")
    }

    #[test]
    fn test_queries() {
        let scene = sample();

        assert_eq!(scene.node_type("plastic1").as_deref(), Some("CyclesPlasticShader"));
        assert_eq!(scene.attribute_names("plastic1"), ["nonlinear", "diffuseReflectance"]);
        assert!(scene.get_bool("plastic1", "nonlinear"));
        assert_eq!(scene.get_float("plastic1", "missing"), 0.0);
        assert_eq!(
            scene.source("plastic1", "diffuseReflectance"),
            Some(Plug::new("file1", "outColor"))
        );
        assert!(!scene.is_connected("plastic1", "nonlinear"));
        assert_eq!(scene.destinations("file1").len(), 1);
        assert_eq!(scene.children("|cam"), ["|cam|camShape"]);
        assert_eq!(scene.current_frame(), 12.0);
    }

    #[test]
    fn test_categories() {
        let scene = sample();

        assert_eq!(scene.nodes_in_category(NodeCategory::Camera), ["|cam|camShape"]);
        assert_eq!(scene.nodes_in_category(NodeCategory::Light), ["|key|keyShape"]);
        assert_eq!(scene.nodes_in_category(NodeCategory::Transform), ["|cam"]);
        assert_eq!(scene.nodes_of_type("CyclesEnvironmentLight"), ["env"]);
    }

    #[test]
    fn test_reconnect_replaces_source() {
        let mut scene = sample().with_node(NodeRecord::new("file2", "file"));
        assert!(scene.connect("file2.outColor", "plastic1.diffuseReflectance"));
        assert!(!scene.connect("bogus", "plastic1.nonlinear"));

        assert_eq!(scene.connections.len(), 1);
        assert_eq!(
            scene.source("plastic1", "diffuseReflectance").map(|p| p.node),
            Some("file2".to_string())
        );
    }

    #[test]
    fn test_ron_snapshot() {
        let text = r#"(
            current_frame: 3.0,
            nodes: [
                (name: "lambert1", node_type: "CyclesDiffuseShader",
                 attributes: [("reflectance", Float3((0.5, 0.5, 0.5)))]),
                (name: "file1", node_type: "file",
                 attributes: [("fileTextureName", String("tex.1001.png"))]),
            ],
            connections: [(from: "file1.outColor", to: "lambert1.reflectance")],
        )"#;

        let scene: SceneSnapshot = ron::from_str(text).unwrap();
        assert_eq!(scene.get_color("lambert1", "reflectance"), [0.5; 3]);
        assert_eq!(scene.get_string("file1", "fileTextureName"), "tex.1001.png");
        assert_eq!(scene.source("lambert1", "reflectance").map(|p| p.node).as_deref(), Some("file1"));
    }
}

//! Shader network walker
//!
//! Flattens a host shading network into a node-network `shader` element:
//! one element per reachable node plus explicit `connect` elements for the
//! socket wiring.
//!
//! The traversal is depth-first and dependency-first. Every upstream node
//! appears before the `connect` that references it, and each node's own
//! element comes after everything it depends on. A node reached along two
//! paths (a texture feeding two inputs) is emitted once and wired twice. A
//! node reached again along the current path is a cycle: it is reported
//! and not re-entered, but its connection is kept as if it were already
//! emitted, so the back edge is the one `connect` that precedes its source.

use std::collections::HashSet;

use crate::diagnostics::DiagnosticKind;
use crate::element::{format_float, format_floats, kinds, Element};
use crate::host::AttrValue;
use crate::materials::attributes::{file_texture_name, FILE_NODE};
use crate::scene::ExportContext;

/// Socket used for node types missing from the table
pub const DEFAULT_SOCKET: &str = "color";

/// How one host node type appears in a network
#[derive(Debug)]
pub struct NetworkNode {
    /// Host node type
    pub node_type: &'static str,
    /// Element kind emitted for the node
    pub element_kind: &'static str,
    /// Output socket name used in connections
    pub socket: &'static str,
    /// Attributes written inline when unconnected
    pub constants: &'static [&'static str],
}

/// Node types the walker understands
pub static NETWORK_NODES: [NetworkNode; 6] = [
    NetworkNode {
        node_type: "CyclesMixtureShader",
        element_kind: "mix_closure",
        socket: "closure",
        constants: &["fac"],
    },
    NetworkNode {
        node_type: "CyclesDiffuseShader",
        element_kind: "diffuse_bsdf",
        socket: "bsdf",
        constants: &["color"],
    },
    NetworkNode {
        node_type: "CyclesSubsurfaceShader",
        element_kind: "subsurface_scattering",
        socket: "bssrdf",
        constants: &["color", "radius", "scale"],
    },
    NetworkNode {
        node_type: "CyclesGlossyShader",
        element_kind: "glossy_bsdf",
        socket: "bsdf",
        constants: &["color", "roughness"],
    },
    NetworkNode {
        node_type: "CyclesEmissionShader",
        element_kind: "emission",
        socket: "emission",
        constants: &["color", "strength"],
    },
    NetworkNode {
        node_type: FILE_NODE,
        element_kind: "image_texture",
        socket: "color",
        constants: &[],
    },
];

/// Table entry for a host node type
pub fn network_node(node_type: &str) -> Option<&'static NetworkNode> {
    NETWORK_NODES.iter().find(|n| n.node_type == node_type)
}

/// Output socket of a host node type
pub fn output_socket(node_type: &str) -> &'static str {
    network_node(node_type).map_or(DEFAULT_SOCKET, |n| n.socket)
}

/// Whether the walker can emit `node_type`
pub fn is_network_node(node_type: &str) -> bool {
    network_node(node_type).is_some()
}

/// Flatten the network rooted at `root` in dependency order
pub fn walk(ctx: &mut ExportContext<'_>, root: &str) -> Vec<Element> {
    let mut walker = Walker {
        ctx,
        emitted: HashSet::new(),
        path: Vec::new(),
        elements: Vec::new(),
    };
    walker.visit(root);
    walker.elements
}

/// Wrap the network of `material` in `shader name=<name>_shader`
///
/// The last child connects the root's output socket to `output surface`.
/// Returns `None` when nothing in the network could be emitted.
pub fn shader_network(ctx: &mut ExportContext<'_>, material: &str, name: &str) -> Option<Element> {
    let elements = walk(ctx, material);
    if elements.is_empty() {
        return None;
    }

    let socket = output_socket(&ctx.host().node_type(material).unwrap_or_default());
    Some(
        Element::of("shader")
            .with_attribute("name", shader_name(name))
            .with_children(elements)
            .with_child(kinds::connect(format!("{material} {socket}"), "output surface")),
    )
}

/// Name of the shader element built for `material`
pub fn shader_name(material: &str) -> String {
    format!("{material}_shader")
}

struct Walker<'c, 'a> {
    ctx: &'c mut ExportContext<'a>,
    emitted: HashSet<String>,
    path: Vec<String>,
    elements: Vec<Element>,
}

impl Walker<'_, '_> {
    /// Emit `node` and its dependencies; returns whether `node` is available
    /// as a connection source
    fn visit(&mut self, node: &str) -> bool {
        if self.emitted.contains(node) {
            return true;
        }
        if self.path.iter().any(|n| n == node) {
            self.ctx.warn(
                DiagnosticKind::ShaderCycle,
                format!("Shader network revisits {node}; not following it again"),
            );
            // Still on the path, so it is emitted once the recursion unwinds
            return true;
        }

        let host = self.ctx.host();
        let node_type = host.node_type(node).unwrap_or_default();
        let Some(entry) = network_node(&node_type) else {
            self.ctx.warn(
                DiagnosticKind::UnsupportedShader,
                format!("Skipping unsupported network node {node} of type '{node_type}'"),
            );
            return false;
        };

        self.path.push(node.to_string());

        let mut element = Element::of(entry.element_kind);
        if entry.node_type == FILE_NODE {
            element.set_attribute("filename", file_texture_name(self.ctx, node));
        } else {
            for attr in host.attribute_names(node) {
                let Some(source) = host.source(node, &attr) else {
                    continue;
                };
                if self.visit(&source.node) {
                    let socket = output_socket(&host.node_type(&source.node).unwrap_or_default());
                    self.elements.push(kinds::connect(
                        format!("{} {socket}", source.node),
                        format!("{node} {attr}"),
                    ));
                }
            }

            for attr in entry.constants {
                if host.is_connected(node, attr) {
                    continue;
                }
                if let Some(value) = host.attribute(node, attr) {
                    element.set_attribute(*attr, format_value(&value));
                }
            }
        }
        element.set_attribute("name", node);

        log::debug!("Network node {node} -> {}", entry.element_kind);
        self.path.pop();
        self.emitted.insert(node.to_string());
        self.elements.push(element);
        true
    }
}

fn format_value(value: &AttrValue) -> String {
    match value {
        AttrValue::Bool(b) => b.to_string(),
        AttrValue::Int(i) => i.to_string(),
        AttrValue::Float(f) => format_float(*f),
        AttrValue::Float2(v) => format_floats(v),
        AttrValue::Float3(v) => format_floats(v),
        AttrValue::Int3(v) => v.map(|i| i.to_string()).join(" "),
        AttrValue::Matrix(m) => format_floats(m),
        AttrValue::String(s) => s.clone(),
    }
}

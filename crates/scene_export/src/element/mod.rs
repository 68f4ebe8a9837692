//! Element tree model
//!
//! Every piece of exported scene description (materials, lights, sensors,
//! parameters, graph connections and the scene root) is an [`Element`]: a
//! kind tag, insertion-ordered string attributes and ordered children.
//! Numeric and boolean formatting happens in [`params`], never here.

pub mod kinds;
pub mod params;

use crate::error::ElementError;

pub use kinds::SceneKind;
pub use params::{format_float, format_floats, Axis, ColorSpace};

/// A tagged tree node of scene description output
///
/// Each element owns its children exclusively. Setting an existing
/// attribute replaces the value in place, keeping its original position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    kind: String,
    attributes: Vec<(String, String)>,
    children: Vec<Element>,
}

impl Element {
    /// Create an element, rejecting an empty kind
    pub fn try_new(kind: impl Into<String>) -> Result<Self, ElementError> {
        let kind = kind.into();
        if kind.is_empty() {
            return Err(ElementError::EmptyKind);
        }
        Ok(Self {
            kind,
            attributes: Vec::new(),
            children: Vec::new(),
        })
    }

    /// Create an element with an initial attribute set
    pub fn with_attributes<K, V, I>(kind: impl Into<String>, attributes: I) -> Result<Self, ElementError>
    where
        K: Into<String>,
        V: Into<String>,
        I: IntoIterator<Item = (K, V)>,
    {
        let mut element = Self::try_new(kind)?;
        for (key, value) in attributes {
            element.set_attribute(key, value);
        }
        Ok(element)
    }

    /// Create an element from a fixed vocabulary kind
    pub(crate) fn of(kind: &'static str) -> Self {
        debug_assert!(!kind.is_empty());
        Self {
            kind: kind.to_string(),
            attributes: Vec::new(),
            children: Vec::new(),
        }
    }

    /// Kind tag
    pub fn kind(&self) -> &str {
        &self.kind
    }

    /// Attributes in insertion order
    pub fn attributes(&self) -> impl Iterator<Item = (&str, &str)> {
        self.attributes.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Children in order
    pub fn children(&self) -> &[Element] {
        &self.children
    }

    /// Child at `index`
    pub fn child_at(&self, index: usize) -> Option<&Element> {
        self.children.get(index)
    }

    /// Whether the element serializes as a self-closing tag
    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    /// Append a child
    pub fn add_child(&mut self, child: Element) {
        self.children.push(child);
    }

    /// Append several children in order
    pub fn add_children(&mut self, children: impl IntoIterator<Item = Element>) {
        self.children.extend(children);
    }

    /// Keep only the children matching `keep`
    pub fn retain_children(&mut self, keep: impl FnMut(&Element) -> bool) {
        self.children.retain(keep);
    }

    /// Set an attribute, replacing an existing value in place
    pub fn set_attribute(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();
        match self.attributes.iter_mut().find(|(k, _)| *k == key) {
            Some(slot) => slot.1 = value,
            None => self.attributes.push((key, value)),
        }
    }

    /// Remove an attribute, returning its value if it was present
    pub fn remove_attribute(&mut self, key: &str) -> Option<String> {
        let index = self.attributes.iter().position(|(k, _)| k == key)?;
        Some(self.attributes.remove(index).1)
    }

    /// Look up an attribute value
    pub fn get_attribute(&self, key: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Builder form of [`Element::set_attribute`]
    #[must_use]
    pub fn with_attribute(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.set_attribute(key, value);
        self
    }

    /// Builder form of [`Element::add_child`]
    #[must_use]
    pub fn with_child(mut self, child: Element) -> Self {
        self.add_child(child);
        self
    }

    /// Builder form of [`Element::add_children`]
    #[must_use]
    pub fn with_children(mut self, children: impl IntoIterator<Item = Element>) -> Self {
        self.add_children(children);
        self
    }

    /// Set the `id` attribute
    #[must_use]
    pub fn with_id(self, id: impl Into<String>) -> Self {
        self.with_attribute("id", id)
    }

    /// First direct child with the given `name` attribute
    pub fn named_child(&self, name: &str) -> Option<&Element> {
        self.children
            .iter()
            .find(|c| c.get_attribute("name") == Some(name))
    }

    /// All descendants in pre-order, excluding `self`
    pub fn descendants(&self) -> Vec<&Element> {
        let mut out = Vec::new();
        self.collect_descendants(&mut out);
        out
    }

    fn collect_descendants<'a>(&'a self, out: &mut Vec<&'a Element>) {
        for child in &self.children {
            out.push(child);
            child.collect_descendants(out);
        }
    }
}

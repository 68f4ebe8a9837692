//! Markup writer for element trees
//!
//! Output is tab-indented with one element per line. Leaves self-close,
//! and every element directly under the root is followed by a blank line
//! to keep top-level blocks apart. Attributes keep insertion order.
//!
//! Documents are rendered fully in memory and then written to a temporary
//! sibling that is renamed over the destination, so a failed write never
//! leaves a truncated scene behind.

use std::borrow::Cow;
use std::fmt::Write as _;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::element::Element;
use crate::error::ExportError;

/// First line of every document
pub const XML_DECLARATION: &str = "<?xml version='1.0' encoding='utf-8'?>\n";

/// Depth whose elements get a trailing blank line
const GROUPED_DEPTH: usize = 1;

/// Escape an attribute value
pub fn escape(value: &str) -> Cow<'_, str> {
    if !value.contains(['&', '"', '<', '>']) {
        return Cow::Borrowed(value);
    }

    let mut escaped = String::with_capacity(value.len() + 8);
    for c in value.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '"' => escaped.push_str("&quot;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            other => escaped.push(other),
        }
    }
    Cow::Owned(escaped)
}

fn render_into(out: &mut String, element: &Element, depth: usize) {
    let indent = "\t".repeat(depth);
    out.push_str(&indent);
    out.push('<');
    out.push_str(element.kind());
    for (key, value) in element.attributes() {
        // Writing into a String cannot fail
        let _ = write!(out, " {key}=\"{}\"", escape(value));
    }

    if element.is_leaf() {
        out.push_str("/>\n");
    } else {
        out.push_str(">\n");
        for child in element.children() {
            render_into(out, child, depth + 1);
        }
        let _ = writeln!(out, "{indent}</{}>", element.kind());
    }

    if depth == GROUPED_DEPTH {
        out.push('\n');
    }
}

/// Render `element` at `depth` without the declaration
pub fn render(element: &Element, depth: usize) -> String {
    let mut out = String::new();
    render_into(&mut out, element, depth);
    out
}

/// Serialize `element` at `depth` into `stream`
pub fn serialize<W: io::Write>(element: &Element, stream: &mut W, depth: usize) -> io::Result<()> {
    stream.write_all(render(element, depth).as_bytes())
}

/// Full document text: declaration followed by the root element
pub fn to_document(root: &Element) -> String {
    let mut out = String::from(XML_DECLARATION);
    render_into(&mut out, root, 0);
    out
}

fn temporary_sibling(path: &Path) -> PathBuf {
    let name = path
        .file_name()
        .map_or_else(|| "scene".to_string(), |name| name.to_string_lossy().into_owned());
    path.with_file_name(format!(".{name}.tmp"))
}

/// Write the document for `root` to `path`
pub fn write_document(root: &Element, path: &Path) -> Result<(), ExportError> {
    let document = to_document(root);
    let temporary = temporary_sibling(path);

    if let Err(err) = fs::write(&temporary, document.as_bytes()) {
        let _ = fs::remove_file(&temporary);
        return Err(ExportError::io(temporary, err));
    }

    fs::rename(&temporary, path).map_err(|err| {
        let _ = fs::remove_file(&temporary);
        ExportError::io(path, err)
    })?;

    log::info!("Wrote scene {} ({} bytes)", path.display(), document.len());
    Ok(())
}

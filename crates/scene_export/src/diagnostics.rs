//! Non-fatal export diagnostics
//!
//! Unsupported constructs never abort an export. They are logged through
//! `log::warn!` and collected here so callers can inspect what was skipped
//! or defaulted.

use std::fmt;

/// Category of a recorded diagnostic
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DiagnosticKind {
    /// Shader node type with no translator
    UnsupportedShader,
    /// UI label missing from its preset table
    UnknownPreset,
    /// No renderable camera, or no camera at all
    MissingCamera,
    /// A required file or connection is absent
    MissingResource,
    /// More than one environment light is active
    EnvironmentConflict,
    /// A shader graph revisits a node on the current path
    ShaderCycle,
    /// A texture name cannot take a frame number
    MalformedFilename,
}

/// One recorded diagnostic
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    /// Category
    pub kind: DiagnosticKind,
    /// Human readable detail
    pub message: String,
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}: {}", self.kind, self.message)
    }
}

/// Export-scoped diagnostic collector
#[derive(Debug, Clone, Default)]
pub struct Diagnostics {
    entries: Vec<Diagnostic>,
}

impl Diagnostics {
    /// Create an empty collector
    pub fn new() -> Self {
        Self::default()
    }

    /// Record and log a diagnostic
    pub fn warn(&mut self, kind: DiagnosticKind, message: impl Into<String>) {
        let diagnostic = Diagnostic {
            kind,
            message: message.into(),
        };
        log::warn!("{diagnostic}");
        self.entries.push(diagnostic);
    }

    /// Number of recorded diagnostics
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether nothing was recorded
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Recorded diagnostics in order
    pub fn iter(&self) -> impl Iterator<Item = &Diagnostic> {
        self.entries.iter()
    }

    /// Number of diagnostics of one kind
    pub fn count(&self, kind: DiagnosticKind) -> usize {
        self.entries.iter().filter(|d| d.kind == kind).count()
    }

    /// Whether any diagnostic of `kind` was recorded
    pub fn has(&self, kind: DiagnosticKind) -> bool {
        self.count(kind) > 0
    }

    /// Consume into the recorded list
    pub fn into_vec(self) -> Vec<Diagnostic> {
        self.entries
    }
}

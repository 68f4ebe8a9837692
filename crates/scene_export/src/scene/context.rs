//! Export-scoped state shared by every translator

use crate::config::ExportConfig;
use crate::diagnostics::{DiagnosticKind, Diagnostics};
use crate::host::SceneHost;

/// State for one export call
///
/// Owns the diagnostics collector and the material translation stack used
/// to break cycles through nested BSDF connections.
pub struct ExportContext<'a> {
    host: &'a dyn SceneHost,
    config: &'a ExportConfig,
    frame: f64,
    pub(crate) diagnostics: Diagnostics,
    translating: Vec<String>,
}

impl<'a> ExportContext<'a> {
    /// Create a context at the host's current frame
    pub fn new(host: &'a dyn SceneHost, config: &'a ExportConfig) -> Self {
        Self {
            host,
            config,
            frame: host.current_frame(),
            diagnostics: Diagnostics::new(),
            translating: Vec::new(),
        }
    }

    /// Override the frame used for sequence substitution and scramble seeds
    #[must_use]
    pub fn with_frame(mut self, frame: f64) -> Self {
        self.frame = frame;
        self
    }

    /// Host being exported
    pub fn host(&self) -> &'a dyn SceneHost {
        self.host
    }

    /// Export configuration
    pub fn config(&self) -> &'a ExportConfig {
        self.config
    }

    /// Frame being exported
    pub fn frame(&self) -> f64 {
        self.frame
    }

    /// Integral frame number
    pub fn frame_number(&self) -> i64 {
        self.frame as i64
    }

    /// Diagnostics recorded so far
    pub fn diagnostics(&self) -> &Diagnostics {
        &self.diagnostics
    }

    /// Consume into the recorded diagnostics
    pub fn into_diagnostics(self) -> Diagnostics {
        self.diagnostics
    }

    /// Record a non-fatal diagnostic
    pub fn warn(&mut self, kind: DiagnosticKind, message: impl Into<String>) {
        self.diagnostics.warn(kind, message);
    }

    /// Push `node` onto the translation stack
    ///
    /// Returns `false` without pushing when `node` is already being
    /// translated further up the stack.
    pub(crate) fn enter(&mut self, node: &str) -> bool {
        if self.translating.iter().any(|n| n == node) {
            return false;
        }
        self.translating.push(node.to_string());
        true
    }

    /// Pop `node` from the translation stack
    pub(crate) fn leave(&mut self, node: &str) {
        if self.translating.last().map(String::as_str) == Some(node) {
            self.translating.pop();
        }
    }
}

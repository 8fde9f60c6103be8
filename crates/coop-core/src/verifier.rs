//! Non-fatal diagnostics - lookup fallbacks and inputs flagged for review
//!
//! Validation failures are `Error`s and stop the call. Everything collected
//! here is a warning: the record is still produced, but an operator may
//! want to look at it.
//!
//! # Review checks
//!
//! 1. **Lookup fallback** - a catalog value was unknown and the configured
//!    policy substituted null
//! 2. **Ambiguous outcome** - the wave-clear rule has more than one branch
//!    that could describe the run

use tracing::warn;

use crate::schema::cursor::FieldPath;
use crate::schema::model::HistoryDetail;

/// Category of a warning
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DiagnosticKind {
    LookupFallback,
    AmbiguousOutcome,
}

impl std::fmt::Display for DiagnosticKind {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            DiagnosticKind::LookupFallback => write!(f, "lookup-fallback"),
            DiagnosticKind::AmbiguousOutcome => write!(f, "ambiguous-outcome"),
        }
    }
}

/// A single warning
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct Diagnostic {
    pub kind: DiagnosticKind,
    pub path: FieldPath,
    pub message: String,
}

impl std::fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "warning [{}] at {}: {}", self.kind, self.path, self.message)
    }
}

/// Warnings accumulated over one normalization call
#[derive(Debug, Clone, Default)]
pub struct Diagnostics {
    diagnostics: Vec<Diagnostic>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_warning(&mut self, kind: DiagnosticKind, path: &FieldPath, message: String) {
        warn!(%kind, %path, "{}", message);
        self.diagnostics.push(Diagnostic {
            kind,
            path: path.clone(),
            message,
        });
    }

    pub fn is_empty(&self) -> bool {
        self.diagnostics.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics.iter()
    }

    pub fn into_vec(self) -> Vec<Diagnostic> {
        self.diagnostics
    }
}

// ── Review checks ─────────────────────────────────────────

/// Flag a detail where both wave-clear branches could apply: a boss
/// encounter is present while `resultWave` carries the clear sentinel.
/// The boss branch stays authoritative.
pub fn review_detail(detail: &HistoryDetail, diagnostics: &mut Diagnostics) {
    if detail.boss_result.is_some() && detail.result_wave == 0 {
        diagnostics.add_warning(
            DiagnosticKind::AmbiguousOutcome,
            &FieldPath::root()
                .key("data")
                .key("coopHistoryDetail")
                .key("resultWave"),
            format!(
                "run {} has a boss result and resultWave 0; final wave outcome taken from the boss result",
                detail.id.uuid
            ),
        );
    }
}

//! Schema variant validators - raw JSON → intermediate model
//!
//! One validator per payload shape. Each reconciles the known producer
//! variants (key casing, symbolic vs numeric enums, nullable placements)
//! and either yields a fully validated model or fails with the offending
//! field path. A failed validation never leaves a partial model behind.

pub mod cursor;
pub mod detail;
pub mod history;
pub mod model;
pub mod primitives;
pub mod schedule;

use serde_json::Value;

use crate::config::NormalizerConfig;
use crate::lookup::LookupTables;
use crate::verifier::Diagnostics;
use crate::Result;
use model::{Payload, PayloadKind};

/// Read-only tables and config for one call, plus the warnings it collects
pub struct Context<'t> {
    pub tables: &'t LookupTables,
    pub config: &'t NormalizerConfig,
    pub diagnostics: Diagnostics,
}

impl<'t> Context<'t> {
    pub fn new(tables: &'t LookupTables, config: &'t NormalizerConfig) -> Self {
        Self {
            tables,
            config,
            diagnostics: Diagnostics::new(),
        }
    }
}

/// Validate a raw document as the given payload shape
///
/// Keys are normalized to camelCase first, so legacy snake_case producers
/// and current camelCase producers go through the same rules.
pub fn validate(kind: PayloadKind, raw: &Value, ctx: &mut Context) -> Result<Payload> {
    let normalized = primitives::camelcase_keys(raw);
    match kind {
        PayloadKind::HistorySummary => history::validate(&normalized, ctx).map(Payload::HistorySummary),
        PayloadKind::HistoryDetail => detail::validate(&normalized, ctx).map(|d| Payload::HistoryDetail(Box::new(d))),
        PayloadKind::Schedule => schedule::validate(&normalized, ctx).map(Payload::Schedule),
    }
}

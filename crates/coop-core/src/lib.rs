//! Coop Core - canonical normalization of cooperative match payloads
//!
//! Turns raw history summaries, history details and rotation schedules, in
//! whichever shape the producing client emitted them, into a small set of
//! content-addressed canonical records.
//!
//! # Architecture
//!
//! ```text
//! Raw JSON → camelCase keys → Validator → Model → Normalizer → Canonical Record
//!                                ↓                     ↓
//!                          Lookup Tables           Identifier (MD5)
//!                                ↓
//!                          Verifier → Warnings
//! ```
//!
//! # Guarantees
//!
//! - **Deterministic**: the same payload always yields the same record and id
//! - **Total**: a payload that validates always canonicalizes
//! - **Stable shape**: per-enemy arrays always have `EnemyKind::COUNT` entries
//! - **No partial output**: a rejected payload produces nothing but the error
//!
//! # Example
//!
//! ```
//! use coop_core::{LookupTables, Normalizer, NormalizerConfig};
//!
//! let tables = LookupTables::default();
//! let normalizer = Normalizer::new(&tables, NormalizerConfig::default());
//! let raw = serde_json::json!({ "normal": [], "big_run": [], "team_contest": [] });
//! let out = normalizer.normalize_schedule(&raw).unwrap();
//! assert!(out.record.is_empty());
//! ```

/// Version of this library, as reported by `coop version`
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub mod config;
pub mod engine;
pub mod error;
pub mod identifier;
pub mod lookup;
pub mod normalizer;
pub mod record;
pub mod schema;
pub mod verifier;

#[cfg(test)]
mod test_fixtures;

pub use config::{NormalizerConfig, UnknownPolicy, UnknownValuePolicy};
pub use engine::{normalize_history_detail, normalize_history_summary, normalize_schedule, Normalizer};
pub use error::{Error, ErrorKind, Result};
pub use identifier::ContentId;
pub use lookup::{BossId, BossNameTable, EnemyKind, LookupTables, Mode, Rule, Species, WeaponId, WeaponTable};
pub use record::{
    CanonicalRecord, DetailRef, HistoryDetailRecord, HistorySummaryRecord, JobResult, Normalized, PlayerRecord,
    ScheduleRecord, WaveRecord,
};
pub use schema::model::PayloadKind;
pub use verifier::{Diagnostic, DiagnosticKind};

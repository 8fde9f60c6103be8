//! Canonical records - the stable output contract
//!
//! Serialized with camelCase keys. Instants always render as
//! `2023-01-05T12:34:56.000Z`, the same form used in identifier hashing.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::identifier::ContentId;
use crate::lookup::{BossId, EnemyKind, Mode, Rule, Species, WeaponId};
use crate::schema::model::TextColor;
use crate::verifier::Diagnostic;

/// A canonical record plus what the caller needs besides it
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Normalized<T> {
    pub record: T,
    pub warnings: Vec<Diagnostic>,
    /// Distinct image URLs the payload references, in first-seen order
    pub asset_urls: Vec<String>,
}

impl<T> Normalized<T> {
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Normalized<U> {
        Normalized {
            record: f(self.record),
            warnings: self.warnings,
            asset_urls: self.asset_urls,
        }
    }
}

/// Output of a call whose payload shape was chosen at runtime
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum CanonicalRecord {
    HistorySummary(Vec<HistorySummaryRecord>),
    HistoryDetail(Box<HistoryDetailRecord>),
    Schedule(Vec<ScheduleRecord>),
}

// ── History detail ────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryDetailRecord {
    pub id: ContentId,
    pub uuid: String,
    #[serde(serialize_with = "instant::serialize")]
    pub play_time: DateTime<Utc>,
    /// `[bronze, silver, gold]`
    pub scale: [Option<u32>; 3],
    pub my_result: PlayerRecord,
    pub other_results: Vec<PlayerRecord>,
    pub job_result: JobResult,
    /// Appearances per enemy kind, in `EnemyKind` order
    pub boss_counts: [u32; EnemyKind::COUNT],
    /// Team defeats per enemy kind, in `EnemyKind` order
    pub boss_kill_counts: [u32; EnemyKind::COUNT],
    // Team totals, summed from u32 counts without overflow
    pub ikura_num: u64,
    pub golden_ikura_num: u64,
    pub golden_ikura_assist_num: u64,
    pub scenario_code: Option<String>,
    pub danger_rate: f64,
    pub wave_details: Vec<WaveRecord>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerRecord {
    pub id: ContentId,
    pub byname: String,
    pub name: String,
    pub name_id: String,
    pub nameplate: NameplateRecord,
    pub uniform: i32,
    pub species: Species,
    pub weapon_list: Vec<Option<WeaponId>>,
    pub is_myself: bool,
    pub npln_user_id: String,
    pub special_id: Option<i32>,
    pub ikura_num: u32,
    pub golden_ikura_num: u32,
    pub golden_ikura_assist_num: u32,
    pub help_count: u32,
    pub dead_count: u32,
    /// Submitter only; all null for other members
    pub boss_kill_counts: [Option<u32>; EnemyKind::COUNT],
    pub boss_kill_counts_total: u32,
    /// Uses of the player's special, one entry per wave
    pub special_counts: Vec<u32>,
    // Submitter-only fields below; null for members
    pub job_score: Option<u32>,
    pub grade_id: Option<u8>,
    pub kuma_point: Option<u32>,
    pub grade_point: Option<u32>,
    pub smell_meter: Option<u32>,
    pub job_bonus: Option<u32>,
    pub job_rate: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NameplateRecord {
    pub badges: Vec<Option<i32>>,
    pub background: BackgroundRecord,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BackgroundRecord {
    pub id: i32,
    pub text_color: TextColor,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JobResult {
    pub failure_wave: Option<i32>,
    pub is_clear: bool,
    pub boss_id: Option<BossId>,
    pub is_boss_defeated: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WaveRecord {
    pub id: ContentId,
    pub water_level: u8,
    pub event_type: u8,
    pub quota_num: Option<u32>,
    pub golden_ikura_pop_num: u32,
    pub golden_ikura_num: Option<u32>,
    pub wave_id: u8,
    pub is_clear: bool,
}

// ── Schedules ─────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleRecord {
    pub id: ContentId,
    #[serde(serialize_with = "instant::serialize_opt")]
    pub start_time: Option<DateTime<Utc>>,
    #[serde(serialize_with = "instant::serialize_opt")]
    pub end_time: Option<DateTime<Utc>>,
    pub mode: Mode,
    pub rule: Rule,
    pub boss_id: Option<BossId>,
    pub stage_id: i32,
    pub rare_weapons: Vec<WeaponId>,
    pub weapon_list: Vec<Option<WeaponId>>,
}

// ── History summary ───────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HistorySummaryRecord {
    pub schedule: ScheduleRecord,
    pub results: Vec<DetailRef>,
}

/// Pointer from a summary to the detail record the same match produces
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DetailRef {
    pub id: ContentId,
    pub uuid: String,
    #[serde(serialize_with = "instant::serialize")]
    pub play_time: DateTime<Utc>,
    pub npln_user_id: String,
}

mod instant {
    use chrono::{DateTime, Utc};
    use serde::Serializer;

    use crate::identifier::canonical_instant;

    pub fn serialize<S: Serializer>(value: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(&canonical_instant(value))
    }

    pub fn serialize_opt<S: Serializer>(value: &Option<DateTime<Utc>>, serializer: S) -> Result<S::Ok, S::Error> {
        match value {
            Some(instant) => serialize(instant, serializer),
            None => serializer.serialize_none(),
        }
    }
}

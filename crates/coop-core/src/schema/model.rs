//! Intermediate model - validated, strongly-typed projections of raw payloads
//!
//! Values of these types only come out of the validators in this module's
//! siblings, so every range and enum constraint already holds. Nothing
//! downstream re-checks primitive types.

use std::collections::HashSet;

use chrono::{DateTime, Utc};

use crate::lookup::{BossId, EnemyKind, Mode, Rule, Species, WeaponId};

/// Decoded `CoopHistoryDetail-u-<npln>:<time>_<uuid>` id
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetailId {
    pub npln_user_id: String,
    pub play_time: DateTime<Utc>,
    pub uuid: String,
}

/// Decoded `CoopPlayer-u-<npln>:<time>_<uuid>:u-<npln>` id
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayerId {
    pub play_time: DateTime<Utc>,
    pub uuid: String,
    /// The player's own account, not the submitter's
    pub npln_user_id: String,
}

/// A weapon image reference resolved through the weapon table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WeaponRef {
    /// `None` only when the unknown-value policy allowed a table miss
    pub id: Option<WeaponId>,
    pub url: String,
}

// ── History summary ───────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
pub struct HistorySummary {
    pub groups: Vec<HistoryGroup>,
}

impl HistorySummary {
    /// Weapon images of every listed match, distinct, in first-seen order
    pub fn asset_urls(&self) -> Vec<String> {
        distinct(
            self.groups
                .iter()
                .flat_map(|g| g.details.iter())
                .flat_map(|d| d.weapons.iter().map(|w| w.url.as_str())),
        )
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct HistoryGroup {
    pub start_time: Option<DateTime<Utc>>,
    pub end_time: Option<DateTime<Utc>>,
    pub mode: Mode,
    pub rule: Rule,
    pub play_count: Option<u32>,
    /// Never empty
    pub details: Vec<HistoryDetailRef>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct HistoryDetailRef {
    pub id: DetailId,
    pub weapons: Vec<WeaponRef>,
    pub stage_id: i32,
}

// ── History detail ────────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
pub struct HistoryDetail {
    pub id: DetailId,
    pub after_grade: Option<u8>,
    pub after_grade_point: Option<u32>,
    pub boss_result: Option<BossResult>,
    pub boss_results: Vec<BossResult>,
    pub stage_id: i32,
    pub danger_rate: f64,
    pub enemy_results: Vec<EnemyResult>,
    pub job_bonus: Option<u32>,
    pub job_point: Option<u32>,
    pub job_rate: Option<f64>,
    pub job_score: Option<u32>,
    pub my_result: PlayerResult,
    pub member_results: Vec<PlayerResult>,
    pub played_time: Option<DateTime<Utc>>,
    /// 0 = cleared, 1..=5 = failed at that wave, -1 = incomplete
    pub result_wave: i32,
    pub rule: Rule,
    pub scale: Option<Scale>,
    pub scenario_code: Option<String>,
    pub smell_meter: Option<u32>,
    pub wave_results: Vec<WaveResult>,
    pub weapons: Vec<WeaponRef>,
}

impl HistoryDetail {
    /// Submitter first, then the other members
    pub fn participants(&self) -> impl Iterator<Item = &PlayerResult> {
        std::iter::once(&self.my_result).chain(self.member_results.iter())
    }

    /// Weapon, special weapon and enemy images, distinct, in first-seen order.
    /// Stage images are banners and are not mirrored.
    pub fn asset_urls(&self) -> Vec<String> {
        let weapons = self.participants().flat_map(|p| p.weapons.iter().map(|w| w.url.as_str()));
        let specials = self
            .participants()
            .filter_map(|p| p.special_weapon.as_ref().map(|s| s.url.as_str()));
        let enemies = self.enemy_results.iter().map(|e| e.image_url.as_str());
        distinct(weapons.chain(specials).chain(enemies))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct BossResult {
    pub has_defeat_boss: bool,
    /// `None` when the unknown-value policy allowed an unrecognized boss
    pub boss: Option<BossId>,
    pub image_url: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct EnemyResult {
    /// `None` when the unknown-value policy allowed an unrecognized enemy
    pub enemy: Option<EnemyKind>,
    pub defeat_count: u32,
    pub team_defeat_count: u32,
    pub pop_count: u32,
    pub image_url: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct WaveResult {
    pub wave_number: u8,
    pub golden_pop_count: u32,
    pub water_level: u8,
    pub deliver_norm: Option<u32>,
    pub team_deliver_count: Option<u32>,
    /// 0 for a plain water-level wave
    pub event_wave: u8,
    pub special_weapons: Vec<i32>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Scale {
    pub gold: u32,
    pub silver: u32,
    pub bronze: u32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PlayerResult {
    pub player: Player,
    pub golden_assist_count: u32,
    pub rescued_count: u32,
    pub golden_deliver_count: u32,
    pub weapons: Vec<WeaponRef>,
    pub deliver_count: u32,
    pub defeat_enemy_count: u32,
    pub special_weapon: Option<SpecialWeapon>,
    pub rescue_count: u32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SpecialWeapon {
    pub id: i32,
    pub url: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Player {
    pub id: PlayerId,
    pub byname: String,
    pub name: String,
    pub name_id: String,
    pub nameplate: Nameplate,
    pub uniform: i32,
    pub species: Species,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Nameplate {
    pub badges: Vec<Option<i32>>,
    pub background_id: i32,
    pub text_color: TextColor,
}

#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize)]
pub struct TextColor {
    pub r: f64,
    pub g: f64,
    pub b: f64,
    pub a: f64,
}

// ── Schedules ─────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
pub struct ScheduleSet {
    /// `normal`, then `bigRun`, then `teamContest`
    pub schedules: Vec<Schedule>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Schedule {
    pub start_time: Option<DateTime<Utc>>,
    pub end_time: Option<DateTime<Utc>>,
    pub mode: Mode,
    pub rule: Rule,
    pub boss: Option<BossId>,
    pub stage_id: i32,
    pub weapons: Vec<WeaponId>,
    pub rare_weapons: Vec<WeaponId>,
}

// ── Variants ──────────────────────────────────────────────

/// Which payload shape a raw document is expected to have
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PayloadKind {
    HistorySummary,
    HistoryDetail,
    Schedule,
}

/// One validated payload, tagged by shape
#[derive(Debug, Clone, PartialEq)]
pub enum Payload {
    HistorySummary(HistorySummary),
    HistoryDetail(Box<HistoryDetail>),
    Schedule(ScheduleSet),
}

impl Payload {
    pub fn kind(&self) -> PayloadKind {
        match self {
            Payload::HistorySummary(_) => PayloadKind::HistorySummary,
            Payload::HistoryDetail(_) => PayloadKind::HistoryDetail,
            Payload::Schedule(_) => PayloadKind::Schedule,
        }
    }
}

fn distinct<'a>(urls: impl Iterator<Item = &'a str>) -> Vec<String> {
    let mut seen = HashSet::new();
    urls.filter(|url| seen.insert(*url)).map(str::to_string).collect()
}

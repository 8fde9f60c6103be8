//! Canonicalization - validated model → canonical record
//!
//! Every function here is pure and total: once a model exists, mapping it
//! cannot fail. All derived fields are computed here.
//!
//! # Derived fields
//!
//! - **Wave clear**: without a boss encounter a wave is clear when the run
//!   cleared (`resultWave == 0`) or the wave came before the failing one.
//!   With a boss encounter every wave before the last is clear and the last
//!   one is clear only if the boss was defeated.
//! - **Per-enemy arrays**: fixed length, indexed by `EnemyKind` order.
//! - **Totals**: summed over submitter and members, or over waves.

use crate::identifier;
use crate::lookup::{EnemyKind, WeaponId};
use crate::record::{
    BackgroundRecord, DetailRef, HistoryDetailRecord, HistorySummaryRecord, JobResult, NameplateRecord,
    PlayerRecord, ScheduleRecord, WaveRecord,
};
use crate::schema::model::{
    EnemyResult, HistoryDetail, HistoryGroup, HistorySummary, PlayerResult, Schedule, ScheduleSet, WaveResult,
    WeaponRef,
};

// ── History detail ────────────────────────────────────────

pub fn canonicalize_detail(detail: &HistoryDetail) -> HistoryDetailRecord {
    let enemies = enemy_table(&detail.enemy_results);

    HistoryDetailRecord {
        id: identifier::detail_id(&detail.id.play_time, &detail.id.uuid),
        uuid: detail.id.uuid.clone(),
        play_time: detail.id.play_time,
        scale: match detail.scale {
            Some(scale) => [Some(scale.bronze), Some(scale.silver), Some(scale.gold)],
            None => [None; 3],
        },
        my_result: player_record(detail, &detail.my_result, &enemies, true),
        other_results: detail
            .member_results
            .iter()
            .map(|member| player_record(detail, member, &enemies, false))
            .collect(),
        job_result: job_result(detail),
        boss_counts: enemies.map(|e| e.map_or(0, |e| e.pop_count)),
        boss_kill_counts: enemies.map(|e| e.map_or(0, |e| e.team_defeat_count)),
        ikura_num: detail.participants().map(|p| u64::from(p.deliver_count)).sum(),
        golden_ikura_num: detail
            .wave_results
            .iter()
            .map(|w| u64::from(w.team_deliver_count.unwrap_or(0)))
            .sum(),
        golden_ikura_assist_num: detail
            .participants()
            .map(|p| u64::from(p.golden_assist_count))
            .sum(),
        scenario_code: detail.scenario_code.clone(),
        danger_rate: detail.danger_rate,
        wave_details: detail
            .wave_results
            .iter()
            .map(|wave| wave_record(detail, wave))
            .collect(),
    }
}

/// Enemy results by kind. The first entry for a kind wins; entries the
/// policy let through as unknown are skipped.
fn enemy_table(results: &[EnemyResult]) -> [Option<&EnemyResult>; EnemyKind::COUNT] {
    let mut table = [None; EnemyKind::COUNT];
    for result in results {
        if let Some(kind) = result.enemy {
            let slot = &mut table[kind.index()];
            if slot.is_none() {
                *slot = Some(result);
            }
        }
    }
    table
}

pub fn wave_is_clear(detail: &HistoryDetail, wave: &WaveResult) -> bool {
    let wave_number = i32::from(wave.wave_number);
    match &detail.boss_result {
        None => detail.result_wave == 0 || wave_number < detail.result_wave,
        Some(boss) => {
            if (wave.wave_number as usize) < detail.wave_results.len() {
                true
            } else {
                boss.has_defeat_boss
            }
        }
    }
}

fn wave_record(detail: &HistoryDetail, wave: &WaveResult) -> WaveRecord {
    WaveRecord {
        id: identifier::wave_id(&detail.id.play_time, &detail.id.uuid, wave.wave_number),
        water_level: wave.water_level,
        event_type: wave.event_wave,
        quota_num: wave.deliver_norm,
        golden_ikura_pop_num: wave.golden_pop_count,
        golden_ikura_num: wave.team_deliver_count,
        wave_id: wave.wave_number,
        is_clear: wave_is_clear(detail, wave),
    }
}

fn job_result(detail: &HistoryDetail) -> JobResult {
    JobResult {
        failure_wave: (detail.result_wave != 0).then_some(detail.result_wave),
        is_clear: detail.result_wave == 0,
        boss_id: detail.boss_result.as_ref().and_then(|b| b.boss),
        is_boss_defeated: detail.boss_result.as_ref().map(|b| b.has_defeat_boss),
    }
}

fn player_record(
    detail: &HistoryDetail,
    result: &PlayerResult,
    enemies: &[Option<&EnemyResult>; EnemyKind::COUNT],
    is_myself: bool,
) -> PlayerRecord {
    let player = &result.player;
    let special_id = result.special_weapon.as_ref().map(|s| s.id);
    // Submitter-only value, null for everyone else
    let mine = |value| if is_myself { value } else { None };

    PlayerRecord {
        id: identifier::player_id(&player.id.play_time, &player.id.uuid, &player.id.npln_user_id),
        byname: player.byname.clone(),
        name: player.name.clone(),
        name_id: player.name_id.clone(),
        nameplate: NameplateRecord {
            badges: player.nameplate.badges.clone(),
            background: BackgroundRecord {
                id: player.nameplate.background_id,
                text_color: player.nameplate.text_color,
            },
        },
        uniform: player.uniform,
        species: player.species,
        weapon_list: weapon_ids(&result.weapons),
        is_myself,
        npln_user_id: player.id.npln_user_id.clone(),
        special_id,
        ikura_num: result.deliver_count,
        golden_ikura_num: result.golden_deliver_count,
        golden_ikura_assist_num: result.golden_assist_count,
        help_count: result.rescue_count,
        dead_count: result.rescued_count,
        boss_kill_counts: if is_myself {
            enemies.map(|e| Some(e.map_or(0, |e| e.defeat_count)))
        } else {
            [None; EnemyKind::COUNT]
        },
        boss_kill_counts_total: result.defeat_enemy_count,
        special_counts: detail
            .wave_results
            .iter()
            .map(|wave| special_uses(wave, special_id))
            .collect(),
        job_score: mine(detail.job_score),
        grade_id: if is_myself { detail.after_grade } else { None },
        kuma_point: mine(detail.job_point),
        grade_point: mine(detail.after_grade_point),
        smell_meter: mine(detail.smell_meter),
        job_bonus: mine(detail.job_bonus),
        job_rate: if is_myself { detail.job_rate } else { None },
    }
}

fn special_uses(wave: &WaveResult, special_id: Option<i32>) -> u32 {
    match special_id {
        Some(id) => wave.special_weapons.iter().filter(|used| **used == id).count() as u32,
        None => 0,
    }
}

fn weapon_ids(weapons: &[WeaponRef]) -> Vec<Option<WeaponId>> {
    weapons.iter().map(|w| w.id).collect()
}

// ── Schedules ─────────────────────────────────────────────

pub fn canonicalize_schedule(schedule: &Schedule) -> ScheduleRecord {
    let weapon_list: Vec<Option<WeaponId>> = schedule.weapons.iter().copied().map(Some).collect();
    ScheduleRecord {
        id: identifier::schedule_id(
            schedule.start_time.as_ref(),
            schedule.end_time.as_ref(),
            schedule.mode,
            schedule.rule,
            schedule.stage_id,
            &weapon_list,
        ),
        start_time: schedule.start_time,
        end_time: schedule.end_time,
        mode: schedule.mode,
        rule: schedule.rule,
        boss_id: schedule.boss,
        stage_id: schedule.stage_id,
        rare_weapons: schedule.rare_weapons.clone(),
        weapon_list,
    }
}

pub fn canonicalize_schedules(set: &ScheduleSet) -> Vec<ScheduleRecord> {
    set.schedules.iter().map(canonicalize_schedule).collect()
}

// ── History summary ───────────────────────────────────────

pub fn canonicalize_history(summary: &HistorySummary) -> Vec<HistorySummaryRecord> {
    summary.groups.iter().map(history_group).collect()
}

fn history_group(group: &HistoryGroup) -> HistorySummaryRecord {
    // Validation guarantees at least one detail per group
    let (stage_id, weapon_list) = match group.details.first() {
        Some(first) => (first.stage_id, weapon_ids(&first.weapons)),
        None => (0, Vec::new()),
    };
    let schedule = ScheduleRecord {
        id: identifier::schedule_id(
            group.start_time.as_ref(),
            group.end_time.as_ref(),
            group.mode,
            group.rule,
            stage_id,
            &weapon_list,
        ),
        start_time: group.start_time,
        end_time: group.end_time,
        mode: group.mode,
        rule: group.rule,
        boss_id: None,
        stage_id,
        rare_weapons: Vec::new(),
        weapon_list,
    };
    let results = group
        .details
        .iter()
        .map(|detail| DetailRef {
            id: identifier::detail_id(&detail.id.play_time, &detail.id.uuid),
            uuid: detail.id.uuid.clone(),
            play_time: detail.id.play_time,
            npln_user_id: detail.id.npln_user_id.clone(),
        })
        .collect();
    HistorySummaryRecord { schedule, results }
}

//! History detail validator
//!
//! The deepest payload: one finished match with per-player, per-wave and
//! per-enemy results. Each numeric field has a closed domain taken from the
//! game's own mechanics and is checked here, once.

use std::ops::RangeInclusive;

use serde_json::Value;

use super::cursor::Cursor;
use super::model::{
    BossResult, EnemyResult, HistoryDetail, Nameplate, Player, PlayerResult, Scale, SpecialWeapon,
    TextColor, WaveResult, WeaponRef,
};
use super::primitives::{
    detail_id, fallback, player_id, raw_id, raw_id_i32, timestamp_field, weapon_ref, wire_enum,
};
use super::Context;
use crate::lookup::{BossId, EnemyKind, Rule, Species};
use crate::{Error, Result};

const GRADE_IDS: RangeInclusive<i64> = 0..=8;
const EVENT_IDS: RangeInclusive<i64> = 0..=8;
const RESULT_WAVES: RangeInclusive<i64> = -1..=5;
const WAVE_NUMBERS: RangeInclusive<i64> = 1..=5;
const WATER_LEVELS: RangeInclusive<i64> = 0..=2;
const SCALE_MAX: u32 = 39;

pub fn validate(raw: &Value, ctx: &mut Context) -> Result<HistoryDetail> {
    let root = Cursor::root(raw);
    let detail = root.field("data")?.field("coopHistoryDetail")?;

    let after_grade = detail
        .opt_field("afterGrade")?
        .map(|grade| id_in(&grade.field("id")?, GRADE_IDS).map(|id| id as u8))
        .transpose()?;

    let boss = detail
        .opt_field("bossResult")?
        .map(|c| boss_result(&c, ctx))
        .transpose()?;

    let boss_results = match detail.opt_field("bossResults")? {
        Some(list) => list
            .items()?
            .iter()
            .filter(|c| !c.is_null())
            .map(|c| boss_result(c, ctx))
            .collect::<Result<Vec<_>>>()?,
        None => Vec::new(),
    };

    let enemy_results = detail
        .field("enemyResults")?
        .items()?
        .iter()
        .map(|c| enemy_result(c, ctx))
        .collect::<Result<Vec<_>>>()?;

    let member_results = detail
        .field("memberResults")?
        .items()?
        .iter()
        .map(|c| player_result(c, ctx))
        .collect::<Result<Vec<_>>>()?;

    let scale = detail
        .opt_field("scale")?
        .map(|c| -> Result<Scale> {
            Ok(Scale {
                gold: c.field("gold")?.count_max(SCALE_MAX)?,
                silver: c.field("silver")?.count_max(SCALE_MAX)?,
                bronze: c.field("bronze")?.count_max(SCALE_MAX)?,
            })
        })
        .transpose()?;

    let wave_results = detail
        .field("waveResults")?
        .items()?
        .iter()
        .map(wave_result)
        .collect::<Result<Vec<_>>>()?;

    let weapons = weapon_list(&detail.field("weapons")?, ctx)?;

    Ok(HistoryDetail {
        id: detail_id(&detail.field("id")?)?,
        after_grade,
        after_grade_point: opt_count_max(&detail, "afterGradePoint", 999)?,
        boss_result: boss,
        boss_results,
        stage_id: raw_id_i32(&detail.field("coopStage")?.field("id")?)?,
        danger_rate: detail.field("dangerRate")?.f64_in(0.0, 3.33)?,
        enemy_results,
        job_bonus: opt_count_max(&detail, "jobBonus", 100)?,
        job_point: detail.opt_field("jobPoint")?.map(|c| c.count()).transpose()?,
        job_rate: detail
            .opt_field("jobRate")?
            .map(|c| c.f64_in(0.0, 3.25))
            .transpose()?,
        job_score: opt_count_max(&detail, "jobScore", 999)?,
        my_result: player_result(&detail.field("myResult")?, ctx)?,
        member_results,
        played_time: timestamp_field(&detail, "playedTime")?,
        result_wave: detail.field("resultWave")?.int_in(RESULT_WAVES)? as i32,
        rule: wire_enum(&detail.field("rule")?, "rule", Rule::from_wire)?,
        scale,
        scenario_code: detail
            .opt_field("scenarioCode")?
            .map(|c| c.str().map(str::to_string))
            .transpose()?,
        smell_meter: opt_count_max(&detail, "smellMeter", 5)?,
        wave_results,
        weapons,
    })
}

// ── Nested objects ────────────────────────────────────────

fn boss_result(cursor: &Cursor, ctx: &mut Context) -> Result<BossResult> {
    let boss = cursor.field("boss")?;
    let id_cursor = boss.field("id")?;
    let id = raw_id(&id_cursor)?;
    let resolved = match BossId::from_id(id) {
        Some(boss) => Some(boss),
        None => {
            fallback(
                ctx.config.unknown.boss,
                &mut ctx.diagnostics,
                unknown(&id_cursor, "boss", id),
            )?;
            None
        }
    };
    Ok(BossResult {
        has_defeat_boss: cursor.field("hasDefeatBoss")?.bool()?,
        boss: resolved,
        image_url: image_url(&boss)?,
    })
}

fn enemy_result(cursor: &Cursor, ctx: &mut Context) -> Result<EnemyResult> {
    let enemy = cursor.field("enemy")?;
    let id_cursor = enemy.field("id")?;
    let id = raw_id(&id_cursor)?;
    let kind = match EnemyKind::from_id(id) {
        Some(kind) => Some(kind),
        None => {
            fallback(
                ctx.config.unknown.enemy,
                &mut ctx.diagnostics,
                unknown(&id_cursor, "enemy", id),
            )?;
            None
        }
    };
    Ok(EnemyResult {
        enemy: kind,
        defeat_count: cursor.field("defeatCount")?.count()?,
        team_defeat_count: cursor.field("teamDefeatCount")?.count()?,
        pop_count: cursor.field("popCount")?.count()?,
        image_url: image_url(&enemy)?,
    })
}

fn wave_result(cursor: &Cursor) -> Result<WaveResult> {
    let event_wave = match cursor.opt_field("eventWave")? {
        Some(event) => id_in(&event.field("id")?, EVENT_IDS)? as u8,
        None => 0,
    };
    let special_weapons = cursor
        .field("specialWeapons")?
        .items()?
        .iter()
        .map(special_id)
        .collect::<Result<Vec<_>>>()?;
    Ok(WaveResult {
        wave_number: cursor.field("waveNumber")?.int_in(WAVE_NUMBERS)? as u8,
        golden_pop_count: cursor.field("goldenPopCount")?.count()?,
        water_level: cursor.field("waterLevel")?.int_in(WATER_LEVELS)? as u8,
        deliver_norm: cursor.opt_field("deliverNorm")?.map(|c| c.count()).transpose()?,
        team_deliver_count: cursor
            .opt_field("teamDeliverCount")?
            .map(|c| c.count())
            .transpose()?,
        event_wave,
        special_weapons,
    })
}

fn player_result(cursor: &Cursor, ctx: &mut Context) -> Result<PlayerResult> {
    let special_weapon = cursor
        .opt_field("specialWeapon")?
        .map(|c| -> Result<SpecialWeapon> {
            Ok(SpecialWeapon {
                id: special_id(&c)?,
                url: image_url(&c)?,
            })
        })
        .transpose()?;
    Ok(PlayerResult {
        player: player(&cursor.field("player")?)?,
        golden_assist_count: cursor.field("goldenAssistCount")?.count()?,
        rescued_count: cursor.field("rescuedCount")?.count()?,
        golden_deliver_count: cursor.field("goldenDeliverCount")?.count()?,
        weapons: weapon_list(&cursor.field("weapons")?, ctx)?,
        deliver_count: cursor.field("deliverCount")?.count()?,
        defeat_enemy_count: cursor.field("defeatEnemyCount")?.count()?,
        special_weapon,
        rescue_count: cursor.field("rescueCount")?.count()?,
    })
}

fn player(cursor: &Cursor) -> Result<Player> {
    let nameplate = cursor.field("nameplate")?;
    let background = nameplate.field("background")?;
    let color = background.field("textColor")?;
    let badges = nameplate
        .field("badges")?
        .items()?
        .iter()
        .map(|badge| {
            if badge.is_null() {
                Ok(None)
            } else {
                raw_id_i32(&badge.field("id")?).map(Some)
            }
        })
        .collect::<Result<Vec<_>>>()?;
    Ok(Player {
        id: player_id(&cursor.field("id")?)?,
        byname: cursor.field("byname")?.str()?.to_string(),
        name: cursor.field("name")?.str()?.to_string(),
        name_id: cursor.field("nameId")?.str()?.to_string(),
        nameplate: Nameplate {
            badges,
            background_id: raw_id_i32(&background.field("id")?)?,
            text_color: TextColor {
                r: color.field("r")?.f64_in(0.0, 1.0)?,
                g: color.field("g")?.f64_in(0.0, 1.0)?,
                b: color.field("b")?.f64_in(0.0, 1.0)?,
                a: color.field("a")?.f64_in(0.0, 1.0)?,
            },
        },
        uniform: raw_id_i32(&cursor.field("uniform")?.field("id")?)?,
        species: wire_enum(&cursor.field("species")?, "species", Species::from_wire)?,
    })
}

// ── Helpers ───────────────────────────────────────────────

fn weapon_list(cursor: &Cursor, ctx: &mut Context) -> Result<Vec<WeaponRef>> {
    let tables = ctx.tables;
    let policy = ctx.config.unknown.weapon_hash;
    cursor
        .items()?
        .iter()
        .map(|w| weapon_ref(w, &tables.weapons, policy, &mut ctx.diagnostics))
        .collect()
}

/// Current producers send a numeric `weaponId`; older ones only the opaque `id`
fn special_id(cursor: &Cursor) -> Result<i32> {
    match cursor.opt_field("weaponId")? {
        Some(weapon_id) => raw_id_i32(&weapon_id),
        None => raw_id_i32(&cursor.field("id")?),
    }
}

fn image_url(cursor: &Cursor) -> Result<String> {
    Ok(cursor.field("image")?.field("url")?.str()?.to_string())
}

fn id_in(cursor: &Cursor, range: RangeInclusive<i64>) -> Result<i64> {
    let id = raw_id(cursor)?;
    if !range.contains(&id) {
        return Err(Error::out_of_range(
            cursor.path(),
            format!("[{}, {}]", range.start(), range.end()),
            id,
        ));
    }
    Ok(id)
}

fn opt_count_max(cursor: &Cursor, key: &str, max: u32) -> Result<Option<u32>> {
    cursor.opt_field(key)?.map(|c| c.count_max(max)).transpose()
}

fn unknown(cursor: &Cursor, kind: &'static str, id: i64) -> Error {
    Error::UnknownEnumValue {
        path: cursor.path().clone(),
        kind,
        value: id.to_string(),
    }
}

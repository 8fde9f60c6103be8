//! Schedule validator
//!
//! A schedule document carries three rotation lists. The list a rotation
//! appears in fixes its mode and rule; nothing inside the entry says so.

use serde_json::Value;

use super::cursor::Cursor;
use super::model::{Schedule, ScheduleSet};
use super::primitives::{fallback, raw_id_i32, timestamp_field};
use super::Context;
use crate::lookup::{BossId, Mode, Rule, WeaponId};
use crate::{Error, Result};

/// Source list → (mode, rule), in output order
const ROTATIONS: [(&str, Mode, Rule); 3] = [
    ("normal", Mode::Regular, Rule::Regular),
    ("bigRun", Mode::Regular, Rule::BigRun),
    ("teamContest", Mode::Limited, Rule::TeamContest),
];

pub fn validate(raw: &Value, ctx: &mut Context) -> Result<ScheduleSet> {
    let root = Cursor::root(raw);
    let mut schedules = Vec::new();
    for (key, mode, rule) in ROTATIONS {
        for entry in root.field(key)?.items()? {
            schedules.push(schedule(&entry, mode, rule, ctx)?);
        }
    }
    Ok(ScheduleSet { schedules })
}

fn schedule(cursor: &Cursor, mode: Mode, rule: Rule, ctx: &mut Context) -> Result<Schedule> {
    Ok(Schedule {
        start_time: timestamp_field(cursor, "startTime")?,
        end_time: timestamp_field(cursor, "endTime")?,
        mode,
        rule,
        boss: big_boss(cursor, ctx)?,
        stage_id: stage_id(&cursor.field("stage")?)?,
        weapons: weapon_ids(&cursor.field("weapons")?)?,
        rare_weapons: weapon_ids(&cursor.field("rareWeapons")?)?,
    })
}

/// `bigBoss` arrives as a legacy name (`"SakeJaw"`), a numeric id, or not at all
fn big_boss(cursor: &Cursor, ctx: &mut Context) -> Result<Option<BossId>> {
    let Some(boss) = cursor.opt_field("bigBoss")? else {
        return Ok(None);
    };
    let (resolved, shown) = match boss.value() {
        Value::String(name) => (ctx.tables.bosses.resolve(name), name.clone()),
        Value::Number(_) => {
            let id = boss.int_in(i64::MIN..=i64::MAX)?;
            (BossId::from_id(id), id.to_string())
        }
        other => {
            return Err(Error::malformed(
                boss.path(),
                format!("expected boss name or id, found {}", other),
            ))
        }
    };
    if resolved.is_none() {
        fallback(
            ctx.config.unknown.boss,
            &mut ctx.diagnostics,
            Error::UnknownEnumValue {
                path: boss.path().clone(),
                kind: "boss",
                value: shown,
            },
        )?;
    }
    Ok(resolved)
}

/// Stage as a bare id or as a `{ id }` object
fn stage_id(cursor: &Cursor) -> Result<i32> {
    if cursor.value().is_object() {
        raw_id_i32(&cursor.field("id")?)
    } else {
        raw_id_i32(cursor)
    }
}

fn weapon_ids(cursor: &Cursor) -> Result<Vec<WeaponId>> {
    cursor
        .items()?
        .iter()
        .map(|c| c.int_in(i32::MIN as i64..=i32::MAX as i64).map(|id| id as WeaponId))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{NormalizerConfig, UnknownValuePolicy};
    use crate::schema::primitives::camelcase_keys;
    use crate::test_fixtures as fx;
    use crate::ErrorKind;
    use serde_json::json;

    fn run_with(raw: &Value, config: &NormalizerConfig) -> (Result<ScheduleSet>, usize) {
        let tables = fx::tables();
        let mut ctx = Context::new(&tables, config);
        let result = validate(raw, &mut ctx);
        (result, ctx.diagnostics.iter().count())
    }

    fn run(raw: &Value) -> Result<ScheduleSet> {
        run_with(raw, &NormalizerConfig::default()).0
    }

    #[test]
    fn test_rotation_lists_fix_mode_and_rule() {
        let set = run(&fx::schedule()).unwrap();
        assert_eq!(set.schedules.len(), 3);
        assert_eq!((set.schedules[0].mode, set.schedules[0].rule), (Mode::Regular, Rule::Regular));
        assert_eq!((set.schedules[2].mode, set.schedules[2].rule), (Mode::Limited, Rule::TeamContest));
        assert_eq!(set.schedules[2].start_time, None);
        assert_eq!(set.schedules[1].rare_weapons, vec![20900]);
    }

    #[test]
    fn test_boss_name_and_id_resolve_alike() {
        let set = run(&fx::schedule()).unwrap();
        assert_eq!(set.schedules[0].boss, Some(BossId::SakeJaw));
        assert_eq!(set.schedules[1].boss, Some(BossId::SakeRope));
        assert_eq!(set.schedules[2].boss, None);
    }

    #[test]
    fn test_unknown_boss_name_is_null_by_default() {
        let mut raw = fx::schedule();
        raw["normal"][0]["bigBoss"] = json!("Kraken");
        let (result, warnings) = run_with(&raw, &NormalizerConfig::default());
        assert_eq!(result.unwrap().schedules[0].boss, None);
        assert_eq!(warnings, 1);

        let strict = NormalizerConfig::default().with_unknown(UnknownValuePolicy::strict());
        let err = run_with(&raw, &strict).0.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnknownEnumValue);
        assert_eq!(err.path().unwrap().to_string(), "normal[0].bigBoss");
    }

    #[test]
    fn test_absent_boss_is_null_without_warning() {
        let mut raw = fx::schedule();
        raw["normal"][0].as_object_mut().unwrap().remove("bigBoss");
        let (result, warnings) = run_with(&raw, &NormalizerConfig::default());
        assert_eq!(result.unwrap().schedules[0].boss, None);
        assert_eq!(warnings, 0);
    }

    #[test]
    fn test_snake_case_producer_after_key_normalization() {
        let camel = run(&fx::schedule()).unwrap();
        let snake = run(&camelcase_keys(&fx::schedule_snake_case())).unwrap();
        assert_eq!(camel, snake);
    }

    #[test]
    fn test_missing_rotation_list_is_malformed() {
        let mut raw = fx::schedule();
        raw.as_object_mut().unwrap().remove("bigRun");
        let err = run(&raw).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MalformedInput);
        assert_eq!(err.path().unwrap().to_string(), "bigRun");
    }

    #[test]
    fn test_non_integer_weapon_is_malformed() {
        let mut raw = fx::schedule();
        raw["teamContest"][0]["weapons"][1] = json!("Splattershot");
        let err = run(&raw).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MalformedInput);
        assert_eq!(err.path().unwrap().to_string(), "teamContest[0].weapons[1]");
    }

    #[test]
    fn test_stage_object_form() {
        let mut raw = fx::schedule();
        raw["normal"][0]["stage"] = json!({"id": fx::opaque("CoopStage-7")});
        assert_eq!(run(&raw).unwrap().schedules[0].stage_id, 7);
    }
}

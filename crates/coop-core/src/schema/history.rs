//! History summary validator
//!
//! `data.coopResult.historyGroups` is a node list of rotation groups; each
//! group wraps its matches in a second node list that must not be empty,
//! because the group's weapons and stage are read from its first match.

use serde_json::Value;

use super::cursor::Cursor;
use super::model::{HistoryDetailRef, HistoryGroup, HistorySummary};
use super::primitives::{detail_id, node_list, raw_id_i32, timestamp_field, weapon_ref, wire_enum};
use super::Context;
use crate::lookup::{Mode, Rule};
use crate::Result;

pub fn validate(raw: &Value, ctx: &mut Context) -> Result<HistorySummary> {
    let root = Cursor::root(raw);
    let groups = root.field("data")?.field("coopResult")?.field("historyGroups")?;
    let groups = node_list(&groups, 0, |group| history_group(group, ctx))?;
    Ok(HistorySummary { groups })
}

fn history_group(cursor: &Cursor, ctx: &mut Context) -> Result<HistoryGroup> {
    let details = node_list(&cursor.field("historyDetails")?, 1, |detail| history_detail_ref(detail, ctx))?;
    Ok(HistoryGroup {
        start_time: timestamp_field(cursor, "startTime")?,
        end_time: timestamp_field(cursor, "endTime")?,
        mode: wire_enum(&cursor.field("mode")?, "mode", Mode::from_wire)?,
        rule: wire_enum(&cursor.field("rule")?, "rule", Rule::from_wire)?,
        play_count: cursor.opt_field("playCount")?.map(|c| c.count()).transpose()?,
        details,
    })
}

fn history_detail_ref(cursor: &Cursor, ctx: &mut Context) -> Result<HistoryDetailRef> {
    let tables = ctx.tables;
    let policy = ctx.config.unknown.weapon_hash;
    let weapons = cursor
        .field("weapons")?
        .items()?
        .iter()
        .map(|w| weapon_ref(w, &tables.weapons, policy, &mut ctx.diagnostics))
        .collect::<Result<Vec<_>>>()?;
    Ok(HistoryDetailRef {
        id: detail_id(&cursor.field("id")?)?,
        weapons,
        stage_id: raw_id_i32(&cursor.field("coopStage")?.field("id")?)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::NormalizerConfig;
    use crate::lookup::LookupTables;
    use crate::test_fixtures as fx;
    use crate::ErrorKind;
    use serde_json::json;

    fn run(raw: &Value) -> Result<HistorySummary> {
        let tables = fx::tables();
        let config = NormalizerConfig::default();
        let mut ctx = Context::new(&tables, &config);
        validate(raw, &mut ctx)
    }

    #[test]
    fn test_valid_summary() {
        let summary = run(&fx::history_summary()).unwrap();
        assert_eq!(summary.groups.len(), 2);
        let first = &summary.groups[0];
        assert_eq!(first.mode, Mode::Regular);
        assert_eq!(first.rule, Rule::Regular);
        assert_eq!(first.play_count, Some(2));
        assert_eq!(first.details.len(), 2);
        assert_eq!(first.details[0].stage_id, 7);
        assert_eq!(
            first.details[0].weapons.iter().map(|w| w.id).collect::<Vec<_>>(),
            fx::WEAPON_IDS.iter().map(|id| Some(*id)).collect::<Vec<_>>()
        );
        let second = &summary.groups[1];
        assert_eq!(second.start_time, None);
        assert_eq!(second.rule, Rule::TeamContest);
    }

    #[test]
    fn test_empty_history_is_valid() {
        let raw = json!({"data": {"coopResult": {"historyGroups": {"nodes": []}}}});
        assert!(run(&raw).unwrap().groups.is_empty());
    }

    #[test]
    fn test_group_without_details_is_rejected() {
        let mut raw = fx::history_summary();
        raw["data"]["coopResult"]["historyGroups"]["nodes"][1]["historyDetails"]["nodes"] = json!([]);
        let err = run(&raw).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::EmptyNodeList);
        assert_eq!(
            err.path().unwrap().to_string(),
            "data.coopResult.historyGroups.nodes[1].historyDetails.nodes"
        );
    }

    #[test]
    fn test_unknown_mode_is_rejected() {
        let mut raw = fx::history_summary();
        raw["data"]["coopResult"]["historyGroups"]["nodes"][0]["mode"] = json!("SOLO");
        let err = run(&raw).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MalformedInput);
        assert_eq!(err.path().unwrap().to_string(), "data.coopResult.historyGroups.nodes[0].mode");
    }

    #[test]
    fn test_negative_play_count_is_out_of_range() {
        let mut raw = fx::history_summary();
        raw["data"]["coopResult"]["historyGroups"]["nodes"][0]["playCount"] = json!(-1);
        assert_eq!(run(&raw).unwrap_err().kind(), ErrorKind::OutOfRangeValue);
    }

    #[test]
    fn test_lenient_weapon_policy_keeps_group() {
        let mut raw = fx::history_summary();
        raw["data"]["coopResult"]["historyGroups"]["nodes"][0]["historyDetails"]["nodes"][0]["weapons"][0] =
            fx::weapon_image(&"e".repeat(64));
        let tables = LookupTables::default();
        let strict = NormalizerConfig::default();
        let mut ctx = Context::new(&tables, &strict);
        assert_eq!(validate(&raw, &mut ctx).unwrap_err().kind(), ErrorKind::UnknownWeaponHash);

        let tables = fx::tables();
        let lenient = NormalizerConfig::default().with_unknown(crate::config::UnknownValuePolicy::lenient());
        let mut ctx = Context::new(&tables, &lenient);
        let summary = validate(&raw, &mut ctx).unwrap();
        assert_eq!(summary.groups[0].details[0].weapons[0].id, None);
        assert_eq!(ctx.diagnostics.iter().count(), 1);
    }
}

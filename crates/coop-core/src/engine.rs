//! Normalization entry points
//!
//! `Normalizer` borrows the lookup tables and owns its config. It holds no
//! per-call state, so one instance can serve any number of threads.

use serde_json::Value;
use tracing::debug;

use crate::config::NormalizerConfig;
use crate::lookup::LookupTables;
use crate::normalizer;
use crate::record::{CanonicalRecord, HistoryDetailRecord, HistorySummaryRecord, Normalized, ScheduleRecord};
use crate::schema::model::{HistoryDetail, HistorySummary, Payload, PayloadKind, ScheduleSet};
use crate::schema::{self, primitives::camelcase_keys, Context};
use crate::verifier::{self, Diagnostics};
use crate::Result;

#[derive(Debug, Clone)]
pub struct Normalizer<'t> {
    tables: &'t LookupTables,
    config: NormalizerConfig,
}

impl<'t> Normalizer<'t> {
    pub fn new(tables: &'t LookupTables, config: NormalizerConfig) -> Self {
        Self { tables, config }
    }

    pub fn config(&self) -> &NormalizerConfig {
        &self.config
    }

    /// Normalize `{ data: { coopResult: { historyGroups } } }` into one record per group
    pub fn normalize_history_summary(&self, raw: &Value) -> Result<Normalized<Vec<HistorySummaryRecord>>> {
        let (summary, diagnostics) = self.validated(raw, schema::history::validate)?;
        Ok(finish_history(&summary, diagnostics))
    }

    /// Normalize `{ data: { coopHistoryDetail } }` into one detail record
    pub fn normalize_history_detail(&self, raw: &Value) -> Result<Normalized<HistoryDetailRecord>> {
        let (detail, diagnostics) = self.validated(raw, schema::detail::validate)?;
        Ok(finish_detail(&detail, diagnostics))
    }

    /// Normalize `{ normal, bigRun, teamContest }` into one record per rotation
    pub fn normalize_schedule(&self, raw: &Value) -> Result<Normalized<Vec<ScheduleRecord>>> {
        let (set, diagnostics) = self.validated(raw, schema::schedule::validate)?;
        Ok(finish_schedule(&set, diagnostics))
    }

    /// Normalize a payload whose shape is only known at runtime
    pub fn normalize(&self, kind: PayloadKind, raw: &Value) -> Result<Normalized<CanonicalRecord>> {
        let mut ctx = Context::new(self.tables, &self.config);
        let payload = schema::validate(kind, raw, &mut ctx)?;
        let diagnostics = ctx.diagnostics;
        Ok(match payload {
            Payload::HistorySummary(summary) => {
                finish_history(&summary, diagnostics).map(CanonicalRecord::HistorySummary)
            }
            Payload::HistoryDetail(detail) => {
                finish_detail(&detail, diagnostics).map(|record| CanonicalRecord::HistoryDetail(Box::new(record)))
            }
            Payload::Schedule(set) => finish_schedule(&set, diagnostics).map(CanonicalRecord::Schedule),
        })
    }

    fn validated<M>(
        &self,
        raw: &Value,
        validate: impl FnOnce(&Value, &mut Context) -> Result<M>,
    ) -> Result<(M, Diagnostics)> {
        let mut ctx = Context::new(self.tables, &self.config);
        let model = validate(&camelcase_keys(raw), &mut ctx)?;
        Ok((model, ctx.diagnostics))
    }
}

fn finish_history(summary: &HistorySummary, diagnostics: Diagnostics) -> Normalized<Vec<HistorySummaryRecord>> {
    let records = normalizer::canonicalize_history(summary);
    debug!(
        groups = records.len(),
        matches = records.iter().map(|r| r.results.len()).sum::<usize>(),
        warnings = diagnostics.iter().count(),
        "normalized history summary"
    );
    Normalized {
        record: records,
        warnings: diagnostics.into_vec(),
        asset_urls: summary.asset_urls(),
    }
}

fn finish_detail(detail: &HistoryDetail, mut diagnostics: Diagnostics) -> Normalized<HistoryDetailRecord> {
    verifier::review_detail(detail, &mut diagnostics);
    let record = normalizer::canonicalize_detail(detail);
    debug!(
        id = %record.id,
        waves = record.wave_details.len(),
        warnings = diagnostics.iter().count(),
        "normalized history detail"
    );
    Normalized {
        record,
        warnings: diagnostics.into_vec(),
        asset_urls: detail.asset_urls(),
    }
}

fn finish_schedule(set: &ScheduleSet, diagnostics: Diagnostics) -> Normalized<Vec<ScheduleRecord>> {
    let records = normalizer::canonicalize_schedules(set);
    debug!(
        schedules = records.len(),
        warnings = diagnostics.iter().count(),
        "normalized schedule"
    );
    Normalized {
        record: records,
        warnings: diagnostics.into_vec(),
        asset_urls: Vec::new(),
    }
}

// ── Free functions ────────────────────────────────────────

pub fn normalize_history_summary(
    raw: &Value,
    tables: &LookupTables,
    config: &NormalizerConfig,
) -> Result<Normalized<Vec<HistorySummaryRecord>>> {
    Normalizer::new(tables, config.clone()).normalize_history_summary(raw)
}

pub fn normalize_history_detail(
    raw: &Value,
    tables: &LookupTables,
    config: &NormalizerConfig,
) -> Result<Normalized<HistoryDetailRecord>> {
    Normalizer::new(tables, config.clone()).normalize_history_detail(raw)
}

pub fn normalize_schedule(
    raw: &Value,
    tables: &LookupTables,
    config: &NormalizerConfig,
) -> Result<Normalized<Vec<ScheduleRecord>>> {
    Normalizer::new(tables, config.clone()).normalize_schedule(raw)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::UnknownValuePolicy;
    use crate::test_fixtures as fx;
    use crate::verifier::DiagnosticKind;
    use crate::ErrorKind;
    use serde_json::json;

    #[test]
    fn test_detail_end_to_end() {
        let tables = fx::tables();
        let normalizer = Normalizer::new(&tables, NormalizerConfig::default());
        let out = normalizer.normalize_history_detail(&fx::history_detail()).unwrap();
        assert_eq!(out.record.id.as_str(), "a239c079cb2ab76c05ba900df235b5d2");
        assert!(out.warnings.is_empty());
        // 4 weapons, 3 distinct specials, 3 enemies
        assert_eq!(out.asset_urls.len(), 10);
        assert!(out.asset_urls[0].contains("weapon_illust"));
    }

    #[test]
    fn test_detail_rejects_out_of_range_danger_rate() {
        let mut raw = fx::history_detail();
        raw["data"]["coopHistoryDetail"]["dangerRate"] = json!(5.0);
        let err = normalize_history_detail(&raw, &fx::tables(), &NormalizerConfig::default()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::OutOfRangeValue);
        assert_eq!(err.path().unwrap().to_string(), "data.coopHistoryDetail.dangerRate");
    }

    #[test]
    fn test_maximal_deliver_counts_normalize() {
        let mut raw = fx::history_detail();
        let detail = &mut raw["data"]["coopHistoryDetail"];
        detail["myResult"]["deliverCount"] = json!(u32::MAX);
        detail["memberResults"][0]["deliverCount"] = json!(u32::MAX);
        let out = normalize_history_detail(&raw, &fx::tables(), &NormalizerConfig::default()).unwrap();
        assert!(out.record.ikura_num > u64::from(u32::MAX));
    }

    #[test]
    fn test_boss_with_clear_sentinel_is_flagged() {
        let raw = fx::with_boss(fx::history_detail(), true);
        let out = normalize_history_detail(&raw, &fx::tables(), &NormalizerConfig::default()).unwrap();
        assert_eq!(out.warnings.len(), 1);
        assert_eq!(out.warnings[0].kind, DiagnosticKind::AmbiguousOutcome);
        assert!(out.record.wave_details.iter().all(|w| w.is_clear));
    }

    #[test]
    fn test_unknown_weapon_hash_fails_by_default() {
        let mut raw = fx::history_detail();
        raw["data"]["coopHistoryDetail"]["weapons"][0] = fx::weapon_image(&"f".repeat(64));
        let err = normalize_history_detail(&raw, &fx::tables(), &NormalizerConfig::default()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnknownWeaponHash);
    }

    #[test]
    fn test_weapon_url_without_token_is_malformed() {
        let mut raw = fx::history_detail();
        raw["data"]["coopHistoryDetail"]["weapons"][0] = json!({"image": {"url": "https://example.com/weapon.png"}});
        let err = normalize_history_detail(&raw, &fx::tables(), &NormalizerConfig::default()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MalformedAssetUrl);
    }

    #[test]
    fn test_lenient_policy_nulls_weapon_and_warns() {
        let mut raw = fx::history_detail();
        raw["data"]["coopHistoryDetail"]["myResult"]["weapons"][0] = fx::weapon_image(&"f".repeat(64));
        let config = NormalizerConfig::default().with_unknown(UnknownValuePolicy::lenient());
        let out = normalize_history_detail(&raw, &fx::tables(), &config).unwrap();
        assert_eq!(out.record.my_result.weapon_list, vec![None]);
        assert_eq!(out.warnings.len(), 1);
        assert_eq!(out.warnings[0].kind, DiagnosticKind::LookupFallback);
    }

    #[test]
    fn test_schedule_casing_variants_agree() {
        let tables = fx::tables();
        let normalizer = Normalizer::new(&tables, NormalizerConfig::default());
        let camel = normalizer.normalize_schedule(&fx::schedule()).unwrap();
        let snake = normalizer.normalize_schedule(&fx::schedule_snake_case()).unwrap();
        assert_eq!(camel, snake);
        assert!(camel.asset_urls.is_empty());
    }

    #[test]
    fn test_generic_entry_point_matches_typed() {
        let tables = fx::tables();
        let normalizer = Normalizer::new(&tables, NormalizerConfig::default());
        let typed = normalizer.normalize_history_summary(&fx::history_summary()).unwrap();
        let generic = normalizer
            .normalize(PayloadKind::HistorySummary, &fx::history_summary())
            .unwrap();
        assert_eq!(generic.record, CanonicalRecord::HistorySummary(typed.record));
        assert_eq!(generic.asset_urls, typed.asset_urls);
        assert_eq!(generic.asset_urls.len(), fx::WEAPON_IDS.len());
    }

    #[test]
    fn test_summary_and_detail_ids_join() {
        let tables = fx::tables();
        let normalizer = Normalizer::new(&tables, NormalizerConfig::default());
        let summary = normalizer.normalize_history_summary(&fx::history_summary()).unwrap();
        let detail = normalizer.normalize_history_detail(&fx::history_detail()).unwrap();
        assert_eq!(summary.record[0].results[0].id, detail.record.id);
    }

    #[test]
    fn test_pre_camelcased_input_is_unchanged() {
        let tables = fx::tables();
        let normalizer = Normalizer::new(&tables, NormalizerConfig::default());
        let raw = fx::history_detail();
        assert_eq!(
            normalizer.normalize_history_detail(&raw).unwrap(),
            normalizer.normalize_history_detail(&camelcase_keys(&raw)).unwrap()
        );
    }
}

//! Field transform primitives shared by every validator
//!
//! Key casing, timestamps, opaque ids, asset-hash resolution and the
//! node-list envelope.

use base64::{engine::general_purpose::STANDARD, Engine as _};
use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};
use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::{Map, Value};

use super::cursor::Cursor;
use super::model::{DetailId, PlayerId, WeaponRef};
use crate::config::UnknownPolicy;
use crate::lookup::WeaponTable;
use crate::verifier::{DiagnosticKind, Diagnostics};
use crate::{Error, Result};

static CONTENT_HASH: Lazy<Regex> = Lazy::new(|| Regex::new(r"/([a-f0-9]{64})_").expect("valid regex"));

static DETAIL_ID: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^CoopHistoryDetail-u-([a-z0-9]+):(\d{8}T\d{6})_([0-9a-f-]{36})$").expect("valid regex")
});

static PLAYER_ID: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^CoopPlayer-u-([a-z0-9]+):(\d{8}T\d{6})_([0-9a-f-]{36}):u-([a-z0-9]+)$").expect("valid regex")
});

// ── Key casing ────────────────────────────────────────────

/// `big_run` / `big-run` → `bigRun`. Leading underscores are kept, so
/// `__typename` survives unchanged.
pub fn to_camel_case(key: &str) -> String {
    let trimmed = key.trim_start_matches('_');
    let mut out = String::with_capacity(key.len());
    out.push_str(&key[..key.len() - trimmed.len()]);
    let mut upper_next = false;
    for ch in trimmed.chars() {
        if ch == '_' || ch == '-' {
            upper_next = !out.is_empty();
        } else if upper_next {
            out.extend(ch.to_uppercase());
            upper_next = false;
        } else {
            out.push(ch);
        }
    }
    out
}

/// Recursively rewrite object keys to camelCase
pub fn camelcase_keys(value: &Value) -> Value {
    match value {
        Value::Object(map) => Value::Object(
            map.iter()
                .map(|(k, v)| (to_camel_case(k), camelcase_keys(v)))
                .collect::<Map<String, Value>>(),
        ),
        Value::Array(items) => Value::Array(items.iter().map(camelcase_keys).collect()),
        other => other.clone(),
    }
}

/// String enum in its wire spelling (`"BIG_RUN"`, `"INKLING"`)
pub fn wire_enum<T>(cursor: &Cursor, name: &str, parse: impl Fn(&str) -> Option<T>) -> Result<T> {
    let text = cursor.str()?;
    parse(text).ok_or_else(|| Error::malformed(cursor.path(), format!("'{}' is not a valid {}", text, name)))
}

// ── Timestamps ────────────────────────────────────────────

/// ISO-8601 string → UTC instant. Anything unparsable reads as `None`.
pub fn parse_timestamp(value: &Value) -> Option<DateTime<Utc>> {
    let text = value.as_str()?;
    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return Some(dt.with_timezone(&Utc));
    }
    // Offset-less timestamps are taken as UTC
    NaiveDateTime::parse_from_str(text, "%Y-%m-%dT%H:%M:%S%.f")
        .ok()
        .map(|naive| Utc.from_utc_datetime(&naive))
}

/// Optional timestamp field; absent, null and invalid all map to `None`
pub fn timestamp_field(cursor: &Cursor, key: &str) -> Result<Option<DateTime<Utc>>> {
    Ok(cursor.opt_field(key)?.and_then(|c| parse_timestamp(c.value())))
}

fn parse_compact_time(text: &str) -> Option<DateTime<Utc>> {
    NaiveDateTime::parse_from_str(text, "%Y%m%dT%H%M%S")
        .ok()
        .map(|naive| Utc.from_utc_datetime(&naive))
}

// ── Opaque ids ────────────────────────────────────────────

/// Base64 `Type-Value` strings decode to their text; anything that is not
/// valid base64 text is assumed to be decoded already.
pub fn decode_opaque(raw: &str) -> String {
    STANDARD
        .decode(raw)
        .ok()
        .and_then(|bytes| String::from_utf8(bytes).ok())
        .filter(|text| text.contains('-'))
        .unwrap_or_else(|| raw.to_string())
}

/// Trailing integer of an opaque id (`Q29vcEVuZW15LTQ=` → `CoopEnemy-4` → 4).
/// A bare number is taken as-is.
pub fn raw_id(cursor: &Cursor) -> Result<i64> {
    if cursor.value().is_number() {
        return cursor.int_in(i64::MIN..=i64::MAX);
    }
    let decoded = decode_opaque(cursor.str()?);
    decoded
        .rsplit('-')
        .next()
        .and_then(|tail| tail.parse::<i64>().ok())
        .ok_or_else(|| Error::malformed(cursor.path(), format!("opaque id '{}' has no numeric suffix", decoded)))
}

/// Opaque id narrowed to `i32`
pub fn raw_id_i32(cursor: &Cursor) -> Result<i32> {
    let id = raw_id(cursor)?;
    i32::try_from(id).map_err(|_| Error::out_of_range(cursor.path(), "32-bit id", id))
}

pub fn detail_id(cursor: &Cursor) -> Result<DetailId> {
    let decoded = decode_opaque(cursor.str()?);
    let caps = DETAIL_ID
        .captures(&decoded)
        .ok_or_else(|| Error::malformed(cursor.path(), format!("'{}' is not a history detail id", decoded)))?;
    let play_time = parse_compact_time(&caps[2])
        .ok_or_else(|| Error::malformed(cursor.path(), format!("invalid play time '{}'", &caps[2])))?;
    Ok(DetailId {
        npln_user_id: caps[1].to_string(),
        play_time,
        uuid: caps[3].to_string(),
    })
}

pub fn player_id(cursor: &Cursor) -> Result<PlayerId> {
    let decoded = decode_opaque(cursor.str()?);
    let caps = PLAYER_ID
        .captures(&decoded)
        .ok_or_else(|| Error::malformed(cursor.path(), format!("'{}' is not a player id", decoded)))?;
    let play_time = parse_compact_time(&caps[2])
        .ok_or_else(|| Error::malformed(cursor.path(), format!("invalid play time '{}'", &caps[2])))?;
    Ok(PlayerId {
        play_time,
        uuid: caps[3].to_string(),
        npln_user_id: caps[4].to_string(),
    })
}

// ── Asset hashes ──────────────────────────────────────────

/// The 64-hex token between `/` and `_` in an asset URL
pub fn extract_content_hash(url: &str) -> Option<&str> {
    CONTENT_HASH
        .captures(url)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}

/// Resolve an `{ image: { url } }` object to a weapon id
pub fn weapon_ref(
    cursor: &Cursor,
    weapons: &WeaponTable,
    policy: UnknownPolicy,
    diagnostics: &mut Diagnostics,
) -> Result<WeaponRef> {
    let url_cursor = cursor.field("image")?.field("url")?;
    let url = url_cursor.str()?;
    let hash = extract_content_hash(url).ok_or_else(|| Error::MalformedAssetUrl {
        path: url_cursor.path().clone(),
        url: url.to_string(),
    })?;
    let id = match weapons.get(hash) {
        Some(id) => Some(id),
        None => {
            fallback(
                policy,
                diagnostics,
                Error::UnknownWeaponHash {
                    path: url_cursor.path().clone(),
                    hash: hash.to_string(),
                },
            )?;
            None
        }
    };
    Ok(WeaponRef {
        id,
        url: url.to_string(),
    })
}

/// Apply the unknown-value policy to a lookup miss: `Fail` returns the
/// error, `Null` records it as a warning and lets the caller substitute null.
pub fn fallback(policy: UnknownPolicy, diagnostics: &mut Diagnostics, error: Error) -> Result<()> {
    match policy {
        UnknownPolicy::Fail => Err(error),
        UnknownPolicy::Null => {
            let path = error.path().cloned().unwrap_or_default();
            diagnostics.add_warning(DiagnosticKind::LookupFallback, &path, error.to_string());
            Ok(())
        }
    }
}

// ── Node lists ────────────────────────────────────────────

/// Unwrap a `{ nodes: [...] }` envelope, parsing each node in order.
/// Fewer than `min` nodes is an `EmptyNodeList` failure.
pub fn node_list<'a, T>(
    envelope: &Cursor<'a>,
    min: usize,
    mut parse: impl FnMut(&Cursor<'a>) -> Result<T>,
) -> Result<Vec<T>> {
    let nodes = envelope.field("nodes")?;
    let items = nodes.items()?;
    if items.len() < min {
        return Err(Error::EmptyNodeList {
            path: nodes.path().clone(),
            required: min,
        });
    }
    items.iter().map(|node| parse(node)).collect()
}

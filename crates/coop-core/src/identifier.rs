//! Content-addressed identifiers
//!
//! Every canonical record is keyed by an MD5 hex digest over an explicit,
//! ordered field tuple rendered in a fixed textual form:
//!
//! | Record   | Hash input                                  |
//! |----------|---------------------------------------------|
//! | detail   | `{playTime}:{uuid}`                         |
//! | wave     | `{playTime}:{uuid}:{waveNumber}`            |
//! | player   | `{playTime}:{uuid}:{nplnUserId}`            |
//! | schedule | `{startTime}:{endTime}`                     |
//! | schedule | `{mode}-{rule}-{stageId}-{w1,w2,...}` (no window) |
//!
//! Instants render as RFC 3339 UTC with milliseconds and a `Z` suffix.
//! Changing any of these compositions changes every stored key.

use std::fmt;

use chrono::{DateTime, SecondsFormat, Utc};
use serde::Serialize;

use crate::lookup::{Mode, Rule, WeaponId};

/// 32-char lowercase hex MD5 digest
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct ContentId(String);

impl ContentId {
    fn digest(input: &str) -> Self {
        ContentId(format!("{:x}", md5::compute(input.as_bytes())))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ContentId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// `2023-01-05T12:34:56.000Z`
pub fn canonical_instant(instant: &DateTime<Utc>) -> String {
    instant.to_rfc3339_opts(SecondsFormat::Millis, true)
}

pub fn detail_id(play_time: &DateTime<Utc>, uuid: &str) -> ContentId {
    ContentId::digest(&format!("{}:{}", canonical_instant(play_time), uuid))
}

pub fn wave_id(play_time: &DateTime<Utc>, uuid: &str, wave_number: u8) -> ContentId {
    ContentId::digest(&format!("{}:{}:{}", canonical_instant(play_time), uuid, wave_number))
}

pub fn player_id(play_time: &DateTime<Utc>, uuid: &str, npln_user_id: &str) -> ContentId {
    ContentId::digest(&format!("{}:{}:{}", canonical_instant(play_time), uuid, npln_user_id))
}

/// Window hash when both bounds are known, otherwise the content fallback.
/// An unresolved weapon slot renders as an empty string.
pub fn schedule_id(
    start_time: Option<&DateTime<Utc>>,
    end_time: Option<&DateTime<Utc>>,
    mode: Mode,
    rule: Rule,
    stage_id: i32,
    weapons: &[Option<WeaponId>],
) -> ContentId {
    match (start_time, end_time) {
        (Some(start), Some(end)) => {
            ContentId::digest(&format!("{}:{}", canonical_instant(start), canonical_instant(end)))
        }
        _ => {
            let weapons = weapons
                .iter()
                .map(|w| w.map(|id| id.to_string()).unwrap_or_default())
                .collect::<Vec<_>>()
                .join(",");
            ContentId::digest(&format!("{}-{}-{}-{}", mode.as_str(), rule.as_str(), stage_id, weapons))
        }
    }
}

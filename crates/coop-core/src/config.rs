//! Normalizer configuration
//!
//! Decides what happens when a payload references a catalog value the
//! lookup tables do not know yet (a weapon or boss added by a game update
//! before the tables were refreshed).

use serde::{Deserialize, Serialize};

/// Behavior on a lookup miss
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnknownPolicy {
    /// Reject the payload
    Fail,
    /// Substitute null (or skip the entry) and record a warning
    Null,
}

/// Per-catalog unknown-value handling
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct UnknownValuePolicy {
    pub weapon_hash: UnknownPolicy,
    pub boss: UnknownPolicy,
    pub enemy: UnknownPolicy,
}

impl Default for UnknownValuePolicy {
    fn default() -> Self {
        Self {
            weapon_hash: UnknownPolicy::Fail,
            boss: UnknownPolicy::Null,
            enemy: UnknownPolicy::Fail,
        }
    }
}

impl UnknownValuePolicy {
    /// Every catalog miss degrades to null
    pub fn lenient() -> Self {
        Self {
            weapon_hash: UnknownPolicy::Null,
            boss: UnknownPolicy::Null,
            enemy: UnknownPolicy::Null,
        }
    }

    /// Every catalog miss is a validation failure
    pub fn strict() -> Self {
        Self {
            weapon_hash: UnknownPolicy::Fail,
            boss: UnknownPolicy::Fail,
            enemy: UnknownPolicy::Fail,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NormalizerConfig {
    pub unknown: UnknownValuePolicy,
}

impl NormalizerConfig {
    pub fn with_unknown(mut self, unknown: UnknownValuePolicy) -> Self {
        self.unknown = unknown;
        self
    }
}

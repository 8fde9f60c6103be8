//! Enumerations and lookup tables
//!
//! Pure data. Tables are built once at startup and shared by reference
//! with every normalization call; nothing here is mutated afterwards.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Weapon identifier as used by the game catalog. Schedules use `-1` and
/// `-2` for random slots.
pub type WeaponId = i32;

// ── Game enums ────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Mode {
    Regular,
    Limited,
    PrivateCustom,
    PrivateScenario,
}

impl Mode {
    pub const ALL: [Mode; 4] = [
        Mode::Regular,
        Mode::Limited,
        Mode::PrivateCustom,
        Mode::PrivateScenario,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Mode::Regular => "REGULAR",
            Mode::Limited => "LIMITED",
            Mode::PrivateCustom => "PRIVATE_CUSTOM",
            Mode::PrivateScenario => "PRIVATE_SCENARIO",
        }
    }

    pub fn from_wire(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|m| m.as_str() == value)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Rule {
    Regular,
    BigRun,
    TeamContest,
}

impl Rule {
    pub const ALL: [Rule; 3] = [Rule::Regular, Rule::BigRun, Rule::TeamContest];

    pub fn as_str(&self) -> &'static str {
        match self {
            Rule::Regular => "REGULAR",
            Rule::BigRun => "BIG_RUN",
            Rule::TeamContest => "TEAM_CONTEST",
        }
    }

    pub fn from_wire(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|r| r.as_str() == value)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Species {
    Inkling,
    Octoling,
}

impl Species {
    pub fn from_wire(value: &str) -> Option<Self> {
        match value {
            "INKLING" => Some(Species::Inkling),
            "OCTOLING" => Some(Species::Octoling),
            _ => None,
        }
    }
}

/// King salmonid of a rotation or encounter. Serialized as its numeric id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BossId {
    SakelienGiant,
    SakeRope,
    SakeJaw,
    Triple,
    Random,
}

impl BossId {
    pub const ALL: [BossId; 5] = [
        BossId::SakelienGiant,
        BossId::SakeRope,
        BossId::SakeJaw,
        BossId::Triple,
        BossId::Random,
    ];

    pub fn id(&self) -> i32 {
        match self {
            BossId::SakelienGiant => 23,
            BossId::SakeRope => 24,
            BossId::SakeJaw => 25,
            BossId::Triple => 30,
            BossId::Random => -1,
        }
    }

    pub fn from_id(id: i64) -> Option<Self> {
        Self::ALL.into_iter().find(|b| b.id() as i64 == id)
    }

    /// Legacy symbolic name used by schedule feeds
    pub fn name(&self) -> &'static str {
        match self {
            BossId::SakelienGiant => "SakelienGiant",
            BossId::SakeRope => "SakeRope",
            BossId::SakeJaw => "SakeJaw",
            BossId::Triple => "Triple",
            BossId::Random => "Random",
        }
    }
}

impl Serialize for BossId {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_i32(self.id())
    }
}

/// Fixed enemy roster. Declaration order is the canonical index order of
/// every per-enemy array in a canonical record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EnemyKind {
    Steelhead,
    Flyfish,
    Scrapper,
    SteelEel,
    Stinger,
    Maws,
    Drizzler,
    FishStick,
    FlipperFlopper,
    BigShot,
    SlamminLid,
    Goldie,
    Griller,
    Mudmouth,
}

impl EnemyKind {
    pub const COUNT: usize = 14;

    pub const ALL: [EnemyKind; EnemyKind::COUNT] = [
        EnemyKind::Steelhead,
        EnemyKind::Flyfish,
        EnemyKind::Scrapper,
        EnemyKind::SteelEel,
        EnemyKind::Stinger,
        EnemyKind::Maws,
        EnemyKind::Drizzler,
        EnemyKind::FishStick,
        EnemyKind::FlipperFlopper,
        EnemyKind::BigShot,
        EnemyKind::SlamminLid,
        EnemyKind::Goldie,
        EnemyKind::Griller,
        EnemyKind::Mudmouth,
    ];

    pub fn id(&self) -> i32 {
        match self {
            EnemyKind::Steelhead => 4,
            EnemyKind::Flyfish => 5,
            EnemyKind::Scrapper => 6,
            EnemyKind::SteelEel => 7,
            EnemyKind::Stinger => 8,
            EnemyKind::Maws => 9,
            EnemyKind::Drizzler => 10,
            EnemyKind::FishStick => 11,
            EnemyKind::FlipperFlopper => 12,
            EnemyKind::BigShot => 13,
            EnemyKind::SlamminLid => 14,
            EnemyKind::Goldie => 15,
            EnemyKind::Griller => 17,
            EnemyKind::Mudmouth => 20,
        }
    }

    pub fn from_id(id: i64) -> Option<Self> {
        Self::ALL.into_iter().find(|e| e.id() as i64 == id)
    }

    /// Position in canonical per-enemy arrays
    pub fn index(&self) -> usize {
        *self as usize
    }
}

// ── Weapon table ──────────────────────────────────────────

/// Image content hash (64 lowercase hex chars) → weapon id
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WeaponTable {
    entries: BTreeMap<String, WeaponId>,
}

impl WeaponTable {
    /// Load from a JSON object of `{"<hash>": <id>, ...}`
    pub fn from_json_str(json: &str) -> Result<Self> {
        let raw: BTreeMap<String, WeaponId> = serde_json::from_str(json)
            .map_err(|e| Error::Config(format!("weapon table is not a hash-to-id object: {}", e)))?;
        raw.into_iter()
            .map(|(hash, id)| {
                if is_content_hash(&hash) {
                    Ok((hash, id))
                } else {
                    Err(Error::Config(format!(
                        "weapon table key '{}' is not a 64-character lowercase hex hash",
                        hash
                    )))
                }
            })
            .collect()
    }

    pub fn get(&self, hash: &str) -> Option<WeaponId> {
        self.entries.get(hash).copied()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl FromIterator<(String, WeaponId)> for WeaponTable {
    fn from_iter<I: IntoIterator<Item = (String, WeaponId)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

pub(crate) fn is_content_hash(s: &str) -> bool {
    s.len() == 64 && s.bytes().all(|b| b.is_ascii_digit() || (b'a'..=b'f').contains(&b))
}

// ── Boss name table ───────────────────────────────────────

/// Legacy boss name → boss id. Unrecognized names resolve to `None`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BossNameTable {
    entries: BTreeMap<String, BossId>,
}

impl BossNameTable {
    pub fn resolve(&self, name: &str) -> Option<BossId> {
        self.entries.get(name).copied()
    }

    /// Additional spelling for an existing boss, e.g. a renamed feed value
    pub fn with_alias(mut self, name: impl Into<String>, boss: BossId) -> Self {
        self.entries.insert(name.into(), boss);
        self
    }
}

impl Default for BossNameTable {
    fn default() -> Self {
        Self {
            entries: BossId::ALL
                .into_iter()
                .map(|boss| (boss.name().to_string(), boss))
                .collect(),
        }
    }
}

// ── Bundle ────────────────────────────────────────────────

/// All tables a validator consults
#[derive(Debug, Clone, Default)]
pub struct LookupTables {
    pub weapons: WeaponTable,
    pub bosses: BossNameTable,
}

impl LookupTables {
    pub fn new(weapons: WeaponTable) -> Self {
        Self {
            weapons,
            bosses: BossNameTable::default(),
        }
    }

    pub fn with_bosses(mut self, bosses: BossNameTable) -> Self {
        self.bosses = bosses;
        self
    }
}

//! Payload builders shared by unit tests

use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde_json::{json, Value};

use crate::lookup::{LookupTables, WeaponId, WeaponTable};

pub const UUID: &str = "0a1b2c3d-4e5f-4a6b-8c7d-9e0f1a2b3c4d";
pub const NPLN: &str = "aaaabbbbccccddddeeee";
pub const PLAY_TIME: &str = "20230105T123456";
/// `PLAY_TIME` in the fixed id representation
pub const PLAY_TIME_CANONICAL: &str = "2023-01-05T12:34:56.000Z";
pub const WEAPON_IDS: [WeaponId; 4] = [40, 1010, 2030, 3020];
pub const MEMBER_NPLNS: [&str; 3] = ["bbbbccccddddeeeeffff", "ccccddddeeeeffffgggg", "ddddeeeeffffgggghhhh"];

pub fn opaque(text: &str) -> String {
    STANDARD.encode(text)
}

pub fn weapon_hash(index: usize) -> String {
    format!("{:064x}", 0xa000 + index)
}

pub fn tables() -> LookupTables {
    let weapons: WeaponTable = WEAPON_IDS
        .iter()
        .enumerate()
        .map(|(i, id)| (weapon_hash(i), *id))
        .collect();
    LookupTables::new(weapons)
}

pub fn weapon_image(hash: &str) -> Value {
    json!({
        "image": {
            "url": format!("https://api.lp1.av5ja.srv.nintendo.net/resources/prod/v2/weapon_illust/{}_0.png", hash)
        }
    })
}

fn image(kind: &str, n: u32) -> Value {
    json!({"url": format!("https://api.lp1.av5ja.srv.nintendo.net/resources/prod/v2/{}/{:064x}_0.png", kind, n)})
}

pub fn detail_id_text() -> String {
    format!("CoopHistoryDetail-u-{}:{}_{}", NPLN, PLAY_TIME, UUID)
}

pub fn player_id_text(npln: &str) -> String {
    format!("CoopPlayer-u-{}:{}_{}:u-{}", NPLN, PLAY_TIME, UUID, npln)
}

struct PlayerSeed {
    npln: &'static str,
    name: &'static str,
    weapon: usize,
    special: i32,
    deliver: u32,
    golden: u32,
    assist: u32,
}

fn player_result(seed: &PlayerSeed) -> Value {
    json!({
        "player": {
            "__isPlayer": "CoopPlayer",
            "byname": "Eggstra Worker",
            "name": seed.name,
            "nameId": "1234",
            "id": opaque(&player_id_text(seed.npln)),
            "nameplate": {
                "badges": [
                    {"id": opaque("Badge-5000010"), "image": image("badge_img/light", 1)},
                    null,
                    null
                ],
                "background": {
                    "id": opaque("NameplateBackground-1"),
                    "textColor": {"r": 1.0, "g": 1.0, "b": 1.0, "a": 1.0}
                }
            },
            "uniform": {"id": opaque("CoopUniform-1")},
            "species": "INKLING"
        },
        "weapons": [weapon_image(&weapon_hash(seed.weapon))],
        "specialWeapon": {
            "weaponId": seed.special,
            "image": image("special_img/blue", seed.special as u32)
        },
        "defeatEnemyCount": 12,
        "deliverCount": seed.deliver,
        "goldenAssistCount": seed.assist,
        "goldenDeliverCount": seed.golden,
        "rescueCount": 2,
        "rescuedCount": 1
    })
}

fn enemy_result(id: u32, defeat: u32, team: u32, pop: u32) -> Value {
    json!({
        "defeatCount": defeat,
        "teamDefeatCount": team,
        "popCount": pop,
        "enemy": {"id": opaque(&format!("CoopEnemy-{}", id)), "image": image("coop_enemy_img", id)}
    })
}

fn wave(number: u32, event: Option<u32>, team_deliver: Option<u32>, specials: &[i32]) -> Value {
    json!({
        "waveNumber": number,
        "waterLevel": 1,
        "eventWave": event.map(|id| json!({"id": opaque(&format!("CoopEventWave-{}", id))})),
        "deliverNorm": 35,
        "goldenPopCount": 60,
        "teamDeliverCount": team_deliver,
        "specialWeapons": specials
            .iter()
            .map(|id| json!({"id": opaque(&format!("SpecialWeapon-{}", id)), "weaponId": id}))
            .collect::<Vec<_>>()
    })
}

/// Three-wave cleared run without a boss encounter.
/// Totals: deliver 3400, golden 85, assist 14.
pub fn history_detail() -> Value {
    let me = PlayerSeed { npln: NPLN, name: "Me", weapon: 0, special: 20006, deliver: 1000, golden: 20, assist: 5 };
    let members = [
        PlayerSeed { npln: MEMBER_NPLNS[0], name: "One", weapon: 1, special: 20009, deliver: 900, golden: 18, assist: 4 },
        PlayerSeed { npln: MEMBER_NPLNS[1], name: "Two", weapon: 2, special: 20012, deliver: 800, golden: 15, assist: 3 },
        PlayerSeed { npln: MEMBER_NPLNS[2], name: "Three", weapon: 3, special: 20006, deliver: 700, golden: 12, assist: 2 },
    ];
    json!({
        "data": {
            "coopHistoryDetail": {
                "__typename": "CoopHistoryDetail",
                "id": opaque(&detail_id_text()),
                "afterGrade": {"id": opaque("CoopGrade-8")},
                "afterGradePoint": 400,
                "bossResult": null,
                "bossResults": null,
                "coopStage": {"id": opaque("CoopStage-7")},
                "dangerRate": 2.0,
                "enemyResults": [
                    enemy_result(4, 3, 8, 10),
                    enemy_result(5, 1, 5, 6),
                    enemy_result(15, 0, 2, 3)
                ],
                "jobBonus": 100,
                "jobPoint": 210,
                "jobRate": 3.25,
                "jobScore": 180,
                "memberResults": members.iter().map(player_result).collect::<Vec<_>>(),
                "myResult": player_result(&me),
                "playedTime": "2023-01-05T12:34:56Z",
                "resultWave": 0,
                "rule": "REGULAR",
                "scale": {"gold": 1, "silver": 2, "bronze": 3},
                "scenarioCode": null,
                "smellMeter": 5,
                "waveResults": [
                    wave(1, None, Some(40), &[20006, 20009]),
                    wave(2, Some(2), Some(45), &[20006, 20006, 20012]),
                    wave(3, None, None, &[])
                ],
                "weapons": (0..4).map(|i| weapon_image(&weapon_hash(i))).collect::<Vec<_>>()
            }
        }
    })
}

/// Add a boss encounter as a fourth (extra) wave
pub fn with_boss(mut raw: Value, defeated: bool) -> Value {
    let detail = &mut raw["data"]["coopHistoryDetail"];
    detail["bossResult"] = json!({
        "hasDefeatBoss": defeated,
        "boss": {"id": opaque("CoopEnemy-23"), "image": image("coop_enemy_img", 23)}
    });
    if let Some(waves) = detail["waveResults"].as_array_mut() {
        waves.push(wave(4, None, None, &[]));
    }
    raw
}

pub fn history_summary() -> Value {
    let detail_node = |time: &str, uuid: &str, stage: u32| {
        json!({
            "id": opaque(&format!("CoopHistoryDetail-u-{}:{}_{}", NPLN, time, uuid)),
            "weapons": (0..4).map(|i| weapon_image(&weapon_hash(i))).collect::<Vec<_>>(),
            "coopStage": {"id": opaque(&format!("CoopStage-{}", stage))}
        })
    };
    json!({
        "data": {
            "coopResult": {
                "historyGroups": {
                    "nodes": [
                        {
                            "startTime": "2023-01-05T08:00:00Z",
                            "endTime": "2023-01-07T00:00:00Z",
                            "mode": "REGULAR",
                            "rule": "REGULAR",
                            "playCount": 2,
                            "historyDetails": {
                                "nodes": [
                                    detail_node(PLAY_TIME, UUID, 7),
                                    detail_node("20230105T120000", "11111111-2222-4333-8444-555555555555", 7)
                                ]
                            }
                        },
                        {
                            "startTime": null,
                            "endTime": null,
                            "mode": "LIMITED",
                            "rule": "TEAM_CONTEST",
                            "playCount": null,
                            "historyDetails": {
                                "nodes": [
                                    detail_node("20230101T090000", "66666666-7777-4888-8999-aaaaaaaaaaaa", 6)
                                ]
                            }
                        }
                    ]
                }
            }
        }
    })
}

pub fn schedule() -> Value {
    json!({
        "normal": [
            {
                "startTime": "2023-01-05T08:00:00Z",
                "endTime": "2023-01-07T00:00:00Z",
                "stage": 7,
                "weapons": WEAPON_IDS,
                "rareWeapons": [],
                "bigBoss": "SakeJaw"
            },
            {
                "startTime": "2023-01-07T00:00:00Z",
                "endTime": "2023-01-08T16:00:00Z",
                "stage": 2,
                "weapons": [-1, -1, -1, -1],
                "rareWeapons": [20900],
                "bigBoss": 24
            }
        ],
        "bigRun": [],
        "teamContest": [
            {
                "startTime": null,
                "endTime": null,
                "stage": 6,
                "weapons": WEAPON_IDS,
                "rareWeapons": [],
                "bigBoss": null
            }
        ]
    })
}

/// Same schedule as a legacy producer would send it
pub fn schedule_snake_case() -> Value {
    json!({
        "normal": [
            {
                "start_time": "2023-01-05T08:00:00Z",
                "end_time": "2023-01-07T00:00:00Z",
                "stage": 7,
                "weapons": WEAPON_IDS,
                "rare_weapons": [],
                "big_boss": "SakeJaw"
            },
            {
                "start_time": "2023-01-07T00:00:00Z",
                "end_time": "2023-01-08T16:00:00Z",
                "stage": 2,
                "weapons": [-1, -1, -1, -1],
                "rare_weapons": [20900],
                "big_boss": 24
            }
        ],
        "big_run": [],
        "team_contest": [
            {
                "start_time": null,
                "end_time": null,
                "stage": 6,
                "weapons": WEAPON_IDS,
                "rare_weapons": [],
                "big_boss": null
            }
        ]
    })
}

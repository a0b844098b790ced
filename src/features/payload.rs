use std::io::Read;

use serde::{Deserialize, Serialize};

use crate::error::FeatureError;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TeamEntry {
    pub id: u64,
    pub name: String,
    pub player_region_name: Option<String>,
    #[serde(default)]
    pub years_active: Option<u32>,
    #[serde(default)]
    pub joined_time: Option<String>,
    #[serde(default)]
    pub leagues: EntryLeagues,
    #[serde(default)]
    pub last_deadline_bank: Option<f64>,
    #[serde(default)]
    pub last_deadline_value: Option<f64>,
    #[serde(default)]
    pub last_deadline_total_transfers: Option<f64>,
    #[serde(default)]
    pub summary_overall_points: Option<f64>,
    #[serde(default)]
    pub summary_overall_rank: Option<f64>,
    #[serde(default)]
    pub name_change_blocked: bool,
    /// Kit design as an embedded JSON object string.
    #[serde(default)]
    pub kit: Option<String>,
    #[serde(default)]
    pub favourite_team: Option<u32>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EntryLeagues {
    #[serde(default)]
    pub classic: Vec<LeagueMembership>,
    #[serde(default)]
    pub h2h: Vec<LeagueMembership>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LeagueMembership {
    #[serde(default)]
    pub entry_can_admin: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TeamHistory {
    #[serde(default)]
    pub current: Vec<GameweekHistory>,
    #[serde(default)]
    pub past: Vec<PastSeason>,
    #[serde(default)]
    pub chips: Vec<ChipPlay>,
}

impl TeamHistory {
    pub fn bench_boost_event(&self) -> Option<u32> {
        self.chips
            .iter()
            .find(|chip| chip.name == "bboost")
            .map(|chip| chip.event)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameweekHistory {
    pub event: u32,
    pub points_on_bench: f64,
    pub event_transfers: f64,
    pub event_transfers_cost: f64,
    pub bank: f64,
    pub value: f64,
    pub total_points: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PastSeason {
    /// `2019/20` style label.
    pub season_name: String,
    pub total_points: f64,
    pub rank: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChipPlay {
    pub name: String,
    pub event: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bootstrap {
    pub teams: Vec<ClubTeam>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClubTeam {
    pub id: u32,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameweekPicks {
    pub event: u32,
    pub picks: Vec<Pick>,
}

/// One squad slot; positions 1 to 11 start, 12 to 15 sit on the bench.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pick {
    pub element: u32,
    pub position: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerGameweek {
    pub element: u32,
    #[serde(rename = "GW")]
    pub gw: u32,
    pub team: String,
    pub assists: f64,
    pub bonus: f64,
    pub bps: f64,
    pub clean_sheets: f64,
    pub goals_conceded: f64,
    pub goals_scored: f64,
    pub own_goals: f64,
    pub penalties_missed: f64,
    pub penalties_saved: f64,
    pub red_cards: f64,
    pub yellow_cards: f64,
    pub saves: f64,
}

pub fn read_player_gameweeks<R: Read>(reader: R) -> Result<Vec<PlayerGameweek>, FeatureError> {
    let mut reader = csv::Reader::from_reader(reader);
    let mut rows = Vec::new();
    for row in reader.deserialize::<PlayerGameweek>() {
        rows.push(row?);
    }
    Ok(rows)
}

use std::collections::HashMap;

use super::payload::{GameweekHistory, GameweekPicks, PlayerGameweek};

pub const PICKED_RIVALS: &str = "Picked Rivals";
pub const NOT_PICKED_RIVALS: &str = "Not Picked Rivals";
pub const NO_RIVAL_TEAM: &str = "No Rival Team";
pub const NO_GAMEWEEK_DATA: &str = "No historical GW Data";

const STARTING_SLOTS: u32 = 11;

/// Season sums of player returns. Returns count only for starters, or for
/// the whole squad in the bench boost week; rival picks count every slot.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SquadTotals {
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
    pub rival_team_player: f64,
    pub total_players_starters: f64,
    pub total_players_all: f64,
    pub rival_team_player_categorical: &'static str,
}

impl SquadTotals {
    pub fn unplayed() -> Self {
        Self {
            rival_team_player_categorical: NO_GAMEWEEK_DATA,
            ..Self::default()
        }
    }

    fn add_returns(&mut self, player: &PlayerGameweek) {
        self.assists += player.assists;
        self.bonus += player.bonus;
        self.bps += player.bps;
        self.clean_sheets += player.clean_sheets;
        self.goals_conceded += player.goals_conceded;
        self.goals_scored += player.goals_scored;
        self.own_goals += player.own_goals;
        self.penalties_missed += player.penalties_missed;
        self.penalties_saved += player.penalties_saved;
        self.red_cards += player.red_cards;
        self.yellow_cards += player.yellow_cards;
        self.saves += player.saves;
        self.total_players_starters += 1.0;
    }
}

/// Totals over the gameweeks up to `current_gameweek`. Picks without a
/// matching player row are left out, as are gameweeks past the current one.
pub fn squad_totals(
    picks: &[GameweekPicks],
    players: &[PlayerGameweek],
    current_gameweek: u32,
    bench_boost_event: Option<u32>,
    rivals: Option<&[String]>,
) -> SquadTotals {
    let returns: HashMap<(u32, u32), Vec<&PlayerGameweek>> =
        players.iter().fold(HashMap::new(), |mut index, player| {
            index.entry((player.element, player.gw)).or_default().push(player);
            index
        });

    let mut totals = SquadTotals::default();
    for gameweek in picks.iter().filter(|gw| gw.event <= current_gameweek) {
        let bench_boost = bench_boost_event == Some(gameweek.event);
        for pick in &gameweek.picks {
            let Some(rows) = returns.get(&(pick.element, gameweek.event)) else {
                continue;
            };
            for player in rows {
                totals.total_players_all += 1.0;
                if rivals.is_some_and(|rivals| rivals.contains(&player.team)) {
                    totals.rival_team_player += 1.0;
                }
                if pick.position <= STARTING_SLOTS || bench_boost {
                    totals.add_returns(player);
                }
            }
        }
    }

    totals.rival_team_player_categorical = match rivals {
        Some(_) if totals.rival_team_player > 0.0 => PICKED_RIVALS,
        Some(_) => NOT_PICKED_RIVALS,
        None => NO_RIVAL_TEAM,
    };
    totals
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SeasonOverview {
    pub points_on_bench_total: f64,
    pub event_transfers_total: f64,
    pub event_transfers_cost_total: f64,
    pub bank_mean: f64,
    pub bank_latest: f64,
    pub value_latest: f64,
    pub total_points_latest: f64,
    pub points_on_bench_percentage: f64,
}

/// `None` when no gameweek up to `current_gameweek` has been played or the
/// team has no points to compare its bench against.
pub fn season_overview(current: &[GameweekHistory], current_gameweek: u32) -> Option<SeasonOverview> {
    let played: Vec<&GameweekHistory> = current
        .iter()
        .filter(|gw| gw.event <= current_gameweek)
        .collect();
    let latest = played.iter().max_by_key(|gw| gw.event)?;
    if latest.total_points == 0.0 {
        return None;
    }

    let points_on_bench_total: f64 = played.iter().map(|gw| gw.points_on_bench).sum();
    let bank_mean = played.iter().map(|gw| gw.bank).sum::<f64>() / played.len() as f64;

    Some(SeasonOverview {
        points_on_bench_total,
        event_transfers_total: played.iter().map(|gw| gw.event_transfers).sum(),
        event_transfers_cost_total: played.iter().map(|gw| gw.event_transfers_cost).sum(),
        bank_mean: (bank_mean * 10.0).round_ties_even() / 10.0,
        bank_latest: latest.bank,
        value_latest: latest.value,
        total_points_latest: latest.total_points,
        points_on_bench_percentage: (100.0 * points_on_bench_total / latest.total_points)
            .round_ties_even(),
    })
}

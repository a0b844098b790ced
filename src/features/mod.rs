//! Team attributes derived from raw game payloads: the manager entry, the
//! season history and the per-gameweek picks joined to player returns.

mod gameweek;
mod history;
mod kit;
mod payload;

use tracing::debug;

use crate::error::FeatureError;
use crate::models::{AttributeRecord, AttributeValue};
use crate::scoring::{RivalTeams, NOT_SPECIFIED};

pub use gameweek::{
    season_overview, squad_totals, SeasonOverview, SquadTotals, NOT_PICKED_RIVALS,
    NO_GAMEWEEK_DATA, NO_RIVAL_TEAM, PICKED_RIVALS,
};
pub use history::{summarise_history, HistorySummary};
pub use kit::{summarise_kit, KitSummary};
pub use payload::{
    read_player_gameweeks, Bootstrap, ChipPlay, ClubTeam, EntryLeagues, GameweekHistory,
    GameweekPicks, LeagueMembership, PastSeason, Pick, PlayerGameweek, TeamEntry, TeamHistory,
};

/// Everything fetched for one team. `current_gameweek` is `None` before the
/// season starts.
#[derive(Debug, Clone, Copy)]
pub struct TeamPayloads<'a> {
    pub entry: &'a TeamEntry,
    pub history: &'a TeamHistory,
    pub clubs: &'a [ClubTeam],
    pub picks: &'a [GameweekPicks],
    pub players: &'a [PlayerGameweek],
    pub current_gameweek: Option<u32>,
}

pub fn favourite_team(clubs: &[ClubTeam], entry: &TeamEntry) -> String {
    entry
        .favourite_team
        .and_then(|id| clubs.iter().find(|club| club.id == id))
        .map(|club| club.name.clone())
        .unwrap_or_else(|| NOT_SPECIFIED.to_string())
}

fn number(value: Option<f64>) -> Option<AttributeValue> {
    value.map(AttributeValue::Number)
}

fn text(value: Option<String>) -> Option<AttributeValue> {
    value.map(AttributeValue::Text)
}

pub fn team_attributes(
    payloads: &TeamPayloads<'_>,
    rivals: &RivalTeams,
) -> Result<AttributeRecord, FeatureError> {
    let entry = payloads.entry;
    let kit = summarise_kit(entry.kit.as_deref())?;
    let history = summarise_history(&payloads.history.past)?;
    let favourite = favourite_team(payloads.clubs, entry);

    let mut record = AttributeRecord::new()
        .with("id", entry.id as f64)
        .with("name", entry.name.clone())
        .with("classic_leagues_competed_in", entry.leagues.classic.len() as f64)
        .with("h2h_leagues_competed_in", entry.leagues.h2h.len() as f64)
        .with("name_change_blocked", entry.name_change_blocked)
        .with(
            "leagues_admin",
            entry
                .leagues
                .classic
                .iter()
                .filter(|league| league.entry_can_admin)
                .count() as f64,
        )
        .with("kit", kit.kit)
        .with("kit_full", kit.full)
        .with("favourite_team", favourite.clone());

    record.insert("player_region_iso_code_long", text(entry.player_region_name.clone()));
    record.insert("years_active", number(entry.years_active.map(f64::from)));
    record.insert(
        "joined_time",
        text(entry.joined_time.as_ref().map(|time| time.chars().take(10).collect())),
    );
    record.insert("last_deadline_bank", number(entry.last_deadline_bank));
    record.insert("last_deadline_value", number(entry.last_deadline_value));
    record.insert(
        "last_deadline_total_transfers",
        number(entry.last_deadline_total_transfers),
    );
    record.insert("summary_overall_points", number(entry.summary_overall_points));
    record.insert("summary_overall_rank", number(entry.summary_overall_rank));

    record.insert("kit_shirt_type", text(kit.shirt_type));
    record.insert("kit_shirt_logo", text(kit.shirt_logo));
    record.insert("kit_socks_type", text(kit.socks_type));
    record.insert("kit_shorts", text(kit.shorts));

    record.insert("min_rank_history", number(history.min_rank));
    record.insert("max_rank_history", number(history.max_rank));
    record.insert("max_total_points_history", number(history.max_total_points));
    record.insert("earliest_season_year_history", number(history.earliest_season_year));
    record.insert("career_break_history", number(history.career_break));
    record.insert("seasons_played_in", number(history.seasons_played_in));
    record.insert("yoyo_score", number(history.yoyo_score));
    record.insert("rising_score", number(history.rising_score));

    let team_rivals = if favourite == NOT_SPECIFIED {
        None
    } else {
        rivals.rivals_of(&favourite)
    };
    let season = payloads.current_gameweek.and_then(|gameweek| {
        let overview = season_overview(&payloads.history.current, gameweek)?;
        let totals = squad_totals(
            payloads.picks,
            payloads.players,
            gameweek,
            payloads.history.bench_boost_event(),
            team_rivals,
        );
        Some((totals, overview))
    });
    let (totals, overview) = season.unwrap_or_else(|| {
        debug!(team = entry.id, "no gameweek played, season figures zeroed");
        (SquadTotals::unplayed(), SeasonOverview::default())
    });

    for (name, value) in [
        ("assists", totals.assists),
        ("bonus", totals.bonus),
        ("bps", totals.bps),
        ("clean_sheets", totals.clean_sheets),
        ("goals_conceded", totals.goals_conceded),
        ("goals_scored", totals.goals_scored),
        ("own_goals", totals.own_goals),
        ("penalties_missed", totals.penalties_missed),
        ("penalties_saved", totals.penalties_saved),
        ("red_cards", totals.red_cards),
        ("yellow_cards", totals.yellow_cards),
        ("saves", totals.saves),
        ("rival_team_player", totals.rival_team_player),
        ("total_players_starters", totals.total_players_starters),
        ("total_players_all", totals.total_players_all),
        ("points_on_bench_total", overview.points_on_bench_total),
        ("event_transfers_total", overview.event_transfers_total),
        ("event_transfers_cost_total", overview.event_transfers_cost_total),
        ("bank_mean", overview.bank_mean),
        ("bank_latest", overview.bank_latest),
        ("value_latest", overview.value_latest),
        ("total_points_latest", overview.total_points_latest),
        ("points_on_bench_percentage", overview.points_on_bench_percentage),
    ] {
        record.insert(name, Some(AttributeValue::Number(value)));
    }
    record.insert(
        "rival_team_player_categorical",
        Some(AttributeValue::from(totals.rival_team_player_categorical)),
    );

    Ok(record)
}

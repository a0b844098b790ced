use rayon::prelude::*;
use tracing::info;

use crate::models::{LeagueEntry, LeagueMedalRow};

use super::engine::MedalEngine;

/// Medals for every team in a league, Gold first. Within a tier the rows keep
/// league order, then catalogue order within each team.
pub fn score_league(engine: &MedalEngine<'_>, entries: &[LeagueEntry]) -> Vec<LeagueMedalRow> {
    let per_team: Vec<Vec<LeagueMedalRow>> = entries
        .par_iter()
        .map(|entry| {
            engine
                .award(&entry.attributes)
                .into_iter()
                .map(|award| LeagueMedalRow {
                    manager: entry.manager.clone(),
                    team: entry.team.clone(),
                    medal_name: award.medal_name,
                    medal: award.medal,
                })
                .collect()
        })
        .collect();

    let mut rows: Vec<LeagueMedalRow> = per_team.into_iter().flatten().collect();
    rows.sort_by_key(|row| row.medal);
    info!(teams = entries.len(), medals = rows.len(), "league scored");
    rows
}

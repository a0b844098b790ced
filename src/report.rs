use std::collections::HashMap;
use std::fmt::Write;

use crate::models::{LeagueMedalRow, ManagerTally, Medal, MedalAward};
use crate::tables::TrainingMeta;

/// Medal table for a league, ordered Olympic style: golds, then silvers,
/// then bronzes. Ties keep league order.
pub fn tally_by_manager(rows: &[LeagueMedalRow]) -> Vec<ManagerTally> {
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut tallies: Vec<ManagerTally> = Vec::new();

    for row in rows {
        let slot = *index.entry(row.manager.as_str()).or_insert_with(|| {
            tallies.push(ManagerTally {
                manager: row.manager.clone(),
                team: row.team.clone(),
                ..ManagerTally::default()
            });
            tallies.len() - 1
        });
        let tally = &mut tallies[slot];
        match row.medal {
            Medal::Gold => tally.gold += 1,
            Medal::Silver => tally.silver += 1,
            Medal::Bronze => tally.bronze += 1,
            Medal::NoMedal => {}
        }
    }

    tallies.sort_by(|a, b| {
        (b.gold, b.silver, b.bronze).cmp(&(a.gold, a.silver, a.bronze))
    });
    tallies
}

fn count_tier(medals: &[MedalAward], medal: Medal) -> usize {
    medals.iter().filter(|award| award.medal == medal).count()
}

fn write_provenance(output: &mut String, meta: Option<&TrainingMeta>) {
    if let Some(meta) = meta {
        let _ = writeln!(
            output,
            "Scored against training run {} ({} sample teams, trained {})",
            meta.training_run_id,
            meta.sample_size,
            meta.trained_at.format("%Y-%m-%d %H:%M UTC")
        );
    }
}

pub fn build_team_report(team: &str, meta: Option<&TrainingMeta>, medals: &[MedalAward]) -> String {
    let mut output = String::new();

    let _ = writeln!(output, "# Team Medal Report");
    let _ = writeln!(output, "Generated for {}", team);
    write_provenance(&mut output, meta);
    let _ = writeln!(output);
    let _ = writeln!(output, "## Medal Tally");
    let _ = writeln!(
        output,
        "- Gold: {}\n- Silver: {}\n- Bronze: {}",
        count_tier(medals, Medal::Gold),
        count_tier(medals, Medal::Silver),
        count_tier(medals, Medal::Bronze)
    );

    let _ = writeln!(output);
    let _ = writeln!(output, "## Awards");

    if medals.is_empty() {
        let _ = writeln!(output, "No medals awarded.");
    } else {
        for award in medals {
            let _ = writeln!(
                output,
                "- **{}** ({}): {}",
                award.medal_name, award.medal, award.overview
            );
        }
    }

    output
}

pub fn build_league_report(meta: Option<&TrainingMeta>, rows: &[LeagueMedalRow]) -> String {
    let tallies = tally_by_manager(rows);
    let mut output = String::new();

    let _ = writeln!(output, "# League Medal Report");
    write_provenance(&mut output, meta);
    let _ = writeln!(output);
    let _ = writeln!(output, "## Medal Table");

    if tallies.is_empty() {
        let _ = writeln!(output, "No teams scored.");
    } else {
        for (place, tally) in tallies.iter().enumerate() {
            let _ = writeln!(
                output,
                "{}. {} ({}): {} gold, {} silver, {} bronze ({} total)",
                place + 1,
                tally.manager,
                tally.team,
                tally.gold,
                tally.silver,
                tally.bronze,
                tally.total()
            );
        }
    }

    for medal in [Medal::Gold, Medal::Silver, Medal::Bronze] {
        let _ = writeln!(output);
        let _ = writeln!(output, "## {} Medals", medal);
        let tier: Vec<&LeagueMedalRow> = rows.iter().filter(|row| row.medal == medal).collect();
        if tier.is_empty() {
            let _ = writeln!(output, "None awarded.");
            continue;
        }
        for row in tier {
            let _ = writeln!(output, "- {} ({}): {}", row.manager, row.team, row.medal_name);
        }
    }

    output
}

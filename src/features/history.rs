use crate::error::FeatureError;
use crate::profiling::round3;

use super::payload::PastSeason;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct HistorySummary {
    pub min_rank: Option<f64>,
    pub max_rank: Option<f64>,
    pub max_total_points: Option<f64>,
    pub earliest_season_year: Option<f64>,
    /// Longest gap in years between consecutive listed seasons.
    pub career_break: Option<f64>,
    pub seasons_played_in: Option<f64>,
    pub yoyo_score: Option<f64>,
    pub rising_score: Option<f64>,
}

fn start_year(season_name: &str) -> Result<f64, FeatureError> {
    season_name
        .split('/')
        .next()
        .and_then(|year| year.trim().parse::<i32>().ok())
        .map(f64::from)
        .ok_or_else(|| FeatureError::SeasonName(season_name.to_string()))
}

fn max_of(values: impl Iterator<Item = f64>) -> Option<f64> {
    values.max_by(f64::total_cmp)
}

fn min_of(values: impl Iterator<Item = f64>) -> Option<f64> {
    values.min_by(f64::total_cmp)
}

pub fn summarise_history(past: &[PastSeason]) -> Result<HistorySummary, FeatureError> {
    if past.is_empty() {
        return Ok(HistorySummary::default());
    }

    let years = past
        .iter()
        .map(|season| start_year(&season.season_name))
        .collect::<Result<Vec<f64>, _>>()?;

    let (yoyo_score, rising_score) = if past.len() > 1 {
        let (yoyo, rising) = yoyo_rising_scores(&years, past);
        (Some(yoyo), Some(rising))
    } else {
        (None, None)
    };

    Ok(HistorySummary {
        min_rank: min_of(past.iter().map(|season| season.rank)),
        max_rank: max_of(past.iter().map(|season| season.rank)),
        max_total_points: max_of(past.iter().map(|season| season.total_points)),
        earliest_season_year: min_of(years.iter().copied()),
        career_break: max_of(years.windows(2).map(|pair| pair[1] - pair[0])),
        seasons_played_in: Some(past.len() as f64),
        yoyo_score,
        rising_score,
    })
}

/// Yo-yo: mean absolute rank swing between consecutive seasons. Rising: the
/// negated least-squares slope of rank over year, positive when improving.
fn yoyo_rising_scores(years: &[f64], past: &[PastSeason]) -> (f64, f64) {
    let mut points: Vec<(f64, f64)> = years
        .iter()
        .zip(past)
        .map(|(&year, season)| (year, season.rank))
        .collect();
    points.sort_by(|a, b| a.0.total_cmp(&b.0));

    let n = points.len() as f64;
    let swings: f64 = points.windows(2).map(|pair| (pair[1].1 - pair[0].1).abs()).sum();

    let mean_year = points.iter().map(|(year, _)| year).sum::<f64>() / n;
    let mean_rank = points.iter().map(|(_, rank)| rank).sum::<f64>() / n;
    let (covariance, variance) = points.iter().fold((0.0, 0.0), |(cov, var), (year, rank)| {
        let dx = year - mean_year;
        (cov + dx * (rank - mean_rank), var + dx * dx)
    });
    let slope = if variance == 0.0 { 0.0 } else { covariance / variance };

    (round3(swings / n), round3(-slope))
}

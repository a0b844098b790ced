use std::collections::HashMap;

use crate::models::AttributeRecord;
use crate::tables::{CategoricalLookupRow, NumericLookupRow};

use super::distribution::DistributionRow;
use super::round3;

/// Percentile grid the numeric lookup is resampled onto, most common first.
pub const PERCENTILE_GRID: [f64; 20] = [
    100.0, 95.0, 90.0, 85.0, 80.0, 75.0, 70.0, 65.0, 60.0, 55.0, 50.0, 45.0, 40.0, 35.0, 30.0,
    25.0, 20.0, 15.0, 10.0, 5.0,
];

/// Piecewise-linear interpolation of `x` over ascending sample points `xp`.
/// Points outside the sampled range clamp to the nearest end.
pub fn interpolate(x: f64, xp: &[f64], fp: &[f64]) -> f64 {
    debug_assert_eq!(xp.len(), fp.len());
    let (Some(&first), Some(&last)) = (xp.first(), xp.last()) else {
        return f64::NAN;
    };
    if x <= first {
        return fp[0];
    }
    if x >= last {
        return fp[fp.len() - 1];
    }

    let upper = xp.partition_point(|&point| point <= x);
    let lower = upper - 1;
    if xp[lower] == x {
        return fp[lower];
    }
    let slope = (fp[upper] - fp[lower]) / (xp[upper] - xp[lower]);
    fp[lower] + slope * (x - xp[lower])
}

pub fn numeric_lookup(distribution: &[DistributionRow], column_name: &str) -> Vec<NumericLookupRow> {
    let rows: Vec<&DistributionRow> = distribution
        .iter()
        .filter(|row| row.column_name == column_name)
        .collect();
    if rows.is_empty() {
        return Vec::new();
    }

    let values: Vec<f64> = rows.iter().map(|row| row.value).collect();
    let below: Vec<f64> = rows.iter().map(|row| row.percentage_below).collect();
    // Share at-or-above falls as the value rises, so walk it from the top.
    let above: Vec<f64> = rows.iter().rev().map(|row| row.percentage_above).collect();
    let values_desc: Vec<f64> = values.iter().rev().copied().collect();

    PERCENTILE_GRID
        .iter()
        .map(|&percentage| NumericLookupRow {
            column_name: column_name.to_string(),
            percentage,
            interpolated_value_above: round3(interpolate(percentage, &above, &values_desc)),
            interpolated_value_below: round3(interpolate(percentage, &below, &values)),
        })
        .collect()
}

/// Numeric lookup for an attribute. With a partition every tagged partition
/// found in the distribution is resampled independently.
pub fn numeric_lookup_partitioned(
    distribution: &[DistributionRow],
    column_name: &str,
    partition_column: Option<&str>,
) -> Vec<NumericLookupRow> {
    if partition_column.is_none() {
        return numeric_lookup(distribution, column_name);
    }

    let mut tags: Vec<&str> = Vec::new();
    for row in distribution {
        if !tags.contains(&row.column_name.as_str()) {
            tags.push(&row.column_name);
        }
    }
    tags.into_iter()
        .flat_map(|tag| numeric_lookup(distribution, tag))
        .collect()
}

pub fn categorical_lookup(records: &[AttributeRecord], column_name: &str) -> Vec<CategoricalLookupRow> {
    let mut order: Vec<String> = Vec::new();
    let mut counts: HashMap<String, usize> = HashMap::new();
    for value in records.iter().filter_map(|record| record.get(column_name)) {
        let key = value.category_key();
        let count = counts.entry(key.clone()).or_insert(0);
        if *count == 0 {
            order.push(key);
        }
        *count += 1;
    }

    let total: usize = counts.values().sum();
    if total == 0 {
        return Vec::new();
    }

    let mut shares: Vec<(String, usize)> = order
        .into_iter()
        .map(|key| {
            let count = counts[&key];
            (key, count)
        })
        .collect();
    shares.sort_by(|a, b| b.1.cmp(&a.1));

    shares
        .iter()
        .map(|(value, count)| CategoricalLookupRow {
            column_name: column_name.to_string(),
            value: value.clone(),
            percentage_share: round3(*count as f64 / total as f64),
            rank_ascending: 1 + shares.iter().filter(|(_, other)| other < count).count() as u32,
            rank_descending: 1 + shares.iter().filter(|(_, other)| other > count).count() as u32,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profiling::distribution::distribution_table_partitioned;
    use proptest::prelude::*;

    fn population(values: &[f64]) -> Vec<AttributeRecord> {
        values
            .iter()
            .map(|value| AttributeRecord::new().with("bps", *value))
            .collect()
    }

    #[test]
    fn interpolation_clamps_and_blends() {
        let xp = [10.0, 20.0, 40.0];
        let fp = [1.0, 2.0, 4.0];
        assert_eq!(interpolate(5.0, &xp, &fp), 1.0);
        assert_eq!(interpolate(50.0, &xp, &fp), 4.0);
        assert_eq!(interpolate(20.0, &xp, &fp), 2.0);
        assert!((interpolate(30.0, &xp, &fp) - 3.0).abs() < 1e-12);
    }

    #[test]
    fn lookup_covers_the_full_grid() {
        let distribution =
            distribution_table_partitioned(&population(&[1.0, 2.0, 3.0, 4.0]), "bps", None);
        let lookup = numeric_lookup(&distribution, "bps");

        assert_eq!(lookup.len(), PERCENTILE_GRID.len());
        assert_eq!(lookup[0].percentage, 100.0);
        assert_eq!(lookup[0].interpolated_value_above, 1.0);
        assert_eq!(lookup[0].interpolated_value_below, 4.0);
        let half = lookup.iter().find(|row| row.percentage == 50.0).expect("grid point");
        assert_eq!(half.interpolated_value_above, 3.0);
        assert_eq!(half.interpolated_value_below, 2.0);
    }

    #[test]
    fn querying_observed_grid_points_reproduces_boundary_values() {
        // Twenty evenly spaced values land exactly on every grid point.
        let values: Vec<f64> = (1..=20).map(|v| v as f64 * 1.5).collect();
        let distribution = distribution_table_partitioned(&population(&values), "bps", None);
        let lookup = numeric_lookup(&distribution, "bps");

        for row in &lookup {
            let below = distribution
                .iter()
                .find(|d| (d.percentage_below - row.percentage).abs() < 1e-9)
                .expect("observed below point");
            assert!((row.interpolated_value_below - round3(below.value)).abs() < 1e-3);

            let above = distribution
                .iter()
                .find(|d| (d.percentage_above - row.percentage).abs() < 1e-9)
                .expect("observed above point");
            assert!((row.interpolated_value_above - round3(above.value)).abs() < 1e-3);
        }
    }

    #[test]
    fn single_observation_fills_every_grid_point() {
        let distribution = distribution_table_partitioned(&population(&[7.0]), "bps", None);
        let lookup = numeric_lookup(&distribution, "bps");
        assert!(lookup
            .iter()
            .all(|row| row.interpolated_value_above == 7.0 && row.interpolated_value_below == 7.0));
    }

    #[test]
    fn partitioned_lookup_resamples_each_partition() {
        let records = vec![
            AttributeRecord::new().with("bps", 10.0).with("favourite_team", "Arsenal"),
            AttributeRecord::new().with("bps", 20.0).with("favourite_team", "Arsenal"),
            AttributeRecord::new().with("bps", 5.0).with("favourite_team", "Spurs"),
        ];
        let distribution = distribution_table_partitioned(&records, "bps", Some("favourite_team"));
        let lookup = numeric_lookup_partitioned(&distribution, "bps", Some("favourite_team"));

        assert_eq!(lookup.len(), 2 * PERCENTILE_GRID.len());
        assert!(lookup
            .iter()
            .filter(|row| row.column_name == "bps_Spurs")
            .all(|row| row.interpolated_value_below == 5.0));
        assert_eq!(
            lookup
                .iter()
                .filter(|row| row.column_name == "bps_Arsenal")
                .count(),
            PERCENTILE_GRID.len()
        );
    }

    #[test]
    fn categorical_ranks_share_min_rank_on_ties() {
        let records: Vec<AttributeRecord> = ["ENG", "ENG", "ENG", "IRL", "WAL", "SCO", "SCO"]
            .iter()
            .map(|region| AttributeRecord::new().with("region", *region))
            .chain(std::iter::once(AttributeRecord::new().with_null("region")))
            .collect();

        let lookup = categorical_lookup(&records, "region");
        let row = |value: &str| {
            lookup
                .iter()
                .find(|row| row.value == value)
                .expect("category present")
                .clone()
        };

        assert_eq!(lookup.len(), 4);
        assert_eq!(lookup[0].value, "ENG");
        assert_eq!(row("ENG").percentage_share, 0.429);
        assert_eq!(row("ENG").rank_ascending, 4);
        assert_eq!(row("ENG").rank_descending, 1);
        assert_eq!(row("SCO").rank_descending, 2);
        assert_eq!(row("IRL").rank_ascending, 1);
        assert_eq!(row("WAL").rank_ascending, 1);
        assert_eq!(row("WAL").rank_descending, 3);
    }

    proptest! {
        #[test]
        fn boundaries_are_monotonic_across_the_grid(
            mut values in proptest::collection::vec(-500.0f64..500.0, 1..200)
        ) {
            values.sort_by(f64::total_cmp);
            let distribution = distribution_table_partitioned(&population(&values), "bps", None);
            let lookup = numeric_lookup(&distribution, "bps");

            prop_assert_eq!(lookup.len(), PERCENTILE_GRID.len());
            for pair in lookup.windows(2) {
                // Grid runs from 100 down to 5.
                prop_assert!(pair[0].percentage > pair[1].percentage);
                prop_assert!(pair[0].interpolated_value_above <= pair[1].interpolated_value_above);
                prop_assert!(pair[0].interpolated_value_below >= pair[1].interpolated_value_below);
            }
        }
    }
}

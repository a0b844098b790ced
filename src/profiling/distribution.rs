use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::models::AttributeRecord;

use super::round3;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DistributionRow {
    pub column_name: String,
    pub value: f64,
    pub total_volume_sample: usize,
    pub percentage_above: f64,
    pub percentage_below: f64,
}

/// Distribution of `column_name` across the records, one row per distinct
/// value in ascending order. Records without a numeric reading are ignored.
pub fn distribution_table(records: &[&AttributeRecord], column_name: &str) -> Vec<DistributionRow> {
    let mut values: Vec<f64> = records
        .iter()
        .filter_map(|record| record.get(column_name).and_then(|value| value.as_number()))
        .collect();
    if values.is_empty() {
        return Vec::new();
    }
    values.sort_by(f64::total_cmp);

    let mut counts: Vec<(f64, usize)> = Vec::new();
    for value in values.iter().copied() {
        match counts.last_mut() {
            Some((last, count)) if *last == value => *count += 1,
            _ => counts.push((value, 1)),
        }
    }

    let total = values.len() as f64;
    let mut seen_below = 0usize;
    counts
        .into_iter()
        .map(|(value, count)| {
            let at_or_above = values.len() - seen_below;
            seen_below += count;
            DistributionRow {
                column_name: column_name.to_string(),
                value,
                total_volume_sample: count,
                percentage_above: round3(at_or_above as f64 / total * 100.0),
                percentage_below: round3(seen_below as f64 / total * 100.0),
            }
        })
        .collect()
}

/// Distribution of `column_name`, split by every distinct value of the
/// partition attribute when one is given. Partitioned rows are tagged
/// `column_partitionvalue`; partitions with no observations emit nothing.
pub fn distribution_table_partitioned(
    records: &[AttributeRecord],
    column_name: &str,
    partition_column: Option<&str>,
) -> Vec<DistributionRow> {
    let Some(partition_column) = partition_column else {
        let all: Vec<&AttributeRecord> = records.iter().collect();
        return distribution_table(&all, column_name);
    };

    let mut rows = Vec::new();
    for partition in partition_values(records, partition_column) {
        let members: Vec<&AttributeRecord> = records
            .iter()
            .filter(|record| {
                record
                    .get(partition_column)
                    .map(|value| value.category_key() == partition)
                    .unwrap_or(false)
            })
            .collect();
        let tagged = format!("{column_name}_{partition}");
        rows.extend(
            distribution_table(&members, column_name)
                .into_iter()
                .map(|row| DistributionRow {
                    column_name: tagged.clone(),
                    ..row
                }),
        );
    }
    rows
}

fn partition_values(records: &[AttributeRecord], partition_column: &str) -> Vec<String> {
    let mut seen = HashSet::new();
    records
        .iter()
        .filter_map(|record| record.get(partition_column))
        .map(|value| value.category_key())
        .filter(|key| seen.insert(key.clone()))
        .collect()
}

use std::borrow::Cow;

use tracing::debug;

use crate::models::{AttributeRecord, MedalAward};
use crate::rules::{NumericRule, Objective};
use crate::tables::NumericLookupTable;

use super::adjust::{Adjustments, RivalTeams};
use super::medal::determine_medal;
use super::template::{percentage_label, render, thousands, TemplateValues};
use super::NOT_SPECIFIED;

pub const FALLBACK_PERCENTILE: f64 = 100.0;

pub fn lookup_key<'a>(feature_name: &'a str, partition_value: &str) -> Cow<'a, str> {
    if partition_value == NOT_SPECIFIED {
        Cow::Borrowed(feature_name)
    } else {
        Cow::Owned(format!("{feature_name}_{partition_value}"))
    }
}

pub fn partition_label(rule: &NumericRule, record: &AttributeRecord) -> String {
    rule.partition_feature
        .as_deref()
        .and_then(|feature| record.get(feature))
        .map(|value| value.category_key())
        .unwrap_or_else(|| NOT_SPECIFIED.to_string())
}

/// Percentile standing of `value` within the population.
///
/// `minimise` picks the smallest grid percentage whose at-or-below boundary
/// covers the value; `maximise` the smallest whose at-or-above boundary does.
/// A value no grid point covers, including an attribute without lookup rows,
/// lands on [`FALLBACK_PERCENTILE`]. A value beyond the best ever observed is
/// covered by every grid point and takes the best one.
pub fn percentile_rank(
    table: &NumericLookupTable,
    feature_name: &str,
    value: f64,
    objective: Objective,
    partition_value: &str,
) -> f64 {
    let key = lookup_key(feature_name, partition_value);
    table
        .rows_for(&key)
        .filter(|row| match objective {
            Objective::Minimise => row.interpolated_value_below >= value,
            Objective::Maximise => row.interpolated_value_above <= value,
        })
        .map(|row| row.percentage)
        .min_by(f64::total_cmp)
        .unwrap_or(FALLBACK_PERCENTILE)
}

pub(crate) fn evaluate_numeric(
    name: &str,
    rule: &NumericRule,
    record: &AttributeRecord,
    table: &NumericLookupTable,
    adjustments: &Adjustments,
    rivals: &RivalTeams,
) -> Option<MedalAward> {
    let Some(value) = record.get(&rule.feature_name).and_then(|value| value.as_number()) else {
        debug!(rule = name, feature = %rule.feature_name, "no numeric value, rule skipped");
        return None;
    };

    let partition_value = partition_label(rule, record);
    let percentage = percentile_rank(table, &rule.feature_name, value, rule.objective, &partition_value);
    let medal = determine_medal(percentage, &rule.thresholds);
    let (value, medal) = adjustments.apply(name, value, &partition_value, medal, rivals);

    let values = TemplateValues {
        percentage: Some(percentage_label(percentage)),
        value: Some(thousands(value)),
        partition_value: Some(partition_value),
        ..TemplateValues::default()
    };

    Some(MedalAward {
        medal_name: name.to_string(),
        medal,
        overview: render(&rule.presentation.text, &values),
        image_path: rule.presentation.image_path.clone(),
        medal_background: rule.presentation.medal_background.clone(),
    })
}

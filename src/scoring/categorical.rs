use tracing::debug;

use crate::models::{AttributeRecord, MedalAward};
use crate::rules::CategoricalRule;
use crate::tables::CategoricalLookupTable;

use super::medal::determine_medal;
use super::template::{ordinal, render, TemplateValues};

pub const UNSEEN_CATEGORY_SHARE: f64 = 0.01;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CategoryStanding {
    /// Share as a whole percentage, ties to even.
    pub percentage: i64,
    pub rank_ascending: u32,
    pub rank_descending: u32,
}

impl CategoryStanding {
    /// Percentage shown to the user; a share that rounds to 0% reads as 1%.
    pub fn display_percentage(&self) -> i64 {
        self.percentage.max(1)
    }

    pub(crate) fn template_values(&self, display_percentage: i64) -> TemplateValues {
        TemplateValues {
            percentage: Some(format!("{display_percentage}%")),
            rank_ascending: Some(ordinal(self.rank_ascending)),
            rank_descending: Some(ordinal(self.rank_descending)),
            ..TemplateValues::default()
        }
    }
}

/// Share and ranks of `value` for the attribute. Unseen categories are treated
/// as rare: 1% share, the worst ascending rank, and first by descending rank.
pub fn team_medal_categorical(
    table: &CategoricalLookupTable,
    feature_name: &str,
    value: &str,
) -> CategoryStanding {
    let (share, rank_ascending, rank_descending) = match table.find(feature_name, value) {
        Some(row) => (row.percentage_share, row.rank_ascending, row.rank_descending),
        None => {
            debug!(feature = feature_name, value, "category not in sample population");
            let worst = table.max_rank_ascending(feature_name).unwrap_or(1);
            (UNSEEN_CATEGORY_SHARE, worst, 1)
        }
    };

    CategoryStanding {
        percentage: (share * 100.0).round_ties_even() as i64,
        rank_ascending,
        rank_descending,
    }
}

pub(crate) fn evaluate_categorical(
    name: &str,
    rule: &CategoricalRule,
    record: &AttributeRecord,
    table: &CategoricalLookupTable,
) -> Option<MedalAward> {
    let Some(value) = record.get(&rule.feature_name) else {
        debug!(rule = name, feature = %rule.feature_name, "no category, rule skipped");
        return None;
    };
    let category = value.category_key();

    let standing = team_medal_categorical(table, &rule.feature_name, &category);
    let medal = determine_medal(standing.percentage as f64, &rule.thresholds);

    let values = TemplateValues {
        value: Some(category),
        ..standing.template_values(standing.display_percentage())
    };

    Some(MedalAward {
        medal_name: name.to_string(),
        medal,
        overview: render(&rule.presentation.text, &values),
        image_path: rule.presentation.image_path.clone(),
        medal_background: rule.presentation.medal_background.clone(),
    })
}

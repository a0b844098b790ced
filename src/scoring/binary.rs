use tracing::debug;

use crate::models::{AttributeRecord, AttributeValue, Medal, MedalAward};
use crate::rules::BinaryRule;
use crate::tables::CategoricalLookupTable;

use super::categorical::team_medal_categorical;
use super::template::render;

// Flags compare numerically against numbers, so 1 matches `true`.
fn matches_gold(value: &AttributeValue, gold: &AttributeValue) -> bool {
    use AttributeValue::{Flag, Number};
    match (value, gold) {
        (Flag(_), Number(_)) | (Number(_), Flag(_)) => value.as_number() == gold.as_number(),
        _ => value == gold,
    }
}

/// Evaluates one binary rule: Gold when the value matches the gold value.
/// The categorical standing only feeds the award text.
pub(crate) fn evaluate_binary(
    name: &str,
    rule: &BinaryRule,
    record: &AttributeRecord,
    table: &CategoricalLookupTable,
) -> Option<MedalAward> {
    let Some(value) = record.get(&rule.feature_name) else {
        debug!(rule = name, feature = %rule.feature_name, "no flag value, rule skipped");
        return None;
    };

    let medal = if matches_gold(value, &rule.gold_value) {
        Medal::Gold
    } else {
        Medal::NoMedal
    };

    let standing = team_medal_categorical(table, &rule.feature_name, &value.category_key());
    let values = standing.template_values(standing.percentage);

    Some(MedalAward {
        medal_name: name.to_string(),
        medal,
        overview: render(&rule.presentation.text, &values),
        image_path: rule.presentation.image_path.clone(),
        medal_background: rule.presentation.medal_background.clone(),
    })
}

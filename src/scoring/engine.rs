use tracing::debug;

use crate::models::{AttributeRecord, ImputeNulls, Medal, MedalAward};
use crate::rules::{MedalRule, MedalSettings, Presentation, CONSOLATION_AWARD};
use crate::tables::LookupTables;

use super::binary::evaluate_binary;
use super::categorical::evaluate_categorical;
use super::numeric::evaluate_numeric;

pub struct MedalEngine<'a> {
    tables: &'a LookupTables,
    settings: &'a MedalSettings,
    impute: Option<&'a ImputeNulls>,
}

impl<'a> MedalEngine<'a> {
    pub fn new(tables: &'a LookupTables, settings: &'a MedalSettings) -> Self {
        Self {
            tables,
            settings,
            impute: None,
        }
    }

    pub fn with_imputation(mut self, impute: &'a ImputeNulls) -> Self {
        self.impute = Some(impute);
        self
    }

    /// Runs every rule in catalogue order, keeping `No Medal` rows. Rules
    /// whose attribute is null on the record emit nothing.
    pub fn evaluate(&self, record: &AttributeRecord) -> Vec<MedalAward> {
        let imputed;
        let record = match self.impute {
            Some(impute) => {
                imputed = record.imputed(impute);
                &imputed
            }
            None => record,
        };

        self.settings
            .catalogue
            .rules()
            .iter()
            .filter_map(|named| match &named.rule {
                MedalRule::Numeric(rule) => evaluate_numeric(
                    &named.name,
                    rule,
                    record,
                    &self.tables.numeric,
                    &self.settings.adjustments,
                    &self.settings.rival_teams,
                ),
                MedalRule::Categorical(rule) => {
                    evaluate_categorical(&named.name, rule, record, &self.tables.categorical)
                }
                MedalRule::Binary(rule) => {
                    evaluate_binary(&named.name, rule, record, &self.tables.categorical)
                }
            })
            .collect()
    }

    /// Ranked awards for one team: medals only, Gold first, with the
    /// consolation award guaranteeing at least one Gold.
    pub fn award(&self, record: &AttributeRecord) -> Vec<MedalAward> {
        let medals = combine_medals(self.evaluate(record));
        let mut medals = add_consolation_if_needed(medals, self.settings.catalogue.consolation());
        sort_medals(&mut medals);
        medals
    }
}

pub fn combine_medals(evaluated: Vec<MedalAward>) -> Vec<MedalAward> {
    evaluated
        .into_iter()
        .filter(|award| award.medal.is_awarded())
        .collect()
}

pub fn add_consolation_if_needed(
    mut medals: Vec<MedalAward>,
    consolation: &Presentation,
) -> Vec<MedalAward> {
    if medals.iter().any(|award| award.medal == Medal::Gold) {
        return medals;
    }
    debug!("no gold earned, adding consolation award");
    medals.insert(
        0,
        MedalAward {
            medal_name: CONSOLATION_AWARD.to_string(),
            medal: Medal::Gold,
            overview: consolation.text.clone(),
            image_path: consolation.image_path.clone(),
            medal_background: consolation.medal_background.clone(),
        },
    );
    medals
}

pub fn sort_medals(medals: &mut [MedalAward]) {
    medals.sort_by_key(|award| award.medal);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::{
        BinaryRule, CategoricalRule, NamedRule, NumericRule, Objective, RuleCatalogue, Thresholds,
    };
    use crate::scoring::{Adjustments, RivalTeams};
    use crate::tables::{
        CategoricalLookupRow, CategoricalLookupTable, NumericLookupRow, NumericLookupTable,
    };
    use crate::models::AttributeValue;
    use crate::profiling::PERCENTILE_GRID;

    fn presentation(text: &str) -> Presentation {
        Presentation {
            text: text.to_string(),
            image_path: format!("images/{}.png", text.to_lowercase().replace(' ', "_")),
            medal_background: "images/background.png".to_string(),
        }
    }

    fn numeric(name: &str, feature: &str, objective: Objective) -> NamedRule {
        NamedRule {
            name: name.to_string(),
            rule: MedalRule::Numeric(NumericRule {
                feature_name: feature.to_string(),
                objective,
                partition_feature: None,
                thresholds: Thresholds::new(5.0, 10.0, 20.0),
                presentation: presentation(name),
            }),
        }
    }

    fn settings() -> MedalSettings {
        let rules = vec![
            numeric("Golden Boot", "goals_scored", Objective::Maximise),
            numeric("Clean Hands", "red_cards", Objective::Minimise),
            numeric("Bench Warmer", "points_on_bench_total", Objective::Maximise),
            NamedRule {
                name: "Far From Home".to_string(),
                rule: MedalRule::Categorical(CategoricalRule {
                    feature_name: "region".to_string(),
                    thresholds: Thresholds::new(1.0, 5.0, 10.0),
                    presentation: presentation("Far From Home"),
                }),
            },
            NamedRule {
                name: "Full Kit".to_string(),
                rule: MedalRule::Binary(BinaryRule {
                    feature_name: "kit_full".to_string(),
                    gold_value: AttributeValue::Flag(true),
                    presentation: presentation("Full Kit"),
                }),
            },
        ];
        MedalSettings {
            catalogue: RuleCatalogue::new(rules, presentation("Harry Kane Award")),
            rival_teams: RivalTeams::default(),
            adjustments: Adjustments::new(),
            rejected: Vec::new(),
        }
    }

    /// Every numeric attribute spread evenly over 0..=100.
    fn tables() -> LookupTables {
        let mut rows = Vec::new();
        for feature in ["goals_scored", "red_cards", "points_on_bench_total"] {
            for &p in PERCENTILE_GRID.iter() {
                rows.push(NumericLookupRow {
                    column_name: feature.to_string(),
                    percentage: p,
                    interpolated_value_above: 100.0 - p,
                    interpolated_value_below: p,
                });
            }
        }
        let categorical = CategoricalLookupTable::from_rows(vec![
            CategoricalLookupRow {
                column_name: "region".to_string(),
                value: "England".to_string(),
                percentage_share: 0.9,
                rank_ascending: 2,
                rank_descending: 1,
            },
            CategoricalLookupRow {
                column_name: "region".to_string(),
                value: "Wales".to_string(),
                percentage_share: 0.1,
                rank_ascending: 1,
                rank_descending: 2,
            },
        ]);
        LookupTables {
            numeric: NumericLookupTable::from_rows(rows),
            categorical,
        }
    }

    fn names(medals: &[MedalAward]) -> Vec<(&str, Medal)> {
        medals
            .iter()
            .map(|award| (award.medal_name.as_str(), award.medal))
            .collect()
    }

    #[test]
    fn evaluate_keeps_no_medal_rows_and_skips_nulls() {
        let tables = tables();
        let settings = settings();
        let record = AttributeRecord::new()
            .with("goals_scored", 50.0)
            .with_null("red_cards")
            .with("points_on_bench_total", 99.0)
            .with("region", "England")
            .with("kit_full", false);

        let evaluated = MedalEngine::new(&tables, &settings).evaluate(&record);
        assert_eq!(
            names(&evaluated),
            vec![
                ("Golden Boot", Medal::NoMedal),
                ("Bench Warmer", Medal::Gold),
                ("Far From Home", Medal::NoMedal),
                ("Full Kit", Medal::NoMedal),
            ]
        );
    }

    #[test]
    fn awards_sorted_by_tier_in_catalogue_order() {
        let tables = tables();
        let settings = settings();
        let record = AttributeRecord::new()
            .with("goals_scored", 92.0)
            .with("red_cards", 4.0)
            .with("points_on_bench_total", 82.0)
            .with("region", "Wales")
            .with("kit_full", true);

        let medals = MedalEngine::new(&tables, &settings).award(&record);
        assert_eq!(
            names(&medals),
            vec![
                ("Clean Hands", Medal::Gold),
                ("Full Kit", Medal::Gold),
                ("Golden Boot", Medal::Silver),
                ("Bench Warmer", Medal::Bronze),
                ("Far From Home", Medal::Bronze),
            ]
        );
    }

    #[test]
    fn consolation_gold_leads_when_no_gold_earned() {
        let tables = tables();
        let settings = settings();
        let record = AttributeRecord::new()
            .with("goals_scored", 91.0)
            .with("red_cards", 60.0)
            .with("region", "England");

        let medals = MedalEngine::new(&tables, &settings).award(&record);
        assert_eq!(
            names(&medals),
            vec![(CONSOLATION_AWARD, Medal::Gold), ("Golden Boot", Medal::Silver)]
        );
        assert_eq!(medals[0].overview, "Harry Kane Award");
        assert_eq!(medals[0].image_path, "images/harry_kane_award.png");
    }

    #[test]
    fn empty_record_still_gets_one_gold() {
        let tables = tables();
        let settings = settings();
        let medals = MedalEngine::new(&tables, &settings).award(&AttributeRecord::new());
        assert_eq!(names(&medals), vec![(CONSOLATION_AWARD, Medal::Gold)]);
    }

    #[test]
    fn imputation_fills_nulls_before_scoring() {
        let tables = tables();
        let settings = settings();
        let mut impute = ImputeNulls::new();
        impute.insert("red_cards".to_string(), AttributeValue::Number(0.0));
        let record = AttributeRecord::new().with_null("red_cards");

        let medals = MedalEngine::new(&tables, &settings)
            .with_imputation(&impute)
            .award(&record);
        assert_eq!(names(&medals), vec![("Clean Hands", Medal::Gold)]);
    }

    #[test]
    fn imputation_leaves_absent_attributes_unscored() {
        let tables = tables();
        let settings = settings();
        let mut impute = ImputeNulls::new();
        impute.insert("red_cards".to_string(), AttributeValue::Number(0.0));
        impute.insert("kit_full".to_string(), AttributeValue::Flag(true));

        let evaluated = MedalEngine::new(&tables, &settings)
            .with_imputation(&impute)
            .evaluate(&AttributeRecord::new().with_null("red_cards"));
        assert_eq!(names(&evaluated), vec![("Clean Hands", Medal::Gold)]);
    }

    #[test]
    fn scoring_twice_gives_identical_output() {
        let tables = tables();
        let settings = settings();
        let engine = MedalEngine::new(&tables, &settings);
        let record = AttributeRecord::new()
            .with("goals_scored", 97.0)
            .with("red_cards", 12.0)
            .with("region", "Atlantis")
            .with("kit_full", true);

        assert_eq!(engine.award(&record), engine.award(&record));
    }
}

use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};

use crate::models::Medal;

use super::NOT_SPECIFIED;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Adjustment {
    /// The stored value is a fixed multiple of the displayed one.
    Scale { factor: f64 },
    RivalTeamOnly,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Adjustments {
    by_rule: HashMap<String, Adjustment>,
}

impl Adjustments {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, rule_name: impl Into<String>, adjustment: Adjustment) -> Self {
        self.by_rule.insert(rule_name.into(), adjustment);
        self
    }

    pub fn get(&self, rule_name: &str) -> Option<&Adjustment> {
        self.by_rule.get(rule_name)
    }

    pub fn apply(
        &self,
        rule_name: &str,
        value: f64,
        partition_value: &str,
        medal: Medal,
        rivals: &RivalTeams,
    ) -> (f64, Medal) {
        match self.get(rule_name) {
            None => (value, medal),
            Some(Adjustment::Scale { factor }) => (value * factor, medal),
            Some(Adjustment::RivalTeamOnly) => {
                if rivals.lacks_rivals(partition_value) {
                    (value, Medal::NoMedal)
                } else {
                    (value, medal)
                }
            }
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct RivalTeams {
    rivals: BTreeMap<String, Vec<String>>,
}

impl RivalTeams {
    pub fn new(rivals: BTreeMap<String, Vec<String>>) -> Self {
        Self { rivals }
    }

    pub fn rivals_of(&self, team: &str) -> Option<&[String]> {
        self.rivals.get(team).map(Vec::as_slice)
    }

    /// True when no favourite team is known or the team is listed without
    /// rivals. Teams missing from the list are given the benefit of the doubt.
    pub fn lacks_rivals(&self, team: &str) -> bool {
        if team == NOT_SPECIFIED {
            return true;
        }
        match self.rivals_of(team) {
            Some(rivals) => rivals.is_empty() || rivals.iter().all(|rival| rival == "None"),
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rivals() -> RivalTeams {
        let mut map = BTreeMap::new();
        map.insert("team_A".to_string(), vec!["team_B".to_string(), "team_C".to_string()]);
        map.insert("team_B".to_string(), vec!["team_A".to_string()]);
        map.insert("team_D".to_string(), vec!["None".to_string()]);
        RivalTeams::new(map)
    }

    fn adjustments() -> Adjustments {
        Adjustments::new()
            .with("Rival Hunter", Adjustment::RivalTeamOnly)
            .with("Bank Manager", Adjustment::Scale { factor: 0.1 })
    }

    #[test]
    fn rival_rule_needs_a_known_favourite_team() {
        let adjustments = adjustments();
        let rivals = rivals();
        assert_eq!(
            adjustments.apply("Rival Hunter", 3.0, NOT_SPECIFIED, Medal::Gold, &rivals),
            (3.0, Medal::NoMedal)
        );
        assert_eq!(
            adjustments.apply("Rival Hunter", 3.0, "team_D", Medal::Gold, &rivals),
            (3.0, Medal::NoMedal)
        );
        assert_eq!(
            adjustments.apply("Rival Hunter", 3.0, "team_A", Medal::Gold, &rivals),
            (3.0, Medal::Gold)
        );
    }

    #[test]
    fn scale_changes_value_but_not_medal() {
        assert_eq!(
            adjustments().apply("Bank Manager", 50.0, "AnyPartition", Medal::Silver, &rivals()),
            (5.0, Medal::Silver)
        );
    }

    #[test]
    fn unregistered_rules_pass_through() {
        assert_eq!(
            adjustments().apply("Golden Boot", 12.0, NOT_SPECIFIED, Medal::Bronze, &rivals()),
            (12.0, Medal::Bronze)
        );
    }

    #[test]
    fn adjustments_deserialize_by_kind() {
        let parsed: Adjustment =
            serde_yaml::from_str("kind: scale\nfactor: 0.1\n").expect("adjustment parses");
        assert_eq!(parsed, Adjustment::Scale { factor: 0.1 });
        let parsed: Adjustment =
            serde_yaml::from_str("kind: rival_team_only\n").expect("adjustment parses");
        assert_eq!(parsed, Adjustment::RivalTeamOnly);
    }
}

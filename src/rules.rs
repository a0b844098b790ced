use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_yaml::Mapping;
use tracing::{info, warn};

use crate::config::read_file;
use crate::error::{ConfigError, RuleError};
use crate::models::AttributeValue;
use crate::scoring::{Adjustment, Adjustments, RivalTeams};

pub const CONSOLATION_AWARD: &str = "Harry Kane Award";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuleKind {
    Numeric,
    Categorical,
    Binary,
    Special,
}

impl fmt::Display for RuleKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            RuleKind::Numeric => "numeric",
            RuleKind::Categorical => "categorical",
            RuleKind::Binary => "binary",
            RuleKind::Special => "special",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Objective {
    Minimise,
    Maximise,
}

/// Percentile cut-offs; lower percentiles are more exceptional.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Thresholds {
    pub gold_threshold: f64,
    pub silver_threshold: f64,
    pub bronze_threshold: f64,
}

impl Thresholds {
    pub fn new(gold: f64, silver: f64, bronze: f64) -> Self {
        Self {
            gold_threshold: gold,
            silver_threshold: silver,
            bronze_threshold: bronze,
        }
    }

    fn is_ordered(&self) -> bool {
        self.gold_threshold <= self.silver_threshold && self.silver_threshold <= self.bronze_threshold
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Presentation {
    pub text: String,
    pub image_path: String,
    pub medal_background: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NumericRule {
    pub feature_name: String,
    pub objective: Objective,
    #[serde(default)]
    pub partition_feature: Option<String>,
    #[serde(flatten)]
    pub thresholds: Thresholds,
    #[serde(flatten)]
    pub presentation: Presentation,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoricalRule {
    pub feature_name: String,
    #[serde(flatten)]
    pub thresholds: Thresholds,
    #[serde(flatten)]
    pub presentation: Presentation,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BinaryRule {
    pub feature_name: String,
    #[serde(alias = "gold_values")]
    pub gold_value: AttributeValue,
    #[serde(flatten)]
    pub presentation: Presentation,
}

#[derive(Debug, Clone, PartialEq)]
pub enum MedalRule {
    Numeric(NumericRule),
    Categorical(CategoricalRule),
    Binary(BinaryRule),
}

impl MedalRule {
    pub fn kind(&self) -> RuleKind {
        match self {
            MedalRule::Numeric(_) => RuleKind::Numeric,
            MedalRule::Categorical(_) => RuleKind::Categorical,
            MedalRule::Binary(_) => RuleKind::Binary,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct NamedRule {
    pub name: String,
    pub rule: MedalRule,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RuleCatalogue {
    rules: Vec<NamedRule>,
    consolation: Presentation,
}

impl RuleCatalogue {
    pub fn new(rules: Vec<NamedRule>, consolation: Presentation) -> Self {
        Self { rules, consolation }
    }

    pub fn rules(&self) -> &[NamedRule] {
        &self.rules
    }

    pub fn consolation(&self) -> &Presentation {
        &self.consolation
    }
}

#[derive(Debug, Deserialize)]
struct RawMedalConfig {
    #[serde(default)]
    numeric: Mapping,
    #[serde(default)]
    categorical: Mapping,
    #[serde(default)]
    binary: Mapping,
    #[serde(default)]
    special: Mapping,
    #[serde(default)]
    rival_teams: BTreeMap<String, Vec<String>>,
    #[serde(default)]
    adjustments: BTreeMap<String, Adjustment>,
}

#[derive(Debug, Clone)]
pub struct MedalSettings {
    pub catalogue: RuleCatalogue,
    pub rival_teams: RivalTeams,
    pub adjustments: Adjustments,
    /// Rules that failed to load; the rest of the catalogue is still usable.
    pub rejected: Vec<String>,
}

impl MedalSettings {
    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        let body = read_file(path)?;
        Self::from_yaml_str(&body)
    }

    pub fn from_yaml_str(body: &str) -> Result<Self, ConfigError> {
        let raw: RawMedalConfig = serde_yaml::from_str(body)?;
        let mut rejected = Vec::new();

        let mut rules = Vec::new();
        for (name, rule) in parse_section::<NumericRule>(&raw.numeric, RuleKind::Numeric, &mut rejected) {
            if let Err(error) = check_thresholds(&name, RuleKind::Numeric, &rule.thresholds) {
                reject(error, &mut rejected);
                continue;
            }
            rules.push(NamedRule {
                name,
                rule: MedalRule::Numeric(rule),
            });
        }
        for (name, rule) in
            parse_section::<CategoricalRule>(&raw.categorical, RuleKind::Categorical, &mut rejected)
        {
            if let Err(error) = check_thresholds(&name, RuleKind::Categorical, &rule.thresholds) {
                reject(error, &mut rejected);
                continue;
            }
            rules.push(NamedRule {
                name,
                rule: MedalRule::Categorical(rule),
            });
        }
        for (name, rule) in parse_section::<BinaryRule>(&raw.binary, RuleKind::Binary, &mut rejected) {
            rules.push(NamedRule {
                name,
                rule: MedalRule::Binary(rule),
            });
        }

        let consolation = parse_section::<Presentation>(&raw.special, RuleKind::Special, &mut rejected)
            .into_iter()
            .find(|(name, _)| name == CONSOLATION_AWARD)
            .map(|(_, presentation)| presentation)
            .ok_or_else(|| ConfigError::MissingConsolation(CONSOLATION_AWARD.to_string()))?;

        let adjustments = raw
            .adjustments
            .into_iter()
            .fold(Adjustments::new(), |adjustments, (rule, adjustment)| {
                adjustments.with(rule, adjustment)
            });

        info!(
            rules = rules.len(),
            rejected = rejected.len(),
            "medal catalogue loaded"
        );

        Ok(Self {
            catalogue: RuleCatalogue::new(rules, consolation),
            rival_teams: RivalTeams::new(raw.rival_teams),
            adjustments,
            rejected,
        })
    }
}

fn parse_section<T: DeserializeOwned>(
    section: &Mapping,
    kind: RuleKind,
    rejected: &mut Vec<String>,
) -> Vec<(String, T)> {
    let mut parsed = Vec::new();
    for (key, value) in section {
        let Some(name) = key.as_str() else {
            reject(RuleError::NonStringName { kind }, rejected);
            continue;
        };
        match serde_yaml::from_value::<T>(value.clone()) {
            Ok(rule) => parsed.push((name.to_string(), rule)),
            Err(source) => reject(
                RuleError::Malformed {
                    name: name.to_string(),
                    kind,
                    source,
                },
                rejected,
            ),
        }
    }
    parsed
}

fn check_thresholds(name: &str, kind: RuleKind, thresholds: &Thresholds) -> Result<(), RuleError> {
    if thresholds.is_ordered() {
        return Ok(());
    }
    Err(RuleError::ThresholdOrder {
        name: name.to_string(),
        kind,
        gold: thresholds.gold_threshold,
        silver: thresholds.silver_threshold,
        bronze: thresholds.bronze_threshold,
    })
}

fn reject(error: RuleError, rejected: &mut Vec<String>) {
    let detail = match std::error::Error::source(&error) {
        Some(source) => format!("{error}: {source}"),
        None => error.to_string(),
    };
    warn!(error = %detail, "medal rule rejected");
    rejected.push(detail);
}

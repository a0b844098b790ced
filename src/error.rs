use std::path::PathBuf;

use thiserror::Error;

use crate::rules::RuleKind;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse YAML configuration")]
    Yaml(#[from] serde_yaml::Error),
    #[error("special catalogue is missing the consolation award '{0}'")]
    MissingConsolation(String),
    #[error("DATABASE_URL must be set to a Postgres instance for this command")]
    MissingDatabaseUrl,
}

#[derive(Debug, Error)]
pub enum ProfileError {
    #[error("attribute '{attribute}' declares unknown kind '{kind}' (expected numeric or categorical)")]
    UnknownAttributeKind { attribute: String, kind: String },
}

#[derive(Debug, Error)]
pub enum RuleError {
    #[error("{kind} rule key is not a string")]
    NonStringName { kind: RuleKind },
    #[error("{kind} rule '{name}' is malformed")]
    Malformed {
        name: String,
        kind: RuleKind,
        #[source]
        source: serde_yaml::Error,
    },
    #[error("{kind} rule '{name}' has thresholds out of order (gold {gold}, silver {silver}, bronze {bronze})")]
    ThresholdOrder {
        name: String,
        kind: RuleKind,
        gold: f64,
        silver: f64,
        bronze: f64,
    },
}

#[derive(Debug, Error)]
pub enum TableError {
    #[error("lookup table I/O failed for {path}")]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },
    #[error("failed to access {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("training metadata at {path} is invalid")]
    Meta {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

#[derive(Debug, Error)]
pub enum SampleError {
    #[error("cannot draw {requested} ids from a population of {available}")]
    TooLarge { requested: usize, available: u64 },
    #[error("failed to read sample population")]
    Csv(#[from] csv::Error),
}

#[derive(Debug, Error)]
pub enum TelemetryError {
    #[error("invalid log level/filter '{value}': unable to build EnvFilter")]
    EnvFilter {
        value: String,
        #[source]
        source: tracing_subscriber::filter::ParseError,
    },
    #[error("telemetry error: {0}")]
    Subscriber(Box<dyn std::error::Error + Send + Sync>),
}

#[derive(Debug, Error)]
pub enum FeatureError {
    #[error("kit description is not a valid JSON object")]
    Kit(#[source] serde_json::Error),
    #[error("season name '{0}' does not start with a year")]
    SeasonName(String),
    #[error("failed to read player gameweek data")]
    Players(#[from] csv::Error),
}

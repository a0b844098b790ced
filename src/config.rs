use std::collections::BTreeMap;
use std::env;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::models::ImputeNulls;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttributeSpec {
    pub name: String,
    /// `numeric` or `categorical`; anything else fails that attribute only.
    pub kind: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfileConfig {
    pub training_sample_size: usize,
    pub random_seed: u64,
    pub attributes: Vec<AttributeSpec>,
    #[serde(default)]
    pub partitions: BTreeMap<String, String>,
    #[serde(default)]
    pub impute_nulls: ImputeNulls,
}

impl ProfileConfig {
    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        let body = read_file(path)?;
        Self::from_yaml_str(&body)
    }

    pub fn from_yaml_str(body: &str) -> Result<Self, ConfigError> {
        Ok(serde_yaml::from_str(body)?)
    }
}

pub(crate) fn read_file(path: &Path) -> Result<String, ConfigError> {
    std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })
}

#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
}

#[derive(Debug, Clone)]
pub struct AppSettings {
    pub database_url: Option<String>,
    pub telemetry: TelemetryConfig,
}

impl AppSettings {
    pub fn from_env() -> Self {
        let database_url = env::var("DATABASE_URL").ok().filter(|url| !url.trim().is_empty());
        let log_level = env::var("MEDALS_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        Self {
            database_url,
            telemetry: TelemetryConfig { log_level },
        }
    }

    pub fn require_database_url(&self) -> Result<&str, ConfigError> {
        self.database_url
            .as_deref()
            .ok_or(ConfigError::MissingDatabaseUrl)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::AttributeValue;

    const PROFILE: &str = r#"
training_sample_size: 1000
random_seed: 42
attributes:
  - name: goals_scored
    kind: numeric
  - name: player_region_iso_code_long
    kind: categorical
  - name: rival_team_player
    kind: numeric
partitions:
  rival_team_player: favourite_team
impute_nulls:
  yoyo_score: 0
  kit: false
"#;

    #[test]
    fn profile_config_parses_from_yaml() {
        let config = ProfileConfig::from_yaml_str(PROFILE).expect("profile parses");
        assert_eq!(config.training_sample_size, 1000);
        assert_eq!(config.random_seed, 42);
        assert_eq!(config.attributes.len(), 3);
        assert_eq!(config.attributes[1].kind, "categorical");
        assert_eq!(
            config.partitions.get("rival_team_player").map(String::as_str),
            Some("favourite_team")
        );
        assert_eq!(config.impute_nulls.get("yoyo_score"), Some(&AttributeValue::Number(0.0)));
        assert_eq!(config.impute_nulls.get("kit"), Some(&AttributeValue::Flag(false)));
    }

    #[test]
    fn partitions_and_imputation_are_optional() {
        let config = ProfileConfig::from_yaml_str(
            "training_sample_size: 5\nrandom_seed: 1\nattributes: []\n",
        )
        .expect("profile parses");
        assert!(config.partitions.is_empty());
        assert!(config.impute_nulls.is_empty());
    }

    #[test]
    fn missing_file_reports_path() {
        let error = ProfileConfig::from_path(Path::new("/nonexistent/profile.yaml"))
            .expect_err("file is missing");
        assert!(matches!(error, ConfigError::Io { .. }));
    }
}

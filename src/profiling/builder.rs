use std::str::FromStr;

use tracing::{debug, info, warn};

use crate::config::ProfileConfig;
use crate::error::ProfileError;
use crate::models::AttributeRecord;
use crate::tables::LookupTables;

use super::distribution::distribution_table_partitioned;
use super::lookup::{categorical_lookup, numeric_lookup_partitioned};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttributeKind {
    Numeric,
    Categorical,
}

impl FromStr for AttributeKind {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "numeric" => Ok(Self::Numeric),
            "categorical" => Ok(Self::Categorical),
            other => Err(other.to_string()),
        }
    }
}

#[derive(Debug, Default)]
pub struct ProfileOutcome {
    pub tables: LookupTables,
    pub failures: Vec<ProfileError>,
}

/// Profiles the sample population into numeric and categorical lookup tables.
///
/// Nulls are imputed first. Each attribute is processed independently: an
/// attribute with an unknown kind is reported in `failures` and the rest still
/// build, and an attribute without observations simply emits no rows.
pub fn build_lookup_tables(population: &[AttributeRecord], config: &ProfileConfig) -> ProfileOutcome {
    let records: Vec<AttributeRecord> = population
        .iter()
        .map(|record| record.imputed(&config.impute_nulls))
        .collect();

    let mut outcome = ProfileOutcome::default();

    for attribute in &config.attributes {
        let kind = match attribute.kind.parse::<AttributeKind>() {
            Ok(kind) => kind,
            Err(kind) => {
                let error = ProfileError::UnknownAttributeKind {
                    attribute: attribute.name.clone(),
                    kind,
                };
                warn!(error = %error, "skipping attribute");
                outcome.failures.push(error);
                continue;
            }
        };

        match kind {
            AttributeKind::Numeric => {
                let partition = config.partitions.get(&attribute.name).map(String::as_str);
                let distribution =
                    distribution_table_partitioned(&records, &attribute.name, partition);
                if distribution.is_empty() {
                    debug!(attribute = %attribute.name, "no numeric observations");
                    continue;
                }
                let rows = numeric_lookup_partitioned(&distribution, &attribute.name, partition);
                outcome.tables.numeric.extend(rows);
            }
            AttributeKind::Categorical => {
                if config.partitions.contains_key(&attribute.name) {
                    debug!(attribute = %attribute.name, "partition ignored for categorical attribute");
                }
                let rows = categorical_lookup(&records, &attribute.name);
                if rows.is_empty() {
                    debug!(attribute = %attribute.name, "no categorical observations");
                }
                outcome.tables.categorical.extend(rows);
            }
        }
    }

    info!(
        records = records.len(),
        numeric_rows = outcome.tables.numeric.len(),
        categorical_rows = outcome.tables.categorical.len(),
        failures = outcome.failures.len(),
        "lookup tables built"
    );
    outcome
}

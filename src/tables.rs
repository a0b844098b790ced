use std::collections::HashMap;
use std::path::Path;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;

use crate::error::TableError;

pub const NUMERIC_TABLE_FILE: &str = "numeric_columns.csv";
pub const CATEGORICAL_TABLE_FILE: &str = "categorical_columns.csv";
pub const TRAINING_META_FILE: &str = "training_meta.json";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NumericLookupRow {
    pub column_name: String,
    pub percentage: f64,
    pub interpolated_value_above: f64,
    pub interpolated_value_below: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoricalLookupRow {
    pub column_name: String,
    pub value: String,
    pub percentage_share: f64,
    #[serde(deserialize_with = "rank_from_number")]
    pub rank_ascending: u32,
    #[serde(deserialize_with = "rank_from_number")]
    pub rank_descending: u32,
}

// Ranks written by other tooling arrive as floats ("3.0").
fn rank_from_number<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    let value = f64::deserialize(deserializer)?;
    if value < 1.0 || value.fract() != 0.0 {
        return Err(serde::de::Error::custom(format!("invalid rank {value}")));
    }
    Ok(value as u32)
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct NumericLookupTable {
    rows: Vec<NumericLookupRow>,
    index: HashMap<String, Vec<usize>>,
}

impl NumericLookupTable {
    pub fn from_rows(rows: Vec<NumericLookupRow>) -> Self {
        let mut table = Self::default();
        table.extend(rows);
        table
    }

    pub fn extend(&mut self, rows: impl IntoIterator<Item = NumericLookupRow>) {
        for row in rows {
            self.index
                .entry(row.column_name.clone())
                .or_default()
                .push(self.rows.len());
            self.rows.push(row);
        }
    }

    pub fn rows(&self) -> &[NumericLookupRow] {
        &self.rows
    }

    pub fn rows_for<'a>(&'a self, column_name: &str) -> impl Iterator<Item = &'a NumericLookupRow> {
        self.index
            .get(column_name)
            .into_iter()
            .flatten()
            .map(move |&position| &self.rows[position])
    }

    pub fn contains(&self, column_name: &str) -> bool {
        self.index.contains_key(column_name)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CategoricalLookupTable {
    rows: Vec<CategoricalLookupRow>,
    index: HashMap<String, Vec<usize>>,
}

impl CategoricalLookupTable {
    pub fn from_rows(rows: Vec<CategoricalLookupRow>) -> Self {
        let mut table = Self::default();
        table.extend(rows);
        table
    }

    pub fn extend(&mut self, rows: impl IntoIterator<Item = CategoricalLookupRow>) {
        for row in rows {
            self.index
                .entry(row.column_name.clone())
                .or_default()
                .push(self.rows.len());
            self.rows.push(row);
        }
    }

    pub fn rows(&self) -> &[CategoricalLookupRow] {
        &self.rows
    }

    pub fn rows_for<'a>(
        &'a self,
        column_name: &str,
    ) -> impl Iterator<Item = &'a CategoricalLookupRow> {
        self.index
            .get(column_name)
            .into_iter()
            .flatten()
            .map(move |&position| &self.rows[position])
    }

    pub fn find(&self, column_name: &str, value: &str) -> Option<&CategoricalLookupRow> {
        self.rows_for(column_name).find(|row| row.value == value)
    }

    /// Worst ascending rank recorded for the attribute.
    pub fn max_rank_ascending(&self, column_name: &str) -> Option<u32> {
        self.rows_for(column_name).map(|row| row.rank_ascending).max()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct LookupTables {
    pub numeric: NumericLookupTable,
    pub categorical: CategoricalLookupTable,
}

impl LookupTables {
    pub fn write_dir(&self, dir: &Path) -> Result<(), TableError> {
        std::fs::create_dir_all(dir).map_err(|source| TableError::Io {
            path: dir.to_path_buf(),
            source,
        })?;
        write_rows(&dir.join(NUMERIC_TABLE_FILE), self.numeric.rows())?;
        write_rows(&dir.join(CATEGORICAL_TABLE_FILE), self.categorical.rows())?;
        Ok(())
    }

    pub fn read_dir(dir: &Path) -> Result<Self, TableError> {
        let numeric = read_rows(&dir.join(NUMERIC_TABLE_FILE))?;
        let categorical = read_rows(&dir.join(CATEGORICAL_TABLE_FILE))?;
        Ok(Self {
            numeric: NumericLookupTable::from_rows(numeric),
            categorical: CategoricalLookupTable::from_rows(categorical),
        })
    }
}

fn write_rows<T: Serialize>(path: &Path, rows: &[T]) -> Result<(), TableError> {
    let csv_error = |source| TableError::Csv {
        path: path.to_path_buf(),
        source,
    };
    let mut writer = csv::Writer::from_path(path).map_err(csv_error)?;
    for row in rows {
        writer.serialize(row).map_err(csv_error)?;
    }
    writer.flush().map_err(|source| TableError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(())
}

fn read_rows<T: for<'de> Deserialize<'de>>(path: &Path) -> Result<Vec<T>, TableError> {
    let csv_error = |source| TableError::Csv {
        path: path.to_path_buf(),
        source,
    };
    let mut reader = csv::Reader::from_path(path).map_err(csv_error)?;
    let mut rows = Vec::new();
    for result in reader.deserialize::<T>() {
        rows.push(result.map_err(csv_error)?);
    }
    Ok(rows)
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainingMeta {
    pub training_run_id: Uuid,
    pub trained_at: DateTime<Utc>,
    pub sample_size: usize,
    pub random_seed: Option<u64>,
    pub numeric_rows: usize,
    pub categorical_rows: usize,
}

impl TrainingMeta {
    pub fn new(sample_size: usize, random_seed: Option<u64>, tables: &LookupTables) -> Self {
        Self {
            training_run_id: Uuid::new_v4(),
            trained_at: Utc::now(),
            sample_size,
            random_seed,
            numeric_rows: tables.numeric.len(),
            categorical_rows: tables.categorical.len(),
        }
    }

    pub fn write(&self, dir: &Path) -> Result<(), TableError> {
        let path = dir.join(TRAINING_META_FILE);
        let body = serde_json::to_string_pretty(self).map_err(|source| TableError::Meta {
            path: path.clone(),
            source,
        })?;
        std::fs::write(&path, body).map_err(|source| TableError::Io { path, source })
    }

    pub fn read(dir: &Path) -> Result<Self, TableError> {
        let path = dir.join(TRAINING_META_FILE);
        let body = std::fs::read_to_string(&path).map_err(|source| TableError::Io {
            path: path.clone(),
            source,
        })?;
        serde_json::from_str(&body).map_err(|source| TableError::Meta { path, source })
    }
}

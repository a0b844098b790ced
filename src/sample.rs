use std::io::Read;
use std::path::Path;

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use crate::error::SampleError;
use crate::models::{AttributeRecord, AttributeValue};

/// Draws `size` distinct team ids from `1..=total`. The same seed always
/// yields the same ids in the same order.
pub fn draw_sample_ids(total: u64, size: usize, seed: u64) -> Result<Vec<u64>, SampleError> {
    if size as u64 > total {
        return Err(SampleError::TooLarge {
            requested: size,
            available: total,
        });
    }
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let ids = rand::seq::index::sample(&mut rng, total as usize, size)
        .into_iter()
        .map(|index| index as u64 + 1)
        .collect();
    Ok(ids)
}

pub fn read_population<R: Read>(reader: R) -> Result<Vec<AttributeRecord>, SampleError> {
    let mut reader = csv::Reader::from_reader(reader);
    let headers = reader.headers()?.clone();

    let mut records = Vec::new();
    for row in reader.records() {
        let row = row?;
        let mut record = AttributeRecord::new();
        for (name, cell) in headers.iter().zip(row.iter()) {
            record.insert(name, AttributeValue::parse_cell(cell));
        }
        records.push(record);
    }
    Ok(records)
}

pub fn read_population_file(path: &Path) -> Result<Vec<AttributeRecord>, SampleError> {
    let file = std::fs::File::open(path).map_err(csv::Error::from)?;
    read_population(file)
}

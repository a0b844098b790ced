//! Batch profiling of the sample population into lookup tables.

mod builder;
mod distribution;
mod lookup;

pub use builder::{build_lookup_tables, AttributeKind, ProfileOutcome};
pub use distribution::{distribution_table, distribution_table_partitioned, DistributionRow};
pub use lookup::{
    categorical_lookup, interpolate, numeric_lookup, numeric_lookup_partitioned, PERCENTILE_GRID,
};

pub(crate) fn round3(value: f64) -> f64 {
    (value * 1000.0).round_ties_even() / 1000.0
}

#[cfg(test)]
mod tests {
    use super::round3;

    #[test]
    fn round3_sends_ties_to_even() {
        assert_eq!(round3(0.0625), 0.062);
        assert_eq!(round3(0.1875), 0.188);
        assert_eq!(round3(2.5), 2.5);
        assert_eq!(round3(33.33333), 33.333);
    }
}

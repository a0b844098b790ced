//! Fantasy team medals: lookup tables built from a sample population, and
//! per-team medal scoring against them.

pub mod config;
pub mod db;
pub mod error;
pub mod features;
pub mod models;
pub mod profiling;
pub mod report;
pub mod rules;
pub mod sample;
pub mod scoring;
pub mod tables;
pub mod telemetry;

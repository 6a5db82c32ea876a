pub mod compare;
pub mod config;
pub mod dataset;
pub mod error;
pub mod output;
pub mod schema;
pub mod scoring;
pub mod telemetry;

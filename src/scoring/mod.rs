pub mod config;
pub mod engine;
pub mod factors;
pub mod lookup;
pub mod validation;
pub mod whatif;

pub use config::*;
pub use engine::{calculate_composite, score_record, score_records, CompositeResult, EcoSource, RecordScore, ScoringModel};
pub use factors::{adjusted_carbon, Factor};
pub use lookup::{emission_factor_lookup, recyclability_lookup, Lookups};
pub use validation::validate_scoring;
pub use whatif::{simulate, Simulation, WhatIf};

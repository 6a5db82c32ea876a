//! What-if simulation of EcoScore under hypothetical changes.
//!
//! This is an illustrative sensitivity model, not a life-cycle assessment.
//! Less recyclable packaging is assumed to attract proportionally more
//! process carbon, and each point of recyclability or gram of carbon moves
//! the EcoScore by a fixed amount.

use serde::Serialize;

use super::engine::{score_record, ScoringModel, UNKNOWN_PACKAGING};
use super::factors::clamp_score;
use crate::dataset::ProductRecord;
use crate::error::{Notice, SimulationError};

pub const MIN_TWEAK: f64 = 0.5;
pub const MAX_TWEAK: f64 = 2.0;
/// EcoScore points per point of recyclability gained
pub const RECYCLABILITY_WEIGHT: f64 = 0.15;
/// EcoScore points lost per gram of CO2e added
pub const CARBON_WEIGHT: f64 = 0.02;

/// Hypothetical changes to apply. `None` keeps the record's current value.
#[derive(Debug, Clone, PartialEq)]
pub struct WhatIf {
    pub packaging: Option<String>,
    pub country: Option<String>,
    /// Manual carbon multiplier in [0.5, 2.0]
    pub tweak: f64,
    /// Hypothetical ingredient-safety improvement in points (0-100)
    pub safety_gain: f64,
}

impl Default for WhatIf {
    fn default() -> Self {
        Self {
            packaging: None,
            country: None,
            tweak: 1.0,
            safety_gain: 0.0,
        }
    }
}

impl WhatIf {
    pub fn validate(&self) -> Result<(), SimulationError> {
        if !(MIN_TWEAK..=MAX_TWEAK).contains(&self.tweak) {
            return Err(SimulationError::TweakOutOfRange(self.tweak));
        }
        if !(0.0..=100.0).contains(&self.safety_gain) {
            return Err(SimulationError::SafetyGainOutOfRange(self.safety_gain));
        }
        Ok(())
    }
}

/// Current state of a product as seen by the model.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Baseline {
    pub recyclability: f64,
    pub country_factor: f64,
    pub adjusted_carbon: f64,
    pub eco_score: Option<f64>,
}

/// Target state under the hypothesis.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Scenario {
    pub recyclability: f64,
    pub country_factor: f64,
    pub tweak: f64,
    /// Extra EcoScore points from ingredient changes, already weighted
    pub safety_bonus: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Projection {
    pub simulated_carbon: f64,
    pub eco_delta: f64,
    pub simulated_eco_score: Option<f64>,
}

/// Share of process carbon attributed to packaging with recyclability `r`.
pub fn pack_effect(recyclability: f64) -> f64 {
    (100.0 - recyclability) / 100.0
}

/// Project carbon and EcoScore from a baseline onto a scenario.
pub fn project(baseline: &Baseline, scenario: &Scenario) -> Projection {
    let old_effect = pack_effect(baseline.recyclability);
    let new_effect = pack_effect(scenario.recyclability);

    // Strip the origin factor to get a country-independent baseline
    let raw_base = if baseline.country_factor != 0.0 {
        baseline.adjusted_carbon / baseline.country_factor
    } else {
        baseline.adjusted_carbon
    };
    let ratio = if old_effect == 0.0 { 1.0 } else { new_effect / old_effect };
    let raw_new = raw_base * ratio;

    let simulated_carbon = (raw_new * scenario.country_factor * scenario.tweak).max(0.0);

    let eco_delta = (scenario.recyclability - baseline.recyclability) * RECYCLABILITY_WEIGHT
        - (simulated_carbon - baseline.adjusted_carbon) * CARBON_WEIGHT
        + scenario.safety_bonus;

    Projection {
        simulated_carbon,
        eco_delta,
        simulated_eco_score: baseline.eco_score.map(|s| clamp_score(s + eco_delta)),
    }
}

/// Full what-if outcome for one record.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Simulation {
    pub product: String,
    pub old_packaging: String,
    pub new_packaging: String,
    pub old_country: Option<String>,
    pub new_country: Option<String>,
    pub old_recyclability: f64,
    pub new_recyclability: f64,
    pub old_country_factor: f64,
    pub new_country_factor: f64,
    pub tweak: f64,
    pub carbon_before: Option<f64>,
    pub base_eco_score: Option<f64>,
    pub projection: Option<Projection>,
    pub notices: Vec<Notice>,
}

impl Simulation {
    pub fn simulated_carbon(&self) -> Option<f64> {
        self.projection.map(|p| p.simulated_carbon)
    }

    pub fn simulated_eco_score(&self) -> Option<f64> {
        self.projection.and_then(|p| p.simulated_eco_score)
    }
}

/// Run a what-if scenario for a record.
///
/// Reusing the record's own packaging keeps its current recyclability even if
/// that came from the dataset rather than the lookup table, so an unchanged
/// scenario reproduces the current carbon and EcoScore exactly.
pub fn simulate(
    record: &ProductRecord,
    what_if: &WhatIf,
    model: &ScoringModel,
) -> Result<Simulation, SimulationError> {
    what_if.validate()?;

    let current = score_record(record, model);
    let old_packaging = record
        .packaging_type
        .clone()
        .unwrap_or_else(|| UNKNOWN_PACKAGING.to_string());
    let new_packaging = what_if
        .packaging
        .clone()
        .unwrap_or_else(|| old_packaging.clone());

    let new_recyclability = if new_packaging.trim().eq_ignore_ascii_case(old_packaging.trim()) {
        current.recyclability
    } else {
        model.lookups.recyclability(&new_packaging)
    };

    let new_country = what_if
        .country
        .clone()
        .or_else(|| record.country_of_origin.clone());
    let new_country_factor = model.lookups.emission_factor(new_country.as_deref());

    let mut notices = Vec::new();
    let feature = format!("What-if for {}", record.product);

    let projection = match current.adjusted_carbon {
        Some(adjusted) => {
            let baseline = Baseline {
                recyclability: current.recyclability,
                country_factor: current.country_factor,
                adjusted_carbon: adjusted,
                eco_score: current.eco_score,
            };
            let scenario = Scenario {
                recyclability: new_recyclability,
                country_factor: new_country_factor,
                tweak: what_if.tweak,
                safety_bonus: what_if.safety_gain * model.weights.ingredients,
            };
            if current.eco_score.is_none() {
                notices.push(Notice::missing(&feature, "no base EcoScore; simulated score unavailable"));
            }
            Some(project(&baseline, &scenario))
        }
        None => {
            notices.push(Notice::missing(&feature, "no carbon intensity; simulation unavailable"));
            None
        }
    };

    tracing::debug!(
        product = %record.product,
        old_recyclability = current.recyclability,
        new_recyclability,
        new_country_factor,
        tweak = what_if.tweak,
        "simulated what-if"
    );

    Ok(Simulation {
        product: record.product.clone(),
        old_packaging,
        new_packaging,
        old_country: record.country_of_origin.clone(),
        new_country,
        old_recyclability: current.recyclability,
        new_recyclability,
        old_country_factor: current.country_factor,
        new_country_factor,
        tweak: what_if.tweak,
        carbon_before: current.adjusted_carbon,
        base_eco_score: current.eco_score,
        projection,
        notices,
    })
}

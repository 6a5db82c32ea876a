use serde::Serialize;

use super::config::{ScoringConfig, Weights, DEFAULT_CARBON_CEILING, DEFAULT_CONCERN_INGREDIENTS, DEFAULT_PRICE_CEILING};
use super::factors::{self, Factor};
use super::lookup::Lookups;
use crate::dataset::ProductRecord;
use crate::error::Notice;

/// Packaging name used when a record has none.
pub const UNKNOWN_PACKAGING: &str = "Unknown";

/// Resolved scoring settings: config with defaults applied plus lookup tables.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoringModel {
    pub weights: Weights,
    pub carbon_ceiling: f64,
    pub price_ceiling: f64,
    pub concern_ingredients: Vec<String>,
    pub lookups: Lookups,
}

impl Default for ScoringModel {
    fn default() -> Self {
        Self::from_config(&ScoringConfig::default(), Lookups::default())
    }
}

impl ScoringModel {
    pub fn from_config(config: &ScoringConfig, lookups: Lookups) -> Self {
        Self {
            weights: config.weights.unwrap_or_default(),
            carbon_ceiling: config.carbon_ceiling.unwrap_or(DEFAULT_CARBON_CEILING),
            price_ceiling: config.price_ceiling.unwrap_or(DEFAULT_PRICE_CEILING),
            concern_ingredients: config.concern_ingredients.clone().unwrap_or_else(|| {
                DEFAULT_CONCERN_INGREDIENTS
                    .iter()
                    .map(|s| s.to_string())
                    .collect()
            }),
            lookups,
        }
    }

    pub fn weight(&self, factor: Factor) -> f64 {
        match factor {
            Factor::Ingredients => self.weights.ingredients,
            Factor::Carbon => self.weights.carbon,
            Factor::Packaging => self.weights.packaging,
            Factor::Price => self.weights.price,
        }
    }

    /// Stored recyclability, else the packaging lookup.
    pub fn recyclability(&self, record: &ProductRecord) -> f64 {
        record.recyclability_score.unwrap_or_else(|| {
            self.lookups
                .recyclability(record.packaging_type.as_deref().unwrap_or(UNKNOWN_PACKAGING))
        })
    }

    pub fn country_factor(&self, record: &ProductRecord) -> f64 {
        self.lookups.emission_factor(record.country_of_origin.as_deref())
    }

    pub fn adjusted_carbon(&self, record: &ProductRecord) -> Option<f64> {
        record
            .carbon_intensity
            .map(|raw| factors::adjusted_carbon(raw, self.country_factor(record)))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FactorContribution {
    pub factor: Factor,
    pub weight: f64,
    pub subscore: Option<f64>,
    pub contribution: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompositeResult {
    pub score: Option<f64>,
    pub factors: Vec<FactorContribution>,
    pub notices: Vec<Notice>,
}

/// Compute the baseline composite EcoScore for a record.
///
/// `0.40 * ingredient_safety + 0.30 * carbon + 0.20 * packaging + 0.10 * price`
/// with the configured weights. If any sub-factor is unavailable the composite
/// is unavailable too; it is never computed from partial data.
pub fn calculate_composite(record: &ProductRecord, model: &ScoringModel) -> CompositeResult {
    let mut notices = Vec::new();
    let feature = format!("Composite EcoScore for {}", record.product);

    let ingredients = factors::ingredient_safety(&record.main_ingredients, &model.concern_ingredients);
    if ingredients.is_none() {
        notices.push(Notice::missing(&feature, "no ingredient list"));
    }

    let carbon = model
        .adjusted_carbon(record)
        .map(|c| factors::carbon_subscore(c, model.carbon_ceiling));
    if carbon.is_none() {
        notices.push(Notice::missing(&feature, "no carbon intensity"));
    }

    let packaging = Some(factors::packaging_subscore(model.recyclability(record)));

    let price = record
        .price
        .map(|p| factors::price_subscore(p, model.price_ceiling));
    if price.is_none() {
        notices.push(Notice::missing(&feature, "no price"));
    }

    let subscores = [ingredients, carbon, packaging, price];
    let factors: Vec<FactorContribution> = Factor::ALL
        .iter()
        .zip(subscores)
        .map(|(factor, subscore)| {
            let weight = model.weight(*factor);
            FactorContribution {
                factor: *factor,
                weight,
                subscore,
                contribution: subscore.map(|s| s * weight),
            }
        })
        .collect();

    let score = factors
        .iter()
        .map(|f| f.contribution)
        .sum::<Option<f64>>()
        .map(factors::clamp_score);

    CompositeResult {
        score,
        factors,
        notices,
    }
}

/// Where a record's effective EcoScore came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EcoSource {
    Stored,
    Computed,
    Unavailable,
}

/// Derived values for one record. The record itself is borrowed, never changed.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecordScore<'a> {
    pub record: &'a ProductRecord,
    pub recyclability: f64,
    pub country_factor: f64,
    pub adjusted_carbon: Option<f64>,
    pub eco_score: Option<f64>,
    pub eco_source: EcoSource,
    /// Present only when the dataset had no EcoScore for this record
    #[serde(skip_serializing_if = "Option::is_none")]
    pub composite: Option<CompositeResult>,
}

impl RecordScore<'_> {
    pub fn notices(&self) -> &[Notice] {
        self.composite
            .as_ref()
            .map(|c| c.notices.as_slice())
            .unwrap_or(&[])
    }
}

/// Score one record. A stored EcoScore is trusted as-is.
pub fn score_record<'a>(record: &'a ProductRecord, model: &ScoringModel) -> RecordScore<'a> {
    let (eco_score, eco_source, composite) = match record.eco_score {
        Some(stored) => (Some(stored), EcoSource::Stored, None),
        None => {
            let composite = calculate_composite(record, model);
            let source = if composite.score.is_some() {
                EcoSource::Computed
            } else {
                EcoSource::Unavailable
            };
            (composite.score, source, Some(composite))
        }
    };

    RecordScore {
        record,
        recyclability: model.recyclability(record),
        country_factor: model.country_factor(record),
        adjusted_carbon: model.adjusted_carbon(record),
        eco_score,
        eco_source,
        composite,
    }
}

pub fn score_records<'a>(records: &[&'a ProductRecord], model: &ScoringModel) -> Vec<RecordScore<'a>> {
    records.iter().map(|r| score_record(r, model)).collect()
}

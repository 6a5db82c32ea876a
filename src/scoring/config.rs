use serde::{Deserialize, Serialize};

/// Scoring configuration.
///
/// Controls the baseline composite EcoScore that is computed for records whose
/// dataset row has no EcoScore of its own. Every field is optional; missing
/// fields fall back to the built-in defaults.
///
/// Example YAML:
/// ```yaml
/// scoring:
///   weights:
///     ingredients: 0.4
///     carbon: 0.3
///     packaging: 0.2
///     price: 0.1
///   carbon_ceiling: 500
///   price_ceiling: 50
///   concern_ingredients: ["paraben", "sulfate"]
/// ```
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct ScoringConfig {
    /// Composite weights (must sum to 1.0)
    #[serde(default)]
    pub weights: Option<Weights>,

    /// Adjusted carbon (gCO2e) at or above which the carbon subscore is 0
    #[serde(default)]
    pub carbon_ceiling: Option<f64>,

    /// Price at or above which the price subscore is 0
    #[serde(default)]
    pub price_ceiling: Option<f64>,

    /// Ingredient keywords that count against ingredient safety.
    /// Matched case-insensitively as substrings of each ingredient.
    #[serde(default)]
    pub concern_ingredients: Option<Vec<String>>,
}

pub const DEFAULT_CARBON_CEILING: f64 = 500.0;
pub const DEFAULT_PRICE_CEILING: f64 = 50.0;

pub const DEFAULT_CONCERN_INGREDIENTS: [&str; 10] = [
    "paraben",
    "sulfate",
    "phthalate",
    "triclosan",
    "formaldehyde",
    "fragrance",
    "parfum",
    "microbead",
    "oxybenzone",
    "silicone",
];

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            weights: Some(Weights::default()),
            carbon_ceiling: Some(DEFAULT_CARBON_CEILING),
            price_ceiling: Some(DEFAULT_PRICE_CEILING),
            concern_ingredients: Some(
                DEFAULT_CONCERN_INGREDIENTS
                    .iter()
                    .map(|s| s.to_string())
                    .collect(),
            ),
        }
    }
}

/// Weights of the four composite sub-factors.
#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct Weights {
    pub ingredients: f64,
    pub carbon: f64,
    pub packaging: f64,
    pub price: f64,
}

impl Default for Weights {
    fn default() -> Self {
        Self {
            ingredients: 0.40,
            carbon: 0.30,
            packaging: 0.20,
            price: 0.10,
        }
    }
}

impl Weights {
    pub fn sum(&self) -> f64 {
        self.ingredients + self.carbon + self.packaging + self.price
    }
}

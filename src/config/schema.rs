use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::schema::AliasTable;
use crate::scoring::{Lookups, ScoringConfig, ScoringModel};

#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Default dataset CSV path (overridden by --data)
    #[serde(default)]
    pub dataset: Option<String>,

    /// Per-field replacement alias lists, keyed by canonical field name
    #[serde(default)]
    pub aliases: Option<BTreeMap<String, Vec<String>>>,

    #[serde(default)]
    pub scoring: Option<ScoringConfig>,

    /// Packaging -> recyclability additions/overrides
    #[serde(default)]
    pub recyclability: Option<BTreeMap<String, f64>>,

    /// Country -> emission factor additions/overrides
    #[serde(default)]
    pub emission_factors: Option<BTreeMap<String, f64>>,

    #[serde(default)]
    pub telemetry: Option<TelemetryConfig>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct TelemetryConfig {
    /// Count runs in a local file
    #[serde(default)]
    pub visit_counter: bool,

    /// Counter file (defaults to ~/.config/ecoscore/visits.json)
    #[serde(default)]
    pub path: Option<String>,
}

impl Config {
    pub fn alias_table(&self) -> AliasTable {
        match self.aliases {
            Some(ref overrides) => AliasTable::with_overrides(overrides),
            None => AliasTable::default(),
        }
    }

    pub fn lookups(&self) -> Lookups {
        let empty = BTreeMap::new();
        Lookups::with_overrides(
            self.recyclability.as_ref().unwrap_or(&empty),
            self.emission_factors.as_ref().unwrap_or(&empty),
        )
    }

    pub fn scoring_model(&self) -> ScoringModel {
        let scoring = self.scoring.clone().unwrap_or_default();
        ScoringModel::from_config(&scoring, self.lookups())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::CanonicalField;

    #[test]
    fn test_empty_config_parse() {
        let config: Config = serde_saphyr::from_str("{}").unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_full_config_parse() {
        let yaml = r#"
dataset: "data/products.csv"
aliases:
  price: ["msrp", "retail_price"]
scoring:
  carbon_ceiling: 400
recyclability:
  Compostable Film: 75
emission_factors:
  Sweden: 0.3
telemetry:
  visit_counter: true
"#;
        let config: Config = serde_saphyr::from_str(yaml).unwrap();
        assert_eq!(config.dataset.as_deref(), Some("data/products.csv"));
        assert_eq!(
            config.alias_table().aliases(CanonicalField::Price),
            &["msrp".to_string(), "retail_price".to_string()]
        );
        assert_eq!(config.lookups().recyclability("compostable film"), 75.0);
        assert_eq!(config.lookups().emission_factor(Some("Sweden")), 0.3);
        assert_eq!(config.scoring_model().carbon_ceiling, 400.0);
        assert!(config.telemetry.unwrap().visit_counter);
    }

    #[test]
    fn test_default_model_from_empty_config() {
        let model = Config::default().scoring_model();
        assert_eq!(model, ScoringModel::default());
    }

    #[test]
    fn test_unknown_top_level_key_rejected() {
        let result: Result<Config, _> = serde_saphyr::from_str("queries: []\n");
        assert!(result.is_err());
    }
}

use std::collections::{BTreeMap, HashMap};

/// Recyclability (0-100) per packaging material.
pub const RECYCLABILITY_TABLE: [(&str, f64); 12] = [
    ("Plastic", 40.0),
    ("Recycled Plastic", 65.0),
    ("Glass", 90.0),
    ("Aluminum", 85.0),
    ("Paper", 88.0),
    ("Cardboard", 88.0),
    ("Bioplastic", 70.0),
    ("Pump Bottle", 50.0),
    ("Aerosol Can", 30.0),
    ("Refill Pouch", 80.0),
    ("Tube", 45.0),
    ("Unknown", 60.0),
];

/// Grid/process emission multiplier per country of origin.
pub const EMISSION_FACTOR_TABLE: [(&str, f64); 8] = [
    ("USA", 1.0),
    ("France", 0.6),
    ("Germany", 0.8),
    ("India", 1.5),
    ("China", 1.8),
    ("Canada", 0.7),
    ("Brazil", 0.9),
    ("Japan", 1.0),
];

pub const DEFAULT_RECYCLABILITY: f64 = 60.0;
pub const DEFAULT_EMISSION_FACTOR: f64 = 1.0;

const UNKNOWN_KEY: &str = "unknown";

fn key(s: &str) -> String {
    s.trim().to_lowercase()
}

/// Packaging and country lookup tables.
///
/// Keys match case-insensitively on trimmed input. Both lookups are total:
/// anything unmapped falls back to the table's default.
#[derive(Debug, Clone, PartialEq)]
pub struct Lookups {
    recyclability: HashMap<String, f64>,
    emission_factors: HashMap<String, f64>,
}

impl Default for Lookups {
    fn default() -> Self {
        Self {
            recyclability: RECYCLABILITY_TABLE
                .iter()
                .map(|(k, v)| (key(k), *v))
                .collect(),
            emission_factors: EMISSION_FACTOR_TABLE
                .iter()
                .map(|(k, v)| (key(k), *v))
                .collect(),
        }
    }
}

impl Lookups {
    /// Built-in tables plus additions/replacements from config.
    pub fn with_overrides(
        recyclability: &BTreeMap<String, f64>,
        emission_factors: &BTreeMap<String, f64>,
    ) -> Self {
        let mut lookups = Self::default();
        for (k, v) in recyclability {
            lookups.recyclability.insert(key(k), *v);
        }
        for (k, v) in emission_factors {
            lookups.emission_factors.insert(key(k), *v);
        }
        lookups
    }

    /// Unmapped packaging takes the "Unknown" entry, so overriding it moves
    /// the default too.
    pub fn recyclability(&self, packaging: &str) -> f64 {
        self.recyclability
            .get(&key(packaging))
            .or_else(|| self.recyclability.get(UNKNOWN_KEY))
            .copied()
            .unwrap_or(DEFAULT_RECYCLABILITY)
    }

    /// Factor for a country; a missing country counts as unmapped.
    pub fn emission_factor(&self, country: Option<&str>) -> f64 {
        country
            .and_then(|c| self.emission_factors.get(&key(c)))
            .copied()
            .unwrap_or(DEFAULT_EMISSION_FACTOR)
    }
}

/// Recyclability from the built-in table. Never fails.
pub fn recyclability_lookup(packaging: &str) -> f64 {
    RECYCLABILITY_TABLE
        .iter()
        .find(|(k, _)| k.eq_ignore_ascii_case(packaging.trim()))
        .map(|(_, v)| *v)
        .unwrap_or(DEFAULT_RECYCLABILITY)
}

/// Emission factor from the built-in table. Never fails.
pub fn emission_factor_lookup(country: &str) -> f64 {
    EMISSION_FACTOR_TABLE
        .iter()
        .find(|(k, _)| k.eq_ignore_ascii_case(country.trim()))
        .map(|(_, v)| *v)
        .unwrap_or(DEFAULT_EMISSION_FACTOR)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recyclability_known_packaging() {
        assert_eq!(recyclability_lookup("Plastic"), 40.0);
        assert_eq!(recyclability_lookup("Glass"), 90.0);
        assert_eq!(recyclability_lookup("Aerosol Can"), 30.0);
    }

    #[test]
    fn test_recyclability_unknown_defaults_to_60() {
        assert_eq!(recyclability_lookup("Mystery Material"), 60.0);
        assert_eq!(recyclability_lookup(""), 60.0);
    }

    #[test]
    fn test_recyclability_case_insensitive() {
        assert_eq!(recyclability_lookup("  refill pouch "), 80.0);
        assert_eq!(Lookups::default().recyclability("GLASS"), 90.0);
    }

    #[test]
    fn test_emission_factor_known_and_default() {
        assert_eq!(emission_factor_lookup("China"), 1.8);
        assert_eq!(emission_factor_lookup("france"), 0.6);
        assert_eq!(emission_factor_lookup("Atlantis"), 1.0);
    }

    #[test]
    fn test_missing_country_uses_default_factor() {
        assert_eq!(Lookups::default().emission_factor(None), 1.0);
    }

    #[test]
    fn test_default_lookups_agree_with_free_functions() {
        let lookups = Lookups::default();
        for (name, value) in RECYCLABILITY_TABLE {
            assert_eq!(lookups.recyclability(name), value);
        }
        for (name, value) in EMISSION_FACTOR_TABLE {
            assert_eq!(lookups.emission_factor(Some(name)), value);
        }
    }

    #[test]
    fn test_overrides_add_and_replace() {
        let mut recyc = BTreeMap::new();
        recyc.insert("Plastic".to_string(), 45.0);
        recyc.insert("Compostable Film".to_string(), 75.0);
        let mut factors = BTreeMap::new();
        factors.insert("Sweden".to_string(), 0.3);

        let lookups = Lookups::with_overrides(&recyc, &factors);
        assert_eq!(lookups.recyclability("plastic"), 45.0);
        assert_eq!(lookups.recyclability("compostable film"), 75.0);
        assert_eq!(lookups.recyclability("Glass"), 90.0);
        assert_eq!(lookups.emission_factor(Some("SWEDEN")), 0.3);
        assert_eq!(lookups.emission_factor(Some("Mars")), 1.0);
    }

    #[test]
    fn test_unknown_override_is_the_fallback() {
        let mut recyc = BTreeMap::new();
        recyc.insert("Unknown".to_string(), 50.0);
        let lookups = Lookups::with_overrides(&recyc, &BTreeMap::new());
        assert_eq!(lookups.recyclability("Unknown"), 50.0);
        assert_eq!(lookups.recyclability("Mystery Material"), 50.0);
        assert_eq!(lookups.recyclability("Glass"), 90.0);
    }
}

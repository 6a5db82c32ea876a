//! Sub-factor normalizations for the baseline composite EcoScore.
//!
//! No canonical formula exists for ingredient safety or price fairness, so the
//! normalizations here are placeholders: simple, monotonic and documented.
//! Each maps its input onto 0-100 where higher means more sustainable.

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Factor {
    Ingredients,
    Carbon,
    Packaging,
    Price,
}

impl Factor {
    pub const ALL: [Factor; 4] = [Factor::Ingredients, Factor::Carbon, Factor::Packaging, Factor::Price];

    pub fn label(self) -> &'static str {
        match self {
            Factor::Ingredients => "Ingredient safety",
            Factor::Carbon => "Carbon",
            Factor::Packaging => "Packaging",
            Factor::Price => "Price",
        }
    }
}

pub fn clamp_score(value: f64) -> f64 {
    value.clamp(0.0, 100.0)
}

/// Raw carbon intensity scaled by a country emission factor.
pub fn adjusted_carbon(raw: f64, factor: f64) -> f64 {
    raw * factor
}

/// Share of ingredients free of every concern keyword, as 0-100.
/// None for an empty ingredient list.
pub fn ingredient_safety(ingredients: &[String], concerns: &[String]) -> Option<f64> {
    if ingredients.is_empty() {
        return None;
    }
    let concerns: Vec<String> = concerns
        .iter()
        .map(|c| c.trim().to_lowercase())
        .filter(|c| !c.is_empty())
        .collect();
    let flagged = ingredients
        .iter()
        .filter(|ing| {
            let ing = ing.to_lowercase();
            concerns.iter().any(|c| ing.contains(c.as_str()))
        })
        .count();
    Some(clamp_score(100.0 * (1.0 - flagged as f64 / ingredients.len() as f64)))
}

/// Linear falloff from 100 at zero carbon to 0 at the ceiling.
pub fn carbon_subscore(adjusted_carbon: f64, ceiling: f64) -> f64 {
    clamp_score(100.0 * (1.0 - adjusted_carbon / ceiling))
}

pub fn packaging_subscore(recyclability: f64) -> f64 {
    clamp_score(recyclability)
}

/// Linear falloff from 100 at price zero to 0 at the ceiling.
pub fn price_subscore(price: f64, ceiling: f64) -> f64 {
    clamp_score(100.0 * (1.0 - price / ceiling))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_adjusted_carbon() {
        assert_eq!(adjusted_carbon(100.0, 1.8), 180.0);
        assert_eq!(adjusted_carbon(100.0, 1.0), 100.0);
    }

    #[test]
    fn test_ingredient_safety_counts_flagged() {
        let ings = strings(&["Water", "Methylparaben", "Sodium Lauryl Sulfate", "Glycerin"]);
        let concerns = strings(&["paraben", "sulfate"]);
        assert_eq!(ingredient_safety(&ings, &concerns), Some(50.0));
    }

    #[test]
    fn test_ingredient_safety_case_insensitive() {
        let ings = strings(&["FRAGRANCE"]);
        assert_eq!(ingredient_safety(&ings, &strings(&["Fragrance"])), Some(0.0));
    }

    #[test]
    fn test_ingredient_safety_empty_is_unavailable() {
        assert_eq!(ingredient_safety(&[], &strings(&["paraben"])), None);
    }

    #[test]
    fn test_ingredient_safety_blank_concern_ignored() {
        let ings = strings(&["Water"]);
        assert_eq!(ingredient_safety(&ings, &strings(&[""])), Some(100.0));
    }

    #[test]
    fn test_carbon_subscore_bounds() {
        assert_eq!(carbon_subscore(0.0, 500.0), 100.0);
        assert_eq!(carbon_subscore(250.0, 500.0), 50.0);
        assert_eq!(carbon_subscore(900.0, 500.0), 0.0);
    }

    #[test]
    fn test_price_subscore_lower_price_scores_higher() {
        assert!(price_subscore(5.0, 50.0) > price_subscore(20.0, 50.0));
        assert_eq!(price_subscore(75.0, 50.0), 0.0);
    }

    #[test]
    fn test_packaging_subscore_clamped() {
        assert_eq!(packaging_subscore(120.0), 100.0);
        assert_eq!(packaging_subscore(88.0), 88.0);
    }
}

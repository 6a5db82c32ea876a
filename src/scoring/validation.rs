use super::config::ScoringConfig;

const WEIGHT_SUM_TOLERANCE: f64 = 1e-6;

/// Validate scoring configuration at startup.
/// Returns all validation errors at once (not just the first).
pub fn validate_scoring(config: &ScoringConfig) -> Result<(), Vec<String>> {
    let mut errors = Vec::new();

    if let Some(ref weights) = config.weights {
        let named = [
            ("ingredients", weights.ingredients),
            ("carbon", weights.carbon),
            ("packaging", weights.packaging),
            ("price", weights.price),
        ];
        for (name, value) in named {
            if !value.is_finite() || value < 0.0 {
                errors.push(format!("scoring.weights.{}: must be non-negative", name));
            }
        }
        let sum = weights.sum();
        if (sum - 1.0).abs() > WEIGHT_SUM_TOLERANCE {
            errors.push(format!("scoring.weights: must sum to 1.0, got {}", sum));
        }
    }

    if let Some(ceiling) = config.carbon_ceiling {
        if !ceiling.is_finite() || ceiling <= 0.0 {
            errors.push("scoring.carbon_ceiling: must be positive".to_string());
        }
    }

    if let Some(ceiling) = config.price_ceiling {
        if !ceiling.is_finite() || ceiling <= 0.0 {
            errors.push("scoring.price_ceiling: must be positive".to_string());
        }
    }

    if let Some(ref concerns) = config.concern_ingredients {
        for (i, concern) in concerns.iter().enumerate() {
            if concern.trim().is_empty() {
                errors.push(format!("scoring.concern_ingredients[{}]: must not be empty", i));
            }
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

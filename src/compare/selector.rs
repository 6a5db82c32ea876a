use serde::Serialize;

use crate::error::Notice;
use crate::scoring::RecordScore;

/// A designated extreme among the selected records.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Pick {
    /// Position within the selection
    pub index: usize,
    pub product: String,
    pub value: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComparisonPicks {
    pub best_eco: Option<Pick>,
    pub lowest_carbon: Option<Pick>,
    pub best_value: Option<Pick>,
    pub notices: Vec<Notice>,
}

/// First index whose value beats all others under `better`. Ties keep the
/// earliest record.
fn extreme<F>(values: impl Iterator<Item = (usize, f64)>, better: F) -> Option<(usize, f64)>
where
    F: Fn(f64, f64) -> bool,
{
    values.fold(None, |best, (i, v)| match best {
        Some((_, b)) if !better(v, b) => best,
        _ => Some((i, v)),
    })
}

fn pick(scores: &[RecordScore], found: Option<(usize, f64)>) -> Option<Pick> {
    found.map(|(index, value)| Pick {
        index,
        product: scores[index].record.product.clone(),
        value,
    })
}

/// Highest EcoScore. Records without one are skipped.
pub fn best_eco(scores: &[RecordScore]) -> Result<Pick, Notice> {
    let found = extreme(
        scores.iter().enumerate().filter_map(|(i, s)| s.eco_score.map(|v| (i, v))),
        |a, b| a > b,
    );
    pick(scores, found).ok_or_else(|| Notice::missing("Best EcoScore", "no selected product has an EcoScore"))
}

/// Lowest country-adjusted carbon intensity.
pub fn lowest_carbon(scores: &[RecordScore]) -> Result<Pick, Notice> {
    let found = extreme(
        scores
            .iter()
            .enumerate()
            .filter_map(|(i, s)| s.adjusted_carbon.map(|v| (i, v))),
        |a, b| a < b,
    );
    pick(scores, found).ok_or_else(|| {
        Notice::missing("Lowest carbon", "no selected product has a carbon intensity")
    })
}

/// Highest EcoScore per unit price.
///
/// Undefined when any selected record has no price or a zero price, since the
/// ranking would silently leave those products out.
pub fn best_value(scores: &[RecordScore]) -> Result<Pick, Notice> {
    for s in scores {
        match s.record.price {
            None => {
                return Err(Notice::undefined(
                    "Best value",
                    format!("{} has no price", s.record.product),
                ))
            }
            Some(p) if p == 0.0 => {
                return Err(Notice::undefined(
                    "Best value",
                    format!("{} has a price of 0", s.record.product),
                ))
            }
            Some(_) => {}
        }
    }

    let found = extreme(
        scores.iter().enumerate().filter_map(|(i, s)| {
            let price = s.record.price?;
            s.eco_score.map(|eco| (i, eco / price))
        }),
        |a, b| a > b,
    );
    pick(scores, found).ok_or_else(|| Notice::missing("Best value", "no selected product has an EcoScore"))
}

/// Compute all three picks. Each failure becomes a notice; the others still
/// compute.
pub fn compare(scores: &[RecordScore]) -> ComparisonPicks {
    let mut notices = Vec::new();
    if scores.is_empty() {
        notices.push(Notice::missing("Comparison", "no products selected"));
        return ComparisonPicks {
            best_eco: None,
            lowest_carbon: None,
            best_value: None,
            notices,
        };
    }

    let mut keep = |result: Result<Pick, Notice>| match result {
        Ok(p) => Some(p),
        Err(n) => {
            notices.push(n);
            None
        }
    };

    let best_eco = keep(best_eco(scores));
    let lowest_carbon = keep(lowest_carbon(scores));
    let best_value = keep(best_value(scores));

    ComparisonPicks {
        best_eco,
        lowest_carbon,
        best_value,
        notices,
    }
}

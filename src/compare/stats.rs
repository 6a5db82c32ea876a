use serde::Serialize;

use crate::error::Notice;
use crate::scoring::RecordScore;

/// Aggregates over a whole category, independent of which products the user
/// picked.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryStats {
    pub category: String,
    pub records: usize,
    pub mean_eco_score: Option<f64>,
    pub mean_price: Option<f64>,
    pub median_price: Option<f64>,
    /// Sum of raw carbon intensity (gCO2e)
    pub total_carbon: Option<f64>,
    pub notices: Vec<Notice>,
}

fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        None
    } else {
        Some(values.iter().sum::<f64>() / values.len() as f64)
    }
}

/// Median; even-length input averages the two middle values.
pub fn median(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        Some((sorted[mid - 1] + sorted[mid]) / 2.0)
    } else {
        Some(sorted[mid])
    }
}

/// Summarize a category set. Values missing from a record are left out of
/// the corresponding statistic.
pub fn category_stats(category: &str, scores: &[RecordScore]) -> CategoryStats {
    let eco: Vec<f64> = scores.iter().filter_map(|s| s.eco_score).collect();
    let prices: Vec<f64> = scores.iter().filter_map(|s| s.record.price).collect();
    let carbon: Vec<f64> = scores.iter().filter_map(|s| s.record.carbon_intensity).collect();

    let mut notices = Vec::new();
    let feature = format!("Category summary for {}", category);
    if eco.is_empty() {
        notices.push(Notice::missing(&feature, "no EcoScore values"));
    }
    if prices.is_empty() {
        notices.push(Notice::missing(&feature, "no price values"));
    }
    if carbon.is_empty() {
        notices.push(Notice::missing(&feature, "no carbon values"));
    }

    CategoryStats {
        category: category.to_string(),
        records: scores.len(),
        mean_eco_score: mean(&eco),
        mean_price: mean(&prices),
        median_price: median(&prices),
        total_carbon: if carbon.is_empty() { None } else { Some(carbon.iter().sum()) },
        notices,
    }
}

pub mod chart;
pub mod selector;
pub mod stats;

pub use chart::{chart_points, describe, ChartPoint, ChartView};
pub use selector::{best_eco, best_value, compare, lowest_carbon, ComparisonPicks, Pick};
pub use stats::{category_stats, median, CategoryStats};

use serde::Serialize;

use crate::dataset::Selection;
use crate::error::Notice;
use crate::scoring::{score_records, RecordScore, ScoringModel};

/// Everything one comparison view shows.
#[derive(Debug, Clone, Serialize)]
pub struct ComparisonReport<'a> {
    pub category: String,
    pub products: Vec<String>,
    pub rows: Vec<RecordScore<'a>>,
    pub picks: ComparisonPicks,
    pub summary: CategoryStats,
    pub notices: Vec<Notice>,
}

impl ComparisonReport<'_> {
    /// Every notice raised while building the report, deduplicated, in order.
    pub fn all_notices(&self) -> Vec<&Notice> {
        let mut all: Vec<&Notice> = Vec::new();
        let sources = self
            .notices
            .iter()
            .chain(self.rows.iter().flat_map(|r| r.notices()))
            .chain(self.picks.notices.iter())
            .chain(self.summary.notices.iter());
        for notice in sources {
            if !all.contains(&notice) {
                all.push(notice);
            }
        }
        all
    }
}

/// Score a selection and derive picks and the category summary.
///
/// Picks use only the selected products; the summary covers the whole
/// category set the selection was drawn from.
pub fn build_report<'a>(selection: &Selection<'a>, model: &ScoringModel) -> ComparisonReport<'a> {
    let rows = score_records(&selection.selected, model);
    let category_scores = score_records(&selection.category_set, model);

    let picks = compare(&rows);
    let summary = category_stats(selection.category.label(), &category_scores);

    ComparisonReport {
        category: selection.category.label().to_string(),
        products: selection.products.clone(),
        rows,
        picks,
        summary,
        notices: selection.notices.clone(),
    }
}

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::compare::{chart_points, ChartPoint, ChartView};
use crate::error::Notice;
use crate::schema::ResolvedSchema;
use crate::scoring::RecordScore;

/// One scatter view, or the reason it cannot be drawn.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartSeries {
    pub view: ChartView,
    pub title: &'static str,
    pub x_label: &'static str,
    pub points: Vec<ChartPoint>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notice: Option<Notice>,
}

impl ChartSeries {
    pub fn build(scores: &[RecordScore], schema: &ResolvedSchema, view: ChartView) -> Self {
        let (points, notice) = match chart_points(scores, schema, view) {
            Ok(points) => (points, None),
            Err(notice) => (Vec::new(), Some(notice)),
        };
        Self {
            view,
            title: view.title(),
            x_label: view.x_label(),
            points,
            notice,
        }
    }
}

/// Envelope for `--json` output.
#[derive(Debug, Serialize)]
pub struct JsonReport<'a, T: Serialize> {
    pub generated_at: DateTime<Utc>,
    pub dataset: &'a str,
    pub report: &'a T,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub charts: Vec<ChartSeries>,
}

impl<'a, T: Serialize> JsonReport<'a, T> {
    pub fn new(dataset: &'a str, report: &'a T) -> Self {
        Self {
            generated_at: Utc::now(),
            dataset,
            report,
            charts: Vec::new(),
        }
    }

    pub fn with_chart(mut self, chart: ChartSeries) -> Self {
        self.charts.push(chart);
        self
    }

    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).context("Failed to serialize report")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::ProductRecord;
    use crate::schema::{resolve_schema, AliasTable};
    use crate::scoring::{score_records, ScoringModel};

    #[test]
    fn test_json_report_shape() {
        let mut a = ProductRecord::new("A", "Care");
        a.eco_score = Some(80.0);
        a.carbon_intensity = Some(10.0);
        let model = ScoringModel::default();
        let scores = score_records(&[&a], &model);
        let labels: Vec<String> = ["product", "category", "ecoscore"].iter().map(|s| s.to_string()).collect();
        let schema = resolve_schema(&labels, &AliasTable::default()).unwrap();

        let json = JsonReport::new("data.csv", &scores)
            .with_chart(ChartSeries::build(&scores, &schema, ChartView::EcoVsCarbon))
            .to_json()
            .unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(value["dataset"], "data.csv");
        assert!(value["generated_at"].is_string());
        assert_eq!(value["report"][0]["record"]["product"], "A");
        assert_eq!(value["report"][0]["eco_source"], "stored");
        assert_eq!(value["charts"][0]["view"], "eco_vs_carbon");
        assert_eq!(value["charts"][0]["notice"]["kind"], "missing_data");
    }

    #[test]
    fn test_charts_omitted_when_empty() {
        let rows: Vec<u32> = vec![1, 2];
        let json = JsonReport::new("x.csv", &rows).to_json().unwrap();
        assert!(!json.contains("charts"));
    }
}

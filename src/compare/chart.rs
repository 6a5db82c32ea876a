use serde::Serialize;
use std::fmt;

use crate::error::Notice;
use crate::schema::{CanonicalField, ResolvedSchema};
use crate::scoring::RecordScore;

/// The two comparison scatter views.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ChartView {
    EcoVsCarbon,
    EcoVsPrice,
}

impl ChartView {
    pub fn title(self) -> &'static str {
        match self {
            ChartView::EcoVsCarbon => "EcoScore vs Carbon Intensity",
            ChartView::EcoVsPrice => "EcoScore vs Price",
        }
    }

    pub fn x_label(self) -> &'static str {
        match self {
            ChartView::EcoVsCarbon => "Carbon Intensity (gCO2e)",
            ChartView::EcoVsPrice => "Price (USD)",
        }
    }

    fn x_field(self) -> CanonicalField {
        match self {
            ChartView::EcoVsCarbon => CanonicalField::CarbonIntensity,
            ChartView::EcoVsPrice => CanonicalField::Price,
        }
    }

    fn x_value(self, score: &RecordScore) -> Option<f64> {
        match self {
            ChartView::EcoVsCarbon => score.adjusted_carbon,
            ChartView::EcoVsPrice => score.record.price,
        }
    }
}

impl fmt::Display for ChartView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.title())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartPoint {
    pub product: String,
    pub x: f64,
    pub y: f64,
    pub details: String,
}

/// One-line summary of a product for chart labels.
pub fn describe(score: &RecordScore) -> String {
    let rec = score.record;
    let mut parts = Vec::new();
    match rec.brand {
        Some(ref brand) => parts.push(format!("{} - {}", rec.product, brand)),
        None => parts.push(rec.product.clone()),
    }
    if let Some(price) = rec.price {
        parts.push(format!("Price: ${:.2}", price));
    }
    if let Some(ref packaging) = rec.packaging_type {
        parts.push(format!("Packaging: {}", packaging));
    }
    parts.push(format!("Recyclability: {:.0}", score.recyclability));
    if let Some(ref country) = rec.country_of_origin {
        parts.push(format!("Country: {}", country));
    }
    if !rec.main_ingredients.is_empty() {
        parts.push(format!("Top ingredients: {}", rec.top_ingredients().join(", ")));
    }
    parts.join(" | ")
}

/// Points for a scatter view. Records lacking either coordinate are left
/// out; a view with no source column or no plottable record is unavailable.
pub fn chart_points(
    scores: &[RecordScore],
    schema: &ResolvedSchema,
    view: ChartView,
) -> Result<Vec<ChartPoint>, Notice> {
    if !schema.has(view.x_field()) {
        return Err(Notice::missing(
            view.title(),
            format!("no {} column", view.x_field()),
        ));
    }

    let points: Vec<ChartPoint> = scores
        .iter()
        .filter_map(|s| {
            let x = view.x_value(s)?;
            let y = s.eco_score?;
            Some(ChartPoint {
                product: s.record.product.clone(),
                x,
                y,
                details: describe(s),
            })
        })
        .collect();

    if points.is_empty() {
        return Err(Notice::missing(view.title(), "no product has both values"));
    }
    Ok(points)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::ProductRecord;
    use crate::schema::{resolve_schema, AliasTable};
    use crate::scoring::{score_records, ScoringModel};

    fn schema(cols: &[&str]) -> ResolvedSchema {
        let labels: Vec<String> = cols.iter().map(|s| s.to_string()).collect();
        resolve_schema(&labels, &AliasTable::default()).unwrap()
    }

    #[test]
    fn test_chart_points_carbon_view() {
        let mut a = ProductRecord::new("A", "Care");
        a.eco_score = Some(80.0);
        a.carbon_intensity = Some(100.0);
        a.country_of_origin = Some("Germany".to_string());
        let mut b = ProductRecord::new("B", "Care");
        b.eco_score = Some(60.0);

        let model = ScoringModel::default();
        let scores = score_records(&[&a, &b], &model);
        let points = chart_points(
            &scores,
            &schema(&["product", "category", "ecoscore", "carbon", "country"]),
            ChartView::EcoVsCarbon,
        )
        .unwrap();

        assert_eq!(points.len(), 1);
        assert!((points[0].x - 80.0).abs() < 1e-9);
        assert_eq!(points[0].y, 80.0);
        assert!(points[0].details.contains("Country: Germany"));
    }

    #[test]
    fn test_chart_missing_column_is_unavailable() {
        let mut a = ProductRecord::new("A", "Care");
        a.eco_score = Some(80.0);
        let model = ScoringModel::default();
        let scores = score_records(&[&a], &model);
        let err = chart_points(&scores, &schema(&["product", "category", "ecoscore"]), ChartView::EcoVsPrice)
            .unwrap_err();
        assert!(err.to_string().contains("EcoScore vs Price"));
        assert!(err.to_string().contains("no price column"));
    }

    #[test]
    fn test_describe_includes_top_five_ingredients() {
        let mut a = ProductRecord::new("Soap", "Care");
        a.brand = Some("Leafy".to_string());
        a.price = Some(3.5);
        a.main_ingredients = ["a", "b", "c", "d", "e", "f"].iter().map(|s| s.to_string()).collect();
        let model = ScoringModel::default();
        let scores = score_records(&[&a], &model);
        let text = describe(&scores[0]);
        assert!(text.starts_with("Soap - Leafy"));
        assert!(text.contains("Price: $3.50"));
        assert!(text.contains("Top ingredients: a, b, c, d, e"));
        assert!(!text.contains(", f"));
    }
}

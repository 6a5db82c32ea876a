use serde::{Serialize, Serializer};

use super::loader::{RawRow, RawTable};
use crate::schema::{CanonicalField, ResolvedSchema};
use crate::scoring::Lookups;

/// Only this many ingredients are ever shown.
pub const TOP_INGREDIENTS: usize = 5;

/// One typed product row. Never mutated after load.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProductRecord {
    pub product: String,
    pub category: String,
    pub brand: Option<String>,
    pub price: Option<f64>,
    pub eco_score: Option<f64>,
    /// Raw grams CO2e per unit, before any country factor
    pub carbon_intensity: Option<f64>,
    pub packaging_type: Option<String>,
    pub recyclability_score: Option<f64>,
    pub country_of_origin: Option<String>,
    /// Full list in memory; serialized views carry only the top entries
    #[serde(serialize_with = "serialize_top_ingredients")]
    pub main_ingredients: Vec<String>,
}

fn serialize_top_ingredients<S: Serializer>(ingredients: &[String], serializer: S) -> Result<S::Ok, S::Error> {
    let n = ingredients.len().min(TOP_INGREDIENTS);
    serializer.collect_seq(&ingredients[..n])
}

impl ProductRecord {
    pub fn new(product: impl Into<String>, category: impl Into<String>) -> Self {
        Self {
            product: product.into(),
            category: category.into(),
            brand: None,
            price: None,
            eco_score: None,
            carbon_intensity: None,
            packaging_type: None,
            recyclability_score: None,
            country_of_origin: None,
            main_ingredients: Vec::new(),
        }
    }

    pub fn top_ingredients(&self) -> &[String] {
        let n = self.main_ingredients.len().min(TOP_INGREDIENTS);
        &self.main_ingredients[..n]
    }
}

/// A data row that could not become a record.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SkippedRow {
    pub line: usize,
    pub reason: String,
}

/// Lenient numeric coercion: `$`, thousands separators and whitespace are
/// stripped; anything else non-numeric is missing.
pub fn parse_number(cell: &str) -> Option<f64> {
    let cleaned: String = cell
        .trim()
        .trim_start_matches('$')
        .chars()
        .filter(|c| *c != ',' && !c.is_whitespace())
        .collect();
    if cleaned.is_empty() {
        return None;
    }
    cleaned.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Split a comma-delimited ingredient cell, dropping empty entries.
pub fn parse_ingredients(cell: &str) -> Vec<String> {
    cell.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

fn non_empty(cell: Option<&str>) -> Option<String> {
    cell.map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

/// Column positions for each resolved field.
struct ColumnMap {
    positions: Vec<Option<usize>>,
    carbon_pre_adjusted: bool,
}

impl ColumnMap {
    fn new(table: &RawTable, schema: &ResolvedSchema) -> Self {
        let positions = CanonicalField::ALL
            .iter()
            .map(|f| schema.label(*f).and_then(|label| table.column_index(label)))
            .collect();
        let carbon_pre_adjusted = schema
            .label(CanonicalField::CarbonIntensity)
            .map(|label| label.to_lowercase().contains("adj"))
            .unwrap_or(false);
        Self {
            positions,
            carbon_pre_adjusted,
        }
    }

    fn cell<'r>(&self, row: &'r RawRow, field: CanonicalField) -> Option<&'r str> {
        self.positions[field.index()].and_then(|i| row.get(i))
    }
}

fn non_negative(value: Option<f64>, field: CanonicalField, line: usize) -> Option<f64> {
    match value {
        Some(v) if v < 0.0 => {
            tracing::warn!(line, field = %field, value = v, "negative value treated as missing");
            None
        }
        other => other,
    }
}

/// Map raw rows onto typed records using a resolved schema.
///
/// Rows without a product or category are skipped. When the carbon column
/// already carries country-adjusted values, the raw intensity is recovered by
/// dividing out the country factor.
pub fn map_records(
    table: &RawTable,
    schema: &ResolvedSchema,
    lookups: &Lookups,
) -> (Vec<ProductRecord>, Vec<SkippedRow>) {
    let columns = ColumnMap::new(table, schema);
    let mut records = Vec::with_capacity(table.rows.len());
    let mut skipped = Vec::new();

    for row in &table.rows {
        let product = non_empty(columns.cell(row, CanonicalField::Product));
        let category = non_empty(columns.cell(row, CanonicalField::Category));
        let (product, category) = match (product, category) {
            (Some(p), Some(c)) => (p, c),
            (None, _) => {
                skipped.push(SkippedRow {
                    line: row.line,
                    reason: "empty product".to_string(),
                });
                continue;
            }
            (_, None) => {
                skipped.push(SkippedRow {
                    line: row.line,
                    reason: "empty category".to_string(),
                });
                continue;
            }
        };

        let number = |field: CanonicalField| columns.cell(row, field).and_then(parse_number);
        let country = non_empty(columns.cell(row, CanonicalField::Country));

        let mut carbon = non_negative(
            number(CanonicalField::CarbonIntensity),
            CanonicalField::CarbonIntensity,
            row.line,
        );
        if columns.carbon_pre_adjusted {
            let factor = lookups.emission_factor(country.as_deref());
            carbon = carbon.map(|c| if factor > 0.0 { c / factor } else { c });
        }

        records.push(ProductRecord {
            product,
            category,
            brand: non_empty(columns.cell(row, CanonicalField::Brand)),
            price: non_negative(number(CanonicalField::Price), CanonicalField::Price, row.line),
            eco_score: number(CanonicalField::EcoScore),
            carbon_intensity: carbon,
            packaging_type: non_empty(columns.cell(row, CanonicalField::Packaging)),
            recyclability_score: number(CanonicalField::Recyclability),
            country_of_origin: country,
            main_ingredients: columns
                .cell(row, CanonicalField::Ingredients)
                .map(parse_ingredients)
                .unwrap_or_default(),
        });
    }

    for skip in &skipped {
        tracing::warn!(line = skip.line, reason = %skip.reason, "skipped row");
    }

    (records, skipped)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::loader::read_csv;
    use crate::schema::{resolve_schema, AliasTable};

    fn map(csv: &str) -> (Vec<ProductRecord>, Vec<SkippedRow>) {
        let table = read_csv(csv.as_bytes()).unwrap();
        let schema = resolve_schema(&table.headers, &AliasTable::default()).unwrap();
        map_records(&table, &schema, &Lookups::default())
    }

    #[test]
    fn test_parse_number_lenient() {
        assert_eq!(parse_number("12.5"), Some(12.5));
        assert_eq!(parse_number(" $1,299.00 "), Some(1299.0));
        assert_eq!(parse_number(""), None);
        assert_eq!(parse_number("n/a"), None);
        assert_eq!(parse_number("NaN"), None);
    }

    #[test]
    fn test_parse_ingredients_trims_and_drops_empty() {
        let parsed = parse_ingredients(" Water, Glycerin,, Sodium Hydroxide ,");
        assert_eq!(parsed, vec!["Water", "Glycerin", "Sodium Hydroxide"]);
    }

    #[test]
    fn test_serialized_record_carries_top_ingredients_only() {
        let mut rec = ProductRecord::new("Soap", "Care");
        rec.main_ingredients = parse_ingredients("a,b,c,d,e,f,g");
        let value = serde_json::to_value(&rec).unwrap();
        assert_eq!(value["main_ingredients"], serde_json::json!(["a", "b", "c", "d", "e"]));
        assert_eq!(rec.main_ingredients.len(), 7);
    }

    #[test]
    fn test_top_ingredients_caps_at_five() {
        let mut rec = ProductRecord::new("Soap", "Care");
        rec.main_ingredients = parse_ingredients("a,b,c,d,e,f,g");
        assert_eq!(rec.top_ingredients().len(), 5);
        assert_eq!(rec.top_ingredients()[4], "e");

        rec.main_ingredients = parse_ingredients("a,b");
        assert_eq!(rec.top_ingredients().len(), 2);
    }

    #[test]
    fn test_map_records_full_row() {
        let (records, skipped) = map(
            "Product,Category,Brand,Price_USD,EcoScore,Carbon_Intensity,Packaging_Type,Main_Ingredients,Country_of_Origin,Recyclability_Score\n\
             Bar Soap,Personal Care,Leafy,$4.50,82,120,Paper,\"Olive Oil, Water\",France,\n",
        );
        assert!(skipped.is_empty());
        let rec = &records[0];
        assert_eq!(rec.product, "Bar Soap");
        assert_eq!(rec.brand.as_deref(), Some("Leafy"));
        assert_eq!(rec.price, Some(4.5));
        assert_eq!(rec.eco_score, Some(82.0));
        assert_eq!(rec.carbon_intensity, Some(120.0));
        assert_eq!(rec.packaging_type.as_deref(), Some("Paper"));
        assert_eq!(rec.recyclability_score, None);
        assert_eq!(rec.country_of_origin.as_deref(), Some("France"));
        assert_eq!(rec.main_ingredients, vec!["Olive Oil", "Water"]);
    }

    #[test]
    fn test_map_records_non_numeric_becomes_missing() {
        let (records, _) = map("product,category,price,ecoscore\nSoap,Care,free,unknown\n");
        assert_eq!(records[0].price, None);
        assert_eq!(records[0].eco_score, None);
    }

    #[test]
    fn test_map_records_eco_score_not_clamped_on_read() {
        let (records, _) = map("product,category,ecoscore\nSoap,Care,120\n");
        assert_eq!(records[0].eco_score, Some(120.0));
    }

    #[test]
    fn test_map_records_negative_price_is_missing() {
        let (records, _) = map("product,category,price\nSoap,Care,-3\n");
        assert_eq!(records[0].price, None);
    }

    #[test]
    fn test_map_records_skips_rows_without_product_or_category() {
        let (records, skipped) = map("product,category\n,Care\nSoap,\nShampoo,Hair\n");
        assert_eq!(records.len(), 1);
        assert_eq!(skipped.len(), 2);
        assert_eq!(skipped[0].line, 2);
        assert_eq!(skipped[0].reason, "empty product");
        assert_eq!(skipped[1].reason, "empty category");
    }

    #[test]
    fn test_map_records_pre_adjusted_carbon_recovers_raw() {
        let (records, _) = map("product,category,adj_carbon_intensity,country\nSoap,Care,180,China\nGel,Care,50,Mars\n");
        assert!((records[0].carbon_intensity.unwrap() - 100.0).abs() < 1e-9);
        assert_eq!(records[1].carbon_intensity, Some(50.0));
    }
}

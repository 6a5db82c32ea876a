pub mod loader;
pub mod record;
pub mod selection;

pub use loader::{load_csv, read_csv, RawRow, RawTable};
pub use record::{map_records, parse_ingredients, parse_number, ProductRecord, SkippedRow, TOP_INGREDIENTS};
pub use selection::{select, CategoryFilter, Selection};

use std::collections::BTreeMap;

use crate::error::SchemaError;
use crate::schema::{resolve_schema, AliasTable, ResolvedSchema};
use crate::scoring::Lookups;

/// The loaded table after schema resolution.
///
/// Built once per run and shared by reference with every computation.
#[derive(Debug, Clone)]
pub struct Dataset {
    schema: ResolvedSchema,
    records: Vec<ProductRecord>,
    skipped: Vec<SkippedRow>,
}

/// Category name with the number of rows it holds.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct CategoryCount {
    pub name: String,
    pub records: usize,
}

impl Dataset {
    pub fn new(schema: ResolvedSchema, records: Vec<ProductRecord>) -> Self {
        Self {
            schema,
            records,
            skipped: Vec::new(),
        }
    }

    /// Resolve the table's columns and map every row to a typed record.
    pub fn from_table(
        table: &RawTable,
        aliases: &AliasTable,
        lookups: &Lookups,
    ) -> Result<Self, SchemaError> {
        let schema = resolve_schema(&table.headers, aliases)?;
        let (records, skipped) = map_records(table, &schema, lookups);
        tracing::debug!(
            records = records.len(),
            skipped = skipped.len(),
            "mapped dataset rows"
        );
        Ok(Self {
            schema,
            records,
            skipped,
        })
    }

    pub fn schema(&self) -> &ResolvedSchema {
        &self.schema
    }

    pub fn records(&self) -> &[ProductRecord] {
        &self.records
    }

    pub fn skipped(&self) -> &[SkippedRow] {
        &self.skipped
    }

    /// First record named `product` (case-insensitive) within the category.
    pub fn find(&self, product: &str, category: &CategoryFilter) -> Option<&ProductRecord> {
        let wanted = product.trim();
        self.records
            .iter()
            .find(|r| category.matches(r) && r.product.eq_ignore_ascii_case(wanted))
    }

    /// Distinct categories, sorted by name.
    pub fn categories(&self) -> Vec<CategoryCount> {
        let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
        for rec in &self.records {
            *counts.entry(rec.category.as_str()).or_default() += 1;
        }
        counts
            .into_iter()
            .map(|(name, records)| CategoryCount {
                name: name.to_string(),
                records,
            })
            .collect()
    }
}

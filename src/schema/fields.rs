use serde::Serialize;
use std::fmt;

/// Semantic attributes that heterogeneous CSV columns are resolved to.
///
/// Declaration order is the canonical column order used for export.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CanonicalField {
    Product,
    Category,
    Brand,
    Price,
    EcoScore,
    CarbonIntensity,
    Packaging,
    Ingredients,
    Country,
    Recyclability,
}

impl CanonicalField {
    pub const ALL: [CanonicalField; 10] = [
        CanonicalField::Product,
        CanonicalField::Category,
        CanonicalField::Brand,
        CanonicalField::Price,
        CanonicalField::EcoScore,
        CanonicalField::CarbonIntensity,
        CanonicalField::Packaging,
        CanonicalField::Ingredients,
        CanonicalField::Country,
        CanonicalField::Recyclability,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            CanonicalField::Product => "product",
            CanonicalField::Category => "category",
            CanonicalField::Brand => "brand",
            CanonicalField::Price => "price",
            CanonicalField::EcoScore => "eco_score",
            CanonicalField::CarbonIntensity => "carbon_intensity",
            CanonicalField::Packaging => "packaging",
            CanonicalField::Ingredients => "ingredients",
            CanonicalField::Country => "country",
            CanonicalField::Recyclability => "recyclability",
        }
    }

    /// Parse a canonical field name as written in config files.
    pub fn parse(s: &str) -> Option<Self> {
        let key = s.trim().to_lowercase();
        Self::ALL.into_iter().find(|f| f.as_str() == key)
    }

    /// Without these the dataset cannot be viewed at all.
    pub fn is_mandatory(self) -> bool {
        matches!(self, CanonicalField::Product | CanonicalField::Category)
    }

    pub(crate) fn index(self) -> usize {
        self as usize
    }

    /// Label variants seen across the known dataset layouts, in priority order.
    pub fn default_aliases(self) -> &'static [&'static str] {
        match self {
            CanonicalField::Product => &["product", "product_name", "name"],
            CanonicalField::Category => &["category", "category_name", "type"],
            CanonicalField::Brand => &["brand", "manufacturer"],
            CanonicalField::Price => &["price_usd", "price", "price ($)", "cost"],
            CanonicalField::EcoScore => &["ecoscore", "eco_score", "eco score", "score"],
            CanonicalField::CarbonIntensity => &[
                "adj_carbon_intensity",
                "carbon_intensity_gco2e",
                "carbon_intensity",
                "carbon",
            ],
            CanonicalField::Packaging => &["packaging", "packaging_type", "package", "material"],
            CanonicalField::Ingredients => &["main_ingredients", "ingredients", "ingredient"],
            CanonicalField::Country => &["country", "country_of_origin"],
            CanonicalField::Recyclability => &["recyclability_score", "recyclability"],
        }
    }
}

impl fmt::Display for CanonicalField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_roundtrips_every_field() {
        for field in CanonicalField::ALL {
            assert_eq!(CanonicalField::parse(field.as_str()), Some(field));
        }
    }

    #[test]
    fn test_parse_is_case_insensitive() {
        assert_eq!(CanonicalField::parse(" Eco_Score "), Some(CanonicalField::EcoScore));
        assert_eq!(CanonicalField::parse("colour"), None);
    }

    #[test]
    fn test_only_product_and_category_are_mandatory() {
        let mandatory: Vec<_> = CanonicalField::ALL
            .into_iter()
            .filter(|f| f.is_mandatory())
            .collect();
        assert_eq!(mandatory, vec![CanonicalField::Product, CanonicalField::Category]);
    }

    #[test]
    fn test_index_matches_declaration_order() {
        for (i, field) in CanonicalField::ALL.into_iter().enumerate() {
            assert_eq!(field.index(), i);
        }
    }
}

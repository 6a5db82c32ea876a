use glob::{MatchOptions, Pattern};

use super::record::ProductRecord;
use super::Dataset;
use crate::error::Notice;

/// Products picked when the user names none.
pub const DEFAULT_SELECTION: usize = 2;

/// Category scope of a view.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum CategoryFilter {
    #[default]
    All,
    Named(String),
}

impl CategoryFilter {
    /// `None` or "All" (any case) selects every category.
    pub fn parse(s: Option<&str>) -> Self {
        match s.map(str::trim) {
            None | Some("") => CategoryFilter::All,
            Some(name) if name.eq_ignore_ascii_case("all") => CategoryFilter::All,
            Some(name) => CategoryFilter::Named(name.to_string()),
        }
    }

    pub fn matches(&self, record: &ProductRecord) -> bool {
        match self {
            CategoryFilter::All => true,
            CategoryFilter::Named(name) => record.category.trim().eq_ignore_ascii_case(name.trim()),
        }
    }

    pub fn label(&self) -> &str {
        match self {
            CategoryFilter::All => "All",
            CategoryFilter::Named(name) => name,
        }
    }
}

/// The records a view works on.
///
/// `category_set` is every record in the chosen category and feeds the
/// category summary. `selected` is the user's product subset of it, in input
/// order, and feeds the comparison table and picks.
#[derive(Debug, Clone)]
pub struct Selection<'a> {
    pub category: CategoryFilter,
    pub category_set: Vec<&'a ProductRecord>,
    pub products: Vec<String>,
    pub selected: Vec<&'a ProductRecord>,
    pub notices: Vec<Notice>,
}

/// Sorted distinct product names.
pub fn product_names(records: &[&ProductRecord]) -> Vec<String> {
    let mut names: Vec<String> = records.iter().map(|r| r.product.clone()).collect();
    names.sort();
    names.dedup();
    names
}

fn is_glob(pattern: &str) -> bool {
    pattern.contains(['*', '?', '['])
}

/// Resolve product patterns against available names.
///
/// Plain patterns match a name case-insensitively; patterns containing glob
/// metacharacters are matched as globs. Names keep their sorted order.
fn match_products(names: &[String], patterns: &[String]) -> Result<(Vec<String>, Vec<String>), glob::PatternError> {
    let options = MatchOptions {
        case_sensitive: false,
        require_literal_separator: false,
        require_literal_leading_dot: false,
    };

    let mut chosen = vec![false; names.len()];
    let mut unmatched = Vec::new();

    for raw in patterns {
        let pattern = raw.trim();
        let mut hit = false;
        if is_glob(pattern) {
            let compiled = Pattern::new(pattern)?;
            for (i, name) in names.iter().enumerate() {
                if compiled.matches_with(name, options) {
                    chosen[i] = true;
                    hit = true;
                }
            }
        } else {
            for (i, name) in names.iter().enumerate() {
                if name.eq_ignore_ascii_case(pattern) {
                    chosen[i] = true;
                    hit = true;
                }
            }
        }
        if !hit {
            unmatched.push(raw.clone());
        }
    }

    let matched = names
        .iter()
        .zip(chosen)
        .filter(|(_, c)| *c)
        .map(|(n, _)| n.clone())
        .collect();
    Ok((matched, unmatched))
}

/// Filter a dataset by category, then pick products.
///
/// With no patterns the first two product names (alphabetically) are chosen.
/// An invalid glob pattern is an error; patterns that match nothing only
/// produce a notice.
pub fn select<'a>(
    dataset: &'a Dataset,
    category: &CategoryFilter,
    patterns: &[String],
) -> Result<Selection<'a>, glob::PatternError> {
    let category_set: Vec<&ProductRecord> = dataset
        .records()
        .iter()
        .filter(|r| category.matches(r))
        .collect();

    let names = product_names(&category_set);
    let mut notices = Vec::new();

    if category_set.is_empty() {
        notices.push(Notice::missing(
            "Selection",
            format!("no records in category '{}'", category.label()),
        ));
    }

    let products = if patterns.is_empty() {
        names.iter().take(DEFAULT_SELECTION).cloned().collect()
    } else {
        let (matched, unmatched) = match_products(&names, patterns)?;
        for pattern in unmatched {
            notices.push(Notice::missing(
                "Selection",
                format!("no product matches '{}'", pattern),
            ));
        }
        matched
    };

    let selected: Vec<&ProductRecord> = category_set
        .iter()
        .copied()
        .filter(|r| products.contains(&r.product))
        .collect();

    if selected.is_empty() && !category_set.is_empty() {
        notices.push(Notice::missing("Selection", "no matching products found"));
    }

    tracing::debug!(
        category = category.label(),
        category_records = category_set.len(),
        selected = selected.len(),
        "built selection"
    );

    Ok(Selection {
        category: category.clone(),
        category_set,
        products,
        selected,
        notices,
    })
}

use std::io::IsTerminal;
use owo_colors::OwoColorize;
use terminal_size::{Width, terminal_size};

use crate::compare::{CategoryStats, ChartPoint, ChartView, ComparisonPicks, Pick};
use crate::dataset::CategoryCount;
use crate::error::Notice;
use crate::schema::ResolvedSchema;
use crate::scoring::{CompositeResult, EcoSource, RecordScore, Simulation};

/// Placeholder for a value the dataset does not carry.
const MISSING: &str = "-";

/// Check if stdout is a TTY (for auto-detecting color support)
pub fn should_use_colors() -> bool {
    std::io::stdout().is_terminal()
}

/// Format an EcoScore as a whole number.
/// Computed composites get a trailing asterisk; unavailable scores show "-".
pub fn format_score(score: Option<f64>, source: EcoSource) -> String {
    match (score, source) {
        (Some(s), EcoSource::Computed) => format!("{:.0}*", s),
        (Some(s), _) => format!("{:.0}", s),
        (None, _) => MISSING.to_string(),
    }
}

pub fn format_price(price: Option<f64>) -> String {
    match price {
        Some(p) => format!("${:.2}", p),
        None => MISSING.to_string(),
    }
}

pub fn format_carbon(carbon: Option<f64>) -> String {
    match carbon {
        Some(c) => format!("{:.1} gCO2e", c),
        None => MISSING.to_string(),
    }
}

fn format_optional(value: Option<f64>, decimals: usize) -> String {
    match value {
        Some(v) => format!("{:.*}", decimals, v),
        None => MISSING.to_string(),
    }
}

/// Get terminal width, defaulting to None for pipes (unlimited)
fn get_terminal_width() -> Option<usize> {
    terminal_size().map(|(Width(w), _)| w as usize)
}

/// Truncate a product name to fit available width, accounting for Unicode
fn truncate_title(title: &str, max_width: usize) -> String {
    let chars: Vec<char> = title.chars().collect();
    if chars.len() <= max_width {
        title.to_string()
    } else if max_width > 3 {
        format!("{}...", chars[..max_width - 3].iter().collect::<String>())
    } else {
        chars[..max_width].iter().collect()
    }
}

/// Per-factor subscores and weights of a computed composite.
pub fn format_breakdown(composite: &CompositeResult) -> String {
    let parts: Vec<String> = composite
        .factors
        .iter()
        .map(|f| format!("{} {} x{:.2}", f.factor.label(), format_optional(f.subscore, 1), f.weight))
        .collect();
    format!("Composite: {}", parts.join(", "))
}

fn display_name(score: &RecordScore) -> String {
    match score.record.brand {
        Some(ref brand) => format!("{} ({})", score.record.product, brand),
        None => score.record.product.clone(),
    }
}

/// Format the selected products, two or three lines each.
///
/// First line: index, EcoScore, adjusted carbon, price, name.
/// Second line: packaging with recyclability, country, top ingredients.
/// Rows without a stored EcoScore get a third line with the composite breakdown.
pub fn format_comparison_table(rows: &[RecordScore], use_colors: bool) -> String {
    if rows.is_empty() {
        return "No products selected.".to_string();
    }

    let term_width = get_terminal_width();

    // Index 3 + score 5 + carbon 14 + price 10, plus separators
    let score_width = 5;
    let carbon_width = 14;
    let price_width = 10;
    let separator = "  ";
    let fixed_width = 3 + 1 + score_width + carbon_width + price_width + separator.len() * 3;

    rows.iter()
        .enumerate()
        .map(|(idx, row)| {
            let index_str = format!("{:>2}.", idx + 1);
            let score_str = format!(
                "{:>width$}",
                format_score(row.eco_score, row.eco_source),
                width = score_width
            );
            let carbon_str = format!(
                "{:>width$}",
                format_carbon(row.adjusted_carbon),
                width = carbon_width
            );
            let price_str = format!("{:>width$}", format_price(row.record.price), width = price_width);

            let name = display_name(row);
            let name = match term_width {
                Some(width) if width > fixed_width + 10 => truncate_title(&name, width - fixed_width),
                Some(_) => truncate_title(&name, 20),
                None => name,
            };

            let packaging = row.record.packaging_type.as_deref().unwrap_or(MISSING);
            let country = row.record.country_of_origin.as_deref().unwrap_or(MISSING);
            let ingredients = if row.record.main_ingredients.is_empty() {
                MISSING.to_string()
            } else {
                row.record.top_ingredients().join(", ")
            };
            let mut detail = format!(
                "     Packaging: {} (recyclability {:.0}) | Country: {} (x{:.1}) | Top ingredients: {}",
                packaging, row.recyclability, country, row.country_factor, ingredients
            );
            if let Some(ref composite) = row.composite {
                detail.push_str(&format!("\n     {}", format_breakdown(composite)));
            }

            if use_colors {
                format!(
                    "{} {}{}{}{}{}{}{}\n{}",
                    index_str.dimmed(),
                    score_str.bold(),
                    separator,
                    carbon_str,
                    separator,
                    price_str,
                    separator,
                    name,
                    detail.dimmed()
                )
            } else {
                format!(
                    "{} {}{}{}{}{}{}{}\n{}",
                    index_str, score_str, separator, carbon_str, separator, price_str, separator, name, detail
                )
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn format_pick(label: &str, pick: Option<&Pick>, value: impl Fn(f64) -> String, use_colors: bool) -> String {
    match pick {
        Some(p) if use_colors => format!("  {:<15}{} ({})", label, p.product.green(), value(p.value)),
        Some(p) => format!("  {:<15}{} ({})", label, p.product, value(p.value)),
        None => format!("  {:<15}{}", label, MISSING),
    }
}

/// Format the three comparison picks.
pub fn format_picks(picks: &ComparisonPicks, use_colors: bool) -> String {
    [
        format_pick("Best EcoScore", picks.best_eco.as_ref(), |v| format!("{:.0}", v), use_colors),
        format_pick(
            "Lowest carbon",
            picks.lowest_carbon.as_ref(),
            |v| format_carbon(Some(v)),
            use_colors,
        ),
        format_pick(
            "Best value",
            picks.best_value.as_ref(),
            |v| format!("{:.2} points per $", v),
            use_colors,
        ),
    ]
    .join("\n")
}

/// Format category aggregate statistics.
pub fn format_summary(stats: &CategoryStats) -> String {
    format!(
        "Category: {} ({} products)\n  Mean EcoScore: {}\n  Mean price:    {}\n  Median price:  {}\n  Total carbon:  {}",
        stats.category,
        stats.records,
        format_optional(stats.mean_eco_score, 1),
        format_price(stats.mean_price),
        format_price(stats.median_price),
        format_carbon(stats.total_carbon),
    )
}

/// One line per notice, prefixed with "!".
pub fn format_notices(notices: &[&Notice], use_colors: bool) -> String {
    notices
        .iter()
        .map(|n| {
            if use_colors {
                format!("{} {}", "!".yellow(), n)
            } else {
                format!("! {}", n)
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Format selected products as tab-separated values for scripting
/// Columns: eco_score, adjusted_carbon, price, product, category (no headers, no colors)
/// Missing values are empty fields.
pub fn format_tsv(rows: &[RecordScore]) -> String {
    if rows.is_empty() {
        return String::new();
    }

    let cell = |v: Option<f64>, decimals: usize| v.map(|x| format!("{:.*}", decimals, x)).unwrap_or_default();

    rows.iter()
        .map(|row| {
            format!(
                "{}\t{}\t{}\t{}\t{}",
                cell(row.eco_score.map(f64::round), 0),
                cell(row.adjusted_carbon, 1),
                cell(row.record.price, 2),
                row.record.product,
                row.record.category
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Canonical field to source column mapping.
pub fn format_columns(schema: &ResolvedSchema, use_colors: bool) -> String {
    schema
        .entries()
        .map(|(field, label)| {
            let name = format!("{:<18}", field.as_str());
            match label {
                Some(l) if use_colors => format!("{}{}", name, l.cyan()),
                Some(l) => format!("{}{}", name, l),
                None if use_colors => format!("{}{}", name, "(not found)".dimmed()),
                None => format!("{}(not found)", name),
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn format_categories(categories: &[CategoryCount]) -> String {
    if categories.is_empty() {
        return "No categories found.".to_string();
    }
    categories
        .iter()
        .map(|c| format!("{:>4}  {}", c.records, c.name))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Before/after lines for a what-if scenario.
pub fn format_simulation(sim: &Simulation, use_colors: bool) -> String {
    let country = |c: &Option<String>| c.clone().unwrap_or_else(|| MISSING.to_string());
    let mut lines = vec![
        if use_colors {
            format!("What-if: {}", sim.product.bold())
        } else {
            format!("What-if: {}", sim.product)
        },
        format!(
            "  Packaging:     {} (recyclability {:.0}) -> {} (recyclability {:.0})",
            sim.old_packaging, sim.old_recyclability, sim.new_packaging, sim.new_recyclability
        ),
        format!(
            "  Country:       {} (x{:.1}) -> {} (x{:.1})",
            country(&sim.old_country),
            sim.old_country_factor,
            country(&sim.new_country),
            sim.new_country_factor
        ),
        format!("  Tweak:         x{:.2}", sim.tweak),
        format!(
            "  Carbon:        {} -> {}",
            format_carbon(sim.carbon_before),
            format_carbon(sim.simulated_carbon())
        ),
        format!(
            "  EcoScore:      {} -> {}",
            format_optional(sim.base_eco_score, 1),
            format_optional(sim.simulated_eco_score(), 1)
        ),
    ];
    if let Some(p) = sim.projection {
        lines.push(format!("  Delta:         {:+.2}", p.eco_delta));
    }
    lines.join("\n")
}

/// Chart points as a titled x/y listing.
pub fn format_chart(view: ChartView, points: &[ChartPoint]) -> String {
    let mut lines = vec![format!("{} (x: {}, y: EcoScore)", view.title(), view.x_label())];
    lines.extend(
        points
            .iter()
            .map(|p| format!("  {:>10.2}  {:>6.1}  {}", p.x, p.y, p.details)),
    );
    lines.join("\n")
}

pub mod export;
pub mod formatter;
pub mod report;

pub use export::{export_csv, export_headers, export_row, write_export};
pub use formatter::{
    format_breakdown, format_carbon, format_categories, format_chart, format_columns,
    format_comparison_table, format_notices, format_picks, format_price, format_score,
    format_simulation, format_summary, format_tsv, should_use_colors,
};
pub use report::{ChartSeries, JsonReport};

use clap::{Args, Parser, Subcommand, ValueEnum};
use std::io::IsTerminal;
use std::path::PathBuf;
use std::time::{Duration, Instant};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use ecoscore::compare::{build_report, ChartView};
use ecoscore::config::{load_config, run_init, validate_config};
use ecoscore::dataset::{load_csv, select, CategoryFilter, Dataset};
use ecoscore::error::Notice;
use ecoscore::output::{self, ChartSeries, JsonReport};
use ecoscore::scoring::{score_records, simulate, WhatIf};
use ecoscore::telemetry::counter_from_config;

const EXIT_SUCCESS: i32 = 0;
const EXIT_USAGE: i32 = 1;
const EXIT_LOAD: i32 = 2;
const EXIT_SCHEMA: i32 = 3;
const EXIT_CONFIG: i32 = 4;

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
enum ViewArg {
    /// EcoScore vs carbon intensity
    Carbon,
    /// EcoScore vs price
    Price,
}

impl From<ViewArg> for ChartView {
    fn from(view: ViewArg) -> Self {
        match view {
            ViewArg::Carbon => ChartView::EcoVsCarbon,
            ViewArg::Price => ChartView::EcoVsPrice,
        }
    }
}

#[derive(Args, Debug, Default)]
struct CompareArgs {
    /// Category to compare within ("All" for every category)
    #[arg(long)]
    category: Option<String>,

    /// Product name or glob pattern (repeatable; defaults to the first two products)
    #[arg(short, long = "product")]
    product: Vec<String>,

    /// Print the report as JSON
    #[arg(long, conflicts_with = "tsv")]
    json: bool,

    /// Print selected products as tab-separated values
    #[arg(long)]
    tsv: bool,

    /// Also show a chart view
    #[arg(long, value_enum)]
    view: Option<ViewArg>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Show which source column each canonical field resolved to
    Columns,
    /// List categories with product counts
    Categories,
    /// Compare selected products within a category (default if no subcommand)
    Compare(CompareArgs),
    /// Simulate a packaging or sourcing change for one product
    Whatif {
        /// Product name
        #[arg(short, long)]
        product: String,

        /// Category to look the product up in
        #[arg(long)]
        category: Option<String>,

        /// New packaging type (defaults to the current one)
        #[arg(long)]
        packaging: Option<String>,

        /// New country of origin (defaults to the current one)
        #[arg(long)]
        country: Option<String>,

        /// Manual carbon multiplier, 0.5 to 2.0
        #[arg(long, default_value_t = 1.0)]
        tweak: f64,

        /// Hypothetical ingredient-safety improvement, 0 to 100
        #[arg(long, default_value_t = 0.0)]
        safety_gain: f64,

        /// Print the simulation as JSON
        #[arg(long)]
        json: bool,
    },
    /// Export selected products with computed columns to CSV
    Export {
        /// Output CSV file
        #[arg(short, long)]
        out: PathBuf,

        /// Category to export ("All" for every category)
        #[arg(long)]
        category: Option<String>,

        /// Product name or glob pattern (repeatable; defaults to the first two products)
        #[arg(short, long = "product")]
        product: Vec<String>,
    },
    /// Write a starter config file
    Init {
        /// Overwrite an existing config without asking
        #[arg(long)]
        force: bool,
    },
}

#[derive(Parser, Debug)]
#[command(name = "ecoscore")]
#[command(about = "Compare products by sustainability score", long_about = None)]
#[command(version)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to config file (defaults to ~/.config/ecoscore/config.yaml)
    #[arg(short, long, global = true)]
    config: Option<String>,

    /// Dataset CSV (overrides the config's dataset)
    #[arg(short, long, global = true)]
    data: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

fn init_logging(verbose: bool) {
    let default_filter = if verbose { "info,ecoscore=debug" } else { "warn" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_filter)),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_ansi(std::io::stderr().is_terminal())
                .with_target(false),
        )
        .init();
}

fn print_notices(notices: &[&Notice], use_colors: bool) {
    if !notices.is_empty() {
        eprintln!("{}", output::format_notices(notices, use_colors));
    }
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    let command = cli.command.unwrap_or(Commands::Compare(CompareArgs::default()));
    let start_time = Instant::now();
    let config_path = cli.config.map(PathBuf::from);

    if let Commands::Init { force } = command {
        match run_init(config_path, force) {
            Ok(Some(path)) => println!("Wrote config to {}", path.display()),
            Ok(None) => println!("Config left unchanged."),
            Err(e) => {
                eprintln!("Init failed: {:#}", e);
                std::process::exit(EXIT_CONFIG);
            }
        }
        std::process::exit(EXIT_SUCCESS);
    }

    let config = match load_config(config_path) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Config error: {:#}", e);
            std::process::exit(EXIT_CONFIG);
        }
    };

    // Validate the whole config at startup
    if let Err(errors) = validate_config(&config) {
        eprintln!("Config errors:");
        for error in errors {
            eprintln!("  - {}", error);
        }
        std::process::exit(EXIT_CONFIG);
    }

    // The counter never blocks a run
    match counter_from_config(config.telemetry.as_ref()).and_then(|mut c| c.record_visit()) {
        Ok(0) => {}
        Ok(visits) => tracing::info!(visits, "visit recorded"),
        Err(e) => tracing::warn!("visit counter unavailable: {:#}", e),
    }

    let data_path = match cli.data.or_else(|| config.dataset.clone()) {
        Some(p) => PathBuf::from(p),
        None => {
            eprintln!("No dataset given.");
            eprintln!("Pass --data <file.csv> or set it in ~/.config/ecoscore/config.yaml:");
            eprintln!("  dataset: products.csv");
            std::process::exit(EXIT_LOAD);
        }
    };

    let table = match load_csv(&data_path) {
        Ok(t) => t,
        Err(e) => {
            eprintln!("Load error: {}", e);
            std::process::exit(EXIT_LOAD);
        }
    };

    let model = config.scoring_model();
    let dataset = match Dataset::from_table(&table, &config.alias_table(), &model.lookups) {
        Ok(d) => d,
        Err(e) => {
            eprintln!("Schema error: {}", e);
            std::process::exit(EXIT_SCHEMA);
        }
    };

    if cli.verbose {
        eprintln!(
            "Loaded {} products from {} ({} rows skipped)",
            dataset.records().len(),
            data_path.display(),
            dataset.skipped().len()
        );
    }

    let use_colors = output::should_use_colors();
    let data_label = data_path.display().to_string();

    match command {
        Commands::Columns => {
            println!("{}", output::format_columns(dataset.schema(), use_colors));
        }
        Commands::Categories => {
            println!("{}", output::format_categories(&dataset.categories()));
        }
        Commands::Compare(args) => {
            let filter = CategoryFilter::parse(args.category.as_deref());
            let selection = match select(&dataset, &filter, &args.product) {
                Ok(s) => s,
                Err(e) => {
                    eprintln!("Invalid product pattern: {}", e);
                    std::process::exit(EXIT_USAGE);
                }
            };
            let report = build_report(&selection, &model);
            let chart = args
                .view
                .map(|v| ChartSeries::build(&report.rows, dataset.schema(), v.into()));

            if args.json {
                let mut json = JsonReport::new(&data_label, &report);
                if let Some(chart) = chart {
                    json = json.with_chart(chart);
                }
                match json.to_json() {
                    Ok(text) => println!("{}", text),
                    Err(e) => {
                        eprintln!("{:#}", e);
                        std::process::exit(EXIT_USAGE);
                    }
                }
            } else if args.tsv {
                let tsv = output::format_tsv(&report.rows);
                if !tsv.is_empty() {
                    println!("{}", tsv);
                }
                for notice in report.all_notices() {
                    tracing::warn!("{}", notice);
                }
            } else {
                println!("{}", output::format_comparison_table(&report.rows, use_colors));
                println!();
                println!("{}", output::format_picks(&report.picks, use_colors));
                println!();
                println!("{}", output::format_summary(&report.summary));

                let mut notices = report.all_notices();
                if let Some(ref chart) = chart {
                    match chart.notice {
                        Some(ref notice) => notices.push(notice),
                        None => {
                            println!();
                            println!("{}", output::format_chart(chart.view, &chart.points));
                        }
                    }
                }
                print_notices(&notices, use_colors);
            }
        }
        Commands::Whatif {
            product,
            category,
            packaging,
            country,
            tweak,
            safety_gain,
            json,
        } => {
            let filter = CategoryFilter::parse(category.as_deref());
            let record = match dataset.find(&product, &filter) {
                Some(r) => r,
                None => {
                    eprintln!("Product not found: {} (category: {})", product, filter.label());
                    std::process::exit(EXIT_USAGE);
                }
            };
            let what_if = WhatIf {
                packaging,
                country,
                tweak,
                safety_gain,
            };
            let simulation = match simulate(record, &what_if, &model) {
                Ok(s) => s,
                Err(e) => {
                    eprintln!("Invalid what-if: {}", e);
                    std::process::exit(EXIT_USAGE);
                }
            };

            if json {
                match JsonReport::new(&data_label, &simulation).to_json() {
                    Ok(text) => println!("{}", text),
                    Err(e) => {
                        eprintln!("{:#}", e);
                        std::process::exit(EXIT_USAGE);
                    }
                }
            } else {
                println!("{}", output::format_simulation(&simulation, use_colors));
                let notices: Vec<&Notice> = simulation.notices.iter().collect();
                print_notices(&notices, use_colors);
            }
        }
        Commands::Export {
            out,
            category,
            product,
        } => {
            let filter = CategoryFilter::parse(category.as_deref());
            let selection = match select(&dataset, &filter, &product) {
                Ok(s) => s,
                Err(e) => {
                    eprintln!("Invalid product pattern: {}", e);
                    std::process::exit(EXIT_USAGE);
                }
            };
            let rows = score_records(&selection.selected, &model);
            match output::export_csv(&out, &rows) {
                Ok(count) => println!("Exported {} products to {}", count, out.display()),
                Err(e) => {
                    eprintln!("Export failed: {:#}", e);
                    std::process::exit(EXIT_USAGE);
                }
            }
            let notices: Vec<&Notice> = selection.notices.iter().collect();
            print_notices(&notices, use_colors);
        }
        // Handled before the dataset is loaded
        Commands::Init { .. } => {}
    }

    if cli.verbose {
        let elapsed = Duration::from_millis(start_time.elapsed().as_millis() as u64);
        eprintln!("Done in {}", humantime::format_duration(elapsed));
    }

    std::process::exit(EXIT_SUCCESS);
}

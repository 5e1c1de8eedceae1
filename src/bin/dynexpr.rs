//! dynexpr — expression and table tooling for the CMS gateway
//!
//! # Usage
//!
//! ```bash
//! # Update expression
//! dynexpr update '{"name": "Alice", "age": 30}'
//!
//! # Scan filter with a fuzzy group
//! dynexpr filter '{"role": "admin"}' --fuzzy '{"city": "Hong"}'
//!
//! # Sort a page of records
//! dynexpr sort --input rows.json --column createdTime --order descend
//! ```

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use colored::*;
use dynexpr::prelude::*;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "dynexpr")]
#[command(version)]
#[command(about = "Placeholder-safe store expressions and table shaping", long_about = None)]
#[command(after_help = "EXAMPLES:
    dynexpr update '{\"name\": \"Alice\", \"age\": 30}'
    dynexpr filter '{\"role\": \"admin\"}' --fuzzy '{\"city\": \"Hong\"}'
    dynexpr search '{\"District\": \"A,B,C\", \"title\": \"news\"}'
    dynexpr users --input users.json --role admin --sort-column userCreateDate --sort-type descend")]
struct Cli {
    /// Configuration file (defaults to ./dynexpr.toml, then the user config dir)
    #[arg(short, long, env = "DYNEXPR_CONFIG", global = true)]
    config: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "pretty", global = true)]
    format: OutputFormat,

    /// Verbose output (debug logging)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, ValueEnum)]
enum OutputFormat {
    Pretty,
    Compact,
}

#[derive(Subcommand)]
enum Commands {
    /// Build an update expression from a JSON object
    Update {
        /// Parameters as a JSON object
        params: String,
    },
    /// Build an exact + fuzzy scan filter
    Filter {
        /// Exact-match parameters as a JSON object
        params: String,

        /// Fuzzy (contains) parameters as a JSON object
        #[arg(long, default_value = "{}")]
        fuzzy: String,

        /// Keep fuzzy clauses even without any exact clause
        #[arg(long)]
        independent: bool,
    },
    /// Build a multi-field search filter
    Search {
        /// Parameters as a JSON object
        params: String,
    },
    /// Sort a JSON array of records
    Sort {
        /// File holding a JSON array of records
        #[arg(short, long)]
        input: PathBuf,

        /// Column to sort by
        #[arg(long)]
        column: Option<String>,

        /// ascend or descend
        #[arg(long)]
        order: Option<String>,

        /// Contains-filters as field=value, applied after sorting
        #[arg(long = "contains", value_parser = parse_pair)]
        contains: Vec<(String, String)>,

        /// Exact filters as field=value, applied after sorting
        #[arg(long = "exact", value_parser = parse_pair)]
        exact: Vec<(String, String)>,
    },
    /// Build one page of the user table from a user pool listing
    Users {
        /// File holding the user pool's JSON user list
        #[arg(short, long)]
        input: PathBuf,

        #[arg(long, default_value_t = 1)]
        current: usize,

        #[arg(long)]
        page_size: Option<usize>,

        #[arg(long)]
        sort_column: Option<String>,

        #[arg(long)]
        sort_type: Option<String>,

        /// Username substring
        #[arg(long)]
        username: Option<String>,

        /// Exact role
        #[arg(long)]
        role: Option<String>,
    },
}

fn main() {
    let cli = Cli::parse();

    if let Err(e) = run(&cli) {
        eprintln!("{} {:#}", "Error:".red().bold(), e);
        std::process::exit(1);
    }
}

fn run(cli: &Cli) -> Result<()> {
    let config = DynexprConfig::load(cli.config.as_deref()).context("Failed to load config")?;
    init_tracing(&config, cli.verbose);

    match &cli.command {
        Commands::Update { params } => {
            let params = parse_params(params)?;
            let update = build_update_expression(&params);
            if update.is_noop_update() {
                eprintln!("{}", "⚠ No field qualified; the update is a no-op.".yellow());
            }
            print_json(&update.to_update_input(), &cli.format)
        }
        Commands::Filter {
            params,
            fuzzy,
            independent,
        } => {
            let params = parse_params(params)?;
            let fuzzy = parse_params(fuzzy)?;
            let gate = if *independent {
                FuzzyGate::Independent
            } else {
                FuzzyGate::RequireExact
            };
            print_filter(build_filter_expression(&params, &fuzzy, gate), &cli.format)
        }
        Commands::Search { params } => {
            let params = parse_params(params)?;
            let table = config.strategy_table();
            print_filter(build_search_expression(&params, &table), &cli.format)
        }
        Commands::Sort {
            input,
            column,
            order,
            contains,
            exact,
        } => {
            let records: Vec<Record> = read_json(input)?;
            let sorted = config.sorter().sort(
                &records,
                column.as_deref(),
                order.as_deref(),
                || sort_by_modified_or_created(&records, SortOrder::Descend),
            );

            let mut filters = FieldFilters::new();
            for (field, value) in contains {
                filters = filters.contains(field.as_str(), value.as_str());
            }
            for (field, value) in exact {
                filters = filters.exact(field.as_str(), value.as_str());
            }

            let rows = filter_by_fields(&sorted, &filters);
            tracing::info!(rows = rows.len(), "sorted records");
            print_json(&rows, &cli.format)
        }
        Commands::Users {
            input,
            current,
            page_size,
            sort_column,
            sort_type,
            username,
            role,
        } => {
            let users: Vec<CognitoUser> = read_json(input)?;
            let query = UserListQuery {
                current: *current,
                page_size: Some(page_size.unwrap_or(config.users.default_page_size)),
                sort_column: sort_column.clone(),
                sort_type: sort_type.clone(),
                username: username.clone(),
                role: role.clone(),
            };
            let page = list_user_page(&users, &query, &config.sorter());
            print_json(&ApiResponse::success(page), &cli.format)
        }
    }
}

fn init_tracing(config: &DynexprConfig, verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("dynexpr=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_filter))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn parse_params(raw: &str) -> Result<ParamSet> {
    let params: ParamSet = serde_json::from_str(raw)
        .map_err(|e| DynexprError::invalid(format!("parameters must be a JSON object of scalars: {}", e)))?;
    Ok(params)
}

fn parse_pair(raw: &str) -> Result<(String, String), String> {
    raw.split_once('=')
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .ok_or_else(|| format!("expected field=value, got '{}'", raw))
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let value = serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse {}", path.display()))?;
    Ok(value)
}

fn print_filter(filter: Option<ExpressionArtifact>, format: &OutputFormat) -> Result<()> {
    match filter {
        Some(filter) => print_json(&filter.to_filter_input(), format),
        None => {
            eprintln!("{}", "(no filter)".dimmed());
            print_json(&serde_json::json!({}), format)
        }
    }
}

fn print_json<T: serde::Serialize>(value: &T, format: &OutputFormat) -> Result<()> {
    let out = match format {
        OutputFormat::Pretty => serde_json::to_string_pretty(value)?,
        OutputFormat::Compact => serde_json::to_string(value)?,
    };
    println!("{}", out);
    Ok(())
}

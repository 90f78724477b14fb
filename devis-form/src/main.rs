use std::path::PathBuf;

use anyhow::Context;
use chrono::Local;
use clap::Parser;
use rust_decimal::Decimal;
use tracing::{debug, info};

use devis_form::config::FormConfig;
use devis_form::models::QuoteFormModel;
use devis_form::state::QuoteFormState;
use devis_form::utils::{parse_decimal, parse_discount};
use devis_form::{app, line_loader, logging};

// ─── CLI definition ──────────────────────────────────────────────────────────

/// Quote (devis) calculator.
///
/// Loads quote lines from a CSV or JSON file, optionally refreshes their
/// prices from the catalog, and prints the lines with the quote totals.
#[derive(Debug, Parser)]
#[command(name = "devis", version)]
struct Cli {
    /// Lines file (`.csv` or `.json`).
    lines: PathBuf,

    /// Discount percentage (`remise_pourcent`), e.g. `10` or `7,5`.
    #[arg(long)]
    discount: Option<String>,

    /// TOML configuration file.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Catalog backend (`http` or `static`), overrides the config file.
    #[arg(long)]
    backend: Option<String>,

    /// Catalog endpoint: base URL for `http`, price list path for `static`.
    #[arg(long)]
    endpoint: Option<String>,

    /// Look up every line's unit code in the catalog before computing totals.
    #[arg(long)]
    refresh_prices: bool,

    /// Log filter, overrides the config file and `RUST_LOG`.
    #[arg(long)]
    log_level: Option<String>,

    /// Number of the last quote on file, used to number this one.
    #[arg(long)]
    last_number: Option<String>,

    /// Client id, required by `--emit-json`.
    #[arg(long)]
    client_id: Option<i64>,

    /// Deposit already received; prints an invoice preview.
    #[arg(long)]
    deposit: Option<String>,

    /// Print the submission payload as JSON instead of the text report.
    #[arg(long)]
    emit_json: bool,
}

// ─── entry point ─────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => FormConfig::load(path)?,
        None => FormConfig::default(),
    };
    logging::init_logging(&config.logging, cli.log_level.as_deref())?;

    let mut catalog_config = config.catalog_config();
    if let Some(backend) = cli.backend {
        catalog_config.backend = backend;
    }
    if let Some(endpoint) = cli.endpoint {
        catalog_config.endpoint = endpoint;
    }

    let inputs = line_loader::load_from_file(&cli.lines)
        .with_context(|| format!("cannot load lines from '{}'", cli.lines.display()))?;
    let mut state = QuoteFormState::new(inputs);
    let discount = parse_discount(cli.discount.as_deref());
    let deposit: Option<Decimal> = cli
        .deposit
        .as_deref()
        .map(parse_decimal)
        .transpose()
        .context("invalid --deposit")?;

    let catalog = if cli.refresh_prices {
        debug!(backend = %catalog_config.backend, endpoint = %catalog_config.endpoint, "opening catalog");
        let registry = app::build_registry();
        Some(registry.create(&catalog_config).await?)
    } else {
        None
    };

    let report = app::build_report(&mut state, catalog.as_deref(), discount, deposit).await;

    let model = QuoteFormModel {
        client_id: cli.client_id,
        discount,
        deposit: deposit.unwrap_or_default(),
        ..QuoteFormModel::new(cli.last_number.as_deref(), Local::now().date_naive())
    };

    if cli.emit_json {
        let submission = model
            .to_submission(&state)
            .map_err(|errors| anyhow::anyhow!("quote cannot be submitted: {}", errors.join("; ")))?;
        println!("{}", serde_json::to_string_pretty(&submission)?);
    } else {
        println!("{model}");
        println!();
        println!("{report}");
    }

    info!(lines = state.len(), "done");
    Ok(())
}

//! larderd - Larder recipe feasibility daemon.
//!
//! `serve` exposes the HTTP API; `suggest` and `inspect` run the same
//! catalog and engine from the command line.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use larder_catalog::{CatalogError, CatalogFiles, Larder};
use larder_core::Suggester;
use larder_server::ServerOpts;
use larder_units::{Measurement, Product};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "larderd", about = "Larder recipe feasibility daemon")]
#[command(version)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Tables the catalog is built from.
#[derive(Args)]
struct CatalogArgs {
    /// CSV sheet of culinary units with per-product conversions
    #[arg(long, env = "CONVERSION_TABLE_CSV")]
    conversion_table_csv: Option<PathBuf>,

    /// INI file of base and per-product unit conversions
    #[arg(long, env = "CONVERSION_TABLE_INI")]
    conversion_table_ini: Option<PathBuf>,

    /// INI file of unit aliases
    #[arg(long, env = "UNIT_ALIAS_TABLE")]
    unit_alias_table: Option<PathBuf>,

    /// INI file mapping product names to canonical names
    #[arg(long, env = "PRODUCT_ALIAS_MAP")]
    product_alias_map: Option<PathBuf>,

    /// CSV of recipe sources
    sources_csv: PathBuf,

    /// CSV files of recipe ingredients
    #[arg(required = true)]
    recipes_csv: Vec<PathBuf>,
}

impl CatalogArgs {
    fn files(&self) -> CatalogFiles {
        CatalogFiles {
            conversion_csv: self.conversion_table_csv.clone(),
            conversion_ini: self.conversion_table_ini.clone(),
            unit_aliases: self.unit_alias_table.clone(),
            product_aliases: self.product_alias_map.clone(),
            sources: self.sources_csv.clone(),
            recipes: self.recipes_csv.clone(),
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Serve the HTTP API
    Serve {
        /// HTTP port
        #[arg(long, default_value = "8080", env = "PORT")]
        port: u16,

        /// Host address to bind to
        #[arg(long, default_value = "0.0.0.0", env = "BIND_HOST")]
        bind_host: String,

        /// Origin allowed by CORS
        #[arg(long, env = "HTTP_ORIGIN")]
        http_origin: Option<String>,

        /// Allow requests from any origin
        #[arg(long, env = "LARDER_DEBUG")]
        debug: bool,

        /// PEM certificate chain; serves HTTPS together with --tls-key-file
        #[arg(long, env = "TLS_CERT_FILE", requires = "tls_key_file")]
        tls_cert_file: Option<PathBuf>,

        /// PEM private key for --tls-cert-file
        #[arg(long, env = "TLS_KEY_FILE", requires = "tls_cert_file")]
        tls_key_file: Option<PathBuf>,

        #[command(flatten)]
        catalog: CatalogArgs,
    },

    /// Print the maximal recipe sets for a stock file
    Suggest {
        /// JSON object of product name to {"quantity", "unit"}
        #[arg(short, long)]
        stock: PathBuf,

        /// Number of servings
        #[arg(short = 'n', long, default_value = "1", allow_negative_numbers = true)]
        servings: i64,

        #[command(flatten)]
        catalog: CatalogArgs,
    },

    /// Load and validate the tables, then print a summary
    Inspect {
        #[command(flatten)]
        catalog: CatalogArgs,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .init();

    match cli.command {
        Commands::Serve {
            port,
            bind_host,
            http_origin,
            debug,
            tls_cert_file,
            tls_key_file,
            catalog,
        } => {
            let larder = load(&catalog)?;
            larder_server::start_server(
                larder,
                ServerOpts {
                    bind_host,
                    port,
                    http_origin,
                    debug,
                    tls_cert_file,
                    tls_key_file,
                },
            )
            .await?;
        }
        Commands::Suggest {
            stock,
            servings,
            catalog,
        } => {
            let larder = load(&catalog)?;
            suggest(&larder, &stock, servings)?;
        }
        Commands::Inspect { catalog } => match larder_catalog::load(&catalog.files()) {
            Ok(larder) => inspect(&larder),
            Err(CatalogError::Invalid(errors)) => {
                eprintln!("Catalog validation failed:");
                for error in &errors {
                    eprintln!("  - {}", error);
                }
                anyhow::bail!("catalog has {} validation errors", errors.len());
            }
            Err(e) => return Err(anyhow::Error::new(e).context("Failed to load catalog")),
        },
    }

    Ok(())
}

fn load(args: &CatalogArgs) -> Result<Larder> {
    info!("Loading catalog from {:?}", args.sources_csv);
    larder_catalog::load(&args.files()).context("Failed to load catalog")
}

fn read_stock(path: &Path) -> Result<Vec<Product>> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read stock file {:?}", path))?;
    parse_stock(&text).with_context(|| format!("Invalid stock file {:?}", path))
}

/// Products in name order, so colliding aliases resolve the same way on
/// every run.
fn parse_stock(text: &str) -> Result<Vec<Product>> {
    let stock: BTreeMap<String, Measurement> = serde_json::from_str(text)?;
    Ok(stock
        .into_iter()
        .map(|(name, measurement)| Product { name, measurement })
        .collect())
}

fn suggest(larder: &Larder, stock: &Path, servings: i64) -> Result<()> {
    let products = read_stock(stock)?;
    let suggestions = Suggester::new(&larder.context, &larder.catalog).suggest(products, servings)?;
    println!("{}", serde_json::to_string_pretty(&suggestions.sets)?);
    Ok(())
}

fn inspect(larder: &Larder) {
    println!("Catalog is valid!");
    println!("  Recipes: {}", larder.catalog.len());
    for recipe in larder.catalog.recipes() {
        println!(
            "    - {}: {} ingredients ({})",
            recipe.name,
            recipe.ingredients.len(),
            larder.catalog.source(&recipe.name).unwrap_or("no source")
        );
    }
    println!("  Products: {}", larder.products.len());
    println!("  Products with unit lists: {}", larder.product_units.len());
    println!("  Densities: {}", larder.context.densities.len());
}

use clap::{Parser, Subcommand};
use env_logger::{Builder, Env};
use folio_paginate::{config, output};
use log::info;
use std::path::{Path, PathBuf};

fn version_string() -> &'static str {
    let on_tag = env!("ON_RELEASE_TAG");
    if on_tag == "true" {
        env!("CARGO_PKG_VERSION")
    } else {
        let hash = env!("GIT_HASH");
        if hash.is_empty() {
            "dev@unknown"
        } else {
            // Leaked once; only called at startup
            Box::leak(format!("dev@{hash}").into_boxed_str())
        }
    }
}

#[derive(Parser)]
#[command(name = "folio-paginate")]
#[command(about = "Split content collections into linked pages")]
#[command(long_about = "\
Split content collections into linked pages

Reads collections from a metadata JSON file, splits each configured
collection into pages and writes a JSON file map of page descriptors
(path → template/layout, contents, metadata, pagination) for a renderer.

Example paginate.toml:

  [[collection]]
  name = \"collections.articles\"    # Dotted reference into metadata.json
  per_page = 3
  template = \"index.html\"
  first = \"articles/index.html\"
  path = \"articles/page/:num/index.html\"

Path placeholders: :num, :index, :name, :total

Run 'folio-paginate gen-config' to print a documented config.")]
#[command(version = version_string())]
struct Cli {
    /// Pagination config file
    #[arg(long, default_value = "paginate.toml", global = true)]
    config: PathBuf,

    /// Metadata JSON holding the collections
    #[arg(long, default_value = "metadata.json", global = true)]
    metadata: PathBuf,

    /// File map output path
    #[arg(long, default_value = "pages.json", global = true)]
    output: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Paginate every configured collection and write the file map
    Paginate,
    /// Validate config and collections without writing anything
    Check,
    /// Print a documented paginate.toml
    GenConfig,
}

fn init_logger() {
    // RUST_LOG overrides; e.g. RUST_LOG=debug folio-paginate paginate
    Builder::from_env(Env::default().default_filter_or("info"))
        .format_timestamp_millis()
        .init();
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    init_logger();

    match cli.command {
        Command::Paginate => {
            let result = run_batch(&cli.config, &cli.metadata)?;
            let json = serde_json::to_string_pretty(&result)?;
            if let Some(parent) = cli.output.parent().filter(|p| !p.as_os_str().is_empty()) {
                std::fs::create_dir_all(parent)?;
            }
            std::fs::write(&cli.output, json)?;
            output::print_paginate_output(&result);
            info!("wrote {}", cli.output.display());
        }
        Command::Check => {
            println!("==> Checking {}", cli.config.display());
            let result = run_batch(&cli.config, &cli.metadata)?;
            output::print_paginate_output(&result);
            println!("==> Config is valid");
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }

    Ok(())
}

/// Load config and metadata, then paginate every collection.
fn run_batch(
    config_path: &Path,
    metadata_path: &Path,
) -> Result<folio_paginate::Paginated<serde_json::Value>, Box<dyn std::error::Error>> {
    let site_config = config::load_config(config_path)?;
    let metadata_content = std::fs::read_to_string(metadata_path)?;
    let metadata: serde_json::Value = serde_json::from_str(&metadata_content)?;

    let paginator = site_config.into_paginator();
    info!(
        "paginating {}",
        paginator.names().collect::<Vec<_>>().join(", ")
    );
    Ok(paginator.run(&metadata)?)
}

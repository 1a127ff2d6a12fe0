//! `cmr-search` command line front end

use crate::config;
use crate::logging;
use crate::search::adapters::{CollectionRequest, GranuleRequest};
use crate::search::client::{HttpTransport, SearchClient, DEFAULT_EXT};
use crate::search::params::SearchParams;
use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Debug, Parser)]
#[command(name = "cmr-search")]
#[command(about = "Search CMR collections and granules", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Search collections
    Collections(SearchArgs),
    /// Search granules
    Granules(SearchArgs),
}

#[derive(Debug, Args)]
pub struct SearchArgs {
    /// Response format (json, umm_json, ...)
    #[arg(long, default_value = DEFAULT_EXT)]
    pub ext: String,

    /// Auth token; routes the search through the application API
    #[arg(long, env = "CMR_AUTH_TOKEN")]
    pub token: Option<String>,

    /// Config file to use instead of the default location
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Search parameters; repeated keys become arrays
    #[arg(value_name = "KEY=VALUE", value_parser = parse_key_value)]
    pub params: Vec<(String, String)>,
}

impl SearchArgs {
    pub fn search_params(&self) -> SearchParams {
        let mut params = SearchParams::new();
        for (key, value) in &self.params {
            params.append(key.clone(), value.clone());
        }
        params
    }
}

fn parse_key_value(raw: &str) -> Result<(String, String), String> {
    raw.split_once('=')
        .map(|(key, value)| (key.to_string(), value.to_string()))
        .filter(|(key, _)| !key.is_empty())
        .ok_or_else(|| format!("expected key=value, got '{raw}'"))
}

/// Entry point used by the binary
pub async fn run() -> Result<()> {
    let cli = Cli::parse();

    let args = match &cli.command {
        Commands::Collections(args) | Commands::Granules(args) => args,
    };

    let config = match &args.config {
        Some(path) => config::load_from_path(path)?.with_env_overrides(),
        None => config::load_or_create_config()?,
    };
    let _log_guard = logging::init(&config)?;

    let params = args.search_params();
    let token = args.token.as_deref();
    let transport = Arc::new(HttpTransport::new()?);

    let output = match &cli.command {
        Commands::Collections(_) => {
            SearchClient::new(CollectionRequest::new(&config, token), transport)
                .search(&params, &args.ext)
                .await?
        }
        Commands::Granules(_) => {
            SearchClient::new(GranuleRequest::new(&config, token), transport)
                .search(&params, &args.ext)
                .await?
        }
    };

    println!(
        "{}",
        serde_json::to_string_pretty(&output).context("Failed to render search results")?
    );
    Ok(())
}

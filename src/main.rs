use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use tcg_browser::api::TcgClient;
use tcg_browser::codec::{ApiQuery, SearchParams};
use tcg_browser::config::{Config, ConfigError};
use tcg_browser::pages::CardPage;
use tcg_browser::server::{init_tracing, Server};

#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Cli {
    /// Config file (default: <config dir>/tcg-browser/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Override `server.bind_addr`
    #[arg(long, global = true)]
    bind: Option<String>,

    /// Override `search.default_page_size`
    #[arg(long, global = true)]
    page_size: Option<u32>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Serve the HTTP interface (default)
    Serve,
    /// Run a search given as a shareable query string, e.g. `types=Fire&page=2`
    Search { query: String },
    /// Print one card page
    Card { id: String },
}

fn load_config(cli: &Cli) -> Result<Config, ConfigError> {
    let mut config = match &cli.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };
    if let Some(bind) = &cli.bind {
        config.server.bind_addr = bind.clone();
    }
    if let Some(page_size) = cli.page_size {
        config.search.default_page_size = page_size;
    }
    config.validate()?;
    Ok(config)
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing();

    let config = load_config(&cli).context("failed to load configuration")?;
    let client = TcgClient::from_config(&config).context("failed to create API client")?;

    match cli.command.unwrap_or(Command::Serve) {
        Command::Serve => {
            let mut server = Server::new(config, client);
            server.bind().await.context("failed to bind server")?;
            server.run().await.context("server error")?;
        }
        Command::Search { query } => {
            let params = SearchParams::parse(&query)?;
            let api_query = ApiQuery::from_params(&params, config.search.default_page_size);
            let results = client.get_cards(&api_query).await?;
            println!("{}", serde_json::to_string_pretty(&results)?);
        }
        Command::Card { id } => {
            let card = client
                .get_card(&id)
                .await
                .with_context(|| format!("card '{id}' not found"))?;
            println!("{}", serde_json::to_string_pretty(&CardPage::from_card(card))?);
        }
    }

    Ok(())
}

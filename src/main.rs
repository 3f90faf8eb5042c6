use anyhow::Context;
use clap::{Parser, Subcommand};
use std::sync::Arc;

use packsearch::api::create_router;
use packsearch::catalog::LocalCatalog;
use packsearch::config::{CONFIG, ListingSourceKind};
use packsearch::ebay::EbayClient;
use packsearch::query_engine::{ListingSource, QueryEngine};

#[derive(Parser, Debug)]
#[command(version, about = "Pack-aware product search for voice assistants")]
struct Args {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP search API.
    Serve {
        /// Address to bind, overrides BIND_ADDR.
        #[arg(long)]
        addr: Option<String>,
    },
    /// Print how a spoken phrase is interpreted.
    Interpret { phrase: Vec<String> },
}

fn listing_source() -> anyhow::Result<Box<dyn ListingSource>> {
    Ok(match CONFIG.listing_source {
        ListingSourceKind::Ebay => Box::new(EbayClient::from_config(&CONFIG)?),
        ListingSourceKind::Catalog => Box::new(LocalCatalog::load(&CONFIG.catalog_path)?),
    })
}

async fn serve(addr: Option<String>) -> anyhow::Result<()> {
    let engine = Arc::new(QueryEngine::with_source(listing_source()?));
    let addr = addr.unwrap_or_else(|| CONFIG.bind_addr.clone());

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    log::info!(
        "listening on {addr} with {:?} listings",
        CONFIG.listing_source
    );
    axum::serve(listener, create_router(engine)).await?;
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing subscriber (handles both tracing and log crate)
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .with_target(true)
        .init();

    let args = Args::parse();
    match args.command.unwrap_or(Command::Serve { addr: None }) {
        Command::Serve { addr } => serve(addr).await,
        Command::Interpret { phrase } => {
            let interpreted = packsearch::interpret(&phrase.join(" "));
            println!("{}", serde_json::to_string_pretty(&interpreted)?);
            Ok(())
        }
    }
}

//! Spellfall binary.
//!
//! With arguments, the arguments are joined into one query, run once against
//! the configured corpus and the matching names are printed in order, each
//! followed by its reference link when the record has one. Without
//! arguments an HTTP server is started on the configured bind address.
//!
//! Settings come from `spellfall.toml` (optional) and `SPELLFALL_*` environment
//! variables, see [`spellfall::settings::Settings`]. `RUST_LOG` takes precedence
//! over the configured log filter.

use std::sync::Arc;

use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use spellfall::error::Result;
use spellfall::interface::QueryInterface;
use spellfall::server::router;
use spellfall::settings::Settings;

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        error!(error = %e, "spellfall stopped");
        eprintln!("{e}");
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    let settings = Settings::load()?;
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&settings.log_filter));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let interface = Arc::new(QueryInterface::open(&settings.corpus_path)?);

    let words: Vec<String> = std::env::args().skip(1).collect();
    if !words.is_empty() {
        let outcome = interface.search(&words.join(" "))?;
        for name in &outcome.names {
            match outcome.urls.get(name) {
                Some(url) => println!("{name}\t{url}"),
                None => println!("{name}"),
            }
        }
        return Ok(());
    }

    let listener = tokio::net::TcpListener::bind(&settings.bind_address).await?;
    info!(address = %settings.bind_address, corpus = %settings.corpus_path, "serving");
    axum::serve(listener, router(interface)).await?;
    Ok(())
}

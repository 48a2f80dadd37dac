//! # Library Sample
//!
//! Talks to a JSON:API book catalogue.
//!
//! ## 🚀 Core Components
//!
//! - **[model](jsonapi_sample::model)**: Plain data structures ([`Book`], [`Author`]) with
//!   their resource schemas.
//! - **[clients](jsonapi_sample::clients)**: Typed clients (e.g.
//!   [`BookClient`](jsonapi_sample::clients::BookClient)) built on collections.
//! - **[library](jsonapi_sample::library)**: The [`Library`] that wires the clients together.
//!
//! ## 📚 Quick Start
//!
//! ```bash
//! JSONAPI_BASE_URL=https://api.example.com/v1 RUST_LOG=info cargo run -p jsonapi-sample
//! ```
//!
//! The demo:
//! 1. Loads [`ClientConfig`] from the environment.
//! 2. Walks the whole catalogue, page by page.
//! 3. Shows the bibliography of the first book's author.

use jsonapi_client::ClientConfig;
use jsonapi_core::tracing::setup_tracing;
use jsonapi_sample::model::{Author, Book};
use jsonapi_sample::Library;
use tracing::{error, info, Instrument};

#[tokio::main]
async fn main() -> Result<(), String> {
    // Setup tracing once for the entire application
    setup_tracing();

    let config = ClientConfig::from_env().map_err(|e| e.to_string())?;
    info!(base_url = %config.base_url, policy = ?config.include_policy, "Starting library client");

    let library = Library::connect(config).map_err(|e| e.to_string())?;

    let span = tracing::info_span!("catalogue");
    let books: Vec<Book> = async {
        info!("Loading catalogue");
        library.catalogue().await.map_err(|e| e.to_string())
    }
    .instrument(span)
    .await?;

    for book in &books {
        info!(id = %book.id, title = %book.title, published = ?book.published, "Book");
    }

    let Some(author_id) = books
        .iter()
        .find_map(|book| book.author.as_ref().map(|a| a.id.clone()))
    else {
        info!("No books with an author; done");
        return Ok(());
    };

    let span = tracing::info_span!("bibliography", %author_id);
    let result: Result<(Author, Vec<Book>), _> = library
        .bibliography(&author_id)
        .instrument(span)
        .await;

    match result {
        Ok((author, written)) => {
            info!(author = %author.name, books = written.len(), "Bibliography loaded")
        }
        Err(e) => error!(error = %e, "Bibliography failed"),
    }

    info!("Application completed successfully");
    Ok(())
}

use crate::{model::Quote, provider::QuoteProvider, repository::QuoteRepository};
use anyhow::Result;
use tracing::{info, warn};

/// Outcome of a single lookup. Storage is best effort, so its result is kept apart
/// from the fetched quote.
pub struct Lookup {
    pub quote: Quote,
    pub stored: Result<i64>,
}

pub async fn lookup(provider: &dyn QuoteProvider, repo: &QuoteRepository) -> Result<Lookup> {
    let quote = provider.fetch().await?;

    let stored = repo.insert(&quote).await;

    match &stored {
        Ok(id) => info!(id, bid = %quote.bid, "Stored quote"),
        Err(e) => warn!(%e, provider = %provider.name(), "Unable to store quote"),
    }

    Ok(Lookup { quote, stored })
}

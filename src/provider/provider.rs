use crate::model::Quote;
use anyhow::Result;

/// Source of the current USD/BRL quote.
#[rocket::async_trait]
pub trait QuoteProvider: Send + Sync {
    fn name(&self) -> String;

    async fn fetch(&self) -> Result<Quote>;
}

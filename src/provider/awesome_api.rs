use crate::{
    model::{Quote, QuotePayload},
    provider::QuoteProvider,
};
use anyhow::{bail, Context, Result};
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use std::time::Duration;
use tracing::{info, warn};

pub struct AwesomeApi {
    conf: UpstreamConf,
    client: Client,
}

#[derive(Clone, Deserialize)]
pub struct UpstreamConf {
    pub url: String,
    pub timeout_ms: u64,
}

impl UpstreamConf {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

impl AwesomeApi {
    pub fn new(conf: UpstreamConf) -> Result<AwesomeApi> {
        // Bounds the whole exchange, body included
        let client = Client::builder()
            .timeout(conf.timeout())
            .build()
            .context("Unable to build upstream HTTP client")?;

        Ok(AwesomeApi { conf, client })
    }
}

#[rocket::async_trait]
impl QuoteProvider for AwesomeApi {
    fn name(&self) -> String {
        "awesomeapi".into()
    }

    async fn fetch(&self) -> Result<Quote> {
        let url = &self.conf.url;

        let res = self.client.get(url).send().await.map_err(|e| {
            if e.is_timeout() {
                warn!(
                    provider = %self.name(),
                    %url,
                    timeout_ms = self.conf.timeout_ms,
                    "Upstream request timed out"
                );
            }
            e
        })?;

        let status = res.status();
        if status != StatusCode::OK {
            bail!("Upstream answered with status {}", status.as_u16());
        }

        let body = res.bytes().await.map_err(|e| {
            if e.is_timeout() {
                warn!(provider = %self.name(), %url, "Upstream body read timed out");
            }
            e
        })?;

        let payload: QuotePayload =
            serde_json::from_slice(&body).context("Unable to decode upstream quote")?;
        info!(provider = %self.name(), bid = %payload.usdbrl.bid, "Fetched quote");
        Ok(payload.usdbrl)
    }
}

use crate::model::QuotePayload;
use anyhow::{Context, Result};
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use std::{
    fs,
    path::{Path, PathBuf},
    process::exit,
    time::Duration,
};
use tracing::{error, info, warn};

#[derive(Clone, Deserialize)]
pub struct ClientConf {
    pub url: String,
    pub timeout_ms: u64,
    pub output: PathBuf,
}

impl ClientConf {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

#[derive(Debug, PartialEq)]
pub enum Outcome {
    /// Bid written to the output file
    Saved(String),
    /// Server answered with a non-200 status
    Rejected(u16),
}

pub async fn cli(conf: &ClientConf) {
    match run(conf).await {
        Ok(Outcome::Saved(bid)) => {
            info!(%bid, output = %conf.output.display(), "Quote saved");
            println!("Quote saved to {}", conf.output.display());
        }
        Ok(Outcome::Rejected(code)) => warn!(code, "Server rejected the request"),
        Err(e) => {
            error!(%e, url = %conf.url, "Unable to fetch quote");
            exit(1);
        }
    }
}

pub async fn run(conf: &ClientConf) -> Result<Outcome> {
    // The timeout covers the in-flight call, not just its construction
    let client = Client::builder()
        .timeout(conf.timeout())
        .build()
        .context("Unable to build HTTP client")?;

    let res = client.get(&conf.url).send().await.map_err(|e| {
        if e.is_timeout() {
            warn!(url = %conf.url, timeout_ms = conf.timeout_ms, "Request timed out");
        }
        e
    })?;

    let status = res.status();
    let body = res.text().await?;

    if status != StatusCode::OK {
        println!("StatusCode Error: {} {}", status.as_u16(), body);
        return Ok(Outcome::Rejected(status.as_u16()));
    }

    println!("{}", body);

    let payload: QuotePayload =
        serde_json::from_str(&body).context("Unable to decode server response")?;
    let bid = payload.usdbrl.bid;
    write_bid(&conf.output, &bid)?;

    Ok(Outcome::Saved(bid))
}

/// Replaces the file content with a single `Dólar: <bid>` line.
pub fn write_bid(path: &Path, bid: &str) -> Result<()> {
    fs::write(path, format!("Dólar: {}", bid))
        .with_context(|| format!("Unable to write {}", path.display()))
}

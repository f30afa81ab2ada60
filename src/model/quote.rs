use rocket::serde::{Deserialize, Serialize};

/// USD/BRL quote as published by the upstream API. Every field is carried as text.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(crate = "rocket::serde", default)]
pub struct Quote {
    pub code: String,
    pub codein: String,
    pub name: String,
    pub high: String,
    pub low: String,
    #[serde(rename = "varBid")]
    pub var_bid: String,
    #[serde(rename = "pctChange")]
    pub pct_change: String,
    pub bid: String,
    pub ask: String,
    pub timestamp: String,
    pub create_date: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(crate = "rocket::serde")]
pub struct QuotePayload {
    #[serde(rename = "USDBRL")]
    pub usdbrl: Quote,
}

impl From<Quote> for QuotePayload {
    fn from(quote: Quote) -> QuotePayload {
        QuotePayload { usdbrl: quote }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct StoredQuote {
    pub id: i64,
    pub quote: Quote,
}

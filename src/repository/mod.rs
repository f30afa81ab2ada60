pub mod quote;
pub use quote::{DbConf, QuoteRepository};

mod provider;
pub use provider::QuoteProvider;
mod awesome_api;
pub use awesome_api::{AwesomeApi, UpstreamConf};

mod api_error;
pub use api_error::ApiError;
mod api_result;
pub use api_result::ApiResult;
mod quote;
pub use quote::{Quote, QuotePayload, StoredQuote};

//! HTTP endpoint implementations for author and quote CRUD.

mod author_handlers;
mod quote_handlers;
mod request_utils;
mod response;

pub use author_handlers::create_author;
pub use quote_handlers::{create_quote, delete_quote, get_quote, list_quotes, update_quote};
pub use response::{error_response, ApiError, ErrorResponse};

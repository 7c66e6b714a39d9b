//! Request utilities for HTTP endpoints: body collection, payload types,
//! validation, and store error mapping.

use http_body_util::BodyExt;
use hyper::body::{Body, Bytes};
use hyper::Request;
use serde::Deserialize;

use crate::router::RouterError;
use quotes_store::StoreError;

/// Type alias for matchit parameters with explicit lifetimes
pub type MatchitParams<'a, 'b> = matchit::Params<'a, 'b>;

/// Collects the full request body into memory.
pub async fn read_request_body<B>(req: Request<B>) -> Result<Bytes, RouterError>
where
    B: Body,
    B::Error: std::fmt::Display,
{
    let collected = req
        .into_body()
        .collect()
        .await
        .map_err(|e| RouterError::InternalError(format!("Failed to read request body: {}", e)))?;
    Ok(collected.to_bytes())
}

/// Deserializes a JSON request body, rejecting malformed or over-specified
/// payloads with a 400.
pub fn parse_json<T: serde::de::DeserializeOwned>(bytes: &Bytes) -> Result<T, RouterError> {
    serde_json::from_slice(bytes)
        .map_err(|e| RouterError::BadRequest(format!("Failed to parse request: {}", e)))
}

/// Parses a numeric id out of a route parameter.
pub fn parse_id_param(params: &MatchitParams<'_, '_>, name: &str) -> Result<i64, RouterError> {
    let raw = params
        .get(name)
        .ok_or_else(|| RouterError::InternalError(format!("Missing '{}' route parameter", name)))?;
    raw.parse()
        .map_err(|e| RouterError::BadRequest(format!("Invalid id '{}': {}", raw, e)))
}

/// Checks a required string field: non-empty and within the character cap.
///
/// SQLite does not enforce declared column lengths, so the caps live here,
/// ahead of any mutation.
pub fn validate_str_field(field: &str, value: &str, max_chars: usize) -> Result<(), RouterError> {
    if value.is_empty() {
        return Err(RouterError::BadRequest(format!(
            "Field '{}' must not be empty",
            field
        )));
    }
    let len = value.chars().count();
    if len > max_chars {
        return Err(RouterError::BadRequest(format!(
            "Field '{}' exceeds {} characters (got {})",
            field, max_chars, len
        )));
    }
    Ok(())
}

/// Map StoreError to appropriate RouterError
pub fn map_store_error(e: StoreError) -> RouterError {
    match e {
        StoreError::AuthorNotFound { .. } | StoreError::QuoteNotFound { .. } => {
            RouterError::NotFound(e.to_string())
        }
        StoreError::DuplicateAuthorName { .. } | StoreError::ConstraintViolation(_) => {
            RouterError::Conflict(e.to_string())
        }
        StoreError::Database(_) | StoreError::Migration(_) => {
            RouterError::InternalError(format!("Store error: {}", e))
        }
    }
}

/// Request to create an author.
///
/// Unknown fields are rejected at parse time.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CreateAuthorRequest {
    /// Author name, unique across authors
    pub name: String,
    /// Optional surname; a fixed placeholder is applied when absent
    #[serde(default)]
    pub surname: Option<String>,
}

/// Request to create a quote under a path-scoped author.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CreateQuoteRequest {
    /// Quote text
    pub text: String,
}

/// Request to update a quote.
///
/// This is the full allow-list of mutable quote fields; any other key in
/// the payload fails deserialization and surfaces as a 400.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct UpdateQuoteRequest {
    /// New quote text
    #[serde(default)]
    pub text: Option<String>,
    /// Reassign the quote to this author
    #[serde(default)]
    pub author_id: Option<i64>,
}

//! Quote endpoint handlers.

use hyper::body::{Body, Bytes};
use hyper::{Request, Response};

use crate::router::{AppState, RouterError};
use quotes_store::models::MAX_TEXT_LEN;
use quotes_store::QuoteChanges;

use super::request_utils::{
    map_store_error, parse_id_param, parse_json, read_request_body, validate_str_field,
    CreateQuoteRequest, MatchitParams, UpdateQuoteRequest,
};
use super::response::{json_response, text_response};

/// Lists all quotes.
///
/// # Endpoint
/// `GET /quotes`
///
/// # Response
/// - **200 OK**: Array of quote objects in insertion order, each with its
///   author embedded
/// ```json
/// [
///   {"id": 1, "author": {"id": 1, "name": "Пушкин", "surname": "Иванов"}, "text": "Мороз и солнце"}
/// ]
/// ```
///
/// # Example
/// ```bash
/// curl http://localhost:8080/quotes
/// ```
pub async fn list_quotes<B>(
    _req: Request<B>,
    _params: MatchitParams<'_, '_>,
    state: AppState,
) -> Result<Response<Bytes>, RouterError>
where
    B: Body,
    B::Error: std::fmt::Display,
{
    let quotes = state.store.list_quotes().await.map_err(map_store_error)?;
    json_response(200, &quotes)
}

/// Reads a single quote.
///
/// # Endpoint
/// `GET /quotes/{id}`
///
/// # Response
/// - **200 OK**: The quote with its author embedded
///
/// # Errors
/// - **400 Bad Request**: Non-numeric id
/// - **404 Not Found**: No quote with that id
///
/// # Example
/// ```bash
/// curl http://localhost:8080/quotes/1
/// ```
pub async fn get_quote<B>(
    _req: Request<B>,
    params: MatchitParams<'_, '_>,
    state: AppState,
) -> Result<Response<Bytes>, RouterError>
where
    B: Body,
    B::Error: std::fmt::Display,
{
    let id = parse_id_param(&params, "id")?;
    let quote = state.store.get_quote(id).await.map_err(map_store_error)?;
    json_response(200, &quote)
}

/// Creates a quote for an existing author.
///
/// # Endpoint
/// `POST /authors/{author_id}/quotes`
///
/// # Request Body
/// ```json
/// {
///   "text": "Мороз и солнце"
/// }
/// ```
///
/// # Response
/// - **201 Created**: The created quote with its author embedded
///
/// # Errors
/// - **400 Bad Request**: Malformed payload, unknown fields, empty or
///   over-long `text`
/// - **404 Not Found**: The path-scoped author does not exist
///
/// # Example
/// ```bash
/// curl -X POST http://localhost:8080/authors/1/quotes \
///   -H "Content-Type: application/json" \
///   -d '{"text": "Мороз и солнце"}'
/// ```
pub async fn create_quote<B>(
    req: Request<B>,
    params: MatchitParams<'_, '_>,
    state: AppState,
) -> Result<Response<Bytes>, RouterError>
where
    B: Body,
    B::Error: std::fmt::Display,
{
    let author_id = parse_id_param(&params, "author_id")?;

    let body_bytes = read_request_body(req).await?;
    let request: CreateQuoteRequest = parse_json(&body_bytes)?;
    validate_str_field("text", &request.text, MAX_TEXT_LEN)?;

    let quote = state
        .store
        .create_quote(author_id, &request.text)
        .await
        .map_err(map_store_error)?;

    json_response(201, &quote)
}

/// Updates a quote.
///
/// # Endpoint
/// `PUT /quotes/{id}`
///
/// # Request Body
/// Any subset of the mutable quote fields:
/// ```json
/// {
///   "text": "new text",
///   "author_id": 2
/// }
/// ```
/// Keys outside the allow-list are rejected.
///
/// # Response
/// - **200 OK**: The updated quote with its author embedded
///
/// # Errors
/// - **400 Bad Request**: Malformed payload, unknown fields, empty or
///   over-long `text`
/// - **404 Not Found**: No quote with that id, or `author_id` references a
///   missing author
///
/// # Example
/// ```bash
/// curl -X PUT http://localhost:8080/quotes/1 \
///   -H "Content-Type: application/json" \
///   -d '{"text": "new text"}'
/// ```
pub async fn update_quote<B>(
    req: Request<B>,
    params: MatchitParams<'_, '_>,
    state: AppState,
) -> Result<Response<Bytes>, RouterError>
where
    B: Body,
    B::Error: std::fmt::Display,
{
    let id = parse_id_param(&params, "id")?;

    let body_bytes = read_request_body(req).await?;
    let request: UpdateQuoteRequest = parse_json(&body_bytes)?;
    if let Some(text) = &request.text {
        validate_str_field("text", text, MAX_TEXT_LEN)?;
    }

    let changes = QuoteChanges {
        text: request.text,
        author_id: request.author_id,
    };
    let quote = state
        .store
        .update_quote(id, &changes)
        .await
        .map_err(map_store_error)?;

    json_response(200, &quote)
}

/// Deletes a quote.
///
/// # Endpoint
/// `DELETE /quotes/{id}`
///
/// # Response
/// - **200 OK**: Plain-text confirmation naming the deleted id
///
/// # Errors
/// - **400 Bad Request**: Non-numeric id
/// - **404 Not Found**: No quote with that id
///
/// # Example
/// ```bash
/// curl -X DELETE http://localhost:8080/quotes/1
/// ```
pub async fn delete_quote<B>(
    _req: Request<B>,
    params: MatchitParams<'_, '_>,
    state: AppState,
) -> Result<Response<Bytes>, RouterError>
where
    B: Body,
    B::Error: std::fmt::Display,
{
    let id = parse_id_param(&params, "id")?;
    state.store.delete_quote(id).await.map_err(map_store_error)?;
    text_response(200, format!("Quote with id={} is deleted.", id))
}

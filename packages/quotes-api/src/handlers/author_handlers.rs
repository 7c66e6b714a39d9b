//! Author endpoint handlers.

use hyper::body::{Body, Bytes};
use hyper::{Request, Response};

use crate::router::{AppState, RouterError};
use quotes_store::models::MAX_NAME_LEN;

use super::request_utils::{
    map_store_error, parse_json, read_request_body, validate_str_field, CreateAuthorRequest,
    MatchitParams,
};
use super::response::json_response;

/// Creates a new author.
///
/// # Endpoint
/// `POST /authors`
///
/// # Request Body
/// ```json
/// {
///   "name": "Пушкин",
///   "surname": "Александр"
/// }
/// ```
/// `surname` is optional; a fixed placeholder is applied when it is absent.
///
/// # Response
/// - **201 Created**: Returns the created author
/// ```json
/// {
///   "id": 1,
///   "name": "Пушкин",
///   "surname": "Александр"
/// }
/// ```
///
/// # Errors
/// - **400 Bad Request**: Malformed payload, unknown fields, empty or
///   over-long `name`/`surname`
/// - **409 Conflict**: An author with the same name already exists
///
/// # Example
/// ```bash
/// curl -X POST http://localhost:8080/authors \
///   -H "Content-Type: application/json" \
///   -d '{"name": "Пушкин"}'
/// ```
pub async fn create_author<B>(
    req: Request<B>,
    _params: MatchitParams<'_, '_>,
    state: AppState,
) -> Result<Response<Bytes>, RouterError>
where
    B: Body,
    B::Error: std::fmt::Display,
{
    let body_bytes = read_request_body(req).await?;
    let request: CreateAuthorRequest = parse_json(&body_bytes)?;

    validate_str_field("name", &request.name, MAX_NAME_LEN)?;
    if let Some(surname) = &request.surname {
        validate_str_field("surname", surname, MAX_NAME_LEN)?;
    }

    let author = state
        .store
        .create_author(&request.name, request.surname.as_deref())
        .await
        .map_err(map_store_error)?;

    json_response(201, &author)
}

//! Matchit routing configuration.

use std::sync::Arc;

use hyper::body::{Body, Bytes};
use hyper::{Request, Response};
use matchit::Router as MatchitRouter;

use crate::handlers;
use quotes_store::Store;

/// Shared application state.
///
/// The store handle is constructed once at startup and injected here; no
/// handler reaches for a global.
#[derive(Clone)]
pub struct AppState {
    /// Store handle
    pub store: Arc<Store>,
}

/// HTTP request router.
pub struct Router {
    inner: MatchitRouter<RouteHandler>,
    state: AppState,
}

impl Router {
    /// Creates a new router with the service's routes.
    pub fn new(store: Arc<Store>) -> Self {
        let mut router = MatchitRouter::new();

        // Author endpoints
        router
            .insert("/authors", RouteHandler::Author)
            .expect("Failed to insert /authors route");
        router
            .insert("/authors/{author_id}/quotes", RouteHandler::AuthorQuotes)
            .expect("Failed to insert /authors/{author_id}/quotes route");

        // Quote endpoints
        router
            .insert("/quotes", RouteHandler::Quote)
            .expect("Failed to insert /quotes route");
        router
            .insert("/quotes/{id}", RouteHandler::Quote)
            .expect("Failed to insert /quotes/{id} route");

        Self {
            inner: router,
            state: AppState { store },
        }
    }

    /// Routes an incoming request to the appropriate handler.
    ///
    /// Generic over the body type so tests can drive the router with
    /// in-memory bodies over the exact production path.
    pub async fn route<B>(&self, req: Request<B>) -> Result<Response<Bytes>, RouterError>
    where
        B: Body,
        B::Error: std::fmt::Display,
    {
        let path = req.uri().path().to_string();

        match self.inner.at(&path) {
            Ok(matched) => {
                let handler = matched.value;
                handler
                    .handle(req, matched.params, self.state.clone())
                    .await
            }
            Err(_) => {
                let error_response = crate::handlers::error_response(
                    404,
                    "Not Found".to_string(),
                    Some(format!("No route found for {}", path)),
                );
                let body = serde_json::to_vec(&error_response).map_err(|e| {
                    RouterError::InternalError(format!("Failed to serialize error response: {}", e))
                })?;
                Ok(Response::builder()
                    .status(404)
                    .header("Content-Type", "application/json")
                    .body(Bytes::from(body))
                    .map_err(|e| {
                        RouterError::InternalError(format!("Failed to build response: {}", e))
                    })?)
            }
        }
    }
}

/// Route handler function.
enum RouteHandler {
    Author,
    AuthorQuotes,
    Quote,
}

impl RouteHandler {
    /// Handles a request with the given route parameters.
    async fn handle<B>(
        &self,
        req: Request<B>,
        params: matchit::Params<'_, '_>,
        state: AppState,
    ) -> Result<Response<Bytes>, RouterError>
    where
        B: Body,
        B::Error: std::fmt::Display,
    {
        match self {
            RouteHandler::Author => {
                if req.method() == hyper::Method::POST {
                    handlers::create_author(req, params, state).await
                } else {
                    Err(RouterError::MethodNotAllowed)
                }
            }
            RouteHandler::AuthorQuotes => {
                if req.method() == hyper::Method::POST {
                    handlers::create_quote(req, params, state).await
                } else {
                    Err(RouterError::MethodNotAllowed)
                }
            }
            RouteHandler::Quote => {
                let has_id_param = params.get("id").is_some();
                if req.method() == hyper::Method::GET && !has_id_param {
                    handlers::list_quotes(req, params, state).await
                } else if req.method() == hyper::Method::GET && has_id_param {
                    handlers::get_quote(req, params, state).await
                } else if req.method() == hyper::Method::PUT && has_id_param {
                    handlers::update_quote(req, params, state).await
                } else if req.method() == hyper::Method::DELETE && has_id_param {
                    handlers::delete_quote(req, params, state).await
                } else {
                    // Includes POST /quotes: quote creation is path-scoped
                    // under /authors/{author_id}/quotes.
                    Err(RouterError::MethodNotAllowed)
                }
            }
        }
    }
}

/// Router error type.
#[derive(Debug)]
pub enum RouterError {
    MethodNotAllowed,
    BadRequest(String),
    NotFound(String),
    Conflict(String),
    InternalError(String),
}

impl std::fmt::Display for RouterError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RouterError::MethodNotAllowed => write!(f, "Method Not Allowed"),
            RouterError::BadRequest(msg) => write!(f, "Bad Request: {}", msg),
            RouterError::NotFound(msg) => write!(f, "Not Found: {}", msg),
            RouterError::Conflict(msg) => write!(f, "Conflict: {}", msg),
            RouterError::InternalError(msg) => write!(f, "Internal Error: {}", msg),
        }
    }
}

impl std::error::Error for RouterError {}

impl From<RouterError> for Response<Bytes> {
    fn from(err: RouterError) -> Self {
        let (status, message) = match &err {
            RouterError::MethodNotAllowed => (405, "Method Not Allowed"),
            RouterError::BadRequest(msg) => (400, msg.as_str()),
            RouterError::NotFound(msg) => (404, msg.as_str()),
            RouterError::Conflict(msg) => (409, msg.as_str()),
            RouterError::InternalError(msg) => (500, msg.as_str()),
        };

        let error_response = crate::handlers::error_response(status, message.to_string(), None);
        let body = serde_json::to_vec(&error_response)
            .unwrap_or_else(|e| format!("{{\"success\":false,\"error\":{{\"code\":\"500\",\"message\":\"Failed to serialize error: {}\",\"details\":null}}}}", e).into_bytes());

        Response::builder()
            .status(status)
            .header("Content-Type", "application/json")
            .body(Bytes::from(body))
            .unwrap_or_else(|_| {
                Response::builder()
                    .status(500)
                    .body(Bytes::from("Internal Server Error"))
                    .expect("Failed to build fallback error response")
            })
    }
}

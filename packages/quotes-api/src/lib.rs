//! REST API server for the quotes service.
//!
//! Provides HTTP endpoints for author and quote CRUD operations,
//! request routing, and error mapping.

pub mod handlers;
pub mod router;
pub mod server;

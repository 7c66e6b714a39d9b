//! SQLite data access layer for the quotes service.
//!
//! Maps the author and quote entities to/from persisted rows and resolves
//! the quote→author relationship on read.

pub mod config;
pub mod error;
pub mod models;
pub mod store;

pub use config::StoreConfig;
pub use error::StoreError;
pub use models::{Author, QuoteChanges, QuoteWithAuthor, DEFAULT_SURNAME};
pub use store::Store;

//! Entity models for authors and quotes.

use serde::Serialize;

/// Placeholder surname applied when an author is created without one.
pub const DEFAULT_SURNAME: &str = "Иванов";

/// Maximum length of an author name or surname, in characters.
pub const MAX_NAME_LEN: usize = 32;

/// Maximum length of a quote text, in characters.
pub const MAX_TEXT_LEN: usize = 255;

/// A persisted author.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, sqlx::FromRow)]
pub struct Author {
    pub id: i64,
    pub name: String,
    pub surname: String,
}

/// A persisted quote with its author resolved.
///
/// This is the wire shape of a quote: the author is always embedded in full.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct QuoteWithAuthor {
    pub id: i64,
    pub author: Author,
    pub text: String,
}

/// Allowed mutations for an existing quote.
///
/// Fields left as `None` are not touched.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct QuoteChanges {
    pub text: Option<String>,
    pub author_id: Option<i64>,
}

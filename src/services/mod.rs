//! Services Layer
//!
//! Validate-then-query operations invoked by the menu. Every function borrows
//! the gateway; none of them keeps state between calls.

pub mod catalog_service;
pub mod circulation_service;
pub mod librarian_service;
pub mod member_service;
pub mod report_service;

use sea_orm::{DbErr, FromQueryResult, QueryResult};

pub use catalog_service::NewBook;
pub use librarian_service::NewLibrarian;
pub use member_service::NewMember;

pub(crate) fn decode_rows<T: FromQueryResult>(rows: Vec<QueryResult>) -> Result<Vec<T>, DbErr> {
    rows.iter().map(|row| T::from_query_result(row, "")).collect()
}

/// `%query%` for a substring LIKE match.
pub(crate) fn like_pattern(query: &str) -> String {
    format!("%{}%", query.trim())
}

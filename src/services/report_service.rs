//! Report Service - read-only circulation summaries

use chrono::NaiveDateTime;
use sea_orm::FromQueryResult;
use serde::Serialize;

use super::decode_rows;
use crate::domain::DomainError;
use crate::domain::circulation::format_timestamp;
use crate::infrastructure::Gateway;

pub const DEFAULT_POPULAR_LIMIT: u64 = 10;

#[derive(Debug, Clone, PartialEq, FromQueryResult, Serialize)]
pub struct OverdueLoan {
    pub transaction_id: i32,
    pub book_title: String,
    pub member_name: String,
    pub borrow_date: String,
    pub due_date: String,
}

#[derive(Debug, Clone, PartialEq, FromQueryResult, Serialize)]
pub struct PopularBook {
    pub book_id: i32,
    pub title: String,
    pub author: Option<String>,
    pub times_borrowed: i64,
}

#[derive(Debug, Clone, PartialEq, FromQueryResult, Serialize)]
pub struct MemberActivity {
    pub member_id: i32,
    pub name: String,
    pub total_borrowed: i64,
    pub currently_borrowed: i64,
    pub overdue: i64,
}

/// Open transactions whose due date is already behind `now`.
pub async fn overdue_books(gw: &Gateway, now: NaiveDateTime) -> Result<Vec<OverdueLoan>, DomainError> {
    let rows = gw
        .fetch_all(
            r#"
            SELECT t.id AS transaction_id, b.title AS book_title, m.name AS member_name,
                   t.borrow_date, t.due_date
            FROM transactions t
            JOIN book_copies bc ON t.copy_id = bc.id
            JOIN books b ON bc.book_id = b.id
            JOIN membership m ON t.member_id = m.id
            WHERE t.return_date IS NULL AND t.due_date < ?
            ORDER BY t.due_date
            "#,
            vec![format_timestamp(now).into()],
        )
        .await?;

    Ok(decode_rows(rows)?)
}

/// Books ranked by how many times any of their copies was borrowed.
pub async fn popular_books(gw: &Gateway, limit: u64) -> Result<Vec<PopularBook>, DomainError> {
    let rows = gw
        .fetch_all(
            r#"
            SELECT b.id AS book_id, b.title, b.author, COUNT(t.id) AS times_borrowed
            FROM books b
            JOIN book_copies bc ON bc.book_id = b.id
            JOIN transactions t ON t.copy_id = bc.id
            GROUP BY b.id
            ORDER BY times_borrowed DESC, b.title
            LIMIT ?
            "#,
            vec![i64::try_from(limit).unwrap_or(i64::MAX).into()],
        )
        .await?;

    Ok(decode_rows(rows)?)
}

/// Borrowing totals for every member, most active first.
pub async fn member_activity(
    gw: &Gateway,
    now: NaiveDateTime,
) -> Result<Vec<MemberActivity>, DomainError> {
    let rows = gw
        .fetch_all(
            r#"
            SELECT m.id AS member_id, m.name,
                   COUNT(t.id) AS total_borrowed,
                   COALESCE(SUM(CASE WHEN t.id IS NOT NULL AND t.return_date IS NULL
                                     THEN 1 ELSE 0 END), 0) AS currently_borrowed,
                   COALESCE(SUM(CASE WHEN t.id IS NOT NULL AND t.return_date IS NULL
                                      AND t.due_date < ? THEN 1 ELSE 0 END), 0) AS overdue
            FROM membership m
            LEFT JOIN transactions t ON t.member_id = m.id
            GROUP BY m.id
            ORDER BY total_borrowed DESC, m.name
            "#,
            vec![format_timestamp(now).into()],
        )
        .await?;

    Ok(decode_rows(rows)?)
}

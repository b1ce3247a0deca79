//! Catalog Service - categories, books and their physical copies
#![allow(clippy::needless_update)] // SeaORM ActiveModels require ..Default::default()

use sea_orm::{ActiveModelTrait, EntityTrait, QueryOrder, Set};

use super::{decode_rows, like_pattern};
use crate::domain::{DomainError, validation};
use crate::infrastructure::Gateway;
use crate::models::book::{self, BookSummary};
use crate::models::category::{self, Entity as Category};
use crate::models::copy::{self, Availability};

/// Raw book fields as typed at the prompt
#[derive(Debug, Clone)]
pub struct NewBook {
    pub title: String,
    pub isbn: String,
    pub publish_year: i32,
    pub category_id: i32,
    pub author: Option<String>,
}

const BOOK_SUMMARY_SQL: &str = r#"
    SELECT b.id, b.title, b.isbn, b.publish_year, c.name AS category, b.author,
           COUNT(bc.id) AS total_copies,
           COALESCE(SUM(CASE WHEN bc.available = 'yes' THEN 1 ELSE 0 END), 0) AS available_copies
    FROM books b
    LEFT JOIN categories c ON b.category_id = c.id
    LEFT JOIN book_copies bc ON b.id = bc.book_id
"#;

pub async fn add_category(gw: &Gateway, name: &str) -> Result<category::Model, DomainError> {
    let name = validation::category_name(name)?;

    let model = category::ActiveModel {
        name: Set(name),
        ..Default::default()
    }
    .insert(gw.conn())
    .await?;

    tracing::info!("Category {} added: {}", model.id, model.name);
    Ok(model)
}

pub async fn list_categories(gw: &Gateway) -> Result<Vec<category::Model>, DomainError> {
    let categories = Category::find()
        .order_by_asc(category::Column::Id)
        .all(gw.conn())
        .await?;
    Ok(categories)
}

/// Validate and insert a new book.
///
/// A repeated ISBN is left to the store's unique constraint and comes back as
/// `DomainError::Duplicate`.
pub async fn add_book(gw: &Gateway, input: NewBook) -> Result<book::Model, DomainError> {
    let title = validation::title(&input.title)?;
    let isbn = validation::isbn(&input.isbn)?;
    let publish_year = validation::publish_year_today(input.publish_year)?;
    let author = input
        .author
        .map(|a| a.trim().to_string())
        .filter(|a| !a.is_empty());

    Category::find_by_id(input.category_id)
        .one(gw.conn())
        .await?
        .ok_or(DomainError::not_found("Category", input.category_id))?;

    let model = book::ActiveModel {
        title: Set(title),
        isbn: Set(isbn),
        publish_year: Set(publish_year),
        category_id: Set(input.category_id),
        author: Set(author),
        ..Default::default()
    }
    .insert(gw.conn())
    .await
    .map_err(|e| {
        tracing::warn!("Error adding book: {}", e);
        DomainError::from(e)
    })?;

    tracing::info!("Book {} added: {} (ISBN {})", model.id, model.title, model.isbn);
    Ok(model)
}

/// Register a new physical copy of an existing book. Copies start available.
pub async fn add_copy(
    gw: &Gateway,
    book_id: i32,
    condition: Option<&str>,
) -> Result<copy::Model, DomainError> {
    book::Entity::find_by_id(book_id)
        .one(gw.conn())
        .await?
        .ok_or(DomainError::not_found("Book", book_id))?;

    let condition = condition
        .map(str::trim)
        .filter(|c| !c.is_empty())
        .map(str::to_string);

    let model = copy::ActiveModel {
        book_id: Set(book_id),
        available: Set(Availability::Available),
        condition_description: Set(condition),
        ..Default::default()
    }
    .insert(gw.conn())
    .await?;

    tracing::info!("Copy {} added for book {}", model.id, book_id);
    Ok(model)
}

pub async fn list_books(gw: &Gateway) -> Result<Vec<BookSummary>, DomainError> {
    let sql = format!("{BOOK_SUMMARY_SQL} GROUP BY b.id ORDER BY b.id");
    let rows = gw.fetch_all(&sql, vec![]).await?;
    Ok(decode_rows(rows)?)
}

/// Books whose title, author or ISBN contains `query` (case-insensitive).
pub async fn search_books(gw: &Gateway, query: &str) -> Result<Vec<BookSummary>, DomainError> {
    let pattern = like_pattern(query);
    let sql = format!(
        "{BOOK_SUMMARY_SQL} WHERE b.title LIKE ? OR b.author LIKE ? OR b.isbn LIKE ? \
         GROUP BY b.id ORDER BY b.title"
    );
    let rows = gw
        .fetch_all(
            &sql,
            vec![
                pattern.clone().into(),
                pattern.clone().into(),
                pattern.into(),
            ],
        )
        .await?;

    tracing::debug!("Book search {:?} matched {} rows", query, rows.len());
    Ok(decode_rows(rows)?)
}

use crate::models::{book, category, copy, librarian};
use sea_orm::*;

/// Insert a small demo catalog. Safe to run repeatedly.
pub async fn seed_demo_data(db: &DatabaseConnection) -> Result<(), DbErr> {
    // 1. Categories, only into an empty table (names are not unique)
    if category::Entity::find().count(db).await? == 0 {
        for name in ["Fiction", "Science", "Programming"] {
            category::ActiveModel {
                name: Set(name.to_owned()),
                ..Default::default()
            }
            .insert(db)
            .await?;
        }
    }

    // 2. Librarian
    let head_librarian_email = "meera.iyer@library.example";
    if librarian::Entity::find()
        .filter(librarian::Column::Email.eq(head_librarian_email))
        .one(db)
        .await?
        .is_none()
    {
        librarian::ActiveModel {
            name: Set("Meera Iyer".to_owned()),
            email: Set(head_librarian_email.to_owned()),
            hire_date: Set("2020-01-06".to_owned()),
            ..Default::default()
        }
        .insert(db)
        .await?;
    }

    // 3. One book with two copies
    let programming = category::Entity::find()
        .filter(category::Column::Name.eq("Programming"))
        .one(db)
        .await?;

    if let Some(programming) = programming
        && book::Entity::find()
            .filter(book::Column::Isbn.eq("9780132350884"))
            .one(db)
            .await?
            .is_none()
    {
        let clean_code = book::ActiveModel {
            title: Set("Clean Code".to_owned()),
            isbn: Set("9780132350884".to_owned()),
            publish_year: Set(2008),
            category_id: Set(programming.id),
            author: Set(Some("Robert Martin".to_owned())),
            ..Default::default()
        }
        .insert(db)
        .await?;

        for condition in ["New", "Good"] {
            copy::ActiveModel {
                book_id: Set(clean_code.id),
                available: Set(copy::Availability::Available),
                condition_description: Set(Some(condition.to_owned())),
                ..Default::default()
            }
            .insert(db)
            .await?;
        }
    }

    Ok(())
}

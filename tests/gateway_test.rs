mod common;

use bibliodesk::config::sqlite_url;
use bibliodesk::domain::DomainError;
use bibliodesk::infrastructure::Gateway;
use bibliodesk::models::{book, copy, librarian};
use bibliodesk::seed::seed_demo_data;
use common::setup_gateway;
use sea_orm::{ConnectionTrait, EntityTrait, PaginatorTrait};

#[tokio::test]
async fn test_execute_and_fetch() {
    let gw = setup_gateway().await;

    let affected = gw
        .execute(
            "INSERT INTO categories (name) VALUES (?), (?)",
            vec!["Fiction".into(), "Science".into()],
        )
        .await
        .unwrap();
    assert_eq!(affected, 2);

    let row = gw
        .fetch_one("SELECT name FROM categories WHERE name = ?", vec!["Science".into()])
        .await
        .unwrap()
        .expect("row should exist");
    let name: String = row.try_get("", "name").unwrap();
    assert_eq!(name, "Science");

    let missing = gw
        .fetch_one("SELECT name FROM categories WHERE name = ?", vec!["Poetry".into()])
        .await
        .unwrap();
    assert!(missing.is_none());

    let rows = gw
        .fetch_all("SELECT name FROM categories ORDER BY name", vec![])
        .await
        .unwrap();
    assert_eq!(rows.len(), 2);

    let updated = gw
        .execute(
            "UPDATE categories SET name = ? WHERE name = ?",
            vec!["Sci-Fi".into(), "Fiction".into()],
        )
        .await
        .unwrap();
    assert_eq!(updated, 1);
}

#[tokio::test]
async fn test_failed_execute_leaves_store_unchanged() {
    let gw = setup_gateway().await;

    // Category 42 does not exist
    let result = gw
        .execute(
            "INSERT INTO books (title, isbn, publish_year, category_id) VALUES (?, ?, ?, ?)",
            vec!["Clean Code".into(), "9780132350884".into(), 2008i32.into(), 42i32.into()],
        )
        .await;
    let err = result.unwrap_err();
    assert!(matches!(DomainError::from(err), DomainError::MissingReference(_)));

    let count = book::Entity::find().count(gw.conn()).await.unwrap();
    assert_eq!(count, 0);

    // The connection is still usable afterwards
    assert!(gw.fetch_all("SELECT * FROM books", vec![]).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_uncommitted_transaction_is_rolled_back() {
    let gw = setup_gateway().await;

    {
        let txn = gw.begin().await.unwrap();
        txn.execute_unprepared("INSERT INTO categories (name) VALUES ('Fiction')")
            .await
            .unwrap();
        // dropped without commit
    }

    let rows = gw.fetch_all("SELECT id FROM categories", vec![]).await.unwrap();
    assert!(rows.is_empty());
}

#[tokio::test]
async fn test_seed_is_idempotent() {
    let gw = setup_gateway().await;

    seed_demo_data(gw.conn()).await.unwrap();
    seed_demo_data(gw.conn()).await.unwrap();

    assert_eq!(book::Entity::find().count(gw.conn()).await.unwrap(), 1);
    assert_eq!(copy::Entity::find().count(gw.conn()).await.unwrap(), 2);
    assert_eq!(librarian::Entity::find().count(gw.conn()).await.unwrap(), 1);

    let rows = gw.fetch_all("SELECT id FROM categories", vec![]).await.unwrap();
    assert_eq!(rows.len(), 3);
}

#[tokio::test]
async fn test_file_store_survives_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let url = sqlite_url(dir.path().join("library").to_str().unwrap());

    let gw = Gateway::open(&url).await.expect("open file store");
    seed_demo_data(gw.conn()).await.unwrap();
    gw.close().await.unwrap();

    // Reopening runs the schema again without touching existing rows
    let gw = Gateway::open(&url).await.expect("reopen file store");
    let books = book::Entity::find().all(gw.conn()).await.unwrap();
    assert_eq!(books.len(), 1);
    assert_eq!(books[0].isbn, "9780132350884");
    gw.close().await.unwrap();
}

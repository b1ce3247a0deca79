#![allow(dead_code)]

use bibliodesk::infrastructure::Gateway;
use bibliodesk::services::{
    NewBook, NewLibrarian, NewMember, catalog_service, librarian_service, member_service,
};

pub struct Library {
    pub category_id: i32,
    pub book_id: i32,
    pub copy_id: i32,
    pub member_id: i32,
    pub librarian_id: i32,
}

// Helper to create a fresh in-memory store
pub async fn setup_gateway() -> Gateway {
    Gateway::open("sqlite::memory:")
        .await
        .expect("Failed to open in-memory database")
}

pub async fn create_book(gw: &Gateway, category_id: i32, title: &str, isbn: &str) -> i32 {
    catalog_service::add_book(
        gw,
        NewBook {
            title: title.to_string(),
            isbn: isbn.to_string(),
            publish_year: 2008,
            category_id,
            author: Some("Robert Martin".to_string()),
        },
    )
    .await
    .expect("Failed to create book")
    .id
}

pub async fn create_copy(gw: &Gateway, book_id: i32) -> i32 {
    catalog_service::add_copy(gw, book_id, Some("Good"))
        .await
        .expect("Failed to create copy")
        .id
}

pub async fn create_member(gw: &Gateway, name: &str, email: &str) -> i32 {
    member_service::register_member(
        gw,
        NewMember {
            name: name.to_string(),
            email: email.to_string(),
            phone: "9876543210".to_string(),
            address: "12 MG Road".to_string(),
        },
    )
    .await
    .expect("Failed to create member")
    .id
}

pub async fn create_librarian(gw: &Gateway, email: &str) -> i32 {
    librarian_service::register_librarian(
        gw,
        NewLibrarian {
            name: "Meera Iyer".to_string(),
            email: email.to_string(),
            hire_date: "2020-01-06".to_string(),
        },
    )
    .await
    .expect("Failed to create librarian")
    .id
}

// One of everything: a category, a book with one copy, a member and a librarian
pub async fn setup_library(gw: &Gateway) -> Library {
    let category_id = catalog_service::add_category(gw, "Programming")
        .await
        .expect("Failed to create category")
        .id;
    let book_id = create_book(gw, category_id, "Clean Code", "9780132350884").await;
    let copy_id = create_copy(gw, book_id).await;
    let member_id = create_member(gw, "Asha Rao", "asha@example.com").await;
    let librarian_id = create_librarian(gw, "meera@library.example").await;

    Library {
        category_id,
        book_id,
        copy_id,
        member_id,
        librarian_id,
    }
}

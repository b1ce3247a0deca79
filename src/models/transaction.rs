use sea_orm::entity::prelude::*;
use sea_orm::FromQueryResult;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "transactions")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub member_id: i32,
    pub copy_id: i32,
    /// Librarian who lent the copy
    pub librarian_id: i32,
    pub borrow_date: String,
    pub due_date: String,
    /// NULL while the copy is out
    pub return_date: Option<String>,
    pub returned_by: Option<i32>,
}

impl Model {
    pub fn is_open(&self) -> bool {
        self.return_date.is_none()
    }
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::member::Entity",
        from = "Column::MemberId",
        to = "super::member::Column::Id"
    )]
    Member,
    #[sea_orm(
        belongs_to = "super::copy::Entity",
        from = "Column::CopyId",
        to = "super::copy::Column::Id"
    )]
    Copy,
    #[sea_orm(
        belongs_to = "super::librarian::Entity",
        from = "Column::LibrarianId",
        to = "super::librarian::Column::Id"
    )]
    Librarian,
}

impl Related<super::member::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Member.def()
    }
}

impl Related<super::copy::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Copy.def()
    }
}

impl Related<super::librarian::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Librarian.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

/// Transaction joined with the book title and member name.
#[derive(Debug, Clone, PartialEq, FromQueryResult, Serialize)]
pub struct TransactionDetails {
    pub id: i32,
    pub member_id: i32,
    pub member_name: String,
    pub copy_id: i32,
    pub book_title: String,
    pub borrow_date: String,
    pub due_date: String,
    pub return_date: Option<String>,
}

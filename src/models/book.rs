use sea_orm::entity::prelude::*;
use sea_orm::FromQueryResult;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "books")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub title: String,
    /// Digits only, unique across the catalog
    #[sea_orm(unique)]
    pub isbn: String,
    pub publish_year: i32,
    pub category_id: i32,
    pub author: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::category::Entity",
        from = "Column::CategoryId",
        to = "super::category::Column::Id"
    )]
    Category,
    #[sea_orm(has_many = "super::copy::Entity")]
    Copies,
}

impl Related<super::category::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Category.def()
    }
}

impl Related<super::copy::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Copies.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

/// Catalog row with copy counts, as shown in book listings.
#[derive(Debug, Clone, PartialEq, FromQueryResult, Serialize)]
pub struct BookSummary {
    pub id: i32,
    pub title: String,
    pub isbn: String,
    pub publish_year: i32,
    pub category: Option<String>,
    pub author: Option<String>,
    pub total_copies: i64,
    pub available_copies: i64,
}

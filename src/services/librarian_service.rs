//! Librarian Service - staff who lend and receive books
#![allow(clippy::needless_update)] // SeaORM ActiveModels require ..Default::default()

use chrono::{Local, NaiveDate};
use sea_orm::{ActiveModelTrait, EntityTrait, QueryOrder, Set};

use crate::domain::validation::{self, DATE_FORMAT};
use crate::domain::DomainError;
use crate::infrastructure::Gateway;
use crate::models::librarian::{self, Entity as Librarian};

#[derive(Debug, Clone)]
pub struct NewLibrarian {
    pub name: String,
    pub email: String,
    /// `YYYY-MM-DD`, not after today
    pub hire_date: String,
}

pub async fn register_librarian(
    gw: &Gateway,
    input: NewLibrarian,
) -> Result<librarian::Model, DomainError> {
    register_librarian_on(gw, input, Local::now().date_naive()).await
}

pub async fn register_librarian_on(
    gw: &Gateway,
    input: NewLibrarian,
    today: NaiveDate,
) -> Result<librarian::Model, DomainError> {
    let name = validation::person_name(&input.name)?;
    let email = validation::email(&input.email)?;
    let hired = validation::hire_date(&input.hire_date, today)?;

    let model = librarian::ActiveModel {
        name: Set(name),
        email: Set(email),
        hire_date: Set(hired.format(DATE_FORMAT).to_string()),
        ..Default::default()
    }
    .insert(gw.conn())
    .await?;

    tracing::info!("Librarian {} registered: {}", model.id, model.name);
    Ok(model)
}

pub async fn list_librarians(gw: &Gateway) -> Result<Vec<librarian::Model>, DomainError> {
    let librarians = Librarian::find()
        .order_by_asc(librarian::Column::Id)
        .all(gw.conn())
        .await?;
    Ok(librarians)
}

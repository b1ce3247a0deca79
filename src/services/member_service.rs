//! Member Service - registration and lookup of library members
#![allow(clippy::needless_update)] // SeaORM ActiveModels require ..Default::default()

use chrono::{Local, NaiveDate};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, EntityTrait, QueryFilter, QueryOrder, Set,
};

use super::like_pattern;
use crate::domain::circulation::membership_expiry;
use crate::domain::validation::{self, DATE_FORMAT};
use crate::domain::DomainError;
use crate::infrastructure::Gateway;
use crate::models::member::{self, Entity as Member};

#[derive(Debug, Clone)]
pub struct NewMember {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub address: String,
}

/// Register a member joining today; the membership runs for a year.
pub async fn register_member(gw: &Gateway, input: NewMember) -> Result<member::Model, DomainError> {
    register_member_on(gw, input, Local::now().date_naive()).await
}

pub async fn register_member_on(
    gw: &Gateway,
    input: NewMember,
    joined: NaiveDate,
) -> Result<member::Model, DomainError> {
    let name = validation::person_name(&input.name)?;
    let email = validation::email(&input.email)?;
    let phone = validation::phone(&input.phone)?;
    let address = validation::address(&input.address)?;

    let model = member::ActiveModel {
        name: Set(name),
        email: Set(email),
        phone: Set(phone),
        address: Set(address),
        join_date: Set(joined.format(DATE_FORMAT).to_string()),
        expire_date: Set(membership_expiry(joined).format(DATE_FORMAT).to_string()),
        ..Default::default()
    }
    .insert(gw.conn())
    .await?;

    tracing::info!(
        "Member {} registered: {} (expires {})",
        model.id,
        model.name,
        model.expire_date
    );
    Ok(model)
}

pub async fn get_member(gw: &Gateway, id: i32) -> Result<member::Model, DomainError> {
    Member::find_by_id(id)
        .one(gw.conn())
        .await?
        .ok_or(DomainError::not_found("Member", id))
}

pub async fn list_members(gw: &Gateway) -> Result<Vec<member::Model>, DomainError> {
    let members = Member::find()
        .order_by_asc(member::Column::Id)
        .all(gw.conn())
        .await?;
    Ok(members)
}

/// Members whose name or email contains `query`.
pub async fn search_members(gw: &Gateway, query: &str) -> Result<Vec<member::Model>, DomainError> {
    let pattern = like_pattern(query);
    let members = Member::find()
        .filter(
            Condition::any()
                .add(member::Column::Name.like(pattern.as_str()))
                .add(member::Column::Email.like(pattern.as_str())),
        )
        .order_by_asc(member::Column::Name)
        .all(gw.conn())
        .await?;
    Ok(members)
}

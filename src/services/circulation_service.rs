//! Circulation Service - borrowing and returning copies
//!
//! A borrow or return touches two rows: the transaction and the copy's
//! availability flag. Both writes go through one store transaction so the flag
//! never disagrees with the open/closed state of the copy's latest loan.
#![allow(clippy::needless_update)] // SeaORM ActiveModels require ..Default::default()

use chrono::NaiveDateTime;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveEnum, ActiveModelTrait, ColumnTrait, DatabaseTransaction, EntityTrait, QueryFilter, Set,
};

use super::decode_rows;
use crate::domain::circulation::{self, format_timestamp, parse_timestamp};
use crate::domain::{CirculationPolicy, DomainError, PolicyViolation, validation};
use crate::infrastructure::Gateway;
use crate::models::copy::{self, Availability, Entity as BookCopy};
use crate::models::librarian::Entity as Librarian;
use crate::models::member::Entity as Member;
use crate::models::transaction::{self, Entity as Transaction, TransactionDetails};

const TRANSACTION_DETAILS_SQL: &str = r#"
    SELECT t.id, t.member_id, m.name AS member_name, t.copy_id, b.title AS book_title,
           t.borrow_date, t.due_date, t.return_date
    FROM transactions t
    JOIN membership m ON t.member_id = m.id
    JOIN book_copies bc ON t.copy_id = bc.id
    JOIN books b ON bc.book_id = b.id
"#;

/// True iff the copy exists and is on the shelf.
pub async fn is_available(gw: &Gateway, copy_id: i32) -> Result<bool, DomainError> {
    let row = gw
        .fetch_one(
            "SELECT available FROM book_copies WHERE id = ?",
            vec![copy_id.into()],
        )
        .await?;

    match row {
        Some(row) => {
            let flag: String = row.try_get("", "available")?;
            Ok(flag == Availability::Available.to_value())
        }
        None => Ok(false),
    }
}

pub async fn open_loan_count(gw: &Gateway, member_id: i32) -> Result<u64, DomainError> {
    let row = gw
        .fetch_one(
            "SELECT COUNT(*) AS open_loans FROM transactions \
             WHERE member_id = ? AND return_date IS NULL",
            vec![member_id.into()],
        )
        .await?;

    let count: i64 = match row {
        Some(row) => row.try_get("", "open_loans")?,
        None => 0,
    };
    Ok(count.max(0) as u64)
}

/// True iff the member holds fewer open loans than the policy allows.
pub async fn can_borrow(
    gw: &Gateway,
    policy: &CirculationPolicy,
    member_id: i32,
) -> Result<bool, DomainError> {
    Ok(policy.allows(open_loan_count(gw, member_id).await?))
}

pub async fn borrow(
    gw: &Gateway,
    policy: &CirculationPolicy,
    member_id: i32,
    copy_id: i32,
    librarian_id: i32,
) -> Result<transaction::Model, DomainError> {
    borrow_at(gw, policy, member_id, copy_id, librarian_id, circulation::now()).await
}

/// Lend a copy at `now`. The due date is `now` plus the policy's loan period.
///
/// Refuses an unavailable copy before looking at the member's count, and a
/// member already at the limit. Nothing is written on refusal.
pub async fn borrow_at(
    gw: &Gateway,
    policy: &CirculationPolicy,
    member_id: i32,
    copy_id: i32,
    librarian_id: i32,
    now: NaiveDateTime,
) -> Result<transaction::Model, DomainError> {
    BookCopy::find_by_id(copy_id)
        .one(gw.conn())
        .await?
        .ok_or(DomainError::not_found("Book copy", copy_id))?;

    if !is_available(gw, copy_id).await? {
        tracing::warn!("Borrow refused: copy {} is out", copy_id);
        return Err(PolicyViolation::CopyUnavailable { copy_id }.into());
    }

    Member::find_by_id(member_id)
        .one(gw.conn())
        .await?
        .ok_or(DomainError::not_found("Member", member_id))?;

    if !can_borrow(gw, policy, member_id).await? {
        tracing::warn!("Borrow refused: member {} is at the limit", member_id);
        return Err(PolicyViolation::LimitReached {
            member_id,
            limit: policy.max_open_loans,
        }
        .into());
    }

    Librarian::find_by_id(librarian_id)
        .one(gw.conn())
        .await?
        .ok_or(DomainError::not_found("Librarian", librarian_id))?;

    let (borrowed, due) = validation::loan_dates(now, policy.due_date(now))?;

    let txn = gw.begin().await?;
    match record_borrow(&txn, member_id, copy_id, librarian_id, borrowed, due).await {
        Ok(loan) => {
            txn.commit().await?;
            tracing::info!(
                "Transaction {}: copy {} lent to member {} until {}",
                loan.id,
                copy_id,
                member_id,
                loan.due_date
            );
            Ok(loan)
        }
        Err(e) => {
            tracing::error!("Error borrowing book: {}", e);
            txn.rollback().await?;
            Err(e)
        }
    }
}

async fn record_borrow(
    txn: &DatabaseTransaction,
    member_id: i32,
    copy_id: i32,
    librarian_id: i32,
    borrowed: NaiveDateTime,
    due: NaiveDateTime,
) -> Result<transaction::Model, DomainError> {
    let loan = transaction::ActiveModel {
        member_id: Set(member_id),
        copy_id: Set(copy_id),
        librarian_id: Set(librarian_id),
        borrow_date: Set(format_timestamp(borrowed)),
        due_date: Set(format_timestamp(due)),
        return_date: Set(None),
        returned_by: Set(None),
        ..Default::default()
    }
    .insert(txn)
    .await?;

    set_availability(txn, copy_id, Availability::Unavailable).await?;
    Ok(loan)
}

pub async fn return_book(
    gw: &Gateway,
    transaction_id: i32,
    librarian_id: i32,
) -> Result<transaction::Model, DomainError> {
    return_book_at(gw, transaction_id, librarian_id, circulation::now()).await
}

/// Close an open transaction at `now` and put the copy back on the shelf.
///
/// `now` may not be earlier than the transaction's borrow date.
pub async fn return_book_at(
    gw: &Gateway,
    transaction_id: i32,
    librarian_id: i32,
    now: NaiveDateTime,
) -> Result<transaction::Model, DomainError> {
    let loan = Transaction::find_by_id(transaction_id)
        .one(gw.conn())
        .await?
        .ok_or(DomainError::not_found("Transaction", transaction_id))?;

    if !loan.is_open() {
        return Err(PolicyViolation::AlreadyReturned { transaction_id }.into());
    }

    let borrowed = parse_timestamp(&loan.borrow_date).ok_or_else(|| {
        DomainError::Database(format!(
            "Transaction {} has malformed borrow date '{}'",
            transaction_id, loan.borrow_date
        ))
    })?;
    let returned = validation::return_time(borrowed, now)?;

    Librarian::find_by_id(librarian_id)
        .one(gw.conn())
        .await?
        .ok_or(DomainError::not_found("Librarian", librarian_id))?;

    let txn = gw.begin().await?;
    match record_return(&txn, loan, librarian_id, returned).await {
        Ok(loan) => {
            txn.commit().await?;
            tracing::info!(
                "Transaction {} closed: copy {} returned",
                loan.id,
                loan.copy_id
            );
            Ok(loan)
        }
        Err(e) => {
            tracing::error!("Error returning book: {}", e);
            txn.rollback().await?;
            Err(e)
        }
    }
}

async fn record_return(
    txn: &DatabaseTransaction,
    loan: transaction::Model,
    librarian_id: i32,
    now: NaiveDateTime,
) -> Result<transaction::Model, DomainError> {
    let copy_id = loan.copy_id;

    let mut active: transaction::ActiveModel = loan.into();
    active.return_date = Set(Some(format_timestamp(now)));
    active.returned_by = Set(Some(librarian_id));
    let closed = active.update(txn).await?;

    set_availability(txn, copy_id, Availability::Available).await?;
    Ok(closed)
}

/// Flip the flag only if it currently holds the opposite value. A flag that
/// already disagrees with the transaction being recorded fails the whole change.
async fn set_availability(
    txn: &DatabaseTransaction,
    copy_id: i32,
    to: Availability,
) -> Result<(), DomainError> {
    let from = match to {
        Availability::Available => Availability::Unavailable,
        Availability::Unavailable => Availability::Available,
    };

    let result = BookCopy::update_many()
        .col_expr(copy::Column::Available, Expr::value(to.to_value()))
        .filter(copy::Column::Id.eq(copy_id))
        .filter(copy::Column::Available.eq(from.to_value()))
        .exec(txn)
        .await?;

    if result.rows_affected != 1 {
        return Err(DomainError::AvailabilityOutOfSync { copy_id });
    }
    Ok(())
}

/// Open transactions, oldest due date first.
pub async fn active_transactions(gw: &Gateway) -> Result<Vec<TransactionDetails>, DomainError> {
    let sql = format!("{TRANSACTION_DETAILS_SQL} WHERE t.return_date IS NULL ORDER BY t.due_date");
    let rows = gw.fetch_all(&sql, vec![]).await?;
    Ok(decode_rows(rows)?)
}

/// Every transaction, newest first, optionally for one member.
pub async fn transaction_history(
    gw: &Gateway,
    member_id: Option<i32>,
) -> Result<Vec<TransactionDetails>, DomainError> {
    let rows = match member_id {
        Some(member_id) => {
            let sql = format!(
                "{TRANSACTION_DETAILS_SQL} WHERE t.member_id = ? ORDER BY t.borrow_date DESC, t.id DESC"
            );
            gw.fetch_all(&sql, vec![member_id.into()]).await?
        }
        None => {
            let sql = format!("{TRANSACTION_DETAILS_SQL} ORDER BY t.borrow_date DESC, t.id DESC");
            gw.fetch_all(&sql, vec![]).await?
        }
    };
    Ok(decode_rows(rows)?)
}

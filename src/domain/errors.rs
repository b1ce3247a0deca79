//! Domain error types
//!
//! These errors are framework-agnostic and represent business-level failures.
//! Store errors are classified on the way in so a caller can tell bad input,
//! a refused loan and a broken store apart.

use sea_orm::{DbErr, SqlErr};
use thiserror::Error;

/// A raw field failed its constraint. Always recoverable.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Title cannot be empty")]
    EmptyTitle,
    #[error("Category name cannot be empty")]
    EmptyCategoryName,
    #[error("Invalid ISBN format: must be at least 10 digits")]
    InvalidIsbn,
    #[error("Invalid publish year. Must be between {min} and {max}")]
    PublishYearOutOfRange { min: i32, max: i32 },
    #[error("Name cannot be empty")]
    EmptyName,
    #[error("Name should contain only letters and spaces")]
    InvalidNameCharacters,
    #[error("Invalid email format")]
    InvalidEmail,
    #[error("Phone number cannot be empty")]
    EmptyPhone,
    #[error("Phone number must be 10 digits")]
    InvalidPhoneLength,
    #[error("Phone number must start with 6, 7, 8, or 9")]
    InvalidPhonePrefix,
    #[error("Address cannot be empty")]
    EmptyAddress,
    #[error("Invalid date '{0}': expected YYYY-MM-DD")]
    InvalidDate(String),
    #[error("Hire date cannot be in the future")]
    HireDateInFuture,
    #[error("Due date must be after borrow date")]
    DueDateNotAfterBorrow,
    #[error("Maximum borrow duration is {max_days} days")]
    LoanTooLong { max_days: i64 },
    #[error("Return date cannot be before borrow date")]
    ReturnBeforeBorrow,
}

/// A circulation rule refused the request.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PolicyViolation {
    #[error("Book copy {copy_id} is not available for borrowing")]
    CopyUnavailable { copy_id: i32 },
    #[error("Member {member_id} has reached the maximum of {limit} borrowed books")]
    LimitReached { member_id: i32, limit: u64 },
    #[error("Transaction {transaction_id} has already been returned")]
    AlreadyReturned { transaction_id: i32 },
}

#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
    #[error("{entity} {id} not found")]
    NotFound { entity: &'static str, id: i32 },
    #[error("{0}")]
    Policy(#[from] PolicyViolation),
    /// Unique constraint violation (ISBN, email)
    #[error("Duplicate record: {0}")]
    Duplicate(String),
    /// Foreign key constraint violation
    #[error("Missing reference: {0}")]
    MissingReference(String),
    #[error("Database error: {0}")]
    Database(String),
    /// The copy's flag disagrees with its transactions
    #[error("Book copy {copy_id} availability does not match its transactions")]
    AvailabilityOutOfSync { copy_id: i32 },
}

impl DomainError {
    pub fn not_found(entity: &'static str, id: i32) -> Self {
        DomainError::NotFound { entity, id }
    }

    /// True when the store itself rejected or failed the operation.
    pub fn is_store_failure(&self) -> bool {
        matches!(
            self,
            DomainError::Duplicate(_)
                | DomainError::MissingReference(_)
                | DomainError::Database(_)
                | DomainError::AvailabilityOutOfSync { .. }
        )
    }
}

impl From<DbErr> for DomainError {
    fn from(e: DbErr) -> Self {
        match e.sql_err() {
            Some(SqlErr::UniqueConstraintViolation(msg)) => DomainError::Duplicate(msg),
            Some(SqlErr::ForeignKeyConstraintViolation(msg)) => DomainError::MissingReference(msg),
            _ => DomainError::Database(e.to_string()),
        }
    }
}

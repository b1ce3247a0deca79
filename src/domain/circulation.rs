//! Borrowing policy and the date arithmetic around it.

use chrono::{Duration, Local, NaiveDate, NaiveDateTime, SubsecRound};

use crate::infrastructure::config::{
    DEFAULT_BORROW_DURATION_DAYS, MAX_BOOKS_PER_MEMBER, MEMBERSHIP_DAYS,
};

/// Stored representation of an instant (whole seconds, local time).
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CirculationPolicy {
    /// Open transactions a member may hold at once
    pub max_open_loans: u64,
    pub loan_period_days: i64,
}

impl Default for CirculationPolicy {
    fn default() -> Self {
        Self {
            max_open_loans: MAX_BOOKS_PER_MEMBER,
            loan_period_days: DEFAULT_BORROW_DURATION_DAYS,
        }
    }
}

impl CirculationPolicy {
    pub fn due_date(&self, borrowed_at: NaiveDateTime) -> NaiveDateTime {
        borrowed_at + Duration::days(self.loan_period_days)
    }

    pub fn allows(&self, open_loans: u64) -> bool {
        open_loans < self.max_open_loans
    }
}

pub fn membership_expiry(joined: NaiveDate) -> NaiveDate {
    joined + Duration::days(MEMBERSHIP_DAYS)
}

/// Local wall-clock time truncated to the stored precision.
pub fn now() -> NaiveDateTime {
    Local::now().naive_local().trunc_subsecs(0)
}

pub fn format_timestamp(at: NaiveDateTime) -> String {
    at.format(TIMESTAMP_FORMAT).to_string()
}

pub fn parse_timestamp(raw: &str) -> Option<NaiveDateTime> {
    NaiveDateTime::parse_from_str(raw, TIMESTAMP_FORMAT).ok()
}

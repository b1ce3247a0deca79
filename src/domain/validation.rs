//! Field validators
//!
//! Each validator takes one raw field and returns the normalized value, or the
//! reason it was rejected. Rules that depend on the calendar take "today" (or
//! the current year) as an argument; `publish_year_today` reads the local clock.

use chrono::{Datelike, Duration, Local, NaiveDate, NaiveDateTime};
use once_cell::sync::Lazy;
use regex::Regex;

use super::ValidationError;
use crate::infrastructure::config::MAX_LOAN_DAYS;

pub const EARLIEST_PUBLISH_YEAR: i32 = 1800;
pub const MIN_ISBN_DIGITS: usize = 10;
pub const PHONE_DIGITS: usize = 10;
pub const DATE_FORMAT: &str = "%Y-%m-%d";

static EMAIL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$").expect("valid email regex")
});

fn non_blank(raw: &str, err: ValidationError) -> Result<String, ValidationError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(err);
    }
    Ok(trimmed.to_string())
}

pub fn title(raw: &str) -> Result<String, ValidationError> {
    non_blank(raw, ValidationError::EmptyTitle)
}

pub fn category_name(raw: &str) -> Result<String, ValidationError> {
    non_blank(raw, ValidationError::EmptyCategoryName)
}

pub fn isbn(raw: &str) -> Result<String, ValidationError> {
    let isbn = raw.trim();
    if isbn.len() < MIN_ISBN_DIGITS || !isbn.chars().all(|c| c.is_ascii_digit()) {
        return Err(ValidationError::InvalidIsbn);
    }
    Ok(isbn.to_string())
}

pub fn publish_year(year: i32, current_year: i32) -> Result<i32, ValidationError> {
    if !(EARLIEST_PUBLISH_YEAR..=current_year).contains(&year) {
        return Err(ValidationError::PublishYearOutOfRange {
            min: EARLIEST_PUBLISH_YEAR,
            max: current_year,
        });
    }
    Ok(year)
}

pub fn publish_year_today(year: i32) -> Result<i32, ValidationError> {
    publish_year(year, Local::now().year())
}

/// Member and librarian names: letters and spaces only.
pub fn person_name(raw: &str) -> Result<String, ValidationError> {
    let name = non_blank(raw, ValidationError::EmptyName)?;
    if !name.chars().all(|c| c.is_alphabetic() || c == ' ') {
        return Err(ValidationError::InvalidNameCharacters);
    }
    Ok(name)
}

pub fn email(raw: &str) -> Result<String, ValidationError> {
    let email = raw.trim();
    if !EMAIL_RE.is_match(email) {
        return Err(ValidationError::InvalidEmail);
    }
    Ok(email.to_lowercase())
}

pub fn phone(raw: &str) -> Result<String, ValidationError> {
    let phone = non_blank(raw, ValidationError::EmptyPhone)?;
    if phone.len() != PHONE_DIGITS || !phone.chars().all(|c| c.is_ascii_digit()) {
        return Err(ValidationError::InvalidPhoneLength);
    }
    if !phone.starts_with(['6', '7', '8', '9']) {
        return Err(ValidationError::InvalidPhonePrefix);
    }
    Ok(phone)
}

pub fn address(raw: &str) -> Result<String, ValidationError> {
    non_blank(raw, ValidationError::EmptyAddress)
}

pub fn date(raw: &str) -> Result<NaiveDate, ValidationError> {
    let raw = raw.trim();
    NaiveDate::parse_from_str(raw, DATE_FORMAT)
        .map_err(|_| ValidationError::InvalidDate(raw.to_string()))
}

pub fn hire_date(raw: &str, today: NaiveDate) -> Result<NaiveDate, ValidationError> {
    let hired = date(raw)?;
    if hired > today {
        return Err(ValidationError::HireDateInFuture);
    }
    Ok(hired)
}

/// Due date must fall in `(borrowed, borrowed + MAX_LOAN_DAYS]`.
pub fn loan_dates(
    borrowed: NaiveDateTime,
    due: NaiveDateTime,
) -> Result<(NaiveDateTime, NaiveDateTime), ValidationError> {
    if due <= borrowed {
        return Err(ValidationError::DueDateNotAfterBorrow);
    }
    if due > borrowed + Duration::days(MAX_LOAN_DAYS) {
        return Err(ValidationError::LoanTooLong {
            max_days: MAX_LOAN_DAYS,
        });
    }
    Ok((borrowed, due))
}

pub fn return_time(
    borrowed: NaiveDateTime,
    returned: NaiveDateTime,
) -> Result<NaiveDateTime, ValidationError> {
    if returned < borrowed {
        return Err(ValidationError::ReturnBeforeBorrow);
    }
    Ok(returned)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(date: &str, time: &str) -> NaiveDateTime {
        NaiveDateTime::parse_from_str(&format!("{date} {time}"), "%Y-%m-%d %H:%M:%S").unwrap()
    }

    #[test]
    fn test_title_is_trimmed() {
        assert_eq!(title("  Clean Code  ").unwrap(), "Clean Code");
        assert_eq!(title("   "), Err(ValidationError::EmptyTitle));
        assert_eq!(title(""), Err(ValidationError::EmptyTitle));
    }

    #[test]
    fn test_isbn_rejects_short_or_non_numeric() {
        assert_eq!(isbn("9780132350884").unwrap(), "9780132350884");
        assert_eq!(isbn("0132350882").unwrap(), "0132350882");

        for bad in ["", "123456789", "978-0132350884", "97801323508X4", "abcdefghijk", "12345 67890"] {
            assert_eq!(isbn(bad), Err(ValidationError::InvalidIsbn), "accepted {bad:?}");
        }
    }

    #[test]
    fn test_publish_year_bounds_are_inclusive() {
        assert_eq!(publish_year(1800, 2026), Ok(1800));
        assert_eq!(publish_year(2026, 2026), Ok(2026));
        assert!(publish_year(1799, 2026).is_err());
        assert!(publish_year(2027, 2026).is_err());
        assert!(publish_year(-5, 2026).is_err());

        let this_year = Local::now().year();
        assert!(publish_year_today(this_year).is_ok());
        assert!(publish_year_today(this_year + 1).is_err());
    }

    #[test]
    fn test_person_name() {
        assert_eq!(person_name("  Asha Rao ").unwrap(), "Asha Rao");
        assert_eq!(person_name(""), Err(ValidationError::EmptyName));
        assert_eq!(person_name("R2D2"), Err(ValidationError::InvalidNameCharacters));
        assert_eq!(person_name("O'Brien"), Err(ValidationError::InvalidNameCharacters));
    }

    #[test]
    fn test_email_is_lowercased() {
        assert_eq!(email("Asha@Example.COM").unwrap(), "asha@example.com");
        assert_eq!(email("first.last+tag@mail.co.in").unwrap(), "first.last+tag@mail.co.in");

        for bad in ["asha.example.com", "asha@example", "asha@example.c", "@example.com", "asha@.com x", ""] {
            assert_eq!(email(bad), Err(ValidationError::InvalidEmail), "accepted {bad:?}");
        }
    }

    #[test]
    fn test_phone() {
        assert_eq!(phone("9876543210").unwrap(), "9876543210");
        assert_eq!(phone("6000000000").unwrap(), "6000000000");

        assert_eq!(phone(""), Err(ValidationError::EmptyPhone));
        assert_eq!(phone("987654321"), Err(ValidationError::InvalidPhoneLength));
        assert_eq!(phone("98765432100"), Err(ValidationError::InvalidPhoneLength));
        assert_eq!(phone("98765x3210"), Err(ValidationError::InvalidPhoneLength));
        for prefix in ['0', '1', '2', '3', '4', '5'] {
            let number = format!("{prefix}876543210");
            assert_eq!(phone(&number), Err(ValidationError::InvalidPhonePrefix));
        }
    }

    #[test]
    fn test_address() {
        assert_eq!(address(" 12 MG Road ").unwrap(), "12 MG Road");
        assert_eq!(address("\t"), Err(ValidationError::EmptyAddress));
    }

    #[test]
    fn test_hire_date() {
        let today = NaiveDate::from_ymd_opt(2026, 10, 15).unwrap();
        assert_eq!(hire_date("2026-10-15", today), Ok(today));
        assert!(hire_date("2019-01-01", today).is_ok());
        assert_eq!(hire_date("2026-10-16", today), Err(ValidationError::HireDateInFuture));
        assert!(matches!(hire_date("15/10/2026", today), Err(ValidationError::InvalidDate(_))));
    }

    #[test]
    fn test_loan_dates() {
        let borrowed = at("2026-10-01", "10:00:00");
        assert!(loan_dates(borrowed, at("2026-10-15", "10:00:00")).is_ok());
        assert!(loan_dates(borrowed, at("2026-10-31", "10:00:00")).is_ok());

        assert_eq!(
            loan_dates(borrowed, borrowed),
            Err(ValidationError::DueDateNotAfterBorrow)
        );
        assert_eq!(
            loan_dates(borrowed, at("2026-09-30", "10:00:00")),
            Err(ValidationError::DueDateNotAfterBorrow)
        );
        assert_eq!(
            loan_dates(borrowed, at("2026-10-31", "10:00:01")),
            Err(ValidationError::LoanTooLong { max_days: 30 })
        );
    }

    #[test]
    fn test_return_time() {
        let borrowed = at("2026-10-15", "10:00:00");
        assert_eq!(return_time(borrowed, borrowed), Ok(borrowed));
        assert!(return_time(borrowed, at("2026-11-20", "09:00:00")).is_ok());
        assert_eq!(
            return_time(borrowed, at("2026-10-15", "09:59:59")),
            Err(ValidationError::ReturnBeforeBorrow)
        );
    }
}

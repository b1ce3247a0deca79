use std::env;

pub const APP_NAME: &str = "Library Management System";
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub const MAX_BOOKS_PER_MEMBER: u64 = 3;
pub const DEFAULT_BORROW_DURATION_DAYS: i64 = 14;
/// Longest loan the date validator accepts
pub const MAX_LOAN_DAYS: i64 = 30;
pub const MEMBERSHIP_DAYS: i64 = 365;

const DEFAULT_DB_NAME: &str = "library_management";

#[derive(Clone, Debug)]
pub struct Config {
    pub database_url: String,
}

impl Config {
    pub fn from_env() -> Self {
        let db_name = env::var("DB_NAME")
            .ok()
            .filter(|name| !name.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_DB_NAME.to_string());

        let database_url = env::var("DATABASE_URL")
            .ok()
            .filter(|url| !url.trim().is_empty())
            .unwrap_or_else(|| sqlite_url(&db_name));

        Self { database_url }
    }
}

/// File-backed SQLite URL, created on first open.
pub fn sqlite_url(db_name: &str) -> String {
    format!("sqlite://{}.db?mode=rwc", db_name)
}

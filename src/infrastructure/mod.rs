//! Infrastructure layer - Framework implementations
//!
//! This layer contains:
//! - Database connection and schema (db)
//! - The persistence gateway every service goes through (gateway)
//! - Configuration loading (config)
//! - Demo data (seed)

pub mod config;
pub mod db;
pub mod gateway;
pub mod seed;

pub use config::Config;
pub use gateway::Gateway;

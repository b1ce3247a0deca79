//! Domain layer - Pure business rules
//!
//! This layer contains NO database access. Only field validation, the
//! circulation policy, and the error types shared by every service.

pub mod circulation;
pub mod errors;
pub mod validation;

pub use circulation::CirculationPolicy;
pub use errors::{DomainError, PolicyViolation, ValidationError};

//! Read-only query services behind the HTTP handlers.

pub mod orders;
pub mod stats;
pub mod users;

use crate::errors::ServiceError;

pub use orders::OrderService;
pub use stats::StatsService;
pub use users::UserService;

/// Parses a path segment as a signed 64-bit id, without trimming.
pub fn parse_id(raw: &str, name: &str) -> Result<i64, ServiceError> {
    raw.parse::<i64>()
        .map_err(|_| ServiceError::InvalidArgument(format!("{name} must be numeric, got '{raw}'")))
}

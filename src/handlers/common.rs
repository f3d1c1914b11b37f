use crate::errors::ServiceError;
use axum::extract::{rejection::QueryRejection, Query};
use serde::{Deserialize, Serialize};
use utoipa::IntoParams;

/// `page` / `limit` for the user list. Both are optional; the configured
/// list mode decides how they are applied.
#[derive(Debug, Default, Deserialize, Serialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct PaginationParams {
    /// Page number, starting at 1 (0 is read as 1)
    pub page: Option<u64>,
    /// Rows per page, clamped to the configured maximum
    pub limit: Option<u64>,
}

/// Turns a query-string rejection into a 400.
pub fn query_params<T>(query: Result<Query<T>, QueryRejection>) -> Result<T, ServiceError> {
    query
        .map(|Query(params)| params)
        .map_err(|rejection| ServiceError::InvalidArgument(rejection.body_text()))
}

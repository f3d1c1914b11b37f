use super::common::{query_params, PaginationParams};
use super::AppState;
use crate::errors::ServiceError;
use crate::services::{
    parse_id,
    users::{UserDetail, UserSummary},
};
use axum::{
    extract::{rejection::QueryRejection, Path, Query, State},
    Json,
};

#[utoipa::path(
    get,
    path = "/api/users",
    summary = "List users",
    description = "Users in ascending id order, optionally annotated with their order count",
    params(PaginationParams),
    responses(
        (status = 200, description = "Users retrieved successfully", body = [UserSummary],
            headers(("X-Request-Id" = String, description = "Unique request id"))
        ),
        (status = 400, description = "Invalid query parameters", body = crate::errors::ErrorResponse),
        (status = 500, description = "Internal server error", body = crate::errors::ErrorResponse),
    ),
    tag = "users"
)]
pub async fn list_users(
    State(state): State<AppState>,
    query: Result<Query<PaginationParams>, QueryRejection>,
) -> Result<Json<Vec<UserSummary>>, ServiceError> {
    let params = query_params(query)?;
    let users = state
        .services
        .users
        .list_users(params.page, params.limit)
        .await?;
    Ok(Json(users))
}

#[utoipa::path(
    get,
    path = "/api/users/{userId}",
    summary = "Get user",
    description = "A single user with the number of orders they have placed",
    params(("userId" = i64, Path, description = "User ID")),
    responses(
        (status = 200, description = "User retrieved successfully", body = UserDetail),
        (status = 400, description = "User ID is not numeric", body = crate::errors::ErrorResponse),
        (status = 404, description = "User not found", body = crate::errors::ErrorResponse),
        (status = 500, description = "Internal server error", body = crate::errors::ErrorResponse),
    ),
    tag = "users"
)]
pub async fn get_user(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<Json<UserDetail>, ServiceError> {
    let user_id = parse_id(&user_id, "userId")?;
    let user = state.services.users.get_user(user_id).await?;
    Ok(Json(user))
}

use super::AppState;
use crate::errors::ServiceError;
use crate::services::{
    orders::{OrderDetail, OrderSummary},
    parse_id,
};
use axum::{
    extract::{Path, State},
    Json,
};

#[utoipa::path(
    get,
    path = "/api/users/{userId}/orders",
    summary = "List a user's orders",
    description = "Orders placed by the user, most recent first. Unknown users yield an empty list.",
    params(("userId" = i64, Path, description = "User ID")),
    responses(
        (status = 200, description = "Orders retrieved successfully", body = [OrderSummary]),
        (status = 400, description = "User ID is not numeric", body = crate::errors::ErrorResponse),
        (status = 500, description = "Internal server error", body = crate::errors::ErrorResponse),
    ),
    tag = "orders"
)]
pub async fn list_user_orders(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<Json<Vec<OrderSummary>>, ServiceError> {
    let user_id = parse_id(&user_id, "userId")?;
    let orders = state.services.orders.list_orders_for_user(user_id).await?;
    Ok(Json(orders))
}

#[utoipa::path(
    get,
    path = "/api/orders/{orderId}",
    summary = "Get order",
    description = "An order with its line items and the products they refer to",
    params(("orderId" = i64, Path, description = "Order ID")),
    responses(
        (status = 200, description = "Order retrieved successfully", body = OrderDetail),
        (status = 400, description = "Order ID is not numeric", body = crate::errors::ErrorResponse),
        (status = 404, description = "Order not found", body = crate::errors::ErrorResponse),
        (status = 500, description = "Internal server error", body = crate::errors::ErrorResponse),
    ),
    tag = "orders"
)]
pub async fn get_order(
    State(state): State<AppState>,
    Path(order_id): Path<String>,
) -> Result<Json<OrderDetail>, ServiceError> {
    let order_id = parse_id(&order_id, "orderId")?;
    let order = state.services.orders.get_order(order_id).await?;
    Ok(Json(order))
}

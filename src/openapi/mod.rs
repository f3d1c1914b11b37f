use axum::Json;
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Storefront Admin API",
        version = "0.1.0",
        description = r#"
# Storefront Admin API

Read-only endpoints backing the e-commerce admin dashboard: users, their
orders, order line items and headline stats. Data is bulk loaded from CSV
exports with the `load-data` binary.

## Error Handling

Every non-2xx response carries the same body:

```json
{
  "error": "Not Found",
  "message": "Not found: User with ID 42 not found",
  "request_id": "b1946ac9-2b1c-4f0e-9c71-8a3c2d6f5e10",
  "timestamp": "2024-01-01T00:00:00+00:00"
}
```

## Pagination

`GET /api/users` accepts `page` (default 1) and `limit` (default 20,
max 100). When the server runs in capped mode `page` is ignored.
        "#,
        license(
            name = "MIT",
            url = "https://opensource.org/licenses/MIT"
        )
    ),
    servers(
        (url = "http://localhost:5000", description = "Local development")
    ),
    tags(
        (name = "users", description = "User list and detail"),
        (name = "orders", description = "Order history and order detail"),
        (name = "stats", description = "Dashboard totals"),
        (name = "health", description = "Liveness and database checks")
    ),
    paths(
        crate::handlers::health::root,
        crate::handlers::health::health_check,
        crate::handlers::users::list_users,
        crate::handlers::users::get_user,
        crate::handlers::orders::list_user_orders,
        crate::handlers::orders::get_order,
        crate::handlers::stats::get_stats,
    ),
    components(
        schemas(
            crate::services::users::UserSummary,
            crate::services::users::UserDetail,
            crate::services::orders::OrderSummary,
            crate::services::orders::OrderDetail,
            crate::services::orders::OrderItemDetail,
            crate::services::stats::DashboardStats,
            crate::handlers::health::WelcomeResponse,
            crate::handlers::health::HealthResponse,
            crate::handlers::health::ComponentStatus,
            crate::errors::ErrorResponse
        )
    )
)]
pub struct ApiDoc;

/// Serves the generated document at `/api-docs/openapi.json`
pub async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}

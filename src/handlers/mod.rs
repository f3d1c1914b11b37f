pub mod common;
pub mod health;
pub mod orders;
pub mod stats;
pub mod users;

use crate::config::AppConfig;
use crate::db::DbPool;
use crate::services::{users::UserListSettings, OrderService, StatsService, UserService};
use axum::{routing::get, Router};
use std::sync::Arc;

// Re-export AppState so handler modules can import it as crate::handlers::AppState
pub use crate::AppState;

/// Query services shared by the HTTP handlers
#[derive(Clone)]
pub struct AppServices {
    pub users: Arc<UserService>,
    pub orders: Arc<OrderService>,
    pub stats: Arc<StatsService>,
}

impl AppServices {
    pub fn new(db_pool: Arc<DbPool>, config: &AppConfig) -> Self {
        Self {
            users: Arc::new(UserService::new(
                db_pool.clone(),
                UserListSettings::from(config),
            )),
            orders: Arc::new(OrderService::new(db_pool.clone())),
            stats: Arc::new(StatsService::new(db_pool)),
        }
    }
}

/// Routes mounted under `/api`
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/users", get(users::list_users))
        .route("/users/:user_id", get(users::get_user))
        .route("/users/:user_id/orders", get(orders::list_user_orders))
        .route("/orders/:order_id", get(orders::get_order))
        .route("/stats", get(stats::get_stats))
}

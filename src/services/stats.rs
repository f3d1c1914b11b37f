use crate::db::DbPool;
use crate::entities::{order, order_item, user};
use crate::errors::ServiceError;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ColumnTrait, Condition, EntityTrait, FromQueryResult, PaginatorTrait, QueryFilter,
    QuerySelect,
};
use serde::Serialize;
use std::sync::Arc;
use tracing::instrument;
use utoipa::ToSchema;

/// Item statuses that do not count towards revenue
pub const NON_REVENUE_STATUSES: [&str; 2] = ["Cancelled", "Returned"];

/// Headline numbers for the dashboard
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    #[schema(example = 100000)]
    pub total_users: u64,
    #[schema(example = 125226)]
    pub total_orders: u64,
    /// Sum of item sale prices, cancelled and returned items excluded
    #[schema(example = 10825184.35)]
    pub total_revenue: f64,
}

#[derive(Debug, FromQueryResult)]
struct RevenueRow {
    total_revenue: Option<f64>,
}

fn round_cents(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[derive(Clone)]
pub struct StatsService {
    db: Arc<DbPool>,
}

impl StatsService {
    pub fn new(db: Arc<DbPool>) -> Self {
        Self { db }
    }

    #[instrument(skip(self))]
    pub async fn dashboard_stats(&self) -> Result<DashboardStats, ServiceError> {
        let db = &*self.db;
        let total_users = user::Entity::find().count(db).await?;
        let total_orders = order::Entity::find().count(db).await?;

        let revenue = order_item::Entity::find()
            .select_only()
            .column_as(Expr::col(order_item::Column::SalePrice).sum(), "total_revenue")
            .filter(
                Condition::any()
                    .add(order_item::Column::Status.is_null())
                    .add(order_item::Column::Status.is_not_in(NON_REVENUE_STATUSES)),
            )
            .into_model::<RevenueRow>()
            .one(db)
            .await?
            .and_then(|row| row.total_revenue)
            .unwrap_or(0.0);

        Ok(DashboardStats {
            total_users,
            total_orders,
            total_revenue: round_cents(revenue),
        })
    }
}

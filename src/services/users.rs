use crate::config::{AppConfig, UserListMode};
use crate::db::DbPool;
use crate::entities::{order, user};
use crate::errors::ServiceError;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ConnectionTrait, EntityTrait, FromQueryResult, QueryOrder, QuerySelect, Statement, Value,
};
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, instrument};
use utoipa::ToSchema;

/// Row shape of the user list
#[derive(Debug, Clone, PartialEq, Serialize, FromQueryResult, ToSchema)]
pub struct UserSummary {
    #[schema(example = 1)]
    pub id: i64,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub gender: Option<String>,
    pub country: Option<String>,
    pub city: Option<String>,
    /// Present when order counts are enabled
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order_count: Option<i64>,
}

impl From<user::Model> for UserSummary {
    fn from(model: user::Model) -> Self {
        Self {
            id: model.id,
            first_name: model.first_name,
            last_name: model.last_name,
            email: model.email,
            gender: model.gender,
            country: model.country,
            city: model.city,
            order_count: None,
        }
    }
}

/// Every stored user field plus the number of orders placed
#[derive(Debug, Clone, PartialEq, Serialize, FromQueryResult, ToSchema)]
pub struct UserDetail {
    pub id: i64,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub age: Option<i64>,
    pub gender: Option<String>,
    pub state: Option<String>,
    pub street_address: Option<String>,
    pub postal_code: Option<String>,
    pub city: Option<String>,
    pub country: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub traffic_source: Option<String>,
    pub created_at: Option<String>,
    pub order_count: i64,
}

const USER_DETAIL_SQL: &str = r#"
SELECT u.*,
       (SELECT COUNT(*) FROM orders o WHERE o.user_id = u.id) AS order_count
FROM users u
WHERE u.id = ?
"#;

/// How the user list is bounded
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UserListSettings {
    pub mode: UserListMode,
    pub cap: u64,
    pub default_page_size: u64,
    pub max_page_size: u64,
    pub include_order_counts: bool,
}

impl Default for UserListSettings {
    fn default() -> Self {
        Self {
            mode: UserListMode::Paginated,
            cap: 100,
            default_page_size: 20,
            max_page_size: 100,
            include_order_counts: true,
        }
    }
}

impl From<&AppConfig> for UserListSettings {
    fn from(cfg: &AppConfig) -> Self {
        Self {
            mode: cfg.users_list_mode,
            cap: cfg.users_list_cap,
            default_page_size: cfg.default_page_size,
            max_page_size: cfg.max_page_size,
            include_order_counts: cfg.include_order_counts,
        }
    }
}

/// SQLite binds LIMIT/OFFSET as signed 64-bit integers
const MAX_SQL_BOUND: u64 = i64::MAX as u64;

impl UserListSettings {
    /// Resolves request parameters to `(offset, limit)`.
    ///
    /// Page 0 is read as page 1. In capped mode the page is ignored and the
    /// limit may only shrink the cap. Both values stay within `i64`, so a
    /// page far past the end yields an empty list.
    pub fn window(&self, page: Option<u64>, limit: Option<u64>) -> (u64, u64) {
        let (offset, size) = match self.mode {
            UserListMode::Paginated => {
                let page = page.unwrap_or(1).max(1);
                let size = limit
                    .unwrap_or(self.default_page_size)
                    .clamp(1, self.max_page_size.max(1));
                ((page - 1).saturating_mul(size), size)
            }
            UserListMode::Capped => {
                let size = limit.unwrap_or(self.cap).clamp(1, self.cap.max(1));
                (0, size)
            }
        };
        (offset.min(MAX_SQL_BOUND), size.min(MAX_SQL_BOUND))
    }
}

#[derive(Clone)]
pub struct UserService {
    db: Arc<DbPool>,
    settings: UserListSettings,
}

impl UserService {
    pub fn new(db: Arc<DbPool>, settings: UserListSettings) -> Self {
        Self { db, settings }
    }

    /// Lists users in ascending id order
    #[instrument(skip(self))]
    pub async fn list_users(
        &self,
        page: Option<u64>,
        limit: Option<u64>,
    ) -> Result<Vec<UserSummary>, ServiceError> {
        let db = &*self.db;
        let (offset, limit) = self.settings.window(page, limit);
        debug!(offset, limit, "Listing users");

        if !self.settings.include_order_counts {
            let users = user::Entity::find()
                .order_by_asc(user::Column::Id)
                .offset(offset)
                .limit(limit)
                .all(db)
                .await?;
            return Ok(users.into_iter().map(UserSummary::from).collect());
        }

        let users = user::Entity::find()
            .select_only()
            .columns([
                user::Column::Id,
                user::Column::FirstName,
                user::Column::LastName,
                user::Column::Email,
                user::Column::Gender,
                user::Column::Country,
                user::Column::City,
            ])
            .column_as(
                Expr::col((order::Entity, order::Column::OrderId)).count(),
                "order_count",
            )
            .left_join(order::Entity)
            .group_by(user::Column::Id)
            .order_by_asc(user::Column::Id)
            .offset(offset)
            .limit(limit)
            .into_model::<UserSummary>()
            .all(db)
            .await?;

        Ok(users)
    }

    /// Gets one user with their order count
    #[instrument(skip(self))]
    pub async fn get_user(&self, user_id: i64) -> Result<UserDetail, ServiceError> {
        let db = &*self.db;
        let stmt = Statement::from_sql_and_values(
            db.get_database_backend(),
            USER_DETAIL_SQL,
            [Value::from(user_id)],
        );

        UserDetail::find_by_statement(stmt)
            .one(db)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("User with ID {user_id} not found")))
    }
}

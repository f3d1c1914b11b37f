use crate::db::DbPool;
use crate::entities::{order, order_item, product};
use crate::errors::ServiceError;
use sea_orm::{
    ColumnTrait, EntityTrait, FromQueryResult, QueryFilter, QueryOrder, QuerySelect,
};
use serde::Serialize;
use std::sync::Arc;
use tracing::instrument;
use utoipa::ToSchema;

/// One row of a user's order history
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct OrderSummary {
    pub order_id: i64,
    #[schema(example = "Shipped")]
    pub status: Option<String>,
    pub created_at: Option<String>,
    pub shipped_at: Option<String>,
    pub delivered_at: Option<String>,
    pub returned_at: Option<String>,
    pub num_of_item: Option<i64>,
}

impl From<order::Model> for OrderSummary {
    fn from(model: order::Model) -> Self {
        Self {
            order_id: model.order_id,
            status: model.status,
            created_at: model.created_at,
            shipped_at: model.shipped_at,
            delivered_at: model.delivered_at,
            returned_at: model.returned_at,
            num_of_item: model.num_of_item,
        }
    }
}

/// Line item with the product it refers to. Product fields are null when
/// the product row is missing.
#[derive(Debug, Clone, PartialEq, Serialize, FromQueryResult, ToSchema)]
pub struct OrderItemDetail {
    pub id: i64,
    pub product_id: Option<i64>,
    pub inventory_item_id: Option<i64>,
    pub status: Option<String>,
    pub created_at: Option<String>,
    pub shipped_at: Option<String>,
    pub delivered_at: Option<String>,
    pub returned_at: Option<String>,
    pub sale_price: Option<f64>,
    pub product_name: Option<String>,
    pub product_brand: Option<String>,
    pub product_category: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct OrderDetail {
    pub order_id: i64,
    pub user_id: Option<i64>,
    pub status: Option<String>,
    pub gender: Option<String>,
    pub created_at: Option<String>,
    pub returned_at: Option<String>,
    pub shipped_at: Option<String>,
    pub delivered_at: Option<String>,
    pub num_of_item: Option<i64>,
    pub items: Vec<OrderItemDetail>,
}

impl OrderDetail {
    fn new(order: order::Model, items: Vec<OrderItemDetail>) -> Self {
        Self {
            order_id: order.order_id,
            user_id: order.user_id,
            status: order.status,
            gender: order.gender,
            created_at: order.created_at,
            returned_at: order.returned_at,
            shipped_at: order.shipped_at,
            delivered_at: order.delivered_at,
            num_of_item: order.num_of_item,
            items,
        }
    }
}

#[derive(Clone)]
pub struct OrderService {
    db: Arc<DbPool>,
}

impl OrderService {
    pub fn new(db: Arc<DbPool>) -> Self {
        Self { db }
    }

    /// A user's orders, most recent first. Unknown users have no orders.
    #[instrument(skip(self))]
    pub async fn list_orders_for_user(
        &self,
        user_id: i64,
    ) -> Result<Vec<OrderSummary>, ServiceError> {
        let orders = order::Entity::find()
            .filter(order::Column::UserId.eq(user_id))
            .order_by_desc(order::Column::CreatedAt)
            .order_by_desc(order::Column::OrderId)
            .all(&*self.db)
            .await?;

        Ok(orders.into_iter().map(OrderSummary::from).collect())
    }

    /// One order with its line items in item id order
    #[instrument(skip(self))]
    pub async fn get_order(&self, order_id: i64) -> Result<OrderDetail, ServiceError> {
        let db = &*self.db;
        let order = order::Entity::find_by_id(order_id)
            .one(db)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("Order with ID {order_id} not found")))?;

        let items = order_item::Entity::find()
            .select_only()
            .columns([
                order_item::Column::Id,
                order_item::Column::ProductId,
                order_item::Column::InventoryItemId,
                order_item::Column::Status,
                order_item::Column::CreatedAt,
                order_item::Column::ShippedAt,
                order_item::Column::DeliveredAt,
                order_item::Column::ReturnedAt,
                order_item::Column::SalePrice,
            ])
            .column_as(product::Column::Name, "product_name")
            .column_as(product::Column::Brand, "product_brand")
            .column_as(product::Column::Category, "product_category")
            .left_join(product::Entity)
            .filter(order_item::Column::OrderId.eq(order_id))
            .order_by_asc(order_item::Column::Id)
            .into_model::<OrderItemDetail>()
            .all(db)
            .await?;

        Ok(OrderDetail::new(order, items))
    }
}

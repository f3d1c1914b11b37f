use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Product entity
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "products")]
pub struct Model {
    /// Primary key
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: i64,

    /// Unit cost to the retailer
    pub cost: Option<f64>,

    pub category: Option<String>,

    /// Product name
    pub name: Option<String>,

    /// Product brand
    pub brand: Option<String>,

    /// List price
    pub retail_price: Option<f64>,

    pub department: Option<String>,

    /// SKU (Stock Keeping Unit)
    pub sku: Option<String>,

    pub distribution_center_id: Option<i64>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::order_item::Entity")]
    OrderItems,
}

impl Related<super::order_item::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::OrderItems.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

//! Table layouts for the dashboard store.
//!
//! Identifiers come from the sea-orm entities so the DDL, the loader and the
//! query layer agree on names. Foreign keys are declared here but the loader
//! normally runs with enforcement off, see [`crate::loader::LoaderOptions`].

use crate::entities::{order, order_item, product, user};
use sea_orm::sea_query::{ColumnDef, ForeignKey, Table, TableCreateStatement, TableDropStatement};
use sea_orm::{ConnectionTrait, DbErr};
use tracing::debug;

/// One of the four CSV-backed tables, in load order
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum LoadTarget {
    Users,
    Orders,
    Products,
    OrderItems,
}

impl LoadTarget {
    /// Parents before children
    pub const ALL: [LoadTarget; 4] = [
        LoadTarget::Users,
        LoadTarget::Orders,
        LoadTarget::Products,
        LoadTarget::OrderItems,
    ];

    pub fn table_name(self) -> &'static str {
        match self {
            LoadTarget::Users => "users",
            LoadTarget::Orders => "orders",
            LoadTarget::Products => "products",
            LoadTarget::OrderItems => "order_items",
        }
    }

    pub fn file_name(self) -> &'static str {
        match self {
            LoadTarget::Users => "users.csv",
            LoadTarget::Orders => "orders.csv",
            LoadTarget::Products => "products.csv",
            LoadTarget::OrderItems => "order_items.csv",
        }
    }

    pub fn from_table_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.table_name() == name)
    }

    pub fn create_statement(self) -> TableCreateStatement {
        match self {
            LoadTarget::Users => users_table(),
            LoadTarget::Orders => orders_table(),
            LoadTarget::Products => products_table(),
            LoadTarget::OrderItems => order_items_table(),
        }
    }

    pub fn drop_statement(self) -> TableDropStatement {
        let mut stmt = Table::drop();
        match self {
            LoadTarget::Users => stmt.table(user::Entity),
            LoadTarget::Orders => stmt.table(order::Entity),
            LoadTarget::Products => stmt.table(product::Entity),
            LoadTarget::OrderItems => stmt.table(order_item::Entity),
        };
        stmt.if_exists().to_owned()
    }
}

fn users_table() -> TableCreateStatement {
    use user::Column as C;
    Table::create()
        .table(user::Entity)
        .col(ColumnDef::new(C::Id).integer().primary_key())
        .col(ColumnDef::new(C::FirstName).text())
        .col(ColumnDef::new(C::LastName).text())
        .col(ColumnDef::new(C::Email).text())
        .col(ColumnDef::new(C::Age).integer())
        .col(ColumnDef::new(C::Gender).text())
        .col(ColumnDef::new(C::State).text())
        .col(ColumnDef::new(C::StreetAddress).text())
        .col(ColumnDef::new(C::PostalCode).text())
        .col(ColumnDef::new(C::City).text())
        .col(ColumnDef::new(C::Country).text())
        .col(ColumnDef::new(C::Latitude).double())
        .col(ColumnDef::new(C::Longitude).double())
        .col(ColumnDef::new(C::TrafficSource).text())
        .col(ColumnDef::new(C::CreatedAt).text())
        .to_owned()
}

fn orders_table() -> TableCreateStatement {
    use order::Column as C;
    Table::create()
        .table(order::Entity)
        .col(ColumnDef::new(C::OrderId).integer().primary_key())
        .col(ColumnDef::new(C::UserId).integer())
        .col(ColumnDef::new(C::Status).text())
        .col(ColumnDef::new(C::Gender).text())
        .col(ColumnDef::new(C::CreatedAt).text())
        .col(ColumnDef::new(C::ReturnedAt).text())
        .col(ColumnDef::new(C::ShippedAt).text())
        .col(ColumnDef::new(C::DeliveredAt).text())
        .col(ColumnDef::new(C::NumOfItem).integer())
        .foreign_key(
            ForeignKey::create()
                .name("fk_orders_user_id")
                .from(order::Entity, C::UserId)
                .to(user::Entity, user::Column::Id),
        )
        .to_owned()
}

fn products_table() -> TableCreateStatement {
    use product::Column as C;
    Table::create()
        .table(product::Entity)
        .col(ColumnDef::new(C::Id).integer().primary_key())
        .col(ColumnDef::new(C::Cost).double())
        .col(ColumnDef::new(C::Category).text())
        .col(ColumnDef::new(C::Name).text())
        .col(ColumnDef::new(C::Brand).text())
        .col(ColumnDef::new(C::RetailPrice).double())
        .col(ColumnDef::new(C::Department).text())
        .col(ColumnDef::new(C::Sku).text())
        .col(ColumnDef::new(C::DistributionCenterId).integer())
        .to_owned()
}

fn order_items_table() -> TableCreateStatement {
    use order_item::Column as C;
    Table::create()
        .table(order_item::Entity)
        .col(ColumnDef::new(C::Id).integer().primary_key())
        .col(ColumnDef::new(C::OrderId).integer())
        .col(ColumnDef::new(C::UserId).integer())
        .col(ColumnDef::new(C::ProductId).integer())
        .col(ColumnDef::new(C::InventoryItemId).integer())
        .col(ColumnDef::new(C::Status).text())
        .col(ColumnDef::new(C::CreatedAt).text())
        .col(ColumnDef::new(C::ShippedAt).text())
        .col(ColumnDef::new(C::DeliveredAt).text())
        .col(ColumnDef::new(C::ReturnedAt).text())
        .col(ColumnDef::new(C::SalePrice).double())
        .foreign_key(
            ForeignKey::create()
                .name("fk_order_items_order_id")
                .from(order_item::Entity, C::OrderId)
                .to(order::Entity, order::Column::OrderId),
        )
        .foreign_key(
            ForeignKey::create()
                .name("fk_order_items_product_id")
                .from(order_item::Entity, C::ProductId)
                .to(product::Entity, product::Column::Id),
        )
        .to_owned()
}

/// Drops every table, children first.
pub async fn drop_all<C: ConnectionTrait>(db: &C) -> Result<(), DbErr> {
    let backend = db.get_database_backend();
    for target in LoadTarget::ALL.into_iter().rev() {
        debug!(table = target.table_name(), "Dropping table");
        db.execute(backend.build(&target.drop_statement())).await?;
    }
    Ok(())
}

/// Creates every table, parents first.
pub async fn create_all<C: ConnectionTrait>(db: &C) -> Result<(), DbErr> {
    let backend = db.get_database_backend();
    for target in LoadTarget::ALL {
        debug!(table = target.table_name(), "Creating table");
        db.execute(backend.build(&target.create_statement())).await?;
    }
    Ok(())
}

/// Drop and recreate, leaving every table empty.
pub async fn reset<C: ConnectionTrait>(db: &C) -> Result<(), DbErr> {
    drop_all(db).await?;
    create_all(db).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use sea_orm::{DbBackend, EntityTrait, PaginatorTrait, Statement};

    #[test]
    fn load_order_puts_parents_first() {
        let names: Vec<_> = LoadTarget::ALL.iter().map(|t| t.table_name()).collect();
        assert_eq!(names, ["users", "orders", "products", "order_items"]);
    }

    #[test]
    fn table_names_round_trip() {
        for target in LoadTarget::ALL {
            assert_eq!(LoadTarget::from_table_name(target.table_name()), Some(target));
        }
        assert_eq!(LoadTarget::from_table_name("inventory"), None);
    }

    #[test]
    fn child_tables_declare_foreign_keys() {
        let orders = DbBackend::Sqlite.build(&LoadTarget::Orders.create_statement());
        assert!(orders.sql.contains("FOREIGN KEY"));
        assert!(orders.sql.contains("\"users\""));

        let items = DbBackend::Sqlite.build(&LoadTarget::OrderItems.create_statement());
        assert_eq!(items.sql.matches("FOREIGN KEY").count(), 2);
    }

    #[tokio::test]
    async fn reset_recreates_empty_tables() {
        let db = crate::db::establish_loader_connection("sqlite::memory:")
            .await
            .unwrap();
        reset(&db).await.unwrap();

        db.execute(Statement::from_string(
            DbBackend::Sqlite,
            "INSERT INTO users (id, first_name) VALUES (1, 'Ada')".to_string(),
        ))
        .await
        .unwrap();
        assert_eq!(user::Entity::find().count(&db).await.unwrap(), 1);

        reset(&db).await.unwrap();
        assert_eq!(user::Entity::find().count(&db).await.unwrap(), 0);
        assert_eq!(order_item::Entity::find().count(&db).await.unwrap(), 0);
    }
}

#![allow(dead_code)]

use std::path::Path;
use std::sync::Arc;

use axum::{
    body::{self, Body},
    http::{Method, Request, StatusCode},
    response::Response,
    Router,
};
use serde_json::Value;
use storefront_admin_api::{
    app_router,
    config::AppConfig,
    db,
    loader::{LoadSummary, Loader, LoaderOptions},
    AppState,
};
use tempfile::TempDir;
use tower::ServiceExt;

pub const USERS_HEADER: &str = "id,first_name,last_name,email,age,gender,state,street_address,postal_code,city,country,latitude,longitude,traffic_source,created_at";
pub const ORDERS_HEADER: &str =
    "order_id,user_id,status,gender,created_at,returned_at,shipped_at,delivered_at,num_of_item";
pub const PRODUCTS_HEADER: &str =
    "id,cost,category,name,brand,retail_price,department,sku,distribution_center_id";
pub const ORDER_ITEMS_HEADER: &str = "id,order_id,user_id,product_id,inventory_item_id,status,created_at,shipped_at,delivered_at,returned_at,sale_price";

pub const USER_COUNT: usize = 25;

/// Contents of the four CSV exports
#[derive(Debug, Clone)]
pub struct Fixtures {
    pub users: String,
    pub orders: String,
    pub products: String,
    pub order_items: String,
}

impl Fixtures {
    /// 25 users; user 1 has three orders, users 2 and 3 one each.
    /// Revenue outside cancelled and returned items is 103.99.
    pub fn standard() -> Self {
        let mut users = format!("{USERS_HEADER}\n");
        for id in 1..=USER_COUNT {
            let email = if id == 2 {
                String::new()
            } else {
                format!("user{id}@example.com")
            };
            let gender = if id % 2 == 0 { "F" } else { "M" };
            users.push_str(&format!(
                "{id},First{id},Last{id},{email},{age},{gender},Oregon,{id} Main St,9720{id},Portland,United States,45.52,-122.68,Search,2022-01-01 00:00:00+00:00\n",
                age = 20 + id,
            ));
        }

        let orders = format!(
            "{ORDERS_HEADER}\n\
             1,1,Complete,M,2023-01-05 10:00:00+00:00,,2023-01-06 10:00:00+00:00,2023-01-08 10:00:00+00:00,3\n\
             2,1,Shipped,M,2023-03-10 09:30:00+00:00,,2023-03-11 09:30:00+00:00,,1\n\
             3,1,Cancelled,M,2022-12-01 08:00:00+00:00,,,,1\n\
             4,2,Returned,F,2023-02-01 12:00:00+00:00,2023-02-10 12:00:00+00:00,2023-02-02 12:00:00+00:00,2023-02-04 12:00:00+00:00,1\n\
             5,3,Processing,M,2023-04-01 15:45:00+00:00,,,,1\n"
        );

        let products = format!(
            "{PRODUCTS_HEADER}\n\
             1,10.5,Jeans,Slim Fit Jeans,Levi's,49.99,Men,SKU-1,1\n\
             2,5.0,Tops & Tees,Basic Tee,Hanes,19.5,Women,SKU-2,2\n\
             3,2.25,Socks,\"Socks, 3 pack\",Gildan,10.0,Men,SKU-3,1\n"
        );

        let order_items = format!(
            "{ORDER_ITEMS_HEADER}\n\
             1,1,1,1,101,Complete,2023-01-05 10:00:00+00:00,,,,49.99\n\
             2,1,1,2,102,Complete,2023-01-05 10:00:00+00:00,,,,19.5\n\
             3,1,1,99,103,Complete,2023-01-05 10:00:00+00:00,,,,5.0\n\
             4,2,1,3,104,Shipped,2023-03-10 09:30:00+00:00,,,,10.0\n\
             5,3,1,1,105,Cancelled,2022-12-01 08:00:00+00:00,,,,49.99\n\
             6,4,2,2,106,Returned,2023-02-01 12:00:00+00:00,,,2023-02-10 12:00:00+00:00,19.5\n\
             7,5,3,2,107,Processing,2023-04-01 15:45:00+00:00,,,,19.5\n"
        );

        Self {
            users,
            orders,
            products,
            order_items,
        }
    }

    pub fn headers_only() -> Self {
        Self {
            users: format!("{USERS_HEADER}\n"),
            orders: format!("{ORDERS_HEADER}\n"),
            products: format!("{PRODUCTS_HEADER}\n"),
            order_items: format!("{ORDER_ITEMS_HEADER}\n"),
        }
    }

    pub fn write_to(&self, dir: &Path) {
        for (name, contents) in [
            ("users.csv", &self.users),
            ("orders.csv", &self.orders),
            ("products.csv", &self.products),
            ("order_items.csv", &self.order_items),
        ] {
            std::fs::write(dir.join(name), contents).expect("failed to write fixture");
        }
    }
}

pub fn sqlite_url(dir: &Path) -> String {
    format!("sqlite://{}?mode=rwc", dir.join("dashboard.db").display())
}

/// Router over a freshly loaded temp-dir SQLite database
pub struct TestApp {
    router: Router,
    pub state: AppState,
    pub summary: LoadSummary,
    _dir: TempDir,
}

impl TestApp {
    pub async fn new() -> Self {
        Self::build(Fixtures::standard(), |_| {}).await
    }

    pub async fn with_config(customize: impl FnOnce(&mut AppConfig)) -> Self {
        Self::build(Fixtures::standard(), customize).await
    }

    pub async fn with_fixtures(fixtures: Fixtures) -> Self {
        Self::build(fixtures, |_| {}).await
    }

    async fn build(fixtures: Fixtures, customize: impl FnOnce(&mut AppConfig)) -> Self {
        let dir = TempDir::new().expect("failed to create temp dir");
        fixtures.write_to(dir.path());
        let url = sqlite_url(dir.path());

        let loader_db = db::establish_loader_connection(&url)
            .await
            .expect("failed to open loader connection");
        let summary = Loader::new(loader_db, LoaderOptions::default().with_row_limit(None))
            .run(dir.path())
            .await
            .expect("fixture load failed");

        let mut cfg = AppConfig::new(url, "127.0.0.1".to_string(), 5000, "test".to_string());
        cfg.cors_allow_any_origin = true;
        cfg.db_max_connections = 2;
        cfg.db_min_connections = 1;
        customize(&mut cfg);

        let pool = db::establish_connection_from_app_config(&cfg)
            .await
            .expect("failed to create test database pool");
        let state = AppState::new(Arc::new(pool), cfg);
        let router = app_router(state.clone());

        Self {
            router,
            state,
            summary,
            _dir: dir,
        }
    }

    pub async fn request(&self, method: Method, uri: &str, headers: &[(&str, &str)]) -> Response {
        let mut builder = Request::builder().method(method).uri(uri);
        for (name, value) in headers {
            builder = builder.header(*name, *value);
        }

        let request = builder.body(Body::empty()).expect("failed to build request");
        self.router
            .clone()
            .oneshot(request)
            .await
            .expect("router error during test request")
    }

    /// GET `uri` and decode the JSON body
    pub async fn get(&self, uri: &str) -> (StatusCode, Value) {
        let response = self.request(Method::GET, uri, &[]).await;
        let status = response.status();
        (status, response_json(response).await)
    }
}

pub async fn response_json(response: Response) -> Value {
    let bytes = body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("failed to read response body");
    serde_json::from_slice(&bytes).expect("response body is not JSON")
}

pub fn ids(rows: &Value, key: &str) -> Vec<i64> {
    rows.as_array()
        .expect("expected a JSON array")
        .iter()
        .map(|row| row[key].as_i64().expect("missing numeric id"))
        .collect()
}

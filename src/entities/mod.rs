//! sea-orm models for the four tables populated by the loader.

pub mod order;
pub mod order_item;
pub mod product;
pub mod user;

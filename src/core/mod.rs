pub mod cart_store;

pub use crate::domain::model::{Cart, LineItem, NoticeMessages, Product, ProductId, Stock};
pub use crate::domain::ports::{
    CatalogService, ConfigProvider, KeyValueStorage, Notifier, StockService,
};
pub use crate::utils::error::Result;

use crate::domain::model::{NoticeMessages, Product, ProductId, Stock};
use crate::utils::error::Result;
use async_trait::async_trait;
use std::time::Duration;

/// Product metadata lookup.
#[async_trait]
pub trait CatalogService: Send + Sync {
    async fn get_product(&self, id: ProductId) -> Result<Product>;
}

/// Live availability lookup.
#[async_trait]
pub trait StockService: Send + Sync {
    async fn get_stock(&self, id: ProductId) -> Result<Stock>;
}

/// Named text slots, overwritten wholesale on every write.
pub trait KeyValueStorage: Send + Sync {
    fn get_item(
        &self,
        key: &str,
    ) -> impl std::future::Future<Output = Result<Option<String>>> + Send;
    fn set_item(
        &self,
        key: &str,
        value: &str,
    ) -> impl std::future::Future<Output = Result<()>> + Send;
}

/// Fire-and-forget channel for user-facing error messages.
pub trait Notifier: Send + Sync {
    fn report_error(&self, message: &str);
}

pub trait ConfigProvider: Send + Sync {
    fn api_base_url(&self) -> &str;
    fn request_timeout(&self) -> Duration;
    fn storage_dir(&self) -> &str;
    fn storage_key(&self) -> &str;
    fn messages(&self) -> &NoticeMessages;
}

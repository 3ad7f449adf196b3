use crate::core::{CatalogService, ConfigProvider, Product, ProductId, Result, Stock, StockService};
use crate::utils::error::CartError;
use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use std::time::Duration;

/// Catalog and stock lookups against the storefront API
/// (`GET {base}/products/{id}` and `GET {base}/stock/{id}`).
#[derive(Debug, Clone)]
pub struct HttpApi {
    client: Client,
    base_url: String,
}

impl HttpApi {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into(),
        }
    }

    pub fn with_timeout(base_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: base_url.into(),
        })
    }

    pub fn from_config<C: ConfigProvider>(config: &C) -> Result<Self> {
        Self::with_timeout(config.api_base_url(), config.request_timeout())
    }

    fn endpoint(&self, resource: &str, id: ProductId) -> String {
        format!("{}/{}/{}", self.base_url.trim_end_matches('/'), resource, id)
    }

    async fn get_json<T: DeserializeOwned>(&self, url: String) -> Result<T> {
        tracing::debug!("Making API request to: {}", url);
        let response = self.client.get(&url).send().await?;

        let status = response.status();
        tracing::debug!("API response status: {}", status);

        if !status.is_success() {
            return Err(CartError::UpstreamStatus {
                url,
                status: status.as_u16(),
            });
        }

        Ok(response.json::<T>().await?)
    }
}

#[async_trait]
impl CatalogService for HttpApi {
    async fn get_product(&self, id: ProductId) -> Result<Product> {
        self.get_json(self.endpoint("products", id)).await
    }
}

#[async_trait]
impl StockService for HttpApi {
    async fn get_stock(&self, id: ProductId) -> Result<Stock> {
        self.get_json(self.endpoint("stock", id)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;

    #[tokio::test]
    async fn test_get_product() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(GET).path("/products/1");
            then.status(200)
                .header("Content-Type", "application/json")
                .json_body(serde_json::json!({
                    "id": 1,
                    "title": "Tênis de Caminhada Leve Confortável",
                    "price": 179.9,
                    "image": "https://example.com/tenis1.jpg"
                }));
        });

        let api = HttpApi::new(server.base_url());
        let product = api.get_product(1).await.unwrap();

        mock.assert();
        assert_eq!(product.id, 1);
        assert_eq!(
            product.attributes.get("price"),
            Some(&serde_json::json!(179.9))
        );
    }

    #[tokio::test]
    async fn test_get_stock_with_trailing_slash_base() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(GET).path("/stock/2");
            then.status(200)
                .header("Content-Type", "application/json")
                .json_body(serde_json::json!({"id": 2, "amount": 5}));
        });

        let api = HttpApi::new(format!("{}/", server.base_url()));
        let stock = api.get_stock(2).await.unwrap();

        mock.assert();
        assert_eq!(stock.amount, 5);
        assert_eq!(stock.id, Some(2));
    }

    #[tokio::test]
    async fn test_non_success_status() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/products/404");
            then.status(404);
        });

        let api = HttpApi::new(server.base_url());
        let err = api.get_product(404).await.unwrap_err();

        match err {
            CartError::UpstreamStatus { url, status } => {
                assert_eq!(status, 404);
                assert!(url.ends_with("/products/404"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_unexpected_body_is_api_error() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/stock/3");
            then.status(200)
                .header("Content-Type", "application/json")
                .json_body(serde_json::json!({"amount": "plenty"}));
        });

        let api = HttpApi::new(server.base_url());
        let err = api.get_stock(3).await.unwrap_err();

        assert!(matches!(err, CartError::ApiError(_)));
    }
}

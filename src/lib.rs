pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::{CliConfig, Command};

pub use adapters::http::HttpApi;
pub use adapters::notify::{RecordingNotifier, TracingNotifier};
pub use adapters::storage::{LocalStorage, MemoryStorage};
pub use config::toml_config::TomlConfig;
pub use core::cart_store::{CartStore, Mutation, StoreSettings};
pub use domain::model::{format_price, Cart, LineItem, NoticeMessages, Product, ProductId, Stock};
pub use utils::error::{CartError, ErrorCategory, Result};

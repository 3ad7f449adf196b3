use crate::config::toml_config::TomlConfig;
use crate::config::{
    DEFAULT_API_BASE_URL, DEFAULT_STORAGE_DIR, DEFAULT_STORAGE_KEY, DEFAULT_TIMEOUT_SECONDS,
};
use crate::core::{ConfigProvider, NoticeMessages, ProductId};
use crate::utils::error::Result;
use crate::utils::logger::LogFormat;
use crate::utils::validation::{
    validate_non_empty_string, validate_path, validate_range, validate_url, Validate,
};
use clap::{Parser, Subcommand};
use std::time::Duration;

#[derive(Debug, Clone, Parser)]
#[command(name = "cart-store")]
#[command(about = "Shopping cart kept in a local snapshot and checked against a stock API")]
pub struct CliConfig {
    #[arg(long, default_value = DEFAULT_API_BASE_URL)]
    pub api_base_url: String,

    #[arg(long, default_value = DEFAULT_STORAGE_DIR)]
    pub storage_dir: String,

    #[arg(long, default_value = DEFAULT_STORAGE_KEY)]
    pub storage_key: String,

    #[arg(long, default_value_t = DEFAULT_TIMEOUT_SECONDS)]
    pub timeout_seconds: u64,

    /// TOML file whose values override the flags above
    #[arg(short, long)]
    pub config: Option<String>,

    #[arg(long, value_enum, default_value_t = LogFormat::Compact)]
    pub log_format: LogFormat,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(skip)]
    pub messages: NoticeMessages,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, PartialEq, Eq, Subcommand)]
pub enum Command {
    /// Show the cart
    List,
    /// Add one unit of a product
    Add { id: ProductId },
    /// Remove a product from the cart
    Remove { id: ProductId },
    /// Set the amount of a product already in the cart
    Update {
        id: ProductId,
        #[arg(allow_negative_numbers = true)]
        amount: i64,
    },
    /// Show the cart total
    Total,
}

impl CliConfig {
    pub fn merge_toml(&mut self, toml: &TomlConfig) {
        if let Some(api) = &toml.api {
            if let Some(base_url) = &api.base_url {
                self.api_base_url = base_url.clone();
            }
            if let Some(timeout) = api.timeout_seconds {
                self.timeout_seconds = timeout;
            }
        }
        if let Some(storage) = &toml.storage {
            if let Some(dir) = &storage.dir {
                self.storage_dir = dir.clone();
            }
            if let Some(key) = &storage.key {
                self.storage_key = key.clone();
            }
        }
        if let Some(messages) = &toml.messages {
            self.messages = messages.clone();
        }
    }
}

impl ConfigProvider for CliConfig {
    fn api_base_url(&self) -> &str {
        &self.api_base_url
    }

    fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }

    fn storage_dir(&self) -> &str {
        &self.storage_dir
    }

    fn storage_key(&self) -> &str {
        &self.storage_key
    }

    fn messages(&self) -> &NoticeMessages {
        &self.messages
    }
}

impl Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        validate_url("api_base_url", &self.api_base_url)?;
        validate_path("storage_dir", &self.storage_dir)?;
        validate_non_empty_string("storage_key", &self.storage_key)?;
        validate_range("timeout_seconds", self.timeout_seconds, 1, 300)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_defaults_and_subcommand() {
        let config = CliConfig::try_parse_from(["cart-store", "add", "3"]).unwrap();

        assert_eq!(config.api_base_url, "http://localhost:3333");
        assert_eq!(config.storage_key, "@RocketShoes:cart");
        assert_eq!(config.request_timeout(), Duration::from_secs(10));
        assert_eq!(config.command, Command::Add { id: 3 });
        assert_eq!(config.messages, NoticeMessages::default());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_log_format_flag() {
        let config = CliConfig::try_parse_from(["cart-store", "list"]).unwrap();
        assert_eq!(config.log_format, LogFormat::Compact);

        let config =
            CliConfig::try_parse_from(["cart-store", "--log-format", "json", "total"]).unwrap();
        assert_eq!(config.log_format, LogFormat::Json);
        assert_eq!(config.command, Command::Total);

        assert!(CliConfig::try_parse_from(["cart-store", "--log-format", "xml", "list"]).is_err());
    }

    #[test]
    fn test_update_accepts_negative_amount() {
        let config =
            CliConfig::try_parse_from(["cart-store", "update", "1", "-2"]).unwrap();
        assert_eq!(config.command, Command::Update { id: 1, amount: -2 });
    }

    #[test]
    fn test_merge_toml_overrides_flags() {
        let mut config = CliConfig::try_parse_from([
            "cart-store",
            "--api-base-url",
            "http://flags.example.com",
            "list",
        ])
        .unwrap();
        let toml = TomlConfig::from_toml_str(
            r#"
[api]
base_url = "https://api.example.com"

[storage]
key = "shop:cart"

[messages]
out_of_stock = "Quantidade solicitada fora de estoque"
"#,
        )
        .unwrap();

        config.merge_toml(&toml);

        assert_eq!(config.api_base_url, "https://api.example.com");
        assert_eq!(config.timeout_seconds, 10);
        assert_eq!(config.storage_dir, ".cart");
        assert_eq!(config.storage_key, "shop:cart");
        assert_eq!(
            config.messages.out_of_stock,
            "Quantidade solicitada fora de estoque"
        );
        assert_eq!(config.messages.add_failed, "product add failed");
    }

    #[test]
    fn test_validation_rejects_bad_values() {
        let mut config = CliConfig::try_parse_from(["cart-store", "list"]).unwrap();
        config.timeout_seconds = 0;
        assert!(config.validate().is_err());

        let mut config = CliConfig::try_parse_from(["cart-store", "list"]).unwrap();
        config.api_base_url = "localhost".to_string();
        assert!(config.validate().is_err());
    }
}

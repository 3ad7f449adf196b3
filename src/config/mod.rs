#[cfg(feature = "cli")]
pub mod cli;
pub mod toml_config;

pub const DEFAULT_API_BASE_URL: &str = "http://localhost:3333";
pub const DEFAULT_STORAGE_DIR: &str = ".cart";
pub const DEFAULT_STORAGE_KEY: &str = "@RocketShoes:cart";
pub const DEFAULT_TIMEOUT_SECONDS: u64 = 10;

#[cfg(feature = "cli")]
pub use cli::{CliConfig, Command};

use anyhow::Context;
use cart_store::core::ConfigProvider;
use cart_store::utils::{logger, validation::Validate};
use cart_store::{
    format_price, Cart, CartStore, CliConfig, Command, HttpApi, LocalStorage, Mutation,
    RecordingNotifier, StoreSettings, TomlConfig, TracingNotifier,
};
use clap::Parser;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let mut config = CliConfig::parse();

    logger::init_logger(config.log_format, config.verbose);

    if let Some(path) = config.config.clone() {
        tracing::info!("📁 Loading configuration from: {}", path);
        let toml = TomlConfig::from_file(&path)
            .with_context(|| format!("failed to load config file '{}'", path))?;
        config.merge_toml(&toml);
    }

    tracing::debug!("CLI config: {:?}", config);

    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        eprintln!("❌ {}", e);
        std::process::exit(1);
    }

    let api = HttpApi::from_config(&config)?;
    let storage = LocalStorage::new(config.storage_dir());
    let notices = RecordingNotifier::new();
    let store = CartStore::open(
        api,
        storage,
        (TracingNotifier, notices.clone()),
        StoreSettings::from_config(&config),
    )
    .await
    .context("failed to open the stored cart")?;

    let outcome = match &config.command {
        Command::List => {
            print_cart(&store.cart());
            return Ok(());
        }
        Command::Total => {
            let cart = store.cart();
            println!("{} item(s), {} unit(s)", cart.len(), cart.total_units());
            println!("Total: {}", format_price(cart.total()));
            return Ok(());
        }
        Command::Add { id } => store.add_product(*id).await,
        Command::Remove { id } => store.remove_product(*id).await,
        Command::Update { id, amount } => store.update_product_amount(*id, *amount).await,
    };

    match outcome {
        Ok(Mutation::Applied) => {
            print_cart(&store.cart());
            Ok(())
        }
        Ok(Mutation::Unchanged) => {
            println!("Nothing to change.");
            Ok(())
        }
        Err(e) => {
            tracing::debug!("Operation failed: {} (Category: {:?})", e, e.category());
            for message in notices.messages() {
                eprintln!("❌ {}", message);
            }
            std::process::exit(if e.is_rejection() { 2 } else { 1 });
        }
    }
}

fn print_cart(cart: &Cart) {
    if cart.is_empty() {
        println!("Cart is empty.");
        return;
    }

    for item in cart.items() {
        let subtotal = item
            .subtotal()
            .map(format_price)
            .unwrap_or_else(|| "-".to_string());
        println!(
            "#{:<6} {:<40} x{:<4} {}",
            item.id,
            item.name().unwrap_or("(unnamed)"),
            item.amount,
            subtotal
        );
    }
    println!("Total: {}", format_price(cart.total()));
}

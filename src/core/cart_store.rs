use crate::config::DEFAULT_STORAGE_KEY;
use crate::core::{
    Cart, CatalogService, ConfigProvider, KeyValueStorage, LineItem, NoticeMessages, Notifier,
    ProductId, Result, StockService,
};
use crate::utils::error::CartError;
use tokio::sync::{watch, Mutex};

/// Result of a mutating call that did not fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mutation {
    Applied,
    /// The request was accepted but asked for nothing to change (amount <= 0).
    Unchanged,
}

#[derive(Debug, Clone)]
pub struct StoreSettings {
    pub storage_key: String,
    pub messages: NoticeMessages,
}

impl StoreSettings {
    pub fn from_config<C: ConfigProvider>(config: &C) -> Self {
        Self {
            storage_key: config.storage_key().to_string(),
            messages: config.messages().clone(),
        }
    }
}

impl Default for StoreSettings {
    fn default() -> Self {
        Self {
            storage_key: DEFAULT_STORAGE_KEY.to_string(),
            messages: NoticeMessages::default(),
        }
    }
}

/// Owns the cart for one session.
///
/// Every mutation runs under a single write lock, writes the snapshot slot and
/// only then publishes the new cart to readers. A failed call leaves both the
/// stored snapshot and the in-memory cart as they were, reports a message
/// through the notifier and returns the error to the caller.
pub struct CartStore<A, S, N> {
    api: A,
    storage: S,
    notifier: N,
    settings: StoreSettings,
    state: watch::Sender<Cart>,
    write_lock: Mutex<()>,
}

impl<A, S, N> CartStore<A, S, N>
where
    A: CatalogService + StockService,
    S: KeyValueStorage,
    N: Notifier,
{
    /// Loads the stored snapshot. A missing or malformed snapshot yields an
    /// empty cart; storage failures are returned.
    pub async fn open(api: A, storage: S, notifier: N, settings: StoreSettings) -> Result<Self> {
        let cart = match storage.get_item(&settings.storage_key).await? {
            None => {
                tracing::debug!("No stored cart under '{}'", settings.storage_key);
                Cart::new()
            }
            Some(raw) => match Cart::from_snapshot(&raw) {
                Ok(cart) => cart,
                Err(e) => {
                    tracing::warn!(
                        "Ignoring stored cart under '{}': {}",
                        settings.storage_key,
                        e
                    );
                    Cart::new()
                }
            },
        };

        tracing::info!("Cart loaded with {} item(s)", cart.len());

        let (state, _) = watch::channel(cart);
        Ok(Self {
            api,
            storage,
            notifier,
            settings,
            state,
            write_lock: Mutex::new(()),
        })
    }

    pub fn cart(&self) -> Cart {
        Cart::clone(&self.state.borrow())
    }

    /// Read-only view that is notified after every applied mutation.
    pub fn subscribe(&self) -> watch::Receiver<Cart> {
        self.state.subscribe()
    }

    pub fn settings(&self) -> &StoreSettings {
        &self.settings
    }

    /// Adds one unit of a product.
    ///
    /// A product already in the cart goes through the same stock check as
    /// [`update_product_amount`](Self::update_product_amount) and reports with
    /// its messages. A new product is fetched from the catalog without a stock
    /// check and appended with amount 1.
    pub async fn add_product(&self, id: ProductId) -> Result<Mutation> {
        let _guard = self.write_lock.lock().await;
        let cart = self.cart();

        if let Some(current) = cart.amount_of(id) {
            let requested = i64::from(current) + 1;
            tracing::debug!(
                "Product {} already in cart, raising amount to {}",
                id,
                requested
            );
            return self
                .set_amount(&cart, id, requested)
                .await
                .map_err(|e| self.update_failure(e));
        }

        match self.append_product(&cart, id).await {
            Ok(()) => {
                tracing::info!("Added product {} to cart", id);
                Ok(Mutation::Applied)
            }
            Err(e) => Err(self.fail(&self.settings.messages.add_failed, e)),
        }
    }

    pub async fn remove_product(&self, id: ProductId) -> Result<Mutation> {
        let _guard = self.write_lock.lock().await;
        let cart = self.cart();
        let updated = cart.without(id);

        if updated.len() == cart.len() {
            return Err(self.fail(
                &self.settings.messages.remove_failed,
                CartError::NotInCart { product_id: id },
            ));
        }

        self.commit(updated)
            .await
            .map_err(|e| self.fail(&self.settings.messages.remove_failed, e))?;

        tracing::info!("Removed product {} from cart", id);
        Ok(Mutation::Applied)
    }

    /// Sets the absolute amount of a product already in the cart.
    pub async fn update_product_amount(&self, id: ProductId, amount: i64) -> Result<Mutation> {
        if amount <= 0 {
            tracing::debug!("Ignoring amount {} for product {}", amount, id);
            return Ok(Mutation::Unchanged);
        }

        let _guard = self.write_lock.lock().await;
        let cart = self.cart();

        self.set_amount(&cart, id, amount)
            .await
            .map_err(|e| self.update_failure(e))
    }

    async fn append_product(&self, cart: &Cart, id: ProductId) -> Result<()> {
        let product = self.api.get_product(id).await?;
        if product.id != id {
            return Err(CartError::CatalogMismatch {
                requested: id,
                returned: product.id,
            });
        }
        self.commit(cart.with_appended(LineItem::from_product(product))?)
            .await
    }

    // Caller holds the write lock.
    async fn set_amount(&self, cart: &Cart, id: ProductId, amount: i64) -> Result<Mutation> {
        if !cart.contains(id) {
            return Err(CartError::NotInCart { product_id: id });
        }

        let stock = self.api.get_stock(id).await?;
        let out_of_stock = || CartError::OutOfStock {
            product_id: id,
            requested: amount,
            available: stock.amount,
        };

        if stock.amount < amount {
            return Err(out_of_stock());
        }
        let amount = u32::try_from(amount).map_err(|_| out_of_stock())?;

        self.commit(cart.with_amount(id, amount)).await?;

        tracing::info!("Set amount of product {} to {}", id, amount);
        Ok(Mutation::Applied)
    }

    async fn commit(&self, cart: Cart) -> Result<()> {
        let raw = cart.to_snapshot()?;
        self.storage
            .set_item(&self.settings.storage_key, &raw)
            .await?;
        self.state.send_replace(cart);
        Ok(())
    }

    fn update_failure(&self, error: CartError) -> CartError {
        let message = match &error {
            CartError::OutOfStock { .. } => &self.settings.messages.out_of_stock,
            _ => &self.settings.messages.update_failed,
        };
        self.fail(message, error)
    }

    fn fail(&self, message: &str, error: CartError) -> CartError {
        tracing::warn!("{}: {}", message, error);
        self.notifier.report_error(message);
        error
    }
}

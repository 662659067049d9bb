//! Cart state store.
//!
//! Owns the mapping from product to cart line and the totals derived from
//! it. All mutation goes through the narrow API here; presentation code
//! reads through accessors and subscribes for change notification, so the
//! persistence mechanism stays swappable.
//!
//! Flow for every mutation:
//! 1. apply the change to the line list
//! 2. recompute `total_items` / `subtotal` from scratch
//! 3. write the full state to durable storage
//! 4. notify observers synchronously
//!
//! Reads never write. Malformed persisted state degrades to an empty cart
//! on rehydration.

use std::sync::Arc;

use fastrac_core::ProductId;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::catalog::types::Product;
use crate::storage::{CART_KEY, KeyValueStorage};

/// One product's line in the cart.
///
/// At most one line exists per product id, regardless of variant: the
/// variant label is display-only and never a join key.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartLine {
    pub product: Product,
    /// Always at least 1; a line whose quantity would reach 0 is removed.
    pub quantity: u32,
    /// Display label for the chosen variant (e.g. `"M / Black"`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub selected_variant: Option<String>,
}

impl CartLine {
    /// This line's contribution to the cart subtotal, in USD.
    #[must_use]
    pub fn line_total(&self) -> Decimal {
        self.product.discounted_price() * Decimal::from(self.quantity)
    }
}

/// The full cart: lines in insertion order plus derived totals.
///
/// `total_items` and `subtotal` are derived from `lines` after every
/// mutation and are never set independently.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartState {
    pub lines: Vec<CartLine>,
    pub total_items: u32,
    pub subtotal: Decimal,
}

impl CartState {
    /// Whether the cart has no lines.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    fn recompute_totals(&mut self) {
        self.total_items = self.lines.iter().map(|line| line.quantity).sum();
        self.subtotal = self.lines.iter().map(CartLine::line_total).sum();
    }
}

/// Result of a cart mutation, for surfacing notices in the UI.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MutationOutcome {
    /// The line's quantity after the mutation (0 if the line was removed
    /// or never created).
    pub quantity: u32,
    /// Whether the requested quantity was clamped to the product's stock.
    pub stock_limited: bool,
}

type Observer = Box<dyn Fn(&CartState) + Send + Sync>;

/// The cart store.
///
/// Exclusively owns its [`CartState`]; there is exactly one mutator at a
/// time and observers run synchronously on the mutating call, so derived
/// totals are always consistent when anyone reads them.
///
/// The store enforces the stock ceiling: no sequence of adds or updates
/// can push a line's quantity past `product.stock`. The quantity validator
/// at the input boundary exists to give the user a nicer message before
/// the clamp ever has to happen.
pub struct CartStore {
    state: CartState,
    storage: Arc<dyn KeyValueStorage>,
    observers: Vec<Observer>,
}

impl CartStore {
    /// Open the cart, rehydrating any persisted state.
    ///
    /// Missing or corrupt persisted data degrades to an empty cart. The
    /// derived totals are recomputed from the rehydrated lines rather than
    /// trusted from disk.
    #[must_use]
    pub fn open(storage: Arc<dyn KeyValueStorage>) -> Self {
        let mut state = match storage.get(CART_KEY) {
            Some(json) => match serde_json::from_str::<CartState>(&json) {
                Ok(state) => state,
                Err(e) => {
                    warn!(error = %e, "persisted cart is corrupt, starting empty");
                    CartState::default()
                }
            },
            None => CartState::default(),
        };
        state.recompute_totals();

        Self {
            state,
            storage,
            observers: Vec::new(),
        }
    }

    // =========================================================================
    // Reads (never write)
    // =========================================================================

    /// The current cart state.
    #[must_use]
    pub fn state(&self) -> &CartState {
        &self.state
    }

    /// Lines in insertion order.
    #[must_use]
    pub fn lines(&self) -> &[CartLine] {
        &self.state.lines
    }

    /// Total quantity across all lines.
    #[must_use]
    pub const fn total_items(&self) -> u32 {
        self.state.total_items
    }

    /// Sum of discounted line totals, in USD.
    #[must_use]
    pub const fn subtotal(&self) -> Decimal {
        self.state.subtotal
    }

    /// Quantity of one product in the cart, or 0 if absent.
    #[must_use]
    pub fn item_quantity(&self, product_id: ProductId) -> u32 {
        self.state
            .lines
            .iter()
            .find(|line| line.product.id == product_id)
            .map_or(0, |line| line.quantity)
    }

    /// Whether the product has a line in the cart.
    #[must_use]
    pub fn is_in_cart(&self, product_id: ProductId) -> bool {
        self.item_quantity(product_id) > 0
    }

    // =========================================================================
    // Mutations
    // =========================================================================

    /// Add `quantity` of a product to the cart.
    ///
    /// If a line for the product already exists its quantity is
    /// incremented and its variant label replaced with this call's; the
    /// label always reflects the most recent add. The resulting quantity
    /// is clamped to `product.stock`, and an out-of-stock product is never
    /// added at all.
    pub fn add_item(
        &mut self,
        product: &Product,
        quantity: u32,
        variant: Option<&str>,
    ) -> MutationOutcome {
        let position = self
            .state
            .lines
            .iter()
            .position(|line| line.product.id == product.id);

        let current = position
            .and_then(|i| self.state.lines.get(i))
            .map_or(0, |line| line.quantity);
        let requested = current.saturating_add(quantity);
        let clamped = requested.min(product.stock);
        let stock_limited = clamped < requested;

        if clamped == 0 {
            // Out of stock (or a zero-quantity add of a new product):
            // nothing to record
            return MutationOutcome {
                quantity: 0,
                stock_limited,
            };
        }

        match position.and_then(|i| self.state.lines.get_mut(i)) {
            Some(line) => {
                line.quantity = clamped;
                line.selected_variant = variant.map(str::to_owned);
            }
            None => self.state.lines.push(CartLine {
                product: product.clone(),
                quantity: clamped,
                selected_variant: variant.map(str::to_owned),
            }),
        }

        self.commit();
        MutationOutcome {
            quantity: clamped,
            stock_limited,
        }
    }

    /// Remove a product's line from the cart (no-op if absent).
    pub fn remove_item(&mut self, product_id: ProductId) {
        let before = self.state.lines.len();
        self.state.lines.retain(|line| line.product.id != product_id);
        if self.state.lines.len() != before {
            self.commit();
        }
    }

    /// Set a line's quantity to exactly `quantity` (absolute, not delta).
    ///
    /// A quantity of 0 removes the line. No-op if the line does not exist.
    /// Like [`Self::add_item`], the value is clamped to the product's
    /// stock.
    pub fn update_quantity(&mut self, product_id: ProductId, quantity: u32) -> MutationOutcome {
        if quantity == 0 {
            self.remove_item(product_id);
            return MutationOutcome {
                quantity: 0,
                stock_limited: false,
            };
        }

        let Some(line) = self
            .state
            .lines
            .iter_mut()
            .find(|line| line.product.id == product_id)
        else {
            return MutationOutcome {
                quantity: 0,
                stock_limited: false,
            };
        };

        let clamped = quantity.min(line.product.stock);
        let stock_limited = clamped < quantity;
        line.quantity = clamped;

        self.commit();
        MutationOutcome {
            quantity: clamped,
            stock_limited,
        }
    }

    /// Empty the cart.
    pub fn clear(&mut self) {
        if self.state.is_empty() {
            return;
        }
        self.state.lines.clear();
        self.commit();
    }

    /// Register an observer called synchronously after every mutation.
    pub fn subscribe(&mut self, observer: impl Fn(&CartState) + Send + Sync + 'static) {
        self.observers.push(Box::new(observer));
    }

    /// Recompute totals, persist, and notify observers, in that order.
    fn commit(&mut self) {
        self.state.recompute_totals();

        match serde_json::to_string(&self.state) {
            Ok(json) => self.storage.set(CART_KEY, &json),
            Err(e) => warn!(error = %e, "failed to serialize cart state"),
        }

        for observer in &self.observers {
            observer(&self.state);
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;
    use crate::storage::MemoryStorage;
    use crate::testutil::product;

    fn store() -> CartStore {
        CartStore::open(Arc::new(MemoryStorage::new()))
    }

    fn dec(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    #[test]
    fn test_add_distinct_products() {
        let mut cart = store();
        cart.add_item(&product(1, "10", "0", 9), 2, None);
        cart.add_item(&product(2, "20", "0", 9), 3, None);
        cart.add_item(&product(3, "30", "0", 9), 1, None);

        assert_eq!(cart.lines().len(), 3);
        assert_eq!(cart.total_items(), 6);
        assert_eq!(cart.subtotal(), dec("110"));
    }

    #[test]
    fn test_add_same_product_merges_lines() {
        let mut cart = store();
        let shirt = product(1, "100", "10", 5);

        cart.add_item(&shirt, 2, None);
        assert_eq!(cart.total_items(), 2);
        assert_eq!(cart.subtotal(), dec("180"));

        cart.add_item(&shirt, 1, None);
        assert_eq!(cart.lines().len(), 1);
        assert_eq!(cart.item_quantity(shirt.id), 3);
        assert_eq!(cart.subtotal(), dec("270"));

        cart.remove_item(shirt.id);
        assert!(cart.state().is_empty());
        assert_eq!(cart.total_items(), 0);
        assert_eq!(cart.subtotal(), Decimal::ZERO);
    }

    #[test]
    fn test_merge_keeps_latest_variant_label() {
        let mut cart = store();
        let shirt = product(1, "100", "0", 10);

        cart.add_item(&shirt, 1, Some("M / Black"));
        cart.add_item(&shirt, 1, Some("L / Navy"));

        assert_eq!(cart.lines().len(), 1);
        assert_eq!(cart.lines()[0].selected_variant.as_deref(), Some("L / Navy"));
    }

    #[test]
    fn test_subtotal_matches_from_scratch_fold() {
        let mut cart = store();
        cart.add_item(&product(1, "19.99", "12.5", 50), 3, None);
        cart.add_item(&product(2, "5", "0", 50), 7, None);
        cart.update_quantity(ProductId::new(1), 2);

        let from_scratch: Decimal = cart.lines().iter().map(CartLine::line_total).sum();
        assert_eq!(cart.subtotal(), from_scratch);
    }

    #[test]
    fn test_update_quantity_zero_equals_remove() {
        let item = product(1, "10", "0", 9);

        let mut removed = store();
        removed.add_item(&item, 4, None);
        removed.remove_item(item.id);

        let mut zeroed = store();
        zeroed.add_item(&item, 4, None);
        zeroed.update_quantity(item.id, 0);

        assert!(removed.state().is_empty());
        assert!(zeroed.state().is_empty());
        assert_eq!(removed.total_items(), zeroed.total_items());
        assert_eq!(removed.subtotal(), zeroed.subtotal());
    }

    #[test]
    fn test_update_quantity_is_absolute() {
        let mut cart = store();
        let item = product(1, "10", "0", 9);
        cart.add_item(&item, 2, None);

        cart.update_quantity(item.id, 7);
        assert_eq!(cart.item_quantity(item.id), 7);
        assert_eq!(cart.subtotal(), dec("70"));
    }

    #[test]
    fn test_update_quantity_missing_line_is_noop() {
        let mut cart = store();
        let outcome = cart.update_quantity(ProductId::new(404), 3);
        assert_eq!(outcome.quantity, 0);
        assert!(cart.state().is_empty());
    }

    #[test]
    fn test_clear_resets_everything() {
        let mut cart = store();
        cart.add_item(&product(1, "10", "0", 9), 2, Some("One Size / Default"));
        cart.add_item(&product(2, "20", "0", 9), 1, None);

        cart.clear();

        assert!(cart.lines().is_empty());
        assert_eq!(cart.total_items(), 0);
        assert_eq!(cart.subtotal(), Decimal::ZERO);
    }

    #[test]
    fn test_add_clamps_to_stock() {
        let mut cart = store();
        let item = product(1, "10", "0", 5);

        let outcome = cart.add_item(&item, 8, None);
        assert_eq!(outcome, MutationOutcome { quantity: 5, stock_limited: true });
        assert_eq!(cart.item_quantity(item.id), 5);
    }

    #[test]
    fn test_repeated_adds_never_exceed_stock() {
        // The ceiling is enforced in the store itself, not just at the
        // input boundary: dialog + card + grid all adding the same product
        // cannot stack past the displayed stock.
        let mut cart = store();
        let item = product(1, "10", "0", 5);

        for _ in 0..4 {
            cart.add_item(&item, 2, None);
        }

        assert_eq!(cart.item_quantity(item.id), 5);
        assert_eq!(cart.total_items(), 5);
    }

    #[test]
    fn test_update_quantity_clamps_to_stock() {
        let mut cart = store();
        let item = product(1, "10", "0", 5);
        cart.add_item(&item, 1, None);

        let outcome = cart.update_quantity(item.id, 12);
        assert_eq!(outcome, MutationOutcome { quantity: 5, stock_limited: true });
        assert_eq!(cart.item_quantity(item.id), 5);
    }

    #[test]
    fn test_out_of_stock_product_is_never_added() {
        let mut cart = store();
        let gone = product(1, "10", "0", 0);

        let outcome = cart.add_item(&gone, 1, None);
        assert_eq!(outcome, MutationOutcome { quantity: 0, stock_limited: true });
        assert!(cart.state().is_empty());
    }

    #[test]
    fn test_persists_and_rehydrates() {
        let storage: Arc<MemoryStorage> = Arc::new(MemoryStorage::new());

        {
            let mut cart = CartStore::open(Arc::clone(&storage) as Arc<dyn KeyValueStorage>);
            cart.add_item(&product(1, "100", "10", 5), 2, Some("M / Black"));
        }

        let reopened = CartStore::open(storage);
        assert_eq!(reopened.lines().len(), 1);
        assert_eq!(reopened.item_quantity(ProductId::new(1)), 2);
        assert_eq!(reopened.subtotal(), dec("180"));
        assert_eq!(
            reopened.lines()[0].selected_variant.as_deref(),
            Some("M / Black")
        );
    }

    #[test]
    fn test_corrupt_persisted_state_degrades_to_empty() {
        let storage = Arc::new(MemoryStorage::new());
        storage.set(CART_KEY, "{{{ not json");

        let cart = CartStore::open(storage);
        assert!(cart.state().is_empty());
        assert_eq!(cart.total_items(), 0);
        assert_eq!(cart.subtotal(), Decimal::ZERO);
    }

    #[test]
    fn test_rehydration_recomputes_tampered_totals() {
        let storage = Arc::new(MemoryStorage::new());
        {
            let mut cart = CartStore::open(Arc::clone(&storage) as Arc<dyn KeyValueStorage>);
            cart.add_item(&product(1, "10", "0", 9), 2, None);
        }
        // Sabotage the derived fields on disk; the lines are the truth
        let json = storage.get(CART_KEY).unwrap();
        storage.set(CART_KEY, &json.replace("\"totalItems\":2", "\"totalItems\":99"));

        let cart = CartStore::open(storage);
        assert_eq!(cart.total_items(), 2);
    }

    /// Storage wrapper counting writes, for the reads-never-write property.
    struct CountingStorage {
        inner: MemoryStorage,
        writes: AtomicUsize,
    }

    impl KeyValueStorage for CountingStorage {
        fn get(&self, key: &str) -> Option<String> {
            self.inner.get(key)
        }
        fn set(&self, key: &str, value: &str) {
            self.writes.fetch_add(1, Ordering::SeqCst);
            self.inner.set(key, value);
        }
        fn remove(&self, key: &str) {
            self.writes.fetch_add(1, Ordering::SeqCst);
            self.inner.remove(key);
        }
    }

    #[test]
    fn test_reads_are_idempotent_and_never_write() {
        let storage = Arc::new(CountingStorage {
            inner: MemoryStorage::new(),
            writes: AtomicUsize::new(0),
        });
        let mut cart = CartStore::open(Arc::clone(&storage) as Arc<dyn KeyValueStorage>);
        cart.add_item(&product(1, "10", "0", 9), 2, None);

        let writes_after_add = storage.writes.load(Ordering::SeqCst);
        let q1 = cart.item_quantity(ProductId::new(1));
        let q2 = cart.item_quantity(ProductId::new(1));
        let q3 = cart.item_quantity(ProductId::new(1));

        assert_eq!((q1, q2, q3), (2, 2, 2));
        assert_eq!(storage.writes.load(Ordering::SeqCst), writes_after_add);
    }

    #[test]
    fn test_observers_run_synchronously_with_consistent_totals() {
        let seen: Arc<Mutex<Vec<(usize, u32)>>> = Arc::new(Mutex::new(Vec::new()));
        let mut cart = store();

        let sink = Arc::clone(&seen);
        cart.subscribe(move |state| {
            sink.lock()
                .unwrap()
                .push((state.lines.len(), state.total_items));
        });

        cart.add_item(&product(1, "10", "0", 9), 2, None);
        cart.add_item(&product(2, "20", "0", 9), 1, None);
        cart.remove_item(ProductId::new(1));

        assert_eq!(*seen.lock().unwrap(), vec![(1, 2), (2, 3), (1, 1)]);
    }
}

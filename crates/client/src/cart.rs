//! In-memory cart state, the single source of truth for "what is in the
//! cart".
//!
//! The store is an explicitly owned, injectable object scoped to the
//! application session - not a module-level global - so tests can run any
//! number of independent instances. Handles are cheap to clone and all
//! clones observe the same state.
//!
//! Invariant: a product is either absent or present with quantity > 0.
//! Nothing ever stores a zero or negative quantity; decrementing the last
//! unit removes the entry.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use greenkart_core::ProductId;

/// Shared cart state: product id -> quantity.
#[derive(Debug, Clone, Default)]
pub struct CartStore {
    inner: Arc<Mutex<HashMap<ProductId, u32>>>,
}

impl CartStore {
    /// Create an empty cart.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Put a product in the cart at quantity 1.
    ///
    /// A no-op when the product is already present; callers wanting +1 use
    /// [`increment`](Self::increment). Quantity controls take over once the
    /// product is in the cart.
    pub fn add(&self, id: ProductId) {
        self.lock().entry(id).or_insert(1);
    }

    /// Increase a product's quantity by one, creating the entry at 1 if
    /// absent.
    pub fn increment(&self, id: ProductId) {
        *self.lock().entry(id).or_insert(0) += 1;
    }

    /// Decrease a product's quantity by one, removing the entry when it
    /// would drop below 1. A no-op for products not in the cart.
    pub fn decrement(&self, id: ProductId) {
        let mut items = self.lock();
        if let Some(quantity) = items.get_mut(&id) {
            if *quantity <= 1 {
                items.remove(&id);
            } else {
                *quantity -= 1;
            }
        }
    }

    /// Remove everything. Called exactly once, right after a successful
    /// order submission.
    pub fn clear(&self) {
        self.lock().clear();
    }

    /// Quantity for a product; 0 when absent. `quantity(id) > 0` and "is in
    /// the cart" are the same question.
    #[must_use]
    pub fn quantity(&self, id: ProductId) -> u32 {
        self.lock().get(&id).copied().unwrap_or(0)
    }

    /// Whether the product is in the cart.
    #[must_use]
    pub fn contains(&self, id: ProductId) -> bool {
        self.quantity(id) > 0
    }

    /// Number of distinct products in the cart.
    #[must_use]
    pub fn distinct_items(&self) -> usize {
        self.lock().len()
    }

    /// Whether the cart is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// A consistent snapshot of the cart, sorted by product id for
    /// deterministic iteration. Derived line items and order payloads are
    /// built from snapshots, never from a live borrow.
    #[must_use]
    pub fn snapshot(&self) -> Vec<(ProductId, u32)> {
        let mut entries: Vec<_> = self.lock().iter().map(|(&id, &qty)| (id, qty)).collect();
        entries.sort_unstable_by_key(|&(id, _)| id);
        entries
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<ProductId, u32>> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

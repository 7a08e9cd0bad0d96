//! Checkout session: composes the cart, catalog, scheduler, and user
//! selections into an order submission.
//!
//! # State machine
//!
//! - **Initializing**: addresses, slots, and the catalog are fetched
//!   concurrently; each piece fails independently and a failure leaves that
//!   piece empty without blocking the others.
//! - **Ready**: defaults applied (default address, first slot, earliest
//!   date, Cash on Delivery); the user may change any selection freely as a
//!   pure local update.
//! - **Submitting**: entered by [`confirm`](CheckoutSession::confirm) after
//!   local validation passes; single-flight - a second confirm while one is
//!   in flight is rejected without issuing a request.
//! - **Succeeded**: terminal; the cart has been cleared.
//!
//! A failed submission returns the session to Ready with the cart intact so
//! the user can retry.
//!
//! The session handle is cheap to clone; derived views (line items, totals)
//! are recomputed from live cart + catalog state on every read, and the
//! order payload is assembled at the moment of confirmation, never from an
//! earlier snapshot.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use thiserror::Error;
use tracing::{info, instrument, warn};

use greenkart_core::{
    Address, AddressId, OrderRequest, PaymentMethod, Slot, SlotId, default_address,
};

use crate::api::{ApiError, CheckoutBackend};
use crate::cart::CartStore;
use crate::catalog::ProductCatalog;
use crate::pricing::{self, LineItem};
use crate::schedule::{DeliveryWindow, OFFERED_DATE_COUNT};

/// Message shown when the server rejects an order without saying why.
const GENERIC_FAILURE: &str = "Order placement failed";

/// Errors surfaced by a checkout session.
#[derive(Debug, Error)]
pub enum CheckoutError {
    /// A required selection is missing at confirm time. Local; no request
    /// was issued.
    #[error("no {0} selected")]
    MissingSelection(&'static str),

    /// A selection referenced something the session never offered.
    #[error("invalid {0} selection")]
    InvalidSelection(&'static str),

    /// A submission is already in flight; the duplicate confirm was
    /// ignored.
    #[error("an order submission is already in flight")]
    SubmissionInFlight,

    /// The session already succeeded; start a new one for another order.
    #[error("checkout session is already complete")]
    SessionClosed,

    /// The server rejected the order. Carries the server's message
    /// verbatim when it sent one.
    #[error("order rejected: {0}")]
    Rejected(String),

    /// The submission or a fetch could not complete.
    #[error("network error: {0}")]
    Network(#[source] ApiError),
}

/// Where a checkout session currently stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckoutPhase {
    Initializing,
    Ready,
    Submitting,
    Succeeded,
}

/// A single checkout attempt over a cart.
///
/// Generic over the backend so tests can drive the state machine without a
/// network; production code uses [`ApiClient`](crate::api::ApiClient).
pub struct CheckoutSession<B> {
    inner: Arc<Inner<B>>,
}

// Manual impl: cloning the handle must not require B: Clone.
impl<B> Clone for CheckoutSession<B> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

struct Inner<B> {
    backend: B,
    cart: CartStore,
    state: Mutex<SessionState>,
}

struct SessionState {
    phase: CheckoutPhase,
    catalog: ProductCatalog,
    addresses: Vec<Address>,
    slots: Vec<Slot>,
    window: DeliveryWindow,
    dates: Vec<NaiveDate>,
    selected_address: Option<AddressId>,
    selected_slot: Option<SlotId>,
    selected_date: Option<NaiveDate>,
    payment_method: PaymentMethod,
}

impl<B: CheckoutBackend> CheckoutSession<B> {
    /// Start a checkout session over the given cart.
    ///
    /// The delivery window is computed from `now` once, here, and stays
    /// frozen for the life of the session: a user who starts before the
    /// cutoff and lingers past it keeps the original date list.
    #[must_use]
    pub fn new(backend: B, cart: CartStore, now: NaiveDateTime) -> Self {
        let window = DeliveryWindow::at(now);
        let dates = window.offerable_dates(OFFERED_DATE_COUNT);
        Self {
            inner: Arc::new(Inner {
                backend,
                cart,
                state: Mutex::new(SessionState {
                    phase: CheckoutPhase::Initializing,
                    catalog: ProductCatalog::empty(),
                    addresses: Vec::new(),
                    slots: Vec::new(),
                    window,
                    dates,
                    selected_address: None,
                    selected_slot: None,
                    selected_date: None,
                    payment_method: PaymentMethod::default(),
                }),
            }),
        }
    }

    /// Fetch addresses, slots, and the catalog concurrently and apply the
    /// default selections.
    ///
    /// Each fetch fails independently: a failure is logged and leaves that
    /// piece empty (an empty address list, no slots, an empty catalog)
    /// while the rest of the session proceeds.
    #[instrument(skip(self))]
    pub async fn load(&self) {
        let (addresses, slots, products) = tokio::join!(
            self.inner.backend.fetch_addresses(),
            self.inner.backend.fetch_slots(),
            self.inner.backend.fetch_products(),
        );

        let addresses = addresses.unwrap_or_else(|e| {
            warn!(error = %e, "address fetch failed; continuing with none");
            Vec::new()
        });
        let slots = slots.unwrap_or_else(|e| {
            warn!(error = %e, "slot fetch failed; continuing with none");
            Vec::new()
        });
        let catalog = products.map_or_else(
            |e| {
                warn!(error = %e, "catalog fetch failed; continuing with empty catalog");
                ProductCatalog::empty()
            },
            ProductCatalog::from,
        );

        let mut state = self.lock();
        state.selected_address = default_address(&addresses).map(|a| a.id);
        state.selected_slot = slots.first().map(|s| s.id);
        state.selected_date = state.dates.first().copied();
        state.addresses = addresses;
        state.slots = slots;
        state.catalog = catalog;
        if state.phase == CheckoutPhase::Initializing {
            state.phase = CheckoutPhase::Ready;
        }
    }

    // =========================================================================
    // Selections
    // =========================================================================

    /// Select a delivery address from the fetched list.
    ///
    /// # Errors
    ///
    /// Returns `InvalidSelection` if the id is not among the fetched
    /// addresses.
    pub fn select_address(&self, id: AddressId) -> Result<(), CheckoutError> {
        let mut state = self.lock();
        if !state.addresses.iter().any(|a| a.id == id) {
            return Err(CheckoutError::InvalidSelection("address"));
        }
        state.selected_address = Some(id);
        Ok(())
    }

    /// Select a delivery slot from the fetched list.
    ///
    /// # Errors
    ///
    /// Returns `InvalidSelection` if the id is not among the fetched slots.
    pub fn select_slot(&self, id: SlotId) -> Result<(), CheckoutError> {
        let mut state = self.lock();
        if !state.slots.iter().any(|s| s.id == id) {
            return Err(CheckoutError::InvalidSelection("slot"));
        }
        state.selected_slot = Some(id);
        Ok(())
    }

    /// Select a delivery date from the offered dates.
    ///
    /// # Errors
    ///
    /// Returns `InvalidSelection` if the date was never offered by this
    /// session's window.
    pub fn select_date(&self, date: NaiveDate) -> Result<(), CheckoutError> {
        let mut state = self.lock();
        if !state.dates.contains(&date) {
            return Err(CheckoutError::InvalidSelection("date"));
        }
        state.selected_date = Some(date);
        Ok(())
    }

    /// Select a payment method. Always valid; the set is fixed.
    pub fn select_payment(&self, method: PaymentMethod) {
        self.lock().payment_method = method;
    }

    // =========================================================================
    // Views
    // =========================================================================

    /// Current phase of the session.
    #[must_use]
    pub fn phase(&self) -> CheckoutPhase {
        self.lock().phase
    }

    /// The fetched addresses.
    #[must_use]
    pub fn addresses(&self) -> Vec<Address> {
        self.lock().addresses.clone()
    }

    /// The fetched slots.
    #[must_use]
    pub fn slots(&self) -> Vec<Slot> {
        self.lock().slots.clone()
    }

    /// The frozen delivery window for this session.
    #[must_use]
    pub fn window(&self) -> DeliveryWindow {
        self.lock().window
    }

    /// The dates offered for selection.
    #[must_use]
    pub fn offerable_dates(&self) -> Vec<NaiveDate> {
        self.lock().dates.clone()
    }

    /// The currently selected address id.
    #[must_use]
    pub fn selected_address(&self) -> Option<AddressId> {
        self.lock().selected_address
    }

    /// The currently selected slot id.
    #[must_use]
    pub fn selected_slot(&self) -> Option<SlotId> {
        self.lock().selected_slot
    }

    /// The currently selected delivery date.
    #[must_use]
    pub fn selected_date(&self) -> Option<NaiveDate> {
        self.lock().selected_date
    }

    /// The currently selected payment method.
    #[must_use]
    pub fn payment_method(&self) -> PaymentMethod {
        self.lock().payment_method
    }

    /// Priced line items for the cart as it stands right now.
    #[must_use]
    pub fn line_items(&self) -> Vec<LineItem> {
        let state = self.lock();
        pricing::line_items(&self.inner.cart, &state.catalog)
    }

    /// Cart subtotal as it stands right now.
    #[must_use]
    pub fn subtotal(&self) -> Decimal {
        let state = self.lock();
        pricing::cart_subtotal(&self.inner.cart, &state.catalog)
    }

    /// Order total: subtotal plus the flat shipping fee.
    #[must_use]
    pub fn total(&self) -> Decimal {
        pricing::order_total(self.subtotal())
    }

    // =========================================================================
    // Submission
    // =========================================================================

    /// Validate selections, assemble the order from the live cart, and
    /// submit it.
    ///
    /// On success the cart is cleared and the session ends. On rejection or
    /// network failure the session returns to Ready with the cart intact.
    ///
    /// # Errors
    ///
    /// - [`CheckoutError::MissingSelection`] before any request is issued
    /// - [`CheckoutError::SubmissionInFlight`] if a confirm is already
    ///   running
    /// - [`CheckoutError::SessionClosed`] after a success
    /// - [`CheckoutError::Rejected`] / [`CheckoutError::Network`] from the
    ///   submission itself
    #[instrument(skip(self))]
    pub async fn confirm(&self) -> Result<(), CheckoutError> {
        // Validate and assemble under the lock, then release it before the
        // network call.
        let order = self.prepare_order()?;

        let result = self.inner.backend.submit_order(&order).await;

        let mut state = self.lock();
        match result {
            Ok(()) => {
                self.inner.cart.clear();
                state.phase = CheckoutPhase::Succeeded;
                info!(total = %order.total, items = order.items.len(), "order placed");
                Ok(())
            }
            Err(ApiError::Api { status, message }) => {
                state.phase = CheckoutPhase::Ready;
                let message = message.unwrap_or_else(|| GENERIC_FAILURE.to_string());
                warn!(status, %message, "order rejected by server");
                Err(CheckoutError::Rejected(message))
            }
            Err(err) => {
                state.phase = CheckoutPhase::Ready;
                warn!(error = %err, "order submission failed");
                Err(CheckoutError::Network(err))
            }
        }
    }

    /// Check preconditions and build the order payload from the cart and
    /// catalog as they stand at this moment. Flips the phase to Submitting
    /// on success.
    fn prepare_order(&self) -> Result<OrderRequest, CheckoutError> {
        let mut state = self.lock();
        match state.phase {
            CheckoutPhase::Submitting => return Err(CheckoutError::SubmissionInFlight),
            CheckoutPhase::Succeeded => return Err(CheckoutError::SessionClosed),
            CheckoutPhase::Initializing | CheckoutPhase::Ready => {}
        }

        let address = state
            .selected_address
            .and_then(|id| state.addresses.iter().find(|a| a.id == id))
            .ok_or(CheckoutError::MissingSelection("address"))?;
        let slot_id = state
            .selected_slot
            .ok_or(CheckoutError::MissingSelection("slot"))?;
        let slot_date = state
            .selected_date
            .ok_or(CheckoutError::MissingSelection("delivery date"))?;

        let items: Vec<_> = pricing::line_items(&self.inner.cart, &state.catalog)
            .iter()
            .map(LineItem::to_order_item)
            .collect();
        let subtotal: Decimal = items
            .iter()
            .map(|item| item.price * Decimal::from(item.quantity))
            .sum();

        let order = OrderRequest {
            total: pricing::order_total(subtotal),
            address: address.order_line(),
            slot_id,
            slot_date,
            payment_method: state.payment_method,
            items,
        };

        state.phase = CheckoutPhase::Submitting;
        Ok(order)
    }

    fn lock(&self) -> MutexGuard<'_, SessionState> {
        self.inner
            .state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

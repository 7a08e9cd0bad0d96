//! End-to-end tests for the checkout session state machine, driven through
//! an in-memory backend.

#![allow(clippy::unwrap_used)]

use std::sync::Arc;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use tokio::sync::Notify;

use greenkart_client::api::{ApiError, CheckoutBackend};
use greenkart_client::cart::CartStore;
use greenkart_client::checkout::{CheckoutError, CheckoutPhase, CheckoutSession};
use greenkart_core::{
    Address, AddressId, CategoryId, OrderRequest, PaymentMethod, Product, ProductId, Slot, SlotId,
};

// =============================================================================
// Fake backend
// =============================================================================

#[derive(Debug, Clone, Copy)]
enum SubmitOutcome {
    Accept,
    Reject(u16, bool),
    ConnectionLost,
}

struct FakeInner {
    products: Vec<Product>,
    addresses: Vec<Address>,
    slots: Vec<Slot>,
    fail_addresses: bool,
    fail_slots: bool,
    fail_products: bool,
    outcome: Mutex<SubmitOutcome>,
    submissions: Mutex<Vec<OrderRequest>>,
    submits_started: AtomicUsize,
    gate: Option<Notify>,
}

#[derive(Clone)]
struct FakeBackend(Arc<FakeInner>);

impl FakeBackend {
    fn new() -> Self {
        Self(Arc::new(FakeInner {
            products: vec![product(1, 100, None), product(2, 50, Some(40))],
            addresses: vec![address(10, false), address(11, true)],
            slots: vec![slot(5, "8 AM - 10 AM"), slot(6, "10 AM - 12 PM")],
            fail_addresses: false,
            fail_slots: false,
            fail_products: false,
            outcome: Mutex::new(SubmitOutcome::Accept),
            submissions: Mutex::new(Vec::new()),
            submits_started: AtomicUsize::new(0),
            gate: None,
        }))
    }

    fn with(f: impl FnOnce(&mut FakeInner)) -> Self {
        let Self(arc) = Self::new();
        let mut inner = Arc::into_inner(arc).unwrap();
        f(&mut inner);
        Self(Arc::new(inner))
    }

    fn set_outcome(&self, outcome: SubmitOutcome) {
        *self.0.outcome.lock().unwrap() = outcome;
    }

    fn submissions(&self) -> Vec<OrderRequest> {
        self.0.submissions.lock().unwrap().clone()
    }

    fn submits_started(&self) -> usize {
        self.0.submits_started.load(Ordering::SeqCst)
    }
}

impl CheckoutBackend for FakeBackend {
    async fn fetch_products(&self) -> Result<Vec<Product>, ApiError> {
        if self.0.fail_products {
            return Err(ApiError::Parse("products down".to_string()));
        }
        Ok(self.0.products.clone())
    }

    async fn fetch_addresses(&self) -> Result<Vec<Address>, ApiError> {
        if self.0.fail_addresses {
            return Err(ApiError::Api {
                status: 500,
                message: None,
            });
        }
        Ok(self.0.addresses.clone())
    }

    async fn fetch_slots(&self) -> Result<Vec<Slot>, ApiError> {
        if self.0.fail_slots {
            return Err(ApiError::Parse("slots down".to_string()));
        }
        Ok(self.0.slots.clone())
    }

    async fn submit_order(&self, order: &OrderRequest) -> Result<(), ApiError> {
        self.0.submits_started.fetch_add(1, Ordering::SeqCst);
        if let Some(gate) = &self.0.gate {
            gate.notified().await;
        }
        self.0.submissions.lock().unwrap().push(order.clone());
        match *self.0.outcome.lock().unwrap() {
            SubmitOutcome::Accept => Ok(()),
            SubmitOutcome::Reject(status, with_message) => Err(ApiError::Api {
                status,
                message: with_message.then(|| "Slot no longer available".to_string()),
            }),
            SubmitOutcome::ConnectionLost => Err(ApiError::Parse("connection reset".to_string())),
        }
    }
}

// =============================================================================
// Fixtures
// =============================================================================

fn product(id: i64, price: i64, sale: Option<i64>) -> Product {
    Product {
        id: ProductId::new(id),
        name: format!("Product {id}"),
        price: Decimal::new(price, 0),
        sale_price: sale.map(|s| Decimal::new(s, 0)),
        category_id: CategoryId::new(1),
        image_url: String::new(),
    }
}

fn address(id: i64, is_default: bool) -> Address {
    Address {
        id: AddressId::new(id),
        name: "Asha".to_string(),
        phone: "9876543210".to_string(),
        line1: "12 MG Road".to_string(),
        line2: None,
        line3: None,
        city: "Bengaluru".to_string(),
        state: "Karnataka".to_string(),
        pincode: "560001".to_string(),
        is_default,
    }
}

fn slot(id: i64, details: &str) -> Slot {
    Slot {
        id: SlotId::new(id),
        details: details.to_string(),
    }
}

fn morning() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 1, 31)
        .unwrap()
        .and_hms_opt(8, 0, 0)
        .unwrap()
}

fn evening() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 1, 31)
        .unwrap()
        .and_hms_opt(19, 45, 0)
        .unwrap()
}

/// Cart with 2x product 1 (100, no sale) and 3x product 2 (50, sale 40).
fn loaded_cart() -> CartStore {
    let cart = CartStore::new();
    cart.increment(ProductId::new(1));
    cart.increment(ProductId::new(1));
    for _ in 0..3 {
        cart.increment(ProductId::new(2));
    }
    cart
}

async fn ready_session(backend: FakeBackend, cart: CartStore) -> CheckoutSession<FakeBackend> {
    let checkout = CheckoutSession::new(backend, cart, morning());
    checkout.load().await;
    checkout
}

// =============================================================================
// Session init
// =============================================================================

#[tokio::test]
async fn load_applies_default_selections() {
    let checkout = ready_session(FakeBackend::new(), CartStore::new()).await;

    assert_eq!(checkout.phase(), CheckoutPhase::Ready);
    // Address 11 carries the default flag even though it is second in the
    // list; slot defaults to first; date defaults to earliest.
    assert_eq!(checkout.selected_address(), Some(AddressId::new(11)));
    assert_eq!(checkout.selected_slot(), Some(SlotId::new(5)));
    assert_eq!(
        checkout.selected_date(),
        NaiveDate::from_ymd_opt(2024, 1, 31)
    );
    assert_eq!(checkout.payment_method(), PaymentMethod::CashOnDelivery);
}

#[tokio::test]
async fn load_without_flagged_default_selects_first_address() {
    let backend = FakeBackend::with(|inner| {
        inner.addresses = vec![address(20, false), address(21, false)];
    });
    let checkout = ready_session(backend, CartStore::new()).await;
    assert_eq!(checkout.selected_address(), Some(AddressId::new(20)));
}

#[tokio::test]
async fn failed_address_fetch_does_not_block_slots_or_catalog() {
    let backend = FakeBackend::with(|inner| inner.fail_addresses = true);
    let checkout = ready_session(backend, loaded_cart()).await;

    assert_eq!(checkout.phase(), CheckoutPhase::Ready);
    assert!(checkout.addresses().is_empty());
    assert_eq!(checkout.selected_address(), None);
    // The other two collaborators still loaded.
    assert_eq!(checkout.slots().len(), 2);
    assert_eq!(checkout.subtotal(), Decimal::new(320, 0));
}

#[tokio::test]
async fn failed_catalog_fetch_leaves_catalog_empty_not_partial() {
    let backend = FakeBackend::with(|inner| inner.fail_products = true);
    let checkout = ready_session(backend, loaded_cart()).await;

    assert!(checkout.line_items().is_empty());
    assert_eq!(checkout.subtotal(), Decimal::ZERO);
    assert_eq!(checkout.selected_slot(), Some(SlotId::new(5)));
}

#[tokio::test]
async fn evening_session_offers_dates_from_tomorrow() {
    let checkout = CheckoutSession::new(FakeBackend::new(), CartStore::new(), evening());
    checkout.load().await;

    assert!(checkout.window().after_cutoff());
    let dates: Vec<String> = checkout
        .offerable_dates()
        .iter()
        .map(ToString::to_string)
        .collect();
    assert_eq!(dates, vec!["2024-02-01", "2024-02-02", "2024-02-03"]);
    assert_eq!(
        checkout.selected_date(),
        NaiveDate::from_ymd_opt(2024, 2, 1)
    );
}

// =============================================================================
// Validation
// =============================================================================

#[tokio::test]
async fn confirm_without_address_issues_no_request() {
    let backend = FakeBackend::with(|inner| inner.addresses = Vec::new());
    let checkout = ready_session(backend.clone(), loaded_cart()).await;

    let err = checkout.confirm().await.unwrap_err();
    assert!(matches!(err, CheckoutError::MissingSelection("address")));
    assert_eq!(backend.submits_started(), 0);
    assert_eq!(checkout.phase(), CheckoutPhase::Ready);
}

#[tokio::test]
async fn confirm_without_slot_issues_no_request() {
    let backend = FakeBackend::with(|inner| inner.slots = Vec::new());
    let checkout = ready_session(backend.clone(), loaded_cart()).await;

    let err = checkout.confirm().await.unwrap_err();
    assert!(matches!(err, CheckoutError::MissingSelection("slot")));
    assert_eq!(backend.submits_started(), 0);
}

// =============================================================================
// Submission
// =============================================================================

#[tokio::test]
async fn successful_order_clears_cart_and_closes_session() {
    let backend = FakeBackend::new();
    let cart = loaded_cart();
    let checkout = ready_session(backend.clone(), cart.clone()).await;

    checkout.confirm().await.unwrap();

    assert_eq!(checkout.phase(), CheckoutPhase::Succeeded);
    assert!(cart.is_empty());
    assert_eq!(checkout.subtotal(), Decimal::ZERO);

    // The session is terminal: a later confirm is rejected locally.
    let err = checkout.confirm().await.unwrap_err();
    assert!(matches!(err, CheckoutError::SessionClosed));
    assert_eq!(backend.submissions().len(), 1);
}

#[tokio::test]
async fn order_payload_matches_wire_contract() {
    let backend = FakeBackend::new();
    let checkout = ready_session(backend.clone(), loaded_cart()).await;
    checkout.select_payment(PaymentMethod::Upi);

    checkout.confirm().await.unwrap();

    let submissions = backend.submissions();
    let order = submissions.first().unwrap();
    // 2x100 + 3x40 = 320, plus the flat 30 shipping fee.
    assert_eq!(order.total, Decimal::new(350, 0));
    assert_eq!(order.address, "12 MG Road, Bengaluru - 560001");
    assert_eq!(order.slot_id, SlotId::new(5));
    assert_eq!(order.slot_date, NaiveDate::from_ymd_opt(2024, 1, 31).unwrap());
    assert_eq!(order.payment_method, PaymentMethod::Upi);

    assert_eq!(order.items.len(), 2);
    let first = order.items.first().unwrap();
    assert_eq!((first.id, first.quantity), (ProductId::new(1), 2));
    assert_eq!(first.price, Decimal::new(100, 0));
    let second = order.items.get(1).unwrap();
    assert_eq!((second.id, second.quantity), (ProductId::new(2), 3));
    // Effective (sale) unit price, not the base price.
    assert_eq!(second.price, Decimal::new(40, 0));
}

#[tokio::test]
async fn items_are_assembled_at_confirm_time() {
    let backend = FakeBackend::new();
    let cart = loaded_cart();
    let checkout = ready_session(backend.clone(), cart.clone()).await;

    // The user keeps shopping while checkout is open.
    cart.increment(ProductId::new(1));
    cart.decrement(ProductId::new(2));

    checkout.confirm().await.unwrap();

    let submissions = backend.submissions();
    let order = submissions.first().unwrap();
    let first = order.items.first().unwrap();
    let second = order.items.get(1).unwrap();
    assert_eq!(first.quantity, 3);
    assert_eq!(second.quantity, 2);
    // 3x100 + 2x40 + 30 shipping.
    assert_eq!(order.total, Decimal::new(410, 0));
}

#[tokio::test]
async fn rejection_surfaces_server_message_and_keeps_cart() {
    let backend = FakeBackend::new();
    backend.set_outcome(SubmitOutcome::Reject(400, true));
    let cart = loaded_cart();
    let checkout = ready_session(backend.clone(), cart.clone()).await;

    let err = checkout.confirm().await.unwrap_err();
    match err {
        CheckoutError::Rejected(message) => assert_eq!(message, "Slot no longer available"),
        other => panic!("unexpected error: {other:?}"),
    }
    assert!(!cart.is_empty());
    assert_eq!(checkout.phase(), CheckoutPhase::Ready);

    // Retrying with the same selections succeeds once the server relents.
    backend.set_outcome(SubmitOutcome::Accept);
    checkout.confirm().await.unwrap();
    assert!(cart.is_empty());
}

#[tokio::test]
async fn rejection_without_message_gets_generic_text() {
    let backend = FakeBackend::new();
    backend.set_outcome(SubmitOutcome::Reject(500, false));
    let checkout = ready_session(backend, loaded_cart()).await;

    let err = checkout.confirm().await.unwrap_err();
    match err {
        CheckoutError::Rejected(message) => assert_eq!(message, "Order placement failed"),
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn connection_failure_is_a_network_error_and_keeps_cart() {
    let backend = FakeBackend::new();
    backend.set_outcome(SubmitOutcome::ConnectionLost);
    let cart = loaded_cart();
    let checkout = ready_session(backend, cart.clone()).await;

    let err = checkout.confirm().await.unwrap_err();
    assert!(matches!(err, CheckoutError::Network(_)));
    assert!(!cart.is_empty());
    assert_eq!(checkout.phase(), CheckoutPhase::Ready);
}

#[tokio::test]
async fn second_confirm_while_in_flight_is_single_flight() {
    let backend = FakeBackend::with(|inner| inner.gate = Some(Notify::new()));
    let checkout = ready_session(backend.clone(), loaded_cart()).await;

    let first = tokio::spawn({
        let checkout = checkout.clone();
        async move { checkout.confirm().await }
    });

    // Let the first confirm reach the backend and park on the gate.
    while backend.submits_started() == 0 {
        tokio::task::yield_now().await;
    }

    let err = checkout.confirm().await.unwrap_err();
    assert!(matches!(err, CheckoutError::SubmissionInFlight));

    backend.0.gate.as_ref().unwrap().notify_one();
    first.await.unwrap().unwrap();

    assert_eq!(backend.submits_started(), 1);
    assert_eq!(backend.submissions().len(), 1);
    assert_eq!(checkout.phase(), CheckoutPhase::Succeeded);
}

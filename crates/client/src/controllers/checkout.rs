//! Checkout screen: addresses, totals, currency display, payment session,
//! order submission.

use std::sync::Arc;

use rust_decimal::Decimal;
use tokio::sync::watch;
use tracing::warn;

use clementine_core::Money;

use super::{TaskScope, drive, notice_channel};
use crate::models::{Address, ExchangeResult, LineItem, Order, PaymentIntent};
use crate::repositories::CheckoutRepository;
use crate::ui_state::{UiState, fetch_state};

/// State holder for the checkout screen.
pub struct CheckoutController {
    checkout: CheckoutRepository,
    /// Shop currency, used for totals and payment intents.
    currency_code: String,
    scope: TaskScope,
    converted_total: watch::Sender<UiState<ExchangeResult>>,
    payment: watch::Sender<UiState<PaymentIntent>>,
    placed: watch::Sender<UiState<Order>>,
    notice: watch::Sender<Option<String>>,
}

impl CheckoutController {
    /// Create the controller and refresh the cart and address list.
    #[must_use]
    pub fn new(checkout: CheckoutRepository, currency_code: String) -> Self {
        let (converted_total, _) = watch::channel(UiState::Loading);
        let (payment, _) = watch::channel(UiState::Loading);
        let (placed, _) = watch::channel(UiState::Loading);
        let controller = Self {
            checkout,
            currency_code,
            scope: TaskScope::new(),
            converted_total,
            payment,
            placed,
            notice: notice_channel(),
        };
        controller.refresh();
        controller
    }

    /// Observe the shipping-address candidates.
    #[must_use]
    pub fn addresses(&self) -> watch::Receiver<Arc<[Address]>> {
        self.checkout.addresses()
    }

    /// Observe the converted total.
    #[must_use]
    pub fn converted_total(&self) -> watch::Receiver<UiState<ExchangeResult>> {
        self.converted_total.subscribe()
    }

    /// Observe the payment-intent preparation.
    #[must_use]
    pub fn payment(&self) -> watch::Receiver<UiState<PaymentIntent>> {
        self.payment.subscribe()
    }

    /// Observe the order submission.
    #[must_use]
    pub fn placed_order(&self) -> watch::Receiver<UiState<Order>> {
        self.placed.subscribe()
    }

    /// Observe the latest user-facing message.
    #[must_use]
    pub fn notice(&self) -> watch::Receiver<Option<String>> {
        self.notice.subscribe()
    }

    /// The lines being checked out.
    #[must_use]
    pub fn cart_lines(&self) -> Vec<LineItem> {
        self.checkout.cart_lines()
    }

    /// The total in the shop currency.
    #[must_use]
    pub fn total(&self) -> Money {
        Money::new(self.checkout.subtotal(), self.currency_code.clone())
    }

    /// Re-fetch the cart and address list, in the background.
    pub fn refresh(&self) {
        let checkout = self.checkout.clone();
        let notice = self.notice.clone();
        self.scope.spawn(async move {
            if let Err(err) = checkout.refresh_cart().await {
                warn!(error = %err, "cart refresh failed");
                notice.send_replace(Some(err.user_message()));
            }
            if let Err(err) = checkout.refresh_addresses().await {
                warn!(error = %err, "address refresh failed");
                notice.send_replace(Some(err.user_message()));
            }
        });
    }

    /// Show the total in another currency.
    pub fn convert_total(&self, to: impl Into<String>) {
        let checkout = self.checkout.clone();
        let from = self.currency_code.clone();
        let to = to.into();
        let amount: Decimal = self.checkout.subtotal();
        drive(
            &self.scope,
            self.converted_total.clone(),
            fetch_state(async move { checkout.exchange_rate(&from, &to, amount).await }),
        );
    }

    /// Prepare a payment intent for the current total so the payment sheet
    /// can open.
    pub fn prepare_payment(&self) {
        let checkout = self.checkout.clone();
        let amount = self.total();
        drive(
            &self.scope,
            self.payment.clone(),
            fetch_state(async move { checkout.create_payment_intent(&amount).await }),
        );
    }

    /// Submit the order for the current cart, emptying the cart on
    /// success.
    pub fn place_order(&self) {
        let checkout = self.checkout.clone();
        drive(
            &self.scope,
            self.placed.clone(),
            fetch_state(async move {
                let lines = checkout.cart_lines();
                let order = checkout.make_order(lines).await?;
                checkout.clear_cart().await?;
                Ok(order)
            }),
        );
    }
}

//! Checkout: the facade the payment and order screens talk to.
//!
//! Composes the cart, orders, and address managers with the currency and
//! payment adapters. The payment-processor state (customer id, ephemeral
//! key, intent client secret) is persisted in the preference store - just
//! enough to resume a payment sheet, nothing more.

use std::sync::Arc;

use rust_decimal::Decimal;
use tokio::sync::watch;
use tracing::{info, instrument};

use clementine_core::Money;

use crate::error::ClientError;
use crate::managers::{AddressManager, CartManager, OrdersManager};
use crate::models::{Address, EphemeralKey, ExchangeResult, LineItem, Order, PaymentIntent};
use crate::prefs::{PaymentSession, PreferenceStore};
use crate::remote::{CurrencyApi, PaymentsApi};

/// Checkout operations.
#[derive(Clone)]
pub struct CheckoutRepository {
    cart: Arc<CartManager>,
    orders: Arc<OrdersManager>,
    addresses: Arc<AddressManager>,
    currency: Arc<dyn CurrencyApi>,
    payments: Arc<dyn PaymentsApi>,
    prefs: Arc<PreferenceStore>,
}

impl CheckoutRepository {
    /// Create the checkout facade over the managers and adapters.
    #[must_use]
    pub fn new(
        cart: Arc<CartManager>,
        orders: Arc<OrdersManager>,
        addresses: Arc<AddressManager>,
        currency: Arc<dyn CurrencyApi>,
        payments: Arc<dyn PaymentsApi>,
        prefs: Arc<PreferenceStore>,
    ) -> Self {
        Self {
            cart,
            orders,
            addresses,
            currency,
            payments,
            prefs,
        }
    }

    /// Observe the shipping-address candidates.
    #[must_use]
    pub fn addresses(&self) -> watch::Receiver<Arc<[Address]>> {
        self.addresses.subscribe()
    }

    /// Re-fetch the address list.
    ///
    /// # Errors
    ///
    /// Propagates the address manager's failure.
    pub async fn refresh_addresses(&self) -> Result<(), ClientError> {
        self.addresses.refresh().await
    }

    /// The lines being checked out.
    #[must_use]
    pub fn cart_lines(&self) -> Vec<LineItem> {
        self.cart.line_items()
    }

    /// Re-fetch the cart from its draft order.
    ///
    /// # Errors
    ///
    /// Propagates the cart manager's failure.
    pub async fn refresh_cart(&self) -> Result<(), ClientError> {
        self.cart.refresh().await
    }

    /// Sum of line totals in the shop currency.
    #[must_use]
    pub fn subtotal(&self) -> Decimal {
        self.cart.subtotal()
    }

    /// Submit the order for the given lines.
    ///
    /// # Errors
    ///
    /// Propagates the orders manager's failure.
    pub async fn make_order(&self, line_items: Vec<LineItem>) -> Result<Order, ClientError> {
        self.orders.place_order(line_items).await
    }

    /// Empty the cart after a completed purchase.
    ///
    /// # Errors
    ///
    /// Propagates the cart manager's failure.
    pub async fn clear_cart(&self) -> Result<(), ClientError> {
        self.cart.clear().await
    }

    /// Convert an amount between currencies for display.
    ///
    /// # Errors
    ///
    /// Propagates the currency adapter's failure.
    pub async fn exchange_rate(
        &self,
        from: &str,
        to: &str,
        amount: Decimal,
    ) -> Result<ExchangeResult, ClientError> {
        self.currency.exchange_rate(from, to, amount).await
    }

    /// The processor-side customer attached to this shopper, created on
    /// first use and persisted.
    ///
    /// # Errors
    ///
    /// Returns an error if creation or persistence fails.
    #[instrument(skip(self))]
    pub async fn ensure_payment_customer(&self) -> Result<String, ClientError> {
        if let Some(session) = self.prefs.payment_session() {
            return Ok(session.customer_id);
        }

        let customer = self.payments.create_customer().await?;
        info!(customer_id = %customer.id, "payment customer created");
        self.prefs.set_payment_session(PaymentSession {
            customer_id: customer.id.clone(),
            ephemeral_key_secret: None,
            payment_intent_client_secret: None,
        })?;
        Ok(customer.id)
    }

    /// Issue a fresh ephemeral key for the payment customer and persist
    /// its secret.
    ///
    /// # Errors
    ///
    /// Returns an error if key creation or persistence fails.
    #[instrument(skip(self))]
    pub async fn refresh_ephemeral_key(&self) -> Result<EphemeralKey, ClientError> {
        let customer_id = self.ensure_payment_customer().await?;
        let key = self.payments.create_ephemeral_key(&customer_id).await?;

        let mut session = self
            .prefs
            .payment_session()
            .unwrap_or(PaymentSession {
                customer_id: customer_id.clone(),
                ephemeral_key_secret: None,
                payment_intent_client_secret: None,
            });
        session.ephemeral_key_secret = Some(key.secret.clone());
        self.prefs.set_payment_session(session)?;
        Ok(key)
    }

    /// Create a payment intent for the amount, refreshing the ephemeral
    /// key first so the payment sheet can open immediately.
    ///
    /// # Errors
    ///
    /// Returns an error if any processor call or persistence fails.
    #[instrument(skip(self), fields(amount = %amount))]
    pub async fn create_payment_intent(&self, amount: &Money) -> Result<PaymentIntent, ClientError> {
        let customer_id = self.ensure_payment_customer().await?;
        self.refresh_ephemeral_key().await?;

        let intent = self
            .payments
            .create_payment_intent(
                &customer_id,
                amount.minor_units(),
                &amount.currency_code.to_lowercase(),
            )
            .await?;

        let mut session = self
            .prefs
            .payment_session()
            .unwrap_or(PaymentSession {
                customer_id,
                ephemeral_key_secret: None,
                payment_intent_client_secret: None,
            });
        session.payment_intent_client_secret = Some(intent.client_secret.clone());
        self.prefs.set_payment_session(session)?;
        Ok(intent)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;

    use crate::models::PaymentCustomer;

    use super::*;

    /// Payment stub counting customer creations.
    #[derive(Default)]
    struct StubPayments {
        customers_created: AtomicUsize,
    }

    #[async_trait]
    impl PaymentsApi for StubPayments {
        async fn create_customer(&self) -> Result<PaymentCustomer, ClientError> {
            self.customers_created.fetch_add(1, Ordering::SeqCst);
            Ok(PaymentCustomer {
                id: "cus_test_1".to_owned(),
            })
        }

        async fn create_ephemeral_key(&self, customer_id: &str) -> Result<EphemeralKey, ClientError> {
            Ok(EphemeralKey {
                id: "ek_1".to_owned(),
                secret: format!("ek_secret_for_{customer_id}"),
            })
        }

        async fn create_payment_intent(
            &self,
            customer_id: &str,
            amount_minor: i64,
            currency: &str,
        ) -> Result<PaymentIntent, ClientError> {
            Ok(PaymentIntent {
                id: "pi_1".to_owned(),
                client_secret: format!("pi_secret_{customer_id}"),
                amount: amount_minor,
                currency: currency.to_owned(),
            })
        }
    }

    fn prefs() -> Arc<PreferenceStore> {
        let path = std::env::temp_dir().join(format!("clementine-co-{}.json", uuid::Uuid::new_v4()));
        Arc::new(PreferenceStore::open(path).unwrap())
    }

    fn payments_only(
        payments: Arc<dyn PaymentsApi>,
        prefs: Arc<PreferenceStore>,
    ) -> CheckoutRepository {
        struct NoCurrency;

        #[async_trait]
        impl CurrencyApi for NoCurrency {
            async fn exchange_rate(
                &self,
                _: &str,
                _: &str,
                _: Decimal,
            ) -> Result<ExchangeResult, ClientError> {
                unreachable!("not used in payment tests")
            }
        }

        struct NoDraftOrders;

        #[async_trait]
        impl crate::remote::DraftOrdersApi for NoDraftOrders {
            async fn create(
                &self,
                _: Vec<LineItem>,
            ) -> Result<crate::models::DraftOrder, ClientError> {
                unreachable!("not used in payment tests")
            }
            async fn fetch(
                &self,
                _: clementine_core::DraftOrderId,
            ) -> Result<crate::models::DraftOrder, ClientError> {
                unreachable!("not used in payment tests")
            }
            async fn set_line_items(
                &self,
                _: clementine_core::DraftOrderId,
                _: Vec<LineItem>,
            ) -> Result<crate::models::DraftOrder, ClientError> {
                unreachable!("not used in payment tests")
            }
            async fn delete(&self, _: clementine_core::DraftOrderId) -> Result<(), ClientError> {
                unreachable!("not used in payment tests")
            }
        }

        struct NoOrders;

        #[async_trait]
        impl crate::remote::OrdersApi for NoOrders {
            async fn create(&self, _: crate::models::NewOrder) -> Result<Order, ClientError> {
                unreachable!("not used in payment tests")
            }
            async fn for_customer(
                &self,
                _: clementine_core::CustomerId,
            ) -> Result<Vec<Order>, ClientError> {
                unreachable!("not used in payment tests")
            }
        }

        struct NoCustomers;

        #[async_trait]
        impl crate::remote::CustomersApi for NoCustomers {
            async fn customer(
                &self,
                _: clementine_core::CustomerId,
            ) -> Result<crate::models::Customer, ClientError> {
                unreachable!("not used in payment tests")
            }
            async fn customer_by_email(
                &self,
                _: &str,
            ) -> Result<Option<crate::models::Customer>, ClientError> {
                unreachable!("not used in payment tests")
            }
            async fn create_customer(
                &self,
                _: crate::models::CustomerDraft,
            ) -> Result<crate::models::Customer, ClientError> {
                unreachable!("not used in payment tests")
            }
            async fn addresses(
                &self,
                _: clementine_core::CustomerId,
            ) -> Result<Vec<Address>, ClientError> {
                unreachable!("not used in payment tests")
            }
            async fn create_address(
                &self,
                _: clementine_core::CustomerId,
                _: crate::models::NewAddress,
            ) -> Result<Address, ClientError> {
                unreachable!("not used in payment tests")
            }
            async fn update_address(
                &self,
                _: clementine_core::CustomerId,
                _: clementine_core::AddressId,
                _: crate::models::NewAddress,
            ) -> Result<Address, ClientError> {
                unreachable!("not used in payment tests")
            }
            async fn delete_address(
                &self,
                _: clementine_core::CustomerId,
                _: clementine_core::AddressId,
            ) -> Result<(), ClientError> {
                unreachable!("not used in payment tests")
            }
        }

        CheckoutRepository::new(
            Arc::new(CartManager::new(Arc::new(NoDraftOrders), Arc::clone(&prefs))),
            Arc::new(OrdersManager::new(Arc::new(NoOrders), Arc::clone(&prefs))),
            Arc::new(AddressManager::new(Arc::new(NoCustomers), Arc::clone(&prefs))),
            Arc::new(NoCurrency),
            payments,
            prefs,
        )
    }

    #[tokio::test]
    async fn payment_customer_is_created_once_and_reused() {
        let payments = Arc::new(StubPayments::default());
        let checkout = payments_only(Arc::clone(&payments) as Arc<dyn PaymentsApi>, prefs());

        let first = checkout.ensure_payment_customer().await.unwrap();
        let second = checkout.ensure_payment_customer().await.unwrap();

        assert_eq!(first, second);
        assert_eq!(payments.customers_created.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn intent_creation_persists_resume_fields() {
        let store = prefs();
        let checkout = payments_only(Arc::new(StubPayments::default()), Arc::clone(&store));

        let amount = Money::new(rust_decimal::Decimal::new(2999, 2), "USD".to_owned());
        let intent = checkout.create_payment_intent(&amount).await.unwrap();
        assert_eq!(intent.amount, 2999);
        assert_eq!(intent.currency, "usd");

        let session = store.payment_session().unwrap();
        assert_eq!(session.customer_id, "cus_test_1");
        assert!(session.ephemeral_key_secret.is_some());
        assert_eq!(
            session.payment_intent_client_secret.as_deref(),
            Some("pi_secret_cus_test_1")
        );
    }
}

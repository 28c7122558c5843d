//! The composition root.
//!
//! [`App`] is a single explicit object constructed once at startup: it
//! opens the preference store, builds the vendor clients, and wires the
//! repositories and managers together, handing out `Arc` handles and
//! per-screen controllers. Nothing in the crate is a global; everything a
//! screen needs flows down from here.

use std::sync::Arc;

use clementine_core::{CollectionId, ProductId};

use crate::config::AppConfig;
use crate::controllers::{
    AddressesController, AuthController, BrandController, CartController, CheckoutController,
    HomeController, ProductDetailsController, WishlistController,
};
use crate::error::ClientError;
use crate::managers::{AddressManager, CartManager, OrdersManager, WishlistManager};
use crate::prefs::PreferenceStore;
use crate::remote::{
    AdminClient, CurrencyRemote, CustomerRemote, DraftOrderRemote, IdentityRemote, OrderRemote,
    PaymentRemote, ProductRemote,
};
use crate::repositories::{AuthRepository, CheckoutRepository, ProductRepository};

/// Application composition root.
///
/// Cheaply cloneable via `Arc`; clones share every client, repository, and
/// manager.
#[derive(Clone)]
pub struct App {
    inner: Arc<AppInner>,
}

struct AppInner {
    config: AppConfig,
    prefs: Arc<PreferenceStore>,
    products: ProductRepository,
    auth: AuthRepository,
    checkout: CheckoutRepository,
    cart: Arc<CartManager>,
    wishlist: Arc<WishlistManager>,
    addresses: Arc<AddressManager>,
    orders: Arc<OrdersManager>,
}

impl App {
    /// Build the application from configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the preference store cannot be opened.
    pub fn new(config: AppConfig) -> Result<Self, ClientError> {
        let prefs = Arc::new(PreferenceStore::open(&config.prefs_path)?);

        let admin = AdminClient::new(&config);
        let product_remote = Arc::new(ProductRemote::new(admin.clone()));
        let customer_remote = Arc::new(CustomerRemote::new(admin.clone()));
        let draft_order_remote = Arc::new(DraftOrderRemote::new(admin.clone()));
        let order_remote = Arc::new(OrderRemote::new(admin));
        let identity = Arc::new(IdentityRemote::new(&config));
        let payments = Arc::new(PaymentRemote::new(&config));
        let currency = Arc::new(CurrencyRemote::new(&config));

        let cart = Arc::new(CartManager::new(
            draft_order_remote,
            Arc::clone(&prefs),
        ));
        let wishlist = Arc::new(WishlistManager::new());
        let addresses = Arc::new(AddressManager::new(
            Arc::clone(&customer_remote),
            Arc::clone(&prefs),
        ));
        let orders = Arc::new(OrdersManager::new(order_remote, Arc::clone(&prefs)));

        let products = ProductRepository::new(product_remote);
        let auth = AuthRepository::new(customer_remote, identity, Arc::clone(&prefs));
        let checkout = CheckoutRepository::new(
            Arc::clone(&cart),
            Arc::clone(&orders),
            Arc::clone(&addresses),
            currency,
            payments,
            Arc::clone(&prefs),
        );

        Ok(Self {
            inner: Arc::new(AppInner {
                config,
                prefs,
                products,
                auth,
                checkout,
                cart,
                wishlist,
                addresses,
                orders,
            }),
        })
    }

    /// The application configuration.
    #[must_use]
    pub fn config(&self) -> &AppConfig {
        &self.inner.config
    }

    /// The preference store.
    #[must_use]
    pub fn prefs(&self) -> &Arc<PreferenceStore> {
        &self.inner.prefs
    }

    /// The catalog repository.
    #[must_use]
    pub fn products(&self) -> &ProductRepository {
        &self.inner.products
    }

    /// The authentication repository.
    #[must_use]
    pub fn auth(&self) -> &AuthRepository {
        &self.inner.auth
    }

    /// The checkout facade.
    #[must_use]
    pub fn checkout(&self) -> &CheckoutRepository {
        &self.inner.checkout
    }

    /// The cart manager.
    #[must_use]
    pub fn cart(&self) -> &Arc<CartManager> {
        &self.inner.cart
    }

    /// The wishlist manager.
    #[must_use]
    pub fn wishlist(&self) -> &Arc<WishlistManager> {
        &self.inner.wishlist
    }

    /// The address manager.
    #[must_use]
    pub fn addresses(&self) -> &Arc<AddressManager> {
        &self.inner.addresses
    }

    /// The orders manager.
    #[must_use]
    pub fn orders(&self) -> &Arc<OrdersManager> {
        &self.inner.orders
    }

    // =========================================================================
    // Controller factories (one per screen)
    // =========================================================================

    /// Controller for the home screen.
    #[must_use]
    pub fn home_controller(&self) -> HomeController {
        HomeController::new(
            self.inner.products.clone(),
            Arc::clone(&self.inner.wishlist),
            Arc::clone(&self.inner.cart),
        )
    }

    /// Controller for one brand's product grid.
    #[must_use]
    pub fn brand_controller(&self, collection: CollectionId) -> BrandController {
        BrandController::new(self.inner.products.clone(), collection)
    }

    /// Controller for one product's detail screen.
    #[must_use]
    pub fn product_details_controller(&self, product: ProductId) -> ProductDetailsController {
        ProductDetailsController::new(
            self.inner.products.clone(),
            Arc::clone(&self.inner.wishlist),
            Arc::clone(&self.inner.cart),
            product,
        )
    }

    /// Controller for the authentication screens.
    #[must_use]
    pub fn auth_controller(&self) -> AuthController {
        AuthController::new(self.inner.auth.clone())
    }

    /// Controller for the cart screen.
    #[must_use]
    pub fn cart_controller(&self) -> CartController {
        CartController::new(Arc::clone(&self.inner.cart))
    }

    /// Controller for the wishlist screen.
    #[must_use]
    pub fn wishlist_controller(&self) -> WishlistController {
        WishlistController::new(Arc::clone(&self.inner.wishlist))
    }

    /// Controller for the address book screen.
    #[must_use]
    pub fn addresses_controller(&self) -> AddressesController {
        AddressesController::new(Arc::clone(&self.inner.addresses))
    }

    /// Controller for the checkout screen.
    #[must_use]
    pub fn checkout_controller(&self) -> CheckoutController {
        CheckoutController::new(
            self.inner.checkout.clone(),
            self.inner.config.shop_currency.clone(),
        )
    }
}

//! Stub of the platform's versioned admin REST API.
//!
//! Mirrors the resource shapes and envelope JSON the real admin API speaks:
//! smart collections, products, customers, addresses, draft orders, and
//! orders, all behind the access-token header check. State is plain data
//! behind a mutex so tests can seed fixtures and assert on writes.

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::Arc;

use axum::extract::{Path, Query, Request, State};
use axum::http::StatusCode;
use axum::middleware::{self, Next};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use rust_decimal::Decimal;
use tokio::sync::{Mutex, watch};
use url::Url;

use clementine_client::models::{
    Address, AddressEnvelope, AddressesEnvelope, Brand, Customer, CustomerEnvelope,
    CustomersEnvelope, DraftOrder, DraftOrderEnvelope, Image, LineItem, Order, OrderEnvelope,
    OrdersEnvelope, Product, ProductEnvelope, ProductsEnvelope, SmartCollectionsEnvelope, Variant,
};
use clementine_core::{
    AddressId, CollectionId, CustomerId, DraftOrderId, DraftOrderStatus, FinancialStatus, OrderId,
    ProductId, VariantId,
};

/// The access token the stub accepts; anything else is a 401.
pub const STUB_ADMIN_TOKEN: &str = "shpat_stub_token";

/// Everything the stub platform remembers.
#[derive(Debug, Default)]
pub struct PlatformData {
    pub brands: Vec<Brand>,
    pub products: Vec<Product>,
    /// Collection membership: collection id → product ids.
    pub collection_products: HashMap<i64, Vec<i64>>,
    pub customers: Vec<Customer>,
    /// Addresses per customer id.
    pub addresses: HashMap<i64, Vec<Address>>,
    pub draft_orders: HashMap<i64, DraftOrder>,
    /// Placed orders with the customer they belong to.
    pub orders: Vec<(i64, Order)>,
    /// Force catalog reads to fail with a 500.
    pub fail_catalog: bool,
    /// Force customer creation to fail with a 422.
    pub fail_customer_create: bool,
    next_id: i64,
}

impl PlatformData {
    fn next_id(&mut self) -> i64 {
        self.next_id += 1;
        1000 + self.next_id
    }

    /// The variant behind a line item, for price/title enrichment.
    fn variant(&self, id: VariantId) -> Option<(&Product, &Variant)> {
        self.products.iter().find_map(|product| {
            product
                .variants
                .iter()
                .find(|variant| variant.id == id)
                .map(|variant| (product, variant))
        })
    }

    /// The platform fills in title and price from the variant; the client
    /// only sends ids and quantities.
    fn enrich_lines(&self, lines: Vec<LineItem>) -> Vec<LineItem> {
        lines
            .into_iter()
            .map(|mut line| {
                if let Some((product, variant)) = self.variant(line.variant_id) {
                    line.product_id = Some(product.id);
                    line.title = format!("{} - {}", product.title, variant.title);
                    line.price = variant.price;
                }
                line
            })
            .collect()
    }
}

type SharedData = Arc<Mutex<PlatformData>>;

/// The running stub platform.
pub struct StubPlatform {
    pub addr: SocketAddr,
    pub state: SharedData,
    shutdown: watch::Sender<bool>,
}

impl StubPlatform {
    /// Start the stub on an ephemeral port.
    pub async fn start() -> Self {
        let state: SharedData = Arc::default();

        let api = Router::new()
            .route("/smart_collections.json", get(list_brands))
            .route("/products.json", get(list_products))
            .route("/products/{id}.json", get(get_product))
            .route("/customers.json", post(create_customer))
            .route("/customers/search.json", get(search_customers))
            .route("/customers/{id}.json", get(get_customer))
            .route(
                "/customers/{id}/addresses.json",
                get(list_addresses).post(create_address),
            )
            .route(
                "/customers/{id}/addresses/{address_id}.json",
                axum::routing::put(update_address).delete(delete_address),
            )
            .route("/draft_orders.json", post(create_draft_order))
            .route(
                "/draft_orders/{id}.json",
                get(get_draft_order)
                    .put(update_draft_order)
                    .delete(delete_draft_order),
            )
            .route("/orders.json", get(list_orders).post(create_order));

        let router = Router::new()
            .nest("/admin/api/{version}", api)
            .layer(middleware::from_fn(require_token))
            .with_state(Arc::clone(&state));

        let (addr, shutdown) = super::serve(router).await;
        Self {
            addr,
            state,
            shutdown,
        }
    }

    /// Base URL for `AppConfig::admin_url`.
    #[must_use]
    pub fn base_url(&self) -> Url {
        super::base_url(self.addr)
    }

    /// Seed two brands and three products (one shared collection layout
    /// every catalog test can rely on).
    pub async fn seed_catalog(&self) {
        let mut data = self.state.lock().await;

        data.brands = vec![
            brand(10, "ADIDAS"),
            brand(20, "VANS"),
        ];
        data.products = vec![
            product(1, "Trail Runner", "ADIDAS", "shoes", &[(11, "40", "79.00", 5)]),
            product(2, "Court Classic", "ADIDAS", "shoes", &[(21, "41", "59.00", 3)]),
            product(3, "Logo Tee", "VANS", "shirts", &[(31, "M", "19.00", 12)]),
        ];
        data.collection_products = HashMap::from([(10, vec![1, 2]), (20, vec![3])]);
    }

    /// Seed one customer record, returning it.
    pub async fn seed_customer(&self, id: i64, email: &str) -> Customer {
        let customer = Customer {
            id: CustomerId::new(id),
            email: email.to_owned(),
            first_name: Some("Stub".to_owned()),
            last_name: Some("Shopper".to_owned()),
            phone: None,
            addresses: Vec::new(),
        };
        self.state.lock().await.customers.push(customer.clone());
        customer
    }
}

impl Drop for StubPlatform {
    fn drop(&mut self) {
        let _ = self.shutdown.send(true);
    }
}

fn brand(id: i64, title: &str) -> Brand {
    Brand {
        id: CollectionId::new(id),
        title: title.to_owned(),
        image: Some(Image {
            src: format!("https://cdn.stub/{id}.png"),
        }),
    }
}

fn product(
    id: i64,
    title: &str,
    vendor: &str,
    product_type: &str,
    variants: &[(i64, &str, &str, i64)],
) -> Product {
    Product {
        id: ProductId::new(id),
        title: title.to_owned(),
        vendor: vendor.to_owned(),
        product_type: product_type.to_owned(),
        variants: variants
            .iter()
            .map(|(variant_id, variant_title, price, stock)| Variant {
                id: VariantId::new(*variant_id),
                product_id: ProductId::new(id),
                title: (*variant_title).to_owned(),
                price: price.parse().expect("fixture price"),
                inventory_quantity: *stock,
            })
            .collect(),
        images: Vec::new(),
        image: None,
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Handlers
// ─────────────────────────────────────────────────────────────────────────────

async fn require_token(request: Request, next: Next) -> Response {
    let token = request
        .headers()
        .get("X-Shopify-Access-Token")
        .and_then(|value| value.to_str().ok());
    if token == Some(STUB_ADMIN_TOKEN) {
        next.run(request).await
    } else {
        (StatusCode::UNAUTHORIZED, "invalid access token").into_response()
    }
}

fn not_found() -> Response {
    (StatusCode::NOT_FOUND, r#"{"errors":"Not Found"}"#).into_response()
}

async fn list_brands(State(state): State<SharedData>) -> Response {
    let data = state.lock().await;
    if data.fail_catalog {
        return (StatusCode::INTERNAL_SERVER_ERROR, "stub failure").into_response();
    }
    Json(SmartCollectionsEnvelope {
        smart_collections: data.brands.clone(),
    })
    .into_response()
}

async fn list_products(
    State(state): State<SharedData>,
    Query(params): Query<HashMap<String, String>>,
) -> Response {
    let data = state.lock().await;
    if data.fail_catalog {
        return (StatusCode::INTERNAL_SERVER_ERROR, "stub failure").into_response();
    }

    let mut products = data.products.clone();
    if let Some(collection) = params
        .get("collection_id")
        .and_then(|raw| raw.parse::<i64>().ok())
    {
        let members = data
            .collection_products
            .get(&collection)
            .cloned()
            .unwrap_or_default();
        products.retain(|product| members.contains(&product.id.as_i64()));
    }
    if let Some(product_type) = params.get("product_type") {
        products.retain(|product| &product.product_type == product_type);
    }
    if let Some(limit) = params.get("limit").and_then(|raw| raw.parse::<usize>().ok()) {
        products.truncate(limit);
    }

    Json(ProductsEnvelope { products }).into_response()
}

async fn get_product(
    State(state): State<SharedData>,
    Path((_version, id)): Path<(String, i64)>,
) -> Response {
    let data = state.lock().await;
    data.products
        .iter()
        .find(|product| product.id.as_i64() == id)
        .map_or_else(not_found, |product| {
            Json(ProductEnvelope {
                product: product.clone(),
            })
            .into_response()
        })
}

async fn create_customer(
    State(state): State<SharedData>,
    Json(body): Json<serde_json::Value>,
) -> Response {
    let mut data = state.lock().await;
    if data.fail_customer_create {
        return (
            StatusCode::UNPROCESSABLE_ENTITY,
            r#"{"errors":{"email":["has already been taken"]}}"#,
        )
            .into_response();
    }

    let draft = &body["customer"];
    let id = data.next_id();
    let customer = Customer {
        id: CustomerId::new(id),
        email: draft["email"].as_str().unwrap_or_default().to_owned(),
        first_name: draft["first_name"].as_str().map(str::to_owned),
        last_name: draft["last_name"].as_str().map(str::to_owned),
        phone: draft["phone"].as_str().map(str::to_owned),
        addresses: Vec::new(),
    };
    data.customers.push(customer.clone());
    (StatusCode::CREATED, Json(CustomerEnvelope { customer })).into_response()
}

async fn search_customers(
    State(state): State<SharedData>,
    Query(params): Query<HashMap<String, String>>,
) -> Response {
    let data = state.lock().await;
    let email = params
        .get("query")
        .and_then(|raw| raw.strip_prefix("email:"))
        .unwrap_or_default();
    Json(CustomersEnvelope {
        customers: data
            .customers
            .iter()
            .filter(|customer| customer.email == email)
            .cloned()
            .collect(),
    })
    .into_response()
}

async fn get_customer(
    State(state): State<SharedData>,
    Path((_version, id)): Path<(String, i64)>,
) -> Response {
    let data = state.lock().await;
    data.customers
        .iter()
        .find(|customer| customer.id.as_i64() == id)
        .map_or_else(not_found, |customer| {
            Json(CustomerEnvelope {
                customer: customer.clone(),
            })
            .into_response()
        })
}

async fn list_addresses(
    State(state): State<SharedData>,
    Path((_version, customer)): Path<(String, i64)>,
) -> Response {
    let data = state.lock().await;
    Json(AddressesEnvelope {
        addresses: data.addresses.get(&customer).cloned().unwrap_or_default(),
    })
    .into_response()
}

async fn create_address(
    State(state): State<SharedData>,
    Path((_version, customer)): Path<(String, i64)>,
    Json(body): Json<serde_json::Value>,
) -> Response {
    let mut data = state.lock().await;
    let id = data.next_id();
    let entries = data.addresses.entry(customer).or_default();
    let address = Address {
        id: AddressId::new(id),
        customer_id: CustomerId::new(customer),
        address1: body["address"]["address1"].as_str().map(str::to_owned),
        address2: body["address"]["address2"].as_str().map(str::to_owned),
        city: body["address"]["city"].as_str().map(str::to_owned),
        country: body["address"]["country"].as_str().map(str::to_owned),
        zip: body["address"]["zip"].as_str().map(str::to_owned),
        phone: body["address"]["phone"].as_str().map(str::to_owned),
        default: entries.is_empty(),
    };
    entries.push(address.clone());
    (
        StatusCode::CREATED,
        Json(AddressEnvelope {
            customer_address: address,
        }),
    )
        .into_response()
}

async fn update_address(
    State(state): State<SharedData>,
    Path((_version, customer, address_id)): Path<(String, i64, i64)>,
    Json(body): Json<serde_json::Value>,
) -> Response {
    let mut data = state.lock().await;
    let Some(address) = data
        .addresses
        .entry(customer)
        .or_default()
        .iter_mut()
        .find(|address| address.id.as_i64() == address_id)
    else {
        return not_found();
    };

    if let Some(city) = body["address"]["city"].as_str() {
        address.city = Some(city.to_owned());
    }
    if let Some(address1) = body["address"]["address1"].as_str() {
        address.address1 = Some(address1.to_owned());
    }
    Json(AddressEnvelope {
        customer_address: address.clone(),
    })
    .into_response()
}

async fn delete_address(
    State(state): State<SharedData>,
    Path((_version, customer, address_id)): Path<(String, i64, i64)>,
) -> Response {
    let mut data = state.lock().await;
    data.addresses
        .entry(customer)
        .or_default()
        .retain(|address| address.id.as_i64() != address_id);
    Json(serde_json::json!({})).into_response()
}

async fn create_draft_order(
    State(state): State<SharedData>,
    Json(body): Json<serde_json::Value>,
) -> Response {
    let mut data = state.lock().await;
    let Ok(lines) = serde_json::from_value::<Vec<LineItem>>(body["draft_order"]["line_items"].clone())
    else {
        return (StatusCode::UNPROCESSABLE_ENTITY, "bad line items").into_response();
    };

    let id = data.next_id();
    let draft = DraftOrder {
        id: DraftOrderId::new(id),
        status: DraftOrderStatus::Open,
        line_items: data.enrich_lines(lines),
        currency: Some("USD".to_owned()),
        total_price: None,
    };
    data.draft_orders.insert(id, draft.clone());
    (
        StatusCode::CREATED,
        Json(DraftOrderEnvelope { draft_order: draft }),
    )
        .into_response()
}

async fn get_draft_order(
    State(state): State<SharedData>,
    Path((_version, id)): Path<(String, i64)>,
) -> Response {
    let data = state.lock().await;
    data.draft_orders.get(&id).map_or_else(not_found, |draft| {
        Json(DraftOrderEnvelope {
            draft_order: draft.clone(),
        })
        .into_response()
    })
}

async fn update_draft_order(
    State(state): State<SharedData>,
    Path((_version, id)): Path<(String, i64)>,
    Json(body): Json<serde_json::Value>,
) -> Response {
    let mut data = state.lock().await;
    if !data.draft_orders.contains_key(&id) {
        return not_found();
    }
    let Ok(lines) = serde_json::from_value::<Vec<LineItem>>(body["draft_order"]["line_items"].clone())
    else {
        return (StatusCode::UNPROCESSABLE_ENTITY, "bad line items").into_response();
    };

    let line_items = data.enrich_lines(lines);
    let Some(draft) = data.draft_orders.get_mut(&id) else {
        return not_found();
    };
    draft.line_items = line_items;
    Json(DraftOrderEnvelope {
        draft_order: draft.clone(),
    })
    .into_response()
}

async fn delete_draft_order(
    State(state): State<SharedData>,
    Path((_version, id)): Path<(String, i64)>,
) -> Response {
    let mut data = state.lock().await;
    if data.draft_orders.remove(&id).is_none() {
        return not_found();
    }
    Json(serde_json::json!({})).into_response()
}

async fn create_order(
    State(state): State<SharedData>,
    Json(body): Json<serde_json::Value>,
) -> Response {
    let mut data = state.lock().await;
    let Ok(lines) = serde_json::from_value::<Vec<LineItem>>(body["order"]["line_items"].clone())
    else {
        return (StatusCode::UNPROCESSABLE_ENTITY, "bad line items").into_response();
    };
    let customer = body["order"]["customer"]["id"].as_i64().unwrap_or_default();
    let financial_status = serde_json::from_value::<FinancialStatus>(
        body["order"]["financial_status"].clone(),
    )
    .unwrap_or_default();

    let line_items = data.enrich_lines(lines);
    let total_price: Decimal = line_items.iter().map(LineItem::total).sum();
    let id = data.next_id();
    let order = Order {
        id: OrderId::new(id),
        financial_status,
        line_items,
        currency: Some("USD".to_owned()),
        total_price,
        created_at: None,
    };
    data.orders.push((customer, order.clone()));
    (StatusCode::CREATED, Json(OrderEnvelope { order })).into_response()
}

async fn list_orders(
    State(state): State<SharedData>,
    Query(params): Query<HashMap<String, String>>,
) -> Response {
    let data = state.lock().await;
    let customer = params
        .get("customer_id")
        .and_then(|raw| raw.parse::<i64>().ok());
    Json(OrdersEnvelope {
        orders: data
            .orders
            .iter()
            .filter(|(owner, _)| customer.is_none_or(|id| *owner == id))
            .map(|(_, order)| order.clone())
            .collect(),
    })
    .into_response()
}

//! Repository reads over real HTTP: the tri-state contract end to end.

use futures::StreamExt;

use clementine_core::CollectionId;
use clementine_integration_tests::TestContext;

#[tokio::test]
async fn successful_read_emits_loading_then_success() {
    let ctx = TestContext::start().await;
    ctx.platform.seed_catalog().await;

    let states: Vec<_> = ctx.app.products().brands().collect().await;

    assert_eq!(states.len(), 2);
    assert!(states[0].is_loading());
    let brands = states[1].success().expect("brands load");
    assert_eq!(brands.len(), 2);
    assert_eq!(brands[0].title, "ADIDAS");
    assert!(states[1].error().is_none());
}

#[tokio::test]
async fn failing_read_emits_loading_then_error_and_never_success() {
    let ctx = TestContext::start().await;
    ctx.platform.state.lock().await.fail_catalog = true;

    let states: Vec<_> = ctx.app.products().featured_products().collect().await;

    assert_eq!(states.len(), 2);
    assert!(states[0].is_loading());
    assert!(states[1].success().is_none());
    let cause = states[1].error().expect("error state");
    assert!(!cause.is_network(), "a 500 is a server answer, not transport");
}

#[tokio::test]
async fn brand_products_honor_collection_and_type_filters() {
    let ctx = TestContext::start().await;
    ctx.platform.seed_catalog().await;
    let products = ctx.app.products();

    let states: Vec<_> = products.brand_products(CollectionId::new(10)).collect().await;
    assert_eq!(states[1].success().expect("brand load").len(), 2);

    let states: Vec<_> = products
        .brand_products_by_type(CollectionId::new(10), "shoes".to_owned())
        .collect()
        .await;
    assert_eq!(states[1].success().expect("typed load").len(), 2);

    let states: Vec<_> = products
        .brand_products_by_type(CollectionId::new(20), "shoes".to_owned())
        .collect()
        .await;
    assert!(states[1].success().expect("typed load").is_empty());
}

#[tokio::test]
async fn single_product_arrives_with_variants() {
    let ctx = TestContext::start().await;
    ctx.platform.seed_catalog().await;

    let states: Vec<_> = ctx
        .app
        .products()
        .product(clementine_core::ProductId::new(1))
        .collect()
        .await;

    let product = states[1].success().expect("product load");
    assert_eq!(product.title, "Trail Runner");
    assert_eq!(product.variants.len(), 1);
    assert_eq!(product.variants[0].inventory_quantity, 5);
}

#[tokio::test]
async fn catalog_reads_are_served_from_cache_after_first_fetch() {
    let ctx = TestContext::start().await;
    ctx.platform.seed_catalog().await;

    let states: Vec<_> = ctx.app.products().brands().collect().await;
    assert!(states[1].success().is_some());

    // The platform going down must not affect an already-cached read.
    ctx.platform.state.lock().await.fail_catalog = true;
    let states: Vec<_> = ctx.app.products().brands().collect().await;
    assert!(states[1].success().is_some(), "second read comes from cache");
}

//! Cart invariants against the draft-order stub.

use clementine_core::VariantId;
use clementine_integration_tests::TestContext;

#[tokio::test]
async fn duplicate_adds_merge_into_one_line() {
    let ctx = TestContext::start().await;
    ctx.platform.seed_catalog().await;
    let cart = ctx.app.cart();

    cart.add_item(VariantId::new(11)).await.expect("first add");
    cart.add_item(VariantId::new(11)).await.expect("second add");

    assert_eq!(cart.count(), 1);
    assert_eq!(cart.quantity_of(VariantId::new(11)), 2);

    // The remote draft order agrees: one line, quantity 2.
    let data = ctx.platform.state.lock().await;
    let draft = data.draft_orders.values().next().expect("one draft order");
    assert_eq!(draft.line_items.len(), 1);
    assert_eq!(draft.line_items[0].quantity, 2);
}

#[tokio::test]
async fn decrement_at_quantity_one_removes_the_line() {
    let ctx = TestContext::start().await;
    ctx.platform.seed_catalog().await;
    let cart = ctx.app.cart();

    cart.add_item(VariantId::new(11)).await.expect("add shoes");
    cart.add_item(VariantId::new(31)).await.expect("add tee");
    cart.decrease(VariantId::new(11)).await.expect("decrement");

    assert!(!cart.contains(VariantId::new(11)));
    assert_eq!(cart.quantity_of(VariantId::new(11)), 0);
    assert_eq!(cart.count(), 1);
}

#[tokio::test]
async fn removing_the_last_line_deletes_the_draft_order() {
    let ctx = TestContext::start().await;
    ctx.platform.seed_catalog().await;
    let cart = ctx.app.cart();

    cart.add_item(VariantId::new(31)).await.expect("add");
    assert_eq!(ctx.platform.state.lock().await.draft_orders.len(), 1);

    cart.remove_item(VariantId::new(31)).await.expect("remove");
    assert_eq!(cart.count(), 0);
    assert!(ctx.platform.state.lock().await.draft_orders.is_empty());
}

#[tokio::test]
async fn the_platform_prices_the_lines() {
    let ctx = TestContext::start().await;
    ctx.platform.seed_catalog().await;
    let cart = ctx.app.cart();

    cart.add_item(VariantId::new(11)).await.expect("add");

    // The client sent only the variant id; price and title came back from
    // the platform's catalog.
    let lines = cart.line_items();
    assert_eq!(lines[0].price, "79.00".parse().expect("decimal"));
    assert!(lines[0].title.contains("Trail Runner"));
    assert_eq!(cart.subtotal(), "79.00".parse().expect("decimal"));
}

#[tokio::test]
async fn the_cart_survives_an_app_restart() {
    let ctx = TestContext::start().await;
    ctx.platform.seed_catalog().await;

    ctx.app.cart().add_item(VariantId::new(11)).await.expect("add");
    ctx.app.cart().add_item(VariantId::new(31)).await.expect("add");

    // A new composition root over the same preference file picks the same
    // draft order back up.
    let restarted = ctx.restarted_app();
    assert_eq!(restarted.cart().count(), 0, "fresh manager starts empty");

    restarted.cart().refresh().await.expect("refresh");
    assert_eq!(restarted.cart().count(), 2);
    assert_eq!(restarted.cart().quantity_of(VariantId::new(11)), 1);
}

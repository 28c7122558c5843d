//! Registration ordering, login, and session routing over real HTTP.

use futures::StreamExt;

use clementine_core::{CustomerId, Email};
use clementine_client::repositories::auth::{RegistrationDraft, StartDestination};
use clementine_integration_tests::TestContext;

fn draft(email: &str, password: &str) -> RegistrationDraft {
    RegistrationDraft {
        first_name: "Ada".to_owned(),
        last_name: "Lovelace".to_owned(),
        email: Email::parse(email).expect("valid email"),
        phone: None,
        password: password.to_owned(),
    }
}

#[tokio::test]
async fn registration_creates_platform_customer_then_credential() {
    let ctx = TestContext::start().await;

    let states: Vec<_> = ctx
        .app
        .auth()
        .register(draft("new@shopper.example", "secret1"))
        .collect()
        .await;
    let session = states[1].success().expect("registration succeeds");

    // Both halves exist and are linked by the customer id attribute.
    let platform = ctx.platform.state.lock().await;
    let customer = platform
        .customers
        .iter()
        .find(|customer| customer.email == "new@shopper.example")
        .expect("platform customer created");
    let identity = ctx.identity.state.lock().await;
    let account = identity
        .accounts
        .get("new@shopper.example")
        .expect("credential created");
    assert_eq!(account.customer_id, Some(customer.id.as_i64()));
    assert_eq!(session.customer_id, customer.id);

    assert_eq!(ctx.app.auth().start_destination(), StartDestination::Home);
}

#[tokio::test]
async fn platform_failure_means_no_identity_call_is_attempted() {
    let ctx = TestContext::start().await;
    ctx.platform.state.lock().await.fail_customer_create = true;

    let states: Vec<_> = ctx
        .app
        .auth()
        .register(draft("new@shopper.example", "secret1"))
        .collect()
        .await;

    assert!(states[1].error().is_some());
    assert!(
        ctx.identity.state.lock().await.accounts.is_empty(),
        "no credential may exist when the platform said no"
    );
    assert_eq!(ctx.app.auth().start_destination(), StartDestination::Login);
}

#[tokio::test]
async fn identity_failure_leaves_the_platform_customer_behind() {
    let ctx = TestContext::start().await;
    // The email is already taken on the identity side only.
    ctx.identity.seed_account("taken@shopper.example", "other", None).await;

    let states: Vec<_> = ctx
        .app
        .auth()
        .register(draft("taken@shopper.example", "secret1"))
        .collect()
        .await;

    // Published result is Error, yet the platform customer now exists:
    // there is no compensating delete in the registration flow.
    assert!(states[1].error().is_some());
    let platform = ctx.platform.state.lock().await;
    assert!(
        platform
            .customers
            .iter()
            .any(|customer| customer.email == "taken@shopper.example"),
        "platform customer outlives the failed credential step"
    );
    assert_eq!(ctx.app.auth().start_destination(), StartDestination::Login);
}

#[tokio::test]
async fn login_resolves_the_linked_customer_and_routes_home() {
    let ctx = TestContext::start().await;
    ctx.platform.seed_customer(123, "a@b.com").await;
    ctx.identity.seed_account("a@b.com", "secret1", Some(123)).await;

    assert_eq!(ctx.app.auth().start_destination(), StartDestination::Login);

    let states: Vec<_> = ctx
        .app
        .auth()
        .login(Email::parse("a@b.com").expect("email"), "secret1".to_owned())
        .collect()
        .await;

    let session = states[1].success().expect("login succeeds");
    assert_eq!(session.customer_id, CustomerId::new(123));
    assert_eq!(ctx.app.auth().start_destination(), StartDestination::Home);

    // The session survives a restart; routing stays Home without any
    // network traffic.
    let restarted = ctx.restarted_app();
    assert_eq!(restarted.auth().start_destination(), StartDestination::Home);
    assert_eq!(
        restarted
            .auth()
            .current_session()
            .expect("stored session")
            .customer_id,
        CustomerId::new(123)
    );
}

#[tokio::test]
async fn wrong_password_publishes_error_and_no_session() {
    let ctx = TestContext::start().await;
    ctx.platform.seed_customer(123, "a@b.com").await;
    ctx.identity.seed_account("a@b.com", "secret1", Some(123)).await;

    let states: Vec<_> = ctx
        .app
        .auth()
        .login(Email::parse("a@b.com").expect("email"), "nope".to_owned())
        .collect()
        .await;

    let cause = states[1].error().expect("login fails");
    assert_eq!(cause.user_message(), "Email or password is incorrect.");
    assert_eq!(ctx.app.auth().start_destination(), StartDestination::Login);
}

#[tokio::test]
async fn first_federated_login_creates_and_links_a_platform_customer() {
    let ctx = TestContext::start().await;

    let states: Vec<_> = ctx
        .app
        .auth()
        .login_federated("fed:fed@shopper.example".to_owned())
        .collect()
        .await;
    let session = states[1].success().expect("federated login succeeds");

    let platform = ctx.platform.state.lock().await;
    let customer = platform
        .customers
        .iter()
        .find(|customer| customer.email == "fed@shopper.example")
        .expect("platform customer created for federated account");
    assert_eq!(session.customer_id, customer.id);

    let identity = ctx.identity.state.lock().await;
    let account = identity
        .accounts
        .get("fed@shopper.example")
        .expect("federated account exists");
    assert_eq!(account.customer_id, Some(customer.id.as_i64()));
    assert!(account.password.is_none());
}

#[tokio::test]
async fn logout_returns_routing_to_login() {
    let ctx = TestContext::start().await;
    ctx.platform.seed_customer(123, "a@b.com").await;
    ctx.identity.seed_account("a@b.com", "secret1", Some(123)).await;

    let _states: Vec<_> = ctx
        .app
        .auth()
        .login(Email::parse("a@b.com").expect("email"), "secret1".to_owned())
        .collect()
        .await;
    assert_eq!(ctx.app.auth().start_destination(), StartDestination::Home);

    ctx.app.auth().logout().expect("logout");
    assert_eq!(ctx.app.auth().start_destination(), StartDestination::Login);
    assert!(ctx.app.auth().current_session().is_none());
}

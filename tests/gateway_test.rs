//! End-to-end behaviour of the gateway over a real store

use futures::future::join_all;
use std::sync::Arc;
use std::time::Duration;
use userdesk::{
    GatewayConfig, SimClock, UserCreateInput, UserGateway, UserStore, UserUpdateInput,
};

fn init_logging() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter("debug")
        .with_test_writer()
        .try_init();
}

fn sim_gateway() -> (UserGateway, SimClock) {
    let clock = SimClock::new();
    let store = UserStore::with_clock(Arc::new(clock.clone()));
    (
        UserGateway::from_store(store, GatewayConfig::immediate()),
        clock,
    )
}

/// Seed set → create → update → delete → duplicate create.
#[tokio::test]
async fn test_alice_scenario() {
    init_logging();
    let (gateway, clock) = sim_gateway();

    let listed = gateway.list_users().await;
    assert_eq!(listed.data.as_ref().map(Vec::len), Some(3));

    let created = gateway
        .create_user(UserCreateInput::new("Alice Johnson", "alice@example.com", 30))
        .await;
    assert!(created.success, "create failed: {:?}", created.error);
    let alice = created.data.unwrap();
    assert!(!alice.id.is_empty());
    assert_eq!(alice.age, 30);
    assert_eq!(alice.created_at, alice.updated_at);

    let fetched = gateway.get_user(&alice.id).await;
    assert_eq!(fetched.data.as_ref(), Some(&alice));

    clock.advance_ms(1_500);
    let updated = gateway
        .update_user(&alice.id, UserUpdateInput::age(31))
        .await
        .data
        .unwrap();
    assert_eq!(updated.age, 31);
    assert_eq!(updated.name, "Alice Johnson");
    assert_eq!(updated.email, "alice@example.com");
    assert_eq!(updated.created_at, alice.created_at);
    assert!(updated.updated_at > updated.created_at);

    let deleted = gateway.delete_user(&alice.id).await;
    assert!(deleted.success);
    let users = gateway.list_users().await.data.unwrap();
    assert_eq!(users.len(), 3);
    assert!(users.iter().all(|u| u.id != alice.id));

    let duplicate = gateway
        .create_user(UserCreateInput::new("X", "john@example.com", 20))
        .await;
    assert!(!duplicate.success);
    assert_eq!(duplicate.error.as_deref(), Some("Email already exists"));
    assert_eq!(gateway.list_users().await.data.unwrap().len(), 3);
}

#[tokio::test]
async fn test_not_found_for_every_id_operation() {
    init_logging();
    let (gateway, _) = sim_gateway();
    let expected = Some("User with ID missing not found");

    assert_eq!(gateway.get_user("missing").await.error.as_deref(), expected);
    assert_eq!(
        gateway
            .update_user("missing", UserUpdateInput::name("Nobody"))
            .await
            .error
            .as_deref(),
        expected
    );
    assert_eq!(gateway.delete_user("missing").await.error.as_deref(), expected);
    assert_eq!(gateway.list_users().await.data.unwrap().len(), 3);
}

#[tokio::test]
async fn test_reset_twice_yields_seed_set() {
    init_logging();
    let (gateway, clock) = sim_gateway();
    let seed = gateway.list_users().await.data.unwrap();

    gateway
        .create_user(UserCreateInput::new("Temp", "temp@example.com", 50))
        .await;
    gateway.update_user("1", UserUpdateInput::name("Johnny")).await;
    clock.advance_ms(60_000);

    gateway.reset_all().await;
    let first = gateway.list_users().await.data.unwrap();
    gateway.reset_all().await;
    let second = gateway.list_users().await.data.unwrap();

    assert_eq!(first, seed);
    assert_eq!(second, seed);
}

/// Concurrent creates racing for one email: exactly one wins.
#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_creates_keep_email_unique() {
    init_logging();
    let (gateway, _) = sim_gateway();

    let attempts = (0..16).map(|i| {
        let gateway = gateway.clone();
        async move {
            gateway
                .create_user(UserCreateInput::new(format!("Racer {i}"), "race@example.com", 20))
                .await
        }
    });
    let results = tokio::time::timeout(Duration::from_secs(5), join_all(attempts))
        .await
        .expect("concurrent creates timed out");

    assert_eq!(results.iter().filter(|r| r.success).count(), 1);
    assert!(results
        .iter()
        .filter(|r| !r.success)
        .all(|r| r.error.as_deref() == Some("Email already exists")));
    assert_eq!(gateway.list_users().await.data.unwrap().len(), 4);
}

#[tokio::test(start_paused = true)]
async fn test_back_to_back_calls_each_pay_the_delay() {
    let store = UserStore::with_clock(Arc::new(SimClock::new()));
    let gateway = UserGateway::from_store(store, GatewayConfig::with_delay_ms(200).unwrap());
    let start = tokio::time::Instant::now();

    gateway.delete_user("3").await;
    let users = gateway.list_users().await.data.unwrap();

    assert_eq!(users.len(), 2);
    assert!(start.elapsed() >= Duration::from_millis(400));
}

/// Callers outside an async context can drive the gateway on a throwaway runtime.
#[test]
fn test_blocking_caller_can_drive_gateway() {
    let (gateway, _) = sim_gateway();

    let resp = tokio_test::block_on(gateway.get_user("2"));

    assert!(resp.success);
    assert_eq!(resp.data.unwrap().name, "Jane Smith");
}

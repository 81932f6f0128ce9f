mod support;

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use ledgerwatch::app::Freshness;
use ledgerwatch::domain::{Block, ConnectionStatus, Effect, LoadScope};
use ledgerwatch::testkit::{self, Call, ScriptedClient, LATEST_BLOCK, PEER_COUNT};

use support::wiring::{recorded, TIMEOUT_SECS};

fn stale_age() -> Duration {
    Duration::from_secs(TIMEOUT_SECS + 30)
}

#[tokio::test]
async fn lifecycle_fresh_stale_fresh_down_up() {
    let client = Arc::new(ScriptedClient::fresh());
    let (monitor, sink) = recorded(&client);

    // Fresh on first contact.
    let report = monitor.tick().await.settle().await;
    assert_eq!(report.freshness, Some(Freshness::Recovered));
    assert!(monitor.is_ready());

    // Daemon stops producing blocks.
    let now = u64::try_from(Utc::now().timestamp()).unwrap();
    client.set_latest(Block::new(LATEST_BLOCK, now - stale_age().as_secs()));
    sink.clear();
    let report = monitor.tick().await.settle().await;
    assert_eq!(report.freshness, Some(Freshness::Stale));
    assert!(!monitor.is_ready());
    assert_eq!(monitor.status(), ConnectionStatus::Connected);
    assert!(sink.contains(&Effect::TriggerLoad(LoadScope::AddressesOnly)));

    // Chain catches up.
    client.advance_chain(Duration::ZERO);
    sink.clear();
    let report = monitor.tick().await.settle().await;
    assert_eq!(report.freshness, Some(Freshness::Recovered));
    assert!(monitor.is_ready());
    assert!(sink.contains(&Effect::TriggerLoad(LoadScope::Full)));

    // Daemon goes away.
    client.set_available(false);
    sink.clear();
    let report = monitor.tick().await.settle().await;
    assert!(!report.available);
    assert_eq!(monitor.status(), ConnectionStatus::Failed);
    assert!(!monitor.is_ready());
    assert_eq!(
        sink.effects(),
        vec![
            Effect::SetStatus(ConnectionStatus::Failed),
            Effect::SetReady(false),
            Effect::HoldLoading,
        ]
    );

    // And comes back.
    client.set_available(true);
    sink.clear();
    let report = monitor.tick().await.settle().await;
    assert!(report.was_down);
    assert_eq!(report.freshness, Some(Freshness::Recovered));
    assert_eq!(monitor.status(), ConnectionStatus::Connected);
    assert!(monitor.is_ready());
    assert_eq!(client.active_registrations(), 1);
}

#[tokio::test]
async fn ready_implies_connected_across_every_tick() {
    let client = Arc::new(ScriptedClient::fresh());
    let (monitor, _sink) = recorded(&client);

    for available in [true, false, false, true, true, false, true] {
        client.set_available(available);
        monitor.tick().await.settle().await;
        if monitor.is_ready() {
            assert_eq!(monitor.status(), ConnectionStatus::Connected);
        }
        let expected = if available {
            ConnectionStatus::Connected
        } else {
            ConnectionStatus::Failed
        };
        assert_eq!(monitor.status(), expected);
    }
}

#[tokio::test]
async fn at_most_one_subscription_across_reconnects() {
    let client = Arc::new(ScriptedClient::fresh());
    let (monitor, _sink) = recorded(&client);

    for _ in 0..3 {
        client.set_available(true);
        monitor.tick().await.settle().await;
        monitor.tick().await.settle().await;
        client.set_available(false);
        monitor.tick().await.settle().await;
        assert!(client.active_registrations() <= 1);
    }
    assert!(monitor.is_subscribed());
    assert_eq!(client.active_registrations(), 1);
}

#[tokio::test]
async fn partial_metric_failure_keeps_other_metrics() {
    let client = Arc::new(ScriptedClient::fresh());
    client.fail(Call::ClientVersion);
    client.fail(Call::GasPrice);
    let (monitor, _sink) = recorded(&client);

    monitor.tick().await.settle().await;

    let metrics = monitor.snapshot().metrics;
    assert_eq!(metrics.block_number, Some(LATEST_BLOCK));
    assert_eq!(metrics.peer_count, Some(PEER_COUNT));
    assert!(metrics.client_version.is_none());
    assert!(metrics.gas_price.is_none());
    assert!(monitor.is_ready());
}

#[tokio::test]
async fn snapshot_serializes_for_external_readers() {
    let client = Arc::new(ScriptedClient::fresh());
    let (monitor, _sink) = recorded(&client);
    monitor.tick().await.settle().await;

    let json = serde_json::to_value(monitor.snapshot()).unwrap();
    assert_eq!(json["status"], "connected");
    assert_eq!(json["ready"], true);
    assert_eq!(json["subscription_active"], true);
    assert_eq!(json["metrics"]["block_number"], LATEST_BLOCK);
}

#[tokio::test]
async fn run_loop_stops_on_shutdown_and_drops_subscription() {
    let client = Arc::new(ScriptedClient::fresh());
    let (monitor, _sink) = recorded(&client);
    monitor.update_config(testkit::config::fast_polling());

    let handle = monitor.spawn();
    tokio::time::sleep(Duration::from_millis(60)).await;
    handle.shutdown().await;

    assert!(client.availability_checks() >= 2);
    assert!(!monitor.is_subscribed());
    assert_eq!(client.active_registrations(), 0);
    assert_eq!(
        client.stop_reasons().last().cloned().flatten().as_deref(),
        Some("monitor shutdown")
    );
}

//! Tick loop behavior on a paused clock.

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

use std::sync::Arc;
use std::time::Duration;

use tokio_util::sync::CancellationToken;

use mongo_statsd_core::mapper::GAUGE_COUNT;
use mongo_statsd_core::status::StatusSnapshot;
use mongo_statsd_exporter::config::FetchErrorPolicy;
use mongo_statsd_exporter::scheduler::Scheduler;

mod common;
use common::{fetch_error, settle, RecordingSink, ScriptedSource};

const PERIOD: Duration = Duration::from_secs(5);

fn scheduler(
    policy: FetchErrorPolicy,
    source: &Arc<ScriptedSource>,
    sink: &Arc<RecordingSink>,
) -> Scheduler {
    Scheduler::new(PERIOD, policy, source.clone(), sink.clone())
}

#[tokio::test(start_paused = true)]
async fn one_cycle_per_tick_and_none_after_shutdown() {
    let source = Arc::new(ScriptedSource::default());
    let sink = Arc::new(RecordingSink::default());
    let token = CancellationToken::new();
    let handle = tokio::spawn(scheduler(FetchErrorPolicy::Skip, &source, &sink).run(token.clone()));

    settle().await;
    assert_eq!(source.fetches(), 0, "first tick fires one period after start");

    for n in 1..=3 {
        tokio::time::advance(PERIOD).await;
        settle().await;
        assert_eq!(source.fetches(), n);
        assert_eq!(sink.sent_len(), n * GAUGE_COUNT);
    }

    token.cancel();
    let summary = handle.await.unwrap().unwrap();
    assert_eq!(summary.ticks_ok, 3);
    assert_eq!(summary.gauges_sent, (3 * GAUGE_COUNT) as u64);
    assert_eq!(sink.closes(), 1);

    tokio::time::advance(PERIOD * 10).await;
    settle().await;
    assert_eq!(source.fetches(), 3);
}

#[tokio::test(start_paused = true)]
async fn shutdown_before_first_tick_runs_nothing() {
    let source = Arc::new(ScriptedSource::default());
    let sink = Arc::new(RecordingSink::default());
    let token = CancellationToken::new();
    token.cancel();

    let summary = scheduler(FetchErrorPolicy::Skip, &source, &sink)
        .run(token)
        .await
        .unwrap();

    assert_eq!(summary.ticks(), 0);
    assert_eq!(source.fetches(), 0);
    assert_eq!(sink.sent_len(), 0);
    assert_eq!(sink.closes(), 1);
}

#[tokio::test(start_paused = true)]
async fn in_flight_tick_completes_before_shutdown() {
    let source = Arc::new(ScriptedSource::slow(Duration::from_secs(2)));
    let sink = Arc::new(RecordingSink::default());
    let token = CancellationToken::new();
    let handle = tokio::spawn(scheduler(FetchErrorPolicy::Skip, &source, &sink).run(token.clone()));
    settle().await;

    tokio::time::advance(PERIOD).await;
    settle().await;
    assert_eq!(source.fetches(), 1);
    assert_eq!(sink.sent_len(), 0, "fetch still sleeping");

    token.cancel();
    let summary = handle.await.unwrap().unwrap();

    assert_eq!(summary.ticks_ok, 1);
    assert_eq!(sink.sent_len(), GAUGE_COUNT);
    assert_eq!(sink.closes(), 1);
    assert_eq!(source.fetches(), 1);
}

#[tokio::test(start_paused = true)]
async fn fetch_error_is_skipped_under_skip_policy() {
    let mut live = StatusSnapshot::default();
    live.connections.current = 5;
    let source = Arc::new(ScriptedSource::new(vec![fetch_error("connection refused"), Ok(live)]));
    let sink = Arc::new(RecordingSink::default());
    let token = CancellationToken::new();
    let handle = tokio::spawn(scheduler(FetchErrorPolicy::Skip, &source, &sink).run(token.clone()));
    settle().await;

    tokio::time::advance(PERIOD).await;
    settle().await;
    assert_eq!(sink.sent_len(), 0);

    tokio::time::advance(PERIOD).await;
    settle().await;
    assert_eq!(sink.sent_len(), GAUGE_COUNT);
    assert_eq!(sink.sent()[0], ("connections.current".to_string(), 5));

    token.cancel();
    let summary = handle.await.unwrap().unwrap();
    assert_eq!(summary.fetch_errors, 1);
    assert_eq!(summary.ticks_ok, 1);
}

#[tokio::test(start_paused = true)]
async fn fetch_error_stops_the_loop_under_exit_policy() {
    let source = Arc::new(ScriptedSource::new(vec![fetch_error("no reachable servers")]));
    let sink = Arc::new(RecordingSink::default());
    let token = CancellationToken::new();
    let handle = tokio::spawn(scheduler(FetchErrorPolicy::Exit, &source, &sink).run(token.clone()));
    settle().await;

    tokio::time::advance(PERIOD).await;
    settle().await;

    let err = handle.await.unwrap().unwrap_err();
    assert_eq!(err.kind().as_str(), "FETCH");
    assert_eq!(sink.sent_len(), 0);
    assert_eq!(sink.closes(), 1);
    assert!(!token.is_cancelled());
}

#[tokio::test(start_paused = true)]
async fn send_error_is_logged_and_loop_continues() {
    let source = Arc::new(ScriptedSource::default());
    let sink = Arc::new(RecordingSink::failing_on("mem.resident"));
    let token = CancellationToken::new();
    let handle = tokio::spawn(scheduler(FetchErrorPolicy::Skip, &source, &sink).run(token.clone()));
    settle().await;

    for _ in 0..2 {
        tokio::time::advance(PERIOD).await;
        settle().await;
    }

    token.cancel();
    let summary = handle.await.unwrap().unwrap();
    assert_eq!(source.fetches(), 2);
    assert_eq!(summary.send_errors, 2);
    assert_eq!(summary.ticks_ok, 0);
    // gauges before mem.resident went out each tick, nothing after it
    assert_eq!(sink.sent_len(), 2 * 9);
    assert!(sink.sent().iter().all(|(name, _)| !name.starts_with("global_lock")));
}

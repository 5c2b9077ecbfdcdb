use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use engine_logging::MemoryReporter;
use recipe_core::ReadinessState;
use recipe_engine::{
    ApiError, ApiErrorKind, HealthProbe, PollSettings, ReadinessPoller, PROBE_CONTEXT,
};
use tokio::time::Instant;

/// Replays scripted outcomes, then keeps answering "not ready".
struct ScriptedProbe {
    calls: AtomicUsize,
    script: Mutex<VecDeque<Result<bool, ApiError>>>,
    latency: Duration,
}

impl ScriptedProbe {
    fn new(script: Vec<Result<bool, ApiError>>) -> Self {
        Self {
            calls: AtomicUsize::new(0),
            script: Mutex::new(script.into()),
            latency: Duration::ZERO,
        }
    }

    fn never_ready() -> Self {
        Self::new(Vec::new())
    }

    fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait::async_trait]
impl HealthProbe for ScriptedProbe {
    async fn probe(&self) -> Result<bool, ApiError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
        self.script.lock().unwrap().pop_front().unwrap_or(Ok(false))
    }
}

fn network_error() -> ApiError {
    ApiError {
        kind: ApiErrorKind::Network,
        message: "connection refused".to_string(),
    }
}

#[tokio::test(start_paused = true)]
async fn times_out_after_thirty_probes() {
    let probe = Arc::new(ScriptedProbe::never_ready());
    let reporter = Arc::new(MemoryReporter::new());
    let started = Instant::now();

    let handle = ReadinessPoller::start(probe.clone(), PollSettings::default(), reporter);
    let terminal = handle.wait_terminal().await;

    assert_eq!(terminal, Some(ReadinessState::timed_out()));
    assert_eq!(
        handle.state(),
        ReadinessState::Failed {
            reason: "timeout".to_string()
        }
    );
    assert_eq!(probe.calls(), 30);
    assert_eq!(started.elapsed(), Duration::from_secs(60));

    tokio::time::sleep(Duration::from_secs(30)).await;
    assert_eq!(probe.calls(), 30);
}

#[tokio::test(start_paused = true)]
async fn ready_on_third_probe_stops_polling() {
    let probe = Arc::new(ScriptedProbe::new(vec![Ok(false), Ok(false), Ok(true)]));
    let reporter = Arc::new(MemoryReporter::new());
    let started = Instant::now();

    let handle = ReadinessPoller::start(probe.clone(), PollSettings::default(), reporter);
    let terminal = handle.wait_terminal().await;

    assert_eq!(terminal, Some(ReadinessState::Ready));
    assert_eq!(started.elapsed(), Duration::from_secs(4));
    assert_eq!(probe.calls(), 3);

    tokio::time::sleep(Duration::from_secs(20)).await;
    assert_eq!(probe.calls(), 3);
    assert_eq!(handle.state(), ReadinessState::Ready);
}

#[tokio::test(start_paused = true)]
async fn probe_errors_are_reported_and_retried() {
    let probe = Arc::new(ScriptedProbe::new(vec![
        Err(network_error()),
        Err(network_error()),
        Ok(true),
    ]));
    let reporter = Arc::new(MemoryReporter::new());

    let handle = ReadinessPoller::start(probe.clone(), PollSettings::default(), reporter.clone());

    assert_eq!(handle.wait_terminal().await, Some(ReadinessState::Ready));
    assert_eq!(probe.calls(), 3);
    assert_eq!(reporter.count(PROBE_CONTEXT), 2);
}

#[tokio::test(start_paused = true)]
async fn cancel_before_retry_freezes_state() {
    let probe = Arc::new(ScriptedProbe::never_ready());
    let reporter = Arc::new(MemoryReporter::new());

    let handle = ReadinessPoller::start(probe.clone(), PollSettings::default(), reporter);
    tokio::time::sleep(Duration::from_millis(500)).await;
    handle.cancel();

    tokio::time::sleep(Duration::from_secs(120)).await;
    assert!(handle.is_cancelled());
    assert_eq!(handle.state(), ReadinessState::Loading);
    assert_eq!(probe.calls(), 1);
    assert_eq!(handle.wait_terminal().await, None);
}

#[tokio::test(start_paused = true)]
async fn cancel_during_in_flight_probe_suppresses_result() {
    let probe = Arc::new(ScriptedProbe::new(vec![Ok(true)]).with_latency(Duration::from_secs(1)));
    let reporter = Arc::new(MemoryReporter::new());

    let handle = ReadinessPoller::start(probe.clone(), PollSettings::default(), reporter);
    tokio::time::sleep(Duration::from_millis(500)).await;
    assert_eq!(probe.calls(), 1);
    handle.cancel();

    tokio::time::sleep(Duration::from_secs(10)).await;
    assert_eq!(handle.state(), ReadinessState::Loading);
    assert_eq!(probe.calls(), 1);
}

#[tokio::test(start_paused = true)]
async fn slow_probes_never_overlap() {
    let probe = Arc::new(ScriptedProbe::never_ready().with_latency(Duration::from_secs(3)));
    let reporter = Arc::new(MemoryReporter::new());
    let settings = PollSettings {
        max_duration: Duration::from_secs(20),
        interval: Duration::from_secs(2),
    };

    let handle = ReadinessPoller::start(probe.clone(), settings, reporter);
    assert_eq!(handle.wait_terminal().await, Some(ReadinessState::timed_out()));
    // Each round takes 3s of probing plus a 2s wait: probes at 0, 5, 10, 15.
    assert_eq!(probe.calls(), 4);
}

#[tokio::test(start_paused = true)]
async fn slow_check_past_budget_fails_without_extra_wait() {
    let probe = Arc::new(ScriptedProbe::never_ready().with_latency(Duration::from_secs(25)));
    let reporter = Arc::new(MemoryReporter::new());
    let settings = PollSettings {
        max_duration: Duration::from_secs(20),
        interval: Duration::from_secs(2),
    };
    let started = Instant::now();

    let handle = ReadinessPoller::start(probe.clone(), settings, reporter);
    assert_eq!(handle.wait_terminal().await, Some(ReadinessState::timed_out()));
    assert_eq!(started.elapsed(), Duration::from_secs(25));
    assert_eq!(probe.calls(), 1);
}

#[tokio::test(start_paused = true)]
async fn dropping_handle_cancels_poll() {
    let probe = Arc::new(ScriptedProbe::never_ready());
    let reporter = Arc::new(MemoryReporter::new());

    let handle = ReadinessPoller::start(probe.clone(), PollSettings::default(), reporter);
    tokio::time::sleep(Duration::from_millis(100)).await;
    drop(handle);

    tokio::time::sleep(Duration::from_secs(30)).await;
    assert_eq!(probe.calls(), 1);
}

//! Bounded-retry readiness polling against the API health endpoint.
//!
//! The poller probes immediately, then once per interval, until a probe
//! reports ready or the time budget runs out. The budget is checked after
//! each probe and again after each interval wait, so with instantaneous
//! probes a 60s budget at a 2s interval issues exactly 30 probes
//! (0s, 2s, ..., 58s) and fails at 60s.

use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use engine_logging::{engine_debug, engine_info, engine_warn, ErrorReporter};
use recipe_core::ReadinessState;
use tokio::sync::watch;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

use crate::ApiError;

/// Reporter context for swallowed probe failures.
pub const PROBE_CONTEXT: &str = "health probe";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollSettings {
    pub max_duration: Duration,
    pub interval: Duration,
}

impl Default for PollSettings {
    fn default() -> Self {
        Self {
            max_duration: Duration::from_secs(60),
            interval: Duration::from_secs(2),
        }
    }
}

/// One readiness check. `Ok(false)` and `Err(_)` both mean "not yet".
#[async_trait::async_trait]
pub trait HealthProbe: Send + Sync {
    async fn probe(&self) -> Result<bool, ApiError>;
}

/// Serializes cancellation against state transitions.
struct Gate {
    token: CancellationToken,
    lock: Mutex<()>,
}

impl Gate {
    fn transition(&self, state_tx: &watch::Sender<ReadinessState>, next: ReadinessState) -> bool {
        let _guard = self.lock.lock().unwrap_or_else(PoisonError::into_inner);
        if self.token.is_cancelled() {
            return false;
        }
        state_tx.send_replace(next);
        true
    }

    fn cancel(&self) {
        let _guard = self.lock.lock().unwrap_or_else(PoisonError::into_inner);
        self.token.cancel();
    }
}

pub struct ReadinessPoller;

impl ReadinessPoller {
    /// Spawns the poll on the current tokio runtime.
    pub fn start(
        probe: Arc<dyn HealthProbe>,
        settings: PollSettings,
        reporter: Arc<dyn ErrorReporter>,
    ) -> PollHandle {
        let (state_tx, state_rx) = watch::channel(ReadinessState::Loading);
        let gate = Arc::new(Gate {
            token: CancellationToken::new(),
            lock: Mutex::new(()),
        });
        tokio::spawn(run_poll(probe, settings, reporter, gate.clone(), state_tx));
        PollHandle { gate, state_rx }
    }
}

/// Owns a running poll. Dropping the handle cancels the poll.
pub struct PollHandle {
    gate: Arc<Gate>,
    state_rx: watch::Receiver<ReadinessState>,
}

impl PollHandle {
    pub fn state(&self) -> ReadinessState {
        self.state_rx.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<ReadinessState> {
        self.state_rx.clone()
    }

    /// After this returns no probe is started and the state never changes again.
    pub fn cancel(&self) {
        self.gate.cancel();
    }

    pub fn is_cancelled(&self) -> bool {
        self.gate.token.is_cancelled()
    }

    /// Resolves with the terminal state, or `None` if the poll was cancelled first.
    pub async fn wait_terminal(&self) -> Option<ReadinessState> {
        let mut rx = self.state_rx.clone();
        let terminal = rx
            .wait_for(ReadinessState::is_terminal)
            .await
            .ok()
            .map(|state| state.clone());
        terminal
    }

}

impl Drop for PollHandle {
    fn drop(&mut self) {
        self.gate.cancel();
    }
}

async fn run_poll(
    probe: Arc<dyn HealthProbe>,
    settings: PollSettings,
    reporter: Arc<dyn ErrorReporter>,
    gate: Arc<Gate>,
    state_tx: watch::Sender<ReadinessState>,
) {
    let started = Instant::now();
    let mut attempts: u32 = 0;

    loop {
        if gate.token.is_cancelled() {
            return;
        }
        attempts += 1;

        let outcome = tokio::select! {
            biased;
            _ = gate.token.cancelled() => return,
            outcome = probe.probe() => outcome,
        };
        let ready = match outcome {
            Ok(ready) => ready,
            Err(err) => {
                reporter.report(PROBE_CONTEXT, &err.to_string());
                false
            }
        };

        if ready {
            if gate.transition(&state_tx, ReadinessState::Ready) {
                engine_info!("API ready after {} probe(s)", attempts);
            }
            return;
        }
        engine_debug!("API not ready after probe {}", attempts);

        if started.elapsed() >= settings.max_duration {
            fail_timeout(&gate, &state_tx, &settings, attempts);
            return;
        }

        tokio::select! {
            biased;
            _ = gate.token.cancelled() => return,
            _ = tokio::time::sleep(settings.interval) => {}
        }

        if started.elapsed() >= settings.max_duration {
            fail_timeout(&gate, &state_tx, &settings, attempts);
            return;
        }
    }
}

fn fail_timeout(
    gate: &Gate,
    state_tx: &watch::Sender<ReadinessState>,
    settings: &PollSettings,
    attempts: u32,
) {
    if gate.transition(state_tx, ReadinessState::timed_out()) {
        engine_warn!(
            "API not ready within {:?} ({} probes)",
            settings.max_duration,
            attempts
        );
    }
}

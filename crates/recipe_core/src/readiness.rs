/// Failure reason recorded when the readiness poll runs out of time.
pub const TIMEOUT_REASON: &str = "timeout";

/// Readiness of the backing recipe API as observed by the health poll.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ReadinessState {
    #[default]
    Loading,
    Ready,
    Failed { reason: String },
}

impl ReadinessState {
    pub fn timed_out() -> Self {
        Self::Failed {
            reason: TIMEOUT_REASON.to_string(),
        }
    }

    /// `Ready` and `Failed` admit no further automatic transition.
    pub fn is_terminal(&self) -> bool {
        !matches!(self, Self::Loading)
    }

    pub fn is_ready(&self) -> bool {
        matches!(self, Self::Ready)
    }
}

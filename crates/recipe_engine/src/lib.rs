//! Recipe engine: API client, readiness polling and effect execution.
mod api;
mod engine;
mod poller;
mod session;
mod settings;
mod types;

pub use api::{ApiProbe, RecipeApi, ReqwestRecipeApi};
pub use engine::{ChannelEventSink, EngineHandle, EventSink};
pub use poller::{HealthProbe, PollHandle, PollSettings, ReadinessPoller, PROBE_CONTEXT};
pub use session::{SessionError, SessionSnapshot, SessionStore, FETCH_CONTEXT};
pub use settings::{ApiSettings, ConfigError, RecipeRoutes};
pub use types::{ApiError, ApiErrorKind, EngineEvent};

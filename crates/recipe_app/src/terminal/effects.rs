use std::sync::{mpsc, Arc};

use engine_logging::{engine_debug, engine_info, ErrorReporter};
use recipe_core::{Effect, Msg};
use recipe_engine::{ApiSettings, EngineEvent, EngineHandle, EventSink};

use super::app::Inbound;

pub struct EffectRunner {
    engine: EngineHandle,
}

impl EffectRunner {
    pub fn new(
        settings: ApiSettings,
        reporter: Arc<dyn ErrorReporter>,
        inbox: mpsc::Sender<Inbound>,
    ) -> anyhow::Result<Self> {
        engine_info!(
            "Using recipe API at {} ({})",
            settings.base_url,
            settings.routes.generate_path()
        );
        let sink = Arc::new(MsgSink { inbox });
        let engine = EngineHandle::new(settings, reporter, sink)?;
        Ok(Self { engine })
    }

    pub fn enqueue(&self, effects: Vec<Effect>) {
        for effect in effects {
            match effect {
                Effect::StartHealthPoll => {
                    engine_info!("StartHealthPoll");
                    self.engine.start_health_poll();
                }
                Effect::FetchRecipes {
                    generation,
                    ingredients,
                } => {
                    engine_info!(
                        "FetchRecipes generation={} ingredients={}",
                        generation,
                        ingredients.len()
                    );
                    self.engine.fetch_recipes(generation, ingredients);
                }
                Effect::CancelFetch { generation } => {
                    engine_info!("CancelFetch generation={}", generation);
                    self.engine.cancel_fetch(generation);
                }
                Effect::SearchFoods { query } => {
                    engine_debug!("SearchFoods query={}", query);
                    self.engine.search_foods(query);
                }
            }
        }
    }
}

struct MsgSink {
    inbox: mpsc::Sender<Inbound>,
}

impl EventSink for MsgSink {
    fn emit(&self, event: EngineEvent) {
        let _ = self.inbox.send(Inbound::Msg(map_event(event)));
    }
}

/// Failures were already reported by the engine; only the outcome is forwarded.
fn map_event(event: EngineEvent) -> Msg {
    match event {
        EngineEvent::Readiness(state) => Msg::ReadinessChanged(state),
        EngineEvent::RecipesFetched {
            generation,
            result: Ok(recipes),
        } => Msg::RecipesLoaded {
            generation,
            recipes,
        },
        EngineEvent::RecipesFetched {
            generation,
            result: Err(err),
        } => Msg::RecipesFailed {
            generation,
            message: err.to_string(),
        },
        EngineEvent::FoodsFound { query, result } => Msg::SearchResults {
            query,
            foods: result.unwrap_or_default(),
        },
    }
}

#[cfg(test)]
mod tests {
    use recipe_core::ReadinessState;
    use recipe_engine::{ApiError, ApiErrorKind};

    use super::*;

    #[test]
    fn failed_fetch_becomes_recipes_failed() {
        let msg = map_event(EngineEvent::RecipesFetched {
            generation: 3,
            result: Err(ApiError {
                kind: ApiErrorKind::HttpStatus(500),
                message: "500 Internal Server Error".to_string(),
            }),
        });
        assert_eq!(
            msg,
            Msg::RecipesFailed {
                generation: 3,
                message: "http status 500: 500 Internal Server Error".to_string(),
            }
        );
    }

    #[test]
    fn failed_search_yields_no_suggestions() {
        let msg = map_event(EngineEvent::FoodsFound {
            query: "tom".to_string(),
            result: Err(ApiError {
                kind: ApiErrorKind::Network,
                message: "refused".to_string(),
            }),
        });
        assert_eq!(
            msg,
            Msg::SearchResults {
                query: "tom".to_string(),
                foods: Vec::new(),
            }
        );
        assert_eq!(
            map_event(EngineEvent::Readiness(ReadinessState::Ready)),
            Msg::ReadinessChanged(ReadinessState::Ready)
        );
    }
}

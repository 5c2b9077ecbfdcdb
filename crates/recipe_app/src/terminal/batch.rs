//! One-shot mode: wait for the API, submit the given ingredients, print recipes.

use std::io::{self, Write};
use std::sync::Arc;

use anyhow::{bail, Context};
use engine_logging::{engine_info, engine_warn, ErrorReporter, LogReporter};
use recipe_core::{messages, ReadinessState, Recipe, RecipeView};
use recipe_engine::{
    ApiProbe, ApiSettings, PollSettings, ReadinessPoller, RecipeApi, ReqwestRecipeApi,
    SessionStore,
};

use super::render::render_recipe;

pub fn run(settings: ApiSettings, ingredients: &[String]) -> anyhow::Result<()> {
    let poll = settings.poll_settings();
    let api: Arc<dyn RecipeApi> =
        Arc::new(ReqwestRecipeApi::new(settings).context("failed to build HTTP client")?);
    let reporter: Arc<dyn ErrorReporter> = Arc::new(LogReporter);

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("failed to start async runtime")?;

    eprintln!("{}", messages::API_STARTUP);
    let recipes = runtime.block_on(fetch_once(api, poll, ingredients, reporter))?;

    let mut out = io::stdout().lock();
    writeln!(out, "{}", messages::RECIPES_TITLE)?;
    for (i, recipe) in recipes.iter().enumerate() {
        write!(out, "{}", render_recipe(&RecipeView::new(i + 1, recipe)))?;
    }
    out.flush()?;
    Ok(())
}

async fn fetch_once(
    api: Arc<dyn RecipeApi>,
    poll: PollSettings,
    ingredients: &[String],
    reporter: Arc<dyn ErrorReporter>,
) -> anyhow::Result<Vec<Recipe>> {
    let handle = ReadinessPoller::start(
        Arc::new(ApiProbe::new(api.clone())),
        poll,
        reporter.clone(),
    );
    match handle.wait_terminal().await {
        Some(ReadinessState::Ready) => engine_info!("API ready"),
        Some(ReadinessState::Failed { reason }) => bail!(
            "{} {} ({reason})",
            messages::API_FAILED,
            messages::API_FAILED_SUBTITLE
        ),
        Some(ReadinessState::Loading) | None => bail!("readiness poll stopped before finishing"),
    }

    let store = SessionStore::new(reporter);
    for name in ingredients {
        if !store.add(name) {
            engine_warn!("Skipping ingredient {:?}", name);
        }
    }

    let recipes = store
        .submit(move |list| async move { api.generate_recipes(&list).await })
        .await
        .context(messages::GENERIC_FAILURE)?;
    Ok(recipes)
}

mod terminal;

use anyhow::Context;
use clap::Parser;
use recipe_engine::{ApiSettings, RecipeRoutes};

use terminal::logging::{self, LogDestination};

/// Ask the recipe robots what to cook with what you have on hand.
#[derive(Debug, Parser)]
#[command(name = "recipe_robot", version)]
struct Cli {
    /// Base url of the recipe API; overrides RECIPE_API_URL.
    #[arg(long)]
    api_url: Option<String>,

    /// Use the unversioned `/recipes/generate` route.
    #[arg(long)]
    legacy_routes: bool,

    /// Where log output goes.
    #[arg(long, value_enum, default_value_t = LogDestination::File)]
    log: LogDestination,

    /// Comma-separated ingredients: print recipes for them and exit.
    #[arg(long, value_delimiter = ',')]
    ingredients: Vec<String>,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    logging::initialize(cli.log);

    let mut settings =
        ApiSettings::from_env().context("invalid recipe API configuration in environment")?;
    if let Some(url) = cli.api_url.as_deref() {
        settings = settings.with_base_url(url)?;
    }
    if cli.legacy_routes {
        settings.routes = RecipeRoutes::Legacy;
    }

    if cli.ingredients.is_empty() {
        terminal::app::run(settings)
    } else {
        terminal::batch::run(settings, &cli.ingredients)
    }
}

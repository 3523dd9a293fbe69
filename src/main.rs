mod engine;
mod model;
mod ui;

use std::sync::Arc;

use anyhow::Context;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use engine::config::AppConfig;
use engine::engine::Engine;
use engine::llm_client::{LlmGateway, TextGenerator};
use engine::lore_qa;

fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "npc_forge=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = AppConfig::from_env();
    tracing::info!(
        api_base = %config.api_base,
        model = %config.model,
        story = %config.story_path.display(),
        "starting NPC generation system"
    );

    let llm: Arc<dyn TextGenerator> = Arc::new(LlmGateway::from_config(&config));

    let story = lore_qa::load_story(&config.story_path)
        .with_context(|| format!("cannot start without lore file {}", config.story_path.display()))?;
    let lore = lore_qa::prepare_lore(llm.as_ref(), story, config.summarize_lore);

    let engine = Engine::new(llm, lore, config.npc_dir.clone());
    let app = ui::app::MyApp::new(engine, config.npc_dir);

    eframe::run_native(
        "NPC Generation System",
        eframe::NativeOptions::default(),
        Box::new(|_cc| Ok(Box::new(app))),
    )
    .map_err(|e| anyhow::anyhow!("UI failed: {e}"))
}

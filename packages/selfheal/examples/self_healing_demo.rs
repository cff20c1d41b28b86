//! Drives the full healing loop against mocks: a dead hardcoded script,
//! a mock "LLM" that produces a working one, and a second round that
//! resolves straight from the cache.
//!
//! Run with: `cargo run -p selfheal --example self_healing_demo`

use std::sync::Arc;

use anyhow::Result;
use serde_json::json;

use selfheal::testing::{MockGenerator, MockPageSession};
use selfheal::{Expected, ExtractionTask, HealingEngine, MemoryStrategyStore, StrategyStore};

const DEAD_FALLBACK_JS: &str = "document.querySelector('.movie-title')?.textContent";
const REGENERATED_JS: &str = "document.querySelector('[data-movie-title]')?.textContent";

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,selfheal=debug".into()),
        )
        .init();

    // A page whose layout has drifted: the old .movie-title selector is
    // gone, but a data attribute still carries the title
    let page = MockPageSession::new()
        .with_html(
            r#"<html><body>
                <div class="hero"><span data-movie-title>미션 임파서블</span></div>
            </body></html>"#,
        )
        .with_result(REGENERATED_JS, json!("미션 임파서블"));

    // Stand-in for a real provider adapter (OpenAiGenerator etc.)
    let generator = Arc::new(MockGenerator::new().with_script("cgv_movie_title", REGENERATED_JS));

    let engine = HealingEngine::new(MemoryStrategyStore::new()).with_generator(generator.clone());

    let task = ExtractionTask::new(
        "cgv_movie_title",
        "https://example.com/movie/1",
        "the title of the movie on this detail page",
    )
    .expecting(Expected::Text)
    .with_example("미션 임파서블");

    // Round 1: the hardcoded script is dead, so the engine regenerates
    let first = engine.extract(&page, &task, Some(DEAD_FALLBACK_JS)).await?;
    println!("round 1 (healed): {:?}", first);

    let strategy = engine
        .store()
        .get_strategy("cgv_movie_title")
        .await?
        .expect("a validated strategy was persisted");
    println!(
        "persisted strategy v{} from {:?}: {}",
        strategy.version, strategy.source, strategy.js_code
    );

    // Round 2: resolved from the cache, no generation call
    let second = engine.extract(&page, &task, Some(DEAD_FALLBACK_JS)).await?;
    println!("round 2 (cached): {:?}", second);
    println!("generator calls: {}", generator.call_count());

    Ok(())
}

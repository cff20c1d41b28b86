//! Integration tests for the full healing loop.
//!
//! These tests drive `extract()` end-to-end against mock pages and
//! generators, verifying tier ordering, failure bookkeeping, cooldown
//! behavior, and strategy persistence.

use std::sync::Arc;
use std::time::Duration;

use serde_json::json;

use selfheal::testing::{MockGenerator, MockPageSession};
use selfheal::{
    Expected, ExtractionStrategy, ExtractionTask, HealingConfig, HealingEngine,
    MemoryStrategyStore, StrategySource, StrategyStore,
};

const CACHED_JS: &str = "document.querySelector('#old-title')?.textContent";
const HARDCODED_JS: &str = "document.querySelector('.title')?.textContent";
const GENERATED_JS: &str = "document.querySelector('[data-title]')?.textContent";

fn title_task() -> ExtractionTask {
    ExtractionTask::new(
        "cgv_movie_title",
        "https://example.com/movie/1",
        "the title of the movie",
    )
    .expecting(Expected::Text)
}

/// Helper to seed a store with a cached strategy.
async fn seeded_store(task_id: &str, js: &str, version: i64) -> MemoryStrategyStore {
    let store = MemoryStrategyStore::new();
    store
        .save_strategy(&ExtractionStrategy::generated(task_id, js, version))
        .await
        .unwrap();
    store
}

#[tokio::test]
async fn cached_tier_wins_without_touching_the_others() {
    let store = seeded_store("cgv_movie_title", CACHED_JS, 1).await;
    let generator = Arc::new(MockGenerator::new().with_script("cgv_movie_title", GENERATED_JS));
    let engine = HealingEngine::new(store).with_generator(generator.clone());

    let page = MockPageSession::new().with_result(CACHED_JS, json!("미션 임파서블"));

    let result = engine
        .extract(&page, &title_task(), Some(HARDCODED_JS))
        .await
        .unwrap();

    assert_eq!(result, Some(json!("미션 임파서블")));
    assert_eq!(page.executed_scripts(), vec![CACHED_JS.to_string()]);
    assert_eq!(generator.call_count(), 0);

    let saved = engine
        .store()
        .get_strategy("cgv_movie_title")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(saved.success_count, 1);
    assert_eq!(saved.fail_count, 0);
    assert!(saved.last_used.is_some());
}

#[tokio::test]
async fn cache_failure_falls_through_to_hardcoded() {
    let store = seeded_store("cgv_movie_title", CACHED_JS, 1).await;
    let engine = HealingEngine::new(store);

    // Cached script now returns a markup fragment (site changed); the
    // hardcoded fallback still works
    let page = MockPageSession::new()
        .with_result(CACHED_JS, json!("<div>미션 임파서블</div>"))
        .with_result(HARDCODED_JS, json!("미션 임파서블"));

    let result = engine
        .extract(&page, &title_task(), Some(HARDCODED_JS))
        .await
        .unwrap();

    assert_eq!(result, Some(json!("미션 임파서블")));
    assert_eq!(
        page.executed_scripts(),
        vec![CACHED_JS.to_string(), HARDCODED_JS.to_string()]
    );

    let saved = engine
        .store()
        .get_strategy("cgv_movie_title")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(saved.fail_count, 1);
}

#[tokio::test]
async fn all_tiers_failing_without_generator_returns_none() {
    let store = seeded_store("cgv_movie_title", CACHED_JS, 1).await;
    let engine = HealingEngine::new(store);

    // Neither script produces anything
    let page = MockPageSession::new();

    let result = engine
        .extract(&page, &title_task(), Some(HARDCODED_JS))
        .await
        .unwrap();

    assert!(result.is_none());
    let saved = engine
        .store()
        .get_strategy("cgv_movie_title")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(saved.fail_count, 1);
}

#[tokio::test]
async fn generation_persists_a_validated_strategy() {
    let generator = Arc::new(MockGenerator::new().with_script("cgv_movie_title", GENERATED_JS));
    let engine = HealingEngine::new(MemoryStrategyStore::new()).with_generator(generator.clone());

    let page = MockPageSession::new()
        .with_html("<html><body><span data-title>미션 임파서블</span></body></html>")
        .with_result(GENERATED_JS, json!("미션 임파서블"));

    let result = engine.extract(&page, &title_task(), None).await.unwrap();
    assert_eq!(result, Some(json!("미션 임파서블")));

    let saved = engine
        .store()
        .get_strategy("cgv_movie_title")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(saved.js_code, GENERATED_JS);
    assert_eq!(saved.version, 1);
    assert_eq!(saved.source, StrategySource::Llm);

    // No cache and no fallback means no prior failing script to pass
    let calls = generator.calls();
    assert_eq!(calls.len(), 1);
    assert!(!calls[0].had_failed_js);
    assert!(calls[0].html_len > 0);

    // Next round resolves from cache without another generation call
    let second = engine.extract(&page, &title_task(), None).await.unwrap();
    assert_eq!(second, Some(json!("미션 임파서블")));
    assert_eq!(generator.call_count(), 1);
}

#[tokio::test]
async fn regeneration_bumps_the_version() {
    let store = seeded_store("cgv_movie_title", CACHED_JS, 2).await;
    let generator = Arc::new(MockGenerator::new().with_script("cgv_movie_title", GENERATED_JS));
    let engine = HealingEngine::new(store).with_generator(generator.clone());

    // Cached script is dead; the regenerated one works
    let page = MockPageSession::new()
        .with_html("<html></html>")
        .with_result(GENERATED_JS, json!("미션 임파서블"));

    let result = engine.extract(&page, &title_task(), None).await.unwrap();
    assert_eq!(result, Some(json!("미션 임파서블")));

    let saved = engine
        .store()
        .get_strategy("cgv_movie_title")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(saved.version, 3);
    assert_eq!(saved.fail_count, 0);

    // The dead cached script was handed to the generator as context
    assert!(generator.calls()[0].had_failed_js);
}

#[tokio::test]
async fn generation_failure_sets_cooldown_and_suppresses_retries() {
    // Generator with no canned script produces nothing
    let generator = Arc::new(MockGenerator::new());
    let engine = HealingEngine::new(MemoryStrategyStore::new()).with_generator(generator.clone());

    let page = MockPageSession::new().with_html("<html></html>");

    let first = engine.extract(&page, &title_task(), None).await.unwrap();
    assert!(first.is_none());
    assert_eq!(generator.call_count(), 1);
    assert!(engine.cooldown_remaining("cgv_movie_title").is_some());

    // Within the window the generation tier is skipped entirely
    let second = engine.extract(&page, &title_task(), None).await.unwrap();
    assert!(second.is_none());
    assert_eq!(generator.call_count(), 1);
}

#[tokio::test]
async fn cooldown_expires_and_generation_is_retried() {
    let generator = Arc::new(MockGenerator::new());
    let engine = HealingEngine::new(MemoryStrategyStore::new())
        .with_generator(generator.clone())
        .with_config(HealingConfig::new().with_cooldown(Duration::from_millis(50)));

    let page = MockPageSession::new().with_html("<html></html>");
    let task = title_task();

    engine.extract(&page, &task, None).await.unwrap();
    assert_eq!(generator.call_count(), 1);

    tokio::time::sleep(Duration::from_millis(80)).await;
    assert!(engine.cooldown_remaining("cgv_movie_title").is_none());

    engine.extract(&page, &task, None).await.unwrap();
    assert_eq!(generator.call_count(), 2);
}

#[tokio::test]
async fn cooldown_is_scoped_per_task() {
    let generator = Arc::new(MockGenerator::new());
    let engine = HealingEngine::new(MemoryStrategyStore::new()).with_generator(generator.clone());

    let page = MockPageSession::new().with_html("<html></html>");

    let task_a = ExtractionTask::new("chain_a", "https://a.example.com", "titles")
        .expecting(Expected::Text);
    let task_b = ExtractionTask::new("chain_b", "https://b.example.com", "titles")
        .expecting(Expected::Text);

    engine.extract(&page, &task_a, None).await.unwrap();
    assert!(engine.cooldown_remaining("chain_a").is_some());
    assert!(engine.cooldown_remaining("chain_b").is_none());

    // The other task still reaches the generator
    engine.extract(&page, &task_b, None).await.unwrap();
    assert_eq!(generator.call_count(), 2);
}

#[tokio::test]
async fn invalid_generated_script_is_not_persisted() {
    let generator = Arc::new(MockGenerator::new().with_script("cgv_movie_title", GENERATED_JS));
    let engine = HealingEngine::new(MemoryStrategyStore::new()).with_generator(generator.clone());

    // Generated script returns markup, which fails Text validation
    let page = MockPageSession::new()
        .with_html("<html></html>")
        .with_result(GENERATED_JS, json!("<div>미션 임파서블</div>"));

    let result = engine.extract(&page, &title_task(), None).await.unwrap();

    assert!(result.is_none());
    assert_eq!(engine.store().strategy_count(), 0);
    assert!(engine.cooldown_remaining("cgv_movie_title").is_some());
}

#[tokio::test]
async fn fenced_generator_output_is_stripped_before_use() {
    let fenced = format!("```javascript\n{}\n```", GENERATED_JS);
    let generator = Arc::new(MockGenerator::new().with_script("cgv_movie_title", fenced));
    let engine = HealingEngine::new(MemoryStrategyStore::new()).with_generator(generator);

    let page = MockPageSession::new()
        .with_html("<html></html>")
        .with_result(GENERATED_JS, json!("미션 임파서블"));

    let result = engine.extract(&page, &title_task(), None).await.unwrap();
    assert_eq!(result, Some(json!("미션 임파서블")));

    let saved = engine
        .store()
        .get_strategy("cgv_movie_title")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(saved.js_code, GENERATED_JS);
}

#[tokio::test]
async fn script_execution_errors_read_as_no_result() {
    let store = seeded_store("cgv_movie_title", CACHED_JS, 1).await;
    let engine = HealingEngine::new(store);

    // Cached script throws; hardcoded still works
    let page = MockPageSession::new()
        .fail_script(CACHED_JS)
        .with_result(HARDCODED_JS, json!("미션 임파서블"));

    let result = engine
        .extract(&page, &title_task(), Some(HARDCODED_JS))
        .await
        .unwrap();

    assert_eq!(result, Some(json!("미션 임파서블")));
    let saved = engine
        .store()
        .get_strategy("cgv_movie_title")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(saved.fail_count, 1);
}

#[tokio::test]
async fn content_failure_on_generation_tier_cools_down() {
    let generator = Arc::new(MockGenerator::new().with_script("cgv_movie_title", GENERATED_JS));
    let engine = HealingEngine::new(MemoryStrategyStore::new()).with_generator(generator.clone());

    let page = MockPageSession::new().fail_content();

    let result = engine.extract(&page, &title_task(), None).await.unwrap();

    assert!(result.is_none());
    assert_eq!(generator.call_count(), 0);
    assert!(engine.cooldown_remaining("cgv_movie_title").is_some());
}

#[tokio::test]
async fn hardcoded_success_is_never_persisted() {
    // The end-to-end rating scenario: no cached strategy, hardcoded
    // script returns "4.3" as a string, which coerces into range
    let generator = Arc::new(MockGenerator::new());
    let engine = HealingEngine::new(MemoryStrategyStore::new()).with_generator(generator.clone());

    let rating_js = "document.querySelector('.rating')?.textContent";
    let page = MockPageSession::new().with_result(rating_js, json!("4.3"));

    let task = ExtractionTask::new(
        "cgv_movie_rating",
        "https://example.com/movie/1",
        "the audience rating of the movie",
    )
    .expecting(Expected::Rating);

    let result = engine.extract(&page, &task, Some(rating_js)).await.unwrap();

    assert_eq!(result, Some(json!("4.3")));
    assert_eq!(generator.call_count(), 0);
    assert_eq!(engine.store().strategy_count(), 0);
    assert!(engine.cooldown_remaining("cgv_movie_rating").is_none());
}

#[tokio::test]
async fn three_strikes_purge_forces_regeneration_from_scratch() {
    let store = seeded_store("cgv_movie_title", CACHED_JS, 1).await;
    let engine = HealingEngine::new(store);

    // The cached script returns nothing round after round
    let page = MockPageSession::new();
    let task = title_task();

    for _ in 0..3 {
        let result = engine.extract(&page, &task, None).await.unwrap();
        assert!(result.is_none());
    }

    // Purged: the next caller starts with a clean cache miss
    assert!(engine
        .store()
        .get_strategy("cgv_movie_title")
        .await
        .unwrap()
        .is_none());
    assert_eq!(engine.store().strategy_count(), 0);
}

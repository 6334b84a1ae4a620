use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use wundr_core::{
    CoreError, FlashcardStore, Level, MemoryStore, Prompt, PromptGateway, PromptRequest,
    ResolveOutcome, ResolveRequest, Resolution, Resolver, SaveOutcome, Source, TranslationGateway,
};

struct StubTranslator {
    calls: AtomicUsize,
    fail: bool,
    delay_ms: u64,
}

impl StubTranslator {
    fn ok() -> Arc<Self> {
        Arc::new(Self {
            calls: AtomicUsize::new(0),
            fail: false,
            delay_ms: 0,
        })
    }

    fn failing() -> Arc<Self> {
        Arc::new(Self {
            calls: AtomicUsize::new(0),
            fail: true,
            delay_ms: 0,
        })
    }

    fn slow(delay_ms: u64) -> Arc<Self> {
        Arc::new(Self {
            calls: AtomicUsize::new(0),
            fail: false,
            delay_ms,
        })
    }
}

#[async_trait]
impl TranslationGateway for StubTranslator {
    async fn translate(&self, word: &str, target: &str) -> Result<String, CoreError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.delay_ms > 0 {
            tokio::time::sleep(Duration::from_millis(self.delay_ms)).await;
        }
        if self.fail {
            return Err(CoreError::Upstream("translation down".to_string()));
        }
        Ok(format!("{target}:{word}"))
    }
}

struct StubPrompter {
    calls: AtomicUsize,
    fail: bool,
}

impl StubPrompter {
    fn ok() -> Arc<Self> {
        Arc::new(Self {
            calls: AtomicUsize::new(0),
            fail: false,
        })
    }

    fn failing() -> Arc<Self> {
        Arc::new(Self {
            calls: AtomicUsize::new(0),
            fail: true,
        })
    }
}

#[async_trait]
impl PromptGateway for StubPrompter {
    async fn generate(&self, req: &PromptRequest) -> Result<Vec<Prompt>, CoreError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err(CoreError::Upstream("prompt generation down".to_string()));
        }
        Ok((0..req.count)
            .map(|i| Prompt {
                l2: format!("{} {} ({})", req.target, req.object, i),
                l1: format!("{} {} ({})", req.native, req.object, i),
            })
            .collect())
    }
}

fn request(target: &str, object: &str, level: Level) -> ResolveRequest {
    ResolveRequest {
        object: object.to_string(),
        target: target.to_string(),
        level,
        image_uri: String::new(),
    }
}

fn must_resolve(outcome: ResolveOutcome) -> Resolution {
    match outcome {
        ResolveOutcome::Resolved(r) => r,
        ResolveOutcome::Superseded => panic!("resolution was superseded"),
    }
}

#[tokio::test]
async fn cached_tuple_resolves_without_upstream_calls() {
    let store = Arc::new(MemoryStore::new());
    let translator = StubTranslator::ok();
    let prompter = StubPrompter::ok();
    let resolver = Resolver::new(store, translator.clone(), prompter.clone());

    let first = must_resolve(resolver.resolve(&request("es", "guitar", Level::A2)).await.unwrap());
    assert_eq!(first.source, Source::Upstream);
    assert_eq!(translator.calls.load(Ordering::SeqCst), 1);
    assert_eq!(prompter.calls.load(Ordering::SeqCst), 1);

    assert_eq!(resolver.save(&first.card).await.unwrap(), SaveOutcome::Saved);

    let second = must_resolve(resolver.resolve(&request("es", "guitar", Level::A2)).await.unwrap());
    assert_eq!(second.source, Source::Cache);
    assert_eq!(second.card, first.card);
    // No further network traffic for a cached tuple.
    assert_eq!(translator.calls.load(Ordering::SeqCst), 1);
    assert_eq!(prompter.calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn translation_failure_falls_back_to_the_source_word() {
    let store = Arc::new(MemoryStore::new());
    let prompter = StubPrompter::ok();
    let resolver = Resolver::new(store, StubTranslator::failing(), prompter.clone());

    let r = must_resolve(resolver.resolve(&request("de", "Lamp", Level::A2)).await.unwrap());
    assert_eq!(r.card.translated, "lamp");
    assert!(r.translated_fallback);
    assert!(r.prompt_warning.is_none());
    // The prompt fetch is independent of the failed translation.
    assert_eq!(prompter.calls.load(Ordering::SeqCst), 1);
    assert!(!r.card.prompts.is_empty());
}

#[tokio::test]
async fn prompt_failure_degrades_to_empty_prompts_and_blocks_save() {
    let store = Arc::new(MemoryStore::new());
    let resolver = Resolver::new(store, StubTranslator::ok(), StubPrompter::failing());

    let r = must_resolve(resolver.resolve(&request("es", "guitar", Level::B1)).await.unwrap());
    assert_eq!(r.card.translated, "es:guitar");
    assert!(r.card.prompts.is_empty());
    assert!(r.prompt_warning.is_some());

    // An empty prompt list must never be persisted.
    assert!(matches!(
        resolver.save(&r.card).await,
        Err(CoreError::Invalid(_))
    ));
}

#[tokio::test]
async fn resaving_a_tuple_reports_already_saved() {
    let store: Arc<MemoryStore> = Arc::new(MemoryStore::new());
    let resolver = Resolver::new(store.clone(), StubTranslator::ok(), StubPrompter::ok());

    let r = must_resolve(resolver.resolve(&request("fr", "book", Level::A1)).await.unwrap());
    assert_eq!(resolver.save(&r.card).await.unwrap(), SaveOutcome::Saved);
    assert_eq!(
        resolver.save(&r.card).await.unwrap(),
        SaveOutcome::AlreadySaved
    );
    assert_eq!(store.list().await.unwrap().len(), 1);
}

#[tokio::test]
async fn prompt_count_and_native_language_reach_the_gateway() {
    let store = Arc::new(MemoryStore::new());
    let resolver = Resolver::new(store, StubTranslator::ok(), StubPrompter::ok())
        .with_native("pt")
        .with_prompt_count(3);

    let r = must_resolve(resolver.resolve(&request("es", "guitar", Level::A2)).await.unwrap());
    assert_eq!(r.card.prompts.len(), 3);
    assert!(r.card.prompts[0].l1.starts_with("pt "));
}

#[tokio::test]
async fn empty_object_is_rejected_before_any_network_call() {
    let store = Arc::new(MemoryStore::new());
    let translator = StubTranslator::ok();
    let prompter = StubPrompter::ok();
    let resolver = Resolver::new(store, translator.clone(), prompter.clone());

    let err = resolver
        .resolve(&request("es", "   ", Level::A2))
        .await
        .unwrap_err();
    assert!(matches!(err, CoreError::Invalid(_)));
    assert_eq!(translator.calls.load(Ordering::SeqCst), 0);
    assert_eq!(prompter.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn stale_response_does_not_clobber_the_newer_tuple() {
    let store = Arc::new(MemoryStore::new());
    let resolver = Arc::new(Resolver::new(
        store,
        StubTranslator::slow(300),
        StubPrompter::ok(),
    ));

    let slow = {
        let resolver = resolver.clone();
        tokio::spawn(async move { resolver.resolve(&request("fr", "book", Level::A1)).await })
    };
    // Let the first fetch get in flight, then switch tuples.
    tokio::time::sleep(Duration::from_millis(50)).await;

    let fresh = must_resolve(resolver.resolve(&request("de", "book", Level::A1)).await.unwrap());
    assert_eq!(fresh.card.target, "de");

    // The fr response lands after de became the active tuple.
    let stale = slow.await.unwrap().unwrap();
    assert!(matches!(stale, ResolveOutcome::Superseded));
}

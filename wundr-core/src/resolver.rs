use crate::gateway::{PromptGateway, PromptRequest, TranslationGateway};
use crate::key::{derive_id, normalize_object, normalize_target};
use crate::store::FlashcardStore;
use crate::{CoreError, Flashcard, Level, DEFAULT_PROMPT_COUNT};
use chrono::Utc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Where resolved content came from.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Source {
    Cache,
    Upstream,
}

/// One resolution request; the tuple plus the captured image reference.
#[derive(Clone, Debug)]
pub struct ResolveRequest {
    pub object: String,
    pub target: String,
    pub level: Level,
    pub image_uri: String,
}

/// A fully populated, not-yet-persisted flashcard plus how it was built.
#[derive(Clone, Debug)]
pub struct Resolution {
    pub card: Flashcard,
    pub source: Source,
    /// Translation was unavailable and `translated` is the source word.
    pub translated_fallback: bool,
    /// Prompt generation failed; `prompts` is empty and the card cannot
    /// be saved until re-resolved.
    pub prompt_warning: Option<String>,
}

#[derive(Clone, Debug)]
pub enum ResolveOutcome {
    Resolved(Resolution),
    /// A newer request was issued while this one was in flight; its
    /// result must not be applied.
    Superseded,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SaveOutcome {
    Saved,
    AlreadySaved,
}

/// Pipeline orchestrator: cache first, then the two upstream fetches
/// concurrently, degraded results folded in rather than surfaced as
/// errors. Persistence stays a separate, explicit [`Resolver::save`].
pub struct Resolver {
    store: Arc<dyn FlashcardStore>,
    translator: Arc<dyn TranslationGateway>,
    prompter: Arc<dyn PromptGateway>,
    native: String,
    prompt_count: usize,
    seq: AtomicU64,
}

impl Resolver {
    pub fn new(
        store: Arc<dyn FlashcardStore>,
        translator: Arc<dyn TranslationGateway>,
        prompter: Arc<dyn PromptGateway>,
    ) -> Self {
        Self {
            store,
            translator,
            prompter,
            native: "en".to_string(),
            prompt_count: DEFAULT_PROMPT_COUNT,
            seq: AtomicU64::new(0),
        }
    }

    /// Learner's native language (the l1 side of prompts).
    pub fn with_native(mut self, native: impl Into<String>) -> Self {
        self.native = native.into();
        self
    }

    pub fn with_prompt_count(mut self, count: usize) -> Self {
        self.prompt_count = count;
        self
    }

    fn is_latest(&self, seq: u64) -> bool {
        self.seq.load(Ordering::SeqCst) == seq
    }

    pub async fn resolve(&self, req: &ResolveRequest) -> Result<ResolveOutcome, CoreError> {
        let target = normalize_target(&req.target);
        let object = normalize_object(&req.object);
        let id = derive_id(&target, &object, req.level)?;

        // Each request gets the next sequence number; a response is only
        // applied while its number is still the latest issued.
        let seq = self.seq.fetch_add(1, Ordering::SeqCst) + 1;

        if let Some(card) = self.store.get(&id).await? {
            if !self.is_latest(seq) {
                return Ok(ResolveOutcome::Superseded);
            }
            return Ok(ResolveOutcome::Resolved(Resolution {
                card,
                source: Source::Cache,
                translated_fallback: false,
                prompt_warning: None,
            }));
        }

        let prompt_req = PromptRequest {
            object: object.clone(),
            native: self.native.clone(),
            target: target.clone(),
            level: req.level,
            count: self.prompt_count,
        };
        // The two fetches are independent; neither waits on the other.
        let (translated, prompts) = futures::join!(
            self.translator.translate(&object, &target),
            self.prompter.generate(&prompt_req),
        );

        if !self.is_latest(seq) {
            return Ok(ResolveOutcome::Superseded);
        }

        let (translated, translated_fallback) = match translated {
            Ok(word) if !word.trim().is_empty() => (word, false),
            Ok(_) => (object.clone(), true),
            Err(err) => {
                tracing::warn!(%err, object = %object, "translation failed, using source word");
                (object.clone(), true)
            }
        };

        let (prompts, prompt_warning) = match prompts {
            Ok(list) => (list, None),
            Err(err) => {
                tracing::warn!(%err, object = %object, "prompt generation failed");
                (Vec::new(), Some(err.to_string()))
            }
        };

        let card = Flashcard {
            id,
            object,
            target,
            level: req.level,
            translated,
            prompts,
            image_uri: req.image_uri.clone(),
            created_at: Utc::now(),
        };

        Ok(ResolveOutcome::Resolved(Resolution {
            card,
            source: Source::Upstream,
            translated_fallback,
            prompt_warning,
        }))
    }

    /// Explicit, user-triggered persistence. Re-saving a tuple that is
    /// already in the store is reported as `AlreadySaved`, not rewritten.
    pub async fn save(&self, card: &Flashcard) -> Result<SaveOutcome, CoreError> {
        if card.object.trim().is_empty() {
            return Err(CoreError::Invalid("object must not be empty"));
        }
        if card.translated.trim().is_empty() {
            return Err(CoreError::Invalid("translated must not be empty"));
        }
        if card.prompts.is_empty() {
            return Err(CoreError::Invalid("prompts must not be empty"));
        }
        if self.store.get(&card.id).await?.is_some() {
            return Ok(SaveOutcome::AlreadySaved);
        }
        self.store.put(card).await?;
        Ok(SaveOutcome::Saved)
    }
}

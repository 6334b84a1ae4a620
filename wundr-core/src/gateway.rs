use crate::{CoreError, Label, Level, Prompt, DEFAULT_PROMPT_COUNT};
use async_trait::async_trait;

/// Inputs for one prompt-generation call.
#[derive(Clone, Debug)]
pub struct PromptRequest {
    pub object: String,
    pub native: String,
    pub target: String,
    pub level: Level,
    pub count: usize,
}

impl PromptRequest {
    pub fn new(
        object: impl Into<String>,
        native: impl Into<String>,
        target: impl Into<String>,
        level: Level,
    ) -> Self {
        Self {
            object: object.into(),
            native: native.into(),
            target: target.into(),
            level,
            count: DEFAULT_PROMPT_COUNT,
        }
    }
}

/// Candidate object names for a captured image, ordered by the detector.
#[async_trait]
pub trait LabelGateway: Send + Sync {
    async fn detect(&self, image: &[u8], include_text: bool) -> Result<Vec<Label>, CoreError>;
}

/// Literal translation of a single word into the target language.
#[async_trait]
pub trait TranslationGateway: Send + Sync {
    async fn translate(&self, word: &str, target: &str) -> Result<String, CoreError>;
}

/// Level-appropriate speaking prompts for an object.
#[async_trait]
pub trait PromptGateway: Send + Sync {
    async fn generate(&self, req: &PromptRequest) -> Result<Vec<Prompt>, CoreError>;
}

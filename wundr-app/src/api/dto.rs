use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use wundr_core::{Flashcard, Level, Prompt, Resolution, Source};

#[derive(Serialize)]
pub struct CardOut {
    pub id: String,
    pub object: String,
    pub target: String,
    pub level: Level,
    pub translated: String,
    pub prompts: Vec<Prompt>,
    pub image_uri: String,
    pub created_at: DateTime<Utc>,
}

impl From<Flashcard> for CardOut {
    fn from(c: Flashcard) -> Self {
        Self {
            id: c.id,
            object: c.object,
            target: c.target,
            level: c.level,
            translated: c.translated,
            prompts: c.prompts,
            image_uri: c.image_uri,
            created_at: c.created_at,
        }
    }
}

#[derive(Deserialize)]
pub struct ResolveIn {
    pub object: String,
    pub target: String,
    pub level: Level,
    #[serde(default)]
    pub image_uri: String,
}

#[derive(Serialize)]
pub struct ResolveOut {
    pub card: CardOut,
    pub source: &'static str,
    pub translated_fallback: bool,
    pub prompt_warning: Option<String>,
}

impl From<Resolution> for ResolveOut {
    fn from(r: Resolution) -> Self {
        Self {
            card: r.card.into(),
            source: match r.source {
                Source::Cache => "cache",
                Source::Upstream => "upstream",
            },
            translated_fallback: r.translated_fallback,
            prompt_warning: r.prompt_warning,
        }
    }
}

/// A resolved card posted back for explicit persistence.
#[derive(Deserialize)]
pub struct SaveIn {
    pub object: String,
    pub target: String,
    pub level: Level,
    pub translated: String,
    pub prompts: Vec<Prompt>,
    #[serde(default)]
    pub image_uri: String,
}

#[derive(Serialize)]
pub struct SaveOut {
    pub id: String,
    pub status: &'static str,
}

#[derive(Serialize)]
pub struct GroupOut {
    pub language: String,
    pub cards: Vec<CardOut>,
}

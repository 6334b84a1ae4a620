use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Labels below or at this confidence are not offered as candidates.
pub const DEFAULT_SCORE_THRESHOLD: f32 = 0.6;

/// How many speaking prompts a resolution asks for by default.
pub const DEFAULT_PROMPT_COUNT: usize = 6;

/// CEFR proficiency tier.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Level {
    A1,
    A2,
    B1,
    B2,
    C1,
    C2,
}

impl Level {
    pub const ALL: [Level; 6] = [
        Level::A1,
        Level::A2,
        Level::B1,
        Level::B2,
        Level::C1,
        Level::C2,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Level::A1 => "A1",
            Level::A2 => "A2",
            Level::B1 => "B1",
            Level::B2 => "B2",
            Level::C1 => "C1",
            Level::C2 => "C2",
        }
    }
}

impl std::str::FromStr for Level {
    type Err = crate::CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "A1" => Ok(Level::A1),
            "A2" => Ok(Level::A2),
            "B1" => Ok(Level::B1),
            "B2" => Ok(Level::B2),
            "C1" => Ok(Level::C1),
            "C2" => Ok(Level::C2),
            _ => Err(crate::CoreError::Invalid("unknown level")),
        }
    }
}

impl std::fmt::Display for Level {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A target-language sentence and its native-language gloss.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Prompt {
    pub l2: String,
    pub l1: String,
}

/// One persisted unit of study material, keyed by its derived id.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Flashcard {
    pub id: String,
    pub object: String,
    pub target: String,
    pub level: Level,
    pub translated: String,
    pub prompts: Vec<Prompt>,
    #[serde(default)]
    pub image_uri: String,
    pub created_at: DateTime<Utc>,
}

impl Flashcard {
    /// A card may only be saved once the pipeline produced all three parts.
    pub fn is_complete(&self) -> bool {
        !self.object.trim().is_empty()
            && !self.translated.trim().is_empty()
            && !self.prompts.is_empty()
    }
}

/// Transient detection candidate; never persisted.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Label {
    pub label: String,
    pub score: f32,
}

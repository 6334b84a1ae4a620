use crate::{CoreError, Flashcard};
use async_trait::async_trait;

pub mod memory;

pub use memory::MemoryStore;

/// Durable mapping from derived id to flashcard, plus enumeration.
///
/// `get` on an absent id is `Ok(None)` ("not yet studied"), and `delete`
/// on an absent id is a no-op. Backends report I/O failures as
/// `CoreError::Storage`; a record that no longer deserializes is treated
/// as absent rather than failing the whole listing.
#[async_trait]
pub trait FlashcardStore: Send + Sync {
    async fn put(&self, card: &Flashcard) -> Result<(), CoreError>;
    async fn get(&self, id: &str) -> Result<Option<Flashcard>, CoreError>;
    async fn delete(&self, id: &str) -> Result<(), CoreError>;
    async fn clear(&self) -> Result<(), CoreError>;
    async fn list(&self) -> Result<Vec<Flashcard>, CoreError>;

    /// Browsing view: sections keyed by display language name, cards
    /// newest-first within each section.
    async fn list_grouped_by_target(
        &self,
        sort_sections: bool,
    ) -> Result<Vec<(String, Vec<Flashcard>)>, CoreError> {
        let cards = self.list().await?;
        Ok(crate::grouping::group_by_target(&cards, sort_sections))
    }
}

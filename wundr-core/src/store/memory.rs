use crate::{CoreError, Flashcard};
use async_trait::async_trait;
use parking_lot::RwLock;
use std::collections::HashMap;

#[derive(Default)]
pub struct MemoryStore {
    cards: RwLock<HashMap<String, Flashcard>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl crate::store::FlashcardStore for MemoryStore {
    async fn put(&self, card: &Flashcard) -> Result<(), CoreError> {
        self.cards.write().insert(card.id.clone(), card.clone());
        Ok(())
    }

    async fn get(&self, id: &str) -> Result<Option<Flashcard>, CoreError> {
        Ok(self.cards.read().get(id).cloned())
    }

    async fn delete(&self, id: &str) -> Result<(), CoreError> {
        self.cards.write().remove(id);
        Ok(())
    }

    async fn clear(&self) -> Result<(), CoreError> {
        self.cards.write().clear();
        Ok(())
    }

    async fn list(&self) -> Result<Vec<Flashcard>, CoreError> {
        Ok(self.cards.read().values().cloned().collect())
    }
}

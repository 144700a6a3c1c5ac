use crate::card::types::{Card, CardId, Category};
use std::collections::HashMap;
use std::path::Path;
use thiserror::Error;
use tracing::warn;

#[derive(Error, Debug)]
pub enum CardDatabaseError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
    #[error("JSON parsing error: {0}")]
    JsonError(#[from] serde_json::Error),
    #[error("Card not found: {0}")]
    CardNotFound(String),
}

/// Card database that loads cards from JSON.
/// Keeps the file's enumeration order, which is the tie-break for stable sorts downstream.
pub struct CardDatabase {
    cards: Vec<Card>,
    by_id: HashMap<CardId, usize>,
    by_name: HashMap<String, usize>,
}

impl CardDatabase {
    /// Load cards from a JSON file (a top-level array of card objects)
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, CardDatabaseError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    pub fn from_json(content: &str) -> Result<Self, CardDatabaseError> {
        let cards_vec: Vec<Card> = serde_json::from_str(content)?;
        Ok(Self::from_cards(cards_vec))
    }

    /// Build a database from already parsed cards. Duplicate ids keep the first card.
    pub fn from_cards(cards_vec: Vec<Card>) -> Self {
        let mut cards = Vec::with_capacity(cards_vec.len());
        let mut by_id = HashMap::new();
        let mut by_name = HashMap::new();

        for card in cards_vec {
            if by_id.contains_key(&card.id) {
                warn!(id = card.id, name = %card.name, "duplicate card id, keeping first");
                continue;
            }
            let idx = cards.len();
            by_id.insert(card.id, idx);
            by_name.entry(card.name.clone()).or_insert(idx);
            cards.push(card);
        }

        CardDatabase {
            cards,
            by_id,
            by_name,
        }
    }

    pub fn get(&self, id: CardId) -> Option<&Card> {
        self.by_id.get(&id).map(|&idx| &self.cards[idx])
    }

    /// Get a card by exact name
    pub fn get_card(&self, name: &str) -> Result<&Card, CardDatabaseError> {
        self.by_name
            .get(name)
            .map(|&idx| &self.cards[idx])
            .ok_or_else(|| CardDatabaseError::CardNotFound(name.to_string()))
    }

    /// Resolve a user supplied reference: numeric id first, then exact name
    pub fn lookup(&self, reference: &str) -> Result<&Card, CardDatabaseError> {
        if let Ok(id) = reference.trim().parse::<CardId>() {
            if let Some(card) = self.get(id) {
                return Ok(card);
            }
        }
        self.get_card(reference)
    }

    /// All cards in enumeration order
    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    /// Cards of one category in enumeration order
    pub fn in_category(&self, category: Category) -> impl Iterator<Item = &Card> {
        self.cards
            .iter()
            .filter(move |c| c.category() == Some(category))
    }

    /// Get total number of cards
    pub fn card_count(&self) -> usize {
        self.cards.len()
    }
}

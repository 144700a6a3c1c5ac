use crate::card::{Card, CardDatabase, CardId, Category};
use indexmap::IndexMap;
use serde::{Deserialize, Deserializer};
use std::path::Path;
use thiserror::Error;
use tracing::{debug, warn};

#[derive(Error, Debug)]
pub enum ArchiveError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
    #[error("JSON parsing error: {0}")]
    JsonError(#[from] serde_json::Error),
    #[error("Invalid archive format: {0}")]
    InvalidFormat(String),
}

/// One line of a deck list: a card reference and how many copies were played
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct CardRef {
    #[serde(default)]
    pub id: Option<CardId>,
    #[serde(default)]
    pub name: Option<String>,
    pub count: u32,
}

impl CardRef {
    pub fn new(id: CardId, count: u32) -> Self {
        CardRef {
            id: Some(id),
            name: None,
            count,
        }
    }

    /// Resolve against the database, by id when present, by exact name otherwise
    pub fn resolve<'a>(&self, db: &'a CardDatabase) -> Option<&'a Card> {
        match (self.id, &self.name) {
            (Some(id), _) => db.get(id),
            (None, Some(name)) => db.get_card(name).ok(),
            (None, None) => None,
        }
    }
}

/// Library lists are either flat or grouped by card type
#[derive(Deserialize)]
#[serde(untagged)]
enum ListEntry {
    Section {
        cards: Vec<CardRef>,
    },
    Card(CardRef),
}

#[derive(Deserialize)]
#[serde(untagged)]
enum CardList {
    Counted { cards: Vec<ListEntry> },
    Bare(Vec<ListEntry>),
}

fn flatten_card_list<'de, D>(deserializer: D) -> Result<Vec<CardRef>, D::Error>
where
    D: Deserializer<'de>,
{
    let entries = match CardList::deserialize(deserializer)? {
        CardList::Counted { cards } => cards,
        CardList::Bare(cards) => cards,
    };

    let mut refs = Vec::new();
    for entry in entries {
        match entry {
            ListEntry::Section { cards } => refs.extend(cards),
            ListEntry::Card(card) => refs.push(card),
        }
    }
    Ok(refs)
}

fn deck_id<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawId {
        Text(String),
        Number(u64),
    }

    Ok(Option::<RawId>::deserialize(deserializer)?.map(|id| match id {
        RawId::Text(s) => s,
        RawId::Number(n) => n.to_string(),
    }))
}

/// A historical tournament-winning deck
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DeckRecord {
    #[serde(default, deserialize_with = "deck_id")]
    pub id: Option<String>,
    #[serde(default, deserialize_with = "flatten_card_list")]
    pub crypt: Vec<CardRef>,
    #[serde(default, deserialize_with = "flatten_card_list")]
    pub library: Vec<CardRef>,
}

impl DeckRecord {
    pub fn cards(&self, category: Category) -> &[CardRef] {
        match category {
            Category::Crypt => &self.crypt,
            Category::Library => &self.library,
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawArchive {
    List(Vec<serde_json::Value>),
    Keyed(IndexMap<String, serde_json::Value>),
}

/// The deck archive, in file order
#[derive(Debug, Clone, Default)]
pub struct Archive {
    decks: Vec<DeckRecord>,
    skipped_records: usize,
}

impl Archive {
    /// Load the archive from a JSON file.
    /// Accepts a top-level array of decks or an object keyed by deck id.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ArchiveError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    pub fn from_json(content: &str) -> Result<Self, ArchiveError> {
        let raw: RawArchive = serde_json::from_str(content).map_err(|e| {
            if e.is_data() {
                ArchiveError::InvalidFormat(
                    "expected an array of decks or an object keyed by deck id".to_string(),
                )
            } else {
                ArchiveError::JsonError(e)
            }
        })?;

        let entries: Vec<(Option<String>, serde_json::Value)> = match raw {
            RawArchive::List(values) => values.into_iter().map(|v| (None, v)).collect(),
            RawArchive::Keyed(map) => map.into_iter().map(|(k, v)| (Some(k), v)).collect(),
        };

        let mut decks = Vec::with_capacity(entries.len());
        let mut skipped_records = 0;
        for (index, (key, value)) in entries.into_iter().enumerate() {
            match serde_json::from_value::<DeckRecord>(value) {
                Ok(mut deck) => {
                    if deck.id.is_none() {
                        deck.id = key;
                    }
                    decks.push(deck);
                }
                Err(e) => {
                    warn!(index, key = ?key, error = %e, "skipping malformed deck record");
                    skipped_records += 1;
                }
            }
        }

        debug!(decks = decks.len(), skipped_records, "archive parsed");
        Ok(Archive {
            decks,
            skipped_records,
        })
    }

    pub fn from_decks(decks: Vec<DeckRecord>) -> Self {
        Archive {
            decks,
            skipped_records: 0,
        }
    }

    pub fn decks(&self) -> &[DeckRecord] {
        &self.decks
    }

    pub fn len(&self) -> usize {
        self.decks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.decks.is_empty()
    }

    /// Records dropped at load time because they could not be decoded
    pub fn skipped_records(&self) -> usize {
        self.skipped_records
    }
}

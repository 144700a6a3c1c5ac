use crate::archive::deck::{Archive, DeckRecord};
use crate::card::{CardDatabase, CardId, Category};
use indexmap::IndexMap;
use rayon::prelude::*;
use tracing::{debug, info};

/// Summed copies per card id, in the order ids were first seen in the archive
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UsageCount {
    counts: IndexMap<CardId, u64>,
}

impl UsageCount {
    pub fn add(&mut self, id: CardId, quantity: u64) {
        *self.counts.entry(id).or_insert(0) += quantity;
    }

    pub fn get(&self, id: CardId) -> u64 {
        self.counts.get(&id).copied().unwrap_or(0)
    }

    pub fn iter(&self) -> impl Iterator<Item = (CardId, u64)> + '_ {
        self.counts.iter().map(|(&id, &count)| (id, count))
    }

    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// Append `other` after `self`; ids new to `self` keep their relative order
    pub fn merge(mut self, other: UsageCount) -> Self {
        for (id, count) in other.counts {
            self.add(id, count);
        }
        self
    }
}

impl FromIterator<(CardId, u64)> for UsageCount {
    fn from_iter<I: IntoIterator<Item = (CardId, u64)>>(iter: I) -> Self {
        let mut usage = UsageCount::default();
        for (id, count) in iter {
            usage.add(id, count);
        }
        usage
    }
}

/// Usage of both categories across a whole archive
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ArchiveUsage {
    pub crypt: UsageCount,
    pub library: UsageCount,
    /// References to unknown cards, or to cards listed in the wrong section
    pub skipped_refs: usize,
}

impl ArchiveUsage {
    pub fn category(&self, category: Category) -> &UsageCount {
        match category {
            Category::Crypt => &self.crypt,
            Category::Library => &self.library,
        }
    }

    fn category_mut(&mut self, category: Category) -> &mut UsageCount {
        match category {
            Category::Crypt => &mut self.crypt,
            Category::Library => &mut self.library,
        }
    }

    fn add_deck(mut self, deck: &DeckRecord, db: &CardDatabase) -> Self {
        for category in Category::ALL {
            for card_ref in deck.cards(category) {
                match card_ref.resolve(db) {
                    Some(card) if card.category() == Some(category) => {
                        self.category_mut(category)
                            .add(card.id, u64::from(card_ref.count));
                    }
                    resolved => {
                        debug!(
                            deck = ?deck.id,
                            section = %category,
                            card = ?card_ref,
                            known = resolved.is_some(),
                            "skipping card reference"
                        );
                        self.skipped_refs += 1;
                    }
                }
            }
        }
        self
    }

    fn merge(self, other: ArchiveUsage) -> Self {
        ArchiveUsage {
            crypt: self.crypt.merge(other.crypt),
            library: self.library.merge(other.library),
            skipped_refs: self.skipped_refs + other.skipped_refs,
        }
    }
}

/// Sum per-deck quantities by card id, independently for crypt and library.
/// Decks are folded in parallel; the merge keeps first-seen order so the result
/// matches a sequential pass.
pub fn aggregate_usage(archive: &Archive, db: &CardDatabase) -> ArchiveUsage {
    let usage = archive
        .decks()
        .par_iter()
        .fold(ArchiveUsage::default, |acc, deck| acc.add_deck(deck, db))
        .reduce(ArchiveUsage::default, ArchiveUsage::merge);

    info!(
        decks = archive.len(),
        crypt_cards = usage.crypt.len(),
        library_cards = usage.library.len(),
        skipped_refs = usage.skipped_refs,
        "aggregated archive usage"
    );
    usage
}

/// How often one card shows up across the archive
#[derive(Debug, Clone, PartialEq)]
pub struct CardPresence {
    pub card_id: CardId,
    pub copies: u64,
    pub decks_with_card: usize,
    pub total_decks: usize,
}

impl CardPresence {
    /// Percentage of decks running at least one copy
    pub fn meta_presence(&self) -> f64 {
        if self.total_decks == 0 {
            return 0.0;
        }
        self.decks_with_card as f64 / self.total_decks as f64 * 100.0
    }
}

pub fn card_presence(archive: &Archive, db: &CardDatabase, card_id: CardId) -> CardPresence {
    let mut copies = 0;
    let mut decks_with_card = 0;

    for deck in archive.decks() {
        let mut found_in_deck = false;
        for category in Category::ALL {
            for card_ref in deck.cards(category) {
                if card_ref.resolve(db).map(|c| c.id) == Some(card_id) {
                    copies += u64::from(card_ref.count);
                    found_in_deck = true;
                }
            }
        }
        if found_in_deck {
            decks_with_card += 1;
        }
    }

    CardPresence {
        card_id,
        copies,
        decks_with_card,
        total_decks: archive.len(),
    }
}

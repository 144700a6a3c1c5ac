//! Difficulty report generation
//!
//! Ranks each category independently, classifies every card of the database
//! (played or not), and emits per-category lists sorted easiest first.

use crate::archive::{Archive, ArchiveUsage};
use crate::card::{Card, CardDatabase, CardId, Category, Group};
use crate::difficulty::ranking::{classify, RankedPopulation};
use crate::difficulty::tier::{Tier, TierTable};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use thiserror::Error;
use tracing::{info, warn};

#[derive(Error, Debug)]
pub enum OutputError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
}

/// One card in the emitted dataset
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CardDifficulty {
    pub id: CardId,
    pub name: String,
    pub slug: String,
    pub types: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub disciplines: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub clan: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub capacity: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group: Option<Group>,
    pub count: u64,
    pub difficulty: Tier,
}

impl CardDifficulty {
    fn new(card: &Card, category: Category, count: u64, difficulty: Tier) -> Self {
        let crypt = category == Category::Crypt;
        CardDifficulty {
            id: card.id,
            name: card.name.clone(),
            slug: card.slug(),
            types: card.types.clone(),
            disciplines: card.disciplines.clone(),
            clan: card.clans.first().cloned(),
            capacity: if crypt { card.capacity } else { None },
            group: if crypt { card.group.clone() } else { None },
            count,
            difficulty,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportMetadata {
    pub total_decks_analyzed: usize,
    pub total_crypt_cards: usize,
    pub total_library_cards: usize,
    pub ranked_crypt_cards: usize,
    pub ranked_library_cards: usize,
    pub skipped_card_refs: usize,
    pub difficulty_levels: BTreeMap<String, String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub generated_at: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DifficultyReport {
    pub metadata: ReportMetadata,
    pub crypt: Vec<CardDifficulty>,
    pub library: Vec<CardDifficulty>,
}

/// Per-tier summary of one category
#[derive(Debug, Clone, PartialEq)]
pub struct TierSummary {
    pub tier: Tier,
    pub cards: usize,
    pub examples: Vec<String>,
}

const EXAMPLES_PER_TIER: usize = 5;

/// Classify every card of one category and sort by (tier, count desc)
pub fn classify_category(
    db: &CardDatabase,
    category: Category,
    usage: &ArchiveUsage,
    table: &TierTable,
) -> (Vec<CardDifficulty>, usize) {
    let counts = usage.category(category);
    let population = RankedPopulation::from_usage(counts);

    let mut cards: Vec<CardDifficulty> = db
        .in_category(category)
        .map(|card| {
            let count = counts.get(card.id);
            let tier = classify(card.id, count, &population, table);
            CardDifficulty::new(card, category, count, tier)
        })
        .collect();

    cards.sort_by(|a, b| {
        a.difficulty
            .cmp(&b.difficulty)
            .then_with(|| b.count.cmp(&a.count))
    });

    (cards, population.len())
}

/// Build the full report from the card database and the usage of an archive
pub fn generate_report(
    db: &CardDatabase,
    archive: &Archive,
    usage: &ArchiveUsage,
    table: &TierTable,
) -> DifficultyReport {
    let uncategorized = db.cards().iter().filter(|c| c.category().is_none()).count();
    if uncategorized > 0 {
        warn!(uncategorized, "cards without a type line were left out");
    }

    let (crypt, ranked_crypt) = classify_category(db, Category::Crypt, usage, table);
    let (library, ranked_library) = classify_category(db, Category::Library, usage, table);

    info!(
        crypt = crypt.len(),
        ranked_crypt,
        library = library.len(),
        ranked_library,
        "difficulty levels assigned"
    );

    let difficulty_levels = table
        .tiers()
        .map(|tier| (tier.to_string(), table.describe(tier)))
        .collect();

    DifficultyReport {
        metadata: ReportMetadata {
            total_decks_analyzed: archive.len(),
            total_crypt_cards: crypt.len(),
            total_library_cards: library.len(),
            ranked_crypt_cards: ranked_crypt,
            ranked_library_cards: ranked_library,
            skipped_card_refs: usage.skipped_refs,
            difficulty_levels,
            generated_at: None,
        },
        crypt,
        library,
    }
}

impl DifficultyReport {
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, OutputError> {
        let content = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }

    pub fn to_json(&self) -> Result<String, OutputError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn write_to_file(&self, path: impl AsRef<Path>) -> Result<(), OutputError> {
        std::fs::write(path, self.to_json()?)?;
        Ok(())
    }

    pub fn cards(&self, category: Category) -> &[CardDifficulty] {
        match category {
            Category::Crypt => &self.crypt,
            Category::Library => &self.library,
        }
    }

    /// Card counts per tier, with the first few names of each tier as examples.
    /// Tiers come out in ascending order; empty tiers between used ones are included.
    pub fn distribution(&self, category: Category) -> Vec<TierSummary> {
        let cards = self.cards(category);
        let max_tier = cards.iter().map(|c| c.difficulty).max().unwrap_or(Tier(0));

        (1..=max_tier.0)
            .map(Tier)
            .map(|tier| {
                let in_tier: Vec<_> = cards.iter().filter(|c| c.difficulty == tier).collect();
                TierSummary {
                    tier,
                    cards: in_tier.len(),
                    examples: in_tier
                        .iter()
                        .filter(|c| c.count > 0)
                        .take(EXAMPLES_PER_TIER)
                        .map(|c| format!("{} ({})", c.name, c.count))
                        .collect(),
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::archive::{aggregate_usage, CardRef, DeckRecord};
    use std::collections::HashSet;

    fn fixture_report() -> DifficultyReport {
        let db = CardDatabase::from_file("fixtures/vtes_cards.json").expect("Failed to load cards");
        let archive = Archive::from_file("fixtures/twda.json").expect("Failed to load archive");
        let usage = aggregate_usage(&archive, &db);
        generate_report(&db, &archive, &usage, &TierTable::default())
    }

    fn tier_of(cards: &[CardDifficulty], id: CardId) -> Tier {
        cards
            .iter()
            .find(|c| c.id == id)
            .map(|c| c.difficulty)
            .expect("card should be in report")
    }

    #[test]
    fn test_fixture_crypt_tiers() {
        let report = fixture_report();
        // Anson 6, Enkidu 6 (tie, Anson seen first), Alexandra 2, Jennie Orne unused
        let ids: Vec<_> = report.crypt.iter().map(|c| c.id).collect();
        assert_eq!(ids, vec![200076, 200517, 200025, 201012]);
        assert_eq!(tier_of(&report.crypt, 200076), Tier(3));
        assert_eq!(tier_of(&report.crypt, 200517), Tier(4));
        assert_eq!(tier_of(&report.crypt, 200025), Tier(5));
        assert_eq!(tier_of(&report.crypt, 201012), Tier(6));
    }

    #[test]
    fn test_fixture_library_tiers() {
        let report = fixture_report();
        assert_eq!(report.metadata.ranked_library_cards, 5);
        assert_eq!(tier_of(&report.library, 100545), Tier(2));
        assert_eq!(tier_of(&report.library, 100058), Tier(3));
        assert_eq!(tier_of(&report.library, 100279), Tier(4));
        assert_eq!(tier_of(&report.library, 100199), Tier(4));
        assert_eq!(tier_of(&report.library, 101384), Tier(5));
        assert_eq!(tier_of(&report.library, 102088), Tier(6));
    }

    #[test]
    fn test_metadata() {
        let report = fixture_report();
        let meta = &report.metadata;
        assert_eq!(meta.total_decks_analyzed, 3);
        assert_eq!(meta.total_crypt_cards, 4);
        assert_eq!(meta.total_library_cards, 6);
        assert_eq!(meta.ranked_crypt_cards, 3);
        assert_eq!(meta.skipped_card_refs, 2);
        assert_eq!(meta.difficulty_levels.len(), 6);
        assert_eq!(
            meta.difficulty_levels.get("6").map(|s| s.as_str()),
            Some("Level 6: Unknown (0 appearances)")
        );
    }

    #[test]
    fn test_crypt_only_fields() {
        let report = fixture_report();
        let anson = report.crypt.iter().find(|c| c.id == 200076).expect("Anson");
        assert_eq!(anson.capacity, Some(8));
        assert_eq!(anson.clan.as_deref(), Some("Toreador"));
        assert_eq!(anson.slug, "anson");
        let bums = report.library.iter().find(|c| c.id == 100279).expect("Bum's Rush");
        assert_eq!(bums.capacity, None);
        assert_eq!(bums.group, None);
    }

    #[test]
    fn test_tiers_partition_each_category() {
        let db = CardDatabase::from_file("fixtures/vtes_cards.json").expect("Failed to load cards");
        let report = fixture_report();
        for category in Category::ALL {
            let expected: HashSet<CardId> = db.in_category(category).map(|c| c.id).collect();
            let emitted: Vec<CardId> = report.cards(category).iter().map(|c| c.id).collect();
            let unique: HashSet<CardId> = emitted.iter().copied().collect();
            assert_eq!(emitted.len(), unique.len(), "no duplicates in {}", category);
            assert_eq!(unique, expected, "every {} card exactly once", category);
        }
    }

    #[test]
    fn test_sorted_by_tier_then_count() {
        let report = fixture_report();
        for category in Category::ALL {
            for pair in report.cards(category).windows(2) {
                let (a, b) = (&pair[0], &pair[1]);
                assert!(
                    a.difficulty < b.difficulty
                        || (a.difficulty == b.difficulty && a.count >= b.count)
                );
            }
        }
    }

    #[test]
    fn test_idempotent_output() {
        let first = fixture_report().to_json().expect("serialize");
        let second = fixture_report().to_json().expect("serialize");
        assert_eq!(first, second);
    }

    #[test]
    fn test_empty_archive_all_terminal() {
        let db = CardDatabase::from_file("fixtures/vtes_cards.json").expect("Failed to load cards");
        let archive = Archive::default();
        let usage = aggregate_usage(&archive, &db);
        let report = generate_report(&db, &archive, &usage, &TierTable::default());
        assert!(report.crypt.iter().all(|c| c.difficulty == Tier(6)));
        assert!(report.library.iter().all(|c| c.difficulty == Tier(6)));
        assert_eq!(report.metadata.ranked_crypt_cards, 0);
    }

    #[test]
    fn test_categories_ranked_independently() {
        let db = CardDatabase::from_file("fixtures/vtes_cards.json").expect("Failed to load cards");
        let crypt = vec![CardRef::new(200076, 12), CardRef::new(200025, 3)];
        let report_with = |library: Vec<CardRef>| {
            let archive = Archive::from_decks(vec![DeckRecord {
                id: None,
                crypt: crypt.clone(),
                library,
            }]);
            let usage = aggregate_usage(&archive, &db);
            generate_report(&db, &archive, &usage, &TierTable::default())
        };

        let without_library = report_with(vec![]);
        // N = 2: percentiles 0.5 and 1.0
        assert_eq!(tier_of(&without_library.crypt, 200076), Tier(3));
        assert_eq!(tier_of(&without_library.crypt, 200025), Tier(5));
        assert!(without_library.library.iter().all(|c| c.difficulty == Tier(6)));

        let with_library = report_with(vec![
            CardRef::new(100279, 40),
            CardRef::new(100545, 25),
            CardRef::new(100058, 1),
        ]);
        assert_eq!(with_library.crypt, without_library.crypt);
        assert_eq!(tier_of(&with_library.library, 100279), Tier(3));
    }

    #[test]
    fn test_distribution() {
        let report = fixture_report();
        let dist = report.distribution(Category::Library);
        assert_eq!(dist.len(), 6);
        assert_eq!(dist[0].cards, 0);
        assert_eq!(dist[1].examples, vec!["Deflection (10)".to_string()]);
        assert_eq!(dist[3].cards, 2);
        assert_eq!(dist[5].cards, 1);
        assert!(dist[5].examples.is_empty());
    }

    #[test]
    fn test_report_file_roundtrip() {
        let report = fixture_report();
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("vtes_guess_data.json");
        report.write_to_file(&path).expect("write report");
        let loaded = DifficultyReport::from_file(&path).expect("read report");
        assert_eq!(loaded, report);
    }
}

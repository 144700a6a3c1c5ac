//! Semantic distractors for library cards
//!
//! For every library card, picks the names of the most similar other cards of
//! the same primary type. Those are shown as wrong answers next to the real name.

pub mod index;

pub use index::{tokenize, SimilarityIndex};

use crate::card::{Card, CardId};
use crate::difficulty::OutputError;
use indicatif::ProgressBar;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use tracing::info;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DistractorOptions {
    /// Answer options per question, the correct one included
    pub options: usize,
    /// Most similar cards inspected before filtering
    pub candidate_pool: usize,
}

impl Default for DistractorOptions {
    fn default() -> Self {
        DistractorOptions {
            options: 4,
            candidate_pool: 20,
        }
    }
}

impl DistractorOptions {
    pub fn distractors_needed(&self) -> usize {
        self.options.saturating_sub(1)
    }
}

/// Text fed to the similarity index for one card
pub fn card_profile(card: &Card) -> String {
    let card_type = card.primary_type().unwrap_or("Unknown");
    let disciplines = if card.disciplines.is_empty() {
        "No Discipline".to_string()
    } else {
        card.disciplines.join(" ")
    };
    let text = card.card_text.replace('\n', " ").replace('/', " ");
    format!("{} {} {} {}", card.name, card_type, disciplines, text)
}

fn is_acceptable(target: &Card, candidate: &Card) -> bool {
    match (target.primary_type(), candidate.primary_type()) {
        (Some(t), Some(c)) if t == c => !candidate.name.contains(target.name.as_str()),
        _ => false,
    }
}

/// Card id to distractor names
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DistractorReport {
    pub distractors: BTreeMap<CardId, Vec<String>>,
}

impl DistractorReport {
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

    pub fn len(&self) -> usize {
        self.distractors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.distractors.is_empty()
    }

    /// Distractor names of `id` padded with "N/A" up to `width` slots
    pub fn slots(&self, id: CardId, width: usize) -> Vec<&str> {
        let names = self.distractors.get(&id).map(|v| v.as_slice()).unwrap_or(&[]);
        (0..width.max(names.len()))
            .map(|i| names.get(i).map(|s| s.as_str()).unwrap_or("N/A"))
            .collect()
    }

    /// Targets that ended up with fewer distractors than requested
    pub fn short_entries(&self, needed: usize) -> usize {
        self.distractors.values().filter(|d| d.len() < needed).count()
    }
}

/// Pick distractors for each of `cards`, scoring targets in parallel
pub fn generate_distractors(
    cards: &[&Card],
    options: &DistractorOptions,
    progress: &ProgressBar,
) -> DistractorReport {
    let profiles: Vec<String> = cards.iter().map(|c| card_profile(c)).collect();
    let index = SimilarityIndex::build(&profiles);
    let needed = options.distractors_needed();

    let distractors = (0..cards.len())
        .into_par_iter()
        .map(|i| {
            let target = cards[i];
            let picks: Vec<String> = index
                .ranked(i)
                .into_iter()
                .take(options.candidate_pool)
                .filter(|&(j, _)| j != i)
                .map(|(j, _)| cards[j])
                .filter(|candidate| is_acceptable(target, candidate))
                .take(needed)
                .map(|candidate| candidate.name.clone())
                .collect();
            progress.inc(1);
            (target.id, picks)
        })
        .collect::<BTreeMap<_, _>>();

    let report = DistractorReport { distractors };
    info!(
        cards = report.len(),
        incomplete = report.short_entries(needed),
        "distractors generated"
    );
    report
}

#[cfg(test)]
mod tests {
    use super::*;

    fn card(id: CardId, name: &str, types: &[&str], text: &str) -> Card {
        Card {
            id,
            name: name.to_string(),
            types: types.iter().map(|t| t.to_string()).collect(),
            clans: vec![],
            disciplines: vec![],
            capacity: None,
            group: None,
            card_text: text.to_string(),
        }
    }

    fn pool() -> Vec<Card> {
        vec![
            card(1, "Aid from Bats", &["Combat"], "Strike: 1R damage, with 1 optional maneuver."),
            card(2, "Claws of the Dead", &["Combat"], "Strike: 1R damage, with 1 optional press."),
            card(3, "Bum's Rush", &["Action"], "Enter combat with a ready minion."),
            card(4, "Aid from Bats (Promo)", &["Combat"], "Strike: 1R damage, with 1 optional maneuver."),
            card(5, "Torn Signpost", &["Equipment"], "Strike: hand damage +1."),
            card(6, "Trap", &["Combat"], "Strike: 2R damage, only usable at long range."),
            card(7, "Hidden Strength", &["Combat"], "Strike: strength damage +1 press."),
            card(8, "Blank", &[], "Strike: 1R damage, with 1 optional maneuver."),
        ]
    }

    fn run(cards: &[Card], options: &DistractorOptions) -> DistractorReport {
        let refs: Vec<&Card> = cards.iter().collect();
        generate_distractors(&refs, options, &ProgressBar::hidden())
    }

    #[test]
    fn test_profile_text() {
        let mut c = card(1, "Aid from Bats", &["Combat"], "[ani] Strike.\n[ANI] Press/maneuver.");
        c.disciplines = vec!["ani".to_string()];
        assert_eq!(
            card_profile(&c),
            "Aid from Bats Combat ani [ani] Strike. [ANI] Press maneuver."
        );
        let plain = card(2, "Blood Doll", &["Master"], "");
        assert_eq!(card_profile(&plain), "Blood Doll Master No Discipline ");
    }

    #[test]
    fn test_filters_self_type_and_name_containment() {
        let cards = pool();
        let report = run(&cards, &DistractorOptions::default());
        let bats = report.distractors.get(&1).expect("Aid from Bats entry");

        assert_eq!(bats.len(), 3);
        assert!(!bats.contains(&"Aid from Bats".to_string()), "not itself");
        assert!(!bats.contains(&"Aid from Bats (Promo)".to_string()), "not a name variant");
        assert!(!bats.contains(&"Torn Signpost".to_string()), "not another type");
        assert!(!bats.contains(&"Blank".to_string()), "not untyped");
        assert_eq!(bats[0], "Claws of the Dead");
    }

    #[test]
    fn test_every_card_gets_an_entry() {
        let cards = pool();
        let report = run(&cards, &DistractorOptions::default());
        assert_eq!(report.len(), cards.len());
        assert!(report.distractors[&8].is_empty(), "untyped card has no candidates");
        assert!(report.distractors[&3].is_empty(), "only action card");
    }

    #[test]
    fn test_options_and_pool_limits() {
        let cards = pool();
        let two = DistractorOptions {
            options: 2,
            candidate_pool: 20,
        };
        assert_eq!(run(&cards, &two).distractors[&1].len(), 1);

        let tiny_pool = DistractorOptions {
            options: 4,
            candidate_pool: 1,
        };
        assert!(run(&cards, &tiny_pool).distractors[&1].is_empty());
    }

    #[test]
    fn test_slots_follow_configured_width() {
        let cards = pool();
        let five = DistractorOptions {
            options: 5,
            candidate_pool: 20,
        };
        let report = run(&cards, &five);

        let bats = report.slots(1, five.distractors_needed());
        assert_eq!(bats.len(), 4);
        assert_eq!(bats[0], "Claws of the Dead");
        // only three other combat cards survive the filters
        assert_eq!(bats[3], "N/A");

        assert_eq!(report.slots(3, 3), vec!["N/A", "N/A", "N/A"]);
        assert_eq!(report.slots(999, 2), vec!["N/A", "N/A"]);
        assert_eq!(report.slots(1, 1).len(), 3, "never truncates stored names");
    }

    #[test]
    fn test_deterministic() {
        let cards = pool();
        let first = run(&cards, &DistractorOptions::default());
        let second = run(&cards, &DistractorOptions::default());
        assert_eq!(first, second);
    }

    #[test]
    fn test_json_roundtrip_keys() {
        let cards = pool();
        let report = run(&cards, &DistractorOptions::default());
        let json = report.to_json().expect("serialize");
        let value: serde_json::Value = serde_json::from_str(&json).expect("valid json");
        assert_eq!(value["1"][0], "Claws of the Dead");
        let back: DistractorReport = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(back, report);
    }
}

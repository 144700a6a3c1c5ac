use crate::archive::UsageCount;
use crate::card::CardId;
use crate::difficulty::tier::{Tier, TierTable};
use std::collections::HashMap;
use tracing::warn;

/// Cards of one category that were played at least once, most played first.
/// Ties keep the usage map's first-seen order.
#[derive(Debug, Clone, Default)]
pub struct RankedPopulation {
    entries: Vec<(CardId, u64)>,
    ranks: HashMap<CardId, usize>,
}

impl RankedPopulation {
    pub fn from_usage(usage: &UsageCount) -> Self {
        Self::from_counts(usage.iter())
    }

    pub fn from_counts(counts: impl IntoIterator<Item = (CardId, u64)>) -> Self {
        let mut entries: Vec<(CardId, u64)> =
            counts.into_iter().filter(|&(_, count)| count > 0).collect();
        // sort_by is stable
        entries.sort_by(|a, b| b.1.cmp(&a.1));

        let mut ranks = HashMap::with_capacity(entries.len());
        for (i, &(id, _)) in entries.iter().enumerate() {
            ranks.entry(id).or_insert(i + 1);
        }

        RankedPopulation { entries, ranks }
    }

    /// N, the percentile denominator
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// 1-indexed rank of the first entry with this id
    pub fn rank(&self, id: CardId) -> Option<usize> {
        self.ranks.get(&id).copied()
    }

    pub fn entries(&self) -> &[(CardId, u64)] {
        &self.entries
    }
}

/// Assign a tier to one card from its usage and its category's ranked population.
pub fn classify(card_id: CardId, count: u64, population: &RankedPopulation, table: &TierTable) -> Tier {
    if count == 0 || population.is_empty() {
        return table.terminal();
    }

    let Some(rank) = population.rank(card_id) else {
        warn!(card_id, count, "used card missing from ranked population, using fallback tier");
        return table.fallback();
    };

    let percentile = rank as f64 / population.len() as f64;
    table.tier_for_percentile(percentile)
}

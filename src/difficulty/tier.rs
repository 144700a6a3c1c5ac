use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Popularity bucket. Lower is more played; the table's terminal tier is reserved
/// for cards that never appeared in the archive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Tier(pub u8);

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Error, Debug, PartialEq)]
pub enum TierTableError {
    #[error("threshold {0} is outside (0, 1]")]
    OutOfRange(f64),
    #[error("thresholds must be strictly ascending ({0} follows {1})")]
    NotAscending(f64, f64),
    #[error("too many thresholds ({0})")]
    TooMany(usize),
}

/// Ascending inclusive percentile cut-offs.
///
/// With `k` thresholds, percentiles `<= thresholds[i]` map to tier `i + 1`,
/// anything above the last one to tier `k + 1`, and unused cards to tier `k + 2`.
#[derive(Debug, Clone, PartialEq)]
pub struct TierTable {
    thresholds: Vec<f64>,
}

pub const DEFAULT_THRESHOLDS: [f64; 4] = [0.10, 0.25, 0.50, 0.85];

const DEFAULT_LABELS: [&str; 6] = [
    "Staples",
    "Common",
    "Uncommon",
    "Rare",
    "Obscure",
    "Unknown",
];

impl Default for TierTable {
    fn default() -> Self {
        TierTable {
            thresholds: DEFAULT_THRESHOLDS.to_vec(),
        }
    }
}

impl TierTable {
    pub fn new(thresholds: Vec<f64>) -> Result<Self, TierTableError> {
        // terminal tier must still fit in a u8
        if thresholds.len() > usize::from(u8::MAX) - 2 {
            return Err(TierTableError::TooMany(thresholds.len()));
        }
        let mut previous: Option<f64> = None;
        for &t in &thresholds {
            if !(t > 0.0 && t <= 1.0) {
                return Err(TierTableError::OutOfRange(t));
            }
            if let Some(p) = previous {
                if t <= p {
                    return Err(TierTableError::NotAscending(t, p));
                }
            }
            previous = Some(t);
        }
        Ok(TierTable { thresholds })
    }

    pub fn thresholds(&self) -> &[f64] {
        &self.thresholds
    }

    /// Worst tier a used card can receive
    pub fn worst_ranked(&self) -> Tier {
        Tier(self.thresholds.len() as u8 + 1)
    }

    /// Tier for cards with zero usage
    pub fn terminal(&self) -> Tier {
        Tier(self.thresholds.len() as u8 + 2)
    }

    /// Tier for a card that has usage but could not be ranked: the second-worst tier
    pub fn fallback(&self) -> Tier {
        self.worst_ranked()
    }

    pub fn tier_for_percentile(&self, percentile: f64) -> Tier {
        self.thresholds
            .iter()
            .position(|&t| percentile <= t)
            .map(|i| Tier(i as u8 + 1))
            .unwrap_or_else(|| self.worst_ranked())
    }

    pub fn tiers(&self) -> impl Iterator<Item = Tier> {
        (1..=self.terminal().0).map(Tier)
    }

    /// Human readable description of a tier, used in report metadata
    pub fn describe(&self, tier: Tier) -> String {
        let n = usize::from(tier.0);
        if tier == self.terminal() {
            return format!("Level {}: Unknown (0 appearances)", n);
        }
        if tier.0 == 0 || tier > self.terminal() {
            return format!("Level {}", n);
        }

        let lower = if n == 1 { 0.0 } else { self.thresholds[n - 2] };
        let upper = self.thresholds.get(n - 1).copied().unwrap_or(1.0);
        let width = ((upper - lower) * 100.0).round();

        let span = if n == 1 {
            format!("Top {}%", width)
        } else if tier == self.worst_ranked() {
            format!("Bottom {}%", width)
        } else {
            format!("Next {}%", width)
        };

        if self.thresholds == DEFAULT_THRESHOLDS {
            format!("Level {}: {} ({})", n, DEFAULT_LABELS[n - 1], span)
        } else {
            format!("Level {}: {}", n, span)
        }
    }
}

pub mod deck;
pub mod usage;

pub use deck::{Archive, ArchiveError, CardRef, DeckRecord};
pub use usage::{aggregate_usage, card_presence, ArchiveUsage, CardPresence, UsageCount};

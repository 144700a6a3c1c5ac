pub mod ranking;
pub mod report;
pub mod tier;

pub use ranking::{classify, RankedPopulation};
pub use report::{
    classify_category, generate_report, CardDifficulty, DifficultyReport, OutputError,
    ReportMetadata, TierSummary,
};
pub use tier::{Tier, TierTable, TierTableError, DEFAULT_THRESHOLDS};

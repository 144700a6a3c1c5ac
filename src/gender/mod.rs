//! Gender tags for crypt cards
//!
//! Each vampire or imbued is run through a [`DetectorChain`]; the result maps
//! card id to `"M"`, `"F"` or `"?"`.

pub mod detector;
pub mod names;
pub mod tables;

pub use detector::{
    Candidate, Detection, DetectorChain, FirstWordDetector, FullNameDetector, GenderDetector,
    OverrideDetector, PronounDetector,
};
pub use tables::{GenderDataError, GenderTables};

use crate::card::{CardDatabase, CardId, Category};
use crate::difficulty::OutputError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use tracing::{debug, info};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Gender {
    #[serde(rename = "M")]
    Male,
    #[serde(rename = "F")]
    Female,
    #[serde(rename = "?")]
    Unknown,
}

#[derive(Debug, Clone, Default)]
pub struct GenderReport {
    pub genders: BTreeMap<CardId, Gender>,
    /// How many cards each detector decided
    pub detector_hits: BTreeMap<&'static str, usize>,
    /// Names left as unknown, sorted
    pub unknown_names: Vec<String>,
}

impl GenderReport {
    pub fn count(&self, gender: Gender) -> usize {
        self.genders.values().filter(|&&g| g == gender).count()
    }

    pub fn hits(&self, detector: &str) -> usize {
        self.detector_hits.get(detector).copied().unwrap_or(0)
    }

    pub fn to_json(&self) -> Result<String, OutputError> {
        Ok(serde_json::to_string_pretty(&self.genders)?)
    }

    pub fn write_to_file(&self, path: impl AsRef<Path>) -> Result<(), OutputError> {
        std::fs::write(path, self.to_json()?)?;
        Ok(())
    }
}

/// Tag every crypt card of the database
pub fn tag_crypt(db: &CardDatabase, chain: &DetectorChain) -> GenderReport {
    let mut report = GenderReport::default();

    for card in db.in_category(Category::Crypt) {
        let detection = chain.detect(&Candidate::new(&card.name, &card.card_text));
        debug!(id = card.id, name = %card.name, ?detection, "gender detected");

        report.genders.insert(card.id, detection.gender);
        if let Some(detector) = detection.detector {
            *report.detector_hits.entry(detector).or_insert(0) += 1;
        }
        if detection.gender == Gender::Unknown {
            report.unknown_names.push(card.name.clone());
        }
    }
    report.unknown_names.sort();

    info!(
        crypt = report.genders.len(),
        male = report.count(Gender::Male),
        female = report.count(Gender::Female),
        unknown = report.count(Gender::Unknown),
        "gender tags assigned"
    );
    report
}

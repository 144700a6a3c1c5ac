use crate::gender::names::{clean_name, first_word, short_name, strip_group_notation};
use crate::gender::tables::GenderTables;
use crate::gender::Gender;
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashMap;
use std::sync::Arc;

static MALE_PRONOUNS: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\b(?:he|his|him|himself)\b").expect("Failed to compile male pronoun regex")
});

static FEMALE_PRONOUNS: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\b(?:she|her|hers|herself)\b").expect("Failed to compile female pronoun regex")
});

/// A crypt card as seen by the detectors, with its name variants precomputed
#[derive(Debug, Clone)]
pub struct Candidate<'a> {
    pub name: &'a str,
    pub card_text: &'a str,
    base_name: String,
    clean_name: String,
}

impl<'a> Candidate<'a> {
    pub fn new(name: &'a str, card_text: &'a str) -> Self {
        Candidate {
            name,
            card_text,
            base_name: strip_group_notation(name),
            clean_name: clean_name(name),
        }
    }

    /// Name without group notation
    pub fn base_name(&self) -> &str {
        &self.base_name
    }

    /// Name without group notation, epithet or title
    pub fn clean_name(&self) -> &str {
        &self.clean_name
    }
}

/// One stage of the gender heuristic chain
pub trait GenderDetector: Send + Sync {
    fn name(&self) -> &'static str;
    fn try_detect(&self, candidate: &Candidate<'_>) -> Option<Gender>;
}

/// Hand-maintained exceptions. Full base name first, then the part before the comma.
#[derive(Debug, Clone)]
pub struct OverrideDetector {
    overrides: HashMap<String, Gender>,
}

impl OverrideDetector {
    pub fn new(overrides: HashMap<String, Gender>) -> Self {
        OverrideDetector { overrides }
    }
}

impl GenderDetector for OverrideDetector {
    fn name(&self) -> &'static str {
        "override"
    }

    fn try_detect(&self, candidate: &Candidate<'_>) -> Option<Gender> {
        let base = candidate.base_name();
        self.overrides
            .get(base)
            .or_else(|| self.overrides.get(short_name(base)))
            .copied()
    }
}

/// Cleaned name looked up as a given name ("Theo Bell" rarely hits, "Beckett" might)
#[derive(Debug, Clone)]
pub struct FullNameDetector {
    given_names: Arc<HashMap<String, Gender>>,
}

impl FullNameDetector {
    pub fn new(given_names: Arc<HashMap<String, Gender>>) -> Self {
        FullNameDetector { given_names }
    }
}

impl GenderDetector for FullNameDetector {
    fn name(&self) -> &'static str {
        "full-name"
    }

    fn try_detect(&self, candidate: &Candidate<'_>) -> Option<Gender> {
        self.given_names
            .get(&candidate.clean_name().to_lowercase())
            .copied()
    }
}

/// First word of the cleaned name, when that is not the whole name
#[derive(Debug, Clone)]
pub struct FirstWordDetector {
    given_names: Arc<HashMap<String, Gender>>,
}

impl FirstWordDetector {
    pub fn new(given_names: Arc<HashMap<String, Gender>>) -> Self {
        FirstWordDetector { given_names }
    }
}

impl GenderDetector for FirstWordDetector {
    fn name(&self) -> &'static str {
        "first-word"
    }

    fn try_detect(&self, candidate: &Candidate<'_>) -> Option<Gender> {
        let clean = candidate.clean_name();
        let word = first_word(clean)?;
        if word == clean {
            return None;
        }
        self.given_names.get(&word.to_lowercase()).copied()
    }
}

/// Gendered pronouns in the card text. Needs an unopposed signal, or a
/// majority of at least two.
#[derive(Debug, Clone, Copy, Default)]
pub struct PronounDetector;

impl PronounDetector {
    pub fn count(text: &str) -> (usize, usize) {
        let text = text.to_lowercase();
        (
            MALE_PRONOUNS.find_iter(&text).count(),
            FEMALE_PRONOUNS.find_iter(&text).count(),
        )
    }
}

impl GenderDetector for PronounDetector {
    fn name(&self) -> &'static str {
        "pronouns"
    }

    fn try_detect(&self, candidate: &Candidate<'_>) -> Option<Gender> {
        if candidate.card_text.is_empty() {
            return None;
        }

        let (male, female) = Self::count(candidate.card_text);
        match (male, female) {
            (m, 0) if m > 0 => Some(Gender::Male),
            (0, f) if f > 0 => Some(Gender::Female),
            (m, f) if m > f && m >= 2 => Some(Gender::Male),
            (m, f) if f > m && f >= 2 => Some(Gender::Female),
            _ => None,
        }
    }
}

/// Outcome of running the chain on one candidate
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Detection {
    pub gender: Gender,
    /// Detector that decided, `None` when every stage passed
    pub detector: Option<&'static str>,
}

/// Ordered list of detectors; the first one with an answer wins
#[derive(Clone, Default)]
pub struct DetectorChain {
    detectors: Vec<Arc<dyn GenderDetector>>,
}

impl DetectorChain {
    pub fn new() -> Self {
        DetectorChain {
            detectors: Vec::new(),
        }
    }

    /// Override table, full name, first word, then card text pronouns
    pub fn standard(tables: GenderTables) -> Self {
        let given_names = Arc::new(tables.given_names);
        let mut chain = DetectorChain::new();
        chain.register(Arc::new(OverrideDetector::new(tables.overrides)));
        chain.register(Arc::new(FullNameDetector::new(Arc::clone(&given_names))));
        chain.register(Arc::new(FirstWordDetector::new(given_names)));
        chain.register(Arc::new(PronounDetector));
        chain
    }

    pub fn register(&mut self, detector: Arc<dyn GenderDetector>) {
        self.detectors.push(detector);
    }

    pub fn detector_names(&self) -> Vec<&'static str> {
        self.detectors.iter().map(|d| d.name()).collect()
    }

    pub fn detect(&self, candidate: &Candidate<'_>) -> Detection {
        self.detectors
            .iter()
            .find_map(|d| {
                d.try_detect(candidate).map(|gender| Detection {
                    gender,
                    detector: Some(d.name()),
                })
            })
            .unwrap_or(Detection {
                gender: Gender::Unknown,
                detector: None,
            })
    }
}

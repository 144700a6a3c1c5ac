pub mod archive;
pub mod card;
pub mod config;
pub mod difficulty;
pub mod distractors;
pub mod gender;
pub mod rng;

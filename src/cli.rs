use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "vtes-guess-data")]
#[command(about = "Offline dataset generators for the VTES card guessing game", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// TOML configuration file (tier thresholds, gender tables, distractor options)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Log pass summaries (set RUST_LOG for finer control)
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Assign difficulty levels from tournament deck popularity
    Difficulty {
        /// Card database (KRCG vtes.json)
        #[arg(long, default_value = "vtes.json")]
        cards: PathBuf,

        /// Tournament winning deck archive (KRCG twda.json)
        #[arg(long, default_value = "twda.json")]
        archive: PathBuf,

        /// Output file
        #[arg(short, long, default_value = "vtes_guess_data.json")]
        output: PathBuf,

        /// Record the generation time in the metadata (output then differs between runs)
        #[arg(long)]
        timestamp: bool,
    },

    /// Tag crypt cards with a gender
    Genders {
        /// Card database (KRCG vtes.json)
        #[arg(long, default_value = "vtes.json")]
        cards: PathBuf,

        /// Override and given-name tables, replaces the configured path
        #[arg(long)]
        tables: Option<PathBuf>,

        /// Output file
        #[arg(short, long, default_value = "vtes_gender.json")]
        output: PathBuf,
    },

    /// Pick look-alike wrong answers for every library card
    Distractors {
        /// Card database (KRCG vtes.json)
        #[arg(long, default_value = "vtes.json")]
        cards: PathBuf,

        /// Output file
        #[arg(short, long, default_value = "premium_distractors.json")]
        output: PathBuf,
    },

    /// Show how often one card was played in the archive
    Usage {
        /// Card name or id
        card: String,

        /// Card database (KRCG vtes.json)
        #[arg(long, default_value = "vtes.json")]
        cards: PathBuf,

        /// Tournament winning deck archive (KRCG twda.json)
        #[arg(long, default_value = "twda.json")]
        archive: PathBuf,
    },

    /// Summarize a generated difficulty file
    Stats {
        /// Difficulty file produced by the `difficulty` command
        #[arg(default_value = "vtes_guess_data.json")]
        report: PathBuf,
    },

    /// Print a random sample of generated distractors
    Examples {
        /// Distractor file produced by the `distractors` command
        #[arg(long, default_value = "premium_distractors.json")]
        distractors: PathBuf,

        /// Difficulty file, used to resolve card names
        #[arg(long, default_value = "vtes_guess_data.json")]
        report: PathBuf,

        /// Number of cards to show
        #[arg(short = 'n', long, default_value = "20")]
        count: usize,

        /// Seed for reproducibility
        #[arg(short, long)]
        seed: Option<u64>,
    },
}

mod cli;

use clap::Parser;
use cli::{Cli, Commands};
use indicatif::{ProgressBar, ProgressStyle};
use std::collections::BTreeMap;
use std::path::Path;
use tracing_subscriber::EnvFilter;
use vtes_guess_data::archive::{aggregate_usage, card_presence, Archive};
use vtes_guess_data::card::{Card, CardDatabase, Category};
use vtes_guess_data::config::Config;
use vtes_guess_data::difficulty::{generate_report, DifficultyReport};
use vtes_guess_data::distractors::{generate_distractors, DistractorReport};
use vtes_guess_data::gender::{tag_crypt, DetectorChain, Gender, GenderTables};
use vtes_guess_data::rng::SampleRng;

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = match Config::load(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("✗ Failed to load config: {}", e);
            std::process::exit(1);
        }
    };

    match cli.command {
        Commands::Difficulty {
            cards,
            archive,
            output,
            timestamp,
        } => generate_difficulty(&config, &cards, &archive, &output, timestamp),
        Commands::Genders {
            cards,
            tables,
            output,
        } => {
            let tables = tables.unwrap_or_else(|| config.gender.tables.clone());
            generate_genders(&cards, &tables, &output);
        }
        Commands::Distractors { cards, output } => generate_premium_distractors(&config, &cards, &output),
        Commands::Usage {
            card,
            cards,
            archive,
        } => show_usage(&card, &cards, &archive),
        Commands::Stats { report } => show_stats(&report),
        Commands::Examples {
            distractors,
            report,
            count,
            seed,
        } => show_examples(&config, &distractors, &report, count, seed),
    }
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "info" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn load_cards(path: &Path) -> CardDatabase {
    match CardDatabase::from_file(path) {
        Ok(db) => {
            eprintln!("✓ Loaded {} cards from {}", db.card_count(), path.display());
            db
        }
        Err(e) => {
            eprintln!("✗ Failed to load cards from '{}': {}", path.display(), e);
            std::process::exit(1);
        }
    }
}

fn load_archive(path: &Path) -> Archive {
    match Archive::from_file(path) {
        Ok(archive) => {
            eprintln!("✓ Loaded {} decks from {}", archive.len(), path.display());
            if archive.skipped_records() > 0 {
                eprintln!("  ({} malformed records skipped)", archive.skipped_records());
            }
            archive
        }
        Err(e) => {
            eprintln!("✗ Failed to load archive from '{}': {}", path.display(), e);
            std::process::exit(1);
        }
    }
}

fn bar(pct: f64) -> String {
    "█".repeat((pct / 2.0) as usize)
}

fn generate_difficulty(
    config: &Config,
    cards_file: &Path,
    archive_file: &Path,
    output: &Path,
    timestamp: bool,
) {
    let db = load_cards(cards_file);
    let archive = load_archive(archive_file);
    let table = match config.tier_table() {
        Ok(table) => table,
        Err(e) => {
            eprintln!("✗ {}", e);
            std::process::exit(1);
        }
    };

    println!("\n=== VTES Difficulty Generator ===\n");
    println!("Decks analyzed: {}", archive.len());
    println!("Thresholds: {:?}", table.thresholds());

    let start = std::time::Instant::now();
    let usage = aggregate_usage(&archive, &db);
    let mut report = generate_report(&db, &archive, &usage, &table);
    if timestamp {
        report.metadata.generated_at = Some(chrono::Utc::now().to_rfc3339());
    }
    let elapsed = start.elapsed();

    println!(
        "Unique crypt cards in TWDA (N): {}",
        report.metadata.ranked_crypt_cards
    );
    println!(
        "Unique library cards in TWDA (N): {}",
        report.metadata.ranked_library_cards
    );
    if usage.skipped_refs > 0 {
        println!("Skipped card references: {}", usage.skipped_refs);
    }

    println!("\n=== Difficulty Distribution ===");
    for category in Category::ALL {
        println!("\n{}:", category.to_string().to_uppercase());
        let total = report.cards(category).len().max(1);
        for summary in report.distribution(category) {
            let pct = summary.cards as f64 / total as f64 * 100.0;
            println!(
                "  Level {}: {:5} cards {:5.1}% {}",
                summary.tier,
                summary.cards,
                pct,
                bar(pct)
            );
            if !summary.examples.is_empty() {
                println!("    Examples: {}", summary.examples.join(", "));
            }
        }
    }

    match report.write_to_file(output) {
        Ok(()) => println!("\n✓ Wrote {}", output.display()),
        Err(e) => {
            eprintln!("✗ Failed to write '{}': {}", output.display(), e);
            std::process::exit(1);
        }
    }
    println!(
        "Total cards: {} ({:.2?})",
        report.crypt.len() + report.library.len(),
        elapsed
    );
}

fn generate_genders(cards_file: &Path, tables_file: &Path, output: &Path) {
    let db = load_cards(cards_file);
    let tables = match GenderTables::from_file(tables_file) {
        Ok(tables) => {
            eprintln!(
                "✓ Loaded {} overrides and {} given names from {}",
                tables.overrides.len(),
                tables.given_names.len(),
                tables_file.display()
            );
            tables
        }
        Err(e) => {
            eprintln!(
                "✗ Failed to load gender tables from '{}': {}",
                tables_file.display(),
                e
            );
            std::process::exit(1);
        }
    };

    let chain = DetectorChain::standard(tables);
    let report = tag_crypt(&db, &chain);

    if let Err(e) = report.write_to_file(output) {
        eprintln!("✗ Failed to write '{}': {}", output.display(), e);
        std::process::exit(1);
    }

    println!("\n=== VTES Gender Tags ===\n");
    println!("Total crypt cards: {}", report.genders.len());
    println!(
        "Male: {} | Female: {} | Unknown (?): {}",
        report.count(Gender::Male),
        report.count(Gender::Female),
        report.count(Gender::Unknown)
    );
    println!("\nDecided by:");
    for name in chain.detector_names() {
        println!("  {:12} {}", name, report.hits(name));
    }

    println!("\n--- Unknown ({}) ---", report.unknown_names.len());
    for name in &report.unknown_names {
        println!("  {}", name);
    }
    println!("\n✓ Wrote {}", output.display());
    println!("Add important unknowns to the [overrides] table and run again.");
}

fn generate_premium_distractors(config: &Config, cards_file: &Path, output: &Path) {
    let db = load_cards(cards_file);
    let library: Vec<&Card> = db.in_category(Category::Library).collect();
    if library.is_empty() {
        eprintln!("✗ No library cards found in {}", cards_file.display());
        std::process::exit(1);
    }

    let options = &config.distractors;
    println!("\n=== VTES Distractor Generator ===\n");
    println!("Library cards: {}", library.len());
    println!(
        "Distractors per card: {} (from the {} most similar)",
        options.distractors_needed(),
        options.candidate_pool
    );

    let progress = ProgressBar::new(library.len() as u64);
    progress.set_style(
        ProgressStyle::with_template("{bar:40} {pos}/{len} [{elapsed_precise}]")
            .unwrap_or_else(|_| ProgressStyle::default_bar()),
    );

    let start = std::time::Instant::now();
    let report = generate_distractors(&library, options, &progress);
    progress.finish_and_clear();

    let short = report.short_entries(options.distractors_needed());
    if short > 0 {
        println!("Cards with fewer distractors than requested: {}", short);
    }

    match report.write_to_file(output) {
        Ok(()) => println!(
            "✓ Wrote {} with {} entries ({:.2?})",
            output.display(),
            report.len(),
            start.elapsed()
        ),
        Err(e) => {
            eprintln!("✗ Failed to write '{}': {}", output.display(), e);
            std::process::exit(1);
        }
    }
}

fn show_usage(card_ref: &str, cards_file: &Path, archive_file: &Path) {
    let db = load_cards(cards_file);
    let archive = load_archive(archive_file);

    let card = match db.lookup(card_ref) {
        Ok(card) => card,
        Err(e) => {
            eprintln!("✗ {}", e);
            std::process::exit(1);
        }
    };

    let presence = card_presence(&archive, &db, card.id);
    println!("\n=== Results for '{}' ===\n", card.name);
    println!("Total copies played: {}", presence.copies);
    println!(
        "Appears in {} of {} decks",
        presence.decks_with_card, presence.total_decks
    );
    println!("Meta presence: {:.2}%", presence.meta_presence());
}

fn show_stats(report_file: &Path) {
    let report = match DifficultyReport::from_file(report_file) {
        Ok(report) => report,
        Err(e) => {
            eprintln!("✗ Failed to read '{}': {}", report_file.display(), e);
            std::process::exit(1);
        }
    };

    println!("\n=== Metadata ===\n");
    println!("Decks analyzed: {}", report.metadata.total_decks_analyzed);
    if let Some(at) = &report.metadata.generated_at {
        println!("Generated at: {}", at);
    }
    for description in report.metadata.difficulty_levels.values() {
        println!("  {}", description);
    }

    let mut totals: BTreeMap<u8, usize> = BTreeMap::new();
    for category in Category::ALL {
        let cards = report.cards(category);
        println!("\n=== {} ({} cards) ===", category.to_string().to_uppercase(), cards.len());

        println!("\nBy difficulty:");
        for summary in report.distribution(category) {
            println!("  Difficulty {}: {}", summary.tier, summary.cards);
            *totals.entry(summary.tier.0).or_insert(0) += summary.cards;
        }

        let mut by_type: BTreeMap<&str, usize> = BTreeMap::new();
        for card in cards {
            let primary = card.types.first().map(|s| s.as_str()).unwrap_or("Unknown");
            *by_type.entry(primary).or_insert(0) += 1;
        }
        let mut types: Vec<_> = by_type.into_iter().collect();
        types.sort_by(|a, b| b.1.cmp(&a.1));

        println!("\nBy primary type:");
        for (card_type, count) in types {
            println!("  {:20} {}", card_type, count);
        }
    }

    println!(
        "\n=== TOTAL ({} cards) ===\n",
        report.crypt.len() + report.library.len()
    );
    for (tier, count) in totals {
        println!("  Difficulty {}: {}", tier, count);
    }
}

fn show_examples(
    config: &Config,
    distractors_file: &Path,
    report_file: &Path,
    count: usize,
    seed: Option<u64>,
) {
    let distractors = match DistractorReport::from_file(distractors_file) {
        Ok(d) => d,
        Err(e) => {
            eprintln!("✗ Failed to read '{}': {}", distractors_file.display(), e);
            std::process::exit(1);
        }
    };
    let report = match DifficultyReport::from_file(report_file) {
        Ok(r) => r,
        Err(e) => {
            eprintln!("✗ Failed to read '{}': {}", report_file.display(), e);
            std::process::exit(1);
        }
    };

    let names: BTreeMap<_, _> = report
        .library
        .iter()
        .map(|c| (c.id, c.name.as_str()))
        .collect();

    let width = config.distractors.distractors_needed();
    let mut rng = SampleRng::new(seed);
    let ids: Vec<_> = distractors.distractors.keys().copied().collect();
    let sample = rng.sample(&ids, count);

    println!("\n=== {} cards with semantic distractors ===", sample.len());
    println!("Seed: {}\n", rng.seed());

    for (i, id) in sample.iter().enumerate() {
        let name = names
            .get(id)
            .map(|n| n.to_string())
            .unwrap_or_else(|| format!("Unknown Card (ID: {})", id));
        println!("{:2}. {}", i + 1, name);

        for (slot, pick) in distractors.slots(*id, width).iter().enumerate() {
            println!("    -> Distractor {}: {}", slot + 1, pick);
        }
        println!();
    }
}

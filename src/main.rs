//! Puzzle Arena - practice match runner
//!
//! Plays a match between seeded practice bots on a simulated clock and
//! prints the standings and settlement receipt. Configure with `ARENA_*`
//! environment variables (or a `.env` file) and `RUST_LOG`.

use std::sync::Arc;

use tracing::info;
use tracing_subscriber::EnvFilter;

use puzzle_arena::practice::{play_practice_round, BotProfile, PracticeBot};
use puzzle_arena::types::money::format_cents;
use puzzle_arena::{ManualTimeSource, MatchConfig, MatchEngine, MatchState, RoundContent};

const PUZZLES: [(&str, &str); 5] = [
    ("Unscramble: TRAPUZE", "trapeze"),
    ("Next in sequence: 2, 3, 5, 7, 11", "13"),
    ("Anagram of LISTEN", "silent"),
    ("Odd one out: apple, pear, carrot, plum", "carrot"),
    ("Complete: ___ in a haystack", "needle"),
];

fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = MatchConfig::from_env()?;
    info!(match_id = %config.match_id, entry_fee = %config.entry_fee, "loaded configuration");

    let mut bots = vec![
        PracticeBot::new("bot-ace", "Ace", BotProfile::new(0.9, 2_000, 12_000)?, 1),
        PracticeBot::new("bot-steady", "Steady", BotProfile::new(0.75, 5_000, 20_000)?, 2),
        PracticeBot::new("bot-rookie", "Rookie", BotProfile::new(0.5, 8_000, 40_000)?, 3),
    ];
    let roster = bots.iter().map(|b| b.info().clone()).collect();
    let rounds = PUZZLES
        .iter()
        .map(|(prompt, key)| RoundContent::new(*prompt, *key))
        .collect();

    let time = Arc::new(ManualTimeSource::new());
    let mut engine = MatchEngine::with_time_source(config, roster, rounds, time.clone())?;

    engine.start()?;
    while engine.state() == MatchState::InProgress {
        play_practice_round(&mut engine, &time, &mut bots)?;
    }

    let results = engine.results()?;
    println!("===========================================");
    println!("  Match {}", results.match_id);
    println!("===========================================");
    println!("{:>4}  {:<12} {:>8} {:>10}", "Rank", "Player", "Score", "Prize");
    for standing in &results.standings {
        println!(
            "{:>4}  {:<12} {:>8} {:>10}",
            standing.rank, standing.display_name, standing.score, standing.prize
        );
    }
    println!();
    let receipt = &results.receipt;
    println!("  Pool:          {}", format_cents(receipt.pool_cents));
    println!("  Platform fee:  {}", format_cents(receipt.platform_fee_cents));
    println!("  Distributable: {}", format_cents(receipt.distributable_cents));
    println!("  Results root:  {}", receipt.results_root_hex());
    match ssz_rs::serialize(receipt) {
        Ok(bytes) => println!("  Receipt bytes: {}", bytes.len()),
        Err(e) => println!("  ERROR: Failed to serialize receipt: {:?}", e),
    }

    Ok(())
}

//! Stellar Drift entry point
//!
//! Headless native run: the autopilot plays one run, shops greedily between
//! levels, then the result goes to the personal best file and the in-process
//! leaderboard.
//!
//! Usage: `stellar-drift [settings.json] [best.json] [low|medium|high]`

use std::time::{SystemTime, UNIX_EPOCH};

use stellar_drift::Settings;
use stellar_drift::highscores::load_best;
use stellar_drift::leaderboard::{FetchRequest, InProcessClient, LeaderboardClient, submit_run};
use stellar_drift::persistence::JsonFileStore;
use stellar_drift::platform::{FrameDriver, LogRenderer};
use stellar_drift::sim::{GameEvent, GamePhase, GameState, UpgradeId};

const DEFAULT_SETTINGS_PATH: &str = "stellar-drift.json";
const DEFAULT_BEST_PATH: &str = "stellar-drift-best.json";
const PILOT_NAME: &str = "Autopilot";
/// Give up after this much simulated time
const MAX_RUN_SECONDS: f32 = 900.0;
/// Host frame rate the headless loop pretends to run at
const FRAME_DT: f32 = 1.0 / 60.0;

fn main() {
    env_logger::init();
    log::info!("Stellar Drift (headless) starting...");

    let mut args = std::env::args().skip(1);
    let settings_path = args.next().unwrap_or_else(|| DEFAULT_SETTINGS_PATH.to_string());
    let best_path = args.next().unwrap_or_else(|| DEFAULT_BEST_PATH.to_string());

    let mut settings = Settings::load_from(&settings_path);
    if let Some(quality) = args.next() {
        settings.override_quality(&quality);
    }
    let seed = settings.seed.unwrap_or_else(clock_seed);

    let mut state = GameState::from_settings(seed, &settings);
    if let Err(err) = state.start() {
        log::error!("Could not start run: {}", err);
        return;
    }

    let mut driver = FrameDriver::from_settings(state, &settings);
    driver.input.idle_mode = true;
    let mut renderer = LogRenderer::new(300);

    let mut shots = 0u64;
    let mut kills = 0u64;
    while driver.state.phase != GamePhase::GameOver && driver.state.elapsed < MAX_RUN_SECONDS {
        driver.frame(FRAME_DT, &mut renderer);

        for event in driver.state.drain_events() {
            match event {
                GameEvent::ProjectileFired { .. } => shots += 1,
                GameEvent::HazardDestroyed { .. } => kills += 1,
                GameEvent::LevelUp { level } => log::info!("Reached level {}", level),
                _ => {}
            }
        }

        if driver.state.phase == GamePhase::Shop {
            shop_greedily(&mut driver.state);
            if let Err(err) = driver.state.close_shop() {
                log::warn!("{}", err);
            }
        }
    }

    let summary = driver.state.run_summary();
    log::info!(
        "Run finished after {:.1}s: score {} level {} dust {} ({} kills, {} shots)",
        driver.state.elapsed,
        summary.score,
        summary.level,
        summary.dust,
        kills,
        shots
    );

    let mut store = JsonFileStore::new(&best_path);
    let mut leaderboard = InProcessClient::new();
    match submit_run(&mut leaderboard, &mut store, PILOT_NAME, &summary) {
        Ok(outcome) => {
            if outcome.personal_best {
                log::info!("New personal best saved to {}", best_path);
            }
            if let Some(rank) = outcome.rank {
                log::info!("Leaderboard rank: {}", rank);
            }
        }
        Err(err) => log::warn!("Run not submitted: {}", err),
    }

    if let Ok(board) = leaderboard.fetch(FetchRequest::default()) {
        for (i, entry) in board.scores.iter().enumerate() {
            log::info!("#{} {} {} (level {})", i + 1, entry.name, entry.score, entry.level);
        }
    }

    let best = load_best(&store);
    println!(
        "score {} | level {} | dust {} | best {}",
        summary.score, summary.level, summary.dust, best.score
    );
}

/// Spend dust on whatever is affordable, most useful first
fn shop_greedily(state: &mut GameState) {
    let health = state.player.health / state.player.max_health;
    let mut wishlist = vec![
        UpgradeId::Shield,
        UpgradeId::Damage,
        UpgradeId::RapidFire,
        UpgradeId::Magnet,
        UpgradeId::Speed,
    ];
    if health < 0.6 {
        wishlist.insert(0, UpgradeId::Heal);
    }

    for id in wishlist {
        let available = state
            .shop_offers()
            .iter()
            .any(|offer| offer.item.id == id && offer.available());
        if !available {
            continue;
        }
        if let Err(err) = state.purchase(id) {
            log::debug!("Skipped {}: {}", id, err);
        }
    }
}

fn clock_seed() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos() as u64)
        .unwrap_or(0x5EED)
}

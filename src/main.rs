// SPDX-License-Identifier: MIT
//
// rogue — show one generated dungeon on the terminal.
//
// Wires the two crates together:
//
//   rogue-map  → generate a map, pick a spawn point, paint it
//   rogue-term → double-buffered screen over stdout, diffed flush
//
// There is no input loop. The dungeon is drawn once, held on screen for a
// moment, then the terminal is cleared and the cursor restored.
//
// Environment:
//
//   ROGUE_SEED  u64 seed for a reproducible map (default: clock-derived)
//   RUST_LOG    env_logger filter (default: warn)

use std::env;
use std::process;
use std::thread;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use log::{info, warn};

use rogue_map::{Map, MapGenerator, Position};
use rogue_term::{AnsiConsole, Screen, ScreenConfig};

const MAP_WIDTH: i32 = 80;
const MAP_HEIGHT: i32 = 24;
const HOLD: Duration = Duration::from_secs(2);

// ─── Setup ──────────────────────────────────────────────────────────────────

/// `ROGUE_SEED` when it parses, otherwise nanoseconds since the epoch.
fn seed() -> u64 {
    if let Ok(raw) = env::var("ROGUE_SEED") {
        match raw.trim().parse() {
            Ok(seed) => return seed,
            Err(e) => warn!("ignoring ROGUE_SEED={raw:?}: {e}"),
        }
    }
    #[allow(clippy::cast_possible_truncation)]
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |d| d.as_nanos() as u64)
}

/// The middle of the first room, or the first open floor cell when the
/// generator placed no rooms.
fn spawn_point(map: &Map) -> Position {
    let open = |p: Position| map.is_walkable(p) && map.enemy_at(p).is_none();

    if let Some(room) = map.rooms().first() {
        let center = Position::new(room.x + room.width / 2, room.y + room.height / 2);
        if open(center) {
            return center;
        }
    }
    map.tiles()
        .map(|(p, _)| p)
        .find(|&p| open(p))
        .unwrap_or_default()
}

// ─── Main ───────────────────────────────────────────────────────────────────

fn run(seed: u64) -> rogue_term::Result<()> {
    let config = ScreenConfig {
        width: MAP_WIDTH,
        height: MAP_HEIGHT,
        ..ScreenConfig::default()
    };
    let screen = Screen::with_config(AnsiConsole::stdout(), &config)?;

    let map = MapGenerator::from_seed(seed, MAP_WIDTH, MAP_HEIGHT).generate();
    let player = spawn_point(&map);
    info!(
        "seed {seed}: {} rooms, {} enemies, player at {player:?}",
        map.rooms().len(),
        map.enemies().len()
    );

    rogue_map::paint(&screen, &map, player)?;
    screen.flush()?;
    thread::sleep(HOLD);

    screen.set_show_cursor(true);
    screen.clear()
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    if let Err(e) = run(seed()) {
        eprintln!("rogue: {e}");
        process::exit(1);
    }
}

// ─── Tests ──────────────────────────────────────────────────────────────────

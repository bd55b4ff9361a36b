//! Aquarium headless runner
//!
//! Drives a seeded session with a scripted wandering intent and logs HUD
//! snapshots. Usage: `aquarium [tuning.json] [seed] [ticks]`

use aquarium::Tuning;
use aquarium::consts::NOMINAL_DT;
use aquarium::sim::{GameEvent, GamePhase, GameScene, TickInput};
use glam::Vec2;

const DEFAULT_SEED: u64 = 12345;
const DEFAULT_TICKS: u64 = 60 * 60;
const SNAPSHOT_EVERY: u64 = 300;

fn main() {
    #[cfg(not(target_arch = "wasm32"))]
    env_logger::init();

    let mut args = std::env::args().skip(1);
    let tuning = match args.next().filter(|a| a != "-") {
        Some(path) => match Tuning::load(&path) {
            Ok(tuning) => tuning,
            Err(e) => {
                log::error!("{}", e);
                std::process::exit(1);
            }
        },
        None => Tuning::default(),
    };
    let seed = args.next().and_then(|s| s.parse().ok()).unwrap_or(DEFAULT_SEED);
    let ticks = args.next().and_then(|s| s.parse().ok()).unwrap_or(DEFAULT_TICKS);

    let mut scene = match GameScene::new("aquarium", tuning, seed) {
        Ok(scene) => scene,
        Err(e) => {
            log::error!("{}", e);
            std::process::exit(1);
        }
    };

    let mut last_event: Option<GameEvent> = None;
    for t in 0..ticks {
        // Slow sweeping heading so the player visits the whole tank
        let angle = t as f32 * 0.004 + (t as f32 * 0.013).sin();
        let input = TickInput {
            direction: Some(Vec2::new(angle.cos(), angle.sin())),
        };
        scene.tick(&input, NOMINAL_DT);

        if scene.last_event() != last_event.as_ref() {
            last_event = scene.last_event().cloned();
            if let Some(event) = &last_event {
                log::debug!("tick {}: {:?}", t, event);
            }
        }
        if t % SNAPSHOT_EVERY == 0 {
            let hud = scene.hud();
            log::info!(
                "tick {:>5} | score {:>4} power {:>2} lives {} level {} | {} creatures",
                t,
                hud.score,
                hud.power,
                hud.lives,
                hud.level,
                scene.aquarium().creature_count()
            );
        }
        if scene.phase() == GamePhase::GameOver {
            log::info!("Game over after {} ticks", t + 1);
            break;
        }
    }

    match serde_json::to_string_pretty(&scene.hud()) {
        Ok(json) => println!("{}", json),
        Err(e) => log::error!("Failed to serialize HUD: {}", e),
    }
}

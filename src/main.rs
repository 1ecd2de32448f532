//! Photon Bench entry point
//!
//! Headless runner: builds a preset bench, steps the simulation at a fixed
//! timestep, and dumps the final scene state as JSON. Rendering front-ends
//! drive the same `Scene` API through its read-only accessors.

use photon_bench::consts::SIM_DT;
use photon_bench::sim::Scene;
use photon_bench::{Preset, SceneConfig};

fn main() {
    env_logger::init();

    let mut args = std::env::args().skip(1);
    let preset = match args.next() {
        Some(name) => match Preset::from_str(&name) {
            Some(p) => p,
            None => {
                eprintln!("unknown preset '{name}'");
                eprintln!(
                    "available: {}",
                    Preset::ALL.map(|p| p.as_str()).join(", ")
                );
                std::process::exit(1);
            }
        },
        None => Preset::default(),
    };
    let ticks: u64 = args.next().and_then(|s| s.parse().ok()).unwrap_or(600);
    let seed: u64 = args.next().and_then(|s| s.parse().ok()).unwrap_or(0);

    let config = SceneConfig {
        seed,
        ..SceneConfig::default()
    };

    log::info!(
        "running preset {} for {} ticks (seed {})",
        preset.as_str(),
        ticks,
        seed
    );

    let mut scene = Scene::new(config);
    match preset.build(&config) {
        Ok((elements, photons)) => scene.configure(elements, photons),
        Err(e) => {
            eprintln!("failed to build preset: {e}");
            std::process::exit(1);
        }
    }

    let mut event_count = 0usize;
    for t in 0..ticks {
        scene.tick(t as f32 * SIM_DT);
        event_count += scene.events().len();
        for event in scene.events() {
            log::debug!("tick {t}: {event:?}");
        }
        if scene.photons().is_empty() {
            log::info!("all photons gone after {} ticks", t + 1);
            break;
        }
    }

    log::info!(
        "done: {} ticks, {} events, {} photons remaining",
        scene.time_ticks(),
        event_count,
        scene.photons().len()
    );

    match serde_json::to_string_pretty(&scene) {
        Ok(json) => println!("{json}"),
        Err(e) => eprintln!("failed to serialize scene: {e}"),
    }
}

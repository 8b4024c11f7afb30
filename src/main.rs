use std::time::Instant;

use traffic_rayscan::{DriveState, SimConfig, Simulation};

/// The simulated time between frames, in ms.
const FRAME_MS: f64 = 1000.0 / 60.0;

fn main() {
    env_logger::init();

    let mut args = std::env::args().skip(1);
    let config = load_config(args.next());
    let num_frames: usize = args.next().and_then(|n| n.parse().ok()).unwrap_or(3600);

    let mut sim = match Simulation::new(config) {
        Ok(sim) => sim,
        Err(err) => {
            eprintln!("Invalid configuration: {err}");
            std::process::exit(1);
        }
    };
    sim.populate();

    println!("Simulating {num_frames} frames...");
    let start = Instant::now();
    let mut stopped_frames = 0;
    let mut lane_changes = 0;
    let mut lane = sim.vehicle().lane();

    for _ in 0..num_frames {
        sim.step(FRAME_MS);
        let veh = sim.vehicle();
        if veh.state() == DriveState::Stopped {
            stopped_frames += 1;
        }
        if veh.lane() != lane {
            lane_changes += 1;
            lane = veh.lane();
        }
    }

    let elapsed = start.elapsed();
    let veh = sim.vehicle();
    println!(
        "Avg. frame: {:?} --> {:.0}x realtime",
        elapsed / num_frames.max(1) as u32,
        num_frames as f64 * FRAME_MS / 1000.0 / elapsed.as_secs_f64()
    );
    println!(
        "Vehicle at x = {:.1} in lane {}, speed {:.2}, {} lane changes, stopped for {} frames",
        veh.position().x,
        veh.lane(),
        veh.vel(),
        lane_changes,
        stopped_frames
    );
}

/// Reads the configuration from a JSON file if one is given, otherwise uses the defaults.
#[cfg(feature = "serde")]
fn load_config(path: Option<String>) -> SimConfig {
    let Some(path) = path else {
        return SimConfig::default();
    };
    let parsed = std::fs::read_to_string(&path)
        .map_err(|err| err.to_string())
        .and_then(|content| serde_json::from_str(&content).map_err(|err| err.to_string()));
    match parsed {
        Ok(config) => config,
        Err(err) => {
            eprintln!("Failed to load {path}: {err}");
            std::process::exit(1);
        }
    }
}

#[cfg(not(feature = "serde"))]
fn load_config(path: Option<String>) -> SimConfig {
    if path.is_some() {
        log::warn!("config files require the `serde` feature, using defaults");
    }
    SimConfig::default()
}

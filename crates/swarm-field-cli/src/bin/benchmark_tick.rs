use std::time::Instant;
use swarm_field_core::{SimConfig, Simulation};

fn main() {
    let config = SimConfig {
        drone_count: SimConfig::MAX_DRONES,
        grid_resolution: SimConfig::MAX_GRID_RESOLUTION,
        seed: 42,
        ..SimConfig::default()
    };
    println!(
        "Benchmarking with {} drones on a {}x{} grid",
        config.drone_count, config.grid_resolution, config.grid_resolution
    );

    let mut sim1 = Simulation::new(config.clone()).expect("benchmark config is valid");
    let mut sim2 = Simulation::new(config).expect("benchmark config is valid");

    let frames = 10_000u32;
    let dt = 1.0 / 60.0;

    // Motion only
    let start = Instant::now();
    for _ in 0..frames {
        sim1.tick(dt, true, 4.0);
    }
    let duration_ticks = start.elapsed();
    println!("Time for {} ticks WITHOUT decay: {:?}", frames, duration_ticks);
    println!("Avg time per tick: {:?}", duration_ticks / frames);

    // Motion plus decay cadence and grid publication
    let start = Instant::now();
    for _ in 0..frames {
        sim2.advance(dt, true, 4.0);
    }
    let duration_frames = start.elapsed();
    println!("Time for {} frames WITH decay: {:?}", frames, duration_frames);
    println!("Avg time per frame: {:?}", duration_frames / frames);
    println!("Decay cycles applied: {}", sim2.decay_cycles());

    let diff = duration_frames.saturating_sub(duration_ticks);
    println!("Total decay overhead: {:?}", diff);
    println!("Avg decay overhead per frame: {:?}", diff / frames);
}

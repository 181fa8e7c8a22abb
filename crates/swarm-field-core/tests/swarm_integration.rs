use swarm_field_core::{DroneStatus, SimConfig, Simulation, SimulationStats};

fn frames(sim: &mut Simulation, count: usize, dt: f64, speed: f64) {
    for _ in 0..count {
        sim.advance(dt, true, speed);
    }
}

#[test]
fn sweep_reduces_field_density_over_time() {
    let mut sim = Simulation::initialize(12, 200.0, 40).expect("valid dimensions");
    let start = sim.snapshot();
    frames(&mut sim, 60 * 30, 1.0 / 60.0, 4.0);
    let end = sim.snapshot();

    assert!(end.field.mean_density < start.field.mean_density);
    assert!(end.field.estimated_pests_remaining < start.field.estimated_pests_remaining);
    assert!(end.stats.pest_reduction > 0.0);
    assert_eq!(end.stats.active_drones, 12);
    assert!(end
        .drones
        .iter()
        .all(|d| d.status == DroneStatus::Active));
}

#[test]
fn drones_stay_inside_the_field() {
    let config = SimConfig::default();
    let half = config.half_extent();
    let mut sim = Simulation::new(config).expect("valid config");
    for i in 0..5_000 {
        // Alternate tiny and huge frames to stress the turn-around rule.
        let dt = if i % 50 == 0 { 30.0 } else { 0.02 };
        sim.advance(dt, true, 2.0);
        for drone in sim.drones() {
            assert!(drone.position.x.abs() <= half, "x escaped: {drone:?}");
            assert!(drone.position.z.abs() <= half, "z escaped: {drone:?}");
        }
    }
}

#[test]
fn same_seed_produces_same_run() {
    let config = SimConfig {
        seed: 99,
        ..SimConfig::default()
    };
    let mut a = Simulation::new(config.clone()).unwrap();
    let mut b = Simulation::new(config).unwrap();
    frames(&mut a, 600, 1.0 / 60.0, 2.0);
    frames(&mut b, 600, 1.0 / 60.0, 2.0);

    let (sa, sb) = (a.snapshot(), b.snapshot());
    assert_eq!(sa.drones, sb.drones);
    assert_eq!(&*sa.grid, &*sb.grid);
    assert_eq!(sa.stats, sb.stats);
}

#[test]
fn reset_keeps_configured_fleet_size() {
    let mut sim = Simulation::initialize(5, 120.0, 24).unwrap();
    frames(&mut sim, 300, 0.05, 1.0);
    sim.reset();
    let snap = sim.snapshot();
    assert_eq!(snap.drones.len(), 5);
    assert_eq!(snap.grid_resolution, 24);
    assert_eq!(snap.grid.len(), 24 * 24);
    assert_eq!(snap.stats, SimulationStats::new(5));
}

#[test]
fn snapshot_serializes_for_the_view_layer() {
    let mut sim = Simulation::new(SimConfig::default()).unwrap();
    frames(&mut sim, 30, 0.05, 1.0);
    let json = serde_json::to_string(&sim.snapshot()).unwrap();
    let parsed: swarm_field_core::Snapshot = serde_json::from_str(&json).unwrap();
    assert_eq!(parsed.drones.len(), 12);
    assert_eq!(parsed.grid.len(), sim.grid().len());
    for (p, d) in parsed.drones.iter().zip(sim.drones()) {
        assert_eq!(p.id, d.id);
        assert!((p.position.x - d.position.x).abs() < 1e-9);
        assert!((p.battery - d.battery).abs() < 1e-9);
    }
}

//! Lawnmower sweep: drones fly straight passes along x, turning around near
//! the field edge and shifting one row in z at every turn.

use crate::config::SimConfig;
use crate::drone::Drone;

/// Advance one drone by `delta` seconds of scaled simulation time.
///
/// `running_time` is the accumulated real time the clock has been running and
/// only feeds the cosmetic altitude bob. Returns the area swept this tick.
pub fn advance_drone(drone: &mut Drone, delta: f64, running_time: f64, config: &SimConfig) -> f64 {
    if delta <= 0.0 || !drone.status.is_active() {
        return 0.0;
    }

    let pos = &mut drone.position;
    let vel = &mut drone.velocity;
    pos.x += vel.x * config.drone_speed * delta;

    // At most one turn per tick; a large delta overshooting the limit is pulled back onto it.
    let limit = config.turn_limit();
    if pos.x > limit && vel.x > 0.0 {
        vel.x = -1.0;
        pos.x = limit;
        pos.z += config.row_shift;
    } else if pos.x < -limit && vel.x < 0.0 {
        vel.x = 1.0;
        pos.x = -limit;
        pos.z += config.row_shift;
    }

    if pos.z > limit {
        pos.z = -limit;
    }

    pos.y = config.drone_altitude
        + (running_time * config.bob_frequency + drone.id as f64).sin() * config.bob_amplitude;

    let swept = swept_area(delta, config);
    drone.flight_time += delta / 60.0;
    drone.battery = (drone.battery - delta * config.battery_drain_rate).max(0.0);
    drone.covered_area += swept;
    drone.status = drone.status.after_tick(drone.battery);
    swept
}

/// Area one active drone sweeps in `delta` seconds.
pub fn swept_area(delta: f64, config: &SimConfig) -> f64 {
    config.drone_speed * delta * config.sweep_width
}

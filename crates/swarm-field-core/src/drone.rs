use crate::config::SimConfig;
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Vec3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Vec3 {
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DroneStatus {
    #[default]
    Active,
    Returning,
    Charging,
}

impl DroneStatus {
    /// Status for the next tick given the drone's remaining battery.
    ///
    /// Every drone stays `Active` for the whole session; `Returning` and
    /// `Charging` are reserved for a return-to-base cycle.
    // TODO: switch to `Returning` once battery hits zero and route the drone
    // back to its start edge instead of wrapping rows.
    pub fn after_tick(self, _battery: f64) -> Self {
        self
    }

    pub fn is_active(self) -> bool {
        self == DroneStatus::Active
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Drone {
    pub id: u32,
    pub position: Vec3,
    /// Only the x component drives motion; the sign selects the sweep direction.
    pub velocity: Vec3,
    /// Percent, `[0, 100]`.
    pub battery: f64,
    pub status: DroneStatus,
    /// Minutes of scaled simulation time spent flying.
    pub flight_time: f64,
    /// Square meters swept by this drone.
    pub covered_area: f64,
    pub sound_intensity: f64,
}

impl Drone {
    pub const FULL_BATTERY: f64 = 100.0;

    pub fn new(id: u32, position: Vec3, sound_intensity: f64) -> Self {
        Self {
            id,
            position,
            velocity: Vec3::new(1.0, 0.0, 0.0),
            battery: Self::FULL_BATTERY,
            status: DroneStatus::Active,
            flight_time: 0.0,
            covered_area: 0.0,
            sound_intensity,
        }
    }

    /// Build the whole fleet lined up along the `x = -half` edge, evenly spaced in z.
    pub fn fleet(config: &SimConfig) -> Vec<Drone> {
        let half = config.half_extent();
        let spacing = config.field_size / config.drone_count as f64;
        (0..config.drone_count)
            .map(|i| {
                let position = Vec3::new(-half, config.drone_altitude, -half + i as f64 * spacing);
                Drone::new(i as u32, position, config.initial_sound_intensity)
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fleet_is_spaced_along_one_edge() {
        let config = SimConfig::default();
        let fleet = Drone::fleet(&config);
        assert_eq!(fleet.len(), 12);
        for (i, drone) in fleet.iter().enumerate() {
            assert_eq!(drone.id, i as u32);
            assert_eq!(drone.position.x, -100.0);
            assert_eq!(drone.position.y, 8.0);
            assert!(drone.position.z >= -100.0 && drone.position.z < 100.0);
            assert_eq!(drone.velocity, Vec3::new(1.0, 0.0, 0.0));
            assert_eq!(drone.battery, 100.0);
            assert_eq!(drone.status, DroneStatus::Active);
        }
        let spacing = fleet[1].position.z - fleet[0].position.z;
        assert!((spacing - 200.0 / 12.0).abs() < 1e-9);
    }

    #[test]
    fn status_serializes_lowercase() {
        let json = serde_json::to_string(&DroneStatus::Returning).unwrap();
        assert_eq!(json, "\"returning\"");
    }

    #[test]
    fn active_status_is_kept() {
        assert_eq!(DroneStatus::Active.after_tick(0.0), DroneStatus::Active);
        assert!(!DroneStatus::Charging.is_active());
    }
}

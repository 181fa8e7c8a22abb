use serde::{Deserialize, Serialize};
use std::{error::Error, fmt};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    /// Side length of the square field in world units. The field spans
    /// `[-field_size / 2, field_size / 2]` on both x and z.
    pub field_size: f64,
    /// Cells per side of the pest-density grid.
    pub grid_resolution: usize,
    pub drone_count: usize,
    pub drone_speed: f64,
    pub drone_altitude: f64,
    /// Distance inside the half extent at which a drone turns around.
    pub turn_margin: f64,
    /// Lateral z shift applied at every turn.
    pub row_shift: f64,
    /// Width of the acoustic effect, used for covered-area bookkeeping.
    pub sweep_width: f64,
    /// Battery percent drained per second of scaled simulation time.
    pub battery_drain_rate: f64,
    pub bob_frequency: f64,
    pub bob_amplitude: f64,
    pub initial_sound_intensity: f64,
    /// Amplitude of the uniform jitter added to the initial density.
    pub density_jitter: f64,
    /// Density removed from the cell under a drone per decay cycle.
    pub decay_decrement: f64,
    /// Multiplier applied to the four orthogonal neighbours per decay cycle.
    pub neighbor_attenuation: f64,
    /// Real-time seconds between decay cycles.
    pub decay_interval_secs: f64,
    /// Pest-reduction percent added per tick, per drone, per unit of speed.
    pub reduction_rate_per_drone: f64,
    /// Currency saved per square meter covered compared to spraying.
    pub cost_per_square_meter: f64,
    /// Pest population represented by a fully dense field.
    pub projected_pests: f64,
    pub seed: u64,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            field_size: 200.0,
            grid_resolution: 40,
            drone_count: 12,
            drone_speed: 10.0,
            drone_altitude: 8.0,
            turn_margin: 5.0,
            row_shift: 10.0,
            sweep_width: 5.0,
            battery_drain_rate: 0.05,
            bob_frequency: 2.0,
            bob_amplitude: 1.0,
            initial_sound_intensity: 0.8,
            density_jitter: 0.2,
            decay_decrement: 0.3,
            neighbor_attenuation: 0.9,
            decay_interval_secs: 0.1,
            reduction_rate_per_drone: 0.001,
            cost_per_square_meter: 0.15,
            projected_pests: 5000.0,
            seed: 42,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum SimConfigError {
    InvalidFieldSize(f64),
    InvalidGridResolution { max: usize, actual: usize },
    InvalidDroneCount { max: usize, actual: usize },
    InvalidDroneSpeed(f64),
    MarginTooLarge { margin: f64, half_extent: f64 },
    NonPositive { field: &'static str, value: f64 },
    Negative { field: &'static str, value: f64 },
    OutOfUnitRange { field: &'static str, value: f64 },
    Parse(String),
}

impl fmt::Display for SimConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SimConfigError::InvalidFieldSize(v) => {
                write!(f, "field_size must be positive and finite, got {v}")
            }
            SimConfigError::InvalidGridResolution { max, actual } => {
                write!(f, "grid_resolution ({actual}) must be in 1..={max}")
            }
            SimConfigError::InvalidDroneCount { max, actual } => {
                write!(f, "drone_count ({actual}) must be in 1..={max}")
            }
            SimConfigError::InvalidDroneSpeed(v) => {
                write!(f, "drone_speed must be positive and finite, got {v}")
            }
            SimConfigError::MarginTooLarge {
                margin,
                half_extent,
            } => write!(
                f,
                "turn_margin ({margin}) must be smaller than the field half extent ({half_extent})"
            ),
            SimConfigError::NonPositive { field, value } => {
                write!(f, "{field} must be positive and finite, got {value}")
            }
            SimConfigError::Negative { field, value } => {
                write!(f, "{field} must be non-negative and finite, got {value}")
            }
            SimConfigError::OutOfUnitRange { field, value } => {
                write!(f, "{field} must be within [0, 1], got {value}")
            }
            SimConfigError::Parse(msg) => write!(f, "invalid config JSON: {msg}"),
        }
    }
}

impl Error for SimConfigError {}

impl SimConfig {
    pub const MAX_DRONES: usize = 256;
    pub const MAX_GRID_RESOLUTION: usize = 512;

    pub fn half_extent(&self) -> f64 {
        self.field_size / 2.0
    }

    /// Coordinate beyond which a drone turns around, on either axis.
    pub fn turn_limit(&self) -> f64 {
        self.half_extent() - self.turn_margin
    }

    pub fn from_json_str(json: &str) -> Result<Self, SimConfigError> {
        let config: SimConfig =
            serde_json::from_str(json).map_err(|e| SimConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), SimConfigError> {
        if !(self.field_size.is_finite() && self.field_size > 0.0) {
            return Err(SimConfigError::InvalidFieldSize(self.field_size));
        }
        if self.grid_resolution == 0 || self.grid_resolution > Self::MAX_GRID_RESOLUTION {
            return Err(SimConfigError::InvalidGridResolution {
                max: Self::MAX_GRID_RESOLUTION,
                actual: self.grid_resolution,
            });
        }
        if self.drone_count == 0 || self.drone_count > Self::MAX_DRONES {
            return Err(SimConfigError::InvalidDroneCount {
                max: Self::MAX_DRONES,
                actual: self.drone_count,
            });
        }
        if !(self.drone_speed.is_finite() && self.drone_speed > 0.0) {
            return Err(SimConfigError::InvalidDroneSpeed(self.drone_speed));
        }
        if !(self.turn_margin.is_finite()
            && self.turn_margin >= 0.0
            && self.turn_margin < self.half_extent())
        {
            return Err(SimConfigError::MarginTooLarge {
                margin: self.turn_margin,
                half_extent: self.half_extent(),
            });
        }

        for (field, value) in [
            ("sweep_width", self.sweep_width),
            ("decay_interval_secs", self.decay_interval_secs),
        ] {
            if !(value.is_finite() && value > 0.0) {
                return Err(SimConfigError::NonPositive { field, value });
            }
        }

        for (field, value) in [
            ("row_shift", self.row_shift),
            ("battery_drain_rate", self.battery_drain_rate),
            ("bob_frequency", self.bob_frequency),
            ("bob_amplitude", self.bob_amplitude),
            ("drone_altitude", self.drone_altitude),
            ("density_jitter", self.density_jitter),
            ("reduction_rate_per_drone", self.reduction_rate_per_drone),
            ("cost_per_square_meter", self.cost_per_square_meter),
            ("projected_pests", self.projected_pests),
        ] {
            if !(value.is_finite() && value >= 0.0) {
                return Err(SimConfigError::Negative { field, value });
            }
        }

        for (field, value) in [
            ("decay_decrement", self.decay_decrement),
            ("neighbor_attenuation", self.neighbor_attenuation),
            ("initial_sound_intensity", self.initial_sound_intensity),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(SimConfigError::OutOfUnitRange { field, value });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        assert_eq!(SimConfig::default().validate(), Ok(()));
    }

    #[test]
    fn rejects_zero_drones() {
        let config = SimConfig {
            drone_count: 0,
            ..SimConfig::default()
        };
        assert_eq!(
            config.validate(),
            Err(SimConfigError::InvalidDroneCount {
                max: SimConfig::MAX_DRONES,
                actual: 0
            })
        );
    }

    #[test]
    fn rejects_margin_wider_than_field() {
        let config = SimConfig {
            field_size: 8.0,
            turn_margin: 5.0,
            ..SimConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(SimConfigError::MarginTooLarge { .. })
        ));
    }

    #[test]
    fn rejects_attenuation_above_one() {
        let config = SimConfig {
            neighbor_attenuation: 1.5,
            ..SimConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(SimConfigError::OutOfUnitRange {
                field: "neighbor_attenuation",
                ..
            })
        ));
    }

    #[test]
    fn json_overrides_only_named_fields() {
        let config = SimConfig::from_json_str(r#"{"drone_count": 4, "seed": 7}"#)
            .expect("config should parse");
        assert_eq!(config.drone_count, 4);
        assert_eq!(config.seed, 7);
        assert_eq!(config.grid_resolution, 40);
    }

    #[test]
    fn json_errors_are_reported() {
        let err = SimConfig::from_json_str("{not json").unwrap_err();
        assert!(matches!(err, SimConfigError::Parse(_)));
        assert!(err.to_string().starts_with("invalid config JSON"));
    }

    #[test]
    fn turn_limit_uses_margin() {
        let config = SimConfig::default();
        assert_eq!(config.half_extent(), 100.0);
        assert_eq!(config.turn_limit(), 95.0);
    }
}

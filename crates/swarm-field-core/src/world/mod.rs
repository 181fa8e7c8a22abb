pub mod metrics;

pub use metrics::*;

use crate::clock::{clamp_tick_delta, sanitize_delta, SimulationClock};
use crate::config::{SimConfig, SimConfigError};
use crate::decay::apply_decay_cycle;
use crate::drone::Drone;
use crate::grid::PestGrid;
use crate::spatial;
use crate::stats::{FieldSummary, SimulationStats};
use crate::trajectory::advance_drone;
use rand::SeedableRng;
use rand_chacha::ChaCha12Rng;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Instant;
use std::{error::Error, fmt};
use tracing::{debug, trace};

/// Owns all mutable simulation state. Drones are an arena indexed by id; the
/// grid is published to readers as an immutable `Arc<[f64]>` after each
/// decay cycle.
pub struct Simulation {
    pub(crate) config: SimConfig,
    pub(crate) drones: Vec<Drone>,
    pub(crate) grid: PestGrid,
    pub(crate) stats: SimulationStats,
    pub(crate) clock: SimulationClock,
    pub(crate) rng: ChaCha12Rng,
    pub(crate) step_index: usize,
    pub(crate) sim_time: f64,
    pub(crate) decay_cycles: usize,
    published_grid: Arc<[f64]>,
    published_version: u64,
    published_field: FieldSummary,
}

/// Read-only copy of the simulation handed to the view layer.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Snapshot {
    pub step: usize,
    pub sim_time: f64,
    pub playing: bool,
    pub drones: Vec<Drone>,
    pub grid_resolution: usize,
    pub grid: Arc<[f64]>,
    pub stats: SimulationStats,
    pub field: FieldSummary,
}

#[derive(Debug, Clone, PartialEq)]
pub enum WorldInitError {
    Config(SimConfigError),
    DroneCountMismatch { expected: usize, actual: usize },
    DroneIdMismatch { index: usize, id: u32 },
    GridResolutionMismatch { expected: usize, actual: usize },
}

impl fmt::Display for WorldInitError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WorldInitError::Config(e) => write!(f, "{}", e),
            WorldInitError::DroneCountMismatch { expected, actual } => write!(
                f,
                "drones.len() ({actual}) must match drone_count ({expected})"
            ),
            WorldInitError::DroneIdMismatch { index, id } => {
                write!(f, "drone at index {index} has id {id}; ids must equal their index")
            }
            WorldInitError::GridResolutionMismatch { expected, actual } => write!(
                f,
                "grid resolution ({actual}) must match grid_resolution ({expected})"
            ),
        }
    }
}

impl From<SimConfigError> for WorldInitError {
    fn from(err: SimConfigError) -> Self {
        WorldInitError::Config(err)
    }
}

impl Error for WorldInitError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            WorldInitError::Config(e) => Some(e),
            _ => None,
        }
    }
}

impl Simulation {
    /// Fleet on the starting edge and a freshly jittered, center-heavy grid.
    pub fn new(config: SimConfig) -> Result<Self, WorldInitError> {
        config.validate()?;
        let mut rng = ChaCha12Rng::seed_from_u64(config.seed);
        let grid = PestGrid::radial(config.grid_resolution, config.density_jitter, &mut rng);
        let drones = Drone::fleet(&config);
        debug!(
            drones = config.drone_count,
            grid_resolution = config.grid_resolution,
            seed = config.seed,
            "initialized swarm simulation"
        );
        Ok(Self::assemble(config, drones, grid, rng))
    }

    pub fn initialize(
        drone_count: usize,
        field_size: f64,
        grid_resolution: usize,
    ) -> Result<Self, WorldInitError> {
        Self::new(SimConfig {
            drone_count,
            field_size,
            grid_resolution,
            ..SimConfig::default()
        })
    }

    /// Build from explicit drones and grid, e.g. to replay a scenario.
    pub fn try_from_parts(
        config: SimConfig,
        drones: Vec<Drone>,
        grid: PestGrid,
    ) -> Result<Self, WorldInitError> {
        config.validate()?;
        if drones.len() != config.drone_count {
            return Err(WorldInitError::DroneCountMismatch {
                expected: config.drone_count,
                actual: drones.len(),
            });
        }
        if let Some((index, drone)) = drones
            .iter()
            .enumerate()
            .find(|(i, d)| d.id as usize != *i)
        {
            return Err(WorldInitError::DroneIdMismatch {
                index,
                id: drone.id,
            });
        }
        if grid.resolution() != config.grid_resolution {
            return Err(WorldInitError::GridResolutionMismatch {
                expected: config.grid_resolution,
                actual: grid.resolution(),
            });
        }
        let rng = ChaCha12Rng::seed_from_u64(config.seed);
        Ok(Self::assemble(config, drones, grid, rng))
    }

    fn assemble(config: SimConfig, drones: Vec<Drone>, grid: PestGrid, rng: ChaCha12Rng) -> Self {
        let active = drones.iter().filter(|d| d.status.is_active()).count();
        let mut sim = Self {
            stats: SimulationStats::new(active),
            config,
            drones,
            grid,
            clock: SimulationClock::default(),
            rng,
            step_index: 0,
            sim_time: 0.0,
            decay_cycles: 0,
            published_grid: Arc::from(Vec::<f64>::new()),
            published_version: 0,
            published_field: FieldSummary::default(),
        };
        sim.publish_grid(true);
        sim
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    pub fn drones(&self) -> &[Drone] {
        &self.drones
    }

    pub fn drone(&self, id: u32) -> Option<&Drone> {
        self.drones.get(id as usize)
    }

    pub fn grid(&self) -> &PestGrid {
        &self.grid
    }

    pub fn stats(&self) -> &SimulationStats {
        &self.stats
    }

    pub fn clock(&self) -> &SimulationClock {
        &self.clock
    }

    pub fn step(&self) -> usize {
        self.step_index
    }

    /// Scaled simulation seconds elapsed since the last reset.
    pub fn sim_time(&self) -> f64 {
        self.sim_time
    }

    pub fn decay_cycles(&self) -> usize {
        self.decay_cycles
    }

    /// Advance drones and statistics by `delta_seconds` of real time.
    ///
    /// Bad inputs are repaired rather than rejected: a negative or non-finite
    /// delta counts as zero, a non-positive speed falls back to 1x, and both
    /// the real and the scaled delta are capped at
    /// [`MAX_TICK_SECONDS`](crate::clock::MAX_TICK_SECONDS). While paused
    /// nothing but the recorded clock state changes.
    pub fn tick(&mut self, delta_seconds: f64, is_playing: bool, speed: f64) {
        let real_delta = clamp_tick_delta(sanitize_delta(delta_seconds));
        self.clock.set_state(is_playing, speed);
        if !is_playing || real_delta == 0.0 {
            return;
        }

        let speed = self.clock.speed();
        let delta = clamp_tick_delta(real_delta * speed);
        self.clock.add_running_time(real_delta);
        let running_time = self.clock.running_time();

        let mut area_swept = 0.0;
        let mut active = 0;
        for drone in &mut self.drones {
            if drone.status.is_active() {
                active += 1;
            }
            area_swept += advance_drone(drone, delta, running_time, &self.config);
        }
        self.stats.fold_tick(area_swept, active, speed, &self.config);
        self.step_index += 1;
        self.sim_time += delta;
    }

    /// Like [`tick`](Self::tick), deriving the delta from a host timestamp.
    pub fn tick_at(&mut self, now: Instant, is_playing: bool, speed: f64) {
        let delta = self.clock.elapsed_since_last(now, is_playing);
        self.tick(delta, is_playing, speed);
    }

    /// One host frame: a tick, then whatever decay cycles the real-time
    /// cadence has made due. Returns the number of decay cycles applied.
    pub fn advance(&mut self, delta_seconds: f64, is_playing: bool, speed: f64) -> u32 {
        let real_delta = sanitize_delta(delta_seconds);
        self.tick(real_delta, is_playing, speed);
        let cycles = self
            .clock
            .take_decay_cycles(real_delta, self.config.decay_interval_secs);
        for _ in 0..cycles {
            self.decay_tick();
        }
        cycles
    }

    /// Apply one decay cycle. Ignored while the clock is paused.
    pub fn decay_tick(&mut self) -> bool {
        if !self.clock.is_running() {
            return false;
        }
        let touched = apply_decay_cycle(&mut self.grid, &self.drones, &self.config);
        self.decay_cycles += 1;
        self.publish_grid(false);
        trace!(
            cycle = self.decay_cycles,
            touched,
            mean_density = self.published_field.mean_density,
            "applied decay cycle"
        );
        true
    }

    fn publish_grid(&mut self, force: bool) {
        if !force && self.grid.version() == self.published_version {
            return;
        }
        self.published_grid = Arc::from(self.grid.values());
        self.published_version = self.grid.version();
        self.published_field = FieldSummary::from_grid(&self.grid, &self.config);
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            step: self.step_index,
            sim_time: self.sim_time,
            playing: self.clock.is_running(),
            drones: self.drones.clone(),
            grid_resolution: self.grid.resolution(),
            grid: Arc::clone(&self.published_grid),
            stats: self.stats.clone(),
            field: self.published_field.clone(),
        }
    }

    /// Rebuild fleet, grid and statistics. The RNG stream continues, so the
    /// new grid carries fresh jitter. Play state and speed are kept.
    pub fn reset(&mut self) {
        self.drones = Drone::fleet(&self.config);
        self.grid = PestGrid::radial(
            self.config.grid_resolution,
            self.config.density_jitter,
            &mut self.rng,
        );
        self.stats = SimulationStats::new(self.drones.len());
        self.step_index = 0;
        self.sim_time = 0.0;
        self.decay_cycles = 0;
        self.clock.reset_cadence();
        self.publish_grid(true);
        debug!(drones = self.drones.len(), "reset swarm simulation");
    }

    /// Id of the drone closest to `(x, z)` on the ground plane.
    pub fn nearest_drone(&self, x: f64, z: f64) -> Option<u32> {
        let tree = spatial::build_index(&self.drones);
        spatial::nearest_drone(&tree, [x, z])
    }

    pub fn drones_within(&self, x: f64, z: f64, radius: f64) -> Vec<u32> {
        let tree = spatial::build_index(&self.drones);
        spatial::drones_within(&tree, [x, z], radius)
    }
}

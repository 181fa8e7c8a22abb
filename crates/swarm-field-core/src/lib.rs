//! Swarm field simulation: a fleet of drones sweeping a field in a lawnmower
//! pattern while depleting a pest-density grid.

pub mod clock;
pub mod config;
pub mod decay;
pub mod drone;
pub mod grid;
pub mod spatial;
pub mod stats;
pub mod trajectory;
pub mod world;

pub use clock::SimulationClock;
pub use config::{SimConfig, SimConfigError};
pub use drone::{Drone, DroneStatus, Vec3};
pub use grid::PestGrid;
pub use stats::{FieldSummary, SimulationStats};
pub use world::{ExperimentError, RunSummary, Simulation, Snapshot, StepMetrics, WorldInitError};

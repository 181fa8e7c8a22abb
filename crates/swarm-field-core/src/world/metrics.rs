use super::Simulation;
use crate::stats::{FieldSummary, SimulationStats};
use serde::{Deserialize, Serialize};
use std::{error::Error, fmt};

#[derive(Clone, Debug, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct StepMetrics {
    pub frame: usize,
    pub sim_time: f64,
    pub total_area_covered: f64,
    pub pest_reduction: f64,
    pub cost_savings: f64,
    pub active_drones: usize,
    pub mean_density: f64,
    pub estimated_pests_remaining: f64,
    pub mean_battery: f64,
    pub mean_flight_time: f64,
    pub decay_cycles: usize,
}

fn default_schema_version() -> u32 {
    1
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RunSummary {
    #[serde(default = "default_schema_version")]
    pub schema_version: u32,
    pub frames: usize,
    pub frame_dt: f64,
    pub speed: f64,
    pub sample_every: usize,
    pub samples: Vec<StepMetrics>,
    pub final_stats: SimulationStats,
    pub final_field: FieldSummary,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ExperimentError {
    InvalidSampleEvery,
    InvalidFrameDelta(f64),
    TooManyFrames { max: usize, actual: usize },
    TooManySamples { max: usize, actual: usize },
}

impl fmt::Display for ExperimentError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExperimentError::InvalidSampleEvery => write!(f, "sample_every must be positive"),
            ExperimentError::InvalidFrameDelta(dt) => {
                write!(f, "frame_dt must be positive and finite, got {dt}")
            }
            ExperimentError::TooManyFrames { max, actual } => {
                write!(f, "frames ({actual}) exceed supported maximum ({max})")
            }
            ExperimentError::TooManySamples { max, actual } => {
                write!(
                    f,
                    "sample count ({actual}) exceeds supported maximum ({max})"
                )
            }
        }
    }
}

impl Error for ExperimentError {}

impl Simulation {
    pub const MAX_HEADLESS_FRAMES: usize = 10_000_000;
    pub const MAX_HEADLESS_SAMPLES: usize = 50_000;

    pub(crate) fn collect_step_metrics(&self, frame: usize) -> StepMetrics {
        let denom = self.drones.len().max(1) as f64;
        let battery_sum: f64 = self.drones.iter().map(|d| d.battery).sum();
        let flight_sum: f64 = self.drones.iter().map(|d| d.flight_time).sum();
        let field = FieldSummary::from_grid(&self.grid, &self.config);

        StepMetrics {
            frame,
            sim_time: self.sim_time,
            total_area_covered: self.stats.total_area_covered,
            pest_reduction: self.stats.pest_reduction,
            cost_savings: self.stats.cost_savings,
            active_drones: self.stats.active_drones,
            mean_density: field.mean_density,
            estimated_pests_remaining: field.estimated_pests_remaining,
            mean_battery: battery_sum / denom,
            mean_flight_time: flight_sum / denom,
            decay_cycles: self.decay_cycles,
        }
    }

    /// Drive the simulation as a host render loop would: `frames` frames of
    /// `frame_dt` real seconds at `speed`, decay cycles on their own cadence.
    /// Samples metrics every `sample_every` frames and on the last frame.
    pub fn try_run_headless(
        &mut self,
        frames: usize,
        frame_dt: f64,
        speed: f64,
        sample_every: usize,
    ) -> Result<RunSummary, ExperimentError> {
        if sample_every == 0 {
            return Err(ExperimentError::InvalidSampleEvery);
        }
        if !(frame_dt.is_finite() && frame_dt > 0.0) {
            return Err(ExperimentError::InvalidFrameDelta(frame_dt));
        }
        if frames > Self::MAX_HEADLESS_FRAMES {
            return Err(ExperimentError::TooManyFrames {
                max: Self::MAX_HEADLESS_FRAMES,
                actual: frames,
            });
        }
        let estimated_samples = if frames == 0 {
            0
        } else {
            ((frames - 1) / sample_every) + 1
        };
        if estimated_samples > Self::MAX_HEADLESS_SAMPLES {
            return Err(ExperimentError::TooManySamples {
                max: Self::MAX_HEADLESS_SAMPLES,
                actual: estimated_samples,
            });
        }

        let mut samples = Vec::with_capacity(estimated_samples);
        for frame in 1..=frames {
            self.advance(frame_dt, true, speed);
            if frame % sample_every == 0 || frame == frames {
                samples.push(self.collect_step_metrics(frame));
            }
        }
        Ok(RunSummary {
            schema_version: 1,
            frames,
            frame_dt,
            speed: self.clock.speed(),
            sample_every,
            samples,
            final_stats: self.stats.clone(),
            final_field: FieldSummary::from_grid(&self.grid, &self.config),
        })
    }
}

use pyo3::exceptions::PyValueError;
use pyo3::prelude::*;
use swarm_field_core::{SimConfig, Simulation};

/// PyO3 module exposing swarm-field-core to a Python host.
#[pyfunction]
fn version() -> &'static str {
    "0.1.0"
}

#[pyclass(name = "Simulation")]
struct PySimulation {
    inner: Simulation,
}

#[pymethods]
impl PySimulation {
    #[new]
    #[pyo3(signature = (drone_count=12, field_size=200.0, grid_resolution=40, seed=42))]
    fn new(drone_count: usize, field_size: f64, grid_resolution: usize, seed: u64) -> PyResult<Self> {
        let config = SimConfig {
            drone_count,
            field_size,
            grid_resolution,
            seed,
            ..SimConfig::default()
        };
        Self::build(config)
    }

    /// Build from a JSON object of `SimConfig` fields; missing fields keep their defaults.
    #[staticmethod]
    fn from_config_json(json: &str) -> PyResult<Self> {
        let config =
            SimConfig::from_json_str(json).map_err(|e| PyValueError::new_err(e.to_string()))?;
        Self::build(config)
    }

    fn tick(&mut self, delta_seconds: f64, is_playing: bool, speed: f64) {
        self.inner.tick(delta_seconds, is_playing, speed);
    }

    fn decay_tick(&mut self) -> bool {
        self.inner.decay_tick()
    }

    /// Tick plus any decay cycles that came due; returns the cycle count.
    fn advance(&mut self, delta_seconds: f64, is_playing: bool, speed: f64) -> u32 {
        self.inner.advance(delta_seconds, is_playing, speed)
    }

    fn reset(&mut self) {
        self.inner.reset();
    }

    fn snapshot_json(&self) -> PyResult<String> {
        serde_json::to_string(&self.inner.snapshot())
            .map_err(|e| PyValueError::new_err(e.to_string()))
    }

    fn grid(&self) -> Vec<f64> {
        self.inner.snapshot().grid.to_vec()
    }

    fn nearest_drone(&self, x: f64, z: f64) -> Option<u32> {
        self.inner.nearest_drone(x, z)
    }

    fn run_headless_json(
        &mut self,
        frames: usize,
        frame_dt: f64,
        speed: f64,
        sample_every: usize,
    ) -> PyResult<String> {
        let summary = self
            .inner
            .try_run_headless(frames, frame_dt, speed, sample_every)
            .map_err(|e| PyValueError::new_err(e.to_string()))?;
        serde_json::to_string(&summary).map_err(|e| PyValueError::new_err(e.to_string()))
    }

    #[getter]
    fn step(&self) -> usize {
        self.inner.step()
    }

    /// Scaled seconds simulated since the last reset.
    #[getter]
    fn sim_time(&self) -> f64 {
        self.inner.sim_time()
    }

    #[getter]
    fn pest_reduction(&self) -> f64 {
        self.inner.stats().pest_reduction
    }

    #[getter]
    fn total_area_covered(&self) -> f64 {
        self.inner.stats().total_area_covered
    }

    #[getter]
    fn cost_savings(&self) -> f64 {
        self.inner.stats().cost_savings
    }
}

impl PySimulation {
    fn build(config: SimConfig) -> PyResult<Self> {
        Simulation::new(config)
            .map(|inner| Self { inner })
            .map_err(|e| PyValueError::new_err(e.to_string()))
    }
}

#[pymodule]
fn _core(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_function(wrap_pyfunction!(version, m)?)?;
    m.add_class::<PySimulation>()?;
    Ok(())
}

use crate::config::SimConfig;
use crate::grid::PestGrid;
use serde::{Deserialize, Serialize};

/// Cumulative fleet figures, folded every running tick.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct SimulationStats {
    pub total_area_covered: f64,
    /// Percent, `[0, 100]`. A closed-form counter driven by fleet size and
    /// speed; it does not read the grid.
    pub pest_reduction: f64,
    pub cost_savings: f64,
    pub active_drones: usize,
}

impl SimulationStats {
    pub const MAX_REDUCTION: f64 = 100.0;

    pub fn new(active_drones: usize) -> Self {
        Self {
            active_drones,
            ..Self::default()
        }
    }

    /// Fold one tick into the totals.
    ///
    /// `area_swept` is the sum of the per-drone area deltas of this tick so
    /// fleet and per-drone coverage stay in lockstep.
    pub fn fold_tick(
        &mut self,
        area_swept: f64,
        active_drones: usize,
        speed: f64,
        config: &SimConfig,
    ) {
        self.total_area_covered += area_swept.max(0.0);
        let rate = config.reduction_rate_per_drone * speed.max(0.0) * active_drones as f64;
        self.pest_reduction = (self.pest_reduction + rate).clamp(0.0, Self::MAX_REDUCTION);
        self.cost_savings = self.total_area_covered * config.cost_per_square_meter;
        self.active_drones = active_drones;
    }
}

/// Figures read from the grid itself, reported next to [`SimulationStats`].
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct FieldSummary {
    pub mean_density: f64,
    pub estimated_pests_remaining: f64,
}

impl FieldSummary {
    pub fn from_grid(grid: &PestGrid, config: &SimConfig) -> Self {
        let mean_density = grid.mean();
        Self {
            mean_density,
            estimated_pests_remaining: mean_density * config.projected_pests,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fold_accumulates_area_and_cost() {
        let config = SimConfig::default();
        let mut stats = SimulationStats::new(12);
        stats.fold_tick(600.0, 12, 1.0, &config);
        stats.fold_tick(600.0, 12, 1.0, &config);
        assert!((stats.total_area_covered - 1200.0).abs() < 1e-9);
        assert!((stats.cost_savings - 180.0).abs() < 1e-9);
        assert!((stats.pest_reduction - 0.024).abs() < 1e-12);
        assert_eq!(stats.active_drones, 12);
    }

    #[test]
    fn reduction_caps_at_hundred() {
        let config = SimConfig::default();
        let mut stats = SimulationStats::new(12);
        for _ in 0..10_000 {
            stats.fold_tick(1.0, 12, 4.0, &config);
        }
        assert_eq!(stats.pest_reduction, 100.0);
    }

    #[test]
    fn zero_speed_adds_no_reduction() {
        let config = SimConfig::default();
        let mut stats = SimulationStats::new(12);
        stats.fold_tick(0.0, 12, 0.0, &config);
        assert_eq!(stats.pest_reduction, 0.0);
    }

    #[test]
    fn field_summary_scales_projected_pests() {
        let config = SimConfig::default();
        let grid = PestGrid::uniform(40, 0.5);
        let summary = FieldSummary::from_grid(&grid, &config);
        assert!((summary.mean_density - 0.5).abs() < 1e-12);
        assert!((summary.estimated_pests_remaining - 2500.0).abs() < 1e-9);
    }
}

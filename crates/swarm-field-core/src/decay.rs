use crate::config::SimConfig;
use crate::drone::Drone;
use crate::grid::PestGrid;

/// One decay cycle: every drone depletes the cell under it and attenuates the
/// four orthogonal neighbours. Drones outside the grid are skipped.
///
/// Returns the number of drones that touched the grid.
pub fn apply_decay_cycle(grid: &mut PestGrid, drones: &[Drone], config: &SimConfig) -> usize {
    let mut touched = 0;
    for drone in drones {
        let Some(idx) = grid.cell_at(drone.position.x, drone.position.z, config.field_size) else {
            continue;
        };
        grid.deplete(idx, config.decay_decrement);
        grid.attenuate_neighbors(idx, config.neighbor_attenuation);
        touched += 1;
    }
    touched
}

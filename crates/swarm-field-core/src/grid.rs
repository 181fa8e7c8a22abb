use rand::Rng;

/// Square pest-density grid over the field.
/// Cells are stored row-major: `index = row * resolution + col`, every value in `[0, 1]`.
#[derive(Clone, Debug)]
pub struct PestGrid {
    resolution: usize,
    data: Vec<f64>,
    version: u64,
}

impl PestGrid {
    pub fn uniform(resolution: usize, value: f64) -> Self {
        Self {
            resolution,
            data: vec![value.clamp(0.0, 1.0); resolution * resolution],
            version: 0,
        }
    }

    /// Initial infestation, densest near the field center.
    pub fn radial<R: Rng + ?Sized>(resolution: usize, jitter: f64, rng: &mut R) -> Self {
        let res = resolution as f64;
        let data = (0..resolution * resolution)
            .map(|i| {
                let x = (i % resolution) as f64 / res;
                let y = (i / resolution) as f64 / res;
                let dist_to_center = ((x - 0.5).powi(2) + (y - 0.5).powi(2)).sqrt();
                (1.2 - dist_to_center * 2.0 + rng.random::<f64>() * jitter).clamp(0.0, 1.0)
            })
            .collect();
        Self {
            resolution,
            data,
            version: 0,
        }
    }

    pub fn resolution(&self) -> usize {
        self.resolution
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn values(&self) -> &[f64] {
        &self.data
    }

    pub fn get(&self, index: usize) -> Option<f64> {
        self.data.get(index).copied()
    }

    /// Incremented on every mutation; lets readers skip republishing an unchanged grid.
    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn index(&self, row: usize, col: usize) -> Option<usize> {
        (row < self.resolution && col < self.resolution).then(|| row * self.resolution + col)
    }

    /// Map a field position (centered on the origin) to the cell beneath it.
    pub fn cell_at(&self, x: f64, z: f64, field_size: f64) -> Option<usize> {
        let half = field_size / 2.0;
        let res = self.resolution as f64;
        let col = (((x + half) / field_size) * res).floor();
        let row = (((z + half) / field_size) * res).floor();
        if !(col >= 0.0 && row >= 0.0 && col < res && row < res) {
            return None;
        }
        self.index(row as usize, col as usize)
    }

    /// Subtract `amount` from a cell, flooring at zero.
    pub fn deplete(&mut self, index: usize, amount: f64) {
        let Some(cell) = self.data.get_mut(index) else {
            return;
        };
        *cell = Self::checked((*cell - amount).max(0.0));
        self.version += 1;
    }

    /// Scale the left, right, up and down neighbours of a cell. Neighbours that
    /// would fall off the grid (including across a row boundary) are skipped.
    pub fn attenuate_neighbors(&mut self, index: usize, factor: f64) {
        if index >= self.data.len() {
            return;
        }
        let res = self.resolution;
        let row = index / res;
        let col = index % res;
        let neighbors = [
            (col > 0).then(|| index - 1),
            (col + 1 < res).then(|| index + 1),
            (row > 0).then(|| index - res),
            (row + 1 < res).then(|| index + res),
        ];
        for idx in neighbors.into_iter().flatten() {
            self.data[idx] = Self::checked(self.data[idx] * factor);
        }
        self.version += 1;
    }

    pub fn total(&self) -> f64 {
        self.data.iter().sum()
    }

    pub fn mean(&self) -> f64 {
        if self.data.is_empty() {
            return 0.0;
        }
        self.total() / self.data.len() as f64
    }

    fn checked(value: f64) -> f64 {
        debug_assert!(
            (0.0..=1.0).contains(&value),
            "pest density {value} escaped [0, 1]"
        );
        value.clamp(0.0, 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha12Rng;

    #[test]
    fn radial_grid_is_bounded_and_center_heavy() {
        let mut rng = ChaCha12Rng::seed_from_u64(3);
        let grid = PestGrid::radial(40, 0.2, &mut rng);
        assert_eq!(grid.len(), 1600);
        assert!(grid.values().iter().all(|v| (0.0..=1.0).contains(v)));
        let center = grid.get(grid.index(20, 20).unwrap()).unwrap();
        let corner = grid.get(0).unwrap();
        assert!(center > corner);
    }

    #[test]
    fn cell_at_maps_field_coordinates() {
        let grid = PestGrid::uniform(40, 1.0);
        assert_eq!(grid.cell_at(-100.0, -100.0, 200.0), Some(0));
        assert_eq!(grid.cell_at(0.0, 0.0, 200.0), grid.index(20, 20));
        assert_eq!(grid.cell_at(99.9, 99.9, 200.0), Some(1599));
        assert_eq!(grid.cell_at(100.0, 0.0, 200.0), None);
        assert_eq!(grid.cell_at(0.0, -100.1, 200.0), None);
        assert_eq!(grid.cell_at(f64::NAN, 0.0, 200.0), None);
    }

    #[test]
    fn deplete_floors_at_zero() {
        let mut grid = PestGrid::uniform(4, 0.2);
        grid.deplete(5, 0.3);
        assert_eq!(grid.get(5), Some(0.0));
        assert_eq!(grid.version(), 1);
    }

    #[test]
    fn out_of_range_mutations_are_ignored() {
        let mut grid = PestGrid::uniform(4, 1.0);
        grid.deplete(16, 0.3);
        grid.attenuate_neighbors(99, 0.5);
        assert!(grid.values().iter().all(|&v| v == 1.0));
        assert_eq!(grid.version(), 0);
    }

    #[test]
    fn neighbors_do_not_wrap_across_rows() {
        let mut grid = PestGrid::uniform(4, 1.0);
        // Last column of row 1: no right neighbour.
        grid.attenuate_neighbors(7, 0.5);
        assert_eq!(grid.get(8), Some(1.0));
        assert_eq!(grid.get(6), Some(0.5));
        assert_eq!(grid.get(3), Some(0.5));
        assert_eq!(grid.get(11), Some(0.5));
        assert_eq!(grid.get(7), Some(1.0));
    }

    #[test]
    fn mean_of_uniform_grid() {
        let grid = PestGrid::uniform(10, 0.25);
        assert!((grid.mean() - 0.25).abs() < 1e-12);
        assert!((grid.total() - 25.0).abs() < 1e-9);
    }
}

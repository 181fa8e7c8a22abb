use crate::drone::Drone;
use rstar::{PointDistance, RTree, RTreeObject, AABB};

/// A drone's footprint on the ground plane (x, z).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DroneLocation {
    pub id: u32,
    pub position: [f64; 2],
}

impl RTreeObject for DroneLocation {
    type Envelope = AABB<[f64; 2]>;

    fn envelope(&self) -> Self::Envelope {
        AABB::from_point(self.position)
    }
}

impl PointDistance for DroneLocation {
    fn distance_2(&self, point: &[f64; 2]) -> f64 {
        let dx = self.position[0] - point[0];
        let dz = self.position[1] - point[1];
        dx * dx + dz * dz
    }
}

/// Build an R*-tree from drone ground positions via bulk_load (O(n log n)).
pub fn build_index(drones: &[Drone]) -> RTree<DroneLocation> {
    RTree::bulk_load(
        drones
            .iter()
            .map(|d| DroneLocation {
                id: d.id,
                position: [d.position.x, d.position.z],
            })
            .collect(),
    )
}

pub fn nearest_drone(tree: &RTree<DroneLocation>, point: [f64; 2]) -> Option<u32> {
    tree.nearest_neighbor(&point).map(|loc| loc.id)
}

/// Drones within `radius` of `center`, sorted by id.
/// Uses AABB envelope query then filters by Euclidean distance.
pub fn drones_within(tree: &RTree<DroneLocation>, center: [f64; 2], radius: f64) -> Vec<u32> {
    let envelope = AABB::from_corners(
        [center[0] - radius, center[1] - radius],
        [center[0] + radius, center[1] + radius],
    );
    let r_sq = radius * radius;

    let mut ids: Vec<u32> = tree
        .locate_in_envelope(&envelope)
        .filter(|loc| loc.distance_2(&center) <= r_sq)
        .map(|loc| loc.id)
        .collect();
    ids.sort_unstable();
    ids
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::drone::Vec3;

    fn drones() -> Vec<Drone> {
        [(0.0, 0.0), (10.0, 0.0), (50.0, 50.0)]
            .iter()
            .enumerate()
            .map(|(i, &(x, z))| Drone::new(i as u32, Vec3::new(x, 8.0, z), 0.8))
            .collect()
    }

    #[test]
    fn nearest_ignores_altitude() {
        let tree = build_index(&drones());
        assert_eq!(nearest_drone(&tree, [8.0, 1.0]), Some(1));
        assert_eq!(nearest_drone(&tree, [40.0, 45.0]), Some(2));
    }

    #[test]
    fn within_radius_filters_corners() {
        let tree = build_index(&drones());
        assert_eq!(drones_within(&tree, [5.0, 0.0], 5.0), vec![0, 1]);
        // (10, 0) sits inside the query box but outside the circle.
        assert_eq!(drones_within(&tree, [3.0, 7.0], 8.0), vec![0]);
    }

    #[test]
    fn empty_index_has_no_nearest() {
        let tree = build_index(&[]);
        assert_eq!(nearest_drone(&tree, [0.0, 0.0]), None);
    }
}

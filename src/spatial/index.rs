use crate::core::geo::{LatLng, LatLngBounds};
use crate::data::location::Location;

use rstar::primitives::GeomWithData;
use rstar::{PointDistance, RTree, RTreeObject, AABB};

/// A location's position in `[lng, lat]` degrees, tagged with its slot in
/// the indexed slice
#[derive(Debug, Clone, PartialEq)]
struct PlanarEntry {
    slot: usize,
    point: [f64; 2],
}

// --- rstar integration -------------------------------------------------------------------------

impl RTreeObject for PlanarEntry {
    type Envelope = AABB<[f64; 2]>;

    fn envelope(&self) -> Self::Envelope {
        AABB::from_point(self.point)
    }
}

impl PointDistance for PlanarEntry {
    fn distance_2(&self, point: &[f64; 2]) -> f64 {
        let dx = self.point[0] - point[0];
        let dy = self.point[1] - point[1];
        dx * dx + dy * dy
    }
}

/// Position on the unit sphere. Chord length orders points the same way
/// great-circle distance does, so nearest-neighbour queries stay correct
/// away from the equator.
type SphereEntry = GeomWithData<[f64; 3], usize>;

fn unit_vector(position: &LatLng) -> [f64; 3] {
    let lat = position.lat.to_radians();
    let lng = position.lng.to_radians();
    [lat.cos() * lng.cos(), lat.cos() * lng.sin(), lat.sin()]
}

/// Result of a nearest-neighbour query
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Neighbor {
    /// Index into the slice the index was built from
    pub slot: usize,
    /// Haversine distance in meters
    pub distance_m: f64,
}

/// R-tree index over a slice of locations.
///
/// Queries return slots into the slice passed to [`LocationIndex::build`];
/// rebuild the index whenever the locations are reloaded.
#[derive(Debug, Default)]
pub struct LocationIndex {
    planar: RTree<PlanarEntry>,
    sphere: RTree<SphereEntry>,
    positions: Vec<LatLng>,
}

impl LocationIndex {
    pub fn build(locations: &[Location]) -> Self {
        let positions: Vec<LatLng> = locations.iter().map(|l| l.position).collect();

        let planar = positions
            .iter()
            .enumerate()
            .map(|(slot, p)| PlanarEntry {
                slot,
                point: p.to_lng_lat(),
            })
            .collect();
        let sphere = positions
            .iter()
            .enumerate()
            .map(|(slot, p)| SphereEntry::new(unit_vector(p), slot))
            .collect();

        Self {
            planar: RTree::bulk_load(planar),
            sphere: RTree::bulk_load(sphere),
            positions,
        }
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Up to `n` locations closest to `position`, nearest first
    pub fn nearest(&self, position: &LatLng, n: usize) -> Vec<Neighbor> {
        self.sphere
            .nearest_neighbor_iter(&unit_vector(position))
            .take(n)
            .map(|entry| Neighbor {
                slot: entry.data,
                distance_m: position.distance_to(&self.positions[entry.data]),
            })
            .collect()
    }

    /// Slots of the locations inside `bounds`, in slice order
    pub fn within(&self, bounds: &LatLngBounds) -> Vec<usize> {
        let envelope = AABB::from_corners(
            bounds.south_west.to_lng_lat(),
            bounds.north_east.to_lng_lat(),
        );
        let mut slots: Vec<usize> = self
            .planar
            .locate_in_envelope(&envelope)
            .map(|entry| entry.slot)
            .collect();
        slots.sort_unstable();
        slots
    }

    /// Bounds enclosing every indexed location
    pub fn bounds(&self) -> Option<LatLngBounds> {
        LatLngBounds::from_points(&self.positions)
    }
}

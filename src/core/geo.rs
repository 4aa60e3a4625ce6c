use serde::{Deserialize, Serialize};

/// Mean earth radius used for Haversine distances, in meters
const EARTH_RADIUS: f64 = 6371008.8;

/// Represents a geographical coordinate with latitude and longitude
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LatLng {
    pub lat: f64,
    pub lng: f64,
}

impl LatLng {
    /// Creates a new LatLng coordinate
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    /// Creates a coordinate from a GeoJSON `[longitude, latitude]` pair
    pub fn from_lng_lat(coordinates: [f64; 2]) -> Self {
        Self::new(coordinates[1], coordinates[0])
    }

    /// Returns the GeoJSON `[longitude, latitude]` ordering
    pub fn to_lng_lat(&self) -> [f64; 2] {
        [self.lng, self.lat]
    }

    /// Validates that the coordinates are within valid ranges
    pub fn is_valid(&self) -> bool {
        self.lat.is_finite()
            && self.lng.is_finite()
            && self.lat >= -90.0
            && self.lat <= 90.0
            && self.lng >= -180.0
            && self.lng <= 180.0
    }

    /// Calculates the distance to another LatLng using the Haversine formula
    pub fn distance_to(&self, other: &LatLng) -> f64 {
        let lat1_rad = self.lat.to_radians();
        let lat2_rad = other.lat.to_radians();
        let delta_lat = (other.lat - self.lat).to_radians();
        let delta_lng = (other.lng - self.lng).to_radians();

        let a = (delta_lat / 2.0).sin().powi(2)
            + lat1_rad.cos() * lat2_rad.cos() * (delta_lng / 2.0).sin().powi(2);
        let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

        EARTH_RADIUS * c
    }
}

impl Default for LatLng {
    fn default() -> Self {
        Self::new(0.0, 0.0)
    }
}

/// Represents a bounding box of geographical coordinates
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LatLngBounds {
    pub south_west: LatLng,
    pub north_east: LatLng,
}

impl LatLngBounds {
    pub fn new(south_west: LatLng, north_east: LatLng) -> Self {
        Self {
            south_west,
            north_east,
        }
    }

    /// Creates bounds from individual coordinates
    pub fn from_coords(south: f64, west: f64, north: f64, east: f64) -> Self {
        Self::new(LatLng::new(south, west), LatLng::new(north, east))
    }

    /// Smallest bounds enclosing every point, or `None` for an empty input
    pub fn from_points<'a, I>(points: I) -> Option<Self>
    where
        I: IntoIterator<Item = &'a LatLng>,
    {
        let mut iter = points.into_iter();
        let first = *iter.next()?;
        let mut bounds = Self::new(first, first);
        for point in iter {
            bounds.extend(point);
        }
        Some(bounds)
    }

    /// Checks if the bounds contain a point
    pub fn contains(&self, point: &LatLng) -> bool {
        point.lat >= self.south_west.lat
            && point.lat <= self.north_east.lat
            && point.lng >= self.south_west.lng
            && point.lng <= self.north_east.lng
    }

    /// Extends the bounds to include a point
    pub fn extend(&mut self, point: &LatLng) {
        self.south_west.lat = self.south_west.lat.min(point.lat);
        self.south_west.lng = self.south_west.lng.min(point.lng);
        self.north_east.lat = self.north_east.lat.max(point.lat);
        self.north_east.lng = self.north_east.lng.max(point.lng);
    }

    /// Gets the center point of the bounds
    pub fn center(&self) -> LatLng {
        LatLng::new(
            (self.south_west.lat + self.north_east.lat) / 2.0,
            (self.south_west.lng + self.north_east.lng) / 2.0,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lng_lat_ordering() {
        let coord = LatLng::from_lng_lat([127.6809, 26.2124]);
        assert_eq!(coord.lat, 26.2124);
        assert_eq!(coord.lng, 127.6809);
        assert_eq!(coord.to_lng_lat(), [127.6809, 26.2124]);
        assert!(coord.is_valid());
    }

    #[test]
    fn test_invalid_coordinates() {
        assert!(!LatLng::new(91.0, 0.0).is_valid());
        assert!(!LatLng::new(0.0, f64::NAN).is_valid());
    }

    #[test]
    fn test_lat_lng_distance() {
        let naha = LatLng::new(26.2124, 127.6809);
        let nago = LatLng::new(26.5915, 127.9773);
        let distance = naha.distance_to(&nago);

        // Roughly 51 km as the crow flies
        assert!((distance - 51_000.0).abs() < 3_000.0);
    }

    #[test]
    fn test_bounds_from_points() {
        let points = [
            LatLng::new(26.0, 127.5),
            LatLng::new(26.8, 128.2),
            LatLng::new(26.3, 127.7),
        ];
        let bounds = LatLngBounds::from_points(points.iter()).unwrap();
        assert_eq!(bounds.south_west, LatLng::new(26.0, 127.5));
        assert_eq!(bounds.north_east, LatLng::new(26.8, 128.2));
        assert!(bounds.contains(&LatLng::new(26.5, 127.9)));
        assert!(!bounds.contains(&LatLng::new(27.0, 127.9)));
        assert!(LatLngBounds::from_points([].iter()).is_none());
    }
}

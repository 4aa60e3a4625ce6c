//! Raw GeoJSON as it arrives from the upstream feed.
//!
//! Upstream records are loosely typed: ids and categories show up as either
//! strings or numbers, optional fields may be missing, `null` or empty. The
//! accessors here flatten all of that into `Option<String>`.

use crate::core::geo::LatLng;
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Feature geometry; only points are meaningful for this feed
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum RawGeometry {
    Point {
        coordinates: [f64; 2],
    },
    #[serde(other)]
    Unsupported,
}

/// One upstream feature
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct RawFeature {
    #[serde(default)]
    pub geometry: Option<RawGeometry>,
    #[serde(default)]
    pub properties: Option<Map<String, Value>>,
}

/// Renders a scalar JSON value as text; empty strings count as absent.
fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.trim().is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

impl RawFeature {
    /// Parses a standalone feature, mostly for tests and tooling
    pub fn from_value(value: Value) -> Result<Self> {
        serde_json::from_value(value)
            .map_err(|e| Error::InvalidData(format!("Invalid GeoJSON feature: {}", e)))
    }

    /// Point position, when the geometry is a valid point
    pub fn position(&self) -> Option<LatLng> {
        match &self.geometry {
            Some(RawGeometry::Point { coordinates }) => {
                let position = LatLng::from_lng_lat(*coordinates);
                position.is_valid().then_some(position)
            }
            _ => None,
        }
    }

    pub fn property(&self, key: &str) -> Option<&Value> {
        self.properties.as_ref()?.get(key)
    }

    /// Non-empty text value of a property
    pub fn text(&self, key: &str) -> Option<String> {
        self.property(key).and_then(scalar_text)
    }

    /// First non-empty text among `keys`
    pub fn first_text(&self, keys: &[&str]) -> Option<String> {
        keys.iter().find_map(|key| self.text(key))
    }

    /// Text value of a property nested one object deep
    pub fn nested_text(&self, object: &str, key: &str) -> Option<String> {
        self.property(object)?
            .as_object()?
            .get(key)
            .and_then(scalar_text)
    }

    /// Whether the property exists with any non-null value
    pub fn has_property(&self, key: &str) -> bool {
        matches!(self.property(key), Some(v) if !v.is_null())
    }
}

/// Checks the collection envelope and returns its feature array.
///
/// The payload must be a `FeatureCollection` whose `features` array is
/// non-empty.
pub fn validate_collection(payload: Value) -> Result<Vec<Value>> {
    let mut object = match payload {
        Value::Object(object) => object,
        _ => {
            return Err(Error::InvalidData(
                "Invalid GeoJSON format: payload is not an object".to_string(),
            ))
        }
    };

    match object.get("type").and_then(Value::as_str) {
        Some("FeatureCollection") => {}
        other => {
            return Err(Error::InvalidData(format!(
                "Invalid GeoJSON format: expected FeatureCollection, found {:?}",
                other
            )))
        }
    }

    match object.remove("features") {
        Some(Value::Array(features)) if !features.is_empty() => Ok(features),
        _ => Err(Error::InvalidData(
            "Invalid GeoJSON format: No features found".to_string(),
        )),
    }
}

/// Parses each feature, skipping the ones that are malformed.
///
/// Returns the usable features and how many were dropped.
pub fn parse_features(features: Vec<Value>) -> (Vec<RawFeature>, usize) {
    let total = features.len();
    let parsed: Vec<RawFeature> = features
        .into_iter()
        .enumerate()
        .filter_map(|(index, value)| match serde_json::from_value::<RawFeature>(value) {
            Ok(feature) if feature.position().is_some() => Some(feature),
            Ok(_) => {
                log::warn!("skipping feature #{}: missing or invalid point geometry", index);
                None
            }
            Err(e) => {
                log::warn!("skipping malformed feature #{}: {}", index, e);
                None
            }
        })
        .collect();

    let skipped = total - parsed.len();
    (parsed, skipped)
}

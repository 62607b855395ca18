//! GeoJSON output for contour features.
//!
//! Each [`TaggedFeature`] becomes one `Feature` with a `MultiLineString`
//! geometry holding its clipped lines. Two property naming schemes are
//! supported, see [`PropertyStyle`].

use contour::TaggedFeature;
use dem_common::{LonLat, Polyline};
use serde::{Deserialize, Serialize};

/// Property names written for each feature.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PropertyStyle {
    /// `{"value": 12.5, "major": true}`
    #[default]
    ValueMajor,
    /// `{"height": 12.5, "bold": true}`
    HeightBold,
}

/// A GeoJSON FeatureCollection of contour lines.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ContourFeatureCollection {
    /// Type identifier (always "FeatureCollection").
    #[serde(rename = "type")]
    pub type_: String,

    /// One feature per contour level, in level order.
    pub features: Vec<ContourFeature>,
}

impl ContourFeatureCollection {
    /// Create a new empty FeatureCollection.
    pub fn new() -> Self {
        Self {
            type_: "FeatureCollection".to_string(),
            features: Vec::new(),
        }
    }

    /// Convert tagged features, keeping their order.
    pub fn from_features(features: &[TaggedFeature], style: PropertyStyle) -> Self {
        Self::new().with_features(
            features
                .iter()
                .map(|f| ContourFeature::from_tagged(f, style))
                .collect(),
        )
    }

    /// Add multiple features to the collection.
    pub fn with_features(mut self, features: Vec<ContourFeature>) -> Self {
        self.features.extend(features);
        self
    }

    pub fn to_json_string(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    pub fn to_json_pretty(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

impl Default for ContourFeatureCollection {
    fn default() -> Self {
        Self::new()
    }
}

/// A GeoJSON Feature for one contour level.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ContourFeature {
    /// Type identifier (always "Feature").
    #[serde(rename = "type")]
    pub type_: String,

    pub geometry: ContourGeometry,

    pub properties: ContourProperties,
}

impl ContourFeature {
    pub fn from_tagged(feature: &TaggedFeature, style: PropertyStyle) -> Self {
        let properties = match style {
            PropertyStyle::ValueMajor => ContourProperties::ValueMajor {
                value: feature.value,
                major: feature.major,
            },
            PropertyStyle::HeightBold => ContourProperties::HeightBold {
                height: feature.value,
                bold: feature.major,
            },
        };
        Self {
            type_: "Feature".to_string(),
            geometry: ContourGeometry::multi_line_string(&feature.lines),
            properties,
        }
    }
}

/// Line geometries used for contours.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type")]
pub enum ContourGeometry {
    /// Several lines sharing one set of properties.
    MultiLineString {
        /// Lines of [longitude, latitude] pairs.
        coordinates: Vec<Vec<[f64; 2]>>,
    },
}

impl ContourGeometry {
    pub fn multi_line_string(lines: &[Polyline<LonLat>]) -> Self {
        ContourGeometry::MultiLineString {
            coordinates: lines
                .iter()
                .map(|line| line.iter().map(|p| p.to_array()).collect())
                .collect(),
        }
    }

    /// Number of lines in the geometry.
    pub fn line_count(&self) -> usize {
        match self {
            ContourGeometry::MultiLineString { coordinates } => coordinates.len(),
        }
    }
}

/// Feature properties in either naming scheme.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum ContourProperties {
    ValueMajor { value: f64, major: bool },
    HeightBold { height: f64, bold: bool },
}

impl ContourProperties {
    /// Elevation of the level.
    pub fn elevation(&self) -> f64 {
        match *self {
            ContourProperties::ValueMajor { value, .. } => value,
            ContourProperties::HeightBold { height, .. } => height,
        }
    }

    pub fn is_major(&self) -> bool {
        match *self {
            ContourProperties::ValueMajor { major, .. } => major,
            ContourProperties::HeightBold { bold, .. } => bold,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};

    fn sample() -> Vec<TaggedFeature> {
        vec![
            TaggedFeature {
                value: 2.5,
                major: true,
                lines: vec![
                    vec![LonLat::new(139.5, 36.2), LonLat::new(139.6, 36.3)],
                    vec![LonLat::new(139.7, 36.1), LonLat::new(139.8, 36.0)],
                ],
            },
            TaggedFeature {
                value: 3.0,
                major: false,
                lines: vec![vec![LonLat::new(139.5, 36.2), LonLat::new(139.5, 36.25)]],
            },
        ]
    }

    #[test]
    fn test_empty_collection() {
        let fc = ContourFeatureCollection::from_features(&[], PropertyStyle::ValueMajor);
        let value: Value = serde_json::from_str(&fc.to_json_string().unwrap()).unwrap();
        assert_eq!(value, json!({"type": "FeatureCollection", "features": []}));
    }

    #[test]
    fn test_value_major_properties() {
        let fc = ContourFeatureCollection::from_features(&sample(), PropertyStyle::ValueMajor);
        let value: Value = serde_json::from_str(&fc.to_json_string().unwrap()).unwrap();

        let first = &value["features"][0];
        assert_eq!(first["type"], "Feature");
        assert_eq!(first["geometry"]["type"], "MultiLineString");
        assert_eq!(first["properties"], json!({"value": 2.5, "major": true}));
        assert_eq!(
            first["geometry"]["coordinates"][1],
            json!([[139.7, 36.1], [139.8, 36.0]])
        );
        assert_eq!(value["features"][1]["properties"]["major"], false);
    }

    #[test]
    fn test_height_bold_properties() {
        let fc = ContourFeatureCollection::from_features(&sample(), PropertyStyle::HeightBold);
        let value: Value = serde_json::from_str(&fc.to_json_pretty().unwrap()).unwrap();
        assert_eq!(value["features"][0]["properties"], json!({"height": 2.5, "bold": true}));
        assert_eq!(value["features"][1]["properties"], json!({"height": 3.0, "bold": false}));
    }

    #[test]
    fn test_round_trip_keeps_style() {
        let fc = ContourFeatureCollection::from_features(&sample(), PropertyStyle::HeightBold);
        let json = fc.to_json_string().unwrap();
        let parsed: ContourFeatureCollection = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, fc);
        assert_eq!(parsed.features[0].geometry.line_count(), 2);
        assert_eq!(parsed.features[0].properties.elevation(), 2.5);
        assert!(parsed.features[0].properties.is_major());
    }
}

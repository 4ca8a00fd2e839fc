//! Geographic coordinates used by pins and camera centring.
//!
//! Pins carry [`Coordinates`] (`{ longitude, latitude }` on the wire) while
//! style descriptors and the camera use a [`CenterCoordinate`] serialised as
//! a `[lon, lat]` pair. Both convert to and from [`geo::Coord`], with
//! `x = longitude` and `y = latitude`.

use geo::Coord;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A WGS84 position attached to a pin.
///
/// # Examples
///
/// ```
/// use driftpin_core::Coordinates;
///
/// let tap = Coordinates::new(1.0, 2.0);
/// let coord = tap.to_coord();
/// assert_eq!((coord.x, coord.y), (1.0, 2.0));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    /// Degrees east of the prime meridian.
    pub longitude: f64,
    /// Degrees north of the equator.
    pub latitude: f64,
}

impl Coordinates {
    /// Construct coordinates from a longitude/latitude pair.
    #[must_use]
    pub const fn new(longitude: f64, latitude: f64) -> Self {
        Self {
            longitude,
            latitude,
        }
    }

    /// Convert into a [`geo::Coord`].
    #[must_use]
    pub const fn to_coord(self) -> Coord<f64> {
        Coord {
            x: self.longitude,
            y: self.latitude,
        }
    }
}

impl From<Coord<f64>> for Coordinates {
    fn from(coord: Coord<f64>) -> Self {
        Self::new(coord.x, coord.y)
    }
}

/// Camera centre for a style, serialised as `[lon, lat]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "[f64; 2]", into = "[f64; 2]")]
pub struct CenterCoordinate(Coord<f64>);

/// Centre used when a style descriptor carries no usable
/// `metadata.centerCoordinate`.
pub const DEFAULT_CENTER: CenterCoordinate =
    CenterCoordinate::new(-73.728_265_203_920_81, 45.584_043_985_983);

impl CenterCoordinate {
    /// Construct a centre from a longitude/latitude pair.
    #[must_use]
    pub const fn new(longitude: f64, latitude: f64) -> Self {
        Self(Coord {
            x: longitude,
            y: latitude,
        })
    }

    /// Longitude in degrees.
    #[must_use]
    pub const fn longitude(self) -> f64 {
        self.0.x
    }

    /// Latitude in degrees.
    #[must_use]
    pub const fn latitude(self) -> f64 {
        self.0.y
    }

    /// The centre as a [`geo::Coord`].
    #[must_use]
    pub const fn as_coord(self) -> Coord<f64> {
        self.0
    }

    /// The centre as a `[lon, lat]` pair.
    #[must_use]
    pub const fn to_pair(self) -> [f64; 2] {
        [self.0.x, self.0.y]
    }

    /// Read a centre from a JSON value shaped like `[number, number]`.
    ///
    /// Anything else (wrong length, non-numeric or non-finite members)
    /// yields `None`.
    ///
    /// # Examples
    ///
    /// ```
    /// use driftpin_core::CenterCoordinate;
    /// use serde_json::json;
    ///
    /// let centre = CenterCoordinate::from_json(&json!([-84.38, 33.75]));
    /// assert_eq!(centre, Some(CenterCoordinate::new(-84.38, 33.75)));
    /// assert_eq!(CenterCoordinate::from_json(&json!(["a", 1])), None);
    /// assert_eq!(CenterCoordinate::from_json(&json!([1, 2, 3])), None);
    /// ```
    #[must_use]
    pub fn from_json(value: &Value) -> Option<Self> {
        let [lon, lat] = value.as_array()?.as_slice() else {
            return None;
        };
        let longitude = lon.as_f64().filter(|v| v.is_finite())?;
        let latitude = lat.as_f64().filter(|v| v.is_finite())?;
        Some(Self::new(longitude, latitude))
    }
}

impl Default for CenterCoordinate {
    fn default() -> Self {
        DEFAULT_CENTER
    }
}

impl From<[f64; 2]> for CenterCoordinate {
    fn from([longitude, latitude]: [f64; 2]) -> Self {
        Self::new(longitude, latitude)
    }
}

impl From<CenterCoordinate> for [f64; 2] {
    fn from(center: CenterCoordinate) -> Self {
        center.to_pair()
    }
}

impl From<Coordinates> for CenterCoordinate {
    fn from(coordinates: Coordinates) -> Self {
        Self::new(coordinates.longitude, coordinates.latitude)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use serde_json::json;

    #[rstest]
    #[case(json!([-84.3837773, 33.7521521]), Some(CenterCoordinate::new(-84.383_777_3, 33.752_152_1)))]
    #[case(json!([0, 0]), Some(CenterCoordinate::new(0.0, 0.0)))]
    #[case(json!([1.0]), None)]
    #[case(json!({"lon": 1.0, "lat": 2.0}), None)]
    #[case(json!("1,2"), None)]
    #[case(json!([null, 2.0]), None)]
    fn parses_only_numeric_pairs(#[case] value: Value, #[case] expected: Option<CenterCoordinate>) {
        assert_eq!(CenterCoordinate::from_json(&value), expected);
    }

    #[rstest]
    fn centre_serialises_as_pair() {
        let centre = CenterCoordinate::new(1.5, -2.5);
        let encoded = serde_json::to_value(centre).unwrap_or_default();
        assert_eq!(encoded, json!([1.5, -2.5]));
    }

    #[rstest]
    fn coordinates_use_named_fields() {
        let encoded = serde_json::to_value(Coordinates::new(1.0, 2.0)).unwrap_or_default();
        assert_eq!(encoded, json!({"longitude": 1.0, "latitude": 2.0}));
    }

    #[rstest]
    fn default_centre_matches_fallback() {
        assert_eq!(CenterCoordinate::default().to_pair(), DEFAULT_CENTER.to_pair());
        assert!(DEFAULT_CENTER.longitude() < 0.0);
        assert!(DEFAULT_CENTER.latitude() > 0.0);
    }
}

//! Fixed-point coordinates at 1e-7 degree precision
//!
//! Records store unsigned values: latitude is offset by +90 and longitude by
//! +180 degrees before scaling, so the whole globe fits in `u32`.

use super::error::{Error, Result};

const SCALE: f64 = 10_000_000.0; // 1e-7 degrees
const LAT_OFFSET: f64 = 90.0;
const LNG_OFFSET: f64 = 180.0;

/// An encoded position as stored in node records.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Coord7 {
    pub lng7: u32,
    pub lat7: u32,
}

impl Coord7 {
    /// Wrap values that are already encoded.
    pub const fn from_raw(lng7: u32, lat7: u32) -> Self {
        Self { lng7, lat7 }
    }

    /// Encode a WGS84 position, rounding to the nearest 1e-7 degree.
    pub fn from_degrees(lng: f64, lat: f64) -> Result<Self> {
        if !(-LAT_OFFSET..=LAT_OFFSET).contains(&lat) || !(-LNG_OFFSET..=LNG_OFFSET).contains(&lng) {
            return Err(Error::CoordinateOutOfRange { lng, lat });
        }

        Ok(Self {
            lng7: ((lng + LNG_OFFSET) * SCALE).round() as u32,
            lat7: ((lat + LAT_OFFSET) * SCALE).round() as u32,
        })
    }

    /// Decode back to `(lng, lat)` degrees.
    pub fn to_degrees(self) -> (f64, f64) {
        (
            self.lng7 as f64 / SCALE - LNG_OFFSET,
            self.lat7 as f64 / SCALE - LAT_OFFSET,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_known_points() {
        // Brussels
        let coord = Coord7::from_degrees(4.3517, 50.8503).unwrap();
        assert_eq!(coord.lat7, 1_408_503_000);
        assert_eq!(coord.lng7, 1_843_517_000);

        let origin = Coord7::from_degrees(-180.0, -90.0).unwrap();
        assert_eq!(origin, Coord7::from_raw(0, 0));

        let corner = Coord7::from_degrees(180.0, 90.0).unwrap();
        assert_eq!(corner, Coord7::from_raw(3_600_000_000, 1_800_000_000));
    }

    #[test]
    fn test_decode() {
        let (lng, lat) = Coord7::from_raw(1_843_517_000, 1_408_503_000).to_degrees();
        assert!((lat - 50.8503).abs() < 1e-7);
        assert!((lng - 4.3517).abs() < 1e-7);
    }

    #[test]
    fn test_out_of_range_rejected() {
        assert!(matches!(
            Coord7::from_degrees(0.0, 90.5),
            Err(Error::CoordinateOutOfRange { .. })
        ));
        assert!(Coord7::from_degrees(-180.1, 0.0).is_err());
        assert!(Coord7::from_degrees(f64::NAN, 0.0).is_err());
        assert!(Coord7::from_degrees(0.0, f64::INFINITY).is_err());
    }
}

//! Decimal degrees to Degrees Decimal Minutes (`DDMM.fffff,H`), the layout NMEA sentences use.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::ConvertError;

/// Digits of the integer-minutes field.
const MINUTES_WIDTH: usize = 2;

/// Decimal places the minutes value is rounded to before rendering.
const MINUTES_PRECISION: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Axis {
    Latitude,
    Longitude,
}

impl Axis {
    pub fn degree_width(self) -> usize {
        match self {
            Axis::Latitude => 2,
            Axis::Longitude => 3,
        }
    }

    /// Width of the degrees plus integer-minutes block, e.g. `DDMM` for latitude.
    pub fn field_width(self) -> usize {
        self.degree_width() + MINUTES_WIDTH
    }

    pub fn limit(self) -> f64 {
        match self {
            Axis::Latitude => 90.0,
            Axis::Longitude => 180.0,
        }
    }

    pub fn positive(self) -> char {
        match self {
            Axis::Latitude => 'N',
            Axis::Longitude => 'E',
        }
    }

    pub fn negative(self) -> char {
        match self {
            Axis::Latitude => 'S',
            Axis::Longitude => 'W',
        }
    }

    /// Zero counts as negative: the equator is `S` and the prime meridian `W`.
    pub fn hemisphere(self, value: f64) -> char {
        if value > 0.0 {
            self.positive()
        } else {
            self.negative()
        }
    }
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Axis::Latitude => f.write_str("latitude"),
            Axis::Longitude => f.write_str("longitude"),
        }
    }
}

/// A WGS84 position in decimal degrees. Serialized as `[lat, lon]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "(f64, f64)", into = "(f64, f64)")]
pub struct Coordinate {
    pub lat: f64,
    pub lon: f64,
}

impl Coordinate {
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }

    pub fn to_ddm(self) -> Result<Ddm, ConvertError> {
        deg2ddm(self.lat, self.lon)
    }
}

impl From<(f64, f64)> for Coordinate {
    fn from((lat, lon): (f64, f64)) -> Self {
        Self { lat, lon }
    }
}

impl From<Coordinate> for (f64, f64) {
    fn from(coord: Coordinate) -> Self {
        (coord.lat, coord.lon)
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.lat, self.lon)
    }
}

/// Latitude and longitude DDM strings. Serialized as `[lat, lon]`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "(String, String)", into = "(String, String)")]
pub struct Ddm {
    pub lat: String,
    pub lon: String,
}

impl Ddm {
    pub fn new(lat: impl Into<String>, lon: impl Into<String>) -> Self {
        Self {
            lat: lat.into(),
            lon: lon.into(),
        }
    }
}

impl From<(String, String)> for Ddm {
    fn from((lat, lon): (String, String)) -> Self {
        Self { lat, lon }
    }
}

impl From<Ddm> for (String, String) {
    fn from(ddm: Ddm) -> Self {
        (ddm.lat, ddm.lon)
    }
}

impl fmt::Display for Ddm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}, {}", self.lat, self.lon)
    }
}

/// Converts a decimal-degree pair to `(DDMM.fffff,N|S, DDDMM.fffff,E|W)`.
///
/// The minutes fraction keeps only the digits the rounded value needs, so a
/// position whose minutes round to `30.5` renders as `30.5`, not `30.50000`.
pub fn deg2ddm(lat: f64, lon: f64) -> Result<Ddm, ConvertError> {
    Ok(Ddm {
        lat: format_axis(lat, Axis::Latitude)?,
        lon: format_axis(lon, Axis::Longitude)?,
    })
}

pub fn format_axis(value: f64, axis: Axis) -> Result<String, ConvertError> {
    check_range(value, axis)?;

    let whole = value.trunc();
    let degrees = whole.abs() as u32;
    let remainder = (value - whole).abs() * 60.0;

    Ok(format!(
        "{degrees:0width$}{minutes},{hemisphere}",
        width = axis.degree_width(),
        minutes = render_minutes(remainder, axis.field_width() - axis.degree_width()),
        hemisphere = axis.hemisphere(value),
    ))
}

fn check_range(value: f64, axis: Axis) -> Result<(), ConvertError> {
    if !value.is_finite() {
        return Err(ConvertError::NonFinite { axis, value });
    }
    let limit = axis.limit();
    if value.abs() > limit {
        return Err(ConvertError::OutOfRange { axis, value, limit });
    }
    Ok(())
}

/// `{:.5}` rounds the exact binary value half-to-even; trailing zeros are then
/// dropped down to a single digit, giving the shortest decimal form of the
/// rounded value without ever switching to exponent notation.
fn render_minutes(minutes: f64, width: usize) -> String {
    let fixed = format!("{:.*}", MINUTES_PRECISION, minutes);
    let (whole, fraction) = fixed.split_once('.').unwrap_or((fixed.as_str(), ""));
    let fraction = fraction.trim_end_matches('0');
    let fraction = if fraction.is_empty() { "0" } else { fraction };
    format!("{whole:0>width$}.{fraction}")
}

/// Components recovered from a DDM string.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParsedDdm {
    pub degrees: u32,
    pub minutes: f64,
    pub hemisphere: char,
}

impl ParsedDdm {
    pub fn to_decimal(&self, axis: Axis) -> f64 {
        let magnitude = f64::from(self.degrees) + self.minutes / 60.0;
        if self.hemisphere == axis.positive() {
            magnitude
        } else {
            -magnitude
        }
    }
}

pub fn parse_axis(text: &str, axis: Axis) -> Result<ParsedDdm, ConvertError> {
    let malformed = |reason| ConvertError::Malformed {
        axis,
        text: text.to_string(),
        reason,
    };

    let (body, hemisphere) = text.split_once(',').ok_or_else(|| malformed("missing hemisphere"))?;
    let mut letters = hemisphere.trim().chars();
    let hemisphere = match (letters.next(), letters.next()) {
        (Some(c), None) if c == axis.positive() || c == axis.negative() => c,
        _ => return Err(malformed("unknown hemisphere")),
    };

    let (whole, fraction) = body.split_once('.').ok_or_else(|| malformed("missing decimal point"))?;
    if whole.len() != axis.field_width() || !whole.bytes().all(|b| b.is_ascii_digit()) {
        return Err(malformed("bad degree/minute width"));
    }
    if fraction.is_empty() || !fraction.bytes().all(|b| b.is_ascii_digit()) {
        return Err(malformed("bad minute fraction"));
    }

    let (degrees, minutes) = body.split_at(axis.degree_width());
    let degrees = degrees
        .parse::<u32>()
        .map_err(|_| malformed("bad degrees"))?;
    let minutes = minutes
        .parse::<f64>()
        .map_err(|_| malformed("bad minutes"))?;

    Ok(ParsedDdm {
        degrees,
        minutes,
        hemisphere,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn ddm(lat: f64, lon: f64) -> Ddm {
        deg2ddm(lat, lon).unwrap()
    }

    #[test]
    fn test_padding_regressions() {
        assert_eq!(
            ddm(66.882115, -76.039129),
            Ddm::new("6652.9269,N", "07602.34774,W")
        );
        assert_eq!(
            ddm(25.092267, 125.987818),
            Ddm::new("2505.53602,N", "12559.26908,E")
        );
        assert_eq!(
            ddm(56.166042, -176.45725),
            Ddm::new("5609.96252,N", "17627.435,W")
        );
    }

    #[test]
    fn test_zero_is_south_west() {
        assert_eq!(ddm(0.0, 0.0), Ddm::new("0000.0,S", "00000.0,W"));
        assert_eq!(ddm(-0.0, -0.0), Ddm::new("0000.0,S", "00000.0,W"));
        assert_eq!(Axis::Latitude.hemisphere(0.0), 'S');
        assert_eq!(Axis::Longitude.hemisphere(1e-9), 'E');
    }

    #[test]
    fn test_trailing_zeros_dropped() {
        let half = 30.5 / 60.0;
        assert_eq!(
            ddm(10.0 + half, -(3.0 + half)),
            Ddm::new("1030.5,N", "00330.5,W")
        );
        assert_eq!(ddm(10.5, -20.25), Ddm::new("1030.0,N", "02015.0,W"));
        assert_eq!(
            ddm(-33.8675, 151.207),
            Ddm::new("3352.05,S", "15112.42,E")
        );
        assert_eq!(ddm(45.0002, -45.0002).lat, "4500.012,N");
    }

    #[test]
    fn test_small_negative_truncates_toward_zero() {
        assert_eq!(ddm(-0.5, -0.75), Ddm::new("0030.0,S", "00045.0,W"));
    }

    #[test]
    fn test_tiny_minutes_stay_positional() {
        assert_eq!(ddm(45.000001, 0.0).lat, "4500.00006,N");
    }

    #[test]
    fn test_rounds_to_five_places() {
        assert_eq!(ddm(12.9999999, -12.34), Ddm::new("1259.99999,N", "01220.4,W"));
    }

    #[test]
    fn test_minutes_rounding_to_sixty_not_carried() {
        assert_eq!(
            ddm(12.9999999999, -0.9999999999),
            Ddm::new("1260.0,N", "00060.0,W")
        );
    }

    #[test]
    fn test_limits() {
        assert_eq!(ddm(90.0, 180.0), Ddm::new("9000.0,N", "18000.0,E"));
        assert_eq!(ddm(-90.0, -180.0), Ddm::new("9000.0,S", "18000.0,W"));
    }

    #[test]
    fn test_rejects_bad_input() {
        assert!(matches!(
            deg2ddm(f64::NAN, 0.0),
            Err(ConvertError::NonFinite { axis: Axis::Latitude, .. })
        ));
        assert!(matches!(
            deg2ddm(0.0, f64::INFINITY),
            Err(ConvertError::NonFinite { axis: Axis::Longitude, .. })
        ));
        assert!(matches!(
            deg2ddm(90.5, 0.0),
            Err(ConvertError::OutOfRange { axis: Axis::Latitude, .. })
        ));
        assert!(matches!(
            deg2ddm(0.0, -181.0),
            Err(ConvertError::OutOfRange { axis: Axis::Longitude, .. })
        ));
    }

    #[test]
    fn test_parse_axis() {
        let parsed = parse_axis("07602.34774,W", Axis::Longitude).unwrap();
        assert_eq!(parsed.degrees, 76);
        assert_eq!(parsed.minutes, 2.34774);
        assert_eq!(parsed.hemisphere, 'W');
        assert!((parsed.to_decimal(Axis::Longitude) + 76.039129).abs() < 1e-6);

        assert!(parse_axis("6652.9269", Axis::Latitude).is_err());
        assert!(parse_axis("6652.9269,E", Axis::Latitude).is_err());
        assert!(parse_axis("652.9269,N", Axis::Latitude).is_err());
        assert!(parse_axis("6652.,N", Axis::Latitude).is_err());
    }

    proptest! {
        #[test]
        fn prop_parse_back(lat in -90.0f64..=90.0, lon in -180.0f64..=180.0) {
            let out = deg2ddm(lat, lon).unwrap();
            prop_assert_eq!(&out, &deg2ddm(lat, lon).unwrap());

            for (value, text, axis) in [
                (lat, &out.lat, Axis::Latitude),
                (lon, &out.lon, Axis::Longitude),
            ] {
                let parsed = parse_axis(text, axis).unwrap();
                prop_assert_eq!(parsed.degrees, value.trunc().abs() as u32);
                prop_assert_eq!(parsed.hemisphere, axis.hemisphere(value));

                let expected: f64 = format!("{:.5}", (value - value.trunc()).abs() * 60.0)
                    .parse()
                    .unwrap();
                prop_assert!((parsed.minutes - expected).abs() < 1e-9);
            }
        }
    }
}

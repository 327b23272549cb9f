//! Coordinate literal parsing: integer centimeters (`32cm`) or decimal
//! meters (`0.32m`). A missing unit suffix is always a parse error.

use std::fmt;

#[derive(Debug)]
pub struct CoordParseError(String);

impl fmt::Display for CoordParseError {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}", self.0)
	}
}

impl std::error::Error for CoordParseError {}

fn round_half_away_from_zero(v: f32) -> i32 {
	if v >= 0.0 { (v + 0.5).floor() as i32 } else { (v - 0.5).ceil() as i32 }
}

/// Parses one coordinate literal into a centimeter value on the increment
/// lattice.
pub fn parse_coord_cm(raw: &str) -> Result<i32, CoordParseError> {
	if let Some(digits) = raw.strip_suffix("cm") {
		digits.parse::<i32>().map_err(|e| CoordParseError(format!("invalid centimeter value {digits:?}: {e}")))
	} else if let Some(digits) = raw.strip_suffix('m') {
		let meters: f32 = digits.parse().map_err(|e| CoordParseError(format!("invalid meter value {digits:?}: {e}")))?;
		Ok(round_half_away_from_zero(meters * 100.0))
	} else {
		Err(CoordParseError(format!("{raw:?} is missing a unit suffix (cm or m)")))
	}
}

pub fn cm_to_m(cm: i32) -> f32 {
	cm as f32 / 100.0
}

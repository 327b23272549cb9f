//! The closed set of cubic voxel sizes the store understands.

/// One of the ten fixed cubic voxel edge lengths.
///
/// No resolution subdivides another beyond "the edge length is an integer
/// number of centimeters" — there is no implied octree relationship here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Resolution {
	Size1cm,
	Size2cm,
	Size4cm,
	Size8cm,
	Size16cm,
	Size32cm,
	Size64cm,
	Size128cm,
	Size256cm,
	Size512cm,
}

impl Resolution {
	pub const COUNT: usize = 10;

	pub const ALL: [Resolution; Self::COUNT] = [
		Resolution::Size1cm,
		Resolution::Size2cm,
		Resolution::Size4cm,
		Resolution::Size8cm,
		Resolution::Size16cm,
		Resolution::Size32cm,
		Resolution::Size64cm,
		Resolution::Size128cm,
		Resolution::Size256cm,
		Resolution::Size512cm,
	];

	/// Edge length in centimeters.
	pub const fn edge_cm(self) -> i32 {
		match self {
			Self::Size1cm => 1,
			Self::Size2cm => 2,
			Self::Size4cm => 4,
			Self::Size8cm => 8,
			Self::Size16cm => 16,
			Self::Size32cm => 32,
			Self::Size64cm => 64,
			Self::Size128cm => 128,
			Self::Size256cm => 256,
			Self::Size512cm => 512,
		}
	}

	/// Edge length in meters.
	pub fn edge_m(self) -> f32 {
		self.edge_cm() as f32 / 100.0
	}

	/// Index into the fixed resolution list; used to break ties when two
	/// planes land on the same height.
	pub const fn index(self) -> u8 {
		match self {
			Self::Size1cm => 0,
			Self::Size2cm => 1,
			Self::Size4cm => 2,
			Self::Size8cm => 3,
			Self::Size16cm => 4,
			Self::Size32cm => 5,
			Self::Size64cm => 6,
			Self::Size128cm => 7,
			Self::Size256cm => 8,
			Self::Size512cm => 9,
		}
	}

	pub fn from_index(index: u8) -> Option<Self> {
		Self::ALL.get(index as usize).copied()
	}

	pub fn from_edge_cm(edge_cm: i32) -> Option<Self> {
		Self::ALL.into_iter().find(|r| r.edge_cm() == edge_cm)
	}

	pub const fn name(self) -> &'static str {
		match self {
			Self::Size1cm => "1cm",
			Self::Size2cm => "2cm",
			Self::Size4cm => "4cm",
			Self::Size8cm => "8cm",
			Self::Size16cm => "16cm",
			Self::Size32cm => "32cm",
			Self::Size64cm => "64cm",
			Self::Size128cm => "128cm",
			Self::Size256cm => "256cm",
			Self::Size512cm => "512cm",
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn edge_lengths_match_the_fixed_set() {
		let edges: Vec<i32> = Resolution::ALL.iter().map(|r| r.edge_cm()).collect();
		assert_eq!(edges, vec![1, 2, 4, 8, 16, 32, 64, 128, 256, 512]);
	}

	#[test]
	fn index_round_trips() {
		for r in Resolution::ALL {
			assert_eq!(Resolution::from_index(r.index()), Some(r));
		}
	}

	#[test]
	fn from_edge_cm_finds_the_matching_resolution() {
		assert_eq!(Resolution::from_edge_cm(32), Some(Resolution::Size32cm));
		assert_eq!(Resolution::from_edge_cm(3), None);
	}
}

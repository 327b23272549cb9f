//! Pure, total, side-effect-free conversions between the three coordinate
//! spaces: metric World, the 1cm Increment lattice, and the per-resolution
//! Grid used only inside the store for bucketing.
//!
//! The three spaces are distinct newtypes on purpose: nothing implicitly
//! converts between them. Crossing spaces always goes through one of the
//! functions below.

use glam::{IVec3, Vec3};

use crate::resolution::Resolution;

/// A point in the continuous, metric World space: right-handed, Y-up,
/// origin at the workspace center on X/Z and at the ground plane on Y.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct World(pub Vec3);

/// A point on the canonical 1cm integer lattice, in the same frame as
/// World. This is the only space voxel positions are ever stored in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Increment(pub IVec3);

impl Increment {
	pub fn new(x: i32, y: i32, z: i32) -> Self {
		Increment(IVec3::new(x, y, z))
	}
}

/// Axis-aligned bounds in World space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
	pub min: Vec3,
	pub max: Vec3,
}

fn round_half_away_from_zero(v: f32) -> f32 {
	if v >= 0.0 {
		(v + 0.5).floor()
	} else {
		(v - 0.5).ceil()
	}
}

/// `world_to_increment(W) -> I`: component-wise `round(w * 100)`, rounding
/// half away from zero.
pub fn world_to_increment(w: World) -> Increment {
	let cm = w.0 * 100.0;
	Increment(IVec3::new(
		round_half_away_from_zero(cm.x) as i32,
		round_half_away_from_zero(cm.y) as i32,
		round_half_away_from_zero(cm.z) as i32,
	))
}

/// `increment_to_world(I) -> W`: `i / 100.0` per component.
pub fn increment_to_world(p: Increment) -> World {
	World(Vec3::new(p.0.x as f32, p.0.y as f32, p.0.z as f32) / 100.0)
}

/// `workspace_bounds(size) -> (min_w, max_w)`.
pub fn workspace_bounds(size: Vec3) -> Bounds {
	Bounds {
		min: Vec3::new(-size.x / 2.0, 0.0, -size.z / 2.0),
		max: Vec3::new(size.x / 2.0, size.y, size.z / 2.0),
	}
}

/// `voxel_bounds(p, r) -> (min_w, max_w)` per the bottom-center convention:
/// p is the bottom-center of the voxel's occupied box.
pub fn voxel_bounds(p: Increment, r: Resolution) -> Bounds {
	let World(center) = increment_to_world(p);
	let s = r.edge_m();
	let half = s / 2.0;
	Bounds {
		min: Vec3::new(center.x - half, center.y, center.z - half),
		max: Vec3::new(center.x + half, center.y + s, center.z + half),
	}
}

/// `contains_increment(size, p) -> bool`: true iff the increment corresponds
/// to a world point inside the workspace and `p.y >= 0`.
pub fn contains_increment(size: Vec3, p: Increment) -> bool {
	if p.0.y < 0 {
		return false;
	}
	let World(w) = increment_to_world(p);
	let b = workspace_bounds(size);
	w.x >= b.min.x && w.x <= b.max.x && w.y >= b.min.y && w.y <= b.max.y && w.z >= b.min.z && w.z <= b.max.z
}

/// Small tolerance for float boundary comparisons: a voxel box that exactly
/// touches a workspace wall is inside, never `OutOfBounds`.
const BOUNDS_EPSILON: f32 = 1e-4;

/// Whether a voxel's occupied box lies entirely within the workspace.
pub fn voxel_within_workspace(workspace_size: Vec3, p: Increment, r: Resolution) -> bool {
	let b = voxel_bounds(p, r);
	let ws = workspace_bounds(workspace_size);
	b.min.x >= ws.min.x - BOUNDS_EPSILON
		&& b.max.x <= ws.max.x + BOUNDS_EPSILON
		&& b.min.y >= ws.min.y - BOUNDS_EPSILON
		&& b.max.y <= ws.max.y + BOUNDS_EPSILON
		&& b.min.z >= ws.min.z - BOUNDS_EPSILON
		&& b.max.z <= ws.max.z + BOUNDS_EPSILON
}

/// A voxel's occupied box expressed in half-centimeter integer units, used
/// for exact (float-free) overlap arithmetic. Never leaks outside the
/// store/history internals.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct IBox {
	pub min: IVec3,
	pub max: IVec3,
}

/// Edge length in half-centimeters is `2 * edge_cm`, always an even, exact
/// integer, which keeps this arithmetic free of the float rounding that
/// `Size1cm`'s 0.5cm half-extent would otherwise require.
pub(crate) fn voxel_ibox(p: Increment, r: Resolution) -> IBox {
	let e = r.edge_cm();
	let half = p.0 * 2;
	IBox {
		min: IVec3::new(half.x - e, half.y, half.z - e),
		max: IVec3::new(half.x + e, half.y + 2 * e, half.z + e),
	}
}

/// Positive-volume intersection test: touching faces (zero-volume overlap)
/// are not considered overlapping.
pub(crate) fn iboxes_overlap(a: IBox, b: IBox) -> bool {
	a.min.x < b.max.x
		&& a.max.x > b.min.x
		&& a.min.y < b.max.y
		&& a.max.y > b.min.y
		&& a.min.z < b.max.z
		&& a.max.z > b.min.z
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn increment_round_trips_through_world() {
		for p in [
			Increment::new(0, 0, 0),
			Increment::new(13, 24, 36),
			Increment::new(-250, 0, 250),
		] {
			assert_eq!(world_to_increment(increment_to_world(p)), p);
		}
	}

	#[test]
	fn world_to_increment_rounds_half_away_from_zero() {
		assert_eq!(world_to_increment(World(Vec3::new(0.125, 0.0, 0.0))).0.x, 13);
		assert_eq!(world_to_increment(World(Vec3::new(-0.125, 0.0, 0.0))).0.x, -13);
	}

	#[test]
	fn touching_boxes_do_not_overlap() {
		// Two 32cm voxels sharing a face at x=16/-16.
		let a = voxel_ibox(Increment::new(0, 0, 0), Resolution::Size32cm);
		let b = voxel_ibox(Increment::new(32, 0, 0), Resolution::Size32cm);
		assert!(!iboxes_overlap(a, b));
	}

	#[test]
	fn offset_boxes_overlap() {
		let a = voxel_ibox(Increment::new(0, 0, 0), Resolution::Size32cm);
		let b = voxel_ibox(Increment::new(31, 0, 0), Resolution::Size32cm);
		assert!(iboxes_overlap(a, b));
	}

	#[test]
	fn voxel_touching_workspace_wall_is_in_bounds() {
		// 5m workspace, 32cm voxel whose +X face sits exactly at x=2.5m.
		let size = Vec3::splat(5.0);
		let p = world_to_increment(World(Vec3::new(2.5 - 0.16, 0.0, 0.0)));
		assert!(voxel_within_workspace(size, p, Resolution::Size32cm));
	}
}

#[cfg(test)]
mod proptests {
	use super::*;
	use proptest::prelude::*;

	proptest! {
		#[test]
		fn increment_round_trips_through_world_for_any_increment(x in -5000i32..5000, y in 0i32..2000, z in -5000i32..5000) {
			let p = Increment::new(x, y, z);
			prop_assert_eq!(world_to_increment(increment_to_world(p)), p);
		}

		#[test]
		fn increment_to_world_round_trip_is_within_half_a_centimeter(x in -50.0f32..50.0, y in 0.0f32..20.0, z in -50.0f32..50.0) {
			let w = World(Vec3::new(x, y, z));
			let World(back) = increment_to_world(world_to_increment(w));
			prop_assert!((back.x - w.0.x).abs() <= 0.005 + f32::EPSILON);
			prop_assert!((back.y - w.0.y).abs() <= 0.005 + f32::EPSILON);
			prop_assert!((back.z - w.0.z).abs() <= 0.005 + f32::EPSILON);
		}
	}
}

//! Snap & Preview (S): turns a raw world hit into a valid increment
//! position, with or without a picked surface face.

use glam::Vec3;

use crate::coords::{voxel_bounds, world_to_increment, Increment, World};
use crate::resolution::Resolution;
use crate::store::VoxelStore;
use crate::validator::{validate, Outcome, ValidationMode};

/// Outward direction of a picked voxel face.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FaceDirection {
	PosX,
	NegX,
	PosY,
	NegY,
	PosZ,
	NegZ,
}

/// A ray hit against an existing voxel's face, as delivered by an external
/// picker. The core only consumes this value; it never computes rays.
#[derive(Debug, Clone, Copy)]
pub struct SurfaceFaceContext {
	pub reference: Increment,
	pub reference_resolution: Resolution,
	pub face: FaceDirection,
	pub hit_point: Vec3,
}

/// Clamps a centered-axis coordinate so the new voxel's footprint (edge
/// `new_edge`) stays within `[lo, hi]` on that axis.
fn clamp_centered(value: f32, lo: f32, hi: f32, new_edge: f32) -> f32 {
	let half = new_edge / 2.0;
	let min = lo + half;
	let max = hi - half;
	if min > max {
		(lo + hi) / 2.0
	} else {
		value.clamp(min, max)
	}
}

/// Clamps a bottom-anchored axis coordinate (already the bottom of the new
/// box, per the bottom-center convention) into `[lo, hi - new_edge]`.
fn clamp_bottom(value: f32, lo: f32, hi: f32, new_edge: f32) -> f32 {
	let max = hi - new_edge;
	if lo > max {
		lo
	} else {
		value.clamp(lo, max)
	}
}

/// Projects `hit_point` onto face `ctx`'s plane and clamps it so the new
/// voxel's footprint lies entirely inside or flush with the face rectangle.
fn snap_to_face(hit_point: Vec3, resolution: Resolution, ctx: &SurfaceFaceContext) -> Vec3 {
	let ref_bounds = voxel_bounds(ctx.reference, ctx.reference_resolution);
	let new_edge = resolution.edge_m();

	match ctx.face {
		FaceDirection::PosY | FaceDirection::NegY => {
			let y = if ctx.face == FaceDirection::PosY { ref_bounds.max.y } else { ref_bounds.min.y };
			let x = clamp_centered(hit_point.x, ref_bounds.min.x, ref_bounds.max.x, new_edge);
			let z = clamp_centered(hit_point.z, ref_bounds.min.z, ref_bounds.max.z, new_edge);
			Vec3::new(x, y, z)
		}
		FaceDirection::PosX | FaceDirection::NegX => {
			let x = if ctx.face == FaceDirection::PosX { ref_bounds.max.x } else { ref_bounds.min.x };
			let z = clamp_centered(hit_point.z, ref_bounds.min.z, ref_bounds.max.z, new_edge);
			let y = clamp_bottom(hit_point.y, ref_bounds.min.y, ref_bounds.max.y, new_edge);
			Vec3::new(x, y, z)
		}
		FaceDirection::PosZ | FaceDirection::NegZ => {
			let z = if ctx.face == FaceDirection::PosZ { ref_bounds.max.z } else { ref_bounds.min.z };
			let x = clamp_centered(hit_point.x, ref_bounds.min.x, ref_bounds.max.x, new_edge);
			let y = clamp_bottom(hit_point.y, ref_bounds.min.y, ref_bounds.max.y, new_edge);
			Vec3::new(x, y, z)
		}
	}
}

/// `snap(world_hit, resolution, shift_override, surface_face_ctx) -> (p, outcome)`.
///
/// Without a face context, `world_hit` snaps to the nearest 1cm increment
/// on every axis regardless of `resolution` — placement resolution never
/// coarsens where the preview lands. `shift_override` is accepted for API
/// symmetry only; it does not change the result.
pub fn snap(
	store: &VoxelStore,
	world_hit: Vec3,
	resolution: Resolution,
	_shift_override: bool,
	surface_face_ctx: Option<SurfaceFaceContext>,
	mode: ValidationMode,
) -> (Increment, Outcome) {
	let p = match surface_face_ctx {
		None => world_to_increment(World(world_hit)),
		Some(ctx) => {
			let projected = snap_to_face(world_hit, resolution, &ctx);
			world_to_increment(World(projected))
		}
	};
	let outcome = validate(store, p, resolution, mode);
	(p, outcome)
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn no_face_context_snaps_to_nearest_centimeter() {
		let store = VoxelStore::new(Vec3::splat(5.0));
		let (p, _) = snap(&store, Vec3::new(0.126, 0.0, 0.0), Resolution::Size32cm, false, None, ValidationMode::Free1Cm);
		assert_eq!(p.0.x, 13);
	}

	#[test]
	fn top_face_snap_clamps_footprint_inside_face() {
		let mut store = VoxelStore::new(Vec3::splat(5.0));
		let reference = Increment::new(0, 0, 0);
		store.set_occupied(reference, Resolution::Size32cm, true);
		let ctx = SurfaceFaceContext {
			reference,
			reference_resolution: Resolution::Size32cm,
			face: FaceDirection::PosY,
			hit_point: Vec3::new(10.0, 0.32, 10.0),
		};
		let (p, outcome) = snap(&store, Vec3::new(10.0, 0.32, 10.0), Resolution::Size64cm, false, Some(ctx), ValidationMode::Free1Cm);
		// a 64cm voxel cannot fit centered on a 32cm face; it clamps to the
		// face's own center instead of running off the edge.
		assert_eq!(p.0.x, 0);
		assert_eq!(p.0.z, 0);
		assert_eq!(p.0.y, 32);
		let _ = outcome;
	}

	#[test]
	fn side_face_snap_is_bottom_anchored_not_centered() {
		let mut store = VoxelStore::new(Vec3::splat(5.0));
		let reference = Increment::new(0, 0, 0);
		store.set_occupied(reference, Resolution::Size32cm, true);
		let ctx = SurfaceFaceContext {
			reference,
			reference_resolution: Resolution::Size32cm,
			face: FaceDirection::PosX,
			hit_point: Vec3::new(0.16, 0.05, 0.0),
		};
		let (p, _) = snap(&store, Vec3::new(0.16, 0.05, 0.0), Resolution::Size16cm, false, Some(ctx), ValidationMode::Free1Cm);
		assert_eq!(p.0.x, 16);
		assert_eq!(p.0.y, 5);
	}
}

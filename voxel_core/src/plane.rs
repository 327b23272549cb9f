//! Plane Detector (D): tracks the single height a placement preview rests
//! on, plus the persistence timer that lets a preview drift off it briefly
//! without snapping back to ground.

use glam::Vec3;
use tracing::debug;

use crate::coords::{voxel_ibox, voxel_within_workspace, Increment};
use crate::resolution::Resolution;
use crate::store::VoxelStore;

const PERSISTENCE_THRESHOLD_SECS: f32 = 0.5;

/// Where a column search bottoms out when nothing is found.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlacementPlane {
	pub height: f32,
	pub reference: Option<(Increment, Resolution)>,
	pub is_ground: bool,
}

impl PlacementPlane {
	pub fn ground() -> Self {
		PlacementPlane { height: 0.0, reference: None, is_ground: true }
	}
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlaneResult {
	pub found: bool,
	pub plane: PlacementPlane,
}

/// Finds, for one resolution's column under `xz`, the highest occupied
/// cell whose footprint covers that point and its top-face height (in
/// centimeters). Stored positions are not assumed to sit on `r`'s own
/// grid — under `ValidationMode::Free1Cm` they usually don't — so this
/// walks the resolution's actual occupancy and tests each footprint
/// against `xz`, rather than rounding `xz` down to a grid-aligned probe
/// that could miss the voxel actually under the cursor.
fn highest_in_column(store: &VoxelStore, xz: (i32, i32), r: Resolution) -> Option<(Increment, i32)> {
	let (x, z) = xz;
	// voxel_ibox works in half-centimeter units; double the query point to
	// match before testing it against a stored voxel's footprint bounds.
	let x2 = x * 2;
	let z2 = z * 2;
	let mut best: Option<(Increment, i32)> = None;
	for p in store.iter_at(r) {
		let b = voxel_ibox(p, r);
		if x2 < b.min.x || x2 > b.max.x || z2 < b.min.z || z2 > b.max.z {
			continue;
		}
		let top_cm = p.0.y + r.edge_cm();
		let better = match best {
			None => true,
			Some((_, best_top)) => top_cm > best_top,
		};
		if better {
			best = Some((p, top_cm));
		}
	}
	best
}

/// `detect(world_pos, active_resolution) -> PlaneResult`. `active_resolution`
/// is accepted for API symmetry with the original column-search call but
/// every resolution is searched: the highest top face wins regardless of
/// which resolution is currently active for new placements.
pub fn detect(store: &VoxelStore, world_pos: Vec3, _active_resolution: Resolution) -> PlaneResult {
	let xz_cm = ((world_pos.x * 100.0).round() as i32, (world_pos.z * 100.0).round() as i32);

	let mut winner: Option<(Increment, Resolution, i32)> = None;
	for r in Resolution::ALL {
		if let Some((p, top_cm)) = highest_in_column(store, xz_cm, r) {
			let better = match winner {
				None => true,
				Some((_, best_r, best_top)) => {
					top_cm > best_top
						|| (top_cm == best_top && r.edge_cm() > best_r.edge_cm())
						|| (top_cm == best_top && r.edge_cm() == best_r.edge_cm() && r.index() < best_r.index())
				}
			};
			if better {
				winner = Some((p, r, top_cm));
			}
		}
	}

	match winner {
		Some((p, r, top_cm)) => PlaneResult {
			found: true,
			plane: PlacementPlane { height: top_cm as f32 / 100.0, reference: Some((p, r)), is_ground: false },
		},
		None => PlaneResult { found: true, plane: PlacementPlane::ground() },
	}
}

/// `should_transition(current, new_result) -> bool`: true iff the new plane
/// sits strictly more than 1cm above the current one.
pub fn should_transition(current: PlacementPlane, new_result: PlaneResult) -> bool {
	new_result.plane.height > current.height + 0.01
}

/// Advances (or resets, or clears) the persistence timer in place.
///
/// `current` is `None` when no plane is active; the ground plane never
/// carries a timer since it can't be displaced by drift.
pub fn update_persistence(
	store: &VoxelStore,
	current: &mut Option<PlacementPlane>,
	timer: &mut f32,
	preview_pos: Increment,
	preview_res: Resolution,
	dt: f32,
) {
	let Some(plane) = current else { return };
	if plane.is_ground {
		return;
	}
	if preview_overlaps_plane_band(store, plane, preview_pos, preview_res) {
		*timer = 0.0;
		return;
	}
	*timer += dt;
	if *timer > PERSISTENCE_THRESHOLD_SECS {
		debug!(height = plane.height, "placement plane persistence expired, clearing");
		*current = None;
		*timer = 0.0;
	}
}

/// Whether the preview voxel's occupied box would intersect any existing
/// voxel at the plane's height band (used to decide whether drifting the
/// preview off the reference voxel should reset or advance the timer).
fn preview_overlaps_plane_band(store: &VoxelStore, plane: &PlacementPlane, preview_pos: Increment, preview_res: Resolution) -> bool {
	let Some((ref_p, ref_r)) = plane.reference else { return false };
	if !voxel_within_workspace(store.workspace_size(), preview_pos, preview_res) {
		return false;
	}
	let band_lo = ref_p.0.y;
	let band_hi = ref_p.0.y + ref_r.edge_cm();
	let preview_lo = preview_pos.0.y;
	let preview_hi = preview_pos.0.y + preview_res.edge_cm();
	preview_lo < band_hi && preview_hi > band_lo
}

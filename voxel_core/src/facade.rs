//! Edit Facade (E): the single mutating surface. Every write to the store
//! goes through one of these methods; nothing else is allowed to pair
//! validation with mutation.

use glam::Vec3;
use tracing::{info, warn};

use crate::coords::{voxel_within_workspace, Bounds, Increment};
use crate::error::EditError;
use crate::history::{Command, History};
use crate::plane::{self, PlacementPlane, PlaneResult};
use crate::resolution::Resolution;
use crate::snap::{snap, SurfaceFaceContext};
use crate::store::VoxelStore;
use crate::validator::{outcome_to_error, validate, Outcome, ValidationMode};

const MIN_WORKSPACE_AXIS: f32 = 2.0;
const MAX_WORKSPACE_AXIS: f32 = 8.0;
pub const DEFAULT_WORKSPACE_SIZE: f32 = 5.0;
pub const DEFAULT_ACTIVE_RESOLUTION: Resolution = Resolution::Size32cm;

/// Session-wide configuration, constructed once by the host (CLI or any
/// other front end) and handed to the facade at startup.
#[derive(Debug, Clone, Copy)]
pub struct SessionConfig {
	pub workspace_size: Vec3,
	pub active_resolution: Resolution,
	pub validation_mode: ValidationMode,
	pub history_capacity: Option<usize>,
}

impl Default for SessionConfig {
	fn default() -> Self {
		SessionConfig {
			workspace_size: Vec3::splat(DEFAULT_WORKSPACE_SIZE),
			active_resolution: DEFAULT_ACTIVE_RESOLUTION,
			validation_mode: ValidationMode::Free1Cm,
			history_capacity: None,
		}
	}
}

/// An editing session: the voxel store, its undo/redo history, and the
/// placement plane state, owned together behind the one mutating surface.
pub struct Editor {
	store: VoxelStore,
	history: History,
	mode: ValidationMode,
	current_plane: Option<PlacementPlane>,
	persistence_timer: f32,
}

impl Editor {
	pub fn new(config: SessionConfig) -> Self {
		let mut store = VoxelStore::new(config.workspace_size);
		store.set_active_resolution(config.active_resolution);
		Editor {
			store,
			history: History::new(config.history_capacity),
			mode: config.validation_mode,
			current_plane: None,
			persistence_timer: 0.0,
		}
	}

	pub fn store(&self) -> &VoxelStore {
		&self.store
	}

	pub fn current_plane(&self) -> Option<PlacementPlane> {
		self.current_plane
	}

	/// Snaps `world_hit` to a candidate increment and, if valid, commits it.
	/// Returns the resolved position alongside the candidate's validation
	/// outcome even on rejection, so a caller can still render feedback.
	pub fn place_at(
		&mut self,
		world_hit: Vec3,
		resolution: Option<Resolution>,
		surface_face_ctx: Option<SurfaceFaceContext>,
	) -> Result<Increment, EditError> {
		let r = resolution.unwrap_or_else(|| self.store.active_resolution());
		let (p, outcome) = snap(&self.store, world_hit, r, false, surface_face_ctx, self.mode);
		if outcome != Outcome::Valid {
			let err = outcome_to_error(outcome, r).unwrap_or(EditError::CommandFailed);
			warn!(?err, ?p, "rejected placement");
			return Err(err);
		}
		self.history.execute(&mut self.store, Command::place_one(p, r))?;
		Ok(p)
	}

	/// Removes the voxel at the exact increment position identified by the
	/// caller (from a raycast hit resolved outside the core, or a direct
	/// increment known to the caller).
	pub fn remove_at(&mut self, p: Increment, r: Resolution) -> Result<(), EditError> {
		self.history.execute(&mut self.store, Command::remove_one(p, r))?;
		Ok(())
	}

	/// Fills the AABB `region` (world space) at resolution `r`. Rejects the
	/// whole call up front if either endpoint dips below the ground plane;
	/// individual cells inside the region are otherwise skipped rather than
	/// failing the whole fill.
	pub fn fill(&mut self, region: Bounds, r: Resolution, value: bool) -> Result<usize, EditError> {
		if region.min.y < 0.0 || region.max.y < 0.0 {
			return Err(EditError::BelowGround);
		}
		self.history.execute(&mut self.store, Command::fill_region(region, r, value))
	}

	pub fn undo(&mut self) -> Result<(), EditError> {
		self.history.undo(&mut self.store)
	}

	pub fn redo(&mut self) -> Result<(), EditError> {
		self.history.redo(&mut self.store)
	}

	pub fn can_undo(&self) -> bool {
		self.history.can_undo()
	}

	pub fn can_redo(&self) -> bool {
		self.history.can_redo()
	}

	pub fn begin_group(&mut self) {
		self.history.begin_group();
	}

	pub fn end_group(&mut self) {
		self.history.end_group();
	}

	pub fn set_active_resolution(&mut self, r: Resolution) {
		self.store.set_active_resolution(r);
	}

	/// Resizes the workspace, rejecting sizes outside `[2.0, 8.0]` per axis
	/// or sizes that would leave an existing voxel outside the new bounds.
	/// On rejection, the store is left unchanged.
	pub fn resize_workspace(&mut self, size: Vec3) -> Result<(), EditError> {
		if [size.x, size.y, size.z].iter().any(|v| !(MIN_WORKSPACE_AXIS..=MAX_WORKSPACE_AXIS).contains(v)) {
			return Err(EditError::WorkspaceRejected(format!(
				"workspace size {size:?} outside [{MIN_WORKSPACE_AXIS}, {MAX_WORKSPACE_AXIS}] meters per axis"
			)));
		}
		for r in Resolution::ALL {
			for p in self.store.iter_at(r) {
				if !voxel_within_workspace(size, p, r) {
					return Err(EditError::WorkspaceRejected(
						"resize would leave an existing voxel outside the workspace".to_string(),
					));
				}
			}
		}
		info!(?size, "resizing workspace");
		self.store.resize_workspace(size);
		Ok(())
	}

	/// Advances the plane-persistence timer; see [`plane::update_persistence`].
	pub fn update_persistence(&mut self, preview_pos: Increment, preview_res: Resolution, dt: f32) {
		plane::update_persistence(&self.store, &mut self.current_plane, &mut self.persistence_timer, preview_pos, preview_res, dt);
	}

	/// Re-runs plane detection under `world_pos` and adopts the result if it
	/// transitions the current plane per [`plane::should_transition`].
	pub fn detect_plane(&mut self, world_pos: Vec3) -> PlaneResult {
		let result = plane::detect(&self.store, world_pos, self.store.active_resolution());
		if plane::should_transition(self.current_plane.unwrap_or(PlacementPlane::ground()), result) {
			self.current_plane = Some(result.plane);
			self.persistence_timer = 0.0;
		}
		result
	}

	pub fn validate(&self, p: Increment, r: Resolution) -> Outcome {
		validate(&self.store, p, r, self.mode)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn place_undo_redo_round_trip() {
		let mut editor = Editor::new(SessionConfig::default());
		let p = editor.place_at(Vec3::new(0.0, 0.0, 0.0), Some(Resolution::Size32cm), None).unwrap();
		assert!(editor.store().get(p, Resolution::Size32cm));
		editor.undo().unwrap();
		assert_eq!(editor.store().count(), 0);
		editor.redo().unwrap();
		assert_eq!(editor.store().count(), 1);
	}

	#[test]
	fn overlap_rejection_across_resolutions() {
		let mut editor = Editor::new(SessionConfig::default());
		editor.place_at(Vec3::new(0.0, 0.0, 0.0), Some(Resolution::Size32cm), None).unwrap();
		let err = editor.place_at(Vec3::new(0.08, 0.08, 0.08), Some(Resolution::Size16cm), None).unwrap_err();
		assert_eq!(err, EditError::Overlap);
	}

	#[test]
	fn fill_below_ground_endpoint_rejected_up_front() {
		let mut editor = Editor::new(SessionConfig::default());
		let region = Bounds { min: Vec3::new(-0.5, -0.2, -0.5), max: Vec3::new(0.5, 0.2, 0.5) };
		let err = editor.fill(region, Resolution::Size16cm, true).unwrap_err();
		assert_eq!(err, EditError::BelowGround);
	}

	#[test]
	fn resize_rejects_when_voxel_would_be_evicted() {
		let mut editor = Editor::new(SessionConfig::default());
		editor.place_at(Vec3::new(2.0, 0.0, 0.0), Some(Resolution::Size32cm), None).unwrap();
		let err = editor.resize_workspace(Vec3::splat(2.0)).unwrap_err();
		assert!(matches!(err, EditError::WorkspaceRejected(_)));
	}

	#[test]
	fn resize_rejects_out_of_range_size() {
		let mut editor = Editor::new(SessionConfig::default());
		let err = editor.resize_workspace(Vec3::splat(1.0)).unwrap_err();
		assert!(matches!(err, EditError::WorkspaceRejected(_)));
	}
}

//! Placement Validator (P): decides whether a candidate voxel may be
//! placed. Pure with respect to its inputs — the store is only queried,
//! never mutated.

use crate::coords::{voxel_within_workspace, Increment};
use crate::error::EditError;
use crate::resolution::Resolution;
use crate::store::VoxelStore;

/// Free-1cm (default): any increment triple is aligned. Strict-grid: the
/// position must sit on the active resolution's own grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationMode {
	Free1Cm,
	StrictGrid,
}

/// Result of validating a candidate placement. The first failing check in
/// alignment -> ground -> bounds -> overlap order determines the outcome;
/// later checks are not performed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
	Valid,
	BelowGround,
	OutOfBounds,
	Overlap,
	MisalignedResolution,
}

impl Outcome {
	pub fn is_valid(self) -> bool {
		matches!(self, Outcome::Valid)
	}
}

/// Turn a validation `Outcome` into the `EditError` a facade caller sees.
/// `r` supplies the resolution name for `MisalignedResolution`'s message.
pub fn outcome_to_error(outcome: Outcome, r: Resolution) -> Option<EditError> {
	match outcome {
		Outcome::Valid => None,
		Outcome::BelowGround => Some(EditError::BelowGround),
		Outcome::OutOfBounds => Some(EditError::OutOfBounds),
		Outcome::Overlap => Some(EditError::Overlap),
		Outcome::MisalignedResolution => Some(EditError::MisalignedResolution(r.name())),
	}
}

/// `p` is aligned in strict-grid mode when X/Z are multiples of the
/// resolution's edge length, and Y is either exactly 0 (resting on the
/// ground) or itself a multiple of the edge length (stacked in air).
fn is_aligned(p: Increment, r: Resolution) -> bool {
	let e = r.edge_cm();
	let aligned_xz = p.0.x.rem_euclid(e) == 0 && p.0.z.rem_euclid(e) == 0;
	let aligned_y = p.0.y == 0 || p.0.y.rem_euclid(e) == 0;
	aligned_xz && aligned_y
}

/// `validate(p, r, workspace) -> Outcome`. The store stands in for "the
/// workspace" here: it carries both the configured size (for the bounds
/// check) and the occupancy needed for the overlap check.
pub fn validate(store: &VoxelStore, p: Increment, r: Resolution, mode: ValidationMode) -> Outcome {
	if mode == ValidationMode::StrictGrid && !is_aligned(p, r) {
		return Outcome::MisalignedResolution;
	}
	if p.0.y < 0 {
		return Outcome::BelowGround;
	}
	if !voxel_within_workspace(store.workspace_size(), p, r) {
		return Outcome::OutOfBounds;
	}
	if store.would_overlap(p, r) {
		return Outcome::Overlap;
	}
	Outcome::Valid
}

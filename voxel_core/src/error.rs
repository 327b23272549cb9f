//! Error taxonomy propagated at every fallible boundary.

use thiserror::Error;

/// Everything that can go wrong at the Edit Facade boundary. Validation
/// errors never mutate state; `CommandFailed` is the one variant reached
/// only after an already-applied batch sub-command was rolled back.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EditError {
	#[error("invalid input: {0}")]
	InvalidInput(String),

	#[error("position is below the ground plane")]
	BelowGround,

	#[error("voxel would extend outside the workspace")]
	OutOfBounds,

	#[error("voxel overlaps an existing voxel")]
	Overlap,

	#[error("position is not aligned to the {0} grid")]
	MisalignedResolution(&'static str),

	#[error("no voxel at the given position")]
	NotFound,

	#[error("nothing to undo")]
	NothingToUndo,

	#[error("nothing to redo")]
	NothingToRedo,

	#[error("workspace size rejected: {0}")]
	WorkspaceRejected(String),

	#[error("command failed and was rolled back")]
	CommandFailed,
}

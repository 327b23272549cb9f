//! History (H): the undo/redo stack. Every mutation to the store passes
//! through a `Command`, which knows how to both apply and reverse itself.

use glam::IVec3;
use tracing::debug;

use crate::coords::{world_to_increment, Bounds, Increment, World};
use crate::error::EditError;
use crate::resolution::Resolution;
use crate::store::VoxelStore;
use crate::validator::{validate, Outcome, ValidationMode};

/// A reversible edit. Constructed only by the facade, after validation has
/// already confirmed the edit is legal; `do_apply` still reports failure
/// for the cases that depend on store state at apply time (redo after an
/// intervening edit, or a `FillRegion` where every candidate cell is
/// rejected).
#[derive(Debug, Clone)]
pub enum Command {
	PlaceOne { p: Increment, r: Resolution, prior: Option<bool> },
	RemoveOne { p: Increment, r: Resolution, prior: Option<bool> },
	FillRegion { region: Bounds, r: Resolution, value: bool, changes: Vec<(Increment, bool)> },
	Batch(Vec<Command>),
}

impl Command {
	pub fn place_one(p: Increment, r: Resolution) -> Self {
		Command::PlaceOne { p, r, prior: None }
	}

	pub fn remove_one(p: Increment, r: Resolution) -> Self {
		Command::RemoveOne { p, r, prior: None }
	}

	pub fn fill_region(region: Bounds, r: Resolution, value: bool) -> Self {
		Command::FillRegion { region, r, value, changes: Vec::new() }
	}

	/// Number of cells this command actually changed, the last time it was
	/// applied. Used by `FillRegion`'s succeed-if-any-changed rule.
	fn changed_count(&self) -> usize {
		match self {
			Command::PlaceOne { prior: Some(false), .. } | Command::RemoveOne { prior: Some(true), .. } => 1,
			Command::PlaceOne { .. } | Command::RemoveOne { .. } => 0,
			Command::FillRegion { changes, .. } => changes.len(),
			Command::Batch(cmds) => cmds.iter().map(Command::changed_count).sum(),
		}
	}

	fn do_apply(&mut self, store: &mut VoxelStore) -> Result<(), EditError> {
		match self {
			Command::PlaceOne { p, r, prior } => {
				let was = store.get(*p, *r);
				store.set_occupied(*p, *r, true);
				*prior = Some(was);
				Ok(())
			}
			Command::RemoveOne { p, r, prior } => {
				let was = store.get(*p, *r);
				if !was {
					return Err(EditError::NotFound);
				}
				store.set_occupied(*p, *r, false);
				*prior = Some(was);
				Ok(())
			}
			Command::FillRegion { region, r, value, changes } => {
				changes.clear();
				for p in lattice_positions_in_region(*region, *r) {
					if *value {
						if validate(store, p, *r, ValidationMode::Free1Cm) != Outcome::Valid {
							continue;
						}
					}
					let prior = store.get(p, *r);
					if prior == *value {
						continue;
					}
					store.set_occupied(p, *r, *value);
					changes.push((p, prior));
				}
				if changes.is_empty() {
					Err(EditError::CommandFailed)
				} else {
					Ok(())
				}
			}
			Command::Batch(cmds) => {
				let mut applied = 0;
				for i in 0..cmds.len() {
					match cmds[i].do_apply(store) {
						Ok(()) => applied += 1,
						Err(err) => {
							for cmd in cmds[..applied].iter_mut().rev() {
								cmd.undo_apply(store).expect("rollback of an already-applied sub-command must succeed");
							}
							return Err(err);
						}
					}
				}
				Ok(())
			}
		}
	}

	fn undo_apply(&mut self, store: &mut VoxelStore) -> Result<(), EditError> {
		match self {
			Command::PlaceOne { p, r, prior } => {
				let prior = prior.take().expect("undo of a command that was never applied");
				store.set_occupied(*p, *r, prior);
				Ok(())
			}
			Command::RemoveOne { p, r, prior } => {
				let prior = prior.take().expect("undo of a command that was never applied");
				store.set_occupied(*p, *r, prior);
				Ok(())
			}
			Command::FillRegion { r, changes, .. } => {
				for (p, prior) in changes.drain(..) {
					store.set_occupied(p, *r, prior);
				}
				Ok(())
			}
			Command::Batch(cmds) => {
				for cmd in cmds.iter_mut().rev() {
					cmd.undo_apply(store)?;
				}
				Ok(())
			}
		}
	}
}

/// Every lattice position aligned to `r`'s grid whose voxel box overlaps
/// `region`. The region is widened outward to the next grid line on each
/// side so partially-overlapping boundary cells are included.
pub(crate) fn lattice_positions_in_region(region: Bounds, r: Resolution) -> Vec<Increment> {
	let step = r.edge_cm();
	let lo = world_to_increment(World(region.min)).0;
	let hi = world_to_increment(World(region.max)).0;

	let align_down = |v: i32| v - v.rem_euclid(step);
	let align_up = |v: i32| { let a = align_down(v); if a == v { a } else { a + step } };

	let x0 = align_down(lo.x);
	let x1 = align_up(hi.x);
	let y0 = align_down(lo.y.max(0));
	let y1 = align_up(hi.y);
	let z0 = align_down(lo.z);
	let z1 = align_up(hi.z);

	let mut positions = Vec::new();
	let mut x = x0;
	while x <= x1 {
		let mut y = y0;
		while y <= y1 {
			let mut z = z0;
			while z <= z1 {
				positions.push(Increment(IVec3::new(x, y, z)));
				z += step;
			}
			y += step;
		}
		x += step;
	}
	positions
}

/// The undo/redo stack. Owns no reference to the store; every call takes
/// it explicitly, matching the single-owner, externally-serialized
/// concurrency model the rest of this crate follows.
pub struct History {
	undo_stack: Vec<Command>,
	redo_stack: Vec<Command>,
	capacity: Option<usize>,
	group: Option<(Vec<Command>, u32)>,
}

impl History {
	pub fn new(capacity: Option<usize>) -> Self {
		History { undo_stack: Vec::new(), redo_stack: Vec::new(), capacity, group: None }
	}

	/// Applies `cmd`, pushes it onto the undo stack (or the open group, if
	/// one is active) and clears the redo stack. A failed apply is not
	/// recorded anywhere.
	pub fn execute(&mut self, store: &mut VoxelStore, mut cmd: Command) -> Result<usize, EditError> {
		cmd.do_apply(store)?;
		let changed = cmd.changed_count();
		match &mut self.group {
			Some((buffer, _)) => buffer.push(cmd),
			None => {
				self.redo_stack.clear();
				self.push_undo(cmd);
			}
		}
		Ok(changed)
	}

	fn push_undo(&mut self, cmd: Command) {
		self.undo_stack.push(cmd);
		if let Some(capacity) = self.capacity {
			while self.undo_stack.len() > capacity {
				self.undo_stack.remove(0);
			}
		}
	}

	pub fn undo(&mut self, store: &mut VoxelStore) -> Result<(), EditError> {
		let mut cmd = self.undo_stack.pop().ok_or(EditError::NothingToUndo)?;
		cmd.undo_apply(store).expect("undo of a recorded command must succeed");
		self.redo_stack.push(cmd);
		Ok(())
	}

	pub fn redo(&mut self, store: &mut VoxelStore) -> Result<(), EditError> {
		let mut cmd = self.redo_stack.pop().ok_or(EditError::NothingToRedo)?;
		cmd.do_apply(store).expect("redo of a recorded command must succeed");
		self.undo_stack.push(cmd);
		Ok(())
	}

	pub fn can_undo(&self) -> bool {
		!self.undo_stack.is_empty()
	}

	pub fn can_redo(&self) -> bool {
		!self.redo_stack.is_empty()
	}

	/// Opens a group; nested calls coalesce into the outermost group rather
	/// than creating independent Batches.
	pub fn begin_group(&mut self) {
		match &mut self.group {
			Some((_, depth)) => *depth += 1,
			None => self.group = Some((Vec::new(), 1)),
		}
	}

	/// Closes a group. At depth 1 the buffered commands are pushed as a
	/// single `Batch`; nested `end_group` calls just decrement the depth.
	pub fn end_group(&mut self) {
		let Some((_, depth)) = &mut self.group else { return };
		*depth -= 1;
		if *depth == 0 {
			let (buffer, _) = self.group.take().unwrap();
			if !buffer.is_empty() {
				debug!(count = buffer.len(), "closing command group");
				self.redo_stack.clear();
				self.push_undo(Command::Batch(buffer));
			}
		}
	}

	pub fn clear(&mut self) {
		self.undo_stack.clear();
		self.redo_stack.clear();
		self.group = None;
	}
}

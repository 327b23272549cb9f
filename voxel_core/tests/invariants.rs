//! Invariant-preservation properties driven entirely through the facade:
//! arbitrary sequences of placements, removals, and undo/redo must never
//! leave a voxel below ground, out of bounds, or overlapping another.

use glam::Vec3;
use proptest::prelude::*;

use voxel_core::coords::{voxel_bounds, voxel_within_workspace};
use voxel_core::{Editor, Increment, Resolution, SessionConfig};

/// I2 (ground) and I3 (bounds) must hold for every stored voxel regardless
/// of how it got there.
fn ground_and_bounds_hold(editor: &Editor) -> bool {
	for r in Resolution::ALL {
		for p in editor.store().iter_at(r) {
			if p.0.y < 0 {
				return false;
			}
			if !voxel_within_workspace(editor.store().workspace_size(), p, r) {
				return false;
			}
		}
	}
	true
}

/// Matches `iboxes_overlap`'s touching-faces-are-not-overlap semantics, but
/// is a brute-force check over the public `voxel_bounds` API rather than
/// the store's internal overlap test, so it cannot hide a bug in the code
/// it is meant to be checking. A small epsilon keeps float rounding at
/// these coordinate magnitudes from turning a merely touching face into a
/// false positive.
const TOUCH_EPSILON: f32 = 1e-4;

/// I4 (no overlap): no two distinct stored voxels, at any resolution, may
/// occupy overlapping volume.
fn no_overlaps_hold(editor: &Editor) -> bool {
	let mut all: Vec<(Increment, Resolution)> = Vec::new();
	for r in Resolution::ALL {
		all.extend(editor.store().iter_at(r).map(|p| (p, r)));
	}
	for i in 0..all.len() {
		for j in (i + 1)..all.len() {
			let (p1, r1) = all[i];
			let (p2, r2) = all[j];
			let b1 = voxel_bounds(p1, r1);
			let b2 = voxel_bounds(p2, r2);
			let overlaps = b1.min.x < b2.max.x - TOUCH_EPSILON
				&& b1.max.x > b2.min.x + TOUCH_EPSILON
				&& b1.min.y < b2.max.y - TOUCH_EPSILON
				&& b1.max.y > b2.min.y + TOUCH_EPSILON
				&& b1.min.z < b2.max.z - TOUCH_EPSILON
				&& b1.max.z > b2.min.z + TOUCH_EPSILON;
			if overlaps {
				return false;
			}
		}
	}
	true
}

#[derive(Debug, Clone, Copy)]
enum Op {
	Place { x: i32, y: i32, z: i32, r: u8 },
	Undo,
	Redo,
}

fn op_strategy() -> impl Strategy<Value = Op> {
	prop_oneof![
		(-200i32..200, 0i32..200, -200i32..200, 0u8..10).prop_map(|(x, y, z, r)| Op::Place { x, y, z, r }),
		Just(Op::Undo),
		Just(Op::Redo),
	]
}

proptest! {
	#[test]
	fn invariants_survive_arbitrary_facade_call_sequences(ops in prop::collection::vec(op_strategy(), 0..40)) {
		let mut editor = Editor::new(SessionConfig::default());
		for op in ops {
			match op {
				Op::Place { x, y, z, r } => {
					let resolution = Resolution::from_index(r).unwrap();
					let world = Vec3::new(x as f32 / 100.0, y as f32 / 100.0, z as f32 / 100.0);
					let _ = editor.place_at(world, Some(resolution), None);
				}
				Op::Undo => {
					let _ = editor.undo();
				}
				Op::Redo => {
					let _ = editor.redo();
				}
			}
			prop_assert!(ground_and_bounds_hold(&editor));
			prop_assert!(no_overlaps_hold(&editor));
		}
	}

	#[test]
	fn full_undo_then_redo_restores_state(xs in prop::collection::vec(-100i32..100, 1..12)) {
		let mut editor = Editor::new(SessionConfig::default());
		for x in xs {
			let _ = editor.place_at(Vec3::new(x as f32 / 100.0, 0.0, 0.0), Some(Resolution::Size32cm), None);
		}
		let after_sequence: Vec<Increment> = {
			let mut v: Vec<Increment> = editor.store().iter_at(Resolution::Size32cm).collect();
			v.sort();
			v
		};

		while editor.can_undo() {
			editor.undo().unwrap();
		}
		prop_assert_eq!(editor.store().count(), 0);

		while editor.can_redo() {
			editor.redo().unwrap();
		}
		let restored: Vec<Increment> = {
			let mut v: Vec<Increment> = editor.store().iter_at(Resolution::Size32cm).collect();
			v.sort();
			v
		};
		prop_assert_eq!(after_sequence, restored);
	}
}

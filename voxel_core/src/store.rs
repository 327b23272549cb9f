//! Voxel Store (V): per-resolution occupancy, the one place positions are
//! actually kept. Everything else in this crate queries or mutates through
//! here; nobody else owns a `HashSet` of positions.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use glam::Vec3;
use tracing::{debug, trace};

use crate::coords::{iboxes_overlap, voxel_ibox, Increment};
use crate::observer::{ChangeEvent, Observer, ObserverToken, Registration};
use crate::resolution::Resolution;

/// Three signed 21-bit fields packed into one `u64`, used as the hash-set
/// key for a resolution's occupancy set. 21 bits signed covers +/-1,048,576
/// increments (+/-10.4km), far past any workspace this crate supports.
fn pack_increment(p: Increment) -> u64 {
	const MASK: u32 = 0x1f_ffff;
	let x = (p.0.x as u32) & MASK;
	let y = (p.0.y as u32) & MASK;
	let z = (p.0.z as u32) & MASK;
	(x as u64) | ((y as u64) << 21) | ((z as u64) << 42)
}

fn sign_extend_21(v: u32) -> i32 {
	let shifted = (v << 11) as i32;
	shifted >> 11
}

fn unpack_increment(key: u64) -> Increment {
	const MASK: u64 = 0x1f_ffff;
	let x = sign_extend_21((key & MASK) as u32);
	let y = sign_extend_21(((key >> 21) & MASK) as u32);
	let z = sign_extend_21(((key >> 42) & MASK) as u32);
	Increment::new(x, y, z)
}

/// Occupancy for every resolution, plus the configured workspace size that
/// the bounds checks are measured against.
pub struct VoxelStore {
	workspace_size: Vec3,
	active_resolution: Resolution,
	occupied: HashMap<Resolution, std::collections::HashSet<u64>>,
	observers: Vec<Registration>,
}

impl VoxelStore {
	pub fn new(workspace_size: Vec3) -> Self {
		VoxelStore {
			workspace_size,
			active_resolution: Resolution::Size32cm,
			occupied: HashMap::new(),
			observers: Vec::new(),
		}
	}

	pub fn workspace_size(&self) -> Vec3 {
		self.workspace_size
	}

	pub fn active_resolution(&self) -> Resolution {
		self.active_resolution
	}

	pub fn set_active_resolution(&mut self, r: Resolution) {
		self.active_resolution = r;
	}

	/// Whether `p` is occupied at resolution `r`.
	pub fn get(&self, p: Increment, r: Resolution) -> bool {
		self.occupied.get(&r).is_some_and(|set| set.contains(&pack_increment(p)))
	}

	/// Whether placing a voxel at `(p, r)` would overlap any existing voxel,
	/// at any resolution. Only resolutions with non-empty occupancy are
	/// scanned; within those, every stored position is unpacked and tested
	/// against the candidate with exact integer arithmetic, so the 1cm
	/// resolution's half-centimeter extents never round away a real
	/// overlap. Stored positions are not assumed to sit on `other_r`'s own
	/// grid — under `ValidationMode::Free1Cm` they usually don't — so this
	/// cannot shortcut to a handful of grid-aligned probe keys.
	pub fn would_overlap(&self, p: Increment, r: Resolution) -> bool {
		let candidate = voxel_ibox(p, r);
		for (&other_r, set) in &self.occupied {
			for &key in set {
				let other_box = voxel_ibox(unpack_increment(key), other_r);
				if iboxes_overlap(candidate, other_box) {
					trace!(?p, resolution = r.name(), "would_overlap: collision found");
					return true;
				}
			}
		}
		false
	}

	/// Sets (or clears) occupancy without running placement policy. Callers
	/// that need ground/bounds/overlap rejection go through the validator
	/// first; this is the raw mutation the facade and history replay on top
	/// of. Returns the previous occupancy state.
	pub fn set_occupied(&mut self, p: Increment, r: Resolution, occupied: bool) -> bool {
		let set = self.occupied.entry(r).or_default();
		let key = pack_increment(p);
		let was = if occupied { !set.insert(key) } else { set.remove(&key) };
		let now = occupied;
		if was != now {
			trace!(?p, resolution = r.name(), was, now, "voxel occupancy changed");
			self.emit(ChangeEvent { resolution: r, position: p, was, now });
		}
		was != now
	}

	pub fn count(&self) -> usize {
		self.occupied.values().map(|set| set.len()).sum()
	}

	pub fn count_at(&self, r: Resolution) -> usize {
		self.occupied.get(&r).map_or(0, |set| set.len())
	}

	pub fn iter_at(&self, r: Resolution) -> impl Iterator<Item = Increment> + '_ {
		self.occupied.get(&r).into_iter().flat_map(|set| set.iter().copied().map(unpack_increment))
	}

	/// Grows or shrinks the workspace. Existing voxels are left in place even
	/// if the new size would no longer contain them; the validator rejects
	/// any *new* placement outside the current bounds, but shrinking does
	/// not retroactively delete content.
	pub fn resize_workspace(&mut self, size: Vec3) {
		debug!(?size, "resizing workspace");
		self.workspace_size = size;
	}

	pub fn clear(&mut self) {
		for r in Resolution::ALL {
			self.clear_at(r);
		}
	}

	pub fn clear_at(&mut self, r: Resolution) {
		let positions: Vec<Increment> = self.iter_at(r).collect();
		for p in positions {
			self.set_occupied(p, r, false);
		}
	}

	/// Registers a weakly-held observer; dropping the returned token (or the
	/// observer itself) stops delivery.
	pub fn observe(&mut self, observer: &Rc<RefCell<dyn Observer>>) -> ObserverToken {
		let (registration, token) = Registration::new(observer);
		self.observers.push(registration);
		token
	}

	fn emit(&mut self, event: ChangeEvent) {
		self.observers.retain(|registration| registration.notify(event));
	}
}

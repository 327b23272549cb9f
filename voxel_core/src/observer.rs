//! Weakly-held change-event observers.
//!
//! The store never owns an observer. Registration returns a token whose
//! drop deregisters; if the observer itself is dropped first, the dead
//! weak reference is silently skipped (and pruned) on the next emission.
//! This avoids the ownership cycles a store <-> observer raw-pointer
//! relationship would otherwise create.

use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

use crate::coords::Increment;
use crate::resolution::Resolution;

/// `{resolution, p, was, now}`, emitted synchronously after the store's
/// invariants have been re-established.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChangeEvent {
	pub resolution: Resolution,
	pub position: Increment,
	pub was: bool,
	pub now: bool,
}

pub trait Observer {
	fn on_change(&mut self, event: ChangeEvent);
}

/// Handle returned by [`crate::store::VoxelStore::observe`]. Dropping it
/// deregisters the observer; it is otherwise inert.
#[must_use = "dropping this immediately deregisters the observer"]
pub struct ObserverToken {
	alive: Rc<Cell<bool>>,
}

impl Drop for ObserverToken {
	fn drop(&mut self) {
		self.alive.set(false);
	}
}

pub(crate) struct Registration {
	alive: Rc<Cell<bool>>,
	observer: Weak<RefCell<dyn Observer>>,
}

impl Registration {
	pub(crate) fn new(observer: &Rc<RefCell<dyn Observer>>) -> (Self, ObserverToken) {
		let alive = Rc::new(Cell::new(true));
		let registration = Registration {
			alive: alive.clone(),
			observer: Rc::downgrade(observer),
		};
		(registration, ObserverToken { alive })
	}

	/// Notify the observer if it is still registered and alive. Returns
	/// whether the registration should be retained.
	pub(crate) fn notify(&self, event: ChangeEvent) -> bool {
		if !self.alive.get() {
			return false;
		}
		match self.observer.upgrade() {
			Some(observer) => {
				observer.borrow_mut().on_change(event);
				true
			}
			None => false,
		}
	}
}

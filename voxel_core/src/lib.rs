//! Voxel placement and spatial engine: the authoritative voxel state for
//! an interactive editor, its geometric invariants, and the reversible
//! edit history layered on top.
//!
//! Layering is `coords -> store -> validator -> plane -> snap -> history ->
//! facade`. Everything above `coords` goes through the [`facade::Editor`];
//! nothing else is meant to mutate [`store::VoxelStore`] directly.

pub mod coords;
pub mod error;
pub mod facade;
pub mod history;
pub mod observer;
pub mod plane;
pub mod resolution;
pub mod snap;
pub mod store;
pub mod validator;

pub use coords::{Bounds, Increment, World};
pub use error::EditError;
pub use facade::{Editor, SessionConfig};
pub use history::Command;
pub use observer::{ChangeEvent, Observer, ObserverToken};
pub use plane::{PlacementPlane, PlaneResult};
pub use resolution::Resolution;
pub use snap::{FaceDirection, SurfaceFaceContext};
pub use store::VoxelStore;
pub use validator::{Outcome, ValidationMode};

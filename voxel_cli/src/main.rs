//! Command-line front end for the voxel editing facade.
//!
//! Each invocation runs exactly one command against a freshly constructed
//! session; persisting a project across invocations is a file-format
//! concern the core deliberately does not own.

mod coord;

use std::process::ExitCode;

use clap::{Parser, Subcommand};
use glam::Vec3;
use tracing::error;

use voxel_core::{Bounds, Editor, EditError, Increment, Resolution, SessionConfig};

use coord::{cm_to_m, parse_coord_cm};

#[derive(Parser, Debug)]
#[command(name = "voxel_cli", about = "Exercises the voxel editing facade from the command line")]
struct Cli {
	#[command(subcommand)]
	command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
	/// Place a voxel at the active resolution.
	#[command(alias = "add")]
	#[command(alias = "set")]
	Place { x: String, y: String, z: String },

	/// Remove the voxel at an exact position.
	#[command(alias = "remove")]
	#[command(alias = "del")]
	Delete { x: String, y: String, z: String },

	/// Fill every cell of an AABB at the active resolution.
	Fill { x1: String, y1: String, z1: String, x2: String, y2: String, z2: String },

	/// Undo the last recorded command.
	#[command(alias = "u")]
	Undo,

	/// Redo the last undone command.
	#[command(alias = "r")]
	Redo,

	/// Set the active resolution (size in centimeters).
	Resolution { size_cm: i32 },

	/// Resize the workspace (meters).
	Workspace { sx: f32, sy: f32, sz: f32 },
}

fn parse_xyz(x: &str, y: &str, z: &str) -> Result<Increment, EditError> {
	let to_err = |e: coord::CoordParseError| EditError::InvalidInput(e.to_string());
	let x = parse_coord_cm(x).map_err(to_err)?;
	let y = parse_coord_cm(y).map_err(to_err)?;
	let z = parse_coord_cm(z).map_err(to_err)?;
	Ok(Increment::new(x, y, z))
}

fn run(command: Command) -> Result<String, EditError> {
	let mut editor = Editor::new(SessionConfig::default());

	match command {
		Command::Place { x, y, z } => {
			let p = parse_xyz(&x, &y, &z)?;
			let world = Vec3::new(cm_to_m(p.0.x), cm_to_m(p.0.y), cm_to_m(p.0.z));
			let r = editor.store().active_resolution();
			let placed = editor.place_at(world, Some(r), None)?;
			Ok(format!("placed voxel at ({}, {}, {}) / {}", placed.0.x, placed.0.y, placed.0.z, r.name()))
		}
		Command::Delete { x, y, z } => {
			let p = parse_xyz(&x, &y, &z)?;
			let r = editor.store().active_resolution();
			editor.remove_at(p, r)?;
			Ok(format!("removed voxel at ({}, {}, {})", p.0.x, p.0.y, p.0.z))
		}
		Command::Fill { x1, y1, z1, x2, y2, z2 } => {
			let lo = parse_xyz(&x1, &y1, &z1)?;
			let hi = parse_xyz(&x2, &y2, &z2)?;
			let region = Bounds {
				min: Vec3::new(cm_to_m(lo.0.x), cm_to_m(lo.0.y), cm_to_m(lo.0.z)),
				max: Vec3::new(cm_to_m(hi.0.x), cm_to_m(hi.0.y), cm_to_m(hi.0.z)),
			};
			let r = editor.store().active_resolution();
			let changed = editor.fill(region, r, true)?;
			Ok(format!("filled {changed} cells"))
		}
		Command::Undo => {
			editor.undo()?;
			Ok("undid last command".to_string())
		}
		Command::Redo => {
			editor.redo()?;
			Ok("redid last undone command".to_string())
		}
		Command::Resolution { size_cm } => {
			let r = Resolution::from_edge_cm(size_cm)
				.ok_or_else(|| EditError::InvalidInput(format!("{size_cm}cm is not one of the supported resolutions")))?;
			editor.set_active_resolution(r);
			Ok(format!("active resolution set to {}", r.name()))
		}
		Command::Workspace { sx, sy, sz } => {
			editor.resize_workspace(Vec3::new(sx, sy, sz))?;
			Ok(format!("workspace resized to {sx}x{sy}x{sz} m"))
		}
	}
}

fn main() -> ExitCode {
	tracing_subscriber::fmt().with_env_filter(tracing_subscriber::EnvFilter::from_default_env()).init();

	let cli = Cli::parse();
	match run(cli.command) {
		Ok(message) => {
			println!("{message}");
			ExitCode::SUCCESS
		}
		Err(err) => {
			error!(%err, "command failed");
			eprintln!("{err}");
			ExitCode::FAILURE
		}
	}
}

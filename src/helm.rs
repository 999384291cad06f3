//! Steering of vessels
//!
//! A [Helm] turns high level commands (thrust forward or astern, turn to port
//! or starboard) into forces and torques on a [KinematicBody]. Which commands
//! are issued each tick is decided by the vessel's [Controller]:
//!
//! - [Controller::Manual] relays the [ManualInput] flags set by an input layer
//! - [Controller::Dummy] circles forever, always turning to starboard under thrust
//! - [Controller::PathFollower] chases the waypoints of a [Path]
//!
//! The path follower aims at the closest waypoint that is no further from
//! the end of the path than the vessel is, so it never doubles back to
//! waypoints it has already passed. It turns while the heading error is more
//! than [HEADING_TOLERANCE] and only thrusts once lined up:
//!
//! ```text
//!        waypoint
//!           x
//!          /
//!         / error
//!  ship >------- heading
//! ```
//!

use std::f32::consts::{PI, TAU};

use crate::prelude::*;
use bevy::prelude::*;

/// Heading error in radians beyond which a path follower turns, and below which it thrusts
pub const HEADING_TOLERANCE: f32 = 0.1;

/// Force and torque a vessel can produce
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
#[derive(Component, Debug, Clone, Copy, PartialEq, Reflect)]
#[reflect(Component)]
pub struct Helm {
	/// Force applied when thrusting
	force: f32,
	/// Torque applied when turning
	torque: f32,
}

impl Default for Helm {
	fn default() -> Self {
		Helm::ship_preset()
	}
}

impl Helm {
	/// Create a new instance of [Helm]
	pub fn new(force: f32, torque: f32) -> Self {
		Helm { force, torque }
	}
	/// The helm of a ship
	pub fn ship_preset() -> Self {
		Helm::new(4000.0, 30.0)
	}
	pub fn get_force(&self) -> f32 {
		self.force
	}
	pub fn get_torque(&self) -> f32 {
		self.torque
	}
	/// Push the body along its heading, or astern when `forward` is false
	pub fn thrust(&self, body: &mut KinematicBody, transform: &Transform2d, forward: bool) {
		let sign = if forward { 1.0 } else { -1.0 };
		body.apply_force(transform.forward(), sign * self.force);
	}
	/// Turn the body to starboard (increasing rotation), or to port when `starboard` is false
	pub fn turn(&self, body: &mut KinematicBody, starboard: bool) {
		let sign = if starboard { 1.0 } else { -1.0 };
		body.apply_torque(sign * self.torque);
	}
}

/// Commands held down by whoever is manually piloting a vessel
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Reflect)]
pub struct ManualInput {
	/// Thrust ahead
	pub forward: bool,
	/// Thrust astern
	pub backward: bool,
	/// Turn to port
	pub port: bool,
	/// Turn to starboard
	pub starboard: bool,
}

/// Decides what a vessel does with its [Helm] each tick
#[derive(Component, Debug, Clone, PartialEq, Reflect)]
#[reflect(Component)]
pub enum Controller {
	/// Piloted through [ManualInput]
	Manual(ManualInput),
	/// Circles endlessly
	Dummy,
	/// Follows a route
	PathFollower(Path),
}

impl Default for Controller {
	fn default() -> Self {
		Controller::Manual(ManualInput::default())
	}
}

impl Controller {
	/// Issue this tick's commands. A path follower stops applying force once it is within `arrival_radius` of the end of its path
	pub fn steer(
		&self,
		helm: &Helm,
		body: &mut KinematicBody,
		transform: &Transform2d,
		arrival_radius: f32,
	) {
		match self {
			Controller::Manual(input) => {
				if input.port {
					helm.turn(body, false);
				}
				if input.starboard {
					helm.turn(body, true);
				}
				if input.forward {
					helm.thrust(body, transform, true);
				}
				if input.backward {
					helm.thrust(body, transform, false);
				}
			}
			Controller::Dummy => {
				helm.turn(body, true);
				helm.thrust(body, transform, true);
			}
			Controller::PathFollower(path) => {
				let Some(target) = select_waypoint(path, transform.position, arrival_radius) else {
					return;
				};
				let direction = target - transform.position;
				let target_angle = direction.y.atan2(direction.x);
				let error = normalise_angle(target_angle - transform.rotation);
				if error > HEADING_TOLERANCE {
					helm.turn(body, true);
				} else if error < -HEADING_TOLERANCE {
					helm.turn(body, false);
				}
				if error.abs() < HEADING_TOLERANCE {
					helm.thrust(body, transform, true);
				}
			}
		}
	}
	/// Whether the controller is following a route
	pub fn is_following_path(&self) -> bool {
		matches!(self, Controller::PathFollower(_))
	}
}

/// Choose the waypoint a vessel at `position` should head for. Returns [None] when the path is empty or the vessel is within `arrival_radius` of its end
fn select_waypoint(path: &Path, position: Vec2, arrival_radius: f32) -> Option<Vec2> {
	let end = path.last()?;
	let to_end = position.distance_squared(end);
	if to_end <= arrival_radius * arrival_radius {
		return None;
	}
	let waypoints = path.get();
	let mut nearest = 0;
	let mut nearest_distance = f32::MAX;
	for (i, waypoint) in waypoints.iter().enumerate() {
		// skip anything further from the end than the vessel itself
		if waypoint.distance_squared(end) > to_end {
			continue;
		}
		let distance = position.distance_squared(*waypoint);
		if distance < nearest_distance {
			nearest_distance = distance;
			nearest = i;
		}
	}
	// sitting on the nearest waypoint gives no heading, aim for the one after
	if nearest_distance <= arrival_radius * arrival_radius && nearest + 1 < waypoints.len() {
		nearest += 1;
	}
	waypoints.get(nearest).copied()
}

/// Wrap an angle into `(-π, π]`
pub fn normalise_angle(angle: f32) -> f32 {
	let wrapped = angle.rem_euclid(TAU);
	if wrapped > PI {
		wrapped - TAU
	} else {
		wrapped
	}
}

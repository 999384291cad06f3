//! Two dimensional motion of bodies floating on the water
//!
//! Each [KinematicBody] accumulates forces and torques during a tick and
//! [KinematicBody::integrate] turns them into velocity and then into a new
//! position and rotation of the body's [Transform2d] using semi-implicit
//! Euler with linear damping:
//!
//! ```text
//! a = (F - c * v) / m        α = (τ - k * ω) / I
//! v = v + a * dt             ω = ω + α * dt
//! p = p + v * dt             r = r + ω * dt
//! ```
//!
//! A move that would carry the body out of the water is rejected, the body
//! stays put and loses all linear velocity. Rotation is never blocked.
//!

pub mod scheduler;

use bevy::prelude::*;

/// Speeds below this are snapped to exactly zero
pub const VELOCITY_EPSILON: f32 = 0.000001;

/// Position and heading of a body in world space
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
#[derive(Component, Debug, Clone, Copy, Default, PartialEq, Reflect)]
#[reflect(Component)]
pub struct Transform2d {
	/// Location in world units
	pub position: Vec2,
	/// Heading in radians, `0` points along `+x`
	pub rotation: f32,
}

impl Transform2d {
	/// Create a new instance of [Transform2d]
	pub fn new(position: Vec2, rotation: f32) -> Self {
		Transform2d { position, rotation }
	}
	/// Unit vector along the heading
	pub fn forward(&self) -> Vec2 {
		Vec2::from_angle(self.rotation)
	}
}

/// What happened to the position of a body during a tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepOutcome {
	/// The body moved to its proposed position, or was at rest
	Moved,
	/// The proposed position was not water so the body stayed put
	Blocked,
}

/// Mass, damping and the velocity state of a moving body
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
#[derive(Component, Debug, Clone, Copy, PartialEq, Reflect)]
#[reflect(Component)]
#[require(Transform2d)]
pub struct KinematicBody {
	/// Resistance to linear acceleration
	mass: f32,
	/// Force opposing linear velocity per unit of speed
	linear_damping: f32,
	/// Resistance to angular acceleration
	moment_of_inertia: f32,
	/// Torque opposing angular velocity per unit of angular speed
	angular_damping: f32,
	/// Current velocity in world units per second
	linear_velocity: Vec2,
	/// Current angular velocity in radians per second
	angular_velocity: f32,
	/// Force accumulated since the last tick
	net_force: Vec2,
	/// Torque accumulated since the last tick
	net_torque: f32,
}

impl KinematicBody {
	/// Create a new instance of [KinematicBody] at rest
	pub fn new(mass: f32, linear_damping: f32, moment_of_inertia: f32, angular_damping: f32) -> Self {
		if !(mass > 0.0 && linear_damping > 0.0 && moment_of_inertia > 0.0 && angular_damping > 0.0) {
			panic!(
				"Body mass ({}), linear damping ({}), moment of inertia ({}) and angular damping ({}) must all be positive",
				mass, linear_damping, moment_of_inertia, angular_damping
			);
		}
		KinematicBody {
			mass,
			linear_damping,
			moment_of_inertia,
			angular_damping,
			linear_velocity: Vec2::ZERO,
			angular_velocity: 0.0,
			net_force: Vec2::ZERO,
			net_torque: 0.0,
		}
	}
	/// The body of a ship
	pub fn ship_preset() -> Self {
		KinematicBody::new(1000.0, 1000.0, 1.0, 10.0)
	}
	pub fn get_mass(&self) -> f32 {
		self.mass
	}
	pub fn get_linear_velocity(&self) -> Vec2 {
		self.linear_velocity
	}
	pub fn get_angular_velocity(&self) -> f32 {
		self.angular_velocity
	}
	pub fn get_net_force(&self) -> Vec2 {
		self.net_force
	}
	pub fn get_net_torque(&self) -> f32 {
		self.net_torque
	}
	/// Add a force of `magnitude` along `direction`. A zero direction adds nothing
	pub fn apply_force(&mut self, direction: Vec2, magnitude: f32) {
		self.net_force += direction.normalize_or_zero() * magnitude;
	}
	/// Add a torque, positive values turn clockwise on screen (toward `+y` from `+x`)
	pub fn apply_torque(&mut self, magnitude: f32) {
		self.net_torque += magnitude;
	}
	/// Advance the body by `dt` seconds, moving `transform` only if `is_water` accepts the new position. Accumulated force and torque are consumed
	pub fn integrate(
		&mut self,
		transform: &mut Transform2d,
		dt: f32,
		is_water: impl Fn(Vec2) -> bool,
	) -> StepOutcome {
		// linear
		let linear_acceleration = (self.net_force - self.linear_velocity * self.linear_damping) / self.mass;
		self.linear_velocity += linear_acceleration * dt;
		self.net_force = Vec2::ZERO;
		// angular
		let angular_acceleration =
			(self.net_torque - self.angular_velocity * self.angular_damping) / self.moment_of_inertia;
		self.angular_velocity += angular_acceleration * dt;
		self.net_torque = 0.0;

		if self.linear_velocity.length() < VELOCITY_EPSILON {
			self.linear_velocity = Vec2::ZERO;
		}
		let mut outcome = StepOutcome::Moved;
		if self.linear_velocity != Vec2::ZERO {
			let proposed = transform.position + self.linear_velocity * dt;
			if is_water(proposed) {
				transform.position = proposed;
			} else {
				self.linear_velocity = Vec2::ZERO;
				outcome = StepOutcome::Blocked;
			}
		}

		transform.rotation += self.angular_velocity * dt;
		if self.angular_velocity.abs() < VELOCITY_EPSILON {
			self.angular_velocity = 0.0;
		}
		outcome
	}
}

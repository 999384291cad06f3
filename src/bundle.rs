//! Defines a bundle which can be spawned as or inserted into an entity to make it a vessel
//!

use crate::prelude::*;
use bevy::prelude::*;

/// Everything a vessel needs to be steered and moved by the plugin systems
#[derive(Bundle, Debug, Clone)]
pub struct VesselBundle {
	/// Position and heading
	transform: Transform2d,
	/// Motion state
	body: KinematicBody,
	/// Force and torque available
	helm: Helm,
	/// What steers the vessel
	controller: Controller,
}

impl VesselBundle {
	/// Create a new instance of [VesselBundle] from its parts
	pub fn new(
		transform: Transform2d,
		body: KinematicBody,
		helm: Helm,
		controller: Controller,
	) -> Self {
		VesselBundle {
			transform,
			body,
			helm,
			controller,
		}
	}
	/// A ship with the preset body and helm at `position` facing `rotation`
	pub fn ship(position: Vec2, rotation: f32, controller: Controller) -> Self {
		VesselBundle::new(
			Transform2d::new(position, rotation),
			KinematicBody::ship_preset(),
			Helm::ship_preset(),
			controller,
		)
	}
}

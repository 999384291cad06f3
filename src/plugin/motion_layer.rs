//! Logic relating to moving vessels across the water
//!

use crate::prelude::*;
use bevy::prelude::*;

/// Feed the frame time to the [FixedStepScheduler] and run the [SimulationStep] schedule once per granted tick
pub fn run_simulation_steps(world: &mut World) {
	let elapsed = world
		.get_resource::<Time>()
		.map(|time| time.delta_secs())
		.unwrap_or(0.0);
	step_simulation(world, elapsed);
}

/// Advance the simulation by `elapsed` seconds of frame time, returning the number of ticks run
pub fn step_simulation(world: &mut World, elapsed: f32) -> u32 {
	let ticks = world.resource_mut::<FixedStepScheduler>().advance(elapsed);
	for _ in 0..ticks {
		world.run_schedule(SimulationStep);
	}
	ticks
}

/// Let every [Controller] issue its commands
pub fn steer_vessels(
	terrain: Res<Terrain>,
	mut vessels: Query<(&Controller, &Helm, &mut KinematicBody, &Transform2d)>,
) {
	// a follower has arrived once it is in the final cell
	let arrival_radius = terrain.get_dimensions().get_cell_size();
	for (controller, helm, mut body, transform) in vessels.iter_mut() {
		controller.steer(helm, &mut body, transform, arrival_radius);
	}
}

/// Move every [KinematicBody], keeping it on the water
pub fn integrate_bodies(
	terrain: Res<Terrain>,
	scheduler: Res<FixedStepScheduler>,
	mut bodies: Query<(Entity, &mut KinematicBody, &mut Transform2d)>,
) {
	let dt = scheduler.get_dt();
	for (entity, mut body, mut transform) in bodies.iter_mut() {
		let outcome = body.integrate(&mut transform, dt, |position| terrain.is_water(position));
		if outcome == StepOutcome::Blocked {
			trace!("{} ran aground at {}", entity, transform.position);
		}
	}
}

//! Defines the Bevy [Plugin] for SeaLanes
//!
//! The plugin owns the [Terrain], a [RoutePlanner] and a
//! [FixedStepScheduler]. Every frame path requests are turned into routes and
//! then the scheduler decides how many ticks of the [SimulationStep]
//! schedule run, each tick steering every vessel before integrating its
//! motion.
//!

use crate::prelude::*;
use bevy::{ecs::schedule::ScheduleLabel, prelude::*};

pub mod motion_layer;
pub mod route_layer;

/// Schedule run once per fixed simulation tick
#[derive(ScheduleLabel, Debug, Hash, PartialEq, Eq, Clone)]
pub struct SimulationStep;

/// Ordering of the systems within a [SimulationStep]
#[derive(SystemSet, Debug, Hash, PartialEq, Eq, Clone)]
pub enum OrderingSet {
	/// Controllers apply forces and torques
	Steer,
	/// Bodies consume their forces and move
	Integrate,
}

/// Generates the world described by `config` (unless a [Terrain] has already been inserted) and drives vessel routing and motion
#[derive(Default)]
pub struct SeaLanesPlugin {
	/// Parameters of the world to generate
	pub config: TerrainConfig,
}

impl SeaLanesPlugin {
	/// Create a new instance of [SeaLanesPlugin]
	pub fn new(config: TerrainConfig) -> Self {
		SeaLanesPlugin { config }
	}
}

impl Plugin for SeaLanesPlugin {
	#[cfg(not(tarpaulin_include))]
	fn build(&self, app: &mut App) {
		if !app.world().contains_resource::<Terrain>() {
			app.insert_resource(Terrain::new(self.config));
		}
		let dimension = app
			.world()
			.resource::<Terrain>()
			.get_dimensions()
			.get_grid_dimension();
		app.insert_resource(RoutePlanner::new(dimension))
			.init_resource::<FixedStepScheduler>()
			.register_type::<Ordinal>()
			.register_type::<GridCell>()
			.register_type::<WorldDimensions>()
			.register_type::<NoiseSettings>()
			.register_type::<GroundBias>()
			.register_type::<RouteSettings>()
			.register_type::<TerrainConfig>()
			.register_type::<CoastalSiteSettings>()
			.register_type::<Path>()
			.register_type::<Transform2d>()
			.register_type::<KinematicBody>()
			.register_type::<FixedStepScheduler>()
			.register_type::<Helm>()
			.register_type::<ManualInput>()
			.register_type::<Controller>()
			.add_event::<route_layer::EventPathRequest>()
			.add_event::<route_layer::EventClearRoute>()
			.init_schedule(SimulationStep)
			.configure_sets(
				SimulationStep,
				(OrderingSet::Steer, OrderingSet::Integrate).chain(),
			)
			.add_systems(
				SimulationStep,
				(
					motion_layer::steer_vessels.in_set(OrderingSet::Steer),
					motion_layer::integrate_bodies.in_set(OrderingSet::Integrate),
				),
			)
			.add_systems(
				Update,
				(
					route_layer::process_path_requests,
					route_layer::process_clear_routes,
					motion_layer::run_simulation_steps,
				)
					.chain(),
			);
	}
}

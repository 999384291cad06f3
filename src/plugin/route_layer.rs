//! Logic relating to assigning routes to vessels
//!

use crate::prelude::*;
use bevy::prelude::*;

/// A request to plan a route for a vessel from where it currently is to `target`. If a route exists the vessel switches to [Controller::PathFollower], otherwise it is left alone
#[derive(Event, Debug, Clone, Copy)]
pub struct EventPathRequest {
	/// The vessel to route
	entity: Entity,
	/// World position to sail to
	target: Vec2,
}

impl EventPathRequest {
	pub fn new(entity: Entity, target: Vec2) -> Self {
		EventPathRequest { entity, target }
	}
	pub fn get_entity(&self) -> Entity {
		self.entity
	}
	pub fn get_target(&self) -> Vec2 {
		self.target
	}
}

/// Abandon the route of a vessel and hand it back to manual control
#[derive(Event, Debug, Clone, Copy)]
pub struct EventClearRoute {
	/// The vessel to stop routing
	entity: Entity,
}

impl EventClearRoute {
	pub fn new(entity: Entity) -> Self {
		EventClearRoute { entity }
	}
	pub fn get_entity(&self) -> Entity {
		self.entity
	}
}

/// Plan a route for each [EventPathRequest]
pub fn process_path_requests(
	mut events: EventReader<EventPathRequest>,
	terrain: Res<Terrain>,
	mut planner: ResMut<RoutePlanner>,
	mut vessels: Query<(&Transform2d, &mut Controller)>,
) {
	for event in events.read() {
		let Ok((transform, mut controller)) = vessels.get_mut(event.entity) else {
			error!(
				"Path request for {} which has no transform or controller",
				event.entity
			);
			continue;
		};
		let path = terrain.find_path(&mut planner, transform.position, event.target);
		if path.is_empty() {
			debug!(
				"No route for {} from {} to {}",
				event.entity, transform.position, event.target
			);
			continue;
		}
		debug!("Routing {} with {} waypoints", event.entity, path.len());
		*controller = Controller::PathFollower(path);
	}
}

/// Hand vessels named by [EventClearRoute] back to manual control
pub fn process_clear_routes(
	mut events: EventReader<EventClearRoute>,
	mut vessels: Query<&mut Controller>,
) {
	for event in events.read() {
		if let Ok(mut controller) = vessels.get_mut(event.entity) {
			if controller.is_following_path() {
				*controller = Controller::default();
			}
		}
	}
}

//! Plans routes across open water with A*
//!
//! The search runs over the world grid and only ever steps onto water cells.
//! Far from the goal it strides `path_step` cells at a time, when the goal
//! comes within `path_step * approach_factor` cells it drops to single cell
//! steps so it can land exactly on the goal cell:
//!
//! ```text
//!  _____________________________________
//! |S  .  .  x  .  .  x  .  .  x.x.x.G  |
//! |_____________________________________|
//!   stride 3 ------------------> stride 1
//! ```
//!
//! A stride is only taken if every cell the straight line between its ends
//! passes through is water, so long steps cannot hop over thin spits of land.
//!
//! The heuristic is the straight-line distance to the goal plus a
//! [GroundBias] term read from the distance-to-ground field. The bias is
//! negative and grows with distance from land, which pulls routes out into
//! open water instead of hugging the coast.
//!

use std::{cmp::Ordering, collections::BinaryHeap};

use crate::prelude::*;
use bevy::prelude::*;

/// How strongly routes are pushed away from land
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
#[derive(Debug, Clone, Copy, PartialEq, Reflect)]
pub enum GroundBias {
	/// Plain straight-line heuristic
	None,
	/// Subtract `weight` times the distance to ground
	Linear {
		/// Scale applied to the distance to ground
		weight: f32,
	},
	/// Subtract `weight` times the distance to ground, ignoring any distance beyond `max_distance`
	Clamped {
		/// Scale applied to the distance to ground
		weight: f32,
		/// Distance beyond which the bias stops growing
		max_distance: f32,
	},
}

impl Default for GroundBias {
	fn default() -> Self {
		GroundBias::Linear { weight: 1.0 }
	}
}

impl GroundBias {
	/// Heuristic adjustment for a cell `distance_to_ground` cells from land. A world without any ground reports `f32::MAX` distances and receives no bias
	pub fn evaluate(&self, distance_to_ground: f32) -> f32 {
		if distance_to_ground >= f32::MAX {
			return 0.0;
		}
		match self {
			GroundBias::None => 0.0,
			GroundBias::Linear { weight } => -weight * distance_to_ground,
			GroundBias::Clamped {
				weight,
				max_distance,
			} => -weight * distance_to_ground.min(*max_distance),
		}
	}
}

/// Tuning of the route search
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
#[derive(Debug, Clone, Copy, PartialEq, Reflect)]
pub struct RouteSettings {
	/// Number of cells covered by a single step when far from the goal
	pub path_step: usize,
	/// Within `path_step * approach_factor` cells of the goal the search uses single cell steps
	pub approach_factor: f32,
	/// Heuristic bias away from land
	pub ground_bias: GroundBias,
}

impl Default for RouteSettings {
	fn default() -> Self {
		RouteSettings {
			path_step: 3,
			approach_factor: std::f32::consts::SQRT_2,
			ground_bias: GroundBias::default(),
		}
	}
}

impl RouteSettings {
	/// Number of cells to step from a cell `remaining` cells away from the goal
	pub fn get_stride(&self, remaining: f32) -> usize {
		if remaining <= self.path_step as f32 * self.approach_factor {
			1
		} else {
			self.path_step
		}
	}
}

/// An ordered list of world space waypoints from a start position to a target. An empty path means no route exists
#[derive(Debug, Clone, Default, PartialEq, Reflect)]
pub struct Path(Vec<Vec2>);

impl Path {
	/// Create a new instance of [Path]
	pub fn new(waypoints: Vec<Vec2>) -> Self {
		Path(waypoints)
	}
	/// Get a reference to the waypoints
	pub fn get(&self) -> &Vec<Vec2> {
		&self.0
	}
	/// Number of waypoints
	pub fn len(&self) -> usize {
		self.0.len()
	}
	/// Whether the path has no waypoints
	pub fn is_empty(&self) -> bool {
		self.0.is_empty()
	}
	/// Iterate over the waypoints in travel order
	pub fn iter(&self) -> impl Iterator<Item = &Vec2> {
		self.0.iter()
	}
	/// First waypoint
	pub fn first(&self) -> Option<Vec2> {
		self.0.first().copied()
	}
	/// Final waypoint
	pub fn last(&self) -> Option<Vec2> {
		self.0.last().copied()
	}
}

/// Per cell search state. Only meaningful while `generation` matches the planner's current generation
#[derive(Debug, Clone, Copy, Default)]
struct SearchNode {
	/// Flat index of the cell this one was reached from
	parent: usize,
	/// Cost of the best known route from the start
	g_cost: f32,
	/// Search the node was last written by
	generation: u32,
}

/// Entry in the open set, ordered so the [BinaryHeap] pops the lowest `f_cost` first
#[derive(Debug, Clone, Copy)]
struct OpenEntry {
	/// Estimated total route cost through the cell
	f_cost: f32,
	/// Cost from the start when the entry was queued
	g_cost: f32,
	/// Flat index of the cell
	index: usize,
}

impl PartialEq for OpenEntry {
	fn eq(&self, other: &Self) -> bool {
		self.cmp(other) == Ordering::Equal
	}
}

impl Eq for OpenEntry {}

impl Ord for OpenEntry {
	fn cmp(&self, other: &Self) -> Ordering {
		other
			.f_cost
			.total_cmp(&self.f_cost)
			.then_with(|| other.index.cmp(&self.index))
	}
}

impl PartialOrd for OpenEntry {
	fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
		Some(self.cmp(other))
	}
}

/// A* search over the water cells of a [Terrain]. The planner owns grid sized scratch storage which is reused between searches, each search stamps the cells it touches with a new generation so old state never has to be cleared
#[derive(Resource, Debug, Clone, Default)]
pub struct RoutePlanner {
	/// Search state of every cell
	nodes: Vec<SearchNode>,
	/// Stamp of the search in progress
	generation: u32,
	/// Cells expanded by the most recent search
	expanded: usize,
}

impl RoutePlanner {
	/// Create a planner for a grid of `dimension` cells per side
	pub fn new(dimension: usize) -> Self {
		RoutePlanner {
			nodes: vec![SearchNode::default(); dimension * dimension],
			generation: 0,
			expanded: 0,
		}
	}
	/// Number of cells the most recent search expanded
	pub fn get_expanded_count(&self) -> usize {
		self.expanded
	}
	/// Begin a new search, growing the scratch storage if the grid is larger than expected
	fn begin_search(&mut self, dimension: usize) {
		let cell_count = dimension * dimension;
		if self.nodes.len() != cell_count {
			debug!("Resizing route planner scratch to {}x{}", dimension, dimension);
			self.nodes = vec![SearchNode::default(); cell_count];
			self.generation = 0;
		}
		self.generation = self.generation.wrapping_add(1);
		if self.generation == 0 {
			// the stamp wrapped, every stale node could now look current
			for node in self.nodes.iter_mut() {
				node.generation = 0;
			}
			self.generation = 1;
		}
		self.expanded = 0;
	}
	/// Best known cost from the start to the cell at `index` during the current search
	fn get_g_cost(&self, index: usize) -> f32 {
		match self.nodes.get(index) {
			Some(node) if node.generation == self.generation => node.g_cost,
			_ => f32::INFINITY,
		}
	}
	/// Record a better route to the cell at `index`
	fn set_node(&mut self, index: usize, parent: usize, g_cost: f32) {
		if let Some(node) = self.nodes.get_mut(index) {
			*node = SearchNode {
				parent,
				g_cost,
				generation: self.generation,
			};
		}
	}
	/// Whether a stride from `from` to `to` crosses only water
	fn is_clear_water(terrain: &Terrain, from: GridCell, to: GridCell) -> bool {
		from.get_cells_between_points(&to)
			.iter()
			.all(|cell| terrain.is_water_cell(*cell))
	}
	/// Find a route across water from `start` to `end` in world space. The first waypoint is the centre of the start cell and the last is the centre of the end cell. If either point lies outside of the world or on land, or no route exists, the returned [Path] is empty
	pub fn find_path(&mut self, terrain: &Terrain, start: Vec2, end: Vec2) -> Path {
		let dimensions = terrain.get_dimensions();
		let (Some(source), Some(goal)) = (dimensions.world_to_grid(start), dimensions.world_to_grid(end)) else {
			debug!("Path request from {} to {} lies outside of the world", start, end);
			return Path::default();
		};
		if !terrain.is_water_cell(source) || !terrain.is_water_cell(goal) {
			debug!("Path request from {} to {} starts or ends on land", start, end);
			return Path::default();
		}
		let dimension = dimensions.get_grid_dimension();
		self.begin_search(dimension);
		let settings = terrain.get_config().route;
		let distance_to_ground = terrain.get_distance_to_ground_field();

		let source_index = source.to_index(dimension);
		let goal_index = goal.to_index(dimension);
		self.set_node(source_index, source_index, 0.0);
		let mut open = BinaryHeap::new();
		open.push(OpenEntry {
			f_cost: source.distance_to(&goal),
			g_cost: 0.0,
			index: source_index,
		});

		let mut found = false;
		while let Some(entry) = open.pop() {
			// a cheaper route to this cell was queued after this entry
			if entry.g_cost > self.get_g_cost(entry.index) {
				continue;
			}
			if entry.index == goal_index {
				found = true;
				break;
			}
			self.expanded += 1;
			let cell = GridCell::from_index(entry.index, dimension);
			let stride = settings.get_stride(cell.distance_to(&goal));
			for ordinal in Ordinal::ALL.iter() {
				let Some(neighbour) = cell.step(*ordinal, stride, dimension) else {
					continue;
				};
				let passable = if stride == 1 {
					terrain.is_water_cell(neighbour)
				} else {
					RoutePlanner::is_clear_water(terrain, cell, neighbour)
				};
				if !passable {
					continue;
				}
				let g_cost = entry.g_cost + ordinal.get_step_cost() * stride as f32;
				let neighbour_index = neighbour.to_index(dimension);
				if g_cost >= self.get_g_cost(neighbour_index) {
					continue;
				}
				self.set_node(neighbour_index, entry.index, g_cost);
				let bias = settings
					.ground_bias
					.evaluate(distance_to_ground.get_grid_value(neighbour));
				open.push(OpenEntry {
					f_cost: g_cost + neighbour.distance_to(&goal) + bias,
					g_cost,
					index: neighbour_index,
				});
			}
		}
		if !found {
			debug!(
				"No route from {} to {} after expanding {} cells",
				start, end, self.expanded
			);
			return Path::default();
		}
		// walk back from the goal to the start
		let mut cells = vec![goal_index];
		let mut current = goal_index;
		while current != source_index {
			current = self.nodes[current].parent;
			cells.push(current);
		}
		cells.reverse();
		let waypoints: Vec<Vec2> = cells
			.iter()
			.map(|i| dimensions.grid_to_world(GridCell::from_index(*i, dimension)))
			.collect();
		debug!(
			"Found route from {} to {} after expanding {} cells",
			start, end, self.expanded
		);
		trace!("Route has {} waypoints", waypoints.len());
		Path::new(waypoints)
	}
}

#[rustfmt::skip]
#[cfg(test)]
mod tests {
	use super::*;
	/// Terrain of `size` world units at resolution `1` shaped by `f`
	fn terrain_from_fn(size: u32, f: impl FnMut(GridCell) -> f32) -> Terrain {
		let config = TerrainConfig {
			dimensions: WorldDimensions::new(size, 1),
			..default()
		};
		let heights = HeightField::from_fn(size as usize, f);
		Terrain::from_height_field(config, heights)
	}
	/// World position of the centre of a cell at resolution `1`
	fn centre(column: usize, row: usize) -> Vec2 {
		Vec2::new(column as f32 + 0.5, row as f32 + 0.5)
	}
	#[test]
	fn open_water_route() {
		let terrain = terrain_from_fn(30, |_| 0.1);
		let mut planner = RoutePlanner::new(30);
		let start = Vec2::new(2.2, 3.7);
		let end = Vec2::new(25.1, 20.9);
		let result = planner.find_path(&terrain, start, end);
		assert!(!result.is_empty());
		assert!(result.first().unwrap().distance(start) <= 1.0);
		assert_eq!(Some(centre(25, 20)), result.last());
	}
	#[test]
	fn waypoints_are_water_and_within_stride() {
		// a wall of land down the middle with a gap at the bottom
		//  _____________
		// |    |        |
		// | S  |     G  |
		// |    |        |
		// |_____________|
		let terrain = terrain_from_fn(30, |cell| {
			if cell.get_column() == 15 && cell.get_row() < 25 { 0.9 } else { 0.1 }
		});
		let mut planner = RoutePlanner::new(30);
		let settings = RouteSettings::default();
		let max_spacing = settings.path_step as f32 * std::f32::consts::SQRT_2 + 1e-4;
		let result = planner.find_path(&terrain, centre(5, 5), centre(25, 5));
		assert!(!result.is_empty());
		for waypoint in result.iter() {
			assert!(terrain.is_water(*waypoint));
		}
		for pair in result.get().windows(2) {
			assert!(pair[0].distance(pair[1]) <= max_spacing);
		}
		// the route has to go through the gap
		assert!(result.iter().any(|p| p.y > 25.0));
		assert_eq!(Some(centre(25, 5)), result.last());
	}
	#[test]
	fn strides_do_not_hop_over_land() {
		// a single cell wide wall with no gap at all
		let terrain = terrain_from_fn(20, |cell| {
			if cell.get_column() == 10 { 0.9 } else { 0.1 }
		});
		let mut planner = RoutePlanner::new(20);
		let result = planner.find_path(&terrain, centre(2, 10), centre(18, 10));
		assert!(result.is_empty());
	}
	#[test]
	fn end_on_land_is_empty() {
		let terrain = terrain_from_fn(20, |cell| {
			if cell == GridCell::new(15, 15) { 0.9 } else { 0.1 }
		});
		let mut planner = RoutePlanner::new(20);
		let result = planner.find_path(&terrain, centre(2, 2), centre(15, 15));
		assert!(result.is_empty());
	}
	#[test]
	fn out_of_range_is_empty() {
		let terrain = terrain_from_fn(20, |_| 0.1);
		let mut planner = RoutePlanner::new(20);
		assert!(planner.find_path(&terrain, centre(2, 2), Vec2::new(25.0, 2.0)).is_empty());
		assert!(planner.find_path(&terrain, Vec2::new(-1.0, 2.0), centre(2, 2)).is_empty());
	}
	#[test]
	fn same_start_and_end() {
		let terrain = terrain_from_fn(20, |_| 0.1);
		let mut planner = RoutePlanner::new(20);
		let result = planner.find_path(&terrain, centre(4, 4), centre(4, 4));
		let actual = Path::new(vec![centre(4, 4)]);
		assert_eq!(actual, result);
	}
	#[test]
	fn enclosed_goal_is_unreachable() {
		// goal surrounded by a ring of land
		let terrain = terrain_from_fn(20, |cell| {
			let (c, r) = cell.get_column_row();
			let on_ring = (8..=12).contains(&c) && (8..=12).contains(&r) && (c == 8 || c == 12 || r == 8 || r == 12);
			if on_ring { 0.9 } else { 0.1 }
		});
		let mut planner = RoutePlanner::new(20);
		let result = planner.find_path(&terrain, centre(2, 2), centre(10, 10));
		assert!(result.is_empty());
	}
	#[test]
	fn planner_is_reusable() {
		let terrain = terrain_from_fn(20, |_| 0.1);
		let mut planner = RoutePlanner::new(20);
		let first = planner.find_path(&terrain, centre(1, 1), centre(18, 18));
		let second = planner.find_path(&terrain, centre(18, 1), centre(1, 18));
		let third = planner.find_path(&terrain, centre(1, 1), centre(18, 18));
		assert!(!first.is_empty());
		assert!(!second.is_empty());
		assert_eq!(first, third);
		assert_eq!(Some(centre(1, 18)), second.last());
	}
	#[test]
	fn planner_resizes_to_terrain() {
		let terrain = terrain_from_fn(20, |_| 0.1);
		let mut planner = RoutePlanner::new(4);
		let result = planner.find_path(&terrain, centre(1, 1), centre(18, 2));
		assert_eq!(Some(centre(18, 2)), result.last());
	}
	#[test]
	fn generation_wrap_clears_stale_nodes() {
		let terrain = terrain_from_fn(10, |_| 0.1);
		let mut planner = RoutePlanner::new(10);
		// stale nodes from an old search that look cheaper than anything reachable
		for node in planner.nodes.iter_mut() {
			*node = SearchNode { parent: 0, g_cost: 0.0, generation: 1 };
		}
		planner.generation = u32::MAX;
		let result = planner.find_path(&terrain, centre(1, 1), centre(8, 1));
		assert_eq!(1, planner.generation);
		assert_eq!(Some(centre(1, 1)), result.first());
		assert_eq!(Some(centre(8, 1)), result.last());
		for waypoint in result.iter() {
			assert_eq!(1.5, waypoint.y);
		}
	}
	#[test]
	fn stride_switches_near_goal() {
		let settings = RouteSettings::default();
		assert_eq!(3, settings.get_stride(10.0));
		assert_eq!(1, settings.get_stride(4.0));
		assert_eq!(1, settings.get_stride(0.0));
	}
	#[test]
	fn ground_bias() {
		assert_eq!(0.0, GroundBias::None.evaluate(5.0));
		assert_eq!(-10.0, GroundBias::Linear { weight: 2.0 }.evaluate(5.0));
		assert_eq!(-6.0, GroundBias::Clamped { weight: 2.0, max_distance: 3.0 }.evaluate(5.0));
		assert_eq!(0.0, GroundBias::Linear { weight: 2.0 }.evaluate(f32::MAX));
	}
	#[test]
	fn open_entries_pop_lowest_cost_first() {
		let mut heap = BinaryHeap::new();
		heap.push(OpenEntry { f_cost: 5.0, g_cost: 0.0, index: 0 });
		heap.push(OpenEntry { f_cost: -2.0, g_cost: 0.0, index: 1 });
		heap.push(OpenEntry { f_cost: 3.0, g_cost: 0.0, index: 2 });
		let result: Vec<usize> = std::iter::from_fn(|| heap.pop().map(|e| e.index)).collect();
		let actual = vec![1, 2, 0];
		assert_eq!(actual, result);
	}
}

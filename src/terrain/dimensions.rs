//! Describes how big the world is and how world space maps onto the grid
//!
//! The world is a square spanning `(0, 0)` to `(size, size)` in world units.
//! Each world unit is divided into `resolution` grid cells per axis, so the
//! grid underlying every field has `size * resolution` cells per side.
//!
//! ```text
//! (0,0)______________________ x
//!     |__|__|__|__|__|__|__|
//!     |__|__|__|__|__|__|__|    world -> grid: floor(world * resolution)
//!     |__|__|__|__|__|__|__|    grid -> world: (cell + 0.5) / resolution
//!     |__|__|__|__|__|__|__|
//!     y
//! ```
//!

use crate::prelude::*;
use bevy::prelude::*;

/// The dimensions of the world
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
#[derive(Debug, Clone, Copy, PartialEq, Reflect)]
pub struct WorldDimensions {
	/// Length of one side of the square world in world units
	size: u32,
	/// Number of grid cells per world unit along each axis
	resolution: u32,
}

impl Default for WorldDimensions {
	fn default() -> Self {
		WorldDimensions::new(200, 4)
	}
}

impl WorldDimensions {
	/// Create a new instance of [WorldDimensions]. A world of `size` units with `resolution` cells per unit is backed by a grid of `size * resolution` cells per side
	pub fn new(size: u32, resolution: u32) -> Self {
		if size == 0 {
			panic!("World size must be greater than zero");
		}
		if resolution == 0 {
			panic!("World resolution must be at least one grid cell per unit");
		}
		WorldDimensions { size, resolution }
	}
	/// Length of one side of the world in world units
	pub fn get_size(&self) -> u32 {
		self.size
	}
	/// Number of grid cells per world unit
	pub fn get_resolution(&self) -> u32 {
		self.resolution
	}
	/// Number of grid cells along one side of the world
	pub fn get_grid_dimension(&self) -> usize {
		self.size as usize * self.resolution as usize
	}
	/// Width of a single grid cell in world units
	pub fn get_cell_size(&self) -> f32 {
		1.0 / self.resolution as f32
	}
	/// From a position in world space find the [GridCell] it resides in. Returns [None] if the position sits outside of the world
	pub fn world_to_grid(&self, position: Vec2) -> Option<GridCell> {
		let x = (position.x * self.resolution as f32).floor();
		let y = (position.y * self.resolution as f32).floor();
		let dimension = self.get_grid_dimension() as f32;
		// NaN fails every comparison and is rejected along with out of range values
		if x >= 0.0 && y >= 0.0 && x < dimension && y < dimension {
			Some(GridCell::new(x as usize, y as usize))
		} else {
			None
		}
	}
	/// World space position of the centre of a [GridCell]
	pub fn grid_to_world(&self, grid_cell: GridCell) -> Vec2 {
		let cell_size = self.get_cell_size();
		Vec2::new(
			(grid_cell.get_column() as f32 + 0.5) * cell_size,
			(grid_cell.get_row() as f32 + 0.5) * cell_size,
		)
	}
	/// The space covered by the world
	pub fn get_world_extent(&self) -> WorldExtent {
		let size = self.size as f32;
		WorldExtent {
			size,
			centre: Vec2::splat(size / 2.0),
			rect: Rect::new(0.0, 0.0, size, size),
		}
	}
}

/// Size, centre point and bounding rectangle of the world in world units
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WorldExtent {
	/// Length of one side of the world
	pub size: f32,
	/// Centre point of the world
	pub centre: Vec2,
	/// Bounding rectangle from the origin to `(size, size)`
	pub rect: Rect,
}

#[cfg(test)]
mod tests {
	use super::*;
	#[test]
	fn grid_dimension() {
		let dimensions = WorldDimensions::new(200, 4);
		assert_eq!(800, dimensions.get_grid_dimension());
		assert_eq!(0.25, dimensions.get_cell_size());
	}
	#[test]
	#[should_panic]
	fn invalid_resolution() {
		WorldDimensions::new(200, 0);
	}
	#[test]
	fn world_to_grid_floors() {
		let dimensions = WorldDimensions::new(10, 4);
		let result = dimensions.world_to_grid(Vec2::new(2.3, 7.99));
		let actual = Some(GridCell::new(9, 31));
		assert_eq!(actual, result);
	}
	#[test]
	fn world_to_grid_out_of_range() {
		let dimensions = WorldDimensions::new(10, 4);
		assert_eq!(None, dimensions.world_to_grid(Vec2::new(-0.01, 5.0)));
		assert_eq!(None, dimensions.world_to_grid(Vec2::new(5.0, 10.0)));
		assert_eq!(None, dimensions.world_to_grid(Vec2::new(10.0, 5.0)));
		assert_eq!(None, dimensions.world_to_grid(Vec2::new(f32::NAN, 5.0)));
	}
	#[test]
	fn grid_to_world_is_cell_centre() {
		let dimensions = WorldDimensions::new(10, 4);
		let result = dimensions.grid_to_world(GridCell::new(9, 31));
		let actual = Vec2::new(2.375, 7.875);
		assert_eq!(actual, result);
	}
	#[test]
	fn round_trip_within_one_cell() {
		let dimensions = WorldDimensions::new(50, 4);
		let cell_size = dimensions.get_cell_size();
		let mut x = 0.0;
		while x < 50.0 {
			let mut y = 0.0;
			while y < 50.0 {
				let position = Vec2::new(x, y);
				let cell = dimensions.world_to_grid(position).unwrap();
				let result = dimensions.grid_to_world(cell);
				assert!(result.distance(position) < cell_size);
				y += 0.37;
			}
			x += 0.41;
		}
	}
	#[test]
	fn world_extent() {
		let dimensions = WorldDimensions::new(200, 4);
		let result = dimensions.get_world_extent();
		assert_eq!(200.0, result.size);
		assert_eq!(Vec2::new(100.0, 100.0), result.centre);
		assert_eq!(Rect::new(0.0, 0.0, 200.0, 200.0), result.rect);
	}
}

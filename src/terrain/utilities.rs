//! Useful structures and tools used by the fields and the route planner
//!

use crate::prelude::*;
use bevy::prelude::*;

/// Cost of a diagonal step between two cells
pub const DIAGONAL_STEP_COST: f32 = std::f32::consts::SQRT_2;
/// Cost of an orthogonal step between two cells
pub const ORTHOGONAL_STEP_COST: f32 = 1.0;

/// Convenience way of accessing the 8 directions of movement between
/// neighbouring [GridCell]s. North points toward row `0`
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash, Reflect)]
pub enum Ordinal {
	North,
	NorthEast,
	East,
	SouthEast,
	South,
	SouthWest,
	West,
	NorthWest,
}

impl Ordinal {
	/// Every direction, the orthogonals clockwise from North followed by the diagonals clockwise from North-East
	pub const ALL: [Ordinal; 8] = [
		Ordinal::North,
		Ordinal::East,
		Ordinal::South,
		Ordinal::West,
		Ordinal::NorthEast,
		Ordinal::SouthEast,
		Ordinal::SouthWest,
		Ordinal::NorthWest,
	];
	/// The `(column, row)` offset of a single step in this direction
	pub fn get_offset(&self) -> (i32, i32) {
		match self {
			Ordinal::North => (0, -1),
			Ordinal::NorthEast => (1, -1),
			Ordinal::East => (1, 0),
			Ordinal::SouthEast => (1, 1),
			Ordinal::South => (0, 1),
			Ordinal::SouthWest => (-1, 1),
			Ordinal::West => (-1, 0),
			Ordinal::NorthWest => (-1, -1),
		}
	}
	/// Whether the direction moves along both axes at once
	pub fn is_diagonal(&self) -> bool {
		let (col, row) = self.get_offset();
		col != 0 && row != 0
	}
	/// Chamfer cost of a single step in this direction
	pub fn get_step_cost(&self) -> f32 {
		if self.is_diagonal() {
			DIAGONAL_STEP_COST
		} else {
			ORTHOGONAL_STEP_COST
		}
	}
	/// Based on a grid cells `(column, row)` position find all neighbours inside a grid of `dimension` cells per side, including diagonal directions, together with the [Ordinal] leading to each
	pub fn get_all_cell_neighbours(cell: GridCell, dimension: usize) -> Vec<(Ordinal, GridCell)> {
		Ordinal::ALL
			.iter()
			.filter_map(|ordinal| cell.step(*ordinal, 1, dimension).map(|n| (*ordinal, n)))
			.collect()
	}
}

// #[rustfmt::skip]
#[cfg(test)]
mod tests {
	use super::*;
	#[test]
	fn ordinal_grid_cell_neighbours_corner() {
		let cell = GridCell::new(0, 0);
		let result = Ordinal::get_all_cell_neighbours(cell, 10);
		let actual = vec![
			(Ordinal::East, GridCell::new(1, 0)),
			(Ordinal::South, GridCell::new(0, 1)),
			(Ordinal::SouthEast, GridCell::new(1, 1)),
		];
		assert_eq!(actual, result);
	}
	#[test]
	fn ordinal_grid_cell_neighbours_far_corner() {
		let cell = GridCell::new(9, 9);
		let result = Ordinal::get_all_cell_neighbours(cell, 10);
		let actual = vec![
			(Ordinal::North, GridCell::new(9, 8)),
			(Ordinal::West, GridCell::new(8, 9)),
			(Ordinal::NorthWest, GridCell::new(8, 8)),
		];
		assert_eq!(actual, result);
	}
	#[test]
	fn ordinal_grid_cell_neighbours_centre() {
		let cell = GridCell::new(4, 4);
		let result = Ordinal::get_all_cell_neighbours(cell, 10);
		assert_eq!(8, result.len());
	}
	#[test]
	fn step_costs() {
		assert_eq!(1.0, Ordinal::East.get_step_cost());
		assert_eq!(std::f32::consts::SQRT_2, Ordinal::SouthWest.get_step_cost());
	}
}

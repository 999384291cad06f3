//! The DistanceField contains a grid of 32-bit values, each one being the
//! approximate distance (in grid cells) from that cell to the nearest cell
//! whose height satisfies a predicate. The world keeps two of them, distance
//! to water and distance to ground.
//!
//! The field is built with a multi-source wavefront that expands one ring of
//! cells at a time. Every cell satisfying the predicate is a source with
//! distance `0` and forms the first ring:
//!
//! 1. Each cell of the current ring looks up its orthogonal neighbours, any that have not been reached yet take the distance of the cell plus `1`
//! 2. Each cell of the current ring looks up its diagonal neighbours, any that have not been reached yet take the distance of the cell plus `√2`
//! 3. The neighbours reached become the next ring
//! 4. Repeat until a ring is empty
//!
//! A cell is finalised the first time the wave touches it, so the result is
//! a chamfer approximation of the true Euclidean distance rather than an
//! exact transform. For a single source in the middle of a water grid (`S`
//! marks the source, the values approximate):
//!
//! ```text
//!  _______________________________
//! |     |     |     |     |     |
//! | 2.8 | 2.4 | 2.0 | 2.4 | 2.8 |
//! |_____|_____|_____|_____|_____|
//! |     |     |     |     |     |
//! | 2.4 | 1.4 | 1.0 | 1.4 | 2.4 |
//! |_____|_____|_____|_____|_____|
//! |     |     |     |     |     |
//! | 2.0 | 1.0 |  S  | 1.0 | 2.0 |
//! |_____|_____|_____|_____|_____|
//! ```
//!

use crate::prelude::*;
use bevy::prelude::*;

/// Marks a cell the wavefront has not reached during construction
pub const UNVISITED: f32 = -1.0;

/// Approximate distance from every cell to the nearest cell matching a predicate
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
#[derive(Clone, Debug)]
pub struct DistanceField(Grid<f32>);

impl Field<f32> for DistanceField {
	/// Get a reference to the backing grid
	fn get_field(&self) -> &Grid<f32> {
		&self.0
	}
	/// Retrieve a grid cell value, cells outside of the field report `f32::MAX`
	fn get_grid_value(&self, grid_cell: GridCell) -> f32 {
		self.0.get(grid_cell).unwrap_or(f32::MAX)
	}
}

impl DistanceField {
	/// Compute the distance from every cell of the `height_field` to the nearest cell whose height satisfies `predicate`
	pub fn calculate(height_field: &HeightField, predicate: impl Fn(f32) -> bool) -> Self {
		let dimension = height_field.get_dimension();
		let heights = height_field.get_field();
		let mut grid = Grid::new(dimension, UNVISITED);
		// seed the wavefront with every matching cell
		let mut ring = Vec::new();
		for (i, height) in heights.iter().enumerate() {
			if predicate(*height) {
				let cell = GridCell::from_index(i, dimension);
				grid.set(0.0, cell);
				ring.push(cell);
			}
		}
		let source_count = ring.len();
		while !ring.is_empty() {
			let mut next_ring = Vec::new();
			// orthogonal steps claim cells before diagonal ones
			for diagonal in [false, true] {
				for cell in ring.iter() {
					let distance = grid.get(*cell).unwrap_or(UNVISITED);
					for (ordinal, neighbour) in Ordinal::get_all_cell_neighbours(*cell, dimension) {
						if ordinal.is_diagonal() != diagonal || grid.get(neighbour) != Some(UNVISITED) {
							continue;
						}
						grid.set(distance + ordinal.get_step_cost(), neighbour);
						next_ring.push(neighbour);
					}
				}
			}
			ring = next_ring;
		}
		if source_count == 0 {
			// without a single source the wave never starts, nothing can be
			// reached so every cell is infinitely far
			warn!("Distance field has no source cells, every cell is unreachable");
			grid.values_mut().fill(f32::MAX);
		}
		debug!(
			"Calculated {}x{} distance field from {} source cells",
			dimension, dimension, source_count
		);
		DistanceField(grid)
	}
	/// Number of cells the wavefront never reached
	pub fn count_unvisited(&self) -> usize {
		self.0.iter().filter(|v| **v == UNVISITED).count()
	}
	/// Largest distance held by the field
	pub fn get_max_distance(&self) -> f32 {
		self.0.iter().fold(0.0, |max, v| max.max(*v))
	}
}

#[rustfmt::skip]
#[cfg(test)]
mod tests {
	use super::*;
	/// Heights where `0.0` cells are the sources, `rows` must be square
	fn heights_from_rows(rows: &[&[f32]]) -> HeightField {
		HeightField::from_fn(rows.len(), |cell| rows[cell.get_row()][cell.get_column()])
	}
	/// Single source near the centre, orthogonals cost 1 and diagonals √2
	#[test]
	fn single_source() {
		let heights = heights_from_rows(&[
			&[1.0, 1.0, 1.0, 1.0, 1.0],
			&[1.0, 1.0, 1.0, 1.0, 1.0],
			&[1.0, 1.0, 0.0, 1.0, 1.0],
			&[1.0, 1.0, 1.0, 1.0, 1.0],
			&[1.0, 1.0, 1.0, 1.0, 1.0],
		]);
		let field = DistanceField::calculate(&heights, |h| h <= 0.5);
		let d = std::f32::consts::SQRT_2;
		let result = field.get_field().values().to_vec();
		let actual = vec![
			2.0 * d, 1.0 + d, 2.0, 1.0 + d, 2.0 * d,
			1.0 + d, d, 1.0, d, 1.0 + d,
			2.0, 1.0, 0.0, 1.0, 2.0,
			1.0 + d, d, 1.0, d, 1.0 + d,
			2.0 * d, 1.0 + d, 2.0, 1.0 + d, 2.0 * d,
		];
		assert_eq!(actual, result);
	}
	/// Two source columns, every cell takes the distance of the closest wave
	#[test]
	fn multiple_sources() {
		let heights = HeightField::from_fn(7, |cell| {
			if cell.get_column() == 0 || cell.get_column() == 6 { 0.0 } else { 1.0 }
		});
		let field = DistanceField::calculate(&heights, |h| h <= 0.5);
		for row in 0..7 {
			let result: Vec<f32> = (0..7).map(|c| field.get_grid_value(GridCell::new(c, row))).collect();
			let actual = vec![0.0, 1.0, 2.0, 3.0, 2.0, 1.0, 0.0];
			assert_eq!(actual, result);
		}
	}
	#[test]
	fn sources_are_zero_and_others_positive() {
		let dimensions = WorldDimensions::new(12, 2);
		let heights = HeightField::generate(&dimensions, &NoiseSettings::default());
		let is_water = |h: f32| h <= 0.6;
		let field = DistanceField::calculate(&heights, is_water);
		assert_eq!(0, field.count_unvisited());
		for (height, distance) in heights.get_field().iter().zip(field.get_field().iter()) {
			if is_water(*height) {
				assert_eq!(0.0, *distance);
			} else {
				assert!(*distance > 0.0);
			}
		}
	}
	/// Every step costs its own Euclidean length so the distance can never
	/// undershoot, and a cell `n` rings out is at most `n` diagonal steps away
	#[test]
	fn chamfer_error_is_bounded() {
		let dimension = 21;
		let heights = HeightField::from_fn(dimension, |cell| {
			if cell == GridCell::new(10, 10) { 0.0 } else { 1.0 }
		});
		let field = DistanceField::calculate(&heights, |h| h <= 0.5);
		let source = GridCell::new(10, 10);
		for i in 0..dimension * dimension {
			let cell = GridCell::from_index(i, dimension);
			let exact = source.distance_to(&cell);
			let result = field.get_grid_value(cell);
			assert!(result >= exact - 1e-4);
			assert!(result <= exact * std::f32::consts::SQRT_2 + 1e-4);
		}
	}
	#[test]
	fn no_sources_is_unreachable() {
		let heights = HeightField::from_fn(4, |_| 1.0);
		let field = DistanceField::calculate(&heights, |h| h <= 0.5);
		assert_eq!(0, field.count_unvisited());
		assert_eq!(f32::MAX, field.get_grid_value(GridCell::new(2, 2)));
	}
	#[test]
	fn max_distance() {
		let heights = HeightField::from_fn(3, |cell| {
			if cell == GridCell::new(0, 0) { 0.0 } else { 1.0 }
		});
		let field = DistanceField::calculate(&heights, |h| h <= 0.5);
		assert_eq!(2.0 * std::f32::consts::SQRT_2, field.get_max_distance());
	}
}

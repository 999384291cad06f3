//! The kinds of fields laid over the world grid
//!
//! Every field is a square `DxD` grid where `D` is the number of grid cells
//! along one side of the world (`size * resolution`). Cells are stored
//! row-major in a flat [Grid] and addressed with a [GridCell] of
//! `(column, row)`, column `0` being the western edge and row `0` the
//! northern edge.
//!

pub mod distance_field;
pub mod height_field;

use crate::prelude::*;
use bevy::prelude::*;

/// Defines required access to field arrays
pub trait Field<T> {
	/// Get a reference to the backing grid
	fn get_field(&self) -> &Grid<T>;
	/// Retrieve a grid cell value
	fn get_grid_value(&self, grid_cell: GridCell) -> T;
	/// Number of cells along one side of the field
	fn get_dimension(&self) -> usize {
		self.get_field().get_dimension()
	}
}

/// ID of a cell within the world grid
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Debug, Default, Hash, Reflect)]
pub struct GridCell((usize, usize));

impl GridCell {
	/// Create a new instance of [GridCell]
	pub fn new(column: usize, row: usize) -> Self {
		GridCell((column, row))
	}
	/// Get the `(column, row)` tuple
	pub fn get_column_row(&self) -> (usize, usize) {
		self.0
	}
	/// Get the column
	pub fn get_column(&self) -> usize {
		self.0 .0
	}
	/// Get the row
	pub fn get_row(&self) -> usize {
		self.0 .1
	}
	/// Flat row-major index of the cell in a grid of `dimension` cells per side
	pub fn to_index(&self, dimension: usize) -> usize {
		self.get_row() * dimension + self.get_column()
	}
	/// Inverse of [GridCell::to_index]
	pub fn from_index(index: usize, dimension: usize) -> Self {
		GridCell::new(index % dimension, index / dimension)
	}
	/// Move `stride` cells in the direction of `ordinal`. Returns [None] if the
	/// destination falls outside of a grid of `dimension` cells per side
	pub fn step(&self, ordinal: Ordinal, stride: usize, dimension: usize) -> Option<GridCell> {
		let (d_col, d_row) = ordinal.get_offset();
		let column = self.get_column() as i64 + d_col as i64 * stride as i64;
		let row = self.get_row() as i64 + d_row as i64 * stride as i64;
		if column < 0 || row < 0 || column >= dimension as i64 || row >= dimension as i64 {
			None
		} else {
			Some(GridCell::new(column as usize, row as usize))
		}
	}
	/// Straight-line distance to another cell measured in cells
	pub fn distance_to(&self, other: &GridCell) -> f32 {
		let d_col = other.get_column() as f32 - self.get_column() as f32;
		let d_row = other.get_row() as f32 - self.get_row() as f32;
		(d_col * d_col + d_row * d_row).sqrt()
	}
	/// Using the Bresenham line algorithm get a list of [GridCell] that lie along a line between two points
	pub fn get_cells_between_points(&self, target: &GridCell) -> Vec<GridCell> {
		let source_col = self.get_column() as i32;
		let source_row = self.get_row() as i32;
		let target_col = target.get_column() as i32;
		let target_row = target.get_row() as i32;

		// optimise for orthognal line (horizontal or vertical)
		if source_col == target_col {
			let mut cells: Vec<GridCell> = (source_row.min(target_row)..=source_row.max(target_row))
				.map(|row| GridCell::new(source_col as usize, row as usize))
				.collect();
			if source_row > target_row {
				cells.reverse();
			}
			cells
		} else if source_row == target_row {
			let mut cells: Vec<GridCell> = (source_col.min(target_col)..=source_col.max(target_col))
				.map(|col| GridCell::new(col as usize, source_row as usize))
				.collect();
			if source_col > target_col {
				cells.reverse();
			}
			cells
		} else if (target_row - source_row).abs() < (target_col - source_col).abs() {
			if source_col > target_col {
				let mut cells = walk_bresenham_shallow(target_col, target_row, source_col, source_row);
				// ensure list points in the direction of source to target
				cells.reverse();
				cells
			} else {
				walk_bresenham_shallow(source_col, source_row, target_col, target_row)
			}
		} else if source_row > target_row {
			let mut cells = walk_bresenham_steep(target_col, target_row, source_col, source_row);
			cells.reverse();
			cells
		} else {
			walk_bresenham_steep(source_col, source_row, target_col, target_row)
		}
	}
}

/// When finding a shallow raster representation of a line we step through the x-dimension and increment y based on an error bound which indicates which cells lie on the line
fn walk_bresenham_shallow(col_0: i32, row_0: i32, col_1: i32, row_1: i32) -> Vec<GridCell> {
	let mut cells = Vec::new();

	let delta_col = col_1 - col_0;
	let mut delta_row = row_1 - row_0;

	let mut row_increment = 1;
	if delta_row < 0 {
		row_increment = -1;
		delta_row *= -1;
	}
	let mut difference = 2 * delta_row - delta_col;
	let mut row = row_0;

	for col in col_0..=col_1 {
		cells.push(GridCell::new(col as usize, row as usize));
		if difference > 0 {
			row += row_increment;
			difference += 2 * (delta_row - delta_col);
		} else {
			difference += 2 * delta_row;
		}
	}
	cells
}

/// When finding a steep raster representation of a line we step through the y-dimension and increment x based on an error bound which indicates which cells lie on the line
fn walk_bresenham_steep(col_0: i32, row_0: i32, col_1: i32, row_1: i32) -> Vec<GridCell> {
	let mut cells = Vec::new();

	let mut delta_col = col_1 - col_0;
	let delta_row = row_1 - row_0;

	let mut col_increment = 1;
	if delta_col < 0 {
		col_increment = -1;
		delta_col *= -1;
	}
	let mut difference = 2 * delta_col - delta_row;
	let mut col = col_0;

	for row in row_0..=row_1 {
		cells.push(GridCell::new(col as usize, row as usize));
		if difference > 0 {
			col += col_increment;
			difference += 2 * (delta_col - delta_row);
		} else {
			difference += 2 * delta_col;
		}
	}
	cells
}

/// Square, row-major, bounds-checked storage backing every field
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
#[derive(Clone, Debug, PartialEq)]
pub struct Grid<T> {
	/// Number of cells along one side
	dimension: usize,
	/// `dimension * dimension` values, row by row
	cells: Vec<T>,
}

impl<T> Grid<T> {
	/// Number of cells along one side
	pub fn get_dimension(&self) -> usize {
		self.dimension
	}
	/// Whether the cell lies inside the grid
	pub fn contains(&self, grid_cell: GridCell) -> bool {
		grid_cell.get_column() < self.dimension && grid_cell.get_row() < self.dimension
	}
	/// Iterate over the values row by row
	pub fn iter(&self) -> impl Iterator<Item = &T> {
		self.cells.iter()
	}
	/// Mutable access to the values row by row
	pub(crate) fn values_mut(&mut self) -> &mut [T] {
		&mut self.cells
	}
	/// The values row by row
	pub fn values(&self) -> &[T] {
		&self.cells
	}
}

impl<T: Copy> Grid<T> {
	/// Create a grid with every cell set to `value`
	pub fn new(dimension: usize, value: T) -> Self {
		if dimension == 0 {
			panic!("A grid must have at least one cell per side");
		}
		Grid {
			dimension,
			cells: vec![value; dimension * dimension],
		}
	}
	/// Create a grid by evaluating `f` for every cell
	pub fn from_fn(dimension: usize, mut f: impl FnMut(GridCell) -> T) -> Self {
		if dimension == 0 {
			panic!("A grid must have at least one cell per side");
		}
		let cells = (0..dimension * dimension)
			.map(|i| f(GridCell::from_index(i, dimension)))
			.collect();
		Grid { dimension, cells }
	}
	/// Retrieve the value of a cell, [None] when the cell lies outside the grid
	pub fn get(&self, grid_cell: GridCell) -> Option<T> {
		if self.contains(grid_cell) {
			self.cells.get(grid_cell.to_index(self.dimension)).copied()
		} else {
			None
		}
	}
	/// Set the value of a cell
	pub fn set(&mut self, value: T, grid_cell: GridCell) {
		if !self.contains(grid_cell) {
			panic!(
				"Cannot set a Grid value, index out of bounds. Asked for column {}, row {}, grid dimension is {}",
				grid_cell.get_column(),
				grid_cell.get_row(),
				self.dimension
			)
		}
		let index = grid_cell.to_index(self.dimension);
		self.cells[index] = value;
	}
}

//! The HeightField contains a grid of 32-bit values in the range `[0, 1]`
//! describing the elevation of the world. Cells at or below the water level
//! of the [crate::prelude::TerrainConfig] are sea, everything above is land.
//!
//! Heights are synthesised from fractal Brownian motion over Perlin noise.
//! Each octave samples the noise at a higher frequency (`lacunarity`) and
//! adds it with a different weight (`gain`):
//!
//! ```text
//! octave 0  ~~~~~~~~~~~~~~~~~~~~~~~~   frequency 1,      amplitude 1
//! octave 1  ~^~^~^~^~^~^~^~^~^~^~^~^   frequency l,      amplitude g
//! octave 2  ^v^v^v^v^v^v^v^v^v^v^v^v   frequency l^2,    amplitude g^2
//! ```
//!
//! Once every cell has a raw value the grid is rescaled so the lowest cell
//! becomes `0` and the highest becomes `1`.
//!

use crate::prelude::*;
use bevy::prelude::*;
use fastnoise_lite::{FastNoiseLite, FractalType, NoiseType};

/// Value given to every cell when the noise produces a perfectly flat field
pub const FLAT_FIELD_HEIGHT: f32 = 0.5;

/// Parameters of the fractal noise used to generate a [HeightField]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
#[derive(Debug, Clone, Copy, PartialEq, Reflect)]
pub struct NoiseSettings {
	/// Seed of the first octave, each successive octave uses the next seed
	pub seed: i32,
	/// Number of octaves summed together
	pub octaves: u32,
	/// Frequency multiplier between octaves
	pub lacunarity: f32,
	/// Amplitude multiplier between octaves
	pub gain: f32,
	/// How many noise periods span the whole grid
	pub scale: f32,
	/// Offset in grid cells applied before sampling
	pub offset: Vec2,
}

impl Default for NoiseSettings {
	fn default() -> Self {
		NoiseSettings {
			seed: 0,
			octaves: 8,
			lacunarity: 1.4,
			gain: 1.0,
			scale: 2.0,
			offset: Vec2::ZERO,
		}
	}
}

/// Build a Perlin sampler that sums `settings.octaves` octaves as fractal Brownian motion
fn fractal_noise(settings: &NoiseSettings) -> FastNoiseLite {
	let mut noise = FastNoiseLite::with_seed(settings.seed);
	noise.set_noise_type(Some(NoiseType::Perlin));
	noise.set_frequency(Some(1.0));
	noise.set_fractal_type(Some(FractalType::FBm));
	noise.set_fractal_octaves(Some(settings.octaves.min(i32::MAX as u32) as i32));
	noise.set_fractal_lacunarity(Some(settings.lacunarity));
	noise.set_fractal_gain(Some(settings.gain));
	noise
}

/// Elevation of every cell in the world grid
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
#[derive(Clone, Debug)]
pub struct HeightField(Grid<f32>);

impl Field<f32> for HeightField {
	/// Get a reference to the backing grid
	fn get_field(&self) -> &Grid<f32> {
		&self.0
	}
	/// Retrieve a grid cell value, cells outside of the field report `f32::MAX`
	fn get_grid_value(&self, grid_cell: GridCell) -> f32 {
		self.0.get(grid_cell).unwrap_or(f32::MAX)
	}
}

impl HeightField {
	/// Generate a normalised [HeightField] for a world of `dimensions` from fractal noise
	pub fn generate(dimensions: &WorldDimensions, settings: &NoiseSettings) -> Self {
		if settings.octaves == 0 {
			panic!("Height generation requires at least one noise octave");
		}
		let dimension = dimensions.get_grid_dimension();
		let noise = fractal_noise(settings);
		let frequency = settings.scale / dimension as f32;
		// first pass, raw noise
		let mut grid = Grid::from_fn(dimension, |cell| {
			let x = (cell.get_column() as f32 + settings.offset.x) * frequency;
			let y = (cell.get_row() as f32 + settings.offset.y) * frequency;
			noise.get_noise_2d(x, y)
		});
		// second pass, rescale into [0, 1]
		normalise(&mut grid);
		debug!(
			"Generated {}x{} height field over {} octaves",
			dimension, dimension, settings.octaves
		);
		HeightField(grid)
	}
	/// Create a [HeightField] by evaluating `f` for every cell. Values are clamped into `[0, 1]` but otherwise kept as given, which makes this suitable for hand-built worlds
	pub fn from_fn(dimension: usize, mut f: impl FnMut(GridCell) -> f32) -> Self {
		HeightField(Grid::from_fn(dimension, |cell| f(cell).clamp(0.0, 1.0)))
	}
	/// Lowest and highest cell values
	pub fn get_min_max(&self) -> (f32, f32) {
		min_max(&self.0)
	}
}

/// Lowest and highest values of a grid
fn min_max(grid: &Grid<f32>) -> (f32, f32) {
	grid.iter()
		.fold((f32::MAX, f32::MIN), |(min, max), v| (min.min(*v), max.max(*v)))
}

/// Rescale every value so the lowest becomes `0` and the highest `1`. A flat grid cannot be stretched and is filled with [FLAT_FIELD_HEIGHT] instead
fn normalise(grid: &mut Grid<f32>) {
	let (min, max) = min_max(grid);
	debug!("Raw height range [{}, {}]", min, max);
	let range = max - min;
	if !range.is_finite() || range <= f32::EPSILON {
		warn!(
			"Height noise is flat (min {}, max {}), using a constant height of {}",
			min, max, FLAT_FIELD_HEIGHT
		);
		grid.values_mut().fill(FLAT_FIELD_HEIGHT);
		return;
	}
	for value in grid.values_mut().iter_mut() {
		*value = (*value - min) / range;
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	#[test]
	fn generated_heights_are_normalised() {
		let dimensions = WorldDimensions::new(16, 4);
		let field = HeightField::generate(&dimensions, &NoiseSettings::default());
		assert_eq!(64, field.get_dimension());
		for value in field.get_field().iter() {
			assert!((0.0..=1.0).contains(value));
		}
		let (min, max) = field.get_min_max();
		assert_eq!(0.0, min);
		assert_eq!(1.0, max);
	}
	#[test]
	fn generation_is_deterministic() {
		let dimensions = WorldDimensions::new(8, 2);
		let settings = NoiseSettings {
			seed: 42,
			..default()
		};
		let a = HeightField::generate(&dimensions, &settings);
		let b = HeightField::generate(&dimensions, &settings);
		assert_eq!(a.get_field(), b.get_field());
	}
	#[test]
	fn seed_changes_terrain() {
		let dimensions = WorldDimensions::new(8, 2);
		let a = HeightField::generate(&dimensions, &NoiseSettings::default());
		let b = HeightField::generate(
			&dimensions,
			&NoiseSettings {
				seed: 7,
				..default()
			},
		);
		assert_ne!(a.get_field(), b.get_field());
	}
	#[test]
	fn single_octave_is_plain_perlin() {
		let settings = NoiseSettings {
			seed: 3,
			octaves: 1,
			..default()
		};
		let fractal = fractal_noise(&settings);
		let mut plain = FastNoiseLite::with_seed(3);
		plain.set_noise_type(Some(NoiseType::Perlin));
		plain.set_frequency(Some(1.0));
		for (x, y) in [(0.3, 0.7), (1.25, 0.5), (1.9, 1.1)] {
			assert_eq!(plain.get_noise_2d(x, y), fractal.get_noise_2d(x, y));
		}
	}
	#[test]
	fn octaves_add_detail() {
		let dimensions = WorldDimensions::new(8, 2);
		let coarse = HeightField::generate(
			&dimensions,
			&NoiseSettings {
				octaves: 1,
				..default()
			},
		);
		let fine = HeightField::generate(&dimensions, &NoiseSettings::default());
		assert_ne!(coarse.get_field(), fine.get_field());
	}
	#[test]
	fn flat_noise_falls_back_to_mid_height() {
		let mut grid = Grid::new(4, 0.3);
		normalise(&mut grid);
		for value in grid.iter() {
			assert_eq!(FLAT_FIELD_HEIGHT, *value);
		}
	}
	#[test]
	fn normalise_stretches_range() {
		let mut grid = Grid::from_fn(2, |cell| cell.to_index(2) as f32 * 2.0 - 1.0);
		normalise(&mut grid);
		let result = grid.values().to_vec();
		let actual = vec![0.0, 1.0 / 3.0, 2.0 / 3.0, 1.0];
		assert_eq!(actual, result);
	}
	#[test]
	fn from_fn_clamps() {
		let field = HeightField::from_fn(2, |cell| cell.get_column() as f32 * 3.0 - 1.0);
		assert_eq!(0.0, field.get_grid_value(GridCell::new(0, 0)));
		assert_eq!(1.0, field.get_grid_value(GridCell::new(1, 0)));
	}
	#[test]
	fn out_of_range_cell_is_max() {
		let field = HeightField::from_fn(2, |_| 0.5);
		assert_eq!(f32::MAX, field.get_grid_value(GridCell::new(2, 0)));
	}
	#[test]
	#[should_panic]
	fn zero_octaves() {
		let dimensions = WorldDimensions::new(4, 1);
		let settings = NoiseSettings {
			octaves: 0,
			..default()
		};
		HeightField::generate(&dimensions, &settings);
	}
}

//! The world the vessels sail across
//!
//! A [Terrain] is generated once from a [TerrainConfig] and never changes
//! afterwards. It owns three fields laid over the same grid:
//!
//! - the [HeightField] describing elevation, cells at or below the water level are sea
//! - a [DistanceField] holding the distance from every cell to the nearest water
//! - a [DistanceField] holding the distance from every cell to the nearest ground
//!
//! Every query takes a world space position and maps it onto the grid.
//! Positions outside of the world report `f32::MAX` rather than failing.
//!

pub mod coast;
pub mod dimensions;
pub mod fields;
pub mod route;
pub mod utilities;

use crate::prelude::*;
use bevy::prelude::*;
use thiserror::Error;

/// Failures raised when loading or validating a [TerrainConfig]
#[derive(Debug, Error)]
pub enum ConfigError {
	/// The config file could not be read
	#[error("failed to read terrain config: {0}")]
	Io(#[from] std::io::Error),
	/// The config file is not valid RON for a [TerrainConfig]
	#[cfg(feature = "ron")]
	#[error("failed to parse terrain config: {0}")]
	Parse(#[from] ron::error::SpannedError),
	/// The config describes a world that cannot be built
	#[error("invalid terrain config: {0}")]
	Invalid(String),
}

/// Everything needed to build a [Terrain]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
#[derive(Debug, Clone, Copy, PartialEq, Reflect)]
pub struct TerrainConfig {
	/// Size of the world and cells per world unit
	pub dimensions: WorldDimensions,
	/// Heights at or below this value are water
	pub water_level: f32,
	/// Noise used to generate heights
	pub noise: NoiseSettings,
	/// Route planning behaviour
	pub route: RouteSettings,
}

impl Default for TerrainConfig {
	fn default() -> Self {
		TerrainConfig {
			dimensions: WorldDimensions::default(),
			water_level: 0.6,
			noise: NoiseSettings::default(),
			route: RouteSettings::default(),
		}
	}
}

impl TerrainConfig {
	/// Check the config describes a world that can be built
	pub fn validate(&self) -> Result<(), ConfigError> {
		if self.dimensions.get_size() == 0 || self.dimensions.get_resolution() == 0 {
			return Err(ConfigError::Invalid(
				"world size and resolution must be greater than zero".to_string(),
			));
		}
		if !(0.0..=1.0).contains(&self.water_level) {
			return Err(ConfigError::Invalid(format!(
				"water level {} must lie within [0, 1]",
				self.water_level
			)));
		}
		if self.noise.octaves == 0 {
			return Err(ConfigError::Invalid(
				"noise requires at least one octave".to_string(),
			));
		}
		if self.route.path_step == 0 {
			return Err(ConfigError::Invalid(
				"route path step must be at least one cell".to_string(),
			));
		}
		if self.route.approach_factor.is_nan() || self.route.approach_factor < 0.0 {
			return Err(ConfigError::Invalid(format!(
				"route approach factor {} must not be negative",
				self.route.approach_factor
			)));
		}
		Ok(())
	}
	/// Load a config from a RON file and validate it
	#[cfg(feature = "ron")]
	pub fn from_ron(path: impl AsRef<std::path::Path>) -> Result<Self, ConfigError> {
		let file = std::fs::File::open(path)?;
		let config: TerrainConfig = ron::de::from_reader(file)?;
		config.validate()?;
		Ok(config)
	}
}

/// The immutable world shared by route planning and vessel motion
#[derive(Resource, Debug, Clone)]
pub struct Terrain {
	/// Parameters the terrain was built from
	config: TerrainConfig,
	/// Elevation of every cell
	heights: HeightField,
	/// Distance from every cell to the nearest water
	distance_to_water: DistanceField,
	/// Distance from every cell to the nearest ground
	distance_to_ground: DistanceField,
}

impl Terrain {
	/// Generate the heights described by `config` and derive the distance fields from them
	pub fn new(config: TerrainConfig) -> Self {
		if let Err(e) = config.validate() {
			panic!("Cannot build terrain: {}", e);
		}
		let heights = HeightField::generate(&config.dimensions, &config.noise);
		Terrain::from_height_field(config, heights)
	}
	/// Build a terrain around an existing [HeightField]. The noise settings of `config` are ignored
	pub fn from_height_field(config: TerrainConfig, heights: HeightField) -> Self {
		if let Err(e) = config.validate() {
			panic!("Cannot build terrain: {}", e);
		}
		if heights.get_dimension() != config.dimensions.get_grid_dimension() {
			panic!(
				"Height field of {} cells per side does not match a world of {} cells per side",
				heights.get_dimension(),
				config.dimensions.get_grid_dimension()
			);
		}
		let water_level = config.water_level;
		let distance_to_water = DistanceField::calculate(&heights, |h| h <= water_level);
		let distance_to_ground = DistanceField::calculate(&heights, |h| h > water_level);
		debug!(
			"Built terrain of {} world units at {} cells per unit",
			config.dimensions.get_size(),
			config.dimensions.get_resolution()
		);
		Terrain {
			config,
			heights,
			distance_to_water,
			distance_to_ground,
		}
	}
	/// Parameters the terrain was built from
	pub fn get_config(&self) -> &TerrainConfig {
		&self.config
	}
	/// Size of the world
	pub fn get_dimensions(&self) -> &WorldDimensions {
		&self.config.dimensions
	}
	/// Size, centre and bounding rectangle of the world
	pub fn get_world_extent(&self) -> WorldExtent {
		self.config.dimensions.get_world_extent()
	}
	/// Get a reference to the [HeightField]
	pub fn get_height_field(&self) -> &HeightField {
		&self.heights
	}
	/// Get a reference to the distance-to-water [DistanceField]
	pub fn get_distance_to_water_field(&self) -> &DistanceField {
		&self.distance_to_water
	}
	/// Get a reference to the distance-to-ground [DistanceField]
	pub fn get_distance_to_ground_field(&self) -> &DistanceField {
		&self.distance_to_ground
	}
	/// Height at a world position, `f32::MAX` outside of the world
	pub fn get_height(&self, position: Vec2) -> f32 {
		self.sample(&self.heights, position)
	}
	/// Distance in grid cells from a world position to the nearest water, `f32::MAX` outside of the world
	pub fn get_distance_to_water(&self, position: Vec2) -> f32 {
		self.sample(&self.distance_to_water, position)
	}
	/// Distance in grid cells from a world position to the nearest ground, `f32::MAX` outside of the world
	pub fn get_distance_to_ground(&self, position: Vec2) -> f32 {
		self.sample(&self.distance_to_ground, position)
	}
	/// Whether a height counts as water
	pub fn is_water_height(&self, height: f32) -> bool {
		height <= self.config.water_level
	}
	/// Whether a world position is water. Everything outside of the world is treated as impassable
	pub fn is_water(&self, position: Vec2) -> bool {
		self.is_water_height(self.get_height(position))
	}
	/// Whether a world position is ground
	pub fn is_ground(&self, position: Vec2) -> bool {
		!self.is_water(position)
	}
	/// Whether a grid cell is water
	pub fn is_water_cell(&self, grid_cell: GridCell) -> bool {
		self.is_water_height(self.heights.get_grid_value(grid_cell))
	}
	/// Plan a route across water using the scratch storage of `planner`
	pub fn find_path(&self, planner: &mut RoutePlanner, start: Vec2, end: Vec2) -> Path {
		planner.find_path(self, start, end)
	}
	/// Read a field at a world position
	fn sample(&self, field: &impl Field<f32>, position: Vec2) -> f32 {
		match self.config.dimensions.world_to_grid(position) {
			Some(cell) => field.get_grid_value(cell),
			None => f32::MAX,
		}
	}
}

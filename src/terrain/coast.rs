//! Picks sites along the coast, such as locations for ports
//!
//! The world is split into square quadrants. Within each quadrant every
//! integer world position whose distance to water lies inside a band is a
//! candidate, and one candidate per quadrant is chosen at random:
//!
//! ```text
//!  ___________________
//! |         |         |
//! |  ~~~xx  |    ~~   |   ~ water
//! |  ~~~x   |   ~~x   |   x candidate
//! |_________|_________|
//! |         |         |
//! | xx~~~   |         |   a quadrant without coast yields no site
//! |_________|_________|
//! ```
//!

use crate::prelude::*;
use bevy::prelude::*;
use rand::Rng;

/// Where coastal sites may be placed
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
#[derive(Debug, Clone, Copy, PartialEq, Reflect)]
pub struct CoastalSiteSettings {
	/// Side length of a quadrant in world units
	pub quadrant_size: u32,
	/// Smallest allowed distance to water in grid cells
	pub min_distance: f32,
	/// Largest allowed distance to water in grid cells
	pub max_distance: f32,
}

impl Default for CoastalSiteSettings {
	fn default() -> Self {
		CoastalSiteSettings {
			quadrant_size: 40,
			min_distance: 2.0,
			max_distance: 5.0,
		}
	}
}

/// Every integer world position of the quadrant starting at `origin` whose distance to water lies within the band of `settings`
pub fn get_coastal_candidates(
	terrain: &Terrain,
	origin: UVec2,
	settings: &CoastalSiteSettings,
) -> Vec<Vec2> {
	let mut candidates = Vec::new();
	for y in origin.y..origin.y + settings.quadrant_size {
		for x in origin.x..origin.x + settings.quadrant_size {
			let position = Vec2::new(x as f32, y as f32);
			let distance = terrain.get_distance_to_water(position);
			if distance >= settings.min_distance && distance <= settings.max_distance {
				candidates.push(position);
			}
		}
	}
	candidates
}

/// Choose at most one coastal site per quadrant of the world
pub fn find_coastal_sites(
	terrain: &Terrain,
	settings: &CoastalSiteSettings,
	rng: &mut impl Rng,
) -> Vec<Vec2> {
	if settings.quadrant_size == 0 {
		panic!("Coastal site quadrants must be at least one world unit wide");
	}
	let size = terrain.get_dimensions().get_size();
	let mut sites = Vec::new();
	for y0 in (0..size).step_by(settings.quadrant_size as usize) {
		for x0 in (0..size).step_by(settings.quadrant_size as usize) {
			let candidates = get_coastal_candidates(terrain, UVec2::new(x0, y0), settings);
			if candidates.is_empty() {
				continue;
			}
			sites.push(candidates[rng.random_range(0..candidates.len())]);
		}
	}
	debug!("Found {} coastal sites", sites.len());
	sites
}

#[cfg(test)]
mod tests {
	use super::*;
	use rand::{rngs::StdRng, SeedableRng};
	/// 20 world units at resolution 1, land on the eastern half
	fn half_land() -> Terrain {
		let config = TerrainConfig {
			dimensions: WorldDimensions::new(20, 1),
			..default()
		};
		let heights = HeightField::from_fn(20, |cell| if cell.get_column() >= 10 { 0.9 } else { 0.1 });
		Terrain::from_height_field(config, heights)
	}
	#[test]
	fn candidates_lie_in_band() {
		let terrain = half_land();
		let settings = CoastalSiteSettings {
			quadrant_size: 20,
			..default()
		};
		let result = get_coastal_candidates(&terrain, UVec2::ZERO, &settings);
		// columns 10 to 14 sit 1 to 5 cells from the water, only 11 to 14 are in the band
		assert_eq!(4 * 20, result.len());
		for position in result.iter() {
			assert!((11.0..=14.0).contains(&position.x));
		}
	}
	#[test]
	fn one_site_per_coastal_quadrant() {
		let terrain = half_land();
		let settings = CoastalSiteSettings {
			quadrant_size: 10,
			..default()
		};
		let mut rng = StdRng::seed_from_u64(3);
		let result = find_coastal_sites(&terrain, &settings, &mut rng);
		// only the two eastern quadrants touch the coast band
		assert_eq!(2, result.len());
		for site in result.iter() {
			let distance = terrain.get_distance_to_water(*site);
			assert!((2.0..=5.0).contains(&distance));
		}
	}
	#[test]
	fn sites_are_deterministic_for_a_seed() {
		let terrain = half_land();
		let settings = CoastalSiteSettings::default();
		let a = find_coastal_sites(&terrain, &settings, &mut StdRng::seed_from_u64(9));
		let b = find_coastal_sites(&terrain, &settings, &mut StdRng::seed_from_u64(9));
		assert_eq!(a, b);
		assert_eq!(1, a.len());
	}
	#[test]
	fn all_water_has_no_sites() {
		let config = TerrainConfig {
			dimensions: WorldDimensions::new(20, 1),
			..default()
		};
		let terrain = Terrain::from_height_field(config, HeightField::from_fn(20, |_| 0.1));
		let mut rng = StdRng::seed_from_u64(1);
		let result = find_coastal_sites(&terrain, &CoastalSiteSettings::default(), &mut rng);
		assert!(result.is_empty());
	}
}

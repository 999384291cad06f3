//! Decouples simulation ticks from the frame rate
//!
//! Frame time is accumulated and paid out in whole ticks of a fixed `dt`.
//! A long frame would otherwise demand a burst of ticks that makes the next
//! frame longer still, so at most `max_ticks_per_frame` are granted and any
//! backlog beyond that is dropped.
//!

use bevy::prelude::*;

/// Accumulates elapsed frame time and grants fixed length simulation ticks
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
#[derive(Resource, Debug, Clone, Copy, PartialEq, Reflect)]
#[reflect(Resource)]
pub struct FixedStepScheduler {
	/// Length of a tick in seconds
	dt: f32,
	/// Upper bound on ticks granted for a single frame
	max_ticks_per_frame: u32,
	/// Time not yet paid out as ticks
	accumulator: f32,
}

impl Default for FixedStepScheduler {
	fn default() -> Self {
		FixedStepScheduler::new(1.0 / 60.0, 8)
	}
}

impl FixedStepScheduler {
	/// Create a new instance of [FixedStepScheduler]
	pub fn new(dt: f32, max_ticks_per_frame: u32) -> Self {
		if !(dt > 0.0 && dt.is_finite()) {
			panic!("Fixed timestep must be a positive number of seconds, got {}", dt);
		}
		if max_ticks_per_frame == 0 {
			panic!("Scheduler must allow at least one tick per frame");
		}
		FixedStepScheduler {
			dt,
			max_ticks_per_frame,
			accumulator: 0.0,
		}
	}
	/// Length of a tick in seconds
	pub fn get_dt(&self) -> f32 {
		self.dt
	}
	/// Upper bound on ticks granted for a single frame
	pub fn get_max_ticks_per_frame(&self) -> u32 {
		self.max_ticks_per_frame
	}
	/// Time carried over to the next frame
	pub fn get_accumulator(&self) -> f32 {
		self.accumulator
	}
	/// Add `elapsed` seconds of frame time and return how many ticks should run now
	pub fn advance(&mut self, elapsed: f32) -> u32 {
		if elapsed.is_finite() && elapsed > 0.0 {
			self.accumulator += elapsed;
		}
		let mut ticks = 0;
		while self.accumulator >= self.dt && ticks < self.max_ticks_per_frame {
			self.accumulator -= self.dt;
			ticks += 1;
		}
		if self.accumulator >= self.dt {
			warn!(
				"Simulation fell behind, dropping {:.3}s of backlog",
				self.accumulator
			);
			self.accumulator %= self.dt;
		}
		trace!("Granting {} simulation ticks", ticks);
		ticks
	}
}

//! This is a plugin for Bevy game engine to generate a world of sea and land and sail vessels across it
//!
//! The world is a square heightfield synthesised from fractal noise. Cells at
//! or below a water level are sea, the rest is land. From the heights two
//! distance fields are derived, distance to the nearest water and distance to
//! the nearest ground, which feed an A* route planner that keeps to open
//! water. Vessels are simple kinematic bodies integrated on a fixed timestep
//! that cannot sail onto land.
//!
//! ```text
//!  heights ──> distance to water ──> coastal sites
//!     │
//!     └──────> distance to ground ──> route planner ──> path follower
//!                                                            │
//!  water query <──────────────── kinematic body <────── helm ┘
//! ```
//!
//! Add [plugin::SeaLanesPlugin] to an app, spawn a [bundle::VesselBundle] and
//! send [plugin::route_layer::EventPathRequest]s to route it.
//!

pub mod bundle;
pub mod helm;
pub mod kinematics;
pub mod plugin;
pub mod terrain;

pub mod prelude;

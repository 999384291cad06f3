//! `use bevy_sea_lanes_plugin::prelude::*;` to import common structures and methods
//!

#[doc(hidden)]
pub use crate::terrain::{
	coast::*,
	dimensions::*,
	fields::{distance_field::*, height_field::*, *},
	route::*,
	utilities::*,
	*,
};

#[doc(hidden)]
pub use crate::kinematics::{scheduler::*, *};

#[doc(hidden)]
pub use crate::{
	bundle::*,
	helm::*,
	plugin::{motion_layer::*, route_layer::*, *},
};

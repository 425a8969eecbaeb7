#![no_std]
extern crate alloc;

pub mod occupancy;
pub mod plane;

pub use occupancy::OccupancySet;
pub use plane::{PlaneCell, TracePlane};

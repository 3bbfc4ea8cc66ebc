#![forbid(unsafe_code)]

pub mod ransac_plane;
pub mod support_plane;

pub use ransac_plane::{ransac_plane_seeded, PlaneModel};
pub use support_plane::{remove_support_plane, PlaneParams, PlaneRemoval};

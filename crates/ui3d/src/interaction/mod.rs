//! 3D UI Interaction System
//!
//! Raycasting against flat scene elements for pointer picking.

pub mod raycaster;

pub use raycaster::{raycast_flat_quad, UIRaycastHit};

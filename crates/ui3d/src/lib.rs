//! 3D UI scene layer for postboard
//!
//! This crate provides the scene elements a board is built from and the seam to
//! the mixed-reality host that displays them. UI elements live in world space
//! and are picked by raycasting.
//!
//! # Features
//!
//! - **Components**: Panels, text blocks, buttons and grouping nodes
//! - **Scene graph**: Parenting, recursive destroy, visibility inheritance
//! - **Host seam**: [`SceneHost`], implemented in memory by [`Scene`]
//! - **Picking**: Ray hits against flat panels and text extents
//!
//! # Example
//!
//! ```rust
//! use postboard_ui3d::{Actor3D, ActorBody, Panel3D, Scene, SceneHost, UserId};
//! use glam::Vec3;
//!
//! let mut scene = Scene::new();
//! let note = scene.create_actor(Actor3D::new(
//!     "note",
//!     ActorBody::Panel(Panel3D::new(Vec3::ZERO, 0.3, 0.3)),
//! ));
//! scene.register_click(note);
//!
//! let click = scene.click_at(Vec3::new(0.0, 0.0, 1.0), Vec3::NEG_Z, &UserId::new("alice"));
//! assert_eq!(click.map(|event| event.actor), Some(note));
//! ```

pub mod components;
pub mod interaction;
pub mod scene;

// Re-export commonly used types
pub use components::{
    Button3D, Group3D, Panel3D, Text3D, TextAnchor, Transform3D, UIComponent,
    BUTTON_DEFAULT_COLOR,
};
pub use interaction::{raycast_flat_quad, UIRaycastHit};
pub use scene::{
    Actor3D, ActorBody, ActorId, ClickEvent, Scene, SceneHost, SharedScene, UserId,
    MESSAGE_HISTORY,
};

//! 3D UI Components
//!
//! This module contains the component types an actor can carry in the scene.

pub mod button;
pub mod group;
pub mod panel;
pub mod text3d;

pub use button::{Button3D, BUTTON_DEFAULT_COLOR};
pub use group::Group3D;
pub use panel::Panel3D;
pub use text3d::{Text3D, TextAnchor};

use glam::{Vec2, Vec3};

/// Base trait for all 3D UI components
pub trait UIComponent {
    /// Local transform of this component (relative to its parent actor)
    fn transform(&self) -> &Transform3D;

    /// Mutable access to the local transform
    fn transform_mut(&mut self) -> &mut Transform3D;

    /// Local position of this component
    fn position(&self) -> Vec3 {
        self.transform().position
    }

    /// Check if this component is visible
    fn is_visible(&self) -> bool;

    /// Set visibility
    fn set_visible(&mut self, visible: bool);

    /// Clickable extents on the local XY plane, as `(min, max)` offsets from
    /// the component position with scale already applied.
    ///
    /// `None` means the component has no surface to hit.
    fn extents(&self) -> Option<(Vec2, Vec2)> {
        None
    }
}

/// Transform in 3D space
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform3D {
    pub position: Vec3,
    pub scale: Vec3,
}

impl Default for Transform3D {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            scale: Vec3::ONE,
        }
    }
}

impl Transform3D {
    pub fn new(position: Vec3) -> Self {
        Self {
            position,
            ..Default::default()
        }
    }
}

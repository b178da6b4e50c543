//! Clickable control with a caption

use super::{Transform3D, UIComponent};
use glam::{Vec2, Vec3};

/// Resting color of a control that has not been recolored.
pub const BUTTON_DEFAULT_COLOR: [f32; 4] = [0.8, 0.8, 0.8, 1.0];

/// A flat box the host draws with a caption; its color is the indicator
/// material that `SceneHost::set_color` changes.
#[derive(Debug, Clone)]
pub struct Button3D {
    pub transform: Transform3D,
    /// Caption shown on the box
    pub text: String,
    pub color: [f32; 4],
    /// Width and height before scaling
    pub size: (f32, f32),
    pub visible: bool,
}

impl Button3D {
    pub fn new(position: Vec3, text: impl Into<String>) -> Self {
        Self {
            transform: Transform3D::new(position),
            text: text.into(),
            color: BUTTON_DEFAULT_COLOR,
            size: (0.25, 0.25),
            visible: true,
        }
    }

    pub fn with_size(mut self, width: f32, height: f32) -> Self {
        self.size = (width, height);
        self
    }

    pub fn with_color(mut self, color: [f32; 4]) -> Self {
        self.color = color;
        self
    }
}

impl UIComponent for Button3D {
    fn transform(&self) -> &Transform3D {
        &self.transform
    }

    fn transform_mut(&mut self) -> &mut Transform3D {
        &mut self.transform
    }

    fn is_visible(&self) -> bool {
        self.visible
    }

    fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
    }

    fn extents(&self) -> Option<(Vec2, Vec2)> {
        let half = Vec2::new(
            (self.size.0 * self.transform.scale.x).abs() * 0.5,
            (self.size.1 * self.transform.scale.y).abs() * 0.5,
        );
        Some((-half, half))
    }
}

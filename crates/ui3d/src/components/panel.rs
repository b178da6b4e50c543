//! 3D Panel Component - Flat colored quad (note backgrounds, board background)

use super::{Transform3D, UIComponent};
use glam::{Vec2, Vec3};

/// 3D Panel - A flat quad in the actor's local XY plane
///
/// The quad is `size` wide and tall before the transform scale is applied and
/// is centered on the transform position.
#[derive(Debug, Clone)]
pub struct Panel3D {
    /// Panel transform (position, scale)
    pub transform: Transform3D,

    /// Panel size (width, height) before scaling
    pub size: (f32, f32),

    /// Background color (material tint)
    pub color: [f32; 4],

    /// Texture asset name applied on top of the color, if any
    pub texture: Option<String>,

    /// Whether the panel is visible
    pub visible: bool,
}

impl Default for Panel3D {
    fn default() -> Self {
        Self {
            transform: Transform3D::default(),
            size: (1.0, 1.0),
            color: [0.1, 0.1, 0.1, 0.8], // Dark semi-transparent
            texture: None,
            visible: true,
        }
    }
}

impl Panel3D {
    /// Create a new 3D panel
    pub fn new(position: Vec3, width: f32, height: f32) -> Self {
        Self {
            transform: Transform3D::new(position),
            size: (width, height),
            ..Default::default()
        }
    }

    /// Builder: Set background color
    pub fn with_color(mut self, color: [f32; 4]) -> Self {
        self.color = color;
        self
    }

    /// Builder: Set texture asset
    pub fn with_texture(mut self, texture: impl Into<String>) -> Self {
        self.texture = Some(texture.into());
        self
    }

    /// Builder: Set scale
    pub fn with_scale(mut self, scale: Vec3) -> Self {
        self.transform.scale = scale;
        self
    }

    /// Builder: Set visibility
    pub fn with_visible(mut self, visible: bool) -> Self {
        self.visible = visible;
        self
    }

    /// Size after applying the transform scale
    pub fn scaled_size(&self) -> (f32, f32) {
        (
            self.size.0 * self.transform.scale.x,
            self.size.1 * self.transform.scale.y,
        )
    }
}

impl UIComponent for Panel3D {
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
        let (width, height) = self.scaled_size();
        let half = Vec2::new(width.abs() * 0.5, height.abs() * 0.5);
        Some((-half, half))
    }
}

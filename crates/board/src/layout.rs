//! Canvas pixels to scene units.
//!
//! Remote posts are placed on a pixel canvas whose origin is the top-left
//! corner with y growing downward. The board container sits at that origin in
//! the scene, with y growing upward, so every y flips sign.

use crate::color::{parse_hex_color, FALLBACK_NOTE_COLOR};
use crate::post::{PixelVec, PostKind, PostRecord};
use glam::{Vec2, Vec3};
use serde::{Deserialize, Serialize};
use tracing::warn;

/// Depth of post elements in front of the board background.
pub const POST_Z: f32 = -0.01;

/// Board geometry and styling defaults.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct LayoutConfig {
    /// Canvas pixels per scene unit.
    pub canvas_resolution: f32,
    /// Canvas width and height in pixels.
    pub canvas_size: [f32; 2],
    /// Size used for postits that arrive without one.
    pub default_post_size: [f32; 2],
    /// Uniform scale of bare text posts.
    pub text_scale: f32,
    /// Note color used when a record's color does not parse.
    pub default_color: String,
    /// Texture asset laid over postit panels.
    pub postit_texture: String,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            canvas_resolution: 1000.0,
            canvas_size: [1500.0, 1000.0],
            default_post_size: [300.0, 300.0],
            text_scale: 0.1,
            default_color: "#FFF59D".to_string(),
            postit_texture: "postit".to_string(),
        }
    }
}

/// Where a post lands in container space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PostTransform {
    pub position: Vec3,
    pub scale: Vec3,
}

impl LayoutConfig {
    /// Board extent in scene units.
    pub fn board_size(&self) -> Vec2 {
        Vec2::new(
            self.canvas_size[0] / self.canvas_resolution,
            self.canvas_size[1] / self.canvas_resolution,
        )
    }

    /// A postit is centered on its panel: the pixel position is the top-left corner.
    pub fn postit_transform(&self, position: PixelVec, size: PixelVec) -> PostTransform {
        let r = self.canvas_resolution;
        let sx = size.x / r;
        let sy = size.y / r;
        PostTransform {
            position: Vec3::new(position.x / r + sx / 2.0, -position.y / r - sy / 2.0, POST_Z),
            scale: Vec3::new(sx, sy, 1.0),
        }
    }

    /// Bare text is anchored at its pixel position and always uses `text_scale`.
    pub fn text_transform(&self, position: PixelVec) -> PostTransform {
        let r = self.canvas_resolution;
        PostTransform {
            position: Vec3::new(position.x / r, -position.y / r, POST_Z),
            scale: Vec3::splat(self.text_scale),
        }
    }

    /// Layout for a record, or `None` for kinds the board does not draw.
    pub fn transform_for(&self, record: &PostRecord) -> Option<PostTransform> {
        match record.kind {
            PostKind::Postit => {
                let size = record.size.unwrap_or(PixelVec::new(
                    self.default_post_size[0],
                    self.default_post_size[1],
                ));
                Some(self.postit_transform(record.position, size))
            }
            PostKind::Text => Some(self.text_transform(record.position)),
            PostKind::Unknown => None,
        }
    }

    /// Parsed `default_color`, or the built-in fallback if it is malformed.
    pub fn default_note_color(&self) -> [f32; 4] {
        parse_hex_color(&self.default_color).unwrap_or_else(|err| {
            warn!(%err, "Configured default color is invalid; using built-in fallback");
            FALLBACK_NOTE_COLOR
        })
    }
}

//! 3D Text Component

use super::{Transform3D, UIComponent};
use glam::{Vec2, Vec3};

/// Horizontal advance of one glyph, as a fraction of the font height.
///
/// Layout here is approximate: hosts measure real glyphs, the scene only needs
/// extents good enough for picking and wrapping.
pub const GLYPH_ADVANCE: f32 = 0.5;

/// Text rendering in 3D world space
#[derive(Debug, Clone)]
pub struct Text3D {
    /// Local transform of the text anchor point
    pub transform: Transform3D,

    /// Text content
    pub text: String,

    /// Line height in local units (before scale)
    pub font_size: f32,

    /// Text color (RGBA)
    pub color: [f32; 4],

    /// Whether the text is visible
    pub visible: bool,

    /// Which point of the text block sits on the transform position
    pub anchor: TextAnchor,

    /// Maximum width before wrapping, in local units (0 = no wrap)
    pub max_width: f32,

    /// Line spacing multiplier
    pub line_spacing: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextAnchor {
    TopLeft,
    TopCenter,
    TopRight,
    MiddleLeft,
    MiddleCenter,
    MiddleRight,
    BottomLeft,
    BottomCenter,
    BottomRight,
}

impl Default for Text3D {
    fn default() -> Self {
        Self {
            transform: Transform3D::default(),
            text: String::new(),
            font_size: 1.0,
            color: [1.0, 1.0, 1.0, 1.0],
            visible: true,
            anchor: TextAnchor::MiddleCenter,
            max_width: 0.0,
            line_spacing: 1.2,
        }
    }
}

impl Text3D {
    /// Create a new Text3D component
    pub fn new(position: Vec3, text: impl Into<String>) -> Self {
        Self {
            transform: Transform3D::new(position),
            text: text.into(),
            ..Default::default()
        }
    }

    /// Builder: Set font size
    pub fn with_font_size(mut self, size: f32) -> Self {
        self.font_size = size;
        self
    }

    /// Builder: Set color
    pub fn with_color(mut self, color: [f32; 4]) -> Self {
        self.color = color;
        self
    }

    /// Builder: Set anchor
    pub fn with_anchor(mut self, anchor: TextAnchor) -> Self {
        self.anchor = anchor;
        self
    }

    /// Builder: Set max width for wrapping
    pub fn with_max_width(mut self, width: f32) -> Self {
        self.max_width = width;
        self
    }

    /// Builder: Set scale
    pub fn with_scale(mut self, scale: Vec3) -> Self {
        self.transform.scale = scale;
        self
    }

    /// Get a reference to the text
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Split the text into lines, greedily wrapping words at `max_width`.
    pub fn wrapped_lines(&self) -> Vec<String> {
        let advance = self.font_size * GLYPH_ADVANCE;
        let max_chars = if self.max_width > 0.0 && advance > 0.0 {
            ((self.max_width / advance).floor() as usize).max(1)
        } else {
            usize::MAX
        };

        let mut lines = Vec::new();
        for paragraph in self.text.split('\n') {
            let mut line = String::new();
            for word in paragraph.split_whitespace() {
                let line_len = line.chars().count();
                let word_len = word.chars().count();
                if line_len > 0 && line_len + 1 + word_len > max_chars {
                    lines.push(std::mem::take(&mut line));
                }
                if !line.is_empty() {
                    line.push(' ');
                }
                line.push_str(word);
            }
            lines.push(line);
        }
        lines
    }

    /// Width and height of the laid out block in local units (before scale).
    pub fn block_size(&self) -> (f32, f32) {
        let lines = self.wrapped_lines();
        let widest = lines.iter().map(|l| l.chars().count()).max().unwrap_or(0);
        let width = widest as f32 * self.font_size * GLYPH_ADVANCE;
        let height = lines.len() as f32 * self.font_size * self.line_spacing;
        (width, height)
    }
}

impl UIComponent for Text3D {
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
        let (width, height) = self.block_size();
        let width = width * self.transform.scale.x.abs();
        let height = height * self.transform.scale.y.abs();

        let x = match self.anchor {
            TextAnchor::TopLeft | TextAnchor::MiddleLeft | TextAnchor::BottomLeft => (0.0, width),
            TextAnchor::TopCenter | TextAnchor::MiddleCenter | TextAnchor::BottomCenter => {
                (-width * 0.5, width * 0.5)
            }
            TextAnchor::TopRight | TextAnchor::MiddleRight | TextAnchor::BottomRight => {
                (-width, 0.0)
            }
        };
        let y = match self.anchor {
            TextAnchor::TopLeft | TextAnchor::TopCenter | TextAnchor::TopRight => (-height, 0.0),
            TextAnchor::MiddleLeft | TextAnchor::MiddleCenter | TextAnchor::MiddleRight => {
                (-height * 0.5, height * 0.5)
            }
            TextAnchor::BottomLeft | TextAnchor::BottomCenter | TextAnchor::BottomRight => {
                (0.0, height)
            }
        };

        Some((Vec2::new(x.0, y.0), Vec2::new(x.1, y.1)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text3d_creation() {
        let text = Text3D::new(Vec3::new(0.0, 10.0, 0.0), "Hello, World!");
        assert_eq!(text.text(), "Hello, World!");
        assert_eq!(text.position(), Vec3::new(0.0, 10.0, 0.0));
        assert!(text.is_visible());
    }

    #[test]
    fn test_text3d_builder() {
        let text = Text3D::new(Vec3::ZERO, "Test")
            .with_font_size(2.0)
            .with_color([1.0, 0.0, 0.0, 1.0])
            .with_anchor(TextAnchor::TopLeft);

        assert_eq!(text.font_size, 2.0);
        assert_eq!(text.color, [1.0, 0.0, 0.0, 1.0]);
        assert_eq!(text.anchor, TextAnchor::TopLeft);
    }

    #[test]
    fn wrapping_breaks_on_words() {
        // advance = 0.5 per glyph, so 4.0 fits 8 characters per line
        let text = Text3D::new(Vec3::ZERO, "buy milk and eggs").with_max_width(4.0);
        assert_eq!(text.wrapped_lines(), vec!["buy milk", "and eggs"]);
    }

    #[test]
    fn explicit_newlines_are_kept() {
        let text = Text3D::new(Vec3::ZERO, "first\nsecond");
        assert_eq!(text.wrapped_lines(), vec!["first", "second"]);
    }

    #[test]
    fn top_left_extents_grow_right_and_down() {
        let text = Text3D::new(Vec3::ZERO, "abcd")
            .with_anchor(TextAnchor::TopLeft)
            .with_scale(Vec3::splat(0.5));
        let (min, max) = text.extents().expect("text has extents");

        // 4 glyphs * 0.5 advance * 0.5 scale
        assert!((max.x - 1.0).abs() < 1e-6);
        assert_eq!(min.x, 0.0);
        assert_eq!(max.y, 0.0);
        assert!((min.y + 0.6).abs() < 1e-6);
    }
}

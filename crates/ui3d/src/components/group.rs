//! Grouping node with no visual of its own

use super::{Transform3D, UIComponent};
use glam::Vec3;

/// An empty actor used to parent other actors (the board container, for one)
#[derive(Debug, Clone)]
pub struct Group3D {
    pub transform: Transform3D,
    pub visible: bool,
}

impl Group3D {
    pub fn new(position: Vec3) -> Self {
        Self {
            transform: Transform3D::new(position),
            visible: true,
        }
    }
}

impl UIComponent for Group3D {
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
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn group_has_no_extents() {
        let group = Group3D::new(Vec3::new(1.0, 2.0, 3.0));
        assert!(group.is_visible());
        assert_eq!(group.position(), Vec3::new(1.0, 2.0, 3.0));
        assert!(group.extents().is_none());
    }
}

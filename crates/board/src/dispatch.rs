//! Post-type dispatch: one record in, one scene element out.

use crate::color::parse_hex_color;
use crate::layout::LayoutConfig;
use crate::post::{PostKind, PostRecord};
use glam::Vec3;
use postboard_ui3d::{Actor3D, ActorBody, ActorId, Panel3D, SceneHost, Text3D, TextAnchor};
use tracing::{debug, warn};

/// Line height of the label on a postit, before `text_scale`.
pub const POSTIT_FONT_SIZE: f32 = 0.3;
/// Line height of bare text posts, before `text_scale`.
pub const TEXT_FONT_SIZE: f32 = 0.5;
/// Inset of a postit label from the panel's top-left corner, in scene units.
pub const POSTIT_LABEL_INSET: f32 = 0.015;
/// Label depth relative to its panel.
pub const POSTIT_LABEL_Z: f32 = -0.005;

const POSTIT_LABEL_COLOR: [f32; 4] = [0.0, 0.0, 0.0, 1.0];

/// A post element that now exists in the scene.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedPost {
    /// Root actor of the element; the click listener is registered on it.
    pub actor: ActorId,
    /// Overlaid label, for postits.
    pub label: Option<ActorId>,
}

/// Build the scene element for `record` under `container`.
///
/// Returns `None` (and creates nothing) for kinds the board does not draw.
pub fn render_post<H: SceneHost + ?Sized>(
    host: &mut H,
    container: ActorId,
    record: &PostRecord,
    layout: &LayoutConfig,
) -> Option<RenderedPost> {
    let Some(transform) = layout.transform_for(record) else {
        debug!(post = %record.id, "Skipping post with unsupported type");
        return None;
    };
    let color = record_color(record, layout);

    let rendered = match record.kind {
        PostKind::Postit => {
            let panel = Panel3D::new(transform.position, 1.0, 1.0)
                .with_scale(transform.scale)
                .with_color(color)
                .with_texture(layout.postit_texture.clone());
            let actor = host.create_actor(
                Actor3D::new(record.id.clone(), ActorBody::Panel(panel)).with_parent(container),
            );

            let (width, height) = (transform.scale.x, transform.scale.y);
            let label_position = Vec3::new(
                -width / 2.0 + POSTIT_LABEL_INSET,
                height / 2.0 - POSTIT_LABEL_INSET,
                POSTIT_LABEL_Z,
            );
            let wrap_width = ((width - 2.0 * POSTIT_LABEL_INSET) / layout.text_scale).max(0.0);
            let label = Text3D::new(label_position, record.text.clone())
                .with_font_size(POSTIT_FONT_SIZE)
                .with_anchor(TextAnchor::TopLeft)
                .with_color(POSTIT_LABEL_COLOR)
                .with_max_width(wrap_width)
                .with_scale(Vec3::splat(layout.text_scale));
            let label = host
                .create_actor(Actor3D::new("label", ActorBody::Text(label)).with_parent(actor));

            RenderedPost {
                actor,
                label: Some(label),
            }
        }
        PostKind::Text => {
            let text = Text3D::new(transform.position, record.text.clone())
                .with_font_size(TEXT_FONT_SIZE)
                .with_anchor(TextAnchor::TopLeft)
                .with_color(color)
                .with_scale(transform.scale);
            let actor = host.create_actor(
                Actor3D::new(record.id.clone(), ActorBody::Text(text)).with_parent(container),
            );
            RenderedPost { actor, label: None }
        }
        PostKind::Unknown => return None,
    };

    host.register_click(rendered.actor);
    Some(rendered)
}

fn record_color(record: &PostRecord, layout: &LayoutConfig) -> [f32; 4] {
    parse_hex_color(&record.color).unwrap_or_else(|err| {
        warn!(post = %record.id, %err, "Using default note color");
        layout.default_note_color()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::post::PixelVec;
    use postboard_ui3d::{Group3D, Scene, UIComponent};

    fn post(id: &str, kind: PostKind, color: &str) -> PostRecord {
        PostRecord {
            id: id.into(),
            text: format!("text of {id}"),
            description: None,
            kind,
            color: color.into(),
            position: PixelVec::new(100.0, 200.0),
            size: Some(PixelVec::new(300.0, 300.0)),
        }
    }

    fn scene_with_container() -> (Scene, ActorId) {
        let mut scene = Scene::new();
        let container = scene.create_actor(Actor3D::new(
            "Container",
            ActorBody::Group(Group3D::new(Vec3::ZERO)),
        ));
        (scene, container)
    }

    #[test]
    fn postit_builds_panel_with_label() {
        let (mut scene, container) = scene_with_container();
        let layout = LayoutConfig::default();
        let record = post("n1", PostKind::Postit, "#FF0000");
        let rendered =
            render_post(&mut scene, container, &record, &layout).expect("postit is drawn");

        assert!(scene.is_clickable(rendered.actor));
        assert_eq!(scene.children(container), &[rendered.actor]);

        let panel = match &scene.actor(rendered.actor).expect("panel exists").body {
            ActorBody::Panel(panel) => panel.clone(),
            other => panic!("expected a panel, got {other:?}"),
        };
        assert_eq!(panel.color, [1.0, 0.0, 0.0, 1.0]);
        assert_eq!(panel.texture.as_deref(), Some("postit"));
        assert!((panel.position().x - 0.25).abs() < 1e-6);
        assert!((panel.position().y + 0.35).abs() < 1e-6);

        let label_id = rendered.label.expect("postits have labels");
        assert_eq!(scene.children(rendered.actor), &[label_id]);
        assert!(!scene.is_clickable(label_id));
        let label = match &scene.actor(label_id).expect("label exists").body {
            ActorBody::Text(text) => text.clone(),
            other => panic!("expected text, got {other:?}"),
        };
        assert_eq!(label.text(), "text of n1");
        assert_eq!(label.anchor, TextAnchor::TopLeft);
        assert_eq!(label.font_size, POSTIT_FONT_SIZE);
        assert_eq!(label.color, POSTIT_LABEL_COLOR);

        // Label sits at the panel's inset top-left corner in world space
        let world = scene.world_position(label_id).expect("label placed");
        assert!((world.x - (0.1 + POSTIT_LABEL_INSET)).abs() < 1e-6);
        assert!((world.y - (-0.2 - POSTIT_LABEL_INSET)).abs() < 1e-6);
    }

    #[test]
    fn text_uses_record_color_and_fixed_scale() {
        let (mut scene, container) = scene_with_container();
        let layout = LayoutConfig::default();
        let record = post("t1", PostKind::Text, "#0000ff");
        let rendered = render_post(&mut scene, container, &record, &layout).expect("text is drawn");
        assert!(rendered.label.is_none());
        assert!(scene.is_clickable(rendered.actor));

        match &scene.actor(rendered.actor).expect("text exists").body {
            ActorBody::Text(text) => {
                assert_eq!(text.color, [0.0, 0.0, 1.0, 1.0]);
                assert_eq!(text.transform.scale, Vec3::splat(layout.text_scale));
                assert_eq!(text.font_size, TEXT_FONT_SIZE);
            }
            other => panic!("expected text, got {other:?}"),
        }
    }

    #[test]
    fn unknown_kind_creates_nothing() {
        let (mut scene, container) = scene_with_container();
        let before = scene.len();
        let rendered = render_post(
            &mut scene,
            container,
            &post("u1", PostKind::Unknown, "#000000"),
            &LayoutConfig::default(),
        );
        assert!(rendered.is_none());
        assert_eq!(scene.len(), before);
    }

    #[test]
    fn malformed_color_uses_default() {
        let (mut scene, container) = scene_with_container();
        let layout = LayoutConfig {
            default_color: "#00FF00".into(),
            ..Default::default()
        };
        let record = post("c1", PostKind::Postit, "blue");
        let rendered =
            render_post(&mut scene, container, &record, &layout).expect("postit is drawn");
        match &scene.actor(rendered.actor).expect("panel exists").body {
            ActorBody::Panel(panel) => assert_eq!(panel.color, [0.0, 1.0, 0.0, 1.0]),
            other => panic!("expected a panel, got {other:?}"),
        }
    }
}

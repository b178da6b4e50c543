//! Property-based tests for board layout
//!
//! Validates placement invariants:
//! - Postits are centered on their pixel rectangle
//! - Text posts always use the fixed text scale
//! - One element per drawable record
//! - Identical refreshes place identically

use glam::Vec3;
use postboard_board::{BoardController, LayoutConfig, PixelVec, PostKind, PostRecord};
use postboard_ui3d::Scene;
use proptest::prelude::*;

fn kind_strategy() -> impl Strategy<Value = PostKind> {
    prop_oneof![
        Just(PostKind::Postit),
        Just(PostKind::Text),
        Just(PostKind::Unknown),
    ]
}

fn record_strategy() -> impl Strategy<Value = PostRecord> {
    (
        kind_strategy(),
        0.0f32..1500.0,
        0.0f32..1000.0,
        prop::option::of((10.0f32..600.0, 10.0f32..600.0)),
        "[a-z ]{0,24}",
    )
        .prop_map(|(kind, x, y, size, text)| PostRecord {
            id: String::new(),
            text,
            description: None,
            kind,
            color: "#AABBCC".into(),
            position: PixelVec::new(x, y),
            size: size.map(|(w, h)| PixelVec::new(w, h)),
        })
}

fn records_strategy() -> impl Strategy<Value = Vec<PostRecord>> {
    prop::collection::vec(record_strategy(), 0..24).prop_map(|mut records| {
        for (index, record) in records.iter_mut().enumerate() {
            record.id = format!("post-{index}");
        }
        records
    })
}

fn placements(controller: &BoardController<Scene>) -> Vec<(String, Vec3, Vec3)> {
    let scene = controller.host();
    let container = controller.container().expect("board built");
    let mut out: Vec<_> = scene
        .children(container)
        .iter()
        .filter_map(|id| scene.actor(*id))
        .map(|actor| {
            let t = actor.transform();
            (actor.name.clone(), t.position, t.scale)
        })
        .collect();
    out.sort_by(|a, b| a.0.cmp(&b.0));
    out
}

proptest! {
    /// Property: the postit's pixel position is its top-left corner
    #[test]
    fn postit_matches_closed_form(
        px in 0.0f32..2000.0,
        py in 0.0f32..2000.0,
        w in 1.0f32..800.0,
        h in 1.0f32..800.0,
        r in 100.0f32..4000.0,
    ) {
        let layout = LayoutConfig { canvas_resolution: r, ..Default::default() };
        let t = layout.postit_transform(PixelVec::new(px, py), PixelVec::new(w, h));
        let (sx, sy) = (w / r, h / r);
        prop_assert!((t.position.x - (px / r + sx / 2.0)).abs() < 1e-4);
        prop_assert!((t.position.y - (-py / r - sy / 2.0)).abs() < 1e-4);
        prop_assert!((t.scale.x - sx).abs() < 1e-6);
        prop_assert!((t.scale.y - sy).abs() < 1e-6);
        prop_assert_eq!(t.scale.z, 1.0);
    }

    /// Property: text scale ignores any size field
    #[test]
    fn text_scale_is_constant(record in record_strategy()) {
        let layout = LayoutConfig::default();
        let mut record = record;
        record.kind = PostKind::Text;
        let t = layout.transform_for(&record).expect("text is drawn");
        prop_assert_eq!(t.scale, Vec3::splat(layout.text_scale));
    }

    /// Property: element count equals the number of postit and text records
    #[test]
    fn one_element_per_drawable_record(records in records_strategy()) {
        let drawable = records
            .iter()
            .filter(|r| matches!(r.kind, PostKind::Postit | PostKind::Text))
            .count();

        let mut controller = BoardController::new(Scene::new(), LayoutConfig::default());
        let ticket = controller.start();
        controller.complete_refresh(ticket, Ok(records));

        prop_assert_eq!(controller.post_count(), drawable);
        let container = controller.container().expect("board built");
        // background panel plus one element per drawable record
        prop_assert_eq!(controller.host().children(container).len(), drawable + 1);
    }

    /// Property: refreshing with the same list reproduces every placement
    #[test]
    fn identical_refreshes_place_identically(records in records_strategy()) {
        let mut controller = BoardController::new(Scene::new(), LayoutConfig::default());
        let ticket = controller.start();
        controller.complete_refresh(ticket, Ok(records.clone()));
        let first = placements(&controller);

        let ticket = controller.begin_refresh();
        controller.complete_refresh(ticket, Ok(records));
        prop_assert_eq!(first, placements(&controller));
    }
}

//! Scene graph: actors, parenting, click registration and the host seam.
//!
//! [`SceneHost`] is everything a board needs from the mixed-reality runtime.
//! [`Scene`] is an in-memory implementation that keeps the full actor tree so
//! sessions can run headless and be inspected in tests.

use crate::components::{Button3D, Group3D, Panel3D, Text3D, Transform3D, UIComponent};
use crate::interaction::{raycast_flat_quad, UIRaycastHit};
use glam::Vec3;
use std::collections::BTreeMap;
use std::fmt::{self, Write as _};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tracing::{debug, info, warn};

/// Shown messages kept for inspection; older ones are dropped first.
pub const MESSAGE_HISTORY: usize = 256;

/// Opaque handle to an actor in the scene
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ActorId(pub u64);

impl fmt::Display for ActorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Identity of a user in the shared session
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct UserId(pub String);

impl UserId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// What an actor looks like
#[derive(Debug, Clone)]
pub enum ActorBody {
    Group(Group3D),
    Panel(Panel3D),
    Text(Text3D),
    Button(Button3D),
}

impl ActorBody {
    pub fn component(&self) -> &dyn UIComponent {
        match self {
            ActorBody::Group(group) => group,
            ActorBody::Panel(panel) => panel,
            ActorBody::Text(text) => text,
            ActorBody::Button(button) => button,
        }
    }

    pub fn component_mut(&mut self) -> &mut dyn UIComponent {
        match self {
            ActorBody::Group(group) => group,
            ActorBody::Panel(panel) => panel,
            ActorBody::Text(text) => text,
            ActorBody::Button(button) => button,
        }
    }

    fn kind(&self) -> &'static str {
        match self {
            ActorBody::Group(_) => "group",
            ActorBody::Panel(_) => "panel",
            ActorBody::Text(_) => "text",
            ActorBody::Button(_) => "button",
        }
    }
}

/// Creation request for an actor
#[derive(Debug, Clone)]
pub struct Actor3D {
    pub name: String,
    pub parent: Option<ActorId>,
    pub body: ActorBody,
}

impl Actor3D {
    pub fn new(name: impl Into<String>, body: ActorBody) -> Self {
        Self {
            name: name.into(),
            parent: None,
            body,
        }
    }

    /// Builder: Parent this actor under another one
    pub fn with_parent(mut self, parent: ActorId) -> Self {
        self.parent = Some(parent);
        self
    }

    pub fn transform(&self) -> &Transform3D {
        self.body.component().transform()
    }
}

/// A click delivered by the host on a registered actor
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClickEvent {
    pub actor: ActorId,
    pub user: UserId,
}

/// The scene operations a board drives on its host runtime.
pub trait SceneHost {
    /// Create an actor and return its handle.
    fn create_actor(&mut self, actor: Actor3D) -> ActorId;

    /// Destroy an actor and everything parented to it. Unknown handles are ignored.
    fn destroy_actor(&mut self, id: ActorId);

    /// Show or hide an actor (children follow their parent).
    fn set_visible(&mut self, id: ActorId, visible: bool);

    /// Change an actor's material color.
    fn set_color(&mut self, id: ActorId, color: [f32; 4]);

    /// Start delivering clicks on this actor.
    fn register_click(&mut self, id: ActorId);

    /// Show a message to one user.
    fn show_message(&mut self, user: &UserId, message: &str);
}

#[derive(Debug)]
struct SceneNode {
    actor: Actor3D,
    children: Vec<ActorId>,
    clickable: bool,
}

/// In-memory scene graph.
///
/// Children inherit their parent's translation; scale applies to the actor's
/// own body only.
#[derive(Debug, Default)]
pub struct Scene {
    nodes: BTreeMap<ActorId, SceneNode>,
    next_id: u64,
    messages: Vec<(UserId, String)>,
}

impl Scene {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of live actors
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn contains(&self, id: ActorId) -> bool {
        self.nodes.contains_key(&id)
    }

    pub fn actor(&self, id: ActorId) -> Option<&Actor3D> {
        self.nodes.get(&id).map(|node| &node.actor)
    }

    /// Direct children of an actor, in creation order
    pub fn children(&self, id: ActorId) -> &[ActorId] {
        self.nodes
            .get(&id)
            .map(|node| node.children.as_slice())
            .unwrap_or(&[])
    }

    /// Actors without a parent, in creation order
    pub fn roots(&self) -> Vec<ActorId> {
        self.nodes
            .iter()
            .filter(|(_, node)| node.actor.parent.is_none())
            .map(|(id, _)| *id)
            .collect()
    }

    /// All live actors with the given name
    pub fn find_by_name(&self, name: &str) -> Vec<ActorId> {
        self.nodes
            .iter()
            .filter(|(_, node)| node.actor.name == name)
            .map(|(id, _)| *id)
            .collect()
    }

    pub fn is_clickable(&self, id: ActorId) -> bool {
        self.nodes.get(&id).is_some_and(|node| node.clickable)
    }

    /// Position of an actor in world space (parent translations composed)
    pub fn world_position(&self, id: ActorId) -> Option<Vec3> {
        let mut node = self.nodes.get(&id)?;
        let mut position = node.actor.transform().position;
        while let Some(parent) = node.actor.parent {
            node = self.nodes.get(&parent)?;
            position += node.actor.transform().position;
        }
        Some(position)
    }

    /// Whether the actor and every ancestor are visible
    pub fn is_effectively_visible(&self, id: ActorId) -> bool {
        let mut current = Some(id);
        while let Some(id) = current {
            match self.nodes.get(&id) {
                Some(node) if node.actor.body.component().is_visible() => {
                    current = node.actor.parent;
                }
                _ => return false,
            }
        }
        true
    }

    /// The most recent messages shown to users, oldest first (at most
    /// [`MESSAGE_HISTORY`])
    pub fn messages(&self) -> &[(UserId, String)] {
        &self.messages
    }

    /// Drain shown messages
    pub fn take_messages(&mut self) -> Vec<(UserId, String)> {
        std::mem::take(&mut self.messages)
    }

    /// Deliver a click on a specific actor, as a host would after its own hit test.
    ///
    /// Returns `None` when the actor is gone, hidden, or has no click listener.
    pub fn click(&self, id: ActorId, user: &UserId) -> Option<ClickEvent> {
        if self.is_clickable(id) && self.is_effectively_visible(id) {
            Some(ClickEvent {
                actor: id,
                user: user.clone(),
            })
        } else {
            None
        }
    }

    /// Find the nearest clickable actor under a ray.
    ///
    /// On equal distance the most recently created actor wins.
    pub fn pick(&self, ray_origin: Vec3, ray_dir: Vec3) -> Option<(ActorId, UIRaycastHit)> {
        let mut closest: Option<(ActorId, UIRaycastHit)> = None;

        for (id, node) in &self.nodes {
            if !node.clickable || !self.is_effectively_visible(*id) {
                continue;
            }
            let Some((min, max)) = node.actor.body.component().extents() else {
                continue;
            };
            let Some(center) = self.world_position(*id) else {
                continue;
            };
            if let Some(hit) = raycast_flat_quad(ray_origin, ray_dir, center, min, max) {
                let closer = closest
                    .as_ref()
                    .map_or(true, |(_, best)| hit.distance <= best.distance);
                if closer {
                    closest = Some((*id, hit));
                }
            }
        }

        closest
    }

    /// Pick along a ray and turn the hit into a click for `user`.
    pub fn click_at(&self, ray_origin: Vec3, ray_dir: Vec3, user: &UserId) -> Option<ClickEvent> {
        self.pick(ray_origin, ray_dir).map(|(actor, _)| ClickEvent {
            actor,
            user: user.clone(),
        })
    }

    /// Human-readable dump of the actor tree
    pub fn describe(&self) -> String {
        let mut out = String::new();
        for root in self.roots() {
            self.describe_node(root, 0, &mut out);
        }
        out
    }

    fn describe_node(&self, id: ActorId, depth: usize, out: &mut String) {
        let Some(node) = self.nodes.get(&id) else {
            return;
        };
        let component = node.actor.body.component();
        let position = component.position();
        let _ = writeln!(
            out,
            "{:indent$}{} {} '{}' at ({:.3}, {:.3}, {:.3}){}{}",
            "",
            id,
            node.actor.body.kind(),
            node.actor.name,
            position.x,
            position.y,
            position.z,
            if component.is_visible() { "" } else { " hidden" },
            if node.clickable { " clickable" } else { "" },
            indent = depth * 2,
        );
        for child in &node.children {
            self.describe_node(*child, depth + 1, out);
        }
    }
}

impl SceneHost for Scene {
    fn create_actor(&mut self, mut actor: Actor3D) -> ActorId {
        self.next_id += 1;
        let id = ActorId(self.next_id);

        if let Some(parent) = actor.parent {
            match self.nodes.get_mut(&parent) {
                Some(parent_node) => parent_node.children.push(id),
                None => {
                    warn!(
                        %id,
                        %parent,
                        name = %actor.name,
                        "Parent actor missing; creating at root"
                    );
                    actor.parent = None;
                }
            }
        }

        debug!(%id, name = %actor.name, kind = actor.body.kind(), "Created actor");
        self.nodes.insert(
            id,
            SceneNode {
                actor,
                children: Vec::new(),
                clickable: false,
            },
        );
        id
    }

    fn destroy_actor(&mut self, id: ActorId) {
        let Some(node) = self.nodes.remove(&id) else {
            debug!(%id, "Destroy of unknown actor ignored");
            return;
        };

        if let Some(parent) = node.actor.parent {
            if let Some(parent_node) = self.nodes.get_mut(&parent) {
                parent_node.children.retain(|child| *child != id);
            }
        }

        let mut pending = node.children;
        let mut removed = 1usize;
        while let Some(child) = pending.pop() {
            if let Some(child_node) = self.nodes.remove(&child) {
                pending.extend(child_node.children);
                removed += 1;
            }
        }
        debug!(%id, removed, "Destroyed actor subtree");
    }

    fn set_visible(&mut self, id: ActorId, visible: bool) {
        if let Some(node) = self.nodes.get_mut(&id) {
            node.actor.body.component_mut().set_visible(visible);
        }
    }

    fn set_color(&mut self, id: ActorId, color: [f32; 4]) {
        let Some(node) = self.nodes.get_mut(&id) else {
            return;
        };
        match &mut node.actor.body {
            ActorBody::Panel(panel) => panel.color = color,
            ActorBody::Text(text) => text.color = color,
            ActorBody::Button(button) => button.color = color,
            ActorBody::Group(_) => debug!(%id, "Groups have no material; color ignored"),
        }
    }

    fn register_click(&mut self, id: ActorId) {
        if let Some(node) = self.nodes.get_mut(&id) {
            node.clickable = true;
        }
    }

    fn show_message(&mut self, user: &UserId, message: &str) {
        info!(%user, text = message, "Message to user");
        if self.messages.len() >= MESSAGE_HISTORY {
            self.messages.remove(0);
        }
        self.messages.push((user.clone(), message.to_string()));
    }
}

/// A [`Scene`] shared between a board and whoever feeds it input.
#[derive(Debug, Clone, Default)]
pub struct SharedScene(Arc<Mutex<Scene>>);

impl SharedScene {
    pub fn new(scene: Scene) -> Self {
        Self(Arc::new(Mutex::new(scene)))
    }

    /// Lock the scene for inspection or input delivery
    pub fn lock(&self) -> MutexGuard<'_, Scene> {
        self.0.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl SceneHost for SharedScene {
    fn create_actor(&mut self, actor: Actor3D) -> ActorId {
        self.lock().create_actor(actor)
    }

    fn destroy_actor(&mut self, id: ActorId) {
        self.lock().destroy_actor(id);
    }

    fn set_visible(&mut self, id: ActorId, visible: bool) {
        self.lock().set_visible(id, visible);
    }

    fn set_color(&mut self, id: ActorId, color: [f32; 4]) {
        self.lock().set_color(id, color);
    }

    fn register_click(&mut self, id: ActorId) {
        self.lock().register_click(id);
    }

    fn show_message(&mut self, user: &UserId, message: &str) {
        self.lock().show_message(user, message);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::TextAnchor;

    fn group(scene: &mut Scene, name: &str, position: Vec3) -> ActorId {
        scene.create_actor(Actor3D::new(name, ActorBody::Group(Group3D::new(position))))
    }

    #[test]
    fn destroy_removes_whole_subtree() {
        let mut scene = Scene::new();
        let root = group(&mut scene, "container", Vec3::ZERO);
        let panel = scene.create_actor(
            Actor3D::new("note", ActorBody::Panel(Panel3D::new(Vec3::ZERO, 1.0, 1.0)))
                .with_parent(root),
        );
        let label = scene.create_actor(
            Actor3D::new("label", ActorBody::Text(Text3D::new(Vec3::ZERO, "hi")))
                .with_parent(panel),
        );
        let other = group(&mut scene, "button", Vec3::ONE);

        scene.destroy_actor(root);

        assert!(!scene.contains(root));
        assert!(!scene.contains(panel));
        assert!(!scene.contains(label));
        assert!(scene.contains(other));
        assert_eq!(scene.len(), 1);
    }

    #[test]
    fn destroying_child_detaches_it_from_parent() {
        let mut scene = Scene::new();
        let root = group(&mut scene, "root", Vec3::ZERO);
        let child = group(&mut scene, "child", Vec3::ZERO);
        scene.destroy_actor(child);
        let child = scene.create_actor(
            Actor3D::new("child", ActorBody::Group(Group3D::new(Vec3::ZERO))).with_parent(root),
        );
        assert_eq!(scene.children(root), &[child]);

        scene.destroy_actor(child);
        assert!(scene.children(root).is_empty());
    }

    #[test]
    fn world_position_composes_parent_translation() {
        let mut scene = Scene::new();
        let root = group(&mut scene, "root", Vec3::new(1.0, 2.0, 0.0));
        let child = scene.create_actor(
            Actor3D::new("child", ActorBody::Group(Group3D::new(Vec3::new(0.5, -0.5, -0.1))))
                .with_parent(root),
        );
        assert_eq!(scene.world_position(child), Some(Vec3::new(1.5, 1.5, -0.1)));
    }

    #[test]
    fn missing_parent_creates_root_actor() {
        let mut scene = Scene::new();
        let id = scene.create_actor(
            Actor3D::new("orphan", ActorBody::Group(Group3D::new(Vec3::ZERO)))
                .with_parent(ActorId(99)),
        );
        assert_eq!(scene.actor(id).and_then(|a| a.parent), None);
        assert_eq!(scene.roots(), vec![id]);
    }

    #[test]
    fn clicks_need_registration_and_visibility() {
        let mut scene = Scene::new();
        let user = UserId::new("alice");
        let root = group(&mut scene, "root", Vec3::ZERO);
        let panel = scene.create_actor(
            Actor3D::new("note", ActorBody::Panel(Panel3D::new(Vec3::ZERO, 1.0, 1.0)))
                .with_parent(root),
        );

        assert!(scene.click(panel, &user).is_none());

        scene.register_click(panel);
        assert_eq!(
            scene.click(panel, &user),
            Some(ClickEvent {
                actor: panel,
                user: user.clone()
            })
        );

        scene.set_visible(root, false);
        assert!(!scene.is_effectively_visible(panel));
        assert!(scene.click(panel, &user).is_none());
    }

    #[test]
    fn pick_prefers_nearest_then_newest() {
        let mut scene = Scene::new();
        let back = scene.create_actor(Actor3D::new(
            "back",
            ActorBody::Panel(Panel3D::new(Vec3::ZERO, 2.0, 2.0)),
        ));
        let front = scene.create_actor(Actor3D::new(
            "front",
            ActorBody::Panel(Panel3D::new(Vec3::new(0.0, 0.0, 0.1), 1.0, 1.0)),
        ));
        scene.register_click(back);
        scene.register_click(front);

        let origin = Vec3::new(0.0, 0.0, 1.0);
        let dir = Vec3::new(0.0, 0.0, -1.0);
        assert_eq!(scene.pick(origin, dir).map(|(id, _)| id), Some(front));

        // Outside the small panel only the big one is hit
        let origin = Vec3::new(0.8, 0.8, 1.0);
        assert_eq!(scene.pick(origin, dir).map(|(id, _)| id), Some(back));
    }

    #[test]
    fn pick_uses_text_extents() {
        let mut scene = Scene::new();
        let text = scene.create_actor(Actor3D::new(
            "label",
            ActorBody::Text(
                Text3D::new(Vec3::ZERO, "hello")
                    .with_anchor(TextAnchor::TopLeft)
                    .with_font_size(0.1),
            ),
        ));
        scene.register_click(text);
        let user = UserId::new("bob");

        let hit = scene.click_at(Vec3::new(0.1, -0.05, 1.0), Vec3::NEG_Z, &user);
        assert_eq!(hit.map(|event| event.actor), Some(text));

        let miss = scene.click_at(Vec3::new(-0.1, -0.05, 1.0), Vec3::NEG_Z, &user);
        assert!(miss.is_none());
    }

    #[test]
    fn set_color_targets_material() {
        let mut scene = Scene::new();
        let button = scene.create_actor(Actor3D::new(
            "toggle",
            ActorBody::Button(Button3D::new(Vec3::ZERO, "Background")),
        ));
        scene.set_color(button, [1.0, 0.0, 0.0, 1.0]);

        match &scene.actor(button).expect("button exists").body {
            ActorBody::Button(b) => assert_eq!(b.color, [1.0, 0.0, 0.0, 1.0]),
            other => panic!("unexpected body {other:?}"),
        }
    }

    #[test]
    fn messages_are_recorded_per_user() {
        let mut scene = SharedScene::default();
        scene.show_message(&UserId::new("carol"), "hello");
        let messages = scene.lock().take_messages();
        assert_eq!(messages, vec![(UserId::new("carol"), "hello".to_string())]);
        assert!(scene.lock().messages().is_empty());
    }

    #[test]
    fn message_history_is_bounded() {
        let mut scene = Scene::new();
        let user = UserId::new("dave");
        for n in 0..MESSAGE_HISTORY + 3 {
            scene.show_message(&user, &format!("note {n}"));
        }

        let messages = scene.messages();
        assert_eq!(messages.len(), MESSAGE_HISTORY);
        assert_eq!(messages[0].1, "note 3");
        assert_eq!(messages[MESSAGE_HISTORY - 1].1, format!("note {}", MESSAGE_HISTORY + 2));
    }

    #[test]
    fn describe_lists_tree() {
        let mut scene = Scene::new();
        let root = group(&mut scene, "container", Vec3::ZERO);
        scene.create_actor(
            Actor3D::new("note-1", ActorBody::Panel(Panel3D::new(Vec3::ZERO, 1.0, 1.0)))
                .with_parent(root),
        );
        let dump = scene.describe();
        assert!(dump.contains("group 'container'"));
        assert!(dump.contains("  #2 panel 'note-1'"));
    }
}

//! Board controller: owns every actor the board puts in the scene.
//!
//! Lifecycle is `new` → `start` → (`begin_refresh` / `complete_refresh` /
//! `handle_click` / `toggle_background`)* → `dispose`. A refresh moves the
//! board through Idle → Fetching → Rebuilding → Idle. The fetch itself happens
//! outside the controller (see [`crate::session`]); the controller only hands
//! out a [`RefreshTicket`] and accepts the result for the newest ticket.

use crate::dispatch::render_post;
use crate::error::FetchError;
use crate::layout::LayoutConfig;
use crate::post::PostRecord;
use glam::Vec3;
use postboard_ui3d::{
    Actor3D, ActorBody, ActorId, Button3D, ClickEvent, Group3D, Panel3D,
    SceneHost, Text3D, TextAnchor,
};
use std::collections::{HashMap, HashSet};
use tracing::{debug, info, warn};

pub const CONTAINER_NAME: &str = "Container";
pub const BACKGROUND_NAME: &str = "Background";
pub const ERROR_LABEL_NAME: &str = "Error";
pub const REFRESH_BUTTON_NAME: &str = "RefreshButton";
pub const TOGGLE_BUTTON_NAME: &str = "BackgroundButton";

/// Indicator color while the background is shown.
pub const INDICATOR_VISIBLE: [f32; 4] = [0.2, 0.8, 0.2, 1.0];
/// Indicator color while the background is hidden.
pub const INDICATOR_HIDDEN: [f32; 4] = [0.8, 0.2, 0.2, 1.0];

const BACKGROUND_COLOR: [f32; 4] = [0.93, 0.91, 0.86, 1.0];
const ERROR_COLOR: [f32; 4] = [0.8, 0.1, 0.1, 1.0];
const BUTTON_SIZE: f32 = 0.25;
const BUTTON_OFFSET_X: f32 = -0.2;

/// Where the board is in its refresh cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshPhase {
    Idle,
    Fetching,
    Rebuilding,
}

/// Proof that a refresh was started; only the newest one can complete.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RefreshTicket {
    pub generation: u64,
}

/// What `complete_refresh` did with a fetch result.
#[derive(Debug)]
pub enum RefreshOutcome {
    /// The board was rebuilt from the records.
    Rendered {
        generation: u64,
        posts: usize,
        skipped: usize,
    },
    /// The fetch failed; the board is empty and shows the error.
    Failed { generation: u64, error: FetchError },
    /// A newer refresh started (or the board was disposed); nothing changed.
    Stale { generation: u64 },
}

/// What a click turned into.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClickOutcome {
    /// The refresh button was clicked; the caller starts the refresh.
    RefreshRequested,
    /// The background toggle was clicked and applied.
    BackgroundToggled(bool),
    /// A post's text was shown to the clicking user.
    Revealed { post_id: String },
    /// Not one of ours, or destroyed by a refresh.
    Ignored,
}

/// Observable board state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoardSnapshot {
    pub phase: RefreshPhase,
    pub generation: u64,
    pub posts: usize,
    pub background_visible: bool,
    pub last_error: Option<String>,
    /// Session events fully handled so far (maintained by the session driver).
    pub events_handled: u64,
}

#[derive(Debug)]
struct RenderedBoard {
    container: ActorId,
    background: ActorId,
    targets: HashMap<ActorId, String>,
    records: HashMap<String, PostRecord>,
}

/// Owns the board's actors and state for one session.
pub struct BoardController<H: SceneHost> {
    host: H,
    layout: LayoutConfig,
    refresh_button: Option<ActorId>,
    toggle_button: Option<ActorId>,
    board: Option<RenderedBoard>,
    background_visible: bool,
    phase: RefreshPhase,
    generation: u64,
    last_error: Option<String>,
    disposed: bool,
}

impl<H: SceneHost> BoardController<H> {
    pub fn new(host: H, layout: LayoutConfig) -> Self {
        Self {
            host,
            layout,
            refresh_button: None,
            toggle_button: None,
            board: None,
            background_visible: true,
            phase: RefreshPhase::Idle,
            generation: 0,
            last_error: None,
            disposed: false,
        }
    }

    /// Create the persistent controls and begin the initial refresh.
    pub fn start(&mut self) -> RefreshTicket {
        if self.refresh_button.is_some() {
            warn!("Board already started; only refreshing");
            return self.begin_refresh();
        }

        let board = self.layout.board_size();
        info!(
            width = board.x,
            height = board.y,
            resolution = self.layout.canvas_resolution,
            "Starting board"
        );

        let refresh = self.host.create_actor(Actor3D::new(
            REFRESH_BUTTON_NAME,
            ActorBody::Button(
                Button3D::new(Vec3::new(BUTTON_OFFSET_X, -BUTTON_SIZE / 2.0, 0.0), "Refresh")
                    .with_size(BUTTON_SIZE, BUTTON_SIZE),
            ),
        ));
        self.host.register_click(refresh);
        self.refresh_button = Some(refresh);

        let toggle = self.host.create_actor(Actor3D::new(
            TOGGLE_BUTTON_NAME,
            ActorBody::Button(
                Button3D::new(
                    Vec3::new(BUTTON_OFFSET_X, -BUTTON_SIZE * 1.75, 0.0),
                    "Background",
                )
                .with_size(BUTTON_SIZE, BUTTON_SIZE)
                .with_color(self.indicator_color()),
            ),
        ));
        self.host.register_click(toggle);
        self.toggle_button = Some(toggle);

        self.begin_refresh()
    }

    /// Tear down the current board and start a new refresh generation.
    ///
    /// Any refresh still waiting on its fetch is superseded.
    pub fn begin_refresh(&mut self) -> RefreshTicket {
        if self.disposed {
            warn!("Refresh requested on a disposed board");
            return RefreshTicket {
                generation: self.generation,
            };
        }
        if self.phase == RefreshPhase::Fetching {
            debug!(generation = self.generation, "Superseding in-flight refresh");
        }

        self.teardown_board();
        self.generation += 1;
        self.phase = RefreshPhase::Fetching;
        debug!(
            generation = self.generation,
            background_visible = self.background_visible,
            "Refresh started"
        );
        RefreshTicket {
            generation: self.generation,
        }
    }

    /// Apply a fetch result. Results for anything but the newest ticket are dropped.
    pub fn complete_refresh(
        &mut self,
        ticket: RefreshTicket,
        result: Result<Vec<PostRecord>, FetchError>,
    ) -> RefreshOutcome {
        if self.disposed
            || self.phase != RefreshPhase::Fetching
            || ticket.generation != self.generation
        {
            debug!(
                ticket = ticket.generation,
                current = self.generation,
                "Dropping stale refresh result"
            );
            return RefreshOutcome::Stale {
                generation: ticket.generation,
            };
        }

        self.phase = RefreshPhase::Rebuilding;
        let mut board = self.build_container();

        let outcome = match result {
            Ok(records) => {
                let total = records.len();
                let mut posts = 0usize;
                let mut seen = HashSet::with_capacity(total);
                for record in records {
                    if !seen.insert(record.id.clone()) {
                        warn!(post = %record.id, "Duplicate post id; keeping the first");
                        continue;
                    }
                    if let Some(rendered) =
                        render_post(&mut self.host, board.container, &record, &self.layout)
                    {
                        board.targets.insert(rendered.actor, record.id.clone());
                        board.records.insert(record.id.clone(), record);
                        posts += 1;
                    }
                }
                self.last_error = None;
                info!(generation = self.generation, posts, total, "Board rebuilt");
                RefreshOutcome::Rendered {
                    generation: self.generation,
                    posts,
                    skipped: total - posts,
                }
            }
            Err(error) => {
                warn!(generation = self.generation, %error, "Failed to load posts");
                let label = Text3D::new(
                    Vec3::new(0.02, -0.02, -0.01),
                    format!("Could not load posts: {error}"),
                )
                .with_font_size(0.3)
                .with_anchor(TextAnchor::TopLeft)
                .with_color(ERROR_COLOR)
                .with_max_width((self.layout.board_size().x - 0.04) / self.layout.text_scale)
                .with_scale(Vec3::splat(self.layout.text_scale));
                self.host.create_actor(
                    Actor3D::new(ERROR_LABEL_NAME, ActorBody::Text(label))
                        .with_parent(board.container),
                );
                self.last_error = Some(error.to_string());
                RefreshOutcome::Failed {
                    generation: self.generation,
                    error,
                }
            }
        };

        self.board = Some(board);
        self.phase = RefreshPhase::Idle;
        outcome
    }

    /// Route a host click to the refresh button, the toggle or a post.
    pub fn handle_click(&mut self, event: &ClickEvent) -> ClickOutcome {
        if self.disposed {
            return ClickOutcome::Ignored;
        }
        if Some(event.actor) == self.refresh_button {
            debug!(user = %event.user, "Refresh clicked");
            return ClickOutcome::RefreshRequested;
        }
        if Some(event.actor) == self.toggle_button {
            return ClickOutcome::BackgroundToggled(self.toggle_background());
        }

        let record = self.board.as_ref().and_then(|board| {
            board
                .targets
                .get(&event.actor)
                .and_then(|id| board.records.get(id))
        });
        match record {
            Some(record) => {
                let message = record.reveal_message();
                let post_id = record.id.clone();
                self.host.show_message(&event.user, &message);
                ClickOutcome::Revealed { post_id }
            }
            None => {
                debug!(actor = %event.actor, "Click on unknown or stale actor ignored");
                ClickOutcome::Ignored
            }
        }
    }

    /// Flip background visibility and recolor the indicator. Returns the new state.
    pub fn toggle_background(&mut self) -> bool {
        self.background_visible = !self.background_visible;
        if let Some(board) = &self.board {
            self.host.set_visible(board.background, self.background_visible);
        }
        if let Some(toggle) = self.toggle_button {
            self.host.set_color(toggle, self.indicator_color());
        }
        debug!(visible = self.background_visible, "Background toggled");
        self.background_visible
    }

    /// Remove everything the board created. Later calls do nothing.
    pub fn dispose(&mut self) {
        if self.disposed {
            return;
        }
        self.teardown_board();
        for button in [self.refresh_button.take(), self.toggle_button.take()]
            .into_iter()
            .flatten()
        {
            self.host.destroy_actor(button);
        }
        self.phase = RefreshPhase::Idle;
        self.disposed = true;
        info!(generation = self.generation, "Board disposed");
    }

    pub fn phase(&self) -> RefreshPhase {
        self.phase
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn background_visible(&self) -> bool {
        self.background_visible
    }

    pub fn is_disposed(&self) -> bool {
        self.disposed
    }

    /// Current container, if a board is built.
    pub fn container(&self) -> Option<ActorId> {
        self.board.as_ref().map(|board| board.container)
    }

    /// Current background panel, if a board is built.
    pub fn background(&self) -> Option<ActorId> {
        self.board.as_ref().map(|board| board.background)
    }

    pub fn refresh_button(&self) -> Option<ActorId> {
        self.refresh_button
    }

    pub fn toggle_button(&self) -> Option<ActorId> {
        self.toggle_button
    }

    /// Number of post elements on the current board.
    pub fn post_count(&self) -> usize {
        self.board.as_ref().map_or(0, |board| board.targets.len())
    }

    /// Actor showing the given post, if it is on the board.
    pub fn post_actor(&self, post_id: &str) -> Option<ActorId> {
        self.board.as_ref().and_then(|board| {
            board
                .targets
                .iter()
                .find(|(_, id)| id.as_str() == post_id)
                .map(|(actor, _)| *actor)
        })
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    pub fn snapshot(&self) -> BoardSnapshot {
        BoardSnapshot {
            phase: self.phase,
            generation: self.generation,
            posts: self.post_count(),
            background_visible: self.background_visible,
            last_error: self.last_error.clone(),
            events_handled: 0,
        }
    }

    fn indicator_color(&self) -> [f32; 4] {
        if self.background_visible {
            INDICATOR_VISIBLE
        } else {
            INDICATOR_HIDDEN
        }
    }

    fn teardown_board(&mut self) {
        if let Some(board) = self.board.take() {
            debug!(container = %board.container, posts = board.targets.len(), "Destroying board");
            self.host.destroy_actor(board.container);
        }
    }

    fn build_container(&mut self) -> RenderedBoard {
        let container = self.host.create_actor(Actor3D::new(
            CONTAINER_NAME,
            ActorBody::Group(Group3D::new(Vec3::ZERO)),
        ));

        let size = self.layout.board_size();
        let background = self.host.create_actor(
            Actor3D::new(
                BACKGROUND_NAME,
                ActorBody::Panel(
                    Panel3D::new(Vec3::new(size.x / 2.0, -size.y / 2.0, 0.0), size.x, size.y)
                        .with_color(BACKGROUND_COLOR)
                        .with_visible(self.background_visible),
                ),
            )
            .with_parent(container),
        );

        RenderedBoard {
            container,
            background,
            targets: HashMap::new(),
            records: HashMap::new(),
        }
    }
}

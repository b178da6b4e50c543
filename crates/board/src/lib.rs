//! Bulletin board logic for postboard.
//!
//! A board fetches a list of posts from a remote source and lays them out in a
//! 3D scene through the [`postboard_ui3d::SceneHost`] seam. Two controls sit
//! next to the board: one re-fetches and rebuilds it, the other toggles the
//! background panel. Clicking a post shows its text to the clicking user.
//!
//! - [`post`]: record shape and tolerant decoding
//! - [`layout`]: canvas pixels to scene units
//! - [`dispatch`]: one scene element per record type
//! - [`controller`]: the board's actors and refresh state machine
//! - [`source`]: HTTP and file post sources
//! - [`session`]: async driver that serializes events and fetches

pub mod color;
pub mod controller;
pub mod dispatch;
pub mod error;
pub mod layout;
pub mod post;
pub mod session;
pub mod source;

pub use color::{parse_hex_color, FALLBACK_NOTE_COLOR};
pub use controller::{
    BoardController, BoardSnapshot, ClickOutcome, RefreshOutcome, RefreshPhase, RefreshTicket,
};
pub use dispatch::{render_post, RenderedPost};
pub use error::{ColorParseError, FetchError, SessionClosed};
pub use layout::{LayoutConfig, PostTransform};
pub use post::{decode_posts, PixelVec, PostKind, PostRecord};
pub use session::{BoardSession, SessionEvent, SessionHandle};
pub use source::{ApiConfig, FilePostSource, HttpPostSource, PostSource};

//! Post records as served by the board API.

use crate::error::FetchError;
use serde::Deserialize;
use serde_json::Value;
use tracing::warn;

/// Separator between a post's text and its description when revealed.
pub const REVEAL_SEPARATOR: &str = "\n\n";

/// A point or extent in canvas pixels.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct PixelVec {
    pub x: f32,
    pub y: f32,
}

impl PixelVec {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// Declared visual type of a post.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PostKind {
    /// Colored note panel with text on top.
    Postit,
    /// Bare colored text.
    Text,
    /// Anything this board does not know how to draw.
    #[default]
    #[serde(other)]
    Unknown,
}

/// One bulletin-board entry.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct PostRecord {
    pub id: String,
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(rename = "type", default)]
    pub kind: PostKind,
    /// `#RRGGBB`; an empty or malformed value falls back to the board default.
    #[serde(default)]
    pub color: String,
    /// Top-left corner on the canvas.
    pub position: PixelVec,
    #[serde(default)]
    pub size: Option<PixelVec>,
}

impl PostRecord {
    /// Text shown to a user who clicks the post.
    pub fn reveal_message(&self) -> String {
        match self.description.as_deref() {
            Some(description) if !description.is_empty() => {
                format!("{}{REVEAL_SEPARATOR}{description}", self.text)
            }
            _ => self.text.clone(),
        }
    }
}

/// Decode an API response body into records.
///
/// The body must be a JSON array. Elements that are not valid records are
/// logged and skipped; they never fail the whole list.
pub fn decode_posts(body: Value) -> Result<Vec<PostRecord>, FetchError> {
    let Value::Array(items) = body else {
        return Err(FetchError::Decode(format!(
            "expected a JSON array, got {}",
            json_kind(&body)
        )));
    };

    let mut posts = Vec::with_capacity(items.len());
    for (index, item) in items.into_iter().enumerate() {
        match serde_json::from_value::<PostRecord>(item) {
            Ok(post) => posts.push(post),
            Err(err) => warn!(index, %err, "Skipping malformed post record"),
        }
    }
    Ok(posts)
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

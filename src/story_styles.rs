/// Built-in story styles, compiled into the binary.

use crate::schema::style::{StoryStyle, StyleError};

mod data {
    pub const WOLFE: &str = include_str!("../story_data/wolfe/style.ron");
    pub const SIDEKICK: &str = include_str!("../story_data/sidekick/style.ron");
}

/// Name of the style used when none is requested.
pub const DEFAULT_STYLE: &str = "wolfe";

/// Identifiers of every built-in style.
pub fn available() -> &'static [&'static str] {
    &["wolfe", "sidekick"]
}

/// Load a built-in style by name.
pub fn builtin(name: &str) -> Result<StoryStyle, StyleError> {
    let source = match name {
        "wolfe" => data::WOLFE,
        "sidekick" => data::SIDEKICK,
        other => return Err(StyleError::UnknownStyle(other.to_string())),
    };
    StoryStyle::parse_ron(source)
}

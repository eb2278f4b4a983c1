//! WASM bindings for story-weaver — lets a web page drive the story
//! engine and draw the result itself.

use wasm_bindgen::prelude::*;

use story_weaver::core::view::StoryView;
use story_weaver::schema::style::StoryStyle;
use story_weaver::story_styles;

// ---------------------------------------------------------------------------
// JSON helper types for communication across the WASM boundary
// ---------------------------------------------------------------------------
#[derive(serde::Serialize)]
struct StyleInfo<'a> {
    name: &'a str,
    title: &'a str,
    subtitle: &'a str,
    button_label: &'a str,
    footer: &'a str,
    slots: Vec<&'a str>,
}

fn to_json<T: serde::Serialize>(value: &T) -> Result<String, JsError> {
    serde_json::to_string(value).map_err(|e| JsError::new(&format!("Serialization error: {e}")))
}

// ---------------------------------------------------------------------------
// StoryDemo — the main exported struct
// ---------------------------------------------------------------------------
#[wasm_bindgen]
pub struct StoryDemo {
    view: StoryView,
}

#[wasm_bindgen]
impl StoryDemo {
    /// Create a demo for a built-in style. Pass a seed for reproducible
    /// output, or `undefined` for a fresh one every page load.
    ///
    /// The view starts in its placeholder phase; call `initialize` once
    /// the page has painted.
    #[wasm_bindgen(constructor)]
    pub fn new(style: &str, seed: Option<u64>) -> Result<StoryDemo, JsError> {
        let mut builder = StoryView::builder().builtin_style(style);
        if let Some(seed) = seed {
            builder = builder.seed(seed);
        }
        let view = builder
            .build()
            .map_err(|e| JsError::new(&format!("Style error: {e}")))?;
        Ok(StoryDemo { view })
    }

    /// Create a demo from a style written in RON.
    pub fn from_ron(source: &str, seed: Option<u64>) -> Result<StoryDemo, JsError> {
        let style = StoryStyle::parse_ron(source)
            .map_err(|e| JsError::new(&format!("Style parse error: {e}")))?;
        let mut builder = StoryView::builder().with_style(style);
        if let Some(seed) = seed {
            builder = builder.seed(seed);
        }
        let view = builder
            .build()
            .map_err(|e| JsError::new(&format!("Style error: {e}")))?;
        Ok(StoryDemo { view })
    }

    /// Pick the first story and the particle set. Runs once.
    pub fn initialize(&mut self) {
        self.view.initialize();
    }

    /// Re-roll every slot.
    pub fn regenerate(&mut self) {
        self.view.regenerate();
    }

    /// Advance the animation clock by `ms` milliseconds.
    pub fn advance(&mut self, ms: f64) {
        let ms = if ms.is_finite() { ms.max(0.0) } else { 0.0 };
        self.view
            .advance(std::time::Duration::from_secs_f64(ms / 1000.0));
    }

    /// The current story as plain text.
    pub fn sentence(&self) -> String {
        self.view.sentence()
    }

    /// JSON array of segments, each tagged `literal` or `slot`.
    pub fn segments(&self) -> Result<String, JsError> {
        to_json(&self.view.segments())
    }

    /// JSON array of the particle set (empty before `initialize`).
    pub fn particles(&self) -> Result<String, JsError> {
        to_json(&self.view.particles().particles())
    }

    /// JSON description of the whole frame at the current clock.
    pub fn frame(&self) -> Result<String, JsError> {
        to_json(&self.view.frame())
    }

    /// JSON description of the active style's display text and slots.
    pub fn style_info(&self) -> Result<String, JsError> {
        let style = self.view.style();
        to_json(&StyleInfo {
            name: &style.name,
            title: &style.title,
            subtitle: &style.subtitle,
            button_label: &style.button_label,
            footer: &style.footer,
            slots: style.lexicon.slot_names().collect(),
        })
    }

    /// JSON array of built-in style identifiers.
    pub fn available_styles() -> String {
        serde_json::to_string(story_styles::available()).unwrap_or_else(|_| "[]".to_string())
    }
}

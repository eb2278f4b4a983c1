/// The root view: owns the story state, the particle field, and the
/// regenerate action, and composes everything a front end draws.

use serde::Serialize;
use std::path::PathBuf;
use std::time::Duration;

use crate::core::particles::{ParticleField, ParticleFrame};
use crate::core::sampler::{RandomSource, RngSource};
use crate::core::story::StoryState;
use crate::core::template::Reveal;
use crate::schema::segment::{self, Segment};
use crate::schema::style::{StoryStyle, StyleError};
use crate::story_styles;

const FOOTER_DELAY_SECS: f32 = 1.5;
const FOOTER_FADE_SECS: f32 = 1.0;

/// Whether the sentence is still playing its entrance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ViewPhase {
    Idle,
    Transitioning,
}

/// A segment together with its entrance state.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RevealedSegment {
    pub segment: Segment,
    pub reveal: Reveal,
}

/// A particle positioned at the current instant.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlacedParticle {
    pub id: usize,
    pub origin_x_pct: f32,
    pub origin_y_pct: f32,
    #[serde(flatten)]
    pub frame: ParticleFrame,
}

/// Everything a front end needs to draw one frame.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ViewFrame {
    pub title: String,
    pub subtitle: String,
    pub button_label: String,
    pub segments: Vec<RevealedSegment>,
    pub particles: Vec<PlacedParticle>,
    pub footer: String,
    pub footer_visibility: f32,
    pub phase: ViewPhase,
    pub generation: u64,
}

pub struct StoryView {
    style: StoryStyle,
    story: StoryState,
    particles: ParticleField,
    source: Box<dyn RandomSource>,
    phase: ViewPhase,
    clock: Duration,
    /// View clock at the randomize step; particle loops count from here.
    mounted_at: Duration,
    /// View clock when the current story replaced the previous one.
    story_changed_at: Duration,
    initialized: bool,
    generation: u64,
}

/// Builder for constructing a `StoryView`.
#[derive(Default)]
pub struct StoryViewBuilder {
    style: Option<StoryStyle>,
    style_name: Option<String>,
    style_path: Option<PathBuf>,
    seed: Option<u64>,
    source: Option<Box<dyn RandomSource>>,
}

impl StoryViewBuilder {
    /// Use an already loaded style.
    pub fn with_style(mut self, style: StoryStyle) -> Self {
        self.style = Some(style);
        self
    }

    /// Use a built-in style by name.
    pub fn builtin_style(mut self, name: &str) -> Self {
        self.style_name = Some(name.to_string());
        self
    }

    /// Load the style from a RON file at build time.
    pub fn style_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.style_path = Some(path.into());
        self
    }

    /// Seed a reproducible random source.
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Supply the random source directly. Takes precedence over `seed`.
    pub fn with_random_source(mut self, source: Box<dyn RandomSource>) -> Self {
        self.source = Some(source);
        self
    }

    /// Build the view in its placeholder phase. Call
    /// [`StoryView::initialize`] before the first real display.
    pub fn build(self) -> Result<StoryView, StyleError> {
        let style = match (self.style, self.style_path, self.style_name) {
            (Some(style), _, _) => style,
            (None, Some(path), _) => StoryStyle::load_from_ron(&path)?,
            (None, None, Some(name)) => story_styles::builtin(&name)?,
            (None, None, None) => story_styles::builtin(story_styles::DEFAULT_STYLE)?,
        };

        let source: Box<dyn RandomSource> = match (self.source, self.seed) {
            (Some(source), _) => source,
            (None, Some(seed)) => Box::new(RngSource::from_seed(seed)),
            (None, None) => Box::new(RngSource::from_entropy()),
        };

        Ok(StoryView {
            particles: ParticleField::new(style.particles.clone()),
            style,
            story: StoryState::placeholder(),
            source,
            phase: ViewPhase::Idle,
            clock: Duration::ZERO,
            mounted_at: Duration::ZERO,
            story_changed_at: Duration::ZERO,
            initialized: false,
            generation: 0,
        })
    }
}

impl StoryView {
    pub fn builder() -> StoryViewBuilder {
        StoryViewBuilder::default()
    }

    /// One-time randomize step: picks the first story and the particle
    /// set. Later calls do nothing.
    pub fn initialize(&mut self) {
        if self.initialized {
            return;
        }
        self.initialized = true;
        self.mounted_at = self.clock;
        self.particles.randomize(self.source.as_mut());
        self.replace_story();
        tracing::debug!(style = %self.style.name, "story view initialized");
    }

    /// Replace the whole story with a fresh sample and restart the
    /// entrance animation.
    pub fn regenerate(&mut self) {
        if !self.initialized {
            self.initialize();
            return;
        }
        self.replace_story();
        tracing::debug!(generation = self.generation, sentence = %self.sentence(), "regenerated story");
    }

    fn replace_story(&mut self) {
        let next = StoryState::generate(&self.style.lexicon, self.source.as_mut());
        self.story = next;
        self.generation += 1;
        self.story_changed_at = self.clock;
        self.phase = ViewPhase::Transitioning;
    }

    /// Move the view clock forward, settling a finished transition.
    pub fn advance(&mut self, dt: Duration) {
        self.clock += dt;
        if self.phase == ViewPhase::Transitioning {
            let since = (self.clock - self.story_changed_at).as_secs_f32();
            let total = self.style.reveal.total_secs(self.style.template.parts().len());
            if since >= total {
                self.phase = ViewPhase::Idle;
            }
        }
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    pub fn phase(&self) -> ViewPhase {
        self.phase
    }

    pub fn clock(&self) -> Duration {
        self.clock
    }

    /// Number of stories generated so far.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn style(&self) -> &StoryStyle {
        &self.style
    }

    pub fn story(&self) -> &StoryState {
        &self.story
    }

    pub fn particles(&self) -> &ParticleField {
        &self.particles
    }

    /// Render the current story into display segments.
    pub fn segments(&self) -> Vec<Segment> {
        self.style.template.render(&self.story)
    }

    pub fn sentence(&self) -> String {
        segment::join(&self.segments())
    }

    /// Compose the frame for the current clock.
    pub fn frame(&self) -> ViewFrame {
        let since = (self.clock - self.story_changed_at).as_secs_f32();
        let t = self.clock.as_secs_f32();
        let since_mount = (self.clock - self.mounted_at).as_secs_f32();

        let segments = self
            .segments()
            .into_iter()
            .map(|segment| RevealedSegment {
                reveal: self.style.reveal.for_segment(&segment, since),
                segment,
            })
            .collect();

        let particles = self
            .particles
            .particles()
            .iter()
            .map(|p| PlacedParticle {
                id: p.id,
                origin_x_pct: p.origin_x_pct,
                origin_y_pct: p.origin_y_pct,
                frame: p.sample(since_mount),
            })
            .collect();

        ViewFrame {
            title: self.style.title.clone(),
            subtitle: self.style.subtitle.clone(),
            button_label: self.style.button_label.clone(),
            segments,
            particles,
            footer: self.style.footer.clone(),
            footer_visibility: crate::core::motion::progress(
                t,
                FOOTER_DELAY_SECS,
                FOOTER_FADE_SECS,
            ),
            phase: self.phase,
            generation: self.generation,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::sampler::SequenceSource;

    fn pets() -> StoryStyle {
        StoryStyle::parse_ron(
            r#"StoryStyle(
                name: "pets",
                title: "Pets",
                template: "The {color} {animal} ran.",
                lexicon: { "color": ["red", "blue"], "animal": ["cat", "dog"] },
            )"#,
        )
        .unwrap()
    }

    fn view(seed: u64) -> StoryView {
        StoryView::builder().with_style(pets()).seed(seed).build().unwrap()
    }

    #[test]
    fn placeholder_phase_before_initialize() {
        let v = view(1);
        assert!(!v.is_initialized());
        assert!(v.story().is_empty());
        assert!(!v.particles().is_ready());
        assert!(v.frame().particles.is_empty());
        // Unfilled slots show their names.
        assert_eq!(v.sentence(), "The color animal ran.");
    }

    #[test]
    fn initialize_is_one_time() {
        let mut v = view(2);
        v.initialize();
        let story = v.story().clone();
        let particles = v.particles().particles().to_vec();
        v.initialize();
        assert_eq!(v.story(), &story);
        assert_eq!(v.particles().particles(), particles.as_slice());
        assert_eq!(v.generation(), 1);
    }

    #[test]
    fn regenerate_keeps_particles_and_replaces_story() {
        let mut v = view(3);
        v.initialize();
        let particles = v.particles().particles().to_vec();
        for _ in 0..20 {
            v.regenerate();
            assert!(v.story().is_consistent_with(&v.style().lexicon));
        }
        assert_eq!(v.particles().particles(), particles.as_slice());
        assert_eq!(v.generation(), 21);
    }

    #[test]
    fn regenerate_before_initialize_initializes() {
        let mut v = view(4);
        v.regenerate();
        assert!(v.is_initialized());
        assert_eq!(v.particles().particles().len(), 30);
    }

    #[test]
    fn transition_settles_after_reveal() {
        let mut v = view(5);
        v.initialize();
        assert_eq!(v.phase(), ViewPhase::Transitioning);
        v.advance(Duration::from_millis(300));
        assert_eq!(v.phase(), ViewPhase::Transitioning);
        // 5 segments: last delay 0.4 s + 0.5 s duration
        v.advance(Duration::from_millis(700));
        assert_eq!(v.phase(), ViewPhase::Idle);

        v.regenerate();
        assert_eq!(v.phase(), ViewPhase::Transitioning);
    }

    #[test]
    fn injected_source_picks_exact_story() {
        // animal then color (sorted), then nothing else is drawn from the
        // lexicon; particles consume the source first.
        let mut values = vec![0.5; 6 * 30];
        values.extend([0.9, 0.1]);
        let mut v = StoryView::builder()
            .with_style(pets())
            .with_random_source(Box::new(SequenceSource::new(values)))
            .build()
            .unwrap();
        v.initialize();
        assert_eq!(v.sentence(), "The red dog ran.");
    }

    #[test]
    fn frame_composes_everything() {
        let mut v = view(6);
        v.initialize();
        let frame = v.frame();
        assert_eq!(frame.title, "Pets");
        assert_eq!(frame.button_label, "New Story");
        assert_eq!(frame.segments.len(), 5);
        assert_eq!(frame.particles.len(), 30);
        assert_eq!(frame.footer_visibility, 0.0);
        // First slot has not started revealing yet at t = 0.
        assert_eq!(frame.segments[1].reveal.opacity, 0.0);
        assert_eq!(frame.segments[0].reveal, Reveal::SETTLED);

        v.advance(Duration::from_secs(3));
        let later = v.frame();
        assert_eq!(later.footer_visibility, 1.0);
        assert!(later.segments.iter().all(|s| s.reveal == Reveal::SETTLED));
    }

    #[test]
    fn phase_serializes_with_kind_tag() {
        let mut v = view(9);
        v.initialize();
        let json = serde_json::to_value(v.frame().phase).unwrap();
        assert_eq!(json, serde_json::json!({ "kind": "transitioning" }));
    }

    #[test]
    fn default_builder_uses_builtin_style() {
        let v = StoryView::builder().seed(7).build().unwrap();
        assert_eq!(v.style().name, story_styles::DEFAULT_STYLE);
    }
}

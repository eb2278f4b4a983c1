/// Story styles — a template, its lexicon, and the display text around
/// them, loaded as one swappable bundle.

use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use thiserror::Error;

use crate::core::lexicon::{Lexicon, LexiconError};
use crate::core::particles::ParticleConfig;
use crate::core::template::{RevealConfig, Template, TemplateError};

#[derive(Debug, Error)]
pub enum StyleError {
    #[error(transparent)]
    Template(#[from] TemplateError),
    #[error("lexicon error: {0}")]
    Lexicon(#[from] LexiconError),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("RON deserialization error: {0}")]
    Ron(#[from] ron::error::SpannedError),
    #[error("unknown story style: {0}")]
    UnknownStyle(String),
}

/// Problems found by [`StoryStyle::lint`].
#[derive(Debug, Default, Clone, PartialEq)]
pub struct LintReport {
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
}

impl LintReport {
    pub fn is_clean(&self) -> bool {
        self.errors.is_empty() && self.warnings.is_empty()
    }
}

/// Everything a front end needs to show one kind of story.
#[derive(Debug, Clone, PartialEq)]
pub struct StoryStyle {
    pub name: String,
    pub title: String,
    pub subtitle: String,
    pub button_label: String,
    pub footer: String,
    pub template: Template,
    pub lexicon: Lexicon,
    pub particles: ParticleConfig,
    pub reveal: RevealConfig,
}

// On-disk shape: the template is a plain string and the lexicon a plain
// map, both validated on conversion.

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename = "StoryStyle")]
struct RonStyle {
    name: String,
    title: String,
    #[serde(default)]
    subtitle: String,
    #[serde(default = "default_button_label")]
    button_label: String,
    #[serde(default)]
    footer: String,
    template: String,
    lexicon: BTreeMap<String, Vec<String>>,
    #[serde(default)]
    particles: ParticleConfig,
    #[serde(default)]
    reveal: RevealConfig,
}

fn default_button_label() -> String {
    "New Story".to_string()
}

impl StoryStyle {
    /// Load a style from a RON file.
    pub fn load_from_ron(path: &Path) -> Result<StoryStyle, StyleError> {
        let contents = std::fs::read_to_string(path)?;
        let style = Self::parse_ron(&contents)?;
        tracing::info!(style = %style.name, path = %path.display(), "loaded story style");
        Ok(style)
    }

    /// Parse a style from a RON string.
    ///
    /// Empty phrase lists and malformed templates are rejected. Template
    /// slots with no lexicon entry are accepted with a warning; they render
    /// as their own name.
    pub fn parse_ron(input: &str) -> Result<StoryStyle, StyleError> {
        let raw: RonStyle = ron::from_str(input)?;
        let template = Template::parse(&raw.template)?;
        let lexicon = Lexicon::new(raw.lexicon)?;

        let style = StoryStyle {
            name: raw.name,
            title: raw.title,
            subtitle: raw.subtitle,
            button_label: raw.button_label,
            footer: raw.footer,
            template,
            lexicon,
            particles: raw.particles,
            reveal: raw.reveal,
        };

        for slot in style.unknown_slots() {
            tracing::warn!(style = %style.name, slot, "template slot has no lexicon entry");
        }

        Ok(style)
    }

    /// Serialize back to the on-disk RON shape.
    pub fn to_ron(&self) -> Result<String, ron::Error> {
        let raw = RonStyle {
            name: self.name.clone(),
            title: self.title.clone(),
            subtitle: self.subtitle.clone(),
            button_label: self.button_label.clone(),
            footer: self.footer.clone(),
            template: self.template.source().to_string(),
            lexicon: self.lexicon.clone().into(),
            particles: self.particles.clone(),
            reveal: self.reveal.clone(),
        };
        ron::ser::to_string_pretty(&raw, ron::ser::PrettyConfig::default())
    }

    /// Template slots missing from the lexicon, sorted.
    pub fn unknown_slots(&self) -> Vec<&str> {
        let mut slots: Vec<&str> = self
            .template
            .slot_names()
            .into_iter()
            .filter(|s| !self.lexicon.contains(s))
            .collect();
        slots.sort_unstable();
        slots
    }

    /// Lexicon slots the template never references, sorted.
    pub fn unused_slots(&self) -> Vec<&str> {
        let referenced = self.template.slot_names();
        self.lexicon
            .slot_names()
            .filter(|s| !referenced.contains(s))
            .collect()
    }
}

impl StoryStyle {
    /// Check a loaded style for authoring problems that parsing accepts.
    pub fn lint(&self, min_phrases: usize) -> LintReport {
        let mut report = LintReport::default();

        if self.template.slot_names().is_empty() {
            report
                .warnings
                .push(format!("Style '{}' template has no slots", self.name));
        }

        // Renders as the bare slot name at runtime.
        for slot in self.unknown_slots() {
            report
                .errors
                .push(format!("Template slot '{}' has no lexicon entry", slot));
        }

        for slot in self.unused_slots() {
            report.warnings.push(format!(
                "Lexicon slot '{}' is never used by the template",
                slot
            ));
        }

        for (slot, phrases) in self.lexicon.iter() {
            if phrases.len() < min_phrases {
                report.warnings.push(format!(
                    "Slot '{}' has only {} phrases (minimum {} recommended)",
                    slot,
                    phrases.len(),
                    min_phrases
                ));
            }

            let mut seen = FxHashSet::default();
            for phrase in phrases {
                if phrase.trim().is_empty() {
                    report
                        .errors
                        .push(format!("Slot '{}' contains a blank phrase", slot));
                } else if !seen.insert(phrase.as_str()) {
                    report.warnings.push(format!(
                        "Slot '{}' lists '{}' more than once, skewing its odds",
                        slot, phrase
                    ));
                }
            }
        }

        if self.particles.count == 0 {
            report
                .warnings
                .push("Particle count is 0; no decoration will be drawn".to_string());
        }
        if self.particles.min_cycle_secs <= 0.0 {
            report
                .errors
                .push("Particle min_cycle_secs must be positive".to_string());
        }

        report
    }
}

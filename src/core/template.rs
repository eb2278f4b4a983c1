/// Sentence templates — parsing `{slot}` placeholders and rendering them
/// against a story state.

use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::core::motion;
use crate::core::story::StoryState;
use crate::schema::segment::{self, Segment};

#[derive(Debug, Error, PartialEq)]
pub enum TemplateError {
    #[error("template parse error: {0}")]
    Parse(String),
}

/// A piece of a parsed template.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum TemplatePart {
    /// Literal text, emitted as-is.
    Literal(String),
    /// Named blank: `{slot_name}`.
    Slot(String),
}

/// A parsed template — literal text interleaved with slot references.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Template {
    source: String,
    parts: Vec<TemplatePart>,
}

impl Template {
    /// Parse a template string.
    ///
    /// Syntax:
    /// - `{slot_name}` → `Slot`
    /// - `{{` / `}}` → literal `{` / `}`
    /// - Everything else → `Literal`
    pub fn parse(input: &str) -> Result<Template, TemplateError> {
        let mut parts = Vec::new();
        let mut literal_buf = String::new();
        let chars: Vec<char> = input.chars().collect();
        let len = chars.len();
        let mut i = 0;

        while i < len {
            if chars[i] == '{' {
                if i + 1 < len && chars[i + 1] == '{' {
                    literal_buf.push('{');
                    i += 2;
                    continue;
                }

                if !literal_buf.is_empty() {
                    parts.push(TemplatePart::Literal(std::mem::take(&mut literal_buf)));
                }

                let start = i + 1;
                let mut end = start;
                while end < len && chars[end] != '}' {
                    if chars[end] == '{' {
                        return Err(TemplateError::Parse(
                            "nested braces are not allowed".to_string(),
                        ));
                    }
                    end += 1;
                }

                if end == len {
                    return Err(TemplateError::Parse("unclosed brace".to_string()));
                }

                let name: String = chars[start..end].iter().collect();
                let name = name.trim();
                if name.is_empty() {
                    return Err(TemplateError::Parse("empty braces".to_string()));
                }

                parts.push(TemplatePart::Slot(name.to_string()));
                i = end + 1;
            } else if chars[i] == '}' {
                if i + 1 < len && chars[i + 1] == '}' {
                    literal_buf.push('}');
                    i += 2;
                    continue;
                }
                return Err(TemplateError::Parse(
                    "unmatched closing brace".to_string(),
                ));
            } else {
                literal_buf.push(chars[i]);
                i += 1;
            }
        }

        if !literal_buf.is_empty() {
            parts.push(TemplatePart::Literal(literal_buf));
        }

        Ok(Template {
            source: input.to_string(),
            parts,
        })
    }

    /// The unparsed template text.
    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn parts(&self) -> &[TemplatePart] {
        &self.parts
    }

    /// Distinct slot names referenced by this template.
    pub fn slot_names(&self) -> FxHashSet<&str> {
        self.parts
            .iter()
            .filter_map(|p| match p {
                TemplatePart::Slot(name) => Some(name.as_str()),
                TemplatePart::Literal(_) => None,
            })
            .collect()
    }

    /// Render against `state`. Never fails: a slot missing from the state
    /// displays its own name.
    pub fn render(&self, state: &StoryState) -> Vec<Segment> {
        self.parts
            .iter()
            .enumerate()
            .map(|(index, part)| match part {
                TemplatePart::Literal(text) => Segment::Literal {
                    text: text.clone(),
                    index,
                },
                TemplatePart::Slot(slot) => match state.get(slot) {
                    Some(value) => Segment::Slot {
                        slot: slot.clone(),
                        value: value.to_string(),
                        index,
                        resolved: true,
                    },
                    None => Segment::Slot {
                        slot: slot.clone(),
                        value: slot.clone(),
                        index,
                        resolved: false,
                    },
                },
            })
            .collect()
    }

    /// The fully substituted sentence.
    pub fn render_plain(&self, state: &StoryState) -> String {
        segment::join(&self.render(state))
    }
}

/// Free-function form of [`Template::render`].
pub fn render(template: &Template, state: &StoryState) -> Vec<Segment> {
    template.render(state)
}

/// Timing of the left-to-right reveal of slot segments.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RevealConfig {
    /// Delay added per segment index.
    pub stagger_secs: f32,
    pub duration_secs: f32,
    pub bounce: f32,
    pub initial_scale: f32,
}

impl Default for RevealConfig {
    fn default() -> Self {
        Self {
            stagger_secs: 0.1,
            duration_secs: 0.5,
            bounce: 0.3,
            initial_scale: 0.8,
        }
    }
}

/// Appearance of a segment during its entrance.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Reveal {
    pub opacity: f32,
    pub scale: f32,
}

impl Reveal {
    pub const SETTLED: Reveal = Reveal {
        opacity: 1.0,
        scale: 1.0,
    };
}

impl RevealConfig {
    pub fn delay_secs(&self, index: usize) -> f32 {
        index as f32 * self.stagger_secs
    }

    /// Entrance state of segment `index`, `since_secs` after the story
    /// changed.
    pub fn at(&self, index: usize, since_secs: f32) -> Reveal {
        let t = motion::progress(since_secs, self.delay_secs(index), self.duration_secs);
        if t >= 1.0 {
            return Reveal::SETTLED;
        }
        Reveal {
            opacity: t,
            scale: motion::lerp(
                self.initial_scale,
                1.0,
                motion::spring_out(t, self.bounce),
            ),
        }
    }

    /// Reveal state for `segment`; literal text is shown immediately.
    pub fn for_segment(&self, segment: &Segment, since_secs: f32) -> Reveal {
        if segment.is_slot() {
            self.at(segment.index(), since_secs)
        } else {
            Reveal::SETTLED
        }
    }

    /// Seconds until every one of `segment_count` segments has settled.
    pub fn total_secs(&self, segment_count: usize) -> f32 {
        self.delay_secs(segment_count.saturating_sub(1)) + self.duration_secs
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state(pairs: &[(&str, &str)]) -> StoryState {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn parse_literal_only() {
        let t = Template::parse("Hello, world.").unwrap();
        assert_eq!(
            t.parts(),
            &[TemplatePart::Literal("Hello, world.".to_string())]
        );
    }

    #[test]
    fn parse_slot() {
        let t = Template::parse("The {color} cat").unwrap();
        assert_eq!(t.parts().len(), 3);
        assert_eq!(t.parts()[1], TemplatePart::Slot("color".to_string()));
    }

    #[test]
    fn parse_adjacent_slots() {
        let t = Template::parse("{a}{b}").unwrap();
        assert_eq!(
            t.parts(),
            &[
                TemplatePart::Slot("a".to_string()),
                TemplatePart::Slot("b".to_string())
            ]
        );
    }

    #[test]
    fn parse_escaped_braces() {
        let t = Template::parse("Use {{braces}} here.").unwrap();
        assert_eq!(
            t.parts(),
            &[TemplatePart::Literal("Use {braces} here.".to_string())]
        );
    }

    #[test]
    fn parse_errors() {
        assert!(Template::parse("Bad {} here").is_err());
        assert!(Template::parse("Bad {outer{inner}} here").is_err());
        assert!(Template::parse("Bad {unclosed here").is_err());
        assert!(Template::parse("Bad } here").is_err());
    }

    #[test]
    fn slot_names_deduplicated() {
        let t = Template::parse("{hero} met {villain}; {hero} won.").unwrap();
        let names = t.slot_names();
        assert_eq!(names.len(), 2);
        assert!(names.contains("hero"));
        assert!(names.contains("villain"));
    }

    #[test]
    fn render_substitutes_and_indexes() {
        let t = Template::parse("The {color} {animal} ran.").unwrap();
        let segs = t.render(&state(&[("color", "red"), ("animal", "cat")]));
        assert_eq!(segs.len(), 5);
        assert_eq!(segs[1].text(), "red");
        assert!(segs[1].is_slot());
        assert!(!segs[2].is_slot());
        for (i, s) in segs.iter().enumerate() {
            assert_eq!(s.index(), i);
        }
        assert_eq!(segment::join(&segs), "The red cat ran.");
    }

    #[test]
    fn render_missing_slot_shows_name() {
        let t = Template::parse("A {missing} thing.").unwrap();
        let segs = t.render(&StoryState::placeholder());
        assert_eq!(
            segs[1],
            Segment::Slot {
                slot: "missing".to_string(),
                value: "missing".to_string(),
                index: 1,
                resolved: false,
            }
        );
        assert_eq!(t.render_plain(&StoryState::placeholder()), "A missing thing.");
    }

    #[test]
    fn reveal_staggers_by_index() {
        let reveal = RevealConfig::default();
        assert!((reveal.delay_secs(3) - 0.3).abs() < 1e-6);

        let before = reveal.at(3, 0.2);
        assert_eq!(before.opacity, 0.0);
        assert!((before.scale - 0.8).abs() < 1e-6);

        let during = reveal.at(3, 0.55);
        assert!(during.opacity > 0.0 && during.opacity < 1.0);

        assert_eq!(reveal.at(3, 0.9), Reveal::SETTLED);
    }

    #[test]
    fn literal_segments_do_not_animate() {
        let reveal = RevealConfig::default();
        let t = Template::parse("A {b} c").unwrap();
        let segs = t.render(&state(&[("b", "bee")]));
        assert_eq!(reveal.for_segment(&segs[0], 0.0), Reveal::SETTLED);
        assert_eq!(reveal.for_segment(&segs[1], 0.0).opacity, 0.0);
    }

    #[test]
    fn total_covers_last_segment() {
        let reveal = RevealConfig::default();
        assert!((reveal.total_secs(5) - 0.9).abs() < 1e-6);
        assert!((reveal.total_secs(0) - 0.5).abs() < 1e-6);
    }

    #[test]
    fn render_plain_keeps_escaped_braces() {
        let t = Template::parse("{{{name}}}").unwrap();
        assert_eq!(t.render_plain(&state(&[("name", "x")])), "{x}");
    }
}

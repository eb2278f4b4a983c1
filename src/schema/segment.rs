use serde::{Deserialize, Serialize};

/// One display span of a rendered template.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Segment {
    /// Template text between placeholders.
    Literal { text: String, index: usize },
    /// A filled placeholder. `resolved` is false when the state had no
    /// entry for `slot`, in which case `value` is the slot name itself.
    Slot {
        slot: String,
        value: String,
        index: usize,
        resolved: bool,
    },
}

impl Segment {
    /// The text this segment contributes to the sentence.
    pub fn text(&self) -> &str {
        match self {
            Segment::Literal { text, .. } => text,
            Segment::Slot { value, .. } => value,
        }
    }

    /// Position in the rendered sequence; drives the staggered reveal.
    pub fn index(&self) -> usize {
        match self {
            Segment::Literal { index, .. } | Segment::Slot { index, .. } => *index,
        }
    }

    pub fn is_slot(&self) -> bool {
        matches!(self, Segment::Slot { .. })
    }
}

/// Concatenate segment texts into the full sentence.
pub fn join(segments: &[Segment]) -> String {
    segments.iter().map(Segment::text).collect()
}

/// Story state — the currently selected phrase for every slot.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::core::lexicon::Lexicon;
use crate::core::sampler::{pick, RandomSource};

/// One resolved phrase per lexicon slot.
///
/// Never mutated in place: a regenerate produces a whole new state.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoryState {
    values: BTreeMap<String, String>,
}

impl StoryState {
    /// The empty placeholder shown before the first randomize step.
    pub fn placeholder() -> StoryState {
        StoryState::default()
    }

    /// Sample every slot of `lexicon` independently.
    pub fn generate<S: RandomSource + ?Sized>(lexicon: &Lexicon, source: &mut S) -> StoryState {
        let values = lexicon
            .iter()
            .map(|(slot, phrases)| (slot.to_string(), pick(phrases, source).clone()))
            .collect();
        StoryState { values }
    }

    pub fn get(&self, slot: &str) -> Option<&str> {
        self.values.get(slot).map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// True when every value is a member of its slot's lexicon list and
    /// every lexicon slot is present.
    pub fn is_consistent_with(&self, lexicon: &Lexicon) -> bool {
        self.values.len() == lexicon.len()
            && self.values.iter().all(|(slot, value)| {
                lexicon
                    .phrases(slot)
                    .is_some_and(|phrases| phrases.iter().any(|p| p == value))
            })
    }
}

impl FromIterator<(String, String)> for StoryState {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        StoryState {
            values: iter.into_iter().collect(),
        }
    }
}

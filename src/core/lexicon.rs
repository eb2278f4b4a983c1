/// Lexicon — the fixed catalog of candidate phrases per slot.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum LexiconError {
    #[error("slot '{0}' has no candidate phrases")]
    EmptySlot(String),
    #[error("slot name must not be empty")]
    EmptySlotName,
}

/// Mapping from slot name to its ordered, non-empty list of phrases.
///
/// Slots are kept sorted so generation from a seeded source is
/// reproducible across runs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "BTreeMap<String, Vec<String>>", into = "BTreeMap<String, Vec<String>>")]
pub struct Lexicon {
    slots: BTreeMap<String, Vec<String>>,
}

impl Lexicon {
    /// Build a lexicon, rejecting empty phrase lists.
    pub fn new(slots: BTreeMap<String, Vec<String>>) -> Result<Lexicon, LexiconError> {
        for (name, phrases) in &slots {
            if name.is_empty() {
                return Err(LexiconError::EmptySlotName);
            }
            if phrases.is_empty() {
                return Err(LexiconError::EmptySlot(name.clone()));
            }
        }
        Ok(Lexicon { slots })
    }

    /// Convenience constructor from string slices.
    pub fn from_pairs(pairs: &[(&str, &[&str])]) -> Result<Lexicon, LexiconError> {
        let slots = pairs
            .iter()
            .map(|(name, phrases)| {
                (
                    name.to_string(),
                    phrases.iter().map(|p| p.to_string()).collect(),
                )
            })
            .collect();
        Self::new(slots)
    }

    pub fn phrases(&self, slot: &str) -> Option<&[String]> {
        self.slots.get(slot).map(Vec::as_slice)
    }

    pub fn contains(&self, slot: &str) -> bool {
        self.slots.contains_key(slot)
    }

    /// Slot names in sorted order.
    pub fn slot_names(&self) -> impl Iterator<Item = &str> {
        self.slots.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.slots.iter().map(|(k, v)| (k.as_str(), v.as_slice()))
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Number of distinct sentences this lexicon can fill.
    pub fn combinations(&self) -> u128 {
        self.slots
            .values()
            .map(|p| p.len() as u128)
            .fold(1u128, |acc, n| acc.saturating_mul(n))
    }
}

impl TryFrom<BTreeMap<String, Vec<String>>> for Lexicon {
    type Error = LexiconError;

    fn try_from(slots: BTreeMap<String, Vec<String>>) -> Result<Self, Self::Error> {
        Lexicon::new(slots)
    }
}

impl From<Lexicon> for BTreeMap<String, Vec<String>> {
    fn from(lexicon: Lexicon) -> Self {
        lexicon.slots
    }
}

//! Story Weaver — randomized story sentences with animated decoration.
//!
//! A story style bundles a sentence template with a lexicon of candidate
//! phrases per slot. The engine samples one phrase per slot, renders the
//! template into highlighted segments, and drives a field of drifting
//! particles for the front ends to draw.

pub mod core;
pub mod schema;
pub mod story_styles;

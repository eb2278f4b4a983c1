/// Story generation integration tests — lexicon sampling and rendering
/// end to end.

use rustc_hash::{FxHashMap, FxHashSet};
use story_weaver::core::lexicon::Lexicon;
use story_weaver::core::sampler::{RngSource, SequenceSource};
use story_weaver::core::story::StoryState;
use story_weaver::core::template::{render, Template};
use story_weaver::schema::segment;
use story_weaver::schema::style::{StoryStyle, StyleError};
use story_weaver::story_styles;

fn pets() -> (Lexicon, Template) {
    let lexicon = Lexicon::from_pairs(&[("color", &["red", "blue"]), ("animal", &["cat", "dog"])])
        .unwrap();
    let template = Template::parse("The {color} {animal} ran.").unwrap();
    (lexicon, template)
}

#[test]
fn pets_template_only_produces_four_sentences() {
    let (lexicon, template) = pets();
    let allowed: FxHashSet<&str> = [
        "The red cat ran.",
        "The red dog ran.",
        "The blue cat ran.",
        "The blue dog ran.",
    ]
    .into_iter()
    .collect();

    let mut seen = FxHashSet::default();
    let mut src = RngSource::from_seed(42);
    for _ in 0..2_000 {
        let state = StoryState::generate(&lexicon, &mut src);
        let sentence = segment::join(&render(&template, &state));
        assert!(allowed.contains(sentence.as_str()), "unexpected: {}", sentence);
        seen.insert(sentence);
    }
    // Every variant turns up over enough draws.
    assert_eq!(seen.len(), 4);
}

#[test]
fn membership_holds_for_builtin_styles() {
    let mut src = RngSource::from_seed(1);
    for name in story_styles::available() {
        let style = story_styles::builtin(name).unwrap();
        for _ in 0..500 {
            let state = StoryState::generate(&style.lexicon, &mut src);
            for (slot, phrases) in style.lexicon.iter() {
                let value = state.get(slot).unwrap();
                assert!(phrases.iter().any(|p| p == value));
            }
        }
    }
}

#[test]
fn regenerating_twice_gives_two_consistent_states() {
    let style = story_styles::builtin("wolfe").unwrap();
    let mut src = RngSource::from_entropy();
    let first = StoryState::generate(&style.lexicon, &mut src);
    let second = StoryState::generate(&style.lexicon, &mut src);
    assert!(first.is_consistent_with(&style.lexicon));
    assert!(second.is_consistent_with(&style.lexicon));
}

#[test]
fn slot_frequencies_are_roughly_uniform() {
    let lexicon = Lexicon::from_pairs(&[("form", &["letter", "journal", "confession", "memoir"])])
        .unwrap();
    let mut src = RngSource::from_seed(99);
    let trials = 10_000;
    let mut counts: FxHashMap<String, u32> = FxHashMap::default();
    for _ in 0..trials {
        let state = StoryState::generate(&lexicon, &mut src);
        *counts.entry(state.get("form").unwrap().to_string()).or_insert(0) += 1;
    }
    assert_eq!(counts.len(), 4);
    for (phrase, count) in counts {
        let freq = count as f64 / trials as f64;
        assert!(
            (freq - 0.25).abs() < 0.025,
            "'{}' drawn {:.3} of the time",
            phrase,
            freq
        );
    }
}

#[test]
fn render_matches_direct_substitution() {
    let style = story_styles::builtin("sidekick").unwrap();
    let mut src = RngSource::from_seed(5);
    for _ in 0..100 {
        let state = StoryState::generate(&style.lexicon, &mut src);
        let mut expected = style.template.source().to_string();
        for (slot, value) in state.iter() {
            expected = expected.replace(&format!("{{{}}}", slot), value);
        }
        assert_eq!(style.template.render_plain(&state), expected);
    }
}

#[test]
fn unresolved_placeholder_renders_its_name() {
    let template = Template::parse("A {known} and a {missing}.").unwrap();
    let lexicon = Lexicon::from_pairs(&[("known", &["thing"])]).unwrap();
    let state = StoryState::generate(&lexicon, &mut SequenceSource::new(vec![0.0]));
    assert_eq!(template.render_plain(&state), "A thing and a missing.");
}

#[test]
fn fixture_style_loads() {
    let path = std::path::Path::new("tests/fixtures/test_style.ron");
    let style = StoryStyle::load_from_ron(path).unwrap();
    assert_eq!(style.name, "pets");
    assert_eq!(style.footer, "Press n for another");
    assert_eq!(style.lexicon.combinations(), 4);
    assert!(style.lint(2).is_clean());
}

#[test]
fn mismatched_fixture_loads_but_lints_dirty() {
    let path = std::path::Path::new("tests/fixtures/mismatched_style.ron");
    let style = StoryStyle::load_from_ron(path).unwrap();
    assert_eq!(style.unknown_slots(), vec!["missing"]);
    assert_eq!(style.unused_slots(), vec!["spare"]);

    let report = style.lint(3);
    assert_eq!(report.errors.len(), 1);
    // "spare" is both unused and too short
    assert_eq!(report.warnings.len(), 2);
}

#[test]
fn empty_slot_fixture_is_rejected() {
    let path = std::path::Path::new("tests/fixtures/empty_slot_style.ron");
    let err = StoryStyle::load_from_ron(path).unwrap_err();
    assert!(matches!(err, StyleError::Lexicon(_)));
}

#[test]
fn shipped_style_files_lint_clean() {
    for path in ["story_data/wolfe/style.ron", "story_data/sidekick/style.ron"] {
        let style = StoryStyle::load_from_ron(std::path::Path::new(path)).unwrap();
        let report = style.lint(3);
        assert!(report.is_clean(), "{}: {:?}", path, report);
    }
}

use crate::analyzer::word_count;
use scribebot_core::ValidationRules;
use tracing::debug;

/// Check a draft against the publication rules.
///
/// All three checks are conjunctive and the result carries no rule
/// attribution: a rejected draft is simply rejected.
pub fn is_valid(text: &str, rules: &ValidationRules) -> bool {
    if word_count(text) < rules.min_word_count {
        debug!("Draft rejected: below minimum word count");
        return false;
    }

    let lowered = text.to_lowercase();

    let has_required_sections = rules
        .required_sections
        .iter()
        .all(|section| lowered.contains(&section.to_lowercase()));
    if !has_required_sections {
        debug!("Draft rejected: missing a required section");
        return false;
    }

    let has_forbidden_phrase = rules
        .forbidden_phrases
        .iter()
        .any(|phrase| lowered.contains(&phrase.to_lowercase()));
    if has_forbidden_phrase {
        debug!("Draft rejected: contains a forbidden phrase");
        return false;
    }

    true
}

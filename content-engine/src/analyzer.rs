use chrono::Utc;
use scribebot_core::PostAnalytics;
use std::collections::HashMap;

/// Number of whitespace-delimited tokens.
pub fn word_count(text: &str) -> usize {
    text.split_whitespace().count()
}

/// Case-insensitive, non-overlapping occurrence count.
///
/// Plain substring matching: keyphrases often contain characters that are
/// meaningful in pattern languages ("C++", "C#"), so they are never
/// interpreted as patterns.
fn count_occurrences(text: &str, phrase: &str) -> usize {
    let needle = phrase.to_lowercase();
    if needle.is_empty() {
        return 0;
    }
    text.to_lowercase().matches(needle.as_str()).count()
}

/// Compute word count and per-keyphrase frequency for a published post.
/// Keyphrases with zero occurrences stay in the mapping.
pub fn analyze(
    text: &str,
    title: &str,
    external_id: &str,
    keyphrases: &[String],
) -> PostAnalytics {
    let keyphrase_count: HashMap<String, usize> = keyphrases
        .iter()
        .map(|phrase| {
            let trimmed = phrase.trim();
            (trimmed.to_string(), count_occurrences(text, trimmed))
        })
        .collect();

    PostAnalytics {
        post_id: external_id.to_string(),
        title: title.to_string(),
        publish_date: Utc::now(),
        word_count: word_count(text),
        keyphrase_count,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_word_count() {
        assert_eq!(word_count("one two three"), 3);
        assert_eq!(word_count("  spaced \t out \n words  "), 3);
        assert_eq!(word_count(""), 0);
    }

    #[test]
    fn test_keyphrase_counting_is_case_insensitive() {
        let keyphrases = vec!["composting".to_string()];
        let analytics = analyze(
            "Composting is easy. Start COMPOSTING today; composting pays off.",
            "Composting Guide",
            "item-1",
            &keyphrases,
        );

        assert_eq!(analytics.keyphrase_count["composting"], 3);
    }

    #[test]
    fn test_absent_keyphrase_counts_as_zero() {
        let keyphrases = vec!["composting".to_string(), "hydroponics".to_string()];
        let analytics = analyze("All about composting.", "Guide", "item-2", &keyphrases);

        // Zero, not missing.
        assert_eq!(analytics.keyphrase_count["hydroponics"], 0);
        assert_eq!(analytics.keyphrase_count.len(), 2);
    }

    #[test]
    fn test_keyphrases_are_not_patterns() {
        let keyphrases = vec!["C++".to_string()];
        let analytics = analyze(
            "C++ is fast. Modern C++ is safer than old C++.",
            "Systems Languages",
            "item-3",
            &keyphrases,
        );

        assert_eq!(analytics.keyphrase_count["C++"], 3);
    }

    #[test]
    fn test_keyphrases_are_trimmed() {
        // Comma-joined lists arrive with stray whitespace.
        let keyphrases = vec![" soil health".to_string()];
        let analytics = analyze("Soil health matters.", "Guide", "item-4", &keyphrases);

        assert_eq!(analytics.keyphrase_count["soil health"], 1);
    }

    #[test]
    fn test_analytics_fields() {
        let analytics = analyze("some body text", "My Title", "item-5", &[]);

        assert_eq!(analytics.post_id, "item-5");
        assert_eq!(analytics.title, "My Title");
        assert_eq!(analytics.word_count, 3);
        assert!(analytics.keyphrase_count.is_empty());
    }
}

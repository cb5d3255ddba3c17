//! Tag suggestion strategies.
//!
//! The bundled [`KeywordTagSuggester`] is a keyword heuristic with a random
//! fallback. It makes no claim to semantic accuracy; anything implementing
//! [`TagSuggester`] can replace it.

use std::sync::Mutex;

use async_trait::async_trait;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

use crate::error::{NoteSyncError, Result};

/// Minimum trimmed content length, in characters, accepted for suggestions.
pub const MIN_SUGGEST_CHARS: usize = 10;

/// Number of tags a suggestion returns.
pub const SUGGESTION_COUNT: usize = 2;

/// Keyword rules, checked in order. Any keyword in a rule yields its tag.
const KEYWORD_RULES: &[(&[&str], &str)] = &[
    (&["meeting"], "meeting"),
    (&["todo", "task"], "todo"),
    (&["idea", "concept"], "idea"),
    (&["travel", "trip"], "travel"),
    (&["recipe", "cook"], "recipe"),
    (&["work", "job"], "work"),
    (&["learn", "study"], "learning"),
];

/// Tags used to fill a suggestion when keywords match fewer than two.
pub const FALLBACK_TAGS: &[&str] = &[
    "work", "personal", "idea", "todo", "meeting", "project", "learning", "travel", "recipe",
    "health",
];

#[async_trait]
pub trait TagSuggester: Send + Sync {
    /// Suggest tags for `content`.
    async fn suggest(&self, content: &str) -> Result<Vec<String>>;
}

/// Reject content too short to suggest tags for.
pub fn check_suggest_content(content: &str) -> Result<()> {
    if content.trim().chars().count() < MIN_SUGGEST_CHARS {
        return Err(NoteSyncError::validation(format!(
            "need at least {} characters to suggest tags",
            MIN_SUGGEST_CHARS
        )));
    }
    Ok(())
}

/// Tags whose keywords appear in `content`, in rule order.
pub fn keyword_tags(content: &str) -> Vec<String> {
    let lowered = content.to_lowercase();
    KEYWORD_RULES
        .iter()
        .filter(|(keywords, _)| keywords.iter().any(|k| lowered.contains(k)))
        .map(|(_, tag)| tag.to_string())
        .collect()
}

pub struct KeywordTagSuggester {
    rng: Mutex<StdRng>,
}

impl Default for KeywordTagSuggester {
    fn default() -> Self {
        Self::new()
    }
}

impl KeywordTagSuggester {
    pub fn new() -> Self {
        Self {
            rng: Mutex::new(StdRng::from_entropy()),
        }
    }

    /// Deterministic fallback picks, for tests and reproducible runs.
    pub fn with_seed(seed: u64) -> Self {
        Self {
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }

    pub fn suggest_now(&self, content: &str) -> Result<Vec<String>> {
        check_suggest_content(content)?;

        let mut tags = keyword_tags(content);
        if tags.len() < SUGGESTION_COUNT {
            let mut rng = self.rng.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
            while tags.len() < SUGGESTION_COUNT {
                let unused: Vec<&str> = FALLBACK_TAGS
                    .iter()
                    .copied()
                    .filter(|t| !tags.iter().any(|have| have == t))
                    .collect();
                match unused.choose(&mut *rng) {
                    Some(tag) => tags.push(tag.to_string()),
                    None => break,
                }
            }
        }
        tags.truncate(SUGGESTION_COUNT);
        Ok(tags)
    }
}

#[async_trait]
impl TagSuggester for KeywordTagSuggester {
    async fn suggest(&self, content: &str) -> Result<Vec<String>> {
        self.suggest_now(content)
    }
}

/// Drop suggestions the note already carries.
pub fn exclude_existing(suggested: Vec<String>, current: &[String]) -> Vec<String> {
    suggested
        .into_iter()
        .filter(|tag| !current.iter().any(|have| have.eq_ignore_ascii_case(tag)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_meeting_and_todo_keywords() {
        let suggester = KeywordTagSuggester::with_seed(7);
        let tags = suggester
            .suggest_now("We had a team meeting about the project todo list")
            .unwrap();
        assert_eq!(tags, vec!["meeting", "todo"]);
    }

    #[test]
    fn test_short_content_is_rejected() {
        let suggester = KeywordTagSuggester::with_seed(7);
        let err = suggester.suggest_now("short").unwrap_err();
        assert!(matches!(err, NoteSyncError::Validation(_)));

        let err = suggester.suggest_now("   padded     ").unwrap_err();
        assert!(matches!(err, NoteSyncError::Validation(_)));
    }

    #[test]
    fn test_more_than_two_matches_are_truncated_in_rule_order() {
        let suggester = KeywordTagSuggester::with_seed(1);
        let tags = suggester
            .suggest_now("A work trip to study a new recipe concept")
            .unwrap();
        assert_eq!(tags, vec!["idea", "travel"]);
    }

    #[test]
    fn test_single_match_is_filled_from_fallback() {
        let suggester = KeywordTagSuggester::with_seed(3);
        for _ in 0..20 {
            let tags = suggester.suggest_now("Packing list for the trip").unwrap();
            assert_eq!(tags.len(), 2);
            assert_eq!(tags[0], "travel");
            assert_ne!(tags[1], "travel");
            assert!(FALLBACK_TAGS.contains(&tags[1].as_str()));
        }
    }

    #[test]
    fn test_no_match_yields_two_distinct_fallback_tags() {
        let suggester = KeywordTagSuggester::with_seed(11);
        for _ in 0..20 {
            let tags = suggester.suggest_now("Plain words with nothing special").unwrap();
            assert_eq!(tags.len(), 2);
            assert_ne!(tags[0], tags[1]);
            assert!(tags.iter().all(|t| FALLBACK_TAGS.contains(&t.as_str())));
        }
    }

    #[test]
    fn test_keywords_are_case_insensitive() {
        assert_eq!(keyword_tags("MEETING notes"), vec!["meeting"]);
        assert_eq!(keyword_tags("Homework due"), vec!["work"]);
    }

    #[test]
    fn test_exclude_existing() {
        let kept = exclude_existing(
            vec!["meeting".to_string(), "todo".to_string()],
            &["todo".to_string()],
        );
        assert_eq!(kept, vec!["meeting"]);
    }

    #[tokio::test]
    async fn test_trait_object_dispatch() {
        let suggester: Box<dyn TagSuggester> = Box::new(KeywordTagSuggester::with_seed(5));
        let tags = suggester.suggest("An idea for a cooking blog").await.unwrap();
        assert_eq!(tags, vec!["idea", "recipe"]);
    }
}

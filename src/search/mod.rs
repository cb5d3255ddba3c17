//! Note filtering and query-string parsing.

pub mod pagination;

pub use pagination::{
    paginate, resolve, total_pages, Page, PageRequest, PageWindow, Pagination, DEFAULT_PAGE_LIMIT,
};

use crate::entity::{normalize_tags, Note};

/// Text and tag filter applied by search.
///
/// - `text` matches title or content, case-insensitively; empty means no
///   text filter.
/// - `tags` matches notes carrying at least one of the tags; empty means no
///   tag filter.
///
/// Both filters must hold for a note to match.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct NoteQuery {
    pub text: String,
    pub tags: Vec<String>,
}

impl NoteQuery {
    pub fn new<I, S>(text: impl Into<String>, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            text: text.into().trim().to_string(),
            tags: normalize_tags(tags),
        }
    }

    /// Check if the query has no constraints at all.
    pub fn is_empty(&self) -> bool {
        self.text.is_empty() && self.tags.is_empty()
    }

    pub fn matches(&self, note: &Note) -> bool {
        self.matches_text(note) && (self.tags.is_empty() || note.has_any_tag(&self.tags))
    }

    fn matches_text(&self, note: &Note) -> bool {
        if self.text.is_empty() {
            return true;
        }
        let needle = self.text.to_lowercase();
        note.title.to_lowercase().contains(&needle) || note.content.to_lowercase().contains(&needle)
    }
}

/// Parse a raw search string into a query. `tag:<name>` tokens become tag
/// filters; every other token is kept as search text.
///
/// # Examples
///
/// ```ignore
/// let query = parse_query("tag:work tag:todo quarterly report");
/// assert_eq!(query.text, "quarterly report");
/// assert_eq!(query.tags, vec!["work", "todo"]);
/// ```
pub fn parse_query(raw: &str) -> NoteQuery {
    let mut tags = Vec::new();
    let mut remaining = Vec::new();

    for token in raw.split_whitespace() {
        match token.strip_prefix("tag:") {
            Some(value) => tags.push(value),
            None => remaining.push(token),
        }
    }

    NoteQuery::new(remaining.join(" "), tags)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::{NewNote, OwnerId};

    fn note(title: &str, content: &str, tags: &[&str]) -> Note {
        let draft = NewNote::new(title, content).with_tags(tags.iter().copied());
        Note::create(OwnerId::new("1"), draft).unwrap()
    }

    #[test]
    fn test_parse_query_no_filters() {
        let query = parse_query("hello world");
        assert_eq!(query.text, "hello world");
        assert!(query.tags.is_empty());
    }

    #[test]
    fn test_parse_query_multiple_tags() {
        let query = parse_query("tag:Important tag:urgent search term");
        assert_eq!(query.text, "search term");
        assert_eq!(query.tags, vec!["important", "urgent"]);
    }

    #[test]
    fn test_parse_query_only_filters() {
        let query = parse_query("tag:travel");
        assert_eq!(query.text, "");
        assert!(!query.is_empty());
        assert!(parse_query("   ").is_empty());
    }

    #[test]
    fn test_text_matches_title_or_content_case_insensitively() {
        let n = note("Team Meeting", "agenda", &[]);
        assert!(NoteQuery::new("meeting", Vec::<String>::new()).matches(&n));
        assert!(NoteQuery::new("AGENDA", Vec::<String>::new()).matches(&n));
        assert!(!NoteQuery::new("budget", Vec::<String>::new()).matches(&n));
    }

    #[test]
    fn test_tags_match_any_requested_tag() {
        let n = note("t", "c", &["travel", "planning"]);
        assert!(NoteQuery::new("", ["food", "travel"]).matches(&n));
        assert!(!NoteQuery::new("", ["food"]).matches(&n));
    }

    #[test]
    fn test_text_and_tags_combine_with_and() {
        let n = note("Trip plan", "hotel", &["travel"]);
        assert!(NoteQuery::new("hotel", ["travel"]).matches(&n));
        assert!(!NoteQuery::new("hotel", ["work"]).matches(&n));
        assert!(!NoteQuery::new("museum", ["travel"]).matches(&n));
    }

    #[test]
    fn test_empty_query_matches_everything() {
        let n = note("anything", "at all", &[]);
        assert!(NoteQuery::default().matches(&n));
    }
}

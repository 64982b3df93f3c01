//! Tag completion for free-text input.
//!
//! The word under the cursor runs from the last space before the cursor up to
//! the cursor. Completion is offered only while that word is a `#` followed by
//! at least one character. Cursor positions are byte offsets into the text and
//! are snapped back to a grapheme boundary before use.

use std::collections::HashSet;

use crate::util::unicode::snap_to_grapheme_start;

/// Default cap on the number of suggestions
pub const MAX_SUGGESTIONS: usize = 5;

/// The word being typed at the cursor
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CurrentWord<'a> {
    /// Byte offset where the word starts
    pub start: usize,
    /// Byte offset of the cursor (end of the word)
    pub end: usize,
    pub text: &'a str,
}

/// Text after a completion has been inserted
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Completion {
    pub text: String,
    pub cursor: usize,
}

pub fn current_word(text: &str, cursor: usize) -> CurrentWord<'_> {
    let end = snap_to_grapheme_start(text, cursor);
    let start = text[..end].rfind(' ').map(|i| i + 1).unwrap_or(0);
    CurrentWord {
        start,
        end,
        text: &text[start..end],
    }
}

/// Lowercased search term of an in-progress `#tag`, if the cursor is on one.
pub fn tag_search_term(text: &str, cursor: usize) -> Option<String> {
    let word = current_word(text, cursor);
    word.text
        .strip_prefix('#')
        .filter(|term| !term.is_empty())
        .map(str::to_lowercase)
}

/// Rank `known` tags against a lowercase `term`: prefix matches before
/// substring matches, alphabetical (case-insensitive) within each group.
pub fn rank_tags(term: &str, known: &HashSet<String>, limit: usize) -> Vec<String> {
    let mut matches: Vec<(bool, String, &String)> = known
        .iter()
        .filter_map(|tag| {
            let lower = tag.to_lowercase();
            lower
                .contains(term)
                .then(|| (!lower.starts_with(term), lower, tag))
        })
        .collect();
    matches.sort();
    matches
        .into_iter()
        .take(limit)
        .map(|(_, _, tag)| tag.clone())
        .collect()
}

/// Up to [`MAX_SUGGESTIONS`] completions for the tag under the cursor. Empty
/// when the cursor is not on a `#tag` token.
pub fn suggest(text: &str, cursor: usize, known: &HashSet<String>) -> Vec<String> {
    suggest_limited(text, cursor, known, MAX_SUGGESTIONS)
}

pub fn suggest_limited(
    text: &str,
    cursor: usize,
    known: &HashSet<String>,
    limit: usize,
) -> Vec<String> {
    match tag_search_term(text, cursor) {
        Some(term) => rank_tags(&term, known, limit),
        None => Vec::new(),
    }
}

/// Replace the word under the cursor with `#tag`, adding a space unless
/// whitespace already follows. The cursor lands after the inserted text.
pub fn insert_tag(text: &str, cursor: usize, tag: &str) -> Completion {
    let word = current_word(text, cursor);
    let after = &text[word.end..];
    let spacer = if after.starts_with(char::is_whitespace) {
        ""
    } else {
        " "
    };
    let inserted = format!("#{}{}", tag, spacer);

    let mut out = String::with_capacity(text.len() + inserted.len());
    out.push_str(&text[..word.start]);
    out.push_str(&inserted);
    out.push_str(after);

    Completion {
        text: out,
        cursor: word.start + inserted.len(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn known(tags: &[&str]) -> HashSet<String> {
        tags.iter().map(|t| t.to_string()).collect()
    }

    // --- current word ---

    #[test]
    fn test_current_word_mid_text() {
        let text = "Buy milk #gro tomorrow";
        let word = current_word(text, 13);
        assert_eq!(word.text, "#gro");
        assert_eq!(word.start, 9);
        assert_eq!(word.end, 13);
    }

    #[test]
    fn test_current_word_at_start_and_clamped() {
        assert_eq!(current_word("#ur", 3).text, "#ur");
        assert_eq!(current_word("#ur", 100).text, "#ur");
        assert_eq!(current_word("abc ", 4).text, "");
    }

    #[test]
    fn test_search_term_requires_body() {
        assert_eq!(tag_search_term("task #", 6), None);
        assert_eq!(tag_search_term("task ur", 7), None);
        assert_eq!(tag_search_term("task #UR", 8), Some("ur".into()));
    }

    // --- ranking ---

    #[test]
    fn test_prefix_before_substring() {
        let tags = known(&["urgent", "urgently", "surge"]);
        assert_eq!(
            suggest("#ur", 3, &tags),
            vec!["urgent", "urgently", "surge"]
        );
    }

    #[test]
    fn test_substring_matches_follow_prefix_matches() {
        let tags = known(&["future", "Fun", "refund", "unfit"]);
        // "fu": prefix matches Fun, future; substring refund
        assert_eq!(suggest("x #fu", 5, &tags), vec!["Fun", "future", "refund"]);
    }

    #[test]
    fn test_case_insensitive_matching() {
        let tags = known(&["Work", "homework"]);
        assert_eq!(suggest("#WOR", 4, &tags), vec!["Work", "homework"]);
    }

    #[test]
    fn test_limit_five() {
        let tags = known(&["a1", "a2", "a3", "a4", "a5", "a6", "a7"]);
        assert_eq!(suggest("#a", 2, &tags), vec!["a1", "a2", "a3", "a4", "a5"]);
        assert_eq!(suggest_limited("#a", 2, &tags, 2), vec!["a1", "a2"]);
    }

    #[test]
    fn test_no_suggestions_outside_tag() {
        let tags = known(&["urgent"]);
        assert!(suggest("urgent", 6, &tags).is_empty());
        assert!(suggest("#", 1, &tags).is_empty());
        // Cursor before the token: current word is "fix"
        assert!(suggest("fix #ur", 3, &tags).is_empty());
    }

    // --- insertion ---

    #[test]
    fn test_insert_at_end_adds_space() {
        let done = insert_tag("Buy milk #gro", 13, "groceries");
        assert_eq!(done.text, "Buy milk #groceries ");
        assert_eq!(done.cursor, done.text.len());
    }

    #[test]
    fn test_insert_mid_text_before_space() {
        let done = insert_tag("Buy #gro now", 8, "groceries");
        assert_eq!(done.text, "Buy #groceries now");
        assert_eq!(done.cursor, 14);
    }

    #[test]
    fn test_insert_mid_word_keeps_tail() {
        // Cursor inside "#grxyz" after "#gr": the tail is kept after the spacer
        let done = insert_tag("#grxyz", 3, "groceries");
        assert_eq!(done.text, "#groceries xyz");
        assert_eq!(done.cursor, 11);
    }
}

use std::sync::LazyLock;

use regex::Regex;

/// `#` directly followed by word characters or hyphens, anywhere in the text.
static TAG_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"#[\w-]+").expect("tag pattern is valid"));

/// Free-text input split into a display title and its inline tags
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedInput {
    pub title: String,
    /// Tag bodies without `#`, in order of appearance (duplicates kept)
    pub tags: Vec<String>,
}

/// Split raw input into title and `#tag` tokens.
///
/// Every tag token is removed from the title, which is then trimmed. When
/// nothing but tags (or whitespace) remains, the title falls back to the raw
/// input untouched, so a tag-only entry still produces a visible task.
pub fn parse_task_input(raw: &str) -> ParsedInput {
    let tags: Vec<String> = TAG_RE
        .find_iter(raw)
        .map(|m| m.as_str()[1..].to_string())
        .collect();

    let stripped = TAG_RE.replace_all(raw, "");
    let stripped = stripped.trim();
    let title = if stripped.is_empty() {
        raw.to_string()
    } else {
        stripped.to_string()
    };

    ParsedInput { title, tags }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_title_and_trailing_tags() {
        let parsed = parse_task_input("Buy milk #groceries #urgent");
        assert_eq!(parsed.title, "Buy milk");
        assert_eq!(parsed.tags, vec!["groceries", "urgent"]);
    }

    #[test]
    fn test_tag_only_falls_back_to_raw() {
        let parsed = parse_task_input("#onlytag");
        assert_eq!(parsed.title, "#onlytag");
        assert_eq!(parsed.tags, vec!["onlytag"]);
    }

    #[test]
    fn test_fallback_keeps_untrimmed_raw() {
        let parsed = parse_task_input("  #a #b ");
        assert_eq!(parsed.title, "  #a #b ");
        assert_eq!(parsed.tags, vec!["a", "b"]);
    }

    #[test]
    fn test_tags_mid_sentence_and_hyphens() {
        let parsed = parse_task_input("Call #follow-up mom about #q3_plans today");
        assert_eq!(parsed.title, "Call  mom about  today");
        assert_eq!(parsed.tags, vec!["follow-up", "q3_plans"]);
    }

    #[test]
    fn test_tags_inside_words_are_found() {
        // No word-start requirement: `a#b` still yields tag `b`.
        let parsed = parse_task_input("issue#42 fix");
        assert_eq!(parsed.title, "issue fix");
        assert_eq!(parsed.tags, vec!["42"]);
    }

    #[test]
    fn test_embedded_hash_splits_tags() {
        let parsed = parse_task_input("Plan #a#b");
        assert_eq!(parsed.title, "Plan");
        assert_eq!(parsed.tags, vec!["a", "b"]);
    }

    #[test]
    fn test_bare_hash_is_not_a_tag() {
        let parsed = parse_task_input("Room # 5");
        assert_eq!(parsed.title, "Room # 5");
        assert!(parsed.tags.is_empty());
    }

    #[test]
    fn test_duplicate_tags_are_kept() {
        let parsed = parse_task_input("Task #x #x");
        assert_eq!(parsed.tags, vec!["x", "x"]);
    }

    #[test]
    fn test_no_tags() {
        let parsed = parse_task_input("  Plain title  ");
        assert_eq!(parsed.title, "Plain title");
        assert!(parsed.tags.is_empty());
    }
}

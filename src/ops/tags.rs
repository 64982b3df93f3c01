use std::collections::HashSet;

use crate::model::task::TaskNode;
use crate::ops::tree::for_each_task;

/// Every distinct tag used anywhere in the tree. Tags are compared exactly;
/// `Work` and `work` are two different tags here.
pub fn collect_tags(tasks: &[TaskNode]) -> HashSet<String> {
    let mut tags = HashSet::new();
    for_each_task(tasks, &mut |task| {
        tags.extend(task.tags.iter().cloned());
    });
    tags
}

/// Tags in display order: case-insensitive, ties broken by exact text.
pub fn sorted_tags(tags: &HashSet<String>) -> Vec<String> {
    let mut sorted: Vec<String> = tags.iter().cloned().collect();
    sorted.sort_by(|a, b| {
        a.to_lowercase()
            .cmp(&b.to_lowercase())
            .then_with(|| a.cmp(b))
    });
    sorted
}

/// Whether `task` or any of its descendants carries one of `wanted`.
pub fn subtree_has_any_tag(task: &TaskNode, wanted: &[String]) -> bool {
    task.tags.iter().any(|t| wanted.contains(t))
        || task
            .subtasks
            .iter()
            .any(|sub| subtree_has_any_tag(sub, wanted))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn node(id: &str, tags: &[&str]) -> TaskNode {
        TaskNode::new(
            id.into(),
            id.into(),
            tags.iter().map(|t| t.to_string()).collect(),
            Utc.timestamp_opt(0, 0).unwrap(),
        )
    }

    #[test]
    fn test_collect_tags_recursive() {
        let mut root = node("a", &["work", "urgent"]);
        let mut child = node("b", &["home"]);
        child.subtasks.push(node("c", &["Work", "work"]));
        root.subtasks.push(child);
        let tags = collect_tags(&[root, node("d", &[])]);
        let expected: HashSet<String> = ["work", "urgent", "home", "Work"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        assert_eq!(tags, expected);
    }

    #[test]
    fn test_sorted_tags_case_insensitive() {
        let tags: HashSet<String> = ["beta", "Alpha", "alpha", "Gamma"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        assert_eq!(sorted_tags(&tags), vec!["Alpha", "alpha", "beta", "Gamma"]);
    }

    #[test]
    fn test_subtree_has_any_tag_is_case_sensitive() {
        let mut root = node("a", &[]);
        root.subtasks.push(node("b", &["Work"]));
        assert!(subtree_has_any_tag(&root, &["Work".to_string()]));
        assert!(!subtree_has_any_tag(&root, &["work".to_string()]));
        assert!(!subtree_has_any_tag(&root, &[]));
    }
}

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// A task at any depth. Root tasks have no `parent_id`; subtasks carry the id
/// of their immediate parent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskNode {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<String>,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Tags without the `#` prefix, in the order they were typed
    #[serde(default, deserialize_with = "null_as_empty")]
    pub tags: Vec<String>,
    #[serde(default)]
    pub is_completed: bool,
    /// Present iff `is_completed`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    /// Children in insertion order
    #[serde(default, deserialize_with = "null_as_empty")]
    pub subtasks: Vec<TaskNode>,
}

impl TaskNode {
    /// Create a root-level task stamped with `now`.
    pub fn new(id: String, title: String, tags: Vec<String>, now: DateTime<Utc>) -> Self {
        TaskNode {
            id,
            parent_id: None,
            title,
            description: None,
            tags,
            is_completed: false,
            completed_at: None,
            created_at: now,
            updated_at: now,
            subtasks: Vec::new(),
        }
    }

    /// Create a subtask of `parent_id` stamped with `now`.
    pub fn new_subtask(
        id: String,
        parent_id: &str,
        title: String,
        tags: Vec<String>,
        now: DateTime<Utc>,
    ) -> Self {
        TaskNode {
            parent_id: Some(parent_id.to_string()),
            ..TaskNode::new(id, title, tags, now)
        }
    }

    pub fn is_root(&self) -> bool {
        self.parent_id.is_none()
    }

    /// Number of nodes below this one, at every depth.
    pub fn descendant_count(&self) -> usize {
        self.subtasks
            .iter()
            .map(|sub| 1 + sub.descendant_count())
            .sum()
    }
}

/// Field changes applied by `update_fields`. `None` leaves a field alone.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskUpdate {
    pub title: Option<String>,
    /// `Some(None)` clears the description
    pub description: Option<Option<String>>,
    pub tags: Option<Vec<String>>,
}

impl TaskUpdate {
    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.description.is_none() && self.tags.is_none()
    }

    /// Merge these changes into `task`. Does not touch `updated_at`.
    pub fn apply_to(&self, task: &mut TaskNode) {
        if let Some(title) = &self.title {
            task.title = title.clone();
        }
        if let Some(description) = &self.description {
            task.description = description.clone();
        }
        if let Some(tags) = &self.tags {
            task.tags = tags.clone();
        }
    }
}

/// Older blobs may carry `null` (or nothing) where a list is expected.
fn null_as_empty<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}

use serde::Serialize;

use crate::model::task::TaskNode;
use crate::ops::query::{DateGroup, TaskView};
use crate::util::unicode::truncate_to_width;

/// Width of the description preview under a task in list output
const NOTE_PREVIEW_WIDTH: usize = 60;

// ---------------------------------------------------------------------------
// JSON output structs
// ---------------------------------------------------------------------------

#[derive(Serialize)]
pub struct TaskJson {
    pub id: String,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub tags: Vec<String>,
    pub completed: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<String>,
    pub created_at: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub subtasks: Vec<TaskJson>,
}

#[derive(Serialize)]
pub struct DateGroupJson {
    pub date: String,
    pub tasks: Vec<TaskJson>,
}

#[derive(Serialize)]
pub struct ListJson {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tasks: Option<Vec<TaskJson>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub groups: Option<Vec<DateGroupJson>>,
}

#[derive(Serialize)]
pub struct CompletionJson {
    pub text: String,
    pub cursor: usize,
}

// ---------------------------------------------------------------------------
// Conversions
// ---------------------------------------------------------------------------

pub fn task_to_json(task: &TaskNode) -> TaskJson {
    TaskJson {
        id: task.id.clone(),
        title: task.title.clone(),
        description: task.description.clone(),
        tags: task.tags.clone(),
        completed: task.is_completed,
        completed_at: task.completed_at.map(|at| at.to_rfc3339()),
        created_at: task.created_at.to_rfc3339(),
        subtasks: task.subtasks.iter().map(task_to_json).collect(),
    }
}

fn group_to_json(group: &DateGroup<'_>) -> DateGroupJson {
    DateGroupJson {
        date: group.date.format("%Y-%m-%d").to_string(),
        tasks: group.tasks.iter().map(|t| task_to_json(t)).collect(),
    }
}

pub fn view_to_json(view: &TaskView<'_>) -> ListJson {
    match view {
        TaskView::List(tasks) => ListJson {
            tasks: Some(tasks.iter().map(|t| task_to_json(t)).collect()),
            groups: None,
        },
        TaskView::Grouped(groups) => ListJson {
            tasks: None,
            groups: Some(groups.iter().map(group_to_json).collect()),
        },
    }
}

// ---------------------------------------------------------------------------
// Text formatting
// ---------------------------------------------------------------------------

/// `[x] <id> Title #tag1 #tag2`
pub fn format_task_line(task: &TaskNode) -> String {
    let mut line = format!(
        "[{}] {} {}",
        if task.is_completed { 'x' } else { ' ' },
        task.id,
        task.title
    );
    for tag in &task.tags {
        line.push_str(" #");
        line.push_str(tag);
    }
    line
}

/// A task and its whole subtree, two spaces of indent per level.
pub fn format_task_tree(task: &TaskNode, indent: usize, out: &mut Vec<String>) {
    let pad = "  ".repeat(indent);
    out.push(format!("{}{}", pad, format_task_line(task)));
    if let Some(first_line) = task.description.as_deref().and_then(|d| d.lines().next()) {
        out.push(format!(
            "{}    {}",
            pad,
            truncate_to_width(first_line, NOTE_PREVIEW_WIDTH)
        ));
    }
    for sub in &task.subtasks {
        format_task_tree(sub, indent + 1, out);
    }
}

/// Render a query result as text lines. Grouped views get a date header per
/// bucket.
pub fn format_view(view: &TaskView<'_>) -> Vec<String> {
    let mut out = Vec::new();
    match view {
        TaskView::List(tasks) => {
            for task in tasks {
                format_task_tree(task, 0, &mut out);
            }
        }
        TaskView::Grouped(groups) => {
            for (i, group) in groups.iter().enumerate() {
                if i > 0 {
                    out.push(String::new());
                }
                out.push(group.date.format("%Y-%m-%d").to_string());
                for task in &group.tasks {
                    format_task_tree(task, 1, &mut out);
                }
            }
        }
    }
    out
}

/// Full detail for `show`.
pub fn format_task_detail(task: &TaskNode) -> Vec<String> {
    let mut out = vec![format_task_line(task)];
    out.push(format!("  created: {}", task.created_at.to_rfc3339()));
    out.push(format!("  updated: {}", task.updated_at.to_rfc3339()));
    if let Some(at) = task.completed_at {
        out.push(format!("  completed: {}", at.to_rfc3339()));
    }
    if let Some(parent) = &task.parent_id {
        out.push(format!("  parent: {}", parent));
    }
    if let Some(description) = &task.description {
        out.push("  description:".to_string());
        for line in description.lines() {
            out.push(format!("    {}", line));
        }
    }
    for sub in &task.subtasks {
        format_task_tree(sub, 1, &mut out);
    }
    out
}

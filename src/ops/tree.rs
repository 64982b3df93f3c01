//! Id-addressed operations over the task tree.
//!
//! Every operation borrows the current tree and returns a new one; the input
//! is never modified. An id that is not present anywhere in the tree is not an
//! error: the result is simply an unchanged copy.

use chrono::{DateTime, Utc};

use crate::model::task::{TaskNode, TaskUpdate};

// ---------------------------------------------------------------------------
// Traversal
// ---------------------------------------------------------------------------

/// Rebuild `tasks`, handing the node whose id is `id` (at any depth) to
/// `edit`. `edit` returns the replacement node, or `None` to drop the node and
/// its whole subtree. Every other node is copied with its subtasks searched in
/// turn.
fn edit_by_id<F>(tasks: &[TaskNode], id: &str, edit: &mut F) -> Vec<TaskNode>
where
    F: FnMut(&TaskNode) -> Option<TaskNode>,
{
    let mut out = Vec::with_capacity(tasks.len());
    for task in tasks {
        if task.id == id {
            if let Some(replacement) = edit(task) {
                out.push(replacement);
            }
        } else {
            let subtasks = edit_by_id(&task.subtasks, id, edit);
            out.push(with_subtasks(task, subtasks));
        }
    }
    out
}

/// Copy of `task`'s own fields over a new child list.
fn with_subtasks(task: &TaskNode, subtasks: Vec<TaskNode>) -> TaskNode {
    TaskNode {
        id: task.id.clone(),
        parent_id: task.parent_id.clone(),
        title: task.title.clone(),
        description: task.description.clone(),
        tags: task.tags.clone(),
        is_completed: task.is_completed,
        completed_at: task.completed_at,
        created_at: task.created_at,
        updated_at: task.updated_at,
        subtasks,
    }
}

// ---------------------------------------------------------------------------
// Mutations
// ---------------------------------------------------------------------------

/// Flip completion of the node `id`. Completing stamps `completed_at` with
/// `now`; uncompleting clears it.
pub fn toggle_completion(tasks: &[TaskNode], id: &str, now: DateTime<Utc>) -> Vec<TaskNode> {
    edit_by_id(tasks, id, &mut |task| {
        let mut task = task.clone();
        task.is_completed = !task.is_completed;
        task.completed_at = task.is_completed.then_some(now);
        task.updated_at = now;
        Some(task)
    })
}

/// Merge `update` into the node `id` and refresh its `updated_at`.
pub fn update_fields(
    tasks: &[TaskNode],
    id: &str,
    update: &TaskUpdate,
    now: DateTime<Utc>,
) -> Vec<TaskNode> {
    edit_by_id(tasks, id, &mut |task| {
        let mut task = task.clone();
        update.apply_to(&mut task);
        task.updated_at = now;
        Some(task)
    })
}

/// Remove the node `id` together with all of its descendants.
pub fn delete_node(tasks: &[TaskNode], id: &str) -> Vec<TaskNode> {
    edit_by_id(tasks, id, &mut |_| None)
}

/// Append `child` to the subtasks of `parent_id`. The child's `parent_id` is
/// set to the parent it lands under.
pub fn insert_child(tasks: &[TaskNode], parent_id: &str, child: TaskNode) -> Vec<TaskNode> {
    let mut child = Some(child);
    edit_by_id(tasks, parent_id, &mut |parent| {
        let mut parent = parent.clone();
        if let Some(mut child) = child.take() {
            child.parent_id = Some(parent.id.clone());
            parent.subtasks.push(child);
        }
        Some(parent)
    })
}

// ---------------------------------------------------------------------------
// Lookups
// ---------------------------------------------------------------------------

/// Find a node by id at any depth.
pub fn find_task<'a>(tasks: &'a [TaskNode], id: &str) -> Option<&'a TaskNode> {
    for task in tasks {
        if task.id == id {
            return Some(task);
        }
        if let Some(found) = find_task(&task.subtasks, id) {
            return Some(found);
        }
    }
    None
}

/// Visit every node, parents before children.
pub fn for_each_task(tasks: &[TaskNode], f: &mut dyn FnMut(&TaskNode)) {
    for task in tasks {
        f(task);
        for_each_task(&task.subtasks, f);
    }
}

/// Total number of nodes at every depth.
pub fn count_nodes(tasks: &[TaskNode]) -> usize {
    let mut count = 0;
    for_each_task(tasks, &mut |_| count += 1);
    count
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

//! Filter → sort → group projection of the root task list.

use std::cmp::Ordering;
use std::collections::BTreeMap;

use chrono::NaiveDate;

use crate::model::task::TaskNode;
use crate::model::view::TaskQuery;
use crate::ops::tags::subtree_has_any_tag;

/// Completed root tasks that share a completion date
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DateGroup<'a> {
    pub date: NaiveDate,
    pub tasks: Vec<&'a TaskNode>,
}

/// Result of running a query: a flat sorted list, or date buckets (newest
/// first) when the query asks for completed work.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskView<'a> {
    List(Vec<&'a TaskNode>),
    Grouped(Vec<DateGroup<'a>>),
}

impl<'a> TaskView<'a> {
    /// All tasks in display order, regardless of grouping.
    pub fn tasks(&self) -> Vec<&'a TaskNode> {
        match self {
            TaskView::List(tasks) => tasks.clone(),
            TaskView::Grouped(groups) => groups
                .iter()
                .flat_map(|g| g.tasks.iter().copied())
                .collect(),
        }
    }
}

/// Calendar date (UTC) of a task's completion.
pub fn completion_date(task: &TaskNode) -> Option<NaiveDate> {
    task.completed_at.map(|at| at.date_naive())
}

// ---------------------------------------------------------------------------
// Filter
// ---------------------------------------------------------------------------

/// Whether a root task passes every active criterion of `query`.
pub fn matches_query(task: &TaskNode, query: &TaskQuery) -> bool {
    if !query.status.admits(task.is_completed) {
        return false;
    }

    // Root title only; subtasks and descriptions are not searched
    if !query.search.is_empty()
        && !task
            .title
            .to_lowercase()
            .contains(&query.search.to_lowercase())
    {
        return false;
    }

    if let Some(date) = query.completed_on
        && !(task.is_completed && completion_date(task) == Some(date))
    {
        return false;
    }

    query.tags.is_empty() || subtree_has_any_tag(task, &query.tags)
}

pub fn filter_tasks<'a>(tasks: &'a [TaskNode], query: &TaskQuery) -> Vec<&'a TaskNode> {
    tasks.iter().filter(|t| matches_query(t, query)).collect()
}

// ---------------------------------------------------------------------------
// Sort
// ---------------------------------------------------------------------------

/// Open tasks first, newest created first; then completed tasks, most recently
/// completed first.
pub fn compare_tasks(a: &TaskNode, b: &TaskNode) -> Ordering {
    match (a.is_completed, b.is_completed) {
        (false, true) => Ordering::Less,
        (true, false) => Ordering::Greater,
        (true, true) => b.completed_at.cmp(&a.completed_at),
        (false, false) => b.created_at.cmp(&a.created_at),
    }
}

pub fn sort_tasks(tasks: &mut [&TaskNode]) {
    tasks.sort_by(|a, b| compare_tasks(a, b));
}

// ---------------------------------------------------------------------------
// Group
// ---------------------------------------------------------------------------

/// Bucket tasks by completion date, newest date first. Order inside a bucket
/// follows the input. Tasks without a completion date are left out.
pub fn group_by_completion_date<'a>(tasks: &[&'a TaskNode]) -> Vec<DateGroup<'a>> {
    let mut buckets: BTreeMap<NaiveDate, Vec<&'a TaskNode>> = BTreeMap::new();
    for task in tasks {
        if let Some(date) = completion_date(task) {
            buckets.entry(date).or_default().push(*task);
        }
    }
    buckets
        .into_iter()
        .rev()
        .map(|(date, tasks)| DateGroup { date, tasks })
        .collect()
}

/// Run the whole pipeline over the root tasks.
pub fn run_query<'a>(tasks: &'a [TaskNode], query: &TaskQuery) -> TaskView<'a> {
    let mut filtered = filter_tasks(tasks, query);
    sort_tasks(&mut filtered);
    if query.groups_by_date() {
        TaskView::Grouped(group_by_completion_date(&filtered))
    } else {
        TaskView::List(filtered)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

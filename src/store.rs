//! The owned task store: the only stateful piece of the crate.
//!
//! Every mutation computes a new tree with the pure operations in
//! [`crate::ops::tree`], swaps it in, and then hands the serialized tree to the
//! persistence backend. A failed save is logged and otherwise ignored; the
//! in-memory tree stays authoritative.

use std::collections::HashSet;

use chrono::Utc;

use crate::io::tree_io::{Persistence, StoreIoError, decode_tree, encode_tree};
use crate::model::task::{TaskNode, TaskUpdate};
use crate::model::view::TaskQuery;
use crate::ops::autocomplete::{self, Completion};
use crate::ops::id::generate_id;
use crate::ops::query::{TaskView, run_query};
use crate::ops::tags::collect_tags;
use crate::ops::tree;
use crate::parse::parse_task_input;

pub struct TaskStore<P: Persistence> {
    tasks: Vec<TaskNode>,
    backend: P,
}

impl<P: Persistence> TaskStore<P> {
    /// Load the saved tree from `backend`. Nothing saved yet, or unreadable
    /// content, starts from an empty tree.
    pub fn open(backend: P) -> Result<Self, StoreIoError> {
        let tasks = match backend.load()? {
            Some(blob) => decode_tree(&blob),
            None => Vec::new(),
        };
        tracing::debug!(roots = tasks.len(), "task store opened");
        Ok(TaskStore { tasks, backend })
    }

    /// The current root task list.
    pub fn tasks(&self) -> &[TaskNode] {
        &self.tasks
    }

    pub fn backend(&self) -> &P {
        &self.backend
    }

    pub fn find(&self, id: &str) -> Option<&TaskNode> {
        tree::find_task(&self.tasks, id)
    }

    /// Swap in a new tree and persist it.
    pub fn replace(&mut self, tasks: Vec<TaskNode>) {
        self.tasks = tasks;
        self.persist();
    }

    fn persist(&mut self) {
        let saved = encode_tree(&self.tasks).and_then(|blob| self.backend.save(&blob));
        if let Err(e) = saved {
            tracing::warn!(error = %e, "could not save tasks; keeping in-memory state");
        }
    }

    // -----------------------------------------------------------------------
    // Mutations
    // -----------------------------------------------------------------------

    /// Parse `raw` and put the new task at the top of the root list. Blank
    /// input is ignored. Returns the new id.
    pub fn add_root_task(&mut self, raw: &str) -> Option<String> {
        if raw.trim().is_empty() {
            return None;
        }
        let parsed = parse_task_input(raw);
        let id = generate_id();
        let task = TaskNode::new(id.clone(), parsed.title, parsed.tags, Utc::now());

        let mut tasks = Vec::with_capacity(self.tasks.len() + 1);
        tasks.push(task);
        tasks.extend(self.tasks.iter().cloned());
        self.replace(tasks);
        tracing::debug!(%id, "added root task");
        Some(id)
    }

    /// Append a subtask under `parent_id`. Returns the new id, or `None` when
    /// the title is blank or the parent no longer exists.
    pub fn add_subtask(&mut self, parent_id: &str, title: &str, tags: Vec<String>) -> Option<String> {
        let title = title.trim();
        if title.is_empty() || self.find(parent_id).is_none() {
            return None;
        }
        let id = generate_id();
        let child = TaskNode::new_subtask(id.clone(), parent_id, title.to_string(), tags, Utc::now());
        let tasks = tree::insert_child(&self.tasks, parent_id, child);
        self.replace(tasks);
        tracing::debug!(%id, %parent_id, "added subtask");
        Some(id)
    }

    pub fn toggle(&mut self, id: &str) {
        let tasks = tree::toggle_completion(&self.tasks, id, Utc::now());
        self.replace(tasks);
        tracing::debug!(%id, "toggled completion");
    }

    /// Remove `id` and everything beneath it. Callers confirm with the user
    /// first.
    pub fn delete_subtree(&mut self, id: &str) {
        let tasks = tree::delete_node(&self.tasks, id);
        self.replace(tasks);
        tracing::debug!(%id, "deleted subtree");
    }

    /// Apply field changes. The title is trimmed, and a blank title is
    /// dropped from the update so a task never loses its title.
    pub fn update_fields(&mut self, id: &str, mut update: TaskUpdate) {
        update.title = update
            .title
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty());
        if update.is_empty() {
            return;
        }
        let tasks = tree::update_fields(&self.tasks, id, &update, Utc::now());
        self.replace(tasks);
        tracing::debug!(%id, "updated fields");
    }

    // -----------------------------------------------------------------------
    // Views
    // -----------------------------------------------------------------------

    pub fn all_tags(&self) -> HashSet<String> {
        collect_tags(&self.tasks)
    }

    pub fn query(&self, query: &TaskQuery) -> TaskView<'_> {
        run_query(&self.tasks, query)
    }

    /// Tag completions for `text` at `cursor`, drawing on every tag in the
    /// tree plus `extra_tags`.
    pub fn suggest(
        &self,
        text: &str,
        cursor: usize,
        extra_tags: &[String],
        limit: usize,
    ) -> Vec<String> {
        let mut known = self.all_tags();
        known.extend(extra_tags.iter().cloned());
        autocomplete::suggest_limited(text, cursor, &known, limit)
    }

    pub fn complete(&self, text: &str, cursor: usize, tag: &str) -> Completion {
        autocomplete::insert_tag(text, cursor, tag)
    }
}

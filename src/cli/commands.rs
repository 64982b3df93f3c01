use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};

use crate::model::view::StatusFilter;

#[derive(Parser)]
#[command(name = "nt", about = concat!("nestask v", env!("CARGO_PKG_VERSION"), " - nested tasks with #tags"), version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Output as JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Use a different task data file
    #[arg(short = 'f', long = "file", global = true)]
    pub file: Option<String>,

    /// Use a different config file
    #[arg(long, global = true)]
    pub config: Option<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Add a top-level task (inline #tags are extracted)
    Add(AddArgs),
    /// Add a subtask under an existing task
    Sub(SubArgs),
    /// Toggle a task between open and completed
    Toggle(IdArgs),
    /// Change a task's title, description or tags
    Edit(EditArgs),
    /// Delete a task and all of its subtasks
    Delete(DeleteArgs),
    /// List top-level tasks with filters
    List(ListArgs),
    /// Show a task and its subtasks
    Show(IdArgs),
    /// List every tag in use
    Tags,
    /// Suggest tag completions for a piece of input text
    Suggest(SuggestArgs),
}

// ---------------------------------------------------------------------------
// Write command args
// ---------------------------------------------------------------------------

#[derive(Args)]
pub struct AddArgs {
    /// Task text, e.g. "Buy milk #groceries"
    #[arg(required = true, num_args = 1..)]
    pub text: Vec<String>,
}

#[derive(Args)]
pub struct SubArgs {
    /// Parent task ID
    pub parent: String,
    /// Subtask text (inline #tags are extracted)
    #[arg(required = true, num_args = 1..)]
    pub text: Vec<String>,
}

#[derive(Args)]
pub struct IdArgs {
    /// Task ID
    pub id: String,
}

#[derive(Args)]
pub struct EditArgs {
    /// Task ID
    pub id: String,
    /// New title
    #[arg(long)]
    pub title: Option<String>,
    /// New description
    #[arg(long, conflicts_with = "clear_description")]
    pub description: Option<String>,
    /// Remove the description
    #[arg(long)]
    pub clear_description: bool,
    /// Replace tags (comma-separated, `#` optional; empty string clears)
    #[arg(long)]
    pub tags: Option<String>,
}

#[derive(Args)]
pub struct DeleteArgs {
    /// Task ID
    pub id: String,
    /// Skip the confirmation prompt
    #[arg(short, long)]
    pub yes: bool,
}

// ---------------------------------------------------------------------------
// Read command args
// ---------------------------------------------------------------------------

#[derive(Args)]
pub struct ListArgs {
    /// Filter by status (all, active, completed)
    #[arg(long)]
    pub status: Option<StatusFilter>,
    /// Case-insensitive search in top-level titles
    #[arg(long)]
    pub search: Option<String>,
    /// Only tasks completed on this date (YYYY-MM-DD, UTC)
    #[arg(long)]
    pub date: Option<NaiveDate>,
    /// Filter by tag, anywhere in the task's subtree (repeatable)
    #[arg(long = "tag")]
    pub tags: Vec<String>,
}

#[derive(Args)]
pub struct SuggestArgs {
    /// The text being typed
    pub text: String,
    /// Cursor position in characters (default: end of text)
    #[arg(long)]
    pub cursor: Option<usize>,
    /// Insert this tag at the cursor and print the resulting text
    #[arg(long)]
    pub pick: Option<String>,
}

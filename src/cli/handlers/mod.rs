use std::path::PathBuf;

use crate::cli::commands::*;
use crate::cli::output::*;
use crate::io::config_io;
use crate::io::tree_io::JsonFileBackend;
use crate::model::config::Config;
use crate::model::task::{TaskNode, TaskUpdate};
use crate::model::view::TaskQuery;
use crate::ops::tags::sorted_tags;
use crate::parse::parse_task_input;
use crate::store::TaskStore;
use crate::util::unicode::{byte_to_grapheme_offset, grapheme_to_byte_offset};

type CmdResult = Result<(), Box<dyn std::error::Error>>;

/// Loaded config plus the store it points at
struct Session {
    config: Config,
    store: TaskStore<JsonFileBackend>,
}

// ---------------------------------------------------------------------------
// Dispatch
// ---------------------------------------------------------------------------

pub fn dispatch(cli: Cli) -> CmdResult {
    let json = cli.json;
    let mut session = open_session(cli.config.as_deref(), cli.file.as_deref())?;

    match cli.command {
        // Write commands
        Commands::Add(args) => cmd_add(&mut session, args, json),
        Commands::Sub(args) => cmd_sub(&mut session, args, json),
        Commands::Toggle(args) => cmd_toggle(&mut session, args, json),
        Commands::Edit(args) => cmd_edit(&mut session, args, json),
        Commands::Delete(args) => cmd_delete(&mut session, args),

        // Read commands
        Commands::List(args) => cmd_list(&session, args, json),
        Commands::Show(args) => cmd_show(&session, args, json),
        Commands::Tags => cmd_tags(&session, json),
        Commands::Suggest(args) => cmd_suggest(&session, args, json),
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn open_session(
    config_override: Option<&str>,
    file_override: Option<&str>,
) -> Result<Session, Box<dyn std::error::Error>> {
    let config_path = config_override
        .map(PathBuf::from)
        .unwrap_or_else(config_io::config_path);
    let config = config_io::read_config(&config_path)?;
    let data_path = file_override
        .map(PathBuf::from)
        .unwrap_or_else(|| config_io::data_path(&config));
    tracing::debug!(
        config = %config_path.display(),
        data = %data_path.display(),
        "opening session"
    );

    let store = TaskStore::open(JsonFileBackend::new(data_path))?;
    Ok(Session { config, store })
}

fn require_task<'a>(session: &'a Session, id: &str) -> Result<&'a TaskNode, String> {
    session
        .store
        .find(id)
        .ok_or_else(|| format!("task not found: {}", id))
}

fn print_task(task: &TaskNode, json: bool) -> CmdResult {
    if json {
        println!("{}", serde_json::to_string_pretty(&task_to_json(task))?);
    } else {
        println!("{}", format_task_line(task));
    }
    Ok(())
}

/// `"#a, b,,#c"` → `["a", "b", "c"]`
fn parse_tag_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|t| t.trim().trim_start_matches('#'))
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect()
}

// ---------------------------------------------------------------------------
// Write commands
// ---------------------------------------------------------------------------

fn cmd_add(session: &mut Session, args: AddArgs, json: bool) -> CmdResult {
    let raw = args.text.join(" ");
    let id = session
        .store
        .add_root_task(&raw)
        .ok_or("task text is empty")?;
    print_task(require_task(session, &id)?, json)
}

fn cmd_sub(session: &mut Session, args: SubArgs, json: bool) -> CmdResult {
    require_task(session, &args.parent)?;
    let raw = args.text.join(" ");
    if raw.trim().is_empty() {
        return Err("subtask text is empty".into());
    }
    let parsed = parse_task_input(&raw);
    let id = session
        .store
        .add_subtask(&args.parent, &parsed.title, parsed.tags)
        .ok_or_else(|| format!("could not add subtask to {}", args.parent))?;
    print_task(require_task(session, &id)?, json)
}

fn cmd_toggle(session: &mut Session, args: IdArgs, json: bool) -> CmdResult {
    require_task(session, &args.id)?;
    session.store.toggle(&args.id);
    print_task(require_task(session, &args.id)?, json)
}

fn cmd_edit(session: &mut Session, args: EditArgs, json: bool) -> CmdResult {
    require_task(session, &args.id)?;
    if args.title.as_deref().is_some_and(|t| t.trim().is_empty()) {
        return Err("title cannot be empty".into());
    }

    let description = if args.clear_description {
        Some(None)
    } else {
        args.description.map(Some)
    };
    let update = TaskUpdate {
        title: args.title,
        description,
        tags: args.tags.as_deref().map(parse_tag_list),
    };
    if update.is_empty() {
        return Err(
            "nothing to change (use --title, --description, --clear-description or --tags)".into(),
        );
    }

    session.store.update_fields(&args.id, update);
    print_task(require_task(session, &args.id)?, json)
}

fn cmd_delete(session: &mut Session, args: DeleteArgs) -> CmdResult {
    let task = require_task(session, &args.id)?;
    let below = task.descendant_count();

    if !args.yes {
        if below > 0 {
            eprint!(
                "Delete \"{}\" and its {} subtask{}? [y/n] ",
                task.title,
                below,
                if below == 1 { "" } else { "s" }
            );
        } else {
            eprint!("Delete \"{}\"? [y/n] ", task.title);
        }
        let mut input = String::new();
        std::io::stdin().read_line(&mut input)?;
        if !input.trim().eq_ignore_ascii_case("y") {
            println!("cancelled");
            return Ok(());
        }
    }

    session.store.delete_subtree(&args.id);
    println!("deleted {} ({} subtasks)", args.id, below);
    Ok(())
}

// ---------------------------------------------------------------------------
// Read commands
// ---------------------------------------------------------------------------

fn cmd_list(session: &Session, args: ListArgs, json: bool) -> CmdResult {
    let query = TaskQuery {
        status: args.status.unwrap_or(session.config.view.default_status),
        search: args.search.unwrap_or_default(),
        completed_on: args.date,
        tags: args.tags.iter().map(|t| t.trim_start_matches('#').to_string()).collect(),
    };
    let view = session.store.query(&query);

    if json {
        println!("{}", serde_json::to_string_pretty(&view_to_json(&view))?);
    } else {
        for line in format_view(&view) {
            println!("{}", line);
        }
    }
    Ok(())
}

fn cmd_show(session: &Session, args: IdArgs, json: bool) -> CmdResult {
    let task = require_task(session, &args.id)?;
    if json {
        println!("{}", serde_json::to_string_pretty(&task_to_json(task))?);
    } else {
        for line in format_task_detail(task) {
            println!("{}", line);
        }
    }
    Ok(())
}

fn cmd_tags(session: &Session, json: bool) -> CmdResult {
    let tags = sorted_tags(&session.store.all_tags());
    if json {
        println!("{}", serde_json::to_string_pretty(&tags)?);
    } else {
        for tag in tags {
            println!("#{}", tag);
        }
    }
    Ok(())
}

fn cmd_suggest(session: &Session, args: SuggestArgs, json: bool) -> CmdResult {
    let text = args.text;
    let cursor = match args.cursor {
        Some(chars) => grapheme_to_byte_offset(&text, chars),
        None => text.len(),
    };

    if let Some(tag) = args.pick {
        let tag = tag.trim_start_matches('#');
        let done = session.store.complete(&text, cursor, tag);
        if json {
            let out = CompletionJson {
                cursor: byte_to_grapheme_offset(&done.text, done.cursor),
                text: done.text,
            };
            println!("{}", serde_json::to_string_pretty(&out)?);
        } else {
            println!("{}", done.text);
        }
        return Ok(());
    }

    let view = &session.config.view;
    let suggestions = session
        .store
        .suggest(&text, cursor, &view.default_tags, view.suggestion_limit);
    if json {
        println!("{}", serde_json::to_string_pretty(&suggestions)?);
    } else {
        for tag in suggestions {
            println!("{}", tag);
        }
    }
    Ok(())
}

mod init;
pub use init::cmd_init;

use std::fs;
use std::path::PathBuf;
use std::sync::Mutex;

use crate::cli::commands::*;
use crate::cli::output::*;
use crate::io::store::{Store, discover_board};
use crate::model::item::{Priority, Severity, Status, TriageItem};
use crate::ops::filter::{Filters, visible_items};
use crate::ops::item_ops::{find_item, fresh_id, parse_tags};
use crate::ops::transfer::{EXPORT_FILE_NAME, export_items, import_items};

/// Global override for the board directory (set by -C flag)
static BOARD_DIR_OVERRIDE: Mutex<Option<PathBuf>> = Mutex::new(None);

// ---------------------------------------------------------------------------
// Dispatch
// ---------------------------------------------------------------------------

pub fn dispatch(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let json = cli.json;

    if let Some(ref dir) = cli.board_dir {
        let abs = fs::canonicalize(dir)
            .map_err(|e| format!("cannot resolve -C path '{dir}': {e}"))?;
        BOARD_DIR_OVERRIDE.lock().unwrap().replace(abs);
    }

    match cli.command {
        None => {
            // No subcommand launches the TUI; main.rs routes that before dispatch
            Ok(())
        }
        Some(cmd) => match cmd {
            // Init is handled in main.rs before board discovery
            Commands::Init(args) => cmd_init(args, None),

            Commands::List(args) => cmd_list(args, json),
            Commands::Show(args) => cmd_show(args, json),
            Commands::Add(args) => cmd_add(args),
            Commands::State(args) => cmd_state(args),
            Commands::Rm(args) => cmd_rm(args),
            Commands::Export(args) => cmd_export(args),
            Commands::Import(args) => cmd_import(args),
        },
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn open_store() -> Result<Store, Box<dyn std::error::Error>> {
    let start = match BOARD_DIR_OVERRIDE.lock().unwrap().as_ref() {
        Some(dir) => dir.clone(),
        None => std::env::current_dir()?,
    };
    let board_dir = discover_board(&start)?;
    Ok(Store::new(board_dir))
}

fn parse_priority(raw: &str) -> Result<Priority, String> {
    Priority::parse(raw).ok_or_else(|| {
        format!("unknown priority '{raw}' (expected critical, high, medium, or low)")
    })
}

fn parse_severity(raw: &str) -> Result<Severity, String> {
    Severity::parse(raw).ok_or_else(|| format!("unknown severity '{raw}' (expected S1..S4)"))
}

fn parse_status(raw: &str) -> Result<Status, String> {
    Status::parse(raw).ok_or_else(|| {
        format!("unknown status '{raw}' (expected new, in_progress, blocked, or done)")
    })
}

// ---------------------------------------------------------------------------
// Read commands
// ---------------------------------------------------------------------------

fn cmd_list(args: ListArgs, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let store = open_store()?;
    let items = store.get_all()?;

    let filters = Filters {
        query: args.query.unwrap_or_default(),
        priority: args.priority.as_deref().map(parse_priority).transpose()?,
        assignee: args.assignee,
    };
    let only_status = args.status.as_deref().map(parse_status).transpose()?;

    let buckets = visible_items(&items, &filters);

    if json {
        let columns = buckets
            .iter()
            .filter(|(status, _)| only_status.as_ref().is_none_or(|s| s == *status))
            .map(|(status, bucket)| ColumnJson {
                status: status.clone(),
                count: bucket.len(),
                items: bucket.iter().map(|item| ItemJson::from(*item)).collect(),
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&BoardJson { columns })?);
        return Ok(());
    }

    for (status, bucket) in &buckets {
        if only_status.as_ref().is_some_and(|s| s != status) {
            continue;
        }
        println!("{} ({})", status.label(), bucket.len());
        for item in bucket {
            println!("  {}", format_item_line(item));
        }
    }
    Ok(())
}

fn cmd_show(args: ShowArgs, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let store = open_store()?;
    let items = store.get_all()?;
    let item = find_item(&items, &args.id).ok_or(format!("item not found: {}", args.id))?;

    if json {
        println!("{}", serde_json::to_string_pretty(&ItemJson::from(item))?);
        return Ok(());
    }

    println!("{}", item.title);
    println!("  id:       {}", item.id);
    println!("  status:   {}", item.status.key());
    println!("  priority: {}", item.priority.label());
    println!("  severity: {}", item.severity.label());
    if let Some(assignee) = &item.assignee {
        println!("  assignee: @{assignee}");
    }
    if !item.tags.is_empty() {
        let tags: Vec<String> = item.tags.iter().map(|t| format!("#{t}")).collect();
        println!("  tags:     {}", tags.join(" "));
    }
    if let Some(due) = item.due {
        println!("  due:      {due}");
    }
    if !item.description.is_empty() {
        println!("  {}", item.description);
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Write commands
// ---------------------------------------------------------------------------

fn cmd_add(args: AddArgs) -> Result<(), Box<dyn std::error::Error>> {
    let store = open_store()?;

    let mut item = TriageItem::new(fresh_id(), args.title.trim());
    if item.title.is_empty() {
        return Err("title is required".into());
    }
    if let Some(description) = args.description {
        item.description = description.trim().to_string();
    }
    if let Some(priority) = args.priority.as_deref() {
        item.priority = parse_priority(priority)?;
    }
    if let Some(severity) = args.severity.as_deref() {
        item.severity = parse_severity(severity)?;
    }
    item.assignee = args
        .assignee
        .as_deref()
        .map(str::trim)
        .filter(|a| !a.is_empty())
        .map(str::to_string);
    item.tags = parse_tags(&args.tag.join(","));
    if let Some(due) = args.due.as_deref() {
        item.due = Some(
            due.parse()
                .map_err(|_| format!("due must be YYYY-MM-DD, got '{due}'"))?,
        );
    }

    store.put(&item)?;
    println!("added {}", item.id);
    Ok(())
}

fn cmd_state(args: StateArgs) -> Result<(), Box<dyn std::error::Error>> {
    let status = parse_status(&args.status)?;
    let store = open_store()?;
    let items = store.get_all()?;
    let item = find_item(&items, &args.id).ok_or(format!("item not found: {}", args.id))?;

    let mut updated = item.clone();
    updated.status = status;
    store.put(&updated)?;
    println!("{} \u{2192} {}", args.id, updated.status.key());
    Ok(())
}

fn cmd_rm(args: RmArgs) -> Result<(), Box<dyn std::error::Error>> {
    let store = open_store()?;
    let items = store.get_all()?;
    if find_item(&items, &args.id).is_none() {
        return Err(format!("item not found: {}", args.id).into());
    }
    store.delete(&args.id)?;
    println!("deleted {}", args.id);
    Ok(())
}

// ---------------------------------------------------------------------------
// Transfer commands
// ---------------------------------------------------------------------------

fn cmd_export(args: ExportArgs) -> Result<(), Box<dyn std::error::Error>> {
    let store = open_store()?;
    let items = store.get_all()?;
    let path = args.output.unwrap_or_else(|| EXPORT_FILE_NAME.to_string());
    fs::write(&path, export_items(&items))?;
    println!("exported {} items to {path}", items.len());
    Ok(())
}

fn cmd_import(args: ImportArgs) -> Result<(), Box<dyn std::error::Error>> {
    let store = open_store()?;
    let text = fs::read_to_string(&args.file)
        .map_err(|e| format!("could not read {}: {e}", args.file))?;
    let items = import_items(&text)?;
    store.bulk_put(&items)?;
    println!("imported {} items", items.len());
    Ok(())
}

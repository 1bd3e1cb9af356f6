use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(name = "zt", about = concat!("[\u{25B6}] z10triage v", env!("CARGO_PKG_VERSION"), " - your triage board is a local file"), version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Output as JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Run against a different board directory
    #[arg(short = 'C', long = "board-dir", global = true)]
    pub board_dir: Option<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize a triage board in the current directory
    Init(InitArgs),
    /// List items, grouped into status columns
    List(ListArgs),
    /// Show one item
    Show(ShowArgs),
    /// Add an item
    Add(AddArgs),
    /// Change an item's status
    State(StateArgs),
    /// Delete an item
    Rm(RmArgs),
    /// Export the board to a JSON file
    Export(ExportArgs),
    /// Import items from a JSON file
    Import(ImportArgs),
}

#[derive(Args)]
pub struct InitArgs {
    /// Board name written into config.toml
    #[arg(long)]
    pub name: Option<String>,
    /// Reinitialize even if z10/ already exists
    #[arg(long)]
    pub force: bool,
}

#[derive(Args)]
pub struct ListArgs {
    /// Filter by status (new, in_progress, blocked, done)
    #[arg(long)]
    pub status: Option<String>,
    /// Filter by priority (critical, high, medium, low)
    #[arg(long)]
    pub priority: Option<String>,
    /// Filter by assignee (case-insensitive exact match)
    #[arg(long)]
    pub assignee: Option<String>,
    /// Free-text filter over title, description, tags, and assignee
    #[arg(short, long)]
    pub query: Option<String>,
}

#[derive(Args)]
pub struct ShowArgs {
    /// Item id
    pub id: String,
}

#[derive(Args)]
pub struct AddArgs {
    /// Item title
    pub title: String,
    #[arg(short, long)]
    pub description: Option<String>,
    /// critical, high, medium, or low (default: high)
    #[arg(short, long)]
    pub priority: Option<String>,
    /// S1..S4
    #[arg(short, long)]
    pub severity: Option<String>,
    #[arg(short, long)]
    pub assignee: Option<String>,
    /// Tag (repeatable)
    #[arg(short, long, action = clap::ArgAction::Append)]
    pub tag: Vec<String>,
    /// Due date, YYYY-MM-DD
    #[arg(long)]
    pub due: Option<String>,
}

#[derive(Args)]
pub struct StateArgs {
    /// Item id
    pub id: String,
    /// New status: new, in_progress, blocked, or done
    pub status: String,
}

#[derive(Args)]
pub struct RmArgs {
    /// Item id
    pub id: String,
}

#[derive(Args)]
pub struct ExportArgs {
    /// Output file (default: z10triage-export.json)
    #[arg(short, long)]
    pub output: Option<String>,
}

#[derive(Args)]
pub struct ImportArgs {
    /// JSON file holding an array of items
    pub file: String,
}

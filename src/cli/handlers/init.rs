use std::fs;
use std::path::Path;

use crate::cli::commands::InitArgs;
use crate::io::config_io::CONFIG_FILE_NAME;
use crate::io::store::{BOARD_DIR_NAME, BOARD_FILE_NAME, Store};

/// Template written as z10/config.toml on init
const CONFIG_TEMPLATE: &str = r##"[board]
name = "{NAME}"

[ui]
# show_key_hints = true

# Theme color overrides (hex), e.g.:
# [ui.colors]
# background = "#0C001B"
# highlight = "#FB4196"

# Per-tag chip colors, e.g.:
# [ui.tag_colors]
# bug = "#FF4444"
"##;

/// `zt init`: create the board directory with an empty store and a
/// commented config template.
pub fn cmd_init(args: InitArgs, target: Option<&str>) -> Result<(), Box<dyn std::error::Error>> {
    let root = match target {
        Some(dir) => fs::canonicalize(dir)?,
        None => std::env::current_dir()?,
    };
    let board_dir = root.join(BOARD_DIR_NAME);
    let board_file = board_dir.join(BOARD_FILE_NAME);

    if board_file.exists() && !args.force {
        return Err(format!(
            "board already initialized at {} (use --force to reset it)",
            board_dir.display()
        )
        .into());
    }
    if board_file.exists() {
        fs::remove_file(&board_file)?;
    }

    // The store's lazy open writes the empty v1 schema
    let store = Store::new(&board_dir);
    store.get_all()?;

    let name = args.name.unwrap_or_else(|| board_name_from_dir(&root));
    let config_path = board_dir.join(CONFIG_FILE_NAME);
    if !config_path.exists() || args.force {
        fs::write(&config_path, CONFIG_TEMPLATE.replace("{NAME}", &name))?;
    }

    println!("initialized triage board in {}", board_dir.display());
    Ok(())
}

/// Default board name: the containing directory's name
fn board_name_from_dir(root: &Path) -> String {
    root.file_name()
        .and_then(|n| n.to_str())
        .map(|n| format!("{n} triage"))
        .unwrap_or_else(|| "z10 triage".to_string())
}

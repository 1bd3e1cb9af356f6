use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Configuration from z10/config.toml. Every section is optional; a board
/// without a config file runs on defaults.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BoardConfig {
    #[serde(default)]
    pub board: BoardInfo,
    #[serde(default)]
    pub ui: UiConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BoardInfo {
    #[serde(default = "default_board_name")]
    pub name: String,
}

impl Default for BoardInfo {
    fn default() -> Self {
        BoardInfo {
            name: default_board_name(),
        }
    }
}

fn default_board_name() -> String {
    "z10 triage".to_string()
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UiConfig {
    #[serde(default)]
    pub show_key_hints: bool,
    /// Hex color overrides keyed by theme slot name (e.g. `background = "#0C001B"`)
    #[serde(default)]
    pub colors: HashMap<String, String>,
    /// Per-tag colors for card tag chips
    #[serde(default)]
    pub tag_colors: HashMap<String, String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_config_uses_defaults() {
        let config: BoardConfig = toml::from_str("").unwrap();
        assert_eq!(config.board.name, "z10 triage");
        assert!(!config.ui.show_key_hints);
        assert!(config.ui.colors.is_empty());
    }

    #[test]
    fn parses_ui_overrides() {
        let config: BoardConfig = toml::from_str(
            r##"
[board]
name = "support rotation"

[ui]
show_key_hints = true

[ui.colors]
background = "#000000"

[ui.tag_colors]
infra = "#4488FF"
"##,
        )
        .unwrap();
        assert_eq!(config.board.name, "support rotation");
        assert!(config.ui.show_key_hints);
        assert_eq!(config.ui.colors.get("background").unwrap(), "#000000");
        assert_eq!(config.ui.tag_colors.get("infra").unwrap(), "#4488FF");
    }
}

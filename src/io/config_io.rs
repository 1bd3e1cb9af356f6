use std::fs;
use std::path::Path;

use crate::model::config::BoardConfig;

/// File name of the optional board configuration.
pub const CONFIG_FILE_NAME: &str = "config.toml";

/// Read `z10/config.toml`. A missing file yields the default config; a
/// malformed one is reported so a typo does not silently reset the theme.
pub fn read_config(board_dir: &Path) -> Result<BoardConfig, toml::de::Error> {
    let path = board_dir.join(CONFIG_FILE_NAME);
    let Ok(text) = fs::read_to_string(&path) else {
        return Ok(BoardConfig::default());
    };
    toml::from_str(&text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn missing_config_falls_back_to_defaults() {
        let tmp = TempDir::new().unwrap();
        let config = read_config(tmp.path()).unwrap();
        assert_eq!(config.board.name, "z10 triage");
    }

    #[test]
    fn present_config_is_parsed() {
        let tmp = TempDir::new().unwrap();
        fs::write(
            tmp.path().join(CONFIG_FILE_NAME),
            "[board]\nname = \"ops board\"\n",
        )
        .unwrap();
        let config = read_config(tmp.path()).unwrap();
        assert_eq!(config.board.name, "ops board");
    }

    #[test]
    fn malformed_config_is_an_error() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join(CONFIG_FILE_NAME), "not toml {{{").unwrap();
        assert!(read_config(tmp.path()).is_err());
    }
}

//! Runtime settings for the bot binary.
//!
//! The API token and base URL are read by [`lichess_client::ClientConfig::from_env`];
//! this module only covers what the binary itself needs.

use std::path::PathBuf;

/// File name prefix for daily log files.
pub const LOG_FILE_PREFIX: &str = "lichess-bot";

/// Get the directory for log files.
///
/// Priority:
/// 1. `LICHESS_BOT_LOG_DIR` env variable if set and non-empty
/// 2. `None`, logging to stdout
pub fn get_log_dir() -> Option<PathBuf> {
    log_dir_from(std::env::var("LICHESS_BOT_LOG_DIR").ok())
}

fn log_dir_from(value: Option<String>) -> Option<PathBuf> {
    value.filter(|dir| !dir.trim().is_empty()).map(PathBuf::from)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_dir() {
        assert_eq!(log_dir_from(None), None);
        assert_eq!(log_dir_from(Some("  ".into())), None);
        assert_eq!(
            log_dir_from(Some("/var/log/bot".into())),
            Some(PathBuf::from("/var/log/bot"))
        );
    }
}

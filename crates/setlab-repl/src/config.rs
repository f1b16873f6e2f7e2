use std::env;
use std::path::PathBuf;

pub const STATE_VAR: &str = "SETLAB_STATE";
pub const HISTORY_VAR: &str = "SETLAB_HISTORY";
pub const LOG_VAR: &str = "SETLAB_LOG";

pub const DEFAULT_LOG_FILTER: &str = "warn";

/// Where things live, read once at startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub state_path: PathBuf,
    pub history_path: PathBuf,
    pub log_filter: String,
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_lookup(dirs::data_dir(), |key| env::var(key).ok())
    }

    fn from_lookup(data_dir: Option<PathBuf>, lookup: impl Fn(&str) -> Option<String>) -> Self {
        let lookup = |key| lookup(key).filter(|value| !value.trim().is_empty());
        let base = data_dir.map_or_else(|| PathBuf::from("."), |dir| dir.join("setlab"));

        Self {
            state_path: lookup(STATE_VAR).map_or_else(|| base.join("state.json"), PathBuf::from),
            history_path: lookup(HISTORY_VAR)
                .map_or_else(|| base.join("history.txt"), PathBuf::from),
            log_filter: lookup(LOG_VAR).unwrap_or_else(|| DEFAULT_LOG_FILTER.to_owned()),
        }
    }
}

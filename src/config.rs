use std::env;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

const SETTINGS_FILE: &str = "config.toml";
const HISTORY_FILE: &str = "history.json";
const DEFAULT_LOG_FILTER: &str = "warn";

#[derive(Debug, Error)]
pub enum ConfigError {
	#[error("io error: {0}")]
	Io(#[from] std::io::Error),
	#[error("failed to parse {path}: {source}")]
	TomlDecode {
		path: PathBuf,
		source: toml::de::Error,
	},
	#[error("invalid date {0:?}, expected YYYY-MM-DD")]
	InvalidDate(String),
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Settings {
	pub history_path: Option<PathBuf>,
	pub log: Option<String>,
}

impl Settings {
	pub fn load() -> Result<Self, ConfigError> {
		Self::load_from(&state_dir().join(SETTINGS_FILE))
	}

	pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
		let raw = match fs::read_to_string(path) {
			Ok(raw) => raw,
			Err(err) if err.kind() == ErrorKind::NotFound => return Ok(Self::default()),
			Err(err) => return Err(ConfigError::Io(err)),
		};

		toml::from_str(&raw).map_err(|source| ConfigError::TomlDecode {
			path: path.to_path_buf(),
			source,
		})
	}

	pub fn log_filter(&self) -> String {
		env::var("DAYBOOK_LOG")
			.ok()
			.filter(|value| !value.trim().is_empty())
			.or_else(|| self.log.clone())
			.unwrap_or_else(|| DEFAULT_LOG_FILTER.to_string())
	}
}

pub fn resolve_history_path(cli_path: Option<PathBuf>, settings: &Settings) -> PathBuf {
	if let Some(path) = cli_path {
		return absolutize(path);
	}

	if let Some(path) = env::var_os("DAYBOOK_HISTORY") {
		let path = PathBuf::from(path);
		if !path.as_os_str().is_empty() {
			return absolutize(path);
		}
	}

	if let Some(path) = &settings.history_path {
		return absolutize(path.clone());
	}

	state_dir().join(HISTORY_FILE)
}

fn state_dir() -> PathBuf {
	if let Some(path) = env::var_os("DAYBOOK_STATE_DIR") {
		return PathBuf::from(path);
	}

	#[cfg(target_os = "windows")]
	{
		if let Some(path) = env::var_os("LOCALAPPDATA") {
			return PathBuf::from(path).join("daybook");
		}
	}

	if let Some(path) = env::var_os("XDG_STATE_HOME") {
		return PathBuf::from(path).join("daybook");
	}

	if let Some(path) = env::var_os("HOME") {
		return PathBuf::from(path)
			.join(".local")
			.join("state")
			.join("daybook");
	}

	PathBuf::from(".daybook")
}

fn absolutize(path: PathBuf) -> PathBuf {
	if path.is_absolute() {
		path
	} else if let Ok(cwd) = env::current_dir() {
		cwd.join(path)
	} else {
		path
	}
}

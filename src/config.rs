use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::store::{DEFAULT_QUOTA_BYTES, DEFAULT_STORAGE_KEY};

const LOG_FILE_NAME: &str = "blockpad.log";

/// Flags that can come from the command line or a config file.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ConfigFlags {
    pub ephemeral: bool,
    pub no_triggers: bool,
    pub data_dir: Option<PathBuf>,
    pub key: Option<String>,
    pub quota: Option<u64>,
    pub log_file: Option<PathBuf>,
}

impl ConfigFlags {
    pub fn union(&self, other: &Self) -> Self {
        Self {
            ephemeral: self.ephemeral || other.ephemeral,
            no_triggers: self.no_triggers || other.no_triggers,
            data_dir: other.data_dir.clone().or_else(|| self.data_dir.clone()),
            key: other.key.clone().or_else(|| self.key.clone()),
            quota: other.quota.or(self.quota),
            log_file: other.log_file.clone().or_else(|| self.log_file.clone()),
        }
    }

    pub fn storage_key(&self) -> &str {
        self.key.as_deref().unwrap_or(DEFAULT_STORAGE_KEY)
    }

    pub fn quota_bytes(&self) -> u64 {
        self.quota.unwrap_or(DEFAULT_QUOTA_BYTES)
    }

    pub fn data_dir_or_default(&self) -> PathBuf {
        self.data_dir.clone().unwrap_or_else(default_data_dir)
    }

    /// Where the editor writes its log while the terminal UI owns the
    /// screen: `--log-file`, else `blockpad.log` in the data directory.
    pub fn log_path(&self) -> PathBuf {
        self.log_file
            .clone()
            .unwrap_or_else(|| self.data_dir_or_default().join(LOG_FILE_NAME))
    }
}

pub fn global_config_path() -> PathBuf {
    #[cfg(target_os = "windows")]
    {
        if let Some(appdata) = std::env::var_os("APPDATA") {
            return PathBuf::from(appdata).join("blockpad").join("config");
        }
    }

    #[cfg(target_os = "macos")]
    {
        if let Some(home) = std::env::var_os("HOME") {
            return PathBuf::from(home)
                .join("Library")
                .join("Application Support")
                .join("blockpad")
                .join("config");
        }
    }

    #[cfg(not(any(target_os = "windows", target_os = "macos")))]
    {
        if let Some(xdg) = std::env::var_os("XDG_CONFIG_HOME") {
            return PathBuf::from(xdg).join("blockpad").join("config");
        }
        if let Some(home) = std::env::var_os("HOME") {
            return PathBuf::from(home)
                .join(".config")
                .join("blockpad")
                .join("config");
        }
    }

    PathBuf::from(".blockpadrc")
}

pub fn local_override_path() -> PathBuf {
    PathBuf::from(".blockpadrc")
}

/// Directory holding the saved-document archive.
pub fn default_data_dir() -> PathBuf {
    #[cfg(target_os = "windows")]
    {
        if let Some(appdata) = std::env::var_os("LOCALAPPDATA") {
            return PathBuf::from(appdata).join("blockpad");
        }
    }

    #[cfg(target_os = "macos")]
    {
        if let Some(home) = std::env::var_os("HOME") {
            return PathBuf::from(home)
                .join("Library")
                .join("Application Support")
                .join("blockpad")
                .join("data");
        }
    }

    #[cfg(not(any(target_os = "windows", target_os = "macos")))]
    {
        if let Some(xdg) = std::env::var_os("XDG_DATA_HOME") {
            return PathBuf::from(xdg).join("blockpad");
        }
        if let Some(home) = std::env::var_os("HOME") {
            return PathBuf::from(home)
                .join(".local")
                .join("share")
                .join("blockpad");
        }
    }

    PathBuf::from(".blockpad")
}

pub fn load_config_flags(path: &Path) -> Result<ConfigFlags> {
    if !path.exists() {
        return Ok(ConfigFlags::default());
    }
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config {}", path.display()))?;
    let tokens = content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .flat_map(|line| line.split_whitespace().map(ToOwned::to_owned))
        .collect::<Vec<_>>();
    Ok(parse_flag_tokens(&tokens))
}

pub fn save_config_flags(path: &Path, flags: &ConfigFlags) -> Result<()> {
    let mut lines = Vec::new();
    lines.push("# blockpad defaults (saved with --save)".to_string());
    if flags.ephemeral {
        lines.push("--ephemeral".to_string());
    }
    if flags.no_triggers {
        lines.push("--no-triggers".to_string());
    }
    if let Some(dir) = &flags.data_dir {
        lines.push(format!("--data-dir {}", dir.display()));
    }
    if let Some(key) = &flags.key {
        lines.push(format!("--key {key}"));
    }
    if let Some(quota) = flags.quota {
        lines.push(format!("--quota {quota}"));
    }
    if let Some(path) = &flags.log_file {
        lines.push(format!("--log-file {}", path.display()));
    }
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create config dir {}", parent.display()))?;
    }
    fs::write(path, format!("{}\n", lines.join("\n")))
        .with_context(|| format!("Failed to write config {}", path.display()))
}

pub fn clear_config_flags(path: &Path) -> Result<()> {
    if path.exists() {
        fs::remove_file(path).with_context(|| format!("Failed to remove {}", path.display()))?;
    }
    Ok(())
}

/// Pull known flags out of a token list. Unknown tokens are ignored, and
/// both `--flag value` and `--flag=value` are accepted.
pub fn parse_flag_tokens(tokens: &[String]) -> ConfigFlags {
    let mut flags = ConfigFlags::default();
    let mut i = 0;
    while i < tokens.len() {
        let token = &tokens[i];
        if token == "--ephemeral" {
            flags.ephemeral = true;
        } else if token == "--no-triggers" {
            flags.no_triggers = true;
        } else if let Some(value) = flag_value(tokens, &mut i, "--data-dir") {
            flags.data_dir = Some(PathBuf::from(value));
        } else if let Some(value) = flag_value(tokens, &mut i, "--key") {
            flags.key = Some(value.to_string());
        } else if let Some(value) = flag_value(tokens, &mut i, "--quota") {
            flags.quota = value.parse().ok();
        } else if let Some(value) = flag_value(tokens, &mut i, "--log-file") {
            flags.log_file = Some(PathBuf::from(value));
        }
        i += 1;
    }
    flags
}

/// Value of `name` at `tokens[*i]`, either inline (`--name=value`) or as
/// the next token, in which case `i` is advanced past it.
fn flag_value<'a>(tokens: &'a [String], i: &mut usize, name: &str) -> Option<&'a str> {
    let token = tokens[*i].as_str();
    if token == name {
        let next = tokens.get(*i + 1)?;
        *i += 1;
        return Some(next.as_str());
    }
    token.strip_prefix(name)?.strip_prefix('=')
}

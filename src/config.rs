use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

/// How the headless host prints passes.
#[derive(clap::ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Html,
    Json,
}

impl OutputFormat {
    const fn as_str(self) -> &'static str {
        match self {
            Self::Html => "html",
            Self::Json => "json",
        }
    }
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ConfigFlags {
    pub state: bool,
    pub every: bool,
    pub format: Option<OutputFormat>,
    pub log_filter: Option<String>,
}

impl ConfigFlags {
    pub fn union(&self, other: &Self) -> Self {
        Self {
            state: self.state || other.state,
            every: self.every || other.every,
            format: other.format.or(self.format),
            log_filter: other
                .log_filter
                .clone()
                .or_else(|| self.log_filter.clone()),
        }
    }
}

pub fn global_config_path() -> PathBuf {
    #[cfg(target_os = "windows")]
    {
        if let Some(appdata) = std::env::var_os("APPDATA") {
            return PathBuf::from(appdata).join("quire").join("config");
        }
    }

    #[cfg(target_os = "macos")]
    {
        if let Some(home) = std::env::var_os("HOME") {
            return PathBuf::from(home)
                .join("Library")
                .join("Application Support")
                .join("quire")
                .join("config");
        }
    }

    #[cfg(not(any(target_os = "windows", target_os = "macos")))]
    {
        if let Some(xdg) = std::env::var_os("XDG_CONFIG_HOME") {
            return PathBuf::from(xdg).join("quire").join("config");
        }
        if let Some(home) = std::env::var_os("HOME") {
            return PathBuf::from(home).join(".config").join("quire").join("config");
        }
    }

    PathBuf::from(".quirerc")
}

pub fn local_override_path() -> PathBuf {
    PathBuf::from(".quirerc")
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
    let mut lines = vec!["# quire defaults (saved with --save)".to_string()];
    if flags.state {
        lines.push("--state".to_string());
    }
    if flags.every {
        lines.push("--every".to_string());
    }
    if let Some(format) = flags.format {
        lines.push(format!("--format {}", format.as_str()));
    }
    if let Some(filter) = &flags.log_filter {
        lines.push(format!("--log-filter {filter}"));
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

/// Pick the flags quire knows out of raw argument tokens. Everything else
/// (positional arguments, unknown flags) is ignored.
pub fn parse_flag_tokens(tokens: &[String]) -> ConfigFlags {
    let mut flags = ConfigFlags::default();
    let mut i = 0;
    while i < tokens.len() {
        let token = &tokens[i];
        if token == "--state" {
            flags.state = true;
        } else if token == "--every" {
            flags.every = true;
        } else if token == "--format" {
            if let Some(next) = tokens.get(i + 1) {
                flags.format = parse_format(next);
                i += 1;
            }
        } else if let Some(value) = token.strip_prefix("--format=") {
            flags.format = parse_format(value);
        } else if token == "--log-filter" {
            if let Some(next) = tokens.get(i + 1) {
                flags.log_filter = Some(next.clone());
                i += 1;
            }
        } else if let Some(value) = token.strip_prefix("--log-filter=") {
            flags.log_filter = Some(value.to_owned());
        }
        i += 1;
    }
    flags
}

fn parse_format(s: &str) -> Option<OutputFormat> {
    match s {
        "html" => Some(OutputFormat::Html),
        "json" => Some(OutputFormat::Json),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_parse_flag_tokens_extracts_known_flags() {
        let args = vec![
            "quire".to_string(),
            "--state".to_string(),
            "--format".to_string(),
            "json".to_string(),
            "--log-filter=quire=debug".to_string(),
            "page.html".to_string(),
        ];
        let flags = parse_flag_tokens(&args);
        assert!(flags.state);
        assert!(!flags.every);
        assert_eq!(flags.format, Some(OutputFormat::Json));
        assert_eq!(flags.log_filter.as_deref(), Some("quire=debug"));
    }

    #[test]
    fn test_config_union_merges_cli_over_file_for_options() {
        let file = ConfigFlags {
            every: true,
            format: Some(OutputFormat::Html),
            ..ConfigFlags::default()
        };
        let cli = ConfigFlags {
            state: true,
            format: Some(OutputFormat::Json),
            ..ConfigFlags::default()
        };
        let merged = file.union(&cli);
        assert!(merged.every);
        assert!(merged.state);
        assert_eq!(merged.format, Some(OutputFormat::Json));
    }

    #[test]
    fn test_save_load_and_clear_config() {
        let dir = tempdir().unwrap();
        let path = dir.path().join(".quirerc");
        let flags = ConfigFlags {
            state: true,
            every: true,
            format: Some(OutputFormat::Json),
            log_filter: Some("quire=trace".into()),
        };

        save_config_flags(&path, &flags).unwrap();
        let loaded = load_config_flags(&path).unwrap();
        assert_eq!(loaded, flags);

        clear_config_flags(&path).unwrap();
        assert!(!path.exists());
    }

    #[test]
    fn test_unknown_format_is_ignored() {
        let args = vec!["--format".to_string(), "yaml".to_string()];
        assert_eq!(parse_flag_tokens(&args).format, None);
    }
}

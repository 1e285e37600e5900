use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::Parser;
use serde::Deserialize;

use crate::ids::IdStrategy;

pub const DEFAULT_CONFIG_FILE: &str = "gymlist.toml";

#[derive(Parser, Debug, Default)]
#[command(author, version, about = "Build and edit a workout checklist", long_about = None)]
pub struct Cli {
    /// Directory the list is saved in
    #[arg(long)]
    pub data_dir: Option<PathBuf>,
    /// TOML settings file (defaults to ./gymlist.toml when present)
    #[arg(long)]
    pub config: Option<PathBuf>,
    /// How new item ids are generated
    #[arg(long, value_enum)]
    pub id_strategy: Option<IdStrategy>,
    #[arg(long)]
    pub width: Option<f32>,
    #[arg(long)]
    pub height: Option<f32>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub data_dir: PathBuf,
    pub id_strategy: IdStrategy,
    pub window_size: [f32; 2],
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            id_strategy: IdStrategy::Uuid,
            window_size: [480.0, 800.0],
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct FileSettings {
    data_dir: Option<PathBuf>,
    id_strategy: Option<IdStrategy>,
    width: Option<f32>,
    height: Option<f32>,
}

fn default_data_dir() -> PathBuf {
    dirs::data_dir()
        .map(|dir| dir.join("gymlist"))
        .unwrap_or_else(|| PathBuf::from("./data"))
}

/// Defaults, then the TOML file, then the environment, then flags.
pub fn load_settings(cli: &Cli) -> anyhow::Result<Settings> {
    let mut settings = Settings::default();

    match &cli.config {
        Some(path) => apply_file(&mut settings, path)?,
        None => {
            let path = Path::new(DEFAULT_CONFIG_FILE);
            if path.exists() {
                apply_file(&mut settings, path)?;
            }
        }
    }

    apply_env(&mut settings, |key| std::env::var(key).ok());
    apply_cli(&mut settings, cli);
    Ok(settings)
}

fn apply_file(settings: &mut Settings, path: &Path) -> anyhow::Result<()> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("failed to read config file {}", path.display()))?;
    let file_cfg: FileSettings = toml::from_str(&raw)
        .with_context(|| format!("failed to parse config file {}", path.display()))?;

    if let Some(v) = file_cfg.data_dir {
        settings.data_dir = v;
    }
    if let Some(v) = file_cfg.id_strategy {
        settings.id_strategy = v;
    }
    if let Some(v) = file_cfg.width {
        settings.window_size[0] = v;
    }
    if let Some(v) = file_cfg.height {
        settings.window_size[1] = v;
    }
    Ok(())
}

fn apply_env(settings: &mut Settings, lookup: impl Fn(&str) -> Option<String>) {
    if let Some(v) = lookup("GYMLIST_DATA_DIR") {
        settings.data_dir = PathBuf::from(v);
    }
    if let Some(v) = lookup("APP__DATA_DIR") {
        settings.data_dir = PathBuf::from(v);
    }
}

fn apply_cli(settings: &mut Settings, cli: &Cli) {
    if let Some(v) = &cli.data_dir {
        settings.data_dir = v.clone();
    }
    if let Some(v) = cli.id_strategy {
        settings.id_strategy = v;
    }
    if let Some(v) = cli.width {
        settings.window_size[0] = v;
    }
    if let Some(v) = cli.height {
        settings.window_size[1] = v;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn write_config(dir: &Path, body: &str) -> PathBuf {
        let path = dir.join("gymlist.toml");
        fs::write(&path, body).expect("write config");
        path
    }

    #[test]
    fn file_values_override_defaults() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = write_config(
            dir.path(),
            "data_dir = \"/tmp/gym\"\nid_strategy = \"timestamp\"\nwidth = 600.0\n",
        );
        let cli = Cli {
            config: Some(path),
            ..Default::default()
        };
        let settings = load_settings(&cli).expect("settings");
        assert_eq!(settings.data_dir, PathBuf::from("/tmp/gym"));
        assert_eq!(settings.id_strategy, IdStrategy::Timestamp);
        assert_eq!(settings.window_size, [600.0, 800.0]);
    }

    #[test]
    fn missing_explicit_config_is_an_error() {
        let cli = Cli {
            config: Some(PathBuf::from("/definitely/not/here.toml")),
            ..Default::default()
        };
        assert!(load_settings(&cli).is_err());
    }

    #[test]
    fn malformed_config_is_an_error() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = write_config(dir.path(), "id_strategy = \"sequential\"\n");
        let cli = Cli {
            config: Some(path),
            ..Default::default()
        };
        assert!(load_settings(&cli).is_err());
    }

    #[test]
    fn later_env_key_wins() {
        let env: HashMap<&str, &str> = [
            ("GYMLIST_DATA_DIR", "/from/gymlist"),
            ("APP__DATA_DIR", "/from/app"),
        ]
        .into_iter()
        .collect();
        let mut settings = Settings::default();
        apply_env(&mut settings, |key| env.get(key).map(|v| v.to_string()));
        assert_eq!(settings.data_dir, PathBuf::from("/from/app"));
    }

    #[test]
    fn flags_override_everything() {
        let mut settings = Settings {
            data_dir: PathBuf::from("/from/env"),
            id_strategy: IdStrategy::Timestamp,
            window_size: [1.0, 1.0],
        };
        let cli = Cli::parse_from([
            "gymList",
            "--data-dir",
            "/from/flag",
            "--id-strategy",
            "uuid",
            "--height",
            "900",
        ]);
        apply_cli(&mut settings, &cli);
        assert_eq!(settings.data_dir, PathBuf::from("/from/flag"));
        assert_eq!(settings.id_strategy, IdStrategy::Uuid);
        assert_eq!(settings.window_size, [1.0, 900.0]);
    }
}

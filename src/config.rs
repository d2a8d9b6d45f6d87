//! Runtime configuration.
//!
//! Settings come from a JSON file (see [`Config::load`]) with command line
//! overrides applied on top (see [`Overrides`]). Every field has a default,
//! so an empty object or a missing file is a valid configuration.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::abs::BufferUsage;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not read {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("invalid config {path}: {source}")]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("{0}")]
    Args(String),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    pub title: String,
    pub width: u32,
    pub height: u32,
    pub fullscreen: bool,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: "glprimer".to_string(),
            width: 960,
            height: 720,
            fullscreen: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    pub level: log::LevelFilter,
    /// Also write to `glprimer.log` in the local data directory.
    pub file: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: log::LevelFilter::Info,
            file: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub lesson: String,
    pub window: WindowConfig,
    pub vsync: bool,
    /// Stop after this many frames. Runs until the window closes if unset.
    pub max_frames: Option<u64>,
    pub texture: PathBuf,
    /// Block on the texture decode before the first frame instead of
    /// drawing with the placeholder while it loads.
    pub wait_for_texture: bool,
    /// Usage hint for every vertex buffer.
    pub buffer_usage: BufferUsage,
    pub point_count: usize,
    /// Seed for random colors and point clouds. Random if unset.
    pub seed: Option<u64>,
    pub log: LogConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            lesson: "lit-cube".to_string(),
            window: WindowConfig::default(),
            vsync: true,
            max_frames: None,
            texture: PathBuf::from("assets/textures/wall.png"),
            wait_for_texture: false,
            buffer_usage: BufferUsage::Static,
            point_count: 100_000,
            seed: None,
            log: LogConfig::default(),
        }
    }
}

impl Config {
    /// `config.json` in the per-user config directory.
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("glprimer").join("config.json"))
    }

    /// Loads the configuration.
    ///
    /// An explicit `path` must exist. Without one, the default path is used
    /// if it exists, and the built-in defaults otherwise.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(path) => Self::from_file(path),
            None => match Self::default_path() {
                Some(path) if path.is_file() => Self::from_file(&path),
                _ => Ok(Self::default()),
            },
        }
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn apply(&mut self, overrides: &Overrides) {
        if let Some(lesson) = &overrides.lesson {
            self.lesson = lesson.clone();
        }
        if let Some(frames) = overrides.max_frames {
            self.max_frames = Some(frames);
        }
        if let Some(texture) = &overrides.texture {
            self.texture = texture.clone();
        }
    }
}

/// Settings given on the command line.
///
/// `glprimer [LESSON] [--config PATH] [--frames N] [--texture PATH] [--list]`
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Overrides {
    pub lesson: Option<String>,
    pub config: Option<PathBuf>,
    pub max_frames: Option<u64>,
    pub texture: Option<PathBuf>,
    pub list: bool,
}

impl Overrides {
    pub fn from_args<I>(args: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator,
        I::Item: Into<String>,
    {
        let mut overrides = Self::default();
        let mut args = args.into_iter().map(Into::into);
        while let Some(arg) = args.next() {
            let mut value = |flag: &str| {
                args.next()
                    .ok_or_else(|| ConfigError::Args(format!("{flag} needs a value")))
            };
            match arg.as_str() {
                "--config" => overrides.config = Some(value("--config")?.into()),
                "--texture" => overrides.texture = Some(value("--texture")?.into()),
                "--frames" => {
                    let frames = value("--frames")?;
                    let frames = frames.parse().map_err(|_| {
                        ConfigError::Args(format!("--frames expects a number, got `{frames}`"))
                    })?;
                    overrides.max_frames = Some(frames);
                }
                "--list" => overrides.list = true,
                flag if flag.starts_with("--") => {
                    return Err(ConfigError::Args(format!("unknown option `{flag}`")));
                }
                lesson => {
                    if overrides.lesson.is_some() {
                        return Err(ConfigError::Args(format!(
                            "only one lesson can be given, got a second one: `{lesson}`"
                        )));
                    }
                    overrides.lesson = Some(lesson.to_string());
                }
            }
        }
        Ok(overrides)
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn test_empty_object_is_default() {
        let config: Config = serde_json::from_str("{}").unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_partial_config() {
        let json = r#"{
            "lesson": "point-cloud",
            "window": { "width": 640 },
            "log": { "level": "debug" }
        }"#;
        let config: Config = serde_json::from_str(json).unwrap();
        assert!(!config.wait_for_texture);
        assert_eq!(config.buffer_usage, BufferUsage::Static);
        assert_eq!(config.lesson, "point-cloud");
        assert_eq!(config.window.width, 640);
        assert_eq!(config.window.height, 720);
        assert_eq!(config.log.level, log::LevelFilter::Debug);
        assert!(config.vsync);
    }

    #[test]
    fn test_texture_wait_and_usage() {
        let config: Config =
            serde_json::from_str(r#"{ "wait_for_texture": true, "buffer_usage": "dynamic" }"#)
                .unwrap();
        assert!(config.wait_for_texture);
        assert_eq!(config.buffer_usage, BufferUsage::Dynamic);
    }

    #[test]
    fn test_from_file_reports_parse_errors() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "{{ \"lesson\": 3 }}").unwrap();
        let err = Config::from_file(file.path()).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }

    #[test]
    fn test_explicit_path_must_exist() {
        let dir = tempfile::tempdir().unwrap();
        let err = Config::load(Some(&dir.path().join("missing.json"))).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }

    #[test]
    fn test_args() {
        let overrides =
            Overrides::from_args(["wave", "--frames", "120", "--config", "a.json"]).unwrap();
        assert_eq!(overrides.lesson.as_deref(), Some("wave"));
        assert_eq!(overrides.max_frames, Some(120));
        assert_eq!(overrides.config, Some(PathBuf::from("a.json")));
        assert!(!overrides.list);
    }

    #[test]
    fn test_bad_args() {
        assert!(Overrides::from_args(["--frames", "many"]).is_err());
        assert!(Overrides::from_args(["--frames"]).is_err());
        assert!(Overrides::from_args(["--fullscreen"]).is_err());
        assert!(Overrides::from_args(["wave", "lit-cube"]).is_err());
    }

    #[test]
    fn test_overrides_win() {
        let mut config = Config::default();
        config.apply(&Overrides::from_args(["9", "--texture", "brick.png"]).unwrap());
        assert_eq!(config.lesson, "9");
        assert_eq!(config.texture, PathBuf::from("brick.png"));
        assert_eq!(config.max_frames, None);
    }
}

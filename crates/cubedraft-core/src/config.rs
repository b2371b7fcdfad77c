// Configuration loading and parsing (config/draft.toml).

use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::oracle::DEFAULT_RATING;

/// Name of the single config file, relative to `config/` and `defaults/`.
pub const CONFIG_FILE: &str = "draft.toml";

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config file not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error("failed to parse config file {path}: {source}")]
    ParseError {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("validation error for field `{field}`: {message}")]
    ValidationError { field: String, message: String },

    #[error("failed to initialize config from defaults: {message}")]
    DefaultsCopyError { message: String },
}

// ---------------------------------------------------------------------------
// Config structs
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub draft: DraftSettings,
    #[serde(default)]
    pub bots: BotSettings,
    #[serde(default)]
    pub deck: DeckConfig,
    #[serde(default)]
    pub notify: NotifySettings,
    pub data: DataPaths,
}

/// Table shape: seats, packs per seat, cards per pack.
#[derive(Debug, Clone, Deserialize)]
pub struct DraftSettings {
    pub seats: usize,
    pub packs: usize,
    pub pack_size: usize,
    /// Fixed shuffle seed for reproducible simulations.
    #[serde(default)]
    pub seed: Option<u64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct BotSettings {
    /// Rating given to pack cards that arrive without one.
    #[serde(default = "default_rating")]
    pub default_rating: f64,
}

impl Default for BotSettings {
    fn default() -> Self {
        Self {
            default_rating: DEFAULT_RATING,
        }
    }
}

fn default_rating() -> f64 {
    DEFAULT_RATING
}

/// Deck construction targets.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct DeckConfig {
    /// Final main-deck size, filled up with lands.
    pub deck_size: usize,
    /// Nonland cards (core included) chosen before lands.
    pub nonland_target: usize,
    /// Cards picked by graph clustering before the greedy filler runs.
    pub core_size: usize,
    /// Number of clusters the core is split across.
    pub core_kernels: usize,
    /// Copies of each supplied basic land added to the pool.
    pub basic_copies: usize,
}

impl Default for DeckConfig {
    fn default() -> Self {
        Self {
            deck_size: 40,
            nonland_target: 23,
            core_size: 18,
            core_kernels: 2,
            basic_copies: 20,
        }
    }
}

/// Where picks and finished drafts are reported. Disabled when `base_url` is
/// absent.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NotifySettings {
    #[serde(default)]
    pub base_url: Option<String>,
    #[serde(default)]
    pub cube_id: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DataPaths {
    /// JSON cube list.
    pub cube: String,
    /// Where the finished draft record is written.
    pub output: String,
}

// ---------------------------------------------------------------------------
// Loading logic
// ---------------------------------------------------------------------------

/// Load and validate `config/draft.toml` relative to `base_dir`.
///
/// Does not copy defaults; prefer `load_config()` for the application.
pub fn load_config_from(base_dir: &Path) -> Result<Config, ConfigError> {
    let path = base_dir.join("config").join(CONFIG_FILE);
    let text = read_file(&path)?;
    let config = parse_config(&text, &path)?;
    validate(&config)?;
    Ok(config)
}

/// Parse config text. `path` is only used for error reporting.
pub fn parse_config(text: &str, path: &Path) -> Result<Config, ConfigError> {
    toml::from_str(text).map_err(|e| ConfigError::ParseError {
        path: path.to_path_buf(),
        source: e,
    })
}

/// Copy `defaults/draft.toml` into `config/` if it is missing there.
/// Returns the files that were copied.
pub fn ensure_config_files(base_dir: &Path) -> Result<Vec<PathBuf>, ConfigError> {
    let defaults_dir = base_dir.join("defaults");
    let config_dir = base_dir.join("config");

    if !defaults_dir.exists() {
        if !config_dir.exists() {
            return Err(ConfigError::DefaultsCopyError {
                message: format!(
                    "neither defaults/ nor config/ directory found in {}",
                    base_dir.display()
                ),
            });
        }
        return Ok(vec![]);
    }

    std::fs::create_dir_all(&config_dir).map_err(|e| ConfigError::DefaultsCopyError {
        message: format!("failed to create config directory: {e}"),
    })?;

    let source = defaults_dir.join(CONFIG_FILE);
    let target = config_dir.join(CONFIG_FILE);
    if !source.is_file() {
        return Ok(vec![]);
    }

    match std::fs::OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(&target)
    {
        Ok(mut dest) => {
            let content = std::fs::read(&source).map_err(|e| ConfigError::DefaultsCopyError {
                message: format!("failed to read {}: {e}", source.display()),
            })?;
            std::io::Write::write_all(&mut dest, &content).map_err(|e| ConfigError::DefaultsCopyError {
                message: format!("failed to write {}: {e}", target.display()),
            })?;
            Ok(vec![target])
        }
        // Already present in config/, keep the user's copy.
        Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => Ok(vec![]),
        Err(e) => Err(ConfigError::DefaultsCopyError {
            message: format!("failed to create {}: {e}", target.display()),
        }),
    }
}

/// Load config relative to the current working directory, copying defaults
/// first.
pub fn load_config() -> Result<Config, ConfigError> {
    let cwd = std::env::current_dir().map_err(|_| ConfigError::FileNotFound {
        path: PathBuf::from("."),
    })?;
    ensure_config_files(&cwd)?;
    load_config_from(&cwd)
}

fn read_file(path: &Path) -> Result<String, ConfigError> {
    std::fs::read_to_string(path).map_err(|_| ConfigError::FileNotFound {
        path: path.to_path_buf(),
    })
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

fn validate(config: &Config) -> Result<(), ConfigError> {
    let positive: &[(&str, usize)] = &[
        ("draft.seats", config.draft.seats),
        ("draft.packs", config.draft.packs),
        ("draft.pack_size", config.draft.pack_size),
        ("deck.deck_size", config.deck.deck_size),
        ("deck.core_kernels", config.deck.core_kernels),
    ];
    for (name, val) in positive {
        if *val == 0 {
            return Err(ConfigError::ValidationError {
                field: name.to_string(),
                message: "must be greater than 0".into(),
            });
        }
    }

    let deck = &config.deck;
    if deck.core_size > deck.nonland_target {
        return Err(ConfigError::ValidationError {
            field: "deck.core_size".into(),
            message: format!(
                "must not exceed deck.nonland_target ({}), got {}",
                deck.nonland_target, deck.core_size
            ),
        });
    }
    if deck.nonland_target > deck.deck_size {
        return Err(ConfigError::ValidationError {
            field: "deck.nonland_target".into(),
            message: format!(
                "must not exceed deck.deck_size ({}), got {}",
                deck.deck_size, deck.nonland_target
            ),
        });
    }

    if !config.bots.default_rating.is_finite() {
        return Err(ConfigError::ValidationError {
            field: "bots.default_rating".into(),
            message: format!("must be finite, got {}", config.bots.default_rating),
        });
    }

    Ok(())
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    const VALID: &str = r#"
[draft]
seats = 8
packs = 3
pack_size = 15

[bots]
default_rating = 1200.0

[deck]
deck_size = 40
nonland_target = 23
core_size = 18
core_kernels = 2
basic_copies = 20

[notify]
base_url = "http://localhost:8080"
cube_id = "vintage"

[data]
cube = "data/cube.json"
output = "out/draft.json"
"#;

    fn write_config(name: &str, contents: &str) -> PathBuf {
        let tmp = std::env::temp_dir().join(name);
        let _ = fs::remove_dir_all(&tmp);
        fs::create_dir_all(tmp.join("config")).unwrap();
        fs::write(tmp.join("config").join(CONFIG_FILE), contents).unwrap();
        tmp
    }

    #[test]
    fn load_valid_config() {
        let tmp = write_config("cubedraft_config_valid", VALID);
        let config = load_config_from(&tmp).expect("should load valid config");

        assert_eq!(config.draft.seats, 8);
        assert_eq!(config.draft.packs, 3);
        assert_eq!(config.draft.pack_size, 15);
        assert!(config.draft.seed.is_none());
        assert!((config.bots.default_rating - 1200.0).abs() < f64::EPSILON);
        assert_eq!(config.deck, DeckConfig::default());
        assert_eq!(config.notify.base_url.as_deref(), Some("http://localhost:8080"));
        assert_eq!(config.notify.cube_id.as_deref(), Some("vintage"));
        assert_eq!(config.data.cube, "data/cube.json");

        let _ = fs::remove_dir_all(&tmp);
    }

    #[test]
    fn optional_sections_default() {
        let minimal = r#"
[draft]
seats = 2
packs = 1
pack_size = 3
seed = 7

[data]
cube = "c.json"
output = "o.json"
"#;
        let config = parse_config(minimal, Path::new("draft.toml")).unwrap();
        assert_eq!(config.draft.seed, Some(7));
        assert_eq!(config.deck, DeckConfig::default());
        assert_eq!(config.bots.default_rating, DEFAULT_RATING);
        assert!(config.notify.base_url.is_none());
        validate(&config).unwrap();
    }

    #[test]
    fn partial_deck_section_keeps_other_defaults() {
        let text = VALID.replace("nonland_target = 23\n", "");
        let config = parse_config(&text, Path::new("draft.toml")).unwrap();
        assert_eq!(config.deck.nonland_target, 23);
    }

    #[test]
    fn rejects_zero_seats() {
        let text = VALID.replace("seats = 8", "seats = 0");
        let tmp = write_config("cubedraft_config_zero_seats", &text);
        let err = load_config_from(&tmp).unwrap_err();
        match err {
            ConfigError::ValidationError { field, .. } => assert_eq!(field, "draft.seats"),
            other => panic!("expected ValidationError, got {other:?}"),
        }
        let _ = fs::remove_dir_all(&tmp);
    }

    #[test]
    fn rejects_core_larger_than_nonland_target() {
        let text = VALID.replace("core_size = 18", "core_size = 30");
        let config = parse_config(&text, Path::new("draft.toml")).unwrap();
        match validate(&config).unwrap_err() {
            ConfigError::ValidationError { field, .. } => assert_eq!(field, "deck.core_size"),
            other => panic!("expected ValidationError, got {other:?}"),
        }
    }

    #[test]
    fn rejects_nonland_target_larger_than_deck() {
        let text = VALID
            .replace("deck_size = 40", "deck_size = 20")
            .replace("core_size = 18", "core_size = 10");
        let config = parse_config(&text, Path::new("draft.toml")).unwrap();
        match validate(&config).unwrap_err() {
            ConfigError::ValidationError { field, .. } => assert_eq!(field, "deck.nonland_target"),
            other => panic!("expected ValidationError, got {other:?}"),
        }
    }

    #[test]
    fn file_not_found_for_missing_config() {
        let tmp = std::env::temp_dir().join("cubedraft_config_missing");
        let _ = fs::remove_dir_all(&tmp);
        fs::create_dir_all(&tmp).unwrap();
        match load_config_from(&tmp).unwrap_err() {
            ConfigError::FileNotFound { path } => assert!(path.ends_with("config/draft.toml")),
            other => panic!("expected FileNotFound, got {other:?}"),
        }
        let _ = fs::remove_dir_all(&tmp);
    }

    #[test]
    fn parse_error_for_invalid_toml() {
        let tmp = write_config("cubedraft_config_invalid", "[draft\nseats = ");
        assert!(matches!(
            load_config_from(&tmp).unwrap_err(),
            ConfigError::ParseError { .. }
        ));
        let _ = fs::remove_dir_all(&tmp);
    }

    #[test]
    fn ensure_config_files_copies_missing_default() {
        let tmp = std::env::temp_dir().join("cubedraft_config_defaults");
        let _ = fs::remove_dir_all(&tmp);
        fs::create_dir_all(tmp.join("defaults")).unwrap();
        fs::write(tmp.join("defaults").join(CONFIG_FILE), VALID).unwrap();

        let copied = ensure_config_files(&tmp).unwrap();
        assert_eq!(copied, vec![tmp.join("config").join(CONFIG_FILE)]);
        // Second run leaves the existing file alone.
        assert!(ensure_config_files(&tmp).unwrap().is_empty());
        load_config_from(&tmp).unwrap();

        let _ = fs::remove_dir_all(&tmp);
    }

    #[test]
    fn ensure_config_files_keeps_edited_config() {
        let tmp = std::env::temp_dir().join("cubedraft_config_edited");
        let _ = fs::remove_dir_all(&tmp);
        fs::create_dir_all(tmp.join("defaults")).unwrap();
        fs::create_dir_all(tmp.join("config")).unwrap();
        fs::write(tmp.join("defaults").join(CONFIG_FILE), VALID).unwrap();
        fs::write(tmp.join("config").join(CONFIG_FILE), "# edited\n").unwrap();

        assert!(ensure_config_files(&tmp).unwrap().is_empty());
        let kept = fs::read_to_string(tmp.join("config").join(CONFIG_FILE)).unwrap();
        assert_eq!(kept, "# edited\n");

        let _ = fs::remove_dir_all(&tmp);
    }

    #[test]
    fn ensure_config_files_errors_when_both_dirs_missing() {
        let tmp = std::env::temp_dir().join("cubedraft_config_no_dirs");
        let _ = fs::remove_dir_all(&tmp);
        fs::create_dir_all(&tmp).unwrap();
        assert!(matches!(
            ensure_config_files(&tmp).unwrap_err(),
            ConfigError::DefaultsCopyError { .. }
        ));
        let _ = fs::remove_dir_all(&tmp);
    }
}

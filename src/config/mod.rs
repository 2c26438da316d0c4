//! Job configuration for `nobg.toml`.
//!
//! Every key is optional. Values are layered, later wins:
//!
//! 1. built-in defaults (the original `assets/` layout)
//! 2. `nobg.toml`, or the file given with `--config`
//! 3. CLI flags
//!
//! # Example
//!
//! ```toml
//! input = "assets/logo_source.png"   # Source logo (default depends on rule)
//! output = "assets/logo.png"         # Transparent PNG to write
//! rule = "white-red"                 # "dark-background" or "white-red"
//! ```
//!
//! Relative paths resolve against the current working directory. A leading
//! `~` is expanded to the home directory.

mod error;

pub use error::ConfigError;

use crate::{cli::Cli, debug, image::background::RulePreset, log};
use anyhow::Result;
use serde::Deserialize;
use std::{
    fs,
    path::{Path, PathBuf},
};

/// Config file looked up in the working directory when `--config` is absent.
pub const DEFAULT_CONFIG: &str = "nobg.toml";
/// Default input for the dark-background rule.
pub const DEFAULT_DARK_INPUT: &str = "assets/logo_black.png";
/// Default input for the white/red rule.
pub const DEFAULT_WHITE_RED_INPUT: &str = "assets/logo_source.png";
/// Default output path.
pub const DEFAULT_OUTPUT: &str = "assets/logo.png";

// ============================================================================
// root configuration
// ============================================================================

/// Root configuration structure representing nobg.toml
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct NobgConfig {
    /// Source image. Falls back to the rule's default input.
    pub input: Option<PathBuf>,

    /// Destination PNG. Falls back to `assets/logo.png`.
    pub output: Option<PathBuf>,

    /// Classification preset.
    pub rule: RulePreset,

    /// Classify only, write nothing (CLI only)
    #[serde(skip)]
    pub dry: bool,
}

impl NobgConfig {
    /// Load configuration from CLI arguments.
    ///
    /// An explicit `--config` must exist; the implicit `nobg.toml` is optional.
    pub fn load(cli: &Cli) -> Result<Self> {
        // before any file is touched, so config loading can log
        crate::logger::set_verbose(cli.verbose);

        let mut config = match Self::config_file(cli, Path::new("")) {
            Some(path) => Self::from_path(&path)?,
            None => {
                debug!("config"; "no {} found, using defaults", DEFAULT_CONFIG);
                Self::default()
            }
        };

        config.apply_cli(cli);
        config.expand_paths();
        Ok(config)
    }

    /// Pick the config file: `--config` if given, else `nobg.toml` in `dir` if present.
    fn config_file(cli: &Cli, dir: &Path) -> Option<PathBuf> {
        match &cli.config {
            Some(path) => Some(path.clone()),
            None => Some(dir.join(DEFAULT_CONFIG)).filter(|path| path.is_file()),
        }
    }

    /// Parse configuration from TOML string
    #[cfg(test)]
    pub fn from_str(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content)?;
        Ok(config)
    }

    /// Load configuration from file path with unknown field detection.
    fn from_path(path: &Path) -> Result<Self> {
        let content =
            fs::read_to_string(path).map_err(|err| ConfigError::Io(path.to_path_buf(), err))?;

        let (config, ignored) = Self::parse_with_ignored(&content)?;
        if !ignored.is_empty() {
            Self::print_unknown_fields_warning(&ignored, path);
        }

        debug!("config"; "loaded {}", path.display());
        Ok(config)
    }

    /// Parse TOML content, collecting any unknown fields.
    fn parse_with_ignored(content: &str) -> Result<(Self, Vec<String>), ConfigError> {
        let mut ignored = Vec::new();
        let deserializer = toml::Deserializer::new(content);
        let config = serde_ignored::deserialize(deserializer, |path: serde_ignored::Path| {
            ignored.push(path.to_string());
        })?;
        Ok((config, ignored))
    }

    /// Print warning about unknown fields.
    fn print_unknown_fields_warning(fields: &[String], path: &Path) {
        log!("warning"; "unknown fields in {}, ignoring:", path.display());
        for field in fields {
            eprintln!("- {}", field);
        }
    }

    // ========================================================================
    // cli configuration updates
    // ========================================================================

    /// Apply CLI flags on top of file values.
    fn apply_cli(&mut self, cli: &Cli) {
        Self::update_option(&mut self.rule, cli.rule.as_ref());
        if cli.input.is_some() {
            self.input.clone_from(&cli.input);
        }
        if cli.output.is_some() {
            self.output.clone_from(&cli.output);
        }
        self.dry = cli.dry;
    }

    /// Update config option if CLI value is provided.
    fn update_option<T: Clone>(config_option: &mut T, cli_option: Option<&T>) {
        if let Some(option) = cli_option {
            *config_option = option.clone();
        }
    }

    /// Expand `~` in configured paths.
    fn expand_paths(&mut self) {
        for path in [&mut self.input, &mut self.output].into_iter().flatten() {
            *path = expand_tilde(path);
        }
    }

    // ========================================================================
    // resolved paths
    // ========================================================================

    /// Input image path, defaulting per rule.
    pub fn input_path(&self) -> PathBuf {
        self.input.clone().unwrap_or_else(|| {
            PathBuf::from(match self.rule {
                RulePreset::DarkBackground => DEFAULT_DARK_INPUT,
                RulePreset::WhiteRed => DEFAULT_WHITE_RED_INPUT,
            })
        })
    }

    /// Output PNG path.
    pub fn output_path(&self) -> PathBuf {
        self.output
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT))
    }
}

/// Expand a leading `~`. Non-UTF-8 paths are returned unchanged.
fn expand_tilde(path: &Path) -> PathBuf {
    match path.to_str() {
        Some(s) => PathBuf::from(shellexpand::tilde(s).into_owned()),
        None => path.to_path_buf(),
    }
}

// ============================================================================
// tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use std::sync::Mutex;
    use tempfile::TempDir;

    /// `load` sets the global verbose flag; serialize tests that call it.
    static LOAD_LOCK: Mutex<()> = Mutex::new(());

    fn cli(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("nobg").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn test_from_str_invalid_toml() {
        let result = NobgConfig::from_str("rule = [dark");
        assert!(result.is_err());
    }

    #[test]
    fn test_defaults_match_assets_layout() {
        let config = NobgConfig::from_str("").unwrap();
        assert_eq!(config.rule, RulePreset::DarkBackground);
        assert_eq!(config.input_path(), PathBuf::from("assets/logo_black.png"));
        assert_eq!(config.output_path(), PathBuf::from("assets/logo.png"));
        assert!(!config.dry);
    }

    #[test]
    fn test_white_red_defaults_to_source_logo() {
        let config = NobgConfig::from_str("rule = \"white-red\"").unwrap();
        assert_eq!(config.rule, RulePreset::WhiteRed);
        assert_eq!(config.input_path(), PathBuf::from("assets/logo_source.png"));
    }

    #[test]
    fn test_unknown_rule_is_rejected() {
        assert!(NobgConfig::from_str("rule = \"luminance\"").is_err());
    }

    #[test]
    fn test_unknown_fields_are_collected() {
        let (config, ignored) =
            NobgConfig::parse_with_ignored("output = \"out.png\"\nthreshold = 40\n").unwrap();
        assert_eq!(config.output_path(), PathBuf::from("out.png"));
        assert_eq!(ignored, vec!["threshold".to_string()]);
    }

    #[test]
    fn test_dry_is_not_a_config_key() {
        let (config, ignored) = NobgConfig::parse_with_ignored("dry = true").unwrap();
        assert!(!config.dry);
        assert_eq!(ignored, vec!["dry".to_string()]);
    }

    #[test]
    fn test_cli_overrides_file() {
        let mut config = NobgConfig::from_str(
            "input = \"a.png\"\noutput = \"b.png\"\nrule = \"white-red\"",
        )
        .unwrap();
        config.apply_cli(&cli(&["-o", "c.png", "-r", "dark-background", "--dry"]));

        assert_eq!(config.input_path(), PathBuf::from("a.png"));
        assert_eq!(config.output_path(), PathBuf::from("c.png"));
        assert_eq!(config.rule, RulePreset::DarkBackground);
        assert!(config.dry);
    }

    #[test]
    fn test_load_explicit_config() {
        let _guard = LOAD_LOCK.lock().unwrap_or_else(|e| e.into_inner());
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("logo.toml");
        fs::write(&path, "input = \"src.png\"\nrule = \"white-red\"\n").unwrap();

        let config = NobgConfig::load(&cli(&["-C", path.to_str().unwrap()])).unwrap();
        assert_eq!(config.input_path(), PathBuf::from("src.png"));
        assert_eq!(config.rule, RulePreset::WhiteRed);
        assert_eq!(config.output_path(), PathBuf::from(DEFAULT_OUTPUT));
    }

    #[test]
    fn test_load_missing_explicit_config_fails() {
        let _guard = LOAD_LOCK.lock().unwrap_or_else(|e| e.into_inner());
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("absent.toml");

        let err = NobgConfig::load(&cli(&["-C", path.to_str().unwrap()])).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<ConfigError>(),
            Some(ConfigError::Io(p, _)) if *p == path
        ));
    }

    #[test]
    fn test_verbose_is_set_before_config_file_is_read() {
        let _guard = LOAD_LOCK.lock().unwrap_or_else(|e| e.into_inner());
        crate::logger::set_verbose(false);
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("absent.toml");

        // fails inside from_path, before any CLI value is applied
        let result = NobgConfig::load(&cli(&["-v", "-C", path.to_str().unwrap()]));
        assert!(result.is_err());
        assert!(crate::logger::is_verbose());
        crate::logger::set_verbose(false);
    }

    #[test]
    fn test_implicit_config_found_in_dir() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join(DEFAULT_CONFIG), "rule = \"white-red\"\n").unwrap();

        let path = NobgConfig::config_file(&cli(&[]), dir.path()).unwrap();
        assert_eq!(path, dir.path().join(DEFAULT_CONFIG));
        let config = NobgConfig::from_path(&path).unwrap();
        assert_eq!(config.rule, RulePreset::WhiteRed);
    }

    #[test]
    fn test_implicit_config_is_optional() {
        let dir = TempDir::new().unwrap();
        assert!(NobgConfig::config_file(&cli(&[]), dir.path()).is_none());
    }

    #[test]
    fn test_explicit_config_wins_over_implicit() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join(DEFAULT_CONFIG), "").unwrap();

        let path = NobgConfig::config_file(&cli(&["-C", "other.toml"]), dir.path());
        assert_eq!(path, Some(PathBuf::from("other.toml")));
    }

    #[test]
    fn test_expand_tilde_uses_home() {
        // requires a home directory, as in any normal test environment
        let expanded = expand_tilde(Path::new("~/logo.png"));
        assert!(!expanded.starts_with("~"));
        assert!(expanded.ends_with("logo.png"));
    }

    #[test]
    fn test_expand_tilde_leaves_plain_paths() {
        assert_eq!(expand_tilde(Path::new("assets/logo.png")), PathBuf::from("assets/logo.png"));
    }
}

//! Configuration management.
//!
//! A [`SplitterConfig`] is built once at startup (defaults, then an optional
//! TOML file, then CLI overrides) and passed to the services by reference.
//!
//! ```toml
//! [app]
//! input_filename = "NTF_SAMPLE.csv"
//! items_per_file = 2
//! output_prefix = "output_file"
//!
//! [parser]
//! item_policy = "any-order"
//! require_metadata = true
//!
//! [reader]
//! encodings = ["utf-8", "utf-8-sig", "cp1252", "latin-1"]
//!
//! [logging]
//! format = "pretty"
//! ```

mod options;
pub mod paths;

pub use options::{ItemPolicy, ParserOptions, ReaderOptions};

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Default input file name.
pub const DEFAULT_INPUT_FILENAME: &str = "NTF_SAMPLE.csv";

/// Default number of items per output file.
pub const DEFAULT_ITEMS_PER_FILE: i64 = 2;

/// Default output file name prefix.
pub const DEFAULT_OUTPUT_PREFIX: &str = "output_file";

/// Main configuration for jobsplit.
#[derive(Debug, Clone, Serialize)]
pub struct SplitterConfig {
    /// Directory that relative paths and defaults are anchored at.
    pub app_dir: PathBuf,
    /// Directory holding the input file.
    pub input_dir: PathBuf,
    /// Input file name inside `input_dir`.
    pub input_filename: String,
    /// Items per output file. Validated when the writer runs.
    pub items_per_file: i64,
    /// Directory output files are written to.
    pub output_dir: PathBuf,
    /// Output file name prefix.
    pub output_prefix: String,
    /// Structural parser options.
    pub parser: ParserOptions,
    /// Line reader options.
    pub reader: ReaderOptions,
    /// Logging settings.
    pub logging: LoggingSettings,
}

/// Logging settings from the config file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LoggingSettings {
    /// Output format: "pretty" or "json".
    pub format: Option<String>,
    /// Filter directive, e.g. "info" or "jobsplit=debug".
    pub filter: Option<String>,
    /// Optional log file path.
    pub file: Option<PathBuf>,
}

/// Configuration file structure (for TOML parsing).
#[derive(Debug, Deserialize, Default)]
#[serde(deny_unknown_fields)]
pub struct ConfigFile {
    /// Input/output settings.
    pub app: Option<ConfigFileApp>,
    /// Parser settings.
    pub parser: Option<ConfigFileParser>,
    /// Reader settings.
    pub reader: Option<ConfigFileReader>,
    /// Logging settings.
    pub logging: Option<LoggingSettings>,
}

/// `[app]` section in config file.
#[derive(Debug, Deserialize, Default)]
#[serde(deny_unknown_fields)]
pub struct ConfigFileApp {
    /// Input directory.
    pub input_dir: Option<String>,
    /// Input file name.
    pub input_filename: Option<String>,
    /// Items per output file.
    pub items_per_file: Option<i64>,
    /// Output directory.
    pub output_dir: Option<String>,
    /// Output prefix.
    pub output_prefix: Option<String>,
}

/// `[parser]` section in config file.
#[derive(Debug, Deserialize, Default)]
#[serde(deny_unknown_fields)]
pub struct ConfigFileParser {
    /// "any-order" or "strict".
    pub item_policy: Option<String>,
    /// Require at least one metadata line.
    pub require_metadata: Option<bool>,
}

/// `[reader]` section in config file.
#[derive(Debug, Deserialize, Default)]
#[serde(deny_unknown_fields)]
pub struct ConfigFileReader {
    /// Encoding labels in priority order.
    pub encodings: Option<Vec<String>>,
}

impl Default for SplitterConfig {
    fn default() -> Self {
        Self::for_app_dir(PathBuf::from("."))
    }
}

impl SplitterConfig {
    /// Creates a default configuration anchored at `app_dir`.
    #[must_use]
    pub fn for_app_dir(app_dir: impl Into<PathBuf>) -> Self {
        let app_dir = app_dir.into();
        Self {
            input_dir: app_dir.join(paths::INPUT_DIR_NAME),
            input_filename: DEFAULT_INPUT_FILENAME.to_string(),
            items_per_file: DEFAULT_ITEMS_PER_FILE,
            output_dir: app_dir.join(paths::OUTPUT_DIR_NAME),
            output_prefix: DEFAULT_OUTPUT_PREFIX.to_string(),
            parser: ParserOptions::default(),
            reader: ReaderOptions::default(),
            logging: LoggingSettings::default(),
            app_dir,
        }
    }

    /// Full path of the input file.
    #[must_use]
    pub fn input_path(&self) -> PathBuf {
        self.input_dir.join(&self.input_filename)
    }

    /// Loads configuration from a file path, anchored at `app_dir`.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed, or holds
    /// invalid values.
    pub fn load_from_file(path: &Path, app_dir: impl Into<PathBuf>) -> Result<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| Error::Config {
            path: path.to_path_buf(),
            cause: e.to_string(),
        })?;

        let file: ConfigFile = toml::from_str(&contents).map_err(|e| Error::Config {
            path: path.to_path_buf(),
            cause: e.to_string(),
        })?;

        Self::for_app_dir(app_dir)
            .merge_config_file(file)
            .map_err(|e| Error::Config {
                path: path.to_path_buf(),
                cause: e.to_string(),
            })
    }

    /// Loads configuration from the default locations.
    ///
    /// Checks the following paths in order:
    /// 1. `$JOBSPLIT_CONFIG_PATH`
    /// 2. `<app_dir>/config.toml`
    /// 3. Platform config dir (`~/.config/jobsplit/config.toml` on Linux)
    ///
    /// Returns the defaults if no config file is found.
    ///
    /// # Errors
    ///
    /// Returns an error if a config file exists but cannot be loaded.
    pub fn load_default() -> Result<Self> {
        let app_dir = paths::resolve_app_dir();

        if let Ok(config_path) = std::env::var(paths::CONFIG_PATH_ENV) {
            if !config_path.trim().is_empty() {
                return Self::load_from_file(Path::new(&config_path), app_dir);
            }
        }

        let local = app_dir.join(paths::CONFIG_FILE_NAME);
        if local.exists() {
            return Self::load_from_file(&local, app_dir);
        }

        if let Some(platform) = paths::platform_config_file() {
            if platform.exists() {
                return Self::load_from_file(&platform, app_dir);
            }
        }

        tracing::debug!(app_dir = %app_dir.display(), "No config file found; using defaults");
        Ok(Self::for_app_dir(app_dir))
    }

    /// Applies a parsed `ConfigFile` on top of this configuration.
    fn merge_config_file(mut self, file: ConfigFile) -> Result<Self> {
        if let Some(app) = file.app {
            if let Some(dir) = app.input_dir {
                self.input_dir = paths::anchor(&self.app_dir, dir);
            }
            if let Some(name) = app.input_filename {
                self.input_filename = name;
            }
            if let Some(n) = app.items_per_file {
                self.items_per_file = n;
            }
            if let Some(dir) = app.output_dir {
                self.output_dir = paths::anchor(&self.app_dir, dir);
            }
            if let Some(prefix) = app.output_prefix {
                self.output_prefix = prefix;
            }
        }
        if let Some(parser) = file.parser {
            if let Some(policy) = parser.item_policy {
                self.parser.item_policy = policy.parse()?;
            }
            if let Some(v) = parser.require_metadata {
                self.parser.require_metadata = v;
            }
        }
        if let Some(reader) = file.reader {
            if let Some(labels) = reader.encodings {
                self.reader = ReaderOptions::from_labels(&labels)?;
            }
        }
        if let Some(logging) = file.logging {
            self.logging = LoggingSettings {
                file: logging.file.map(|f| paths::anchor(&self.app_dir, f)),
                ..logging
            };
        }

        Ok(self)
    }

    /// Sets the input directory.
    #[must_use]
    pub fn with_input_dir(mut self, path: impl Into<PathBuf>) -> Self {
        self.input_dir = path.into();
        self
    }

    /// Sets the input file name.
    #[must_use]
    pub fn with_input_filename(mut self, name: impl Into<String>) -> Self {
        self.input_filename = name.into();
        self
    }

    /// Sets the input directory and file name from one path.
    #[must_use]
    pub fn with_input_path(mut self, path: &Path) -> Self {
        if let Some(name) = path.file_name() {
            self.input_filename = name.to_string_lossy().into_owned();
        }
        self.input_dir = path
            .parent()
            .map_or_else(|| PathBuf::from("."), Path::to_path_buf);
        self
    }

    /// Sets the number of items per output file.
    #[must_use]
    pub const fn with_items_per_file(mut self, n: i64) -> Self {
        self.items_per_file = n;
        self
    }

    /// Sets the output directory.
    #[must_use]
    pub fn with_output_dir(mut self, path: impl Into<PathBuf>) -> Self {
        self.output_dir = path.into();
        self
    }

    /// Sets the output file prefix.
    #[must_use]
    pub fn with_output_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.output_prefix = prefix.into();
        self
    }

    /// Sets the parser options.
    #[must_use]
    pub const fn with_parser(mut self, parser: ParserOptions) -> Self {
        self.parser = parser;
        self
    }
}

use crate::{
    render::Layout,
    scanner::{Grid, Palette, Rgb, ScannerSettings},
};
use directories::ProjectDirs;
use serde::Deserialize;
use std::{
    fs, io,
    path::{Path, PathBuf},
    time::Duration,
};

const CONFIG_FILE_NAME: &str = "config.yaml";

/// The scanner configuration, as read from the config file.
#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub(crate) struct Config {
    /// The number of rows in the grid.
    #[serde(default = "default_rows")]
    pub rows: usize,

    /// The number of columns in the grid.
    #[serde(default = "default_columns")]
    pub columns: usize,

    /// The number of columns the lit band fades out over.
    #[serde(default = "default_band_width")]
    pub band_width: usize,

    /// How often the wave moves, in milliseconds.
    #[serde(default = "default_tick_interval")]
    pub tick_interval_ms: u64,

    /// The colors the wave cycles through every time it bounces.
    ///
    /// Colors are hex strings and must be quoted, e.g. `"#00ff78"`: an unquoted `#` starts a YAML
    /// comment and an unquoted `111827` is a number.
    #[serde(default = "default_palette")]
    pub palette: Vec<Rgb>,

    /// The color of unlit cells, as a quoted hex string.
    #[serde(default = "default_background")]
    pub background: Rgb,

    /// The title shown above the grid.
    #[serde(default = "default_title")]
    pub title: String,

    /// The line shown under the title.
    #[serde(default = "default_subtitle")]
    pub subtitle: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            rows: default_rows(),
            columns: default_columns(),
            band_width: default_band_width(),
            tick_interval_ms: default_tick_interval(),
            palette: default_palette(),
            background: default_background(),
            title: default_title(),
            subtitle: default_subtitle(),
        }
    }
}

impl Config {
    /// Load the config from a file.
    pub(crate) fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path).map_err(|e| ConfigError::Io(path.into(), e))?;
        Self::parse(&contents)
    }

    /// Load the config from the default location, falling back to the defaults if there's no
    /// file there.
    pub(crate) fn load_default() -> Result<Self, ConfigError> {
        match Self::default_path() {
            Some(path) if path.exists() => Self::load(&path),
            _ => Ok(Self::default()),
        }
    }

    pub(crate) fn parse(contents: &str) -> Result<Self, ConfigError> {
        // an empty file is a valid, empty config
        if contents.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(contents)?)
    }

    /// The path the config file is looked up at by default.
    pub(crate) fn default_path() -> Option<PathBuf> {
        let dirs = ProjectDirs::from("", "", "scanner-wave")?;
        Some(dirs.config_dir().join(CONFIG_FILE_NAME))
    }

    /// Validate this config and turn it into the settings the scanner runs with.
    pub(crate) fn scanner_settings(&self) -> Result<ScannerSettings, ConfigError> {
        if self.rows == 0 {
            return Err(ConfigError::ZeroRows);
        }
        if self.columns == 0 {
            return Err(ConfigError::ZeroColumns);
        }
        if self.band_width == 0 {
            return Err(ConfigError::ZeroBandWidth);
        }
        if self.tick_interval_ms == 0 {
            return Err(ConfigError::ZeroTickInterval);
        }
        let grid = Grid { rows: self.rows, columns: self.columns };
        if Layout::required_size(&grid).is_none() {
            return Err(ConfigError::GridTooLarge(self.rows, self.columns));
        }
        let palette = Palette::new(self.palette.clone()).ok_or(ConfigError::EmptyPalette)?;
        Ok(ScannerSettings {
            grid,
            band_width: self.band_width,
            tick_interval: Duration::from_millis(self.tick_interval_ms),
            palette,
            background: self.background,
        })
    }
}

/// Overrides for config values coming from the command line.
#[derive(Clone, Debug, Default)]
pub(crate) struct ConfigOverrides {
    pub rows: Option<usize>,
    pub columns: Option<usize>,
    pub band_width: Option<usize>,
    pub tick_interval_ms: Option<u64>,
}

impl ConfigOverrides {
    pub(crate) fn apply(self, config: &mut Config) {
        if let Some(rows) = self.rows {
            config.rows = rows;
        }
        if let Some(columns) = self.columns {
            config.columns = columns;
        }
        if let Some(band_width) = self.band_width {
            config.band_width = band_width;
        }
        if let Some(interval) = self.tick_interval_ms {
            config.tick_interval_ms = interval;
        }
    }
}

fn default_rows() -> usize {
    15
}

fn default_columns() -> usize {
    20
}

fn default_band_width() -> usize {
    6
}

fn default_tick_interval() -> u64 {
    50
}

fn default_palette() -> Vec<Rgb> {
    let palette = Palette::default();
    (0..palette.len()).map(|index| palette.color(index)).collect()
}

fn default_background() -> Rgb {
    Rgb::BACKGROUND
}

fn default_title() -> String {
    "Scanner Wave".into()
}

fn default_subtitle() -> String {
    "A dynamic light pattern simulation built with Rust.".into()
}

#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config file {0:?}: {1}")]
    Io(PathBuf, io::Error),

    #[error("invalid configuration: {0}")]
    Invalid(#[from] serde_yaml::Error),

    #[error("grid needs at least one row")]
    ZeroRows,

    #[error("grid needs at least one column")]
    ZeroColumns,

    #[error("a {0}x{1} grid can't fit in any terminal")]
    GridTooLarge(usize, usize),

    #[error("band width must be at least 1")]
    ZeroBandWidth,

    #[error("tick interval must be at least 1ms")]
    ZeroTickInterval,

    #[error("palette needs at least one color")]
    EmptyPalette,
}

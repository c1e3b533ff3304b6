//! YAML configuration. Command-line flags override whatever is loaded here.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, warn};

use crate::depth::DepthChannel;
use crate::run::PatternSource;
use crate::separation::DEFAULT_DEPTH_FALLOFF;
use crate::synthesizer::{SynthesisParameters, DEFAULT_DRIFT_TOLERANCE, DEFAULT_STRENGTH};
use crate::tile::RandomStyle;

/// File names searched in the working directory when no path is given.
pub const CONFIG_FILENAMES: &[&str] = &["sirds.yml", "sirds.yaml"];

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },
}

/// Contents of a config file. Missing keys take their defaults.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SirdsConfig {
    pub strength: f64,
    pub invert_depth: bool,
    pub channel: DepthChannel,
    pub depth_falloff: f64,
    pub drift_tolerance: u32,
    pub parallel: bool,
    /// Pattern image path, or `random`.
    pub pattern: String,
    pub seed: u64,
    pub random_style: RandomStyle,
}

impl Default for SirdsConfig {
    fn default() -> Self {
        SirdsConfig {
            strength: DEFAULT_STRENGTH,
            invert_depth: false,
            channel: DepthChannel::Luminance,
            depth_falloff: DEFAULT_DEPTH_FALLOFF,
            drift_tolerance: DEFAULT_DRIFT_TOLERANCE,
            parallel: true,
            pattern: "random".to_string(),
            seed: 0,
            random_style: RandomStyle::Color,
        }
    }
}

impl SirdsConfig {
    /// Replace out-of-range values with defaults, returning one warning per
    /// replacement.
    pub fn sanitize(&mut self) -> Vec<String> {
        let mut warnings = Vec::new();
        if !self.strength.is_finite() || self.strength <= 0.0 {
            warnings.push(format!(
                "strength {} is not positive, using {}",
                self.strength, DEFAULT_STRENGTH
            ));
            self.strength = DEFAULT_STRENGTH;
        }
        if !(0.0..=1.0).contains(&self.depth_falloff) {
            warnings.push(format!(
                "depth_falloff {} is outside [0, 1], using {}",
                self.depth_falloff, DEFAULT_DEPTH_FALLOFF
            ));
            self.depth_falloff = DEFAULT_DEPTH_FALLOFF;
        }
        if self.pattern.trim().is_empty() {
            warnings.push("empty pattern, using random".to_string());
            self.pattern = "random".to_string();
        }
        warnings
    }

    pub fn parameters(&self) -> SynthesisParameters {
        SynthesisParameters {
            strength: self.strength,
            invert_depth: self.invert_depth,
            channel: self.channel,
            depth_falloff: self.depth_falloff,
            drift_tolerance: self.drift_tolerance,
            parallel: self.parallel,
        }
    }

    pub fn pattern_source(&self) -> PatternSource {
        PatternSource::from_arg(&self.pattern, self.seed, self.random_style)
    }
}

/// A loaded config plus where it came from.
#[derive(Debug, Clone)]
pub struct ConfigHandle {
    pub config: SirdsConfig,
    pub source: Option<PathBuf>,
    pub warnings: Vec<String>,
}

/// Parse and sanitize a config document.
pub fn parse_config(text: &str, path: &Path) -> Result<ConfigHandle, ConfigError> {
    let mut config: SirdsConfig = if text.trim().is_empty() {
        SirdsConfig::default()
    } else {
        serde_yaml::from_str(text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?
    };
    let warnings = config.sanitize();
    Ok(ConfigHandle {
        config,
        source: Some(path.to_path_buf()),
        warnings,
    })
}

/// Load `explicit` if given, otherwise the first of [`CONFIG_FILENAMES`]
/// found in `dir`, otherwise defaults.
pub fn load_config(explicit: Option<&Path>, dir: &Path) -> Result<ConfigHandle, ConfigError> {
    let path = match explicit {
        Some(p) => Some(p.to_path_buf()),
        None => CONFIG_FILENAMES
            .iter()
            .map(|name| dir.join(name))
            .find(|p| p.is_file()),
    };

    let handle = match path {
        Some(path) => {
            let text = fs::read_to_string(&path).map_err(|source| ConfigError::Io {
                path: path.clone(),
                source,
            })?;
            debug!(path = %path.display(), "loaded config");
            parse_config(&text, &path)?
        }
        None => ConfigHandle {
            config: SirdsConfig::default(),
            source: None,
            warnings: Vec::new(),
        },
    };

    for w in &handle.warnings {
        warn!("{w}");
    }
    Ok(handle)
}

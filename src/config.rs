//! Configuration types for viseme generation and blending.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::error::{LipsyncError, Result};

/// Top-level lip-sync configuration.
///
/// Consumed read-only by the sequence generator and the per-frame blender.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VisemeConfig {
    /// Envelope timing.
    pub timing: TimingConfig,
    /// Intensity scaling and decay.
    pub intensity: IntensityConfig,
    /// Attack/release shaping curves.
    pub curves: CurveConfig,
    /// Generator heuristics.
    pub lipsync: LipsyncConfig,
    /// Avatar rig naming.
    pub rig: RigConfig,
}

/// Envelope timing configuration (all values in milliseconds).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimingConfig {
    /// Uniform offset added to every generated envelope point.
    ///
    /// Negative values pull the mouth ahead of the audio, which usually
    /// reads better on screen.
    pub fudge_factor: f64,
    /// Fade-in duration. `0` disables attack shaping.
    pub attack_time: f64,
    /// Fade-out duration. `0` disables release shaping.
    pub release_time: f64,
    /// Viseme windows shorter than this are ignored at blend time (`0` = disabled).
    pub min_duration: f64,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            fudge_factor: 0.0,
            attack_time: 50.0,
            release_time: 60.0,
            min_duration: 0.0,
        }
    }
}

/// Intensity configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IntensityConfig {
    /// Global intensity scalar applied to every active viseme.
    pub base_multiplier: f32,
    /// Floor applied to every active value.
    pub min_threshold: f32,
    /// Per-frame decay multiplier for targets, in `[0, 1)`.
    pub dampening_factor: f32,
}

impl Default for IntensityConfig {
    fn default() -> Self {
        Self {
            base_multiplier: 1.0,
            min_threshold: 0.0,
            dampening_factor: 0.8,
        }
    }
}

/// Shape of an attack or release ramp.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CurveKind {
    /// `x`
    #[default]
    Linear,
    /// `x^2`
    Quadratic,
    /// `x^3`
    Cubic,
    /// `1 - e^(-3x)`
    Exponential,
}

/// Attack/release curve selection.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CurveConfig {
    pub attack_curve: CurveKind,
    pub release_curve: CurveKind,
}

/// Fixed intensity overrides for codes that need a firm lip closure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpecialVisemes {
    #[serde(rename = "PP")]
    pub pp: f32,
    #[serde(rename = "FF")]
    pub ff: f32,
}

impl Default for SpecialVisemes {
    fn default() -> Self {
        Self { pp: 0.9, ff: 0.9 }
    }
}

/// Sequence generator configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LipsyncConfig {
    /// Base intensity for generated visemes.
    pub base_level: f32,
    /// Extra intensity granted to words with timing slack.
    pub level_range: f32,
    /// Per-code intensity overrides.
    pub special_visemes: SpecialVisemes,
    /// Per-viseme baseline used to compute a word's overdrive slack.
    pub overdrive_ms_per_viseme: f64,
    /// Upper bound on the usable word duration, per viseme.
    pub max_ms_per_viseme: f64,
    /// Milliseconds per relative duration unit when estimating timing from text alone.
    pub ms_per_unit: f64,
    /// Registry key of the phonetic processor.
    pub language: String,
    /// Expand digit sequences into number words before conversion.
    pub expand_numbers: bool,
}

impl Default for LipsyncConfig {
    fn default() -> Self {
        Self {
            base_level: 0.6,
            level_range: 0.4,
            special_visemes: SpecialVisemes::default(),
            overdrive_ms_per_viseme: 150.0,
            max_ms_per_viseme: 200.0,
            ms_per_unit: 80.0,
            language: "en".to_owned(),
            expand_numbers: true,
        }
    }
}

/// Avatar rig naming configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RigConfig {
    /// Prefix for fine-grained destination names (`viseme_PP`, `viseme_aa`, ...).
    pub fine_name_prefix: String,
    /// Default amplification applied by the driver on every write.
    pub amplify: f32,
}

impl Default for RigConfig {
    fn default() -> Self {
        Self {
            fine_name_prefix: "viseme_".to_owned(),
            amplify: 1.0,
        }
    }
}

impl VisemeConfig {
    /// Parse configuration from a TOML string, falling back to defaults for missing fields.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML is malformed or a value is out of range.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: Self =
            toml::from_str(content).map_err(|e| LipsyncError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, parsed or validated.
    pub fn from_file(path: &std::path::Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Save configuration to a TOML file, creating parent directories as needed.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written or the config cannot be serialized.
    pub fn save_to_file(&self, path: &std::path::Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content =
            toml::to_string_pretty(self).map_err(|e| LipsyncError::Config(e.to_string()))?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Returns the default config file path: `<config dir>/fae/lipsync.toml`.
    ///
    /// `FAE_CONFIG_DIR` overrides the platform config directory.
    pub fn default_config_path() -> PathBuf {
        let dir = match std::env::var_os("FAE_CONFIG_DIR") {
            Some(override_dir) => PathBuf::from(override_dir),
            None => dirs::config_dir()
                .map(|d| d.join("fae"))
                .unwrap_or_else(|| PathBuf::from("/tmp/fae-config")),
        };
        dir.join("lipsync.toml")
    }

    /// Validates this configuration, returning an error if any field is out of range.
    ///
    /// Checks:
    /// - every numeric field is finite
    /// - `intensity.dampening_factor` is in `[0, 1)`
    /// - attack, release and minimum durations are non-negative
    /// - `lipsync.max_ms_per_viseme` and `lipsync.ms_per_unit` are positive
    /// - the `PP` and `FF` override levels are in `[0, 1]`
    pub fn validate(&self) -> Result<()> {
        let floats = [
            ("timing.fudge_factor", self.timing.fudge_factor),
            ("timing.attack_time", self.timing.attack_time),
            ("timing.release_time", self.timing.release_time),
            ("timing.min_duration", self.timing.min_duration),
            (
                "lipsync.overdrive_ms_per_viseme",
                self.lipsync.overdrive_ms_per_viseme,
            ),
            ("lipsync.max_ms_per_viseme", self.lipsync.max_ms_per_viseme),
            ("lipsync.ms_per_unit", self.lipsync.ms_per_unit),
            (
                "intensity.base_multiplier",
                f64::from(self.intensity.base_multiplier),
            ),
            (
                "intensity.min_threshold",
                f64::from(self.intensity.min_threshold),
            ),
            (
                "intensity.dampening_factor",
                f64::from(self.intensity.dampening_factor),
            ),
            ("lipsync.base_level", f64::from(self.lipsync.base_level)),
            ("lipsync.level_range", f64::from(self.lipsync.level_range)),
            (
                "lipsync.special_visemes.PP",
                f64::from(self.lipsync.special_visemes.pp),
            ),
            (
                "lipsync.special_visemes.FF",
                f64::from(self.lipsync.special_visemes.ff),
            ),
            ("rig.amplify", f64::from(self.rig.amplify)),
        ];
        for (name, value) in floats {
            if !value.is_finite() {
                return Err(LipsyncError::Config(format!("{name} must be finite")));
            }
        }

        let dampening = self.intensity.dampening_factor;
        if !(0.0..1.0).contains(&dampening) {
            return Err(LipsyncError::Config(format!(
                "intensity.dampening_factor must be in [0, 1), got {dampening}"
            )));
        }
        for (name, value) in [
            ("timing.attack_time", self.timing.attack_time),
            ("timing.release_time", self.timing.release_time),
            ("timing.min_duration", self.timing.min_duration),
            (
                "lipsync.overdrive_ms_per_viseme",
                self.lipsync.overdrive_ms_per_viseme,
            ),
        ] {
            if value < 0.0 {
                return Err(LipsyncError::Config(format!(
                    "{name} must not be negative"
                )));
            }
        }
        for (name, value) in [
            ("PP", self.lipsync.special_visemes.pp),
            ("FF", self.lipsync.special_visemes.ff),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(LipsyncError::Config(format!(
                    "lipsync.special_visemes.{name} must be in [0, 1], got {value}"
                )));
            }
        }
        if self.lipsync.max_ms_per_viseme <= 0.0 {
            return Err(LipsyncError::Config(
                "lipsync.max_ms_per_viseme must be greater than 0".into(),
            ));
        }
        if self.lipsync.ms_per_unit <= 0.0 {
            return Err(LipsyncError::Config(
                "lipsync.ms_per_unit must be greater than 0".into(),
            ));
        }
        Ok(())
    }
}

//! exs2xpm.toml conversion settings
//!
//! Every field is optional; command-line flags override what the file sets.

use anyhow::{Context, Result};
use exs24::DrumHeuristic;
use mpc_xpm::ProgramType;
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Conversion settings file
#[derive(Debug, Clone, Deserialize)]
pub struct ConvertConfig {
    /// Zones per destination instrument before a key range is split
    /// Default: 4
    #[serde(default = "default_layers_per_instrument")]
    pub layers_per_instrument: usize,

    /// Log failed files and keep going instead of stopping the batch
    /// Default: true
    #[serde(default = "default_skip_errors")]
    pub skip_errors: bool,

    /// "keygroup", "drum" or "auto"
    /// Default: auto
    #[serde(default = "default_program_type")]
    pub program_type: String,

    /// Where to look for samples (defaults to the search path)
    #[serde(default)]
    pub samples_path: Option<PathBuf>,

    /// Worker threads for batch conversion (1 = sequential)
    #[serde(default)]
    pub jobs: Option<usize>,

    #[serde(default)]
    pub detect: DetectSection,
}

/// Drum detection thresholds
#[derive(Debug, Clone, Deserialize)]
pub struct DetectSection {
    #[serde(default = "default_min_single_note_ratio")]
    pub min_single_note_ratio: f64,
    #[serde(default = "default_max_pads")]
    pub max_pads: usize,
    #[serde(default = "default_min_one_shot_ratio")]
    pub min_one_shot_ratio: f64,
}

fn default_layers_per_instrument() -> usize {
    4
}

fn default_skip_errors() -> bool {
    true
}

fn default_program_type() -> String {
    "auto".to_string()
}

fn default_min_single_note_ratio() -> f64 {
    DrumHeuristic::default().min_single_note_ratio
}

fn default_max_pads() -> usize {
    DrumHeuristic::default().max_pads
}

fn default_min_one_shot_ratio() -> f64 {
    DrumHeuristic::default().min_one_shot_ratio
}

impl Default for DetectSection {
    fn default() -> Self {
        Self {
            min_single_note_ratio: default_min_single_note_ratio(),
            max_pads: default_max_pads(),
            min_one_shot_ratio: default_min_one_shot_ratio(),
        }
    }
}

impl Default for ConvertConfig {
    fn default() -> Self {
        Self {
            layers_per_instrument: default_layers_per_instrument(),
            skip_errors: default_skip_errors(),
            program_type: default_program_type(),
            samples_path: None,
            jobs: None,
            detect: DetectSection::default(),
        }
    }
}

impl ConvertConfig {
    /// Load settings from file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config: {}", path.display()))?;
        Self::parse(&content)
    }

    /// Parse settings from string
    pub fn parse(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content).context("Failed to parse exs2xpm.toml")?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values the converter cannot use
    pub fn validate(&self) -> Result<()> {
        if self.layers_per_instrument == 0 {
            anyhow::bail!("layers_per_instrument must be at least 1");
        }
        self.program_type()?;
        for (name, ratio) in [
            ("min_single_note_ratio", self.detect.min_single_note_ratio),
            ("min_one_shot_ratio", self.detect.min_one_shot_ratio),
        ] {
            if !(0.0..=1.0).contains(&ratio) {
                anyhow::bail!("detect.{name} must be between 0 and 1 (got {ratio})");
            }
        }
        Ok(())
    }

    /// Explicit program type, or `None` for auto-detection
    pub fn program_type(&self) -> Result<Option<ProgramType>> {
        parse_program_type(&self.program_type)
    }

    /// Drum detector configured from the `[detect]` table
    pub fn classifier(&self) -> DrumHeuristic {
        DrumHeuristic {
            min_single_note_ratio: self.detect.min_single_note_ratio,
            max_pads: self.detect.max_pads,
            min_one_shot_ratio: self.detect.min_one_shot_ratio,
        }
    }
}

/// "auto" or empty selects auto-detection
pub fn parse_program_type(value: &str) -> Result<Option<ProgramType>> {
    let value = value.trim();
    if value.is_empty() || value.eq_ignore_ascii_case("auto") {
        return Ok(None);
    }
    value
        .parse::<ProgramType>()
        .map(Some)
        .map_err(|e| anyhow::anyhow!(e))
}

// Tunable parameters, loaded from JSON.
//
// Every field has a default, so a config file only needs the values it
// changes (`{"sampler": {"window_length": 20}}` is a complete config). The
// defaults reproduce the training setup the model was built around: 60
// windows of 30 values drawn with seed 0, rendered at 130 BPM in 4-beat bars.

use crate::error::{Error, Result};
use crate::sampler::WindowSampler;
use jazz_improv_prng::{DEFAULT_SEED, SamplerRng};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct JazzConfig {
    pub sampler: SamplerConfig,
    pub render: RenderConfig,
}

impl JazzConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&json)?;
        config.render.validate()?;
        Ok(config)
    }
}

/// Batch geometry and seed for `WindowSampler`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SamplerConfig {
    /// Windows per batch (m).
    pub batch_size: usize,
    /// Symbols per window (Tx).
    pub window_length: usize,
    pub seed: u64,
}

impl Default for SamplerConfig {
    fn default() -> Self {
        Self {
            batch_size: 60,
            window_length: 30,
            seed: DEFAULT_SEED,
        }
    }
}

impl SamplerConfig {
    pub fn sampler(&self) -> Result<WindowSampler> {
        WindowSampler::new(self.batch_size, self.window_length)
    }

    pub fn rng(&self) -> SamplerRng {
        SamplerRng::new(self.seed)
    }
}

/// How predicted values are turned back into a timed score.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Value placed before every predicted sequence.
    pub lead_tone: String,
    /// Tone-class rewrites applied to predicted values (class -> class).
    pub substitutions: BTreeMap<String, String>,
    /// Beats per chord set; each set starts this far after the previous one.
    pub bar_length: f64,
    pub tempo_bpm: u32,
}

impl RenderConfig {
    /// Reject a bar length that cannot lay out chord sets.
    pub fn validate(&self) -> Result<()> {
        if !(self.bar_length.is_finite() && self.bar_length > 0.0) {
            return Err(Error::invalid(format!(
                "bar_length must be positive, got {}",
                self.bar_length
            )));
        }
        Ok(())
    }
}

impl Default for RenderConfig {
    fn default() -> Self {
        // "A" (approach) and "X" (arbitrary) tones are played as chord tones.
        let substitutions = [("A", "C"), ("X", "C")]
            .into_iter()
            .map(|(from, to)| (from.to_owned(), to.to_owned()))
            .collect();
        Self {
            lead_tone: "C,0.25".to_owned(),
            substitutions,
            bar_length: 4.0,
            tempo_bpm: 130,
        }
    }
}

use std::path::{Path, PathBuf};

use anyhow::Context as _;

use crate::{
    chart::style::ChartStyle,
    encode::sink::LoopMode,
    foundation::error::{BarRaceError, BarRaceResult},
    render::cpu::CpuBackendOpts,
};

/// Input table read when no path is configured.
pub const DEFAULT_INPUT: &str = "car_sales_2000_2024.csv";
/// Animation written when no path is configured.
pub const DEFAULT_OUTPUT: &str = "car_sales_ranking_smooth.gif";

/// Frame-level parallelism for range rendering. Output is identical either way.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RenderThreading {
    /// Render frames on a dedicated rayon pool.
    pub parallel: bool,
    /// Override the number of rayon worker threads. `None` uses rayon defaults.
    pub threads: Option<usize>,
    /// Frames rendered per batch before they are handed to the sink in order.
    pub chunk_size: usize,
}

impl Default for RenderThreading {
    fn default() -> Self {
        Self {
            parallel: false,
            threads: None,
            chunk_size: 32,
        }
    }
}

/// Everything one pipeline run needs.
///
/// Every field has a default, so a JSON config only lists what it changes.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PipelineConfig {
    pub input: PathBuf,
    pub output: PathBuf,
    /// Interpolated frames between two consecutive years.
    pub steps_per_year: u32,
    /// Display time of each frame.
    pub frame_delay_ms: u32,
    pub loop_mode: LoopMode,
    /// Replace an existing output file.
    pub overwrite: bool,
    /// GIF palette quantization speed, 1 (best) ..= 30 (fastest).
    pub gif_speed: i32,
    pub style: ChartStyle,
    pub fonts: CpuBackendOpts,
    pub threading: RenderThreading,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            input: PathBuf::from(DEFAULT_INPUT),
            output: PathBuf::from(DEFAULT_OUTPUT),
            steps_per_year: 10,
            frame_delay_ms: 100,
            loop_mode: LoopMode::Infinite,
            overwrite: true,
            gif_speed: 10,
            style: ChartStyle::default(),
            fonts: CpuBackendOpts::default(),
            threading: RenderThreading::default(),
        }
    }
}

impl PipelineConfig {
    pub fn from_json_str(s: &str) -> BarRaceResult<Self> {
        serde_json::from_str(s).map_err(|e| BarRaceError::serde(format!("pipeline config: {e}")))
    }

    pub fn from_path(path: &Path) -> BarRaceResult<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("read pipeline config '{}'", path.display()))?;
        Self::from_json_str(&text)
    }

    pub fn validate(&self) -> BarRaceResult<()> {
        if self.steps_per_year == 0 {
            return Err(BarRaceError::validation("steps_per_year must be >= 1"));
        }
        if self.frame_delay_ms == 0 {
            return Err(BarRaceError::validation("frame_delay_ms must be >= 1"));
        }
        if !(1..=30).contains(&self.gif_speed) {
            return Err(BarRaceError::validation("gif_speed must be in 1..=30"));
        }
        if self.threading.threads == Some(0) {
            return Err(BarRaceError::validation(
                "threading.threads must be >= 1 when set",
            ));
        }
        self.style.validate()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/pipeline/config.rs"]
mod tests;

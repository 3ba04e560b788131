use crate::{
    foundation::{core::FrameIndex, error::BarRaceResult},
    render::backend::FrameRGBA,
};

/// How many times the animation plays.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LoopMode {
    /// Repeat forever.
    #[default]
    Infinite,
    /// Repeat the given number of extra times after the first play.
    Finite(u16),
}

/// Configuration provided to a [`FrameSink`] before the first frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SinkConfig {
    /// Output width in pixels.
    pub width: u32,
    /// Output height in pixels.
    pub height: u32,
    /// Display duration of every frame in milliseconds.
    pub frame_delay_ms: u32,
    pub loop_mode: LoopMode,
    /// Number of frames that will be pushed.
    pub total_frames: u64,
}

/// Consumer of rendered frames.
///
/// Ordering contract: `push_frame` is called in strictly increasing `FrameIndex` order,
/// starting at 0, between one `begin` and one `end`.
pub trait FrameSink {
    /// Called once before any frames are pushed.
    fn begin(&mut self, cfg: SinkConfig) -> BarRaceResult<()>;
    /// Push one frame in timeline order.
    fn push_frame(&mut self, idx: FrameIndex, frame: &FrameRGBA) -> BarRaceResult<()>;
    /// Called once after the last frame is pushed.
    fn end(&mut self) -> BarRaceResult<()>;
}

/// In-memory sink for tests and previews.
#[derive(Debug, Default)]
pub struct InMemorySink {
    cfg: Option<SinkConfig>,
    frames: Vec<(FrameIndex, FrameRGBA)>,
    finished: bool,
}

impl InMemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Configuration captured in `begin`, if any.
    pub fn config(&self) -> Option<SinkConfig> {
        self.cfg
    }

    /// Frames in timeline order.
    pub fn frames(&self) -> &[(FrameIndex, FrameRGBA)] {
        &self.frames
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }
}

impl FrameSink for InMemorySink {
    fn begin(&mut self, cfg: SinkConfig) -> BarRaceResult<()> {
        self.cfg = Some(cfg);
        self.frames.clear();
        self.finished = false;
        Ok(())
    }

    fn push_frame(&mut self, idx: FrameIndex, frame: &FrameRGBA) -> BarRaceResult<()> {
        self.frames.push((idx, frame.clone()));
        Ok(())
    }

    fn end(&mut self) -> BarRaceResult<()> {
        self.finished = true;
        Ok(())
    }
}

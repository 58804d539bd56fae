use image::RgbImage;

use crate::foundation::core::FrameIndex;
use crate::foundation::error::{TrailreelError, TrailreelResult};

/// Configuration provided to a [`FrameSink`] before any frame is
/// pushed.
#[derive(Debug, Clone, Copy)]
pub struct SinkConfig {
    /// Output width in pixels.
    pub width: u32,
    /// Output height in pixels.
    pub height: u32,
    /// Output frames per second.
    pub fps: u32,
}

/// Sink contract for consuming rendered frames in timeline order.
///
/// Ordering contract: `push_frame` is called in strictly increasing
/// `FrameIndex` order, with every frame at the dimensions announced in
/// `begin`.
pub trait FrameSink {
    /// Called once before any frames are pushed.
    fn begin(&mut self, cfg: SinkConfig) -> TrailreelResult<()>;
    /// Push one frame in strictly increasing timeline order.
    fn push_frame(&mut self, idx: FrameIndex, frame: &RgbImage) -> TrailreelResult<()>;
    /// Called once after the last frame is pushed.
    fn end(&mut self) -> TrailreelResult<()>;
}

/// Drive a finished frame sequence through a sink in order.
///
/// Sink configuration is taken from the first frame; the sequence must
/// be non-empty and the sink enforces that every later frame matches.
pub fn encode_frames(
    frames: &[RgbImage],
    fps: u32,
    sink: &mut dyn FrameSink,
) -> TrailreelResult<()> {
    let first = frames
        .first()
        .ok_or_else(|| TrailreelError::validation("encode_frames requires at least one frame"))?;

    sink.begin(SinkConfig {
        width: first.width(),
        height: first.height(),
        fps,
    })?;
    for (i, frame) in frames.iter().enumerate() {
        sink.push_frame(FrameIndex(i as u64), frame)?;
    }
    sink.end()
}

/// In-memory sink for tests and debugging.
#[derive(Debug, Default)]
pub struct InMemorySink {
    cfg: Option<SinkConfig>,
    frames: Vec<(FrameIndex, RgbImage)>,
}

impl InMemorySink {
    /// Create a new in-memory sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the sink configuration captured in `begin`, if any.
    pub fn config(&self) -> Option<SinkConfig> {
        self.cfg
    }

    /// Borrow the captured frames.
    pub fn frames(&self) -> &[(FrameIndex, RgbImage)] {
        &self.frames
    }
}

impl FrameSink for InMemorySink {
    fn begin(&mut self, cfg: SinkConfig) -> TrailreelResult<()> {
        self.cfg = Some(cfg);
        self.frames.clear();
        Ok(())
    }

    fn push_frame(&mut self, idx: FrameIndex, frame: &RgbImage) -> TrailreelResult<()> {
        self.frames.push((idx, frame.clone()));
        Ok(())
    }

    fn end(&mut self) -> TrailreelResult<()> {
        Ok(())
    }
}

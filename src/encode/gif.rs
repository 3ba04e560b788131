use std::{
    fs::File,
    io::{self, BufWriter, Write},
    path::{Path, PathBuf},
    sync::{Arc, Mutex},
};

use anyhow::Context as _;
use image::{
    Delay, Frame, RgbaImage,
    codecs::gif::{GifEncoder, Repeat},
};

use crate::{
    encode::sink::{FrameSink, LoopMode, SinkConfig},
    foundation::{
        core::FrameIndex,
        error::{BarRaceError, BarRaceResult},
    },
    render::backend::FrameRGBA,
};

/// Options for [`GifSink`].
#[derive(Clone, Debug)]
pub struct GifSinkOpts {
    pub out_path: PathBuf,
    /// Replace an existing file at `out_path`.
    pub overwrite: bool,
    /// Color that translucent pixels are flattened onto.
    pub bg_rgba: [u8; 4],
    /// Palette quantization speed, 1 (best) ..= 30 (fastest).
    pub speed: i32,
}

impl GifSinkOpts {
    pub fn new(out_path: impl Into<PathBuf>) -> Self {
        Self {
            out_path: out_path.into(),
            overwrite: true,
            bg_rgba: [255, 255, 255, 255],
            speed: 10,
        }
    }
}

/// Writes frames to an animated GIF file.
///
/// The file is created in `begin`; the GIF trailer is written in `end`.
pub struct GifSink {
    opts: GifSinkOpts,
    cfg: Option<SinkConfig>,
    encoder: Option<GifEncoder<CheckedWriter>>,
    write_error: Arc<Mutex<Option<io::Error>>>,
    next_index: u64,
}

impl GifSink {
    pub fn new(opts: GifSinkOpts) -> Self {
        Self {
            opts,
            cfg: None,
            encoder: None,
            write_error: Arc::new(Mutex::new(None)),
            next_index: 0,
        }
    }

    pub fn out_path(&self) -> &Path {
        &self.opts.out_path
    }

    /// Frames written so far.
    pub fn frames_written(&self) -> u64 {
        self.next_index
    }
}

impl FrameSink for GifSink {
    fn begin(&mut self, cfg: SinkConfig) -> BarRaceResult<()> {
        if self.encoder.is_some() {
            return Err(BarRaceError::encode("gif sink already started"));
        }
        if cfg.width == 0 || cfg.height == 0 {
            return Err(BarRaceError::validation("gif width/height must be non-zero"));
        }
        if cfg.width > u32::from(u16::MAX) || cfg.height > u32::from(u16::MAX) {
            return Err(BarRaceError::validation(format!(
                "gif frames are limited to {0}x{0}, got {1}x{2}",
                u16::MAX,
                cfg.width,
                cfg.height
            )));
        }
        if !(1..=30).contains(&self.opts.speed) {
            return Err(BarRaceError::validation("gif speed must be in 1..=30"));
        }

        let path = &self.opts.out_path;
        ensure_parent_dir(path)?;
        if !self.opts.overwrite && path.exists() {
            return Err(BarRaceError::validation(format!(
                "output file '{}' already exists",
                path.display()
            )));
        }

        let file =
            File::create(path).with_context(|| format!("create gif '{}'", path.display()))?;
        self.write_error = Arc::new(Mutex::new(None));
        let writer = CheckedWriter {
            inner: BufWriter::new(file),
            first_error: Arc::clone(&self.write_error),
        };
        let mut encoder = GifEncoder::new_with_speed(writer, self.opts.speed);
        let repeat = match cfg.loop_mode {
            LoopMode::Infinite => Repeat::Infinite,
            LoopMode::Finite(n) => Repeat::Finite(n),
        };
        encoder
            .set_repeat(repeat)
            .map_err(|e| BarRaceError::encode(format!("set gif repeat: {e}")))?;

        self.encoder = Some(encoder);
        self.cfg = Some(cfg);
        self.next_index = 0;
        Ok(())
    }

    fn push_frame(&mut self, idx: FrameIndex, frame: &FrameRGBA) -> BarRaceResult<()> {
        let (Some(cfg), Some(encoder)) = (self.cfg.as_ref(), self.encoder.as_mut()) else {
            return Err(BarRaceError::encode(
                "gif sink is not accepting frames (begin not called or already ended)",
            ));
        };
        if idx.0 != self.next_index {
            return Err(BarRaceError::encode(format!(
                "frames must arrive in order: expected {}, got {}",
                self.next_index, idx.0
            )));
        }
        if frame.width != cfg.width || frame.height != cfg.height {
            return Err(BarRaceError::validation(format!(
                "frame size mismatch: got {}x{}, expected {}x{}",
                frame.width, frame.height, cfg.width, cfg.height
            )));
        }

        let mut opaque = vec![0u8; frame.data.len()];
        flatten_to_opaque_rgba8(
            &mut opaque,
            &frame.data,
            frame.premultiplied,
            self.opts.bg_rgba,
        )?;
        let image = RgbaImage::from_raw(frame.width, frame.height, opaque).ok_or_else(|| {
            BarRaceError::validation("frame.data size mismatch with width*height*4")
        })?;

        let delay = Delay::from_numer_denom_ms(cfg.frame_delay_ms, 1);
        encoder
            .encode_frame(Frame::from_parts(image, 0, 0, delay))
            .map_err(|e| BarRaceError::encode(format!("encode gif frame {}: {e}", idx.0)))?;

        self.next_index += 1;
        Ok(())
    }

    fn end(&mut self) -> BarRaceResult<()> {
        let Some(encoder) = self.encoder.take() else {
            return Err(BarRaceError::encode("gif sink is not started"));
        };
        // Dropping the encoder writes the GIF trailer and flushes the buffered file.
        drop(encoder);
        self.cfg = None;

        let failed = self
            .write_error
            .lock()
            .map_err(|_| BarRaceError::encode("gif write error state poisoned"))?
            .take();
        if let Some(err) = failed {
            return Err(BarRaceError::encode(format!(
                "write gif '{}': {err}",
                self.opts.out_path.display()
            )));
        }

        tracing::debug!(
            path = %self.opts.out_path.display(),
            frames = self.next_index,
            "gif finalized"
        );
        Ok(())
    }
}

/// Buffered file writer that remembers the first IO error, including the final flush on drop.
///
/// `GifEncoder` only writes the trailer when dropped, so failures there would otherwise be lost.
struct CheckedWriter {
    inner: BufWriter<File>,
    first_error: Arc<Mutex<Option<io::Error>>>,
}

impl CheckedWriter {
    fn record<T>(&self, res: io::Result<T>) -> io::Result<T> {
        if let Err(err) = &res
            && let Ok(mut slot) = self.first_error.lock()
            && slot.is_none()
        {
            *slot = Some(io::Error::new(err.kind(), err.to_string()));
        }
        res
    }
}

impl Write for CheckedWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let res = self.inner.write(buf);
        self.record(res)
    }

    fn flush(&mut self) -> io::Result<()> {
        let res = self.inner.flush();
        self.record(res)
    }
}

impl Drop for CheckedWriter {
    fn drop(&mut self) {
        let res = self.inner.flush();
        let _ = self.record(res);
    }
}

pub fn ensure_parent_dir(path: &Path) -> BarRaceResult<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create output directory '{}'", parent.display()))?;
    }
    Ok(())
}

/// Composite `src` over an opaque background, producing straight RGBA with alpha 255.
pub(crate) fn flatten_to_opaque_rgba8(
    dst: &mut [u8],
    src: &[u8],
    src_is_premul: bool,
    bg_rgba: [u8; 4],
) -> BarRaceResult<()> {
    if dst.len() != src.len() || !dst.len().is_multiple_of(4) {
        return Err(BarRaceError::validation(
            "flatten_to_opaque_rgba8 expects equal-length rgba8 buffers",
        ));
    }

    let bg = [
        u16::from(bg_rgba[0]),
        u16::from(bg_rgba[1]),
        u16::from(bg_rgba[2]),
    ];

    for (d, s) in dst.chunks_exact_mut(4).zip(src.chunks_exact(4)) {
        let a = u16::from(s[3]);
        if a == 255 {
            d.copy_from_slice(s);
            continue;
        }

        let inv = 255 - a;
        for c in 0..3 {
            let fg = if src_is_premul {
                u16::from(s[c])
            } else {
                mul_div255(u16::from(s[c]), a)
            };
            d[c] = (fg + mul_div255(bg[c], inv)).min(255) as u8;
        }
        d[3] = 255;
    }

    Ok(())
}

fn mul_div255(x: u16, y: u16) -> u16 {
    ((u32::from(x) * u32::from(y) + 127) / 255) as u16
}

#[cfg(test)]
#[path = "../../tests/unit/encode/gif.rs"]
mod tests;

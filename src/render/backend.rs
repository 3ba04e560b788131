use crate::{chart::scene::ChartScene, foundation::error::BarRaceResult};

/// A rendered RGBA8 frame, row-major, `width * height * 4` bytes.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FrameRGBA {
    pub width: u32,
    pub height: u32,
    pub data: Vec<u8>,
    /// Whether `data` holds premultiplied alpha.
    pub premultiplied: bool,
}

impl FrameRGBA {
    /// Straight RGBA of the pixel at `(x, y)`, or `None` outside the frame.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = ((y as usize) * (self.width as usize) + (x as usize)) * 4;
        let px = self.data.get(i..i + 4)?;
        let a = px[3];
        if !self.premultiplied || a == 255 || a == 0 {
            return Some([px[0], px[1], px[2], a]);
        }
        let unpremul =
            |c: u8| ((u16::from(c) * 255 + u16::from(a) / 2) / u16::from(a)).min(255) as u8;
        Some([unpremul(px[0]), unpremul(px[1]), unpremul(px[2]), a])
    }
}

/// Rasterizes chart scenes into frames.
pub trait RenderBackend {
    fn render_scene(&mut self, scene: &ChartScene) -> BarRaceResult<FrameRGBA>;
}

#[cfg(test)]
#[path = "../../tests/unit/render/backend.rs"]
mod tests;

use std::path::Path;

use anyhow::Context as _;

use crate::{
    encode::gif::{ensure_parent_dir, flatten_to_opaque_rgba8},
    foundation::error::BarRaceResult,
    render::backend::FrameRGBA,
};

/// Save a single frame as an opaque PNG, flattening over `bg_rgba`.
pub fn write_png(frame: &FrameRGBA, path: &Path, bg_rgba: [u8; 4]) -> BarRaceResult<()> {
    let mut opaque = vec![0u8; frame.data.len()];
    flatten_to_opaque_rgba8(&mut opaque, &frame.data, frame.premultiplied, bg_rgba)?;

    ensure_parent_dir(path)?;
    image::save_buffer_with_format(
        path,
        &opaque,
        frame.width,
        frame.height,
        image::ColorType::Rgba8,
        image::ImageFormat::Png,
    )
    .with_context(|| format!("write png '{}'", path.display()))?;
    Ok(())
}

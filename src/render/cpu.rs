use std::{path::PathBuf, sync::Arc};

use crate::{
    chart::{scene::ChartScene, svg::scene_to_svg},
    foundation::error::{BarRaceError, BarRaceResult},
    render::backend::{FrameRGBA, RenderBackend},
};

/// Font sources for the CPU backend.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CpuBackendOpts {
    /// Load fonts installed on the host system.
    pub system_fonts: bool,
    /// Additional directories scanned for font files.
    pub font_dirs: Vec<PathBuf>,
}

impl Default for CpuBackendOpts {
    fn default() -> Self {
        Self {
            system_fonts: true,
            font_dirs: Vec::new(),
        }
    }
}

/// CPU rasterizer: scene -> SVG document -> `resvg` pixmap.
///
/// The font database is loaded once and shared by clones, so cloning a backend per worker
/// thread is cheap.
#[derive(Clone)]
pub struct CpuBackend {
    fontdb: Arc<usvg::fontdb::Database>,
    dpi: f32,
}

impl CpuBackend {
    pub fn new(opts: &CpuBackendOpts, dpi: f64) -> Self {
        let mut db = usvg::fontdb::Database::new();
        if opts.system_fonts {
            db.load_system_fonts();
        }
        for dir in &opts.font_dirs {
            db.load_fonts_dir(dir);
        }
        tracing::debug!(faces = db.len(), "font database loaded");
        Self {
            fontdb: Arc::new(db),
            dpi: dpi as f32,
        }
    }

    pub fn font_faces(&self) -> usize {
        self.fontdb.len()
    }

    fn parse(&self, svg: &str) -> BarRaceResult<usvg::Tree> {
        let mut opts = usvg::Options::default();
        opts.dpi = self.dpi;
        opts.fontdb = Arc::clone(&self.fontdb);
        usvg::Tree::from_str(svg, &opts)
            .map_err(|e| BarRaceError::render(format!("parse chart svg: {e}")))
    }
}

impl RenderBackend for CpuBackend {
    fn render_scene(&mut self, scene: &ChartScene) -> BarRaceResult<FrameRGBA> {
        let width = scene.canvas.width;
        let height = scene.canvas.height;

        let tree = self.parse(&scene_to_svg(scene))?;
        let mut pixmap = resvg::tiny_skia::Pixmap::new(width, height)
            .ok_or_else(|| BarRaceError::render("failed to allocate chart pixmap"))?;
        resvg::render(
            &tree,
            resvg::tiny_skia::Transform::identity(),
            &mut pixmap.as_mut(),
        );

        Ok(FrameRGBA {
            width,
            height,
            data: pixmap.take(),
            premultiplied: true,
        })
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/cpu.rs"]
mod tests;

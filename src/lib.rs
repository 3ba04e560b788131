//! barrace renders "bar chart race" animations from yearly sales tables.
//!
//! A run is a straight pipeline executed once:
//!
//! 1. **Load**: `Year,Car,Sales` CSV -> [`SalesTable`] (sorted by year, then sales descending)
//! 2. **Interpolate**: consecutive years -> [`Timeline`] of ranked [`InterpolatedFrame`]s
//! 3. **Compose**: frame -> [`ChartScene`] (backend-agnostic bar chart layout in pixels)
//! 4. **Render**: scene -> [`FrameRGBA`] via a [`RenderBackend`] (CPU: SVG + `resvg`)
//! 5. **Encode**: frames -> [`FrameSink`] (animated GIF on disk, or in memory)
//!
//! [`run_pipeline`] drives all stages from a [`PipelineConfig`].
//!
//! Design constraints:
//!
//! - **No unsafe**: `unsafe` is forbidden in this crate.
//! - **Deterministic**: ties in sales are ranked by car name; parallel rendering produces the
//!   same frames as sequential rendering.
//! - **Fixed scale**: the sales axis spans `[0, axis_headroom * max sales]` for every frame.
#![forbid(unsafe_code)]

mod chart;
mod data;
mod encode;
mod foundation;
mod interp;
mod pipeline;
mod render;

pub use chart::format::{format_thousands, nice_ticks};
pub use chart::scene::{
    BarSpec, ChartScene, FrameContext, TextAnchor, TextRun, Tick, compose_chart,
};
pub use chart::style::{ChartStyle, Palette};
pub use chart::svg::{escape_xml, scene_to_svg};
pub use data::record::{SalesRecord, load_sales_csv, read_sales_csv};
pub use data::table::{SalesTable, YearSnapshot, lookup_or_zero};
pub use encode::gif::{GifSink, GifSinkOpts, ensure_parent_dir};
pub use encode::png::write_png;
pub use encode::sink::{FrameSink, InMemorySink, LoopMode, SinkConfig};
pub use foundation::core::{Canvas, FrameIndex, Point, Rect, Rgb8, Year};
pub use foundation::error::{BarRaceError, BarRaceResult};
pub use interp::frames::{FrameEntry, InterpolatedFrame, interpolate_pair};
pub use interp::timeline::{Timeline, TimelineFrame, build_timeline, current_year};
pub use pipeline::config::{DEFAULT_INPUT, DEFAULT_OUTPUT, PipelineConfig, RenderThreading};
pub use pipeline::runner::{
    AnimationOpts, RenderStats, render_single_frame, render_timeline, run_pipeline,
};
pub use render::backend::{FrameRGBA, RenderBackend};
pub use render::cpu::{CpuBackend, CpuBackendOpts};

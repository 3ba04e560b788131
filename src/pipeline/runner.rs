use rayon::prelude::*;

use crate::{
    chart::{
        scene::{FrameContext, compose_chart},
        style::ChartStyle,
    },
    data::record::load_sales_csv,
    encode::{
        gif::{GifSink, GifSinkOpts},
        sink::{FrameSink, LoopMode, SinkConfig},
    },
    foundation::{
        core::FrameIndex,
        error::{BarRaceError, BarRaceResult},
    },
    interp::timeline::{Timeline, TimelineFrame, build_timeline},
    pipeline::config::{PipelineConfig, RenderThreading},
    render::{
        backend::{FrameRGBA, RenderBackend},
        cpu::CpuBackend,
    },
};

/// Summary of a finished run.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RenderStats {
    /// Distinct years in the input table.
    pub years: usize,
    /// Frames handed to the sink.
    pub frames_total: u64,
    /// Largest number of bars in any frame.
    pub max_bars: usize,
}

/// Sink-facing animation parameters of a range render.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AnimationOpts {
    pub frame_delay_ms: u32,
    pub loop_mode: LoopMode,
    pub threading: RenderThreading,
}

impl From<&PipelineConfig> for AnimationOpts {
    fn from(cfg: &PipelineConfig) -> Self {
        Self {
            frame_delay_ms: cfg.frame_delay_ms,
            loop_mode: cfg.loop_mode,
            threading: cfg.threading.clone(),
        }
    }
}

/// Load, interpolate, render and write the animation described by `cfg`.
#[tracing::instrument(
    skip(cfg),
    fields(input = %cfg.input.display(), output = %cfg.output.display())
)]
pub fn run_pipeline(cfg: &PipelineConfig) -> BarRaceResult<RenderStats> {
    cfg.validate()?;

    let table = load_sales_csv(&cfg.input)?;
    let timeline = build_timeline(&table, cfg.steps_per_year)?;
    let backend = CpuBackend::new(&cfg.fonts, cfg.style.dpi);

    let mut sink = GifSink::new(GifSinkOpts {
        out_path: cfg.output.clone(),
        overwrite: cfg.overwrite,
        bg_rgba: cfg.style.palette.background.to_rgba(),
        speed: cfg.gif_speed,
    });

    let mut stats = render_timeline(
        &timeline,
        table.max_sales(),
        &cfg.style,
        &AnimationOpts::from(cfg),
        &backend,
        &mut sink,
    )?;
    stats.years = table.years().len();

    tracing::info!(
        frames = stats.frames_total,
        years = stats.years,
        "animation written"
    );
    Ok(stats)
}

/// Render one timeline frame for `cfg` without writing an animation.
pub fn render_single_frame(cfg: &PipelineConfig, idx: FrameIndex) -> BarRaceResult<FrameRGBA> {
    cfg.validate()?;

    let table = load_sales_csv(&cfg.input)?;
    let timeline = build_timeline(&table, cfg.steps_per_year)?;
    let tf = timeline.get(idx).ok_or_else(|| {
        BarRaceError::validation(format!(
            "frame {} is out of range (timeline has {} frames)",
            idx.0,
            timeline.len_frames()
        ))
    })?;

    let axis_max = cfg.style.axis_limit(table.max_sales())?;
    let mut backend = CpuBackend::new(&cfg.fonts, cfg.style.dpi);
    render_one(
        &mut backend,
        tf,
        &frame_context(&timeline, idx, axis_max),
        &cfg.style,
    )
}

/// Render every frame of `timeline` into `sink` in timeline order.
///
/// The x axis is fixed at `style.axis_headroom * max_sales` for the whole range.
pub fn render_timeline<B>(
    timeline: &Timeline,
    max_sales: f64,
    style: &ChartStyle,
    opts: &AnimationOpts,
    backend: &B,
    sink: &mut dyn FrameSink,
) -> BarRaceResult<RenderStats>
where
    B: RenderBackend + Clone + Send + Sync,
{
    if timeline.is_empty() {
        return Err(BarRaceError::validation("timeline has no frames to render"));
    }
    let axis_max = style.axis_limit(max_sales)?;
    let canvas = style.canvas()?;

    sink.begin(SinkConfig {
        width: canvas.width,
        height: canvas.height,
        frame_delay_ms: opts.frame_delay_ms,
        loop_mode: opts.loop_mode,
        total_frames: timeline.len_frames(),
    })?;

    if opts.threading.parallel {
        render_parallel(timeline, axis_max, style, &opts.threading, backend, sink)?;
    } else {
        let mut backend = backend.clone();
        for (i, tf) in timeline.frames().iter().enumerate() {
            let idx = FrameIndex(i as u64);
            let ctx = frame_context(timeline, idx, axis_max);
            let frame = render_one(&mut backend, tf, &ctx, style)?;
            sink.push_frame(idx, &frame)?;
        }
    }

    sink.end()?;

    Ok(RenderStats {
        years: 0,
        frames_total: timeline.len_frames(),
        max_bars: timeline
            .frames()
            .iter()
            .map(|tf| tf.frame.len())
            .max()
            .unwrap_or(0),
    })
}

fn render_parallel<B>(
    timeline: &Timeline,
    axis_max: f64,
    style: &ChartStyle,
    threading: &RenderThreading,
    backend: &B,
    sink: &mut dyn FrameSink,
) -> BarRaceResult<()>
where
    B: RenderBackend + Clone + Send + Sync,
{
    let pool = build_thread_pool(threading.threads)?;
    let chunk_size = threading.chunk_size.max(1);

    for (c, chunk) in timeline.frames().chunks(chunk_size).enumerate() {
        let base = c * chunk_size;
        let rendered = pool.install(|| {
            chunk
                .par_iter()
                .enumerate()
                .map_init(
                    || backend.clone(),
                    |b, (j, tf)| {
                        let ctx = frame_context(timeline, FrameIndex((base + j) as u64), axis_max);
                        render_one(b, tf, &ctx, style)
                    },
                )
                .collect::<Vec<_>>()
        });
        tracing::debug!(chunk = c, frames = rendered.len(), "rendered chunk");

        for (j, frame) in rendered.into_iter().enumerate() {
            sink.push_frame(FrameIndex((base + j) as u64), &frame?)?;
        }
    }
    Ok(())
}

fn build_thread_pool(threads: Option<usize>) -> BarRaceResult<rayon::ThreadPool> {
    if threads == Some(0) {
        return Err(BarRaceError::validation(
            "render 'threads' must be >= 1 when set",
        ));
    }
    let mut builder = rayon::ThreadPoolBuilder::new();
    if let Some(n) = threads {
        builder = builder.num_threads(n);
    }
    builder
        .build()
        .map_err(|e| BarRaceError::render(format!("failed to build rayon thread pool: {e}")))
}

fn frame_context(timeline: &Timeline, idx: FrameIndex, axis_max: f64) -> FrameContext {
    FrameContext {
        index: idx,
        total_frames: timeline.len_frames(),
        first_year: timeline.first_year(),
        last_year: timeline.last_year(),
        axis_max,
    }
}

fn render_one<B: RenderBackend + ?Sized>(
    backend: &mut B,
    tf: &TimelineFrame,
    ctx: &FrameContext,
    style: &ChartStyle,
) -> BarRaceResult<FrameRGBA> {
    let scene = compose_chart(&tf.frame, ctx, style)?;
    backend.render_scene(&scene)
}

#[cfg(test)]
#[path = "../../tests/unit/pipeline/runner.rs"]
mod tests;

use crate::{
    chart::{
        format::{format_thousands, nice_ticks},
        style::ChartStyle,
    },
    foundation::{
        core::{Canvas, FrameIndex, Point, Rect, Rgb8, Year},
        error::{BarRaceError, BarRaceResult},
    },
    interp::frames::InterpolatedFrame,
};

const TARGET_TICKS: usize = 6;

/// Horizontal alignment of a text run relative to its anchor point.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TextAnchor {
    Start,
    Middle,
    End,
}

/// A single line of text positioned in canvas pixels.
///
/// `origin.y` is the text baseline. `rotate_deg` rotates around `origin`.
#[derive(Clone, Debug, PartialEq)]
pub struct TextRun {
    pub text: String,
    pub origin: Point,
    pub size_px: f64,
    pub anchor: TextAnchor,
    pub rotate_deg: f64,
}

impl TextRun {
    fn new(text: impl Into<String>, origin: Point, size_px: f64, anchor: TextAnchor) -> Self {
        Self {
            text: text.into(),
            origin,
            size_px,
            anchor,
            rotate_deg: 0.0,
        }
    }

    /// Baseline that visually centers the run on `center_y`.
    fn centered_baseline(center_y: f64, size_px: f64) -> f64 {
        center_y + size_px * 0.35
    }
}

/// One ranked bar with its labels.
#[derive(Clone, Debug, PartialEq)]
pub struct BarSpec {
    pub rank: usize,
    pub car: String,
    pub value: f64,
    pub rect: Rect,
    pub fill: Rgb8,
    pub name_label: TextRun,
    pub value_label: TextRun,
}

/// An x axis tick: the mark position and its label.
#[derive(Clone, Debug, PartialEq)]
pub struct Tick {
    pub value: f64,
    pub x: f64,
    pub label: TextRun,
}

/// Backend-agnostic description of one chart frame in canvas pixel space.
#[derive(Clone, Debug, PartialEq)]
pub struct ChartScene {
    pub canvas: Canvas,
    pub background: Rgb8,
    pub foreground: Rgb8,
    pub font_family: String,
    pub plot_area: Rect,
    pub title: TextRun,
    pub x_label: TextRun,
    pub y_label: TextRun,
    pub ticks: Vec<Tick>,
    pub bars: Vec<BarSpec>,
}

/// Where a frame sits in the animation and the fixed axis scale shared by all frames.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FrameContext {
    pub index: FrameIndex,
    pub total_frames: u64,
    pub first_year: Year,
    pub last_year: Year,
    /// Upper bound of the x axis; identical for every frame of an animation.
    pub axis_max: f64,
}

impl FrameContext {
    pub fn label_year(&self) -> Year {
        crate::interp::timeline::current_year(
            self.first_year,
            self.last_year,
            self.index,
            self.total_frames,
        )
    }
}

/// Lay out one ranked frame as a horizontal bar chart.
///
/// Rank 0 is drawn at the top. Bar length is `value / axis_max` of the plot width, so the
/// scale never shifts between frames.
pub fn compose_chart(
    frame: &InterpolatedFrame,
    ctx: &FrameContext,
    style: &ChartStyle,
) -> BarRaceResult<ChartScene> {
    if !(ctx.axis_max.is_finite() && ctx.axis_max > 0.0) {
        return Err(BarRaceError::render(format!(
            "axis maximum must be positive, got {}",
            ctx.axis_max
        )));
    }

    let canvas = style.canvas()?;
    let w = f64::from(canvas.width);
    let h = f64::from(canvas.height);

    let pad = 0.1 * style.dpi;
    let title_px = style.pt_to_px(style.title_pt);
    let axis_px = style.pt_to_px(style.axis_label_pt);
    let tick_px = style.pt_to_px(style.tick_pt);
    let value_px = style.pt_to_px(style.value_label_pt);

    // Car names sit left of the plot; estimate their width from glyph count.
    let longest_name = frame
        .entries()
        .iter()
        .map(|e| e.car.chars().count())
        .max()
        .unwrap_or(0);
    let name_col = (longest_name as f64 * tick_px * 0.6 + tick_px).min(w * 0.35);

    let left = pad + axis_px * 1.8 + name_col;
    let top = pad + title_px * 2.0;
    let right = w - pad * 2.0;
    let bottom = h - pad - axis_px * 1.8 - tick_px * 1.8;
    if right <= left || bottom <= top {
        return Err(BarRaceError::render(format!(
            "canvas {}x{} is too small for the chart margins",
            canvas.width, canvas.height
        )));
    }
    let plot = Rect::new(left, top, right, bottom);
    let center_x = (plot.x0 + plot.x1) / 2.0;
    let center_y = (plot.y0 + plot.y1) / 2.0;

    let title = TextRun::new(
        format!("{} {}", style.title_prefix, ctx.label_year()),
        Point::new(center_x, pad + title_px),
        title_px,
        TextAnchor::Middle,
    );
    let x_label = TextRun::new(
        style.x_label.clone(),
        Point::new(center_x, h - pad - axis_px * 0.3),
        axis_px,
        TextAnchor::Middle,
    );
    let mut y_label = TextRun::new(
        style.y_label.clone(),
        Point::new(pad + axis_px, center_y),
        axis_px,
        TextAnchor::Middle,
    );
    y_label.rotate_deg = -90.0;

    let x_of = |value: f64| plot.x0 + (value / ctx.axis_max).clamp(0.0, 1.0) * plot.width();

    let ticks = nice_ticks(ctx.axis_max, TARGET_TICKS)
        .into_iter()
        .map(|value| {
            let x = x_of(value);
            Tick {
                value,
                x,
                label: TextRun::new(
                    format_thousands(value),
                    Point::new(x, plot.y1 + tick_px * 1.4),
                    tick_px,
                    TextAnchor::Middle,
                ),
            }
        })
        .collect();

    let slot = plot.height() / frame.len().max(1) as f64;
    let thickness = slot * style.bar_fill;
    let bars = frame
        .entries()
        .iter()
        .enumerate()
        .map(|(rank, entry)| {
            let cy = plot.y0 + slot * (rank as f64 + 0.5);
            let rect = Rect::new(
                plot.x0,
                cy - thickness / 2.0,
                x_of(entry.sales),
                cy + thickness / 2.0,
            );
            BarSpec {
                rank,
                car: entry.car.clone(),
                value: entry.sales,
                rect,
                fill: style.palette.bar_color(rank),
                name_label: TextRun::new(
                    entry.car.clone(),
                    Point::new(
                        plot.x0 - tick_px * 0.5,
                        TextRun::centered_baseline(cy, tick_px),
                    ),
                    tick_px,
                    TextAnchor::End,
                ),
                value_label: TextRun::new(
                    format_thousands(entry.sales),
                    Point::new(
                        rect.x1 + value_px * 0.3,
                        TextRun::centered_baseline(cy, value_px),
                    ),
                    value_px,
                    TextAnchor::Start,
                ),
            }
        })
        .collect();

    Ok(ChartScene {
        canvas,
        background: style.palette.background,
        foreground: style.palette.foreground,
        font_family: style.font_family.clone(),
        plot_area: plot,
        title,
        x_label,
        y_label,
        ticks,
        bars,
    })
}

#[cfg(test)]
#[path = "../../tests/unit/chart/scene.rs"]
mod tests;

use crate::{
    data::table::SalesTable,
    foundation::{
        core::{FrameIndex, Year},
        error::{BarRaceError, BarRaceResult},
    },
    interp::frames::{InterpolatedFrame, interpolate_pair},
};

/// One frame of the animation together with where it came from.
#[derive(Clone, Debug, PartialEq)]
pub struct TimelineFrame {
    /// Bounding years of the interpolation pair.
    pub span: (Year, Year),
    /// Step within the pair, `0..steps_per_year`.
    pub step: u32,
    pub frame: InterpolatedFrame,
}

/// Every interpolated frame of the animation in chronological order.
#[derive(Clone, Debug, PartialEq)]
pub struct Timeline {
    frames: Vec<TimelineFrame>,
    first_year: Year,
    last_year: Year,
    steps_per_year: u32,
}

impl Timeline {
    pub fn frames(&self) -> &[TimelineFrame] {
        &self.frames
    }

    pub fn get(&self, idx: FrameIndex) -> Option<&TimelineFrame> {
        usize::try_from(idx.0).ok().and_then(|i| self.frames.get(i))
    }

    pub fn len_frames(&self) -> u64 {
        self.frames.len() as u64
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    pub fn first_year(&self) -> Year {
        self.first_year
    }

    pub fn last_year(&self) -> Year {
        self.last_year
    }

    pub fn steps_per_year(&self) -> u32 {
        self.steps_per_year
    }

    /// Year shown in the chart title for `idx`.
    pub fn label_year(&self, idx: FrameIndex) -> Year {
        current_year(self.first_year, self.last_year, idx, self.len_frames())
    }
}

/// Interpolate every consecutive year pair of `table` and concatenate the results.
///
/// Needs at least two distinct years; `(years - 1) * steps_per_year` frames are produced.
#[tracing::instrument(skip(table), fields(rows = table.len()))]
pub fn build_timeline(table: &SalesTable, steps_per_year: u32) -> BarRaceResult<Timeline> {
    if steps_per_year == 0 {
        return Err(BarRaceError::validation("steps per year must be >= 1"));
    }
    let years = table.years();
    let (Some(&first_year), Some(&last_year)) = (years.first(), years.last()) else {
        return Err(BarRaceError::validation("sales table has no records"));
    };
    if years.len() < 2 {
        return Err(BarRaceError::validation(format!(
            "need at least two distinct years to animate, got only {first_year}"
        )));
    }

    let mut frames = Vec::with_capacity((years.len() - 1) * steps_per_year as usize);
    let mut start = table.snapshot(first_year);
    for &next_year in &years[1..] {
        let end = table.snapshot(next_year);
        let span = (start.year(), end.year());
        let pair = interpolate_pair(&start, &end, steps_per_year)?;
        tracing::debug!(
            from = span.0,
            to = span.1,
            cars = pair.first().map_or(0, InterpolatedFrame::len),
            "interpolated year pair"
        );
        frames.extend(
            (0u32..)
                .zip(pair)
                .map(|(step, frame)| TimelineFrame { span, step, frame }),
        );
        start = end;
    }

    Ok(Timeline {
        frames,
        first_year,
        last_year,
        steps_per_year,
    })
}

/// Continuous year counter `first + (last - first) * index / total`, truncated.
///
/// It only moves with the frame position, so intermediate frames get a plausible year even
/// though only the real years carry data.
pub fn current_year(first: Year, last: Year, idx: FrameIndex, total: u64) -> Year {
    if total == 0 {
        return first;
    }
    let t = idx.0 as f64 / total as f64;
    let span = f64::from(last) - f64::from(first);
    (f64::from(first) + span * t) as Year
}

#[cfg(test)]
#[path = "../../tests/unit/interp/timeline.rs"]
mod tests;

use std::{cmp::Ordering, collections::BTreeSet};

use crate::{
    data::table::{YearSnapshot, lookup_or_zero},
    foundation::error::{BarRaceError, BarRaceResult},
};

/// A single (car, sales) position in a ranking frame.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct FrameEntry {
    pub car: String,
    pub sales: f64,
}

/// One ranking state, ordered by sales descending (ties by car name ascending).
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct InterpolatedFrame {
    entries: Vec<FrameEntry>,
}

impl InterpolatedFrame {
    /// Build a frame from entries in any order; they are ranked on construction.
    pub fn ranked(mut entries: Vec<FrameEntry>) -> Self {
        entries.sort_by(rank_order);
        Self { entries }
    }

    /// Entries in rendering order (rank 0 first).
    pub fn entries(&self) -> &[FrameEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, car: &str) -> Option<f64> {
        self.entries.iter().find(|e| e.car == car).map(|e| e.sales)
    }
}

fn rank_order(a: &FrameEntry, b: &FrameEntry) -> Ordering {
    b.sales
        .total_cmp(&a.sales)
        .then_with(|| a.car.cmp(&b.car))
}

/// Produce `steps` frames between two yearly snapshots.
///
/// Frame `i` sits at fraction `i / steps` of the way from `start` to `end`, so the end
/// snapshot itself is never produced here (it is frame 0 of the following pair). Every
/// frame holds the union of both snapshots' cars; a car missing on one side counts as
/// zero sales there.
pub fn interpolate_pair(
    start: &YearSnapshot,
    end: &YearSnapshot,
    steps: u32,
) -> BarRaceResult<Vec<InterpolatedFrame>> {
    if steps == 0 {
        return Err(BarRaceError::validation("steps per year must be >= 1"));
    }

    let cars: BTreeSet<&str> = start.cars().chain(end.cars()).collect();
    let endpoints: Vec<(&str, f64, f64)> = cars
        .into_iter()
        .map(|car| (car, lookup_or_zero(start, car), lookup_or_zero(end, car)))
        .collect();

    let s = f64::from(steps);
    let frames = (0..steps)
        .map(|i| {
            let i = f64::from(i);
            let entries = endpoints
                .iter()
                .map(|&(car, from, to)| FrameEntry {
                    car: car.to_string(),
                    sales: from + (to - from) * i / s,
                })
                .collect();
            InterpolatedFrame::ranked(entries)
        })
        .collect();
    Ok(frames)
}

#[cfg(test)]
#[path = "../../tests/unit/interp/frames.rs"]
mod tests;

use crate::foundation::{
    core::{Canvas, Rgb8},
    error::{BarRaceError, BarRaceResult},
};

/// Bar and text colors.
///
/// The first three ranks use the podium colors; every other bar uses `bar`.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Palette {
    pub gold: Rgb8,
    pub silver: Rgb8,
    pub bronze: Rgb8,
    pub bar: Rgb8,
    pub background: Rgb8,
    pub foreground: Rgb8,
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            gold: Rgb8::new(0xFF, 0xD7, 0x00),
            silver: Rgb8::new(0xC0, 0xC0, 0xC0),
            bronze: Rgb8::new(0xD2, 0x69, 0x1E),
            bar: Rgb8::new(0x87, 0xCE, 0xEB),
            background: Rgb8::WHITE,
            foreground: Rgb8::BLACK,
        }
    }
}

impl Palette {
    /// Fill color for the bar at `rank` (0 = highest sales).
    pub fn bar_color(&self, rank: usize) -> Rgb8 {
        match rank {
            0 => self.gold,
            1 => self.silver,
            2 => self.bronze,
            _ => self.bar,
        }
    }
}

/// Visual parameters of a chart frame. Sizes in points are converted with `dpi`.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ChartStyle {
    pub width_in: f64,
    pub height_in: f64,
    pub dpi: f64,

    /// Title text; the current year is appended after a space.
    pub title_prefix: String,
    pub x_label: String,
    pub y_label: String,
    pub font_family: String,

    pub title_pt: f64,
    pub axis_label_pt: f64,
    pub value_label_pt: f64,
    pub tick_pt: f64,

    /// X axis upper bound as a multiple of the global maximum sales.
    pub axis_headroom: f64,
    /// Bar thickness as a fraction of one rank slot.
    pub bar_fill: f64,

    pub palette: Palette,
}

impl Default for ChartStyle {
    fn default() -> Self {
        Self {
            width_in: 15.0,
            height_in: 8.0,
            dpi: 100.0,
            title_prefix: "Car Sales Ranking - Year".to_string(),
            x_label: "Sales".to_string(),
            y_label: "Car Model".to_string(),
            font_family: "DejaVu Sans, Arial, Helvetica, sans-serif".to_string(),
            title_pt: 16.0,
            axis_label_pt: 12.0,
            value_label_pt: 10.0,
            tick_pt: 10.0,
            axis_headroom: 1.1,
            bar_fill: 0.8,
            palette: Palette::default(),
        }
    }
}

impl ChartStyle {
    pub fn validate(&self) -> BarRaceResult<()> {
        if !(self.dpi.is_finite() && self.dpi > 0.0) {
            return Err(BarRaceError::validation("chart dpi must be > 0"));
        }
        self.canvas()?;

        for (name, pt) in [
            ("title_pt", self.title_pt),
            ("axis_label_pt", self.axis_label_pt),
            ("value_label_pt", self.value_label_pt),
            ("tick_pt", self.tick_pt),
        ] {
            if !(pt.is_finite() && pt > 0.0) {
                return Err(BarRaceError::validation(format!(
                    "chart {name} must be > 0, got {pt}"
                )));
            }
        }
        if !(self.axis_headroom.is_finite() && self.axis_headroom >= 1.0) {
            return Err(BarRaceError::validation(
                "chart axis_headroom must be >= 1.0",
            ));
        }
        if !(self.bar_fill > 0.0 && self.bar_fill <= 1.0) {
            return Err(BarRaceError::validation(
                "chart bar_fill must be in (0, 1]",
            ));
        }
        Ok(())
    }

    pub fn canvas(&self) -> BarRaceResult<Canvas> {
        Canvas::from_inches(self.width_in, self.height_in, self.dpi)
    }

    pub fn pt_to_px(&self, pt: f64) -> f64 {
        pt * self.dpi / 72.0
    }

    /// Fixed x axis upper bound for a dataset whose largest value is `max_sales`.
    pub fn axis_limit(&self, max_sales: f64) -> BarRaceResult<f64> {
        if !(max_sales.is_finite() && max_sales > 0.0) {
            return Err(BarRaceError::validation(format!(
                "cannot scale the sales axis: maximum sales is {max_sales}"
            )));
        }
        Ok(max_sales * self.axis_headroom)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/chart/style.rs"]
mod tests;

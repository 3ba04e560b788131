use std::collections::{BTreeMap, HashSet};

use crate::{
    data::record::SalesRecord,
    foundation::{
        core::Year,
        error::{BarRaceError, BarRaceResult},
    },
};

/// Validated sales records, sorted by year ascending then sales descending.
///
/// Ties on `(year, sales)` are ordered by car name so that every derived view is
/// deterministic.
#[derive(Clone, Debug, PartialEq)]
pub struct SalesTable {
    records: Vec<SalesRecord>,
    years: Vec<Year>,
}

impl SalesTable {
    pub fn new(records: Vec<SalesRecord>) -> BarRaceResult<Self> {
        let mut records = records;
        let mut seen = HashSet::<(Year, String)>::with_capacity(records.len());

        for (i, r) in records.iter_mut().enumerate() {
            let row = i + 1;
            r.car = r.car.trim().to_string();
            if r.car.is_empty() {
                return Err(BarRaceError::data(format!("row {row}: car name is empty")));
            }
            if !r.sales.is_finite() || r.sales < 0.0 {
                return Err(BarRaceError::data(format!(
                    "row {row}: sales for '{}' in {} must be a non-negative number, got {}",
                    r.car, r.year, r.sales
                )));
            }
            if !seen.insert((r.year, r.car.clone())) {
                return Err(BarRaceError::data(format!(
                    "row {row}: duplicate record for '{}' in {}",
                    r.car, r.year
                )));
            }
        }

        records.sort_by(|a, b| {
            a.year
                .cmp(&b.year)
                .then_with(|| b.sales.total_cmp(&a.sales))
                .then_with(|| a.car.cmp(&b.car))
        });

        let mut years: Vec<Year> = records.iter().map(|r| r.year).collect();
        years.dedup();

        Ok(Self { records, years })
    }

    pub fn records(&self) -> &[SalesRecord] {
        &self.records
    }

    /// Distinct years, ascending.
    pub fn years(&self) -> &[Year] {
        &self.years
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Largest sales value across every year; `0.0` for an empty table.
    pub fn max_sales(&self) -> f64 {
        self.records
            .iter()
            .map(|r| r.sales)
            .fold(0.0_f64, f64::max)
    }

    /// Sales by car for one year. Unknown years produce an empty snapshot.
    pub fn snapshot(&self, year: Year) -> YearSnapshot {
        let start = self.records.partition_point(|r| r.year < year);
        let end = self.records.partition_point(|r| r.year <= year);
        let sales = self.records[start..end]
            .iter()
            .map(|r| (r.car.clone(), r.sales))
            .collect();
        YearSnapshot { year, sales }
    }
}

/// The sales-by-car mapping for a single literal year.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct YearSnapshot {
    year: Year,
    sales: BTreeMap<String, f64>,
}

impl YearSnapshot {
    pub fn from_pairs<I, S>(year: Year, pairs: I) -> Self
    where
        I: IntoIterator<Item = (S, f64)>,
        S: Into<String>,
    {
        Self {
            year,
            sales: pairs.into_iter().map(|(c, s)| (c.into(), s)).collect(),
        }
    }

    pub fn year(&self) -> Year {
        self.year
    }

    pub fn get(&self, car: &str) -> Option<f64> {
        self.sales.get(car).copied()
    }

    /// Car identifiers in lexicographic order.
    pub fn cars(&self) -> impl Iterator<Item = &str> + '_ {
        self.sales.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.sales.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sales.is_empty()
    }
}

/// Sales of `car` in `snapshot`, or `0.0` when the car has no record that year.
///
/// A car that enters or leaves the ranking between two years ramps to or from zero
/// instead of being an error.
pub fn lookup_or_zero(snapshot: &YearSnapshot, car: &str) -> f64 {
    snapshot.get(car).unwrap_or(0.0)
}

#[cfg(test)]
#[path = "../../tests/unit/data/table.rs"]
mod tests;

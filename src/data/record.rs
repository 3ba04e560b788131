use std::{io::Read, path::Path};

use anyhow::Context as _;

use crate::{
    data::table::SalesTable,
    foundation::{
        core::Year,
        error::{BarRaceError, BarRaceResult},
    },
};

/// One source row: sales of a single car model in a single year.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct SalesRecord {
    #[serde(rename = "Year")]
    pub year: Year,
    #[serde(rename = "Car")]
    pub car: String,
    #[serde(rename = "Sales")]
    pub sales: f64,
}

impl SalesRecord {
    pub fn new(year: Year, car: impl Into<String>, sales: f64) -> Self {
        Self {
            year,
            car: car.into(),
            sales,
        }
    }
}

/// Read `Year,Car,Sales` rows from CSV text.
///
/// Rows are returned in file order; ordering and consistency checks happen in
/// [`SalesTable::new`]. Field and header whitespace is trimmed.
pub fn read_sales_csv<R: Read>(reader: R) -> BarRaceResult<Vec<SalesRecord>> {
    let mut rdr = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut out = Vec::new();
    for (i, row) in rdr.deserialize::<SalesRecord>().enumerate() {
        let record =
            row.map_err(|e| BarRaceError::data(format!("row {}: malformed record: {e}", i + 1)))?;
        out.push(record);
    }
    Ok(out)
}

/// Load and validate a sales table from a CSV file on disk.
#[tracing::instrument]
pub fn load_sales_csv(path: &Path) -> BarRaceResult<SalesTable> {
    let file = std::fs::File::open(path)
        .with_context(|| format!("open sales csv '{}'", path.display()))?;
    let records = read_sales_csv(std::io::BufReader::new(file)).map_err(|e| match e {
        BarRaceError::Data(msg) => BarRaceError::data(format!("{}: {msg}", path.display())),
        other => other,
    })?;
    let table = SalesTable::new(records)?;
    tracing::debug!(
        rows = table.len(),
        years = table.years().len(),
        "loaded sales table"
    );
    Ok(table)
}

#[cfg(test)]
#[path = "../../tests/unit/data/record.rs"]
mod tests;

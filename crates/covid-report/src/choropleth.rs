//! World map layers keyed on `iso_code`.

use covid_model::{DatasetTable, Field};
use serde::Serialize;

use crate::error::Result;

/// Which column a map colors by, and the value range of its color scale.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ChoroplethSpec {
    pub title: &'static str,
    pub field: Field,
    pub range: (f64, f64),
}

impl ChoroplethSpec {
    pub const CASES_PER_MILLION: Self = Self {
        title: "Global COVID-19 Cases per Million People",
        field: Field::TotalCasesPerMillion,
        range: (0.0, 200_000.0),
    };

    pub const VACCINATED_PER_HUNDRED: Self = Self {
        title: "Global COVID-19 Vaccinations per 100 People",
        field: Field::PeopleVaccinatedPerHundred,
        range: (0.0, 100.0),
    };

    /// Both layers the tracker renders.
    pub const ALL: [Self; 2] = [Self::CASES_PER_MILLION, Self::VACCINATED_PER_HUNDRED];
}

/// One region of the map.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChoroplethCell {
    pub iso_code: String,
    pub location: Option<String>,
    pub value: Option<f64>,
    /// Position of `value` on the color scale, `0.0..=1.0`.
    pub scaled: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChoroplethLayer {
    pub title: String,
    pub column: String,
    pub range: (f64, f64),
    pub cells: Vec<ChoroplethCell>,
}

/// Maps `value` onto `range`, clamped to `0.0..=1.0`.
///
/// An empty or inverted range maps everything to `0.0`.
pub fn normalize(value: f64, range: (f64, f64)) -> f64 {
    let (min, max) = range;
    if max <= min {
        return 0.0;
    }
    ((value - min) / (max - min)).clamp(0.0, 1.0)
}

/// Builds one map layer from every row that carries an `iso_code`.
pub fn choropleth_layer(table: &DatasetTable, spec: &ChoroplethSpec) -> Result<ChoroplethLayer> {
    let column = spec.field.name();
    table.require_numeric(&[column], "choropleth_layer")?;
    table.require_columns(&[Field::IsoCode, Field::Location], "choropleth_layer")?;

    let iso_codes = table.string_values(Field::IsoCode.name())?;
    let locations = table.string_values(Field::Location.name())?;
    let values = table.f64_values(column)?;

    let cells = iso_codes
        .into_iter()
        .zip(locations)
        .zip(values)
        .filter_map(|((iso_code, location), value)| {
            Some(ChoroplethCell {
                iso_code: iso_code?,
                location,
                value,
                scaled: value.map(|v| normalize(v, spec.range)),
            })
        })
        .collect();

    Ok(ChoroplethLayer {
        title: spec.title.to_string(),
        column: column.to_string(),
        range: spec.range,
        cells,
    })
}

//! Column vocabulary of the daily per-country dataset.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{DataError, Result};

/// Suffix appended to a field name for its rolling-mean column.
const SMOOTHED_SUFFIX: &str = "_smoothed";

/// A named column of the dataset.
///
/// Raw fields come straight from the source file; `DeathRate` and
/// `VaccinationRate` are added by metric derivation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Field {
    Location,
    Date,
    IsoCode,
    TotalCases,
    TotalDeaths,
    NewCases,
    TotalVaccinations,
    PeopleVaccinated,
    Population,
    TotalCasesPerMillion,
    PeopleVaccinatedPerHundred,
    DeathRate,
    VaccinationRate,
}

impl Field {
    /// Every known field, raw columns first.
    pub const ALL: [Field; 13] = [
        Field::Location,
        Field::Date,
        Field::IsoCode,
        Field::TotalCases,
        Field::TotalDeaths,
        Field::NewCases,
        Field::TotalVaccinations,
        Field::PeopleVaccinated,
        Field::Population,
        Field::TotalCasesPerMillion,
        Field::PeopleVaccinatedPerHundred,
        Field::DeathRate,
        Field::VaccinationRate,
    ];

    /// Columns a source file must provide.
    pub const REQUIRED_RAW: [Field; 11] = [
        Field::Date,
        Field::Location,
        Field::IsoCode,
        Field::TotalCases,
        Field::TotalDeaths,
        Field::NewCases,
        Field::TotalVaccinations,
        Field::PeopleVaccinated,
        Field::Population,
        Field::TotalCasesPerMillion,
        Field::PeopleVaccinatedPerHundred,
    ];

    /// Cumulative series the tracker forward-fills by default.
    pub const DEFAULT_FILL: [Field; 4] = [
        Field::TotalCases,
        Field::TotalDeaths,
        Field::TotalVaccinations,
        Field::PeopleVaccinated,
    ];

    /// Column name as it appears in the source file and output tables.
    pub const fn name(self) -> &'static str {
        match self {
            Field::Location => "location",
            Field::Date => "date",
            Field::IsoCode => "iso_code",
            Field::TotalCases => "total_cases",
            Field::TotalDeaths => "total_deaths",
            Field::NewCases => "new_cases",
            Field::TotalVaccinations => "total_vaccinations",
            Field::PeopleVaccinated => "people_vaccinated",
            Field::Population => "population",
            Field::TotalCasesPerMillion => "total_cases_per_million",
            Field::PeopleVaccinatedPerHundred => "people_vaccinated_per_hundred",
            Field::DeathRate => "death_rate",
            Field::VaccinationRate => "vaccination_rate",
        }
    }

    /// Whether the column holds text rather than `Float64` values.
    pub const fn is_text(self) -> bool {
        matches!(self, Field::Location | Field::Date | Field::IsoCode)
    }

    pub const fn is_numeric(self) -> bool {
        !self.is_text()
    }

    /// Whether the column is computed by the pipeline rather than loaded.
    pub const fn is_derived(self) -> bool {
        matches!(self, Field::DeathRate | Field::VaccinationRate)
    }

    /// Looks up a field by column name (case-insensitive, surrounding
    /// whitespace ignored).
    pub fn parse(name: &str) -> Result<Self> {
        let wanted = name.trim();
        Field::ALL
            .into_iter()
            .find(|field| field.name().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| DataError::UnknownField(wanted.to_string()))
    }

    /// Name of the rolling-mean column derived from this field.
    pub fn smoothed_column(self) -> String {
        smoothed_column_name(self.name())
    }
}

/// Name of the rolling-mean column for an arbitrary source column.
pub fn smoothed_column_name(column: &str) -> String {
    format!("{column}{SMOOTHED_SUFFIX}")
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl AsRef<str> for Field {
    fn as_ref(&self) -> &str {
        self.name()
    }
}

impl FromStr for Field {
    type Err = DataError;

    fn from_str(s: &str) -> Result<Self> {
        Field::parse(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_names_match_serde() {
        for field in Field::ALL {
            let json = serde_json::to_string(&field).unwrap();
            assert_eq!(json, format!("\"{}\"", field.name()));
        }
    }

    #[test]
    fn test_parse_is_case_insensitive() {
        assert_eq!(Field::parse("NEW_CASES").unwrap(), Field::NewCases);
        assert_eq!(" iso_code ".parse::<Field>().unwrap(), Field::IsoCode);
        assert!(matches!(
            Field::parse("hospital_beds"),
            Err(DataError::UnknownField(name)) if name == "hospital_beds"
        ));
    }

    #[test]
    fn test_smoothed_column() {
        assert_eq!(Field::NewCases.smoothed_column(), "new_cases_smoothed");
    }

    #[test]
    fn test_required_raw_excludes_derived() {
        assert!(Field::REQUIRED_RAW.iter().all(|field| !field.is_derived()));
        assert_eq!(
            Field::ALL.iter().filter(|field| field.is_derived()).count(),
            Field::ALL.len() - Field::REQUIRED_RAW.len()
        );
    }
}

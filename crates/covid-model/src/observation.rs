//! Typed row views over a [`DatasetTable`](crate::DatasetTable).

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One daily observation for one country.
///
/// Optional fields are `None` when the source carries no value, which is
/// distinct from a recorded zero.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    /// Country identifier (the `location` column).
    pub country: String,
    pub date: NaiveDate,
    /// ISO 3166 alpha-3 code, or an aggregate code such as `OWID_WRL`.
    /// Empty when the source has none.
    pub iso_code: String,
    pub total_cases: Option<f64>,
    pub total_deaths: Option<f64>,
    pub new_cases: Option<f64>,
    pub total_vaccinations: Option<f64>,
    pub people_vaccinated: Option<f64>,
    pub population: Option<f64>,
    pub total_cases_per_million: Option<f64>,
    pub people_vaccinated_per_hundred: Option<f64>,
}

impl Observation {
    /// Creates an observation with every optional field absent.
    pub fn new(country: impl Into<String>, date: NaiveDate) -> Self {
        Self {
            country: country.into(),
            date,
            iso_code: String::new(),
            total_cases: None,
            total_deaths: None,
            new_cases: None,
            total_vaccinations: None,
            people_vaccinated: None,
            population: None,
            total_cases_per_million: None,
            people_vaccinated_per_hundred: None,
        }
    }

    #[must_use]
    pub fn with_iso_code(mut self, iso_code: impl Into<String>) -> Self {
        self.iso_code = iso_code.into();
        self
    }

    #[must_use]
    pub fn with_cases(mut self, total_cases: Option<f64>, total_deaths: Option<f64>) -> Self {
        self.total_cases = total_cases;
        self.total_deaths = total_deaths;
        self
    }

    #[must_use]
    pub fn with_new_cases(mut self, new_cases: Option<f64>) -> Self {
        self.new_cases = new_cases;
        self
    }

    #[must_use]
    pub fn with_vaccinations(
        mut self,
        total_vaccinations: Option<f64>,
        people_vaccinated: Option<f64>,
    ) -> Self {
        self.total_vaccinations = total_vaccinations;
        self.people_vaccinated = people_vaccinated;
        self
    }

    #[must_use]
    pub fn with_population(mut self, population: Option<f64>) -> Self {
        self.population = population;
        self
    }
}

/// Per-row values computed by the pipeline.
///
/// `None` means "could not be computed", never zero.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct DerivedMetrics {
    pub death_rate: Option<f64>,
    pub vaccination_rate: Option<f64>,
    pub new_cases_smoothed: Option<f64>,
}

//! Derived per-row ratios.

use covid_model::{DatasetTable, Field, Result};
use tracing::{debug, warn};

use crate::stage::Stage;

/// Divides `numerator` by `denominator`, or `None` when the result cannot be
/// computed: either operand absent or the denominator zero.
///
/// Values are not clamped, so a ratio above one is returned as is.
pub fn ratio(numerator: Option<f64>, denominator: Option<f64>) -> Option<f64> {
    match (numerator, denominator) {
        (Some(n), Some(d)) if d != 0.0 => Some(n / d).filter(|value| value.is_finite()),
        _ => None,
    }
}

/// Adds `death_rate = total_deaths / total_cases` and
/// `vaccination_rate = people_vaccinated / population`.
///
/// Undefined ratios are stored as absent cells. Rates above one are kept and
/// reported in a warning as a data-quality signal.
pub fn derive_metrics(table: &DatasetTable) -> Result<DatasetTable> {
    let context = Stage::Derive.name();
    table.require_numeric(
        &[
            Field::TotalDeaths,
            Field::TotalCases,
            Field::PeopleVaccinated,
            Field::Population,
        ],
        context,
    )?;

    let mut result = table.clone();
    for (target, numerator, denominator) in [
        (Field::DeathRate, Field::TotalDeaths, Field::TotalCases),
        (
            Field::VaccinationRate,
            Field::PeopleVaccinated,
            Field::Population,
        ),
    ] {
        let rates: Vec<Option<f64>> = table
            .f64_values(numerator.name())?
            .into_iter()
            .zip(table.f64_values(denominator.name())?)
            .map(|(n, d)| ratio(n, d))
            .collect();

        let defined = rates.iter().flatten().count();
        let above_one = rates.iter().flatten().filter(|rate| **rate > 1.0).count();
        if above_one > 0 {
            warn!(column = target.name(), rows = above_one, "ratio above 1 kept as reported");
        }
        debug!(
            column = target.name(),
            defined,
            undefined = rates.len() - defined,
            "ratio derived"
        );
        result = result.with_f64_column(target.name(), rates)?;
    }
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use covid_model::{DataError, Observation};

    #[test]
    fn test_ratio_policy() {
        assert_eq!(ratio(Some(5.0), Some(100.0)), Some(0.05));
        assert_eq!(ratio(Some(0.0), Some(100.0)), Some(0.0));
        assert_eq!(ratio(Some(5.0), Some(0.0)), None);
        assert_eq!(ratio(Some(0.0), Some(0.0)), None);
        assert_eq!(ratio(None, Some(100.0)), None);
        assert_eq!(ratio(Some(5.0), None), None);
        assert_eq!(ratio(Some(150.0), Some(100.0)), Some(1.5));
    }

    #[test]
    fn test_derive_adds_both_rates() {
        let day = NaiveDate::from_ymd_opt(2021, 6, 1).unwrap();
        let table = DatasetTable::from_observations(&[
            Observation::new("Kenya", day)
                .with_cases(Some(200.0), Some(4.0))
                .with_vaccinations(None, Some(50.0))
                .with_population(Some(1000.0)),
            Observation::new("Kenya", day)
                .with_cases(Some(0.0), Some(0.0))
                .with_population(Some(1000.0)),
        ])
        .unwrap();

        let derived = derive_metrics(&table).unwrap();

        assert_eq!(
            derived.f64_values("death_rate").unwrap(),
            vec![Some(0.02), None]
        );
        assert_eq!(
            derived.f64_values("vaccination_rate").unwrap(),
            vec![Some(0.05), None]
        );
        assert!(!table.has_column("death_rate"));
    }

    #[test]
    fn test_missing_population_is_fatal() {
        let table = DatasetTable::from_observations(&[]).unwrap();
        let data = table.into_inner().drop("population").unwrap();
        let err = derive_metrics(&DatasetTable::new(data)).unwrap_err();
        assert!(matches!(
            err,
            DataError::MissingField { column, context }
                if column == "population" && context == "derive_metrics"
        ));
    }

    #[test]
    fn test_empty_table_is_valid() {
        let table = DatasetTable::from_observations(&[]).unwrap();
        let derived = derive_metrics(&table).unwrap();
        assert!(derived.is_empty());
        assert!(derived.has_column("vaccination_rate"));
    }
}

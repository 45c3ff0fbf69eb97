//! Property tests for the fill, window and cleaning stages.

use std::num::NonZeroUsize;

use chrono::NaiveDate;
use covid_model::{DatasetTable, Observation};
use covid_transform::{derive_metrics, drop_incomplete, forward_fill, rolling_mean};
use proptest::prelude::*;

const COUNTRIES: [&str; 3] = ["Kenya", "India", "Brazil"];

fn day(offset: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2021, 1, 1).unwrap() + chrono::Days::new(u64::from(offset))
}

/// Whole numbers keep means and ratios free of rounding surprises.
fn cell() -> impl Strategy<Value = Option<f64>> {
    prop::option::of((0u32..5000).prop_map(f64::from))
}

/// Rows of mixed countries in arbitrary order, possibly sharing dates.
fn mixed_rows() -> impl Strategy<Value = Vec<Observation>> {
    prop::collection::vec((0..COUNTRIES.len(), 0u32..30, cell(), cell()), 0..40).prop_map(
        |rows| {
            rows.into_iter()
                .map(|(country, offset, cases, deaths)| {
                    Observation::new(COUNTRIES[country], day(offset)).with_cases(cases, deaths)
                })
                .collect::<Vec<_>>()
        },
    )
}

/// One country with distinct dates, fully populated `new_cases`, shuffled.
fn populated_series() -> impl Strategy<Value = Vec<Observation>> {
    prop::collection::btree_set(0u32..60, 0..25)
        .prop_flat_map(|days| {
            let len = days.len();
            (
                Just(days),
                prop::collection::vec((0u32..1000).prop_map(f64::from), len),
            )
        })
        .prop_map(|(days, values)| {
            days.into_iter()
                .zip(values)
                .map(|(offset, value)| {
                    Observation::new("Kenya", day(offset)).with_new_cases(Some(value))
                })
                .collect::<Vec<_>>()
        })
        .prop_shuffle()
}

fn table(rows: &[Observation]) -> DatasetTable {
    DatasetTable::from_observations(rows).unwrap()
}

proptest! {
    #[test]
    fn forward_fill_is_idempotent(rows in mixed_rows()) {
        let fields = ["total_cases", "total_deaths"];
        let once = forward_fill(&table(&rows), &fields).unwrap();
        let twice = forward_fill(&once, &fields).unwrap();
        prop_assert_eq!(once.observations().unwrap(), twice.observations().unwrap());
    }

    #[test]
    fn forward_fill_only_copies_within_country(rows in mixed_rows()) {
        let filled = forward_fill(&table(&rows), &["total_cases"]).unwrap();
        let filled = filled.observations().unwrap();

        for (idx, (raw, out)) in rows.iter().zip(&filled).enumerate() {
            match (raw.total_cases, out.total_cases) {
                (Some(before), after) => {
                    prop_assert_eq!(Some(before), after);
                }
                (None, None) => {}
                (None, Some(value)) => {
                    let source = rows.iter().enumerate().any(|(other, row)| {
                        other != idx
                            && row.country == raw.country
                            && row.date <= raw.date
                            && row.total_cases == Some(value)
                    });
                    prop_assert!(source, "row {} filled from another country", idx);
                }
            }
        }
    }

    #[test]
    fn country_groups_are_filled_independently(rows in mixed_rows()) {
        let filled = forward_fill(&table(&rows), &["total_cases"]).unwrap();
        let filled = filled.observations().unwrap();

        for country in COUNTRIES {
            let own: Vec<Observation> =
                rows.iter().filter(|row| row.country == country).cloned().collect();
            let alone = forward_fill(&table(&own), &["total_cases"]).unwrap();
            let together: Vec<Observation> =
                filled.iter().filter(|row| row.country == country).cloned().collect();
            prop_assert_eq!(alone.observations().unwrap(), together);
        }
    }

    #[test]
    fn death_rate_follows_division_policy(rows in mixed_rows()) {
        let derived = derive_metrics(&table(&rows)).unwrap();
        let metrics = derived.derived_metrics().unwrap();

        for (row, metric) in rows.iter().zip(metrics) {
            match (row.total_deaths, row.total_cases) {
                (Some(deaths), Some(cases)) if cases != 0.0 => {
                    prop_assert_eq!(metric.death_rate, Some(deaths / cases));
                }
                _ => {
                    prop_assert_eq!(metric.death_rate, None);
                }
            }
            prop_assert_eq!(metric.vaccination_rate, None);
        }
    }

    #[test]
    fn rolling_mean_needs_a_full_window(rows in populated_series(), window in 1usize..10) {
        let window = NonZeroUsize::new(window).unwrap();
        let smoothed = rolling_mean(&table(&rows), "new_cases", window).unwrap();
        let smoothed = smoothed.f64_values("new_cases_smoothed").unwrap();

        let mut order: Vec<usize> = (0..rows.len()).collect();
        order.sort_by_key(|&idx| rows[idx].date);
        for (position, &idx) in order.iter().enumerate() {
            if position + 1 < window.get() {
                prop_assert_eq!(smoothed[idx], None);
            } else {
                let sum: f64 = order[position + 1 - window.get()..=position]
                    .iter()
                    .map(|&i| rows[i].new_cases.unwrap())
                    .sum();
                prop_assert_eq!(smoothed[idx], Some(sum / window.get() as f64));
            }
        }
    }

    #[test]
    fn drop_incomplete_is_a_pure_filter(rows in mixed_rows()) {
        let cleaned = drop_incomplete(&table(&rows), &["total_cases", "total_deaths"]).unwrap();
        let cleaned = cleaned.observations().unwrap();

        let expected: Vec<Observation> = rows
            .iter()
            .filter(|row| row.total_cases.is_some() && row.total_deaths.is_some())
            .cloned()
            .collect();
        prop_assert_eq!(cleaned, expected);
    }
}

use chrono::{Datelike, Days, NaiveDate};
use serde::{Deserialize, Serialize};

/// Number of days after today the date picker allows.
pub const FORECAST_HORIZON_DAYS: u64 = 7;

/// Model input derived from a calendar date: `(year, month, day)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeatureVector {
    pub year: i32,
    pub month: u32,
    pub day: u32,
}

impl FeatureVector {
    pub const WIDTH: usize = 3;

    pub fn len(&self) -> usize {
        Self::WIDTH
    }

    pub fn is_empty(&self) -> bool {
        false
    }

    /// Shape of the batch handed to a predictor: one sample of `WIDTH` features.
    pub fn shape(&self) -> (usize, usize) {
        (1, Self::WIDTH)
    }

    pub fn as_array(&self) -> [f64; Self::WIDTH] {
        [f64::from(self.year), f64::from(self.month), f64::from(self.day)]
    }
}

/// Build the feature vector for `date`. The date window is enforced by the
/// form, not here.
pub fn build(date: NaiveDate) -> FeatureVector {
    FeatureVector { year: date.year(), month: date.month(), day: date.day() }
}

/// Inclusive range of dates a user may pick: today through today + 7 days.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateWindow {
    pub min: NaiveDate,
    pub max: NaiveDate,
}

impl DateWindow {
    pub fn starting(today: NaiveDate) -> Self {
        let max = today.checked_add_days(Days::new(FORECAST_HORIZON_DAYS)).unwrap_or(NaiveDate::MAX);
        Self { min: today, max }
    }

    pub fn today() -> Self {
        Self::starting(chrono::Local::now().date_naive())
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.min <= date && date <= self.max
    }

    /// Check a date typed by the user against the window.
    pub fn check(&self, date: NaiveDate) -> anyhow::Result<NaiveDate> {
        if self.contains(date) {
            Ok(date)
        } else {
            Err(anyhow::anyhow!(
                "Requested date {date} is outside the {FORECAST_HORIZON_DAYS}-day prediction window.\n\
                 Allowed range: {} .. {}.",
                self.min,
                self.max
            ))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::city::City;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
    }

    #[test]
    fn build_reads_year_month_day() {
        let fv = build(date(2026, 10, 19));
        assert_eq!(fv, FeatureVector { year: 2026, month: 10, day: 19 });
        assert_eq!(fv.as_array(), [2026.0, 10.0, 19.0]);
    }

    #[test]
    fn feature_vector_is_always_three_wide() {
        let window = DateWindow::starting(date(2026, 12, 28));
        for city in City::all() {
            let mut day = window.min;
            while day <= window.max {
                let fv = build(day);
                assert_eq!(fv.len(), 3, "{city} {day}");
                assert_eq!(fv.as_array().len(), 3);
                day = day.succ_opt().unwrap();
            }
        }
    }

    #[test]
    fn window_bounds_are_inclusive() {
        let window = DateWindow::starting(date(2026, 10, 19));
        assert_eq!(window.max, date(2026, 10, 26));
        assert!(window.contains(date(2026, 10, 19)));
        assert!(window.contains(date(2026, 10, 26)));
        assert!(!window.contains(date(2026, 10, 18)));
        assert!(!window.contains(date(2026, 10, 27)));
    }

    #[test]
    fn check_rejects_dates_past_horizon() {
        let window = DateWindow::starting(date(2026, 10, 19));
        let err = window.check(date(2026, 11, 1)).unwrap_err();
        assert!(err.to_string().contains("Allowed range: 2026-10-19 .. 2026-10-26"));
        assert_eq!(window.check(date(2026, 10, 20)).unwrap(), date(2026, 10, 20));
    }
}

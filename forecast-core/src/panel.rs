use chrono::NaiveDate;
use serde::Serialize;

use crate::{
    city::City,
    decode::{DecodedResult, keys},
};

pub const PANEL_TITLE: &str = "Weather Forecast";

/// One line of the result panel: label, field key and the value shown when
/// the decoded result lacks the key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RowSpec {
    pub label: &'static str,
    pub key: &'static str,
    pub default: &'static str,
}

const AUSTIN_ROWS: &[RowSpec] = &[
    RowSpec { label: "Predicted Max Temperature", key: keys::MAX_TEMP, default: "29.42°C" },
    RowSpec { label: "Predicted Avg Temperature", key: keys::AVG_TEMP, default: "19.83°C" },
    RowSpec { label: "Predicted Low Temperature", key: keys::MIN_TEMP, default: "9.78°C" },
    RowSpec { label: "Predicted Humidity", key: keys::HUMIDITY, default: "60.80%" },
    RowSpec { label: "Predicted wind", key: keys::WIND, default: "3.09 MPH" },
    RowSpec { label: "Predicted Event", key: keys::EVENT, default: "Fog" },
];

const BENGALURU_ROWS: &[RowSpec] = &[
    RowSpec { label: "Predicted Rainfall", key: keys::RAIN, default: "0.00%" },
    RowSpec { label: "Predicted Max Temperature", key: keys::MAX_TEMP, default: "32.52°C" },
    RowSpec { label: "Predicted Min Temperature", key: keys::MIN_TEMP, default: "20.68°C" },
    RowSpec { label: "Predicted Humidity", key: keys::HUMIDITY, default: "70.50%" },
    RowSpec { label: "Predicted Wind Speed", key: keys::WIND, default: "9.60 km/h" },
];

pub fn rows_for(city: City) -> &'static [RowSpec] {
    match city {
        City::Austin => AUSTIN_ROWS,
        City::Bengaluru => BENGALURU_ROWS,
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PanelRow {
    pub label: &'static str,
    pub key: &'static str,
    pub value: String,
    /// True when `value` is the hardcoded default rather than a prediction.
    pub defaulted: bool,
}

/// Fixed-layout result panel for one submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ForecastPanel {
    pub title: &'static str,
    pub city: City,
    pub date: NaiveDate,
    pub subtitle: String,
    pub rows: Vec<PanelRow>,
    /// Nothing could be decoded; every row shows its default.
    pub degraded: bool,
}

impl ForecastPanel {
    pub fn new(city: City, date: NaiveDate, result: &DecodedResult) -> Self {
        let rows = rows_for(city)
            .iter()
            .map(|spec| match result.get(spec.key) {
                Some(value) => PanelRow {
                    label: spec.label,
                    key: spec.key,
                    value: value.to_string(),
                    defaulted: false,
                },
                None => PanelRow {
                    label: spec.label,
                    key: spec.key,
                    value: spec.default.to_string(),
                    defaulted: true,
                },
            })
            .collect();

        Self {
            title: PANEL_TITLE,
            city,
            date,
            subtitle: format!("{city} • {}", date.format("%A, %B %d, %Y")),
            rows,
            degraded: result.is_empty(),
        }
    }

    pub fn value(&self, key: &str) -> Option<&str> {
        self.rows.iter().find(|r| r.key == key).map(|r| r.value.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decode::decode;
    use crate::predictor::Prediction;

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 19).unwrap()
    }

    #[test]
    fn subtitle_uses_long_date() {
        let panel = ForecastPanel::new(City::Austin, date(), &DecodedResult::default());
        assert_eq!(panel.title, "Weather Forecast");
        assert_eq!(panel.subtitle, "Austin • Monday, October 19, 2026");
    }

    #[test]
    fn austin_rows_in_fixed_order() {
        let result = decode(&Prediction::from(vec![19.83, 29.42, 9.78, 60.80, 3.09, 3.0]), City::Austin);
        let panel = ForecastPanel::new(City::Austin, date(), &result);

        let labels: Vec<_> = panel.rows.iter().map(|r| r.label).collect();
        assert_eq!(
            labels,
            [
                "Predicted Max Temperature",
                "Predicted Avg Temperature",
                "Predicted Low Temperature",
                "Predicted Humidity",
                "Predicted wind",
                "Predicted Event",
            ]
        );
        assert_eq!(panel.value(keys::EVENT), Some("Thunderstorm"));
        assert!(!panel.degraded);
        assert!(panel.rows.iter().all(|r| !r.defaulted));
    }

    #[test]
    fn empty_result_falls_back_to_defaults() {
        let panel = ForecastPanel::new(City::Bengaluru, date(), &DecodedResult::default());
        assert!(panel.degraded);

        let values: Vec<_> = panel.rows.iter().map(|r| r.value.as_str()).collect();
        assert_eq!(values, ["0.00%", "32.52°C", "20.68°C", "70.50%", "9.60 km/h"]);
    }

    #[test]
    fn missing_key_uses_its_own_default() {
        let result = DecodedResult::from([("max_temp", "30.00°C")]);
        let panel = ForecastPanel::new(City::Austin, date(), &result);

        assert!(!panel.degraded);
        assert_eq!(panel.value(keys::MAX_TEMP), Some("30.00°C"));
        assert_eq!(panel.value(keys::AVG_TEMP), Some("19.83°C"));
        assert_eq!(panel.rows.iter().filter(|r| r.defaulted).count(), 5);
    }
}

//! Reduction of hourly pollutant series to the scalar inputs of the
//! forecast engine.
//!
//! Series are aligned by index with the `time` axis. Everything is cut to the
//! first `min(horizon, len(time))` hours. A missing pollutant series counts as
//! empty and contributes zeros; `null` or non-numeric entries are skipped the
//! way NaN-aware statistics skip them. Without a time axis nothing can be
//! computed and the result is empty.

use std::collections::{BTreeMap, HashMap};

// used to read the hour of day off the time axis
use chrono::{DateTime, NaiveDate, NaiveDateTime, Timelike};
use serde::Serialize;
use serde_json::Value;

pub const DEFAULT_HORIZON_HOURS: usize = 24;

// hourly pm2.5 above this counts as a bad hour
pub const PM_BAD_THRESHOLD: f64 = 40.0;
// gas means are normalized against these hazardous levels
pub const SO2_HAZARD: f64 = 700.0;
pub const NO2_HAZARD: f64 = 600.0;
pub const CO_HAZARD: f64 = 15_000.0;

/// Hourly arrays keyed by upstream field name (`time`, `pm2_5`, ...).
pub type HourlySeries = HashMap<String, Vec<Value>>;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ForecastStatistics {
    pub pm_avg: f64,
    pub pm_max: f64,
    pub pm_hours_bad: f64,
    /// Hour of day (0-23) of the pm2.5 maximum, -1 when unknown.
    pub pm_peak_hour: i64,
    pub gas_norm_risk: f64,
    pub o3_max: f64,
}

impl ForecastStatistics {
    /// Reduces `hourly` over the first `horizon_hours` hours; `None` without
    /// a non-empty time axis.
    pub fn from_hourly(hourly: &HourlySeries, horizon_hours: usize) -> Option<Self> {
        let time = hourly.get("time").filter(|t| !t.is_empty())?;
        let hours = time.len().min(horizon_hours);
        let series = |key: &str| -> Vec<f64> {
            hourly
                .get(key)
                .map(|values| values.iter().take(hours).map(number).collect())
                .unwrap_or_default()
        };

        let pm2_5 = series("pm2_5");
        let (pm_avg, pm_max, pm_hours_bad, pm_peak_hour) = match argmax(&pm2_5) {
            Some(peak) => (
                mean(&pm2_5).unwrap_or(0.0),
                pm2_5[peak],
                pm2_5.iter().filter(|v| **v > PM_BAD_THRESHOLD).count() as f64,
                time.get(peak)
                    .and_then(Value::as_str)
                    .and_then(hour_of_day)
                    .map_or(-1, i64::from),
            ),
            None => (0.0, 0.0, 0.0, -1),
        };

        let normalized = |key: &str, hazard: f64| mean(&series(key)).map_or(0.0, |m| m / hazard);
        let gas_norm_risk = 100.0
            * normalized("sulphur_dioxide", SO2_HAZARD)
                .max(normalized("nitrogen_dioxide", NO2_HAZARD))
                .max(normalized("carbon_monoxide", CO_HAZARD));

        let ozone = series("ozone");
        let o3_max = argmax(&ozone).map_or(0.0, |i| ozone[i]);

        Some(Self {
            pm_avg,
            pm_max,
            pm_hours_bad,
            pm_peak_hour,
            gas_norm_risk,
            o3_max,
        })
    }
    /// All statistics by name, ready to hand to the forecast engine (which
    /// ignores `pm_peak_hour`).
    pub fn to_map(&self) -> BTreeMap<String, f64> {
        BTreeMap::from([
            ("pm_avg".to_owned(), self.pm_avg),
            ("pm_max".to_owned(), self.pm_max),
            ("pm_hours_bad".to_owned(), self.pm_hours_bad),
            ("pm_peak_hour".to_owned(), self.pm_peak_hour as f64),
            ("gas_norm_risk".to_owned(), self.gas_norm_risk),
            ("o3_max".to_owned(), self.o3_max),
        ])
    }
}

/// Map form of [`ForecastStatistics::from_hourly`]; empty when the time axis
/// is missing or empty.
pub fn preprocess_hourly(hourly: &HourlySeries, horizon_hours: usize) -> BTreeMap<String, f64> {
    ForecastStatistics::from_hourly(hourly, horizon_hours)
        .map(|stats| stats.to_map())
        .unwrap_or_default()
}

// numbers as they are, numeric strings parsed, everything else NaN
pub(crate) fn number(value: &Value) -> f64 {
    match value {
        Value::Number(n) => n.as_f64().unwrap_or(f64::NAN),
        Value::String(s) => s.trim().parse().unwrap_or(f64::NAN),
        _ => f64::NAN,
    }
}

fn mean(values: &[f64]) -> Option<f64> {
    let finite: Vec<f64> = values.iter().copied().filter(|v| v.is_finite()).collect();
    if finite.is_empty() {
        None
    } else {
        Some(finite.iter().sum::<f64>() / finite.len() as f64)
    }
}

// index of the first maximum among the finite entries
fn argmax(values: &[f64]) -> Option<usize> {
    let mut best: Option<usize> = None;
    for (i, v) in values.iter().enumerate() {
        if v.is_finite() && best.is_none_or(|b| *v > values[b]) {
            best = Some(i);
        }
    }
    best
}

fn hour_of_day(stamp: &str) -> Option<u32> {
    let stamp = stamp.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(stamp) {
        return Some(dt.hour());
    }
    let formats = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M", "%Y-%m-%d %H:%M:%S", "%Y-%m-%d %H:%M"];
    for format in formats {
        if let Ok(dt) = NaiveDateTime::parse_from_str(stamp, format) {
            return Some(dt.hour());
        }
    }
    NaiveDate::parse_from_str(stamp, "%Y-%m-%d").ok().map(|_| 0)
}

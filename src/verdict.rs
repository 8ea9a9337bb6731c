//! Discrete readings of the crisp scores, for whoever presents them.
//!
//! The recommendation index is itself a defuzzified scalar, so it is read
//! back through fixed thresholds that repeat the boundaries of the
//! recommendation terms. [`Session::dominant_term`](crate::engine::Session::dominant_term)
//! offers the winning term label directly when a single threshold is preferred.

use std::fmt;

use serde::Serialize;

// ------------- Recommendation -------------
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Recommendation {
    StayHome,
    LimitActivity,
    GoOutSafe,
    PerfectDay,
}

impl Recommendation {
    pub fn from_index(index: f64) -> Self {
        if index <= 3.0 {
            Recommendation::StayHome
        } else if index <= 6.5 {
            Recommendation::LimitActivity
        } else if index <= 9.0 {
            Recommendation::GoOutSafe
        } else {
            Recommendation::PerfectDay
        }
    }
}

impl fmt::Display for Recommendation {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Recommendation::StayHome => write!(f, "very high risk: stay home"),
            Recommendation::LimitActivity => write!(f, "elevated risk: limit outdoor activity"),
            Recommendation::GoOutSafe => write!(f, "moderate risk: safe to go out"),
            Recommendation::PerfectDay => write!(f, "low risk: a perfect day to be outside"),
        }
    }
}

// ------------- AQI band -------------
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AqiBand {
    Good,
    Moderate,
    UnhealthySensitive,
    Unhealthy,
    Hazardous,
}

impl AqiBand {
    pub fn from_score(score: f64) -> Self {
        if score <= 50.0 {
            AqiBand::Good
        } else if score <= 100.0 {
            AqiBand::Moderate
        } else if score <= 150.0 {
            AqiBand::UnhealthySensitive
        } else if score <= 200.0 {
            AqiBand::Unhealthy
        } else {
            AqiBand::Hazardous
        }
    }
}

impl fmt::Display for AqiBand {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            AqiBand::Good => write!(f, "good"),
            AqiBand::Moderate => write!(f, "moderate"),
            AqiBand::UnhealthySensitive => write!(f, "unhealthy for sensitive groups"),
            AqiBand::Unhealthy => write!(f, "unhealthy"),
            AqiBand::Hazardous => write!(f, "hazardous"),
        }
    }
}

// ------------- Risk band -------------
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskBand {
    Low,
    Medium,
    High,
    Critical,
}

impl RiskBand {
    // crossover points of neighboring terms on the 0-100 risk scale
    pub fn from_score(score: f64) -> Self {
        if score <= 22.5 {
            RiskBand::Low
        } else if score <= 52.5 {
            RiskBand::Medium
        } else if score <= 82.5 {
            RiskBand::High
        } else {
            RiskBand::Critical
        }
    }
}

impl fmt::Display for RiskBand {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            RiskBand::Low => write!(f, "low"),
            RiskBand::Medium => write!(f, "medium"),
            RiskBand::High => write!(f, "high"),
            RiskBand::Critical => write!(f, "critical"),
        }
    }
}

// ------------- Forecast -------------
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ForecastLevel {
    Low,
    Medium,
    High,
}

impl ForecastLevel {
    pub fn from_score(score: f64) -> Self {
        if score <= 30.0 {
            ForecastLevel::Low
        } else if score <= 65.0 {
            ForecastLevel::Medium
        } else {
            ForecastLevel::High
        }
    }
}

impl fmt::Display for ForecastLevel {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ForecastLevel::Low => write!(f, "low risk: stable next hours"),
            ForecastLevel::Medium => write!(f, "medium risk: take care"),
            ForecastLevel::High => write!(f, "high risk: an unfavorable day is possible"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PeakPeriod {
    Night,
    Morning,
    Afternoon,
    Evening,
    Unknown,
}

impl PeakPeriod {
    /// Hour of day to period; anything outside 0-23 (the -1 sentinel
    /// included) is `Unknown`.
    pub fn from_hour(hour: i64) -> Self {
        match hour {
            0..=4 => PeakPeriod::Night,
            5..=11 => PeakPeriod::Morning,
            12..=17 => PeakPeriod::Afternoon,
            18..=23 => PeakPeriod::Evening,
            _ => PeakPeriod::Unknown,
        }
    }
}

impl fmt::Display for PeakPeriod {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            PeakPeriod::Night => write!(f, "peak expected at night"),
            PeakPeriod::Morning => write!(f, "peak expected in the morning"),
            PeakPeriod::Afternoon => write!(f, "peak expected in the afternoon"),
            PeakPeriod::Evening => write!(f, "peak expected in the evening"),
            PeakPeriod::Unknown => write!(f, "peak time unknown"),
        }
    }
}

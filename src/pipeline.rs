//! Orchestration of the engines over one upstream payload.
//!
//! Current-hour readings go through the particle, gas and other engines as a
//! fork-join; the master engine then combines their three risks. Independently
//! the hourly series are reduced and fed to the forecast engine. Every stage
//! fails on its own: a failure is recorded in the [`Assessment`] and only the
//! stages that depend on it are skipped.

use std::collections::HashMap;
use std::thread;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::engine::{Engine, evaluate};
use crate::error::Result;
use crate::forecast::{ForecastStatistics, HourlySeries, number};
use crate::settings::Settings;
use crate::subsystem::{
    FINAL_AQI, FORECAST_RISK, GAS_RISK, GAS_RISK_IN, OTHER_RISK, OTHER_RISK_IN, PARTICLE_RISK,
    PARTICLE_RISK_IN, RECOMMENDATION, build_forecast_engine, build_gas_engine,
    build_master_engine, build_other_engine, build_particle_engine,
};
use crate::verdict::{AqiBand, ForecastLevel, PeakPeriod, Recommendation, RiskBand};

// engine input name -> upstream field name
const PARTICLE_FIELDS: [(&str, &str); 4] = [
    ("pm2_5", "pm2_5"),
    ("pm10", "pm10"),
    ("aod", "aerosol_optical_depth"),
    ("dust", "dust"),
];
const GAS_FIELDS: [(&str, &str); 3] = [
    ("co", "carbon_monoxide"),
    ("no2", "nitrogen_dioxide"),
    ("so2", "sulphur_dioxide"),
];
const OTHER_FIELDS: [(&str, &str); 2] = [("o3", "ozone"), ("nh3", "ammonia")];

// ------------- Payload -------------

/// What the upstream air-quality API returns: a `current` mapping of field
/// to reading and an `hourly` mapping of field to equal-length arrays.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct AirQualityPayload {
    #[serde(default)]
    pub current: Option<HashMap<String, Value>>,
    #[serde(default)]
    pub hourly: Option<HourlySeries>,
}

impl AirQualityPayload {
    /// A current reading as a finite number. Numeric strings are parsed the
    /// same way as hourly entries; anything else counts as missing.
    pub fn reading(&self, field: &str) -> Option<f64> {
        let value = number(self.current.as_ref()?.get(field)?);
        value.is_finite().then_some(value)
    }
}

// ------------- Outcomes -------------
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", content = "detail", rename_all = "snake_case")]
pub enum StageOutcome<T> {
    Computed(T),
    Failed(String),
    Skipped(String),
}

impl<T> StageOutcome<T> {
    pub fn computed(&self) -> Option<&T> {
        match self {
            StageOutcome::Computed(value) => Some(value),
            _ => None,
        }
    }
    pub fn is_computed(&self) -> bool {
        matches!(self, StageOutcome::Computed(_))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SubsystemScore {
    pub score: f64,
    pub band: RiskBand,
    pub dominant_term: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CurrentAqi {
    pub aqi: f64,
    pub band: AqiBand,
    pub recommendation_index: f64,
    pub recommendation: Recommendation,
    /// Winning recommendation term, free of the threshold re-reading.
    pub recommendation_term: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ForecastOutcome {
    pub statistics: ForecastStatistics,
    pub risk: f64,
    pub level: ForecastLevel,
    /// Only reported above the low level.
    pub peak_period: Option<PeakPeriod>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Assessment {
    pub particle: StageOutcome<SubsystemScore>,
    pub gas: StageOutcome<SubsystemScore>,
    pub other: StageOutcome<SubsystemScore>,
    pub master: StageOutcome<CurrentAqi>,
    pub forecast: StageOutcome<ForecastOutcome>,
}

impl Assessment {
    pub fn final_aqi(&self) -> Option<f64> {
        self.master.computed().map(|m| m.aqi)
    }
    pub fn forecast_risk(&self) -> Option<f64> {
        self.forecast.computed().map(|f| f.risk)
    }
}

// ------------- Pipeline -------------
#[derive(Debug)]
pub struct Pipeline {
    settings: Settings,
    particle: Engine,
    gas: Engine,
    other: Engine,
    master: Engine,
    forecast: Engine,
}

impl Pipeline {
    /// Builds the five engines once; they are read-only afterwards.
    pub fn new(settings: Settings) -> Result<Self> {
        Ok(Self {
            settings,
            particle: build_particle_engine()?,
            gas: build_gas_engine()?,
            other: build_other_engine()?,
            master: build_master_engine()?,
            forecast: build_forecast_engine()?,
        })
    }
    pub fn settings(&self) -> &Settings {
        &self.settings
    }
    pub fn engine(&self, name: &str) -> Option<&Engine> {
        match name {
            "particle" => Some(&self.particle),
            "gas" => Some(&self.gas),
            "other" => Some(&self.other),
            "master" => Some(&self.master),
            "forecast" => Some(&self.forecast),
            _ => None,
        }
    }

    pub fn assess(&self, payload: &AirQualityPayload) -> Assessment {
        let (particle, gas, other) = match &payload.current {
            Some(current) if !current.is_empty() => self.assess_subsystems(payload),
            _ => {
                warn!("no current readings, current-hour assessment skipped");
                let skipped = || StageOutcome::Skipped("no current readings".into());
                (skipped(), skipped(), skipped())
            }
        };
        let master = self.assess_master(&particle, &gas, &other);
        let forecast = self.assess_forecast(payload);
        Assessment {
            particle,
            gas,
            other,
            master,
            forecast,
        }
    }

    fn assess_subsystems(
        &self,
        payload: &AirQualityPayload,
    ) -> (
        StageOutcome<SubsystemScore>,
        StageOutcome<SubsystemScore>,
        StageOutcome<SubsystemScore>,
    ) {
        // the three subsystems are independent; fork them and join before the master
        thread::scope(|s| {
            let particle = s.spawn(|| {
                self.run_subsystem(&self.particle, &PARTICLE_FIELDS, PARTICLE_RISK, payload)
            });
            let gas = s.spawn(|| self.run_subsystem(&self.gas, &GAS_FIELDS, GAS_RISK, payload));
            let other =
                s.spawn(|| self.run_subsystem(&self.other, &OTHER_FIELDS, OTHER_RISK, payload));
            (joined(particle.join()), joined(gas.join()), joined(other.join()))
        })
    }

    fn run_subsystem(
        &self,
        engine: &Engine,
        fields: &[(&str, &str)],
        output: &str,
        payload: &AirQualityPayload,
    ) -> StageOutcome<SubsystemScore> {
        let mut session = engine.session();
        for (input, field) in fields {
            let reading = match payload.reading(field) {
                Some(value) => Some(value),
                None if self.settings.missing_as_zero => {
                    debug!(engine = engine.name(), field, "missing reading taken as 0");
                    Some(0.0)
                }
                None => None,
            };
            if let Some(value) = reading {
                if let Err(e) = session.set_input(input, value) {
                    warn!(engine = engine.name(), field, error = %e, "reading rejected");
                }
            }
        }
        match session.compute() {
            Ok(()) => match session.output(output) {
                Some(score) => {
                    info!(engine = engine.name(), score, "subsystem computed");
                    StageOutcome::Computed(SubsystemScore {
                        score,
                        band: RiskBand::from_score(score),
                        dominant_term: session.dominant_term(output).map(str::to_owned),
                    })
                }
                None => StageOutcome::Failed(format!("{output} was not produced")),
            },
            Err(e) => {
                warn!(engine = engine.name(), error = %e, "subsystem failed");
                StageOutcome::Failed(e.to_string())
            }
        }
    }

    fn assess_master(
        &self,
        particle: &StageOutcome<SubsystemScore>,
        gas: &StageOutcome<SubsystemScore>,
        other: &StageOutcome<SubsystemScore>,
    ) -> StageOutcome<CurrentAqi> {
        let (Some(p), Some(g), Some(o)) = (particle.computed(), gas.computed(), other.computed())
        else {
            let missing: Vec<&str> = [("particle", particle), ("gas", gas), ("other", other)]
                .iter()
                .filter(|(_, outcome)| !outcome.is_computed())
                .map(|(name, _)| *name)
                .collect();
            warn!(missing = ?missing, "master engine skipped");
            return StageOutcome::Skipped(format!("no risk from: {}", missing.join(", ")));
        };
        let mut session = self.master.session();
        let set = [
            (PARTICLE_RISK_IN, p.score),
            (GAS_RISK_IN, g.score),
            (OTHER_RISK_IN, o.score),
        ]
        .into_iter()
        .try_for_each(|(name, value)| session.set_input(name, value).map(|_| ()));
        if let Err(e) = set.and_then(|_| session.compute()) {
            warn!(error = %e, "master engine failed");
            return StageOutcome::Failed(e.to_string());
        }
        match (session.output(FINAL_AQI), session.output(RECOMMENDATION)) {
            (Some(aqi), Some(index)) => {
                info!(aqi, recommendation = index, "current AQI computed");
                StageOutcome::Computed(CurrentAqi {
                    aqi,
                    band: AqiBand::from_score(aqi),
                    recommendation_index: index,
                    recommendation: Recommendation::from_index(index),
                    recommendation_term: session.dominant_term(RECOMMENDATION).map(str::to_owned),
                })
            }
            _ => StageOutcome::Failed("master outputs were not produced".into()),
        }
    }

    fn assess_forecast(&self, payload: &AirQualityPayload) -> StageOutcome<ForecastOutcome> {
        let Some(hourly) = payload
            .hourly
            .as_ref()
            .filter(|h| h.get("pm2_5").is_some_and(|pm| !pm.is_empty()))
        else {
            warn!("no hourly pm2_5 data, forecast skipped");
            return StageOutcome::Skipped("no hourly data".into());
        };
        let Some(statistics) = ForecastStatistics::from_hourly(hourly, self.settings.horizon_hours)
        else {
            warn!("hourly data has no time axis, forecast failed");
            return StageOutcome::Failed("hourly data has no time axis".into());
        };
        let inputs = statistics.to_map();
        let risk = match evaluate(&self.forecast, &inputs) {
            Ok(outputs) => match outputs.get(FORECAST_RISK) {
                Some(risk) => *risk,
                None => return StageOutcome::Failed(format!("{FORECAST_RISK} was not produced")),
            },
            Err(e) => {
                warn!(error = %e, "forecast engine failed");
                return StageOutcome::Failed(e.to_string());
            }
        };
        let level = ForecastLevel::from_score(risk);
        let peak_period =
            (level != ForecastLevel::Low).then(|| PeakPeriod::from_hour(statistics.pm_peak_hour));
        info!(risk, hours = self.settings.horizon_hours, "forecast computed");
        StageOutcome::Computed(ForecastOutcome {
            statistics,
            risk,
            level,
            peak_period,
        })
    }
}

fn joined<T>(result: thread::Result<StageOutcome<T>>) -> StageOutcome<T> {
    result.unwrap_or_else(|_| StageOutcome::Failed("evaluation panicked".into()))
}

//! The five built-in engines.
//!
//! Membership breakpoints follow US EPA concentration bands (μg/m³). Rule
//! tables are ordered from the most to the least severe category. The master
//! engine guards its lower categories with negated antecedents ("medium and
//! not high and not critical") so that a single dominant risk yields a clean
//! category instead of a blend; the particle, gas, other and forecast tables
//! rely on the severe rules outweighing the mild ones in the aggregate.

use crate::engine::Engine;
use crate::error::Result;
use crate::membership::Universe;
use crate::rule::{Rule, all_of, any_of, is, none_of};
use crate::variable::LinguisticVariable;

pub const PARTICLE_RISK: &str = "Particle_Risk";
pub const GAS_RISK: &str = "Gas_Risk";
pub const OTHER_RISK: &str = "Other_Risk";
pub const FINAL_AQI: &str = "Final_AQI";
pub const RECOMMENDATION: &str = "Recommendation";
pub const FORECAST_RISK: &str = "Forecast_Risk";

pub const PARTICLE_RISK_IN: &str = "particle_risk_in";
pub const GAS_RISK_IN: &str = "gas_risk_in";
pub const OTHER_RISK_IN: &str = "other_risk_in";

/// Names accepted by [`build_engine`].
pub const ENGINE_NAMES: [&str; 5] = ["particle", "gas", "other", "master", "forecast"];

/// Builds a built-in engine by name, `None` for an unknown name.
pub fn build_engine(name: &str) -> Option<Result<Engine>> {
    match name {
        "particle" => Some(build_particle_engine()),
        "gas" => Some(build_gas_engine()),
        "other" => Some(build_other_engine()),
        "master" => Some(build_master_engine()),
        "forecast" => Some(build_forecast_engine()),
        _ => None,
    }
}

// ------------- Shared scales -------------

// 0-100 risk scale shared by the subsystem outputs and the master inputs
fn risk_variable(variable: LinguisticVariable) -> Result<LinguisticVariable> {
    variable
        .with_trapezoid("low", 0.0, 0.0, 15.0, 30.0)?
        .with_trapezoid("medium", 15.0, 30.0, 45.0, 60.0)?
        .with_trapezoid("high", 45.0, 60.0, 75.0, 90.0)?
        .with_trapezoid("critical", 75.0, 90.0, 100.0, 100.0)
}

fn risk_universe() -> Result<Universe> {
    Universe::new(0.0, 100.0, 1.0)
}

// good / moderate / unhealthy / hazardous with touching plateaus
fn epa_bands(
    variable: LinguisticVariable,
    good: [f64; 2],
    moderate: [f64; 4],
    unhealthy: [f64; 4],
    hazardous: [f64; 3],
) -> Result<LinguisticVariable> {
    let [a, b, c, d] = moderate;
    let [e, f, g, h] = unhealthy;
    let [i, j, k] = hazardous;
    variable
        .with_trapezoid("good", 0.0, 0.0, good[0], good[1])?
        .with_trapezoid("moderate", a, b, c, d)?
        .with_trapezoid("unhealthy", e, f, g, h)?
        .with_trapezoid("hazardous", i, j, k, k)
}

// ------------- Particle -------------
pub fn build_particle_engine() -> Result<Engine> {
    let pm2_5 = epa_bands(
        LinguisticVariable::input("pm2_5", Universe::new(0.0, 500.0, 1.0)?),
        [10.0, 15.0],
        [10.0, 15.0, 30.0, 40.0],
        [30.0, 40.0, 140.0, 160.0],
        [140.0, 160.0, 500.0],
    )?;
    let pm10 = epa_bands(
        LinguisticVariable::input("pm10", Universe::new(0.0, 600.0, 1.0)?),
        [40.0, 60.0],
        [40.0, 60.0, 140.0, 170.0],
        [140.0, 170.0, 340.0, 360.0],
        [340.0, 360.0, 600.0],
    )?;
    let aod = LinguisticVariable::input("aod", Universe::new(0.0, 5.0, 0.1)?)
        .with_trapezoid("low", 0.0, 0.0, 0.5, 1.0)?
        .with_trapezoid("medium", 0.5, 1.0, 2.0, 3.0)?
        .with_trapezoid("high", 2.0, 3.0, 5.0, 5.0)?;
    let dust = LinguisticVariable::input("dust", Universe::new(0.0, 1000.0, 1.0)?)
        .with_trapezoid("low", 0.0, 0.0, 50.0, 150.0)?
        .with_trapezoid("medium", 50.0, 150.0, 300.0, 450.0)?
        .with_trapezoid("high", 300.0, 450.0, 1000.0, 1000.0)?;
    let risk = risk_variable(LinguisticVariable::output(PARTICLE_RISK, risk_universe()?))?;

    Engine::builder("particle")
        .variable(pm2_5)
        .variable(pm10)
        .variable(aod)
        .variable(dust)
        .variable(risk)
        .rules([
            Rule::new("pm2_5_hazardous", is("pm2_5", "hazardous"))
                .implies(PARTICLE_RISK, "critical"),
            Rule::new("pm10_hazardous", is("pm10", "hazardous"))
                .implies(PARTICLE_RISK, "critical"),
            Rule::new("pm2_5_unhealthy", is("pm2_5", "unhealthy"))
                .implies(PARTICLE_RISK, "high"),
            Rule::new("pm10_unhealthy", is("pm10", "unhealthy")).implies(PARTICLE_RISK, "high"),
            Rule::new("dust_storm", is("dust", "high").and(is("aod", "high")))
                .implies(PARTICLE_RISK, "high"),
            Rule::new("dust_haze", is("dust", "medium").and(is("aod", "medium")))
                .implies(PARTICLE_RISK, "medium"),
            Rule::new("pm_moderate_any", is("pm2_5", "moderate").or(is("pm10", "moderate")))
                .implies(PARTICLE_RISK, "medium"),
            Rule::new("pm_moderate_both", is("pm2_5", "moderate").and(is("pm10", "moderate")))
                .implies(PARTICLE_RISK, "medium"),
            Rule::new(
                "all_clear",
                all_of(vec![
                    is("pm2_5", "good"),
                    is("pm10", "good"),
                    is("aod", "low"),
                    is("dust", "low"),
                ]),
            )
            .implies(PARTICLE_RISK, "low"),
            Rule::new("pm_good", is("pm2_5", "good").and(is("pm10", "good")))
                .implies(PARTICLE_RISK, "low"),
        ])
        .build()
}

// ------------- Gas -------------
pub fn build_gas_engine() -> Result<Engine> {
    let co = epa_bands(
        LinguisticVariable::input("co", Universe::new(0.0, 50_000.0, 10.0)?),
        [9_000.0, 10_000.0],
        [9_000.0, 10_000.0, 12_000.0, 13_000.0],
        [12_000.0, 13_000.0, 15_000.0, 16_000.0],
        [15_000.0, 16_000.0, 50_000.0],
    )?;
    let no2 = epa_bands(
        LinguisticVariable::input("no2", Universe::new(0.0, 2_000.0, 1.0)?),
        [80.0, 120.0],
        [80.0, 120.0, 300.0, 400.0],
        [300.0, 400.0, 600.0, 700.0],
        [600.0, 700.0, 2_000.0],
    )?;
    let so2 = epa_bands(
        LinguisticVariable::input("so2", Universe::new(0.0, 2_000.0, 1.0)?),
        [80.0, 100.0],
        [80.0, 100.0, 300.0, 400.0],
        [300.0, 400.0, 700.0, 900.0],
        [700.0, 900.0, 2_000.0],
    )?;
    let risk = risk_variable(LinguisticVariable::output(GAS_RISK, risk_universe()?))?;
    let gases = ["co", "no2", "so2"];
    let any_gas = |label: &str| any_of(gases.iter().map(|g| is(g, label)).collect());

    Engine::builder("gas")
        .variable(co)
        .variable(no2)
        .variable(so2)
        .variable(risk)
        .rules([
            Rule::new("any_hazardous", any_gas("hazardous")).implies(GAS_RISK, "critical"),
            Rule::new("any_unhealthy", any_gas("unhealthy")).implies(GAS_RISK, "high"),
            Rule::new("any_moderate", any_gas("moderate")).implies(GAS_RISK, "medium"),
            Rule::new("all_good", all_of(gases.iter().map(|g| is(g, "good")).collect()))
                .implies(GAS_RISK, "low"),
        ])
        .build()
}

// ------------- Other -------------
pub fn build_other_engine() -> Result<Engine> {
    let o3 = epa_bands(
        LinguisticVariable::input("o3", Universe::new(0.0, 1_000.0, 1.0)?),
        [80.0, 120.0],
        [80.0, 120.0, 170.0, 190.0],
        [170.0, 190.0, 230.0, 250.0],
        [230.0, 250.0, 1_000.0],
    )?;
    // no hard AQI standard for ammonia; log-like bands
    let nh3 = LinguisticVariable::input("nh3", Universe::new(0.0, 1_000.0, 1.0)?)
        .with_trapezoid("low", 0.0, 0.0, 50.0, 100.0)?
        .with_trapezoid("medium", 50.0, 100.0, 200.0, 300.0)?
        .with_trapezoid("high", 200.0, 300.0, 1_000.0, 1_000.0)?;
    let risk = risk_variable(LinguisticVariable::output(OTHER_RISK, risk_universe()?))?;

    Engine::builder("other")
        .variable(o3)
        .variable(nh3)
        .variable(risk)
        .rules([
            Rule::new("o3_hazardous", is("o3", "hazardous")).implies(OTHER_RISK, "critical"),
            Rule::new("o3_unhealthy", is("o3", "unhealthy")).implies(OTHER_RISK, "high"),
            Rule::new("nh3_high", is("nh3", "high")).implies(OTHER_RISK, "medium"),
            Rule::new("o3_moderate", is("o3", "moderate")).implies(OTHER_RISK, "medium"),
            Rule::new("o3_moderate_nh3_high", is("o3", "moderate").and(is("nh3", "high")))
                .implies(OTHER_RISK, "high"),
            Rule::new("all_clear", is("o3", "good").and(is("nh3", "low")))
                .implies(OTHER_RISK, "low"),
        ])
        .build()
}

// ------------- Master -------------
pub fn build_master_engine() -> Result<Engine> {
    let risks = [PARTICLE_RISK_IN, GAS_RISK_IN, OTHER_RISK_IN];
    let final_aqi = LinguisticVariable::output(FINAL_AQI, Universe::new(0.0, 500.0, 1.0)?)
        .with_trapezoid("good", 0.0, 0.0, 40.0, 60.0)?
        .with_trapezoid("moderate", 40.0, 60.0, 90.0, 110.0)?
        .with_trapezoid("unhealthy_sensitive", 90.0, 110.0, 140.0, 160.0)?
        .with_trapezoid("unhealthy", 140.0, 160.0, 190.0, 210.0)?
        .with_trapezoid("hazardous", 190.0, 210.0, 500.0, 500.0)?;
    let recommendation =
        LinguisticVariable::output(RECOMMENDATION, Universe::new(0.0, 10.0, 1.0)?)
            .with_triangle("stay_home", 0.0, 1.0, 3.0)?
            .with_triangle("limit_activity", 2.0, 4.0, 6.0)?
            .with_triangle("go_out_safe", 5.0, 7.0, 9.0)?
            .with_triangle("perfect_day", 7.0, 9.0, 10.0)?;

    let any = |label: &str| any_of(risks.iter().map(|r| is(r, label)).collect());
    let none = |label: &str| none_of(risks.iter().map(|r| is(r, label)).collect());
    // one risk low and another medium, for every ordered pair of risks
    let mut mixed = Vec::new();
    for (x, first) in risks.iter().enumerate() {
        for second in &risks[x + 1..] {
            mixed.push(is(first, "low").and(is(second, "medium")));
            mixed.push(is(first, "medium").and(is(second, "low")));
        }
    }

    let mut builder = Engine::builder("master").variable(final_aqi).variable(recommendation);
    for name in risks {
        let input = LinguisticVariable::input(name, risk_universe()?);
        builder = builder.variable(risk_variable(input)?);
    }
    builder
        .rules([
            Rule::new("any_critical", any("critical"))
                .implies(FINAL_AQI, "hazardous")
                .implies(RECOMMENDATION, "stay_home"),
            Rule::new("any_high", all_of(vec![any("high"), none("critical")]))
                .implies(FINAL_AQI, "unhealthy")
                .implies(RECOMMENDATION, "limit_activity"),
            Rule::new("any_medium", all_of(vec![any("medium"), none("high"), none("critical")]))
                .implies(FINAL_AQI, "moderate")
                .implies(RECOMMENDATION, "go_out_safe"),
            Rule::new(
                "low_medium_mix",
                all_of(vec![any_of(mixed), none("high"), none("critical")]),
            )
            .implies(FINAL_AQI, "moderate")
            .implies(RECOMMENDATION, "go_out_safe"),
            Rule::new("all_low", all_of(risks.iter().map(|r| is(r, "low")).collect()))
                .implies(FINAL_AQI, "good")
                .implies(RECOMMENDATION, "perfect_day"),
        ])
        .build()
}

// ------------- Forecast -------------
pub fn build_forecast_engine() -> Result<Engine> {
    let pm_avg = LinguisticVariable::input("pm_avg", Universe::new(0.0, 500.0, 1.0)?)
        .with_trapezoid("low", 0.0, 0.0, 10.0, 15.0)?
        .with_trapezoid("med", 10.0, 15.0, 30.0, 40.0)?
        .with_trapezoid("high", 30.0, 40.0, 500.0, 500.0)?;
    let pm_max = LinguisticVariable::input("pm_max", Universe::new(0.0, 500.0, 1.0)?)
        .with_trapezoid("low", 0.0, 0.0, 30.0, 45.0)?
        .with_trapezoid("med", 30.0, 45.0, 100.0, 150.0)?
        .with_trapezoid("high", 100.0, 150.0, 500.0, 500.0)?;
    let pm_hours_bad = LinguisticVariable::input("pm_hours_bad", Universe::new(0.0, 24.0, 1.0)?)
        .with_trapezoid("low", 0.0, 0.0, 1.0, 3.0)?
        .with_trapezoid("med", 1.0, 3.0, 6.0, 10.0)?
        .with_trapezoid("high", 6.0, 10.0, 24.0, 24.0)?;
    let gas_norm_risk = LinguisticVariable::input("gas_norm_risk", risk_universe()?)
        .with_trapezoid("low", 0.0, 0.0, 10.0, 20.0)?
        .with_trapezoid("med", 10.0, 20.0, 50.0, 60.0)?
        .with_trapezoid("high", 50.0, 60.0, 100.0, 100.0)?;
    let o3_max = LinguisticVariable::input("o3_max", Universe::new(0.0, 1_000.0, 1.0)?)
        .with_trapezoid("low", 0.0, 0.0, 80.0, 120.0)?
        .with_trapezoid("med", 80.0, 120.0, 170.0, 190.0)?
        .with_trapezoid("high", 170.0, 190.0, 1_000.0, 1_000.0)?;
    let risk = LinguisticVariable::output(FORECAST_RISK, risk_universe()?)
        .with_triangle("low", 0.0, 15.0, 30.0)?
        .with_triangle("medium", 25.0, 45.0, 65.0)?
        .with_triangle("high", 60.0, 75.0, 90.0)?
        .with_triangle("critical", 85.0, 95.0, 100.0)?;
    let peaks = |label: &str| {
        any_of(vec![is("pm_max", label), is("gas_norm_risk", label), is("o3_max", label)])
    };

    Engine::builder("forecast")
        .variable(pm_avg)
        .variable(pm_max)
        .variable(pm_hours_bad)
        .variable(gas_norm_risk)
        .variable(o3_max)
        .variable(risk)
        .rules([
            Rule::new("peak_high", peaks("high")).implies(FORECAST_RISK, "critical"),
            Rule::new("sustained_high", is("pm_avg", "high").or(is("pm_hours_bad", "high")))
                .implies(FORECAST_RISK, "high"),
            Rule::new("peak_medium", peaks("med")).implies(FORECAST_RISK, "medium"),
            Rule::new("sustained_medium", is("pm_hours_bad", "med").or(is("pm_avg", "med")))
                .implies(FORECAST_RISK, "medium"),
            Rule::new(
                "all_low",
                all_of(vec![
                    is("pm_avg", "low"),
                    is("pm_max", "low"),
                    is("pm_hours_bad", "low"),
                    is("gas_norm_risk", "low"),
                    is("o3_max", "low"),
                ]),
            )
            .implies(FORECAST_RISK, "low"),
        ])
        .build()
}

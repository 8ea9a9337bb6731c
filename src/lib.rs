//! Atmofuzz – fuzzy-logic air quality assessment.
//!
//! Atmofuzz turns raw pollutant readings into an overall air quality index,
//! an activity recommendation and a short-term forecast risk. It does so with
//! Mamdani inference using the Zadeh operators:
//! * a [`membership::Universe`] is a sampled, ordered range of crisp values;
//! * a [`variable::LinguisticVariable`] owns named terms, each a trapezoid or
//!   triangle sampled over its universe;
//! * a [`rule::Rule`] is an `AND`/`OR`/`NOT` tree over `(variable, term)` leaves
//!   that implies one or more output terms;
//! * an [`engine::Engine`] validates and holds variables and rules, and a
//!   [`engine::Session`] carries one evaluation through fuzzification,
//!   min-clipping, max-aggregation and defuzzification.
//!
//! ## Modules
//! * [`membership`] – universes and membership shapes.
//! * [`variable`] – linguistic variables, terms and defuzzification methods.
//! * [`rule`] – antecedent trees, consequents and rules.
//! * [`engine`] – the inference engine, its builder and evaluation sessions.
//! * [`subsystem`] – the five built-in engines (particle, gas, other, master
//!   and forecast).
//! * [`forecast`] – reduction of hourly series to forecast engine inputs.
//! * [`verdict`] – threshold readings of the crisp outputs.
//! * [`pipeline`] – orchestration of all engines over one upstream payload.
//! * [`settings`] – process configuration.
//! * [`server`] – the HTTP interface.
//!
//! ## Pipeline
//! The particle, gas and other engines run side by side on the current-hour
//! readings. Their three risks feed the master engine, which yields the final
//! AQI and the recommendation index. The hourly series are reduced to six
//! statistics and fed to the forecast engine. A failing stage is recorded in
//! the [`pipeline::Assessment`] and only the stages that depend on it are
//! skipped.
//!
//! ## Quick Start
//! ```
//! use std::collections::BTreeMap;
//! use atmofuzz::{build_gas_engine, evaluate};
//! let engine = build_gas_engine().unwrap();
//! let inputs = BTreeMap::from([
//!     ("co".to_string(), 20_000.0),
//!     ("no2".to_string(), 0.0),
//!     ("so2".to_string(), 0.0),
//! ]);
//! let outputs = evaluate(&engine, &inputs).unwrap();
//! assert!(outputs["Gas_Risk"] >= 90.0);
//! ```
//!
//! ## Logging
//! The inference core is silent. The pipeline, the server and the binary emit
//! `tracing` events; the binary installs a `tracing_subscriber` formatter
//! filtered by `RUST_LOG` or the configured `log_filter`.

pub mod error;
pub mod membership;
pub mod variable;
pub mod rule;
pub mod engine;
pub mod subsystem;
pub mod verdict;
pub mod forecast;
pub mod settings;
pub mod pipeline;
pub mod server;

pub use error::{AtmoError, Result};
pub use engine::{Engine, Session, evaluate};
pub use forecast::preprocess_hourly;
pub use subsystem::{
    build_engine, build_forecast_engine, build_gas_engine, build_master_engine,
    build_other_engine, build_particle_engine,
};

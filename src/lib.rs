//! pharmcalc: pharmaceutical calculations as pure functions.
//!
//! - `units`: mass, volume and concentration conversions
//! - `formulas`: pharmacokinetic, dosage, clinical-score and flow formulas
//! - `distribution`: percentile crossings (D10/D50/D90, T50/T90) on cumulative
//!   particle-size and dissolution curves
//! - `presentation`: significant-digit formatting and interpretation bands
//! - `catalog`: the static list of calculator tools
//!
//! Every calculation takes an immutable input and returns an immutable result;
//! invalid input is reported as [`CalcError::Validation`] before any work is done.

pub mod catalog;
pub mod config;
pub mod distribution;
pub mod error;
pub mod formulas;
pub mod io;
pub mod presentation;
pub mod units;

pub use config::Config;
pub use distribution::{interpolate, Crossing, Distribution, DistributionSample};
pub use error::{CalcError, CalcResult};

use serde::{Deserialize, Serialize};
use std::fmt;
use crate::error::{require_positive, CalcResult};

pub const LAMINAR_LIMIT: f64 = 2300.0;
pub const TURBULENT_LIMIT: f64 = 4000.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FlowRegime {
    Laminar,
    Transitional,
    Turbulent,
}

impl FlowRegime {
    pub fn from_reynolds(re: f64) -> Self {
        if re < LAMINAR_LIMIT {
            FlowRegime::Laminar
        } else if re > TURBULENT_LIMIT {
            FlowRegime::Turbulent
        } else {
            FlowRegime::Transitional
        }
    }
}

impl fmt::Display for FlowRegime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            FlowRegime::Laminar => "laminar",
            FlowRegime::Transitional => "transitional",
            FlowRegime::Turbulent => "turbulent",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ReynoldsResult {
    pub reynolds_number: f64,
    pub regime: FlowRegime,
}

/// Re = ρ v D / μ in SI units: kg/m³, m/s, m, Pa·s.
pub fn reynolds_number(density: f64, velocity: f64, diameter: f64, viscosity: f64) -> CalcResult<ReynoldsResult> {
    let density = require_positive("Density", density)?;
    let velocity = require_positive("Velocity", velocity)?;
    let diameter = require_positive("Characteristic length", diameter)?;
    let viscosity = require_positive("Dynamic viscosity", viscosity)?;

    let re = density * velocity * diameter / viscosity;
    Ok(ReynoldsResult {
        reynolds_number: re,
        regime: FlowRegime::from_reynolds(re),
    })
}

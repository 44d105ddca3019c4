use serde::{Deserialize, Serialize};
use std::f64::consts::LN_2;
use crate::error::{invalid, require_finite, require_non_negative, require_positive, CalcResult};

/// A single concentration-time observation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ConcentrationPoint {
    pub time: f64,
    pub concentration: f64,
}

/// t½ = ln 2 / ke
pub fn half_life(ke: f64) -> CalcResult<f64> {
    let ke = require_positive("Elimination rate constant", ke)?;
    Ok(LN_2 / ke)
}

/// ke = ln 2 / t½
pub fn elimination_rate(half_life: f64) -> CalcResult<f64> {
    let half_life = require_positive("Half-life", half_life)?;
    Ok(LN_2 / half_life)
}

/// ke from two levels drawn `interval` apart on the log-linear decline.
pub fn elimination_rate_from_levels(c1: f64, c2: f64, interval: f64) -> CalcResult<f64> {
    let c1 = require_positive("First concentration", c1)?;
    let c2 = require_positive("Second concentration", c2)?;
    let interval = require_positive("Sampling interval", interval)?;
    if c2 >= c1 {
        return Err(invalid("Second concentration must be lower than the first for elimination"));
    }
    Ok((c1 / c2).ln() / interval)
}

/// CL = ke × Vd
pub fn clearance(ke: f64, volume: f64) -> CalcResult<f64> {
    let ke = require_positive("Elimination rate constant", ke)?;
    let volume = require_positive("Volume of distribution", volume)?;
    Ok(ke * volume)
}

/// Vd = dose / C0
pub fn volume_of_distribution(dose: f64, c0: f64) -> CalcResult<f64> {
    let dose = require_positive("Dose", dose)?;
    let c0 = require_positive("Initial concentration", c0)?;
    Ok(dose / c0)
}

fn require_fraction(name: &str, f: f64) -> CalcResult<f64> {
    require_finite(name, f)?;
    if f <= 0.0 || f > 1.0 {
        return Err(invalid(format!("{} must be in (0, 1] (got {})", name, f)));
    }
    Ok(f)
}

/// Loading dose = C_target × Vd / F
pub fn loading_dose(target_concentration: f64, volume: f64, bioavailability: f64) -> CalcResult<f64> {
    let target = require_positive("Target concentration", target_concentration)?;
    let volume = require_positive("Volume of distribution", volume)?;
    let f = require_fraction("Bioavailability", bioavailability)?;
    Ok(target * volume / f)
}

/// Maintenance dose per interval = Css × CL × τ / F
pub fn maintenance_dose(
    steady_state_concentration: f64,
    clearance: f64,
    interval: f64,
    bioavailability: f64,
) -> CalcResult<f64> {
    let css = require_positive("Steady-state concentration", steady_state_concentration)?;
    let cl = require_positive("Clearance", clearance)?;
    let tau = require_positive("Dosing interval", interval)?;
    let f = require_fraction("Bioavailability", bioavailability)?;
    Ok(css * cl * tau / f)
}

/// Relative (or absolute, against IV) bioavailability from dose-normalised exposures.
pub fn bioavailability(auc_test: f64, dose_test: f64, auc_reference: f64, dose_reference: f64) -> CalcResult<f64> {
    let auc_test = require_non_negative("Test AUC", auc_test)?;
    let dose_test = require_positive("Test dose", dose_test)?;
    let auc_reference = require_positive("Reference AUC", auc_reference)?;
    let dose_reference = require_positive("Reference dose", dose_reference)?;
    Ok((auc_test / dose_test) / (auc_reference / dose_reference))
}

/// C(t) = C0 × e^(−ke·t) for a one-compartment IV bolus.
pub fn concentration_at(c0: f64, ke: f64, time: f64) -> CalcResult<f64> {
    let c0 = require_non_negative("Initial concentration", c0)?;
    let ke = require_positive("Elimination rate constant", ke)?;
    let time = require_non_negative("Time", time)?;
    Ok(c0 * (-ke * time).exp())
}

/// R = 1 / (1 − e^(−ke·τ))
pub fn accumulation_ratio(ke: f64, interval: f64) -> CalcResult<f64> {
    let ke = require_positive("Elimination rate constant", ke)?;
    let tau = require_positive("Dosing interval", interval)?;
    Ok(1.0 / (1.0 - (-ke * tau).exp()))
}

/// Time needed to reach `fraction` of steady state under first-order kinetics.
pub fn time_to_fraction_of_steady_state(half_life: f64, fraction: f64) -> CalcResult<f64> {
    let half_life = require_positive("Half-life", half_life)?;
    require_finite("Fraction of steady state", fraction)?;
    if fraction <= 0.0 || fraction >= 1.0 {
        return Err(invalid("Fraction of steady state must be in (0, 1)"));
    }
    Ok(-(1.0 - fraction).ln() * half_life / LN_2)
}

/// Linear trapezoidal AUC over time-ordered points.
pub fn auc_trapezoidal(points: &[ConcentrationPoint]) -> CalcResult<f64> {
    if points.len() < 2 {
        return Err(invalid("At least two concentration-time points are required for AUC"));
    }

    let mut auc = 0.0;
    for window in points.windows(2) {
        let (a, b) = (window[0], window[1]);
        require_finite("Time", a.time)?;
        require_non_negative("Concentration", a.concentration)?;
        require_non_negative("Concentration", b.concentration)?;
        let dt = b.time - a.time;
        if !dt.is_finite() || dt < 0.0 {
            return Err(invalid("Times must be finite and in ascending order"));
        }
        auc += dt * (a.concentration + b.concentration) / 2.0;
    }

    Ok(auc)
}

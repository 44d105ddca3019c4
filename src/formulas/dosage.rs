use crate::error::{require_positive, CalcResult};

/// Dose in mg for a weight-based prescription (mg/kg × kg).
pub fn weight_based_dose(mg_per_kg: f64, weight_kg: f64) -> CalcResult<f64> {
    let mg_per_kg = require_positive("Dose per kg", mg_per_kg)?;
    let weight = require_positive("Weight", weight_kg)?;
    Ok(mg_per_kg * weight)
}

/// Volume (mL) of a stock solution that delivers `dose_mg`.
pub fn volume_to_administer(dose_mg: f64, stock_mg_per_ml: f64) -> CalcResult<f64> {
    let dose = require_positive("Dose", dose_mg)?;
    let stock = require_positive("Stock concentration", stock_mg_per_ml)?;
    Ok(dose / stock)
}

/// Gravity drip rate in drops per minute.
pub fn drip_rate(volume_ml: f64, drop_factor: f64, time_min: f64) -> CalcResult<f64> {
    let volume = require_positive("Volume", volume_ml)?;
    let drop_factor = require_positive("Drop factor", drop_factor)?; // gtt/mL
    let time = require_positive("Infusion time", time_min)?;
    Ok(volume * drop_factor / time)
}

/// Pump infusion rate in mL/h.
pub fn infusion_rate(volume_ml: f64, time_h: f64) -> CalcResult<f64> {
    let volume = require_positive("Volume", volume_ml)?;
    let time = require_positive("Infusion time", time_h)?;
    Ok(volume / time)
}

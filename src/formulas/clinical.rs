use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use crate::error::{invalid, require_positive, CalcError, CalcResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sex {
    Male,
    Female,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QtcMethod {
    Bazett,
    Fridericia,
    Framingham,
    Hodges,
}

impl QtcMethod {
    pub const ALL: [QtcMethod; 4] = [
        QtcMethod::Bazett,
        QtcMethod::Fridericia,
        QtcMethod::Framingham,
        QtcMethod::Hodges,
    ];
}

impl fmt::Display for QtcMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            QtcMethod::Bazett => "Bazett",
            QtcMethod::Fridericia => "Fridericia",
            QtcMethod::Framingham => "Framingham",
            QtcMethod::Hodges => "Hodges",
        };
        f.write_str(name)
    }
}

impl FromStr for QtcMethod {
    type Err = CalcError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "bazett" => Ok(QtcMethod::Bazett),
            "fridericia" => Ok(QtcMethod::Fridericia),
            "framingham" => Ok(QtcMethod::Framingham),
            "hodges" => Ok(QtcMethod::Hodges),
            _ => Err(invalid(format!("Unknown QTc method: {}", s))),
        }
    }
}

/// RR interval in seconds for a heart rate in beats per minute.
pub fn rr_interval(heart_rate: f64) -> CalcResult<f64> {
    let heart_rate = require_positive("Heart rate", heart_rate)?;
    Ok(60.0 / heart_rate)
}

/// Heart-rate corrected QT interval in ms. `qt_ms` is the measured QT in ms.
pub fn corrected_qt(qt_ms: f64, heart_rate: f64, method: QtcMethod) -> CalcResult<f64> {
    let qt = require_positive("QT interval", qt_ms)?;
    let rr = rr_interval(heart_rate)?;

    let qtc = match method {
        QtcMethod::Bazett => qt / rr.sqrt(),
        QtcMethod::Fridericia => qt / rr.cbrt(),
        QtcMethod::Framingham => qt + 154.0 * (1.0 - rr),
        QtcMethod::Hodges => qt + 1.75 * (heart_rate - 60.0),
    };
    Ok(qtc)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cha2ds2VascInput {
    pub age: u32,
    pub sex: Sex,
    pub congestive_heart_failure: bool,
    pub hypertension: bool,
    pub diabetes: bool,
    pub stroke_or_tia: bool, // includes prior thromboembolism
    pub vascular_disease: bool,
}

/// Stroke risk score for atrial fibrillation, 0 to 9.
pub fn cha2ds2_vasc(input: &Cha2ds2VascInput) -> u8 {
    let age_points = match input.age {
        a if a >= 75 => 2,
        65..=74 => 1,
        _ => 0,
    };

    age_points
        + u8::from(input.congestive_heart_failure)
        + u8::from(input.hypertension)
        + u8::from(input.diabetes)
        + 2 * u8::from(input.stroke_or_tia)
        + u8::from(input.vascular_disease)
        + u8::from(input.sex == Sex::Female)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct HasBledInput {
    pub age: u32,
    pub uncontrolled_hypertension: bool,
    pub abnormal_renal_function: bool,
    pub abnormal_liver_function: bool,
    pub stroke_history: bool,
    pub bleeding_history: bool,
    pub labile_inr: bool,
    pub antiplatelet_or_nsaid: bool,
    pub alcohol_use: bool,
}

/// Major bleeding risk score on anticoagulation, 0 to 9.
pub fn has_bled(input: &HasBledInput) -> u8 {
    [
        input.uncontrolled_hypertension,
        input.abnormal_renal_function,
        input.abnormal_liver_function,
        input.stroke_history,
        input.bleeding_history,
        input.labile_inr,
        input.age > 65,
        input.antiplatelet_or_nsaid,
        input.alcohol_use,
    ]
    .iter()
    .map(|&flag| u8::from(flag))
    .sum()
}

/// Cockcroft–Gault creatinine clearance in mL/min; serum creatinine in mg/dL.
pub fn creatinine_clearance(age: f64, weight_kg: f64, serum_creatinine: f64, sex: Sex) -> CalcResult<f64> {
    let age = require_positive("Age", age)?;
    let weight = require_positive("Weight", weight_kg)?;
    let scr = require_positive("Serum creatinine", serum_creatinine)?;
    if age >= 140.0 {
        return Err(invalid("Age must be below 140 years"));
    }

    let crcl = (140.0 - age) * weight / (72.0 * scr);
    Ok(match sex {
        Sex::Male => crcl,
        Sex::Female => crcl * 0.85,
    })
}

/// Body mass index in kg/m².
pub fn body_mass_index(weight_kg: f64, height_cm: f64) -> CalcResult<f64> {
    let weight = require_positive("Weight", weight_kg)?;
    let height_m = require_positive("Height", height_cm)? / 100.0;
    Ok(weight / (height_m * height_m))
}

/// Mosteller body surface area in m².
pub fn body_surface_area(weight_kg: f64, height_cm: f64) -> CalcResult<f64> {
    let weight = require_positive("Weight", weight_kg)?;
    let height = require_positive("Height", height_cm)?;
    Ok((height * weight / 3600.0).sqrt())
}

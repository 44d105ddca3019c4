//! Fixed-factor unit conversions for mass, volume and concentration.
//!
//! Concentrations are converted through a common mass-per-volume basis (g/L)
//! or a molar basis (mol/L). Crossing between the two needs a molar mass.
//! Parts-per notation follows the dilute aqueous convention: 1 ppm = 1 mg/L.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use crate::error::{require_finite, require_positive, CalcError, CalcResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MassUnit {
    Kilogram,
    Gram,
    Milligram,
    Microgram,
    Nanogram,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VolumeUnit {
    Liter,
    Deciliter,
    Milliliter,
    Microliter,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConcentrationUnit {
    PercentWv, // g per 100 mL
    MgPerMl,
    GPerL,
    MgPerL,
    UgPerMl,
    UgPerL,
    NgPerMl,
    Ppm,
    Ppb,
    Ppt,
    MolPerL,
    MmolPerL,
}

/// How a concentration unit relates to its base.
#[derive(Debug, Clone, Copy, PartialEq)]
enum Basis {
    MassPerVolume(f64), // factor to g/L
    Molar(f64),         // factor to mol/L
}

impl MassUnit {
    pub fn grams(self) -> f64 {
        match self {
            MassUnit::Kilogram => 1e3,
            MassUnit::Gram => 1.0,
            MassUnit::Milligram => 1e-3,
            MassUnit::Microgram => 1e-6,
            MassUnit::Nanogram => 1e-9,
        }
    }

    pub fn symbol(self) -> &'static str {
        match self {
            MassUnit::Kilogram => "kg",
            MassUnit::Gram => "g",
            MassUnit::Milligram => "mg",
            MassUnit::Microgram => "ug",
            MassUnit::Nanogram => "ng",
        }
    }
}

impl VolumeUnit {
    pub fn liters(self) -> f64 {
        match self {
            VolumeUnit::Liter => 1.0,
            VolumeUnit::Deciliter => 0.1,
            VolumeUnit::Milliliter => 1e-3,
            VolumeUnit::Microliter => 1e-6,
        }
    }

    pub fn symbol(self) -> &'static str {
        match self {
            VolumeUnit::Liter => "L",
            VolumeUnit::Deciliter => "dL",
            VolumeUnit::Milliliter => "mL",
            VolumeUnit::Microliter => "uL",
        }
    }
}

impl ConcentrationUnit {
    fn basis(self) -> Basis {
        match self {
            ConcentrationUnit::PercentWv => Basis::MassPerVolume(10.0),
            ConcentrationUnit::MgPerMl | ConcentrationUnit::GPerL => Basis::MassPerVolume(1.0),
            ConcentrationUnit::MgPerL
            | ConcentrationUnit::UgPerMl
            | ConcentrationUnit::Ppm => Basis::MassPerVolume(1e-3),
            ConcentrationUnit::UgPerL
            | ConcentrationUnit::NgPerMl
            | ConcentrationUnit::Ppb => Basis::MassPerVolume(1e-6),
            ConcentrationUnit::Ppt => Basis::MassPerVolume(1e-9),
            ConcentrationUnit::MolPerL => Basis::Molar(1.0),
            ConcentrationUnit::MmolPerL => Basis::Molar(1e-3),
        }
    }

    pub fn is_molar(self) -> bool {
        matches!(self.basis(), Basis::Molar(_))
    }

    pub fn symbol(self) -> &'static str {
        match self {
            ConcentrationUnit::PercentWv => "%w/v",
            ConcentrationUnit::MgPerMl => "mg/mL",
            ConcentrationUnit::GPerL => "g/L",
            ConcentrationUnit::MgPerL => "mg/L",
            ConcentrationUnit::UgPerMl => "ug/mL",
            ConcentrationUnit::UgPerL => "ug/L",
            ConcentrationUnit::NgPerMl => "ng/mL",
            ConcentrationUnit::Ppm => "ppm",
            ConcentrationUnit::Ppb => "ppb",
            ConcentrationUnit::Ppt => "ppt",
            ConcentrationUnit::MolPerL => "mol/L",
            ConcentrationUnit::MmolPerL => "mmol/L",
        }
    }
}

/// Lowercases a symbol; µ, μ and "mc" prefixes all mean micro.
fn normalize_symbol(s: &str) -> String {
    let s = s.trim().to_lowercase().replace(['µ', 'μ'], "u");
    if s.starts_with("mc") {
        format!("u{}", &s[2..])
    } else {
        s
    }
}

impl FromStr for MassUnit {
    type Err = CalcError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize_symbol(s).as_str() {
            "kg" => Ok(MassUnit::Kilogram),
            "g" => Ok(MassUnit::Gram),
            "mg" => Ok(MassUnit::Milligram),
            "ug" => Ok(MassUnit::Microgram),
            "ng" => Ok(MassUnit::Nanogram),
            _ => Err(CalcError::UnknownUnit(s.to_string())),
        }
    }
}

impl FromStr for VolumeUnit {
    type Err = CalcError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize_symbol(s).as_str() {
            "l" => Ok(VolumeUnit::Liter),
            "dl" => Ok(VolumeUnit::Deciliter),
            "ml" | "cc" => Ok(VolumeUnit::Milliliter),
            "ul" => Ok(VolumeUnit::Microliter),
            _ => Err(CalcError::UnknownUnit(s.to_string())),
        }
    }
}

impl FromStr for ConcentrationUnit {
    type Err = CalcError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let unit = match normalize_symbol(s).as_str() {
            "%" | "%w/v" | "percent" => ConcentrationUnit::PercentWv,
            "mg/ml" => ConcentrationUnit::MgPerMl,
            "g/l" => ConcentrationUnit::GPerL,
            "mg/l" => ConcentrationUnit::MgPerL,
            "ug/ml" => ConcentrationUnit::UgPerMl,
            "ug/l" => ConcentrationUnit::UgPerL,
            "ng/ml" => ConcentrationUnit::NgPerMl,
            "ppm" => ConcentrationUnit::Ppm,
            "ppb" => ConcentrationUnit::Ppb,
            "ppt" => ConcentrationUnit::Ppt,
            "mol/l" | "m" => ConcentrationUnit::MolPerL,
            "mmol/l" | "mm" => ConcentrationUnit::MmolPerL,
            _ => return Err(CalcError::UnknownUnit(s.to_string())),
        };
        Ok(unit)
    }
}

/// Any unit the converter understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Unit {
    Mass(MassUnit),
    Volume(VolumeUnit),
    Concentration(ConcentrationUnit),
}

impl Unit {
    pub fn symbol(self) -> &'static str {
        match self {
            Unit::Mass(u) => u.symbol(),
            Unit::Volume(u) => u.symbol(),
            Unit::Concentration(u) => u.symbol(),
        }
    }
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

impl FromStr for Unit {
    type Err = CalcError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        // "m" and "mm" are molarities here, never lengths
        if let Ok(u) = s.parse::<ConcentrationUnit>() {
            return Ok(Unit::Concentration(u));
        }
        if let Ok(u) = s.parse::<MassUnit>() {
            return Ok(Unit::Mass(u));
        }
        if let Ok(u) = s.parse::<VolumeUnit>() {
            return Ok(Unit::Volume(u));
        }
        Err(CalcError::UnknownUnit(s.to_string()))
    }
}

pub fn convert_mass(value: f64, from: MassUnit, to: MassUnit) -> CalcResult<f64> {
    let value = require_finite("value", value)?;
    Ok(value * from.grams() / to.grams())
}

pub fn convert_volume(value: f64, from: VolumeUnit, to: VolumeUnit) -> CalcResult<f64> {
    let value = require_finite("value", value)?;
    Ok(value * from.liters() / to.liters())
}

/// Converts a concentration. `molar_mass` (g/mol) is required only when one
/// side is molar and the other is mass-based.
pub fn convert_concentration(
    value: f64,
    from: ConcentrationUnit,
    to: ConcentrationUnit,
    molar_mass: Option<f64>,
) -> CalcResult<f64> {
    let value = require_finite("value", value)?;

    let converted = match (from.basis(), to.basis()) {
        (Basis::MassPerVolume(a), Basis::MassPerVolume(b)) => value * a / b,
        (Basis::Molar(a), Basis::Molar(b)) => value * a / b,
        (Basis::Molar(a), Basis::MassPerVolume(b)) => {
            let mw = require_molar_mass(molar_mass)?;
            value * a * mw / b
        }
        (Basis::MassPerVolume(a), Basis::Molar(b)) => {
            let mw = require_molar_mass(molar_mass)?;
            value * a / mw / b
        }
    };

    Ok(converted)
}

fn require_molar_mass(molar_mass: Option<f64>) -> CalcResult<f64> {
    match molar_mass {
        Some(mw) => require_positive("Molar mass", mw),
        None => Err(CalcError::Validation(
            "Molar mass is required to convert between molar and mass concentrations".to_string()
        )),
    }
}

/// Converts between any two units of the same kind.
pub fn convert(value: f64, from: Unit, to: Unit, molar_mass: Option<f64>) -> CalcResult<f64> {
    match (from, to) {
        (Unit::Mass(a), Unit::Mass(b)) => convert_mass(value, a, b),
        (Unit::Volume(a), Unit::Volume(b)) => convert_volume(value, a, b),
        (Unit::Concentration(a), Unit::Concentration(b)) => {
            convert_concentration(value, a, b, molar_mass)
        }
        _ => Err(CalcError::IncompatibleUnits {
            from: from.to_string(),
            to: to.to_string(),
        }),
    }
}

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use log::{debug, info, warn};
use crate::config::DistributionConfig;
use crate::error::{invalid, require_non_negative, require_percent, require_positive, CalcError, CalcResult};
use super::{Crossing, Distribution, DistributionSample};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MeasurementMode {
    Sieve,            // percent retained on each sieve
    LaserDiffraction, // volume percent per size bin
}

impl FromStr for MeasurementMode {
    type Err = CalcError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "sieve" => Ok(MeasurementMode::Sieve),
            "laser" | "laser_diffraction" | "laser-diffraction" => Ok(MeasurementMode::LaserDiffraction),
            _ => Err(invalid(format!("Unknown measurement mode: {}", s))),
        }
    }
}

/// One user-entered row: a sieve aperture (or bin size) and its percent.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SieveRow {
    pub size: f64,    // µm
    pub percent: f64, // retained on the sieve, or volume percent in the bin
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParticleSizeInput {
    pub mode: MeasurementMode,
    pub rows: Vec<SieveRow>,
    pub density: Option<f64>, // true density, g/cm³
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum MeanDiameter {
    Geometric(f64),      // sqrt(D10 × D90)
    VolumeWeighted(f64), // Σ size × percent / 100
}

impl MeanDiameter {
    pub fn value(&self) -> f64 {
        match *self {
            MeanDiameter::Geometric(v) | MeanDiameter::VolumeWeighted(v) => v,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DistributionClass {
    Narrow,
    Moderate,
    Broad,
}

impl DistributionClass {
    pub fn from_span(span: f64) -> Self {
        if span < 1.0 {
            DistributionClass::Narrow
        } else if span > 2.0 {
            DistributionClass::Broad
        } else {
            DistributionClass::Moderate
        }
    }
}

impl fmt::Display for DistributionClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            DistributionClass::Narrow => "narrow",
            DistributionClass::Moderate => "moderate",
            DistributionClass::Broad => "broad",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ParticleSizeReport {
    pub mode: MeasurementMode,
    pub total_percent: f64,
    pub d10: Crossing,
    pub d50: Crossing,
    pub d90: Crossing,
    pub span: f64,
    pub mean_diameter: MeanDiameter,
    pub specific_surface_area: Option<f64>, // m²/kg
    pub class: DistributionClass,
    pub cumulative_undersize: Vec<DistributionSample>,
}

/// Sums the per-row percentages and rejects totals further than
/// `tolerance` percentage points from 100.
pub fn check_total(rows: &[SieveRow], tolerance: f64) -> CalcResult<f64> {
    let tolerance = require_non_negative("Total tolerance", tolerance)?;
    let total: f64 = rows.iter().map(|r| r.percent).sum();
    if (total - 100.0).abs() > tolerance {
        return Err(invalid(format!(
            "Percentages total {:.1}%, which deviates from 100% by more than {}%",
            total, tolerance
        )));
    }
    Ok(total)
}

fn validate_rows(rows: &[SieveRow]) -> CalcResult<()> {
    if rows.len() < 2 {
        return Err(invalid(format!(
            "At least two size rows are required (got {})",
            rows.len()
        )));
    }

    for row in rows {
        require_non_negative("Particle size", row.size)?;
        require_percent("Size fraction percent", row.percent)?;
    }

    Ok(())
}

/// Converts per-row percentages into a cumulative undersize curve ordered by
/// ascending size.
pub fn cumulative_undersize(rows: &[SieveRow], mode: MeasurementMode) -> CalcResult<Vec<DistributionSample>> {
    validate_rows(rows)?;

    let mut sorted = rows.to_vec();
    sorted.sort_by(|a, b| a.size.total_cmp(&b.size));
    if sorted.windows(2).any(|w| w[0].size == w[1].size) {
        return Err(invalid("Each size may appear only once"));
    }

    let curve = match mode {
        MeasurementMode::Sieve => {
            // Material retained on a sieve and every coarser sieve is oversize.
            let mut retained = 0.0;
            let mut curve: Vec<DistributionSample> = sorted
                .iter()
                .rev()
                .map(|row| {
                    retained += row.percent;
                    DistributionSample::new(row.size, (100.0 - retained).clamp(0.0, 100.0))
                })
                .collect();
            curve.reverse();
            curve
        }
        MeasurementMode::LaserDiffraction => {
            let mut passing = 0.0;
            sorted
                .iter()
                .map(|row| {
                    passing += row.percent;
                    DistributionSample::new(row.size, passing.clamp(0.0, 100.0))
                })
                .collect()
        }
    };

    Ok(curve)
}

/// (D90 − D10) / D50
pub fn span(d10: f64, d50: f64, d90: f64) -> CalcResult<f64> {
    if d50 <= 0.0 {
        return Err(invalid("D50 must be positive to compute span"));
    }
    Ok((d90 - d10) / d50)
}

pub fn geometric_mean_diameter(d10: f64, d90: f64) -> f64 {
    (d10 * d90).sqrt()
}

pub fn volume_weighted_mean(rows: &[SieveRow]) -> f64 {
    rows.iter().map(|r| r.size * r.percent).sum::<f64>() / 100.0
}

/// Specific surface area in m²/kg for spheres of diameter D50 (µm) at
/// `density` (g/cm³).
pub fn specific_surface_area(density: f64, d50: f64) -> CalcResult<f64> {
    let density = require_positive("Density", density)?;
    let d50 = require_positive("D50", d50)?;
    Ok(6.0 / (density * (d50 / 1000.0)) * 1000.0)
}

pub fn analyze(input: &ParticleSizeInput, config: &DistributionConfig) -> CalcResult<ParticleSizeReport> {
    validate_rows(&input.rows)?;
    let total_percent = check_total(&input.rows, config.total_tolerance)?;
    if let Some(density) = input.density {
        require_positive("Density", density)?;
    }

    let curve = cumulative_undersize(&input.rows, input.mode)?;
    let distribution = Distribution::new(curve)?;

    let d10 = distribution.interpolate(10.0)?;
    let d50 = distribution.interpolate(50.0)?;
    let d90 = distribution.interpolate(90.0)?;
    debug!("D10 = {:?}, D50 = {:?}, D90 = {:?}", d10, d50, d90);
    if d10.is_clamped() || d50.is_clamped() || d90.is_clamped() {
        warn!("Size rows do not cover the 10-90% range; boundary sizes were used");
    }

    let span = span(d10.value(), d50.value(), d90.value())?;
    let mean_diameter = match input.mode {
        MeasurementMode::Sieve => MeanDiameter::Geometric(geometric_mean_diameter(d10.value(), d90.value())),
        MeasurementMode::LaserDiffraction => MeanDiameter::VolumeWeighted(volume_weighted_mean(&input.rows)),
    };
    let specific_surface_area = input
        .density
        .map(|density| specific_surface_area(density, d50.value()))
        .transpose()?;

    let class = DistributionClass::from_span(span);
    info!("Particle size analysis complete: D50 {:.3} µm, span {:.3} ({})", d50.value(), span, class);

    Ok(ParticleSizeReport {
        mode: input.mode,
        total_percent,
        d10,
        d50,
        d90,
        span,
        mean_diameter,
        specific_surface_area,
        class,
        cumulative_undersize: distribution.samples().to_vec(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::distribution::Side;
    use approx::assert_relative_eq;

    fn rows(pairs: &[(f64, f64)]) -> Vec<SieveRow> {
        pairs.iter().map(|&(size, percent)| SieveRow { size, percent }).collect()
    }

    fn sieve_input() -> ParticleSizeInput {
        ParticleSizeInput {
            mode: MeasurementMode::Sieve,
            rows: rows(&[(500.0, 10.0), (250.0, 30.0), (125.0, 40.0), (0.0, 20.0)]),
            density: Some(1.5),
        }
    }

    #[test]
    fn test_sieve_cumulative_undersize() {
        let curve = cumulative_undersize(&sieve_input().rows, MeasurementMode::Sieve).unwrap();
        let expected = [(0.0, 0.0), (125.0, 20.0), (250.0, 60.0), (500.0, 90.0)];
        assert_eq!(curve.len(), expected.len());
        for (sample, &(size, percent)) in curve.iter().zip(expected.iter()) {
            assert_relative_eq!(sample.x, size);
            assert_relative_eq!(sample.percent, percent, epsilon = 1e-9);
        }
    }

    #[test]
    fn test_sieve_analysis() {
        let report = analyze(&sieve_input(), &DistributionConfig::default()).unwrap();
        assert_relative_eq!(report.d10.value(), 62.5, epsilon = 1e-9);
        assert_relative_eq!(report.d50.value(), 218.75, epsilon = 1e-9);
        assert_relative_eq!(report.d90.value(), 500.0, epsilon = 1e-9);
        assert!(!report.d90.is_clamped());
        assert_relative_eq!(report.span, 2.0, epsilon = 1e-9);
        assert_eq!(report.class, DistributionClass::Moderate);
        assert_relative_eq!(report.mean_diameter.value(), 31250.0f64.sqrt(), epsilon = 1e-9);
        assert_relative_eq!(report.specific_surface_area.unwrap(), 6.0 / (1.5 * 0.21875) * 1000.0, epsilon = 1e-6);
    }

    #[test]
    fn test_laser_diffraction_analysis() {
        let input = ParticleSizeInput {
            mode: MeasurementMode::LaserDiffraction,
            rows: rows(&[(100.0, 30.0), (10.0, 20.0), (50.0, 50.0)]),
            density: None,
        };
        let report = analyze(&input, &DistributionConfig::default()).unwrap();
        // first bin already holds 20%, so D10 falls back to the smallest size
        assert_eq!(report.d10, Crossing::Clamped { value: 10.0, side: Side::Below });
        assert_relative_eq!(report.d50.value(), 34.0, epsilon = 1e-9);
        assert_relative_eq!(report.d90.value(), 50.0 + 20.0 / 30.0 * 50.0, epsilon = 1e-9);
        assert_eq!(report.mean_diameter, MeanDiameter::VolumeWeighted(57.0));
        assert!(report.specific_surface_area.is_none());
    }

    #[test]
    fn test_total_outside_tolerance_rejected() {
        let input = ParticleSizeInput {
            mode: MeasurementMode::Sieve,
            rows: rows(&[(500.0, 20.0), (250.0, 40.0), (125.0, 30.0), (0.0, 20.0)]),
            density: None,
        };
        let err = analyze(&input, &DistributionConfig::default()).unwrap_err();
        assert!(matches!(err, CalcError::Validation(ref msg) if msg.contains("110.0%")));
    }

    #[test]
    fn test_total_within_tolerance_accepted() {
        let input = ParticleSizeInput {
            mode: MeasurementMode::Sieve,
            rows: rows(&[(500.0, 10.0), (250.0, 30.0), (125.0, 40.0), (0.0, 17.0)]),
            density: None,
        };
        let report = analyze(&input, &DistributionConfig::default()).unwrap();
        assert_relative_eq!(report.total_percent, 97.0);

        let strict = DistributionConfig { total_tolerance: 1.0, ..DistributionConfig::default() };
        assert!(analyze(&input, &strict).is_err());
    }

    #[test]
    fn test_tolerance_boundary() {
        let at_limit = rows(&[(250.0, 60.0), (0.0, 45.0)]);
        assert_relative_eq!(check_total(&at_limit, 5.0).unwrap(), 105.0);

        let past_limit = rows(&[(250.0, 60.0), (0.0, 45.1)]);
        let err = check_total(&past_limit, 5.0).unwrap_err();
        assert!(matches!(err, CalcError::Validation(ref msg) if msg.contains("105.1%")));
    }

    #[test]
    fn test_unusable_tolerance_rejected() {
        let input = ParticleSizeInput {
            mode: MeasurementMode::Sieve,
            rows: rows(&[(500.0, 100.0), (0.0, 100.0)]),
            density: None,
        };
        let nan = DistributionConfig { total_tolerance: f64::NAN, ..DistributionConfig::default() };
        assert!(matches!(analyze(&input, &nan), Err(CalcError::Validation(_))));

        let negative = DistributionConfig { total_tolerance: -1.0, ..DistributionConfig::default() };
        assert!(matches!(analyze(&input, &negative), Err(CalcError::Validation(_))));
        assert!(check_total(&sieve_input().rows, f64::INFINITY).is_err());
    }

    #[test]
    fn test_single_row_rejected() {
        let input = ParticleSizeInput {
            mode: MeasurementMode::Sieve,
            rows: rows(&[(250.0, 100.0)]),
            density: None,
        };
        assert!(matches!(analyze(&input, &DistributionConfig::default()), Err(CalcError::Validation(_))));
    }

    #[test]
    fn test_duplicate_sizes_rejected() {
        let result = cumulative_undersize(&rows(&[(250.0, 50.0), (250.0, 50.0)]), MeasurementMode::Sieve);
        assert!(result.is_err());
    }

    #[test]
    fn test_span_and_class() {
        let s = span(50.0, 100.0, 200.0).unwrap();
        assert_relative_eq!(s, 1.5);
        assert_eq!(DistributionClass::from_span(s), DistributionClass::Moderate);
        assert_eq!(DistributionClass::from_span(0.8), DistributionClass::Narrow);
        assert_eq!(DistributionClass::from_span(2.5), DistributionClass::Broad);
        assert!(span(50.0, 0.0, 200.0).is_err());
    }

    #[test]
    fn test_density_must_be_positive() {
        let input = ParticleSizeInput { density: Some(0.0), ..sieve_input() };
        assert!(analyze(&input, &DistributionConfig::default()).is_err());
    }

    #[test]
    fn test_mode_parse() {
        assert_eq!("laser".parse::<MeasurementMode>().unwrap(), MeasurementMode::LaserDiffraction);
        assert!("sedigraph".parse::<MeasurementMode>().is_err());
    }
}

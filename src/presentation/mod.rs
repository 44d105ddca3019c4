//! Number formatting, interpretation bands and plain-text rendering of reports.

pub mod bands;

use std::fmt;
use crate::config::FormatConfig;
use crate::distribution::{
    Crossing, DissolutionReport, MeanDiameter, ParticleSizeReport, Side, SimilarityReport,
};

pub use bands::*;

/// Rounds to `digits` significant figures. Zero and non-finite values pass through.
pub fn round_significant(value: f64, digits: usize) -> f64 {
    if value == 0.0 || !value.is_finite() || digits == 0 {
        return value;
    }
    let magnitude = value.abs().log10().floor() as i32;
    let exponent = digits as i32 - 1 - magnitude;
    // negative powers of ten are inexact, so divide by the positive power instead
    if exponent >= 0 {
        let factor = 10f64.powi(exponent);
        (value * factor).round() / factor
    } else {
        let factor = 10f64.powi(-exponent);
        (value / factor).round() * factor
    }
}

/// Fixed-point rendering with `digits` significant figures.
pub fn format_significant(value: f64, digits: usize) -> String {
    if !value.is_finite() {
        return "undefined".to_string();
    }
    let rounded = round_significant(value, digits);
    if rounded == 0.0 {
        return "0".to_string();
    }
    let magnitude = rounded.abs().log10().floor() as i32;
    let decimals = (digits as i32 - 1 - magnitude).max(0) as usize;
    format!("{:.*}", decimals, rounded)
}

/// Fixed-point inside the configured window, scientific notation outside it.
pub fn format_value(value: f64, config: &FormatConfig) -> String {
    if !value.is_finite() {
        return "undefined".to_string();
    }
    let magnitude = value.abs();
    if magnitude >= config.sci_upper || (magnitude > 0.0 && magnitude < config.sci_lower) {
        let precision = config.significant_digits.saturating_sub(1);
        format!("{:.*e}", precision, value)
    } else {
        format_significant(value, config.significant_digits)
    }
}

/// Crossings that fell back to a boundary are marked with `<` or `>`.
pub fn format_crossing(crossing: &Crossing, config: &FormatConfig) -> String {
    match *crossing {
        Crossing::Interpolated { value } => format_value(value, config),
        Crossing::Clamped { value, side: Side::Below } => format!("< {}", format_value(value, config)),
        Crossing::Clamped { value, side: Side::Above } => format!("> {}", format_value(value, config)),
    }
}

/// A report paired with the number format it should be printed with.
#[derive(Debug, Clone, Copy)]
pub struct Formatted<'a, R> {
    pub report: &'a R,
    pub config: &'a FormatConfig,
}

pub fn formatted<'a, R>(report: &'a R, config: &'a FormatConfig) -> Formatted<'a, R> {
    Formatted { report, config }
}

impl fmt::Display for Formatted<'_, ParticleSizeReport> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (report, config) = (self.report, self.config);
        writeln!(f, "Particle size distribution ({:?})", report.mode)?;
        writeln!(f, "  Total:  {} %", format_value(report.total_percent, config))?;
        writeln!(f, "  D10:    {} µm", format_crossing(&report.d10, config))?;
        writeln!(f, "  D50:    {} µm", format_crossing(&report.d50, config))?;
        writeln!(f, "  D90:    {} µm", format_crossing(&report.d90, config))?;
        writeln!(f, "  Span:   {} ({})", format_value(report.span, config), report.class)?;
        let mean_label = match report.mean_diameter {
            MeanDiameter::Geometric(_) => "Geometric mean diameter",
            MeanDiameter::VolumeWeighted(_) => "Volume-weighted mean",
        };
        writeln!(f, "  {}: {} µm", mean_label, format_value(report.mean_diameter.value(), config))?;
        if let Some(ssa) = report.specific_surface_area {
            writeln!(f, "  Specific surface area: {} m²/kg", format_value(ssa, config))?;
        }
        Ok(())
    }
}

impl fmt::Display for Formatted<'_, DissolutionReport> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (report, config) = (self.report, self.config);
        writeln!(f, "Dissolution profile ({} points)", report.points)?;
        writeln!(
            f,
            "  Released: {} % at {} min",
            format_value(report.max_dissolved, config),
            format_value(report.final_time, config)
        )?;
        for t in &report.times {
            writeln!(f, "  T{}: {} min", t.target, format_crossing(&t.time, config))?;
        }
        writeln!(f, "  Dissolution efficiency: {} %", format_value(report.dissolution_efficiency, config))
    }
}

impl fmt::Display for Formatted<'_, SimilarityReport> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (report, config) = (self.report, self.config);
        writeln!(f, "Profile comparison")?;
        writeln!(f, "  f1: {}", format_value(report.f1, config))?;
        writeln!(
            f,
            "  f2: {} ({})",
            format_value(report.f2, config),
            if report.similar { "similar" } else { "not similar" }
        )
    }
}

// Plain `Display` uses the default number format.
macro_rules! display_with_default_format {
    ($($report:ty),*) => {
        $(
            impl fmt::Display for $report {
                fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                    fmt::Display::fmt(&formatted(self, &FormatConfig::default()), f)
                }
            }
        )*
    };
}

display_with_default_format!(ParticleSizeReport, DissolutionReport, SimilarityReport);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::distribution::TimeToPercent;

    #[test]
    fn test_round_significant() {
        assert_eq!(round_significant(172.54, 4), 172.5);
        assert_eq!(round_significant(0.0123456, 3), 0.0123);
        assert_eq!(round_significant(98765.0, 2), 99000.0);
        assert_eq!(round_significant(0.0, 4), 0.0);
    }

    #[test]
    fn test_format_significant() {
        assert_eq!(format_significant(13.571428, 4), "13.57");
        assert_eq!(format_significant(172.5, 4), "172.5");
        assert_eq!(format_significant(9.9996, 4), "10.00");
        assert_eq!(format_significant(1500.0, 2), "1500");
        assert_eq!(format_significant(-0.5, 2), "-0.50");
        assert_eq!(format_significant(0.0, 4), "0");
        assert_eq!(format_significant(f64::NAN, 4), "undefined");
    }

    #[test]
    fn test_format_value_switches_to_scientific() {
        let config = FormatConfig::default();
        assert_eq!(format_value(2_500_000.0, &config), "2.500e6");
        assert_eq!(format_value(0.00042, &config), "4.200e-4");
        assert_eq!(format_value(0.5, &config), "0.5000");
        assert_eq!(format_value(0.0, &config), "0");
        assert_eq!(format_value(f64::INFINITY, &config), "undefined");
    }

    #[test]
    fn test_format_crossing() {
        let config = FormatConfig::default();
        assert_eq!(format_crossing(&Crossing::Interpolated { value: 172.5 }, &config), "172.5");
        assert_eq!(format_crossing(&Crossing::Clamped { value: 60.0, side: Side::Above }, &config), "> 60.00");
        assert_eq!(format_crossing(&Crossing::Clamped { value: 10.0, side: Side::Below }, &config), "< 10.00");
    }

    #[test]
    fn test_display_similarity() {
        let report = SimilarityReport { f1: 0.0, f2: 100.0, similar: true };
        assert_eq!(report.to_string(), "Profile comparison\n  f1: 0\n  f2: 100.0 (similar)\n");

        let two_digits = FormatConfig { significant_digits: 2, ..FormatConfig::default() };
        assert!(formatted(&report, &two_digits).to_string().contains("f2: 100 (similar)"));
    }

    #[test]
    fn test_display_dissolution_marks_unreached_targets() {
        let report = DissolutionReport {
            points: 3,
            final_time: 30.0,
            max_dissolved: 70.0,
            times: vec![
                TimeToPercent { target: 50.0, time: Crossing::Interpolated { value: 12.5 } },
                TimeToPercent { target: 90.0, time: Crossing::Clamped { value: 30.0, side: Side::Above } },
            ],
            dissolution_efficiency: 41.25,
        };
        let text = report.to_string();
        assert!(text.contains("  T50: 12.50 min"), "{}", text);
        assert!(text.contains("  T90: > 30.00 min"), "{}", text);
        assert!(text.contains("Dissolution efficiency: 41.25 %"), "{}", text);
    }
}

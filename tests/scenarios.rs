use approx::assert_relative_eq;
use pharmcalc::config::DistributionConfig;
use pharmcalc::distribution::{
    self, DistributionClass, MeasurementMode, ParticleSizeInput, ProfilePoint, SieveRow,
};
use pharmcalc::{interpolate, CalcError, Distribution, DistributionSample};

fn samples(pairs: &[(f64, f64)]) -> Vec<DistributionSample> {
    pairs.iter().copied().map(DistributionSample::from).collect()
}

#[test]
fn sieve_series_d50_lies_between_180_and_150() {
    let series = samples(&[
        (850.0, 0.0),
        (425.0, 5.0),
        (250.0, 20.0),
        (180.0, 45.0),
        (150.0, 65.0),
        (75.0, 80.0),
        (0.0, 100.0),
    ]);
    let d50 = interpolate(&series, 50.0).unwrap().value();
    assert!(d50 > 150.0 && d50 < 180.0);
    assert_relative_eq!(d50, 172.5, epsilon = 1e-9);
}

#[test]
fn dissolution_t50() {
    let profile: Vec<ProfilePoint> = [(0.0, 0.0), (5.0, 5.0), (10.0, 25.0), (15.0, 60.0), (20.0, 85.0), (30.0, 98.0)]
        .iter()
        .map(|&(time, percent)| ProfilePoint { time, percent })
        .collect();
    let t50 = distribution::dissolution::time_to_percent(&profile, 50.0).unwrap();
    assert_relative_eq!(t50.value(), 13.57, epsilon = 5e-3);
}

#[test]
fn span_classification() {
    let span = distribution::particle::span(50.0, 100.0, 200.0).unwrap();
    assert_relative_eq!(span, 1.5);
    assert_eq!(DistributionClass::from_span(span), DistributionClass::Moderate);
}

#[test]
fn retained_total_of_110_percent_is_rejected() {
    let input = ParticleSizeInput {
        mode: MeasurementMode::Sieve,
        rows: vec![
            SieveRow { size: 500.0, percent: 30.0 },
            SieveRow { size: 250.0, percent: 40.0 },
            SieveRow { size: 0.0, percent: 40.0 },
        ],
        density: None,
    };
    let result = distribution::particle::analyze(&input, &DistributionConfig::default());
    assert!(matches!(result, Err(CalcError::Validation(_))));
}

#[test]
fn single_sample_is_rejected_before_interpolation() {
    let result = interpolate(&samples(&[(100.0, 50.0)]), 50.0);
    assert!(matches!(result, Err(CalcError::Validation(_))));

    let input = ParticleSizeInput {
        mode: MeasurementMode::LaserDiffraction,
        rows: vec![SieveRow { size: 100.0, percent: 100.0 }],
        density: None,
    };
    let result = distribution::particle::analyze(&input, &DistributionConfig::default());
    assert!(matches!(result, Err(CalcError::Validation(_))));
}

#[test]
fn exact_step_returns_step_size() {
    let step = samples(&[(0.0, 0.0), (100.0, 50.0), (1000.0, 100.0)]);
    assert_eq!(interpolate(&step, 50.0).unwrap().value(), 100.0);
}

#[test]
fn percentiles_are_ordered_on_increasing_curves() {
    let input = ParticleSizeInput {
        mode: MeasurementMode::Sieve,
        rows: vec![
            SieveRow { size: 710.0, percent: 2.0 },
            SieveRow { size: 355.0, percent: 18.0 },
            SieveRow { size: 250.0, percent: 30.0 },
            SieveRow { size: 180.0, percent: 25.0 },
            SieveRow { size: 90.0, percent: 15.0 },
            SieveRow { size: 0.0, percent: 10.0 },
        ],
        density: Some(1.4),
    };
    let report = distribution::particle::analyze(&input, &DistributionConfig::default()).unwrap();
    let curve = Distribution::new(report.cumulative_undersize.clone()).unwrap();

    let p0 = curve.percentile(0.0).unwrap();
    let p100 = curve.percentile(100.0).unwrap();
    let (d10, d50, d90) = (report.d10.value(), report.d50.value(), report.d90.value());
    assert!(p0 <= d10 && d10 <= d50 && d50 <= d90 && d90 <= p100);
    assert!(report.specific_surface_area.unwrap() > 0.0);
}

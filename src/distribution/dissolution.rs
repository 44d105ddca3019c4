use serde::{Deserialize, Serialize};
use log::{debug, info};
use crate::config::DistributionConfig;
use crate::error::{invalid, require_non_negative, require_percent, CalcResult};
use super::{Crossing, Distribution, DistributionSample};

/// Profiles are considered similar at or above this f2.
pub const F2_SIMILARITY_THRESHOLD: f64 = 50.0;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ProfilePoint {
    pub time: f64,    // minutes
    pub percent: f64, // cumulative percent dissolved
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TimeToPercent {
    pub target: f64,
    pub time: Crossing,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DissolutionReport {
    pub points: usize,
    pub final_time: f64,
    pub max_dissolved: f64,
    pub times: Vec<TimeToPercent>,
    pub dissolution_efficiency: f64, // percent
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SimilarityReport {
    pub f1: f64,
    pub f2: f64,
    pub similar: bool,
}

/// Sorts a profile by time and checks that release never goes backwards.
fn ordered_profile(points: &[ProfilePoint]) -> CalcResult<Vec<ProfilePoint>> {
    if points.len() < 2 {
        return Err(invalid(format!(
            "At least two profile points are required (got {})",
            points.len()
        )));
    }

    for point in points {
        require_non_negative("Time", point.time)?;
        require_percent("Percent dissolved", point.percent)?;
    }

    let mut ordered = points.to_vec();
    ordered.sort_by(|a, b| a.time.total_cmp(&b.time));

    for window in ordered.windows(2) {
        if window[0].time == window[1].time {
            return Err(invalid(format!("Time {} appears more than once", window[0].time)));
        }
        if window[1].percent < window[0].percent {
            return Err(invalid(format!(
                "Percent dissolved drops from {} to {} between t = {} and t = {}",
                window[0].percent, window[1].percent, window[0].time, window[1].time
            )));
        }
    }

    Ok(ordered)
}

pub fn profile_distribution(points: &[ProfilePoint]) -> CalcResult<Distribution> {
    let ordered = ordered_profile(points)?;
    Distribution::new(
        ordered
            .iter()
            .map(|p| DistributionSample::new(p.time, p.percent))
            .collect(),
    )
}

/// Time at which the profile crosses `target` percent dissolved (T50, T90, ...).
pub fn time_to_percent(points: &[ProfilePoint], target: f64) -> CalcResult<Crossing> {
    profile_distribution(points)?.interpolate(target)
}

/// Area under the profile up to the last point, relative to the rectangle
/// of 100% release over the same time.
pub fn dissolution_efficiency(points: &[ProfilePoint]) -> CalcResult<f64> {
    let ordered = ordered_profile(points)?;
    let first = ordered[0].time;
    let last = ordered[ordered.len() - 1].time;

    let mut area = first * ordered[0].percent / 2.0; // from the origin
    for window in ordered.windows(2) {
        area += (window[1].time - window[0].time) * (window[0].percent + window[1].percent) / 2.0;
    }

    Ok(area / (100.0 * last) * 100.0)
}

pub fn analyze(points: &[ProfilePoint], config: &DistributionConfig) -> CalcResult<DissolutionReport> {
    let ordered = ordered_profile(points)?;
    let distribution = profile_distribution(&ordered)?;

    let mut times = Vec::with_capacity(config.dissolution_targets.len());
    for &target in &config.dissolution_targets {
        let time = distribution.interpolate(target)?;
        debug!("T{} = {:?}", target, time);
        times.push(TimeToPercent { target, time });
    }

    let last = ordered[ordered.len() - 1];
    let report = DissolutionReport {
        points: ordered.len(),
        final_time: last.time,
        max_dissolved: last.percent,
        times,
        dissolution_efficiency: dissolution_efficiency(&ordered)?,
    };
    info!(
        "Dissolution profile analyzed: {} points, {:.1}% released by t = {}",
        report.points, report.max_dissolved, report.final_time
    );
    Ok(report)
}

/// Difference (f1) and similarity (f2) factors between two profiles sampled
/// at the same times.
pub fn similarity(reference: &[ProfilePoint], test: &[ProfilePoint]) -> CalcResult<SimilarityReport> {
    let reference = ordered_profile(reference)?;
    let test = ordered_profile(test)?;

    if reference.len() != test.len() {
        return Err(invalid(format!(
            "Reference has {} points but test has {}",
            reference.len(),
            test.len()
        )));
    }
    if reference.len() < 3 {
        return Err(invalid("At least three time points are required to compare profiles"));
    }
    if reference.iter().zip(&test).any(|(r, t)| r.time != t.time) {
        return Err(invalid("Reference and test profiles must be sampled at the same times"));
    }

    let n = reference.len() as f64;
    let sum_reference: f64 = reference.iter().map(|p| p.percent).sum();
    if sum_reference <= 0.0 {
        return Err(invalid("Reference profile releases nothing"));
    }

    let sum_abs: f64 = reference.iter().zip(&test).map(|(r, t)| (r.percent - t.percent).abs()).sum();
    let sum_sq: f64 = reference.iter().zip(&test).map(|(r, t)| (r.percent - t.percent).powi(2)).sum();

    let f1 = sum_abs / sum_reference * 100.0;
    let f2 = 50.0 * (100.0 / (1.0 + sum_sq / n).sqrt()).log10();

    Ok(SimilarityReport {
        f1,
        f2,
        similar: f2 >= F2_SIMILARITY_THRESHOLD,
    })
}

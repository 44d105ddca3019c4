//! Percentile crossings on cumulative distributions.
//!
//! A [`Distribution`] is a validated, monotonic series of cumulative percents
//! against an independent variable (particle size, dissolution time). The
//! interpolator walks adjacent samples from low to high cumulative percent and
//! linearly interpolates the first pair that brackets the target. Targets
//! outside the covered percent range fall back to the nearest boundary sample
//! and are reported as [`Crossing::Clamped`].

pub mod particle;
pub mod dissolution;

use serde::{Deserialize, Serialize};
use log::{debug, warn};
use crate::error::{invalid, require_non_negative, require_percent, CalcResult};

pub use particle::{
    DistributionClass, MeanDiameter, MeasurementMode, ParticleSizeInput, ParticleSizeReport, SieveRow,
};
pub use dissolution::{DissolutionReport, ProfilePoint, SimilarityReport, TimeToPercent};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DistributionSample {
    pub x: f64,       // size in µm or time in minutes
    pub percent: f64, // cumulative percent, 0-100
}

impl DistributionSample {
    pub fn new(x: f64, percent: f64) -> Self {
        Self { x, percent }
    }
}

impl From<(f64, f64)> for DistributionSample {
    fn from((x, percent): (f64, f64)) -> Self {
        Self { x, percent }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Below, // target under the lowest cumulative percent
    Above, // target over the highest cumulative percent
}

/// Where a cumulative curve crosses a target percent.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Crossing {
    Interpolated { value: f64 },
    Clamped { value: f64, side: Side },
}

impl Crossing {
    pub fn value(&self) -> f64 {
        match *self {
            Crossing::Interpolated { value } | Crossing::Clamped { value, .. } => value,
        }
    }

    pub fn is_clamped(&self) -> bool {
        matches!(self, Crossing::Clamped { .. })
    }

    /// The value only if the curve actually reaches the target.
    pub fn reached(&self) -> Option<f64> {
        match *self {
            Crossing::Interpolated { value } => Some(value),
            Crossing::Clamped { .. } => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Distribution {
    samples: Vec<DistributionSample>, // ordered by non-decreasing percent
}

impl Distribution {
    /// Validates `samples` and stores them walking from low to high percent.
    ///
    /// The percents must be monotonic in the order given, either entirely
    /// non-decreasing or entirely non-increasing.
    pub fn new(samples: Vec<DistributionSample>) -> CalcResult<Self> {
        if samples.len() < 2 {
            return Err(invalid(format!(
                "At least two samples are required to interpolate (got {})",
                samples.len()
            )));
        }

        for sample in &samples {
            require_non_negative("Independent variable", sample.x)?;
            require_percent("Cumulative percent", sample.percent)?;
        }

        let ascending = samples.windows(2).all(|w| w[0].percent <= w[1].percent);
        let descending = samples.windows(2).all(|w| w[0].percent >= w[1].percent);

        let mut samples = samples;
        if !ascending {
            if !descending {
                return Err(invalid("Cumulative percentages must be monotonic"));
            }
            samples.reverse();
        }

        Ok(Self { samples })
    }

    pub fn samples(&self) -> &[DistributionSample] {
        &self.samples
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Lowest and highest cumulative percent covered.
    pub fn coverage(&self) -> (f64, f64) {
        // new() guarantees at least two samples
        (self.samples[0].percent, self.samples[self.samples.len() - 1].percent)
    }

    pub fn interpolate(&self, target: f64) -> CalcResult<Crossing> {
        let target = require_percent("Percentile target", target)?;

        for window in self.samples.windows(2) {
            let (lo, hi) = (window[0], window[1]);
            if lo.percent <= target && target <= hi.percent {
                let span = hi.percent - lo.percent;
                let value = if span == 0.0 {
                    lo.x
                } else {
                    lo.x + (target - lo.percent) / span * (hi.x - lo.x)
                };
                debug!("P{} interpolated between {:?} and {:?}: {}", target, lo, hi, value);
                return Ok(Crossing::Interpolated { value });
            }
        }

        let (low, high) = self.coverage();
        let crossing = if target < low {
            Crossing::Clamped { value: self.samples[0].x, side: Side::Below }
        } else {
            Crossing::Clamped { value: self.samples[self.samples.len() - 1].x, side: Side::Above }
        };
        warn!(
            "P{} lies outside the covered range [{}, {}]; falling back to boundary value {}",
            target, low, high, crossing.value()
        );
        Ok(crossing)
    }

    /// Interpolated value with the boundary fallback folded in.
    pub fn percentile(&self, target: f64) -> CalcResult<f64> {
        Ok(self.interpolate(target)?.value())
    }
}

/// One-shot interpolation over raw samples.
pub fn interpolate(samples: &[DistributionSample], target: f64) -> CalcResult<Crossing> {
    Distribution::new(samples.to_vec())?.interpolate(target)
}

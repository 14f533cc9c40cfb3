//! Sine-displaced curve along the world X axis.
//!
//! A baseline from `(start, 0, 0)` to `(end, 0, 0)` is divided into `count`
//! equal segments. Sample `i` is lifted along +Z by
//! `amplitude * sin(2π * periods * i / count)` and a cubic curve is
//! interpolated through the lifted samples.

use std::f64::consts::TAU;

use super::core::{Point3, Vec3};
use super::curve::{CurveError, Line3, NurbsCurve3, divide_curve_by_count};

/// Number of baseline segments used when nothing else is configured.
pub const DEFAULT_SAMPLE_COUNT: usize = 10;

/// Largest accepted segment count. The interpolation solve grows with the
/// square of the sample count.
pub const MAX_SAMPLE_COUNT: usize = 1000;

/// Degree of the interpolated curve.
pub const DEFAULT_DEGREE: usize = 3;

/// Message reported when the baseline runs backwards.
pub const START_AFTER_END_MESSAGE: &str = "E must be bigger than S";

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SineCurveError {
    #[error("E must be bigger than S")]
    StartAfterEnd { start: f64, end: f64 },
    #[error("sample count must be at least 1, got {0}")]
    InvalidCount(usize),
    #[error("sample count must be at most {max}, got {count}")]
    CountTooLarge { count: usize, max: usize },
    #[error("sine curve inputs must be finite numbers")]
    NonFinite,
    #[error("baseline length from {start} to {end} is too large to represent")]
    SpanOverflow { start: f64, end: f64 },
    #[error(transparent)]
    Interpolation(#[from] CurveError),
}

/// Tunables of the sine curve. `Default` gives the component's behaviour.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SineCurveOptions {
    /// Number of baseline segments; the curve interpolates `count + 1` samples.
    pub count: usize,
    /// Peak displacement along Z.
    pub amplitude: f64,
    /// Number of full sine periods between start and end.
    pub periods: f64,
    /// Requested interpolation degree, clamped to `samples - 1`.
    pub degree: usize,
}

impl Default for SineCurveOptions {
    fn default() -> Self {
        Self {
            count: DEFAULT_SAMPLE_COUNT,
            amplitude: 1.0,
            periods: 1.0,
            degree: DEFAULT_DEGREE,
        }
    }
}

impl SineCurveOptions {
    #[must_use]
    pub fn with_count(count: usize) -> Self {
        Self {
            count,
            ..Self::default()
        }
    }
}

/// A built sine curve together with the samples it interpolates.
#[derive(Debug, Clone, PartialEq)]
pub struct SineCurve {
    /// Displaced samples in baseline order, `count + 1` of them.
    pub samples: Vec<Point3>,
    /// Curve parameter at which `curve` passes through each sample.
    pub parameters: Vec<f64>,
    pub curve: NurbsCurve3,
}

impl SineCurve {
    #[must_use]
    pub fn sample_count(&self) -> usize {
        self.samples.len()
    }
}

/// Builds the sine curve with the default amplitude, period and degree.
pub fn build_sine_curve(start: f64, end: f64, count: usize) -> Result<SineCurve, SineCurveError> {
    build_sine_curve_with(start, end, &SineCurveOptions::with_count(count))
}

pub fn build_sine_curve_with(
    start: f64,
    end: f64,
    options: &SineCurveOptions,
) -> Result<SineCurve, SineCurveError> {
    if !start.is_finite()
        || !end.is_finite()
        || !options.amplitude.is_finite()
        || !options.periods.is_finite()
    {
        return Err(SineCurveError::NonFinite);
    }
    if start > end {
        return Err(SineCurveError::StartAfterEnd { start, end });
    }
    if !(end - start).is_finite() {
        return Err(SineCurveError::SpanOverflow { start, end });
    }
    if options.count < 1 {
        return Err(SineCurveError::InvalidCount(options.count));
    }
    if options.count > MAX_SAMPLE_COUNT {
        return Err(SineCurveError::CountTooLarge {
            count: options.count,
            max: MAX_SAMPLE_COUNT,
        });
    }

    let samples = sine_samples(start, end, options);
    let curve = NurbsCurve3::interpolate_through_points(&samples, options.degree)?;
    let parameters = NurbsCurve3::interpolation_parameters(&samples);

    Ok(SineCurve {
        samples,
        parameters,
        curve,
    })
}

/// Divides the baseline and lifts every division point. Expects a validated `count`.
fn sine_samples(start: f64, end: f64, options: &SineCurveOptions) -> Vec<Point3> {
    let baseline = Line3::new(Point3::new(start, 0.0, 0.0), Point3::new(end, 0.0, 0.0));
    let division = divide_curve_by_count(&baseline, options.count);
    let count = options.count as f64;

    division
        .points
        .into_iter()
        .enumerate()
        .map(|(i, point)| {
            let phase = i as f64 / count;
            let lift = options.amplitude * (phase * options.periods * TAU).sin();
            point + Vec3::Z.mul_scalar(lift)
        })
        .collect()
}

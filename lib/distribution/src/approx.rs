//! Normal approximation to the Poisson distribution with continuity correction.
//!
//! The matching normal has mean `rate` and standard deviation `sqrt(rate)`.
//! Discrete queries are widened by half a unit on each side:
//!
//! - `P(X = k)  ~ P(k - 0.5 < Y < k + 0.5)`
//! - `P(X <= k) ~ P(Y < k + 0.5)`
//! - `P(X >= k) ~ P(Y > k - 0.5)`

use serde::Serialize;

use crate::dist::Normaldist;
use crate::engine::point_probabilities;
use crate::error::{Result, check_rate};
use crate::params::DistributionParameters;
use crate::sweep::linspace;

/// Samples used for the overlay curve when callers do not choose.
pub const DEFAULT_CURVE_POINTS: usize = 500;
/// Samples used for the shaded continuity-correction band.
pub const DEFAULT_BAND_POINTS: usize = 100;

const HALF: f64 = 0.5;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct NormalParameters {
    pub mean: f64,
    pub stddev: f64,
}

/// # Errors
///
/// `InvalidParameter` if `rate <= 0`, where the standard deviation vanishes.
pub fn parameters(rate: f64) -> Result<NormalParameters> {
    let rate = check_rate(rate)?;
    Ok(NormalParameters {
        mean: rate,
        stddev: rate.sqrt(),
    })
}

fn matching_normal(rate: f64) -> Result<Normaldist> {
    let NormalParameters { mean, stddev } = parameters(rate)?;
    Normaldist::new(mean, stddev)
}

fn corrected_eq(norm: &Normaldist, k: i64) -> f64 {
    let k = k as f64;
    (norm.cdf(k + HALF) - norm.cdf(k - HALF)).max(0.0)
}

fn corrected_leq(norm: &Normaldist, k: i64) -> f64 {
    norm.cdf(k as f64 + HALF)
}

fn corrected_geq(norm: &Normaldist, k: i64) -> f64 {
    norm.sf(k as f64 - HALF)
}

pub fn continuity_corrected_eq(rate: f64, k: i64) -> Result<f64> {
    Ok(corrected_eq(&matching_normal(rate)?, k))
}

pub fn continuity_corrected_leq(rate: f64, k: i64) -> Result<f64> {
    Ok(corrected_leq(&matching_normal(rate)?, k))
}

pub fn continuity_corrected_geq(rate: f64, k: i64) -> Result<f64> {
    Ok(corrected_geq(&matching_normal(rate)?, k))
}

/// Normal density at each of `xs`, in order.
pub fn density_curve(rate: f64, xs: &[f64]) -> Result<Vec<f64>> {
    let norm = matching_normal(rate)?;
    Ok(xs.iter().map(|&x| norm.pdf(x)).collect())
}

/// Normal `(cdf, ccdf)` at each of `xs`, in order.
pub fn cumulative_curve(rate: f64, xs: &[f64]) -> Result<(Vec<f64>, Vec<f64>)> {
    let norm = matching_normal(rate)?;
    Ok(xs.iter().map(|&x| (norm.cdf(x), norm.sf(x))).unzip())
}

/// The continuous overlay sampled evenly across a window.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NormalCurve {
    pub xs: Vec<f64>,
    pub pdf: Vec<f64>,
    pub cdf: Vec<f64>,
    pub ccdf: Vec<f64>,
}

impl NormalCurve {
    pub fn len(&self) -> usize {
        self.xs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.xs.is_empty()
    }
}

pub fn normal_curve(rate: f64, range_min: f64, range_max: f64, points: usize) -> Result<NormalCurve> {
    let norm = matching_normal(rate)?;
    let xs = linspace(range_min, range_max, points);
    let pdf = xs.iter().map(|&x| norm.pdf(x)).collect();
    let cdf = xs.iter().map(|&x| norm.cdf(x)).collect();
    let ccdf = xs.iter().map(|&x| norm.sf(x)).collect();
    Ok(NormalCurve { xs, pdf, cdf, ccdf })
}

/// Area under the normal density between `k - 0.5` and `k + 0.5`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ContinuityBand {
    pub k: i64,
    pub xs: Vec<f64>,
    pub pdf: Vec<f64>,
}

pub fn continuity_band(rate: f64, k: i64, points: usize) -> Result<ContinuityBand> {
    let norm = matching_normal(rate)?;
    let center = k as f64;
    let xs = linspace(center - HALF, center + HALF, points);
    let pdf = xs.iter().map(|&x| norm.pdf(x)).collect();
    Ok(ContinuityBand { k, xs, pdf })
}

/// Exact Poisson answers next to their continuity-corrected normal counterparts.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PointEstimate {
    pub k: i64,
    pub p_poisson_eq: f64,
    pub p_poisson_leq: f64,
    pub p_poisson_geq: f64,
    pub p_normal_eq: f64,
    pub p_normal_leq: f64,
    pub p_normal_geq: f64,
}

impl PointEstimate {
    /// Absolute approximation error for `(eq, leq, geq)`.
    pub fn abs_errors(&self) -> (f64, f64, f64) {
        (
            (self.p_poisson_eq - self.p_normal_eq).abs(),
            (self.p_poisson_leq - self.p_normal_leq).abs(),
            (self.p_poisson_geq - self.p_normal_geq).abs(),
        )
    }
}

/// Point estimate at `params.query_point`.
pub fn estimate(params: &DistributionParameters) -> Result<PointEstimate> {
    params.validate()?;
    estimate_at(params.rate, params.query_point)
}

/// Point estimate for a bare `(rate, k)` pair, no window involved.
pub fn estimate_at(rate: f64, k: i64) -> Result<PointEstimate> {
    let exact = point_probabilities(rate, k)?;
    let norm = matching_normal(rate)?;
    Ok(PointEstimate {
        k,
        p_poisson_eq: exact.eq,
        p_poisson_leq: exact.leq,
        p_poisson_geq: exact.geq,
        p_normal_eq: corrected_eq(&norm, k),
        p_normal_leq: corrected_leq(&norm, k),
        p_normal_geq: corrected_geq(&norm, k),
    })
}

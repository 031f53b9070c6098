//! Exact Poisson tables and point queries.
//!
//! The inclusive upper tail `P(X >= x)` has a single formula here,
//! `1 - cdf(x - 1)`, evaluated as the regularised lower incomplete Gamma
//! `P(x, rate)` so no subtraction of nearly equal numbers happens. Tables and
//! point queries share it, and `1 - cdf(x) + pmf(x)` agrees with it to
//! within 1e-9.

use serde::Serialize;

use crate::dist::Poissondist;
use crate::error::{DistError, Result, check_range};

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TableRow {
    pub x: u64,
    pub pmf: f64,
    pub cdf: f64,
    /// P(X >= x)
    pub ccdf: f64,
}

/// PMF, CDF and CCDF over a window `[min, max]` of the support.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DistributionTable {
    rate: f64,
    rows: Vec<TableRow>,
}

impl DistributionTable {
    pub fn rate(&self) -> f64 {
        self.rate
    }

    pub fn rows(&self) -> &[TableRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn range_min(&self) -> u64 {
        self.rows.first().map(|r| r.x).unwrap_or_default()
    }

    pub fn range_max(&self) -> u64 {
        self.rows.last().map(|r| r.x).unwrap_or_default()
    }

    /// Row for `x`, `None` when `x` lies outside the window.
    pub fn row(&self, x: i64) -> Option<&TableRow> {
        if x < 0 {
            return None;
        }
        let offset = (x as u64).checked_sub(self.range_min())?;
        self.rows.get(usize::try_from(offset).ok()?)
    }

    pub fn xs(&self) -> Vec<u64> {
        self.rows.iter().map(|r| r.x).collect()
    }

    pub fn pmf(&self) -> Vec<f64> {
        self.rows.iter().map(|r| r.pmf).collect()
    }

    pub fn cdf(&self) -> Vec<f64> {
        self.rows.iter().map(|r| r.cdf).collect()
    }

    pub fn ccdf(&self) -> Vec<f64> {
        self.rows.iter().map(|r| r.ccdf).collect()
    }

    /// Probability mass inside the window; below 1 for any finite window.
    pub fn total_mass(&self) -> f64 {
        self.rows.iter().map(|r| r.pmf).sum()
    }

    /// Most probable `x` inside the window (first one on ties).
    pub fn mode(&self) -> Option<u64> {
        self.rows
            .iter()
            .fold(None::<&TableRow>, |best, row| match best {
                Some(b) if b.pmf >= row.pmf => Some(b),
                _ => Some(row),
            })
            .map(|r| r.x)
    }

    pub fn max_pmf(&self) -> f64 {
        self.rows.iter().map(|r| r.pmf).fold(0.0, f64::max)
    }
}

/// P(X = k), P(X <= k) and P(X >= k) for one query point.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PointProbabilities {
    pub eq: f64,
    pub leq: f64,
    pub geq: f64,
}

impl PointProbabilities {
    /// Strict exceedance P(X > k).
    pub fn gt(&self) -> f64 {
        1.0 - self.leq
    }

    /// P(X < k).
    pub fn lt(&self) -> f64 {
        1.0 - self.geq
    }
}

/// Computes the table for every integer in `[range_min, range_max]`.
///
/// # Errors
///
/// `InvalidRange` if `range_min >= range_max`, `InvalidParameter` if `rate <= 0`
/// or the window reaches past `i64::MAX`.
pub fn compute_table(rate: f64, range_min: u64, range_max: u64) -> Result<DistributionTable> {
    let pois = Poissondist::new(rate)?;
    check_range(range_min, range_max)?;
    tracing::trace!(rate, range_min, range_max, "computing poisson table");

    let rows = (range_min..=range_max)
        .map(|x| {
            let k = i64::try_from(x).map_err(|_| {
                DistError::InvalidParameter(format!("x = {x} does not fit in i64"))
            })?;
            Ok(TableRow {
                x,
                pmf: pois.pmf(k)?,
                cdf: pois.cdf(k)?,
                ccdf: pois.sf(k)?,
            })
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(DistributionTable { rate, rows })
}

/// Point probabilities at `k`; `k` may be negative, where no mass lives.
///
/// # Errors
///
/// `InvalidParameter` if `rate <= 0`.
pub fn point_probabilities(rate: f64, k: i64) -> Result<PointProbabilities> {
    let pois = Poissondist::new(rate)?;
    Ok(PointProbabilities {
        eq: pois.pmf(k)?,
        leq: pois.cdf(k)?,
        geq: pois.sf(k)?,
    })
}

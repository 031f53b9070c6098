//! Rate sweeps: the frames of an animation over λ as a plain sequence.
//!
//! A sweep owns nothing but its rates and window, so iterating it twice
//! yields the same frames. Drawing and exporting frames is up to the caller.

use serde::Serialize;

use crate::engine::{DistributionTable, compute_table};
use crate::error::{Result, check_range, check_rate};

/// `n` evenly spaced samples from `start` to `end`, both included.
pub fn linspace(start: f64, end: f64, n: usize) -> Vec<f64> {
    match n {
        0 => Vec::new(),
        1 => vec![start],
        _ => {
            let step = (end - start) / (n - 1) as f64;
            let mut out: Vec<f64> = (0..n).map(|i| start + i as f64 * step).collect();
            out[n - 1] = end;
            out
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SweepFrame {
    pub index: usize,
    pub rate: f64,
    pub table: DistributionTable,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RateSweep {
    rates: Vec<f64>,
    range_min: u64,
    range_max: u64,
}

impl RateSweep {
    pub const DEFAULT_START: f64 = 1.1;
    pub const DEFAULT_END: f64 = 60.0;
    pub const DEFAULT_FRAMES: usize = 100;

    /// # Errors
    ///
    /// `InvalidRange` for an empty window, `InvalidParameter` naming the
    /// first rate that is not positive.
    pub fn new(rates: Vec<f64>, range_min: u64, range_max: u64) -> Result<Self> {
        check_range(range_min, range_max)?;
        for rate in &rates {
            check_rate(*rate)?;
        }
        tracing::debug!(
            frames = rates.len(),
            range_min,
            range_max,
            "rate sweep prepared"
        );
        Ok(Self {
            rates,
            range_min,
            range_max,
        })
    }

    pub fn linear(
        start: f64,
        end: f64,
        frames: usize,
        range_min: u64,
        range_max: u64,
    ) -> Result<Self> {
        Self::new(linspace(start, end, frames), range_min, range_max)
    }

    /// λ from 1.1 to 60 in 100 frames.
    pub fn animation(range_min: u64, range_max: u64) -> Result<Self> {
        Self::linear(
            Self::DEFAULT_START,
            Self::DEFAULT_END,
            Self::DEFAULT_FRAMES,
            range_min,
            range_max,
        )
    }

    pub fn rates(&self) -> &[f64] {
        &self.rates
    }

    pub fn range(&self) -> (u64, u64) {
        (self.range_min, self.range_max)
    }

    pub fn len(&self) -> usize {
        self.rates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rates.is_empty()
    }

    /// A fresh pass over the frames, starting from the first rate.
    pub fn frames(&self) -> SweepFrames<'_> {
        SweepFrames {
            sweep: self,
            next: 0,
        }
    }

    /// Largest pmf over every frame, for a fixed y-axis across the animation.
    pub fn peak_pmf(&self) -> Result<f64> {
        self.frames()
            .try_fold(0.0, |peak, frame| Ok(f64::max(peak, frame?.table.max_pmf())))
    }
}

pub struct SweepFrames<'a> {
    sweep: &'a RateSweep,
    next: usize,
}

impl Iterator for SweepFrames<'_> {
    type Item = Result<SweepFrame>;

    fn next(&mut self) -> Option<Self::Item> {
        let index = self.next;
        let rate = *self.sweep.rates.get(index)?;
        self.next += 1;
        Some(
            compute_table(rate, self.sweep.range_min, self.sweep.range_max)
                .map(|table| SweepFrame { index, rate, table }),
        )
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.sweep.rates.len().saturating_sub(self.next);
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for SweepFrames<'_> {}

impl<'a> IntoIterator for &'a RateSweep {
    type Item = Result<SweepFrame>;
    type IntoIter = SweepFrames<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.frames()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DistError;

    #[test]
    fn test_linspace() {
        assert!(linspace(0.0, 1.0, 0).is_empty());
        assert_eq!(linspace(3.0, 9.0, 1), vec![3.0]);
        assert_eq!(linspace(0.0, 1.0, 5), vec![0.0, 0.25, 0.5, 0.75, 1.0]);
        let xs = linspace(1.1, 60.0, 100);
        assert_eq!(xs.len(), 100);
        assert_eq!(xs[0], 1.1);
        assert_eq!(xs[99], 60.0);
        assert!(xs.windows(2).all(|w| w[1] > w[0]));
    }

    #[test]
    fn test_animation_defaults() {
        let sweep = RateSweep::animation(0, 30).expect("Failed to build sweep");
        assert_eq!(sweep.len(), 100);
        assert_eq!(sweep.range(), (0, 30));
        assert_eq!(sweep.rates()[0], 1.1);
        assert_eq!(sweep.rates()[99], 60.0);
    }

    #[test]
    fn test_frames_follow_rates() {
        let sweep = RateSweep::new(vec![2.0, 4.0, 8.0], 0, 20).expect("Failed to build sweep");
        let frames = sweep
            .frames()
            .collect::<Result<Vec<_>>>()
            .expect("Failed to compute frames");
        assert_eq!(frames.len(), 3);
        for (i, frame) in frames.iter().enumerate() {
            assert_eq!(frame.index, i);
            assert_eq!(frame.rate, sweep.rates()[i]);
            assert_eq!(frame.table.len(), 21);
            assert_eq!(frame.table.rate(), frame.rate);
        }
    }

    #[test]
    fn test_frames_are_restartable() {
        let sweep = RateSweep::linear(1.0, 10.0, 7, 0, 15).expect("Failed to build sweep");
        let first = sweep.frames().collect::<Result<Vec<_>>>().expect("first pass");
        let second = (&sweep)
            .into_iter()
            .collect::<Result<Vec<_>>>()
            .expect("second pass");
        assert_eq!(first, second);

        let mut partial = sweep.frames();
        assert_eq!(partial.len(), 7);
        partial.next();
        partial.next();
        assert_eq!(partial.len(), 5);
        assert_eq!(sweep.frames().len(), 7);
    }

    #[test]
    fn test_new_validates_up_front() {
        assert_eq!(
            RateSweep::new(vec![1.0], 4, 4),
            Err(DistError::InvalidRange { min: 4, max: 4 })
        );
        assert!(matches!(
            RateSweep::new(vec![1.0, 0.0, 2.0], 0, 4),
            Err(DistError::InvalidParameter(_))
        ));
        // starting at zero makes the first frame degenerate
        assert!(RateSweep::linear(0.0, 5.0, 3, 0, 10).is_err());
        let empty = RateSweep::new(Vec::new(), 0, 4).expect("an empty sweep is valid");
        assert!(empty.is_empty());
        assert_eq!(empty.frames().count(), 0);
        assert_eq!(empty.peak_pmf(), Ok(0.0));
    }

    #[test]
    fn test_peak_pmf() {
        let sweep = RateSweep::new(vec![1.0, 5.0], 0, 10).expect("Failed to build sweep");
        // the narrowest frame peaks highest: P(X=0) = P(X=1) = e^-1 at rate 1
        let peak = sweep.peak_pmf().expect("peak failed");
        assert!((peak - (-1.0f64).exp()).abs() < 1e-12);

        let animation = RateSweep::animation(0, 30).expect("Failed to build sweep");
        let peak = animation.peak_pmf().expect("peak failed");
        assert!(peak > 0.3 && peak < 0.4);
    }
}

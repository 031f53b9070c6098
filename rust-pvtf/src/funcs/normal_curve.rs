use std::sync::Arc;

use anyhow::{Context, anyhow};
use arrow::array::RecordBatch;
use arrow_schema::{DataType, Field, Schema, SchemaRef};
use distribution::DistributionParameters;
use distribution::approx::{self, DEFAULT_BAND_POINTS, DEFAULT_CURVE_POINTS};

use crate::TableFunction;
use crate::funcs::common::{count_arg, float_arg, float_column, int_arg, scalars};
use rust_pvtf_api::arg::{Arg, Args};

/// Optional trailing sample count.
fn points_arg(args: &[Arg], idx: usize, default: usize) -> anyhow::Result<usize> {
    if args.len() <= idx {
        return Ok(default);
    }
    let points = count_arg(args, idx, "points")?;
    if points < 2 {
        return Err(anyhow!("`points` must be at least 2, got {points}."));
    }
    usize::try_from(points).context("`points` is too large")
}

/// Samples the normal approximation N(rate, sqrt(rate)) across `[min, max]`.
#[derive(Debug)]
pub struct NormalCurveFunction {
    params: DistributionParameters,
    points: usize,
}

impl NormalCurveFunction {
    pub fn new(args: Option<Args>) -> anyhow::Result<Self> {
        let scalars = scalars(args);
        if !(3..=4).contains(&scalars.len()) {
            return Err(anyhow!(
                "Invalid arguments, there is no {}-args constructor",
                scalars.len()
            ));
        }
        let rate = float_arg(&scalars, 0, "rate")?;
        let range_min = count_arg(&scalars, 1, "min")?;
        let range_max = count_arg(&scalars, 2, "max")?;
        let points = points_arg(&scalars, 3, DEFAULT_CURVE_POINTS)?;

        let params = DistributionParameters::new(rate, range_min, range_max, 0)
            .context("Invalid `normal_curve` parameters")?;
        tracing::debug!(rate, range_min, range_max, points, "normal_curve created");

        Ok(NormalCurveFunction { params, points })
    }

    pub fn schema() -> SchemaRef {
        Arc::new(Schema::new(vec![
            Field::new("x", DataType::Float64, false),
            Field::new("pdf", DataType::Float64, false),
            Field::new("cdf", DataType::Float64, false),
            Field::new("ccdf", DataType::Float64, false),
        ]))
    }
}

impl TableFunction for NormalCurveFunction {
    fn process(&mut self, _input: RecordBatch) -> anyhow::Result<Option<RecordBatch>> {
        Ok(None)
    }

    fn finalize(&mut self) -> anyhow::Result<Option<RecordBatch>> {
        let curve = approx::normal_curve(
            self.params.rate,
            self.params.range_min as f64,
            self.params.range_max as f64,
            self.points,
        )?;
        let batch = RecordBatch::try_new(
            Self::schema(),
            vec![
                float_column(curve.xs, None),
                float_column(curve.pdf, None),
                float_column(curve.cdf, None),
                float_column(curve.ccdf, None),
            ],
        )
        .context("Failed to create normal_curve batch")?;
        Ok(Some(batch))
    }
}

/// The strip of normal density between `k - 0.5` and `k + 0.5` that the
/// continuity-corrected P(X = k) integrates.
#[derive(Debug)]
pub struct ContinuityBandFunction {
    rate: f64,
    k: i64,
    points: usize,
}

impl ContinuityBandFunction {
    pub fn new(args: Option<Args>) -> anyhow::Result<Self> {
        let scalars = scalars(args);
        if !(2..=3).contains(&scalars.len()) {
            return Err(anyhow!(
                "Invalid arguments, there is no {}-args constructor",
                scalars.len()
            ));
        }
        let rate = float_arg(&scalars, 0, "rate")?;
        let k = int_arg(&scalars, 1, "k")?;
        let points = points_arg(&scalars, 2, DEFAULT_BAND_POINTS)?;
        approx::parameters(rate).context("Invalid `continuity_band` parameters")?;

        Ok(ContinuityBandFunction { rate, k, points })
    }

    pub fn schema() -> SchemaRef {
        Arc::new(Schema::new(vec![
            Field::new("x", DataType::Float64, false),
            Field::new("pdf", DataType::Float64, false),
        ]))
    }
}

impl TableFunction for ContinuityBandFunction {
    fn process(&mut self, _input: RecordBatch) -> anyhow::Result<Option<RecordBatch>> {
        Ok(None)
    }

    fn finalize(&mut self) -> anyhow::Result<Option<RecordBatch>> {
        let band = approx::continuity_band(self.rate, self.k, self.points)?;
        let batch = RecordBatch::try_new(
            Self::schema(),
            vec![float_column(band.xs, None), float_column(band.pdf, None)],
        )
        .context("Failed to create continuity_band batch")?;
        Ok(Some(batch))
    }
}

use std::sync::Arc;

use anyhow::{Context, anyhow};
use arrow::array::{Float64Builder, Int64Builder, RecordBatch, UInt32Builder};
use arrow_schema::{DataType, Field, Schema, SchemaRef};
use distribution::RateSweep;

use crate::TableFunction;
use crate::funcs::common::{count_arg, float_arg, scalars};
use rust_pvtf_api::arg::Args;

/// Upper bound on `frames * (max - min + 1)`; one batch holds the whole sweep.
const MAX_ROWS: usize = 10_000_000;

/// One pmf table per rate, stacked in long format so a host can group by
/// `frame` and animate.
#[derive(Debug)]
pub struct PoissonSweep {
    sweep: RateSweep,
}

impl PoissonSweep {
    pub fn new(args: Option<Args>) -> anyhow::Result<Self> {
        let scalars = scalars(args);
        let range_min = count_arg(&scalars, 0, "min")?;
        let range_max = count_arg(&scalars, 1, "max")?;

        let sweep = match scalars.len() {
            2 => RateSweep::animation(range_min, range_max),
            5 => {
                let start = float_arg(&scalars, 2, "start")?;
                let end = float_arg(&scalars, 3, "end")?;
                let frames = count_arg(&scalars, 4, "frames")?;
                let frames = usize::try_from(frames).context("`frames` is too large")?;
                if u32::try_from(frames).is_err() {
                    return Err(anyhow!("`frames` must fit in a UInt32, got {frames}."));
                }
                RateSweep::linear(start, end, frames, range_min, range_max)
            }
            n => {
                return Err(anyhow!(
                    "Invalid arguments, there is no {}-args constructor",
                    n
                ));
            }
        }
        .context("Invalid `poisson_sweep` parameters")?;

        let func = PoissonSweep { sweep };
        let rows = func.row_count()?;
        if rows > MAX_ROWS {
            return Err(anyhow!(
                "`poisson_sweep` would produce {rows} rows, at most {MAX_ROWS} are allowed."
            ));
        }
        Ok(func)
    }

    /// Rows in the emitted batch, or an error when the count overflows `usize`.
    fn row_count(&self) -> anyhow::Result<usize> {
        let (range_min, range_max) = self.sweep.range();
        range_max
            .checked_sub(range_min)
            .and_then(|width| width.checked_add(1))
            .and_then(|width| usize::try_from(width).ok())
            .and_then(|width| width.checked_mul(self.sweep.len()))
            .with_context(|| {
                format!(
                    "`poisson_sweep` row count overflows: {} frames over [{range_min}, {range_max}]",
                    self.sweep.len()
                )
            })
    }

    pub fn schema() -> SchemaRef {
        Arc::new(Schema::new(vec![
            Field::new("frame", DataType::UInt32, false),
            Field::new("rate", DataType::Float64, false),
            Field::new("x", DataType::Int64, false),
            Field::new("pmf", DataType::Float64, false),
        ]))
    }
}

impl TableFunction for PoissonSweep {
    fn process(&mut self, _input: RecordBatch) -> anyhow::Result<Option<RecordBatch>> {
        Ok(None)
    }

    fn finalize(&mut self) -> anyhow::Result<Option<RecordBatch>> {
        let span = tracing::info_span!("poisson_sweep", frames = self.sweep.len());
        let _guard = span.enter();

        let capacity = self.row_count()?;
        let mut frame_builder = UInt32Builder::with_capacity(capacity);
        let mut rate_builder = Float64Builder::with_capacity(capacity);
        let mut x_builder = Int64Builder::with_capacity(capacity);
        let mut pmf_builder = Float64Builder::with_capacity(capacity);

        for frame in &self.sweep {
            let frame = frame?;
            let index = u32::try_from(frame.index).context("frame index does not fit in UInt32")?;
            for row in frame.table.rows() {
                frame_builder.append_value(index);
                rate_builder.append_value(frame.rate);
                x_builder.append_value(i64::try_from(row.x).context("x does not fit in Int64")?);
                pmf_builder.append_value(row.pmf);
            }
        }

        let batch = RecordBatch::try_new(
            Self::schema(),
            vec![
                Arc::new(frame_builder.finish()),
                Arc::new(rate_builder.finish()),
                Arc::new(x_builder.finish()),
                Arc::new(pmf_builder.finish()),
            ],
        )
        .context("Failed to create poisson_sweep batch")?;
        tracing::debug!(rows = batch.num_rows(), "poisson_sweep emitted");
        Ok(Some(batch))
    }
}

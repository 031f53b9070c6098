use std::sync::Arc;

use anyhow::{Context, anyhow};
use arrow::array::{Array, ArrayRef, AsArray, Float64Builder, RecordBatch};
use arrow::compute::{CastOptions, cast_with_options};
use arrow::datatypes::Int64Type;
use arrow_schema::{DataType, Field, Schema, SchemaRef};
use distribution::{PointEstimate, approx, estimate_at};

use crate::TableFunction;
use crate::funcs::common::{float_arg, float_column, int_column};
use rust_pvtf_api::arg::{Arg, Args};

const ESTIMATE_COLUMNS: [&str; 6] = [
    "p_poisson_eq",
    "p_poisson_leq",
    "p_poisson_geq",
    "p_normal_eq",
    "p_normal_leq",
    "p_normal_geq",
];

fn estimate_values(est: &PointEstimate) -> [f64; 6] {
    [
        est.p_poisson_eq,
        est.p_poisson_leq,
        est.p_poisson_geq,
        est.p_normal_eq,
        est.p_normal_leq,
        est.p_normal_geq,
    ]
}

#[derive(Debug, Clone, PartialEq)]
pub enum QueryPoint {
    /// A single `k`, answered in one row at `finalize`.
    Scalar(i64),
    /// Name of an integer column; every input row gets its own answers.
    Column(String),
}

/// Exact and continuity-corrected P(X = k), P(X <= k), P(X >= k).
#[derive(Debug)]
pub struct PoissonPoint {
    rate: f64,
    query: QueryPoint,
}

impl PoissonPoint {
    pub fn new(args: Option<Args>) -> anyhow::Result<Self> {
        let Some(args) = args else {
            return Err(anyhow!(
                "`poisson_point` requires a `rate` and a `k` parameter."
            ));
        };
        if args.len() != 2 {
            return Err(anyhow!(
                "Invalid arguments, there is no {}-args constructor",
                args.len()
            ));
        }
        let rate = float_arg(&args, 0, "rate")?;
        // fails early on a bad rate, before any batch arrives
        approx::parameters(rate).context("Invalid `poisson_point` parameters")?;

        let query = match &args[1] {
            Arg::Column(name) => QueryPoint::Column(name.clone()),
            other => QueryPoint::Scalar(
                other
                    .as_i64()
                    .ok_or_else(|| anyhow!("`k` must be an integer or a column, got {other:?}."))?,
            ),
        };
        tracing::debug!(rate, ?query, "poisson_point created");

        Ok(PoissonPoint { rate, query })
    }

    pub fn schema() -> SchemaRef {
        let mut fields = vec![Field::new("k", DataType::Int64, false)];
        fields.extend(
            ESTIMATE_COLUMNS
                .iter()
                .map(|name| Field::new(*name, DataType::Float64, false)),
        );
        Arc::new(Schema::new(fields))
    }

    /// One nullable column per estimate, aligned with the rows of `ks`.
    fn estimate_columns(&self, ks: &ArrayRef) -> anyhow::Result<Vec<ArrayRef>> {
        if !ks.data_type().is_integer() {
            return Err(anyhow!(
                "`k` column must be an integer type, got {}",
                ks.data_type()
            ));
        }
        // Unsafe cast so UInt64 values beyond i64::MAX fail instead of becoming null.
        let options = CastOptions {
            safe: false,
            ..Default::default()
        };
        let ks = cast_with_options(ks, &DataType::Int64, &options)
            .context("`k` column does not fit in Int64")?;
        let ks = ks.as_primitive::<Int64Type>();
        let mut builders: Vec<Float64Builder> = (0..ESTIMATE_COLUMNS.len())
            .map(|_| Float64Builder::with_capacity(ks.len()))
            .collect();

        for row in 0..ks.len() {
            if ks.is_null(row) {
                builders.iter_mut().for_each(|b| b.append_null());
                continue;
            }
            let est = estimate_at(self.rate, ks.value(row))?;
            for (builder, value) in builders.iter_mut().zip(estimate_values(&est)) {
                builder.append_value(value);
            }
        }

        Ok(builders
            .into_iter()
            .map(|mut b| Arc::new(b.finish()) as ArrayRef)
            .collect())
    }
}

impl TableFunction for PoissonPoint {
    fn process(&mut self, input: RecordBatch) -> anyhow::Result<Option<RecordBatch>> {
        let QueryPoint::Column(column_name) = &self.query else {
            return Ok(None);
        };
        let schema = input.schema();
        let (idx, _) = schema
            .column_with_name(column_name)
            .ok_or_else(|| anyhow!("Field not found: {}", column_name))?;

        let extra = self.estimate_columns(input.column(idx))?;
        let mut fields = schema.fields().to_vec();
        fields.extend(
            ESTIMATE_COLUMNS
                .iter()
                .map(|name| Arc::new(Field::new(*name, DataType::Float64, true))),
        );
        let mut columns = input.columns().to_vec();
        columns.extend(extra);

        let output = RecordBatch::try_new(Arc::new(Schema::new(fields)), columns)
            .context("Failed to create poisson_point batch")?;
        Ok(Some(output))
    }

    fn finalize(&mut self) -> anyhow::Result<Option<RecordBatch>> {
        let QueryPoint::Scalar(k) = self.query else {
            return Ok(None);
        };
        let est = estimate_at(self.rate, k)?;
        let mut columns = vec![int_column([k])];
        columns.extend(
            estimate_values(&est)
                .into_iter()
                .map(|v| float_column([v], None)),
        );
        let output = RecordBatch::try_new(Self::schema(), columns)
            .context("Failed to create poisson_point batch")?;
        tracing::debug!(k, "poisson_point emitted");
        Ok(Some(output))
    }
}

use std::sync::Arc;

use anyhow::{Context, anyhow};
use arrow::array::RecordBatch;
use arrow_schema::{DataType, Field, Schema, SchemaRef};
use distribution::{DistributionParameters, DistributionTable, compute_table};

use crate::TableFunction;
use crate::funcs::common::{count_arg, float_arg, float_column, int_column, scalars};
use rust_pvtf_api::arg::{Arg, Args};

const MAX_PRECISION: i64 = 15;

/// Emits `x, pmf, cdf, ccdf` for every integer of the window once input ends.
#[derive(Debug)]
pub struct PoissonTable {
    params: DistributionParameters,
    precision: Option<u32>,
}

impl PoissonTable {
    pub fn new(args: Option<Args>, named_arguments: Vec<(String, Arg)>) -> anyhow::Result<Self> {
        let scalars = scalars(args);
        if scalars.len() != 3 {
            return Err(anyhow!(
                "Invalid arguments, there is no {}-args constructor",
                scalars.len()
            ));
        }
        let rate = float_arg(&scalars, 0, "rate")?;
        let range_min = count_arg(&scalars, 1, "min")?;
        let range_max = count_arg(&scalars, 2, "max")?;

        let mut precision = None;
        for (name, arg) in named_arguments {
            match name.as_str() {
                "precision" => {
                    precision = match arg {
                        Arg::Int(p) if (0..=MAX_PRECISION).contains(&p) => Some(p as u32),
                        _ => {
                            return Err(anyhow!(
                                "`precision` must be an integer between 0 and {MAX_PRECISION}"
                            ));
                        }
                    };
                }
                _ => return Err(anyhow!("Unknown parameter: {}", name)),
            }
        }

        let params = DistributionParameters::new(rate, range_min, range_max, 0)
            .context("Invalid `poisson_table` parameters")?;
        tracing::debug!(rate, range_min, range_max, ?precision, "poisson_table created");

        Ok(PoissonTable { params, precision })
    }

    pub fn schema() -> SchemaRef {
        Arc::new(Schema::new(vec![
            Field::new("x", DataType::Int64, false),
            Field::new("pmf", DataType::Float64, false),
            Field::new("cdf", DataType::Float64, false),
            Field::new("ccdf", DataType::Float64, false),
        ]))
    }
}

/// Arrow view of a table, rounding probabilities when `precision` is set.
pub fn table_to_batch(
    table: &DistributionTable,
    precision: Option<u32>,
) -> anyhow::Result<RecordBatch> {
    let rows = table.rows();
    let xs = rows
        .iter()
        .map(|r| i64::try_from(r.x).context("x does not fit in Int64"))
        .collect::<anyhow::Result<Vec<_>>>()?;
    RecordBatch::try_new(
        PoissonTable::schema(),
        vec![
            int_column(xs),
            float_column(rows.iter().map(|r| r.pmf), precision),
            float_column(rows.iter().map(|r| r.cdf), precision),
            float_column(rows.iter().map(|r| r.ccdf), precision),
        ],
    )
    .context("Failed to create poisson table batch")
}

impl TableFunction for PoissonTable {
    fn process(&mut self, _input: RecordBatch) -> anyhow::Result<Option<RecordBatch>> {
        Ok(None)
    }

    fn finalize(&mut self) -> anyhow::Result<Option<RecordBatch>> {
        let DistributionParameters {
            rate,
            range_min,
            range_max,
            ..
        } = self.params;
        let table = compute_table(rate, range_min, range_max)?;
        let batch = table_to_batch(&table, self.precision)?;
        tracing::debug!(rows = batch.num_rows(), "poisson_table emitted");
        Ok(Some(batch))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use arrow::array::{Array, AsArray, Int64Array};
    use arrow::datatypes::Float64Type;
    use distribution::DistError;

    fn positional(rate: f64, min: i64, max: i64) -> Option<Args> {
        Some(vec![Arg::Float(rate), Arg::Int(min), Arg::Int(max)])
    }

    #[test]
    fn test_poisson_table_basic() {
        let mut func =
            PoissonTable::new(positional(12.0, 0, 30), vec![]).expect("Failed to create PoissonTable");
        let output = func
            .finalize()
            .expect("Finalize failed")
            .expect("No output batch");

        assert_eq!(output.schema(), PoissonTable::schema());
        assert_eq!(output.num_rows(), 31);

        let xs = output
            .column(0)
            .as_any()
            .downcast_ref::<Int64Array>()
            .unwrap();
        assert_eq!(xs.value(0), 0);
        assert_eq!(xs.value(30), 30);

        let pmf = output.column(1).as_primitive::<Float64Type>();
        let cdf = output.column(2).as_primitive::<Float64Type>();
        let ccdf = output.column(3).as_primitive::<Float64Type>();
        assert!((pmf.value(10) - 0.1048).abs() < 5e-5);
        assert!((cdf.value(10) - 0.3472).abs() < 5e-5);
        assert!((ccdf.value(10) - 0.7576).abs() < 5e-5);
        assert_eq!(ccdf.value(0), 1.0);
    }

    #[test]
    fn test_poisson_table_precision() {
        let mut func = PoissonTable::new(
            positional(12.0, 8, 12),
            vec![("precision".to_string(), Arg::Int(4))],
        )
        .expect("Failed to create PoissonTable");
        let output = func
            .finalize()
            .expect("Finalize failed")
            .expect("No output batch");
        let pmf = output.column(1).as_primitive::<Float64Type>();
        assert_eq!(output.num_rows(), 5);
        assert_eq!(pmf.value(2), 0.1048);
        assert_eq!(output.column(2).as_primitive::<Float64Type>().value(2), 0.3472);
    }

    #[test]
    fn test_poisson_table_ignores_input() {
        let mut func =
            PoissonTable::new(positional(2.0, 0, 3), vec![]).expect("Failed to create PoissonTable");
        let input = RecordBatch::new_empty(PoissonTable::schema());
        assert!(func.process(input).expect("Process failed").is_none());
        assert_eq!(
            func.finalize()
                .expect("Finalize failed")
                .expect("No output batch")
                .num_rows(),
            4
        );
    }

    #[test]
    fn test_poisson_table_invalid_range() {
        let err = PoissonTable::new(positional(12.0, 5, 5), vec![]).unwrap_err();
        assert_eq!(
            err.downcast_ref::<DistError>(),
            Some(&DistError::InvalidRange { min: 5, max: 5 })
        );
        assert!(err.to_string().contains("Invalid `poisson_table` parameters"));
    }

    #[test]
    fn test_poisson_table_invalid_rate() {
        let err = PoissonTable::new(positional(0.0, 0, 5), vec![]).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<DistError>(),
            Some(DistError::InvalidParameter(_))
        ));
    }

    #[test]
    fn test_poisson_table_bad_arguments() {
        assert_eq!(
            PoissonTable::new(Some(vec![Arg::Float(1.0)]), vec![])
                .unwrap_err()
                .to_string(),
            "Invalid arguments, there is no 1-args constructor"
        );
        assert_eq!(
            PoissonTable::new(positional(1.0, -1, 5), vec![])
                .unwrap_err()
                .to_string(),
            "`min` must be non-negative, got -1."
        );
        assert!(
            PoissonTable::new(
                positional(1.0, 0, 5),
                vec![("precision".to_string(), Arg::Int(40))]
            )
            .is_err()
        );
        assert_eq!(
            PoissonTable::new(
                positional(1.0, 0, 5),
                vec![("colour".to_string(), Arg::Bool(true))]
            )
            .unwrap_err()
            .to_string(),
            "Unknown parameter: colour"
        );
    }
}

//! Argument coercion and column helpers shared by the table functions.

use std::sync::Arc;

use anyhow::{Context, anyhow};
use arrow::array::{ArrayRef, Float64Array, Int64Array};
use rust_pvtf_api::arg::{Arg, Args};

/// Keeps only the scalar arguments, in order.
pub(crate) fn scalars(args: Option<Args>) -> Vec<Arg> {
    args.unwrap_or_default()
        .into_iter()
        .filter(|p| p.is_scalar())
        .collect()
}

pub(crate) fn float_arg(args: &[Arg], idx: usize, name: &str) -> anyhow::Result<f64> {
    let arg = args
        .get(idx)
        .with_context(|| format!("No `{name}` parameter provided."))?;
    arg.as_f64()
        .ok_or_else(|| anyhow!("`{name}` must be a number, got {arg:?}."))
}

pub(crate) fn int_arg(args: &[Arg], idx: usize, name: &str) -> anyhow::Result<i64> {
    let arg = args
        .get(idx)
        .with_context(|| format!("No `{name}` parameter provided."))?;
    arg.as_i64()
        .ok_or_else(|| anyhow!("`{name}` must be an integer, got {arg:?}."))
}

pub(crate) fn count_arg(args: &[Arg], idx: usize, name: &str) -> anyhow::Result<u64> {
    let value = int_arg(args, idx, name)?;
    u64::try_from(value).map_err(|_| anyhow!("`{name}` must be non-negative, got {value}."))
}

/// Rounds to `decimals` places for display; `None` keeps full precision.
pub(crate) fn round_to(value: f64, decimals: Option<u32>) -> f64 {
    match decimals {
        Some(d) => {
            let scale = 10f64.powi(d as i32);
            (value * scale).round() / scale
        }
        None => value,
    }
}

pub(crate) fn float_column(values: impl IntoIterator<Item = f64>, decimals: Option<u32>) -> ArrayRef {
    Arc::new(Float64Array::from_iter_values(
        values.into_iter().map(|v| round_to(v, decimals)),
    ))
}

pub(crate) fn int_column(values: impl IntoIterator<Item = i64>) -> ArrayRef {
    Arc::new(Int64Array::from_iter_values(values))
}

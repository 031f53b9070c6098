use std::sync::Arc;

use anyhow::Context;
use rust_pvtf_api::{FunctionContext, FunctionRegistry, TableFunction, arg::ArgType};

use crate::funcs::*;

pub mod funcs;

pub fn get_function_registries() -> anyhow::Result<Vec<FunctionRegistry>> {
    use ArgType as T;

    Ok(vec![
        FunctionRegistry::builder()
            .name("poisson_table")
            .init(Arc::new(|ctx: FunctionContext| {
                PoissonTable::new(ctx.arguments, ctx.named_arguments)
                    .map(|f| Box::new(f) as Box<dyn TableFunction>)
            }))
            .signature(vec![T::Float, T::Int, T::Int])
            .build()
            .context("create `poisson_table` registry failed")?,
        FunctionRegistry::builder()
            .name("poisson_point")
            .init(Arc::new(|ctx: FunctionContext| {
                PoissonPoint::new(ctx.arguments).map(|f| Box::new(f) as Box<dyn TableFunction>)
            }))
            .signature(vec![T::Float, T::Int])
            .signature(vec![T::Float, T::Column])
            .build()
            .context("create `poisson_point` registry failed")?,
        FunctionRegistry::builder()
            .name("normal_curve")
            .init(Arc::new(|ctx: FunctionContext| {
                NormalCurveFunction::new(ctx.arguments)
                    .map(|f| Box::new(f) as Box<dyn TableFunction>)
            }))
            .signature(vec![T::Float, T::Int, T::Int])
            .signature(vec![T::Float, T::Int, T::Int, T::Int])
            .build()
            .context("create `normal_curve` registry failed")?,
        FunctionRegistry::builder()
            .name("continuity_band")
            .init(Arc::new(|ctx: FunctionContext| {
                ContinuityBandFunction::new(ctx.arguments)
                    .map(|f| Box::new(f) as Box<dyn TableFunction>)
            }))
            .signature(vec![T::Float, T::Int])
            .signature(vec![T::Float, T::Int, T::Int])
            .build()
            .context("create `continuity_band` registry failed")?,
        FunctionRegistry::builder()
            .name("poisson_sweep")
            .init(Arc::new(|ctx: FunctionContext| {
                PoissonSweep::new(ctx.arguments).map(|f| Box::new(f) as Box<dyn TableFunction>)
            }))
            .signature(vec![T::Int, T::Int])
            .signature(vec![T::Int, T::Int, T::Float, T::Float, T::Int])
            .build()
            .context("create `poisson_sweep` registry failed")?,
    ])
}

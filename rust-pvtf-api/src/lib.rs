use anyhow::{Context, anyhow};
use arg::{Arg, Args, NamedArg};
use arrow::array::RecordBatch;
use derive_builder::Builder;
use serde::Serialize;
use std::sync::Arc;

use crate::arg::ArgType;

pub mod arg;

/// Builds the table function registered under `registry`.
///
/// `arguments` is a JSON array of tagged arguments
/// (`[{"type": "float", "value": 12.0}, ...]`), `named_arguments` the same
/// with an extra `name` key. Either may be absent.
pub fn create(
    registry: &FunctionRegistry,
    arguments: Option<&str>,
    named_arguments: Option<&str>,
) -> anyhow::Result<Box<dyn TableFunction>> {
    let arguments: Option<Args> = if let Some(args) = arguments {
        serde_json::from_str(args).context("serde json failed")?
    } else {
        None
    };
    let named_arguments = if let Some(named) = named_arguments {
        serde_json::from_str::<Vec<NamedArg>>(named)
            .context("serde json failed for named arguments")?
            .into_iter()
            .map(|n| (n.name, n.arg))
            .collect()
    } else {
        Vec::new()
    };

    let positional = arguments.as_deref().unwrap_or_default();
    if !registry.accepts(positional) {
        let given = positional
            .iter()
            .map(|a| format!("{:?}", a.arg_type()).to_uppercase())
            .collect::<Vec<_>>()
            .join(", ");
        return Err(anyhow!(
            "No signature of `{}` accepts ({given}), expected one of {}",
            registry.name,
            registry.signatures()?
        ));
    }

    let create_closure = &(registry.init);
    let ctx = FunctionContext {
        arguments,
        named_arguments,
    };
    create_closure(ctx)
}

/// Looks a function up by name.
pub fn find_registry<'a>(
    registries: &'a [FunctionRegistry],
    name: &str,
) -> anyhow::Result<&'a FunctionRegistry> {
    registries
        .iter()
        .find(|r| r.name() == name)
        .with_context(|| format!("Unknown table function `{name}`"))
}

type TableFunctionInitialize =
    Arc<dyn Fn(FunctionContext) -> anyhow::Result<Box<dyn TableFunction>>>;

#[derive(Builder)]
pub struct FunctionRegistry {
    #[builder(setter(into))]
    name: &'static str,
    init: TableFunctionInitialize,
    #[builder(setter(strip_option, each(name = "signature", into)))]
    signatures: Option<Vec<Signature>>,
}

impl std::fmt::Debug for FunctionRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FunctionRegistry")
            .field("name", &self.name)
            .field("init", &Arc::as_ptr(&self.init))
            .field("signatures", &self.signatures)
            .finish()
    }
}

impl FunctionRegistry {
    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn signatures(&self) -> anyhow::Result<String> {
        serde_json::to_string(&self.signatures).context("Failed to get signatures")
    }

    /// Whether the positional arguments match one of the declared signatures.
    /// A registry without signatures accepts anything.
    pub fn accepts(&self, args: &[Arg]) -> bool {
        let Some(signatures) = &self.signatures else {
            return true;
        };
        signatures.iter().any(|sig| sig.matches(args))
    }

    pub fn builder() -> FunctionRegistryBuilder {
        FunctionRegistryBuilder::default()
    }
}

#[derive(Clone, Debug, Serialize)]
pub struct Signature {
    pub args: Vec<ArgType>,
}

impl Signature {
    pub fn empty() -> Self {
        Signature { args: Vec::new() }
    }

    pub fn matches(&self, args: &[Arg]) -> bool {
        self.args.len() == args.len()
            && self
                .args
                .iter()
                .zip(args)
                .all(|(expected, arg)| expected.admits(arg.arg_type()))
    }
}

impl From<Vec<ArgType>> for Signature {
    fn from(value: Vec<ArgType>) -> Self {
        Signature { args: value }
    }
}

pub struct FunctionContext {
    pub arguments: Option<Args>,
    pub named_arguments: Vec<(String, Arg)>,
}

/// A function over a stream of record batches.
///
/// `process` is called once per input batch and may emit a batch of its
/// own; `finalize` is called once at end of input. Generators ignore their
/// input and emit everything from `finalize`.
pub trait TableFunction {
    fn process(&mut self, input: RecordBatch) -> anyhow::Result<Option<RecordBatch>>;

    fn finalize(&mut self) -> anyhow::Result<Option<RecordBatch>> {
        Ok(None)
    }
}

use serde::{Deserialize, Serialize};

pub type Args = Vec<Arg>;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value")]
#[serde(rename_all = "lowercase")]
pub enum Arg {
    Int(i64),
    String(String),
    Bool(bool),
    Float(f64),
    Column(String),
}

impl From<&str> for Arg {
    fn from(value: &str) -> Self {
        Arg::String(value.to_string())
    }
}

impl From<String> for Arg {
    fn from(value: String) -> Self {
        Arg::String(value)
    }
}

impl From<bool> for Arg {
    fn from(value: bool) -> Self {
        Arg::Bool(value)
    }
}

impl From<f64> for Arg {
    fn from(value: f64) -> Self {
        Arg::Float(value)
    }
}

impl From<i64> for Arg {
    fn from(value: i64) -> Self {
        Arg::Int(value)
    }
}

// for deserialize only
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct NamedArg {
    pub name: String,
    #[serde(flatten)]
    pub arg: Arg,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ArgType {
    Int,
    String,
    Bool,
    Float,
    Column,
}

impl ArgType {
    /// Whether an argument of type `actual` may fill a slot declared as `self`.
    /// Integers widen to floats.
    pub fn admits(self, actual: ArgType) -> bool {
        self == actual || (self == ArgType::Float && actual == ArgType::Int)
    }
}

impl Arg {
    pub fn is_scalar(&self) -> bool {
        use Arg as T;
        matches!(self, T::Int(_) | T::String(_) | T::Bool(_) | T::Float(_))
    }

    pub fn is_column(&self) -> bool {
        use Arg as T;
        matches!(self, T::Column(_))
    }

    pub fn arg_type(&self) -> ArgType {
        match self {
            Arg::Int(_) => ArgType::Int,
            Arg::String(_) => ArgType::String,
            Arg::Bool(_) => ArgType::Bool,
            Arg::Float(_) => ArgType::Float,
            Arg::Column(_) => ArgType::Column,
        }
    }

    /// Numeric view of the argument; numeric strings are accepted since hosts
    /// sometimes stringify literals.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Arg::Float(f) => Some(*f),
            Arg::Int(i) => Some(*i as f64),
            Arg::String(s) => s.trim().parse().ok(),
            _ => None,
        }
    }

    /// Integer view of the argument; floats must be integral.
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Arg::Int(i) => Some(*i),
            Arg::Float(f) if f.fract() == 0.0 && f.is_finite() => Some(*f as i64),
            Arg::String(s) => s.trim().parse().ok(),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {

    use anyhow::Context;
    use serde_json::json;

    use super::*;

    #[test]
    fn parse_args() -> anyhow::Result<()> {
        let args = serde_json::from_value::<Args>(
            json! {[{"type":"float","value":12.0},{"type":"int","value":0},{"type":"column","value":"k"}]},
        )
        .context("Failed to parse arguments")?;
        assert_eq!(
            args,
            vec![Arg::Float(12.0), Arg::Int(0), Arg::Column("k".to_string())]
        );
        Ok(())
    }

    #[test]
    fn parse_named_args() -> anyhow::Result<()> {
        let named = serde_json::from_value::<Vec<NamedArg>>(
            json! {[{"name":"precision","type":"int","value":4},{"name":"tee","type":"bool","value":true}]},
        )
        .context("Failed to parse arguments")?;
        assert_eq!(named[0].name, "precision");
        assert_eq!(named[0].arg, Arg::Int(4));
        assert_eq!(named[1].arg, Arg::Bool(true));
        Ok(())
    }

    #[test]
    fn numeric_views() {
        assert_eq!(Arg::Int(3).as_f64(), Some(3.0));
        assert_eq!(Arg::Float(2.5).as_f64(), Some(2.5));
        assert_eq!(Arg::from(" 7.25 ").as_f64(), Some(7.25));
        assert_eq!(Arg::Bool(true).as_f64(), None);
        assert_eq!(Arg::Float(4.0).as_i64(), Some(4));
        assert_eq!(Arg::Float(4.5).as_i64(), None);
        assert_eq!(Arg::from("-2").as_i64(), Some(-2));
        assert_eq!(Arg::Column("k".into()).as_i64(), None);
    }

    #[test]
    fn arg_types() {
        assert!(ArgType::Float.admits(Arg::Int(1).arg_type()));
        assert!(!ArgType::Int.admits(Arg::Float(1.0).arg_type()));
        assert!(ArgType::Column.admits(Arg::Column("k".into()).arg_type()));
        assert!(Arg::Int(1).is_scalar());
        assert!(!Arg::Column("k".into()).is_scalar());
        assert!(Arg::Column("k".into()).is_column());
    }
}

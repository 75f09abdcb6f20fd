//! Typed command arguments.
//!
//! Each [`CommandParam`] carries a list of converters. [`bind`] walks the
//! params in order, feeding them the raw arguments of a [`Ctx`], and yields
//! the converted [`Args`] the handler reads from.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use anyhow::{Result, anyhow};

use crate::core::{command::CommandParam, context::Ctx, error::Error};

// ============================================================================
// Values
// ============================================================================

#[derive(Clone, Debug, PartialEq)]
pub enum ArgValue {
    Str(String),
    Int(i64),
    Float(f64),
    Bool(bool),
}

impl ArgValue {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Self::Int(i) => Some(*i),
            _ => None,
        }
    }

    /// Floats, and integers widened to floats.
    pub fn as_float(&self) -> Option<f64> {
        match self {
            Self::Float(f) => Some(*f),
            Self::Int(i) => Some(*i as f64),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }
}

impl fmt::Display for ArgValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Str(s) => f.write_str(s),
            Self::Int(i) => write!(f, "{}", i),
            Self::Float(x) => write!(f, "{}", x),
            Self::Bool(b) => write!(f, "{}", b),
        }
    }
}

impl From<&str> for ArgValue {
    fn from(value: &str) -> Self {
        Self::Str(value.to_string())
    }
}

impl From<String> for ArgValue {
    fn from(value: String) -> Self {
        Self::Str(value)
    }
}

impl From<i64> for ArgValue {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<f64> for ArgValue {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl From<bool> for ArgValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

// ============================================================================
// Converters
// ============================================================================

/// Turns one raw argument into a value, or explains why it cannot.
pub type Converter = Arc<dyn Fn(&Ctx, &str) -> Result<ArgValue> + Send + Sync>;

/// Wrap a closure as a [`Converter`].
pub fn converter<F>(f: F) -> Converter
where
    F: Fn(&Ctx, &str) -> Result<ArgValue> + Send + Sync + 'static,
{
    Arc::new(f)
}

pub fn string() -> Converter {
    converter(|_ctx, arg| Ok(ArgValue::Str(arg.to_string())))
}

pub fn integer() -> Converter {
    converter(|_ctx, arg| {
        arg.parse::<i64>()
            .map(ArgValue::Int)
            .map_err(|e| anyhow!("{} is not an integer ({})", arg, e))
    })
}

pub fn float() -> Converter {
    converter(|_ctx, arg| {
        arg.parse::<f64>()
            .map(ArgValue::Float)
            .map_err(|e| anyhow!("{} is not a number ({})", arg, e))
    })
}

pub fn boolean() -> Converter {
    converter(|_ctx, arg| Ok(ArgValue::Bool(parse_bool(arg)?)))
}

/// Case-insensitive yes/no table used by [`boolean`].
pub fn parse_bool(argument: &str) -> Result<bool, Error> {
    match argument.to_lowercase().as_str() {
        "yes" | "y" | "true" | "t" | "1" | "enable" | "on" => Ok(true),
        "no" | "n" | "false" | "f" | "0" | "disable" | "off" => Ok(false),
        _ => Err(Error::BadArgument(format!(
            "{} is not a recognised boolean option.",
            argument
        ))),
    }
}

// ============================================================================
// Bound arguments
// ============================================================================

/// Converted arguments, keyed by param name.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Args {
    values: HashMap<String, ArgValue>,
}

impl Args {
    pub fn get(&self, name: &str) -> Option<&ArgValue> {
        self.values.get(name)
    }

    pub fn str(&self, name: &str) -> Option<&str> {
        self.get(name).and_then(ArgValue::as_str)
    }

    pub fn int(&self, name: &str) -> Option<i64> {
        self.get(name).and_then(ArgValue::as_int)
    }

    pub fn float(&self, name: &str) -> Option<f64> {
        self.get(name).and_then(ArgValue::as_float)
    }

    pub fn bool(&self, name: &str) -> Option<bool> {
        self.get(name).and_then(ArgValue::as_bool)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    fn insert(&mut self, name: &str, value: ArgValue) {
        self.values.insert(name.to_string(), value);
    }
}

/// Convert the raw arguments of `ctx` against `params`.
///
/// Params consume arguments left to right. When conversion fails and the
/// param has a default, the default is used and the argument is left for the
/// next param. A consume-rest param takes every remaining argument joined by
/// spaces. Arguments left over after the last param are ignored.
pub fn bind(params: &[CommandParam], ctx: &Ctx) -> Result<Args, Error> {
    let raw = ctx.args();
    let mut args = Args::default();
    let mut next = 0;

    for param in params {
        let arg = if param.consume_rest && next < raw.len() {
            let rest = raw[next..].join(" ");
            Some((rest, raw.len()))
        } else {
            raw.get(next).map(|arg| (arg.clone(), next + 1))
        };

        match arg {
            Some((arg, after)) => match param.convert(ctx, &arg) {
                Ok(value) => {
                    args.insert(&param.name, value);
                    next = after;
                }
                Err(err) => match &param.default {
                    Some(default) => args.insert(&param.name, default.clone()),
                    None => return Err(err),
                },
            },
            None => match &param.default {
                Some(default) => args.insert(&param.name, default.clone()),
                None if param.optional => {}
                None => {
                    return Err(Error::BadArgument(format!(
                        "Missing argument: {}",
                        param.name
                    )));
                }
            },
        }
    }

    Ok(args)
}

#[cfg(test)]
mod tests {
    use tokio::sync::mpsc;

    use super::*;

    fn ctx(args: &[&str]) -> Ctx {
        let (tx, _rx) = mpsc::channel(1);
        let args = args.iter().map(|a| a.to_string()).collect();
        Ctx::new("!", "test", args, tx)
    }

    fn bad_argument(err: Error) -> String {
        match err {
            Error::BadArgument(msg) => msg,
            other => panic!("expected BadArgument, got {:?}", other),
        }
    }

    #[test]
    fn bool_table() {
        for yes in ["yes", "Y", "true", "T", "1", "enable", "ON"] {
            assert!(parse_bool(yes).unwrap(), "{}", yes);
        }
        for no in ["no", "N", "false", "f", "0", "Disable", "off"] {
            assert!(!parse_bool(no).unwrap(), "{}", no);
        }

        let err = parse_bool("maybe").unwrap_err();
        assert_eq!(
            bad_argument(err),
            "maybe is not a recognised boolean option."
        );
    }

    #[test]
    fn converts_in_param_order() {
        let params = [
            CommandParam::required("n").converter(integer()),
            CommandParam::required("flag").converter(boolean()),
            CommandParam::required("ratio").converter(float()),
            CommandParam::required("word"),
        ];
        let args = bind(&params, &ctx(&["3", "off", "0.5", "hi"])).unwrap();

        assert_eq!(args.int("n"), Some(3));
        assert_eq!(args.bool("flag"), Some(false));
        assert_eq!(args.float("ratio"), Some(0.5));
        assert_eq!(args.str("word"), Some("hi"));
        assert_eq!(args.len(), 4);
    }

    #[test]
    fn failed_conversion_is_a_bad_argument() {
        let params = [CommandParam::required("n").converter(integer())];
        let err = bind(&params, &ctx(&["three"])).unwrap_err();
        assert!(bad_argument(err).starts_with("Invalid argument n: three is not an integer"));
    }

    #[test]
    fn converters_are_tried_in_order() {
        let params = [CommandParam::required("value")
            .converter(integer())
            .converter(boolean())];

        let args = bind(&params, &ctx(&["yes"])).unwrap();
        assert_eq!(args.get("value"), Some(&ArgValue::Bool(true)));

        let err = bind(&params, &ctx(&["maybe"])).unwrap_err();
        assert_eq!(
            bad_argument(err),
            "Could not convert maybe into a type specified for value."
        );
    }

    #[test]
    fn default_leaves_argument_for_next_param() {
        let params = [
            CommandParam::optional("count")
                .converter(integer())
                .default(1i64),
            CommandParam::required("target"),
        ];

        let args = bind(&params, &ctx(&["bob"])).unwrap();
        assert_eq!(args.int("count"), Some(1));
        assert_eq!(args.str("target"), Some("bob"));

        let args = bind(&params, &ctx(&["5", "bob"])).unwrap();
        assert_eq!(args.int("count"), Some(5));
        assert_eq!(args.str("target"), Some("bob"));
    }

    #[test]
    fn missing_arguments() {
        let params = [
            CommandParam::required("a").converter(integer()),
            CommandParam::optional("b").converter(integer()),
            CommandParam::optional("c").default("none"),
        ];

        let args = bind(&params, &ctx(&["1"])).unwrap();
        assert_eq!(args.int("a"), Some(1));
        assert!(!args.contains("b"));
        assert_eq!(args.str("c"), Some("none"));

        let err = bind(&params, &ctx(&[])).unwrap_err();
        assert_eq!(bad_argument(err), "Missing argument: a");
    }

    #[test]
    fn consume_rest_joins_remaining() {
        let params = [
            CommandParam::required("times").converter(integer()),
            CommandParam::required("text").consume_rest(),
        ];

        let args = bind(&params, &ctx(&["2", "hello", "big world"])).unwrap();
        assert_eq!(args.int("times"), Some(2));
        assert_eq!(args.str("text"), Some("hello big world"));

        let err = bind(&params, &ctx(&["2"])).unwrap_err();
        assert_eq!(bad_argument(err), "Missing argument: text");
    }

    #[test]
    fn no_params_bind_nothing() {
        let args = bind(&[], &ctx(&["ignored"])).unwrap();
        assert!(args.is_empty());
    }
}

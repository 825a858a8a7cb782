//! Named field resolvers and the registry that dispatches them.
//!
//! Every argument on a selection node names a resolver: a pure function of
//! `(scoped value, raw argument) -> new value`. The fixed vocabulary lives in
//! [`Resolver`]; any other argument name falls back to an implicit
//! equality filter against that field, or to a custom resolver registered on
//! the [`Registry`].

use std::collections::HashMap;
use std::cmp::Ordering;

use indexmap::IndexMap;
use rust_decimal::{Decimal, prelude::ToPrimitive};

use crate::convert::json_to_value;
use crate::value::Value;

/// Errors raised by resolver invocations.
///
/// Either kind aborts the whole resolution pass; there is no per-field
/// isolation or partial-result recovery.
#[derive(Debug, Clone)]
pub enum ResolveError {
    /// A resolver was applied to data of the wrong shape, e.g. an implicit
    /// equality filter on a non-array value
    UnsupportedOperation(String),

    /// A resolver's argument failed to parse into the type it requires,
    /// e.g. a non-JSON literal given to `if`
    InvalidArgument(String),
}

impl std::fmt::Display for ResolveError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ResolveError::UnsupportedOperation(msg) => {
                write!(f, "Unsupported operation: {}", msg)
            }
            ResolveError::InvalidArgument(msg) => write!(f, "Invalid argument: {}", msg),
        }
    }
}

impl std::error::Error for ResolveError {}

/// A user-registered resolver: `(scoped value, raw argument) -> new value`
pub type ResolverFn = Box<dyn Fn(Value, &str) -> Result<Value, ResolveError>>;

/// The fixed resolver vocabulary, plus a catch-all equality filter.
///
/// Argument names map onto variants through [`Resolver::for_argument`]; any
/// name outside the fixed set becomes `FieldEq(name)`, which filters the
/// in-scope array down to items whose field loosely equals the argument.
#[derive(Debug, Clone, PartialEq)]
pub enum Resolver {
    /// `orderBy: "field"` - sort ascending by the numeric value of a field
    OrderBy,
    /// `first: ""` - element at position 0, or null if empty
    First,
    /// `last: ""` - final element, or null if empty
    Last,
    /// `defaultValue: "fallback"` - replace null with the fallback
    DefaultValue,
    /// `toNumber: ""` - numeric coercion, keeping the input on failure
    ToNumber,
    /// `toArray: ""` - object to array of single-entry objects
    ToArray,
    /// `getObjectValues: ""` - object values in key-iteration order
    ObjectValues,
    /// `if: "true"` - pass the value through when the literal is truthy
    If,
    /// `merge: "{...}"` - concatenate arrays or shallow-merge objects
    Merge,
    /// Implicit equality filter against the named field
    FieldEq(String),
}

impl Resolver {
    /// Map an argument name to its resolver, defaulting to an equality filter
    pub fn for_argument(name: &str) -> Resolver {
        match name {
            "orderBy" => Resolver::OrderBy,
            "first" => Resolver::First,
            "last" => Resolver::Last,
            "defaultValue" => Resolver::DefaultValue,
            "toNumber" => Resolver::ToNumber,
            "toArray" => Resolver::ToArray,
            "getObjectValues" => Resolver::ObjectValues,
            "if" => Resolver::If,
            "merge" => Resolver::Merge,
            other => Resolver::FieldEq(other.to_string()),
        }
    }

    /// Apply the resolver to the value currently in scope.
    ///
    /// Resolvers never mutate their input; they consume it and return a new
    /// value.
    pub fn apply(&self, value: Value, raw: &str) -> Result<Value, ResolveError> {
        match self {
            Resolver::OrderBy => order_by(value, raw),
            Resolver::First => Ok(first(value)),
            Resolver::Last => Ok(last(value)),
            Resolver::DefaultValue => Ok(default_value(value, raw)),
            Resolver::ToNumber => Ok(to_number(value)),
            Resolver::ToArray => Ok(to_array(value)),
            Resolver::ObjectValues => Ok(object_values(value)),
            Resolver::If => cond_if(value, raw),
            Resolver::Merge => Ok(merge(value, raw)),
            Resolver::FieldEq(field) => field_eq(field, value, raw),
        }
    }
}

/// Dispatch table for resolver invocations.
///
/// Lookup order for an argument name: fixed vocabulary, then custom
/// resolvers registered here, then the implicit equality filter. Custom
/// resolvers cannot shadow the fixed vocabulary.
#[derive(Default)]
pub struct Registry {
    custom: HashMap<String, ResolverFn>,
}

impl Registry {
    /// Creates a registry with no custom resolvers.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a custom resolver under an argument name.
    ///
    /// ```
    /// use graft::{Registry, Value};
    ///
    /// let mut registry = Registry::new();
    /// registry.register("shout", |value, _arg| match value {
    ///     Value::String(s) => Ok(Value::String(s.to_uppercase())),
    ///     other => Ok(other),
    /// });
    ///
    /// let result = registry.apply("shout", Value::String("hi".into()), "").unwrap();
    /// assert_eq!(result, Value::String("HI".into()));
    /// ```
    pub fn register<F>(&mut self, name: impl Into<String>, resolver: F)
    where
        F: Fn(Value, &str) -> Result<Value, ResolveError> + 'static,
    {
        self.custom.insert(name.into(), Box::new(resolver));
    }

    /// Run the resolver selected by `name` against the scoped value.
    pub fn apply(&self, name: &str, value: Value, raw: &str) -> Result<Value, ResolveError> {
        let resolver = Resolver::for_argument(name);
        if let Resolver::FieldEq(field) = &resolver
            && let Some(custom) = self.custom.get(field.as_str())
        {
            return custom(value, raw);
        }
        resolver.apply(value, raw)
    }
}

/// orderBy - sort an array ascending by the numeric value of `key`.
/// Missing or non-numeric fields coerce to 0; ties may reorder.
fn order_by(value: Value, key: &str) -> Result<Value, ResolveError> {
    match value {
        Value::Array(mut items) => {
            items.sort_by(|a, b| {
                sort_key(a, key)
                    .partial_cmp(&sort_key(b, key))
                    .unwrap_or(Ordering::Equal)
            });
            Ok(Value::Array(items))
        }
        other => Err(ResolveError::UnsupportedOperation(format!(
            "'orderBy' requires an array, got {}",
            other.type_name()
        ))),
    }
}

fn sort_key(item: &Value, key: &str) -> f64 {
    match item.get(key) {
        Some(field) => numeric_or_zero(field),
        None => 0.0,
    }
}

/// first - element at position 0, or null
fn first(value: Value) -> Value {
    match value {
        Value::Array(items) => items.into_iter().next().unwrap_or(Value::Null),
        _ => Value::Null,
    }
}

/// last - final element, or null
fn last(value: Value) -> Value {
    match value {
        Value::Array(items) => items.into_iter().next_back().unwrap_or(Value::Null),
        _ => Value::Null,
    }
}

/// defaultValue - replace null with the fallback, numerically coerced when
/// the fallback parses as a number
fn default_value(value: Value, raw: &str) -> Value {
    if value.is_null() {
        parse_number(raw).unwrap_or_else(|| Value::String(raw.to_string()))
    } else {
        value
    }
}

/// toNumber - numeric coercion. A string that parses to zero keeps its
/// original form, matching the zero-equivalent-failure rule; `true` becomes 1.
fn to_number(value: Value) -> Value {
    match value {
        Value::String(s) => match parse_number(&s) {
            Some(Value::Integer(0)) | None => Value::String(s),
            Some(Value::Float(f)) if f == 0.0 => Value::String(s),
            Some(n) => n,
        },
        Value::Boolean(true) => Value::Integer(1),
        other => other,
    }
}

/// toArray - object to a sequence of single-entry objects, one per key/value
/// pair in key-iteration order. Non-object input passes through unchanged.
fn to_array(value: Value) -> Value {
    match value {
        Value::Object(map) => Value::Array(
            map.into_iter()
                .map(|(k, v)| Value::Object(IndexMap::from([(k, v)])))
                .collect(),
        ),
        other => other,
    }
}

/// getObjectValues - object values in key-iteration order, anything else
/// passes through unchanged
fn object_values(value: Value) -> Value {
    match value {
        Value::Object(map) => Value::Array(map.into_values().collect()),
        other => other,
    }
}

/// if - gate the value on a JSON literal argument
fn cond_if(value: Value, raw: &str) -> Result<Value, ResolveError> {
    let literal: serde_json::Value = serde_json::from_str(raw).map_err(|_| {
        ResolveError::InvalidArgument(format!(
            "'if' expects a JSON boolean or literal, got '{}'",
            raw
        ))
    })?;
    if json_truthy(&literal) {
        Ok(value)
    } else {
        Ok(Value::Null)
    }
}

fn json_truthy(literal: &serde_json::Value) -> bool {
    match literal {
        serde_json::Value::Null => false,
        serde_json::Value::Bool(b) => *b,
        serde_json::Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        serde_json::Value::String(s) => !s.is_empty(),
        serde_json::Value::Array(_) | serde_json::Value::Object(_) => true,
    }
}

/// merge - concatenate arrays or shallow-merge objects (right wins on key
/// collision). The argument is read as a JSON literal; anything else, or a
/// shape mismatch with the scoped value, leaves the value unchanged.
fn merge(value: Value, raw: &str) -> Value {
    let right = match serde_json::from_str::<serde_json::Value>(raw) {
        Ok(literal) => json_to_value(literal),
        Err(_) => Value::String(raw.to_string()),
    };

    match (value, right) {
        (Value::Array(mut left), Value::Array(right)) => {
            left.extend(right);
            Value::Array(left)
        }
        (Value::Object(mut left), Value::Object(right)) => {
            for (k, v) in right {
                left.insert(k, v);
            }
            Value::Object(left)
        }
        (left, _) => left,
    }
}

/// Implicit equality filter: keep array items whose `field` loosely equals
/// the raw argument. Non-object items never match.
fn field_eq(field: &str, value: Value, raw: &str) -> Result<Value, ResolveError> {
    match value {
        Value::Array(items) => {
            let filtered = items
                .into_iter()
                .filter(|item| item.get(field).is_some_and(|v| loose_eq(v, raw)))
                .collect();
            Ok(Value::Array(filtered))
        }
        other => Err(ResolveError::UnsupportedOperation(format!(
            "no resolver named '{}', and a field-equality filter cannot apply to {}",
            field,
            other.type_name()
        ))),
    }
}

/// Loose equality between a field value and a raw argument string: strings
/// compare verbatim, numbers compare after coercing the argument, booleans
/// match "true"/"false". Null and containers never match.
fn loose_eq(value: &Value, raw: &str) -> bool {
    match value {
        Value::String(s) => s == raw,
        Value::Integer(_) | Value::Float(_) => raw
            .trim()
            .parse::<f64>()
            .is_ok_and(|n| value.as_f64() == Some(n)),
        Value::Boolean(b) => raw == if *b { "true" } else { "false" },
        _ => false,
    }
}

/// Parse a raw argument as a number, preserving the integer/float split.
/// Goes through Decimal so "1.0" comes back as an integer.
fn parse_number(raw: &str) -> Option<Value> {
    let decimal: Decimal = raw.trim().parse().ok()?;
    if decimal.is_integer()
        && let Some(n) = decimal.to_i64()
    {
        return Some(Value::Integer(n));
    }
    decimal.to_f64().map(Value::Float)
}

/// Numeric interpretation of a field for sorting, coercing toward 0
fn numeric_or_zero(value: &Value) -> f64 {
    match value {
        Value::Integer(n) => *n as f64,
        Value::Float(n) => *n,
        Value::String(s) => s.trim().parse::<f64>().unwrap_or(0.0),
        _ => 0.0,
    }
}

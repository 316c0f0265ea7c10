//! Binding JSON-RPC params to a method's argument list.

use crate::registry::RpcError;
use serde_json::{Map, Value};

/// Arguments of one call, bound by position to the method's declared names.
#[derive(Debug)]
pub struct Params<'a> {
    method: &'static str,
    names: &'static [&'static str],
    values: Vec<Option<&'a Value>>,
}

impl<'a> Params<'a> {
    /// Bind positional (`[..]`) or named (`{..}`) params; absent params bind nothing.
    pub fn bind(
        method: &'static str,
        names: &'static [&'static str],
        params: Option<&'a Value>,
    ) -> Result<Self, RpcError> {
        let values = match params {
            None | Some(Value::Null) => vec![None; names.len()],
            Some(Value::Array(items)) => bind_positional(method, names, items)?,
            Some(Value::Object(fields)) => bind_named(method, names, fields)?,
            Some(other) => {
                return Err(RpcError::InvalidRequest(format!(
                    "params must be an array or an object, got {}",
                    other
                )));
            }
        };
        Ok(Self {
            method,
            names,
            values,
        })
    }

    fn value(&self, index: usize) -> Option<&'a Value> {
        self.values.get(index).copied().flatten().filter(|v| !v.is_null())
    }

    fn missing(&self, index: usize) -> RpcError {
        RpcError::InvalidParams(format!(
            "{}: missing argument '{}'",
            self.method, self.names[index]
        ))
    }

    fn mistyped(&self, index: usize, expected: &str, got: &Value) -> RpcError {
        RpcError::InvalidParams(format!(
            "{}: argument '{}' must be {}, got {}",
            self.method, self.names[index], expected, got
        ))
    }

    /// Any JSON integer, signed or not.
    pub fn optional_integer(&self, index: usize) -> Result<Option<i128>, RpcError> {
        let Some(value) = self.value(index) else {
            return Ok(None);
        };
        value
            .as_i64()
            .map(i128::from)
            .or_else(|| value.as_u64().map(i128::from))
            .map(Some)
            .ok_or_else(|| self.mistyped(index, "an integer", value))
    }

    pub fn integer(&self, index: usize) -> Result<i128, RpcError> {
        self.optional_integer(index)?.ok_or_else(|| self.missing(index))
    }

    /// A non-negative integer that fits in `u64`.
    pub fn optional_unsigned(&self, index: usize) -> Result<Option<u64>, RpcError> {
        let Some(value) = self.value(index) else {
            return Ok(None);
        };
        value
            .as_u64()
            .map(Some)
            .ok_or_else(|| self.mistyped(index, "a non-negative integer", value))
    }

    pub fn unsigned(&self, index: usize) -> Result<u64, RpcError> {
        self.optional_unsigned(index)?.ok_or_else(|| self.missing(index))
    }

    /// Seconds as any JSON number.
    pub fn optional_seconds(&self, index: usize) -> Result<Option<f64>, RpcError> {
        let Some(value) = self.value(index) else {
            return Ok(None);
        };
        value
            .as_f64()
            .map(Some)
            .ok_or_else(|| self.mistyped(index, "a number of seconds", value))
    }

    pub fn seconds(&self, index: usize) -> Result<f64, RpcError> {
        self.optional_seconds(index)?.ok_or_else(|| self.missing(index))
    }

    /// A key given as `[n, x]` or `{"n": .., "<field>": ..}`.
    pub fn key_pair(&self, index: usize, field: &str) -> Result<(u64, u64), RpcError> {
        let value = self.value(index).ok_or_else(|| self.missing(index))?;
        let pair = match value {
            Value::Array(items) if items.len() == 2 => items[0].as_u64().zip(items[1].as_u64()),
            Value::Object(fields) => fields
                .get("n")
                .and_then(Value::as_u64)
                .zip(fields.get(field).and_then(Value::as_u64)),
            _ => None,
        };
        pair.ok_or_else(|| self.mistyped(index, &format!("a key [n, {}]", field), value))
    }
}

fn bind_positional<'a>(
    method: &str,
    names: &[&str],
    items: &'a [Value],
) -> Result<Vec<Option<&'a Value>>, RpcError> {
    if items.len() > names.len() {
        return Err(RpcError::InvalidParams(format!(
            "{} takes at most {} arguments, got {}",
            method,
            names.len(),
            items.len()
        )));
    }
    let mut values: Vec<Option<&Value>> = items.iter().map(Some).collect();
    values.resize(names.len(), None);
    Ok(values)
}

fn bind_named<'a>(
    method: &str,
    names: &[&str],
    fields: &'a Map<String, Value>,
) -> Result<Vec<Option<&'a Value>>, RpcError> {
    if let Some(unknown) = fields.keys().find(|key| !names.contains(&key.as_str())) {
        return Err(RpcError::InvalidParams(format!(
            "{} has no argument '{}'",
            method, unknown
        )));
    }
    Ok(names.iter().map(|name| fields.get(*name)).collect())
}

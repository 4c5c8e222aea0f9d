use serde_json::{Map, Value};

/// How one output column is read out of a raw API item.
#[derive(Debug, Clone, Copy)]
pub enum KeySpec {
    /// Top-level key, copied as-is.
    Field(&'static str),
    /// The `salary` object, collapsed to a single bound (`to`, else `from`).
    Salary,
    /// `outer.inner`, where `outer` may be an object or a list of objects
    /// (first element wins). Emitted under the name `outer_inner`.
    Nested(&'static str, &'static str),
    /// `snippet.inner`, emitted under the inner name without coercion.
    Snippet(&'static str),
}

pub const EMPLOYER_KEYS: &[KeySpec] = &[
    KeySpec::Field("id"),
    KeySpec::Field("name"),
    KeySpec::Field("site_url"),
    KeySpec::Nested("area", "name"),
    KeySpec::Nested("industries", "name"),
    KeySpec::Field("open_vacancies"),
];

pub const OPENING_KEYS: &[KeySpec] = &[
    KeySpec::Field("id"),
    KeySpec::Field("name"),
    KeySpec::Nested("area", "name"),
    KeySpec::Salary,
    KeySpec::Nested("employer", "id"),
    KeySpec::Nested("employer", "name"),
    KeySpec::Snippet("requirement"),
    KeySpec::Snippet("responsibility"),
];

/// Flattens one raw API item into the columns named by `keys`.
///
/// Every key produces an entry; anything missing or malformed in the source
/// materializes as `Value::Null` so downstream inserts see a stable shape.
pub fn extract_fields(item: &Value, keys: &[KeySpec]) -> Map<String, Value> {
    let mut result = Map::new();
    for key in keys {
        match key {
            KeySpec::Field(name) => {
                let value = item.get(*name).cloned().unwrap_or(Value::Null);
                result.insert((*name).to_string(), coerce_numeric(value));
            }
            KeySpec::Salary => {
                let value = collapse_salary(item.get("salary"));
                result.insert("salary".to_string(), coerce_numeric(value));
            }
            KeySpec::Nested(outer, inner) => {
                let value = nested_value(item.get(*outer), inner);
                result.insert(format!("{}_{}", outer, inner), coerce_numeric(value));
            }
            KeySpec::Snippet(inner) => {
                let value = item
                    .get("snippet")
                    .and_then(Value::as_object)
                    .and_then(|snippet| snippet.get(*inner))
                    .cloned()
                    .unwrap_or(Value::Null);
                result.insert((*inner).to_string(), value);
            }
        }
    }
    result
}

/// Numeric id of a raw item, accepting both JSON numbers and digit strings.
pub fn numeric_id(value: Option<&Value>) -> Option<i64> {
    match value? {
        Value::Number(n) => n.as_i64(),
        Value::String(s) if is_digits(s) => s.parse().ok(),
        _ => None,
    }
}

/// Digit-only strings become i64 numbers; everything else passes through.
/// Strings too large for i64 are left as strings.
fn coerce_numeric(value: Value) -> Value {
    match value {
        Value::String(s) if is_digits(&s) => match s.parse::<i64>() {
            Ok(n) => Value::from(n),
            Err(_) => Value::String(s),
        },
        other => other,
    }
}

fn is_digits(s: &str) -> bool {
    !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit())
}

fn nested_value(outer: Option<&Value>, inner: &str) -> Value {
    match outer {
        Some(Value::Object(map)) => map.get(inner).cloned().unwrap_or(Value::Null),
        Some(Value::Array(items)) => items
            .first()
            .and_then(Value::as_object)
            .and_then(|map| map.get(inner))
            .cloned()
            .unwrap_or(Value::Null),
        _ => Value::Null,
    }
}

/// Single salary bound: the upper bound when present, otherwise the lower.
/// An explicit 0 counts as present; only null and absence fall through.
fn salary_bound(bounds: &Map<String, Value>) -> Value {
    bounds
        .get("to")
        .filter(|v| !v.is_null())
        .or_else(|| bounds.get("from").filter(|v| !v.is_null()))
        .cloned()
        .unwrap_or(Value::Null)
}

fn collapse_salary(salary: Option<&Value>) -> Value {
    match salary {
        Some(Value::Object(bounds)) => salary_bound(bounds),
        Some(Value::Array(entries)) => entries
            .iter()
            .find_map(|entry| entry.as_object().map(salary_bound))
            .unwrap_or(Value::Null),
        _ => Value::Null,
    }
}

/// Removes `key` from an extracted map as an i64, treating anything
/// non-numeric as absent.
pub fn take_i64(map: &mut Map<String, Value>, key: &str) -> Option<i64> {
    map.remove(key).and_then(|value| value.as_i64())
}

/// Removes `key` from an extracted map as a string, treating anything
/// non-string as absent.
pub fn take_string(map: &mut Map<String, Value>, key: &str) -> Option<String> {
    match map.remove(key) {
        Some(Value::String(s)) => Some(s),
        _ => None,
    }
}

use chrono::NaiveDateTime;
use std::collections::HashMap;
use std::fmt;

use crate::datasource::DataSource;
use crate::encode::{isoformat_z, unix_csv};
use crate::endpoint::Endpoint;
use crate::error::{Error, Result};
use crate::util::endpoint_url;

/// How a response body must be decoded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputType {
    /// Opaque bytes (images, movies, JP2 headers).
    Raw,
    /// UTF-8 text, typically a callback-wrapped payload.
    String,
    Json,
}

/// A caller-supplied field value, before validation.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Int(i64),
    Float(f64),
    Bool(bool),
    Str(String),
    DateTime(NaiveDateTime),
    DateTimes(Vec<NaiveDateTime>),
    Source(DataSource),
}

impl Value {
    fn kind(&self) -> &'static str {
        match self {
            Value::Int(_) => "integer",
            Value::Float(_) => "float",
            Value::Bool(_) => "boolean",
            Value::Str(_) => "string",
            Value::DateTime(_) => "datetime",
            Value::DateTimes(_) => "datetime list",
            Value::Source(_) => "datasource",
        }
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Int(v)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Value::Int(i64::from(v))
    }
}

impl From<u32> for Value {
    fn from(v: u32) -> Self {
        Value::Int(i64::from(v))
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Float(v)
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Str(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::Str(v)
    }
}

impl From<&String> for Value {
    fn from(v: &String) -> Self {
        Value::Str(v.clone())
    }
}

impl From<NaiveDateTime> for Value {
    fn from(v: NaiveDateTime) -> Self {
        Value::DateTime(v)
    }
}

impl From<Vec<NaiveDateTime>> for Value {
    fn from(v: Vec<NaiveDateTime>) -> Self {
        Value::DateTimes(v)
    }
}

impl From<&[NaiveDateTime]> for Value {
    fn from(v: &[NaiveDateTime]) -> Self {
        Value::DateTimes(v.to_vec())
    }
}

impl From<DataSource> for Value {
    fn from(v: DataSource) -> Self {
        Value::Source(v)
    }
}

/// A normalized field, ready to go on the query string.
#[derive(Debug, Clone, PartialEq)]
pub enum WireValue {
    Int(i64),
    Float(f64),
    Bool(bool),
    Str(String),
}

impl WireValue {
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            WireValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            WireValue::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            WireValue::Int(i) => Some(*i),
            _ => None,
        }
    }
}

impl fmt::Display for WireValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WireValue::Int(i) => write!(f, "{i}"),
            WireValue::Float(x) => write!(f, "{x}"),
            WireValue::Bool(b) => write!(f, "{b}"),
            WireValue::Str(s) => f.write_str(s),
        }
    }
}

/// Declared type of an endpoint field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Int,
    Float,
    Bool,
    Str,
    /// Sent as ISO-8601 with a trailing `Z`.
    DateTime,
    /// Sent as comma-joined Unix timestamps.
    DateTimeList,
    /// Sent as the integer id of a known [`DataSource`].
    SourceId,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Presence {
    Required,
    /// Omitted from the query when unset.
    Optional,
    /// Sent with this value when unset.
    Default(DefaultValue),
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DefaultValue {
    Bool(bool),
    Int(i64),
    Str(&'static str),
}

impl DefaultValue {
    fn to_wire(self) -> WireValue {
        match self {
            DefaultValue::Bool(b) => WireValue::Bool(b),
            DefaultValue::Int(i) => WireValue::Int(i),
            DefaultValue::Str(s) => WireValue::Str(s.to_string()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FieldSpec {
    pub name: &'static str,
    pub kind: FieldKind,
    pub presence: Presence,
}

impl FieldSpec {
    pub(crate) const fn required(name: &'static str, kind: FieldKind) -> Self {
        FieldSpec {
            name,
            kind,
            presence: Presence::Required,
        }
    }

    pub(crate) const fn optional(name: &'static str, kind: FieldKind) -> Self {
        FieldSpec {
            name,
            kind,
            presence: Presence::Optional,
        }
    }

    pub(crate) const fn flag(name: &'static str, default: bool) -> Self {
        FieldSpec {
            name,
            kind: FieldKind::Bool,
            presence: Presence::Default(DefaultValue::Bool(default)),
        }
    }

    pub(crate) const fn int_or(name: &'static str, default: i64) -> Self {
        FieldSpec {
            name,
            kind: FieldKind::Int,
            presence: Presence::Default(DefaultValue::Int(default)),
        }
    }

    pub(crate) const fn str_or(name: &'static str, default: &'static str) -> Self {
        FieldSpec {
            name,
            kind: FieldKind::Str,
            presence: Presence::Default(DefaultValue::Str(default)),
        }
    }
}

// Validated but not yet normalized.
#[derive(Debug)]
enum Typed {
    Int(i64),
    Float(f64),
    Bool(bool),
    Str(String),
    DateTime(NaiveDateTime),
    DateTimes(Vec<NaiveDateTime>),
    Source(DataSource),
}

fn mismatch(kind: FieldKind, got: &Value) -> String {
    let want = match kind {
        FieldKind::Int => "an integer",
        FieldKind::Float => "a number",
        FieldKind::Bool => "a boolean",
        FieldKind::Str => "a string",
        FieldKind::DateTime => "a datetime",
        FieldKind::DateTimeList => "a list of datetimes",
        FieldKind::SourceId => "a datasource id",
    };
    format!("expected {want}, got {}", got.kind())
}

fn parse_datetime(s: &str) -> Option<NaiveDateTime> {
    let s = s.trim().trim_end_matches('Z');
    ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
}

fn finite(x: f64) -> std::result::Result<f64, String> {
    if x.is_finite() {
        Ok(x)
    } else {
        Err(format!("{x} is not a finite number"))
    }
}

// i64::MAX as f64 rounds up to 2^63, hence the strict upper bound.
fn whole(x: f64) -> std::result::Result<i64, String> {
    let x = finite(x)?;
    if x.fract() != 0.0 {
        return Err(format!("{x} is not an integer"));
    }
    if x < i64::MIN as f64 || x >= i64::MAX as f64 {
        return Err(format!("{x} is out of range for an integer"));
    }
    Ok(x as i64)
}

/// Phase one: check the raw value against the declared kind.
fn coerce(kind: FieldKind, value: Value) -> std::result::Result<Typed, String> {
    let typed = match (kind, value) {
        (FieldKind::Int, Value::Int(i)) => Typed::Int(i),
        (FieldKind::Int, Value::Source(ds)) => Typed::Int(ds.id()),
        (FieldKind::Int, Value::Float(x)) => Typed::Int(whole(x)?),
        (FieldKind::Int, Value::Str(s)) => Typed::Int(
            s.trim()
                .parse()
                .map_err(|_| format!("{s:?} is not an integer"))?,
        ),

        (FieldKind::Float, Value::Float(x)) => Typed::Float(finite(x)?),
        (FieldKind::Float, Value::Int(i)) => Typed::Float(i as f64),
        (FieldKind::Float, Value::Str(s)) => Typed::Float(finite(
            s.trim()
                .parse()
                .map_err(|_| format!("{s:?} is not a number"))?,
        )?),

        (FieldKind::Bool, Value::Bool(b)) => Typed::Bool(b),
        (FieldKind::Bool, Value::Int(0)) => Typed::Bool(false),
        (FieldKind::Bool, Value::Int(1)) => Typed::Bool(true),
        (FieldKind::Bool, Value::Str(s)) => match s.to_ascii_lowercase().as_str() {
            "true" | "1" | "yes" => Typed::Bool(true),
            "false" | "0" | "no" => Typed::Bool(false),
            _ => return Err(format!("{s:?} is not a boolean")),
        },

        (FieldKind::Str, Value::Str(s)) => Typed::Str(s),
        (FieldKind::Str, Value::Int(i)) => Typed::Str(i.to_string()),
        (FieldKind::Str, Value::Float(x)) => Typed::Str(finite(x)?.to_string()),

        (FieldKind::DateTime, Value::DateTime(d)) => Typed::DateTime(d),
        (FieldKind::DateTime, Value::Str(s)) => Typed::DateTime(
            parse_datetime(&s).ok_or_else(|| format!("{s:?} is not an ISO-8601 datetime"))?,
        ),

        (FieldKind::DateTimeList, Value::DateTimes(v)) => Typed::DateTimes(v),
        (FieldKind::DateTimeList, Value::DateTime(d)) => Typed::DateTimes(vec![d]),

        (FieldKind::SourceId, Value::Source(ds)) => Typed::Source(ds),
        (FieldKind::SourceId, Value::Int(id)) => Typed::Source(
            DataSource::from_id(id).ok_or_else(|| format!("{id} is not a valid DataSource"))?,
        ),

        (kind, other) => return Err(mismatch(kind, &other)),
    };
    Ok(typed)
}

/// Phase two: convert a validated value to its wire form.
fn normalize(typed: Typed) -> WireValue {
    match typed {
        Typed::Int(i) => WireValue::Int(i),
        Typed::Float(x) => WireValue::Float(x),
        Typed::Bool(b) => WireValue::Bool(b),
        Typed::Str(s) => WireValue::Str(s),
        Typed::DateTime(d) => WireValue::Str(isoformat_z(&d)),
        Typed::DateTimes(v) => WireValue::Str(unix_csv(&v)),
        Typed::Source(ds) => WireValue::Int(ds.id()),
    }
}

/// Validated, normalized query parameters for one endpoint call.
///
/// Fields are stored in the order the endpoint declares them. Instances are
/// immutable; the target URL is derived on demand from whichever base URL
/// the caller supplies, so a configuration change is picked up by parameters
/// built before it.
#[derive(Debug, Clone, PartialEq)]
pub struct Parameters {
    endpoint: Endpoint,
    fields: Vec<(&'static str, WireValue)>,
}

impl Parameters {
    /// Validates `input` against the endpoint schema.
    ///
    /// Unknown names are ignored. Later duplicates win.
    pub fn new<K, I>(endpoint: Endpoint, input: I) -> Result<Self>
    where
        K: AsRef<str>,
        I: IntoIterator<Item = (K, Value)>,
    {
        let schema = endpoint.fields();
        let mut supplied: HashMap<&'static str, Value> = HashMap::new();
        for (name, value) in input {
            let name = name.as_ref();
            match schema.iter().find(|f| f.name == name) {
                Some(spec) => {
                    supplied.insert(spec.name, value);
                }
                None => tracing::debug!(
                    endpoint = endpoint.name(),
                    field = name,
                    "ignoring unknown parameter"
                ),
            }
        }

        let mut fields = Vec::with_capacity(schema.len());
        for spec in schema {
            match supplied.remove(spec.name) {
                Some(value) => {
                    let typed = coerce(spec.kind, value)
                        .map_err(|reason| Error::validation(spec.name, reason))?;
                    fields.push((spec.name, normalize(typed)));
                }
                None => match spec.presence {
                    Presence::Required => {
                        return Err(Error::validation(spec.name, "field required"));
                    }
                    Presence::Default(d) => fields.push((spec.name, d.to_wire())),
                    Presence::Optional => {}
                },
            }
        }

        Ok(Self { endpoint, fields })
    }

    pub fn endpoint(&self) -> Endpoint {
        self.endpoint
    }

    pub fn get(&self, name: &str) -> Option<&WireValue> {
        self.fields.iter().find(|(n, _)| *n == name).map(|(_, v)| v)
    }

    /// Whether `name` was set, either by the caller or by its default.
    pub fn is_set(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// A boolean field; unset and non-boolean read as `false`.
    pub fn flag(&self, name: &str) -> bool {
        self.get(name).and_then(WireValue::as_bool).unwrap_or(false)
    }

    /// Query pairs in declaration order.
    pub fn query(&self) -> Vec<(&'static str, String)> {
        self.fields
            .iter()
            .map(|(n, v)| (*n, v.to_string()))
            .collect()
    }

    pub fn output_type(&self) -> OutputType {
        self.endpoint.output_type(self)
    }

    /// `<api_url><EndpointName>/`
    pub fn url(&self, api_url: &str) -> String {
        endpoint_url(api_url, self.endpoint.name())
    }
}
